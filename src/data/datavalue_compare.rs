use crate::data::datavalue::DataValue;
use std::cmp::Ordering;

/// Rank used to order values of different types against each other.
/// Order: Null < Boolean < numbers < String
fn type_rank(value: &DataValue) -> u8 {
    match value {
        DataValue::Null => 0,
        DataValue::Boolean(_) => 1,
        DataValue::Integer(_) | DataValue::Float(_) => 2,
        DataValue::String(_) => 3,
    }
}

/// Natural ordering between two DataValues.
///
/// Numbers compare numerically (integers and floats mix freely), strings
/// compare lexicographically, and Null sorts before everything else.
pub fn compare_datavalues(a: &DataValue, b: &DataValue) -> Ordering {
    match (a, b) {
        (DataValue::Integer(a), DataValue::Integer(b)) => a.cmp(b),
        (DataValue::Float(a), DataValue::Float(b)) => compare_floats(*a, *b),
        (DataValue::Integer(i), DataValue::Float(f)) => compare_int_float(*i, *f),
        (DataValue::Float(f), DataValue::Integer(i)) => compare_int_float(*i, *f).reverse(),
        (DataValue::String(a), DataValue::String(b)) => a.cmp(b),
        (DataValue::Boolean(a), DataValue::Boolean(b)) => a.cmp(b),
        (DataValue::Null, DataValue::Null) => Ordering::Equal,
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

// NaN sorts after every other number and equal to itself, keeping the
// ordering total.
fn compare_floats(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

// Exact even past 2^53, where casting the integer to f64 would round it.
fn compare_int_float(i: i64, f: f64) -> Ordering {
    // 2^63 as f64; every float in [-2^63, 2^63) truncates to a valid i64
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() || f >= LIMIT {
        return Ordering::Less;
    }
    if f < -LIMIT {
        return Ordering::Greater;
    }

    let whole = f.trunc();
    i.cmp(&(whole as i64)).then_with(|| {
        // Same integer part: only the fraction decides
        if f > whole {
            Ordering::Less
        } else if f < whole {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}
