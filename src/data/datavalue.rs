use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// A single cell value produced by a column accessor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl DataValue {
    /// Convert a JSON scalar into a cell value.
    ///
    /// Arrays and objects have no natural cell form, so they are kept as
    /// their compact JSON text.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => DataValue::Null,
            JsonValue::Bool(b) => DataValue::Boolean(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DataValue::Integer(i)
                } else {
                    n.as_f64().map(DataValue::Float).unwrap_or(DataValue::Null)
                }
            }
            JsonValue::String(s) => DataValue::String(s.clone()),
            other => DataValue::String(other.to_string()),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            DataValue::Null => JsonValue::Null,
            DataValue::Boolean(b) => JsonValue::Bool(*b),
            DataValue::Integer(i) => JsonValue::from(*i),
            DataValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            DataValue::String(s) => JsonValue::String(s.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::String(s) => write!(f, "{}", s),
            DataValue::Integer(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{}", fl),
            DataValue::Boolean(b) => write!(f, "{}", b),
            DataValue::Null => write!(f, ""),
        }
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Integer(i)
    }
}

impl From<u32> for DataValue {
    fn from(i: u32) -> Self {
        DataValue::Integer(i64::from(i))
    }
}

impl From<f64> for DataValue {
    fn from(f: f64) -> Self {
        DataValue::Float(f)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Boolean(b)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(DataValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_string_form() {
        assert_eq!(DataValue::Integer(42).to_string(), "42");
        assert_eq!(DataValue::Float(2.5).to_string(), "2.5");
        assert_eq!(DataValue::Boolean(true).to_string(), "true");
        assert_eq!(DataValue::Null.to_string(), "");
    }

    #[test]
    fn test_from_json() {
        assert_eq!(DataValue::from_json(&json!(30)), DataValue::Integer(30));
        assert_eq!(DataValue::from_json(&json!(1.5)), DataValue::Float(1.5));
        assert_eq!(
            DataValue::from_json(&json!("Paris")),
            DataValue::String("Paris".to_string())
        );
        assert_eq!(DataValue::from_json(&json!(null)), DataValue::Null);
        assert_eq!(
            DataValue::from_json(&json!([1, 2])),
            DataValue::String("[1,2]".to_string())
        );
    }

    #[test]
    fn test_option_conversion() {
        let missing: Option<i64> = None;
        assert_eq!(DataValue::from(missing), DataValue::Null);
        assert_eq!(DataValue::from(Some(7_i64)), DataValue::Integer(7));
    }
}
