use crate::data::column_registry::{Column, ColumnRegistry};
use crate::data::datavalue::DataValue;
use crate::data::datavalue_compare::compare_datavalues;
use crate::error::{Result, ViewError};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

/// The single active sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column_id: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column_id: column_id.into(),
            direction,
        }
    }

    pub fn ascending(column_id: impl Into<String>) -> Self {
        Self::new(column_id, SortDirection::Ascending)
    }

    pub fn descending(column_id: impl Into<String>) -> Self {
        Self::new(column_id, SortDirection::Descending)
    }
}

/// Resolve the column a sort refers to, checking it exists and is sortable
pub fn validate<'r, R>(registry: &'r ColumnRegistry<R>, sort: &SortSpec) -> Result<&'r Column<R>> {
    let column = registry.get(&sort.column_id)?;
    if !column.sortable {
        return Err(ViewError::NotSortable(sort.column_id.clone()));
    }
    Ok(column)
}

/// Reorder `indices` by the sort key. Without a sort the order is unchanged.
///
/// Equal keys keep their incoming relative order in both directions:
/// descending flips the comparator, not the output.
pub fn apply_to_indices<R>(
    rows: &[R],
    registry: &ColumnRegistry<R>,
    indices: Vec<usize>,
    sort: Option<&SortSpec>,
) -> Result<Vec<usize>> {
    let Some(sort) = sort else {
        return Ok(indices);
    };
    let column = validate(registry, sort)?;

    // Evaluate each accessor once instead of twice per comparison
    let mut keyed: Vec<(usize, DataValue)> = indices
        .into_iter()
        .map(|idx| (idx, column.value(&rows[idx])))
        .collect();

    keyed.sort_by(|(_, a), (_, b)| {
        let cmp = compare_datavalues(a, b);
        match sort.direction {
            SortDirection::Ascending => cmp,
            SortDirection::Descending => cmp.reverse(),
        }
    });

    debug!(
        target: "sort",
        "Sorted {} rows by '{}' {:?}",
        keyed.len(),
        sort.column_id,
        sort.direction
    );
    Ok(keyed.into_iter().map(|(idx, _)| idx).collect())
}

/// Sort a whole row slice, returning references in sorted order
pub fn apply<'a, R>(
    rows: &'a [R],
    registry: &ColumnRegistry<R>,
    sort: Option<&SortSpec>,
) -> Result<Vec<&'a R>> {
    let order = apply_to_indices(rows, registry, (0..rows.len()).collect(), sort)?;
    Ok(order.into_iter().map(|idx| &rows[idx]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Person {
        name: &'static str,
        age: i64,
    }

    fn people() -> Vec<Person> {
        vec![
            Person { name: "Bob", age: 30 },
            Person { name: "Al", age: 25 },
            Person { name: "Cy", age: 25 },
        ]
    }

    fn registry() -> ColumnRegistry<Person> {
        ColumnRegistry::register(vec![
            Column::new("name", "Name", |p: &Person| p.name.into()),
            Column::new("age", "Age", |p: &Person| p.age.into()),
            Column::new("notes", "Notes", |_: &Person| DataValue::Null).with_sortable(false),
        ])
        .unwrap()
    }

    fn names(rows: Vec<&Person>) -> Vec<&'static str> {
        rows.into_iter().map(|p| p.name).collect()
    }

    #[test]
    fn test_no_sort_preserves_order() {
        let rows = people();
        let sorted = apply(&rows, &registry(), None).unwrap();
        assert_eq!(names(sorted), vec!["Bob", "Al", "Cy"]);
    }

    #[test]
    fn test_ascending_is_stable() {
        let rows = people();
        let sorted = apply(&rows, &registry(), Some(&SortSpec::ascending("age"))).unwrap();
        assert_eq!(names(sorted), vec!["Al", "Cy", "Bob"]);
    }

    #[test]
    fn test_descending_is_stable() {
        let rows = people();
        let sorted = apply(&rows, &registry(), Some(&SortSpec::descending("age"))).unwrap();
        // Al still precedes Cy: ties are not reversed
        assert_eq!(names(sorted), vec!["Bob", "Al", "Cy"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let rows = people();
        let registry = registry();
        let sort = SortSpec::descending("name");

        let once = apply_to_indices(&rows, &registry, vec![0, 1, 2], Some(&sort)).unwrap();
        let twice = apply_to_indices(&rows, &registry, once.clone(), Some(&sort)).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once, vec![2, 0, 1]);
    }

    #[test]
    fn test_sort_errors() {
        let rows = people();
        let registry = registry();

        assert_eq!(
            apply(&rows, &registry, Some(&SortSpec::ascending("notes"))).unwrap_err(),
            ViewError::NotSortable("notes".to_string())
        );
        assert_eq!(
            apply(&rows, &registry, Some(&SortSpec::ascending("zip"))).unwrap_err(),
            ViewError::UnknownColumn("zip".to_string())
        );
    }

    #[test]
    fn test_direction_serde_accepts_short_names() {
        let d: SortDirection = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(d, SortDirection::Descending);
        assert_eq!(
            serde_json::to_string(&SortDirection::Ascending).unwrap(),
            "\"ascending\""
        );
    }
}
