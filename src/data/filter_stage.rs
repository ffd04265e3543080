//! Global text filter
//!
//! Case-insensitive substring match over the canonical string form of every
//! filterable, visible column. A row is kept when any of those columns match.

use crate::data::column_registry::{Column, ColumnRegistry};
use tracing::debug;

/// Indices of the rows in `rows` that match `filter_text`, in input order.
///
/// Blank text keeps every row.
pub fn apply<R>(rows: &[R], registry: &ColumnRegistry<R>, filter_text: &str) -> Vec<usize> {
    apply_to_indices(rows, registry, (0..rows.len()).collect(), filter_text)
}

/// Same as [`apply`] but narrows an existing index list.
pub fn apply_to_indices<R>(
    rows: &[R],
    registry: &ColumnRegistry<R>,
    indices: Vec<usize>,
    filter_text: &str,
) -> Vec<usize> {
    if is_blank(filter_text) {
        return indices;
    }

    let needle = filter_text.to_lowercase();
    let columns: Vec<&Column<R>> = registry
        .visible_columns()
        .filter(|c| c.filterable)
        .collect();

    let before = indices.len();
    let matched: Vec<usize> = indices
        .into_iter()
        .filter(|&idx| row_matches(&rows[idx], &columns, &needle))
        .collect();

    debug!(
        target: "filter",
        "Filter '{}' over {} columns kept {} of {} rows",
        filter_text,
        columns.len(),
        matched.len(),
        before
    );
    matched
}

pub fn is_blank(filter_text: &str) -> bool {
    filter_text.trim().is_empty()
}

/// `needle` must already be lower-cased.
fn row_matches<R>(row: &R, columns: &[&Column<R>], needle: &str) -> bool {
    columns
        .iter()
        .any(|column| column.value(row).to_string().to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datavalue::DataValue;

    struct Person {
        name: &'static str,
        age: i64,
        city: &'static str,
    }

    fn people() -> Vec<Person> {
        vec![
            Person { name: "Bob", age: 30, city: "Oslo" },
            Person { name: "Al", age: 25, city: "Rome" },
            Person { name: "Cy", age: 25, city: "Lyon" },
        ]
    }

    fn registry() -> ColumnRegistry<Person> {
        ColumnRegistry::register(vec![
            Column::new("name", "Name", |p: &Person| p.name.into()),
            Column::new("age", "Age", |p: &Person| p.age.into()),
            Column::new("city", "City", |p: &Person| p.city.into()),
        ])
        .unwrap()
    }

    #[test]
    fn test_blank_filter_is_identity() {
        let rows = people();
        let registry = registry();
        assert_eq!(apply(&rows, &registry, ""), vec![0, 1, 2]);
        assert_eq!(apply(&rows, &registry, "   "), vec![0, 1, 2]);
    }

    #[test]
    fn test_numeric_values_match_by_string_form() {
        let rows = people();
        let registry = registry();
        assert_eq!(apply(&rows, &registry, "25"), vec![1, 2]);
        // 30 contains "3"
        assert_eq!(apply(&rows, &registry, "3"), vec![0]);
    }

    #[test]
    fn test_case_insensitive() {
        let rows = people();
        let registry = registry();
        assert_eq!(apply(&rows, &registry, "ROME"), vec![1]);
        assert_eq!(apply(&rows, &registry, "o"), vec![0, 1, 2]);
    }

    #[test]
    fn test_hidden_and_unfilterable_columns_do_not_participate() {
        let rows = people();
        let mut registry = registry();

        registry.set_visible("city", false).unwrap();
        assert!(apply(&rows, &registry, "Rome").is_empty());

        let registry = ColumnRegistry::register(vec![
            Column::new("name", "Name", |p: &Person| p.name.into()),
            Column::new("age", "Age", |p: &Person| p.age.into()).with_filterable(false),
        ])
        .unwrap();
        assert!(apply(&rows, &registry, "25").is_empty());
    }

    #[test]
    fn test_null_values_never_match() {
        let rows = people();
        let registry = ColumnRegistry::register(vec![Column::new(
            "nothing",
            "Nothing",
            |_: &Person| DataValue::Null,
        )])
        .unwrap();
        assert!(apply(&rows, &registry, "a").is_empty());
    }

    #[test]
    fn test_narrowing_existing_indices() {
        let rows = people();
        let registry = registry();
        assert_eq!(apply_to_indices(&rows, &registry, vec![2, 0], "o"), vec![2, 0]);
    }
}
