use serde_json::json;
use std::sync::Arc;
use table_view::data::pagination;
use table_view::data::record::ingest_records;
use table_view::data::{filter_stage, sort_stage};
use table_view::{
    source, Column, ColumnRegistry, DataValue, Record, SortDirection, SortSpec, TableView,
    ViewError,
};

fn people() -> Vec<Record> {
    let values = vec![
        json!({"name": "Bob", "age": 30, "city": "Oslo", "country": "Norway"}),
        json!({"name": "Al", "age": 25, "city": "Rome", "country": "Italy"}),
        json!({"name": "Cy", "age": 25, "city": "Lyon", "country": "France"}),
    ];
    ingest_records(&values, &["name", "age", "city", "country"]).unwrap()
}

fn registry() -> ColumnRegistry<Record> {
    ColumnRegistry::register(vec![
        Column::<Record>::field("name", "Name"),
        Column::<Record>::field("age", "Age"),
        Column::<Record>::field("city", "City"),
        Column::<Record>::field("country", "Country"),
    ])
    .unwrap()
}

fn view() -> TableView<Record> {
    TableView::new(Arc::new(people()), registry())
}

fn names(view: &TableView<Record>) -> Vec<String> {
    view.compute()
        .unwrap()
        .row_indices
        .iter()
        .map(|&i| view.rows()[i].get("name").unwrap().to_string())
        .collect()
}

/// A deterministic row set with plenty of duplicate keys
fn generated(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            Record::new()
                .with("id", i as i64)
                .with("bucket", (i * 7 % 5) as i64)
                .with("tag", format!("tag-{}", i % 3))
        })
        .collect()
}

fn generated_registry() -> ColumnRegistry<Record> {
    ColumnRegistry::register(vec![
        Column::<Record>::field("id", "Id"),
        Column::<Record>::field("bucket", "Bucket"),
        Column::<Record>::field("tag", "Tag"),
    ])
    .unwrap()
}

#[test]
fn test_sort_by_age_ascending_is_stable() {
    let mut view = view();
    view.set_sort(Some(SortSpec::ascending("age"))).unwrap();
    assert_eq!(names(&view), vec!["Al", "Cy", "Bob"]);
}

#[test]
fn test_sorted_out_of_range_page_clamps() {
    let mut view = view().with_page_size(2);
    view.set_sort(Some(SortSpec::ascending("age"))).unwrap();
    assert_eq!(view.set_page_index(5), 1);

    let computed = view.compute().unwrap();
    assert_eq!(computed.page_index(), 1);
    assert_eq!(computed.page_count(), 2);
    assert_eq!(names(&view), vec!["Bob"]);
}

#[test]
fn test_unsorted_out_of_range_page_is_last_row() {
    let mut view = view().with_page_size(2);
    view.set_page_index(5);
    let computed = view.compute().unwrap();
    assert_eq!(computed.page_count(), 2);
    assert_eq!(names(&view), vec!["Cy"]);
}

#[test]
fn test_filter_matches_numbers_by_text() {
    let mut view = view();
    view.set_filter("25");
    assert_eq!(names(&view), vec!["Al", "Cy"]);
}

#[test]
fn test_empty_filter_is_identity() {
    let rows = generated(40);
    let registry = generated_registry();
    let all: Vec<usize> = (0..rows.len()).collect();
    assert_eq!(filter_stage::apply(&rows, &registry, ""), all);
}

#[test]
fn test_sort_is_idempotent_and_stable_both_directions() {
    let rows = generated(60);
    let registry = generated_registry();

    for direction in [SortDirection::Ascending, SortDirection::Descending] {
        let sort = SortSpec::new("bucket", direction);
        let once =
            sort_stage::apply_to_indices(&rows, &registry, (0..rows.len()).collect(), Some(&sort))
                .unwrap();
        let twice =
            sort_stage::apply_to_indices(&rows, &registry, once.clone(), Some(&sort)).unwrap();
        assert_eq!(once, twice);

        // within a bucket, ids (original positions) stay increasing
        for pair in once.windows(2) {
            let a = rows[pair[0]].get("bucket").unwrap();
            let b = rows[pair[1]].get("bucket").unwrap();
            if a == b {
                assert!(pair[0] < pair[1], "unstable tie in {:?}", direction);
            }
        }
    }
}

#[test]
fn test_pages_partition_rows() {
    for count in [0usize, 1, 9, 10, 11, 57] {
        let rows = Arc::new(generated(count));
        for size in [1usize, 4, 10, 25] {
            let mut view = TableView::new(Arc::clone(&rows), generated_registry()).with_page_size(size);
            let first = view.compute().unwrap();
            assert_eq!(first.page_count(), pagination::page_count(count, size));
            assert!(first.page_count() >= 1);

            let mut seen = Vec::new();
            for page in 0..first.page_count() {
                view.set_page_index(page);
                seen.extend(view.compute().unwrap().row_indices);
            }
            assert_eq!(seen, (0..count).collect::<Vec<_>>());
        }
    }
}

#[test]
fn test_past_the_end_returns_last_page_not_empty() {
    let rows = Arc::new(generated(23));
    let mut view = TableView::new(rows, generated_registry()).with_page_size(10);
    view.set_page_index(99);
    let computed = view.compute().unwrap();
    assert_eq!(computed.page_index(), 2);
    assert_eq!(computed.row_count(), 3);
    assert!(!computed.can_next());
    assert!(computed.can_previous());
}

#[test]
fn test_empty_row_set_is_page_one_of_one() {
    let mut view = TableView::new(Arc::new(Vec::new()), registry());
    view.set_page_index(3);
    let computed = view.compute().unwrap();
    assert_eq!(computed.page_count(), 1);
    assert_eq!(computed.page_index(), 0);
    assert_eq!(computed.row_count(), 0);
    assert_eq!(computed.page_label(), "Page 1 of 1");
}

#[test]
fn test_export_ignores_page_but_keeps_filter_and_sort() {
    let rows = Arc::new(generated(50));
    let mut view = TableView::new(rows, generated_registry()).with_page_size(7);
    view.set_filter("tag-1");
    view.set_sort(Some(SortSpec::descending("id"))).unwrap();
    view.set_page_index(1);

    let total = view.compute().unwrap().total_rows;
    let grid = view.export().unwrap();
    assert_eq!(grid.row_count(), total);
    assert_eq!(grid.rows[0][0], "49");

    view.set_page_size(3).unwrap();
    assert_eq!(view.export().unwrap().row_count(), total);
}

#[test]
fn test_export_uses_visible_columns_in_order() {
    let mut view = view();
    view.set_column_visible("city", false).unwrap();
    view.move_column_left("country").unwrap();
    view.move_column_left("country").unwrap();

    let grid = view.export().unwrap();
    assert_eq!(grid.headers, vec!["Name", "Country", "Age"]);
    assert_eq!(grid.rows[0], vec!["Bob", "Norway", "30"]);
    assert_eq!(
        grid.to_csv_string().unwrap().lines().next(),
        Some("\"Name\",\"Country\",\"Age\"")
    );
}

#[test]
fn test_hiding_a_column_clamps_page() {
    let rows = Arc::new(generated(30));
    let mut view = TableView::new(rows, generated_registry()).with_page_size(5);
    view.set_column_visible("tag", false).unwrap();

    // "2" hits 12 ids and 4 more rows through bucket == 2
    view.set_filter("2");
    assert_eq!(view.compute().unwrap().total_rows, 16);
    assert_eq!(view.set_page_index(3), 3);

    view.set_column_visible("bucket", false).unwrap();
    assert_eq!(view.state().page_index, 2);
    let computed = view.compute().unwrap();
    assert_eq!(computed.total_rows, 12);
    assert_eq!(computed.page_index(), 2);
    assert_eq!(computed.row_count(), 2);
}

#[test]
fn test_hiding_a_column_removes_it_from_search() {
    let mut view = view();
    view.set_filter("italy");
    assert_eq!(names(&view), vec!["Al"]);

    view.set_column_visible("country", false).unwrap();
    assert!(names(&view).is_empty());
}

#[test]
fn test_sort_on_unsortable_column_fails_and_keeps_view() {
    let registry = ColumnRegistry::register(vec![
        Column::<Record>::field("name", "Name"),
        Column::<Record>::field("age", "Age").with_sortable(false),
    ])
    .unwrap();
    let mut view = TableView::new(Arc::new(people()), registry);

    let before = view.compute().unwrap();
    assert_eq!(
        view.set_sort(Some(SortSpec::ascending("age"))).unwrap_err(),
        ViewError::NotSortable("age".to_string())
    );
    assert_eq!(view.toggle_sort("age").unwrap_err(), ViewError::NotSortable("age".to_string()));
    assert_eq!(view.compute().unwrap(), before);
}

#[test]
fn test_unknown_column_actions_fail() {
    let mut view = view();
    assert_eq!(
        view.set_column_visible("zip", false).unwrap_err(),
        ViewError::UnknownColumn("zip".to_string())
    );
    assert!(view.set_column_width("zip", 80).is_err());
    assert!(view.move_column_right("zip").is_err());
}

#[test]
fn test_view_over_plain_structs() {
    struct Trade {
        id: u32,
        price: f64,
    }

    let rows = Arc::new(vec![
        Trade { id: 1, price: 10.5 },
        Trade { id: 2, price: 9.75 },
        Trade { id: 3, price: 100.0 },
    ]);
    let registry = ColumnRegistry::register(vec![
        Column::new("id", "Id", |t: &Trade| t.id.into()),
        Column::new("price", "Price", |t: &Trade| t.price.into()),
    ])
    .unwrap();

    let mut view = TableView::new(rows, registry);
    view.set_sort(Some(SortSpec::descending("price"))).unwrap();
    let computed = view.compute().unwrap();
    assert_eq!(computed.row_indices, vec![2, 0, 1]);
    assert_eq!(computed.cells[0], vec![DataValue::Integer(3), DataValue::Float(100.0)]);
    assert_eq!(computed.display_rows()[1], vec!["1", "10.5"]);
}

#[test]
fn test_records_to_view_from_loaded_json() {
    let values = source::parse_records(json!({
        "data": [
            {"name": "Bob", "age": 30},
            {"name": "Al", "age": 25}
        ]
    }))
    .unwrap();
    let mut view = source::records_to_view(&values).unwrap();
    view.toggle_sort("age").unwrap();
    assert_eq!(names(&view), vec!["Al", "Bob"]);
}
