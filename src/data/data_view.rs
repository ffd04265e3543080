use crate::data::column_registry::ColumnRegistry;
use crate::data::data_exporter::ExportGrid;
use crate::data::datavalue::DataValue;
use crate::data::filter_stage;
use crate::data::pagination::{self, PageInfo};
use crate::data::sort_stage::{self, SortDirection, SortSpec};
use crate::error::{Result, ViewError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Rows per page when nothing else is configured
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// User-chosen view parameters
///
/// `visible_column_ids` and `column_widths` mirror the column registry the
/// state belongs to; change them through [`TableView`] actions or
/// [`TableView::apply_state`] so the two never drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub global_filter: String,
    pub sort: Option<SortSpec>,
    pub page_index: usize,
    pub page_size: usize,
    pub visible_column_ids: BTreeSet<String>,
    pub column_widths: BTreeMap<String, u32>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            global_filter: String::new(),
            sort: None,
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            visible_column_ids: BTreeSet::new(),
            column_widths: BTreeMap::new(),
        }
    }
}

impl ViewState {
    /// Default state for a registry: first page, no filter, no sort and the
    /// registry's own column visibility and widths
    pub fn for_registry<R>(registry: &ColumnRegistry<R>) -> Self {
        let mut state = Self::default();
        state.sync_columns(registry);
        state
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn sync_columns<R>(&mut self, registry: &ColumnRegistry<R>) {
        self.visible_column_ids = registry.visible_ids().into_iter().collect();
        self.column_widths = registry
            .columns()
            .iter()
            .map(|c| (c.id.clone(), c.width()))
            .collect();
    }
}

/// Header of one visible column in a computed view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub id: String,
    pub label: String,
    pub width: u32,
    pub sortable: bool,
    /// Direction when this column carries the active sort
    pub sorted: Option<SortDirection>,
}

/// Output of one pipeline run: the visible page plus its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedView {
    pub headers: Vec<ColumnHeader>,
    /// Positions in the source row set of the rows on this page, in display order
    pub row_indices: Vec<usize>,
    /// One entry per page row, one value per visible column
    pub cells: Vec<Vec<DataValue>>,
    pub page: PageInfo,
    /// Rows left after filtering, across all pages
    pub total_rows: usize,
    /// Rows in the source row set
    pub source_rows: usize,
}

impl ComputedView {
    pub fn page_index(&self) -> usize {
        self.page.page_index
    }

    pub fn page_count(&self) -> usize {
        self.page.page_count
    }

    pub fn can_previous(&self) -> bool {
        self.page.can_previous
    }

    pub fn can_next(&self) -> bool {
        self.page.can_next
    }

    /// Rows on this page
    pub fn row_count(&self) -> usize {
        self.row_indices.len()
    }

    /// Cells in their canonical string form, ready to draw
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect()
    }

    /// "Page 2 of 5"
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page.page_index + 1, self.page.page_count)
    }
}

/// The view engine: a row set, its columns and the current view state.
///
/// Every read recomputes filter → sort → paginate from the stored rows.
/// Actions validate before mutating, so a rejected action leaves the view
/// exactly as it was.
pub struct TableView<R> {
    /// The caller's rows; never copied or modified
    rows: Arc<Vec<R>>,
    registry: ColumnRegistry<R>,
    state: ViewState,
}

impl<R> TableView<R> {
    pub fn new(rows: Arc<Vec<R>>, registry: ColumnRegistry<R>) -> Self {
        let state = ViewState::for_registry(&registry);
        info!(
            target: "table_view",
            "New view over {} rows, {} columns",
            rows.len(),
            registry.len()
        );
        Self {
            rows,
            registry,
            state,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.state.page_size = page_size.max(1);
        self
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn registry(&self) -> &ColumnRegistry<R> {
        &self.registry
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    // ---------- Filter ----------

    /// Set the global search text. Returns to the first page.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.state.global_filter = text.into();
        self.state.page_index = 0;
        debug!(target: "table_view", "Filter set to '{}'", self.state.global_filter);
    }

    pub fn clear_filter(&mut self) {
        self.set_filter(String::new());
    }

    // ---------- Sort ----------

    /// Replace the active sort. `None` restores source order.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) -> Result<()> {
        if let Some(spec) = &sort {
            sort_stage::validate(&self.registry, spec)?;
        }
        self.state.sort = sort;
        Ok(())
    }

    pub fn clear_sort(&mut self) {
        self.state.sort = None;
    }

    /// Header-click sorting: unsorted → ascending → descending → unsorted.
    /// Clicking a different column starts it at ascending.
    pub fn toggle_sort(&mut self, column_id: &str) -> Result<Option<SortDirection>> {
        let next = match &self.state.sort {
            Some(current) if current.column_id == column_id => match current.direction {
                SortDirection::Ascending => Some(SortDirection::Descending),
                SortDirection::Descending => None,
            },
            _ => Some(SortDirection::Ascending),
        };

        self.set_sort(next.map(|direction| SortSpec::new(column_id, direction)))?;
        Ok(next)
    }

    // ---------- Pagination ----------

    /// Go to a page; out-of-range requests land on the last page.
    /// Returns the page actually selected.
    pub fn set_page_index(&mut self, page_index: usize) -> usize {
        let total = self.filtered_count();
        let page = pagination::apply(total, page_index, self.state.page_size);
        self.state.page_index = page.page_index;
        self.state.page_index
    }

    pub fn next_page(&mut self) -> usize {
        self.set_page_index(self.state.page_index.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> usize {
        self.set_page_index(self.state.page_index.saturating_sub(1))
    }

    pub fn first_page(&mut self) -> usize {
        self.set_page_index(0)
    }

    pub fn last_page(&mut self) -> usize {
        self.set_page_index(usize::MAX)
    }

    /// Change the page size, keeping the first row of the current page on
    /// screen. A zero size is treated as one.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        let page_size = page_size.max(1);
        let order = self.ordered_indices()?;
        let anchor = self.anchor_row(&order);

        self.state.page_size = page_size;
        self.state.page_index = anchor_page(&order, anchor, page_size);
        debug!(
            target: "table_view",
            "Page size {} -> page {}",
            page_size,
            self.state.page_index
        );
        Ok(())
    }

    /// Source position of the first row on the current page, if any
    fn anchor_row(&self, order: &[usize]) -> Option<usize> {
        let current = pagination::apply(order.len(), self.state.page_index, self.state.page_size);
        current.slice(order).first().copied()
    }

    // ---------- Columns ----------

    pub fn set_column_visible(&mut self, column_id: &str, visible: bool) -> Result<()> {
        self.registry.set_visible(column_id, visible)?;
        self.after_column_change();
        Ok(())
    }

    /// Flip a column's visibility, returning the new value
    pub fn toggle_column_visible(&mut self, column_id: &str) -> Result<bool> {
        let visible = !self.registry.get(column_id)?.visible;
        self.set_column_visible(column_id, visible)?;
        Ok(visible)
    }

    pub fn show_all_columns(&mut self) {
        self.registry.show_all();
        self.after_column_change();
    }

    /// Resize a column; returns the width applied after the floor clamp
    pub fn set_column_width(&mut self, column_id: &str, width: u32) -> Result<u32> {
        let applied = self.registry.set_width(column_id, width)?;
        self.state.column_widths.insert(column_id.to_string(), applied);
        Ok(applied)
    }

    pub fn move_column_left(&mut self, column_id: &str) -> Result<()> {
        self.registry.move_column_left(column_id)
    }

    pub fn move_column_right(&mut self, column_id: &str) -> Result<()> {
        self.registry.move_column_right(column_id)
    }

    // Visibility changes which columns the filter searches, so the
    // filtered row count and with it the valid page range may move.
    fn after_column_change(&mut self) {
        self.state.sync_columns(&self.registry);
        self.set_page_index(self.state.page_index);
    }

    // ---------- Data lifecycle ----------

    /// Swap in a freshly loaded row set. Filter, sort and page reset;
    /// page size and column layout are kept.
    pub fn replace_rows(&mut self, rows: Arc<Vec<R>>) {
        info!(target: "table_view", "Replacing {} rows with {}", self.rows.len(), rows.len());
        self.rows = rows;
        self.state = ViewState::for_registry(&self.registry).with_page_size(self.state.page_size);
    }

    /// Swap in a new row set together with new column definitions
    pub fn replace_data(&mut self, rows: Arc<Vec<R>>, registry: ColumnRegistry<R>) {
        let page_size = self.state.page_size;
        *self = TableView::new(rows, registry).with_page_size(page_size);
    }

    /// Replace the whole view state at once.
    ///
    /// Every column id and the sort are checked before anything changes.
    /// Widths below the floor are raised and the page index is clamped.
    /// When the page size differs from the current one, the requested page
    /// index is ignored and the first row of the current page stays on
    /// screen, as with [`TableView::set_page_size`].
    pub fn apply_state(&mut self, state: ViewState) -> Result<()> {
        for id in state
            .visible_column_ids
            .iter()
            .chain(state.column_widths.keys())
        {
            if !self.registry.contains(id) {
                return Err(ViewError::UnknownColumn(id.clone()));
            }
        }
        if let Some(spec) = &state.sort {
            sort_stage::validate(&self.registry, spec)?;
        }

        let page_size = state.page_size.max(1);
        let anchor = if page_size != self.state.page_size {
            let order = self.ordered_indices()?;
            Some(self.anchor_row(&order))
        } else {
            None
        };

        self.registry
            .set_layout(&state.visible_column_ids, &state.column_widths);

        let requested_page = state.page_index;
        self.state = ViewState { page_size, ..state };
        self.state.sync_columns(&self.registry);

        match anchor {
            Some(anchor) => {
                // Filter and sort may change too, so find the anchor in the new order
                let order = self.ordered_indices()?;
                self.state.page_index = anchor_page(&order, anchor, page_size);
            }
            None => {
                self.set_page_index(requested_page);
            }
        }
        Ok(())
    }

    // ---------- Derivation ----------

    /// Filtered and sorted row positions, before pagination
    pub fn ordered_indices(&self) -> Result<Vec<usize>> {
        let filtered = filter_stage::apply(&self.rows, &self.registry, &self.state.global_filter);
        sort_stage::apply_to_indices(&self.rows, &self.registry, filtered, self.state.sort.as_ref())
    }

    fn filtered_count(&self) -> usize {
        filter_stage::apply(&self.rows, &self.registry, &self.state.global_filter).len()
    }

    /// Run the full pipeline for the current state
    pub fn compute(&self) -> Result<ComputedView> {
        let order = self.ordered_indices()?;
        let page = pagination::apply(order.len(), self.state.page_index, self.state.page_size);
        let row_indices = page.slice(&order).to_vec();

        let columns: Vec<_> = self.registry.visible_columns().collect();
        let headers = columns
            .iter()
            .map(|c| ColumnHeader {
                id: c.id.clone(),
                label: c.label.clone(),
                width: c.width(),
                sortable: c.sortable,
                sorted: self
                    .state
                    .sort
                    .as_ref()
                    .filter(|s| s.column_id == c.id)
                    .map(|s| s.direction),
            })
            .collect();

        let cells = row_indices
            .iter()
            .map(|&idx| columns.iter().map(|c| c.value(&self.rows[idx])).collect())
            .collect();

        debug!(
            target: "table_view",
            "Computed page {}/{} with {} of {} rows",
            page.page_index + 1,
            page.page_count,
            row_indices.len(),
            order.len()
        );

        Ok(ComputedView {
            headers,
            row_indices,
            cells,
            total_rows: order.len(),
            source_rows: self.rows.len(),
            page,
        })
    }

    /// Every filtered and sorted row over the visible columns, ignoring pagination
    pub fn export(&self) -> Result<ExportGrid> {
        let order = self.ordered_indices()?;
        Ok(ExportGrid::from_view(&self.rows, &self.registry, &order))
    }
}

/// Page index under `page_size` that shows the `anchor` row of `order`.
/// A missing anchor restarts at the first page.
fn anchor_page(order: &[usize], anchor: Option<usize>, page_size: usize) -> usize {
    let position = anchor.and_then(|row| order.iter().position(|&idx| idx == row));
    pagination::anchor_page_index(position, page_size)
}
