use crate::data::datavalue::DataValue;
use crate::error::{Result, ViewError};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Narrowest width, in pixels, a column can be resized to
pub const MIN_COLUMN_WIDTH: u32 = 50;

/// Width given to columns that do not set one
pub const DEFAULT_COLUMN_WIDTH: u32 = 150;

/// Extracts a cell value from a row
pub type Accessor<R> = Arc<dyn Fn(&R) -> DataValue + Send + Sync>;

/// Column definition: identity, display label and how to read the cell
pub struct Column<R> {
    pub id: String,
    pub label: String,
    accessor: Accessor<R>,
    pub sortable: bool,
    pub filterable: bool,
    pub visible: bool,
    width: u32,
}

impl<R> Column<R> {
    /// Create a sortable, filterable, visible column with the default width
    pub fn new<F>(id: impl Into<String>, label: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> DataValue + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            label: label.into(),
            accessor: Arc::new(accessor),
            sortable: true,
            filterable: true,
            visible: true,
            width: DEFAULT_COLUMN_WIDTH,
        }
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn with_filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set the initial width; values under [`MIN_COLUMN_WIDTH`] are raised to it
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = clamp_width(width);
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Read this column's value from a row
    pub fn value(&self, row: &R) -> DataValue {
        (self.accessor)(row)
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            accessor: Arc::clone(&self.accessor),
            sortable: self.sortable,
            filterable: self.filterable,
            visible: self.visible,
            width: self.width,
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("visible", &self.visible)
            .field("width", &self.width)
            .finish()
    }
}

pub fn clamp_width(width: u32) -> u32 {
    width.max(MIN_COLUMN_WIDTH)
}

/// Ordered set of columns keyed by id. Registration order is display order.
pub struct ColumnRegistry<R> {
    columns: Vec<Column<R>>,
}

impl<R> ColumnRegistry<R> {
    /// Build a registry, rejecting repeated ids
    pub fn register(columns: Vec<Column<R>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.id.as_str()) {
                return Err(ViewError::DuplicateColumnId(column.id.clone()));
            }
        }

        debug!(target: "columns", "Registered {} columns", columns.len());
        Ok(Self { columns })
    }

    /// Append one column to an existing registry
    pub fn add(&mut self, column: Column<R>) -> Result<()> {
        if self.position(&column.id).is_some() {
            return Err(ViewError::DuplicateColumnId(column.id));
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&Column<R>> {
        self.columns
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ViewError::UnknownColumn(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Column<R>> {
        self.columns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ViewError::UnknownColumn(id.to_string()))
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) -> Result<()> {
        trace!(target: "columns", "set_visible({}, {})", id, visible);
        self.get_mut(id)?.visible = visible;
        Ok(())
    }

    pub fn show_all(&mut self) {
        for column in &mut self.columns {
            column.visible = true;
        }
    }

    /// Set every column's visibility from `visible` and apply any widths in
    /// `widths`. Ids not registered here are ignored.
    pub fn set_layout(&mut self, visible: &BTreeSet<String>, widths: &BTreeMap<String, u32>) {
        for column in &mut self.columns {
            column.visible = visible.contains(&column.id);
            if let Some(&width) = widths.get(&column.id) {
                column.width = clamp_width(width);
            }
        }
        debug!(target: "columns", "Layout applied: {} visible", visible.len());
    }

    /// Resize a column, returning the width actually applied after clamping
    pub fn set_width(&mut self, id: &str, width: u32) -> Result<u32> {
        let column = self.get_mut(id)?;
        column.width = clamp_width(width);
        trace!(target: "columns", "set_width({}, {}) -> {}", id, width, column.width);
        Ok(column.width)
    }

    /// Move a column one place left. The first column wraps to the end.
    pub fn move_column_left(&mut self, id: &str) -> Result<()> {
        let idx = self
            .position(id)
            .ok_or_else(|| ViewError::UnknownColumn(id.to_string()))?;

        if idx == 0 {
            let col = self.columns.remove(0);
            self.columns.push(col);
        } else {
            self.columns.swap(idx - 1, idx);
        }
        Ok(())
    }

    /// Move a column one place right. The last column wraps to the start.
    pub fn move_column_right(&mut self, id: &str) -> Result<()> {
        let idx = self
            .position(id)
            .ok_or_else(|| ViewError::UnknownColumn(id.to_string()))?;

        if idx == self.columns.len() - 1 {
            if let Some(col) = self.columns.pop() {
                self.columns.insert(0, col);
            }
        } else {
            self.columns.swap(idx, idx + 1);
        }
        Ok(())
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &Column<R>> {
        self.columns.iter().filter(|c| c.visible)
    }

    pub fn ids(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.id.clone()).collect()
    }

    pub fn visible_ids(&self) -> Vec<String> {
        self.visible_columns().map(|c| c.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<R> Clone for ColumnRegistry<R> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.columns.iter()).finish()
    }
}
