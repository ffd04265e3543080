//! Client-side tabular view engine.
//!
//! A [`TableView`] holds a caller-owned row set, a [`ColumnRegistry`] and a
//! [`ViewState`], and derives the visible page by running filter → sort →
//! paginate on every read.

pub mod config;
pub mod data;
pub mod error;
pub mod source;
pub mod utils;

pub use data::column_registry::{Column, ColumnRegistry, MIN_COLUMN_WIDTH};
pub use data::data_exporter::{DataExporter, ExportGrid};
pub use data::data_view::{ColumnHeader, ComputedView, TableView, ViewState};
pub use data::datavalue::DataValue;
pub use data::pagination::PageInfo;
pub use data::record::Record;
pub use data::sort_stage::{SortDirection, SortSpec};
pub use error::{Result, ViewError};
