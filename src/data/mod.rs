//! Data layer for the table view engine
//!
//! Rows stay owned by the caller. Each stage works on row positions and
//! hands the next stage a new index list: filter → sort → paginate.

pub mod column_registry;
pub mod datavalue;
pub mod datavalue_compare;
pub mod record;

// Pipeline stages
pub mod filter_stage;
pub mod pagination;
pub mod sort_stage;

pub mod data_exporter;
pub mod data_view;
