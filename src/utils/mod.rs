//! Utility helpers shared by the library and the CLI

pub mod app_paths;
pub mod logging;
