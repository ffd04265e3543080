//! Configuration module
//!
//! Tunables read from `config.toml` and the persisted theme preference.

pub mod config;
pub mod preferences;
