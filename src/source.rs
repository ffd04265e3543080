//! Loading row sets
//!
//! The view engine never performs I/O. This module is the collaborator that
//! fetches a complete JSON row set, from disk or one HTTP GET, and turns it
//! into a ready [`TableView`].

use crate::data::column_registry::{Column, ColumnRegistry};
use crate::data::data_view::TableView;
use crate::data::record::{self, Record};
use anyhow::{anyhow, Context, Result};
use serde_json::Value as JsonValue;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Parse a JSON document holding records.
///
/// Accepts a top-level array, or an object whose `data` field is the array.
pub fn parse_records(json: JsonValue) -> Result<Vec<JsonValue>> {
    match json {
        JsonValue::Array(items) => Ok(items),
        JsonValue::Object(mut obj) => match obj.remove("data") {
            Some(JsonValue::Array(items)) => Ok(items),
            _ => Err(anyhow!("JSON object has no 'data' array")),
        },
        _ => Err(anyhow!("JSON data must be an array of objects")),
    }
}

pub fn read_json_records<Rd: Read>(reader: Rd) -> Result<Vec<JsonValue>> {
    let json: JsonValue =
        serde_json::from_reader(reader).with_context(|| "Failed to parse JSON data")?;
    parse_records(json)
}

/// Load records from a JSON file
pub fn load_json_file<P: AsRef<Path>>(path: P) -> Result<Vec<JsonValue>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open JSON file: {:?}", path.as_ref()))?;
    let records = read_json_records(BufReader::new(file))?;
    info!(target: "source", "Loaded {} records from {:?}", records.len(), path.as_ref());
    Ok(records)
}

/// Fetch records with a single unauthenticated GET
pub fn fetch_json(url: &str) -> Result<Vec<JsonValue>> {
    let client = reqwest::blocking::Client::new();
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Request to {} failed", url))?
        .error_for_status()?;

    let json: JsonValue = response
        .json()
        .with_context(|| format!("Response from {} is not JSON", url))?;
    let records = parse_records(json)?;
    info!(target: "source", "Fetched {} records from {}", records.len(), url);
    Ok(records)
}

/// Load from a URL when `location` looks like one, otherwise from a file
pub fn load(location: &str) -> Result<Vec<JsonValue>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        fetch_json(location)
    } else {
        load_json_file(location)
    }
}

/// Display label for a field name: `first_name` → `First Name`
pub fn label_for(field: &str) -> String {
    field
        .split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build a view over JSON records, one column per field of the first record.
///
/// Every record must carry each of those fields.
pub fn records_to_view(values: &[JsonValue]) -> Result<TableView<Record>> {
    let fields = record::field_names(values);
    let required: Vec<&str> = fields.iter().map(String::as_str).collect();
    let records = record::ingest_records(values, &required)?;

    let columns = fields
        .iter()
        .map(|f| Column::<Record>::field(f.clone(), label_for(f)))
        .collect();
    let registry = ColumnRegistry::register(columns)?;

    Ok(TableView::new(Arc::new(records), registry))
}
