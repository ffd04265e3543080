//! Row ingestion
//!
//! The external fetch collaborator hands over loosely-typed JSON records.
//! They are validated here, once per data load, before the engine sees them.

use crate::data::column_registry::Column;
use crate::data::datavalue::DataValue;
use crate::error::{Result, ViewError};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tracing::debug;

/// A row made of named fields, the generic shape used when the caller has
/// no dedicated struct for its records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, DataValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&DataValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Column<Record> {
    /// A column reading the named field of a [`Record`]. Missing fields read as Null.
    pub fn field(id: impl Into<String>, label: impl Into<String>) -> Self {
        let id = id.into();
        let key = id.clone();
        Column::new(id, label, move |record: &Record| {
            record.get(&key).cloned().unwrap_or(DataValue::Null)
        })
    }
}

/// Convert JSON objects into [`Record`]s, requiring every name in `required`
/// to be present on every record.
///
/// A present field holding `null` satisfies the requirement; only absence is
/// a mismatch.
pub fn ingest_records(values: &[JsonValue], required: &[&str]) -> Result<Vec<Record>> {
    let mut records = Vec::with_capacity(values.len());

    for (idx, value) in values.iter().enumerate() {
        let obj = value
            .as_object()
            .ok_or_else(|| ViewError::schema_mismatch(idx, "record is not a JSON object"))?;

        if let Some(missing) = required.iter().find(|name| !obj.contains_key(**name)) {
            return Err(ViewError::schema_mismatch(
                idx,
                format!("missing field '{}'", missing),
            ));
        }

        let fields = obj
            .iter()
            .map(|(name, v)| (name.clone(), DataValue::from_json(v)))
            .collect();
        records.push(Record { fields });
    }

    debug!(target: "ingest", "Ingested {} records", records.len());
    Ok(records)
}

/// Deserialize JSON records into a caller-defined row type.
pub fn ingest_typed<T: DeserializeOwned>(values: Vec<JsonValue>) -> Result<Vec<T>> {
    values
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            serde_json::from_value(value)
                .map_err(|e| ViewError::schema_mismatch(idx, e.to_string()))
        })
        .collect()
}

/// Field names of the first record, in the order the source listed them.
pub fn field_names(values: &[JsonValue]) -> Vec<String> {
    values
        .first()
        .and_then(|v| v.as_object())
        .map(|obj| obj.keys().cloned().collect())
        .unwrap_or_default()
}
