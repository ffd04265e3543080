use crate::data::column_registry::{Column, ColumnRegistry};
use anyhow::{anyhow, Context, Result};
use chrono::Local;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Header labels plus stringified cells, the shape handed to file serializers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportGrid {
    /// Project rows `order` over the visible columns, in visible-column order
    pub fn from_view<R>(rows: &[R], registry: &ColumnRegistry<R>, order: &[usize]) -> Self {
        let columns: Vec<&Column<R>> = registry.visible_columns().collect();
        let headers = columns.iter().map(|c| c.label.clone()).collect();
        let cells = order
            .iter()
            .map(|&idx| {
                columns
                    .iter()
                    .map(|c| c.value(&rows[idx]).to_string())
                    .collect()
            })
            .collect();

        Self {
            headers,
            rows: cells,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Each row as ordered `(label, value)` pairs
    pub fn records(&self) -> Vec<Vec<(&str, &str)>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter().map(String::as_str))
                    .collect()
            })
            .collect()
    }

    /// Write as CSV: every field double-quoted, rows ended by `\n`
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(writer);

        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    /// JSON array of `{label: value}` objects. A repeated label keeps the
    /// value of its last column.
    pub fn to_json_value(&self) -> Value {
        let objects = self
            .records()
            .into_iter()
            .map(|record| {
                let obj: serde_json::Map<String, Value> = record
                    .into_iter()
                    .map(|(label, value)| (label.to_string(), Value::String(value.to_string())))
                    .collect();
                Value::Object(obj)
            })
            .collect();
        Value::Array(objects)
    }
}

/// Writes export grids to files
pub struct DataExporter;

impl DataExporter {
    /// `<prefix>_<YYYYmmdd_HHMMSS>.<extension>`
    pub fn timestamped_filename(prefix: &str, extension: &str) -> String {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        format!("{}_{}.{}", prefix, timestamp, extension)
    }

    /// Export the grid to a CSV file, returning a status message
    pub fn export_to_csv(grid: &ExportGrid, path: &Path) -> Result<String> {
        if grid.headers.is_empty() {
            return Err(anyhow!("No visible columns to export"));
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        grid.write_csv(file)?;

        info!(target: "export", "Exported {} rows to {}", grid.row_count(), path.display());
        Ok(format!(
            "✓ Exported {} rows to CSV file: {}",
            grid.row_count(),
            path.display()
        ))
    }

    /// Export the grid to a pretty-printed JSON file, returning a status message
    pub fn export_to_json(grid: &ExportGrid, path: &Path) -> Result<String> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create JSON file: {}", path.display()))?;
        serde_json::to_writer_pretty(file, &grid.to_json_value())?;

        info!(target: "export", "Exported {} rows to {}", grid.row_count(), path.display());
        Ok(format!(
            "✓ Exported {} rows to JSON file: {}",
            grid.row_count(),
            path.display()
        ))
    }
}
