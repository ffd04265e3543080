//! Error types raised by the view engine
//!
//! Every variant is a caller-input error. Page-index clamping and the column
//! width floor are normalizations and never surface here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// Two columns in one registration share the same id.
    #[error("duplicate column id '{0}'")]
    DuplicateColumnId(String),

    /// A column id that is not registered was referenced.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// A sort was requested on a column whose `sortable` flag is false.
    #[error("column '{0}' is not sortable")]
    NotSortable(String),

    /// An ingested record does not have the shape the columns expect.
    #[error("schema mismatch in record {record}: {message}")]
    SchemaMismatch { record: usize, message: String },
}

impl ViewError {
    pub fn schema_mismatch(record: usize, message: impl Into<String>) -> Self {
        ViewError::SchemaMismatch {
            record,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ViewError::UnknownColumn("age".to_string()).to_string(),
            "unknown column 'age'"
        );
        assert_eq!(
            ViewError::schema_mismatch(3, "missing field 'city'").to_string(),
            "schema mismatch in record 3: missing field 'city'"
        );
    }
}
