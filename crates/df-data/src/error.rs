//! Error types for table handling and ingestion.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Column not found: {name}")]
    MissingColumn { name: String },

    #[error("Duplicate column: {name}")]
    DuplicateColumn { name: String },

    #[error("Column {name} has {len} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        len: usize,
        expected: usize,
    },

    #[error("The time column {name} cannot be removed")]
    ProtectedColumn { name: String },

    #[error("Malformed source {what}")]
    Malformed { what: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DataResult<T> = Result<T, DataError>;
