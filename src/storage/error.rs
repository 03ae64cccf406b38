//! Record store error types

use crate::storage::types::RecordId;
use thiserror::Error;

/// Errors that can occur when appending or importing records
#[derive(Error, Debug)]
pub enum StoreError {
    /// A weight entry is not a number
    #[error("Parse failure: {0}")]
    ParseFailure(String),

    /// A caller-supplied id would break the strictly increasing id order
    #[error("Record id {given} must be greater than the latest id {latest}")]
    IdNotMonotonic { given: RecordId, latest: RecordId },

    /// Draft input could not be decoded
    #[error("Import error: {0}")]
    Import(String),

    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Import(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
