//! Errors raised by tables and their backing documents.

use std::path::PathBuf;

use thiserror::Error;

use super::record::RecordId;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Everything that can go wrong while loading, mutating or saving a table.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("does not exist: table '{0}'")]
    TableNotFound(String),

    #[error("does not exist: record '{0}'")]
    RecordNotFound(RecordId),

    #[error("malformed document for table '{table}': {reason}")]
    Decode { table: String, reason: String },

    #[error("cannot serialize table '{table}': {source}")]
    Encode {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("i/o failure on {}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid table name '{0}'")]
    InvalidTableName(String),

    #[error("identifier space exhausted for the current millisecond")]
    IdExhausted,
}

/// The coarse categories callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Decode,
    Io,
    InvalidInput,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::TableNotFound(_) | StoreError::RecordNotFound(_) => ErrorKind::NotFound,
            StoreError::Decode { .. } => ErrorKind::Decode,
            StoreError::Encode { .. } | StoreError::Io { .. } | StoreError::IdExhausted => {
                ErrorKind::Io
            }
            StoreError::InvalidTableName(_) => ErrorKind::InvalidInput,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
