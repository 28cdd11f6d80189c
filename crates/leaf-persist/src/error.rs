//! Persistence error types.

use thiserror::Error;

/// Persistence error type.
#[derive(Debug, Error)]
pub enum PersistError {
    /// LMDB error.
    #[error("database error: {0}")]
    Database(#[from] heed::Error),

    /// Stored record could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;
