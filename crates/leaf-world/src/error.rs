//! World error types.

use thiserror::Error;

use crate::TilePos;

/// Error returned when a chunk cannot be loaded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// No world with this name is known to the store.
    #[error("unknown world: {0}")]
    UnknownWorld(String),

    /// The chunk exists but could not be loaded.
    #[error("chunk {0} could not be loaded")]
    LoadFailed(TilePos),

    /// The chunk was never generated and the store cannot generate it.
    #[error("chunk {0} has not been generated")]
    NotGenerated(TilePos),
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
