//! Error types for the persistence layer

use thiserror::Error;

/// Errors reported by a [`StorageEngine`](crate::StorageEngine) implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Nothing has been persisted yet.
    #[error("No persisted state found")]
    NotFound,

    /// Reading or writing the backing store failed.
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The state could not be encoded for the backend.
    #[error("Failed to encode state: {0}")]
    Encode(String),

    /// The persisted data could not be decoded.
    #[error("Failed to decode state: {0}")]
    Decode(String),

    /// The persisted data was written by an incompatible version.
    #[error("Incompatible persisted state: {0}")]
    Incompatible(String),

    /// Any other backend specific failure.
    #[error("{0}")]
    Backend(String),
}

/// Errors surfaced by the middleware, loader and reducer wrapper.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Storage engine failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to merge loaded state: {0}")]
    Merge(String),

    /// A save was requested where no tokio runtime can run it.
    #[error("No tokio runtime available to run the save")]
    NoRuntime,
}
