//! Storage engine contract
//!
//! A storage engine is the only boundary between this crate and a concrete
//! backend (a file, a database, a remote service). It owns its own
//! concurrency discipline: the save middleware may issue overlapping saves
//! and does not serialize them.

use async_trait::async_trait;

use crate::error::StorageError;

/// Loads and saves complete state snapshots.
///
/// # Example
///
/// ```ignore
/// struct NullEngine;
///
/// #[async_trait]
/// impl StorageEngine<Settings> for NullEngine {
///     async fn load(&self) -> Result<Settings, StorageError> {
///         Err(StorageError::NotFound)
///     }
///
///     async fn save(&self, _state: Settings) -> Result<(), StorageError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait StorageEngine<S: Send + 'static>: Send + Sync {
    /// Read the previously saved state.
    async fn load(&self) -> Result<S, StorageError>;

    /// Persist `state`, replacing whatever was saved before.
    async fn save(&self, state: S) -> Result<(), StorageError>;
}
