//! In-memory storage engine

use async_trait::async_trait;
use redux_persistence::{StorageEngine, StorageError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Keeps the most recently saved state in memory.
///
/// Useful for tests and for hosts that only want the SAVE/LOAD plumbing.
pub struct MemoryEngine<S> {
    state: Mutex<Option<S>>,
    saves: AtomicUsize,
}

impl<S> MemoryEngine<S> {
    /// An empty engine; `load` fails with `NotFound` until something is saved.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
            saves: AtomicUsize::new(0),
        }
    }

    /// An engine that already holds `state`.
    pub fn with_state(state: S) -> Self {
        Self {
            state: Mutex::new(Some(state)),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl<S: Clone> MemoryEngine<S> {
    /// The currently held state, if any.
    pub fn snapshot(&self) -> Option<S> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<S> Default for MemoryEngine<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<S> StorageEngine<S> for MemoryEngine<S>
where
    S: Clone + Send + 'static,
{
    async fn load(&self) -> Result<S, StorageError> {
        self.snapshot().ok_or(StorageError::NotFound)
    }

    async fn save(&self, state: S) -> Result<(), StorageError> {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = Some(state);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
