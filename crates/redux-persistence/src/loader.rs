//! Startup loader
//!
//! Reads the persisted state once after the store is built and dispatches it
//! as a LOAD action, which the wrapped reducer merges into the live state.

use serde::Serialize;
use std::sync::Arc;

use crate::actions::Action;
use crate::engine::StorageEngine;
use crate::error::PersistenceError;
use crate::store::StoreHandle;

/// Create a loader for `engine`.
pub fn create_loader<S>(engine: Arc<dyn StorageEngine<S>>) -> Loader<S>
where
    S: Send + 'static,
{
    Loader { engine }
}

pub struct Loader<S: Send + 'static> {
    engine: Arc<dyn StorageEngine<S>>,
}

impl<S> Loader<S>
where
    S: Serialize + Send + 'static,
{
    /// Load the saved state, dispatch it as LOAD and return it.
    ///
    /// Storage errors are returned to the caller, which decides whether to
    /// continue with defaults. Calling this twice loads and dispatches twice.
    pub async fn load(&self, store: &dyn StoreHandle<S>) -> Result<S, PersistenceError> {
        let state = self.engine.load().await?;
        let payload = serde_json::to_value(&state)?;
        log::debug!("Loaded persisted state, dispatching {}", crate::LOAD);
        store.dispatch(Action::load(payload).into());
        Ok(state)
    }
}
