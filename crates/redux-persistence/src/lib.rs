//! Persistence for Redux-style stores
//!
//! This crate provides:
//! - A save middleware persisting state after every relevant action
//! - A loader rehydrating saved state on startup via a LOAD action
//! - A reducer wrapper merging the loaded state into the live state
//! - The [`StorageEngine`] contract concrete backends implement
//! - A small [`Store`] hosting reducer and middleware chain
//!
//! # Wiring
//!
//! ```ignore
//! let engine: Arc<dyn StorageEngine<AppState>> = Arc::new(FileEngine::new("state.json"));
//!
//! let mut store = Store::new(AppState::default(), reducer_with_default_merger(app_reducer));
//! let save = create_middleware(engine.clone(), MiddlewareOptions::new());
//! store.add_middleware(save.attach(store.handle()));
//!
//! create_loader(engine).load(store.handle().as_ref()).await?;
//! store.process_pending()?;
//! ```

pub mod actions;
pub mod engine;
pub mod error;
pub mod loader;
pub mod merger;
pub mod middleware;
pub mod options;
pub mod reducer;
pub mod store;
pub mod warnings;

#[cfg(test)]
mod test_support;

pub use actions::{validate, Action, Dispatched, Thunk, LOAD, SAVE};
pub use engine::StorageEngine;
pub use error::{PersistenceError, StorageError};
pub use loader::{create_loader, Loader};
pub use merger::{replace, shallow_merge};
pub use middleware::{create_middleware, MiddlewareFactory, SaveMiddleware};
pub use options::{Environment, MiddlewareOptions};
pub use reducer::{reducer, reducer_with_default_merger};
pub use store::{Dispatcher, Middleware, Store, StoreHandle, StoreRef};
pub use warnings::InvalidAction;
