//! Save middleware
//!
//! Observes every action after the rest of the pipeline has handled it and
//! persists the resulting state through a [`StorageEngine`].
//!
//! # Flow
//!
//! 1. Forward the action to `next` and keep its result
//! 2. Validate the action, warn about malformed ones (outside production)
//! 3. Skip LOAD/SAVE and anything `filter_action` rejects
//! 4. Snapshot the state, apply `transform`, spawn `engine.save(state)`
//! 5. On success dispatch SAVE (unless disabled), on failure call `on_error`
//!
//! The save runs on a spawned tokio task; dispatch never waits for storage.

use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::actions::{validate, Action, Dispatched};
use crate::engine::StorageEngine;
use crate::error::PersistenceError;
use crate::options::{Environment, ErrorHandler, MiddlewareOptions};
use crate::store::{DispatchResult, Middleware, Next, StoreHandle};
use crate::warnings::DEFAULT_ERROR_HANDLER;

/// Create the save middleware for `engine`.
///
/// The returned factory is attached to a store once the store exists.
pub fn create_middleware<S>(
    engine: Arc<dyn StorageEngine<S>>,
    options: MiddlewareOptions<S>,
) -> MiddlewareFactory<S>
where
    S: Send + 'static,
{
    MiddlewareFactory { engine, options }
}

/// Save middleware that is not bound to a store yet.
pub struct MiddlewareFactory<S: Send + 'static> {
    engine: Arc<dyn StorageEngine<S>>,
    options: MiddlewareOptions<S>,
}

impl<S: Send + 'static> MiddlewareFactory<S> {
    pub fn attach(&self, store: Arc<dyn StoreHandle<S>>) -> SaveMiddleware<S> {
        SaveMiddleware {
            engine: Arc::clone(&self.engine),
            options: self.options.clone(),
            store,
        }
    }
}

/// Save middleware bound to a store.
pub struct SaveMiddleware<S: Send + 'static> {
    engine: Arc<dyn StorageEngine<S>>,
    options: MiddlewareOptions<S>,
    store: Arc<dyn StoreHandle<S>>,
}

impl<S> SaveMiddleware<S>
where
    S: Serialize + Send + 'static,
{
    /// Forward `action` to `next`, then schedule a save if the action calls for one.
    ///
    /// Returns whatever `next` returned.
    pub fn intercept<R>(&self, action: Dispatched, next: impl FnOnce(Dispatched) -> R) -> R {
        let checked = validate(&action);
        let result = next(action);

        match checked {
            Ok(action) if self.should_save(&action) => self.save(action),
            Ok(_) => {}
            Err(invalid) => {
                if !self.options.environment.is_production() {
                    log::warn!("{}", invalid);
                }
            }
        }

        result
    }

    fn should_save(&self, action: &Action) -> bool {
        if action.is_persistence_action() {
            return false;
        }
        self.options
            .filter_action
            .as_ref()
            .map_or(true, |filter| filter(action))
    }

    fn save(&self, origin: Action) {
        let state = match &self.options.transform {
            Some(transform) => transform(self.store.state()),
            None => self.store.state(),
        };

        let errors = ErrorRoute {
            on_error: self.options.on_error.clone(),
            environment: self.options.environment,
        };

        let mut save_action = match serde_json::to_value(&state) {
            Ok(payload) => Action::save(payload),
            Err(e) => {
                errors.report(&PersistenceError::from(e), self.store.as_ref());
                return;
            }
        };
        if !self.options.environment.is_production() {
            save_action.meta = Some(json!({ "origin": origin.to_value() }));
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::debug!("No runtime to save state after {}", origin.kind);
            errors.report(&PersistenceError::NoRuntime, self.store.as_ref());
            return;
        };

        log::debug!("Saving state after {}", origin.kind);
        let engine = Arc::clone(&self.engine);
        let store = Arc::clone(&self.store);
        let dispatch_save = !self.options.disable_dispatch_save_action;
        runtime.spawn(async move {
            match engine.save(state).await {
                Ok(()) => {
                    if dispatch_save {
                        store.dispatch(save_action.into());
                    }
                }
                Err(e) => errors.report(&PersistenceError::from(e), store.as_ref()),
            }
        });
    }
}

impl<S> Middleware<S> for SaveMiddleware<S>
where
    S: Serialize + Send + 'static,
{
    fn handle(&self, action: Dispatched, next: Next<'_>) -> DispatchResult {
        self.intercept(action, next)
    }
}

/// Where save failures go.
struct ErrorRoute<S> {
    on_error: Option<ErrorHandler<S>>,
    environment: Environment,
}

impl<S> ErrorRoute<S> {
    fn report(&self, error: &PersistenceError, store: &dyn StoreHandle<S>) {
        match &self.on_error {
            Some(handler) => handler(error, store),
            None => {
                if !self.environment.is_production() {
                    log::warn!("{}", DEFAULT_ERROR_HANDLER);
                }
                log::error!("{}", error);
            }
        }
    }
}
