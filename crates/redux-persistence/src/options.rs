//! Save middleware configuration

use std::fmt;
use std::sync::Arc;

use crate::actions::Action;
use crate::error::PersistenceError;
use crate::store::StoreHandle;

/// Decides whether an action triggers a save. Return `true` to save.
pub type FilterAction = Arc<dyn Fn(&Action) -> bool + Send + Sync>;

/// Maps the current state to the state that gets persisted.
pub type Transform<S> = Arc<dyn Fn(S) -> S + Send + Sync>;

/// Receives every failed save together with the store it happened on.
pub type ErrorHandler<S> = Arc<dyn Fn(&PersistenceError, &dyn StoreHandle<S>) + Send + Sync>;

/// Build flavour, controls debugging aids.
///
/// In `Development` the middleware logs malformed actions, warns about the
/// default error handler and attaches the originating action to SAVE
/// confirmations as `meta.origin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Derived from the build profile: debug builds are `Development`.
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            Environment::Development
        } else {
            Environment::Production
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::current()
    }
}

/// Options for [`create_middleware`](crate::create_middleware).
pub struct MiddlewareOptions<S> {
    /// Return `true` for any action that should be saved. Unset saves on every action.
    pub filter_action: Option<FilterAction>,

    /// Transform the state before it is handed to the storage engine.
    pub transform: Option<Transform<S>>,

    /// Don't dispatch a SAVE action after saving, `false` by default.
    pub disable_dispatch_save_action: bool,

    /// Handle errors raised while saving. Replaces the default logging handler.
    pub on_error: Option<ErrorHandler<S>>,

    pub environment: Environment,
}

impl<S> MiddlewareOptions<S> {
    pub fn new() -> Self {
        Self {
            filter_action: None,
            transform: None,
            disable_dispatch_save_action: false,
            on_error: None,
            environment: Environment::current(),
        }
    }

    pub fn with_filter_action(
        mut self,
        filter: impl Fn(&Action) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.filter_action = Some(Arc::new(filter));
        self
    }

    pub fn with_transform(mut self, transform: impl Fn(S) -> S + Send + Sync + 'static) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }

    pub fn with_disable_dispatch_save_action(mut self, disable: bool) -> Self {
        self.disable_dispatch_save_action = disable;
        self
    }

    pub fn with_on_error(
        mut self,
        handler: impl Fn(&PersistenceError, &dyn StoreHandle<S>) + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Some(Arc::new(handler));
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }
}

impl<S> Default for MiddlewareOptions<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for MiddlewareOptions<S> {
    fn clone(&self) -> Self {
        Self {
            filter_action: self.filter_action.clone(),
            transform: self.transform.clone(),
            disable_dispatch_save_action: self.disable_dispatch_save_action,
            on_error: self.on_error.clone(),
            environment: self.environment,
        }
    }
}

impl<S> fmt::Debug for MiddlewareOptions<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareOptions")
            .field("filter_action", &self.filter_action.is_some())
            .field("transform", &self.transform.is_some())
            .field("disable_dispatch_save_action", &self.disable_dispatch_save_action)
            .field("on_error", &self.on_error.is_some())
            .field("environment", &self.environment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = MiddlewareOptions::<u32>::default();
        assert!(options.filter_action.is_none());
        assert!(options.transform.is_none());
        assert!(!options.disable_dispatch_save_action);
        assert!(options.on_error.is_none());
        assert_eq!(options.environment, Environment::current());
    }

    #[test]
    fn test_builder_sets_fields() {
        let options = MiddlewareOptions::<u32>::new()
            .with_filter_action(|action| action.kind != "SKIP")
            .with_transform(|n| n * 2)
            .with_disable_dispatch_save_action(true)
            .with_environment(Environment::Production);

        let filter = options.filter_action.as_ref().unwrap();
        assert!(!filter(&Action::new("SKIP")));
        assert!(filter(&Action::new("KEEP")));
        assert_eq!((options.transform.as_ref().unwrap())(21), 42);
        assert!(options.disable_dispatch_save_action);
        assert!(options.environment.is_production());
    }
}
