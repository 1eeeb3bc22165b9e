//! Minimal Redux-style store
//!
//! The persistence pieces only need a [`StoreHandle`]: a way to read the
//! current state and to dispatch follow-up actions. [`Store`] is a small host
//! implementation that wires a reducer and a middleware chain together so the
//! save middleware, the loader and the reducer wrapper can be composed.
//!
//! ## Design
//!
//! ```text
//! dispatch → Middleware 1 → Middleware 2 → … → Reducer → State
//! ```
//!
//! Each middleware receives the action and a `next` continuation and decides
//! what to do before and after the rest of the chain runs. Actions dispatched
//! through a handle (e.g. from a spawned task) are queued and processed after
//! the current dispatch, preventing recursion.

use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;

use crate::actions::{validate, Action, Dispatched};
use crate::error::PersistenceError;

/// Result of pushing an action through the pipeline.
pub type DispatchResult = Result<(), PersistenceError>;

/// Continuation running the rest of the middleware chain.
pub type Next<'a> = &'a mut dyn FnMut(Dispatched) -> DispatchResult;

/// Reducer accepted by [`Store`].
pub type Reducer<S> = Box<dyn Fn(S, &Action) -> Result<S, PersistenceError> + Send + Sync>;

/// Store capabilities handed to middleware and loaders.
pub trait StoreHandle<S>: Send + Sync {
    /// Snapshot of the current state.
    fn state(&self) -> S;

    /// Queue an action for dispatch through the full pipeline.
    fn dispatch(&self, action: Dispatched);
}

/// Middleware trait - wraps the rest of the chain
///
/// Call `next` to pass the action on (possibly after inspecting it) and
/// return its result. Not calling `next` swallows the action.
pub trait Middleware<S>: Send + Sync {
    fn handle(&self, action: Dispatched, next: Next<'_>) -> DispatchResult;
}

/// Dispatcher for sending actions back into the store
///
/// Actions dispatched here are processed on the next call to
/// [`Store::process_pending`] or [`Store::next_dispatched`].
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Dispatched>,
}

impl Dispatcher {
    pub fn new(tx: mpsc::UnboundedSender<Dispatched>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: Dispatched) {
        if let Err(e) = self.tx.send(action) {
            log::error!("Failed to dispatch action: {:?}", e.0);
        }
    }
}

/// Shared view on a [`Store`], usable from other tasks.
pub struct StoreRef<S> {
    state: Arc<RwLock<S>>,
    dispatcher: Dispatcher,
}

impl<S> Clone for StoreRef<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<S: Clone + Send + Sync> StoreHandle<S> for StoreRef<S> {
    fn state(&self) -> S {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn dispatch(&self, action: Dispatched) {
        self.dispatcher.dispatch(action);
    }
}

/// Store - holds state, reducer and middleware chain
pub struct Store<S> {
    state: Arc<RwLock<S>>,
    reducer: Reducer<S>,
    middleware: Vec<Box<dyn Middleware<S>>>,
    dispatcher: Dispatcher,
    pending: mpsc::UnboundedReceiver<Dispatched>,
}

impl<S: Clone + Send + Sync + 'static> Store<S> {
    pub fn new(
        initial_state: S,
        reducer: impl Fn(S, &Action) -> Result<S, PersistenceError> + Send + Sync + 'static,
    ) -> Self {
        let (tx, pending) = mpsc::unbounded_channel();
        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer: Box::new(reducer),
            middleware: Vec::new(),
            dispatcher: Dispatcher::new(tx),
            pending,
        }
    }

    /// Add middleware to the store
    ///
    /// Middleware runs in the order it was added, the first one outermost.
    pub fn add_middleware(&mut self, middleware: impl Middleware<S> + 'static) {
        self.middleware.push(Box::new(middleware));
    }

    /// Handle sharing this store's state and dispatcher.
    pub fn handle(&self) -> Arc<dyn StoreHandle<S>> {
        Arc::new(self.store_ref())
    }

    pub fn store_ref(&self) -> StoreRef<S> {
        StoreRef {
            state: Arc::clone(&self.state),
            dispatcher: self.dispatcher.clone(),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> S {
        self.store_ref().state()
    }

    /// Run an action through the pipeline, then everything it queued.
    pub fn dispatch(&mut self, action: impl Into<Dispatched>) -> DispatchResult {
        self.run_chain(0, action.into())?;
        self.process_pending()
    }

    /// Process every action queued so far.
    pub fn process_pending(&mut self) -> DispatchResult {
        while let Ok(action) = self.pending.try_recv() {
            self.run_chain(0, action)?;
        }
        Ok(())
    }

    /// Wait for the next queued action and run it through the pipeline.
    ///
    /// Returns `None` once no dispatcher is left to send actions.
    pub async fn next_dispatched(&mut self) -> Option<DispatchResult> {
        let action = self.pending.recv().await?;
        Some(self.run_chain(0, action))
    }

    fn run_chain(&self, index: usize, action: Dispatched) -> DispatchResult {
        match self.middleware.get(index) {
            Some(middleware) => {
                middleware.handle(action, &mut |action| self.run_chain(index + 1, action))
            }
            None => self.reduce(action),
        }
    }

    fn reduce(&self, dispatched: Dispatched) -> DispatchResult {
        let action = match dispatched {
            Dispatched::Thunk(thunk) => {
                thunk();
                return Ok(());
            }
            other => match validate(&other) {
                Ok(action) => action,
                Err(invalid) => {
                    log::debug!("Store: dropping {:?}: {}", other, invalid);
                    return Ok(());
                }
            },
        };

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = (self.reducer)(state.clone(), &action)?;
        Ok(())
    }
}
