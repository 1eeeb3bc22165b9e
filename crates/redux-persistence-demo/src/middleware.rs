//! Demo middleware

use redux_persistence::store::{DispatchResult, Next};
use redux_persistence::{validate, Dispatched, Middleware, SAVE};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::counter::{CounterState, SAVE_FAILED};

/// LoggingMiddleware - logs all actions passing through
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware<CounterState> for LoggingMiddleware {
    fn handle(&self, action: Dispatched, next: Next<'_>) -> DispatchResult {
        log::debug!("Action: {:?}", action);
        next(action)
    }
}

/// Counts finished saves, successful or not.
#[derive(Clone, Default)]
pub struct SaveTracker {
    finished: Arc<AtomicUsize>,
}

impl SaveTracker {
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

impl Middleware<CounterState> for SaveTracker {
    fn handle(&self, action: Dispatched, next: Next<'_>) -> DispatchResult {
        if let Ok(action) = validate(&action) {
            if action.kind == SAVE || action.kind == SAVE_FAILED {
                self.finished.fetch_add(1, Ordering::SeqCst);
            }
        }
        next(action)
    }
}
