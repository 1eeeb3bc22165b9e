//! Shared fixtures for unit tests

use async_trait::async_trait;
use log::{Level, Log, Metadata, Record};
use std::cell::RefCell;
use std::sync::{Arc, Mutex, Once};
use tokio::sync::Notify;

use crate::actions::{validate, Action, Dispatched};
use crate::engine::StorageEngine;
use crate::error::StorageError;
use crate::store::StoreHandle;

thread_local! {
    static CAPTURED: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Logger keeping records per thread, so parallel tests don't see each other.
///
/// `#[tokio::test]` runs on a current-thread runtime, so spawned tasks log
/// into the same buffer as the test body.
struct CapturingLogger;

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED.with(|logs| {
            logs.borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger;
static INIT: Once = Once::new();

/// Install the capturing logger and clear this thread's buffer.
pub fn capture_logs() {
    INIT.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);
    });
    CAPTURED.with(|logs| logs.borrow_mut().clear());
}

/// Records at `level` captured on this thread.
pub fn logged(level: Level) -> Vec<String> {
    CAPTURED.with(|logs| {
        logs.borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    })
}

/// Storage engine counting calls and remembering what it was asked to save.
#[derive(Clone, Default)]
pub struct MockEngine {
    saved: Arc<Mutex<Vec<serde_json::Value>>>,
    fail_with: Option<String>,
    stored: Option<serde_json::Value>,
    pub save_called: Arc<Notify>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn with_stored(state: serde_json::Value) -> Self {
        Self {
            stored: Some(state),
            ..Self::default()
        }
    }

    pub fn saved(&self) -> Vec<serde_json::Value> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageEngine<serde_json::Value> for MockEngine {
    async fn load(&self) -> Result<serde_json::Value, StorageError> {
        if let Some(message) = &self.fail_with {
            return Err(StorageError::Backend(message.clone()));
        }
        self.stored.clone().ok_or(StorageError::NotFound)
    }

    async fn save(&self, state: serde_json::Value) -> Result<(), StorageError> {
        self.saved.lock().unwrap().push(state);
        self.save_called.notify_one();
        match &self.fail_with {
            Some(message) => Err(StorageError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

/// Store handle with a fixed state that records dispatched actions.
pub struct MockStore<S = serde_json::Value> {
    state: S,
    dispatched: Mutex<Vec<Action>>,
}

impl<S> MockStore<S> {
    pub fn new(state: S) -> Arc<Self> {
        Arc::new(Self {
            state,
            dispatched: Mutex::new(Vec::new()),
        })
    }

    pub fn dispatched(&self) -> Vec<Action> {
        self.dispatched.lock().unwrap().clone()
    }
}

impl<S: Clone + Send + Sync> StoreHandle<S> for MockStore<S> {
    fn state(&self) -> S {
        self.state.clone()
    }

    fn dispatch(&self, action: Dispatched) {
        let action = validate(&action).expect("only actions are dispatched");
        self.dispatched.lock().unwrap().push(action);
    }
}

/// Let spawned tasks run to completion on the current-thread runtime.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}
