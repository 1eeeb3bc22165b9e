use anyhow::{Context, Result};
use redux_persistence::{
    create_loader, create_middleware, reducer_with_default_merger, Action, MiddlewareOptions,
    PersistenceError, StorageEngine, StorageError, Store,
};
use redux_persistence_engines::FileEngine;
use std::sync::Arc;
use std::time::Duration;

mod config;
mod counter;
mod middleware;

use config::DemoConfig;
use counter::{CounterState, SAVE_FAILED};
use middleware::{LoggingMiddleware, SaveTracker};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {}", config::APP_NAME);

    let config = DemoConfig::load();
    let commands = std::env::args()
        .skip(1)
        .map(|word| counter::parse_command(&word))
        .collect::<Result<Vec<Action>>>()?;

    let engine: Arc<dyn StorageEngine<CounterState>> =
        Arc::new(FileEngine::new(config.state_file.clone()));
    log::info!("Persisting to {}", config.state_file.display());

    // Initialize store with middleware
    let mut store = Store::new(
        CounterState::default(),
        reducer_with_default_merger(counter::reduce),
    );
    let tracker = SaveTracker::default();

    let history_limit = config.history_limit;
    let options = MiddlewareOptions::new()
        .with_filter_action(counter::should_save)
        .with_transform(move |state: CounterState| state.trimmed(history_limit))
        .with_on_error(|error, store| {
            let failure = Action::with_payload(SAVE_FAILED, serde_json::json!(error.to_string()));
            store.dispatch(failure.into());
        });

    // Add middleware in order (they execute in this order)
    store.add_middleware(LoggingMiddleware::new());
    store.add_middleware(tracker.clone());
    store.add_middleware(create_middleware(engine.clone(), options).attach(store.handle()));

    match create_loader(engine).load(store.handle().as_ref()).await {
        Ok(state) => log::info!("Restored count {}", state.count),
        Err(PersistenceError::Storage(StorageError::NotFound)) => {
            log::info!("No saved state found, starting from zero")
        }
        Err(e) => return Err(e).context("Failed to load saved state"),
    }
    store.process_pending()?;

    let expected_saves = commands.iter().filter(|action| counter::should_save(action)).count();
    for action in commands {
        store.dispatch(action)?;
    }

    wait_for_saves(&mut store, &tracker, expected_saves, config.save_timeout_ms).await?;

    let state = store.state();
    println!("count = {}", state.count);
    if !state.history.is_empty() {
        println!("history = {}", state.history.join(", "));
    }

    log::info!("Exiting {}", config::APP_NAME);
    Ok(())
}

/// Process queued actions until every save has reported back.
async fn wait_for_saves(
    store: &mut Store<CounterState>,
    tracker: &SaveTracker,
    expected: usize,
    timeout_ms: u64,
) -> Result<()> {
    let limit = Duration::from_millis(timeout_ms);
    while tracker.finished() < expected {
        match tokio::time::timeout(limit, store.next_dispatched()).await {
            Ok(Some(result)) => result?,
            Ok(None) => break,
            Err(_) => {
                log::warn!(
                    "Gave up waiting for saves after {}ms ({} of {} finished)",
                    timeout_ms,
                    tracker.finished(),
                    expected
                );
                break;
            }
        }
    }
    Ok(())
}
