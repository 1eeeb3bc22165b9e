//! Counter state, actions and reducer

use anyhow::{bail, Result};
use redux_persistence::Action;
use serde::{Deserialize, Serialize};

pub const INCREMENT: &str = "INCREMENT";
pub const DECREMENT: &str = "DECREMENT";
pub const RESET: &str = "RESET";
/// Changes nothing and is never saved.
pub const NOOP: &str = "NOOP";
/// Dispatched by the save error handler.
pub const SAVE_FAILED: &str = "SAVE_FAILED";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterState {
    pub count: i64,
    #[serde(default)]
    pub history: Vec<String>,
}

impl CounterState {
    /// Keep only the newest `limit` history entries.
    pub fn trimmed(mut self, limit: usize) -> Self {
        let excess = self.history.len().saturating_sub(limit);
        self.history.drain(..excess);
        self
    }
}

/// Reducer - pure function that produces new state from current state + action
pub fn reduce(mut state: CounterState, action: &Action) -> CounterState {
    match action.kind.as_str() {
        INCREMENT => state.count += 1,
        DECREMENT => state.count -= 1,
        RESET => state.count = 0,
        _ => return state,
    }
    state.history.push(action.kind.clone());
    state
}

/// Map a command line word to an action.
pub fn parse_command(word: &str) -> Result<Action> {
    let kind = match word.to_ascii_lowercase().as_str() {
        "inc" | "increment" | "+" => INCREMENT,
        "dec" | "decrement" | "-" => DECREMENT,
        "reset" => RESET,
        "noop" => NOOP,
        other => bail!("Unknown command '{}', expected inc, dec, reset or noop", other),
    };
    Ok(Action::new(kind))
}

/// Whether the save middleware persists after `action`.
pub fn should_save(action: &Action) -> bool {
    !matches!(action.kind.as_str(), NOOP | SAVE_FAILED)
}
