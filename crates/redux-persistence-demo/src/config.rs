//! Demo configuration
//!
//! Loaded from `.redux-persistence-demo.toml`, first in the current
//! directory, then in the home directory. Missing keys use defaults.

use redux_persistence_engines::paths;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const APP_NAME: &str = "redux-persistence-demo";
const CONFIG_FILE: &str = ".redux-persistence-demo.toml";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DemoConfig {
    /// Where the counter is persisted; `.toml` selects TOML, anything else JSON
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Number of history entries kept in the saved state
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// How long to wait for a save confirmation before giving up
    #[serde(default = "default_save_timeout_ms")]
    pub save_timeout_ms: u64,
}

fn default_state_file() -> PathBuf {
    paths::state_file_path(APP_NAME, "state.json")
        .unwrap_or_else(|_| PathBuf::from(".redux-persistence-demo.state.json"))
}

fn default_history_limit() -> usize {
    10
}

fn default_save_timeout_ms() -> u64 {
    5_000
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            history_limit: default_history_limit(),
            save_timeout_ms: default_save_timeout_ms(),
        }
    }
}

impl DemoConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded demo config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default demo config");
        Self::default()
    }
}

fn load_config_file() -> Option<String> {
    if let Ok(content) = std::fs::read_to_string(CONFIG_FILE) {
        log::debug!("Loaded config from {}", CONFIG_FILE);
        return Some(content);
    }

    let home_config = env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_FILE))?;
    let content = std::fs::read_to_string(&home_config).ok()?;
    log::debug!("Loaded config from {}", home_config.display());
    Some(content)
}
