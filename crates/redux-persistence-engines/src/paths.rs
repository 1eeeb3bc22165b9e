//! Platform directories for state files
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/<app>/`
//! - macOS: `~/Library/Application Support/<app>/`
//! - Windows: `%APPDATA%\<app>\`

use redux_persistence::StorageError;
use std::path::PathBuf;

/// Get the application config directory
pub fn config_dir(app_name: &str) -> Result<PathBuf, StorageError> {
    let base = dirs::config_dir()
        .ok_or_else(|| StorageError::Backend("Could not determine config directory".into()))?;
    Ok(base.join(app_name))
}

/// Get path to a state file inside the config directory
pub fn state_file_path(app_name: &str, file_name: &str) -> Result<PathBuf, StorageError> {
    Ok(config_dir(app_name)?.join(file_name))
}
