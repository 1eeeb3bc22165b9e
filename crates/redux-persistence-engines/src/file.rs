//! File storage engine
//!
//! Persists state snapshots as JSON or TOML. Every snapshot is wrapped in an
//! envelope carrying metadata:
//!
//! ```toml
//! [meta]
//! last_modified = "2025-01-01T12:00:00Z"
//! version = 1
//!
//! [state]
//! count = 3
//! ```
//!
//! Snapshots written with a different `version` are rejected on load.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redux_persistence::{StorageEngine, StorageError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::paths;

const SNAPSHOT_VERSION: u32 = 1;

/// On-disk encoding of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

impl Format {
    /// `.toml` files use TOML, everything else JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Json,
        }
    }
}

/// Snapshot metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotMeta {
    last_modified: DateTime<Utc>,
    version: u32,
}

#[derive(Serialize)]
struct SnapshotRef<'a, S> {
    meta: SnapshotMeta,
    state: &'a S,
}

#[derive(Deserialize)]
struct SnapshotHeader {
    meta: SnapshotMeta,
}

#[derive(Deserialize)]
struct Snapshot<S> {
    state: S,
}

/// Storage engine writing snapshots to a single file.
pub struct FileEngine<S> {
    path: PathBuf,
    format: Format,
    _state: PhantomData<fn() -> S>,
}

impl<S> FileEngine<S> {
    /// Engine for `path`, format chosen from the file extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = Format::from_path(&path);
        Self::with_format(path, format)
    }

    pub fn with_format(path: impl Into<PathBuf>, format: Format) -> Self {
        Self {
            path: path.into(),
            format,
            _state: PhantomData,
        }
    }

    /// Engine for `file_name` in the platform config directory of `app_name`.
    pub fn in_config_dir(app_name: &str, file_name: &str) -> Result<Self, StorageError> {
        Ok(Self::new(paths::state_file_path(app_name, file_name)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> Format {
        self.format
    }
}

impl<S> FileEngine<S>
where
    S: Serialize + DeserializeOwned,
{
    fn encode(&self, state: &S) -> Result<String, StorageError> {
        let snapshot = SnapshotRef {
            meta: SnapshotMeta {
                last_modified: Utc::now(),
                version: SNAPSHOT_VERSION,
            },
            state,
        };
        match self.format {
            Format::Json => serde_json::to_string_pretty(&snapshot)
                .map_err(|e| StorageError::Encode(e.to_string())),
            Format::Toml => {
                toml::to_string_pretty(&snapshot).map_err(|e| StorageError::Encode(e.to_string()))
            }
        }
    }

    fn decode(&self, content: &str) -> Result<S, StorageError> {
        let header: SnapshotHeader = self.parse(content)?;
        if header.meta.version != SNAPSHOT_VERSION {
            return Err(StorageError::Incompatible(format!(
                "{:?} has version {}, expected {}",
                self.path, header.meta.version, SNAPSHOT_VERSION
            )));
        }
        let snapshot: Snapshot<S> = self.parse(content)?;
        Ok(snapshot.state)
    }

    fn parse<T: DeserializeOwned>(&self, content: &str) -> Result<T, StorageError> {
        match self.format {
            Format::Json => serde_json::from_str(content)
                .map_err(|e| StorageError::Decode(format!("{:?}: {}", self.path, e))),
            Format::Toml => toml::from_str(content)
                .map_err(|e| StorageError::Decode(format!("{:?}: {}", self.path, e))),
        }
    }
}

#[async_trait]
impl<S> StorageEngine<S> for FileEngine<S>
where
    S: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn load(&self) -> Result<S, StorageError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StorageError::NotFound),
            Err(e) => return Err(StorageError::Io(e)),
        };
        let state = self.decode(&content)?;
        log::info!("Loaded state from {:?}", self.path);
        Ok(state)
    }

    async fn save(&self, state: S) -> Result<(), StorageError> {
        let content = self.encode(&state)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(&self.path, content).await?;
        log::debug!("Saved state to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: i64,
        history: Vec<String>,
    }

    /// Unique temp directory, removed again when dropped.
    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new() -> Self {
            let name = format!("redux-persistence-{}", uuid::Uuid::new_v4());
            let dir = std::env::temp_dir().join(name);
            std::fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn join(&self, path: &str) -> PathBuf {
            self.0.join(path)
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn counter() -> Counter {
        Counter {
            count: 3,
            history: vec!["INCREMENT".into(), "INCREMENT".into()],
        }
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("state.toml")), Format::Toml);
        assert_eq!(Format::from_path(Path::new("state.TOML")), Format::Toml);
        assert_eq!(Format::from_path(Path::new("state.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("state")), Format::Json);
    }

    #[test]
    fn test_in_config_dir() {
        let engine =
            FileEngine::<Counter>::in_config_dir("redux-persistence-test", "state.toml").unwrap();
        assert!(engine.path().ends_with("redux-persistence-test/state.toml"));
        assert_eq!(engine.format(), Format::Toml);
    }

    #[test]
    fn test_scratch_dir_is_removed_on_drop() {
        let scratch = ScratchDir::new();
        let path = scratch.0.clone();
        assert!(path.exists());
        drop(scratch);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = ScratchDir::new();
        let engine = FileEngine::<Counter>::new(dir.join("state.json"));
        assert!(matches!(engine.load().await, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn test_json_save_then_load() {
        let dir = ScratchDir::new();
        let engine = FileEngine::new(dir.join("nested").join("state.json"));

        engine.save(counter()).await.unwrap();
        let loaded: Counter = engine.load().await.unwrap();

        assert_eq!(loaded, counter());
        let content = std::fs::read_to_string(engine.path()).unwrap();
        assert!(content.contains("\"version\": 1"));
    }

    #[tokio::test]
    async fn test_toml_envelope() {
        let dir = ScratchDir::new();
        let engine = FileEngine::new(dir.join("state.toml"));

        engine.save(counter()).await.unwrap();

        let content = std::fs::read_to_string(engine.path()).unwrap();
        assert!(content.contains("[meta]"));
        assert!(content.contains("[state]"));
        let loaded: Counter = engine.load().await.unwrap();
        assert_eq!(loaded, counter());
    }

    #[tokio::test]
    async fn test_rejects_other_versions() {
        let dir = ScratchDir::new();
        let path = dir.join("state.json");
        std::fs::write(
            &path,
            r#"{
                "meta": { "last_modified": "2024-01-01T00:00:00Z", "version": 99 },
                "state": { "count": 1, "history": [] }
            }"#,
        )
        .unwrap();

        let result = FileEngine::<Counter>::new(&path).load().await;

        assert!(matches!(result, Err(StorageError::Incompatible(_))));
    }

    #[tokio::test]
    async fn test_corrupt_file_fails_to_decode() {
        let dir = ScratchDir::new();
        let path = dir.join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let result = FileEngine::<Counter>::new(&path).load().await;

        assert!(matches!(result, Err(StorageError::Decode(_))));
    }
}
