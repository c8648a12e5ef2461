//! # Configuration Store
//!
//! Loads and persists the data-source configuration set.
//!
//! Storage goes through a [`SettingsBackend`] so the store can be pointed at a
//! file in production and at memory in tests. Loading never fails: a missing,
//! unreadable, malformed or empty document falls back to a single default entry.
//! Saving validates the full set before anything is written.

use super::errors::ValidationErrors;
use super::schema::{validate_configuration_set, ConfigurationSet};
use crate::observability::metrics;
use async_trait::async_trait;
use serde_json::Value;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Raw document storage for the settings file
#[async_trait]
pub trait SettingsBackend: Send + Sync + std::fmt::Debug {
    /// Human readable location, used in logs and error messages
    fn describe(&self) -> String;

    /// Current document, or `None` when nothing has been stored yet
    async fn read(&self) -> io::Result<Option<String>>;

    /// Replace the document
    async fn write(&self, contents: &str) -> io::Result<()>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("failed to write {target}: {source}")]
    Io {
        target: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Settings file on the local filesystem
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsBackend for FileBackend {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn read(&self) -> io::Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn write(&self, contents: &str) -> io::Result<()> {
        let path = self.path.clone();
        let contents = contents.to_owned();
        tokio::task::spawn_blocking(move || write_atomically(&path, &contents))
            .await
            .map_err(io::Error::other)?
    }
}

/// Write to a temp file next to `path`, fsync, then rename over `path`
fn write_atomically(path: &Path, contents: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
    temp.write_all(contents.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// In-memory document, for tests and ephemeral runs
#[derive(Debug, Default)]
pub struct MemoryBackend {
    contents: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
        }
    }

    pub async fn contents(&self) -> Option<String> {
        self.contents.lock().await.clone()
    }
}

#[async_trait]
impl SettingsBackend for MemoryBackend {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn read(&self) -> io::Result<Option<String>> {
        Ok(self.contents.lock().await.clone())
    }

    async fn write(&self, contents: &str) -> io::Result<()> {
        *self.contents.lock().await = Some(contents.to_owned());
        Ok(())
    }
}

/// Loads and saves the configuration set through a backend
#[derive(Debug, Clone)]
pub struct ConfigurationStore {
    backend: Arc<dyn SettingsBackend>,
}

impl ConfigurationStore {
    pub fn new(backend: Arc<dyn SettingsBackend>) -> Self {
        Self { backend }
    }

    /// Store backed by the settings file at `path`
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileBackend::new(path)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    pub fn backend(&self) -> &Arc<dyn SettingsBackend> {
        &self.backend
    }

    /// Load the persisted set, falling back to one default entry
    pub async fn load(&self) -> ConfigurationSet {
        let target = self.backend.describe();
        let contents = match self.backend.read().await {
            Ok(Some(contents)) => contents,
            Ok(None) => {
                info!(settings = %target, "Settings file not found, using default configuration");
                return fallback("missing");
            }
            Err(e) => {
                error!(settings = %target, error = %e, "Failed to read settings, using default configuration");
                return fallback("read_error");
            }
        };

        if contents.trim().is_empty() {
            warn!(settings = %target, "Settings file is empty, using default configuration");
            return fallback("empty");
        }

        let document: Value = match serde_json::from_str(&contents) {
            Ok(document) => document,
            Err(e) => {
                error!(settings = %target, error = %e, "Settings file is not valid JSON, using default configuration");
                return fallback("invalid");
            }
        };

        match validate_configuration_set(&document) {
            Ok(set) if set.is_empty() => {
                info!(settings = %target, "Settings file has no configurations, using default configuration");
                fallback("empty")
            }
            Ok(set) => {
                debug!(settings = %target, configurations = set.len(), "Loaded settings");
                metrics::increment_settings_loads("loaded");
                metrics::set_configurations(set.len());
                set
            }
            Err(errors) => {
                error!(settings = %target, errors = %errors, "Settings file failed validation, using default configuration");
                fallback("invalid")
            }
        }
    }

    /// Validate and persist the full set
    ///
    /// # Errors
    /// [`StoreError::Validation`] leaves storage untouched; [`StoreError::Io`]
    /// carries the underlying write failure
    pub async fn save(&self, set: &ConfigurationSet) -> Result<(), StoreError> {
        if let Err(errors) = set.validate() {
            metrics::increment_settings_saves("invalid");
            return Err(StoreError::Validation(errors));
        }

        let contents = serde_json::to_string_pretty(set).inspect_err(|_| {
            metrics::increment_settings_saves("error");
        })?;
        let target = self.backend.describe();

        if let Err(source) = self.backend.write(&contents).await {
            error!(settings = %target, error = %source, "Failed to save settings");
            metrics::increment_settings_saves("error");
            return Err(StoreError::Io { target, source });
        }

        info!(settings = %target, configurations = set.len(), "Saved settings");
        metrics::increment_settings_saves("saved");
        metrics::set_configurations(set.len());
        Ok(())
    }

    /// Validate a raw JSON document and persist it
    ///
    /// # Errors
    /// Same as [`ConfigurationStore::save`]; schema errors are reported as
    /// [`StoreError::Validation`]
    pub async fn save_document(&self, document: &Value) -> Result<ConfigurationSet, StoreError> {
        let set = validate_configuration_set(document).map_err(|errors| {
            metrics::increment_settings_saves("invalid");
            StoreError::Validation(errors)
        })?;
        self.save(&set).await?;
        Ok(set)
    }
}

fn fallback(outcome: &str) -> ConfigurationSet {
    metrics::increment_settings_loads(outcome);
    let set = ConfigurationSet::with_default_entry();
    metrics::set_configurations(set.len());
    set
}
