//! Persistence of the payment method configuration entity.
//!
//! The entity is kept as a single JSON document. Writes go to a temporary
//! file first and are renamed into place.

use sermepa_core::config::{ConfigStore, ConfigWatcher};
use sermepa_core::{PLUGIN_DEFINITION, SermepaConfiguration};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A configured instance of the Sermepa payment method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationEntity {
    pub id: String,
    pub label: String,
    pub plugin_id: String,
    /// Whether the payment method is offered to payers.
    #[serde(default = "enabled")]
    pub status: bool,
    #[serde(default)]
    pub configuration: SermepaConfiguration,
}

fn enabled() -> bool {
    true
}

impl Default for ConfigurationEntity {
    fn default() -> Self {
        Self {
            id: "sermepa".to_string(),
            label: PLUGIN_DEFINITION.label.to_string(),
            plugin_id: PLUGIN_DEFINITION.id.to_string(),
            status: true,
            configuration: SermepaConfiguration::default(),
        }
    }
}

/// JSON file holding one [`ConfigurationEntity`].
#[derive(Debug, Clone)]
pub struct EntityStorage {
    path: PathBuf,
}

impl EntityStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored entity, or `None` if nothing has been saved yet.
    pub fn load(&self) -> Result<Option<ConfigurationEntity>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Load the stored entity, falling back to a fresh one.
    pub fn load_or_default(&self) -> Result<ConfigurationEntity, StorageError> {
        Ok(self.load()?.unwrap_or_else(|| {
            tracing::info!(path = ?self.path, "No stored configuration, starting fresh");
            ConfigurationEntity::default()
        }))
    }

    pub fn save(&self, entity: &ConfigurationEntity) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entity)?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    /// [`save`](Self::save) on the blocking thread pool.
    pub async fn persist(&self, entity: ConfigurationEntity) -> Result<(), StorageError> {
        let storage = self.clone();
        tokio::task::spawn_blocking(move || storage.save(&entity)).await?
    }
}

/// Spawn a task writing the entity to `storage` after every store update.
///
/// The task keeps its own handle on the store, so it runs until aborted.
pub fn spawn_persistence_task(
    store: &ConfigStore<ConfigurationEntity>,
    storage: EntityStorage,
) -> JoinHandle<()> {
    let watcher = store.subscribe();
    let store = store.clone();
    tokio::spawn(persist_changes(store, watcher, storage))
}

async fn persist_changes(
    store: ConfigStore<ConfigurationEntity>,
    mut watcher: ConfigWatcher,
    storage: EntityStorage,
) {
    while watcher.changed().await.is_ok() {
        let version = watcher.seen_version();
        let entity = store.snapshot().await;
        match storage.persist(entity).await {
            Ok(()) => tracing::debug!(version, path = ?storage.path(), "Configuration persisted"),
            Err(e) => tracing::error!(error = %e, version, "Failed to persist configuration"),
        }
    }
    tracing::debug!("Persistence task shutting down");
}
