//! Key-value store implementations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quizlens_protocols::{KeyValueStore, StorageChange, StoreError};
use serde_json::Value;
use tokio::fs;
use tokio::sync::{Mutex, RwLock, broadcast};
use tracing::{debug, warn};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// In-memory store for tests and ephemeral runs.
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Value>>,
    changes: broadcast::Sender<StorageChange>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            entries: RwLock::new(BTreeMap::new()),
            changes,
        }
    }

    fn notify(&self, key: &str, new_value: Option<Value>) {
        // No receivers is fine.
        let _ = self.changes.send(StorageChange {
            key: key.to_string(),
            new_value,
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.clone());
        drop(entries);
        self.notify(key, Some(value));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let removed = self.entries.write().await.remove(key);
        if removed.is_some() {
            self.notify(key, None);
        }
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.keys().cloned().collect())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}

/// File-backed store.
///
/// All entries live in one JSON object on disk. The file is read once on
/// open; every write rewrites it through a temporary sibling and a rename,
/// so a crash never leaves a half-written document behind.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, Value>>,
    changes: broadcast::Sender<StorageChange>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file starts empty. An unreadable document is logged and
    /// replaced on the next write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let entries = Self::read_document(&path).await?;
        debug!("FileStore opened at {:?} with {} entries", path, entries.len());

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self {
            path,
            entries: Mutex::new(entries),
            changes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(path: &Path) -> Result<BTreeMap<String, Value>, StoreError> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        match serde_json::from_str::<BTreeMap<String, Value>>(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!("Ignoring unreadable store document {:?}: {}", path, e);
                Ok(BTreeMap::new())
            }
        }
    }

    async fn write_document(&self, entries: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content).await?;
        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    fn notify(&self, key: &str, new_value: Option<Value>) {
        let _ = self.changes.send(StorageChange {
            key: key.to_string(),
            new_value,
        });
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        let previous = entries.insert(key.to_string(), value.clone());
        if let Err(e) = self.write_document(&entries).await {
            // Keep memory consistent with disk.
            match previous {
                Some(previous) => entries.insert(key.to_string(), previous),
                None => entries.remove(key),
            };
            return Err(e);
        }
        drop(entries);

        debug!("Stored key {}", key);
        self.notify(key, Some(value));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        let Some(previous) = entries.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.write_document(&entries).await {
            entries.insert(key.to_string(), previous);
            return Err(e);
        }
        drop(entries);

        self.notify(key, None);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.lock().await;
        Ok(entries.keys().cloned().collect())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
