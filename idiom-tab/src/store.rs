//! Persistent state store.
//!
//! The browser extension treats its storage backend as an opaque async
//! key-value collaborator; this module is that port. Values are read once
//! at startup and rewritten wholesale on each mutation - there are no
//! partial updates.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Store key names, shared with the original extension's storage schema.
pub mod keys {
    /// Ordered favorite fingerprints
    pub const SAVED_IDIOMS: &str = "savedIdioms";
    /// Fingerprint -> favorite record snapshots
    pub const SAVED_IDIOMS_DATA: &str = "savedIdiomsData";
    /// User-supplied generation API credential
    pub const GEMINI_API_KEY: &str = "geminiApiKey";
    /// Rotation cache entries, oldest first
    pub const IDIOM_CACHE: &str = "idiomCache";
    /// Fingerprints shown since the last rotation reset
    pub const SEEN_IDIOM_HASHES: &str = "seenIdiomHashes";
    /// Legacy static-variant keys, only ever removed
    pub const LEGACY_SEEN_IDS: &str = "seenIds";
    pub const LEGACY_QUEUE: &str = "queue";
}

/// Errors from the persistence port.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Asynchronous key-value persistence port.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read a value. `None` if the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Delete a key. Deleting an absent key is a no-op.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// ============================================================================
// JSON file store
// ============================================================================

/// File-backed store: one JSON object on disk holding every key.
///
/// The file is read once when the store opens; every mutation rewrites it
/// wholesale through a temp-file rename so a crash mid-write can never
/// leave a truncated state file behind.
pub struct JsonFileStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, Value>>,
}

impl JsonFileStore {
    /// Open (or create) the store at the given file path.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let values: BTreeMap<String, Value> = match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(values) => values,
                Err(e) => {
                    // a corrupted state file starts a fresh store rather
                    // than bricking every launch
                    warn!(path = %path.display(), error = %e, "Discarding unreadable state file");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), keys = values.len(), "State store opened");

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    async fn flush(&self, values: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(values)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "State store flushed");
        Ok(())
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        values.insert(key.to_string(), value);
        self.flush(&values).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        if values.remove(key).is_some() {
            self.flush(&values).await?;
        }
        Ok(())
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Volatile store for tests.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        store.set(keys::GEMINI_API_KEY, json!("secret")).await.unwrap();
        store
            .set(keys::SEEN_IDIOM_HASHES, json!(["jaidiom", "frcafard"]))
            .await
            .unwrap();

        // A fresh open reads what the previous instance flushed
        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get(keys::GEMINI_API_KEY).await.unwrap(),
            Some(json!("secret"))
        );
        assert_eq!(
            reopened.get(keys::SEEN_IDIOM_HASHES).await.unwrap(),
            Some(json!(["jaidiom", "frcafard"]))
        );
    }

    #[tokio::test]
    async fn test_file_store_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        store.set(keys::IDIOM_CACHE, json!([])).await.unwrap();
        store.remove(keys::IDIOM_CACHE).await.unwrap();

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get(keys::IDIOM_CACHE).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_absent_key_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("state.json")).await.unwrap();
        store.remove("neverWritten").await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupted_state_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, b"{ truncated").await.unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(store.get(keys::IDIOM_CACHE).await.unwrap(), None);

        // the fresh store is writable and replaces the bad file
        store.set("k", json!("v")).await.unwrap();
        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("k").await.unwrap(), Some(json!("v")));
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryStore::new();
        store.set("k", json!(1)).await.unwrap();
        store.set("k", json!(2)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_no_stray_tmp_file_after_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        store.set("k", json!("v")).await.unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
