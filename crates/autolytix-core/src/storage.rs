//! Durable key-value storage for local session state.
//!
//! The session layer keeps two string entries: the bearer token and a JSON
//! snapshot of the user profile. `FileStore` writes all entries to a single
//! JSON file in the data directory; `MemoryStore` keeps them in memory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// String key-value storage local to the device.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// File-backed store. Every write rewrites the whole file through a
/// temporary sibling so a crash never leaves a half-written file behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current entries. A file that is not a JSON object of strings is
    /// treated as empty so the next write replaces it.
    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read storage file {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&contents) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable storage file");
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)
            .with_context(|| format!("Failed to write storage file {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace storage file {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)?;
        debug!(key, "Stored entry");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut entries = self.read_all()?;
        let removed = entries.remove(key).is_some();
        // An unreadable file also gets rewritten so the same entry cannot reappear
        if removed || (self.path.exists() && entries.is_empty()) {
            self.write_all(&entries)?;
            debug!(key, removed, "Rewrote storage file");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = FileStore::new(path.clone());
        store.set("autolytix_token", "abc").unwrap();
        store.set("autolytix_user", r#"{"id":1}"#).unwrap();

        let reopened = FileStore::new(path);
        assert_eq!(reopened.get("autolytix_token").unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.get("autolytix_user").unwrap().as_deref(), Some(r#"{"id":1}"#));

        reopened.remove("autolytix_token").unwrap();
        assert_eq!(store.get("autolytix_token").unwrap(), None);
        assert!(store.get("autolytix_user").unwrap().is_some());
    }

    #[test]
    fn test_file_store_missing_or_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let store = FileStore::new(path.clone());
        assert_eq!(store.get("anything").unwrap(), None);
        store.remove("anything").unwrap();
        assert!(!path.exists());

        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_file_store_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileStore::new(path.clone());
        assert_eq!(store.get("autolytix_token").unwrap(), None);

        store.remove("autolytix_token").unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(serde_json::from_str::<BTreeMap<String, String>>(&contents).unwrap().is_empty());

        std::fs::write(&path, "{not json").unwrap();
        store.set("autolytix_token", "abc").unwrap();
        assert_eq!(store.get("autolytix_token").unwrap().as_deref(), Some("abc"));
    }
}
