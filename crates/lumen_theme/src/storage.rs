//! Durable key-value storage
//!
//! The preference store keeps one string slot in a [`PreferenceStorage`].
//! Backends:
//! - [`MemoryStorage`]: shared in-process map, cloned handles see the same data
//! - [`FileStorage`]: a small TOML file of string keys and values
//! - [`UnavailableStorage`]: every call fails, as when storage is disabled

use crate::error::{Result, StorageError};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// A client-local string key-value store
pub trait PreferenceStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory storage; clones share the same map
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<FxHashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        storage
    }

    /// Current raw value of `key`
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl PreferenceStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.peek(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// File-backed storage
///
/// The file holds a flat TOML table of string values. A missing file reads
/// as empty; the file and its parent directories are created on first write.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, toml::to_string(entries)?)?;
        Ok(())
    }
}

impl PreferenceStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

/// Storage that is never available
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableStorage;

impl PreferenceStorage for UnavailableStorage {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(StorageError::Unavailable("storage is disabled".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(StorageError::Unavailable("storage is disabled".into()))
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(StorageError::Unavailable("storage is disabled".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clones_share_entries() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();

        storage.set("theme", "dark").unwrap();
        assert_eq!(handle.get("theme").unwrap(), Some("dark".to_string()));

        handle.remove("theme").unwrap();
        assert_eq!(storage.peek("theme"), None);
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("storage.toml"));

        assert_eq!(storage.get("theme").unwrap(), None);

        storage.set("theme", "light").unwrap();
        storage.set("other", "kept").unwrap();
        assert_eq!(storage.get("theme").unwrap(), Some("light".to_string()));

        storage.remove("theme").unwrap();
        assert_eq!(storage.get("theme").unwrap(), None);
        assert_eq!(storage.get("other").unwrap(), Some("kept".to_string()));
    }

    #[test]
    fn test_file_storage_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.toml");
        fs::write(&path, "this is = = not toml").unwrap();

        let storage = FileStorage::new(path);
        assert!(matches!(
            storage.get("theme"),
            Err(StorageError::Decode(_))
        ));
    }

    #[test]
    fn test_unavailable_storage_fails() {
        let storage = UnavailableStorage;
        assert!(matches!(
            storage.get("theme"),
            Err(StorageError::Unavailable(_))
        ));
        assert!(storage.set("theme", "dark").is_err());
        assert!(storage.remove("theme").is_err());
    }
}
