//! Local bookkeeping behind an injected key-value store.
//!
//! Repositories keep one JSON document per key. A document that no longer
//! parses is logged, dropped and treated as absent rather than failing the
//! caller.

pub mod history;
pub mod presets;
pub mod saved;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, error};

pub use history::{HistoryEntry, HistoryRepository, NewHistoryEntry};
pub use presets::{Preset, PresetRepository};
pub use saved::{SavedClue, SavedClueRepository};

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// One `<key>.json` file per key under a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.path_for(key);
        // Write then rename so a crash never leaves a half-written document
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("failed to replace {}", path.display()))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
        Ok(())
    }
}

/// Load a JSON list, seeding it on first use.
///
/// `seed` runs only when the key has never been written. A corrupted
/// document is removed and yields an empty list.
pub(crate) fn load_list<T, F>(store: &dyn KeyValueStore, key: &str, seed: F) -> Result<Vec<T>>
where
    T: DeserializeOwned + Serialize,
    F: FnOnce() -> Vec<T>,
{
    let Some(content) = store.get(key)? else {
        let items = seed();
        if !items.is_empty() {
            save_list(store, key, &items)?;
        }
        return Ok(items);
    };

    match serde_json::from_str(&content) {
        Ok(items) => Ok(items),
        Err(e) => {
            error!("Failed to load {} from storage, discarding it: {}", key, e);
            store.remove(key)?;
            Ok(Vec::new())
        }
    }
}

pub(crate) fn save_list<T: Serialize>(store: &dyn KeyValueStore, key: &str, items: &[T]) -> Result<()> {
    let content = serde_json::to_string_pretty(items)
        .with_context(|| format!("failed to serialize {}", key))?;
    store.set(key, &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.get("history").unwrap(), None);

        store.set("history", "[]").unwrap();
        assert!(dir.path().join("nested").join("history.json").exists());
        assert_eq!(store.get("history").unwrap().as_deref(), Some("[]"));

        store.remove("history").unwrap();
        store.remove("history").unwrap();
        assert_eq!(store.get("history").unwrap(), None);
    }

    #[test]
    fn test_load_list_seeds_once() {
        let store = MemoryStore::new();
        let items: Vec<u32> = load_list(&store, "nums", || vec![1, 2]).unwrap();
        assert_eq!(items, vec![1, 2]);
        assert!(store.get("nums").unwrap().is_some());

        let items: Vec<u32> = load_list(&store, "nums", || vec![9]).unwrap();
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn test_load_list_discards_corrupted_document() {
        let store = MemoryStore::new();
        store.set("nums", "{not json").unwrap();
        let items: Vec<u32> = load_list(&store, "nums", || vec![1]).unwrap();
        assert!(items.is_empty());
        assert_eq!(store.get("nums").unwrap(), None);
    }
}
