//! Caller-owned caches used by the clue service.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// A value loaded at most once until invalidated.
///
/// Concurrent `get` calls wait for a single in-flight load. A failed load
/// leaves the cache empty so the next `get` tries again.
pub struct LoadOnce<T> {
    slot: tokio::sync::Mutex<Option<Arc<T>>>,
}

impl<T> Default for LoadOnce<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LoadOnce<T> {
    pub fn new() -> Self {
        Self {
            slot: tokio::sync::Mutex::new(None),
        }
    }

    pub async fn get<F, Fut, E>(&self, load: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(ref value) = *slot {
            return Ok(Arc::clone(value));
        }
        let value = Arc::new(load().await?);
        *slot = Some(Arc::clone(&value));
        Ok(value)
    }

    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }

    pub async fn is_loaded(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}

/// Case-insensitive string-keyed cache.
pub struct KeyedCache<V> {
    entries: Mutex<HashMap<String, V>>,
}

impl<V: Clone> Default for KeyedCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> KeyedCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn key(text: &str) -> String {
        text.trim().to_lowercase()
    }

    pub fn get(&self, text: &str) -> Option<V> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&Self::key(text))
            .cloned()
    }

    pub fn insert(&self, text: &str, value: V) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(Self::key(text), value);
    }

    pub fn invalidate(&self, text: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&Self::key(text));
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
