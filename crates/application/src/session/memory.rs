//! In-memory storage for ephemeral sessions and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::ports::{KeyValueStorage, StorageError};

/// Thread-safe in-memory [`KeyValueStorage`].
///
/// Clones share the same map, so a test can keep a handle and inspect what
/// the session store persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-filled with `entries`.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(map)),
        }
    }

    /// Returns the number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let storage = MemoryStorage::new();
        storage.set("language", "fr".to_string()).await.unwrap();
        assert_eq!(storage.get("language").await.unwrap().as_deref(), Some("fr"));

        storage.remove("language").await.unwrap();
        storage.remove("language").await.unwrap();
        assert_eq!(storage.get("language").await.unwrap(), None);
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let storage = MemoryStorage::with_entries([("a", "1")]);
        let handle = storage.clone();
        storage.set("b", "2".to_string()).await.unwrap();
        assert_eq!(handle.len().await, 2);
    }
}
