//! In-memory filter store using DashMap

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use bloomstore_core::{FilterStore, Result};

/// Operation counters for the memory store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounters {
    /// Successful loads of an existing record
    pub hits: u64,
    /// Loads of an absent record
    pub misses: u64,
    /// Save operations
    pub saves: u64,
    /// Delete operations that removed a record
    pub deletes: u64,
}

/// In-memory filter store
///
/// Holds encoded records in a `DashMap`; useful as the default store
/// and in tests. Cloning creates a new handle to the SAME underlying
/// records.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<DashMap<String, Vec<u8>>>,
    counters: Arc<RwLock<StoreCounters>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the operation counters
    pub fn counters(&self) -> StoreCounters {
        *self.counters.read()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl FilterStore for MemoryStore {
    async fn load(&self, name: &str) -> Result<Option<Vec<u8>>> {
        match self.records.get(name) {
            Some(record) => {
                self.counters.write().hits += 1;
                Ok(Some(record.clone()))
            }
            None => {
                self.counters.write().misses += 1;
                Ok(None)
            }
        }
    }

    async fn save(&self, name: &str, record: Vec<u8>) -> Result<()> {
        self.records.insert(name.to_string(), record);
        self.counters.write().saves += 1;
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let removed = self.records.remove(name).is_some();
        if removed {
            self.counters.write().deletes += 1;
        }
        Ok(removed)
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.records.contains_key(name))
    }

    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.records.iter().map(|r| r.key().clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_load() {
        let store = MemoryStore::new();
        store.save("users", vec![1, 2, 3]).await.unwrap();

        let record = store.load("users").await.unwrap();
        assert_eq!(record, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_load_absent() {
        let store = MemoryStore::new();
        assert!(store.load("missing").await.unwrap().is_none());
        assert_eq!(store.counters().misses, 1);
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let store = MemoryStore::new();
        store.save("users", vec![1]).await.unwrap();
        store.save("users", vec![2]).await.unwrap();

        assert_eq!(store.load("users").await.unwrap(), Some(vec![2]));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        store.save("users", vec![1]).await.unwrap();

        assert!(store.exists("users").await.unwrap());
        assert!(store.delete("users").await.unwrap());
        assert!(!store.exists("users").await.unwrap());
        // Deleting again reports nothing removed.
        assert!(!store.delete("users").await.unwrap());
    }

    #[tokio::test]
    async fn test_list() {
        let store = MemoryStore::new();
        store.save("a", vec![0]).await.unwrap();
        store.save("b", vec![0]).await.unwrap();

        let mut names = store.list().await.unwrap();
        names.sort();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_clone_shares_records() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.save("shared", vec![7]).await.unwrap();

        assert_eq!(handle.load("shared").await.unwrap(), Some(vec![7]));
    }
}
