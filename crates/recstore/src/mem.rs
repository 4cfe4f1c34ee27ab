//! In-memory store client
//!
//! Backend for tests and local development: pre-seedable through
//! `insert`, with a fault switch that simulates an unreachable store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::client::StoreClient;
use crate::error::{Error, Result};
use crate::record::Record;

/// Store client holding its backing collection in process memory
#[derive(Debug, Default)]
pub struct MemStore {
    records: RwLock<HashMap<String, Record>>,
    unavailable: AtomicBool,
}

impl MemStore {
    /// Create an empty, reachable store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly into the backing collection
    ///
    /// Seeding path for collaborators that write to the store; the cache
    /// layer never calls this.
    pub fn insert(&self, record: Record) {
        self.records.write().insert(record.key.clone(), record);
    }

    /// Flip store reachability
    ///
    /// While unavailable, both client calls fail with
    /// `Error::Unavailable` and the backing collection is untouched.
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Number of records in the backing collection
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if the backing collection is empty
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(Error::Unavailable("store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl StoreClient for MemStore {
    async fn list_all(&self) -> Result<Vec<Record>> {
        self.check_available()?;
        Ok(self.records.read().values().cloned().collect())
    }

    async fn fetch_by_key(&self, key: &str) -> Result<Record> {
        self.check_available()?;
        self.records.read().get(key).cloned().ok_or(Error::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_seeded_record() {
        let store = MemStore::new();
        store.insert(Record::new("1", "Item1", "Value1"));

        let record = store.fetch_by_key("1").await.unwrap();
        assert_eq!(record, Record::new("1", "Item1", "Value1"));
    }

    #[tokio::test]
    async fn test_fetch_missing_key() {
        let store = MemStore::new();

        let err = store.fetch_by_key("1").await.unwrap_err();
        assert!(matches!(err, Error::NotFound));
    }

    #[tokio::test]
    async fn test_list_all_returns_every_record() {
        let store = MemStore::new();
        store.insert(Record::new("1", "Item1", "Value1"));
        store.insert(Record::new("2", "Item2", "Value2"));

        let mut records = store.list_all().await.unwrap();
        records.sort_by(|a, b| a.key.cmp(&b.key));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, "1");
        assert_eq!(records[1].key, "2");
    }

    #[tokio::test]
    async fn test_insert_same_key_replaces() {
        let store = MemStore::new();
        store.insert(Record::new("1", "Item1", "Value1"));
        store.insert(Record::new("1", "Item1", "Value1b"));

        assert_eq!(store.len(), 1);
        let record = store.fetch_by_key("1").await.unwrap();
        assert_eq!(record.value, "Value1b");
    }

    #[tokio::test]
    async fn test_fault_switch() {
        let store = MemStore::new();
        store.insert(Record::new("1", "Item1", "Value1"));

        store.set_available(false);
        assert!(matches!(
            store.fetch_by_key("1").await.unwrap_err(),
            Error::Unavailable(_)
        ));
        assert!(matches!(
            store.list_all().await.unwrap_err(),
            Error::Unavailable(_)
        ));

        // Recovers once reachable again
        store.set_available(true);
        assert!(store.fetch_by_key("1").await.is_ok());
        assert_eq!(store.len(), 1);
    }
}
