//! Lookaside cache over a keyed-record store

use std::collections::HashMap;
use std::sync::Arc;

use ahash::RandomState;
use parking_lot::Mutex;
use recstore::{Record, Result, StoreClient};
use tracing::debug;

use crate::stats::CacheStats;

/// Read-through, write-back in-memory cache in front of a record store
///
/// Lookups are served from memory when possible; a miss falls through to
/// the store and the fetched record is written back for subsequent reads.
/// The in-memory collection holds at most one record per key and only
/// grows between loads: there is no eviction, TTL, or size bound, and
/// entries live for the process lifetime.
pub struct RecCache {
    /// In-memory collection, keyed by record key
    records: Mutex<HashMap<String, Record, RandomState>>,

    /// Shared client for the backing store
    store: Arc<dyn StoreClient>,

    /// Cache statistics
    stats: Arc<CacheStats>,
}

impl RecCache {
    /// Create an empty cache backed by the given store client
    pub fn new(store: Arc<dyn StoreClient>) -> Self {
        Self {
            records: Mutex::new(HashMap::default()),
            store,
            stats: Arc::new(CacheStats::new()),
        }
    }

    /// Replace the entire in-memory collection with a store snapshot
    ///
    /// All-or-nothing: if the store call fails, the previous collection
    /// is left unchanged and the error is returned. Intended to run once
    /// at startup; concurrent loads serialize on the lock at the swap.
    ///
    /// # Returns
    /// * `Result<()>` - Ok once the snapshot is in place
    pub async fn load(&self) -> Result<()> {
        // Fetch without holding the lock; the swap is the critical section.
        let records = self.store.list_all().await?;
        let map: HashMap<String, Record, RandomState> = records
            .into_iter()
            .map(|record| (record.key.clone(), record))
            .collect();

        let count = map.len();
        *self.records.lock() = map;
        self.stats.record_load();
        debug!("loaded {} records from store", count);
        Ok(())
    }

    /// Insert a record, replacing any existing entry with the same key
    pub fn set(&self, record: Record) {
        let mut records = self.records.lock();
        records.insert(record.key.clone(), record);
        self.stats.record_insert();
    }

    /// Look up a record by key, falling through to the store on miss
    ///
    /// The fetched record is written back to memory so the next lookup
    /// for the same key is a hit. Store failures propagate without
    /// touching the in-memory collection. The lock is scoped to the
    /// in-memory phase and is never held across the store call.
    ///
    /// # Arguments
    /// * `key` - Record key to look up
    ///
    /// # Returns
    /// * `Result<Record>` - The cached or freshly fetched record
    pub async fn get(&self, key: &str) -> Result<Record> {
        // Try memory first; the guard drops at the end of this scope on
        // every path, hit included.
        {
            let records = self.records.lock();
            if let Some(record) = records.get(key) {
                self.stats.record_hit();
                return Ok(record.clone());
            }
        }

        // Miss - fetch from the store with the lock released
        self.stats.record_miss();
        let record = self.store.fetch_by_key(key).await?;
        debug!("cache miss for {}, filled from store", record.key);

        // Write back for subsequent reads
        self.set(record.clone());

        Ok(record)
    }

    /// Check whether a key is present in memory
    pub fn contains(&self, key: &str) -> bool {
        self.records.lock().contains_key(key)
    }

    /// Number of records currently in memory
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Check if the in-memory collection is empty
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}
