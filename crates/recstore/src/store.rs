//! Redis-backed store client
//!
//! Records live in a logical `{db}.{collection}` namespace, stored as
//! JSON strings under the key `{db}:{collection}:{key}`.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;

use crate::client::StoreClient;
use crate::error::{Error, Result};
use crate::record::Record;

/// Default per-call deadline for store operations
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Compose the storage key for a record key
fn record_key(db: &str, collection: &str, key: &str) -> String {
    format!("{}:{}:{}", db, collection, key)
}

/// Compose the scan pattern matching every record in the collection
fn match_pattern(db: &str, collection: &str) -> String {
    format!("{}:{}:*", db, collection)
}

/// Store client backed by a Redis keyed-record collection
///
/// Holds a single long-lived multiplexed connection shared by every
/// caller; per-call handles are cheap clones of it. Every operation is
/// bounded by the configured timeout and fails with `Error::Unavailable`
/// when the deadline passes.
pub struct RedisStore {
    /// Shared connection to the store
    conn: ConnectionManager,

    /// Logical database name
    db: String,

    /// Collection name within the database
    collection: String,

    /// Per-call deadline
    timeout: Duration,
}

impl RedisStore {
    /// Connect to the store at the given URL
    ///
    /// # Arguments
    /// * `url` - Redis connection URL
    /// * `db` - Logical database name
    /// * `collection` - Collection name within the database
    /// * `timeout` - Per-call deadline, also bounds the initial connect
    ///
    /// # Returns
    /// * `Result<RedisStore>` - Connected store client
    pub async fn connect(
        url: &str,
        db: &str,
        collection: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = tokio::time::timeout(timeout, client.get_connection_manager())
            .await
            .map_err(|_| Error::Unavailable(format!("connect timed out after {:?}", timeout)))??;

        Ok(Self {
            conn,
            db: db.to_string(),
            collection: collection.to_string(),
            timeout,
        })
    }

    /// Insert one record directly into the backing collection
    ///
    /// Seeding path for collaborators that write to the store; the cache
    /// layer never calls this.
    pub async fn insert(&self, record: &Record) -> Result<()> {
        tokio::time::timeout(self.timeout, self.set_one(record))
            .await
            .map_err(|_| self.timed_out("SET"))?
    }

    /// Insert a batch of records directly into the backing collection
    pub async fn insert_many(&self, records: &[Record]) -> Result<()> {
        for record in records {
            self.insert(record).await?;
        }
        Ok(())
    }

    fn timed_out(&self, op: &str) -> Error {
        Error::Unavailable(format!("{} timed out after {:?}", op, self.timeout))
    }

    async fn scan_all(&self) -> Result<Vec<Record>> {
        let mut conn = self.conn.clone();
        let pattern = match_pattern(&self.db, &self.collection);

        let mut keys: Vec<String> = Vec::new();
        {
            let mut iter = conn.scan_match::<_, String>(&pattern).await?;
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
        }

        // MGET rejects an empty key list
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let payloads: Vec<Option<String>> = conn.mget(&keys).await?;

        let mut records = Vec::with_capacity(payloads.len());
        for payload in payloads.into_iter().flatten() {
            let record: Record = serde_json::from_str(&payload)?;
            records.push(record);
        }

        debug!("scanned {} records from {}.{}", records.len(), self.db, self.collection);
        Ok(records)
    }

    async fn get_one(&self, key: &str) -> Result<Record> {
        let mut conn = self.conn.clone();
        let storage_key = record_key(&self.db, &self.collection, key);

        let payload: Option<String> = conn.get(&storage_key).await?;
        match payload {
            Some(payload) => Ok(serde_json::from_str(&payload)?),
            None => Err(Error::NotFound),
        }
    }

    async fn set_one(&self, record: &Record) -> Result<()> {
        let mut conn = self.conn.clone();
        let storage_key = record_key(&self.db, &self.collection, &record.key);
        let payload = serde_json::to_string(record)?;

        conn.set::<_, _, ()>(&storage_key, payload).await?;
        Ok(())
    }
}

#[async_trait]
impl StoreClient for RedisStore {
    async fn list_all(&self) -> Result<Vec<Record>> {
        tokio::time::timeout(self.timeout, self.scan_all())
            .await
            .map_err(|_| self.timed_out("SCAN"))?
    }

    async fn fetch_by_key(&self, key: &str) -> Result<Record> {
        tokio::time::timeout(self.timeout, self.get_one(key))
            .await
            .map_err(|_| self.timed_out("GET"))?
    }
}
