//! Store client port

use async_trait::async_trait;

use crate::error::Result;
use crate::record::Record;

/// Opaque capability over a remote keyed-record service
///
/// Implementations bound every call with their own deadline and perform
/// no retries; a timeout or transport failure surfaces to the caller as
/// `Error::Unavailable`.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Return every record currently in the backing collection
    async fn list_all(&self) -> Result<Vec<Record>>;

    /// Return the single record with the given key
    ///
    /// Fails with `Error::NotFound` when no record has that key.
    async fn fetch_by_key(&self, key: &str) -> Result<Record>;
}
