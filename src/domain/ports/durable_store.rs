//! Durable store port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::errors::CacheResult;
use crate::domain::models::CacheEntry;

/// Repository interface for the durable cache tier.
///
/// The durable tier is the source of truth: writes here decide what a cache
/// entry's authoritative state is, and the volatile tier only ever holds
/// copies of it.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Insert an entry, overwriting any existing row with the same id.
    /// Returns the id actually stored (a fresh one is generated when the
    /// caller supplies an empty id).
    async fn insert(&self, entry: &CacheEntry) -> CacheResult<String>;

    /// Get an entry by id.
    async fn get_by_id(&self, id: &str) -> CacheResult<Option<CacheEntry>>;

    /// List entries with a given fingerprint, most recent first.
    async fn query_by_fingerprint(
        &self,
        fingerprint: &str,
        limit: u32,
    ) -> CacheResult<Vec<CacheEntry>>;

    /// Delete an entry by id. Deleting an absent id is a success.
    async fn delete_by_id(&self, id: &str) -> CacheResult<()>;

    /// Delete at most `batch_size` entries created before `cutoff`, oldest
    /// first. Returns the number deleted; callers loop until a batch comes
    /// back short.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>, batch_size: u32)
        -> CacheResult<u64>;

    /// Total number of stored entries.
    async fn count(&self) -> CacheResult<u64>;
}
