//! Tiered cache orchestrator.
//!
//! Read-through and write-through across the volatile and durable tiers.
//! The durable tier is authoritative: writes land there first, reads fall
//! back to it, and a volatile failure never fails a call the durable tier
//! can serve.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::adapters::volatile::{ConnectionSnapshot, VolatileCache};
use crate::domain::models::CacheEntry;
use crate::domain::ports::{DurableStore, VolatileTransport};
use crate::domain::{CacheError, CacheResult};

/// Running counters for cache traffic. Cheap to bump from any task.
#[derive(Debug, Default)]
pub struct CacheStats {
    volatile_hits: AtomicU64,
    durable_hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
    promotions: AtomicU64,
    volatile_write_failures: AtomicU64,
}

impl CacheStats {
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            volatile_hits: self.volatile_hits.load(Ordering::Relaxed),
            durable_hits: self.durable_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
            volatile_write_failures: self.volatile_write_failures.load(Ordering::Relaxed),
        }
    }

    fn record_volatile_hit(&self) {
        self.volatile_hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_durable_hit(&self) {
        self.durable_hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn record_store(&self) {
        self.stores.fetch_add(1, Ordering::Relaxed);
    }

    fn record_promotion(&self) {
        self.promotions.fetch_add(1, Ordering::Relaxed);
    }

    fn record_volatile_write_failure(&self) {
        self.volatile_write_failures.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time copy of [`CacheStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStatsSnapshot {
    pub volatile_hits: u64,
    pub durable_hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub promotions: u64,
    pub volatile_write_failures: u64,
}

/// The component application code calls.
///
/// Owns one durable store and one gated volatile cache and keeps them
/// coherent: volatile entries are a bounded-staleness projection of the
/// durable rows.
pub struct CacheOrchestrator<D, T>
where
    D: DurableStore,
    T: VolatileTransport,
{
    durable: Arc<D>,
    volatile: VolatileCache<T>,
    stats: CacheStats,
}

impl<D, T> CacheOrchestrator<D, T>
where
    D: DurableStore,
    T: VolatileTransport,
{
    pub fn new(durable: Arc<D>, volatile: VolatileCache<T>) -> Self {
        Self {
            durable,
            volatile,
            stats: CacheStats::default(),
        }
    }

    /// Store an entry with the default volatile TTL.
    pub async fn store(&self, entry: CacheEntry) -> CacheResult<String> {
        self.store_with_ttl(entry, None).await
    }

    /// Store an entry, bounding its volatile lifetime to `ttl`.
    ///
    /// The durable insert decides the outcome; once it succeeds the
    /// entry is retrievable regardless of what the volatile tier does.
    /// Volatile copies are written under the id key and, when distinct,
    /// the fingerprint key.
    pub async fn store_with_ttl(
        &self,
        entry: CacheEntry,
        ttl: Option<Duration>,
    ) -> CacheResult<String> {
        let id = self.durable.insert(&entry).await?;
        self.stats.record_store();

        // The durable id is authoritative; the caller may have left it empty.
        let mut entry = entry;
        entry.id.clone_from(&id);

        self.write_volatile(&id, &entry, ttl).await;
        if entry.prompt_fingerprint != id {
            let fingerprint = entry.prompt_fingerprint.clone();
            self.write_volatile(&fingerprint, &entry, ttl).await;
        }

        Ok(id)
    }

    /// Fetch by id: volatile first, then durable with promotion.
    pub async fn get(&self, id: &str) -> CacheResult<Option<CacheEntry>> {
        if let Some(entry) = self.read_volatile(id).await {
            self.stats.record_volatile_hit();
            return Ok(Some(entry));
        }

        match self.durable.get_by_id(id).await? {
            Some(entry) => {
                self.stats.record_durable_hit();
                self.promote(id, &entry).await;
                Ok(Some(entry))
            }
            None => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    /// Fetch the most recent entry for a fingerprint.
    pub async fn get_by_fingerprint(&self, fingerprint: &str) -> CacheResult<Option<CacheEntry>> {
        if let Some(entry) = self.read_volatile(fingerprint).await {
            self.stats.record_volatile_hit();
            return Ok(Some(entry));
        }

        let entries = self.durable.query_by_fingerprint(fingerprint, 1).await?;
        match entries.into_iter().next() {
            Some(entry) => {
                self.stats.record_durable_hit();
                self.promote(fingerprint, &entry).await;
                Ok(Some(entry))
            }
            None => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    /// Remove an entry from both tiers.
    ///
    /// Both tiers are attempted even when one fails; the aggregate error
    /// names whichever failed. Deleting an absent id succeeds.
    pub async fn delete(&self, id: &str) -> CacheResult<()> {
        // A distinct fingerprint carries a second volatile copy.
        let fingerprint_key = match self.durable.get_by_id(id).await {
            Ok(Some(entry)) if entry.prompt_fingerprint != id => Some(entry.prompt_fingerprint),
            _ => None,
        };

        let volatile_failure = {
            let first = self.volatile.delete(id).await.err();
            let second = match fingerprint_key {
                Some(key) => self.volatile.delete(&key).await.err(),
                None => None,
            };
            first.or(second).map(|err| err.to_string())
        };
        let durable_failure = self
            .durable
            .delete_by_id(id)
            .await
            .err()
            .map(|err| err.to_string());

        CacheError::from_delete_outcomes(volatile_failure, durable_failure)
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn connection_snapshot(&self) -> ConnectionSnapshot {
        self.volatile.connection_snapshot()
    }

    pub fn durable(&self) -> &D {
        &self.durable
    }

    pub fn volatile(&self) -> &VolatileCache<T> {
        &self.volatile
    }

    /// Volatile read that treats tier failure as a fall-through, not an
    /// answer. Corrupt payloads land here too.
    async fn read_volatile(&self, key: &str) -> Option<CacheEntry> {
        match self.volatile.get(key).await {
            Ok(found) => found,
            Err(err) => {
                warn!(key = %key, error = %err, "volatile read skipped");
                None
            }
        }
    }

    async fn write_volatile(&self, key: &str, entry: &CacheEntry, ttl: Option<Duration>) {
        if let Err(err) = self.volatile.put(key, entry, ttl).await {
            self.stats.record_volatile_write_failure();
            warn!(key = %key, error = %err, "volatile write skipped");
        }
    }

    /// Best-effort promotion. A failure is visible only as a promotion
    /// that never happened; `volatile_write_failures` tracks the store
    /// path alone.
    async fn promote(&self, key: &str, entry: &CacheEntry) {
        match self.volatile.put(key, entry, None).await {
            Ok(()) => {
                self.stats.record_promotion();
                debug!(key = %key, "promoted to volatile tier");
            }
            Err(err) => {
                debug!(key = %key, error = %err, "promotion skipped");
            }
        }
    }
}
