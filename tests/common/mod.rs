//! Shared fixtures for integration tests.
//!
//! Every orchestrator here runs against an in-memory migrated SQLite pool,
//! so tests are isolated and need no filesystem cleanup.

use std::sync::Arc;

use inference_cache::adapters::sqlite::{create_migrated_test_pool, SqliteDurableStore};
use inference_cache::adapters::volatile::{MemoryTransport, ReconnectPolicy, VolatileCache};
use inference_cache::domain::models::{CacheConfig, CacheEntry};
use inference_cache::domain::ports::VolatileTransport;
use inference_cache::services::CacheOrchestrator;

/// Orchestrator with default configuration over an in-process transport.
#[allow(dead_code)]
pub async fn default_orchestrator() -> Arc<CacheOrchestrator<SqliteDurableStore, MemoryTransport>>
{
    orchestrator_with(CacheConfig::default(), Arc::new(MemoryTransport::new())).await
}

/// Orchestrator with explicit configuration and transport, for tests that
/// tune TTLs or inject failures.
#[allow(dead_code)]
pub async fn orchestrator_with<T: VolatileTransport>(
    config: CacheConfig,
    transport: Arc<T>,
) -> Arc<CacheOrchestrator<SqliteDurableStore, T>> {
    let pool = create_migrated_test_pool()
        .await
        .expect("failed to create test database");
    let durable = Arc::new(SqliteDurableStore::new(pool));
    let volatile = VolatileCache::new(
        transport,
        config.volatile.clone(),
        ReconnectPolicy::from(&config.reconnect),
    );
    Arc::new(CacheOrchestrator::new(durable, volatile))
}

/// Entry fixture keyed by its fingerprint.
#[allow(dead_code)]
pub fn entry(fingerprint: &str, payload: &str) -> CacheEntry {
    CacheEntry::new(fingerprint, payload, "gpt-4:0.7:1000")
}
