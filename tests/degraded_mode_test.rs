mod common;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{entry, orchestrator_with};
use inference_cache::adapters::volatile::{
    ConnectionState, MemoryTransport, ReconnectPolicy, VolatileCache,
};
use inference_cache::domain::models::{CacheConfig, ReconnectConfig, VolatileConfig};
use inference_cache::domain::ports::{
    KeyTtl, ScanPage, TransportError, TransportResult, VolatileTransport,
};

/// Transport whose health the test flips at will. Delegates to an
/// in-process store while healthy and counts every call that reaches it.
struct SwitchableTransport {
    healthy: AtomicBool,
    calls: AtomicUsize,
    inner: MemoryTransport,
}

impl SwitchableTransport {
    fn new(healthy: bool) -> Self {
        Self {
            healthy: AtomicBool::new(healthy),
            calls: AtomicUsize::new(0),
            inner: MemoryTransport::new(),
        }
    }

    fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn admit(&self) -> TransportResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(TransportError::Unavailable(
                "volatile store offline".to_string(),
            ))
        }
    }
}

#[async_trait]
impl VolatileTransport for SwitchableTransport {
    async fn ping(&self) -> TransportResult<()> {
        self.admit()
    }

    async fn get(&self, key: &str) -> TransportResult<Option<String>> {
        self.admit()?;
        self.inner.get(key).await
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> TransportResult<()> {
        self.admit()?;
        self.inner.set_ex(key, value, ttl).await
    }

    async fn del(&self, key: &str) -> TransportResult<()> {
        self.admit()?;
        self.inner.del(key).await
    }

    async fn scan(&self, cursor: u64, pattern: &str, count: u32) -> TransportResult<ScanPage> {
        self.admit()?;
        self.inner.scan(cursor, pattern, count).await
    }

    async fn ttl(&self, key: &str) -> TransportResult<KeyTtl> {
        self.admit()?;
        self.inner.ttl(key).await
    }
}

fn fast_reconnect() -> ReconnectConfig {
    ReconnectConfig {
        max_attempts: 2,
        initial_backoff_ms: 50,
        max_backoff_ms: 200,
    }
}

/// Walks the whole outage lifecycle through the orchestrator: reconnecting,
/// degraded fail-fast, recovery probe, and promotion after recovery.
#[tokio::test]
async fn test_outage_degrades_then_recovers() {
    let transport = Arc::new(SwitchableTransport::new(false));
    let config = CacheConfig {
        reconnect: fast_reconnect(),
        ..CacheConfig::default()
    };
    let cache = orchestrator_with(config, Arc::clone(&transport)).await;

    // The first store opens the outage: durable write lands, volatile fails.
    let stored = entry("fp-outage", "payload");
    cache
        .store(stored.clone())
        .await
        .expect("store must survive a volatile outage");
    assert_eq!(
        cache.volatile().connection_state(),
        ConnectionState::Reconnecting
    );

    // Reads fall back to the durable tier while the outage lasts.
    let found = cache
        .get("fp-outage")
        .await
        .expect("failed to get")
        .expect("entry not found");
    assert_eq!(found, stored);
    assert_eq!(cache.stats().durable_hits, 1);

    // Burn through the reconnect budget.
    for _ in 0..2 {
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(cache.volatile().ping().await.is_err());
    }
    assert_eq!(
        cache.volatile().connection_state(),
        ConnectionState::Degraded
    );

    // Between probes the transport sees no traffic at all.
    let calls_before = transport.calls();
    cache
        .get("fp-outage")
        .await
        .expect("failed to get")
        .expect("entry not found");
    assert_eq!(transport.calls(), calls_before);

    // A recovery probe after the probe interval finds a healthy transport.
    transport.set_healthy(true);
    tokio::time::sleep(Duration::from_millis(250)).await;
    cache
        .volatile()
        .ping()
        .await
        .expect("recovery probe failed");
    assert_eq!(cache.volatile().connection_state(), ConnectionState::Ready);

    // The recovered tier is repopulated by promotion on the next read.
    cache
        .get("fp-outage")
        .await
        .expect("failed to get")
        .expect("entry not found");
    let stats = cache.stats();
    assert_eq!(stats.promotions, 1);
    assert_eq!(stats.volatile_write_failures, 1);

    cache
        .get("fp-outage")
        .await
        .expect("failed to get")
        .expect("entry not found");
    assert_eq!(cache.stats().volatile_hits, 1);
}

#[tokio::test]
async fn test_store_and_read_survive_full_outage() {
    let transport = Arc::new(SwitchableTransport::new(false));
    let config = CacheConfig {
        reconnect: fast_reconnect(),
        ..CacheConfig::default()
    };
    let cache = orchestrator_with(config, Arc::clone(&transport)).await;

    for i in 0..3 {
        let stored = entry(&format!("fp-dark-{i}"), &format!("payload-{i}"));
        cache.store(stored.clone()).await.expect("failed to store");

        let found = cache
            .get(&format!("fp-dark-{i}"))
            .await
            .expect("failed to get")
            .expect("entry not found");
        assert_eq!(found, stored);
    }

    let stats = cache.stats();
    assert_eq!(stats.stores, 3);
    assert_eq!(stats.durable_hits, 3);
    assert_eq!(stats.volatile_hits, 0);
    assert_eq!(stats.volatile_write_failures, 3);
    assert_eq!(stats.misses, 0);
}

#[tokio::test]
async fn test_degraded_probes_are_spaced() {
    let transport = Arc::new(SwitchableTransport::new(false));
    let volatile = VolatileCache::new(
        Arc::clone(&transport),
        VolatileConfig::default(),
        ReconnectPolicy::new(1, 20, 100),
    );

    // First failure opens the outage; the second exhausts the budget.
    assert!(volatile.ping().await.is_err());
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(volatile.ping().await.is_err());
    assert_eq!(volatile.connection_state(), ConnectionState::Degraded);

    // Hammering the tier between probes never reaches the transport.
    let calls_before = transport.calls();
    for _ in 0..5 {
        assert!(volatile.ping().await.is_err());
    }
    assert_eq!(transport.calls(), calls_before);

    // After the probe interval exactly one call gets through.
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(volatile.ping().await.is_err());
    assert_eq!(transport.calls(), calls_before + 1);
    assert_eq!(volatile.connection_state(), ConnectionState::Degraded);
}
