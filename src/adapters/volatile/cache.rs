//! Volatile cache tier.
//!
//! Wraps a [`VolatileTransport`] with the connection gate, per-operation
//! timeouts, TTL clamping and key namespacing. All entries cross this
//! boundary as JSON strings.

use futures::Stream;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::volatile::connection::{
    ConnectionGate, ConnectionSnapshot, ConnectionState, ReconnectPolicy,
};
use crate::domain::models::{CacheEntry, VolatileConfig};
use crate::domain::ports::{KeyTtl, TransportError, TransportResult, VolatileTransport};
use crate::domain::CacheResult;

/// Fast tier over a volatile transport.
///
/// Every call goes through the connection gate first: while the tier is
/// reconnecting or degraded, calls fail fast without touching the
/// transport. A successful operation marks the tier healthy again.
pub struct VolatileCache<T: VolatileTransport> {
    transport: Arc<T>,
    gate: ConnectionGate,
    config: VolatileConfig,
}

impl<T: VolatileTransport> VolatileCache<T> {
    pub fn new(transport: Arc<T>, config: VolatileConfig, policy: ReconnectPolicy) -> Self {
        Self {
            transport,
            gate: ConnectionGate::new(policy),
            config,
        }
    }

    /// Store a serialized entry under `key` with a bounded TTL.
    ///
    /// A missing TTL falls back to the configured default; anything
    /// above the configured ceiling is clamped down to it.
    pub async fn put(
        &self,
        key: &str,
        entry: &CacheEntry,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        let payload = serde_json::to_string(entry)?;
        let storage_key = self.storage_key(key);
        let ttl = self.effective_ttl(ttl);
        self.guarded(self.transport.set_ex(&storage_key, &payload, ttl))
            .await?;
        Ok(())
    }

    /// Fetch and deserialize the entry under `key`, if present.
    ///
    /// A payload that does not parse back into an entry is a
    /// serialization error, not a miss; callers decide whether to
    /// fall through to the durable tier.
    pub async fn get(&self, key: &str) -> CacheResult<Option<CacheEntry>> {
        let storage_key = self.storage_key(key);
        match self.guarded(self.transport.get(&storage_key)).await? {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    /// Remove `key`. Removing an absent key succeeds.
    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        let storage_key = self.storage_key(key);
        self.guarded(self.transport.del(&storage_key)).await?;
        Ok(())
    }

    /// Remaining lifetime of `key` as the transport reports it.
    pub async fn remaining_ttl(&self, key: &str) -> CacheResult<KeyTtl> {
        let storage_key = self.storage_key(key);
        Ok(self.guarded(self.transport.ttl(&storage_key)).await?)
    }

    /// Probe the transport without touching any keys.
    pub async fn ping(&self) -> CacheResult<()> {
        self.guarded(self.transport.ping()).await?;
        Ok(())
    }

    /// Stream every key in this cache's namespace, prefix stripped.
    ///
    /// Pages through the transport cursor lazily; a transport failure
    /// mid-iteration ends the stream with that error.
    pub fn scan_keys(&self) -> impl Stream<Item = CacheResult<String>> + '_ {
        let state = ScanState {
            pattern: format!("{}*", self.config.key_prefix),
            cursor: 0,
            buffer: VecDeque::new(),
            exhausted: false,
        };
        let page_size = self.config.scan_page_size;
        futures::stream::try_unfold(state, move |mut state| async move {
            loop {
                if let Some(key) = state.buffer.pop_front() {
                    return Ok(Some((key, state)));
                }
                if state.exhausted {
                    return Ok(None);
                }
                let page = self
                    .guarded(
                        self.transport
                            .scan(state.cursor, &state.pattern, page_size),
                    )
                    .await?;
                state.exhausted = page.cursor == 0;
                state.cursor = page.cursor;
                state.buffer = page
                    .keys
                    .iter()
                    .map(|key| self.logical_key(key))
                    .collect();
            }
        })
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.gate.state()
    }

    pub fn connection_snapshot(&self) -> ConnectionSnapshot {
        self.gate.snapshot()
    }

    /// Run one transport operation under the gate and the op timeout,
    /// reporting the outcome back to the gate.
    async fn guarded<R, F>(&self, op: F) -> TransportResult<R>
    where
        F: Future<Output = TransportResult<R>>,
    {
        self.gate.check()?;
        match tokio::time::timeout(self.op_timeout(), op).await {
            Ok(Ok(value)) => {
                self.gate.on_success();
                Ok(value)
            }
            Ok(Err(err)) => {
                self.gate.on_failure();
                Err(err)
            }
            Err(_) => {
                self.gate.on_failure();
                Err(TransportError::Timeout {
                    ms: self.config.op_timeout_ms,
                })
            }
        }
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.config.key_prefix, key)
    }

    fn logical_key(&self, storage_key: &str) -> String {
        storage_key
            .strip_prefix(&self.config.key_prefix)
            .unwrap_or(storage_key)
            .to_string()
    }

    fn effective_ttl(&self, requested: Option<Duration>) -> Duration {
        let default = Duration::from_secs(self.config.default_ttl_secs);
        let max = Duration::from_secs(self.config.max_ttl_secs);
        requested
            .unwrap_or(default)
            .min(max)
            .max(Duration::from_secs(1))
    }

    fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.config.op_timeout_ms)
    }
}

struct ScanState {
    pattern: String,
    cursor: u64,
    buffer: VecDeque<String>,
    exhausted: bool,
}
