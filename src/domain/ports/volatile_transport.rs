//! Volatile transport port.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failures raised by a volatile transport or by the connection layer
/// wrapping it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The backing store cannot be reached at all.
    #[error("volatile store unavailable: {0}")]
    Unavailable(String),

    /// A single operation exceeded its deadline.
    #[error("volatile operation timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The store was reached but the operation failed.
    #[error("volatile transport error: {0}")]
    Io(String),

    /// The connection layer has exhausted its reconnect budget and is
    /// failing fast until a recovery probe succeeds.
    #[error("volatile tier degraded, failing fast")]
    Degraded,
}

pub type TransportResult<T> = Result<T, TransportError>;

/// One page of a cursor-driven key scan.
///
/// A returned cursor of `0` means iteration is complete; any other value is
/// passed back verbatim to fetch the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPage {
    pub cursor: u64,
    pub keys: Vec<String>,
}

/// Remaining lifetime of a volatile key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    /// Key exists and expires after this duration.
    Remaining(Duration),
    /// Key exists but was written without an expiration.
    NoExpiry,
    /// Key does not exist (never written, expired, or deleted).
    Missing,
}

/// Raw key/value transport beneath the volatile cache.
///
/// Implementations perform single attempts only. Retries, timeouts, and
/// connection state are layered on top by the volatile cache adapter, so a
/// transport stays honest about every failure it sees.
#[async_trait]
pub trait VolatileTransport: Send + Sync {
    /// Liveness probe.
    async fn ping(&self) -> TransportResult<()>;

    /// Fetch the value stored under `key`, if any.
    async fn get(&self, key: &str) -> TransportResult<Option<String>>;

    /// Store `value` under `key` with an expiration.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> TransportResult<()>;

    /// Remove `key`. Removing an absent key is a success.
    async fn del(&self, key: &str) -> TransportResult<()>;

    /// Fetch one page of keys matching a glob `pattern`, starting from
    /// `cursor` (`0` to begin). `count` is a page-size hint.
    async fn scan(&self, cursor: u64, pattern: &str, count: u32) -> TransportResult<ScanPage>;

    /// Remaining lifetime of `key`.
    async fn ttl(&self, key: &str) -> TransportResult<KeyTtl>;
}
