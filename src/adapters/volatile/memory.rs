//! In-process volatile transport.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::domain::ports::{KeyTtl, ScanPage, TransportError, TransportResult, VolatileTransport};

#[derive(Clone)]
struct StoredValue {
    value: String,
    /// None for keys written without an expiration.
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// HashMap-backed implementation of [`VolatileTransport`].
///
/// The default volatile tier for single-process deployments and tests.
/// Expired keys are dropped lazily on read; the eviction sweep reclaims
/// whatever reads never touch.
#[derive(Default)]
pub struct MemoryTransport {
    entries: RwLock<HashMap<String, StoredValue>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a key with no expiration, the way a misbehaving or older
    /// client would. The eviction sweep is responsible for these.
    pub fn set_persistent(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                key.to_string(),
                StoredValue {
                    value: value.to_string(),
                    expires_at: None,
                },
            );
        }
    }

    /// Number of live (unexpired) keys.
    pub fn live_key_count(&self) -> usize {
        self.entries
            .read()
            .map(|entries| entries.values().filter(|v| !v.is_expired()).count())
            .unwrap_or(0)
    }

    fn read_entries(
        &self,
    ) -> TransportResult<std::sync::RwLockReadGuard<'_, HashMap<String, StoredValue>>> {
        self.entries
            .read()
            .map_err(|_| TransportError::Io("store lock poisoned".to_string()))
    }

    fn write_entries(
        &self,
    ) -> TransportResult<std::sync::RwLockWriteGuard<'_, HashMap<String, StoredValue>>> {
        self.entries
            .write()
            .map_err(|_| TransportError::Io("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl VolatileTransport for MemoryTransport {
    async fn ping(&self) -> TransportResult<()> {
        self.read_entries().map(|_| ())
    }

    async fn get(&self, key: &str) -> TransportResult<Option<String>> {
        let mut entries = self.write_entries()?;
        match entries.get(key) {
            Some(stored) if stored.is_expired() => {
                entries.remove(key);
                Ok(None)
            }
            Some(stored) => Ok(Some(stored.value.clone())),
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> TransportResult<()> {
        let mut entries = self.write_entries()?;
        entries.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn del(&self, key: &str) -> TransportResult<()> {
        let mut entries = self.write_entries()?;
        entries.remove(key);
        Ok(())
    }

    async fn scan(&self, cursor: u64, pattern: &str, count: u32) -> TransportResult<ScanPage> {
        let entries = self.read_entries()?;
        // Sorted order makes the cursor stable across pages even though the
        // map itself iterates in arbitrary order.
        let mut all_keys: Vec<&String> = entries.keys().collect();
        all_keys.sort();

        let start = usize::try_from(cursor)
            .map_err(|_| TransportError::Io(format!("invalid scan cursor: {cursor}")))?;
        let page_len = count.max(1) as usize;
        let window = all_keys.iter().skip(start).take(page_len);

        let keys = window
            .filter(|key| glob_match(pattern, key))
            .filter(|key| entries.get(**key).is_some_and(|v| !v.is_expired()))
            .map(|key| (*key).clone())
            .collect();

        let consumed = start.saturating_add(page_len);
        let next_cursor = if consumed >= all_keys.len() {
            0
        } else {
            consumed as u64
        };

        Ok(ScanPage {
            cursor: next_cursor,
            keys,
        })
    }

    async fn ttl(&self, key: &str) -> TransportResult<KeyTtl> {
        let entries = self.read_entries()?;
        Ok(match entries.get(key) {
            None => KeyTtl::Missing,
            Some(stored) if stored.is_expired() => KeyTtl::Missing,
            Some(StoredValue {
                expires_at: None, ..
            }) => KeyTtl::NoExpiry,
            Some(StoredValue {
                expires_at: Some(at),
                ..
            }) => KeyTtl::Remaining(at.saturating_duration_since(Instant::now())),
        })
    }
}

/// Match `text` against a glob `pattern` where `*` matches any run of
/// characters. No other metacharacters are supported.
fn glob_match(pattern: &str, text: &str) -> bool {
    let mut segments = pattern.split('*');

    // Text before the first `*` must anchor at the start.
    let Some(first) = segments.next() else {
        return pattern == text;
    };
    let Some(mut rest) = text.strip_prefix(first) else {
        return false;
    };

    let segments: Vec<&str> = segments.collect();
    if segments.is_empty() {
        // No `*` at all: exact match required.
        return rest.is_empty();
    }

    for (i, segment) in segments.iter().enumerate() {
        let is_last = i == segments.len() - 1;
        if is_last {
            return segment.is_empty() || rest.ends_with(segment);
        }
        match rest.find(segment) {
            Some(pos) => rest = &rest[pos + segment.len()..],
            None => return false,
        }
    }
    true
}
