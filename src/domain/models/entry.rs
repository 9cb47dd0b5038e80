//! Cache entry domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cached AI response, shared by both storage tiers.
///
/// The durable tier is the source of truth; the volatile tier holds a
/// serialized copy of the same record under a TTL. `id` doubles as the
/// primary key in both tiers and, in current usage, equals
/// `prompt_fingerprint`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Unique identifier; primary key in both tiers.
    pub id: String,
    /// Normalized fingerprint of the request that produced this response.
    pub prompt_fingerprint: String,
    /// The generated content, typically serialized JSON.
    pub payload: String,
    /// Generation configuration that produced the payload (model name,
    /// sampling parameters).
    pub model_tag: String,
    /// When the entry was stored. Serialized as integer epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Caller-owned annotations, opaque to the cache.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl CacheEntry {
    /// Create an entry keyed by its request fingerprint.
    pub fn new(
        fingerprint: impl Into<String>,
        payload: impl Into<String>,
        model_tag: impl Into<String>,
    ) -> Self {
        let fingerprint = fingerprint.into();
        Self {
            id: fingerprint.clone(),
            prompt_fingerprint: fingerprint,
            payload: payload.into(),
            model_tag: model_tag.into(),
            created_at: truncate_to_millis(Utc::now()),
            metadata: serde_json::Map::new(),
        }
    }

    /// Replace the metadata map.
    pub fn with_metadata(mut self, metadata: serde_json::Map<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Add a single metadata annotation.
    pub fn with_metadata_entry(
        mut self,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Override the creation timestamp. Used when replaying or backfilling
    /// entries with a known origin time.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = truncate_to_millis(created_at);
        self
    }

    /// True if the entry predates `cutoff` and falls outside the retention
    /// window that cutoff represents.
    pub fn is_older_than(&self, cutoff: DateTime<Utc>) -> bool {
        self.created_at < cutoff
    }
}

/// Both tiers persist timestamps as integer epoch milliseconds, so an
/// entry carries no finer precision than a round-trip can preserve.
fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or(at)
}
