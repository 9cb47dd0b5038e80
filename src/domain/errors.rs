//! Domain errors for the tiered response cache.

use thiserror::Error;

use crate::domain::ports::TransportError;

/// Format per-tier delete failures as a human-readable string:
/// `volatile: <reason>; durable: <reason>`.
fn format_tier_failures(volatile: &Option<String>, durable: &Option<String>) -> String {
    let mut parts = Vec::new();
    if let Some(reason) = volatile {
        parts.push(format!("volatile: {reason}"));
    }
    if let Some(reason) = durable {
        parts.push(format!("durable: {reason}"));
    }
    parts.join("; ")
}

/// Errors surfaced by the cache to its callers.
///
/// Callers only ever observe a value, an absence (`Ok(None)`), or one of
/// these operation failures. Expected misses are never errors.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Durable store error: {0}")]
    Durable(String),

    #[error("Volatile tier error: {0}")]
    Volatile(#[from] TransportError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Delete failed: {}", format_tier_failures(.volatile, .durable))]
    DeleteFailed {
        volatile: Option<String>,
        durable: Option<String>,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

impl CacheError {
    /// Aggregate per-tier delete outcomes: `Ok(())` only when both tiers
    /// succeeded, otherwise a single error naming every tier that failed.
    pub fn from_delete_outcomes(
        volatile: Option<String>,
        durable: Option<String>,
    ) -> CacheResult<()> {
        if volatile.is_none() && durable.is_none() {
            Ok(())
        } else {
            Err(CacheError::DeleteFailed { volatile, durable })
        }
    }
}

impl From<sqlx::Error> for CacheError {
    fn from(err: sqlx::Error) -> Self {
        CacheError::Durable(err.to_string())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}
