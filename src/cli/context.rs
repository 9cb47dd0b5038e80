//! Shared command wiring.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::adapters::sqlite::{initialize_database, SqliteDurableStore};
use crate::adapters::volatile::{MemoryTransport, ReconnectPolicy, VolatileCache};
use crate::domain::models::CacheConfig;
use crate::infrastructure::config::ConfigLoader;
use crate::services::CacheOrchestrator;

/// The cache stack a command operates on.
///
/// Each CLI invocation runs against a fresh in-process volatile tier;
/// the durable tier is whatever the configured database holds.
pub struct CliContext {
    pub config: CacheConfig,
    pub orchestrator: Arc<CacheOrchestrator<SqliteDurableStore, MemoryTransport>>,
}

impl CliContext {
    pub async fn build(config: CacheConfig) -> Result<Self> {
        let pool = initialize_database(&config.durable)
            .await
            .context("Failed to open the durable store")?;

        let volatile = VolatileCache::new(
            Arc::new(MemoryTransport::new()),
            config.volatile.clone(),
            ReconnectPolicy::from(&config.reconnect),
        );
        let orchestrator = Arc::new(CacheOrchestrator::new(
            Arc::new(SqliteDurableStore::new(pool)),
            volatile,
        ));

        Ok(Self {
            config,
            orchestrator,
        })
    }
}

/// Resolve configuration for a command: an explicit file wins over the
/// project hierarchy.
pub fn load_config(path: Option<&Path>) -> Result<CacheConfig> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}
