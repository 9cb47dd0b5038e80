//! inference-cache - Tiered cache for AI-generated responses
//!
//! A two-tier read-through/write-through cache: a fast volatile tier with
//! per-key TTLs in front of a durable SQLite tier that is the source of
//! truth. Requests are keyed by deterministic fingerprints of their
//! normalized parameters, so identical prompts reuse prior generations.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, port traits, fingerprints, errors
//! - **Adapters** (`adapters`): SQLite durable store, volatile transports
//! - **Service Layer** (`services`): cache orchestrator and eviction scheduler
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use inference_cache::adapters::sqlite::{initialize_database, SqliteDurableStore};
//! use inference_cache::adapters::volatile::{MemoryTransport, ReconnectPolicy, VolatileCache};
//! use inference_cache::domain::fingerprint::{Fingerprintable, InferenceRequest};
//! use inference_cache::domain::models::{CacheConfig, CacheEntry};
//! use inference_cache::services::CacheOrchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = CacheConfig::default();
//!     let pool = initialize_database(&config.durable).await?;
//!     let volatile = VolatileCache::new(
//!         Arc::new(MemoryTransport::new()),
//!         config.volatile.clone(),
//!         ReconnectPolicy::from(&config.reconnect),
//!     );
//!     let cache = CacheOrchestrator::new(Arc::new(SqliteDurableStore::new(pool)), volatile);
//!
//!     let request = InferenceRequest::new("why is the sky blue", "openai");
//!     let entry = CacheEntry::new(request.fingerprint(), "blue light scatters", request.model_tag());
//!     let id = cache.store(entry).await?;
//!     assert!(cache.get(&id).await?.is_some());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::fingerprint::{Fingerprintable, InferenceRequest, MealPlanRequest, StoryRequest};
pub use domain::models::{
    CacheConfig, CacheEntry, DurableConfig, LoggingConfig, ReconnectConfig, SweepConfig,
    VolatileConfig,
};
pub use domain::ports::{DurableStore, KeyTtl, ScanPage, TransportError, VolatileTransport};
pub use domain::{CacheError, CacheResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{CacheOrchestrator, CacheStatsSnapshot, EvictionScheduler, SweepReport};
