//! Service layer: tier coordination and background maintenance.

pub mod eviction;
pub mod orchestrator;

pub use eviction::{EvictionScheduler, SchedulerStatus, SweepReport};
pub use orchestrator::{CacheOrchestrator, CacheStats, CacheStatsSnapshot};
