pub mod config;
pub mod entry;

pub use config::{
    CacheConfig, DurableConfig, LoggingConfig, ReconnectConfig, SweepConfig, VolatileConfig,
};
pub use entry::CacheEntry;
