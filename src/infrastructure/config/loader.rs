use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::CacheConfig;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid TTL bounds: default_ttl_secs ({0}) must not exceed max_ttl_secs ({1})")]
    InvalidTtlBounds(u64, u64),

    #[error(
        "Invalid max_ttl_secs: {0} exceeds retention_secs ({1}); a volatile entry must never outlive its durable row"
    )]
    TtlExceedsRetention(u64, u64),

    #[error("Invalid op_timeout_ms: {0}. Must be at least 1")]
    InvalidOpTimeout(u64),

    #[error("Invalid scan_page_size: {0}. Must be at least 1")]
    InvalidScanPageSize(u32),

    #[error("Volatile key_prefix cannot be empty")]
    EmptyKeyPrefix,

    #[error("Invalid max_attempts: {0}. Must be at least 1")]
    InvalidMaxAttempts(u32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid sweep_batch_size: {0}. Must be at least 1")]
    InvalidBatchSize(u32),

    #[error("Invalid sweep interval_secs: {0}. Must be at least 1")]
    InvalidSweepInterval(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .inference-cache/config.yaml (project config)
    /// 3. .inference-cache/local.yaml (local overrides, optional)
    /// 4. Environment variables (INFERENCE_CACHE_* prefix, highest priority)
    ///
    /// Configuration is always project-local (pwd/.inference-cache/) so
    /// several caches can coexist on one machine.
    pub fn load() -> Result<CacheConfig> {
        let config: CacheConfig = Figment::new()
            .merge(Serialized::defaults(CacheConfig::default()))
            .merge(Yaml::file(".inference-cache/config.yaml"))
            .merge(Yaml::file(".inference-cache/local.yaml"))
            .merge(Env::prefixed("INFERENCE_CACHE_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<CacheConfig> {
        let config: CacheConfig = Figment::new()
            .merge(Serialized::defaults(CacheConfig::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &CacheConfig) -> Result<(), ConfigError> {
        // Volatile tier
        if config.volatile.default_ttl_secs > config.volatile.max_ttl_secs {
            return Err(ConfigError::InvalidTtlBounds(
                config.volatile.default_ttl_secs,
                config.volatile.max_ttl_secs,
            ));
        }

        if config.volatile.max_ttl_secs > config.durable.retention_secs {
            return Err(ConfigError::TtlExceedsRetention(
                config.volatile.max_ttl_secs,
                config.durable.retention_secs,
            ));
        }

        if config.volatile.op_timeout_ms == 0 {
            return Err(ConfigError::InvalidOpTimeout(config.volatile.op_timeout_ms));
        }

        if config.volatile.scan_page_size == 0 {
            return Err(ConfigError::InvalidScanPageSize(
                config.volatile.scan_page_size,
            ));
        }

        // An empty prefix would put every key in the transport inside the
        // sweep's blast radius.
        if config.volatile.key_prefix.is_empty() {
            return Err(ConfigError::EmptyKeyPrefix);
        }

        // Reconnect policy
        if config.reconnect.max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts(config.reconnect.max_attempts));
        }

        if config.reconnect.initial_backoff_ms >= config.reconnect.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.reconnect.initial_backoff_ms,
                config.reconnect.max_backoff_ms,
            ));
        }

        // Durable tier
        if config.durable.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.durable.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.durable.max_connections,
            ));
        }

        if config.durable.sweep_batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(config.durable.sweep_batch_size));
        }

        // Sweep schedule
        if config.sweep.interval_secs == 0 {
            return Err(ConfigError::InvalidSweepInterval(config.sweep.interval_secs));
        }

        // Logging
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}
