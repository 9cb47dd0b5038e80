use serde::{Deserialize, Serialize};

/// Main configuration structure for the cache
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// Volatile tier configuration
    #[serde(default)]
    pub volatile: VolatileConfig,

    /// Volatile tier reconnection policy
    #[serde(default)]
    pub reconnect: ReconnectConfig,

    /// Durable tier configuration
    #[serde(default)]
    pub durable: DurableConfig,

    /// Eviction sweep configuration
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Volatile tier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VolatileConfig {
    /// TTL applied when a caller does not request one, in seconds
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,

    /// Upper bound on any requested TTL, in seconds. Never exceeds the
    /// durable retention window.
    #[serde(default = "default_max_ttl_secs")]
    pub max_ttl_secs: u64,

    /// Namespace prefix prepended to every volatile key
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Per-operation transport timeout in milliseconds
    #[serde(default = "default_op_timeout_ms")]
    pub op_timeout_ms: u64,

    /// Keys requested per cursor page when scanning the namespace
    #[serde(default = "default_scan_page_size")]
    pub scan_page_size: u32,
}

const fn default_ttl_secs() -> u64 {
    3600
}

const fn default_max_ttl_secs() -> u64 {
    86_400
}

fn default_key_prefix() -> String {
    "ai-response:".to_string()
}

const fn default_op_timeout_ms() -> u64 {
    2000
}

const fn default_scan_page_size() -> u32 {
    100
}

impl Default for VolatileConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_ttl_secs(),
            max_ttl_secs: default_max_ttl_secs(),
            key_prefix: default_key_prefix(),
            op_timeout_ms: default_op_timeout_ms(),
            scan_page_size: default_scan_page_size(),
        }
    }
}

/// Reconnection policy for the volatile tier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReconnectConfig {
    /// Reconnect attempts before giving up into degraded mode
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds. Also the interval between
    /// degraded-mode recovery probes.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_attempts() -> u32 {
    5
}

const fn default_initial_backoff_ms() -> u64 {
    200
}

const fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Durable tier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DurableConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Age past which entries are reclaimed, in seconds
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,

    /// Rows deleted per retention batch
    #[serde(default = "default_sweep_batch_size")]
    pub sweep_batch_size: u32,
}

fn default_database_path() -> String {
    ".inference-cache/cache.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_retention_secs() -> u64 {
    7 * 24 * 3600
}

const fn default_sweep_batch_size() -> u32 {
    500
}

impl Default for DurableConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
            retention_secs: default_retention_secs(),
            sweep_batch_size: default_sweep_batch_size(),
        }
    }
}

/// Eviction sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SweepConfig {
    /// Seconds between scheduled sweeps
    #[serde(default = "default_sweep_interval_secs")]
    pub interval_secs: u64,

    /// Run a sweep immediately when the scheduler starts
    #[serde(default = "default_run_on_start")]
    pub run_on_start: bool,
}

const fn default_sweep_interval_secs() -> u64 {
    86_400
}

const fn default_run_on_start() -> bool {
    true
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_sweep_interval_secs(),
            run_on_start: default_run_on_start(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
