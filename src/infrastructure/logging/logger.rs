use anyhow::Result;
use std::io;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::domain::models::LoggingConfig;

/// Logger implementation using tracing
///
/// Console output goes to stderr so stdout stays machine-readable for
/// the CLI. When `log_dir` is set, a daily-rotated JSON file is written
/// as well.
pub struct Logger {
    _guard: Option<WorkerGuard>,
}

impl Logger {
    /// Initialize the global subscriber from the given configuration.
    ///
    /// The returned instance must stay alive for the duration of the
    /// program; dropping it flushes and detaches the file writer.
    ///
    /// # Errors
    /// Returns an error if the configured level does not parse.
    pub fn init(config: &LoggingConfig) -> Result<Self> {
        let default_level = parse_log_level(&config.level)?;

        let env_filter = EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy();

        let guard = if let Some(ref log_dir) = config.log_dir {
            let file_appender = rolling::daily(log_dir, "inference-cache.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            // File output is always JSON for structured ingestion.
            let file_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking_file)
                .with_ansi(false)
                .with_target(true)
                .with_filter(env_filter.clone());

            match config.format.as_str() {
                "json" => {
                    let console_layer = tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(io::stderr)
                        .with_target(true)
                        .with_filter(env_filter);
                    tracing_subscriber::registry()
                        .with(file_layer)
                        .with(console_layer)
                        .init();
                }
                _ => {
                    let console_layer = tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(io::stderr)
                        .with_target(true)
                        .with_filter(env_filter);
                    tracing_subscriber::registry()
                        .with(file_layer)
                        .with(console_layer)
                        .init();
                }
            }

            Some(guard)
        } else {
            match config.format.as_str() {
                "json" => {
                    let console_layer = tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(io::stderr)
                        .with_target(true)
                        .with_filter(env_filter);
                    tracing_subscriber::registry().with(console_layer).init();
                }
                _ => {
                    let console_layer = tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(io::stderr)
                        .with_target(true)
                        .with_filter(env_filter);
                    tracing_subscriber::registry().with(console_layer).init();
                }
            }

            None
        };

        tracing::debug!(
            level = %config.level,
            format = %config.format,
            file_output = config.log_dir.is_some(),
            "logger initialized"
        );

        Ok(Self { _guard: guard })
    }
}

/// Parse log level string to Level
fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!("Invalid log level: {level}"),
    }
}
