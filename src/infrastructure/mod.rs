//! Infrastructure layer module
//!
//! Cross-cutting concerns that sit outside the domain:
//! - Configuration loading and validation (figment)
//! - Logging setup (tracing)

pub mod config;
pub mod logging;
