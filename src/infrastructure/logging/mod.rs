//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - pretty or JSON console output on stderr
//! - optional daily-rotated JSON file output

pub mod logger;

pub use logger::Logger;
