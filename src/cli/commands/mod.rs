//! CLI command implementations.

pub mod get;
pub mod stats;
pub mod sweep;
