//! Domain layer for the tiered response cache
//!
//! This module contains core business logic and domain models.

pub mod errors;
pub mod fingerprint;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{CacheError, CacheResult};
