//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that storage adapters must implement:
//! - DurableStore: source-of-truth persistence for cache entries
//! - VolatileTransport: raw key/value operations for the volatile tier
//!
//! These traits define the contracts that allow the domain to be independent
//! of sqlx and of any particular key/value backend.

pub mod durable_store;
pub mod volatile_transport;

pub use durable_store::DurableStore;
pub use volatile_transport::{
    KeyTtl, ScanPage, TransportError, TransportResult, VolatileTransport,
};
