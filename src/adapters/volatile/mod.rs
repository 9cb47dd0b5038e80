//! Volatile (fast) tier: transport implementations and the gated
//! cache wrapper that the orchestrator talks to.

pub mod cache;
pub mod connection;
pub mod memory;

pub use cache::VolatileCache;
pub use connection::{ConnectionGate, ConnectionSnapshot, ConnectionState, ReconnectPolicy};
pub use memory::MemoryTransport;
