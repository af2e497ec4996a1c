//! # Utility Modules
//!
//! Supporting utilities layered on top of the codec primitives.
//!
//! ## Components
//! - **Buffer Pool**: thread-safe reuse of packet buffers under churn

pub mod buffer_pool;

// Re-export public types for advanced users
pub use buffer_pool::{PacketBufferPool, PooledPacketBuffer};
