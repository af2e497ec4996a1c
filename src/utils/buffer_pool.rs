//! # Packet Buffer Pool
//!
//! Object pool for [`PacketBuffer`] instances to reduce allocation overhead
//! under packet churn.
//!
//! The protocol's ownership model is one buffer per in-flight packet, so a
//! busy server creates and drops buffers constantly; pooling keeps the
//! 5000-byte backing allocations alive between packets.
//!
//! ## Usage
//! ```rust
//! use packetbuf::utils::buffer_pool::PacketBufferPool;
//!
//! # fn main() -> packetbuf::Result<()> {
//! let pool = PacketBufferPool::new(100); // 100 buffers in pool
//! let mut buffer = pool.acquire();
//! buffer.write_short_be(42)?;
//! // Buffer automatically reset and returned to pool on drop
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex};

use crate::codec::buffer::PacketBuffer;

/// Buffers grown past this size are not returned to the pool.
const MAX_POOLED_CAPACITY: usize = 16 * 1024;

/// A pooled buffer that returns itself to the pool when dropped
pub struct PooledPacketBuffer {
    buffer: PacketBuffer,
    pool: Arc<Mutex<Vec<PacketBuffer>>>,
}

impl PooledPacketBuffer {
    /// Get the underlying buffer, consuming this wrapper. The buffer no
    /// longer returns to the pool.
    pub fn into_inner(mut self) -> PacketBuffer {
        std::mem::replace(&mut self.buffer, PacketBuffer::wrap(Vec::new()))
    }
}

impl Drop for PooledPacketBuffer {
    fn drop(&mut self) {
        let capacity = self.buffer.storage().len();
        if capacity == 0 || capacity > MAX_POOLED_CAPACITY {
            return;
        }
        let mut buffer = std::mem::replace(&mut self.buffer, PacketBuffer::wrap(Vec::new()));
        buffer.reset();
        if let Ok(mut pool) = self.pool.lock() {
            pool.push(buffer);
        }
    }
}

impl std::ops::Deref for PooledPacketBuffer {
    type Target = PacketBuffer;

    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

impl std::ops::DerefMut for PooledPacketBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}

/// Thread-safe pool of packet buffers
pub struct PacketBufferPool {
    pool: Arc<Mutex<Vec<PacketBuffer>>>,
}

impl PacketBufferPool {
    /// Create a new pool with `pool_size` pre-allocated buffers at the
    /// default capacity.
    pub fn new(pool_size: usize) -> Self {
        let mut pool = Vec::with_capacity(pool_size);

        for _ in 0..pool_size {
            pool.push(PacketBuffer::new());
        }

        Self {
            pool: Arc::new(Mutex::new(pool)),
        }
    }

    /// Acquire a buffer from the pool (or allocate a new one if the pool is
    /// empty).
    pub fn acquire(&self) -> PooledPacketBuffer {
        let buffer = if let Ok(mut pool) = self.pool.lock() {
            pool.pop().unwrap_or_default()
        } else {
            PacketBuffer::new()
        };

        PooledPacketBuffer {
            buffer,
            pool: self.pool.clone(),
        }
    }

    /// Get the current number of available buffers in the pool
    pub fn available(&self) -> usize {
        self.pool.lock().map(|p| p.len()).unwrap_or(0)
    }
}

impl Default for PacketBufferPool {
    fn default() -> Self {
        Self::new(50)
    }
}

impl Clone for PacketBufferPool {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn acquire_and_return() {
        let pool = PacketBufferPool::new(10);
        assert_eq!(pool.available(), 10);

        let mut buf = pool.acquire();
        assert_eq!(pool.available(), 9);

        buf.write_unsigned_byte(42).unwrap();
        assert_eq!(buf.written(), &[42]);

        drop(buf);
        assert_eq!(pool.available(), 10);
    }

    #[test]
    fn returned_buffers_come_back_clean() {
        let pool = PacketBufferPool::new(1);

        {
            let mut buf = pool.acquire();
            buf.write_bytes(b"test").unwrap();
            assert_eq!(buf.writer_index(), 4);
        }

        let buf = pool.acquire();
        assert_eq!(buf.writer_index(), 0);
        assert_eq!(buf.reader_index(), 0);
        assert!(buf.written().is_empty());
        assert!(buf.storage().iter().all(|&b| b == 0));
    }

    #[test]
    fn empty_pool_allocates_fresh_buffers() {
        let pool = PacketBufferPool::new(1);
        let _buf1 = pool.acquire();
        let _buf2 = pool.acquire();

        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn oversized_buffers_are_not_pooled() {
        let pool = PacketBufferPool::new(0);

        {
            let mut buf = pool.acquire();
            buf.ensure_capacity(MAX_POOLED_CAPACITY + 1);
        }

        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn into_inner_detaches_from_pool() {
        let pool = PacketBufferPool::new(1);
        let buf = pool.acquire();
        let inner = buf.into_inner();
        assert_eq!(inner.storage().len(), 5000);
        assert_eq!(pool.available(), 0);
    }
}
