//! # packetbuf
//!
//! Binary buffer abstraction for a legacy client/server protocol:
//! bit-level field packing, protocol-specific integer encodings
//! (byte-inverted, offset-by-128, mixed endianness), dynamic buffer growth,
//! and the deterministic username hash used for identity lookup.
//!
//! Socket I/O, packet dispatch, and session management live outside this
//! crate; it provides only the codec primitive those layers build on.
//!
//! ## Quick Start
//! ```rust
//! use packetbuf::{identity_hash, PacketBuffer};
//!
//! # fn main() -> packetbuf::Result<()> {
//! let mut buf = PacketBuffer::new();
//! buf.write_long_be(identity_hash("player one"))?;
//! buf.write_string("hello")?;
//!
//! buf.open_bit_channel()?;
//! buf.write_bits(11, 0x4AB)?;
//! buf.write_bits(5, 3)?;
//! buf.close_bit_channel()?;
//!
//! let wire = buf.written();
//! # assert_eq!(wire.len(), 8 + 6 + 2);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod utils;

pub use codec::buffer::PacketBuffer;
pub use codec::identity::identity_hash;
pub use error::{CodecError, Result};
