//! # Codec Primitives
//!
//! Low-level field encoding and decoding for the legacy wire protocol.
//!
//! ## Components
//! - **Buffer**: packed byte buffer with independent read/write cursors and
//!   a sub-byte bit-packing channel
//! - **Identity**: base-37 rolling hash of short text identifiers
//!
//! ## Wire Format
//! Field layouts (which codec to call, in which order, for which packet
//! type) belong to the packet handlers sitting above this module; the
//! codecs here only guarantee that each individual field is byte-identical
//! to what the remote peer expects.

pub mod buffer;
pub mod identity;

pub use buffer::PacketBuffer;
pub use identity::identity_hash;
