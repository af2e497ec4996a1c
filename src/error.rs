//! # Error Types
//!
//! Error handling for the packet codec.
//!
//! This module defines all error variants that can occur while encoding or
//! decoding packet fields, from out-of-bounds reads to bit-channel misuse.
//!
//! ## Error Categories
//! - **Bounds faults**: a read span exceeds the backing storage
//! - **Malformed data**: a string field with no terminator byte
//! - **Channel misuse**: byte-aligned writes while the bit channel is open
//!
//! The codec performs no recovery and no logging on the error path; every
//! fault surfaces immediately to the caller, who owns the retry or abort
//! decision (typically dropping the malformed packet).
//!
//! ## Example Usage
//! ```rust
//! use packetbuf::error::{CodecError, Result};
//! use packetbuf::PacketBuffer;
//!
//! fn decode_login(buf: &mut PacketBuffer) -> Result<(String, i16)> {
//!     let username = buf.read_string()?;
//!     let revision = buf.read_short_be()?;
//!     Ok((username, revision))
//! }
//!
//! let mut buf = PacketBuffer::wrap(vec![b'a', 10]);
//! match decode_login(&mut buf) {
//!     Ok((name, rev)) => println!("{name} @ {rev}"),
//!     Err(CodecError::Bounds { .. }) => println!("truncated packet"),
//!     Err(e) => println!("bad packet: {e}"),
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// CodecError is the primary error type for all buffer operations
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodecError {
    #[error("read of {requested} bytes at offset {offset} exceeds storage ({available} readable)")]
    Bounds {
        offset: usize,
        requested: usize,
        available: usize,
    },

    #[error("string terminator (byte 10) not found before end of storage")]
    MissingTerminator,

    #[error("byte-aligned write attempted while the bit channel is open")]
    BitChannelOpen,

    #[error("bit-level write attempted while the bit channel is closed")]
    BitChannelClosed,

    #[error("bit count {0} out of range (expected 1..=32)")]
    InvalidBitCount(usize),
}

/// Type alias for Results using CodecError
pub type Result<T> = std::result::Result<T, CodecError>;
