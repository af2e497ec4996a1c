//! # Protocol Constants
//!
//! Centralized constants for the legacy wire protocol.
//!
//! The values here are fixed by the external protocol and must not change
//! between releases: peers on the other side of the socket hard-code the
//! same numbers.

/// Default backing storage size for a freshly created buffer, in bytes.
/// Large enough for any single outbound packet the protocol defines.
pub const DEFAULT_BUFFER_CAPACITY: usize = 5000;

/// Byte value terminating every encoded string field. Reserved exclusively
/// for this purpose; it must never appear unescaped inside a string payload.
pub const STRING_TERMINATOR: u8 = 10;

/// Radix of the rolling identity hash.
pub const HASH_RADIX: i128 = 37;

/// Identity hashing only considers this many leading characters.
pub const MAX_HASH_CHARS: usize = 12;
