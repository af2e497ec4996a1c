//! # Packed Byte Buffer
//!
//! Read/write cursor over a growable byte sequence, implementing the field
//! codecs of the legacy wire protocol.
//!
//! ## Wire Conventions
//! - All multi-byte integers are big-endian, except the two explicitly
//!   little-endian "offset short" variants.
//! - Offset encodings bias a value by +128 before transmission.
//! - Strings are raw bytes terminated by byte value 10.
//!
//! ## Cursors
//! The write cursor and read cursor advance independently, which supports
//! write-then-read-back within one buffer as well as read-only buffers
//! wrapping received data. The write cursor can be repositioned explicitly
//! to patch a previously reserved length field.
//!
//! ## Bit Channel
//! Sub-byte fields are produced through an alternate write mode sharing the
//! same storage. [`PacketBuffer::open_bit_channel`] switches the buffer to
//! bit-granularity writes and [`PacketBuffer::close_bit_channel`] collapses
//! the bit cursor back into the byte cursor. Byte-aligned writes while the
//! channel is open are rejected with [`CodecError::BitChannelOpen`] rather
//! than corrupting output. There is no bit-level read; bit fields are
//! write-only from this buffer's perspective.

use crate::config::{DEFAULT_BUFFER_CAPACITY, STRING_TERMINATOR};
use crate::error::{CodecError, Result};
use tracing::trace;

/// Entry `i` holds the mask covering the low `i` bits.
const BIT_MASKS: [u32; 32] = {
    let mut masks = [0u32; 32];
    let mut bit = 0;
    while bit < 32 {
        masks[bit] = (1u32 << bit) - 1;
        bit += 1;
    }
    masks
};

/// Which write channel currently owns the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    ByteAligned,
    BitAligned,
}

/// Stateful byte buffer with independent read/write cursors and an
/// alternate bit-packing write channel.
///
/// A buffer is created either empty with zero-filled storage
/// ([`PacketBuffer::new`], [`PacketBuffer::with_capacity`]) or wrapping
/// bytes received from the outside ([`PacketBuffer::wrap`]). One buffer per
/// in-flight packet, owned by exactly one producer or consumer at a time;
/// instances are not safe for concurrent mutation.
#[derive(Debug, Clone)]
pub struct PacketBuffer {
    storage: Vec<u8>,
    writer_index: usize,
    reader_index: usize,
    bit_index: usize,
    mode: WriteMode,
}

impl PacketBuffer {
    /// Create an empty buffer with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY)
    }

    /// Create an empty buffer backed by `capacity` zero-filled bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::wrap(vec![0; capacity])
    }

    /// Take ownership of an existing byte sequence, cursors at zero. Used
    /// for buffers built from already-received data.
    pub fn wrap(bytes: Vec<u8>) -> Self {
        Self {
            storage: bytes,
            writer_index: 0,
            reader_index: 0,
            bit_index: 0,
            mode: WriteMode::ByteAligned,
        }
    }

    // ------------------------------------------------------------------
    // Capacity
    // ------------------------------------------------------------------

    /// Make sure the storage keeps at least `required` bytes beyond the
    /// read cursor. When it does not, the storage is replaced by a
    /// zero-filled allocation of exactly `required` bytes and the written
    /// prefix is carried over.
    ///
    /// Callers pass `writer_index + bytes_about_to_be_written`. The
    /// comparison is against the *readable* span, not write headroom; the
    /// peer implementation has always sized growth this way and downstream
    /// code relies on it.
    pub fn ensure_capacity(&mut self, required: usize) {
        if self.readable() < required {
            trace!(
                old_len = self.storage.len(),
                new_len = required,
                "reallocating buffer storage"
            );
            let mut grown = vec![0u8; required];
            let live = self.writer_index.min(required);
            grown[..live].copy_from_slice(&self.storage[..live]);
            self.storage = grown;
        }
    }

    // ------------------------------------------------------------------
    // Byte-aligned writes
    // ------------------------------------------------------------------

    fn check_byte_mode(&self) -> Result<()> {
        if self.mode == WriteMode::BitAligned {
            return Err(CodecError::BitChannelOpen);
        }
        Ok(())
    }

    /// Append raw bytes at the write cursor, growing storage as needed.
    pub fn write_bytes(&mut self, source: &[u8]) -> Result<()> {
        self.check_byte_mode()?;
        self.ensure_capacity(self.writer_index + source.len());
        self.storage[self.writer_index..self.writer_index + source.len()]
            .copy_from_slice(source);
        self.writer_index += source.len();
        Ok(())
    }

    /// Append the written prefix of another buffer.
    pub fn write_buffer(&mut self, source: &PacketBuffer) -> Result<()> {
        self.write_bytes(source.written())
    }

    /// Append a signed byte as-is.
    pub fn write_byte(&mut self, value: i8) -> Result<()> {
        self.write_bytes(&[value as u8])
    }

    /// Append a signed byte, negated before transmission.
    pub fn write_byte_inverted(&mut self, value: i8) -> Result<()> {
        self.write_byte(value.wrapping_neg())
    }

    /// Append an unsigned byte.
    pub fn write_unsigned_byte(&mut self, value: u8) -> Result<()> {
        self.write_bytes(&[value])
    }

    /// Append `128 - value` as an unsigned byte.
    pub fn write_negative_offset_byte(&mut self, value: u8) -> Result<()> {
        self.write_unsigned_byte(128u8.wrapping_sub(value))
    }

    /// Append a signed 16-bit integer, big-endian.
    pub fn write_short_be(&mut self, value: i16) -> Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    /// Append a 16-bit integer with the low byte biased by +128,
    /// big-endian byte order.
    pub fn write_offset_short_be(&mut self, value: i16) -> Result<()> {
        self.write_unsigned_byte((value >> 8) as u8)?;
        self.write_unsigned_byte((value as i32 + 128) as u8)
    }

    /// Append a 16-bit integer with the low byte biased by +128,
    /// little-endian byte order.
    pub fn write_offset_short_le(&mut self, value: i16) -> Result<()> {
        self.write_unsigned_byte((value as i32 + 128) as u8)?;
        self.write_unsigned_byte((value >> 8) as u8)
    }

    /// Append a signed 32-bit integer, big-endian.
    pub fn write_int_be(&mut self, value: i32) -> Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    /// Append a signed 64-bit integer, big-endian.
    pub fn write_long_be(&mut self, value: i64) -> Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    /// Append the raw bytes of `value` followed by the terminator byte.
    ///
    /// The terminator (byte 10) is reserved by the protocol; callers must
    /// not pass text containing it.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_bytes(value.as_bytes())?;
        self.write_unsigned_byte(STRING_TERMINATOR)
    }

    // ------------------------------------------------------------------
    // Byte-aligned reads
    // ------------------------------------------------------------------

    fn check_readable(&self, width: usize) -> Result<()> {
        if self.reader_index + width > self.storage.len() {
            return Err(CodecError::Bounds {
                offset: self.reader_index,
                requested: width,
                available: self.storage.len().saturating_sub(self.reader_index),
            });
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.check_readable(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.storage[self.reader_index..self.reader_index + N]);
        self.reader_index += N;
        Ok(out)
    }

    /// Consume one unsigned byte.
    pub fn read_unsigned_byte(&mut self) -> Result<u8> {
        Ok(self.take::<1>()?[0])
    }

    /// Consume one signed byte.
    pub fn read_byte(&mut self) -> Result<i8> {
        Ok(self.read_unsigned_byte()? as i8)
    }

    /// Consume one byte and undo the `128 - value` bias.
    pub fn read_negative_offset_byte(&mut self) -> Result<i32> {
        Ok(128 - self.read_unsigned_byte()? as i32)
    }

    /// Consume a signed 16-bit integer, big-endian.
    pub fn read_short_be(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.take()?))
    }

    /// Consume an unsigned 16-bit integer, big-endian.
    pub fn read_unsigned_short_be(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.take()?))
    }

    /// Consume a 16-bit integer written with the low byte biased by +128,
    /// little-endian byte order, reinterpreting values above 32767 as
    /// signed.
    pub fn read_negative_offset_short_le(&mut self) -> Result<i16> {
        let low = self.read_unsigned_byte()?.wrapping_sub(128);
        let high = self.read_unsigned_byte()?;
        Ok(i16::from_le_bytes([low, high]))
    }

    /// Consume a signed 32-bit integer, big-endian.
    pub fn read_int_be(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.take()?))
    }

    /// Consume a signed 64-bit integer, big-endian.
    pub fn read_long_be(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(self.take()?))
    }

    /// Consume bytes up to (and excluding) the terminator byte and decode
    /// them as text. The terminator is consumed but not returned.
    ///
    /// Fails with [`CodecError::MissingTerminator`] when the storage ends
    /// before a terminator shows up.
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.reader_index;
        while self.reader_index < self.storage.len() {
            let b = self.storage[self.reader_index];
            self.reader_index += 1;
            if b == STRING_TERMINATOR {
                let text = &self.storage[start..self.reader_index - 1];
                return Ok(String::from_utf8_lossy(text).into_owned());
            }
        }
        Err(CodecError::MissingTerminator)
    }

    /// Consume `length` bytes starting at the read cursor.
    ///
    /// The returned span runs one byte past the requested length whenever
    /// the storage extends that far; the read cursor still advances by
    /// exactly `length`. Peers have always sliced this way, so decoders
    /// that index into the result depend on the extra byte being present.
    pub fn read_bytes(&mut self, length: usize) -> Result<Vec<u8>> {
        self.check_readable(length)?;
        let end = (self.reader_index + length + 1).min(self.storage.len());
        let span = self.storage[self.reader_index..end].to_vec();
        self.reader_index += length;
        Ok(span)
    }

    // ------------------------------------------------------------------
    // Bit channel
    // ------------------------------------------------------------------

    /// Switch the buffer to bit-granularity writes, anchoring the bit
    /// cursor at the current write cursor.
    pub fn open_bit_channel(&mut self) -> Result<()> {
        if self.mode == WriteMode::BitAligned {
            return Err(CodecError::BitChannelOpen);
        }
        self.bit_index = self.writer_index * 8;
        self.mode = WriteMode::BitAligned;
        trace!(bit_index = self.bit_index, "bit channel opened");
        Ok(())
    }

    /// Return to byte-granularity writes, rounding the write cursor up to
    /// just past the last touched bit byte.
    pub fn close_bit_channel(&mut self) -> Result<()> {
        if self.mode != WriteMode::BitAligned {
            return Err(CodecError::BitChannelClosed);
        }
        self.writer_index = (self.bit_index + 7) / 8;
        self.mode = WriteMode::ByteAligned;
        trace!(writer_index = self.writer_index, "bit channel closed");
        Ok(())
    }

    /// Write the low `count` bits of `value` at the bit cursor, most
    /// significant bit first, packing across byte boundaries as needed.
    ///
    /// Each partially covered byte has its target bit range cleared before
    /// the new bits are OR'd in; bits outside the range are preserved.
    /// Valid only while the bit channel is open, for `count` in `1..=32`.
    pub fn write_bits(&mut self, count: usize, value: u32) -> Result<()> {
        if self.mode != WriteMode::BitAligned {
            return Err(CodecError::BitChannelClosed);
        }
        if count == 0 || count > 32 {
            return Err(CodecError::InvalidBitCount(count));
        }

        self.ensure_capacity(self.writer_index + (count + 7) / 8 + 1);

        let mut byte_index = self.bit_index >> 3;
        let mut bit_offset = 8 - (self.bit_index & 7);

        // Growth is sized from the byte-mode write cursor, which goes stale
        // while the channel is open. Refuse to drop bits when the sizing
        // falls short.
        let end_byte = (self.bit_index + count + 7) >> 3;
        if end_byte > self.storage.len() {
            return Err(CodecError::Bounds {
                offset: byte_index,
                requested: end_byte - byte_index,
                available: self.storage.len().saturating_sub(byte_index),
            });
        }

        self.bit_index += count;
        let mut count = count;

        while count > bit_offset {
            self.storage[byte_index] &= !(BIT_MASKS[bit_offset] as u8);
            self.storage[byte_index] |=
                ((value >> (count - bit_offset)) & BIT_MASKS[bit_offset]) as u8;
            byte_index += 1;
            count -= bit_offset;
            bit_offset = 8;
        }

        if count == bit_offset {
            self.storage[byte_index] &= !(BIT_MASKS[bit_offset] as u8);
            self.storage[byte_index] |= (value & BIT_MASKS[bit_offset]) as u8;
        } else {
            self.storage[byte_index] &= !((BIT_MASKS[count] << (bit_offset - count)) as u8);
            self.storage[byte_index] |= ((value & BIT_MASKS[count]) << (bit_offset - count)) as u8;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Bytes remaining between the read cursor and the end of storage.
    pub fn readable(&self) -> usize {
        self.storage.len().saturating_sub(self.reader_index)
    }

    /// Bytes remaining between the write cursor and the end of storage.
    pub fn writable(&self) -> usize {
        self.storage.len().saturating_sub(self.writer_index)
    }

    /// The full backing storage, including bytes past both cursors.
    pub fn storage(&self) -> &[u8] {
        &self.storage
    }

    /// The logically written prefix, up to the write cursor.
    pub fn written(&self) -> &[u8] {
        &self.storage[..self.writer_index.min(self.storage.len())]
    }

    /// The unread suffix, from the read cursor to the end of storage.
    pub fn unread(&self) -> &[u8] {
        &self.storage[self.reader_index.min(self.storage.len())..]
    }

    /// Current write cursor position.
    pub fn writer_index(&self) -> usize {
        self.writer_index
    }

    /// Current read cursor position.
    pub fn reader_index(&self) -> usize {
        self.reader_index
    }

    /// Reposition the write cursor, typically to patch a reserved length
    /// field once the payload length is known.
    pub fn set_writer_index(&mut self, position: usize) {
        self.writer_index = position;
    }

    /// Reset the buffer for reuse: zero the touched prefix, rewind both
    /// cursors, and close the bit channel.
    pub fn reset(&mut self) {
        let mut touched = self.writer_index;
        if self.mode == WriteMode::BitAligned {
            touched = touched.max((self.bit_index + 7) / 8);
        }
        let touched = touched.min(self.storage.len());
        self.storage[..touched].fill(0);
        self.writer_index = 0;
        self.reader_index = 0;
        self.bit_index = 0;
        self.mode = WriteMode::ByteAligned;
    }
}

impl Default for PacketBuffer {
    fn default() -> Self {
        Self::new()
    }
}
