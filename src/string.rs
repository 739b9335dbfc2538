use alloc::vec::Vec;
use core::fmt;
use core::mem;

use log::debug;

use crate::codec::{decode, encode, encode_codepoint, OnInvalid};
use crate::constants::{is_continuation, until_nul, MAX_SEQUENCE_LEN, NUL_BYTE};
use crate::error::{Result, U8TextError};
use crate::iter::{codepoints, Codepoints, Utf8Cursor};
use crate::sequence::{decode_one, sequence_len};
use crate::utils::length_in_codepoints;

/// An owned, growable UTF-8 string that tracks its length in bytes and in
/// codepoints.
///
/// Every byte written is validated first, so the contents are always
/// well-formed UTF-8 and [`codepoint_len`](Self::codepoint_len) is exact. The
/// storage always ends with a NUL byte after the contents. A failed operation
/// leaves the buffer exactly as it was.
///
/// Byte sources follow the C-string channel of [`decode`]: they end at their
/// first NUL byte. For the same reason U+0000 cannot be stored.
///
/// A `Default` buffer is *released*: it holds no allocation and has capacity
/// 0. [`take`](Self::take) and [`move_from`](Self::move_from) leave their
/// source in this state.
///
/// # Examples
///
/// ```
/// # use u8text::Utf8Buf;
/// let mut s = Utf8Buf::new("héllo").unwrap();
/// s.append_codepoint(0x1F600).unwrap();
/// s.insert_bytes(0, "¡", false).unwrap();
/// assert_eq!(s.as_str(), "¡héllo😀");
/// assert_eq!(s.byte_len(), 12);
/// assert_eq!(s.codepoint_len(), 7);
/// ```
#[derive(Debug, Default)]
pub struct Utf8Buf {
    // Contents followed by one NUL byte; empty only while released.
    data: Vec<u8>,
    byte_len: usize,
    codepoint_len: usize,
    capacity: usize,
}

impl Utf8Buf {
    /// Initial and minimum capacity of an allocated buffer, in bytes.
    pub const MIN_CAPACITY: usize = 16;

    /// Creates a buffer holding a copy of `bytes` (up to its first NUL).
    ///
    /// # Errors
    ///
    /// - `U8TextError::InvalidSequence` if the bytes are not valid UTF-8.
    /// - `U8TextError::OutOfMemory` on allocation failure.
    pub fn new(bytes: impl AsRef<[u8]>) -> Result<Self> {
        let src = until_nul(bytes.as_ref());
        let codepoints = length_in_codepoints(src)?;
        let mut buf = Self::with_capacity(src.len() + 1)?;
        buf.splice_in(0, src, codepoints)?;
        Ok(buf)
    }

    /// Creates an empty buffer with room for `capacity` bytes including the
    /// terminator (at least [`MIN_CAPACITY`](Self::MIN_CAPACITY)).
    ///
    /// # Errors
    ///
    /// Returns `U8TextError::OutOfMemory` on allocation failure.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut buf = Self::default();
        buf.grow_to(capacity.max(Self::MIN_CAPACITY))?;
        Ok(buf)
    }

    /// Deep copy with the same capacity, at least
    /// [`MIN_CAPACITY`](Self::MIN_CAPACITY).
    ///
    /// # Errors
    ///
    /// Returns `U8TextError::OutOfMemory` on allocation failure.
    pub fn copy(&self) -> Result<Self> {
        let mut copy = Self::with_capacity(self.capacity)?;
        copy.splice_in(0, self.as_bytes(), self.codepoint_len)?;
        Ok(copy)
    }

    /// Takes over the storage of `src`, dropping this buffer's own storage.
    /// `src` is left released and empty.
    pub fn move_from(&mut self, src: &mut Utf8Buf) {
        *self = mem::take(src);
    }

    /// Moves the storage out, leaving this buffer released and empty.
    #[must_use]
    pub fn take(&mut self) -> Utf8Buf {
        mem::take(self)
    }

    /// Concatenates two buffers into a new one.
    ///
    /// # Errors
    ///
    /// Returns `U8TextError::OutOfMemory` on allocation failure.
    pub fn concat(a: &Utf8Buf, b: &Utf8Buf) -> Result<Self> {
        let mut out = Self::with_capacity(a.byte_len + b.byte_len + 1)?;
        out.append(a)?;
        out.append(b)?;
        Ok(out)
    }

    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    #[must_use]
    pub fn codepoint_len(&self) -> usize {
        self.codepoint_len
    }

    /// Allocated size in bytes, terminator included; 0 when released.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.byte_len == 0
    }

    /// The contents, without the terminator.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.byte_len]
    }

    /// The contents followed by their NUL terminator.
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        if self.data.is_empty() {
            b"\0"
        } else {
            &self.data
        }
    }

    /// # Panics
    ///
    /// Never in practice: every write is validated as UTF-8.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(self.as_bytes()).expect("contents are validated on every write")
    }

    /// A cursor over the contents.
    #[must_use]
    pub fn cursor(&self) -> Utf8Cursor<'_> {
        Utf8Cursor::new(self.as_bytes())
    }

    #[must_use]
    pub fn codepoints(&self) -> Codepoints<'_> {
        codepoints(self.as_bytes())
    }

    /// Appends the contents of another buffer.
    ///
    /// # Errors
    ///
    /// Returns `U8TextError::OutOfMemory` on allocation failure.
    pub fn append(&mut self, other: &Utf8Buf) -> Result<()> {
        self.splice_in(self.byte_len, other.as_bytes(), other.codepoint_len)
    }

    /// Appends raw bytes (up to their first NUL). Only the appended bytes are
    /// scanned to count their codepoints.
    ///
    /// # Errors
    ///
    /// - `U8TextError::InvalidSequence` if the bytes are not valid UTF-8.
    /// - `U8TextError::OutOfMemory` on allocation failure.
    pub fn append_bytes(&mut self, bytes: impl AsRef<[u8]>) -> Result<()> {
        let src = until_nul(bytes.as_ref());
        let codepoints = length_in_codepoints(src)?;
        self.splice_in(self.byte_len, src, codepoints)
    }

    /// Appends one scalar value.
    ///
    /// # Errors
    ///
    /// - `U8TextError::InvalidArgument` for U+0000.
    /// - `U8TextError::InvalidSequence` for surrogates and values above U+10FFFF.
    /// - `U8TextError::OutOfMemory` on allocation failure.
    pub fn append_codepoint(&mut self, cp: u32) -> Result<()> {
        let mut seq = [0u8; MAX_SEQUENCE_LEN];
        let len = encode_storable(cp, &mut seq)?;
        self.splice_in(self.byte_len, &seq[..len], 1)
    }

    /// Inserts one scalar value at a byte or codepoint offset.
    ///
    /// The offset may equal the current length, which appends.
    ///
    /// # Errors
    ///
    /// - `U8TextError::OutOfBounds` if the offset is past the end.
    /// - `U8TextError::InvalidSequence` if a byte offset is not a sequence
    ///   start, or `cp` is a surrogate or above U+10FFFF.
    /// - `U8TextError::InvalidArgument` for U+0000.
    /// - `U8TextError::OutOfMemory` on allocation failure.
    pub fn insert_codepoint(&mut self, offset: usize, cp: u32, by_byte: bool) -> Result<()> {
        let at = self.insertion_point(offset, by_byte)?;
        let mut seq = [0u8; MAX_SEQUENCE_LEN];
        let len = encode_storable(cp, &mut seq)?;
        self.splice_in(at, &seq[..len], 1)
    }

    /// Inserts raw bytes (up to their first NUL) at a byte or codepoint offset.
    ///
    /// # Errors
    ///
    /// As [`insert_codepoint`](Self::insert_codepoint), with
    /// `U8TextError::InvalidSequence` also raised for invalid source bytes.
    pub fn insert_bytes(
        &mut self,
        offset: usize,
        bytes: impl AsRef<[u8]>,
        by_byte: bool,
    ) -> Result<()> {
        let src = until_nul(bytes.as_ref());
        if src.is_empty() {
            return Ok(());
        }
        let codepoints = length_in_codepoints(src)?;
        let at = self.insertion_point(offset, by_byte)?;
        self.splice_in(at, src, codepoints)
    }

    /// Inserts the contents of another buffer at a byte or codepoint offset.
    ///
    /// # Errors
    ///
    /// - `U8TextError::OutOfBounds` if the offset is past the end.
    /// - `U8TextError::InvalidSequence` if a byte offset is not a sequence start.
    /// - `U8TextError::OutOfMemory` on allocation failure.
    pub fn insert_buf(&mut self, offset: usize, other: &Utf8Buf, by_byte: bool) -> Result<()> {
        if other.is_empty() {
            return Ok(());
        }
        let at = self.insertion_point(offset, by_byte)?;
        self.splice_in(at, other.as_bytes(), other.codepoint_len)
    }

    /// Copies out `len` codepoints starting at codepoint `start`. `len` is
    /// clamped to the end of the buffer.
    ///
    /// This decodes the whole buffer and re-encodes the slice; it is meant
    /// for occasional use, not hot loops.
    ///
    /// # Errors
    ///
    /// - `U8TextError::OutOfBounds` if `start >= codepoint_len()`.
    /// - `U8TextError::OutOfMemory` on allocation failure.
    pub fn substring(&self, start: usize, len: usize) -> Result<Self> {
        if start >= self.codepoint_len {
            return Err(U8TextError::OutOfBounds {
                offset: start,
                length: self.codepoint_len,
            });
        }
        if len == 0 {
            return Self::with_capacity(0);
        }

        let scalars = decode(self.as_bytes(), OnInvalid::Reject)?;
        let end = start.saturating_add(len).min(scalars.len());
        let bytes = encode(&scalars[start..end])?;
        Self::new(bytes)
    }

    /// Copies out `len` bytes starting at byte `start`. `len` is clamped to
    /// the end of the buffer.
    ///
    /// # Errors
    ///
    /// - `U8TextError::OutOfBounds` if `start >= byte_len()`.
    /// - `U8TextError::InvalidSequence` if the range splits a sequence.
    /// - `U8TextError::OutOfMemory` on allocation failure.
    pub fn substring_bytes(&self, start: usize, len: usize) -> Result<Self> {
        if start >= self.byte_len {
            return Err(U8TextError::OutOfBounds {
                offset: start,
                length: self.byte_len,
            });
        }
        if len == 0 {
            return Self::with_capacity(0);
        }

        let end = start.saturating_add(len).min(self.byte_len);
        Self::new(&self.as_bytes()[start..end]).map_err(|e| e.shifted(start))
    }

    /// Decodes the codepoint at a byte or codepoint offset.
    ///
    /// # Errors
    ///
    /// - `U8TextError::OutOfBounds` if the offset is not inside the contents.
    /// - `U8TextError::InvalidSequence` if a byte offset is not a sequence start.
    pub fn at(&self, offset: usize, by_byte: bool) -> Result<u32> {
        let start = if by_byte {
            if offset >= self.byte_len {
                return Err(U8TextError::OutOfBounds {
                    offset,
                    length: self.byte_len,
                });
            }
            offset
        } else {
            if offset >= self.codepoint_len {
                return Err(U8TextError::OutOfBounds {
                    offset,
                    length: self.codepoint_len,
                });
            }
            self.byte_offset_of(offset)?
        };

        decode_one(&self.as_bytes()[start..])
            .map(|(cp, _)| cp)
            .map_err(|e| e.shifted(start))
    }

    /// Makes room for at least `capacity` bytes, terminator included.
    ///
    /// # Errors
    ///
    /// Returns `U8TextError::OutOfMemory` on allocation failure.
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        self.ensure_capacity(capacity)
    }

    /// Shrinks the allocation to the contents plus terminator.
    pub fn shrink_to_fit(&mut self) {
        let needed = self.byte_len + 1;
        if self.capacity == 0 || needed >= self.capacity {
            return;
        }
        self.data.shrink_to(needed);
        debug!("shrinking buffer from {} to {needed} bytes", self.capacity);
        self.capacity = needed;
    }

    /// Empties the contents, keeping the allocation.
    pub fn clear(&mut self) {
        if !self.data.is_empty() {
            self.data.clear();
            self.data.push(NUL_BYTE);
        }
        self.byte_len = 0;
        self.codepoint_len = 0;
    }

    fn ensure_capacity(&mut self, needed: usize) -> Result<()> {
        if self.capacity >= needed {
            return Ok(());
        }
        let mut capacity = if self.capacity == 0 {
            Self::MIN_CAPACITY
        } else {
            self.capacity
        };
        while capacity < needed {
            capacity = capacity
                .checked_mul(2)
                .ok_or(U8TextError::OutOfMemory { requested: needed })?;
        }
        self.grow_to(capacity)
    }

    fn grow_to(&mut self, capacity: usize) -> Result<()> {
        let additional = capacity - self.data.len();
        self.data
            .try_reserve_exact(additional)
            .map_err(|_| U8TextError::OutOfMemory {
                requested: capacity,
            })?;
        if self.data.is_empty() {
            self.data.push(NUL_BYTE);
        }
        debug!("growing buffer from {} to {capacity} bytes", self.capacity);
        self.capacity = capacity;
        Ok(())
    }

    /// Writes validated `bytes` holding `codepoints` codepoints at byte
    /// offset `at`, shifting the tail right.
    fn splice_in(&mut self, at: usize, bytes: &[u8], codepoints: usize) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let needed = self
            .byte_len
            .checked_add(bytes.len() + 1)
            .ok_or(U8TextError::OutOfMemory {
                requested: usize::MAX,
            })?;
        self.ensure_capacity(needed)?;

        // Capacity is reserved, so nothing below reallocates or fails.
        self.data.truncate(self.byte_len);
        self.data.extend_from_slice(bytes);
        self.data[at..].rotate_right(bytes.len());
        self.data.push(NUL_BYTE);
        self.byte_len += bytes.len();
        self.codepoint_len += codepoints;
        Ok(())
    }

    fn byte_offset_of(&self, cp_offset: usize) -> Result<usize> {
        if cp_offset > self.codepoint_len {
            return Err(U8TextError::OutOfBounds {
                offset: cp_offset,
                length: self.codepoint_len,
            });
        }
        if cp_offset == self.codepoint_len {
            return Ok(self.byte_len);
        }

        let bytes = self.as_bytes();
        let mut offset = 0;
        for _ in 0..cp_offset {
            let len = bytes
                .get(offset)
                .copied()
                .and_then(sequence_len)
                .ok_or(U8TextError::InvalidSequence { position: offset })?;
            offset += len;
        }
        Ok(offset)
    }

    fn insertion_point(&self, offset: usize, by_byte: bool) -> Result<usize> {
        if !by_byte {
            return self.byte_offset_of(offset);
        }
        if offset > self.byte_len {
            return Err(U8TextError::OutOfBounds {
                offset,
                length: self.byte_len,
            });
        }
        if offset < self.byte_len && is_continuation(self.data[offset]) {
            return Err(U8TextError::InvalidSequence { position: offset });
        }
        Ok(offset)
    }
}

fn encode_storable(cp: u32, seq: &mut [u8; MAX_SEQUENCE_LEN]) -> Result<usize> {
    if cp == 0 {
        return Err(U8TextError::InvalidArgument {
            reason: "U+0000 cannot be stored in a NUL-terminated buffer",
        });
    }
    encode_codepoint(cp, seq)
}

impl PartialEq for Utf8Buf {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Utf8Buf {}

impl AsRef<[u8]> for Utf8Buf {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl TryFrom<&str> for Utf8Buf {
    type Error = U8TextError;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for Utf8Buf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
