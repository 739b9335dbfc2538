use core::iter::FusedIterator;

use log::trace;

use crate::constants::{is_continuation, until_nul, MAX_SEQUENCE_LEN};
use crate::error::{Result, U8TextError};
use crate::sequence::decode_one;

const ERROR_STATE: U8TextError = U8TextError::InvalidArgument {
    reason: "cursor is in the error state",
};

/// A bidirectional cursor over borrowed UTF-8 bytes.
///
/// The cursor owns nothing: it is a byte offset into the caller's slice plus
/// the last decoded codepoint and its codepoint index. After [`next`] the
/// cursor sits just past the codepoint it reports; after [`prev`] it sits on
/// the start of the codepoint it reports.
///
/// A decode failure sets a sticky error flag. From then on every navigation
/// call fails without decoding again, until [`reset`] or [`seek`].
///
/// Copies are cheap and independent, which is how [`remaining`] and [`at`]
/// look ahead without moving the original.
///
/// [`next`]: Utf8Cursor::next
/// [`prev`]: Utf8Cursor::prev
/// [`reset`]: Utf8Cursor::reset
/// [`seek`]: Utf8Cursor::seek
/// [`remaining`]: Utf8Cursor::remaining
/// [`at`]: Utf8Cursor::at
///
/// # Examples
///
/// ```
/// # use u8text::Utf8Cursor;
/// let mut cursor = Utf8Cursor::new("añb".as_bytes());
/// assert!(cursor.next().unwrap());
/// assert!(cursor.next().unwrap());
/// assert_eq!(cursor.current_codepoint(), 0xF1);
/// assert_eq!(cursor.position(), 2);
/// assert_eq!(cursor.byte_offset(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Utf8Cursor<'a> {
    data: &'a [u8],
    current: usize,
    codepoint: u32,
    position: usize,
    error: bool,
}

impl<'a> Utf8Cursor<'a> {
    /// Creates a cursor over a NUL-terminated byte string.
    ///
    /// The span ends at the first NUL byte, or at the end of `bytes` if it
    /// holds none.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::over(until_nul(bytes))
    }

    /// Creates a cursor over the first `byte_len` bytes. NUL bytes inside the
    /// span are data, decoded as U+0000.
    ///
    /// # Errors
    ///
    /// Returns `U8TextError::OutOfBounds` if `byte_len` exceeds `bytes.len()`.
    pub fn with_length(bytes: &'a [u8], byte_len: usize) -> Result<Self> {
        let data = bytes.get(..byte_len).ok_or(U8TextError::OutOfBounds {
            offset: byte_len,
            length: bytes.len(),
        })?;
        Ok(Self::over(data))
    }

    fn over(data: &'a [u8]) -> Self {
        Self {
            data,
            current: 0,
            codepoint: 0,
            position: 0,
            error: false,
        }
    }

    fn fail(&mut self, error: U8TextError, base: usize) -> U8TextError {
        self.error = true;
        let error = error.shifted(base);
        trace!("cursor entered the error state: {error}");
        error
    }

    /// Steps forward over one codepoint.
    ///
    /// Returns `Ok(false)` without moving when the cursor is at the end.
    ///
    /// # Errors
    ///
    /// - `U8TextError::InvalidArgument` if the cursor is in the error state.
    /// - `U8TextError::InvalidSequence` if the bytes at the cursor do not form
    ///   a valid sequence; the cursor enters the error state.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<bool> {
        if self.error {
            return Err(ERROR_STATE);
        }
        if self.current >= self.data.len() {
            return Ok(false);
        }

        match decode_one(&self.data[self.current..]) {
            Ok((cp, len)) => {
                self.codepoint = cp;
                self.current += len;
                self.position += 1;
                Ok(true)
            }
            Err(e) => Err(self.fail(e, self.current)),
        }
    }

    /// Steps backward over one codepoint.
    ///
    /// Scans back at most four bytes for the nearest byte that is not a
    /// continuation byte and decodes forward from there. Returns `Ok(false)`
    /// without moving when the cursor is at the start.
    ///
    /// # Errors
    ///
    /// - `U8TextError::InvalidArgument` if the cursor is in the error state.
    /// - `U8TextError::InvalidSequence` if no sequence start is found, or the
    ///   sequence found does not decode to exactly the skipped bytes; the
    ///   cursor enters the error state.
    pub fn prev(&mut self) -> Result<bool> {
        if self.error {
            return Err(ERROR_STATE);
        }
        if self.current == 0 {
            return Ok(false);
        }

        let Some(start) = self.find_prev_start() else {
            let error = U8TextError::InvalidSequence {
                position: self.current - 1,
            };
            return Err(self.fail(error, 0));
        };

        match decode_one(&self.data[start..]) {
            Ok((cp, len)) if start + len == self.current => {
                self.codepoint = cp;
                self.current = start;
                self.position -= 1;
                Ok(true)
            }
            Ok(_) => Err(self.fail(U8TextError::InvalidSequence { position: 0 }, start)),
            Err(e) => Err(self.fail(e, start)),
        }
    }

    fn find_prev_start(&self) -> Option<usize> {
        let floor = self.current.saturating_sub(MAX_SEQUENCE_LEN);
        (floor..self.current)
            .rev()
            .find(|&i| !is_continuation(self.data[i]))
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        !self.error && self.current < self.data.len()
    }

    #[must_use]
    pub fn has_prev(&self) -> bool {
        !self.error && self.current > 0
    }

    /// Returns to the start, clears the error state and decodes the first
    /// codepoint (without stepping over it).
    ///
    /// # Errors
    ///
    /// Returns `U8TextError::InvalidSequence` if the first sequence is
    /// malformed; the cursor is then back in the error state.
    pub fn reset(&mut self) -> Result<()> {
        self.current = 0;
        self.position = 0;
        self.codepoint = 0;
        self.error = false;

        if self.data.is_empty() {
            return Ok(());
        }
        match decode_one(self.data) {
            Ok((cp, _)) => {
                self.codepoint = cp;
                Ok(())
            }
            Err(e) => Err(self.fail(e, 0)),
        }
    }

    /// Resets, then steps forward `n` codepoints.
    ///
    /// # Errors
    ///
    /// - Any error of [`reset`](Self::reset) or [`next`](Self::next).
    /// - `U8TextError::OutOfBounds` if the span holds fewer than `n`
    ///   codepoints; the cursor is left at the end.
    pub fn seek(&mut self, n: usize) -> Result<()> {
        self.reset()?;
        for _ in 0..n {
            if !self.next()? {
                return Err(U8TextError::OutOfBounds {
                    offset: n,
                    length: self.position,
                });
            }
        }
        Ok(())
    }

    /// Number of codepoints between the cursor and the end of the span.
    ///
    /// Counting stops at the first malformed sequence. A cursor in the error
    /// state reports 0.
    #[must_use]
    pub fn remaining(&self) -> usize {
        if self.error {
            return 0;
        }
        let mut probe = self.clone();
        let mut count = 0;
        while let Ok(true) = probe.next() {
            count += 1;
        }
        count
    }

    /// Peeks at a codepoint relative to the cursor without moving it.
    ///
    /// With `by_byte`, `offset` is a byte distance from the current byte
    /// offset and must land on a sequence start inside the span. Otherwise it
    /// is a number of [`next`](Self::next) (positive) or
    /// [`prev`](Self::prev) (negative) steps, and the result is the codepoint
    /// the cursor would report after taking them; `at(0, false)` is
    /// [`current_codepoint`](Self::current_codepoint).
    ///
    /// # Errors
    ///
    /// - `U8TextError::InvalidArgument` if the cursor is in the error state.
    /// - `U8TextError::OutOfBounds` if the target lies outside the span.
    /// - `U8TextError::InvalidSequence` if the target is not a valid sequence
    ///   start, or a step meets malformed bytes.
    pub fn at(&self, offset: isize, by_byte: bool) -> Result<u32> {
        if self.error {
            return Err(ERROR_STATE);
        }

        if by_byte {
            let target = self
                .current
                .checked_add_signed(offset)
                .filter(|&target| target < self.data.len())
                .ok_or(U8TextError::OutOfBounds {
                    offset: self.current.saturating_add_signed(offset),
                    length: self.data.len(),
                })?;
            return decode_one(&self.data[target..])
                .map(|(cp, _)| cp)
                .map_err(|e| e.shifted(target));
        }

        let steps = offset.unsigned_abs();
        let mut probe = self.clone();
        for taken in 0..steps {
            let moved = if offset > 0 { probe.next()? } else { probe.prev()? };
            if !moved {
                return Err(U8TextError::OutOfBounds {
                    offset: steps,
                    length: taken,
                });
            }
        }
        Ok(probe.codepoint)
    }

    /// The last decoded codepoint, or 0 before any decode.
    #[must_use]
    pub fn current_codepoint(&self) -> u32 {
        self.codepoint
    }

    /// The codepoint index: how many codepoints lie before the cursor.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn byte_offset(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// The whole span the cursor walks.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// A double-ended iterator over the codepoints from the cursor to the end.
    #[must_use]
    pub fn codepoints(&self) -> Codepoints<'a> {
        Codepoints::new(&self.data[self.current..])
    }
}

/// Iterator over the codepoints of a byte slice, from either end.
///
/// Yields `Err` once at the first malformed sequence met from either
/// direction and is exhausted afterwards.
///
/// This iterator implements `Clone`.
#[derive(Debug, Clone)]
pub struct Codepoints<'a> {
    data: &'a [u8],
    front: usize,
    back: usize,
    failed: bool,
}

impl<'a> Codepoints<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            front: 0,
            back: data.len(),
            failed: false,
        }
    }

    /// Byte offset of the next codepoint yielded from the front.
    pub(crate) fn front_offset(&self) -> usize {
        self.front
    }

    fn fail(&mut self, error: U8TextError, base: usize) -> Option<Result<u32>> {
        self.failed = true;
        Some(Err(error.shifted(base)))
    }
}

/// Iterates over the codepoints of the whole slice. NUL bytes are data.
///
/// # Examples
///
/// ```
/// # use u8text::codepoints;
/// let forward: Vec<u32> = codepoints("aé".as_bytes()).map(Result::unwrap).collect();
/// let backward: Vec<u32> = codepoints("aé".as_bytes()).rev().map(Result::unwrap).collect();
/// assert_eq!(forward, [0x61, 0xE9]);
/// assert_eq!(backward, [0xE9, 0x61]);
/// ```
#[must_use]
pub fn codepoints(bytes: &[u8]) -> Codepoints<'_> {
    Codepoints::new(bytes)
}

impl Iterator for Codepoints<'_> {
    type Item = Result<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.front >= self.back {
            return None;
        }
        match decode_one(&self.data[self.front..self.back]) {
            Ok((cp, len)) => {
                self.front += len;
                Some(Ok(cp))
            }
            Err(e) => self.fail(e, self.front),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let bytes = self.back - self.front;
        (bytes.div_ceil(MAX_SEQUENCE_LEN), Some(bytes))
    }
}

impl DoubleEndedIterator for Codepoints<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.failed || self.front >= self.back {
            return None;
        }

        let floor = self.back.saturating_sub(MAX_SEQUENCE_LEN).max(self.front);
        let start = (floor..self.back)
            .rev()
            .find(|&i| !is_continuation(self.data[i]));
        let Some(start) = start else {
            return self.fail(U8TextError::InvalidSequence { position: 0 }, self.back - 1);
        };

        match decode_one(&self.data[start..self.back]) {
            Ok((cp, len)) if start + len == self.back => {
                self.back = start;
                Some(Ok(cp))
            }
            Ok(_) => self.fail(U8TextError::InvalidSequence { position: 0 }, start),
            Err(e) => self.fail(e, start),
        }
    }
}

impl FusedIterator for Codepoints<'_> {}
