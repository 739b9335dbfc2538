//! Bounds-first decoding of exactly one UTF-8 sequence.
//!
//! Unlike the bulk decoder in [`codec`](crate::codec), nothing here relies on a
//! terminator: the caller passes the window `[current, end)` and no byte at or
//! beyond its end is ever read, even when the lead byte promises more.

use crate::constants::{
    ASCII_MAX, CONTINUATION_MAX, CONTINUATION_MIN, CONTINUATION_VALUE_MASK, E0_CONTINUATION_MIN,
    ED_CONTINUATION_MAX, F0_CONTINUATION_MIN, F4_CONTINUATION_MAX, FOUR_BYTE_LEAD_MAX,
    FOUR_BYTE_LEAD_MIN, FOUR_BYTE_VALUE_MASK, THREE_BYTE_LEAD_MAX, THREE_BYTE_LEAD_MIN,
    THREE_BYTE_SURROGATE_LEAD, THREE_BYTE_VALUE_MASK, TWO_BYTE_LEAD_MAX, TWO_BYTE_LEAD_MIN,
    TWO_BYTE_VALUE_MASK,
};
use crate::error::{Result, U8TextError};

/// Sequence length announced by a lead byte's bit pattern.
///
/// Returns `None` for continuation bytes (`10xxxxxx`) and for `11111xxx`.
/// The table looks only at the high bits, so `0xC0`, `0xC1` and `0xF5..=0xF7`
/// still report a length; use [`decode_one`] to check that a sequence is valid.
#[must_use]
pub fn sequence_len(lead: u8) -> Option<usize> {
    match lead >> 3 {
        0x00..=0x0F => Some(1),
        0x18..=0x1B => Some(2),
        0x1C..=0x1D => Some(3),
        0x1E => Some(4),
        _ => None,
    }
}

/// Decodes the single sequence at the start of `window`.
///
/// Returns the scalar value and the number of bytes it occupies. Overlong
/// forms, surrogates and values above U+10FFFF are rejected with the same
/// lead-specific bounds as [`decode`](crate::decode).
///
/// # Errors
///
/// - `U8TextError::InvalidArgument` if `window` is empty.
/// - `U8TextError::InvalidSequence` with a window-relative position: `0` for
///   an invalid lead byte, the index of a bad continuation byte, or
///   `window.len()` if the sequence is truncated by the window end.
///
/// # Examples
///
/// ```
/// # use u8text::decode_one;
/// assert_eq!(decode_one("é!".as_bytes()).unwrap(), (0xE9, 2));
/// assert!(decode_one(b"\xC3").is_err());
/// ```
pub fn decode_one(window: &[u8]) -> Result<(u32, usize)> {
    let Some(&lead) = window.first() else {
        return Err(U8TextError::InvalidArgument {
            reason: "empty decode window",
        });
    };

    if lead <= ASCII_MAX {
        return Ok((u32::from(lead), 1));
    }

    let (len, seed) = match lead {
        TWO_BYTE_LEAD_MIN..=TWO_BYTE_LEAD_MAX => (2, lead & TWO_BYTE_VALUE_MASK),
        THREE_BYTE_LEAD_MIN..=THREE_BYTE_LEAD_MAX => (3, lead & THREE_BYTE_VALUE_MASK),
        FOUR_BYTE_LEAD_MIN..=FOUR_BYTE_LEAD_MAX => (4, lead & FOUR_BYTE_VALUE_MASK),
        _ => return Err(U8TextError::InvalidSequence { position: 0 }),
    };

    let (first_lower, first_upper) = match lead {
        THREE_BYTE_LEAD_MIN => (E0_CONTINUATION_MIN, CONTINUATION_MAX),
        THREE_BYTE_SURROGATE_LEAD => (CONTINUATION_MIN, ED_CONTINUATION_MAX),
        FOUR_BYTE_LEAD_MIN => (F0_CONTINUATION_MIN, CONTINUATION_MAX),
        FOUR_BYTE_LEAD_MAX => (CONTINUATION_MIN, F4_CONTINUATION_MAX),
        _ => (CONTINUATION_MIN, CONTINUATION_MAX),
    };

    let mut cp = u32::from(seed);
    for i in 1..len {
        let Some(&byte) = window.get(i) else {
            return Err(U8TextError::InvalidSequence { position: i });
        };
        let (lower, upper) = if i == 1 {
            (first_lower, first_upper)
        } else {
            (CONTINUATION_MIN, CONTINUATION_MAX)
        };
        if byte < lower || byte > upper {
            return Err(U8TextError::InvalidSequence { position: i });
        }
        cp = (cp << 6) | u32::from(byte & CONTINUATION_VALUE_MASK);
    }

    Ok((cp, len))
}
