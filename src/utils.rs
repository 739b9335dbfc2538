//! Convenience queries over UTF-8 byte slices.
//!
//! Classification and case conversion cover the basic Latin letters and
//! ASCII whitespace only. Other codepoints pass through conversions unchanged
//! and answer `false` to every predicate except [`is_ascii`] where it applies.

use alloc::vec::Vec;

use crate::codec::{decode, encode, encode_codepoint, OnInvalid};
use crate::constants::{
    is_surrogate, until_nul, FOUR_BYTE_MAX, MAX_SEQUENCE_LEN, ONE_BYTE_MAX, THREE_BYTE_MAX,
    TWO_BYTE_MAX,
};
use crate::error::{Result, U8TextError};
use crate::iter::codepoints;

const CASE_OFFSET: u32 = 0x20;

/// Whether the whole slice is well-formed UTF-8. NUL bytes count as U+0000;
/// an empty slice is valid.
#[must_use]
pub fn is_valid(bytes: &[u8]) -> bool {
    codepoints(bytes).all(|cp| cp.is_ok())
}

/// Counts the codepoints of `bytes` without collecting them.
///
/// # Errors
///
/// Returns `U8TextError::InvalidSequence` at the first malformed sequence.
pub fn length_in_codepoints(bytes: &[u8]) -> Result<usize> {
    codepoints(bytes).try_fold(0, |count, cp| cp.map(|_| count + 1))
}

/// Byte offset of the first occurrence of `cp` in a NUL-terminated byte
/// string.
///
/// The search stops at the first malformed sequence, so a match after it is
/// not found. U+0000 is never found.
///
/// # Examples
///
/// ```
/// # use u8text::find_char;
/// assert_eq!(find_char("año".as_bytes(), u32::from('o')), Some(3));
/// assert_eq!(find_char(b"a\xFFo", u32::from('o')), None);
/// ```
#[must_use]
pub fn find_char(bytes: &[u8], cp: u32) -> Option<usize> {
    let haystack = until_nul(bytes);
    let mut iter = codepoints(haystack);
    loop {
        let offset = iter.front_offset();
        match iter.next()? {
            Ok(found) if found == cp => return Some(offset),
            Ok(_) => {}
            Err(_) => return None,
        }
    }
}

/// Byte offset of the first occurrence of `needle` in `haystack`.
///
/// This is a plain byte search: neither operand has to be valid UTF-8, and a
/// match may start inside a multi-byte sequence. An empty needle matches at 0.
#[must_use]
pub fn find_substring(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Uppercases the basic Latin letters of a NUL-terminated byte string.
///
/// # Errors
///
/// - `U8TextError::InvalidSequence` if the input is not valid UTF-8.
/// - `U8TextError::OutOfMemory` on allocation failure.
pub fn to_upper(bytes: &[u8]) -> Result<Vec<u8>> {
    map_codepoints(bytes, to_upper_codepoint)
}

/// Lowercases the basic Latin letters of a NUL-terminated byte string.
///
/// # Errors
///
/// As [`to_upper`].
pub fn to_lower(bytes: &[u8]) -> Result<Vec<u8>> {
    map_codepoints(bytes, to_lower_codepoint)
}

fn map_codepoints(bytes: &[u8], f: fn(u32) -> u32) -> Result<Vec<u8>> {
    let mut scalars = decode(bytes, OnInvalid::Reject)?;
    for cp in &mut scalars {
        *cp = f(*cp);
    }
    encode(&scalars)
}

#[must_use]
pub fn to_upper_codepoint(cp: u32) -> u32 {
    if is_lower(cp) {
        cp - CASE_OFFSET
    } else {
        cp
    }
}

#[must_use]
pub fn to_lower_codepoint(cp: u32) -> u32 {
    if is_upper(cp) {
        cp + CASE_OFFSET
    } else {
        cp
    }
}

#[must_use]
pub fn is_ascii(cp: u32) -> bool {
    cp <= ONE_BYTE_MAX
}

#[must_use]
pub fn is_alpha(cp: u32) -> bool {
    is_upper(cp) || is_lower(cp)
}

#[must_use]
pub fn is_digit(cp: u32) -> bool {
    (u32::from(b'0')..=u32::from(b'9')).contains(&cp)
}

/// Space, tab, line feed, carriage return, form feed or vertical tab.
#[must_use]
pub fn is_space(cp: u32) -> bool {
    matches!(cp, 0x20 | 0x09..=0x0D)
}

#[must_use]
pub fn is_upper(cp: u32) -> bool {
    (u32::from(b'A')..=u32::from(b'Z')).contains(&cp)
}

#[must_use]
pub fn is_lower(cp: u32) -> bool {
    (u32::from(b'a')..=u32::from(b'z')).contains(&cp)
}

/// Number of bytes `cp` takes in UTF-8, or `None` if it is a surrogate or
/// above U+10FFFF.
#[must_use]
pub fn codepoint_byte_len(cp: u32) -> Option<usize> {
    if cp <= ONE_BYTE_MAX {
        Some(1)
    } else if cp <= TWO_BYTE_MAX {
        Some(2)
    } else if cp <= THREE_BYTE_MAX {
        (!is_surrogate(cp)).then_some(3)
    } else if cp <= FOUR_BYTE_MAX {
        Some(4)
    } else {
        None
    }
}

/// Writes the UTF-8 form of `cp` to the start of `out` and returns its length.
///
/// # Errors
///
/// - `U8TextError::InvalidSequence` for surrogates and values above U+10FFFF.
/// - `U8TextError::OutOfBounds` if `out` is too short for the sequence.
pub fn codepoint_to_bytes(cp: u32, out: &mut [u8]) -> Result<usize> {
    let mut seq = [0u8; MAX_SEQUENCE_LEN];
    let len = encode_codepoint(cp, &mut seq)?;
    let available = out.len();
    let dest = out.get_mut(..len).ok_or(U8TextError::OutOfBounds {
        offset: len,
        length: available,
    })?;
    dest.copy_from_slice(&seq[..len]);
    Ok(len)
}
