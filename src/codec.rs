//! Bulk conversion between NUL-terminated UTF-8 byte strings and scalar values.
//!
//! Decoding is driven by a small state machine that consumes one byte per
//! [`DecodeState::step`] call. Each call reports what happened as a [`Step`]
//! instead of mutating a shared status field. Encoding has no state: every
//! scalar value maps to its bytes independently.

use alloc::vec::Vec;
use log::{debug, trace};

use crate::constants::{
    is_surrogate, until_nul, ASCII_MAX, CONTINUATION_MAX, CONTINUATION_MIN, CONTINUATION_TAG,
    CONTINUATION_VALUE_MASK, E0_CONTINUATION_MIN, ED_CONTINUATION_MAX, F0_CONTINUATION_MIN,
    F4_CONTINUATION_MAX, FOUR_BYTE_LEAD_MAX, FOUR_BYTE_LEAD_MIN, FOUR_BYTE_MAX, FOUR_BYTE_TAG,
    FOUR_BYTE_VALUE_MASK, MAX_SEQUENCE_LEN, NUL_BYTE, ONE_BYTE_MAX, REPLACEMENT_CHARACTER,
    THREE_BYTE_LEAD_MAX, THREE_BYTE_LEAD_MIN, THREE_BYTE_MAX, THREE_BYTE_SURROGATE_LEAD,
    THREE_BYTE_TAG, THREE_BYTE_VALUE_MASK, TWO_BYTE_LEAD_MAX, TWO_BYTE_LEAD_MIN, TWO_BYTE_MAX,
    TWO_BYTE_TAG, TWO_BYTE_VALUE_MASK,
};
use crate::error::{Result, U8TextError};

/// What [`decode`] does when it meets a malformed sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnInvalid {
    /// Emit U+FFFD for the malformed sequence and keep decoding
    Replace,
    /// Abort the whole decode and report the position of the malformed byte
    #[default]
    Reject,
}

/// Outcome of feeding one byte to the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// A sequence completed with this scalar value
    Emit(u32),
    /// A multi-byte sequence is still incomplete
    Continue,
    /// The sequence is malformed; `at` is the byte offset that broke it
    Invalid { at: usize },
    /// Clean end of input at a sequence boundary
    Finish,
}

/// Per-call decoder state. Created by [`decode`] and dropped when it returns.
#[derive(Debug)]
struct DecodeState {
    codepoint: u32,
    seen: usize,
    need: usize,
    lower: u8,
    upper: u8,
    pos: usize,
}

impl DecodeState {
    fn new() -> Self {
        Self {
            codepoint: 0,
            seen: 0,
            need: 0,
            lower: CONTINUATION_MIN,
            upper: CONTINUATION_MAX,
            pos: 0,
        }
    }

    fn restart_sequence(&mut self) {
        self.codepoint = 0;
        self.seen = 0;
        self.need = 0;
        self.lower = CONTINUATION_MIN;
        self.upper = CONTINUATION_MAX;
    }

    /// Consumes the byte at the current position. Reading past the end of
    /// `input` behaves like reading a NUL terminator.
    fn step(&mut self, input: &[u8]) -> Step {
        let byte = input.get(self.pos).copied().unwrap_or(NUL_BYTE);
        if byte == NUL_BYTE {
            if self.need > 0 {
                self.restart_sequence();
                return Step::Invalid { at: self.pos };
            }
            return Step::Finish;
        }

        let at = self.pos;
        self.pos += 1;

        if self.need == 0 {
            return self.start_sequence(byte, at);
        }

        if byte < self.lower || byte > self.upper {
            // The offending byte is not consumed: it is re-read as a lead byte.
            self.restart_sequence();
            self.pos = at;
            return Step::Invalid { at };
        }

        self.lower = CONTINUATION_MIN;
        self.upper = CONTINUATION_MAX;
        self.codepoint = (self.codepoint << 6) | u32::from(byte & CONTINUATION_VALUE_MASK);
        self.seen += 1;

        if self.seen < self.need {
            return Step::Continue;
        }

        let cp = self.codepoint;
        self.restart_sequence();
        Step::Emit(cp)
    }

    fn start_sequence(&mut self, byte: u8, at: usize) -> Step {
        match byte {
            0x01..=ASCII_MAX => return Step::Emit(u32::from(byte)),
            TWO_BYTE_LEAD_MIN..=TWO_BYTE_LEAD_MAX => {
                self.need = 1;
                self.codepoint = u32::from(byte & TWO_BYTE_VALUE_MASK);
            }
            THREE_BYTE_LEAD_MIN..=THREE_BYTE_LEAD_MAX => {
                if byte == THREE_BYTE_LEAD_MIN {
                    self.lower = E0_CONTINUATION_MIN;
                } else if byte == THREE_BYTE_SURROGATE_LEAD {
                    self.upper = ED_CONTINUATION_MAX;
                }
                self.need = 2;
                self.codepoint = u32::from(byte & THREE_BYTE_VALUE_MASK);
            }
            FOUR_BYTE_LEAD_MIN..=FOUR_BYTE_LEAD_MAX => {
                if byte == FOUR_BYTE_LEAD_MIN {
                    self.lower = F0_CONTINUATION_MIN;
                } else if byte == FOUR_BYTE_LEAD_MAX {
                    self.upper = F4_CONTINUATION_MAX;
                }
                self.need = 3;
                self.codepoint = u32::from(byte & FOUR_BYTE_VALUE_MASK);
            }
            _ => return Step::Invalid { at },
        }
        Step::Continue
    }
}

/// Decodes a NUL-terminated UTF-8 byte string into scalar values.
///
/// Input ends at the first NUL byte or at the end of the slice, whichever
/// comes first, so U+0000 can never appear in the output. The returned
/// vector holds no trailing zero sentinel; its length is the number of
/// decoded values.
///
/// # Errors
///
/// - `U8TextError::InvalidSequence` under `OnInvalid::Reject`, with the byte
///   offset of the first malformed byte (or of the input end for a truncated
///   sequence). Nothing decoded so far is returned.
/// - `U8TextError::OutOfMemory` if the output cannot be allocated.
///
/// # Examples
///
/// ```
/// # use u8text::{decode, OnInvalid};
/// assert_eq!(
///     decode(b"A\xF0\x9F\x98\x80B", OnInvalid::Reject).unwrap(),
///     [0x41, 0x1F600, 0x42]
/// );
/// assert_eq!(
///     decode(b"A\xFFB", OnInvalid::Replace).unwrap(),
///     [0x41, 0xFFFD, 0x42]
/// );
/// ```
pub fn decode(bytes: &[u8], on_invalid: OnInvalid) -> Result<Vec<u32>> {
    let input = until_nul(bytes);

    // Every emitted value consumes at least one byte, so this never regrows.
    let mut out = Vec::new();
    out.try_reserve_exact(input.len())
        .map_err(|_| U8TextError::OutOfMemory {
            requested: input.len(),
        })?;

    let mut state = DecodeState::new();
    loop {
        match state.step(input) {
            Step::Emit(cp) => out.push(cp),
            Step::Continue => {}
            Step::Finish => return Ok(out),
            Step::Invalid { at } => match on_invalid {
                OnInvalid::Replace => {
                    trace!("replacing invalid UTF-8 sequence at byte {at}");
                    out.push(REPLACEMENT_CHARACTER);
                }
                OnInvalid::Reject => {
                    debug!("rejecting input: invalid UTF-8 sequence at byte {at}");
                    return Err(U8TextError::InvalidSequence { position: at });
                }
            },
        }
    }
}

/// Encodes scalar values into UTF-8 bytes.
///
/// Input ends at the first zero value or at the end of the slice. The output
/// holds no trailing NUL.
///
/// Unlike [`decode`], there is no replacement mode: a value that is not a
/// Unicode scalar value aborts the whole encode.
///
/// # Errors
///
/// - `U8TextError::InvalidSequence` with the index of the first surrogate or
///   out-of-range value.
/// - `U8TextError::OutOfMemory` if the output cannot be allocated.
///
/// # Examples
///
/// ```
/// # use u8text::encode;
/// assert_eq!(encode(&[0x1F600, 0]).unwrap(), [0xF0, 0x9F, 0x98, 0x80]);
/// assert!(encode(&[0x41, 0xD800]).is_err());
/// ```
pub fn encode(codepoints: &[u32]) -> Result<Vec<u8>> {
    let len = codepoints
        .iter()
        .position(|&cp| cp == 0)
        .unwrap_or(codepoints.len());
    let scalars = &codepoints[..len];

    let max_len = len
        .checked_mul(MAX_SEQUENCE_LEN)
        .ok_or(U8TextError::OutOfMemory {
            requested: usize::MAX,
        })?;
    let mut out = Vec::new();
    out.try_reserve_exact(max_len)
        .map_err(|_| U8TextError::OutOfMemory { requested: max_len })?;

    let mut seq = [0u8; MAX_SEQUENCE_LEN];
    for (index, &cp) in scalars.iter().enumerate() {
        let n = encode_codepoint(cp, &mut seq).map_err(|e| {
            debug!("aborting encode: U+{cp:04X} at index {index} is not a scalar value");
            e.shifted(index)
        })?;
        out.extend_from_slice(&seq[..n]);
    }
    Ok(out)
}

/// Encodes one scalar value into `out`, returning the number of bytes written.
///
/// # Errors
///
/// Returns `U8TextError::InvalidSequence { position: 0 }` for surrogates and
/// values above U+10FFFF.
#[allow(clippy::cast_possible_truncation)]
pub fn encode_codepoint(cp: u32, out: &mut [u8; MAX_SEQUENCE_LEN]) -> Result<usize> {
    let mask = u32::from(CONTINUATION_VALUE_MASK);
    if cp <= ONE_BYTE_MAX {
        out[0] = cp as u8;
        Ok(1)
    } else if cp <= TWO_BYTE_MAX {
        out[0] = TWO_BYTE_TAG | (cp >> 6) as u8;
        out[1] = CONTINUATION_TAG | (cp & mask) as u8;
        Ok(2)
    } else if cp <= THREE_BYTE_MAX {
        if is_surrogate(cp) {
            return Err(U8TextError::InvalidSequence { position: 0 });
        }
        out[0] = THREE_BYTE_TAG | (cp >> 12) as u8;
        out[1] = CONTINUATION_TAG | ((cp >> 6) & mask) as u8;
        out[2] = CONTINUATION_TAG | (cp & mask) as u8;
        Ok(3)
    } else if cp <= FOUR_BYTE_MAX {
        out[0] = FOUR_BYTE_TAG | (cp >> 18) as u8;
        out[1] = CONTINUATION_TAG | ((cp >> 12) & mask) as u8;
        out[2] = CONTINUATION_TAG | ((cp >> 6) & mask) as u8;
        out[3] = CONTINUATION_TAG | (cp & mask) as u8;
        Ok(4)
    } else {
        Err(U8TextError::InvalidSequence { position: 0 })
    }
}
