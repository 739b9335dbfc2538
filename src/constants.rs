//! Byte ranges and masks of the UTF-8 grammar.

pub(crate) const NUL_BYTE: u8 = 0x00;
pub(crate) const ASCII_MAX: u8 = 0x7F;

pub(crate) const TWO_BYTE_LEAD_MIN: u8 = 0xC2;
pub(crate) const TWO_BYTE_LEAD_MAX: u8 = 0xDF;
pub(crate) const TWO_BYTE_TAG: u8 = 0xC0;
pub(crate) const TWO_BYTE_VALUE_MASK: u8 = 0x1F;

pub(crate) const THREE_BYTE_LEAD_MIN: u8 = 0xE0;
pub(crate) const THREE_BYTE_LEAD_MAX: u8 = 0xEF;
pub(crate) const THREE_BYTE_SURROGATE_LEAD: u8 = 0xED;
pub(crate) const THREE_BYTE_TAG: u8 = 0xE0;
pub(crate) const THREE_BYTE_VALUE_MASK: u8 = 0x0F;

pub(crate) const FOUR_BYTE_LEAD_MIN: u8 = 0xF0;
pub(crate) const FOUR_BYTE_LEAD_MAX: u8 = 0xF4;
pub(crate) const FOUR_BYTE_TAG: u8 = 0xF0;
pub(crate) const FOUR_BYTE_VALUE_MASK: u8 = 0x07;

pub(crate) const CONTINUATION_MASK: u8 = 0xC0;
pub(crate) const CONTINUATION_TAG: u8 = 0x80;
pub(crate) const CONTINUATION_VALUE_MASK: u8 = 0x3F;

pub(crate) const CONTINUATION_MIN: u8 = 0x80;
pub(crate) const CONTINUATION_MAX: u8 = 0xBF;

// Narrowed bounds for the first continuation byte after specific leads.
pub(crate) const E0_CONTINUATION_MIN: u8 = 0xA0; // overlong 3-byte
pub(crate) const ED_CONTINUATION_MAX: u8 = 0x9F; // surrogates
pub(crate) const F0_CONTINUATION_MIN: u8 = 0x90; // overlong 4-byte
pub(crate) const F4_CONTINUATION_MAX: u8 = 0x8F; // above U+10FFFF

pub(crate) const ONE_BYTE_MAX: u32 = 0x7F;
pub(crate) const TWO_BYTE_MAX: u32 = 0x7FF;
pub(crate) const THREE_BYTE_MAX: u32 = 0xFFFF;
pub(crate) const FOUR_BYTE_MAX: u32 = 0x10FFFF;

pub(crate) const SURROGATE_MIN: u32 = 0xD800;
pub(crate) const SURROGATE_MAX: u32 = 0xDFFF;

/// Maximum length of one UTF-8 sequence
pub const MAX_SEQUENCE_LEN: usize = 4;

/// U+FFFD, substituted for invalid input under `OnInvalid::Replace`
pub const REPLACEMENT_CHARACTER: u32 = 0xFFFD;

#[inline]
pub(crate) fn is_continuation(byte: u8) -> bool {
    byte & CONTINUATION_MASK == CONTINUATION_TAG
}

#[inline]
pub(crate) fn is_surrogate(cp: u32) -> bool {
    (SURROGATE_MIN..=SURROGATE_MAX).contains(&cp)
}

/// The part of `bytes` before its first NUL; a slice without NUL is taken whole.
#[inline]
pub(crate) fn until_nul(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == NUL_BYTE) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}
