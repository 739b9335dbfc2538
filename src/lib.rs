#![no_std]

//! `u8text`: UTF-8 decoding, encoding, navigation and a length-tracked string buffer.
//!
//! The crate is built in layers:
//!
//! - [`decode`] / [`encode`] convert whole byte strings to and from Unicode
//!   scalar values. Decoding either rejects malformed input or replaces each
//!   malformed sequence with U+FFFD, as chosen by [`OnInvalid`].
//! - [`decode_one`] decodes exactly one sequence from a bounded window and
//!   never reads past its end.
//! - [`Utf8Cursor`] walks a borrowed byte string forward and backward, one
//!   codepoint at a time. [`Codepoints`] is the same walk as a standard
//!   double-ended iterator.
//! - [`Utf8Buf`] owns a growable, NUL-terminated UTF-8 string and keeps its
//!   byte and codepoint lengths in sync on every edit.
//! - Free functions such as [`is_valid`], [`find_char`] and [`to_upper`]
//!   cover common queries.
//!
//! Validation is strict everywhere: overlong forms, surrogates (U+D800 to
//! U+DFFF) and values above U+10FFFF are malformed.
//!
//! # NUL-terminated input
//!
//! [`decode`], [`Utf8Cursor::new`] and every byte source of [`Utf8Buf`] end at
//! the first NUL byte, like C strings. Use [`codepoints`] or
//! [`Utf8Cursor::with_length`] to treat NUL bytes as U+0000 instead.
//!
//! ```
//! # use u8text::{decode, OnInvalid};
//! assert_eq!(decode(b"ab\0cd", OnInvalid::Reject).unwrap(), [0x61, 0x62]);
//! ```
//!
//! # Error Handling
//!
//! Every fallible operation returns [`Result`] with a [`U8TextError`].
//! Positions in `InvalidSequence` errors are byte offsets into the input the
//! caller passed (or scalar indices, for [`encode`]):
//!
//! ```
//! # use u8text::{decode, OnInvalid, U8TextError};
//! assert_eq!(
//!     decode(b"ok\xE2\x82", OnInvalid::Reject),
//!     Err(U8TextError::InvalidSequence { position: 4 })
//! );
//! ```
//!
//! # String Buffer
//!
//! ```
//! # use u8text::Utf8Buf;
//! let mut greeting = Utf8Buf::new("Hello").unwrap();
//! greeting.append_bytes(", wörld").unwrap();
//! assert_eq!(greeting.codepoint_len(), 12);
//! assert_eq!(greeting.byte_len(), 13);
//!
//! let word = greeting.substring(7, 5).unwrap();
//! assert_eq!(word.as_str(), "wörld");
//!
//! // Invalid input is rejected and leaves the buffer untouched
//! assert!(greeting.append_bytes(b"\xC0\xAF").is_err());
//! assert_eq!(greeting.as_str(), "Hello, wörld");
//! ```
//!
//! # Cursor
//!
//! ```
//! # use u8text::Utf8Cursor;
//! let text = "z€𝄞";
//! let mut cursor = Utf8Cursor::new(text.as_bytes());
//! while cursor.next().unwrap() {}
//! assert_eq!(cursor.position(), 3);
//!
//! assert!(cursor.prev().unwrap());
//! assert_eq!(cursor.current_codepoint(), 0x1D11E);
//! assert_eq!(cursor.at(-1, false).unwrap(), 0x20AC);
//! ```
//!
//! ## `no_std` Compatibility
//!
//! This crate is `no_std` and needs only `alloc`. Enable the optional `std`
//! feature to get `std::error::Error` for [`U8TextError`]:
//! ```toml
//! [dependencies]
//! u8text = { version = "0.1", features = ["std"] }
//! ```
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade; nothing is
//! printed unless the application installs a logger.

extern crate alloc;

#[cfg(test)]
extern crate std;

mod codec;
mod constants;
mod error;
mod iter;
mod sequence;
mod string;
mod utils;

// Re-export public types and functions
pub use codec::{decode, encode, encode_codepoint, OnInvalid};
pub use constants::{MAX_SEQUENCE_LEN, REPLACEMENT_CHARACTER};
pub use error::{Result, U8TextError};
pub use iter::{codepoints, Codepoints, Utf8Cursor};
pub use sequence::{decode_one, sequence_len};
pub use string::Utf8Buf;
pub use utils::{
    codepoint_byte_len, codepoint_to_bytes, find_char, find_substring, is_alpha, is_ascii,
    is_digit, is_lower, is_space, is_upper, is_valid, length_in_codepoints, to_lower,
    to_lower_codepoint, to_upper, to_upper_codepoint,
};
