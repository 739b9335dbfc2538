use thiserror::Error;

/// Result type used by every fallible `u8text` operation
pub type Result<T> = core::result::Result<T, U8TextError>;

/// Error types for codec, cursor and buffer operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum U8TextError {
    /// A required input is missing or unusable in the current state
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Description of what was wrong with the argument
        reason: &'static str,
    },
    /// Malformed or truncated UTF-8 on decode, or an unencodable scalar value on encode
    #[error("Invalid UTF-8 sequence at position {position}")]
    InvalidSequence {
        /// Byte offset into the decoded input, or index into the encoded scalar values
        position: usize,
    },
    /// The allocator could not provide the requested storage
    #[error("Out of memory: failed to reserve {requested} elements")]
    OutOfMemory {
        /// Number of elements that could not be reserved
        requested: usize,
    },
    /// Offset or index is outside the valid range
    #[error("Out of bounds: offset {offset} is outside length {length}")]
    OutOfBounds {
        /// Offset that was requested
        offset: usize,
        /// Bound the offset was checked against
        length: usize,
    },
}

impl U8TextError {
    /// Rebases a window-relative sequence position onto an absolute offset.
    ///
    /// Errors other than `InvalidSequence` carry no byte position and are
    /// returned unchanged.
    #[must_use]
    pub(crate) fn shifted(self, base: usize) -> Self {
        match self {
            U8TextError::InvalidSequence { position } => U8TextError::InvalidSequence {
                position: base + position,
            },
            other => other,
        }
    }
}
