//! The `error` module defines the [`MemViewError`] enum that describes the errors that
//! can occur when decoding buffer bytes, encoding typed text, or maintaining range collections.
//! It contains two pieces of information:
//! 1. When the error occurs, e.g., during decoding or during a range update.
//! 2. What kind of error was encountered (via [`MemViewErrorKind`] enum).

use crate::numeric::NumericType;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemViewError {
    DecodeError(MemViewErrorKind),
    EncodeError(MemViewErrorKind),
    RangeError(MemViewErrorKind),
}

impl MemViewError {
    /// Returns the detailed kind of the error.
    #[must_use]
    pub const fn kind(&self) -> &MemViewErrorKind {
        match self {
            Self::DecodeError(kind) | Self::EncodeError(kind) | Self::RangeError(kind) => kind,
        }
    }
}

impl fmt::Display for MemViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DecodeError(base_err) => {
                write!(f, "Error encountered while decoding buffer bytes:\n{base_err}")
            }
            Self::EncodeError(base_err) => {
                write!(f, "Error encountered while encoding typed value:\n{base_err}")
            }
            Self::RangeError(base_err) => {
                write!(f, "Error encountered in range collection:\n{base_err}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemViewErrorKind {
    /// Offset is at or past the end of the buffer (offset, buffer length)
    OffsetOutOfBounds(usize, usize),
    /// More bytes provided than the widest type can hold
    TooManyBytes(usize),
    /// Binary rendering is limited to 64 bits
    UnsupportedWidth(usize),
    /// Text could not be parsed in the requested format
    MalformedInput(String),
    /// Parsed value does not fit the numeric type
    ValueOutOfRange(NumericType),
    /// Range start is not below its end
    EmptyRange(usize, usize),
    /// Range at the index starts before its predecessor
    UnsortedRange(usize),
    /// Range at the index overlaps its predecessor
    OverlappingRange(usize),
    /// No range exists at the index
    IndexOutOfBounds(usize),
}

impl fmt::Display for MemViewErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OffsetOutOfBounds(offset, len) => {
                write!(
                    f,
                    "Offset 0x{offset:X} is outside of the buffer (size: {len} bytes)"
                )
            }
            Self::TooManyBytes(count) => {
                write!(f, "Expected at most 8 bytes, found {count}")
            }
            Self::UnsupportedWidth(bits) => {
                write!(f, "Binary rendering supports up to 64 bits, requested {bits}")
            }
            Self::MalformedInput(text) => {
                write!(f, "Malformed input: '{text}'")
            }
            Self::ValueOutOfRange(ntype) => {
                write!(f, "Value does not fit into {ntype}")
            }
            Self::EmptyRange(start, end) => {
                write!(f, "Range start 0x{start:X} must be below its end 0x{end:X}")
            }
            Self::UnsortedRange(idx) => {
                write!(f, "Range #{idx} starts before the previous range")
            }
            Self::OverlappingRange(idx) => {
                write!(f, "Range #{idx} overlaps the previous range")
            }
            Self::IndexOutOfBounds(idx) => {
                write!(f, "No range found at index {idx}")
            }
        }
    }
}

impl Error for MemViewError {}
impl Error for MemViewErrorKind {}
