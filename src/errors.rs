//! Error types for message writing and reading.
//!
//! Every [`Writer`](crate::Writer) and [`Reader`](crate::Reader) latches the
//! first error it encounters. Operations return the error directly as well, so
//! callers can either check each call or inspect the latched value once at the
//! end of a sequence.

use thiserror::Error;

/// Codec failure kinds.
///
/// The numeric codes returned by [`CodecError::code`] are stable and match the
/// values used by existing producers and consumers of the format, with `0`
/// reserved for "no error".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CodecError {
    /// Missing or unrecognized endianness marker, or a tag that could not be
    /// walked while normalizing byte order.
    #[error("message has no recognizable endianness marker")]
    NoEndian,
    /// Writer buffer exhausted, or reader destination too small for an array.
    #[error("not enough space in buffer")]
    NoSpace,
    /// The next field does not have the requested type, width or shape, or
    /// the message ends before it.
    #[error("no value of the requested type at current position")]
    NoValue,
    /// Unsupported element width or type code.
    #[error("invalid argument")]
    InvalidArg,
}

impl CodecError {
    /// Numeric error code (`1..=4`).
    ///
    /// # Example
    /// ```
    /// # use composite_message::CodecError;
    /// assert_eq!(CodecError::NoSpace.code(), 2);
    /// ```
    #[inline]
    pub const fn code(self) -> u32 {
        match self {
            CodecError::NoEndian => 1,
            CodecError::NoSpace => 2,
            CodecError::NoValue => 3,
            CodecError::InvalidArg => 4,
        }
    }

    /// Inverse of [`code`](Self::code). Returns `None` for `0` and for unknown codes.
    #[inline]
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(CodecError::NoEndian),
            2 => Some(CodecError::NoSpace),
            3 => Some(CodecError::NoValue),
            4 => Some(CodecError::InvalidArg),
            _ => None,
        }
    }
}

/// Result type for codec operations.
pub type Result<T> = core::result::Result<T, CodecError>;

/// Numeric code of an optional latched error, `0` when none is set.
#[inline]
pub fn error_code(error: Option<CodecError>) -> u32 {
    error.map_or(0, CodecError::code)
}
