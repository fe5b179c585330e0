//! One-byte field tags.
//!
//! Every encoded field starts with a tag byte describing what follows it.
//!
//! # Layout
//!
//! ```text
//! bit   7 6 5 4 3 2 1 0
//!       0 A N K K K L L
//! ```
//!
//! - `LL`: length selector, the payload width is `1 << LL` bytes (1, 2, 4 or 8)
//! - `KKK`: scalar type code (see [`ScalarKind`])
//! - `N`: "no value" flag, reserved and never produced
//! - `A`: array flag, the payload is a `u32` element count followed by the elements
//!
//! Two fixed tags sit outside that layout: [`VERSION_TAG`] (`1000 0011`,
//! followed by 4 bytes) and the reserved [`END_TAG`] (`0000 0000`).

/// Bits 0-1: payload length selector.
pub const LENGTH_MASK: u8 = 0b0000_0011;

/// Bits 2-4: scalar type code.
pub const KIND_MASK: u8 = 0b0001_1100;

/// Bits 0-4: complete scalar description (type code + length selector).
pub const SCALAR_MASK: u8 = 0b0001_1111;

/// Reserved "primitive without value" flag.
pub const NULL_FLAG: u8 = 0b0010_0000;

/// Array of the scalar described in bits 0-4.
pub const ARRAY_FLAG: u8 = 0b0100_0000;

/// Protocol version marker, always followed by a 4-byte unsigned value.
pub const VERSION_TAG: u8 = 0b1000_0011;

/// Reserved end-of-message marker.
pub const END_TAG: u8 = 0b0000_0000;

/// Size of an array element count on the wire.
pub const ARRAY_COUNT_LEN: usize = 4;

/// Size of the version payload on the wire.
pub const VERSION_LEN: usize = 4;

/// Scalar type code stored in bits 2-4 of a tag.
///
/// Float and double share [`ScalarKind::Float`] and differ only by width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ScalarKind {
    Unsigned = 0b001,
    Signed = 0b010,
    Float = 0b011,
    Bool = 0b100,
    Char = 0b101,
}

impl ScalarKind {
    /// Map a raw 3-bit type code to a kind. Returns `None` for the three
    /// unassigned codes.
    #[inline]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0b001 => Some(ScalarKind::Unsigned),
            0b010 => Some(ScalarKind::Signed),
            0b011 => Some(ScalarKind::Float),
            0b100 => Some(ScalarKind::Bool),
            0b101 => Some(ScalarKind::Char),
            _ => None,
        }
    }

    #[inline(always)]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Payload width of a scalar or array element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteWidth {
    One,
    Two,
    Four,
    Eight,
}

impl ByteWidth {
    /// Returns `None` unless `bytes` is 1, 2, 4 or 8.
    #[inline]
    pub const fn from_bytes(bytes: usize) -> Option<Self> {
        match bytes {
            1 => Some(ByteWidth::One),
            2 => Some(ByteWidth::Two),
            4 => Some(ByteWidth::Four),
            8 => Some(ByteWidth::Eight),
            _ => None,
        }
    }

    /// Decode a length selector. Only the low two bits are looked at, so this
    /// never fails.
    #[inline]
    pub const fn from_selector(selector: u8) -> Self {
        match selector & LENGTH_MASK {
            0 => ByteWidth::One,
            1 => ByteWidth::Two,
            2 => ByteWidth::Four,
            _ => ByteWidth::Eight,
        }
    }

    #[inline(always)]
    pub const fn selector(self) -> u8 {
        match self {
            ByteWidth::One => 0,
            ByteWidth::Two => 1,
            ByteWidth::Four => 2,
            ByteWidth::Eight => 3,
        }
    }

    #[inline(always)]
    pub const fn bytes(self) -> usize {
        1 << self.selector()
    }
}

/// Build a scalar tag from a raw type code and a byte width.
///
/// Returns `None` if `byte_width` is not 1, 2, 4 or 8. The type code is not
/// validated, it is masked into bits 2-4.
///
/// # Example
/// ```
/// # use composite_message::tag::{compose_tag, ScalarKind};
/// assert_eq!(compose_tag(ScalarKind::Unsigned.code(), 4), Some(0b0_0110));
/// assert_eq!(compose_tag(ScalarKind::Signed.code(), 1), Some(0b0_1000));
/// assert_eq!(compose_tag(ScalarKind::Float.code(), 8), Some(0b0_1111));
/// assert_eq!(compose_tag(ScalarKind::Unsigned.code(), 3), None);
/// ```
#[inline]
pub const fn compose_tag(kind_code: u8, byte_width: usize) -> Option<u8> {
    match ByteWidth::from_bytes(byte_width) {
        Some(width) => Some(((kind_code << 2) & KIND_MASK) | width.selector()),
        None => None,
    }
}

/// Split a tag into its raw type code and payload width.
///
/// Total over every byte: the width is always `1 << (tag & 3)` and the type
/// code is returned unchecked. Callers compare the code with what they expect.
///
/// # Example
/// ```
/// # use composite_message::tag::decompose_tag;
/// assert_eq!(decompose_tag(0b0_0110), (0b001, 4));
/// assert_eq!(decompose_tag(0xFF), (0b111, 8));
/// ```
#[inline]
pub const fn decompose_tag(tag: u8) -> (u8, usize) {
    ((tag & KIND_MASK) >> 2, ByteWidth::from_selector(tag).bytes())
}

/// Build an array tag for elements of the given type code and width.
#[inline]
pub const fn array_tag(kind_code: u8, byte_width: usize) -> Option<u8> {
    match compose_tag(kind_code, byte_width) {
        Some(tag) => Some(tag | ARRAY_FLAG),
        None => None,
    }
}

/// True if the tag is an array tag (array flag set, reserved bits clear).
#[inline(always)]
pub const fn is_array(tag: u8) -> bool {
    tag & !SCALAR_MASK == ARRAY_FLAG
}

/// Structural classification of a tag, enough to know how many payload bytes
/// follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagShape {
    /// A single value of `width` bytes.
    Scalar { width: usize },
    /// A `u32` count followed by `count` elements of `width` bytes.
    Array { width: usize },
    /// [`VERSION_TAG`], followed by 4 bytes.
    Version,
    /// Anything else. The payload length cannot be determined.
    Unknown,
}

/// Classify a tag byte.
///
/// Scalar and array tags are only recognized when their type code is one of
/// the [`ScalarKind`] codes.
#[inline]
pub const fn classify(tag: u8) -> TagShape {
    if tag == VERSION_TAG {
        return TagShape::Version;
    }
    let (code, width) = decompose_tag(tag);
    if ScalarKind::from_code(code).is_none() {
        return TagShape::Unknown;
    }
    match tag & !SCALAR_MASK {
        0 => TagShape::Scalar { width },
        ARRAY_FLAG => TagShape::Array { width },
        _ => TagShape::Unknown,
    }
}
