//! Rust types that map onto scalar tags.
//!
//! All values are stored in the producer's native byte order. Conversion to the
//! consumer's order happens once, when a [`Reader`](crate::Reader) is created.

use crate::tag::ScalarKind;

mod sealed {
    pub trait Sealed {}
}

/// A value that can be written as a single tagged field or as an array element.
///
/// Implemented for the fixed-width integers, `f32`, `f64` and `bool`. One-byte
/// characters go through [`Writer::write_char`](crate::Writer::write_char)
/// since `u8` already maps to the unsigned 8-bit scalar.
pub trait Scalar: Copy + Default + sealed::Sealed {
    /// Type code written into the tag.
    const KIND: ScalarKind;
    /// Payload width in bytes (1, 2, 4 or 8).
    const WIDTH: usize;

    /// Write the native-order bytes of `self` into `out[..Self::WIDTH]`.
    fn encode(self, out: &mut [u8]);

    /// Read a value from `bytes[..Self::WIDTH]`.
    fn decode(bytes: &[u8]) -> Self;
}

macro_rules! impl_scalar {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Scalar for $ty {
                const KIND: ScalarKind = $kind;
                const WIDTH: usize = core::mem::size_of::<$ty>();

                #[inline(always)]
                fn encode(self, out: &mut [u8]) {
                    out[..Self::WIDTH].copy_from_slice(&self.to_ne_bytes());
                }

                #[inline(always)]
                fn decode(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; core::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::WIDTH]);
                    <$ty>::from_ne_bytes(raw)
                }
            }
        )*
    };
}

impl_scalar! {
    u8 => ScalarKind::Unsigned,
    u16 => ScalarKind::Unsigned,
    u32 => ScalarKind::Unsigned,
    u64 => ScalarKind::Unsigned,
    i8 => ScalarKind::Signed,
    i16 => ScalarKind::Signed,
    i32 => ScalarKind::Signed,
    i64 => ScalarKind::Signed,
    f32 => ScalarKind::Float,
    f64 => ScalarKind::Float,
}

impl sealed::Sealed for bool {}

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;
    const WIDTH: usize = 1;

    #[inline(always)]
    fn encode(self, out: &mut [u8]) {
        out[0] = u8::from(self);
    }

    /// Any non-zero byte is `true`.
    #[inline(always)]
    fn decode(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}
