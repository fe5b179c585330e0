//! Byte-order normalization of a complete tag stream.
//!
//! Messages carry no schema, but every tag states how wide its payload is, so
//! a single linear pass can reverse every multi-byte field in place:
//!
//! - scalar tags: reverse the `1 << (tag & 3)` payload bytes
//! - array tags: reverse the 4-byte count, then each element
//! - [`VERSION_TAG`](crate::tag::VERSION_TAG): reverse the 4-byte value
//!
//! A tag outside those shapes has no known length, so the pass cannot continue
//! past it and fails with [`CodecError::NoEndian`]. Any new tag added to the
//! format has to be taught to [`crate::tag::classify`] or messages using it
//! can no longer cross byte-order boundaries.

use crate::buffer::{ByteOrder, MARKER_LEN, detect_byte_order};
use crate::errors::{CodecError, Result};
use crate::tag::{ARRAY_COUNT_LEN, TagShape, VERSION_LEN, classify};

/// Which side of the swap the array counts can be read on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountOrder {
    /// Counts are foreign and become readable after they are reversed.
    AfterSwap,
    /// Counts are native and must be read before they are reversed.
    BeforeSwap,
}

/// Reverse `bytes` in place. Width 1 is a no-op.
#[inline(always)]
fn swap_field(bytes: &mut [u8]) {
    bytes.reverse();
}

/// Abort the walk at `offset`.
#[inline(never)]
fn unwalkable(offset: usize, tag: u8) -> CodecError {
    tracing::debug!(offset, tag, "cannot normalize byte order past tag");
    CodecError::NoEndian
}

fn swap_stream(stream: &mut [u8], counts: CountOrder) -> Result<()> {
    let len = stream.len();
    let mut pos = 0usize;

    while pos < len {
        let tag = stream[pos];
        let body = pos + 1;
        match classify(tag) {
            TagShape::Scalar { width } => {
                let end = body + width;
                if end > len {
                    return Err(unwalkable(pos, tag));
                }
                swap_field(&mut stream[body..end]);
                pos = end;
            }
            TagShape::Version => {
                let end = body + VERSION_LEN;
                if end > len {
                    return Err(unwalkable(pos, tag));
                }
                swap_field(&mut stream[body..end]);
                pos = end;
            }
            TagShape::Array { width } => {
                let items_start = body + ARRAY_COUNT_LEN;
                if items_start > len {
                    return Err(unwalkable(pos, tag));
                }
                let count_field = &mut stream[body..items_start];
                let mut raw = [0u8; ARRAY_COUNT_LEN];
                if counts == CountOrder::BeforeSwap {
                    raw.copy_from_slice(count_field);
                }
                swap_field(count_field);
                if counts == CountOrder::AfterSwap {
                    raw.copy_from_slice(count_field);
                }
                let count = u32::from_ne_bytes(raw) as usize;

                let items_end = count
                    .checked_mul(width)
                    .and_then(|n| n.checked_add(items_start))
                    .filter(|&end| end <= len);
                let Some(items_end) = items_end else {
                    return Err(unwalkable(pos, tag));
                };
                if width > 1 {
                    stream[items_start..items_end]
                        .chunks_exact_mut(width)
                        .for_each(swap_field);
                }
                pos = items_end;
            }
            TagShape::Unknown => return Err(unwalkable(pos, tag)),
        }
    }
    Ok(())
}

/// Convert a foreign-order tag stream (the bytes after the marker) to native
/// order in place.
///
/// On failure the stream is left partially converted and must be discarded.
///
/// # Example
/// ```
/// # use composite_message::normalize;
/// // u32 tag followed by a byte-swapped payload
/// let mut stream = [0b00110, 0x01, 0x02, 0x03, 0x04];
/// normalize(&mut stream).unwrap();
/// assert_eq!(&stream[1..], &[0x04, 0x03, 0x02, 0x01]);
///
/// // Reserved end-of-message tag cannot be walked
/// let mut stream = [0x00];
/// assert!(normalize(&mut stream).is_err());
/// ```
pub fn normalize(stream: &mut [u8]) -> Result<()> {
    swap_stream(stream, CountOrder::AfterSwap)
}

/// Rewrite a complete native-order message (marker included) in the opposite
/// byte order, as a producer of the other endianness would have written it.
///
/// Fails with [`CodecError::NoEndian`] if the message does not start with the
/// native marker or contains a tag that cannot be walked.
///
/// # Example
/// ```
/// # use composite_message::*;
/// let mut buffer = message_buffer();
/// let mut writer = Writer::new(&mut buffer);
/// writer.write_u16(0x1234).unwrap();
/// let message = writer.finish().unwrap();
///
/// flip_message(message).unwrap();
/// assert_eq!(detect_byte_order(message), Some(ByteOrder::Swapped));
/// assert_eq!(&message[3..5], &0x1234u16.swap_bytes().to_ne_bytes());
///
/// let mut reader = Reader::new(message);
/// assert_eq!(reader.read_u16(), Ok(0x1234));
/// ```
pub fn flip_message(message: &mut [u8]) -> Result<()> {
    if detect_byte_order(message) != Some(ByteOrder::Native) {
        return Err(CodecError::NoEndian);
    }
    swap_stream(&mut message[MARKER_LEN..], CountOrder::BeforeSwap)?;
    message[..MARKER_LEN].reverse();
    Ok(())
}
