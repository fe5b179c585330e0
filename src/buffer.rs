//! Message buffer layout and endianness marker handling.
//!
//! Every message starts with a 2-byte marker: the value [`ENDIAN_MARK`] stored
//! in the producer's native byte order. A reader compares the first two bytes
//! with the marker in its own order and in swapped order to decide whether the
//! rest of the message needs byte-order normalization.
//!
//! The codec never allocates. Callers own the backing storage, and
//! [`message_buffer`] is provided for producers that just want a stack buffer.

/// Default buffer size for message writing.
/// 1024 bytes comfortably fits typical telemetry and control messages.
pub const MESSAGE_BUFFER_SIZE: usize = 1024;

/// Endianness marker value. Written as `0x07 0x09` by big-endian producers and
/// `0x09 0x07` by little-endian ones.
pub const ENDIAN_MARK: u16 = 0x0709;

/// Marker value as seen by a consumer of the opposite byte order.
pub const ENDIAN_INV_MARK: u16 = ENDIAN_MARK.swap_bytes();

/// Length of the marker at the start of every message.
pub const MARKER_LEN: usize = 2;

/// Byte order of a message relative to the current machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Produced on a machine with the same byte order.
    Native,
    /// Produced on a machine with the opposite byte order.
    Swapped,
}

/// Marker bytes in native order.
///
/// # Example
/// ```
/// # use composite_message::marker_bytes;
/// #[cfg(target_endian = "little")]
/// assert_eq!(marker_bytes(), [0x09, 0x07]);
/// #[cfg(target_endian = "big")]
/// assert_eq!(marker_bytes(), [0x07, 0x09]);
/// ```
#[inline(always)]
pub const fn marker_bytes() -> [u8; MARKER_LEN] {
    ENDIAN_MARK.to_ne_bytes()
}

/// Zeroed stack buffer of [`MESSAGE_BUFFER_SIZE`] bytes.
///
/// # Example
/// ```
/// # use composite_message::*;
/// let mut buffer = message_buffer();
/// let mut writer = Writer::new(&mut buffer);
/// writer.write_u16(512).unwrap();
/// assert_eq!(writer.len(), MARKER_LEN + 1 + 2);
/// ```
#[inline]
pub const fn message_buffer() -> [u8; MESSAGE_BUFFER_SIZE] {
    [0u8; MESSAGE_BUFFER_SIZE]
}

/// Write the native marker into the first two bytes of `buf`.
///
/// Returns the number of bytes written, or `None` if `buf` is shorter than
/// [`MARKER_LEN`].
#[inline]
pub fn write_marker(buf: &mut [u8]) -> Option<usize> {
    let head = buf.get_mut(..MARKER_LEN)?;
    head.copy_from_slice(&marker_bytes());
    Some(MARKER_LEN)
}

/// Inspect the marker at the start of `message`.
///
/// Returns `None` if the message is shorter than the marker or starts with
/// anything other than the marker in either byte order.
///
/// # Example
/// ```
/// # use composite_message::*;
/// let native = marker_bytes();
/// let swapped = [native[1], native[0]];
/// assert_eq!(detect_byte_order(&native), Some(ByteOrder::Native));
/// assert_eq!(detect_byte_order(&swapped), Some(ByteOrder::Swapped));
/// assert_eq!(detect_byte_order(&[0, 0]), None);
/// assert_eq!(detect_byte_order(&[0x07]), None);
/// ```
#[inline]
pub fn detect_byte_order(message: &[u8]) -> Option<ByteOrder> {
    let head: [u8; MARKER_LEN] = message.get(..MARKER_LEN)?.try_into().ok()?;
    match u16::from_ne_bytes(head) {
        ENDIAN_MARK => Some(ByteOrder::Native),
        ENDIAN_INV_MARK => Some(ByteOrder::Swapped),
        _ => None,
    }
}
