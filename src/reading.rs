//! Message reader.
//!
//! A [`Reader`] consumes fields in exactly the order the producer wrote them;
//! the format carries no index. Each read checks the tag at the current
//! position against the requested type and width before touching the payload.
//!
//! # Byte order
//!
//! Creating a reader inspects the 2-byte marker. If the message came from a
//! machine of the other byte order, the whole remaining buffer is rewritten in
//! place once (see [`normalize`](crate::normalize())). Reads never convert.
//!
//! # Error handling
//!
//! Same model as the writer: the first error is latched, every later call
//! returns it without moving the cursor, and value-returning calls yield no
//! value.

use crate::buffer::{ByteOrder, MARKER_LEN, detect_byte_order};
use crate::errors::{CodecError, Result};
use crate::normalize::normalize;
use crate::scalar::Scalar;
use crate::tag::{self, ARRAY_COUNT_LEN, ByteWidth, ScalarKind, VERSION_LEN, VERSION_TAG};

/// Reads tagged values from a borrowed message.
///
/// The message is borrowed mutably because a foreign-order message is
/// normalized in place.
#[derive(Debug)]
pub struct Reader<'a> {
    message: &'a mut [u8],
    offset: usize,
    first_error: Option<CodecError>,
    byte_order: ByteOrder,
}

impl<'a> Reader<'a> {
    /// Bind a reader to `message`.
    ///
    /// Fails (latching [`CodecError::NoEndian`]) if the marker is missing or
    /// if a foreign-order message contains a tag that cannot be normalized.
    /// In the latter case the message is left partially rewritten.
    ///
    /// # Example
    /// ```
    /// # use composite_message::*;
    /// let mut message = [0u8, 0];
    /// let reader = Reader::new(&mut message);
    /// assert_eq!(reader.first_error(), Some(CodecError::NoEndian));
    /// ```
    pub fn new(message: &'a mut [u8]) -> Self {
        let order = detect_byte_order(message);
        let mut reader = Self {
            message,
            offset: 0,
            first_error: None,
            byte_order: order.unwrap_or(ByteOrder::Native),
        };
        match order {
            None => {
                reader.fail(CodecError::NoEndian);
            }
            Some(ByteOrder::Native) => reader.offset = MARKER_LEN,
            Some(ByteOrder::Swapped) => {
                tracing::debug!(
                    len = reader.message.len(),
                    "normalizing message from foreign byte order"
                );
                match normalize(&mut reader.message[MARKER_LEN..]) {
                    Ok(()) => reader.offset = MARKER_LEN,
                    Err(err) => {
                        reader.fail(err);
                    }
                }
            }
        }
        reader
    }

    /// Current read position, marker included.
    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Total message length.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.message.len()
    }

    /// True if every field has been consumed.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Bytes not yet consumed.
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.message.len() - self.offset
    }

    /// Byte order the message was produced in, relative to this machine.
    #[inline(always)]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// The latched first error, if any.
    #[inline(always)]
    pub fn first_error(&self) -> Option<CodecError> {
        self.first_error
    }

    /// `Ok(())` if no read has failed so far.
    #[inline(always)]
    pub fn check(&self) -> Result<()> {
        match self.first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    #[inline]
    fn fail(&mut self, err: CodecError) -> CodecError {
        match self.first_error {
            Some(first) => first,
            None => {
                tracing::trace!(error = %err, offset = self.offset, "message reader failed");
                self.first_error = Some(err);
                err
            }
        }
    }

    /// Locate a field with exactly `expected_tag` and a `width`-byte payload.
    ///
    /// Returns the payload offset without advancing.
    #[inline(always)]
    fn expect_field(&mut self, expected_tag: u8, width: usize) -> Result<usize> {
        self.check()?;
        if self.remaining() < 1 + width || self.message[self.offset] != expected_tag {
            return Err(self.fail(CodecError::NoValue));
        }
        Ok(self.offset + 1)
    }

    /// Read one value of a [`Scalar`] type.
    ///
    /// Both the type code and the width of the tag must match `T`; anything
    /// else is [`CodecError::NoValue`] and the cursor stays put.
    #[inline]
    pub fn read<T: Scalar>(&mut self) -> Result<T> {
        let mut raw = [0u8; 8];
        self.read_raw(T::KIND, &mut raw[..T::WIDTH])?;
        Ok(T::decode(&raw))
    }

    /// Read one scalar of `kind` into `out`, whose length is the expected width.
    ///
    /// # Example
    /// ```
    /// # use composite_message::*;
    /// # use composite_message::tag::ScalarKind;
    /// let mut buffer = [0u8; 16];
    /// let mut writer = Writer::new(&mut buffer);
    /// writer.write_u64(42).unwrap();
    /// let message = writer.finish().unwrap();
    ///
    /// let mut reader = Reader::new(message);
    /// let mut out = [0u8; 4];
    /// assert_eq!(reader.read_raw(ScalarKind::Signed, &mut out), Err(CodecError::NoValue));
    /// assert_eq!(reader.offset(), 2);
    /// ```
    pub fn read_raw(&mut self, kind: ScalarKind, out: &mut [u8]) -> Result<()> {
        self.check()?;
        let Some(expected) = tag::compose_tag(kind.code(), out.len()) else {
            return Err(self.fail(CodecError::InvalidArg));
        };
        let start = self.expect_field(expected, out.len())?;
        out.copy_from_slice(&self.message[start..start + out.len()]);
        self.offset = start + out.len();
        Ok(())
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read()
    }

    #[inline]
    pub fn read_i8(&mut self) -> Result<i8> {
        self.read()
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read()
    }

    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        self.read()
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read()
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        self.read()
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        self.read()
    }

    #[inline]
    pub fn read_i64(&mut self) -> Result<i64> {
        self.read()
    }

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        self.read()
    }

    #[inline]
    pub fn read_f64(&mut self) -> Result<f64> {
        self.read()
    }

    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        self.read()
    }

    /// Read a single one-byte character.
    #[inline]
    pub fn read_char(&mut self) -> Result<u8> {
        let mut raw = [0u8; 1];
        self.read_raw(ScalarKind::Char, &mut raw)?;
        Ok(raw[0])
    }

    /// Read the protocol version written by
    /// [`Writer::write_version`](crate::Writer::write_version).
    pub fn read_version(&mut self) -> Result<u32> {
        let start = self.expect_field(VERSION_TAG, VERSION_LEN)?;
        let mut raw = [0u8; VERSION_LEN];
        raw.copy_from_slice(&self.message[start..start + VERSION_LEN]);
        self.offset = start + VERSION_LEN;
        Ok(u32::from_ne_bytes(raw))
    }

    /// Element count of the array at the current position.
    ///
    /// Does not advance; repeated calls return the same count until another
    /// read moves the cursor.
    ///
    /// # Example
    /// ```
    /// # use composite_message::*;
    /// let mut buffer = [0u8; 64];
    /// let mut writer = Writer::new(&mut buffer);
    /// writer.write_array(&[1.5f64, 2.5]).unwrap();
    /// let message = writer.finish().unwrap();
    ///
    /// let mut reader = Reader::new(message);
    /// assert_eq!(reader.peek_array_count(), Ok(2));
    /// assert_eq!(reader.peek_array_count(), Ok(2));
    /// assert_eq!(reader.offset(), 2);
    /// ```
    pub fn peek_array_count(&mut self) -> Result<usize> {
        self.check()?;
        if self.remaining() < 1 + ARRAY_COUNT_LEN || !tag::is_array(self.message[self.offset]) {
            return Err(self.fail(CodecError::NoValue));
        }
        let start = self.offset + 1;
        let mut raw = [0u8; ARRAY_COUNT_LEN];
        raw.copy_from_slice(&self.message[start..start + ARRAY_COUNT_LEN]);
        Ok(u32::from_ne_bytes(raw) as usize)
    }

    /// Validate an array of `kind`/`item_size` at the cursor and return its
    /// count and payload range. Does not advance.
    fn expect_array(
        &mut self,
        kind: ScalarKind,
        item_size: usize,
        capacity: usize,
    ) -> Result<(usize, usize, usize)> {
        self.check()?;
        let Some(expected) = tag::array_tag(kind.code(), item_size) else {
            return Err(self.fail(CodecError::InvalidArg));
        };
        let count = self.peek_array_count()?;
        if self.message[self.offset] != expected {
            return Err(self.fail(CodecError::NoValue));
        }
        let start = self.offset + 1 + ARRAY_COUNT_LEN;
        let end = count
            .checked_mul(item_size)
            .and_then(|n| n.checked_add(start))
            .filter(|&end| end <= self.message.len());
        let Some(end) = end else {
            return Err(self.fail(CodecError::NoValue));
        };
        if capacity < count {
            return Err(self.fail(CodecError::NoSpace));
        }
        Ok((count, start, end))
    }

    /// Read an array of [`Scalar`] values into `dest`.
    ///
    /// Returns the element count. If `dest` is shorter than the stored array
    /// nothing is copied and [`CodecError::NoSpace`] is latched.
    pub fn read_array<T: Scalar>(&mut self, dest: &mut [T]) -> Result<usize> {
        let (count, start, end) = self.expect_array(T::KIND, T::WIDTH, dest.len())?;
        let items = self.message[start..end].chunks_exact(T::WIDTH);
        for (slot, raw) in dest.iter_mut().zip(items) {
            *slot = T::decode(raw);
        }
        self.offset = end;
        Ok(count)
    }

    /// Read an array of `kind` elements as raw native-order bytes.
    ///
    /// `dest` holds `dest.len() / item_size` elements. `item_size` must be
    /// 1, 2, 4 or 8, otherwise [`CodecError::InvalidArg`] is latched before
    /// the message is looked at.
    pub fn read_raw_array(&mut self, kind: ScalarKind, item_size: usize, dest: &mut [u8]) -> Result<usize> {
        self.check()?;
        if ByteWidth::from_bytes(item_size).is_none() {
            return Err(self.fail(CodecError::InvalidArg));
        }
        let (count, start, end) = self.expect_array(kind, item_size, dest.len() / item_size)?;
        dest[..end - start].copy_from_slice(&self.message[start..end]);
        self.offset = end;
        Ok(count)
    }

    /// Read an opaque byte array written by
    /// [`Writer::write_bytes`](crate::Writer::write_bytes).
    #[inline]
    pub fn read_bytes(&mut self, dest: &mut [u8]) -> Result<usize> {
        self.read_raw_array(ScalarKind::Unsigned, 1, dest)
    }

    /// Read a character array into `dest`, NUL terminator included.
    ///
    /// Returns the string length, which is one less than the stored count.
    /// `dest` must have room for the terminator as well.
    ///
    /// # Example
    /// ```
    /// # use composite_message::*;
    /// let mut buffer = [0u8; 32];
    /// let mut writer = Writer::new(&mut buffer);
    /// writer.write_chars(b"abc").unwrap();
    /// let message = writer.finish().unwrap();
    ///
    /// let mut reader = Reader::new(message);
    /// assert_eq!(reader.peek_array_count(), Ok(4));
    /// let mut dest = [0xFFu8; 8];
    /// assert_eq!(reader.read_chars(&mut dest), Ok(3));
    /// assert_eq!(&dest[..4], b"abc\0");
    /// ```
    pub fn read_chars(&mut self, dest: &mut [u8]) -> Result<usize> {
        let count = self.read_raw_array(ScalarKind::Char, 1, dest)?;
        Ok(count.saturating_sub(1))
    }

    /// Read a character array as UTF-8, using `dest` as storage.
    ///
    /// Invalid UTF-8 is reported as [`CodecError::NoValue`] without moving
    /// the cursor.
    pub fn read_str<'d>(&mut self, dest: &'d mut [u8]) -> Result<&'d str> {
        self.check()?;
        let (count, start, end) = self.expect_array(ScalarKind::Char, 1, dest.len())?;
        let len = count.saturating_sub(1);
        if core::str::from_utf8(&self.message[start..start + len]).is_err() {
            return Err(self.fail(CodecError::NoValue));
        }
        dest[..count].copy_from_slice(&self.message[start..end]);
        self.offset = end;
        // Validated above, before the copy
        Ok(unsafe { core::str::from_utf8_unchecked(&dest[..len]) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::marker_bytes;
    use crate::normalize::flip_message;
    use crate::writing::Writer;

    #[test]
    fn test_reader_without_marker() {
        let mut buffer = [0u8; 2];
        let mut reader = Reader::new(&mut buffer);
        assert_eq!(reader.first_error(), Some(CodecError::NoEndian));
        assert_eq!(reader.offset(), 0);
        assert_eq!(reader.read_u8(), Err(CodecError::NoEndian));
        assert_eq!(reader.offset(), 0);

        let mut short = [0x07u8];
        let reader = Reader::new(&mut short);
        assert_eq!(reader.first_error(), Some(CodecError::NoEndian));
    }

    #[test]
    fn test_reader_with_same_endianness() {
        let mut buffer = marker_bytes();
        let reader = Reader::new(&mut buffer);
        assert_eq!(reader.first_error(), None);
        assert_eq!(reader.offset(), 2);
        assert_eq!(reader.byte_order(), ByteOrder::Native);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_reader_with_inverted_endianness() {
        let native = marker_bytes();
        let mut buffer = [native[1], native[0]];
        let reader = Reader::new(&mut buffer);
        assert_eq!(reader.first_error(), None);
        assert_eq!(reader.offset(), 2);
        assert_eq!(reader.byte_order(), ByteOrder::Swapped);
    }

    #[test]
    fn test_inverted_message_with_unknown_tag() {
        let native = marker_bytes();
        let mut buffer = [native[1], native[0], 0b00101, 1, 2, 0x81];
        let mut reader = Reader::new(&mut buffer);
        assert_eq!(reader.first_error(), Some(CodecError::NoEndian));
        assert_eq!(reader.read_u16(), Err(CodecError::NoEndian));
    }

    #[test]
    fn test_read_i8() {
        for value in [-128i8, 5, 127] {
            let mut buffer = [0u8; 1024];
            let mut writer = Writer::new(&mut buffer);
            writer.write_i8(value).unwrap();
            let message = writer.finish().unwrap();

            let mut reader = Reader::new(message);
            assert_eq!(reader.read_i8(), Ok(value));
            assert_eq!(reader.first_error(), None);
            assert_eq!(reader.offset(), 4);
        }
    }

    #[test]
    fn test_read_from_empty_message() {
        let mut buffer = [0u8; 2];
        let message = Writer::new(&mut buffer).finish().unwrap();
        let mut reader = Reader::new(message);
        assert_eq!(reader.read_i8(), Err(CodecError::NoValue));
        assert_eq!(reader.first_error(), Some(CodecError::NoValue));
    }

    #[test]
    fn test_concrete_scenario() {
        let mut buffer = [0u8; 1024];
        let mut writer = Writer::new(&mut buffer);
        writer.write_i8(-128).unwrap();
        writer.write_u32(4_294_967_295).unwrap();
        writer.write_array(&[0u32, 123, 17, 4_294_967_295, 234]).unwrap();
        assert_eq!(writer.first_error(), None);
        assert_eq!(writer.len(), 34);

        let mut reader = Reader::new(&mut buffer[..34]);
        assert_eq!(reader.read_i8(), Ok(-128));
        assert_eq!(reader.read_u32(), Ok(4_294_967_295));
        let mut items = [0u32; 5];
        assert_eq!(reader.read_array(&mut items), Ok(5));
        assert_eq!(items, [0, 123, 17, 4_294_967_295, 234]);
        assert_eq!(reader.first_error(), None);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_type_mismatch() {
        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_u64(u64::MAX).unwrap();
        let message = writer.finish().unwrap();

        let mut reader = Reader::new(message);
        assert_eq!(reader.read_i32(), Err(CodecError::NoValue));
        assert_eq!(reader.offset(), 2);
        // Right width, wrong type
        assert_eq!(reader.read_i64(), Err(CodecError::NoValue));
        assert_eq!(reader.offset(), 2);
    }

    #[test]
    fn test_width_mismatch() {
        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_u16(1).unwrap();
        let message = writer.finish().unwrap();

        let mut reader = Reader::new(message);
        assert_eq!(reader.read_u32(), Err(CodecError::NoValue));
    }

    #[test]
    fn test_float_and_double_share_code() {
        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_f32(0.5).unwrap();
        writer.write_f64(-0.25).unwrap();
        let message = writer.finish().unwrap();

        let mut reader = Reader::new(message);
        assert_eq!(reader.read_f64(), Err(CodecError::NoValue));

        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_f32(0.5).unwrap();
        writer.write_f64(-0.25).unwrap();
        let message = writer.finish().unwrap();
        let mut reader = Reader::new(message);
        assert_eq!(reader.read_f32(), Ok(0.5));
        assert_eq!(reader.read_f64(), Ok(-0.25));
    }

    #[test]
    fn test_null_tag_is_no_value() {
        let native = marker_bytes();
        let mut buffer = [native[0], native[1], 0b00100 | 0x20, 0];
        let mut reader = Reader::new(&mut buffer);
        assert_eq!(reader.read_u8(), Err(CodecError::NoValue));
    }

    #[test]
    fn test_truncated_scalar() {
        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_u32(9).unwrap();
        let mut reader = Reader::new(&mut buffer[..6]);
        assert_eq!(reader.read_u32(), Err(CodecError::NoValue));
    }

    #[test]
    fn test_sticky_error() {
        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_u8(1).unwrap();
        writer.write_u8(2).unwrap();
        writer.write_array(&[1u16, 2]).unwrap();
        writer.write_version(3).unwrap();
        let message = writer.finish().unwrap();

        let mut reader = Reader::new(message);
        assert_eq!(reader.read_bool(), Err(CodecError::NoValue));
        assert_eq!(reader.read_u8(), Err(CodecError::NoValue));
        assert_eq!(reader.peek_array_count(), Err(CodecError::NoValue));
        let mut items = [0u16; 4];
        assert_eq!(reader.read_array(&mut items), Err(CodecError::NoValue));
        assert_eq!(reader.read_version(), Err(CodecError::NoValue));
        assert_eq!(
            reader.read_raw_array(ScalarKind::Unsigned, 3, &mut [0; 9]),
            Err(CodecError::NoValue)
        );
        assert_eq!(reader.first_error(), Some(CodecError::NoValue));
        assert_eq!(reader.offset(), 2);
        assert_eq!(items, [0; 4]);
    }

    #[test]
    fn test_peek_requires_array() {
        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_u32(5).unwrap();
        let message = writer.finish().unwrap();

        let mut reader = Reader::new(message);
        assert_eq!(reader.peek_array_count(), Err(CodecError::NoValue));
        assert_eq!(reader.offset(), 2);
    }

    #[test]
    fn test_peek_truncated_count() {
        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_array(&[1u8]).unwrap();
        let mut reader = Reader::new(&mut buffer[..6]);
        assert_eq!(reader.peek_array_count(), Err(CodecError::NoValue));
    }

    #[test]
    fn test_read_array_wrong_element_type() {
        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_array(&[1i32, -1]).unwrap();
        let message = writer.finish().unwrap();

        let mut reader = Reader::new(message);
        let mut dest = [0u32; 2];
        assert_eq!(reader.read_array(&mut dest), Err(CodecError::NoValue));
        assert_eq!(reader.offset(), 2);
    }

    #[test]
    fn test_read_array_destination_too_small() {
        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_array(&[1i32, 2, 3]).unwrap();
        let message = writer.finish().unwrap();

        let mut reader = Reader::new(message);
        let mut dest = [0i32; 2];
        assert_eq!(reader.read_array(&mut dest), Err(CodecError::NoSpace));
        assert_eq!(dest, [0, 0]);
        assert_eq!(reader.offset(), 2);
        assert_eq!(reader.first_error(), Some(CodecError::NoSpace));
    }

    #[test]
    fn test_read_array_truncated_payload() {
        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_array(&[1i32, 2, 3]).unwrap();
        let mut reader = Reader::new(&mut buffer[..2 + 5 + 8]);
        let mut dest = [0i32; 3];
        assert_eq!(reader.read_array(&mut dest), Err(CodecError::NoValue));
    }

    #[test]
    fn test_read_raw_array() {
        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_array(&[0x0102u16, 0x0304]).unwrap();
        let message = writer.finish().unwrap();

        let mut reader = Reader::new(message);
        let mut dest = [0u8; 6];
        assert_eq!(reader.read_raw_array(ScalarKind::Unsigned, 2, &mut dest), Ok(2));
        assert_eq!(&dest[..2], &0x0102u16.to_ne_bytes());
        assert_eq!(&dest[2..4], &0x0304u16.to_ne_bytes());
        assert_eq!(&dest[4..], &[0, 0]);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_raw_array_invalid_item_size() {
        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_bytes(&[1, 2, 3]).unwrap();
        let message = writer.finish().unwrap();

        for item_size in [0usize, 3, 16] {
            let mut copy = [0u8; 64];
            copy[..message.len()].copy_from_slice(message);
            let mut reader = Reader::new(&mut copy[..message.len()]);
            let mut dest = [0u8; 48];
            assert_eq!(
                reader.read_raw_array(ScalarKind::Unsigned, item_size, &mut dest),
                Err(CodecError::InvalidArg)
            );
            assert_eq!(reader.offset(), 2);
        }
    }

    #[test]
    fn test_read_bytes() {
        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_bytes(&[1, 2, 3]).unwrap();
        writer.write_bytes(&[]).unwrap();
        let message = writer.finish().unwrap();

        let mut reader = Reader::new(message);
        let mut dest = [0u8; 3];
        assert_eq!(reader.read_bytes(&mut dest), Ok(3));
        assert_eq!(dest, [1, 2, 3]);
        assert_eq!(reader.read_bytes(&mut []), Ok(0));
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_chars_needs_room_for_nul() {
        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_chars(b"abc").unwrap();
        let message = writer.finish().unwrap();

        let mut reader = Reader::new(message);
        let mut dest = [0u8; 3];
        assert_eq!(reader.read_chars(&mut dest), Err(CodecError::NoSpace));
    }

    #[test]
    fn test_read_chars_is_not_a_byte_array() {
        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_str("abc").unwrap();
        let message = writer.finish().unwrap();

        let mut reader = Reader::new(message);
        let mut dest = [0u8; 8];
        assert_eq!(reader.read_bytes(&mut dest), Err(CodecError::NoValue));
    }

    #[test]
    fn test_read_str() {
        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_str("héllo").unwrap();
        writer.write_str("").unwrap();
        let message = writer.finish().unwrap();

        let mut reader = Reader::new(message);
        let mut dest = [0u8; 16];
        assert_eq!(reader.read_str(&mut dest), Ok("héllo"));
        let mut dest = [0u8; 1];
        assert_eq!(reader.read_str(&mut dest), Ok(""));
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_str_invalid_utf8() {
        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_chars(&[0xFF, 0xFE]).unwrap();
        let message = writer.finish().unwrap();

        let mut reader = Reader::new(message);
        let mut dest = [0u8; 16];
        assert_eq!(reader.read_str(&mut dest), Err(CodecError::NoValue));
        assert_eq!(reader.offset(), 2);
    }

    #[test]
    fn test_read_version() {
        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_version(157).unwrap();
        writer.write_u32(157).unwrap();
        let message = writer.finish().unwrap();

        let mut reader = Reader::new(message);
        assert_eq!(reader.read_u32(), Err(CodecError::NoValue));

        let mut buffer = [0u8; 64];
        let mut writer = Writer::new(&mut buffer);
        writer.write_version(157).unwrap();
        writer.write_u32(157).unwrap();
        let message = writer.finish().unwrap();
        let mut reader = Reader::new(message);
        assert_eq!(reader.read_version(), Ok(157));
        assert_eq!(reader.read_version(), Err(CodecError::NoValue));
    }

    #[test]
    fn test_foreign_message_is_normalized() {
        let mut buffer = [0u8; 128];
        let mut writer = Writer::new(&mut buffer);
        writer.write_i16(-2).unwrap();
        writer.write_f64(core::f64::consts::PI).unwrap();
        writer.write_array(&[1u64, u64::MAX - 1]).unwrap();
        writer.write_version(0x0102_0304).unwrap();
        writer.write_str("ok").unwrap();
        let message = writer.finish().unwrap();
        flip_message(message).unwrap();

        let mut reader = Reader::new(message);
        assert_eq!(reader.byte_order(), ByteOrder::Swapped);
        assert_eq!(reader.read_i16(), Ok(-2));
        assert_eq!(reader.read_f64(), Ok(core::f64::consts::PI));
        assert_eq!(reader.peek_array_count(), Ok(2));
        let mut items = [0u64; 2];
        assert_eq!(reader.read_array(&mut items), Ok(2));
        assert_eq!(items, [1, u64::MAX - 1]);
        assert_eq!(reader.read_version(), Ok(0x0102_0304));
        let mut dest = [0u8; 8];
        assert_eq!(reader.read_str(&mut dest), Ok("ok"));
        assert_eq!(reader.check(), Ok(()));
    }
}
