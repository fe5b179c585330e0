//! Message writer.
//!
//! A [`Writer`] appends tagged fields to a caller-provided buffer. Values are
//! written in native byte order; a reader on a machine with the other byte
//! order corrects them when it is created.
//!
//! # Error handling
//!
//! The first failure is latched. Every later call returns that same error and
//! leaves the buffer and the used length untouched, so a sequence of writes can
//! be checked once at the end:
//!
//! ```
//! # use composite_message::*;
//! let mut buffer = [0u8; 8];
//! let mut writer = Writer::new(&mut buffer);
//! let _ = writer.write_u32(1); // 5 bytes, fits
//! let _ = writer.write_u32(2); // does not fit
//! let _ = writer.write_u8(3); // would fit, but the writer is already failed
//! assert_eq!(writer.first_error(), Some(CodecError::NoSpace));
//! assert_eq!(writer.len(), 7);
//! ```

use crate::buffer::{MARKER_LEN, write_marker};
use crate::errors::{CodecError, Result};
use crate::scalar::Scalar;
use crate::tag::{self, ARRAY_COUNT_LEN, ScalarKind, VERSION_LEN, VERSION_TAG};

/// Appends tagged values to a borrowed byte buffer.
#[derive(Debug)]
pub struct Writer<'a> {
    buf: &'a mut [u8],
    used: usize,
    first_error: Option<CodecError>,
}

impl<'a> Writer<'a> {
    /// Bind a writer to `buf` and write the endianness marker.
    ///
    /// If `buf` is shorter than the marker the writer starts out failed with
    /// [`CodecError::NoSpace`] and the buffer is left untouched.
    pub fn new(buf: &'a mut [u8]) -> Self {
        let (used, first_error) = match write_marker(buf) {
            Some(n) => (n, None),
            None => (0, Some(CodecError::NoSpace)),
        };
        Self {
            buf,
            used,
            first_error,
        }
    }

    /// Number of bytes written so far, marker included.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.used
    }

    /// True if nothing beyond the marker has been written.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.used <= MARKER_LEN
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes still available in the buffer.
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.used
    }

    /// The latched first error, if any.
    #[inline(always)]
    pub fn first_error(&self) -> Option<CodecError> {
        self.first_error
    }

    /// `Ok(())` if no write has failed so far.
    #[inline(always)]
    pub fn check(&self) -> Result<()> {
        match self.first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// The message produced so far.
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.used]
    }

    /// Release the buffer and return the finished message.
    ///
    /// Fails with the latched error if any write failed.
    ///
    /// # Example
    /// ```
    /// # use composite_message::*;
    /// let mut buffer = message_buffer();
    /// let mut writer = Writer::new(&mut buffer);
    /// writer.write_i32(-7).unwrap();
    /// let message = writer.finish().unwrap();
    ///
    /// let mut reader = Reader::new(message);
    /// assert_eq!(reader.read_i32(), Ok(-7));
    /// ```
    pub fn finish(self) -> Result<&'a mut [u8]> {
        if let Some(err) = self.first_error {
            return Err(err);
        }
        let Writer { buf, used, .. } = self;
        Ok(&mut buf[..used])
    }

    /// Record `err` unless an earlier error is already latched.
    #[inline]
    fn fail(&mut self, err: CodecError) -> CodecError {
        match self.first_error {
            Some(first) => first,
            None => {
                tracing::trace!(error = %err, used = self.used, "message writer failed");
                self.first_error = Some(err);
                err
            }
        }
    }

    /// Make sure `needed` more bytes fit, or latch [`CodecError::NoSpace`].
    #[inline(always)]
    fn reserve(&mut self, needed: usize) -> Result<()> {
        self.check()?;
        if self.remaining() < needed {
            return Err(self.fail(CodecError::NoSpace));
        }
        Ok(())
    }

    /// Append a tag and the bytes of a scalar value. Space must be reserved.
    #[inline(always)]
    fn put_tagged(&mut self, tag: u8, payload: &[u8]) {
        let start = self.used;
        self.buf[start] = tag;
        self.buf[start + 1..start + 1 + payload.len()].copy_from_slice(payload);
        self.used = start + 1 + payload.len();
    }

    /// Write one value of a [`Scalar`] type.
    #[inline]
    pub fn write<T: Scalar>(&mut self, value: T) -> Result<()> {
        let mut raw = [0u8; 8];
        value.encode(&mut raw);
        self.write_raw(T::KIND, &raw[..T::WIDTH])
    }

    /// Write one scalar given as raw native-order bytes.
    ///
    /// The width is `bytes.len()` and must be 1, 2, 4 or 8, otherwise
    /// [`CodecError::InvalidArg`] is latched.
    ///
    /// # Example
    /// ```
    /// # use composite_message::*;
    /// # use composite_message::tag::ScalarKind;
    /// let mut buffer = [0u8; 16];
    /// let mut writer = Writer::new(&mut buffer);
    /// writer.write_raw(ScalarKind::Unsigned, &300u16.to_ne_bytes()).unwrap();
    /// assert_eq!(writer.len(), 5);
    /// assert_eq!(writer.write_raw(ScalarKind::Unsigned, &[1, 2, 3]), Err(CodecError::InvalidArg));
    /// ```
    pub fn write_raw(&mut self, kind: ScalarKind, bytes: &[u8]) -> Result<()> {
        self.check()?;
        let Some(tag) = tag::compose_tag(kind.code(), bytes.len()) else {
            return Err(self.fail(CodecError::InvalidArg));
        };
        self.reserve(1 + bytes.len())?;
        self.put_tagged(tag, bytes);
        Ok(())
    }

    #[inline]
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write(value)
    }

    #[inline]
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write(value)
    }

    #[inline]
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write(value)
    }

    #[inline]
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.write(value)
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write(value)
    }

    #[inline]
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write(value)
    }

    #[inline]
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.write(value)
    }

    #[inline]
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.write(value)
    }

    #[inline]
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write(value)
    }

    #[inline]
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write(value)
    }

    #[inline]
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write(value)
    }

    /// Write a single one-byte character.
    #[inline]
    pub fn write_char(&mut self, value: u8) -> Result<()> {
        self.write_raw(ScalarKind::Char, &[value])
    }

    /// Write the protocol version.
    ///
    /// The value goes out as a 4-byte unsigned field whose tag is then
    /// replaced by [`VERSION_TAG`]. If the underlying write fails nothing is
    /// patched.
    pub fn write_version(&mut self, version: u32) -> Result<()> {
        self.write_u32(version)?;
        self.buf[self.used - VERSION_LEN - 1] = VERSION_TAG;
        Ok(())
    }

    /// Validate array arguments, reserve space and write tag and count.
    fn begin_array(&mut self, kind: ScalarKind, item_size: usize, count: usize) -> Result<()> {
        self.check()?;
        let Some(tag) = tag::array_tag(kind.code(), item_size) else {
            return Err(self.fail(CodecError::InvalidArg));
        };
        let Ok(stored_count) = u32::try_from(count) else {
            return Err(self.fail(CodecError::InvalidArg));
        };
        let needed = count
            .checked_mul(item_size)
            .and_then(|n| n.checked_add(1 + ARRAY_COUNT_LEN));
        let Some(needed) = needed else {
            return Err(self.fail(CodecError::NoSpace));
        };
        self.reserve(needed)?;
        self.put_tagged(tag, &stored_count.to_ne_bytes());
        Ok(())
    }

    /// Write an array of [`Scalar`] values.
    ///
    /// Layout: tag, `u32` element count, then the elements back to back.
    ///
    /// # Example
    /// ```
    /// # use composite_message::*;
    /// let mut buffer = [0u8; 64];
    /// let mut writer = Writer::new(&mut buffer);
    /// writer.write_array(&[0u32, 123, 17, u32::MAX, 234]).unwrap();
    /// assert_eq!(writer.len(), 2 + 1 + 4 + 20);
    /// ```
    pub fn write_array<T: Scalar>(&mut self, items: &[T]) -> Result<()> {
        self.begin_array(T::KIND, T::WIDTH, items.len())?;
        let payload = &mut self.buf[self.used..self.used + items.len() * T::WIDTH];
        for (item, out) in items.iter().zip(payload.chunks_exact_mut(T::WIDTH)) {
            item.encode(out);
        }
        self.used += items.len() * T::WIDTH;
        Ok(())
    }

    /// Write an array whose elements are given as raw native-order bytes.
    ///
    /// `item_size` must be 1, 2, 4 or 8 and `bytes.len()` a multiple of it,
    /// otherwise [`CodecError::InvalidArg`] is latched before anything is written.
    pub fn write_raw_array(&mut self, kind: ScalarKind, item_size: usize, bytes: &[u8]) -> Result<()> {
        self.check()?;
        if tag::ByteWidth::from_bytes(item_size).is_none() || bytes.len() % item_size != 0 {
            return Err(self.fail(CodecError::InvalidArg));
        }
        self.begin_array(kind, item_size, bytes.len() / item_size)?;
        self.buf[self.used..self.used + bytes.len()].copy_from_slice(bytes);
        self.used += bytes.len();
        Ok(())
    }

    /// Write an opaque byte array (1-byte unsigned elements).
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_raw_array(ScalarKind::Unsigned, 1, bytes)
    }

    /// Write a character array followed by a NUL element.
    ///
    /// The stored count includes the NUL, so the field reads back as a
    /// count-prefixed, NUL-terminated string.
    ///
    /// # Example
    /// ```
    /// # use composite_message::*;
    /// let mut buffer = [0u8; 32];
    /// let mut writer = Writer::new(&mut buffer);
    /// writer.write_chars(b"abc").unwrap();
    /// // tag + count + "abc" + NUL
    /// assert_eq!(writer.len(), 2 + 1 + 4 + 4);
    /// assert_eq!(&writer.as_bytes()[7..], b"abc\0");
    /// ```
    pub fn write_chars(&mut self, chars: &[u8]) -> Result<()> {
        let Some(count) = chars.len().checked_add(1) else {
            return Err(self.fail(CodecError::InvalidArg));
        };
        self.begin_array(ScalarKind::Char, 1, count)?;
        let start = self.used;
        self.buf[start..start + chars.len()].copy_from_slice(chars);
        self.buf[start + chars.len()] = 0;
        self.used += count;
        Ok(())
    }

    /// Write a UTF-8 string as a character array.
    #[inline]
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.write_chars(value.as_bytes())
    }
}
