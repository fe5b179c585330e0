//! # composite-message
//!
//! Zero-allocation, self-describing binary messages.
//!
//! A [`Writer`] appends tagged values to a caller-owned buffer; a [`Reader`]
//! recovers them in the same order, checking each tag before it reads the
//! payload. Messages carry a 2-byte endianness marker, and a reader on a
//! machine of the other byte order normalizes the whole message once, in
//! place, when it is created.
//!
//! ## Wire Format
//!
//! ```text
//! [2 bytes]  endianness marker 0x0709 in the producer's native order
//! [1 byte]   tag      ─┐
//! [N bytes]  payload  ─┘ one pair per written value
//! ```
//!
//! See [`tag`] for the tag byte layout.
//!
//! ## Design
//!
//! - Zero allocations: all state lives in caller-provided buffers
//! - Values are written in native order, conversion is the reader's job
//! - First error wins: a failed writer or reader turns every later call into
//!   a no-op that reports the original error
//! - No skipping: fields must be read in the order they were written
//!
//! # Example
//!
//! ```rust
//! use composite_message::*;
//!
//! let mut buffer = message_buffer();
//! let mut writer = Writer::new(&mut buffer);
//! writer.write_version(3).unwrap();
//! writer.write_i8(-128).unwrap();
//! writer.write_u32(u32::MAX).unwrap();
//! writer.write_array(&[0u32, 123, 17, u32::MAX, 234]).unwrap();
//! writer.write_str("sensor-7").unwrap();
//! let message = writer.finish().unwrap();
//!
//! let mut reader = Reader::new(message);
//! assert_eq!(reader.read_version(), Ok(3));
//! assert_eq!(reader.read_i8(), Ok(-128));
//! assert_eq!(reader.read_u32(), Ok(u32::MAX));
//!
//! let mut items = [0u32; 8];
//! let count = reader.read_array(&mut items).unwrap();
//! assert_eq!(&items[..count], &[0, 123, 17, u32::MAX, 234]);
//!
//! let mut name = [0u8; 16];
//! assert_eq!(reader.read_str(&mut name), Ok("sensor-7"));
//! assert_eq!(reader.first_error(), None);
//! ```

pub mod buffer;
pub mod errors;
pub mod normalize;
pub mod reading;
pub mod scalar;
pub mod tag;
pub mod writing;

// Re-export the public API for convenience
pub use buffer::*;
pub use errors::*;
pub use normalize::{flip_message, normalize};
pub use reading::*;
pub use scalar::*;
pub use tag::{ByteWidth, ScalarKind};
pub use writing::*;
