//! Incremental JSON decoder with destination binding.
//!
//! jsonwalk reads JSON from any blocking [`std::io::Read`] source one byte at
//! a time and stores each value straight into a caller-supplied destination:
//! either a dynamic [`Value`] tree or a statically-shaped Rust value such as
//! `i32`, `[f64; 3]`, `Vec<String>` or `HashMap<String, Value>`.
//!
//! Error messages and offsets follow a reference JSON decoder byte for byte,
//! so the two can be compared on the same inputs.
//!
//! # Decoding Pipeline
//!
//! 1. **Cursor**: pulls single bytes from the source, counts them, and allows
//!    one byte of pushback for tokens that only end when the next byte is seen.
//!
//! 2. **Readers**: recursive descent over values, with dedicated scanners for
//!    numbers and strings.
//!
//! 3. **Binder**: commits each finished value into its destination slot, or
//!    reports a type mismatch.

mod binder;
mod cursor;
mod decoder;
mod destination;
mod error;
mod number;
mod string;
mod value;

use std::io::Read;

pub use decoder::Decoder;
pub use destination::{Destination, FloatSlot, IntSlot, Kind, Mapping, Sequence, Slot, Target};
pub use error::{DecodeError, Result};
pub use value::{Map, Value};

/// Decode one value from a byte slice.
///
/// Bytes after the first value are ignored.
///
/// # Example
///
/// ```
/// use libjsonwalk::from_slice;
///
/// let mut pair = [0u8; 2];
/// from_slice(b"[1, 2, 3]", &mut pair).unwrap();
/// assert_eq!(pair, [1, 2]);
/// ```
pub fn from_slice<T: Destination>(bytes: &[u8], dest: &mut T) -> Result<()> {
    from_reader(bytes, dest)
}

/// Decode one value from a reader.
pub fn from_reader<R: Read, T: Destination>(reader: R, dest: &mut T) -> Result<()> {
    Decoder::new(reader).decode(dest)
}
