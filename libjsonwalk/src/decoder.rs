//! Recursive-descent decoder.
//!
//! The decoder pulls bytes from a [`ByteCursor`] and commits each value into
//! the slot it was handed as soon as the value is complete. Composite values
//! hand each element its own slot, so a statically-shaped destination is
//! filled in place without building an intermediate tree.

use std::io::Read;

use log::{debug, trace};

use crate::cursor::{is_space, ByteCursor};
use crate::destination::{Mapping, Sequence, Slot, Target};
use crate::error::{quote_char, DecodeError, Result};
use crate::number::scan_number;
use crate::string::{into_text, scan_string};
use crate::value::Value;

const TRUE_TAIL: &[u8] = b"rue";
const FALSE_TAIL: &[u8] = b"alse";
const NULL_TAIL: &[u8] = b"ull";

/// Decodes successive top-level JSON values from a byte source.
///
/// The offset is cumulative across calls, so a stream holding several
/// values back to back can be read with repeated [`Decoder::decode`] calls
/// until one returns [`DecodeError::Eof`].
///
/// # Example
///
/// ```
/// use libjsonwalk::{Decoder, Value};
///
/// let mut decoder = Decoder::new(&b"1 [true]"[..]);
/// let mut value = Value::Null;
/// decoder.decode(&mut value).unwrap();
/// assert_eq!(value, Value::Number(1.0));
/// decoder.decode(&mut value).unwrap();
/// assert_eq!(value, Value::Array(vec![Value::Bool(true)]));
/// assert!(decoder.decode(&mut value).unwrap_err().is_eof());
/// ```
pub struct Decoder<R> {
    cursor: ByteCursor<R>,
}

impl<R: Read> Decoder<R> {
    pub fn new(source: R) -> Self {
        Self {
            cursor: ByteCursor::new(source),
        }
    }

    /// Bytes consumed so far, across every `decode` call.
    pub fn offset(&self) -> u64 {
        self.cursor.offset()
    }

    /// Give back the source.
    ///
    /// A value that ends only when the next byte is seen (a number) has
    /// already taken that byte from the source. It is returned first, and
    /// the rest of the input continues in `R`.
    pub fn into_inner(self) -> (Option<u8>, R) {
        self.cursor.into_inner()
    }

    /// Decode the next top-level value into `target`.
    ///
    /// The target is checked before any input is read. Leading whitespace is
    /// skipped; clean end of input before a value starts is
    /// [`DecodeError::Eof`]. Bytes after the value are left for the next
    /// call. On error the destination may be partially filled.
    pub fn decode<'a>(&mut self, target: impl Into<Target<'a>>) -> Result<()> {
        let slot = match target.into() {
            Target::Exclusive(slot) => slot,
            Target::Absent => return Err(DecodeError::InvalidDestination(None)),
            Target::Shared(descriptor) => {
                return Err(DecodeError::InvalidDestination(Some(descriptor)))
            }
        };

        let start = self.cursor.offset();
        debug!(
            "decoding {} ({:?}) from offset {}",
            slot.descriptor(),
            slot.kind(),
            start
        );

        let first = loop {
            match self.cursor.next()? {
                None => return Err(DecodeError::Eof),
                Some(c) if is_space(c) => continue,
                Some(c) => break c,
            }
        };
        self.read_value(first, slot)?;

        debug!(
            "decoded {} bytes, offset now {}",
            self.cursor.offset() - start,
            self.cursor.offset()
        );
        Ok(())
    }

    // ========================================================================
    // Values
    // ========================================================================

    /// Read the value starting with `c`, which must not be whitespace.
    fn read_value(&mut self, c: u8, slot: Slot<'_>) -> Result<()> {
        match c {
            b'"' => {
                let bytes = scan_string(&mut self.cursor)?;
                slot.bind_string(into_text(bytes), self.cursor.offset())
            }
            b't' => {
                self.read_literal("true", TRUE_TAIL)?;
                slot.bind_bool(true, self.cursor.offset())
            }
            b'f' => {
                self.read_literal("false", FALSE_TAIL)?;
                slot.bind_bool(false, self.cursor.offset())
            }
            b'n' => {
                self.read_literal("null", NULL_TAIL)?;
                slot.bind_null();
                Ok(())
            }
            b'-' | b'0'..=b'9' => {
                let literal = scan_number(&mut self.cursor, c)?;
                slot.bind_number(&literal, self.cursor.offset())
            }
            b'[' => {
                let seq = slot.bind_array(self.cursor.offset())?;
                self.read_array(seq)
            }
            b'{' => {
                let map = slot.bind_object(self.cursor.offset())?;
                self.read_object(map)
            }
            _ => Err(DecodeError::unexpected(
                c,
                "looking for beginning of value",
                self.cursor.offset(),
            )),
        }
    }

    /// Match the rest of `word` after its first byte.
    fn read_literal(&mut self, word: &str, tail: &[u8]) -> Result<()> {
        for &expected in tail {
            let c = self.cursor.require()?;
            if c != expected {
                return Err(DecodeError::Syntax {
                    msg: format!(
                        "invalid character {} in literal {} (expecting {})",
                        quote_char(c),
                        word,
                        quote_char(expected)
                    ),
                    offset: self.cursor.offset(),
                });
            }
        }
        Ok(())
    }

    // ========================================================================
    // Composites
    // ========================================================================

    fn read_array(&mut self, seq: &mut dyn Sequence) -> Result<()> {
        trace!("array open at offset {}", self.cursor.offset());

        let mut c = self.cursor.require_non_space()?;
        let mut count = 0;
        if c != b']' {
            loop {
                match seq.element(count) {
                    Some(slot) => self.read_value(c, slot)?,
                    None => {
                        // Past a fixed capacity: parse for validity, then drop.
                        let mut scratch = Value::Null;
                        self.read_value(c, Slot::Dynamic(&mut scratch))?;
                    }
                }
                count += 1;

                match self.cursor.require_non_space()? {
                    b',' => c = self.cursor.require_non_space()?,
                    b']' => break,
                    other => {
                        return Err(DecodeError::unexpected(
                            other,
                            "after array element",
                            self.cursor.offset(),
                        ))
                    }
                }
            }
        }
        seq.finish(count);

        trace!(
            "array of {} elements closed at offset {}",
            count,
            self.cursor.offset()
        );
        Ok(())
    }

    fn read_object(&mut self, map: &mut dyn Mapping) -> Result<()> {
        trace!("object open at offset {}", self.cursor.offset());

        let mut c = self.cursor.require_non_space()?;
        if c == b'}' {
            trace!("empty object closed at offset {}", self.cursor.offset());
            return Ok(());
        }

        let mut count = 0usize;
        loop {
            if c != b'"' {
                return Err(DecodeError::unexpected(
                    c,
                    "looking for beginning of object key string",
                    self.cursor.offset(),
                ));
            }
            let key = into_text(scan_string(&mut self.cursor)?);

            let colon = self.cursor.require_non_space()?;
            if colon != b':' {
                return Err(DecodeError::unexpected(
                    colon,
                    "after object key",
                    self.cursor.offset(),
                ));
            }

            let mut value = Value::Null;
            let first = self.cursor.require_non_space()?;
            self.read_value(first, Slot::Dynamic(&mut value))?;
            map.insert(key, value);
            count += 1;

            match self.cursor.require_non_space()? {
                b',' => c = self.cursor.require_non_space()?,
                b'}' => break,
                other => {
                    return Err(DecodeError::unexpected(
                        other,
                        "after object key:value pair",
                        self.cursor.offset(),
                    ))
                }
            }
        }

        trace!(
            "object of {} entries closed at offset {}",
            count,
            self.cursor.offset()
        );
        Ok(())
    }
}
