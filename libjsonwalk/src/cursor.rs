//! Byte cursor over a blocking source with one byte of pushback.

use std::io::{ErrorKind, Read};

use crate::error::{DecodeError, Result};

/// Reads a source one byte at a time and counts what it consumes.
///
/// The offset goes up once per byte handed out and down once per pushback,
/// so it always equals the number of bytes the parser has accepted.
pub struct ByteCursor<R> {
    source: R,
    offset: u64,
    /// Most recent byte returned by `next`, eligible for pushback.
    last: Option<u8>,
    /// Byte returned to the front of the input by `push_back`.
    pending: Option<u8>,
}

impl<R: Read> ByteCursor<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            offset: 0,
            last: None,
            pending: None,
        }
    }

    /// Read the next byte. `Ok(None)` is end of input.
    pub fn next(&mut self) -> Result<Option<u8>> {
        let byte = match self.pending.take() {
            Some(b) => b,
            None => match self.read_byte()? {
                Some(b) => b,
                None => {
                    self.last = None;
                    return Ok(None);
                }
            },
        };
        self.offset += 1;
        self.last = Some(byte);
        Ok(Some(byte))
    }

    /// Read the next byte where end of input means the value is incomplete.
    pub fn require(&mut self) -> Result<u8> {
        self.next()?.ok_or(DecodeError::UnexpectedEnd)
    }

    /// Like `require`, but skips JSON whitespace first.
    pub fn require_non_space(&mut self) -> Result<u8> {
        loop {
            let c = self.require()?;
            if !is_space(c) {
                return Ok(c);
            }
        }
    }

    /// Un-read the byte most recently returned by `next`.
    ///
    /// # Panics
    ///
    /// Panics if no byte was read since the last pushback.
    pub fn push_back(&mut self) {
        match self.last.take() {
            Some(b) => {
                self.pending = Some(b);
                self.offset -= 1;
            }
            None => panic!("push_back called without a preceding read"),
        }
    }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Give back the source, along with a pushed-back byte that was taken
    /// from it but not yet consumed.
    pub fn into_inner(self) -> (Option<u8>, R) {
        (self.pending, self.source)
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.source.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(DecodeError::Io(e)),
            }
        }
    }
}

/// JSON insignificant whitespace.
pub fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_offset_tracks_reads() {
        let mut cursor = ByteCursor::new(&b"ab"[..]);
        assert_eq!(cursor.offset(), 0);
        assert_eq!(cursor.next().unwrap(), Some(b'a'));
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.next().unwrap(), Some(b'b'));
        assert_eq!(cursor.offset(), 2);
        assert_eq!(cursor.next().unwrap(), None);
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn test_push_back_rereads() {
        let mut cursor = ByteCursor::new(&b"xy"[..]);
        cursor.next().unwrap();
        cursor.next().unwrap();
        cursor.push_back();
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.next().unwrap(), Some(b'y'));
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn test_into_inner_returns_pending_byte() {
        let mut cursor = ByteCursor::new(&b"ab"[..]);
        cursor.next().unwrap();
        cursor.push_back();
        let (pending, rest) = cursor.into_inner();
        assert_eq!(pending, Some(b'a'));
        assert_eq!(rest, b"b");
    }

    #[test]
    #[should_panic(expected = "push_back")]
    fn test_push_back_without_read() {
        let mut cursor = ByteCursor::new(&b"x"[..]);
        cursor.push_back();
    }

    #[test]
    #[should_panic(expected = "push_back")]
    fn test_double_push_back() {
        let mut cursor = ByteCursor::new(&b"x"[..]);
        cursor.next().unwrap();
        cursor.push_back();
        cursor.push_back();
    }

    #[test]
    fn test_require_reports_unexpected_end() {
        let mut cursor = ByteCursor::new(&b" \t"[..]);
        assert!(matches!(
            cursor.require_non_space(),
            Err(DecodeError::UnexpectedEnd)
        ));
    }

    struct Flaky {
        interrupted: bool,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::new(ErrorKind::Interrupted, "again"));
            }
            buf[0] = b'z';
            Ok(1)
        }
    }

    #[test]
    fn test_interrupted_reads_are_retried() {
        let mut cursor = ByteCursor::new(Flaky { interrupted: false });
        assert_eq!(cursor.next().unwrap(), Some(b'z'));
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::Other, "lol"))
        }
    }

    #[test]
    fn test_source_errors_pass_through() {
        let mut cursor = ByteCursor::new(Broken);
        match cursor.next() {
            Err(DecodeError::Io(e)) => assert_eq!(e.to_string(), "lol"),
            other => panic!("expected io error, got {:?}", other),
        }
    }
}
