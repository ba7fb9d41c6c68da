//! Quoted string scanning.

use std::io::Read;

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Result};

/// Escape letters and the byte each one stands for.
///
/// Anything else after a backslash, `\/` and `\u` included, is rejected.
const ESCAPES: [(u8, u8); 7] = [
    (b'"', b'"'),
    (b'\\', b'\\'),
    (b'b', 0x08),
    (b'f', 0x0c),
    (b'n', b'\n'),
    (b'r', b'\r'),
    (b't', b'\t'),
];

fn unescape(c: u8) -> Option<u8> {
    ESCAPES
        .iter()
        .find(|&&(letter, _)| letter == c)
        .map(|&(_, byte)| byte)
}

/// Scan a string whose opening quote was already consumed.
///
/// Returns the decoded bytes; the closing quote is consumed.
pub fn scan_string<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    loop {
        match cursor.require()? {
            b'"' => return Ok(buf),
            b'\\' => {
                let c = cursor.require()?;
                match unescape(c) {
                    Some(byte) => buf.push(byte),
                    None => {
                        return Err(DecodeError::unexpected(
                            c,
                            "in string escape code",
                            cursor.offset(),
                        ))
                    }
                }
            }
            c if c < 0x20 => {
                return Err(DecodeError::unexpected(
                    c,
                    "in string literal",
                    cursor.offset(),
                ))
            }
            c => buf.push(c),
        }
    }
}

/// Turn decoded bytes into text, replacing invalid UTF-8 with U+FFFD.
pub fn into_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
