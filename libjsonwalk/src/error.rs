//! Error types for JSON decoding.

use std::io;
use thiserror::Error;

/// Result type for decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Error type for JSON decoding.
///
/// Syntax and end-of-input messages match the reference decoder byte for
/// byte, so callers may compare `to_string()` output directly.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Malformed input. `offset` counts every byte consumed up to and
    /// including the offending one.
    #[error("{msg}")]
    Syntax { msg: String, offset: u64 },

    /// The source ran dry while a value was structurally incomplete.
    #[error("unexpected EOF")]
    UnexpectedEnd,

    /// The source ran dry before any value began.
    #[error("EOF")]
    Eof,

    /// The destination was absent or not writable.
    #[error("json: Unmarshal({})", describe_destination(.0))]
    InvalidDestination(Option<String>),

    /// The parsed value cannot be stored in the destination.
    #[error("json: cannot unmarshal {value} into value of type {descriptor}")]
    TypeMismatch {
        value: String,
        descriptor: String,
        offset: u64,
    },

    /// Any other failure reported by the byte source.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl DecodeError {
    /// Build a syntax error for an unexpected byte.
    ///
    /// `context` completes the sentence "invalid character X ...".
    pub(crate) fn unexpected(c: u8, context: &str, offset: u64) -> Self {
        DecodeError::Syntax {
            msg: format!("invalid character {} {}", quote_char(c), context),
            offset,
        }
    }

    /// Offset recorded with the error, for the kinds that carry one.
    pub fn offset(&self) -> Option<u64> {
        match self {
            DecodeError::Syntax { offset, .. } | DecodeError::TypeMismatch { offset, .. } => {
                Some(*offset)
            }
            _ => None,
        }
    }

    /// Returns `true` for a clean end of input between values.
    pub fn is_eof(&self) -> bool {
        matches!(self, DecodeError::Eof)
    }
}

fn describe_destination(descriptor: &Option<String>) -> String {
    match descriptor {
        Some(name) => format!("non-pointer {}", name),
        None => "nil".to_string(),
    }
}

/// Render a byte the way error messages quote it: `'a'`, `'\n'`, `'\x00'`.
///
/// Bytes above 0x7F are shown as the Latin-1 code point they name.
pub(crate) fn quote_char(c: u8) -> String {
    match c {
        b'\'' => r"'\''".to_string(),
        b'"' => "'\"'".to_string(),
        _ => format!("'{}'", escape_char(c as char)),
    }
}

fn escape_char(ch: char) -> String {
    match ch {
        '\x07' => r"\a".to_string(),
        '\x08' => r"\b".to_string(),
        '\x0c' => r"\f".to_string(),
        '\n' => r"\n".to_string(),
        '\r' => r"\r".to_string(),
        '\t' => r"\t".to_string(),
        '\x0b' => r"\v".to_string(),
        '\\' => r"\\".to_string(),
        ' '..='~' => ch.to_string(),
        '\0'..='\x7f' => format!(r"\x{:02x}", ch as u32),
        // C1 controls, no-break space and soft hyphen are not printable.
        '\u{80}'..='\u{a0}' | '\u{ad}' => format!(r"\u{:04x}", ch as u32),
        _ => ch.to_string(),
    }
}
