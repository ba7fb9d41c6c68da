//! Numeric literal scanning.
//!
//! The scanner walks the JSON number grammar one byte at a time:
//!
//! ```text
//! number   = [ "-" ] int [ frac ] [ exp ]
//! int      = "0" / ( digit1-9 *digit )
//! frac     = "." 1*digit
//! exp      = ( "e" / "E" ) [ "+" / "-" ] 1*digit
//! ```
//!
//! The first byte that cannot extend the literal is pushed back for the
//! caller. A leading `0` ends the integer part, so `01` scans as `0`.

use std::io::Read;

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Result};

/// Position within the number grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// After `-`.
    Sign,
    /// After a leading `0`.
    Zero,
    /// Inside the integer digits.
    Int,
    /// After `.`.
    Dot,
    /// Inside the fraction digits.
    Frac,
    /// After `e` or `E`.
    Exp,
    /// After the exponent sign.
    ExpSign,
    /// Inside the exponent digits.
    ExpDigits,
}

impl State {
    /// Whether the literal may end here.
    fn is_complete(self) -> bool {
        matches!(
            self,
            State::Zero | State::Int | State::Frac | State::ExpDigits
        )
    }
}

/// A scanned number: its source text and whether it is integral.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    text: String,
    integral: bool,
}

impl NumberLiteral {
    /// The literal exactly as it appeared in the input.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// `true` when the literal has neither fraction nor exponent.
    pub fn is_integral(&self) -> bool {
        self.integral
    }

    /// Canonical double for the literal, or `None` when it is out of range.
    ///
    /// Negative zero collapses to zero.
    pub fn value(&self) -> Option<f64> {
        let f: f64 = self.text.parse().ok()?;
        if !f.is_finite() {
            return None;
        }
        Some(if f == 0.0 { 0.0 } else { f })
    }
}

/// Scan a number whose first byte (`-` or a digit) was already consumed.
pub fn scan_number<R: Read>(cursor: &mut ByteCursor<R>, first: u8) -> Result<NumberLiteral> {
    let mut state = match first {
        b'-' => State::Sign,
        b'0' => State::Zero,
        _ => State::Int,
    };
    let mut text = String::new();
    text.push(first as char);
    let mut integral = true;

    loop {
        let Some(c) = cursor.next()? else {
            if state.is_complete() {
                break;
            }
            return Err(DecodeError::UnexpectedEnd);
        };

        let next = match (state, c) {
            (State::Sign, b'0') => State::Zero,
            (State::Sign, b'1'..=b'9') => State::Int,
            (State::Sign, _) => {
                return Err(DecodeError::unexpected(
                    c,
                    "in numeric literal",
                    cursor.offset(),
                ))
            }
            (State::Int, b'0'..=b'9') => State::Int,
            (State::Zero | State::Int, b'.') => State::Dot,
            (State::Dot, b'0'..=b'9') | (State::Frac, b'0'..=b'9') => State::Frac,
            (State::Dot, _) => {
                return Err(DecodeError::unexpected(
                    c,
                    "after decimal point in numeric literal",
                    cursor.offset(),
                ))
            }
            (State::Zero | State::Int | State::Frac, b'e' | b'E') => State::Exp,
            (State::Exp, b'+' | b'-') => State::ExpSign,
            (State::Exp | State::ExpSign | State::ExpDigits, b'0'..=b'9') => State::ExpDigits,
            (State::Exp | State::ExpSign, _) => {
                return Err(DecodeError::unexpected(
                    c,
                    "in exponent of numeric literal",
                    cursor.offset(),
                ))
            }
            // Anything else ends a complete literal.
            _ => {
                cursor.push_back();
                break;
            }
        };

        if matches!(next, State::Dot | State::Exp) {
            integral = false;
        }
        text.push(c as char);
        state = next;
    }

    Ok(NumberLiteral { text, integral })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &[u8]) -> (Result<NumberLiteral>, u64) {
        let mut cursor = ByteCursor::new(input);
        let first = cursor.require().unwrap();
        let result = scan_number(&mut cursor, first);
        (result, cursor.offset())
    }

    fn scan_ok(input: &str) -> NumberLiteral {
        scan(input.as_bytes()).0.unwrap()
    }

    fn scan_err(input: &str) -> String {
        scan(input.as_bytes()).0.unwrap_err().to_string()
    }

    #[test]
    fn test_integers() {
        let lit = scan_ok("42");
        assert_eq!(lit.text(), "42");
        assert!(lit.is_integral());
        assert_eq!(lit.value(), Some(42.0));
        assert_eq!(scan_ok("-666").value(), Some(-666.0));
    }

    #[test]
    fn test_zero_and_negative_zero() {
        assert_eq!(scan_ok("0").value(), Some(0.0));
        let neg = scan_ok("-0").value().unwrap();
        assert_eq!(neg, 0.0);
        assert!(neg.is_sign_positive());
    }

    #[test]
    fn test_leading_zero_stops_integer_part() {
        let (result, offset) = scan(b"01");
        assert_eq!(result.unwrap().text(), "0");
        assert_eq!(offset, 1);
        assert_eq!(scan_ok("-01").text(), "-0");
    }

    #[test]
    fn test_zero_with_fraction_and_exponent() {
        assert_eq!(scan_ok("0.5").value(), Some(0.5));
        assert_eq!(scan_ok("0e6").value(), Some(0.0));
    }

    #[test]
    fn test_fraction_and_exponent() {
        let lit = scan_ok("1.1E+6");
        assert!(!lit.is_integral());
        assert_eq!(lit.value(), Some(1_100_000.0));
        assert_eq!(scan_ok("1e6").value(), Some(1_000_000.0));
        assert!(!scan_ok("1e6").is_integral());
        assert_eq!(scan_ok("-1.1e-6").value(), Some(-1.1e-6));
    }

    #[test]
    fn test_terminator_is_pushed_back() {
        let (result, offset) = scan(b"1.2.3");
        assert_eq!(result.unwrap().text(), "1.2");
        assert_eq!(offset, 3);
        let (result, offset) = scan(b"5345j345");
        assert_eq!(result.unwrap().text(), "5345");
        assert_eq!(offset, 4);
        assert_eq!(scan_ok("1e6j7").text(), "1e6");
    }

    #[test]
    fn test_sign_requires_digit() {
        assert_eq!(scan_err("-a"), "invalid character 'a' in numeric literal");
        assert_eq!(scan_err("--1"), "invalid character '-' in numeric literal");
        assert_eq!(scan_err("-.1"), "invalid character '.' in numeric literal");
    }

    #[test]
    fn test_fraction_requires_digit() {
        assert_eq!(
            scan_err("1.a"),
            "invalid character 'a' after decimal point in numeric literal"
        );
    }

    #[test]
    fn test_exponent_errors() {
        assert_eq!(
            scan_err("1ee6"),
            "invalid character 'e' in exponent of numeric literal"
        );
        assert_eq!(
            scan_err("1eE6"),
            "invalid character 'E' in exponent of numeric literal"
        );
        assert_eq!(
            scan_err("1e--6"),
            "invalid character '-' in exponent of numeric literal"
        );
        assert_eq!(
            scan_err("1e+-6"),
            "invalid character '-' in exponent of numeric literal"
        );
    }

    #[test]
    fn test_error_offsets() {
        let (result, offset) = scan(b"1e--6");
        assert_eq!(result.unwrap_err().offset(), Some(4));
        assert_eq!(offset, 4);
    }

    #[test]
    fn test_incomplete_literals() {
        for input in ["-", "0.", "0.1e", "0.1e-"] {
            assert!(
                matches!(scan(input.as_bytes()).0, Err(DecodeError::UnexpectedEnd)),
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(scan_ok("1e400").value(), None);
        assert_eq!(scan_ok("1e-400").value(), Some(0.0));
    }
}
