//! Commit policy between parsed values and destination slots.
//!
//! | destination | accepts                                    |
//! |-------------|--------------------------------------------|
//! | dynamic     | anything                                   |
//! | bool        | `true` / `false`                           |
//! | string      | strings                                    |
//! | integer     | numbers without fraction or exponent       |
//! | float       | any number                                 |
//! | sequence    | arrays                                     |
//! | mapping     | objects                                    |
//!
//! `null` is accepted everywhere. It clears a dynamic slot and leaves every
//! other slot untouched.

use log::trace;
use num_traits::AsPrimitive;

use crate::destination::{FloatSlot, IntSlot, Mapping, Sequence, Slot};
use crate::error::{DecodeError, Result};
use crate::number::NumberLiteral;
use crate::value::Value;

fn mismatch(value: impl Into<String>, slot: &Slot<'_>, offset: u64) -> DecodeError {
    DecodeError::TypeMismatch {
        value: value.into(),
        descriptor: slot.descriptor(),
        offset,
    }
}

impl<'a> Slot<'a> {
    pub(crate) fn bind_null(self) {
        if let Slot::Dynamic(v) = self {
            *v = Value::Null;
        }
    }

    pub(crate) fn bind_bool(self, b: bool, offset: u64) -> Result<()> {
        match self {
            Slot::Dynamic(v) => *v = Value::Bool(b),
            Slot::Bool(dest) => *dest = b,
            other => return Err(mismatch("bool", &other, offset)),
        }
        trace!("bound bool {} at offset {}", b, offset);
        Ok(())
    }

    pub(crate) fn bind_string(self, s: String, offset: u64) -> Result<()> {
        match self {
            Slot::Dynamic(v) => *v = Value::String(s),
            Slot::String(dest) => *dest = s,
            other => return Err(mismatch("string", &other, offset)),
        }
        trace!("bound string at offset {}", offset);
        Ok(())
    }

    pub(crate) fn bind_number(self, lit: &NumberLiteral, offset: u64) -> Result<()> {
        // Integers refuse fractions and exponents; nothing takes an infinite value,
        // including one that only overflows after narrowing.
        let value = match &self {
            Slot::Dynamic(_) | Slot::Float(FloatSlot::F64(_)) => lit.value(),
            Slot::Float(FloatSlot::F32(_)) => lit.value().filter(|&f| fits_f32(f)),
            Slot::Integer(_) if lit.is_integral() => lit.value(),
            Slot::Integer(_) => None,
            _ => return Err(mismatch("number", &self, offset)),
        };
        let Some(f) = value else {
            return Err(mismatch(format!("number {}", lit.text()), &self, offset));
        };
        match self {
            Slot::Dynamic(v) => *v = Value::Number(f),
            Slot::Integer(dest) => dest.store(f),
            Slot::Float(dest) => dest.store(f),
            _ => unreachable!("non-numeric slots were rejected above"),
        }
        trace!("bound number {} at offset {}", lit.text(), offset);
        Ok(())
    }

    /// Resolve the sequence an array fills. Dynamic slots become empty arrays.
    pub(crate) fn bind_array(self, offset: u64) -> Result<&'a mut dyn Sequence> {
        match self {
            Slot::Dynamic(v) => Ok(v.reset_array()),
            Slot::FixedSequence(seq) | Slot::GrowableSequence(seq) => Ok(seq),
            other => Err(mismatch("array", &other, offset)),
        }
    }

    /// Resolve the mapping an object fills. Dynamic slots become empty objects.
    pub(crate) fn bind_object(self, offset: u64) -> Result<&'a mut dyn Mapping> {
        match self {
            Slot::Dynamic(v) => Ok(v.reset_object()),
            Slot::Mapping(map) => Ok(map),
            other => Err(mismatch("object", &other, offset)),
        }
    }
}

/// Whether `f` lies within the finite `f32` range.
fn fits_f32(f: f64) -> bool {
    f.abs() <= f64::from(f32::MAX)
}

/// Convert toward zero to 64 bits, then wrap to the target width.
fn truncate<T>(f: f64) -> T
where
    T: Copy + 'static,
    i64: AsPrimitive<T>,
    u64: AsPrimitive<T>,
{
    if f < 0.0 {
        let wide: i64 = f.as_();
        wide.as_()
    } else {
        let wide: u64 = f.as_();
        wide.as_()
    }
}

impl IntSlot<'_> {
    fn store(self, f: f64) {
        match self {
            IntSlot::I8(d) => *d = truncate(f),
            IntSlot::I16(d) => *d = truncate(f),
            IntSlot::I32(d) => *d = truncate(f),
            IntSlot::I64(d) => *d = truncate(f),
            IntSlot::Isize(d) => *d = truncate(f),
            IntSlot::U8(d) => *d = truncate(f),
            IntSlot::U16(d) => *d = truncate(f),
            IntSlot::U32(d) => *d = truncate(f),
            IntSlot::U64(d) => *d = truncate(f),
            IntSlot::Usize(d) => *d = truncate(f),
        }
    }
}

impl FloatSlot<'_> {
    fn store(self, f: f64) {
        match self {
            FloatSlot::F32(d) => *d = f.as_(),
            FloatSlot::F64(d) => *d = f,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_toward_zero() {
        assert_eq!(truncate::<i64>(-1.9), -1);
        assert_eq!(truncate::<u32>(7.9), 7);
    }

    #[test]
    fn test_truncate_wraps_narrow_targets() {
        assert_eq!(truncate::<u8>(1234567890.0), 210);
        assert_eq!(truncate::<u8>(-1.0), 255);
        assert_eq!(truncate::<i8>(200.0), -56);
    }

    #[test]
    fn test_f32_range() {
        assert!(fits_f32(3.4e38));
        assert!(!fits_f32(1e39));
        assert!(!fits_f32(-1e39));
        assert!(fits_f32(1e-50));
    }

    #[test]
    fn test_truncate_large_values() {
        // 2^64 - 1 is not representable; the nearest double saturates.
        assert_eq!(truncate::<u64>(18446744073709551615.0), u64::MAX);
        assert_eq!(truncate::<i64>(-9223372036854775808.0), i64::MIN);
    }
}
