//! Destinations a decoded value can be stored into.
//!
//! Every destination type maps itself onto a [`Slot`], a closed set of shapes
//! the decoder knows how to fill. The decoder never inspects the concrete
//! Rust type: it works from the slot alone, and asks the slot for a type
//! descriptor when it has to report a mismatch.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;

use crate::value::Value;

/// Payload-free classification of a [`Slot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Dynamic,
    Bool,
    String,
    Integer { bits: u32, signed: bool },
    Float { bits: u32 },
    FixedSequence { capacity: usize },
    GrowableSequence,
    Mapping,
}

/// Mutable view of a destination, tagged by shape.
pub enum Slot<'a> {
    Dynamic(&'a mut Value),
    Bool(&'a mut bool),
    String(&'a mut String),
    Integer(IntSlot<'a>),
    Float(FloatSlot<'a>),
    FixedSequence(&'a mut dyn Sequence),
    GrowableSequence(&'a mut dyn Sequence),
    Mapping(&'a mut dyn Mapping),
}

impl Slot<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Slot::Dynamic(_) => Kind::Dynamic,
            Slot::Bool(_) => Kind::Bool,
            Slot::String(_) => Kind::String,
            Slot::Integer(slot) => Kind::Integer {
                bits: slot.bits(),
                signed: slot.is_signed(),
            },
            Slot::Float(slot) => Kind::Float { bits: slot.bits() },
            Slot::FixedSequence(seq) => Kind::FixedSequence {
                capacity: seq.capacity().unwrap_or(0),
            },
            Slot::GrowableSequence(_) => Kind::GrowableSequence,
            Slot::Mapping(_) => Kind::Mapping,
        }
    }

    /// Type descriptor used in mismatch errors.
    pub fn descriptor(&self) -> String {
        match self {
            Slot::Dynamic(_) => <Value as Destination>::descriptor(),
            Slot::Bool(_) => <bool as Destination>::descriptor(),
            Slot::String(_) => <String as Destination>::descriptor(),
            Slot::Integer(slot) => slot.name().to_string(),
            Slot::Float(slot) => slot.name().to_string(),
            Slot::FixedSequence(seq) | Slot::GrowableSequence(seq) => seq.descriptor(),
            Slot::Mapping(map) => map.descriptor(),
        }
    }
}

/// A type the decoder can write into.
pub trait Destination {
    /// Type descriptor used in error messages.
    fn descriptor() -> String
    where
        Self: Sized;

    /// Borrow this destination as a slot.
    fn slot(&mut self) -> Slot<'_>;
}

/// Array-shaped destination.
pub trait Sequence {
    fn descriptor(&self) -> String;

    /// `Some(n)` for fixed-capacity sequences.
    fn capacity(&self) -> Option<usize>;

    /// Slot for element `index`, growing the sequence if it can.
    ///
    /// `None` means the element does not fit and must be discarded.
    fn element(&mut self, index: usize) -> Option<Slot<'_>>;

    /// Called once all `count` elements have been decoded.
    fn finish(&mut self, count: usize);
}

/// Object-shaped destination with dynamic values.
pub trait Mapping {
    fn descriptor(&self) -> String;

    /// Insert or replace `key`.
    fn insert(&mut self, key: String, value: Value);
}

impl Destination for Value {
    fn descriptor() -> String {
        "Value".to_string()
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Dynamic(self)
    }
}

impl Destination for bool {
    fn descriptor() -> String {
        "bool".to_string()
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Bool(self)
    }
}

impl Destination for String {
    fn descriptor() -> String {
        "String".to_string()
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::String(self)
    }
}

// ============================================================================
// Numbers
// ============================================================================

macro_rules! numeric_slot {
    ($slot:ident, $kind:ident, $($variant:ident => $ty:ty),* $(,)?) => {
        /// Numeric destination of a specific width.
        pub enum $slot<'a> {
            $($variant(&'a mut $ty),)*
        }

        impl $slot<'_> {
            /// Rust name of the target type.
            pub fn name(&self) -> &'static str {
                match self {
                    $($slot::$variant(_) => stringify!($ty),)*
                }
            }

            pub fn bits(&self) -> u32 {
                match self {
                    $($slot::$variant(_) => (std::mem::size_of::<$ty>() * 8) as u32,)*
                }
            }
        }

        $(
            impl Destination for $ty {
                fn descriptor() -> String {
                    stringify!($ty).to_string()
                }

                fn slot(&mut self) -> Slot<'_> {
                    Slot::$kind($slot::$variant(self))
                }
            }
        )*
    };
}

numeric_slot!(
    IntSlot,
    Integer,
    I8 => i8,
    I16 => i16,
    I32 => i32,
    I64 => i64,
    Isize => isize,
    U8 => u8,
    U16 => u16,
    U32 => u32,
    U64 => u64,
    Usize => usize,
);

numeric_slot!(FloatSlot, Float, F32 => f32, F64 => f64);

impl IntSlot<'_> {
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            IntSlot::I8(_) | IntSlot::I16(_) | IntSlot::I32(_) | IntSlot::I64(_) | IntSlot::Isize(_)
        )
    }
}

// ============================================================================
// Sequences
// ============================================================================

impl<T: Destination + Default> Sequence for Vec<T> {
    fn descriptor(&self) -> String {
        <Self as Destination>::descriptor()
    }

    fn capacity(&self) -> Option<usize> {
        None
    }

    fn element(&mut self, index: usize) -> Option<Slot<'_>> {
        if index >= self.len() {
            self.resize_with(index + 1, T::default);
        }
        self.get_mut(index).map(|item| item.slot())
    }

    fn finish(&mut self, count: usize) {
        self.truncate(count);
    }
}

impl<T: Destination + Default> Destination for Vec<T> {
    fn descriptor() -> String {
        format!("Vec<{}>", T::descriptor())
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::GrowableSequence(self)
    }
}

impl<T: Destination + Default, const N: usize> Sequence for [T; N] {
    fn descriptor(&self) -> String {
        <Self as Destination>::descriptor()
    }

    fn capacity(&self) -> Option<usize> {
        Some(N)
    }

    fn element(&mut self, index: usize) -> Option<Slot<'_>> {
        self.get_mut(index).map(|item| item.slot())
    }

    fn finish(&mut self, count: usize) {
        for item in self.iter_mut().skip(count) {
            *item = T::default();
        }
    }
}

impl<T: Destination + Default, const N: usize> Destination for [T; N] {
    fn descriptor() -> String {
        format!("[{}; {}]", T::descriptor(), N)
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::FixedSequence(self)
    }
}

// ============================================================================
// Mappings
// ============================================================================

macro_rules! mapping {
    ($($map:ident),*) => {
        $(
            impl Mapping for $map<String, Value> {
                fn descriptor(&self) -> String {
                    <Self as Destination>::descriptor()
                }

                fn insert(&mut self, key: String, value: Value) {
                    $map::insert(self, key, value);
                }
            }

            impl Destination for $map<String, Value> {
                fn descriptor() -> String {
                    format!("{}<String, Value>", stringify!($map))
                }

                fn slot(&mut self) -> Slot<'_> {
                    Slot::Mapping(self)
                }
            }
        )*
    };
}

mapping!(IndexMap, HashMap, BTreeMap);

// ============================================================================
// Targets
// ============================================================================

/// What a caller hands to `Decoder::decode`.
///
/// Only `Exclusive` can receive a value; the other two are rejected before
/// any input is read.
pub enum Target<'a> {
    /// No destination at all.
    Absent,
    /// A destination that cannot be written through; holds its descriptor.
    Shared(String),
    /// A writable destination.
    Exclusive(Slot<'a>),
}

impl<'a, T: Destination> From<&'a mut T> for Target<'a> {
    fn from(dest: &'a mut T) -> Self {
        Target::Exclusive(dest.slot())
    }
}

impl<'a, T: Destination> From<&'a T> for Target<'a> {
    fn from(_: &'a T) -> Self {
        Target::Shared(T::descriptor())
    }
}

impl<'a, T: Destination> From<Option<&'a mut T>> for Target<'a> {
    fn from(dest: Option<&'a mut T>) -> Self {
        match dest {
            Some(dest) => Target::Exclusive(dest.slot()),
            None => Target::Absent,
        }
    }
}
