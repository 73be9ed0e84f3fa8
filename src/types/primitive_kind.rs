//! Primitive type kinds and the tagged scalar that carries them at runtime.

use std::fmt;

use crate::types::{
    TYPE_BOOL, TYPE_DOUBLE, TYPE_FLOAT, TYPE_INT8, TYPE_INT16, TYPE_INT32, TYPE_INT64, TYPE_UINT8,
    TYPE_UINT16, TYPE_UINT32, TYPE_UINT64, TYPE_VOID, TypeId,
};

/// Primitive type kinds.
///
/// These are the built-in numeric and boolean types in the script type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Void,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
    Double,
}

impl PrimitiveKind {
    /// The script-visible type id for this kind.
    pub const fn type_id(self) -> TypeId {
        match self {
            PrimitiveKind::Void => TYPE_VOID,
            PrimitiveKind::Bool => TYPE_BOOL,
            PrimitiveKind::Int8 => TYPE_INT8,
            PrimitiveKind::Int16 => TYPE_INT16,
            PrimitiveKind::Int32 => TYPE_INT32,
            PrimitiveKind::Int64 => TYPE_INT64,
            PrimitiveKind::Uint8 => TYPE_UINT8,
            PrimitiveKind::Uint16 => TYPE_UINT16,
            PrimitiveKind::Uint32 => TYPE_UINT32,
            PrimitiveKind::Uint64 => TYPE_UINT64,
            PrimitiveKind::Float => TYPE_FLOAT,
            PrimitiveKind::Double => TYPE_DOUBLE,
        }
    }

    /// Map a primitive type id back to its kind.
    pub const fn from_type_id(id: TypeId) -> Option<Self> {
        match id {
            TYPE_VOID => Some(PrimitiveKind::Void),
            TYPE_BOOL => Some(PrimitiveKind::Bool),
            TYPE_INT8 => Some(PrimitiveKind::Int8),
            TYPE_INT16 => Some(PrimitiveKind::Int16),
            TYPE_INT32 => Some(PrimitiveKind::Int32),
            TYPE_INT64 => Some(PrimitiveKind::Int64),
            TYPE_UINT8 => Some(PrimitiveKind::Uint8),
            TYPE_UINT16 => Some(PrimitiveKind::Uint16),
            TYPE_UINT32 => Some(PrimitiveKind::Uint32),
            TYPE_UINT64 => Some(PrimitiveKind::Uint64),
            TYPE_FLOAT => Some(PrimitiveKind::Float),
            TYPE_DOUBLE => Some(PrimitiveKind::Double),
            _ => None,
        }
    }

    /// Get the name of this primitive type.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int8 => "int8",
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::Int32 => "int",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Uint8 => "uint8",
            PrimitiveKind::Uint16 => "uint16",
            PrimitiveKind::Uint32 => "uint",
            PrimitiveKind::Uint64 => "uint64",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    /// Size of one value of this kind in a call slot, in bytes.
    pub const fn size(self) -> usize {
        match self {
            PrimitiveKind::Void => 0,
            PrimitiveKind::Bool | PrimitiveKind::Int8 | PrimitiveKind::Uint8 => 1,
            PrimitiveKind::Int16 | PrimitiveKind::Uint16 => 2,
            PrimitiveKind::Int32 | PrimitiveKind::Uint32 | PrimitiveKind::Float => 4,
            PrimitiveKind::Int64 | PrimitiveKind::Uint64 | PrimitiveKind::Double => 8,
        }
    }

    pub const fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::Float | PrimitiveKind::Double)
    }

    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int8
                | PrimitiveKind::Int16
                | PrimitiveKind::Int32
                | PrimitiveKind::Int64
                | PrimitiveKind::Float
                | PrimitiveKind::Double
        )
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A primitive scalar tagged with its kind.
///
/// This is the runtime carrier for primitive values crossing the call
/// boundary in either direction. There is no `Void` payload; a void value is
/// represented by the absence of a `PrimitiveValue`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveValue {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Float(f32),
    Double(f64),
}

impl PrimitiveValue {
    pub const fn kind(self) -> PrimitiveKind {
        match self {
            PrimitiveValue::Bool(_) => PrimitiveKind::Bool,
            PrimitiveValue::Int8(_) => PrimitiveKind::Int8,
            PrimitiveValue::Int16(_) => PrimitiveKind::Int16,
            PrimitiveValue::Int32(_) => PrimitiveKind::Int32,
            PrimitiveValue::Int64(_) => PrimitiveKind::Int64,
            PrimitiveValue::Uint8(_) => PrimitiveKind::Uint8,
            PrimitiveValue::Uint16(_) => PrimitiveKind::Uint16,
            PrimitiveValue::Uint32(_) => PrimitiveKind::Uint32,
            PrimitiveValue::Uint64(_) => PrimitiveKind::Uint64,
            PrimitiveValue::Float(_) => PrimitiveKind::Float,
            PrimitiveValue::Double(_) => PrimitiveKind::Double,
        }
    }

    pub fn as_bool(self) -> bool {
        match self {
            PrimitiveValue::Bool(b) => b,
            PrimitiveValue::Float(f) => f != 0.0,
            PrimitiveValue::Double(d) => d != 0.0,
            other => other.as_i64() != 0,
        }
    }

    pub fn as_i64(self) -> i64 {
        match self {
            PrimitiveValue::Bool(b) => b as i64,
            PrimitiveValue::Int8(v) => v as i64,
            PrimitiveValue::Int16(v) => v as i64,
            PrimitiveValue::Int32(v) => v as i64,
            PrimitiveValue::Int64(v) => v,
            PrimitiveValue::Uint8(v) => v as i64,
            PrimitiveValue::Uint16(v) => v as i64,
            PrimitiveValue::Uint32(v) => v as i64,
            PrimitiveValue::Uint64(v) => v as i64,
            PrimitiveValue::Float(v) => v as i64,
            PrimitiveValue::Double(v) => v as i64,
        }
    }

    pub fn as_u64(self) -> u64 {
        match self {
            PrimitiveValue::Uint64(v) => v,
            PrimitiveValue::Float(v) => v as u64,
            PrimitiveValue::Double(v) => v as u64,
            other => other.as_i64() as u64,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            PrimitiveValue::Bool(b) => b as u8 as f64,
            PrimitiveValue::Float(v) => v as f64,
            PrimitiveValue::Double(v) => v,
            PrimitiveValue::Uint64(v) => v as f64,
            other => other.as_i64() as f64,
        }
    }

    /// Widen or narrow this value to another primitive kind.
    ///
    /// The conversion follows the engine's calling convention for mixed-width
    /// slots: integral casts truncate, float-to-integral casts saturate, and
    /// anything converts to `bool` by a zero test. `Void` has no value
    /// representation and yields `None`.
    pub fn convert_to(self, kind: PrimitiveKind) -> Option<PrimitiveValue> {
        let converted = match kind {
            PrimitiveKind::Void => return None,
            PrimitiveKind::Bool => PrimitiveValue::Bool(self.as_bool()),
            PrimitiveKind::Int8 => PrimitiveValue::Int8(self.as_i64() as i8),
            PrimitiveKind::Int16 => PrimitiveValue::Int16(self.as_i64() as i16),
            PrimitiveKind::Int32 => PrimitiveValue::Int32(self.as_i64() as i32),
            PrimitiveKind::Int64 => PrimitiveValue::Int64(self.as_i64()),
            PrimitiveKind::Uint8 => PrimitiveValue::Uint8(self.as_u64() as u8),
            PrimitiveKind::Uint16 => PrimitiveValue::Uint16(self.as_u64() as u16),
            PrimitiveKind::Uint32 => PrimitiveValue::Uint32(self.as_u64() as u32),
            PrimitiveKind::Uint64 => PrimitiveValue::Uint64(self.as_u64()),
            PrimitiveKind::Float => PrimitiveValue::Float(self.as_f64() as f32),
            PrimitiveKind::Double => PrimitiveValue::Double(self.as_f64()),
        };
        Some(converted)
    }
}

macro_rules! primitive_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for PrimitiveValue {
                fn from(value: $ty) -> Self {
                    PrimitiveValue::$variant(value)
                }
            }
        )*
    };
}

primitive_value_from! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    f32 => Float,
    f64 => Double,
}
