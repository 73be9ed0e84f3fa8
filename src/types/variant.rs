//! Type-erased holder for a script-typed value captured at runtime.

use crate::types::{
    ObjectHandle, PrimitiveKind, PrimitiveValue, ScriptMemoryLocation, TYPE_VOID, TypeId,
};

/// One script-typed value plus its type identity.
///
/// A variant holds exactly one of: nothing, a primitive scalar, an
/// enumeration value, or an owned object reference. Object-kind variants own
/// their reference through [`ObjectHandle`]: cloning duplicates the borrow,
/// dropping releases it, and [`Variant::take`] moves it out leaving the
/// source empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    type_id: TypeId,
    data: VariantData,
}

#[derive(Debug, Clone, PartialEq)]
enum VariantData {
    Empty,
    Primitive(PrimitiveValue),
    Enum(i32),
    Object(ObjectHandle),
}

impl Variant {
    pub fn empty() -> Self {
        Variant {
            type_id: TYPE_VOID,
            data: VariantData::Empty,
        }
    }

    pub fn primitive(value: impl Into<PrimitiveValue>) -> Self {
        let value = value.into();
        Variant {
            type_id: value.kind().type_id(),
            data: VariantData::Primitive(value),
        }
    }

    pub fn enumeration(type_id: TypeId, value: i32) -> Self {
        Variant {
            type_id,
            data: VariantData::Enum(value),
        }
    }

    pub fn object(handle: ObjectHandle) -> Self {
        Variant {
            type_id: handle.type_id(),
            data: VariantData::Object(handle),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.data, VariantData::Empty)
    }

    pub fn as_primitive(&self) -> Option<PrimitiveValue> {
        match self.data {
            VariantData::Primitive(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<i32> {
        match self.data {
            VariantData::Enum(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectHandle> {
        match &self.data {
            VariantData::Object(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<ObjectHandle> {
        match self.data {
            VariantData::Object(handle) => Some(handle),
            _ => None,
        }
    }

    /// Move the payload out, leaving this variant empty.
    pub fn take(&mut self) -> Variant {
        std::mem::replace(self, Variant::empty())
    }

    /// Address of the stored primitive scalar, for bit-identical
    /// by-reference binding. `None` for non-primitive payloads.
    pub(crate) fn primitive_addr(&mut self) -> Option<(PrimitiveKind, ScriptMemoryLocation)> {
        match &mut self.data {
            VariantData::Primitive(value) => {
                let kind = value.kind();
                let addr = match value {
                    PrimitiveValue::Bool(v) => ScriptMemoryLocation::of(v),
                    PrimitiveValue::Int8(v) => ScriptMemoryLocation::of(v),
                    PrimitiveValue::Int16(v) => ScriptMemoryLocation::of(v),
                    PrimitiveValue::Int32(v) => ScriptMemoryLocation::of(v),
                    PrimitiveValue::Int64(v) => ScriptMemoryLocation::of(v),
                    PrimitiveValue::Uint8(v) => ScriptMemoryLocation::of(v),
                    PrimitiveValue::Uint16(v) => ScriptMemoryLocation::of(v),
                    PrimitiveValue::Uint32(v) => ScriptMemoryLocation::of(v),
                    PrimitiveValue::Uint64(v) => ScriptMemoryLocation::of(v),
                    PrimitiveValue::Float(v) => ScriptMemoryLocation::of(v),
                    PrimitiveValue::Double(v) => ScriptMemoryLocation::of(v),
                };
                Some((kind, addr))
            }
            _ => None,
        }
    }
}

macro_rules! variant_from_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Variant {
                fn from(value: $ty) -> Self {
                    Variant::primitive(value)
                }
            }
        )*
    };
}

variant_from_primitive!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl From<ObjectHandle> for Variant {
    fn from(handle: ObjectHandle) -> Self {
        Variant::object(handle)
    }
}
