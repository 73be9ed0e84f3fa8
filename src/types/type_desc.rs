//! Type descriptors: the marshaling-relevant attributes of a type.
//!
//! A descriptor exists in two provenances. *Native* descriptors are declared
//! at compile time through [`NativeType`] and carry no engine state. *Script*
//! descriptors are built from a live engine's type information with
//! [`TypeDescriptor::from_type_id`]; name and category are copied out, and
//! for object classes the descriptor additionally retains the engine's
//! [`TypeInfo`](crate::core::engine::TypeInfo) so it stays alive as long as
//! the descriptor does.

use std::fmt;
use std::sync::Arc;

use crate::core::engine::{EngineRef, ScriptEngine, TypeInfo};
use crate::types::enums::TypeFlags;
use crate::types::{PrimitiveKind, TypeHash, TypeId};

/// Closed classification of a type for marshaling dispatch.
///
/// Every binding decision in this crate is a match over this enum; the
/// engine's category flag bits are folded into it exactly once, in
/// [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    Primitive(PrimitiveKind),
    Enum,
    ValueObject,
    ReferenceObject,
}

impl TypeClass {
    pub fn is_object(self) -> bool {
        matches!(self, TypeClass::ValueObject | TypeClass::ReferenceObject)
    }
}

impl fmt::Display for TypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeClass::Primitive(kind) => write!(f, "{kind}"),
            TypeClass::Enum => write!(f, "enum"),
            TypeClass::ValueObject => write!(f, "value object"),
            TypeClass::ReferenceObject => write!(f, "reference object"),
        }
    }
}

/// Classify an engine type id.
///
/// Returns `None` for ids the engine does not know, which callers must treat
/// as a marshaling failure rather than a fatal condition.
pub fn classify(engine: &EngineRef, type_id: TypeId) -> Option<TypeClass> {
    if let Some(kind) = PrimitiveKind::from_type_id(type_id) {
        return Some(TypeClass::Primitive(kind));
    }
    let info = engine.type_info(type_id)?;
    let flags = info.flags();
    if flags.contains(TypeFlags::ENUM) {
        Some(TypeClass::Enum)
    } else if flags.contains(TypeFlags::VALUE_TYPE) {
        Some(TypeClass::ValueObject)
    } else if flags.contains(TypeFlags::REF_TYPE) {
        Some(TypeClass::ReferenceObject)
    } else {
        None
    }
}

/// Immutable record of a type's marshaling-relevant attributes.
#[derive(Clone)]
pub struct TypeDescriptor {
    namespace: String,
    name: String,
    class: TypeClass,
    hash: TypeHash,
    type_info: Option<Arc<dyn TypeInfo>>,
}

impl TypeDescriptor {
    /// Descriptor for a natively declared type.
    ///
    /// # Panics
    ///
    /// Panics on an empty type name; that is a host configuration error, not
    /// a runtime condition.
    pub fn native(namespace: &str, name: &str, class: TypeClass) -> Self {
        assert!(!name.is_empty(), "type name must not be empty");
        TypeDescriptor {
            namespace: namespace.to_string(),
            name: name.to_string(),
            class,
            hash: TypeHash::from_qualified(namespace, name),
            type_info: None,
        }
    }

    /// Descriptor for a built-in primitive kind.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeDescriptor {
            namespace: String::new(),
            name: kind.name().to_string(),
            class: TypeClass::Primitive(kind),
            hash: TypeHash::from_name(kind.name()),
            type_info: None,
        }
    }

    /// Descriptor built from a live engine type id.
    ///
    /// Name, namespace and category are copied out of the engine. For object
    /// classes the descriptor keeps a reference to the engine's type
    /// information, so it remains valid for the descriptor's lifetime. `None`
    /// when the engine does not know the id.
    pub fn from_type_id(engine: &EngineRef, type_id: TypeId) -> Option<Self> {
        if let Some(kind) = PrimitiveKind::from_type_id(type_id) {
            return Some(TypeDescriptor::primitive(kind));
        }
        let info = engine.type_info(type_id)?;
        let class = classify(engine, type_id)?;
        let descriptor = TypeDescriptor {
            namespace: info.namespace().to_string(),
            name: info.name().to_string(),
            class,
            hash: TypeHash::from_qualified(info.namespace(), info.name()),
            type_info: class.is_object().then_some(info),
        };
        Some(descriptor)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.namespace, self.name)
        }
    }

    pub fn class(&self) -> TypeClass {
        self.class
    }

    pub fn hash(&self) -> TypeHash {
        self.hash
    }

    /// The retained engine type information, present on script-provenance
    /// object descriptors.
    pub fn type_info(&self) -> Option<&Arc<dyn TypeInfo>> {
        self.type_info.as_ref()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("class", &self.class)
            .field("hash", &self.hash)
            .finish()
    }
}

/// A host type declared for marshaling.
///
/// Implementing this for a type makes it describable at compile time;
/// passing an undeclared type to a typed call entry point simply does not
/// compile.
pub trait NativeType {
    fn describe() -> TypeDescriptor;
}

/// A host enumeration declared for marshaling.
///
/// # Safety
///
/// Implementors guarantee that the type's memory representation is exactly
/// the primitive returned by `underlying` (for example `#[repr(i32)]` when
/// `underlying` is [`PrimitiveKind::Int32`]); by-reference binding writes
/// through a pointer to the value using that representation.
pub unsafe trait NativeEnum: Copy {
    fn type_name() -> &'static str;

    fn namespace() -> &'static str {
        ""
    }

    fn underlying() -> PrimitiveKind {
        PrimitiveKind::Int32
    }

    fn to_underlying(self) -> i32;
}
