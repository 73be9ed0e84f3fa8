//! Type system vocabulary shared between the host and the embedded engine.
//!
//! - [`PrimitiveKind`] / [`PrimitiveValue`]: built-in scalar types
//! - [`TypeDescriptor`] / [`TypeClass`]: marshaling-relevant type attributes
//! - [`Variant`]: type-erased holder for a script-typed value
//! - [`ObjectHandle`]: owned reference to an engine-managed object
//! - [`ScriptMemoryLocation`]: raw address cell for by-reference slots

pub mod enums;
mod handle;
mod primitive_kind;
mod script_memory;
mod type_desc;
mod type_hash;
mod variant;

pub use handle::{ObjectHandle, RawObject};
pub use primitive_kind::{PrimitiveKind, PrimitiveValue};
pub use script_memory::{ScriptMemoryLocation, Void};
pub use type_desc::{NativeEnum, NativeType, TypeClass, TypeDescriptor, classify};
pub use type_hash::TypeHash;
pub use variant::Variant;

/// Engine-assigned type identifier.
pub type TypeId = u32;

/// Engine-assigned module identifier.
pub type ModuleId = u32;

pub const TYPE_VOID: TypeId = 0;
pub const TYPE_BOOL: TypeId = 1;
pub const TYPE_INT8: TypeId = 2;
pub const TYPE_INT16: TypeId = 3;
pub const TYPE_INT32: TypeId = 4;
pub const TYPE_INT64: TypeId = 5;
pub const TYPE_UINT8: TypeId = 6;
pub const TYPE_UINT16: TypeId = 7;
pub const TYPE_UINT32: TypeId = 8;
pub const TYPE_UINT64: TypeId = 9;
pub const TYPE_FLOAT: TypeId = 10;
pub const TYPE_DOUBLE: TypeId = 11;

/// Ids below this value are reserved for primitives; engine-registered types
/// start here.
pub const FIRST_OBJECT_TYPE_ID: TypeId = 100;
