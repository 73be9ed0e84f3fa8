//! Owned references to engine-managed objects.

use crate::core::engine::{EngineRef, ScriptEngine};
use crate::types::{TypeDescriptor, TypeId};

/// Opaque reference to an engine-owned object. Zero is the null reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawObject(pub u64);

impl RawObject {
    pub const NULL: RawObject = RawObject(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Exclusive owner of exactly one engine-side reference to an object.
///
/// Construction either *borrows* (takes a new reference) or is *transferred*
/// (adopts a reference the caller already holds). Cloning takes another
/// reference; dropping releases the owned one. No raw object reference to a
/// reference-counted value leaves this wrapper except transiently while a
/// call slot is being bound.
pub struct ObjectHandle {
    ptr: RawObject,
    type_id: TypeId,
    descriptor: TypeDescriptor,
    engine: EngineRef,
}

impl ObjectHandle {
    /// Take a new reference on `ptr` and own it.
    pub fn borrowed(
        engine: EngineRef,
        ptr: RawObject,
        type_id: TypeId,
        descriptor: TypeDescriptor,
    ) -> Self {
        if !ptr.is_null() {
            engine.add_ref(ptr, type_id);
        }
        ObjectHandle {
            ptr,
            type_id,
            descriptor,
            engine,
        }
    }

    /// Adopt a reference the caller already holds; no new reference is taken.
    pub fn transferred(
        engine: EngineRef,
        ptr: RawObject,
        type_id: TypeId,
        descriptor: TypeDescriptor,
    ) -> Self {
        ObjectHandle {
            ptr,
            type_id,
            descriptor,
            engine,
        }
    }

    pub fn ptr(&self) -> RawObject {
        self.ptr
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    pub fn engine(&self) -> &EngineRef {
        &self.engine
    }
}

impl Clone for ObjectHandle {
    fn clone(&self) -> Self {
        ObjectHandle::borrowed(
            self.engine.clone(),
            self.ptr,
            self.type_id,
            self.descriptor.clone(),
        )
    }
}

impl Drop for ObjectHandle {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            self.engine.release(self.ptr, self.type_id);
        }
    }
}

impl PartialEq for ObjectHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl Eq for ObjectHandle {}

impl std::fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectHandle")
            .field("ptr", &self.ptr)
            .field("type_id", &self.type_id)
            .field("type", &self.descriptor.name())
            .finish()
    }
}
