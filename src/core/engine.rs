//! The capability surface this crate consumes from the embedded engine.
//!
//! The engine itself (compiler, bytecode, execution loop) lives elsewhere.
//! Everything the marshaling and scheduling layers need from it is expressed
//! through the object-safe traits in this module: pooled execution contexts,
//! function signature introspection, type information, reference counting on
//! engine-owned objects, and the diagnostic message channel.
//!
//! All operations are single-threaded; implementations are driven only from
//! the thread that owns the engine.

use std::sync::Arc;

use crate::types::enums::{ExecutionState, MessageKind, ParamFlags, ReturnCode, TypeFlags};
use crate::types::{ModuleId, RawObject, ScriptMemoryLocation, TypeId, Variant};

/// Shared handle to the engine collaborator.
pub type EngineRef = Arc<dyn ScriptEngine>;

/// Strong reference to a callable script function.
///
/// The `Arc` is the ownership model: holding a `FunctionRef` keeps the
/// function (and through it, its signature data) alive, the way an
/// engine-side reference count would.
pub type FunctionRef = Arc<dyn ScriptFunction>;

/// Declared type and modifiers of one parameter or return slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDecl {
    pub type_id: TypeId,
    pub flags: ParamFlags,
}

impl ParamDecl {
    pub fn new(type_id: TypeId, flags: ParamFlags) -> Self {
        ParamDecl { type_id, flags }
    }

    pub fn by_value(type_id: TypeId) -> Self {
        ParamDecl {
            type_id,
            flags: ParamFlags::empty(),
        }
    }

    pub fn is_by_ref(&self) -> bool {
        self.flags.is_by_ref()
    }
}

/// Signature introspection on a script-declared function.
pub trait ScriptFunction {
    fn name(&self) -> &str;

    fn param_count(&self) -> u32;

    /// Declared type and flags for one parameter slot.
    fn param(&self, index: u32) -> Option<ParamDecl>;

    fn return_decl(&self) -> ParamDecl;

    /// The module that owns this function.
    fn module(&self) -> ModuleId;
}

/// Live type information for an engine-registered type.
///
/// Held behind `Arc` so a descriptor can keep the information alive for as
/// long as a value of the type is being described.
pub trait TypeInfo {
    fn type_id(&self) -> TypeId;

    fn name(&self) -> &str;

    fn namespace(&self) -> &str;

    fn flags(&self) -> TypeFlags;
}

/// One pooled execution context, bound to at most one call at a time.
///
/// The protocol is prepare → set arguments → execute → unprepare. Argument
/// setters are only valid between `prepare` and `execute`; return getters
/// only after `execute` finished cleanly.
pub trait ExecutionContext {
    fn prepare(&mut self, function: &FunctionRef) -> ReturnCode;

    fn unprepare(&mut self) -> ReturnCode;

    fn execute(&mut self) -> ExecutionState;

    /// Bind the object instance for a member call.
    fn set_object_instance(&mut self, object: RawObject) -> ReturnCode;

    fn set_arg_byte(&mut self, slot: u32, value: u8) -> ReturnCode;
    fn set_arg_word(&mut self, slot: u32, value: u16) -> ReturnCode;
    fn set_arg_dword(&mut self, slot: u32, value: u32) -> ReturnCode;
    fn set_arg_qword(&mut self, slot: u32, value: u64) -> ReturnCode;
    fn set_arg_float(&mut self, slot: u32, value: f32) -> ReturnCode;
    fn set_arg_double(&mut self, slot: u32, value: f64) -> ReturnCode;
    fn set_arg_address(&mut self, slot: u32, address: ScriptMemoryLocation) -> ReturnCode;
    fn set_arg_object(&mut self, slot: u32, object: RawObject) -> ReturnCode;

    fn return_byte(&self) -> u8;
    fn return_word(&self) -> u16;
    fn return_dword(&self) -> u32;
    fn return_qword(&self) -> u64;
    fn return_float(&self) -> f32;
    fn return_double(&self) -> f64;

    /// Object returned by the last call; the engine keeps its own reference
    /// to it until the context is reused.
    fn return_object(&self) -> RawObject;

    fn return_address(&self) -> ScriptMemoryLocation;

    /// Exception text when `execute` ended in [`ExecutionState::Exception`].
    fn exception_message(&self) -> Option<String>;
}

/// The engine capabilities consumed by this crate.
pub trait ScriptEngine {
    /// Borrow a context from the engine's pool. `None` when the pool is
    /// exhausted and the engine cannot grow it.
    fn request_context(&self) -> Option<Box<dyn ExecutionContext>>;

    /// Give a context back to the pool.
    fn return_context(&self, context: Box<dyn ExecutionContext>);

    fn type_info(&self, type_id: TypeId) -> Option<Arc<dyn TypeInfo>>;

    fn find_type(&self, namespace: &str, name: &str) -> Option<TypeId>;

    /// Take one reference on an engine-owned object.
    fn add_ref(&self, object: RawObject, type_id: TypeId);

    /// Drop one reference on an engine-owned object.
    fn release(&self, object: RawObject, type_id: TypeId);

    /// Attempt a reference cast. On success the returned object carries one
    /// extra reference which the caller must release.
    fn try_ref_cast(&self, object: RawObject, from: TypeId, to: TypeId) -> Option<RawObject>;

    /// The diagnostic channel. This crate reports every recoverable failure
    /// here; nothing is ever thrown across this boundary.
    fn write_message(&self, section: &str, row: u32, col: u32, kind: MessageKind, message: &str);
}

/// A type-erased call frame, as seen by a function registered with a
/// variadic signature.
///
/// The scheduler captures its trailing arguments from this frame at schedule
/// time; each captured value is read out as an owning [`Variant`].
pub trait GenericCall {
    fn engine(&self) -> &EngineRef;

    /// Module of the script currently executing the call.
    fn caller_module(&self) -> ModuleId;

    fn arg_count(&self) -> u32;

    fn arg_type_id(&self, index: u32) -> Option<TypeId>;

    /// Read one argument out of the frame as an owning value.
    fn arg_value(&self, index: u32) -> Option<Variant>;

    fn set_return(&mut self, value: Variant);
}
