//! Dynamic invocation marshaling for an embedded script VM, and the timer
//! scheduler built on top of it.
//!
//! Script functions expose signatures that are only known at runtime. This
//! crate converts between strongly typed host values and the engine's
//! calling convention in both directions, drives the prepare/bind/execute
//! protocol on pooled execution contexts, and defers calls to a future point
//! in virtual time with optional repetition.
//!
//! The engine itself is an external collaborator reached through the traits
//! in [`core::engine`]; this crate ships no compiler, bytecode format or
//! execution loop.

pub mod callfunc;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod scheduler;
pub mod types;

pub mod prelude {
    pub use crate::callfunc::{
        ArgPayload, CallParam, CallSession, Cleanup, EnumRef, EnumValue, FromScript, IntoParams,
        Parameter, Receiver, ScriptArg, ScriptParam, ValueInstance, call, call_function,
        call_method, call_on, capture_parameter_list, invoke,
    };
    pub use crate::core::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
    pub use crate::core::engine::{
        EngineRef, ExecutionContext, FunctionRef, GenericCall, ParamDecl, ScriptEngine,
        ScriptFunction, TypeInfo,
    };
    pub use crate::dispatch::EventHook;
    pub use crate::error::{
        CaptureError, DispatchError, DispatchResult, InvocationError, MarshalError, ScheduleError,
    };
    pub use crate::scheduler::{REPEAT_FOREVER, Scheduler, TimerId};
    pub use crate::types::enums::{
        ExecutionState, MessageKind, ParamFlags, ReturnCode, TypeFlags,
    };
    pub use crate::types::{
        ModuleId, NativeEnum, NativeType, ObjectHandle, PrimitiveKind, PrimitiveValue, RawObject,
        ScriptMemoryLocation, TypeClass, TypeDescriptor, TypeHash, TypeId, Variant, classify,
    };
    pub use crate::types::{
        FIRST_OBJECT_TYPE_ID, TYPE_BOOL, TYPE_DOUBLE, TYPE_FLOAT, TYPE_INT8, TYPE_INT16,
        TYPE_INT32, TYPE_INT64, TYPE_UINT8, TYPE_UINT16, TYPE_UINT32, TYPE_UINT64, TYPE_VOID,
    };
}
