//! Status codes and flag sets shared with the embedded engine.

use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::InvocationError;

/// Return codes produced by the engine's context and argument operations.
///
/// Negative codes indicate failure. Raw codes read from the engine are
/// converted with [`ReturnCode::from_code`], which maps any unrecognized
/// negative value to [`ReturnCode::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum ReturnCode {
    /// Operation completed successfully.
    Success = 0,
    /// Generic failure.
    Error = -1,
    /// The context is active and cannot be modified.
    ContextActive = -2,
    /// The context has not been prepared for a call.
    ContextNotPrepared = -3,
    /// An argument slot index or value was invalid.
    InvalidArg = -4,
    /// No function was supplied or found.
    NoFunction = -5,
    /// The operation is not supported by the engine.
    NotSupported = -6,
    /// A type id was invalid for the operation.
    InvalidType = -7,
    /// An object reference was invalid.
    InvalidObject = -8,
    /// The engine ran out of memory.
    OutOfMemory = -9,
}

impl ReturnCode {
    /// Convert a raw engine code. Non-negative values are success.
    pub fn from_code(code: i32) -> Self {
        if code >= 0 {
            return ReturnCode::Success;
        }
        ReturnCode::try_from(code).unwrap_or(ReturnCode::Error)
    }

    pub fn is_success(self) -> bool {
        self == ReturnCode::Success
    }

    /// Lift the code into a `Result`, carrying the failing code along.
    pub fn into_result(self) -> Result<(), InvocationError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(InvocationError::Failed(self))
        }
    }
}

/// Terminal state of one `execute` call on an execution context.
///
/// Suspension and abortion are terminal outcomes for the caller; a suspended
/// script is not resumed through this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Finished,
    Suspended,
    Aborted,
    Exception,
}

/// Severity of a message written to the engine's diagnostic channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Warning,
    Information,
}

bitflags! {
    /// Category flags published by the engine for a registered type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TypeFlags: u32 {
        const REF_TYPE = 0x0001;
        const VALUE_TYPE = 0x0002;
        const ENUM = 0x0004;
    }
}

bitflags! {
    /// Modifiers on a declared function parameter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u32 {
        const IN_REF = 0x0001;
        const OUT_REF = 0x0002;
        const CONST = 0x0004;
    }
}

impl ParamFlags {
    /// Whether the parameter is passed by reference in either direction.
    pub fn is_by_ref(self) -> bool {
        self.intersects(ParamFlags::IN_REF | ParamFlags::OUT_REF)
    }
}
