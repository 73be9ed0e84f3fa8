//! Error types for marshaling, invocation, capture and scheduling.
//!
//! Everything here is recoverable: operations report through the engine's
//! diagnostic channel and return one of these errors, they never unwind
//! across the engine boundary. Host configuration mistakes (empty type
//! names, misuse of an unprepared context) are programmer errors and panic
//! at the call site instead.

use thiserror::Error;

use crate::types::enums::ReturnCode;
use crate::types::{PrimitiveKind, TypeId};

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Top-level error wrapper for callers that do not care which phase failed.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Marshal(#[from] MarshalError),

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// A supplied argument could not be converted to the callee's declared
/// parameter type. The call must not proceed to execution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarshalError {
    #[error("'{function}' takes {declared} arguments, {supplied} were supplied")]
    ArityMismatch {
        function: String,
        declared: u32,
        supplied: u32,
    },

    #[error("parameter {index}: type id {type_id} is not known to the engine")]
    UnknownType { index: u32, type_id: TypeId },

    #[error("parameter index {index} is out of range")]
    UnknownParameter { index: u32 },

    #[error("parameter {index}: {supplied} cannot be passed where {declared} is declared")]
    Incompatible {
        index: u32,
        declared: String,
        supplied: String,
    },

    #[error(
        "parameter {index}: value/reference category mismatch ({supplied} supplied, {declared} declared)"
    )]
    CategoryMismatch {
        index: u32,
        declared: String,
        supplied: String,
    },

    #[error(
        "parameter {index}: by-reference binding requires matching primitive kinds ({supplied} supplied, {declared} declared)"
    )]
    ReferenceKindMismatch {
        index: u32,
        declared: PrimitiveKind,
        supplied: PrimitiveKind,
    },

    #[error("parameter {index}: enums with a {underlying} underlying type cannot be bound by reference")]
    EnumReferenceWidth {
        index: u32,
        underlying: PrimitiveKind,
    },

    #[error("parameter {index}: no reference cast from '{from}' to '{to}'")]
    IncompatibleCast {
        index: u32,
        from: String,
        to: String,
    },

    #[error("parameter {index}: the execution context rejected the argument ({code:?})")]
    ContextRejected { index: u32, code: ReturnCode },

    #[error("the return value of '{function}' could not be decoded as the requested type")]
    ReturnMismatch { function: String },
}

/// The call itself failed: no context, bad instance, or the engine reported
/// a non-success outcome from execution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    #[error("no execution context is available")]
    ContextUnavailable,

    #[error("a member call requires a non-null object instance")]
    NullInstance,

    #[error("context operation failed ({0:?})")]
    Failed(ReturnCode),

    #[error("script exception: {0}")]
    Exception(String),

    #[error("script execution was suspended before completion")]
    Suspended,

    #[error("script execution was aborted")]
    Aborted,
}

/// A request to capture arguments from a call frame was malformed.
///
/// Capture runs before any engine state is touched, so these surface to the
/// immediate caller without cleanup concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("capture start index {start} is out of range (frame has {count} arguments)")]
    StartOutOfRange { start: u32, count: u32 },

    #[error("argument {index}: type id could not be read from the call frame")]
    UnreadableTypeId { index: u32 },

    #[error("argument {index}: value could not be read from the call frame")]
    UnreadableValue { index: u32 },

    #[error("argument {index}: type id {type_id} is not known to the engine")]
    UnknownType { index: u32, type_id: TypeId },
}

/// A schedule request was rejected before anything was inserted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("repeat interval must not be negative")]
    NegativeInterval,

    #[error("repeat count {0} is neither a positive count nor the forever sentinel")]
    InvalidRepeatCount(i32),

    #[error("'{function}' takes {declared} arguments, {supplied} were captured")]
    ArityMismatch {
        function: String,
        declared: u32,
        supplied: u32,
    },

    #[error("'{function}' belongs to a different module than the caller")]
    CrossModule { function: String },
}
