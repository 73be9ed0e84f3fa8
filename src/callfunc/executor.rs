//! The invocation protocol: prepare → bind → execute → decode → unprepare.

use crate::callfunc::param::CallParam;
use crate::callfunc::session::CallSession;
use crate::callfunc::{report_invocation, report_marshal};
use crate::core::engine::{EngineRef, ExecutionContext, FunctionRef, ScriptFunction};
use crate::error::{DispatchResult, InvocationError, MarshalError};
use crate::types::enums::ExecutionState;
use crate::types::{
    ObjectHandle, PrimitiveKind, PrimitiveValue, RawObject, TypeClass, TypeDescriptor, Variant,
    classify,
};

/// Who receives the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    Global,
    /// A member call on this object instance.
    Member(RawObject),
}

/// When the context is unprepared.
///
/// `PerCall` unprepares after every invocation. `Amortized` leaves the
/// context prepared so a dispatcher can run many functions back to back;
/// the owning [`CallSession`] unprepares once when it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cleanup {
    PerCall,
    Amortized,
}

/// Run one call through `session`'s context.
///
/// All four receiver/cleanup combinations share this path; only the
/// instance-binding step and the cleanup hook differ. The first argument
/// that fails to bind aborts the whole call; execution is never reached
/// with a partially bound frame. Cleanup runs on every outcome.
pub fn invoke<P: CallParam>(
    engine: &EngineRef,
    session: &mut CallSession,
    function: &FunctionRef,
    receiver: Receiver,
    params: &mut [P],
    cleanup: Cleanup,
) -> DispatchResult<Variant> {
    let result = invoke_inner(engine, session, function, receiver, params);
    if cleanup == Cleanup::PerCall && session.is_prepared() {
        let _ = session.context().unprepare();
        session.set_prepared(false);
    }
    result
}

fn invoke_inner<P: CallParam>(
    engine: &EngineRef,
    session: &mut CallSession,
    function: &FunctionRef,
    receiver: Receiver,
    params: &mut [P],
) -> DispatchResult<Variant> {
    if let Receiver::Member(instance) = receiver {
        if instance.is_null() {
            let err = InvocationError::NullInstance;
            report_invocation(engine, function, &err);
            return Err(err.into());
        }
    }

    let declared = function.param_count();
    if params.len() as u32 != declared {
        let err = MarshalError::ArityMismatch {
            function: function.name().to_string(),
            declared,
            supplied: params.len() as u32,
        };
        report_marshal(engine, function, &err);
        return Err(err.into());
    }

    if let Err(err) = session.context().prepare(function).into_result() {
        report_invocation(engine, function, &err);
        return Err(err.into());
    }
    session.set_prepared(true);

    if let Receiver::Member(instance) = receiver {
        if let Err(err) = session.context().set_object_instance(instance).into_result() {
            report_invocation(engine, function, &err);
            return Err(err.into());
        }
    }

    for (index, param) in params.iter_mut().enumerate() {
        param.bind(engine, function, session.context(), index as u32)?;
    }

    match session.context().execute() {
        ExecutionState::Finished => decode_return(engine, function, session.context()),
        ExecutionState::Exception => {
            let message = session
                .context()
                .exception_message()
                .unwrap_or_else(|| "unknown script exception".to_string());
            let err = InvocationError::Exception(message);
            report_invocation(engine, function, &err);
            Err(err.into())
        }
        ExecutionState::Suspended => {
            let err = InvocationError::Suspended;
            report_invocation(engine, function, &err);
            Err(err.into())
        }
        ExecutionState::Aborted => {
            let err = InvocationError::Aborted;
            report_invocation(engine, function, &err);
            Err(err.into())
        }
    }
}

/// Read the return slot according to the declared return type.
fn decode_return(
    engine: &EngineRef,
    function: &FunctionRef,
    ctx: &mut dyn ExecutionContext,
) -> DispatchResult<Variant> {
    let decl = function.return_decl();
    let class = classify(engine, decl.type_id).ok_or(MarshalError::UnknownType {
        index: 0,
        type_id: decl.type_id,
    })?;

    let value = match class {
        TypeClass::Primitive(kind) => match kind {
            PrimitiveKind::Void => Variant::empty(),
            PrimitiveKind::Bool => Variant::primitive(PrimitiveValue::Bool(ctx.return_byte() != 0)),
            PrimitiveKind::Int8 => Variant::primitive(PrimitiveValue::Int8(ctx.return_byte() as i8)),
            PrimitiveKind::Uint8 => Variant::primitive(PrimitiveValue::Uint8(ctx.return_byte())),
            PrimitiveKind::Int16 => {
                Variant::primitive(PrimitiveValue::Int16(ctx.return_word() as i16))
            }
            PrimitiveKind::Uint16 => Variant::primitive(PrimitiveValue::Uint16(ctx.return_word())),
            PrimitiveKind::Int32 => {
                Variant::primitive(PrimitiveValue::Int32(ctx.return_dword() as i32))
            }
            PrimitiveKind::Uint32 => Variant::primitive(PrimitiveValue::Uint32(ctx.return_dword())),
            PrimitiveKind::Int64 => {
                Variant::primitive(PrimitiveValue::Int64(ctx.return_qword() as i64))
            }
            PrimitiveKind::Uint64 => Variant::primitive(PrimitiveValue::Uint64(ctx.return_qword())),
            PrimitiveKind::Float => Variant::primitive(PrimitiveValue::Float(ctx.return_float())),
            PrimitiveKind::Double => Variant::primitive(PrimitiveValue::Double(ctx.return_double())),
        },
        TypeClass::Enum => Variant::enumeration(decl.type_id, ctx.return_dword() as i32),
        TypeClass::ValueObject | TypeClass::ReferenceObject => {
            let ptr = ctx.return_object();
            if ptr.is_null() {
                Variant::empty()
            } else {
                let descriptor = TypeDescriptor::from_type_id(engine, decl.type_id).ok_or(
                    MarshalError::UnknownType {
                        index: 0,
                        type_id: decl.type_id,
                    },
                )?;
                // The engine retains its own reference to the value it just
                // returned; ours is taken on top of it.
                Variant::object(ObjectHandle::borrowed(
                    engine.clone(),
                    ptr,
                    decl.type_id,
                    descriptor,
                ))
            }
        }
    };
    Ok(value)
}

/// Call a global function once, with per-call cleanup.
pub fn call_function<P: CallParam>(
    engine: &EngineRef,
    function: &FunctionRef,
    params: &mut [P],
) -> DispatchResult<Variant> {
    let mut session = begin_reported(engine, function)?;
    invoke(
        engine,
        &mut session,
        function,
        Receiver::Global,
        params,
        Cleanup::PerCall,
    )
}

/// Call a member function on `instance` once, with per-call cleanup.
pub fn call_method<P: CallParam>(
    engine: &EngineRef,
    function: &FunctionRef,
    instance: &ObjectHandle,
    params: &mut [P],
) -> DispatchResult<Variant> {
    let mut session = begin_reported(engine, function)?;
    invoke(
        engine,
        &mut session,
        function,
        Receiver::Member(instance.ptr()),
        params,
        Cleanup::PerCall,
    )
}

fn begin_reported(engine: &EngineRef, function: &FunctionRef) -> Result<CallSession, InvocationError> {
    CallSession::begin(engine).inspect_err(|err| report_invocation(engine, function, err))
}
