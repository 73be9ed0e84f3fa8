//! Script-typed → call slot binding, and argument capture.
//!
//! This path is simpler than the native one because both sides already speak
//! the engine's type vocabulary: primitives go through the widen/narrow
//! table, enums bind as 32-bit values, and object references bind directly.
//! Captured values were read against the same callee signature they are
//! later bound to, so no cast is attempted.

use crate::callfunc::native::{check, set_primitive_slot};
use crate::callfunc::param::ScriptParam;
use crate::callfunc::report_marshal;
use crate::core::engine::{EngineRef, ExecutionContext, FunctionRef, GenericCall, ScriptFunction};
use crate::error::{CaptureError, MarshalError};
use crate::types::{TypeClass, Variant, classify};

/// Bind one script-typed argument into the declared slot.
pub fn bind_script_argument(
    engine: &EngineRef,
    function: &FunctionRef,
    ctx: &mut dyn ExecutionContext,
    slot: u32,
    value: &mut Variant,
) -> Result<(), MarshalError> {
    let result = bind_inner(engine, function, ctx, slot, value);
    if let Err(err) = &result {
        report_marshal(engine, function, err);
    }
    result
}

fn bind_inner(
    engine: &EngineRef,
    function: &FunctionRef,
    ctx: &mut dyn ExecutionContext,
    slot: u32,
    value: &mut Variant,
) -> Result<(), MarshalError> {
    let decl = function
        .param(slot)
        .ok_or(MarshalError::UnknownParameter { index: slot })?;
    let declared_class = classify(engine, decl.type_id).ok_or(MarshalError::UnknownType {
        index: slot,
        type_id: decl.type_id,
    })?;
    let by_ref = decl.is_by_ref();

    match declared_class {
        TypeClass::Primitive(declared_kind) => {
            if by_ref {
                // By address only when the stored kind is bit-identical to
                // the declared one.
                match value.primitive_addr() {
                    Some((kind, addr)) if kind == declared_kind => {
                        check(ctx.set_arg_address(slot, addr), slot)
                    }
                    Some((kind, _)) => Err(MarshalError::ReferenceKindMismatch {
                        index: slot,
                        declared: declared_kind,
                        supplied: kind,
                    }),
                    None => Err(incompatible(slot, declared_class, value)),
                }
            } else {
                let stored = value
                    .as_primitive()
                    .ok_or_else(|| incompatible(slot, declared_class, value))?;
                set_primitive_slot(ctx, slot, declared_kind, stored)
            }
        }
        TypeClass::Enum => {
            let stored = value
                .as_enum()
                .ok_or_else(|| incompatible(slot, declared_class, value))?;
            check(ctx.set_arg_dword(slot, stored as u32), slot)
        }
        TypeClass::ValueObject | TypeClass::ReferenceObject => {
            let handle = value
                .as_object()
                .ok_or_else(|| incompatible(slot, declared_class, value))?;
            check(ctx.set_arg_object(slot, handle.ptr()), slot)
        }
    }
}

fn incompatible(slot: u32, declared: TypeClass, value: &Variant) -> MarshalError {
    let supplied = match (value.as_primitive(), value.as_enum(), value.as_object()) {
        (Some(v), _, _) => v.kind().to_string(),
        (_, Some(_), _) => "enum".to_string(),
        (_, _, Some(handle)) => handle.descriptor().qualified_name(),
        _ => "void".to_string(),
    };
    MarshalError::Incompatible {
        index: slot,
        declared: declared.to_string(),
        supplied,
    }
}

/// Capture the trailing arguments of a variadic call frame as owned
/// script-typed parameters.
///
/// This runs before any engine state is mutated, so a malformed request
/// (an out-of-range start offset, or an argument whose type id or value
/// cannot be read) is a hard error surfaced directly to the caller.
pub fn capture_parameter_list(
    frame: &dyn GenericCall,
    start: u32,
) -> Result<Vec<ScriptParam>, CaptureError> {
    let count = frame.arg_count();
    if start > count {
        return Err(CaptureError::StartOutOfRange { start, count });
    }
    let engine = frame.engine();
    let mut params = Vec::with_capacity((count - start) as usize);
    for index in start..count {
        let type_id = frame
            .arg_type_id(index)
            .ok_or(CaptureError::UnreadableTypeId { index })?;
        let value = frame
            .arg_value(index)
            .ok_or(CaptureError::UnreadableValue { index })?;
        let param = ScriptParam::from_variant(engine, value)
            .ok_or(CaptureError::UnknownType { index, type_id })?;
        params.push(param);
    }
    Ok(params)
}
