//! Native → call slot binding.
//!
//! The conversion is directed by the callee's *declared* parameter type, not
//! the supplied value's static type: enumerations, integral widening and
//! reference casts all depend on the declared side. Failures are written to
//! the engine's diagnostic channel and returned as errors; the caller must
//! not proceed to execution after a failed bind.

use crate::callfunc::param::{ArgPayload, ScriptArg};
use crate::callfunc::report_marshal;
use crate::core::engine::{EngineRef, ExecutionContext, FunctionRef, ScriptEngine, ScriptFunction};
use crate::error::MarshalError;
use crate::types::enums::ReturnCode;
use crate::types::{
    PrimitiveKind, PrimitiveValue, RawObject, TypeClass, TypeDescriptor, TypeId, classify,
};

/// Bind one native argument into the declared slot.
pub fn bind_native_argument(
    engine: &EngineRef,
    function: &FunctionRef,
    ctx: &mut dyn ExecutionContext,
    slot: u32,
    arg: &mut dyn ScriptArg,
) -> Result<(), MarshalError> {
    let result = bind_inner(engine, function, ctx, slot, arg);
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
    arg: &mut dyn ScriptArg,
) -> Result<(), MarshalError> {
    let decl = function
        .param(slot)
        .ok_or(MarshalError::UnknownParameter { index: slot })?;
    let declared_class = classify(engine, decl.type_id).ok_or(MarshalError::UnknownType {
        index: slot,
        type_id: decl.type_id,
    })?;
    let by_ref = decl.is_by_ref();
    let supplied = arg.descriptor();

    match (declared_class, arg.payload()) {
        (
            TypeClass::Enum,
            ArgPayload::Enum {
                value,
                underlying,
                addr,
            },
        ) => {
            if by_ref {
                // Only a 32-bit signed underlying type matches the engine's
                // by-reference enum slot; anything else must not be silently
                // truncated through a reference.
                match (underlying, addr) {
                    (PrimitiveKind::Int32, Some(addr)) => {
                        check(ctx.set_arg_address(slot, addr), slot)
                    }
                    _ => Err(MarshalError::EnumReferenceWidth {
                        index: slot,
                        underlying,
                    }),
                }
            } else {
                check(ctx.set_arg_dword(slot, value as u32), slot)
            }
        }
        (TypeClass::Primitive(declared_kind), ArgPayload::Primitive { value, addr }) => {
            if by_ref {
                match addr {
                    Some(addr) if value.kind() == declared_kind => {
                        check(ctx.set_arg_address(slot, addr), slot)
                    }
                    _ => Err(MarshalError::ReferenceKindMismatch {
                        index: slot,
                        declared: declared_kind,
                        supplied: value.kind(),
                    }),
                }
            } else {
                set_primitive_slot(ctx, slot, declared_kind, value)
            }
        }
        (declared, ArgPayload::Object { ptr, type_id, class }) if declared.is_object() => {
            bind_object(
                engine, ctx, slot, declared, decl.type_id, &supplied, ptr, type_id, class,
            )
        }
        (declared, _) => Err(MarshalError::Incompatible {
            index: slot,
            declared: declared.to_string(),
            supplied: supplied.qualified_name(),
        }),
    }
}

#[allow(clippy::too_many_arguments)]
fn bind_object(
    engine: &EngineRef,
    ctx: &mut dyn ExecutionContext,
    slot: u32,
    declared: TypeClass,
    declared_type_id: TypeId,
    supplied: &TypeDescriptor,
    ptr: RawObject,
    type_id: TypeId,
    class: TypeClass,
) -> Result<(), MarshalError> {
    if !class.is_object() || (declared == TypeClass::ValueObject) != (class == TypeClass::ValueObject)
    {
        return Err(MarshalError::CategoryMismatch {
            index: slot,
            declared: declared.to_string(),
            supplied: class.to_string(),
        });
    }

    if type_id == declared_type_id {
        return check(ctx.set_arg_object(slot, ptr), slot);
    }

    // Value types never support a reference cast.
    if declared == TypeClass::ValueObject {
        return Err(MarshalError::IncompatibleCast {
            index: slot,
            from: supplied.qualified_name(),
            to: declared_type_name(engine, declared_type_id),
        });
    }

    let cast = engine
        .try_ref_cast(ptr, type_id, declared_type_id)
        .ok_or_else(|| MarshalError::IncompatibleCast {
            index: slot,
            from: supplied.qualified_name(),
            to: declared_type_name(engine, declared_type_id),
        })?;

    // The context takes whatever reference it needs while binding; the
    // cast's transient reference is dropped right after.
    let outcome = check(ctx.set_arg_object(slot, cast), slot);
    engine.release(cast, declared_type_id);
    outcome
}

/// Convert `value` to the declared kind and store it through the matching
/// width-specific setter.
pub(crate) fn set_primitive_slot(
    ctx: &mut dyn ExecutionContext,
    slot: u32,
    declared: PrimitiveKind,
    value: PrimitiveValue,
) -> Result<(), MarshalError> {
    let converted = value
        .convert_to(declared)
        .ok_or_else(|| MarshalError::Incompatible {
            index: slot,
            declared: declared.to_string(),
            supplied: value.kind().to_string(),
        })?;
    let code = match converted {
        PrimitiveValue::Bool(v) => ctx.set_arg_byte(slot, v as u8),
        PrimitiveValue::Int8(v) => ctx.set_arg_byte(slot, v as u8),
        PrimitiveValue::Uint8(v) => ctx.set_arg_byte(slot, v),
        PrimitiveValue::Int16(v) => ctx.set_arg_word(slot, v as u16),
        PrimitiveValue::Uint16(v) => ctx.set_arg_word(slot, v),
        PrimitiveValue::Int32(v) => ctx.set_arg_dword(slot, v as u32),
        PrimitiveValue::Uint32(v) => ctx.set_arg_dword(slot, v),
        PrimitiveValue::Int64(v) => ctx.set_arg_qword(slot, v as u64),
        PrimitiveValue::Uint64(v) => ctx.set_arg_qword(slot, v),
        PrimitiveValue::Float(v) => ctx.set_arg_float(slot, v),
        PrimitiveValue::Double(v) => ctx.set_arg_double(slot, v),
    };
    check(code, slot)
}

pub(crate) fn check(code: ReturnCode, index: u32) -> Result<(), MarshalError> {
    if code.is_success() {
        Ok(())
    } else {
        Err(MarshalError::ContextRejected { index, code })
    }
}

fn declared_type_name(engine: &EngineRef, type_id: TypeId) -> String {
    TypeDescriptor::from_type_id(engine, type_id)
        .map(|d| d.qualified_name())
        .unwrap_or_else(|| format!("type {type_id}"))
}
