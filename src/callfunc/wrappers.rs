//! Typed entry points: native argument packs in, decoded returns out.

use crate::callfunc::executor::{call_function, call_method};
use crate::callfunc::param::{Parameter, ScriptArg};
use crate::callfunc::report_marshal;
use crate::core::engine::{EngineRef, FunctionRef, ScriptFunction};
use crate::error::{DispatchResult, MarshalError};
use crate::types::{ObjectHandle, PrimitiveKind, PrimitiveValue, Variant};

/// A native argument pack. Implemented for tuples of [`ScriptArg`] values up
/// to six elements.
pub trait IntoParams<'a> {
    fn into_params(self) -> Vec<Parameter<'a>>;
}

impl<'a> IntoParams<'a> for Vec<Parameter<'a>> {
    fn into_params(self) -> Vec<Parameter<'a>> {
        self
    }
}

impl<'a> IntoParams<'a> for () {
    fn into_params(self) -> Vec<Parameter<'a>> {
        Vec::new()
    }
}

macro_rules! impl_into_params {
    ($($name:ident $idx:tt),+) => {
        impl<'a, $($name: ScriptArg + 'a),+> IntoParams<'a> for ($($name,)+) {
            fn into_params(self) -> Vec<Parameter<'a>> {
                vec![$(Parameter::native(self.$idx)),+]
            }
        }
    };
}

impl_into_params!(A 0);
impl_into_params!(A 0, B 1);
impl_into_params!(A 0, B 1, C 2);
impl_into_params!(A 0, B 1, C 2, D 3);
impl_into_params!(A 0, B 1, C 2, D 3, E 4);
impl_into_params!(A 0, B 1, C 2, D 3, E 4, F 5);

/// Decode a call's return value into a concrete host type.
pub trait FromScript: Sized {
    fn from_script(value: Variant, function: &str) -> Result<Self, MarshalError>;
}

impl FromScript for () {
    fn from_script(_value: Variant, _function: &str) -> Result<Self, MarshalError> {
        Ok(())
    }
}

impl FromScript for Variant {
    fn from_script(value: Variant, _function: &str) -> Result<Self, MarshalError> {
        Ok(value)
    }
}

macro_rules! impl_from_script_primitive {
    ($($ty:ty => $kind:ident / $variant:ident),* $(,)?) => {
        $(
            impl FromScript for $ty {
                fn from_script(value: Variant, function: &str) -> Result<Self, MarshalError> {
                    value
                        .as_primitive()
                        .or_else(|| value.as_enum().map(PrimitiveValue::Int32))
                        .and_then(|v| v.convert_to(PrimitiveKind::$kind))
                        .and_then(|v| match v {
                            PrimitiveValue::$variant(out) => Some(out),
                            _ => None,
                        })
                        .ok_or_else(|| MarshalError::ReturnMismatch {
                            function: function.to_string(),
                        })
                }
            }
        )*
    };
}

impl_from_script_primitive! {
    bool => Bool / Bool,
    i8 => Int8 / Int8,
    i16 => Int16 / Int16,
    i32 => Int32 / Int32,
    i64 => Int64 / Int64,
    u8 => Uint8 / Uint8,
    u16 => Uint16 / Uint16,
    u32 => Uint32 / Uint32,
    u64 => Uint64 / Uint64,
    f32 => Float / Float,
    f64 => Double / Double,
}

impl FromScript for ObjectHandle {
    fn from_script(value: Variant, function: &str) -> Result<Self, MarshalError> {
        value
            .into_object()
            .ok_or_else(|| MarshalError::ReturnMismatch {
                function: function.to_string(),
            })
    }
}

impl FromScript for Option<ObjectHandle> {
    fn from_script(value: Variant, function: &str) -> Result<Self, MarshalError> {
        if value.is_empty() {
            return Ok(None);
        }
        value
            .into_object()
            .map(Some)
            .ok_or_else(|| MarshalError::ReturnMismatch {
                function: function.to_string(),
            })
    }
}

/// Call a global script function with native arguments and decode the
/// return value.
pub fn call<'a, A, R>(engine: &EngineRef, function: &FunctionRef, args: A) -> DispatchResult<R>
where
    A: IntoParams<'a>,
    R: FromScript,
{
    let mut params = args.into_params();
    let value = call_function(engine, function, &mut params)?;
    decode(engine, function, value)
}

/// Call a member function on `instance` with native arguments and decode
/// the return value.
pub fn call_on<'a, A, R>(
    engine: &EngineRef,
    function: &FunctionRef,
    instance: &ObjectHandle,
    args: A,
) -> DispatchResult<R>
where
    A: IntoParams<'a>,
    R: FromScript,
{
    let mut params = args.into_params();
    let value = call_method(engine, function, instance, &mut params)?;
    decode(engine, function, value)
}

fn decode<R: FromScript>(
    engine: &EngineRef,
    function: &FunctionRef,
    value: Variant,
) -> DispatchResult<R> {
    match R::from_script(value, function.name()) {
        Ok(decoded) => Ok(decoded),
        Err(err) => {
            report_marshal(engine, function, &err);
            Err(err.into())
        }
    }
}
