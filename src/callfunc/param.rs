//! Bound call arguments and the native argument bridge.
//!
//! A [`Parameter`] is one argument captured ahead of invocation time. The
//! native flavor owns a concrete host value behind [`ScriptArg`]; the script
//! flavor owns a [`Variant`] plus the descriptor derived from it at capture
//! time. Either way, the parameter's type is fixed at construction and any
//! engine-side reference the value represents is released when the parameter
//! is dropped: acquisition and release are symmetric around the whole
//! argument list, not interleaved with binding.

use crate::callfunc::{native, script};
use crate::core::engine::{EngineRef, ExecutionContext, FunctionRef};
use crate::error::MarshalError;
use crate::types::{
    NativeEnum, ObjectHandle, PrimitiveKind, PrimitiveValue, RawObject, ScriptMemoryLocation,
    TypeClass, TypeDescriptor, TypeId, Variant,
};

/// The call-slot view of one native argument.
///
/// `addr` is present when the value has a stable address for the duration of
/// the call, which makes it eligible for by-reference binding.
pub enum ArgPayload {
    Primitive {
        value: PrimitiveValue,
        addr: Option<ScriptMemoryLocation>,
    },
    Enum {
        value: i32,
        underlying: PrimitiveKind,
        addr: Option<ScriptMemoryLocation>,
    },
    Object {
        ptr: RawObject,
        type_id: TypeId,
        class: TypeClass,
    },
}

/// A host value that can be bound into a call slot.
///
/// The descriptor describes the *supplied* side; which setter actually runs
/// is decided against the callee's declared parameter type.
pub trait ScriptArg {
    fn descriptor(&self) -> TypeDescriptor;

    fn payload(&mut self) -> ArgPayload;
}

macro_rules! impl_script_arg_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl ScriptArg for $ty {
                fn descriptor(&self) -> TypeDescriptor {
                    TypeDescriptor::primitive(PrimitiveKind::$kind)
                }

                fn payload(&mut self) -> ArgPayload {
                    ArgPayload::Primitive {
                        value: PrimitiveValue::from(*self),
                        addr: Some(ScriptMemoryLocation::of(self)),
                    }
                }
            }

            impl<'a> ScriptArg for &'a mut $ty {
                fn descriptor(&self) -> TypeDescriptor {
                    TypeDescriptor::primitive(PrimitiveKind::$kind)
                }

                fn payload(&mut self) -> ArgPayload {
                    ArgPayload::Primitive {
                        value: PrimitiveValue::from(**self),
                        addr: Some(ScriptMemoryLocation::of(&mut **self)),
                    }
                }
            }
        )*
    };
}

impl_script_arg_primitive! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    f32 => Float,
    f64 => Double,
}

/// A host enumeration passed by value.
pub struct EnumValue<E: NativeEnum>(pub E);

impl<E: NativeEnum> ScriptArg for EnumValue<E> {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::native(E::namespace(), E::type_name(), TypeClass::Enum)
    }

    fn payload(&mut self) -> ArgPayload {
        ArgPayload::Enum {
            value: self.0.to_underlying(),
            underlying: E::underlying(),
            addr: None,
        }
    }
}

/// A host enumeration passed by reference, so the script can write back.
pub struct EnumRef<'a, E: NativeEnum>(pub &'a mut E);

impl<'a, E: NativeEnum> ScriptArg for EnumRef<'a, E> {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::native(E::namespace(), E::type_name(), TypeClass::Enum)
    }

    fn payload(&mut self) -> ArgPayload {
        ArgPayload::Enum {
            value: self.0.to_underlying(),
            underlying: E::underlying(),
            addr: Some(ScriptMemoryLocation::of(&mut *self.0)),
        }
    }
}

impl ScriptArg for ObjectHandle {
    fn descriptor(&self) -> TypeDescriptor {
        ObjectHandle::descriptor(self).clone()
    }

    fn payload(&mut self) -> ArgPayload {
        ArgPayload::Object {
            ptr: self.ptr(),
            type_id: self.type_id(),
            class: ObjectHandle::descriptor(self).class(),
        }
    }
}

/// Non-owning view of an engine-side value-type instance.
///
/// Value types are not reference counted; the caller keeps the instance
/// alive for the duration of the call.
#[derive(Clone)]
pub struct ValueInstance {
    ptr: RawObject,
    type_id: TypeId,
    descriptor: TypeDescriptor,
}

impl ValueInstance {
    /// # Panics
    ///
    /// Panics when the descriptor does not describe a value object; that is
    /// a host configuration error.
    pub fn new(ptr: RawObject, type_id: TypeId, descriptor: TypeDescriptor) -> Self {
        assert!(
            descriptor.class() == TypeClass::ValueObject,
            "ValueInstance requires a value-object descriptor"
        );
        ValueInstance {
            ptr,
            type_id,
            descriptor,
        }
    }

    pub fn ptr(&self) -> RawObject {
        self.ptr
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

impl ScriptArg for ValueInstance {
    fn descriptor(&self) -> TypeDescriptor {
        self.descriptor.clone()
    }

    fn payload(&mut self) -> ArgPayload {
        ArgPayload::Object {
            ptr: self.ptr,
            type_id: self.type_id,
            class: TypeClass::ValueObject,
        }
    }
}

/// A script-typed parameter: an owned [`Variant`] plus the descriptor
/// derived from its type id at capture time.
#[derive(Debug, Clone)]
pub struct ScriptParam {
    value: Variant,
    descriptor: TypeDescriptor,
}

impl ScriptParam {
    /// Derive the descriptor for `value` and take ownership of it. `None`
    /// when the engine does not know the variant's type id.
    pub fn from_variant(engine: &EngineRef, value: Variant) -> Option<Self> {
        let descriptor = TypeDescriptor::from_type_id(engine, value.type_id())?;
        Some(ScriptParam { value, descriptor })
    }

    pub fn value(&self) -> &Variant {
        &self.value
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub(crate) fn value_mut(&mut self) -> &mut Variant {
        &mut self.value
    }
}

/// One bound call argument, native- or script-typed.
pub enum Parameter<'a> {
    Native(Box<dyn ScriptArg + 'a>),
    Script(ScriptParam),
}

impl<'a> Parameter<'a> {
    pub fn native<T: ScriptArg + 'a>(value: T) -> Self {
        Parameter::Native(Box::new(value))
    }

    pub fn script(param: ScriptParam) -> Self {
        Parameter::Script(param)
    }
}

/// Anything that can bind itself into a declared call slot.
pub trait CallParam {
    fn bind(
        &mut self,
        engine: &EngineRef,
        function: &FunctionRef,
        ctx: &mut dyn ExecutionContext,
        slot: u32,
    ) -> Result<(), MarshalError>;
}

impl CallParam for Parameter<'_> {
    fn bind(
        &mut self,
        engine: &EngineRef,
        function: &FunctionRef,
        ctx: &mut dyn ExecutionContext,
        slot: u32,
    ) -> Result<(), MarshalError> {
        match self {
            Parameter::Native(arg) => {
                native::bind_native_argument(engine, function, ctx, slot, arg.as_mut())
            }
            Parameter::Script(param) => {
                script::bind_script_argument(engine, function, ctx, slot, param.value_mut())
            }
        }
    }
}

impl CallParam for ScriptParam {
    fn bind(
        &mut self,
        engine: &EngineRef,
        function: &FunctionRef,
        ctx: &mut dyn ExecutionContext,
        slot: u32,
    ) -> Result<(), MarshalError> {
        script::bind_script_argument(engine, function, ctx, slot, self.value_mut())
    }
}
