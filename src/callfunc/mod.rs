//! Type-directed argument marshaling and the call executor.
//!
//! Two symmetric binding paths feed one invocation protocol: native host
//! values ([`native`]) and script-typed values captured at runtime
//! ([`script`]). Both are stateless and parameterized by the callee's
//! declared parameter types; the executor ([`executor`]) owns nothing beyond
//! the duration of one call.

pub mod executor;
pub mod native;
pub mod param;
pub mod script;
pub mod session;
pub mod wrappers;

pub use executor::{Cleanup, Receiver, call_function, call_method, invoke};
pub use native::bind_native_argument;
pub use param::{
    ArgPayload, CallParam, EnumRef, EnumValue, Parameter, ScriptArg, ScriptParam, ValueInstance,
};
pub use script::{bind_script_argument, capture_parameter_list};
pub use session::CallSession;
pub use wrappers::{FromScript, IntoParams, call, call_on};

use crate::core::engine::{EngineRef, FunctionRef, ScriptEngine, ScriptFunction};
use crate::error::{InvocationError, MarshalError};
use crate::types::enums::MessageKind;

pub(crate) fn report_marshal(engine: &EngineRef, function: &FunctionRef, err: &MarshalError) {
    engine.write_message(function.name(), 0, 0, MessageKind::Error, &err.to_string());
}

pub(crate) fn report_invocation(engine: &EngineRef, function: &FunctionRef, err: &InvocationError) {
    engine.write_message(function.name(), 0, 0, MessageKind::Error, &err.to_string());
}
