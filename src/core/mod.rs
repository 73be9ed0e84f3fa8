//! Engine collaborator surface and diagnostics.

pub mod diagnostics;
pub mod engine;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use engine::{
    EngineRef, ExecutionContext, FunctionRef, GenericCall, ParamDecl, ScriptEngine,
    ScriptFunction, TypeInfo,
};
