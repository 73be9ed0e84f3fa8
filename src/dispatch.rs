//! Event hooks: invoking a list of subscriber functions.
//!
//! A hook is an ordered list of script functions sharing one signature.
//! Calling the hook runs every subscriber against a single execution
//! context; per-call unprepare is skipped and the context is cleaned up
//! once, when the session ends.

use std::sync::Arc;

use crate::callfunc::{CallSession, Cleanup, Receiver, ScriptParam, invoke};
use crate::core::engine::{EngineRef, FunctionRef, ScriptEngine, ScriptFunction};
use crate::types::ModuleId;
use crate::types::enums::MessageKind;

pub struct EventHook {
    name: String,
    subscribers: Vec<FunctionRef>,
}

impl EventHook {
    pub fn new(name: impl Into<String>) -> Self {
        EventHook {
            name: name.into(),
            subscribers: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a subscriber. Subscribing the same function twice is a no-op.
    pub fn subscribe(&mut self, function: FunctionRef) {
        if !self.contains(&function) {
            self.subscribers.push(function);
        }
    }

    /// Remove a subscriber by function identity.
    pub fn unsubscribe(&mut self, function: &FunctionRef) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|f| !Arc::ptr_eq(f, function));
        self.subscribers.len() != before
    }

    /// Drop every subscriber owned by `module`; the module teardown hook.
    pub fn remove_module(&mut self, module: ModuleId) {
        self.subscribers.retain(|f| f.module() != module);
    }

    pub fn contains(&self, function: &FunctionRef) -> bool {
        self.subscribers.iter().any(|f| Arc::ptr_eq(f, function))
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Invoke every subscriber in order with the same parameter list.
    ///
    /// A failing subscriber is reported through the diagnostic channel and
    /// iteration continues. Returns the number of subscribers that
    /// completed successfully.
    pub fn call(&self, engine: &EngineRef, params: &mut [ScriptParam]) -> usize {
        if self.subscribers.is_empty() {
            return 0;
        }
        let mut session = match CallSession::begin(engine) {
            Ok(session) => session,
            Err(err) => {
                engine.write_message(&self.name, 0, 0, MessageKind::Error, &err.to_string());
                return 0;
            }
        };

        let mut succeeded = 0;
        for function in &self.subscribers {
            let result = invoke(
                engine,
                &mut session,
                function,
                Receiver::Global,
                params,
                Cleanup::Amortized,
            );
            if result.is_ok() {
                succeeded += 1;
            }
        }
        succeeded
    }
}
