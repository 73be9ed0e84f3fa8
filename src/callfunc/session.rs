//! Scoped acquisition of an execution context.

use crate::core::engine::{EngineRef, ExecutionContext, ScriptEngine};
use crate::error::InvocationError;

/// Binds one pooled execution context to a scope of calls.
///
/// The context is requested from the engine when the session begins and is
/// returned on every exit path, including early-return failure; if a call
/// left the context prepared, it is unprepared before it goes back to the
/// pool. Dispatchers that run many functions against one context keep a
/// single session alive across the batch to amortize that cleanup.
pub struct CallSession {
    engine: EngineRef,
    context: Option<Box<dyn ExecutionContext>>,
    prepared: bool,
}

impl CallSession {
    pub fn begin(engine: &EngineRef) -> Result<Self, InvocationError> {
        let context = engine
            .request_context()
            .ok_or(InvocationError::ContextUnavailable)?;
        Ok(CallSession {
            engine: engine.clone(),
            context: Some(context),
            prepared: false,
        })
    }

    pub fn context(&mut self) -> &mut dyn ExecutionContext {
        self.context
            .as_mut()
            .expect("context is held until the session drops")
            .as_mut()
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub(crate) fn set_prepared(&mut self, prepared: bool) {
        self.prepared = prepared;
    }
}

impl Drop for CallSession {
    fn drop(&mut self) {
        if let Some(mut context) = self.context.take() {
            if self.prepared {
                let _ = context.unprepare();
            }
            self.engine.return_context(context);
        }
    }
}
