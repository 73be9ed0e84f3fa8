//! Time-based invocation scheduler.
//!
//! The scheduler owns a list of pending invocations (function, captured
//! argument snapshot, timing policy) and advances them against a virtual
//! clock supplied by the host. Due entries are executed through the call
//! executor; repeating entries are kept with their due time advanced
//! relative to their *own* previous due time, so a late tick does not
//! compound drift.
//!
//! A scheduled callback may call back into the scheduler that is currently
//! running it: self-cancellation is deferred until the entry's step
//! completes, entries scheduled mid-pass are parked on a side list and
//! merged after the pass, and module-wide bulk removal is a teardown-only
//! operation that must never run from inside [`Scheduler::think`].

use std::cell::RefCell;
use std::fmt;
use std::mem;

use crate::callfunc::{ScriptParam, call_function, capture_parameter_list};
use crate::core::engine::{EngineRef, FunctionRef, GenericCall, ScriptFunction};
use crate::error::{DispatchError, ScheduleError};
use crate::types::ModuleId;

/// Repeat-count sentinel: run until explicitly cleared.
pub const REPEAT_FOREVER: i32 = -1;

/// Opaque identifier for a scheduled entry, used for cancellation.
///
/// Ids are issued monotonically and wrap from `u32::MAX` back to 1; zero is
/// reserved as the invalid id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u32);

impl TimerId {
    pub const INVALID: TimerId = TimerId(0);

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

struct Entry {
    id: TimerId,
    function: FunctionRef,
    module: ModuleId,
    params: Vec<ScriptParam>,
    execution_time: f64,
    repeat_interval: f64,
    remaining_repeats: i32,
    removed: bool,
}

struct SchedulerState {
    entries: Vec<Entry>,
    /// Entries scheduled while a pass is running; merged in afterwards so
    /// the running pass never visits them.
    incoming: Vec<Entry>,
    next_id: u32,
    now: f64,
    thinking: bool,
    executing: TimerId,
}

impl SchedulerState {
    fn new() -> Self {
        SchedulerState {
            entries: Vec::new(),
            incoming: Vec::new(),
            next_id: 1,
            now: 0.0,
            thinking: false,
            executing: TimerId::INVALID,
        }
    }

    fn issue_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = if self.next_id == u32::MAX {
            1
        } else {
            self.next_id + 1
        };
        id
    }
}

/// Owner of all pending scheduled invocations for one engine.
pub struct Scheduler {
    engine: EngineRef,
    state: RefCell<SchedulerState>,
}

impl Scheduler {
    pub fn new(engine: EngineRef) -> Self {
        Scheduler {
            engine,
            state: RefCell::new(SchedulerState::new()),
        }
    }

    /// Insert a new scheduled invocation.
    ///
    /// `delay` is relative to the scheduler's current virtual time.
    /// `repeat_count` is a positive count or [`REPEAT_FOREVER`]. The target
    /// must belong to the caller's own module; cross-module scheduling is
    /// rejected to bound lifetime coupling between modules.
    pub fn schedule(
        &self,
        caller: ModuleId,
        function: FunctionRef,
        params: Vec<ScriptParam>,
        delay: f64,
        repeat_interval: f64,
        repeat_count: i32,
    ) -> Result<TimerId, ScheduleError> {
        if repeat_interval < 0.0 {
            return Err(ScheduleError::NegativeInterval);
        }
        if repeat_count == 0 || repeat_count < REPEAT_FOREVER {
            return Err(ScheduleError::InvalidRepeatCount(repeat_count));
        }
        let declared = function.param_count();
        if params.len() as u32 != declared {
            return Err(ScheduleError::ArityMismatch {
                function: function.name().to_string(),
                declared,
                supplied: params.len() as u32,
            });
        }
        let module = function.module();
        if module != caller {
            return Err(ScheduleError::CrossModule {
                function: function.name().to_string(),
            });
        }

        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let id = state.issue_id();
        let entry = Entry {
            id,
            function,
            module,
            params,
            execution_time: state.now + delay,
            repeat_interval,
            remaining_repeats: repeat_count,
            removed: false,
        };
        if state.thinking {
            state.incoming.push(entry);
        } else {
            state.entries.push(entry);
        }
        Ok(id)
    }

    /// Schedule with arguments captured from a variadic call frame,
    /// starting at `arg_start`.
    pub fn schedule_from(
        &self,
        frame: &dyn GenericCall,
        arg_start: u32,
        function: FunctionRef,
        delay: f64,
        repeat_interval: f64,
        repeat_count: i32,
    ) -> Result<TimerId, DispatchError> {
        let params = capture_parameter_list(frame, arg_start)?;
        let id = self.schedule(
            frame.caller_module(),
            function,
            params,
            delay,
            repeat_interval,
            repeat_count,
        )?;
        Ok(id)
    }

    /// Advance the schedule to `now`, executing every due entry once.
    ///
    /// Entries are visited in insertion order; an entry whose callee fails
    /// still receives its normal repeat bookkeeping, so a misbehaving script
    /// cannot wedge the schedule. Time is host-supplied and monotonically
    /// non-decreasing; the scheduler never reads a wall clock.
    pub fn think(&self, now: f64) {
        {
            let mut state = self.state.borrow_mut();
            assert!(!state.thinking, "Think must not be re-entered");
            state.thinking = true;
            state.now = now;
        }

        let count = self.state.borrow().entries.len();
        for index in 0..count {
            let due = {
                let mut state = self.state.borrow_mut();
                let entry = &state.entries[index];
                if entry.removed || entry.execution_time > now {
                    None
                } else {
                    let job = (entry.function.clone(), entry.params.clone());
                    let id = entry.id;
                    state.executing = id;
                    Some(job)
                }
            };

            let Some((function, mut params)) = due else {
                continue;
            };

            // The state borrow is released across the call so the callee can
            // re-enter schedule / clear_timer. Failures have already been
            // reported through the diagnostic channel.
            let _ = call_function(&self.engine, &function, &mut params);

            let mut state = self.state.borrow_mut();
            state.executing = TimerId::INVALID;
            let entry = &mut state.entries[index];
            if entry.removed {
                continue;
            }
            if entry.remaining_repeats != REPEAT_FOREVER {
                entry.remaining_repeats -= 1;
                if entry.remaining_repeats == 0 {
                    entry.removed = true;
                }
            }
            if !entry.removed {
                entry.execution_time += entry.repeat_interval;
            }
        }

        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let incoming = mem::take(&mut state.incoming);
        state.entries.extend(incoming);
        state.entries.retain(|e| !e.removed);
        state.thinking = false;
    }

    /// Cancel a scheduled entry. Clearing an id twice, or an id that never
    /// existed, is a no-op.
    ///
    /// When the id belongs to the entry currently executing, removal is
    /// deferred until that entry's step completes; the entry is gone once
    /// the surrounding [`Scheduler::think`] pass returns.
    pub fn clear_timer(&self, id: TimerId) -> bool {
        if !id.is_valid() {
            return false;
        }
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if state.thinking {
            // Mid-pass, removal defers to the end-of-pass compaction; the
            // mark also keeps a not-yet-visited sibling from running.
            match state
                .entries
                .iter_mut()
                .chain(state.incoming.iter_mut())
                .find(|e| e.id == id && !e.removed)
            {
                Some(entry) => {
                    entry.removed = true;
                    true
                }
                None => false,
            }
        } else {
            let before = state.entries.len();
            state.entries.retain(|e| e.id != id);
            state.entries.len() != before
        }
    }

    /// Remove every pending entry whose target belongs to `module`.
    ///
    /// This is the module teardown hook. It must not be called while a
    /// [`Scheduler::think`] pass is running.
    pub fn remove_functions_of_module(&self, module: ModuleId) {
        let mut guard = self.state.borrow_mut();
        assert!(
            !guard.thinking,
            "RemoveFunctionsOfModule must not run during Think"
        );
        let state = &mut *guard;
        state.entries.retain(|e| e.module != module);
        state.incoming.retain(|e| e.module != module);
    }

    /// Number of live pending entries.
    pub fn pending_count(&self) -> usize {
        let state = self.state.borrow();
        state.entries.iter().filter(|e| !e.removed).count()
            + state.incoming.iter().filter(|e| !e.removed).count()
    }

    /// Earliest due time among pending entries, for host tick sizing.
    pub fn next_due_time(&self) -> Option<f64> {
        let state = self.state.borrow();
        state
            .entries
            .iter()
            .chain(state.incoming.iter())
            .filter(|e| !e.removed)
            .map(|e| e.execution_time)
            .min_by(|a, b| a.total_cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_ids_skip_the_invalid_value_on_wrap() {
        let mut state = SchedulerState::new();
        assert_eq!(state.issue_id(), TimerId(1));
        assert_eq!(state.issue_id(), TimerId(2));

        state.next_id = u32::MAX;
        assert_eq!(state.issue_id(), TimerId(u32::MAX));
        assert_eq!(state.issue_id(), TimerId(1));
    }

    #[test]
    fn invalid_id_properties() {
        assert!(!TimerId::INVALID.is_valid());
        assert_eq!(TimerId::INVALID.raw(), 0);
        assert!(TimerId(1).is_valid());
        assert_eq!(TimerId(7).to_string(), "timer#7");
    }
}
