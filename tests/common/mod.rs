//! In-memory engine used by the integration tests.
//!
//! `TestEngine` implements the collaborator traits over a reference-counted
//! object table and a registry of closure-bodied functions, and records
//! every call, diagnostic and context round-trip so tests can assert on
//! them.

#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::{Arc, Weak};

use rustc_hash::{FxHashMap, FxHashSet};
use script_dispatch::prelude::*;

/// One bound argument or return slot, as the engine sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot {
    Empty,
    Byte(u8),
    Word(u16),
    Dword(u32),
    Qword(u64),
    Float(f32),
    Double(f64),
    Address(ScriptMemoryLocation),
    Object(RawObject),
}

#[derive(Debug, Clone)]
pub struct CallRecord {
    pub function: String,
    pub args: Vec<Slot>,
    pub instance: Option<RawObject>,
}

/// The frame handed to a test function body.
pub struct CallFrame {
    pub engine: Arc<TestEngine>,
    pub instance: Option<RawObject>,
    pub args: Vec<Slot>,
    pub ret: Slot,
    pub exception: Option<String>,
    /// Simulates a cooperative yield inside the script.
    pub suspend: bool,
}

impl CallFrame {
    pub fn arg_dword(&self, index: usize) -> u32 {
        match self.args[index] {
            Slot::Dword(v) => v,
            other => panic!("arg {index} is not a dword: {other:?}"),
        }
    }

    pub fn arg_qword(&self, index: usize) -> u64 {
        match self.args[index] {
            Slot::Qword(v) => v,
            other => panic!("arg {index} is not a qword: {other:?}"),
        }
    }

    pub fn arg_address(&self, index: usize) -> ScriptMemoryLocation {
        match self.args[index] {
            Slot::Address(addr) => addr,
            other => panic!("arg {index} is not an address: {other:?}"),
        }
    }

    pub fn arg_object(&self, index: usize) -> RawObject {
        match self.args[index] {
            Slot::Object(obj) => obj,
            other => panic!("arg {index} is not an object: {other:?}"),
        }
    }

    pub fn set_return(&mut self, slot: Slot) {
        self.ret = slot;
    }

    pub fn raise(&mut self, message: impl Into<String>) {
        self.exception = Some(message.into());
    }
}

type Body = Box<dyn Fn(&mut CallFrame)>;

pub struct TestFunction {
    name: String,
    module: ModuleId,
    params: Vec<ParamDecl>,
    ret: ParamDecl,
    body: Body,
}

impl ScriptFunction for TestFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn param_count(&self) -> u32 {
        self.params.len() as u32
    }

    fn param(&self, index: u32) -> Option<ParamDecl> {
        self.params.get(index as usize).copied()
    }

    fn return_decl(&self) -> ParamDecl {
        self.ret
    }

    fn module(&self) -> ModuleId {
        self.module
    }
}

pub struct TestTypeInfo {
    id: TypeId,
    name: String,
    namespace: String,
    flags: TypeFlags,
}

impl TypeInfo for TestTypeInfo {
    fn type_id(&self) -> TypeId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn flags(&self) -> TypeFlags {
        self.flags
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HeapObject {
    pub type_id: TypeId,
    pub refs: u32,
}

struct EngineInner {
    types: FxHashMap<TypeId, Arc<TestTypeInfo>>,
    functions: FxHashMap<String, Arc<TestFunction>>,
    heap: FxHashMap<u64, HeapObject>,
    next_object: u64,
    casts: FxHashSet<(TypeId, TypeId)>,
    outstanding_contexts: usize,
    contexts_returned: usize,
    unprepares: usize,
    diagnostics: Diagnostics,
    calls: Vec<CallRecord>,
}

pub struct TestEngine {
    weak: Weak<TestEngine>,
    inner: RefCell<EngineInner>,
}

impl TestEngine {
    pub fn new() -> Arc<TestEngine> {
        Arc::new_cyclic(|weak| TestEngine {
            weak: weak.clone(),
            inner: RefCell::new(EngineInner {
                types: FxHashMap::default(),
                functions: FxHashMap::default(),
                heap: FxHashMap::default(),
                next_object: 1,
                casts: FxHashSet::default(),
                outstanding_contexts: 0,
                contexts_returned: 0,
                unprepares: 0,
                diagnostics: Diagnostics::new(),
                calls: Vec::new(),
            }),
        })
    }

    pub fn register_type(&self, id: TypeId, namespace: &str, name: &str, flags: TypeFlags) {
        self.inner.borrow_mut().types.insert(
            id,
            Arc::new(TestTypeInfo {
                id,
                name: name.to_string(),
                namespace: namespace.to_string(),
                flags,
            }),
        );
    }

    pub fn register_function(
        &self,
        name: &str,
        module: ModuleId,
        params: Vec<ParamDecl>,
        ret: ParamDecl,
        body: impl Fn(&mut CallFrame) + 'static,
    ) -> FunctionRef {
        let function = Arc::new(TestFunction {
            name: name.to_string(),
            module,
            params,
            ret,
            body: Box::new(body),
        });
        self.inner
            .borrow_mut()
            .functions
            .insert(name.to_string(), function.clone());
        function
    }

    pub fn allow_cast(&self, from: TypeId, to: TypeId) {
        self.inner.borrow_mut().casts.insert((from, to));
    }

    /// Allocate a heap object with one reference, owned by the caller.
    pub fn create_object(&self, type_id: TypeId) -> RawObject {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_object;
        inner.next_object += 1;
        inner.heap.insert(id, HeapObject { type_id, refs: 1 });
        RawObject(id)
    }

    pub fn ref_count(&self, object: RawObject) -> Option<u32> {
        self.inner.borrow().heap.get(&object.0).map(|h| h.refs)
    }

    pub fn alive(&self, object: RawObject) -> bool {
        self.inner.borrow().heap.contains_key(&object.0)
    }

    pub fn calls(&self) -> Vec<CallRecord> {
        self.inner.borrow().calls.clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter(|c| c.function == name)
            .count()
    }

    pub fn outstanding_contexts(&self) -> usize {
        self.inner.borrow().outstanding_contexts
    }

    pub fn contexts_returned(&self) -> usize {
        self.inner.borrow().contexts_returned
    }

    pub fn unprepares(&self) -> usize {
        self.inner.borrow().unprepares
    }

    pub fn has_error_diagnostics(&self) -> bool {
        self.inner.borrow().diagnostics.has_errors()
    }

    pub fn diagnostic_count(&self) -> usize {
        self.inner.borrow().diagnostics.len()
    }

    pub fn diagnostic_messages(&self) -> Vec<String> {
        self.inner
            .borrow()
            .diagnostics
            .iter()
            .map(|d| d.to_string())
            .collect()
    }

    fn function_by_name(&self, name: &str) -> Option<Arc<TestFunction>> {
        self.inner.borrow().functions.get(name).cloned()
    }

    fn record_call(&self, function: &str, args: Vec<Slot>, instance: Option<RawObject>) {
        self.inner.borrow_mut().calls.push(CallRecord {
            function: function.to_string(),
            args,
            instance,
        });
    }

    fn note_unprepare(&self) {
        self.inner.borrow_mut().unprepares += 1;
    }
}

impl ScriptEngine for TestEngine {
    fn request_context(&self) -> Option<Box<dyn ExecutionContext>> {
        self.inner.borrow_mut().outstanding_contexts += 1;
        Some(Box::new(TestContext {
            engine: self.weak.clone(),
            prepared: None,
            instance: None,
            slots: Vec::new(),
            ret: Slot::Empty,
            exception: None,
        }))
    }

    fn return_context(&self, _context: Box<dyn ExecutionContext>) {
        let mut inner = self.inner.borrow_mut();
        inner.outstanding_contexts -= 1;
        inner.contexts_returned += 1;
    }

    fn type_info(&self, type_id: TypeId) -> Option<Arc<dyn TypeInfo>> {
        let info = self.inner.borrow().types.get(&type_id).cloned()?;
        Some(info)
    }

    fn find_type(&self, namespace: &str, name: &str) -> Option<TypeId> {
        self.inner
            .borrow()
            .types
            .values()
            .find(|t| t.namespace == namespace && t.name == name)
            .map(|t| t.id)
    }

    fn add_ref(&self, object: RawObject, _type_id: TypeId) {
        if let Some(h) = self.inner.borrow_mut().heap.get_mut(&object.0) {
            h.refs += 1;
        }
    }

    fn release(&self, object: RawObject, _type_id: TypeId) {
        let mut inner = self.inner.borrow_mut();
        let destroyed = match inner.heap.get_mut(&object.0) {
            Some(h) => {
                h.refs -= 1;
                h.refs == 0
            }
            None => false,
        };
        if destroyed {
            inner.heap.remove(&object.0);
        }
    }

    fn try_ref_cast(&self, object: RawObject, from: TypeId, to: TypeId) -> Option<RawObject> {
        let allowed = from == to || self.inner.borrow().casts.contains(&(from, to));
        if !allowed {
            return None;
        }
        self.add_ref(object, to);
        Some(object)
    }

    fn write_message(&self, section: &str, row: u32, col: u32, kind: MessageKind, message: &str) {
        self.inner.borrow_mut().diagnostics.add(Diagnostic {
            kind: kind.into(),
            message: message.to_string(),
            section: Some(section.to_string()),
            row,
            col,
        });
    }
}

struct TestContext {
    engine: Weak<TestEngine>,
    prepared: Option<String>,
    instance: Option<RawObject>,
    slots: Vec<Slot>,
    ret: Slot,
    exception: Option<String>,
}

impl TestContext {
    fn engine(&self) -> Arc<TestEngine> {
        self.engine.upgrade().expect("engine outlives its contexts")
    }

    fn store(&mut self, slot: u32, value: Slot) -> ReturnCode {
        if self.prepared.is_none() {
            return ReturnCode::ContextNotPrepared;
        }
        match self.slots.get_mut(slot as usize) {
            Some(cell) => {
                *cell = value;
                ReturnCode::Success
            }
            None => ReturnCode::InvalidArg,
        }
    }
}

impl ExecutionContext for TestContext {
    fn prepare(&mut self, function: &FunctionRef) -> ReturnCode {
        let engine = self.engine();
        let Some(func) = engine.function_by_name(function.name()) else {
            return ReturnCode::NoFunction;
        };
        self.prepared = Some(function.name().to_string());
        self.instance = None;
        self.slots = vec![Slot::Empty; func.params.len()];
        self.ret = Slot::Empty;
        self.exception = None;
        ReturnCode::Success
    }

    fn unprepare(&mut self) -> ReturnCode {
        self.engine().note_unprepare();
        self.prepared = None;
        self.instance = None;
        self.slots.clear();
        ReturnCode::Success
    }

    fn execute(&mut self) -> ExecutionState {
        let Some(name) = self.prepared.clone() else {
            return ExecutionState::Aborted;
        };
        let engine = self.engine();
        let Some(func) = engine.function_by_name(&name) else {
            return ExecutionState::Aborted;
        };
        engine.record_call(&name, self.slots.clone(), self.instance);
        let mut frame = CallFrame {
            engine: engine.clone(),
            instance: self.instance,
            args: std::mem::take(&mut self.slots),
            ret: Slot::Empty,
            exception: None,
            suspend: false,
        };
        (func.body)(&mut frame);
        self.slots = frame.args;
        self.ret = frame.ret;
        if frame.suspend {
            return ExecutionState::Suspended;
        }
        match frame.exception {
            Some(message) => {
                self.exception = Some(message);
                ExecutionState::Exception
            }
            None => ExecutionState::Finished,
        }
    }

    fn set_object_instance(&mut self, object: RawObject) -> ReturnCode {
        if self.prepared.is_none() {
            return ReturnCode::ContextNotPrepared;
        }
        self.instance = Some(object);
        ReturnCode::Success
    }

    fn set_arg_byte(&mut self, slot: u32, value: u8) -> ReturnCode {
        self.store(slot, Slot::Byte(value))
    }

    fn set_arg_word(&mut self, slot: u32, value: u16) -> ReturnCode {
        self.store(slot, Slot::Word(value))
    }

    fn set_arg_dword(&mut self, slot: u32, value: u32) -> ReturnCode {
        self.store(slot, Slot::Dword(value))
    }

    fn set_arg_qword(&mut self, slot: u32, value: u64) -> ReturnCode {
        self.store(slot, Slot::Qword(value))
    }

    fn set_arg_float(&mut self, slot: u32, value: f32) -> ReturnCode {
        self.store(slot, Slot::Float(value))
    }

    fn set_arg_double(&mut self, slot: u32, value: f64) -> ReturnCode {
        self.store(slot, Slot::Double(value))
    }

    fn set_arg_address(&mut self, slot: u32, address: ScriptMemoryLocation) -> ReturnCode {
        self.store(slot, Slot::Address(address))
    }

    fn set_arg_object(&mut self, slot: u32, object: RawObject) -> ReturnCode {
        self.store(slot, Slot::Object(object))
    }

    fn return_byte(&self) -> u8 {
        match self.ret {
            Slot::Byte(v) => v,
            _ => 0,
        }
    }

    fn return_word(&self) -> u16 {
        match self.ret {
            Slot::Word(v) => v,
            _ => 0,
        }
    }

    fn return_dword(&self) -> u32 {
        match self.ret {
            Slot::Dword(v) => v,
            _ => 0,
        }
    }

    fn return_qword(&self) -> u64 {
        match self.ret {
            Slot::Qword(v) => v,
            _ => 0,
        }
    }

    fn return_float(&self) -> f32 {
        match self.ret {
            Slot::Float(v) => v,
            _ => 0.0,
        }
    }

    fn return_double(&self) -> f64 {
        match self.ret {
            Slot::Double(v) => v,
            _ => 0.0,
        }
    }

    fn return_object(&self) -> RawObject {
        match self.ret {
            Slot::Object(v) => v,
            _ => RawObject::NULL,
        }
    }

    fn return_address(&self) -> ScriptMemoryLocation {
        match self.ret {
            Slot::Address(v) => v,
            _ => ScriptMemoryLocation::null(),
        }
    }

    fn exception_message(&self) -> Option<String> {
        self.exception.clone()
    }
}

/// A variadic call frame with pre-filled arguments, for capture tests.
pub struct TestFrame {
    engine: EngineRef,
    module: ModuleId,
    args: Vec<Option<Variant>>,
    pub returned: Option<Variant>,
}

impl TestFrame {
    pub fn new(engine: EngineRef, module: ModuleId, args: Vec<Option<Variant>>) -> Self {
        TestFrame {
            engine,
            module,
            args,
            returned: None,
        }
    }
}

impl GenericCall for TestFrame {
    fn engine(&self) -> &EngineRef {
        &self.engine
    }

    fn caller_module(&self) -> ModuleId {
        self.module
    }

    fn arg_count(&self) -> u32 {
        self.args.len() as u32
    }

    fn arg_type_id(&self, index: u32) -> Option<TypeId> {
        self.args
            .get(index as usize)?
            .as_ref()
            .map(|v| v.type_id())
    }

    fn arg_value(&self, index: u32) -> Option<Variant> {
        self.args.get(index as usize)?.clone()
    }

    fn set_return(&mut self, value: Variant) {
        self.returned = Some(value);
    }
}

/// Engine handle coerced to the trait object the crate consumes.
pub fn engine_ref(engine: &Arc<TestEngine>) -> EngineRef {
    engine.clone()
}

/// Wrap a freshly created object, adopting the creator's reference.
pub fn owned_handle(engine: &Arc<TestEngine>, object: RawObject, type_id: TypeId) -> ObjectHandle {
    let eref = engine_ref(engine);
    let descriptor =
        TypeDescriptor::from_type_id(&eref, type_id).expect("type registered with the engine");
    ObjectHandle::transferred(eref, object, type_id, descriptor)
}
