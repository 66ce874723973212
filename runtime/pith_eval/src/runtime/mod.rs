//! The `Runtime`: the state an external evaluator drives.
//!
//! # Architecture
//!
//! Function values carry an opaque `BodyId`; the runtime owns the body table
//! and resolves the id when the function is called. User bodies are closures
//! over `(&mut Runtime, &mut Frame)`, natives are plain function pointers
//! over positional arguments.
//!
//! `impl Runtime` is split across modules:
//! - `attributes`: attribute lookup, assignment and deletion
//! - `dispatch`: try regions, raise and assert
//! - this module: definitions, calls and name resolution

mod builder;
mod interned_names;

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;

use pith_ir::{Name, SharedInterner, StringInterner, TypeId};
use pith_value::{
    invalid_signature, native_arity, native_keywords, no_such_attribute, not_callable,
    type_mismatch, undefined_name, unexpected_keyword, BacktraceFrame, BodyId, CallArguments,
    ErrorValue, EvalResult, FunctionValue, Heap, NativeFunction, Parameter, ParameterSpec, TypeNames,
    Value,
};

use crate::call_binder::bind;
use crate::diagnostics::{CallFrame, CallStack};
use crate::dispatch::ExceptionState;
use crate::environment::{Frame, GlobalScope};
use crate::stack::ensure_sufficient_stack;
use crate::type_model::TypeRegistry;

pub use builder::RuntimeBuilder;
pub(crate) use interned_names::ProtocolNames;

/// Body of a user-defined function.
pub type UserBody = Arc<dyn Fn(&mut Runtime, &mut Frame) -> EvalResult + Send + Sync>;

/// Body of a native function. Receives positional arguments only.
pub type NativeBody = fn(&mut Runtime, &[Value]) -> EvalResult;

#[derive(Clone)]
enum Body {
    User(UserBody),
    Native(NativeBody),
}

/// Runtime core: types, globals, built-ins, bodies and the call stack.
///
/// A host that shares one runtime between threads wraps it in a single lock;
/// nothing inside needs finer-grained synchronization.
pub struct Runtime {
    interner: SharedInterner,
    pub(crate) names: ProtocolNames,
    pub(crate) types: TypeRegistry,
    globals: GlobalScope,
    builtins: FxHashMap<Name, Value>,
    bodies: Vec<Body>,
    call_stack: CallStack,
    pub(crate) exceptions: ExceptionState,
}

impl Runtime {
    /// Runtime with default configuration.
    pub fn new() -> Self {
        RuntimeBuilder::new().build()
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    fn from_parts(interner: SharedInterner, call_stack: CallStack) -> Self {
        let names = ProtocolNames::new(&interner);
        let types = TypeRegistry::new(&interner);
        let mut runtime = Runtime {
            interner,
            names,
            types,
            globals: GlobalScope::new(),
            builtins: FxHashMap::default(),
            bodies: Vec::new(),
            call_stack,
            exceptions: ExceptionState::default(),
        };
        crate::builtins::register(&mut runtime);
        runtime
    }

    // Accessors

    #[inline]
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn shared_interner(&self) -> SharedInterner {
        self.interner.clone()
    }

    /// Intern `s` in this runtime's interner.
    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Resolve a name interned in this runtime's interner.
    pub fn resolve(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    #[inline]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    #[inline]
    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    #[inline]
    pub fn globals(&self) -> &GlobalScope {
        &self.globals
    }

    #[inline]
    pub fn call_stack(&self) -> &CallStack {
        &self.call_stack
    }

    #[inline]
    pub fn exceptions(&self) -> &ExceptionState {
        &self.exceptions
    }

    /// Live call stack, most recent call first.
    pub fn backtrace(&self) -> Vec<BacktraceFrame> {
        self.call_stack.capture(&self.interner)
    }

    /// Frame for top-level code sharing this runtime's globals.
    pub fn module_frame(&self) -> Frame {
        Frame::new(Name::EMPTY, self.globals.clone())
    }

    // Types

    #[inline]
    pub fn type_of(&self, value: &Value) -> TypeId {
        self.types.type_of(value)
    }

    #[inline]
    pub fn is_instance(&self, value: &Value, ty: TypeId) -> bool {
        self.types.is_instance(value, ty)
    }

    /// Registered name of `ty`.
    pub fn type_name(&self, ty: TypeId) -> &'static str {
        self.types
            .name_of(ty)
            .map_or("object", |name| self.interner.lookup(name))
    }

    /// Registered name of `value`'s type.
    pub fn value_type_name(&self, value: &Value) -> &'static str {
        self.type_name(self.type_of(value))
    }

    // Built-ins

    /// Built-in bound to `name`, if any.
    pub fn builtin(&self, name: Name) -> Option<Value> {
        self.builtins.get(&name).cloned()
    }

    pub fn set_builtin(&mut self, name: Name, value: Value) {
        self.builtins.insert(name, value);
    }

    /// Resolve `name` in `frame`, then in the built-ins.
    pub fn load_name(&self, frame: &Frame, name: Name) -> EvalResult {
        frame
            .load(name)
            .or_else(|| self.builtin(name))
            .ok_or_else(|| undefined_name(self.resolve(name)))
    }

    // Definitions

    /// Define a user function.
    ///
    /// The parameter list is validated here, at definition time, and any
    /// `with_default` values are captured once and shared by every call.
    pub fn define_function<F>(
        &mut self,
        name: &str,
        params: Vec<Parameter>,
        doc: Option<&str>,
        body: F,
    ) -> EvalResult
    where
        F: Fn(&mut Runtime, &mut Frame) -> EvalResult + Send + Sync + 'static,
    {
        let spec = ParameterSpec::new(params)
            .map_err(|err| invalid_signature(name, err.describe(&*self.interner)))?;
        let body = self.push_body(Body::User(Arc::new(body)));
        let func = FunctionValue::new(self.intern(name), spec, doc.map(str::to_owned), body);
        Ok(Value::function(func))
    }

    /// Define a native function. `arity` counts the receiver for methods.
    pub fn define_native(
        &mut self,
        name: &'static str,
        arity: Option<usize>,
        doc: Option<&'static str>,
        body: NativeBody,
    ) -> Value {
        let body = self.push_body(Body::Native(body));
        Value::Native(NativeFunction {
            name,
            arity,
            doc,
            body,
        })
    }

    /// Register a class and its members.
    ///
    /// A string `__doc__` member becomes the type's documentation; every
    /// other member becomes a capability of the type.
    pub fn define_class(
        &mut self,
        name: &str,
        parent: Option<TypeId>,
        members: impl IntoIterator<Item = (Name, Value)>,
    ) -> TypeId {
        let ty = self
            .types
            .register(self.interner.intern(name), parent.unwrap_or(TypeId::OBJECT));
        for (member, value) in members {
            match value.as_str() {
                Some(doc) if member == self.names.doc => self.types.set_doc(ty, doc),
                _ => self.types.register_capability(ty, member, value),
            }
        }
        ty
    }

    fn push_body(&mut self, body: Body) -> BodyId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "body count is bounded by u32 definitions"
        )]
        let id = BodyId::new(self.bodies.len() as u32);
        self.bodies.push(body);
        id
    }

    /// Repr of `value`, naming user types by their registered names.
    pub fn repr(&self, value: &Value) -> String {
        value.repr(self).to_string()
    }

    /// Documentation attached to a callable or type, verbatim.
    pub fn help(&self, value: &Value) -> Option<String> {
        match value {
            Value::Function(func) => func.doc().map(str::to_owned),
            Value::Native(native) => native.doc.map(str::to_owned),
            Value::BoundMethod(bm) => self.help(&bm.method),
            Value::Type(ty) => self.types.doc_of(*ty).map(str::to_owned),
            _ => None,
        }
    }

    // Calls

    /// Call `callable` with fully evaluated arguments.
    #[tracing::instrument(level = "trace", skip_all, fields(callee = %self.value_type_name(callable)))]
    pub fn call(&mut self, callable: &Value, args: CallArguments) -> EvalResult {
        match callable {
            Value::Function(func) => self.call_function(func, args),
            Value::Native(native) => self.call_native(*native, args),
            Value::BoundMethod(bm) => {
                let args = args.with_receiver(bm.receiver.clone());
                self.call(&bm.method, args)
            }
            Value::Type(ty) => self.construct(*ty, args),
            other => Err(not_callable(self.value_type_name(other))),
        }
    }

    /// Look up `name` on `receiver` and call the result.
    pub fn call_method(&mut self, receiver: &Value, name: Name, args: CallArguments) -> EvalResult {
        let method = self.get_attr(receiver, name)?;
        self.call(&method, args)
    }

    /// Resolve `name` on the type of the first argument and call it unbound
    /// with all of `args`.
    pub fn fast_call(&mut self, name: Name, args: Vec<Value>) -> EvalResult {
        let Some(first) = args.first() else {
            return Err(native_arity(self.resolve(name), 1, 0));
        };
        let ty = self.type_of(first);
        let method = self
            .types
            .resolve_method(ty, name)
            .ok_or_else(|| no_such_attribute(self.type_name(ty), self.resolve(name)))?;
        self.call(&method, CallArguments::positional(args))
    }

    fn call_function(&mut self, func: &Heap<FunctionValue>, args: CallArguments) -> EvalResult {
        let name = func.name();
        self.call_stack.push(CallFrame::new(name))?;
        let result = ensure_sufficient_stack(|| self.run_function(func, args));
        self.call_stack.pop();
        result.map_err(|err| err.with_frame(self.resolve(name)))
    }

    fn run_function(&mut self, func: &FunctionValue, args: CallArguments) -> EvalResult {
        let bound = bind(&self.interner, func.name(), func.spec(), args)?;
        let body = match self.bodies.get(func.body().index()) {
            Some(Body::User(body)) => Arc::clone(body),
            _ => return Err(not_callable("function")),
        };
        let mut frame = Frame::with_arguments(func.name(), self.globals.clone(), bound);
        trace!(function = self.resolve(func.name()), "enter");
        body(self, &mut frame)
    }

    fn call_native(&mut self, native: NativeFunction, args: CallArguments) -> EvalResult {
        if args.has_keywords() {
            return Err(native_keywords(native.name));
        }
        if let Some(expected) = native.arity {
            if args.positional.len() != expected {
                return Err(native_arity(native.name, expected, args.positional.len()));
            }
        }
        let body = match self.bodies.get(native.body.index()) {
            Some(Body::Native(body)) => *body,
            _ => return Err(not_callable("native_function")),
        };
        body(self, &args.positional)
    }

    /// Calling a type constructs an instance of it.
    fn construct(&mut self, ty: TypeId, args: CallArguments) -> EvalResult {
        let type_name = self.type_name(ty);
        if self.types.is_subtype(ty, TypeId::EXCEPTION) {
            let CallArguments {
                mut positional,
                keywords,
            } = args;
            if let Some((keyword, _)) = keywords.first() {
                return Err(unexpected_keyword(type_name, self.resolve(*keyword)));
            }
            let payload = match positional.len() {
                0 => Value::None,
                1 => positional.remove(0),
                _ => Value::tuple(positional),
            };
            return Ok(Value::error(ErrorValue::raised(ty, payload, self)));
        }

        if ty.is_builtin() {
            if args.has_keywords() {
                return Err(native_keywords(type_name));
            }
            return self.construct_builtin(ty, type_name, &args.positional);
        }

        let instance = Value::instance(ty);
        if let Some(init) = self.types.resolve_method(ty, self.names.init) {
            let init = Value::bound_method(instance.clone(), init);
            self.call(&init, args)?;
        }
        Ok(instance)
    }

    fn construct_builtin(&self, ty: TypeId, type_name: &str, args: &[Value]) -> EvalResult {
        let arg = match args {
            [] => None,
            [arg] => Some(arg),
            _ => return Err(native_arity(type_name, 1, args.len())),
        };
        let mismatch = |value: &Value| type_mismatch(type_name, self.value_type_name(value));
        match (ty, arg) {
            (TypeId::TYPE, Some(value)) => Ok(Value::Type(self.type_of(value))),
            (TypeId::TYPE, None) => Err(native_arity(type_name, 1, 0)),
            (TypeId::OBJECT, None) => Ok(Value::instance(TypeId::OBJECT)),
            (TypeId::NONE, None) => Ok(Value::None),
            (TypeId::BOOL, None) => Ok(Value::Bool(false)),
            (TypeId::BOOL, Some(value)) => Ok(Value::Bool(value.is_truthy())),
            (TypeId::INT, None) => Ok(Value::Int(0)),
            (TypeId::INT, Some(Value::Float(x))) => Ok(Value::Int(truncate_float(*x))),
            (TypeId::INT, Some(value)) => value.as_int().map(Value::Int).ok_or_else(|| mismatch(value)),
            (TypeId::FLOAT, None) => Ok(Value::Float(0.0)),
            (TypeId::FLOAT, Some(value)) => {
                value.as_float().map(Value::Float).ok_or_else(|| mismatch(value))
            }
            (TypeId::STR, None) => Ok(Value::string("")),
            (TypeId::STR, Some(value)) => Ok(Value::string(value.display_string(self))),
            (TypeId::TUPLE | TypeId::LIST, None) => Ok(empty_sequence(ty)),
            (TypeId::TUPLE | TypeId::LIST, Some(value)) => {
                let items = sequence_items(value).ok_or_else(|| mismatch(value))?;
                Ok(if ty == TypeId::TUPLE {
                    Value::tuple(items)
                } else {
                    Value::list(items)
                })
            }
            (TypeId::DICT, None) => Ok(Value::dict()),
            (TypeId::DICT, Some(value)) => {
                let entries = value.as_mapping().ok_or_else(|| mismatch(value))?.entries();
                Ok(Value::dict_from(entries))
            }
            (_, Some(_)) if ty == TypeId::OBJECT || ty == TypeId::NONE => {
                Err(native_arity(type_name, 0, 1))
            }
            _ => Err(not_callable(type_name)),
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "float to int conversion truncates toward zero and saturates"
)]
fn truncate_float(x: f64) -> i64 {
    x.trunc() as i64
}

fn empty_sequence(ty: TypeId) -> Value {
    if ty == TypeId::TUPLE {
        Value::tuple(Vec::new())
    } else {
        Value::list(Vec::new())
    }
}

/// Items of a tuple or list.
pub(crate) fn sequence_items(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Tuple(items) => Some(items.to_vec()),
        Value::Object(obj) => obj.list_snapshot(),
        _ => None,
    }
}

impl TypeNames for Runtime {
    fn registered_name(&self, ty: TypeId) -> Option<&str> {
        self.types.name_of(ty).map(|name| self.resolve(name))
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("types", &self.types.len())
            .field("globals", &self.globals)
            .field("builtins", &self.builtins.len())
            .field("bodies", &self.bodies.len())
            .field("call_depth", &self.call_stack.depth())
            .finish_non_exhaustive()
    }
}
