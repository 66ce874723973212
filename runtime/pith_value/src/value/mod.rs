//! Runtime values for the Pith runtime.
//!
//! # Heap Enforcement
//!
//! ```text
//! let s = Value::string("hello");          // OK
//! let t = Value::tuple(vec![Value::Int(1)]); // OK
//! let s = Value::Str(Heap::new(...));       // ERROR: Heap::new is pub(crate)
//! ```
//!
//! # Mutability
//!
//! `None`, `Bool`, `Int`, `Float`, `Str` and `Tuple` are immutable value
//! objects: their type is fixed at creation and they carry no attribute
//! container. `Object` and `Function` payloads own an `AttributeMap`.

mod heap;
mod repr;

use std::fmt;
use std::sync::Arc;

use pith_ir::TypeId;

use crate::errors::ErrorValue;
use crate::function::{BoundMethod, FunctionValue, NativeFunction};
use crate::object::{Mapping, Object, ObjectPayload};

pub use heap::Heap;
pub use repr::{BuiltinNames, Repr, TypeNames};

/// Runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    // Scalars (inline or immutable, no attribute container)
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Heap<str>),
    Tuple(Heap<[Value]>),

    /// Generic object: plain instance, mapping or list.
    Object(Heap<Object>),
    /// A type used as a value (`int`, `KeyError`, user classes).
    Type(TypeId),

    // Callables
    /// User-defined function with a parameter spec.
    Function(Heap<FunctionValue>),
    /// Built-in function implemented by the runtime.
    Native(NativeFunction),
    /// Method bound to its receiver.
    BoundMethod(Heap<BoundMethod>),

    /// A raised error reified as a value.
    Error(Heap<ErrorValue>),
}

// Factory methods (ONLY way to construct heap values)

impl Value {
    /// Create a string value.
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Heap::from_arc(Arc::from(s.as_ref())))
    }

    /// Create a tuple value.
    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Heap::from_arc(Arc::from(items)))
    }

    /// Create an empty mapping (`dict`).
    pub fn dict() -> Self {
        Self::object_with(TypeId::DICT, ObjectPayload::Mapping(Mapping::default()))
    }

    /// Create a mapping from key/value pairs, later keys overwriting earlier ones.
    pub fn dict_from(pairs: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let mapping = Mapping::default();
        for (key, value) in pairs {
            mapping.insert(key, value);
        }
        Self::object_with(TypeId::DICT, ObjectPayload::Mapping(mapping))
    }

    /// Create a list value.
    pub fn list(items: Vec<Value>) -> Self {
        Self::object_with(TypeId::LIST, ObjectPayload::list(items))
    }

    /// Create a plain instance of `type_id` with an empty attribute container.
    pub fn instance(type_id: TypeId) -> Self {
        Self::object_with(type_id, ObjectPayload::Instance)
    }

    /// Create an object of `type_id` with the given payload.
    pub fn object_with(type_id: TypeId, payload: ObjectPayload) -> Self {
        Value::Object(Heap::new(Object::new(type_id, payload)))
    }

    /// Wrap a user function.
    pub fn function(func: FunctionValue) -> Self {
        Value::Function(Heap::new(func))
    }

    /// Bind `method` to `receiver`.
    pub fn bound_method(receiver: Value, method: Value) -> Self {
        Value::BoundMethod(Heap::new(BoundMethod { receiver, method }))
    }

    /// Reify a raised error as a value.
    pub fn error(err: ErrorValue) -> Self {
        Value::Error(Heap::new(err))
    }
}

// Queries

impl Value {
    /// Type of this value, for built-in payloads and objects alike.
    ///
    /// The type of any type object is `type`.
    pub fn type_id(&self) -> TypeId {
        match self {
            Value::None => TypeId::NONE,
            Value::Bool(_) => TypeId::BOOL,
            Value::Int(_) => TypeId::INT,
            Value::Float(_) => TypeId::FLOAT,
            Value::Str(_) => TypeId::STR,
            Value::Tuple(_) => TypeId::TUPLE,
            Value::Object(obj) => obj.type_id(),
            Value::Type(_) => TypeId::TYPE,
            Value::Function(_) => TypeId::FUNCTION,
            Value::Native(_) => TypeId::NATIVE_FUNCTION,
            Value::BoundMethod(_) => TypeId::BOUND_METHOD,
            Value::Error(err) => err.type_id,
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Check if calling this value can succeed without further lookup.
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Function(_) | Value::Native(_) | Value::BoundMethod(_) | Value::Type(_)
        )
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Numeric view, promoting ints to floats.
    #[allow(clippy::cast_precision_loss, reason = "int to float promotion is the language rule")]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            Value::Bool(b) => Some(f64::from(u8::from(*b))),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        self.as_object().and_then(Object::mapping)
    }

    pub fn as_type(&self) -> Option<TypeId> {
        match self {
            Value::Type(ty) => Some(*ty),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorValue> {
        match self {
            Value::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Truthiness used by assertions and conditionals.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Tuple(items) => !items.is_empty(),
            Value::Object(obj) => obj.len().map_or(true, |len| len > 0),
            _ => true,
        }
    }

    /// Repr of this value, naming types through `names`.
    pub fn repr<'a>(&'a self, names: &'a dyn TypeNames) -> Repr<'a> {
        Repr { value: self, names }
    }

    /// Render the value the way `str()` would: strings unquoted, everything
    /// else as its repr.
    pub fn display_string(&self, names: &dyn TypeNames) -> String {
        match self {
            Value::Str(s) => s.to_string(),
            other => other.repr(names).to_string(),
        }
    }
}

impl PartialEq for Value {
    #[allow(clippy::cast_precision_loss, reason = "mixed int/float equality compares as float")]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }
            (Value::Bool(a), Value::Int(b)) | (Value::Int(b), Value::Bool(a)) => {
                i64::from(*a) == *b
            }
            (Value::Str(a), Value::Str(b)) => **a == **b,
            (Value::Tuple(a), Value::Tuple(b)) => **a == **b,
            (Value::Object(a), Value::Object(b)) => Heap::ptr_eq(a, b),
            (Value::Type(a), Value::Type(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Heap::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => a.body == b.body,
            (Value::BoundMethod(a), Value::BoundMethod(b)) => {
                a.receiver == b.receiver && a.method == b.method
            }
            (Value::Error(a), Value::Error(b)) => Heap::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

/// Repr-style rendering with built-in type names only.
///
/// Code that knows user type names renders through `Value::repr` instead.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.repr(&BuiltinNames), f)
    }
}
