//! Pith Value - runtime values for the Pith runtime core.
//!
//! This crate provides:
//! - Runtime value types (`Value`, `Heap`, `Object`, `FunctionValue`, ...)
//! - Function signatures (`ParameterSpec`) and call-site argument lists
//! - The raised-error value (`ErrorValue`) and its structured `ErrorKind`
//!
//! # Value Types
//!
//! All heap allocations go through `Value::` factory methods; `Heap<T>` has a
//! crate-private constructor. Scalars are immutable. Objects and functions
//! own an `AttributeMap` so attributes can be created after construction.

mod errors;
mod function;
mod object;
mod value;

pub use errors::{
    BacktraceFrame, ErrorKind, ErrorValue, EvalResult,
    // Binding errors
    invalid_signature, missing_argument, multiple_values, repeated_keyword, too_many_positional,
    unexpected_keyword,
    // Attribute errors
    cannot_delete_attribute, cannot_set_attribute, no_such_attribute,
    // Lookup errors
    index_out_of_range, key_not_found,
    // Call errors
    native_arity, native_keywords, not_callable, recursion_limit_exceeded,
    // Miscellaneous
    arithmetic_overflow, assertion_failed, no_active_exception, stream_error, type_mismatch,
    undefined_name,
};
pub use function::{
    BodyId, BoundArguments, BoundMethod, CallArguments, DefaultFactory, DefaultValue,
    FunctionValue, NativeFunction, ParamKind, Parameter, ParameterSpec, SpecError,
};
pub use object::{AttributeMap, Mapping, Object, ObjectPayload};
pub use value::{BuiltinNames, Heap, Repr, TypeNames, Value};

pub use pith_ir::{Name, StringLookup, TypeId};
