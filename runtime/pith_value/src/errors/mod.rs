//! Error types for the Pith runtime.
//!
//! `ErrorValue` is both the Rust error returned by every fallible runtime
//! operation and the value a script sees when it catches an exception. The
//! `type_id` decides which catch clauses match; `kind` records the structured
//! cause for hosts that want to switch on it instead of parsing messages.
//!
//! # Factory Functions
//!
//! Errors are built by `#[cold]` factory functions (`missing_argument()`,
//! `key_not_found()`, ...) which fill in `kind`, `message`, `payload` and the
//! default type together.

use std::fmt;

use pith_ir::TypeId;

use crate::value::{TypeNames, Value};

/// Result of evaluation.
pub type EvalResult = Result<Value, ErrorValue>;

/// Structured error category.
///
/// The `Display` impl produces the message stored on the `ErrorValue`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    // Binding
    TooManyPositional {
        function: String,
        expected: usize,
        got: usize,
    },
    MissingArgument {
        function: String,
        parameter: String,
    },
    UnexpectedKeyword {
        function: String,
        keyword: String,
    },
    MultipleValues {
        function: String,
        parameter: String,
    },
    RepeatedKeyword {
        function: String,
        keyword: String,
    },
    InvalidSignature {
        function: String,
        reason: String,
    },

    // Attributes
    NoSuchAttribute {
        type_name: String,
        attribute: String,
    },
    CannotSetAttribute {
        type_name: String,
    },
    CannotDeleteAttribute {
        type_name: String,
        attribute: String,
    },

    // Lookup
    KeyNotFound {
        key: String,
    },
    IndexOutOfRange {
        index: i64,
        len: usize,
    },

    // Calls
    NotCallable {
        type_name: String,
    },
    NativeArity {
        name: String,
        expected: usize,
        got: usize,
    },
    NativeKeywords {
        name: String,
    },
    RecursionLimit {
        depth: usize,
    },

    // Miscellaneous
    AssertionFailed {
        message: Option<String>,
    },
    UndefinedName {
        name: String,
    },
    TypeMismatch {
        expected: String,
        got: String,
    },
    ArithmeticOverflow {
        operation: String,
    },
    NoActiveException,
    Stream {
        message: String,
    },
    /// Explicit raise by script code; the message is rendered from the payload.
    Raised {
        message: String,
    },
}

impl ErrorKind {
    /// Type an error of this kind is raised as.
    ///
    /// `Raised` errors carry their own type; `EXCEPTION` is returned for them.
    pub fn default_type(&self) -> TypeId {
        match self {
            Self::TooManyPositional { .. }
            | Self::MissingArgument { .. }
            | Self::UnexpectedKeyword { .. }
            | Self::MultipleValues { .. }
            | Self::RepeatedKeyword { .. }
            | Self::InvalidSignature { .. }
            | Self::CannotSetAttribute { .. }
            | Self::CannotDeleteAttribute { .. }
            | Self::NotCallable { .. }
            | Self::NativeArity { .. }
            | Self::NativeKeywords { .. }
            | Self::TypeMismatch { .. } => TypeId::TYPE_ERROR,
            Self::NoSuchAttribute { .. } => TypeId::ATTRIBUTE_ERROR,
            Self::KeyNotFound { .. } => TypeId::KEY_ERROR,
            Self::IndexOutOfRange { .. } => TypeId::INDEX_ERROR,
            Self::RecursionLimit { .. } => TypeId::RECURSION_ERROR,
            Self::AssertionFailed { .. } => TypeId::ASSERTION_ERROR,
            Self::UndefinedName { .. } => TypeId::NAME_ERROR,
            Self::ArithmeticOverflow { .. } => TypeId::VALUE_ERROR,
            Self::NoActiveException => TypeId::RUNTIME_ERROR,
            Self::Stream { .. } => TypeId::IO_ERROR,
            Self::Raised { .. } => TypeId::EXCEPTION,
        }
    }

    /// Call-site/parameter-spec mismatch.
    pub fn is_binding_error(&self) -> bool {
        matches!(
            self,
            Self::TooManyPositional { .. }
                | Self::MissingArgument { .. }
                | Self::UnexpectedKeyword { .. }
                | Self::MultipleValues { .. }
                | Self::RepeatedKeyword { .. }
                | Self::InvalidSignature { .. }
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Binding
            Self::TooManyPositional {
                function,
                expected,
                got,
            } => {
                let arg_word = if *expected == 1 {
                    "argument"
                } else {
                    "arguments"
                };
                let verb = if *got == 1 { "was" } else { "were" };
                write!(
                    f,
                    "{function}() takes {expected} positional {arg_word} but {got} {verb} given"
                )
            }
            Self::MissingArgument {
                function,
                parameter,
            } => write!(f, "{function}() missing required argument '{parameter}'"),
            Self::UnexpectedKeyword { function, keyword } => {
                write!(f, "{function}() got an unexpected keyword argument '{keyword}'")
            }
            Self::MultipleValues {
                function,
                parameter,
            } => write!(f, "{function}() got multiple values for argument '{parameter}'"),
            Self::RepeatedKeyword { function, keyword } => {
                write!(f, "{function}() keyword argument repeated: '{keyword}'")
            }
            Self::InvalidSignature { function, reason } => {
                write!(f, "invalid signature for {function}(): {reason}")
            }

            // Attributes
            Self::NoSuchAttribute {
                type_name,
                attribute,
            } => write!(f, "type '{type_name}' has no attribute '{attribute}'"),
            Self::CannotSetAttribute { .. } => write!(f, "cannot set attribute"),
            Self::CannotDeleteAttribute {
                type_name,
                attribute,
            } => write!(f, "cannot delete attribute '{attribute}' of '{type_name}'"),

            // Lookup
            Self::KeyNotFound { key } => write!(f, "{key}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }

            // Calls
            Self::NotCallable { type_name } => write!(f, "'{type_name}' object is not callable"),
            Self::NativeArity { expected, got, .. } => {
                write!(f, "expected {expected} arguments, but got {got}")
            }
            Self::NativeKeywords { .. } => {
                write!(f, "native_function does not accept keyword arguments")
            }
            Self::RecursionLimit { .. } => write!(f, "maximum recursion depth exceeded"),

            // Miscellaneous
            Self::AssertionFailed { message } => write!(f, "{}", message.as_deref().unwrap_or("")),
            Self::UndefinedName { name } => write!(f, "name '{name}' is not defined"),
            Self::TypeMismatch { expected, got } => {
                write!(f, "expected '{expected}', but got '{got}'")
            }
            Self::ArithmeticOverflow { operation } => {
                write!(f, "integer overflow in {operation}")
            }
            Self::NoActiveException => write!(f, "no active exception to reraise"),
            Self::Stream { message } | Self::Raised { message } => write!(f, "{message}"),
        }
    }
}

/// A single frame in an error backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// Function or method name.
    pub name: String,
}

/// A raised error.
#[derive(Clone, Debug)]
pub struct ErrorValue {
    /// Type used for catch-clause matching.
    pub type_id: TypeId,
    pub kind: ErrorKind,
    /// Human-readable message; equals `kind.to_string()`.
    pub message: String,
    /// Value attached at raise time: the missing key for `KeyError`, the
    /// optional message of an assertion, the argument of an explicit raise.
    pub payload: Value,
    /// Functions the error left, innermost first.
    pub backtrace: Vec<BacktraceFrame>,
}

impl ErrorValue {
    /// Create an error of an explicit type.
    pub fn new(type_id: TypeId, kind: ErrorKind, payload: Value) -> Self {
        let message = kind.to_string();
        ErrorValue {
            type_id,
            kind,
            message,
            payload,
            backtrace: Vec::new(),
        }
    }

    /// Create an error with the kind's default type; the payload is the message.
    pub fn from_kind(kind: ErrorKind) -> Self {
        let message = kind.to_string();
        ErrorValue {
            type_id: kind.default_type(),
            payload: Value::string(&message),
            kind,
            message,
            backtrace: Vec::new(),
        }
    }

    /// Explicit raise of `type_id` with an arbitrary payload.
    ///
    /// Strings become the message unquoted, `None` an empty message, anything
    /// else its repr with types named through `names`.
    pub fn raised(type_id: TypeId, payload: Value, names: &dyn TypeNames) -> Self {
        let message = match &payload {
            Value::None => String::new(),
            other => other.display_string(names),
        };
        Self::new(type_id, ErrorKind::Raised { message }, payload)
    }

    /// Record that the error left the function `name`.
    #[must_use]
    pub fn with_frame(mut self, name: impl Into<String>) -> Self {
        self.backtrace.push(BacktraceFrame { name: name.into() });
        self
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    #[inline]
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    #[inline]
    pub fn backtrace(&self) -> &[BacktraceFrame] {
        &self.backtrace
    }

    #[inline]
    pub fn is_binding_error(&self) -> bool {
        self.kind.is_binding_error()
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ErrorValue {}

impl From<std::io::Error> for ErrorValue {
    fn from(err: std::io::Error) -> Self {
        stream_error(err.to_string())
    }
}

// Binding errors

#[cold]
pub fn too_many_positional(function: &str, expected: usize, got: usize) -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::TooManyPositional {
        function: function.to_string(),
        expected,
        got,
    })
}

#[cold]
pub fn missing_argument(function: &str, parameter: &str) -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::MissingArgument {
        function: function.to_string(),
        parameter: parameter.to_string(),
    })
}

#[cold]
pub fn unexpected_keyword(function: &str, keyword: &str) -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::UnexpectedKeyword {
        function: function.to_string(),
        keyword: keyword.to_string(),
    })
}

#[cold]
pub fn multiple_values(function: &str, parameter: &str) -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::MultipleValues {
        function: function.to_string(),
        parameter: parameter.to_string(),
    })
}

#[cold]
pub fn repeated_keyword(function: &str, keyword: &str) -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::RepeatedKeyword {
        function: function.to_string(),
        keyword: keyword.to_string(),
    })
}

#[cold]
pub fn invalid_signature(function: &str, reason: impl Into<String>) -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::InvalidSignature {
        function: function.to_string(),
        reason: reason.into(),
    })
}

// Attribute errors

#[cold]
pub fn no_such_attribute(type_name: &str, attribute: &str) -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::NoSuchAttribute {
        type_name: type_name.to_string(),
        attribute: attribute.to_string(),
    })
}

#[cold]
pub fn cannot_set_attribute(type_name: &str) -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::CannotSetAttribute {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn cannot_delete_attribute(type_name: &str, attribute: &str) -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::CannotDeleteAttribute {
        type_name: type_name.to_string(),
        attribute: attribute.to_string(),
    })
}

// Lookup errors

/// Missing mapping key. The key itself is the payload.
#[cold]
pub fn key_not_found(key: Value, names: &dyn TypeNames) -> ErrorValue {
    let kind = ErrorKind::KeyNotFound {
        key: key.repr(names).to_string(),
    };
    ErrorValue::new(TypeId::KEY_ERROR, kind, key)
}

#[cold]
pub fn index_out_of_range(index: i64, len: usize) -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::IndexOutOfRange { index, len })
}

// Call errors

#[cold]
pub fn not_callable(type_name: &str) -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::NotCallable {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn native_arity(name: &str, expected: usize, got: usize) -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::NativeArity {
        name: name.to_string(),
        expected,
        got,
    })
}

#[cold]
pub fn native_keywords(name: &str) -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::NativeKeywords {
        name: name.to_string(),
    })
}

#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::RecursionLimit { depth })
}

// Miscellaneous

/// Failed assertion. The optional message becomes the payload unchanged.
#[cold]
pub fn assertion_failed(message: Option<Value>, names: &dyn TypeNames) -> ErrorValue {
    let kind = ErrorKind::AssertionFailed {
        message: message.as_ref().map(|m| m.display_string(names)),
    };
    ErrorValue::new(TypeId::ASSERTION_ERROR, kind, message.unwrap_or(Value::None))
}

#[cold]
pub fn undefined_name(name: &str) -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::UndefinedName {
        name: name.to_string(),
    })
}

#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

#[cold]
pub fn arithmetic_overflow(operation: &str) -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::ArithmeticOverflow {
        operation: operation.to_string(),
    })
}

#[cold]
pub fn no_active_exception() -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::NoActiveException)
}

#[cold]
pub fn stream_error(message: impl Into<String>) -> ErrorValue {
    ErrorValue::from_kind(ErrorKind::Stream {
        message: message.into(),
    })
}
