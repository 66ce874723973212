//! Exception dispatch: catch-clause selection and try-region state.
//!
//! Clauses are tried strictly in source order and the first match wins. A
//! typed clause matches when the raised error's type is the filter type or
//! derives from it. A clause whose filter name could not be resolved never
//! matches; the error simply moves on to the next clause.
//!
//! A try region moves through these states:
//!
//! ```text
//! Armed --raise--> Matching --clause--> Handling --ok--> Resolved
//!   |                  |                    |
//!   | body ok          | no clause          | handler raised
//!   v                  v                    v
//! Resolved        Propagating          Propagating
//! ```

use smallvec::SmallVec;
use tracing::trace;

use pith_ir::{Name, TypeId};
use pith_value::{
    assertion_failed, no_active_exception, type_mismatch, ErrorValue, EvalResult, Value,
};

use crate::runtime::Runtime;
use crate::type_model::TypeRegistry;

/// Which errors a catch clause accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClauseFilter {
    /// Any of these types or their subtypes.
    Types(SmallVec<[TypeId; 2]>),
    /// A filter name that did not resolve to a type. Never matches.
    Unresolved(Name),
    /// Catch-all.
    Bare,
}

/// One `except` clause of a try region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatchClause {
    filter: ClauseFilter,
}

impl CatchClause {
    pub fn typed(ty: TypeId) -> Self {
        Self::any_of([ty])
    }

    /// Tuple filter: matches if any listed type matches.
    pub fn any_of(types: impl IntoIterator<Item = TypeId>) -> Self {
        CatchClause {
            filter: ClauseFilter::Types(types.into_iter().collect()),
        }
    }

    pub fn unresolved(name: Name) -> Self {
        CatchClause {
            filter: ClauseFilter::Unresolved(name),
        }
    }

    pub fn bare() -> Self {
        CatchClause {
            filter: ClauseFilter::Bare,
        }
    }

    #[inline]
    pub fn filter(&self) -> &ClauseFilter {
        &self.filter
    }

    #[inline]
    pub fn is_bare(&self) -> bool {
        matches!(self.filter, ClauseFilter::Bare)
    }

    pub fn matches(&self, types: &TypeRegistry, error: &ErrorValue) -> bool {
        match &self.filter {
            ClauseFilter::Types(filter) => filter
                .iter()
                .any(|&ty| types.is_subtype(error.type_id, ty)),
            ClauseFilter::Unresolved(_) => false,
            ClauseFilter::Bare => true,
        }
    }
}

/// Index of the first clause, in source order, that accepts `error`.
pub fn select_clause(
    types: &TypeRegistry,
    error: &ErrorValue,
    clauses: &[CatchClause],
) -> Option<usize> {
    let selected = clauses.iter().position(|clause| clause.matches(types, error));
    trace!(error_type = ?error.type_id, ?selected, "clause selection");
    selected
}

/// State of a try region.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RegionState {
    /// Protected body executing.
    Armed,
    /// Walking the catch clauses.
    Matching,
    /// The clause at this index is running.
    Handling(usize),
    /// Left normally, or a handler completed.
    Resolved,
    /// Unwinding to the enclosing region.
    Propagating,
}

/// Result of raising inside an armed region.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RaiseOutcome {
    Handle(usize),
    Propagate,
}

/// State machine of a single try region.
#[derive(Debug)]
pub struct TryRegion {
    state: RegionState,
}

impl TryRegion {
    pub fn new() -> Self {
        TryRegion {
            state: RegionState::Armed,
        }
    }

    #[inline]
    pub fn state(&self) -> RegionState {
        self.state
    }

    /// The protected body completed without raising.
    pub fn on_body_exit(&mut self) {
        debug_assert_eq!(self.state, RegionState::Armed, "body exit outside armed region");
        self.state = RegionState::Resolved;
    }

    /// The protected body raised `error`.
    pub fn on_raise(
        &mut self,
        types: &TypeRegistry,
        error: &ErrorValue,
        clauses: &[CatchClause],
    ) -> RaiseOutcome {
        debug_assert_eq!(self.state, RegionState::Armed, "raise outside armed region");
        self.state = RegionState::Matching;
        match select_clause(types, error, clauses) {
            Some(index) => {
                self.state = RegionState::Handling(index);
                RaiseOutcome::Handle(index)
            }
            None => {
                self.state = RegionState::Propagating;
                RaiseOutcome::Propagate
            }
        }
    }

    /// The selected handler finished; `raised` if it ended with an error.
    pub fn on_handler_exit(&mut self, raised: bool) {
        debug_assert!(
            matches!(self.state, RegionState::Handling(_)),
            "handler exit without a running handler"
        );
        self.state = if raised {
            RegionState::Propagating
        } else {
            RegionState::Resolved
        };
    }
}

impl Default for TryRegion {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors currently being handled, innermost last.
#[derive(Clone, Debug, Default)]
pub struct ExceptionState {
    handling: Vec<ErrorValue>,
}

impl ExceptionState {
    /// The error of the innermost running handler.
    pub fn current(&self) -> Option<&ErrorValue> {
        self.handling.last()
    }

    pub fn depth(&self) -> usize {
        self.handling.len()
    }

    pub(crate) fn enter(&mut self, error: ErrorValue) {
        self.handling.push(error);
    }

    pub(crate) fn exit(&mut self) {
        self.handling.pop();
    }

    /// The current error for a bare `raise`.
    pub fn reraise(&self) -> ErrorValue {
        self.current().cloned().unwrap_or_else(no_active_exception)
    }
}

impl Runtime {
    /// Run `body` as a protected region with `clauses`.
    ///
    /// If the body raises, the first matching clause's index and the error
    /// are passed to `handler`, which runs with the error as the current
    /// exception. An unmatched error is returned unchanged.
    #[tracing::instrument(level = "debug", skip_all, fields(clauses = clauses.len()))]
    pub fn guarded<B, H>(&mut self, clauses: &[CatchClause], body: B, handler: H) -> EvalResult
    where
        B: FnOnce(&mut Runtime) -> EvalResult,
        H: FnOnce(&mut Runtime, usize, &ErrorValue) -> EvalResult,
    {
        let mut region = TryRegion::new();
        let error = match body(self) {
            Ok(value) => {
                region.on_body_exit();
                return Ok(value);
            }
            Err(error) => error,
        };

        match region.on_raise(&self.types, &error, clauses) {
            RaiseOutcome::Propagate => Err(error),
            RaiseOutcome::Handle(index) => {
                self.exceptions.enter(error.clone());
                let result = handler(self, index, &error);
                self.exceptions.exit();
                region.on_handler_exit(result.is_err());
                result
            }
        }
    }

    /// Error for `raise payload` where the payload is a type or an error
    /// value.
    ///
    /// Raising a type instantiates it without arguments. Anything else, or a
    /// type that is not an exception, is a `TypeError`.
    pub fn raise_value(&self, payload: &Value) -> ErrorValue {
        match payload {
            Value::Error(err) => ErrorValue::clone(err),
            Value::Type(ty) => self.raise(*ty, Value::None),
            other => type_mismatch("Exception", self.value_type_name(other)),
        }
    }

    /// Error of type `ty` carrying `payload`.
    pub fn raise(&self, ty: TypeId, payload: Value) -> ErrorValue {
        if self.types.is_subtype(ty, TypeId::EXCEPTION) {
            ErrorValue::raised(ty, payload, self)
        } else {
            type_mismatch("Exception", self.type_name(ty))
        }
    }

    /// Bare `raise` inside a handler.
    pub fn reraise(&self) -> ErrorValue {
        self.exceptions.reraise()
    }

    /// `assert condition, message`.
    pub fn assert_that(&self, condition: bool, message: Option<Value>) -> Result<(), ErrorValue> {
        if condition {
            Ok(())
        } else {
            Err(assertion_failed(message, self))
        }
    }
}
