//! Pith Eval - the runtime core an external evaluator drives.
//!
//! This crate provides four services and the `Runtime` that ties them
//! together:
//!
//! - `TypeRegistry`: types, single-parent chains and capability tables
//! - attribute protocol (`Runtime::get_attr`, `set_attr`, ...)
//! - `bind`: maps call arguments onto a `ParameterSpec`
//! - exception dispatch (`CatchClause`, `TryRegion`, `Runtime::guarded`)
//!
//! No parsing or expression evaluation happens here. The evaluator hands
//! the runtime already-evaluated arguments, already-resolved callables and
//! already-raised errors.
//!
//! # Re-exports
//!
//! Value types are re-exported from `pith_value` for convenience.

mod attributes;
mod builtins;
mod call_binder;
mod diagnostics;
mod dispatch;
mod environment;
mod runtime;
mod stack;
mod type_model;

use std::sync::Once;

pub use call_binder::bind;
pub use diagnostics::{CallFrame, CallStack, DEFAULT_MAX_DEPTH};
pub use dispatch::{
    select_clause, CatchClause, ClauseFilter, ExceptionState, RaiseOutcome, RegionState,
    TryRegion,
};
pub use environment::{Frame, GlobalScope};
pub use runtime::{NativeBody, Runtime, RuntimeBuilder, UserBody};
pub use stack::ensure_sufficient_stack;
pub use type_model::{Ancestors, TypeRegistry};

pub use pith_ir::{Name, SharedInterner, StringInterner, TypeId};
pub use pith_value::{
    BoundArguments, CallArguments, ErrorKind, ErrorValue, EvalResult, Parameter, ParameterSpec,
    Value,
};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set, and only the first call has any
/// effect. Hosts that install their own subscriber should not call this.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // A subscriber installed elsewhere wins.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
