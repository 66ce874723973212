//! `RuntimeBuilder` for creating `Runtime` instances with various configurations.

use pith_ir::SharedInterner;

use super::Runtime;
use crate::diagnostics::{CallStack, DEFAULT_MAX_DEPTH};

/// Builder for creating `Runtime` instances.
///
/// Configuration is programmatic only. Defaults: a fresh interner and a
/// recursion limit of `DEFAULT_MAX_DEPTH` calls.
#[derive(Clone, Debug)]
pub struct RuntimeBuilder {
    interner: Option<SharedInterner>,
    max_recursion_depth: Option<usize>,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            interner: None,
            max_recursion_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }

    /// Share an interner with the host, so that names it interned resolve
    /// to the same `Name`s inside the runtime.
    #[must_use]
    pub fn interner(mut self, interner: SharedInterner) -> Self {
        self.interner = Some(interner);
        self
    }

    /// Maximum number of nested user-function calls.
    #[must_use]
    pub fn max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = Some(depth);
        self
    }

    /// Remove the recursion limit; native stack growth still applies.
    #[must_use]
    pub fn unbounded_recursion(mut self) -> Self {
        self.max_recursion_depth = None;
        self
    }

    /// Build the runtime and register the built-ins.
    pub fn build(self) -> Runtime {
        let interner = self.interner.unwrap_or_default();
        Runtime::from_parts(interner, CallStack::new(self.max_recursion_depth))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
