//! Global scope and per-call frames.
//!
//! A frame writes to the global scope only for names it has declared global;
//! any other store creates or updates a local that shadows the global.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

use pith_ir::Name;
use pith_value::{BoundArguments, Value};

/// Process-wide name table.
///
/// Clones share the same table; a write through one handle is visible to
/// every other immediately.
#[derive(Clone, Default)]
pub struct GlobalScope(Arc<RwLock<FxHashMap<Name, Value>>>);

impl GlobalScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: Name) -> Option<Value> {
        self.0.read().get(&name).cloned()
    }

    pub fn set(&self, name: Name, value: Value) {
        self.0.write().insert(name, value);
    }

    pub fn contains(&self, name: Name) -> bool {
        self.0.read().contains_key(&name)
    }

    pub fn remove(&self, name: Name) -> Option<Value> {
        self.0.write().remove(&name)
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Whether both handles refer to the same table.
    pub fn same_scope(&self, other: &GlobalScope) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for GlobalScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalScope")
            .field("len", &self.len())
            .finish()
    }
}

/// Local state of one function invocation.
#[derive(Debug)]
pub struct Frame {
    function: Name,
    locals: FxHashMap<Name, Value>,
    /// Names this frame may write in the global scope.
    declared_globals: FxHashSet<Name>,
    globals: GlobalScope,
}

impl Frame {
    /// Empty frame, as used for module-level code.
    pub fn new(function: Name, globals: GlobalScope) -> Self {
        Frame {
            function,
            locals: FxHashMap::default(),
            declared_globals: FxHashSet::default(),
            globals,
        }
    }

    /// Frame whose locals are the bound call arguments.
    pub fn with_arguments(function: Name, globals: GlobalScope, bound: BoundArguments) -> Self {
        let mut frame = Self::new(function, globals);
        frame.locals.extend(bound);
        frame
    }

    /// Name of the function this frame executes.
    #[inline]
    pub fn function(&self) -> Name {
        self.function
    }

    #[inline]
    pub fn globals(&self) -> &GlobalScope {
        &self.globals
    }

    /// Grant this frame write access to the global `name`.
    ///
    /// A local of the same name stops being visible to `load`.
    pub fn declare_global(&mut self, name: Name) {
        self.declared_globals.insert(name);
    }

    #[inline]
    pub fn is_global(&self, name: Name) -> bool {
        self.declared_globals.contains(&name)
    }

    /// Bind `name`: to the global scope if declared global, else locally.
    pub fn store(&mut self, name: Name, value: Value) {
        if self.is_global(name) {
            self.globals.set(name, value);
        } else {
            self.locals.insert(name, value);
        }
    }

    /// Resolve `name` against locals, then globals.
    pub fn load(&self, name: Name) -> Option<Value> {
        if !self.is_global(name) {
            if let Some(value) = self.locals.get(&name) {
                return Some(value.clone());
            }
        }
        self.globals.get(name)
    }

    /// Local binding only.
    pub fn local(&self, name: Name) -> Option<&Value> {
        self.locals.get(&name)
    }

    /// Unbind `name` from wherever `store` would have written it.
    pub fn delete(&mut self, name: Name) -> Option<Value> {
        if self.is_global(name) {
            self.globals.remove(name)
        } else {
            self.locals.remove(&name)
        }
    }

    pub fn local_count(&self) -> usize {
        self.locals.len()
    }
}

#[cfg(test)]
mod tests;
