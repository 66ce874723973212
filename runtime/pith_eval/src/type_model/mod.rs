//! Type registry: parent chains, capability tables and instance checks.
//!
//! Every type has at most one parent. Method resolution and `isinstance`
//! both walk that chain from the queried type up to `object`.
//!
//! Built-in types occupy the fixed ids of `TypeId::BUILTINS`; user types are
//! appended after them. Registration is idempotent by name.

use rustc_hash::FxHashMap;
use tracing::debug;

use pith_ir::{Name, StringInterner, TypeId};
use pith_value::Value;

/// Registered type.
#[derive(Clone, Debug)]
struct TypeInfo {
    name: Name,
    parent: Option<TypeId>,
    /// Methods and class attributes defined directly on this type.
    capabilities: FxHashMap<Name, Value>,
    doc: Option<String>,
}

/// The runtime's table of types.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    types: Vec<TypeInfo>,
    by_name: FxHashMap<Name, TypeId>,
}

impl TypeRegistry {
    /// Create a registry holding every built-in type at its fixed id.
    pub fn new(interner: &StringInterner) -> Self {
        let mut registry = TypeRegistry {
            types: Vec::with_capacity(TypeId::BUILTINS.len()),
            by_name: FxHashMap::default(),
        };
        for (id, name, parent) in TypeId::BUILTINS {
            debug_assert_eq!(id.index(), registry.types.len());
            let name = interner.intern(name);
            registry.push(name, parent);
        }
        registry
    }

    fn push(&mut self, name: Name, parent: Option<TypeId>) -> TypeId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "type count is bounded by the interner's u32 name space"
        )]
        let id = TypeId::new(self.types.len() as u32);
        self.types.push(TypeInfo {
            name,
            parent,
            capabilities: FxHashMap::default(),
            doc: None,
        });
        self.by_name.insert(name, id);
        id
    }

    /// Register a type deriving from `parent`.
    ///
    /// Registering a name twice returns the existing id; the second parent is
    /// ignored.
    pub fn register(&mut self, name: Name, parent: TypeId) -> TypeId {
        if let Some(&existing) = self.by_name.get(&name) {
            debug!(?name, ?existing, "type already registered");
            return existing;
        }
        let id = self.push(name, Some(parent));
        debug!(?name, ?id, ?parent, "registered type");
        id
    }

    /// Define `name` on `ty` itself, replacing any previous definition.
    ///
    /// Unknown types are ignored.
    pub fn register_capability(&mut self, ty: TypeId, name: Name, value: Value) {
        if let Some(info) = self.types.get_mut(ty.index()) {
            debug!(?ty, ?name, "registered capability");
            info.capabilities.insert(name, value);
        }
    }

    /// Remove a capability defined directly on `ty`.
    pub fn remove_capability(&mut self, ty: TypeId, name: Name) -> Option<Value> {
        self.types
            .get_mut(ty.index())
            .and_then(|info| info.capabilities.remove(&name))
    }

    /// Attach documentation to `ty`.
    pub fn set_doc(&mut self, ty: TypeId, doc: impl Into<String>) {
        if let Some(info) = self.types.get_mut(ty.index()) {
            info.doc = Some(doc.into());
        }
    }

    /// Type of a value. The type of every type is `type`, including `type`.
    #[inline]
    pub fn type_of(&self, value: &Value) -> TypeId {
        value.type_id()
    }

    /// Whether `value`'s type is `ty` or derives from it.
    pub fn is_instance(&self, value: &Value, ty: TypeId) -> bool {
        self.is_subtype(self.type_of(value), ty)
    }

    /// Whether `ancestor` appears on `ty`'s parent chain, `ty` included.
    pub fn is_subtype(&self, ty: TypeId, ancestor: TypeId) -> bool {
        self.ancestors(ty).any(|t| t == ancestor)
    }

    /// Resolve `name` on `ty`, walking the parent chain.
    pub fn resolve_method(&self, ty: TypeId, name: Name) -> Option<Value> {
        self.ancestors(ty).find_map(|t| {
            self.types
                .get(t.index())
                .and_then(|info| info.capabilities.get(&name))
                .cloned()
        })
    }

    /// Capability defined directly on `ty`, without walking parents.
    pub fn own_capability(&self, ty: TypeId, name: Name) -> Option<Value> {
        self.types
            .get(ty.index())
            .and_then(|info| info.capabilities.get(&name))
            .cloned()
    }

    pub fn parent_of(&self, ty: TypeId) -> Option<TypeId> {
        self.types.get(ty.index()).and_then(|info| info.parent)
    }

    pub fn name_of(&self, ty: TypeId) -> Option<Name> {
        self.types.get(ty.index()).map(|info| info.name)
    }

    /// Find a type by name.
    pub fn lookup(&self, name: Name) -> Option<TypeId> {
        self.by_name.get(&name).copied()
    }

    pub fn doc_of(&self, ty: TypeId) -> Option<&str> {
        self.types
            .get(ty.index())
            .and_then(|info| info.doc.as_deref())
    }

    /// `ty` followed by its parents, ending at the root.
    pub fn ancestors(&self, ty: TypeId) -> Ancestors<'_> {
        Ancestors {
            registry: self,
            next: self.contains(ty).then_some(ty),
        }
    }

    #[inline]
    pub fn contains(&self, ty: TypeId) -> bool {
        ty.index() < self.types.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Iterator over a type's parent chain.
pub struct Ancestors<'a> {
    registry: &'a TypeRegistry,
    next: Option<TypeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = TypeId;

    fn next(&mut self) -> Option<TypeId> {
        let current = self.next?;
        self.next = self.registry.parent_of(current);
        Some(current)
    }
}
