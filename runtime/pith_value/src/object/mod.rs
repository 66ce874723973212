//! Objects and their attribute containers.
//!
//! Every generic object owns an explicit `AttributeMap`; there is no field
//! injection. Mappings and lists keep their items in a payload next to the
//! attribute container, so `setattr(d, 'b', 1)` on a `dict` does not touch
//! its items.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use pith_ir::{Name, TypeId};

use crate::value::Value;

/// Per-object attribute container.
///
/// Writes create or overwrite unconditionally; there is no schema.
#[derive(Debug, Default)]
pub struct AttributeMap {
    entries: RwLock<FxHashMap<Name, Value>>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: Name) -> Option<Value> {
        self.entries.read().get(&name).cloned()
    }

    /// Create or overwrite an attribute.
    pub fn set(&self, name: Name, value: Value) {
        self.entries.write().insert(name, value);
    }

    pub fn contains(&self, name: Name) -> bool {
        self.entries.read().contains_key(&name)
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove(&self, name: Name) -> Option<Value> {
        self.entries.write().remove(&name)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Attribute names, in no particular order.
    pub fn names(&self) -> Vec<Name> {
        self.entries.read().keys().copied().collect()
    }
}

/// Insertion-ordered key/value storage with equality lookup.
#[derive(Debug, Default)]
pub struct Mapping {
    entries: RwLock<Vec<(Value, Value)>>,
}

impl Mapping {
    pub fn get(&self, key: &Value) -> Option<Value> {
        self.entries
            .read()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Insert or overwrite in place, keeping the original insertion position.
    pub fn insert(&self, key: Value, value: Value) {
        let mut entries = self.entries.write();
        if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            entries.push((key, value));
        }
    }

    pub fn contains(&self, key: &Value) -> bool {
        self.entries.read().iter().any(|(k, _)| k == key)
    }

    pub fn remove(&self, key: &Value) -> Option<Value> {
        let mut entries = self.entries.write();
        let index = entries.iter().position(|(k, _)| k == key)?;
        Some(entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Snapshot of the entries in insertion order.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.entries.read().clone()
    }
}

/// What an object holds besides its attributes.
#[derive(Debug)]
pub enum ObjectPayload {
    /// Plain instance of a class.
    Instance,
    /// `dict` items.
    Mapping(Mapping),
    /// `list` items.
    List(RwLock<Vec<Value>>),
}

impl ObjectPayload {
    pub fn list(items: Vec<Value>) -> Self {
        ObjectPayload::List(RwLock::new(items))
    }
}

/// Generic object: identity, type, attribute container and payload.
#[derive(Debug)]
pub struct Object {
    type_id: TypeId,
    attrs: AttributeMap,
    payload: ObjectPayload,
}

impl Object {
    pub fn new(type_id: TypeId, payload: ObjectPayload) -> Self {
        Object {
            type_id,
            attrs: AttributeMap::new(),
            payload,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn attrs(&self) -> &AttributeMap {
        &self.attrs
    }

    #[inline]
    pub fn payload(&self) -> &ObjectPayload {
        &self.payload
    }

    pub fn mapping(&self) -> Option<&Mapping> {
        match &self.payload {
            ObjectPayload::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// Append to a list payload. Returns `false` for non-lists.
    pub fn list_push(&self, value: Value) -> bool {
        match &self.payload {
            ObjectPayload::List(items) => {
                items.write().push(value);
                true
            }
            _ => false,
        }
    }

    /// Item at `index` of a list payload.
    pub fn list_get(&self, index: usize) -> Option<Value> {
        match &self.payload {
            ObjectPayload::List(items) => items.read().get(index).cloned(),
            _ => None,
        }
    }

    /// Snapshot of a list payload.
    pub fn list_snapshot(&self) -> Option<Vec<Value>> {
        match &self.payload {
            ObjectPayload::List(items) => Some(items.read().clone()),
            _ => None,
        }
    }

    /// Item count for container payloads, `None` for plain instances.
    pub fn len(&self) -> Option<usize> {
        match &self.payload {
            ObjectPayload::Instance => None,
            ObjectPayload::Mapping(mapping) => Some(mapping.len()),
            ObjectPayload::List(items) => Some(items.read().len()),
        }
    }
}

#[cfg(test)]
mod tests;
