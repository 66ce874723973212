//! Attribute protocol: lookup with type fallback, assignment, deletion.
//!
//! Lookup order for `obj.name`:
//! 1. the object's own attribute container (objects and functions)
//! 2. for a type object, its synthetic attributes and its own capability
//!    chain, returned unbound
//! 3. the capability chain of `type(obj)`, with callables bound to `obj`
//!
//! Scalars, strings and tuples have no container, so they only reach step 3
//! and reject assignment. The synthetic attributes of a type object are
//! read-only, so anything `set_attr` accepts reads back unchanged.

use tracing::trace;

use pith_ir::{Name, TypeId};
use pith_value::{
    cannot_delete_attribute, cannot_set_attribute, no_such_attribute, ErrorValue, EvalResult,
    Value,
};

use crate::runtime::Runtime;

impl Runtime {
    /// Resolve `obj.name`, or `None`. Never fails.
    pub fn lookup_attr(&self, obj: &Value, name: Name) -> Option<Value> {
        if let Some(value) = self.own_attr(obj, name) {
            return Some(value);
        }
        if let Value::Type(ty) = obj {
            if let Some(value) = self.type_attr(*ty, name) {
                return Some(value);
            }
        }
        let ty = self.type_of(obj);
        if name == self.names.class {
            return Some(Value::Type(ty));
        }
        let found = self.types.resolve_method(ty, name)?;
        trace!(attribute = self.resolve(name), owner = self.type_name(ty), "resolved on type");
        Some(match found {
            Value::Function(_) | Value::Native(_) => Value::bound_method(obj.clone(), found),
            other => other,
        })
    }

    /// Resolve `obj.name`, failing with `AttributeError`.
    pub fn get_attr(&self, obj: &Value, name: Name) -> EvalResult {
        self.lookup_attr(obj, name)
            .ok_or_else(|| no_such_attribute(self.value_type_name(obj), self.resolve(name)))
    }

    /// `obj.name` if present, else `fallback`.
    pub fn get_attr_or(&self, obj: &Value, name: Name, fallback: Value) -> Value {
        self.lookup_attr(obj, name).unwrap_or(fallback)
    }

    pub fn has_attr(&self, obj: &Value, name: Name) -> bool {
        self.lookup_attr(obj, name).is_some()
    }

    /// Create or overwrite `obj.name`.
    ///
    /// Assigning on a type object defines a capability of that type, visible
    /// to every instance and subtype. A type's `__name__` and `__base__` are
    /// fixed, and its `__doc__` only takes a string.
    pub fn set_attr(&mut self, obj: &Value, name: Name, value: Value) -> Result<(), ErrorValue> {
        match obj {
            Value::Object(o) => o.attrs().set(name, value),
            Value::Function(f) => f.attrs().set(name, value),
            Value::Type(ty) if name == self.names.doc => match value.as_str() {
                Some(doc) => self.types.set_doc(*ty, doc),
                None => return Err(cannot_set_attribute(self.type_name(TypeId::TYPE))),
            },
            Value::Type(_) if name == self.names.name || name == self.names.base => {
                return Err(cannot_set_attribute(self.type_name(TypeId::TYPE)));
            }
            Value::Type(ty) => self.types.register_capability(*ty, name, value),
            other => return Err(cannot_set_attribute(self.value_type_name(other))),
        }
        Ok(())
    }

    /// Remove an attribute set directly on `obj`.
    pub fn del_attr(&mut self, obj: &Value, name: Name) -> Result<(), ErrorValue> {
        let removed = match obj {
            Value::Object(o) => o.attrs().remove(name),
            Value::Function(f) => f.attrs().remove(name),
            Value::Type(ty) => self.types.remove_capability(*ty, name),
            other => {
                return Err(cannot_delete_attribute(
                    self.value_type_name(other),
                    self.resolve(name),
                ))
            }
        };
        match removed {
            Some(_) => Ok(()),
            None => Err(no_such_attribute(self.value_type_name(obj), self.resolve(name))),
        }
    }

    fn own_attr(&self, obj: &Value, name: Name) -> Option<Value> {
        match obj {
            Value::Object(o) => o.attrs().get(name),
            Value::Function(f) => f.attrs().get(name).or_else(|| {
                if name == self.names.name {
                    Some(Value::string(self.resolve(f.name())))
                } else if name == self.names.doc {
                    Some(f.doc().map_or(Value::None, Value::string))
                } else {
                    None
                }
            }),
            Value::Native(native) if name == self.names.name => Some(Value::string(native.name)),
            Value::Native(native) if name == self.names.doc => {
                Some(native.doc.map_or(Value::None, Value::string))
            }
            _ => None,
        }
    }

    /// Attributes of a type object itself.
    fn type_attr(&self, ty: TypeId, name: Name) -> Option<Value> {
        if name == self.names.name {
            return Some(Value::string(self.type_name(ty)));
        }
        if name == self.names.base {
            return Some(self.types.parent_of(ty).map_or(Value::None, Value::Type));
        }
        if name == self.names.doc {
            return Some(self.types.doc_of(ty).map_or(Value::None, Value::string));
        }
        self.types.resolve_method(ty, name)
    }
}

#[cfg(test)]
mod tests;
