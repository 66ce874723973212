//! Repr rendering.
//!
//! Lists and mappings can contain themselves, so rendering tracks the
//! containers currently being written and prints `[...]` or `{...}` on
//! re-entry. User types have no name in `pith_value`; callers that know the
//! registered names pass a `TypeNames` implementation.

use std::fmt;

use pith_ir::TypeId;

use super::{Heap, Value};
use crate::object::{Object, ObjectPayload};

/// Name lookup for types, used when rendering values.
pub trait TypeNames {
    /// Registered name of `ty`, or `None` if unknown.
    fn registered_name(&self, ty: TypeId) -> Option<&str>;
}

/// Knows the built-in types only.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinNames;

impl TypeNames for BuiltinNames {
    fn registered_name(&self, ty: TypeId) -> Option<&str> {
        ty.builtin_name()
    }
}

/// A value paired with the names to render it with. See `Value::repr`.
pub struct Repr<'a> {
    pub(super) value: &'a Value,
    pub(super) names: &'a dyn TypeNames,
}

impl fmt::Display for Repr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut renderer = Renderer {
            names: self.names,
            active: Vec::new(),
        };
        renderer.write(f, self.value)
    }
}

struct Renderer<'n> {
    names: &'n dyn TypeNames,
    /// Containers on the current rendering path.
    active: Vec<*const Object>,
}

impl Renderer<'_> {
    fn write(&mut self, f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
        match value {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "'{}'", s.escape_default()),
            Value::Tuple(items) => {
                write!(f, "(")?;
                self.write_items(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Value::Object(obj) => self.write_object(f, obj),
            Value::Type(ty) => match self.names.registered_name(*ty) {
                Some(name) => write!(f, "<class '{name}'>"),
                None => write!(f, "<class>"),
            },
            Value::Function(_) => write!(f, "<function>"),
            Value::Native(native) => write!(f, "<native_function {}>", native.name),
            Value::BoundMethod(_) => write!(f, "<bound_method>"),
            Value::Error(err) => write!(f, "{}", &**err),
        }
    }

    fn write_object(&mut self, f: &mut fmt::Formatter<'_>, obj: &Heap<Object>) -> fmt::Result {
        let (open, close) = match obj.payload() {
            ObjectPayload::Instance => {
                return match self.names.registered_name(obj.type_id()) {
                    Some(name) => write!(f, "<{name} object>"),
                    None => write!(f, "<object>"),
                };
            }
            ObjectPayload::Mapping(_) => ("{", "}"),
            ObjectPayload::List(_) => ("[", "]"),
        };

        let addr = Heap::as_ptr(obj);
        if self.active.contains(&addr) {
            return write!(f, "{open}...{close}");
        }
        self.active.push(addr);
        let result = self.write_contents(f, obj, open, close);
        self.active.pop();
        result
    }

    fn write_contents(
        &mut self,
        f: &mut fmt::Formatter<'_>,
        obj: &Object,
        open: &str,
        close: &str,
    ) -> fmt::Result {
        write!(f, "{open}")?;
        match obj.payload() {
            ObjectPayload::Mapping(mapping) => {
                for (i, (key, value)) in mapping.entries().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    self.write(f, key)?;
                    write!(f, ": ")?;
                    self.write(f, value)?;
                }
            }
            ObjectPayload::List(_) => {
                self.write_items(f, &obj.list_snapshot().unwrap_or_default())?;
            }
            ObjectPayload::Instance => {}
        }
        write!(f, "{close}")
    }

    fn write_items(&mut self, f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            self.write(f, item)?;
        }
        Ok(())
    }
}
