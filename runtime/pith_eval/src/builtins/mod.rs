//! Built-in types, methods and functions registered at runtime construction.
//!
//! Methods are natives registered as capabilities of their type, so they are
//! reachable both bound (`(1).__add__(2)`) and through the type
//! (`int.__add__(1, 2)`).

mod containers;
mod numeric;
mod reflection;

use pith_ir::TypeId;
use pith_value::{type_mismatch, ErrorValue, Value};

use crate::runtime::{NativeBody, Runtime};

/// Native method table entry: name, arity including the receiver, body.
type MethodDef = (&'static str, Option<usize>, NativeBody);

/// Register every built-in on `rt`.
pub(crate) fn register(rt: &mut Runtime) {
    for (id, name, _) in TypeId::BUILTINS {
        let name = rt.intern(name);
        rt.set_builtin(name, Value::Type(id));
    }

    register_methods(rt, TypeId::INT, numeric::INT_METHODS);
    register_methods(rt, TypeId::FLOAT, numeric::FLOAT_METHODS);
    register_methods(rt, TypeId::DICT, containers::DICT_METHODS);
    register_methods(rt, TypeId::LIST, containers::LIST_METHODS);
    register_methods(rt, TypeId::TUPLE, containers::TUPLE_METHODS);

    for &(name, arity, doc, body) in reflection::FUNCTIONS {
        let native = rt.define_native(name, arity, doc, body);
        let name = rt.intern(name);
        rt.set_builtin(name, native);
    }
}

fn register_methods(rt: &mut Runtime, ty: TypeId, methods: &[MethodDef]) {
    for &(name, arity, body) in methods {
        let native = rt.define_native(name, arity, None, body);
        let name = rt.intern(name);
        rt.types_mut().register_capability(ty, name, native);
    }
}

/// Receiver-type check shared by the method tables.
fn expect_type(rt: &Runtime, value: &Value, ty: TypeId) -> Result<(), ErrorValue> {
    if rt.is_instance(value, ty) {
        Ok(())
    } else {
        Err(type_mismatch(rt.type_name(ty), rt.value_type_name(value)))
    }
}
