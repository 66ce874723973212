//! Built-in functions: reflection, `len` and `sum`.
//!
//! `type` is not here: the `type` built-in is the type object itself, and
//! calling it with one argument returns the argument's type.

use pith_ir::Name;
use pith_value::{native_arity, type_mismatch, CallArguments, ErrorValue, EvalResult, Value};

use super::containers::usize_value;
use crate::runtime::{sequence_items, NativeBody, Runtime};

type FunctionDef = (&'static str, Option<usize>, Option<&'static str>, NativeBody);

pub(super) const FUNCTIONS: &[FunctionDef] = &[
    (
        "isinstance",
        Some(2),
        Some("isinstance(obj, cls) -> bool\n\ncls may be a type or a tuple of types."),
        isinstance,
    ),
    (
        "getattr",
        None,
        Some("getattr(obj, name[, default])"),
        getattr,
    ),
    ("setattr", Some(3), Some("setattr(obj, name, value)"), setattr),
    ("hasattr", Some(2), Some("hasattr(obj, name) -> bool"), hasattr),
    ("delattr", Some(2), Some("delattr(obj, name)"), delattr),
    ("help", Some(1), Some("help(obj) -> str | None"), help),
    ("len", Some(1), Some("len(obj) -> int"), len),
    ("sum", None, Some("sum(iterable[, start])"), sum),
];

/// Attribute name argument.
fn attr_name(rt: &Runtime, value: &Value) -> Result<Name, ErrorValue> {
    value
        .as_str()
        .map(|s| rt.intern(s))
        .ok_or_else(|| type_mismatch("str", rt.value_type_name(value)))
}

fn isinstance(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    let [obj, cls] = args else {
        return Err(native_arity("isinstance", 2, args.len()));
    };
    let matches = |candidate: &Value| match candidate {
        Value::Type(ty) => Ok(rt.is_instance(obj, *ty)),
        other => Err(type_mismatch("type", rt.value_type_name(other))),
    };
    match cls {
        Value::Tuple(types) => {
            for candidate in types.iter() {
                if matches(candidate)? {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        single => matches(single).map(Value::Bool),
    }
}

fn getattr(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    match args {
        [obj, name] => {
            let name = attr_name(rt, name)?;
            rt.get_attr(obj, name)
        }
        [obj, name, default] => {
            let name = attr_name(rt, name)?;
            Ok(rt.get_attr_or(obj, name, default.clone()))
        }
        _ => Err(native_arity("getattr", 2, args.len())),
    }
}

fn setattr(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    let [obj, name, value] = args else {
        return Err(native_arity("setattr", 3, args.len()));
    };
    let name = attr_name(rt, name)?;
    rt.set_attr(obj, name, value.clone())?;
    Ok(Value::None)
}

fn hasattr(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    let [obj, name] = args else {
        return Err(native_arity("hasattr", 2, args.len()));
    };
    let name = attr_name(rt, name)?;
    Ok(Value::Bool(rt.has_attr(obj, name)))
}

fn delattr(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    let [obj, name] = args else {
        return Err(native_arity("delattr", 2, args.len()));
    };
    let name = attr_name(rt, name)?;
    rt.del_attr(obj, name)?;
    Ok(Value::None)
}

fn help(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    let [obj] = args else {
        return Err(native_arity("help", 1, args.len()));
    };
    Ok(rt.help(obj).map_or(Value::None, Value::string))
}

fn len(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    let [obj] = args else {
        return Err(native_arity("len", 1, args.len()));
    };
    match obj {
        Value::Str(s) => Ok(usize_value(s.chars().count())),
        Value::Tuple(items) => Ok(usize_value(items.len())),
        _ => {
            let len = rt.names.len;
            let result = rt.call_method(obj, len, CallArguments::new())?;
            match result {
                Value::Int(_) => Ok(result),
                other => Err(type_mismatch("int", rt.value_type_name(&other))),
            }
        }
    }
}

/// `sum(iterable[, start])`, adding with `__add__` from the left.
fn sum(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    let (iterable, start) = match args {
        [iterable] => (iterable, Value::Int(0)),
        [iterable, start] => (iterable, start.clone()),
        _ => return Err(native_arity("sum", 1, args.len())),
    };
    let items = sequence_items(iterable)
        .ok_or_else(|| type_mismatch("list", rt.value_type_name(iterable)))?;
    let add = rt.names.add;
    items
        .into_iter()
        .try_fold(start, |acc, item| rt.fast_call(add, vec![acc, item]))
}
