//! `dict`, `list` and `tuple` methods.

use pith_ir::TypeId;
use pith_value::{
    index_out_of_range, key_not_found, native_arity, type_mismatch, ErrorValue, EvalResult,
    Mapping, Object, Value,
};

use super::{expect_type, MethodDef};
use crate::runtime::Runtime;

pub(super) const DICT_METHODS: &[MethodDef] = &[
    ("__getitem__", Some(2), dict_getitem),
    ("__setitem__", Some(3), dict_setitem),
    ("__contains__", Some(2), dict_contains),
    ("__len__", Some(1), container_len),
    ("get", None, dict_get),
];

pub(super) const LIST_METHODS: &[MethodDef] = &[
    ("append", Some(2), list_append),
    ("__getitem__", Some(2), list_getitem),
    ("__len__", Some(1), container_len),
];

pub(super) const TUPLE_METHODS: &[MethodDef] = &[
    ("__getitem__", Some(2), tuple_getitem),
    ("__len__", Some(1), tuple_len),
];

fn mapping<'a>(rt: &Runtime, value: &'a Value) -> Result<&'a Mapping, ErrorValue> {
    value
        .as_mapping()
        .ok_or_else(|| type_mismatch("dict", rt.value_type_name(value)))
}

fn list<'a>(rt: &Runtime, value: &'a Value) -> Result<&'a Object, ErrorValue> {
    expect_type(rt, value, TypeId::LIST)?;
    match value.as_object() {
        Some(obj) if obj.list_snapshot().is_some() => Ok(obj),
        _ => Err(type_mismatch("list", rt.value_type_name(value))),
    }
}

/// Resolve a possibly negative index against `len`.
fn normalize_index(rt: &Runtime, index: &Value, len: usize) -> Result<usize, ErrorValue> {
    let Value::Int(raw) = index else {
        return Err(type_mismatch("int", rt.value_type_name(index)));
    };
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let adjusted = if *raw < 0 { raw + len_i } else { *raw };
    usize::try_from(adjusted)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| index_out_of_range(*raw, len))
}

fn dict_getitem(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    let [receiver, key] = args else {
        return Err(native_arity("__getitem__", 2, args.len()));
    };
    mapping(rt, receiver)?
        .get(key)
        .ok_or_else(|| key_not_found(key.clone(), &*rt))
}

fn dict_setitem(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    let [receiver, key, value] = args else {
        return Err(native_arity("__setitem__", 3, args.len()));
    };
    mapping(rt, receiver)?.insert(key.clone(), value.clone());
    Ok(Value::None)
}

fn dict_contains(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    let [receiver, key] = args else {
        return Err(native_arity("__contains__", 2, args.len()));
    };
    Ok(Value::Bool(mapping(rt, receiver)?.contains(key)))
}

/// `d.get(key)` or `d.get(key, default)`.
fn dict_get(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    let (receiver, key, default) = match args {
        [receiver, key] => (receiver, key, Value::None),
        [receiver, key, default] => (receiver, key, default.clone()),
        _ => return Err(native_arity("get", 2, args.len())),
    };
    Ok(mapping(rt, receiver)?.get(key).unwrap_or(default))
}

fn container_len(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    let [receiver] = args else {
        return Err(native_arity("__len__", 1, args.len()));
    };
    receiver
        .as_object()
        .and_then(Object::len)
        .map(usize_value)
        .ok_or_else(|| type_mismatch("dict", rt.value_type_name(receiver)))
}

fn list_append(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    let [receiver, item] = args else {
        return Err(native_arity("append", 2, args.len()));
    };
    list(rt, receiver)?.list_push(item.clone());
    Ok(Value::None)
}

fn list_getitem(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    let [receiver, index] = args else {
        return Err(native_arity("__getitem__", 2, args.len()));
    };
    let obj = list(rt, receiver)?;
    let len = obj.len().unwrap_or(0);
    let i = normalize_index(rt, index, len)?;
    obj.list_get(i).ok_or_else(|| index_out_of_range(i64::try_from(i).unwrap_or(i64::MAX), len))
}

fn tuple_getitem(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    let [receiver, index] = args else {
        return Err(native_arity("__getitem__", 2, args.len()));
    };
    let items = receiver
        .as_tuple()
        .ok_or_else(|| type_mismatch("tuple", rt.value_type_name(receiver)))?;
    let i = normalize_index(rt, index, items.len())?;
    Ok(items[i].clone())
}

fn tuple_len(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    let [receiver] = args else {
        return Err(native_arity("__len__", 1, args.len()));
    };
    receiver
        .as_tuple()
        .map(|items| usize_value(items.len()))
        .ok_or_else(|| type_mismatch("tuple", rt.value_type_name(receiver)))
}

pub(super) fn usize_value(n: usize) -> Value {
    Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
}
