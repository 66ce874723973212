//! Type queries, attribute builtins and documentation, as scripts see them.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pith_eval::{CallArguments, ErrorKind, EvalResult, Parameter, Runtime, TypeId, Value};
use pretty_assertions::assert_eq;

fn builtin(rt: &Runtime, name: &str) -> Value {
    rt.builtin(rt.intern(name)).expect("registered builtin")
}

fn call_builtin(rt: &mut Runtime, name: &str, args: Vec<Value>) -> EvalResult {
    let callable = builtin(rt, name);
    rt.call(&callable, CallArguments::positional(args))
}

#[test]
fn type_of_values_and_types() {
    let mut rt = Runtime::new();
    let int = builtin(&rt, "int");
    let float = builtin(&rt, "float");
    let ty = builtin(&rt, "type");
    let object = builtin(&rt, "object");

    assert_eq!(call_builtin(&mut rt, "type", vec![Value::Int(1)]).unwrap(), int);
    assert_eq!(call_builtin(&mut rt, "type", vec![Value::Float(1.0)]).unwrap(), float);
    assert_eq!(call_builtin(&mut rt, "type", vec![object]).unwrap(), ty);
    assert_eq!(call_builtin(&mut rt, "type", vec![ty.clone()]).unwrap(), ty);
}

#[test]
fn hasattr_on_types_and_instances() {
    let mut rt = Runtime::new();
    let object = builtin(&rt, "object");
    let int = builtin(&rt, "int");
    let base = Value::string("__base__");
    let add = Value::string("__add__");

    assert_eq!(call_builtin(&mut rt, "hasattr", vec![object, base]).unwrap(), Value::Bool(true));
    assert_eq!(
        call_builtin(&mut rt, "hasattr", vec![Value::Int(1), add.clone()]).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(call_builtin(&mut rt, "hasattr", vec![int, add]).unwrap(), Value::Bool(true));
    assert_eq!(
        call_builtin(&mut rt, "hasattr", vec![Value::Int(1), Value::string("nope")]).unwrap(),
        Value::Bool(false)
    );
}

#[test]
fn unbound_and_bound_add() {
    let mut rt = Runtime::new();
    let add = rt.intern("__add__");

    // type(1).__add__(1, 2)
    let int = call_builtin(&mut rt, "type", vec![Value::Int(1)]).unwrap();
    let unbound = rt.get_attr(&int, add).unwrap();
    let sum = rt
        .call(&unbound, CallArguments::positional(vec![Value::Int(1), Value::Int(2)]))
        .unwrap();
    assert_eq!(sum, Value::Int(3));

    // getattr(1, '__add__')(2)
    let bound =
        call_builtin(&mut rt, "getattr", vec![Value::Int(1), Value::string("__add__")]).unwrap();
    let sum = rt.call(&bound, CallArguments::positional(vec![Value::Int(2)])).unwrap();
    assert_eq!(sum, Value::Int(3));
}

#[test]
fn setattr_on_mapping_object() {
    let mut rt = Runtime::new();
    let a = Value::dict();
    let b = Value::string("b");
    call_builtin(&mut rt, "setattr", vec![a.clone(), b.clone(), Value::Int(1)]).unwrap();

    let name = rt.intern("b");
    assert_eq!(rt.get_attr(&a, name).unwrap(), Value::Int(1));
    assert_eq!(call_builtin(&mut rt, "getattr", vec![a, b]).unwrap(), Value::Int(1));
}

#[test]
fn setattr_on_int_fails() {
    let mut rt = Runtime::new();
    let err = call_builtin(&mut rt, "setattr", vec![Value::Int(1), Value::string("x"), Value::None])
        .unwrap_err();
    assert_eq!(err.type_id, TypeId::TYPE_ERROR);
    assert!(matches!(err.kind, ErrorKind::CannotSetAttribute { .. }));
}

#[test]
fn getattr_missing_uses_default_or_fails() {
    let mut rt = Runtime::new();
    let found = call_builtin(
        &mut rt,
        "getattr",
        vec![Value::Int(1), Value::string("missing"), Value::Int(7)],
    )
    .unwrap();
    assert_eq!(found, Value::Int(7));

    let err = call_builtin(&mut rt, "getattr", vec![Value::Int(1), Value::string("missing")])
        .unwrap_err();
    assert_eq!(err.type_id, TypeId::ATTRIBUTE_ERROR);
}

#[test]
fn help_returns_docstrings_verbatim() {
    let mut rt = Runtime::new();
    let f1 = rt
        .define_function("f1", vec![], Some("docstring"), |_, _| Ok(Value::None))
        .unwrap();
    let x = rt.intern("x");
    let f2 = rt
        .define_function(
            "f2",
            vec![Parameter::positional(x)],
            Some("hello, worl\n\nd"),
            |_, _| Ok(Value::None),
        )
        .unwrap();

    assert_eq!(call_builtin(&mut rt, "help", vec![f1]).unwrap(), Value::string("docstring"));
    assert_eq!(
        call_builtin(&mut rt, "help", vec![f2]).unwrap(),
        Value::string("hello, worl\n\nd")
    );
}

#[test]
fn isinstance_through_user_hierarchy() {
    let mut rt = Runtime::new();
    let base = rt.define_class("Base", None, []);
    let derived = rt.define_class("Derived", Some(base), []);
    let obj = rt.call(&Value::Type(derived), CallArguments::new()).unwrap();

    let check = |rt: &mut Runtime, cls: Value| call_builtin(rt, "isinstance", vec![obj.clone(), cls]);
    assert_eq!(check(&mut rt, Value::Type(base)).unwrap(), Value::Bool(true));
    assert_eq!(check(&mut rt, Value::Type(TypeId::OBJECT)).unwrap(), Value::Bool(true));
    assert_eq!(check(&mut rt, Value::Type(TypeId::INT)).unwrap(), Value::Bool(false));
    assert_eq!(
        check(&mut rt, Value::tuple(vec![Value::Type(TypeId::INT), Value::Type(derived)])).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn class_capability_added_after_instances_exist() {
    let mut rt = Runtime::new();
    let point = rt.define_class("Point", None, []);
    let p = rt.call(&Value::Type(point), CallArguments::new()).unwrap();
    let size = rt.intern("size");

    assert!(!rt.has_attr(&p, size));
    rt.set_attr(&Value::Type(point), size, Value::Int(2)).unwrap();
    assert_eq!(rt.get_attr(&p, size).unwrap(), Value::Int(2));

    rt.set_attr(&p, size, Value::Int(5)).unwrap();
    assert_eq!(rt.get_attr(&p, size).unwrap(), Value::Int(5));
    rt.del_attr(&p, size).unwrap();
    assert_eq!(rt.get_attr(&p, size).unwrap(), Value::Int(2));
}
