use pith_ir::TypeId;
use pith_value::{CallArguments, ErrorKind, Value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::runtime::Runtime;

#[test]
fn set_then_get_on_object() {
    let mut rt = Runtime::new();
    let b = rt.intern("b");
    let obj = Value::instance(TypeId::OBJECT);

    assert!(!rt.has_attr(&obj, b));
    rt.set_attr(&obj, b, Value::Int(1)).expect("objects accept attributes");
    assert!(rt.has_attr(&obj, b));
    assert_eq!(rt.get_attr(&obj, b).expect("present"), Value::Int(1));
}

#[test]
fn set_on_mapping_object() {
    let mut rt = Runtime::new();
    let b = rt.intern("b");
    let dict = Value::dict();
    rt.set_attr(&dict, b, Value::Int(2)).expect("dict instances accept attributes");
    assert_eq!(rt.get_attr(&dict, b).expect("present"), Value::Int(2));
    assert_eq!(dict.as_mapping().map(pith_value::Mapping::len), Some(0));
}

#[test]
fn missing_attribute_error() {
    let rt = Runtime::new();
    let c = rt.intern("c");
    let err = rt
        .get_attr(&Value::instance(TypeId::OBJECT), c)
        .expect_err("absent");
    assert_eq!(err.type_id, TypeId::ATTRIBUTE_ERROR);
    assert_eq!(err.message, "type 'object' has no attribute 'c'");
}

#[test]
fn get_attr_or_never_fails() {
    let rt = Runtime::new();
    let c = rt.intern("c");
    assert_eq!(
        rt.get_attr_or(&Value::Int(1), c, Value::string("fallback")),
        Value::string("fallback")
    );
}

#[test]
fn scalars_reject_assignment() {
    let mut rt = Runtime::new();
    let a = rt.intern("a");
    for value in [
        Value::Int(1),
        Value::Float(1.5),
        Value::string("s"),
        Value::tuple(vec![]),
        Value::None,
    ] {
        let err = rt.set_attr(&value, a, Value::Int(0)).expect_err("immutable");
        assert!(matches!(err.kind, ErrorKind::CannotSetAttribute { .. }));
        assert_eq!(err.message, "cannot set attribute");
    }
}

#[test]
fn type_methods_bind_to_instance() {
    let mut rt = Runtime::new();
    let add = rt.intern("__add__");
    let bound = rt.get_attr(&Value::Int(1), add).expect("int has __add__");
    assert!(matches!(bound, Value::BoundMethod(_)));
    let result = rt
        .call(&bound, CallArguments::positional(vec![Value::Int(2)]))
        .expect("call");
    assert_eq!(result, Value::Int(3));
}

#[test]
fn type_methods_unbound_through_type() {
    let mut rt = Runtime::new();
    let add = rt.intern("__add__");
    let ty = Value::Type(rt.type_of(&Value::Int(1)));
    let unbound = rt.get_attr(&ty, add).expect("int.__add__");
    assert!(matches!(unbound, Value::Native(_)));
    let result = rt
        .call(&unbound, CallArguments::positional(vec![Value::Int(1), Value::Int(2)]))
        .expect("call");
    assert_eq!(result, Value::Int(3));
}

#[test]
fn synthetic_type_attributes() {
    let mut rt = Runtime::new();
    let (name, base, doc) = (rt.intern("__name__"), rt.intern("__base__"), rt.intern("__doc__"));
    let key_error = Value::Type(TypeId::KEY_ERROR);

    assert_eq!(rt.get_attr(&key_error, name).expect("name"), Value::string("KeyError"));
    assert_eq!(
        rt.get_attr(&key_error, base).expect("base"),
        Value::Type(TypeId::LOOKUP_ERROR)
    );
    assert_eq!(rt.get_attr(&Value::Type(TypeId::OBJECT), base).expect("base"), Value::None);

    let ty = rt.define_class("Doc", None, []);
    rt.set_attr(&Value::Type(ty), doc, Value::string("A class."))
        .expect("type doc");
    assert_eq!(rt.get_attr(&Value::Type(ty), doc).expect("doc"), Value::string("A class."));
}

#[test]
fn class_attribute_visible_to_instances() {
    let mut rt = Runtime::new();
    let x = rt.intern("x");
    let base = rt.define_class("Base", None, []);
    let derived = rt.define_class("Derived", Some(base), []);
    rt.set_attr(&Value::Type(base), x, Value::Int(7)).expect("class attribute");

    let instance = Value::instance(derived);
    assert_eq!(rt.get_attr(&instance, x).expect("inherited"), Value::Int(7));

    rt.set_attr(&instance, x, Value::Int(8)).expect("own attribute");
    assert_eq!(rt.get_attr(&instance, x).expect("own wins"), Value::Int(8));
    assert_eq!(
        rt.get_attr(&Value::instance(derived), x).expect("class value"),
        Value::Int(7)
    );
}

#[test]
fn class_attribute_of_instance() {
    let rt = Runtime::new();
    let class = rt.intern("__class__");
    assert_eq!(
        rt.get_attr(&Value::Float(1.0), class).expect("class"),
        Value::Type(TypeId::FLOAT)
    );
}

#[test]
fn function_attributes() {
    let mut rt = Runtime::new();
    let (tag, name, doc) = (rt.intern("tag"), rt.intern("__name__"), rt.intern("__doc__"));
    let f = rt
        .define_function("f", vec![], Some("Docs."), |_, _| Ok(Value::None))
        .expect("define");

    assert_eq!(rt.get_attr(&f, name).expect("name"), Value::string("f"));
    assert_eq!(rt.get_attr(&f, doc).expect("doc"), Value::string("Docs."));
    rt.set_attr(&f, tag, Value::Bool(true)).expect("function attrs");
    assert_eq!(rt.get_attr(&f, tag).expect("tag"), Value::Bool(true));
}

#[test]
fn del_attr_removes_own_only() {
    let mut rt = Runtime::new();
    let a = rt.intern("a");
    let obj = Value::instance(TypeId::OBJECT);
    rt.set_attr(&obj, a, Value::Int(1)).expect("set");
    rt.del_attr(&obj, a).expect("delete");
    assert!(!rt.has_attr(&obj, a));

    let err = rt.del_attr(&obj, a).expect_err("already gone");
    assert_eq!(err.type_id, TypeId::ATTRIBUTE_ERROR);

    let err = rt.del_attr(&Value::Int(1), a).expect_err("immutable");
    assert!(matches!(err.kind, ErrorKind::CannotDeleteAttribute { .. }));
}

#[test]
fn synthetic_type_attributes_are_read_only() {
    let mut rt = Runtime::new();
    let (name, base, doc) = (rt.intern("__name__"), rt.intern("__base__"), rt.intern("__doc__"));
    let ty = Value::Type(rt.define_class("A", None, []));

    for (attr, value) in [
        (name, Value::string("B")),
        (base, Value::Type(TypeId::INT)),
        (doc, Value::Int(5)),
    ] {
        let err = rt.set_attr(&ty, attr, value).expect_err("read-only");
        assert!(matches!(err.kind, ErrorKind::CannotSetAttribute { .. }));
    }
    assert_eq!(rt.get_attr(&ty, name).expect("name"), Value::string("A"));
    assert_eq!(rt.get_attr(&ty, base).expect("base"), Value::Type(TypeId::OBJECT));
    assert_eq!(rt.get_attr(&ty, doc).expect("doc"), Value::None);
}

#[derive(Clone, Copy, Debug)]
enum Subject {
    Int,
    Str,
    Tuple,
    Object,
    UserInstance,
    Dict,
    List,
    Function,
    Native,
    BoundMethod,
    BuiltinType,
    UserType,
    Error,
}

const SUBJECTS: [Subject; 13] = [
    Subject::Int,
    Subject::Str,
    Subject::Tuple,
    Subject::Object,
    Subject::UserInstance,
    Subject::Dict,
    Subject::List,
    Subject::Function,
    Subject::Native,
    Subject::BoundMethod,
    Subject::BuiltinType,
    Subject::UserType,
    Subject::Error,
];

fn make(rt: &mut Runtime, subject: Subject, n: i64) -> Value {
    match subject {
        Subject::Int => Value::Int(n),
        Subject::Str => Value::string(n.to_string()),
        Subject::Tuple => Value::tuple(vec![Value::Int(n)]),
        Subject::Object => Value::instance(TypeId::OBJECT),
        Subject::UserInstance => {
            let ty = rt.define_class("User", None, []);
            rt.call(&Value::Type(ty), CallArguments::new()).expect("instance")
        }
        Subject::Dict => Value::dict(),
        Subject::List => Value::list(vec![Value::Int(n)]),
        Subject::Function => rt
            .define_function("f", vec![], None, |_, _| Ok(Value::None))
            .expect("define"),
        Subject::Native => {
            let len = rt.intern("len");
            rt.builtin(len).expect("len")
        }
        Subject::BoundMethod => {
            let add = rt.intern("__add__");
            rt.get_attr(&Value::Int(n), add).expect("bound")
        }
        Subject::BuiltinType => Value::Type(TypeId::DICT),
        Subject::UserType => Value::Type(rt.define_class("User", None, [])),
        Subject::Error => Value::error(rt.raise(TypeId::KEY_ERROR, Value::Int(n))),
    }
}

fn accepts_attributes(subject: Subject) -> bool {
    !matches!(
        subject,
        Subject::Int
            | Subject::Str
            | Subject::Tuple
            | Subject::Native
            | Subject::BoundMethod
            | Subject::Error
    )
}

proptest! {
    #[test]
    fn set_then_get_round_trips(
        subject in prop::sample::select(SUBJECTS.to_vec()),
        attr in prop::sample::select(vec!["tag", "__name__", "__doc__", "__base__", "__class__"]),
        n in any::<i64>(),
        as_string in any::<bool>(),
    ) {
        let mut rt = Runtime::new();
        let obj = make(&mut rt, subject, n);
        let name = rt.intern(attr);
        let value = if as_string { Value::string(n.to_string()) } else { Value::Int(n) };

        if rt.set_attr(&obj, name, value.clone()).is_ok() {
            prop_assert_eq!(rt.get_attr(&obj, name).expect("just set"), value);
            prop_assert!(rt.has_attr(&obj, name));
        }
    }

    #[test]
    fn has_attr_tracks_set(
        subject in prop::sample::select(SUBJECTS.to_vec()),
        n in any::<i64>(),
    ) {
        let mut rt = Runtime::new();
        let obj = make(&mut rt, subject, n);
        let name = rt.intern("fresh_attribute");

        prop_assert!(!rt.has_attr(&obj, name));
        let result = rt.set_attr(&obj, name, Value::Int(n));
        prop_assert_eq!(result.is_ok(), accepts_attributes(subject));
        prop_assert_eq!(rt.has_attr(&obj, name), accepts_attributes(subject));
        if let Err(err) = result {
            prop_assert!(matches!(err.kind, ErrorKind::CannotSetAttribute { .. }), "unexpected error kind");
        }
    }
}
