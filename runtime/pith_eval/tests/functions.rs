//! Function definition, argument binding, recursion and global writes,
//! driven through the public runtime API the way an evaluator would.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pith_eval::{CallArguments, EvalResult, Frame, Name, Parameter, Runtime, TypeId, Value};
use pretty_assertions::assert_eq;

fn add(rt: &mut Runtime, lhs: Value, rhs: Value) -> EvalResult {
    let add = rt.intern("__add__");
    rt.fast_call(add, vec![lhs, rhs])
}

fn load(rt: &Runtime, frame: &Frame, name: &str) -> Value {
    rt.load_name(frame, rt.intern(name)).unwrap()
}

fn ints(values: impl IntoIterator<Item = i64>) -> Vec<Value> {
    values.into_iter().map(Value::Int).collect()
}

fn call(rt: &mut Runtime, f: &Value, positional: Vec<Value>, keywords: &[(&str, i64)]) -> EvalResult {
    let mut args = CallArguments::positional(positional);
    for (name, value) in keywords {
        args = args.with_keyword(rt.intern(name), Value::Int(*value));
    }
    rt.call(f, args)
}

#[test]
fn no_argument_function() {
    let mut rt = Runtime::new();
    let f1 = rt
        .define_function("f1", vec![], None, |_, _| Ok(Value::string("f1")))
        .unwrap();
    assert_eq!(rt.call(&f1, CallArguments::new()).unwrap(), Value::string("f1"));
}

#[test]
fn returns_third_of_four() {
    let mut rt = Runtime::new();
    let params = ["a", "b", "c", "d"]
        .iter()
        .map(|p| Parameter::positional(rt.intern(p)))
        .collect();
    let f2 = rt
        .define_function("f2", params, None, |rt, frame| Ok(load(rt, frame, "c")))
        .unwrap();
    let args = ["a", "b", "c", "d"].map(Value::string).to_vec();
    assert_eq!(rt.call(&f2, CallArguments::positional(args)).unwrap(), Value::string("c"));
}

#[test]
fn subtraction() {
    let mut rt = Runtime::new();
    let (a, b) = (rt.intern("a"), rt.intern("b"));
    let f3 = rt
        .define_function(
            "f3",
            vec![Parameter::positional(a), Parameter::positional(b)],
            None,
            |rt, frame| {
                let sub = rt.intern("__sub__");
                let (a, b) = (load(rt, frame, "a"), load(rt, frame, "b"));
                rt.fast_call(sub, vec![a, b])
            },
        )
        .unwrap();
    assert_eq!(call(&mut rt, &f3, ints([1, 2]), &[]).unwrap(), Value::Int(-1));
}

#[test]
fn factorial() {
    let mut rt = Runtime::new();
    let n = rt.intern("n");
    let fact_name = rt.intern("fact");
    let fact = rt
        .define_function("fact", vec![Parameter::positional(n)], None, |rt, frame| {
            let n = load(rt, frame, "n");
            if n == Value::Int(1) {
                return Ok(Value::Int(1));
            }
            let (sub, mul) = (rt.intern("__sub__"), rt.intern("__mul__"));
            let smaller = rt.fast_call(sub, vec![n.clone(), Value::Int(1)])?;
            let fact = load(rt, frame, "fact");
            let rest = rt.call(&fact, CallArguments::positional(vec![smaller]))?;
            rt.fast_call(mul, vec![n, rest])
        })
        .unwrap();
    rt.globals().set(fact_name, fact.clone());
    assert_eq!(call(&mut rt, &fact, ints([5]), &[]).unwrap(), Value::Int(120));
}

/// `def f(a=1, b=-1): return a + b`
fn define_defaults(rt: &mut Runtime) -> Value {
    let (a, b) = (rt.intern("a"), rt.intern("b"));
    rt.define_function(
        "f",
        vec![
            Parameter::positional(a).with_default(Value::Int(1)),
            Parameter::positional(b).with_default(Value::Int(-1)),
        ],
        None,
        |rt, frame| {
            let (a, b) = (load(rt, frame, "a"), load(rt, frame, "b"));
            add(rt, a, b)
        },
    )
    .unwrap()
}

#[test]
fn default_arguments() {
    let mut rt = Runtime::new();
    let f = define_defaults(&mut rt);
    assert_eq!(call(&mut rt, &f, vec![], &[]).unwrap(), Value::Int(0));
    assert_eq!(call(&mut rt, &f, ints([1, 2]), &[]).unwrap(), Value::Int(3));
    assert_eq!(call(&mut rt, &f, ints([-5]), &[]).unwrap(), Value::Int(-6));
    assert_eq!(call(&mut rt, &f, vec![], &[("b", 5)]).unwrap(), Value::Int(6));
    assert_eq!(call(&mut rt, &f, vec![], &[("a", 5)]).unwrap(), Value::Int(4));
    assert_eq!(call(&mut rt, &f, vec![], &[("b", 5), ("a", 5)]).unwrap(), Value::Int(10));
}

/// `def f(a, b, *c, d=2, e=5): return a + b + d + e + sum(c)`
fn define_variadic(rt: &mut Runtime) -> Value {
    let names: Vec<Name> = ["a", "b", "c", "d", "e"].iter().map(|s| rt.intern(s)).collect();
    rt.define_function(
        "f",
        vec![
            Parameter::positional(names[0]),
            Parameter::positional(names[1]),
            Parameter::variadic(names[2]),
            Parameter::keyword_only(names[3]).with_default(Value::Int(2)),
            Parameter::keyword_only(names[4]).with_default(Value::Int(5)),
        ],
        None,
        |rt, frame| {
            let mut total = load(rt, frame, "a");
            for name in ["b", "d", "e"] {
                let next = load(rt, frame, name);
                total = add(rt, total, next)?;
            }
            let sum = load(rt, frame, "sum");
            let c = load(rt, frame, "c");
            let rest = rt.call(&sum, CallArguments::positional(vec![c]))?;
            add(rt, total, rest)
        },
    )
    .unwrap()
}

#[test]
fn variadic_and_keyword_only() {
    let mut rt = Runtime::new();
    let f = define_variadic(&mut rt);
    assert_eq!(call(&mut rt, &f, ints(1..=10), &[]).unwrap(), Value::Int(62));
    assert_eq!(call(&mut rt, &f, ints(1..=10), &[("d", 1), ("e", 2)]).unwrap(), Value::Int(58));
    assert_eq!(call(&mut rt, &f, ints(1..=10), &[("e", 1), ("d", 2)]).unwrap(), Value::Int(58));
    assert_eq!(call(&mut rt, &f, ints(1..=10), &[("d", 1)]).unwrap(), Value::Int(61));
    assert_eq!(call(&mut rt, &f, ints(1..=10), &[("e", 1)]).unwrap(), Value::Int(58));
    assert_eq!(call(&mut rt, &f, ints(1..=20), &[]).unwrap(), Value::Int(217));
    assert_eq!(call(&mut rt, &f, ints(1..=20), &[("d", 1), ("e", 2)]).unwrap(), Value::Int(213));
}

#[test]
fn binding_errors_are_catchable_type_errors() {
    let mut rt = Runtime::new();
    let f = define_defaults(&mut rt);

    let err = call(&mut rt, &f, ints([1, 2, 3]), &[]).unwrap_err();
    assert_eq!(err.type_id, TypeId::TYPE_ERROR);
    assert_eq!(err.message, "f() takes 2 positional arguments but 3 were given");

    let err = call(&mut rt, &f, ints([1]), &[("a", 1)]).unwrap_err();
    assert_eq!(err.message, "f() got multiple values for argument 'a'");

    let err = call(&mut rt, &f, vec![], &[("z", 1)]).unwrap_err();
    assert_eq!(err.message, "f() got an unexpected keyword argument 'z'");
}

#[test]
fn global_declaration() {
    let mut rt = Runtime::new();
    let (a, b) = (rt.intern("a"), rt.intern("b"));
    rt.globals().set(a, Value::Int(1));
    rt.globals().set(b, Value::Int(2));

    let f = rt
        .define_function("f", vec![], None, move |_, frame| {
            frame.declare_global(a);
            frame.declare_global(b);
            frame.store(a, Value::Int(3));
            frame.store(b, Value::Int(4));
            Ok(Value::None)
        })
        .unwrap();
    rt.call(&f, CallArguments::new()).unwrap();

    let module = rt.module_frame();
    assert_eq!(rt.load_name(&module, a).unwrap(), Value::Int(3));
    assert_eq!(rt.load_name(&module, b).unwrap(), Value::Int(4));
}

#[test]
fn shared_default_persists_between_calls() {
    let mut rt = Runtime::new();
    let acc = rt.intern("acc");
    let f = rt
        .define_function(
            "remember",
            vec![Parameter::positional(acc).with_default(Value::list(vec![]))],
            None,
            |rt, frame| {
                let acc = load(rt, frame, "acc");
                let append = rt.intern("append");
                rt.call_method(&acc, append, CallArguments::positional(vec![Value::Int(1)]))?;
                let len = load(rt, frame, "len");
                rt.call(&len, CallArguments::positional(vec![acc]))
            },
        )
        .unwrap();
    assert_eq!(rt.call(&f, CallArguments::new()).unwrap(), Value::Int(1));
    assert_eq!(rt.call(&f, CallArguments::new()).unwrap(), Value::Int(2));
}
