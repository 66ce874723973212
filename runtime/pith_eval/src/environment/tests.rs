use super::*;
use pith_ir::StringInterner;
use pretty_assertions::assert_eq;

#[test]
fn global_writes_visible_through_clones() {
    let interner = StringInterner::new();
    let a = interner.intern("a");
    let scope = GlobalScope::new();
    let other = scope.clone();

    scope.set(a, Value::Int(1));
    assert_eq!(other.get(a), Some(Value::Int(1)));
    assert!(other.same_scope(&scope));
    assert!(!GlobalScope::new().same_scope(&scope));
    assert_eq!(other.remove(a), Some(Value::Int(1)));
    assert!(scope.is_empty());
}

#[test]
fn store_without_declaration_shadows() {
    let interner = StringInterner::new();
    let (f, a) = (interner.intern("f"), interner.intern("a"));
    let globals = GlobalScope::new();
    globals.set(a, Value::Int(0));

    let mut frame = Frame::new(f, globals.clone());
    assert_eq!(frame.load(a), Some(Value::Int(0)));
    frame.store(a, Value::Int(1));
    assert_eq!(frame.load(a), Some(Value::Int(1)));
    assert_eq!(globals.get(a), Some(Value::Int(0)));
}

#[test]
fn declared_global_writes_through() {
    let interner = StringInterner::new();
    let (f, a, b) = (interner.intern("f"), interner.intern("a"), interner.intern("b"));
    let globals = GlobalScope::new();

    let mut frame = Frame::new(f, globals.clone());
    frame.declare_global(a);
    frame.declare_global(b);
    frame.store(a, Value::Int(1));
    frame.store(b, Value::Int(2));

    assert_eq!(globals.get(a), Some(Value::Int(1)));
    assert_eq!(globals.get(b), Some(Value::Int(2)));
    assert_eq!(frame.local_count(), 0);
}

#[test]
fn declared_global_hides_local() {
    let interner = StringInterner::new();
    let (f, a) = (interner.intern("f"), interner.intern("a"));
    let globals = GlobalScope::new();
    let mut frame = Frame::new(f, globals.clone());

    frame.store(a, Value::Int(1));
    frame.declare_global(a);
    assert_eq!(frame.load(a), None);
    globals.set(a, Value::Int(2));
    assert_eq!(frame.load(a), Some(Value::Int(2)));
    assert_eq!(frame.local(a), Some(&Value::Int(1)));
}

#[test]
fn frame_from_bound_arguments() {
    let interner = StringInterner::new();
    let (f, x) = (interner.intern("f"), interner.intern("x"));
    let mut bound = BoundArguments::with_capacity(1);
    bound.push(x, Value::string("c"));

    let mut frame = Frame::with_arguments(f, GlobalScope::new(), bound);
    assert_eq!(frame.function(), f);
    assert_eq!(frame.load(x), Some(Value::string("c")));
    assert_eq!(frame.delete(x), Some(Value::string("c")));
    assert_eq!(frame.load(x), None);
}
