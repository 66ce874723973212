//! `int` and `float` arithmetic.
//!
//! Each type gets its own instantiation of the method bodies, keyed on the
//! receiver type. The receiver must be an instance of the owning type. An
//! `int` receiver with an `int` or `bool` operand stays `int`; any `float`
//! on either side gives `float`.

use pith_ir::TypeId;
use pith_value::{arithmetic_overflow, native_arity, type_mismatch, ErrorValue, EvalResult, Value};

use super::{expect_type, MethodDef};
use crate::runtime::Runtime;

pub(super) const INT_METHODS: &[MethodDef] = &[
    ("__add__", Some(2), add::<false>),
    ("__sub__", Some(2), sub::<false>),
    ("__mul__", Some(2), mul::<false>),
    ("__eq__", Some(2), eq::<false>),
    ("__neg__", Some(1), neg::<false>),
];

pub(super) const FLOAT_METHODS: &[MethodDef] = &[
    ("__add__", Some(2), add::<true>),
    ("__sub__", Some(2), sub::<true>),
    ("__mul__", Some(2), mul::<true>),
    ("__eq__", Some(2), eq::<true>),
    ("__neg__", Some(1), neg::<true>),
];

const fn owner<const FLOAT: bool>() -> TypeId {
    if FLOAT {
        TypeId::FLOAT
    } else {
        TypeId::INT
    }
}

enum Operands {
    Ints(i64, i64),
    Floats(f64, f64),
}

fn operands<const FLOAT: bool>(
    rt: &Runtime,
    name: &str,
    args: &[Value],
) -> Result<Operands, ErrorValue> {
    let [lhs, rhs] = args else {
        return Err(native_arity(name, 2, args.len()));
    };
    expect_type(rt, lhs, owner::<FLOAT>())?;
    if let (Some(a), Some(b), false) = (lhs.as_int(), rhs.as_int(), FLOAT) {
        return Ok(Operands::Ints(a, b));
    }
    match (lhs.as_float(), rhs.as_float()) {
        (Some(a), Some(b)) => Ok(Operands::Floats(a, b)),
        (None, _) => Err(type_mismatch("float", rt.value_type_name(lhs))),
        (_, None) => Err(type_mismatch("float", rt.value_type_name(rhs))),
    }
}

fn add<const FLOAT: bool>(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    match operands::<FLOAT>(rt, "__add__", args)? {
        Operands::Ints(a, b) => a
            .checked_add(b)
            .map(Value::Int)
            .ok_or_else(|| arithmetic_overflow("addition")),
        Operands::Floats(a, b) => Ok(Value::Float(a + b)),
    }
}

fn sub<const FLOAT: bool>(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    match operands::<FLOAT>(rt, "__sub__", args)? {
        Operands::Ints(a, b) => a
            .checked_sub(b)
            .map(Value::Int)
            .ok_or_else(|| arithmetic_overflow("subtraction")),
        Operands::Floats(a, b) => Ok(Value::Float(a - b)),
    }
}

fn mul<const FLOAT: bool>(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    match operands::<FLOAT>(rt, "__mul__", args)? {
        Operands::Ints(a, b) => a
            .checked_mul(b)
            .map(Value::Int)
            .ok_or_else(|| arithmetic_overflow("multiplication")),
        Operands::Floats(a, b) => Ok(Value::Float(a * b)),
    }
}

/// Numeric equality; comparing against a non-number is `False`.
fn eq<const FLOAT: bool>(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    match args {
        [lhs, rhs] => {
            expect_type(rt, lhs, owner::<FLOAT>())?;
            Ok(Value::Bool(lhs == rhs))
        }
        _ => Err(native_arity("__eq__", 2, args.len())),
    }
}

fn neg<const FLOAT: bool>(rt: &mut Runtime, args: &[Value]) -> EvalResult {
    let [receiver] = args else {
        return Err(native_arity("__neg__", 1, args.len()));
    };
    expect_type(rt, receiver, owner::<FLOAT>())?;
    match receiver {
        Value::Int(n) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| arithmetic_overflow("negation")),
        Value::Float(x) => Ok(Value::Float(-x)),
        other => Err(type_mismatch(rt.type_name(owner::<FLOAT>()), rt.value_type_name(other))),
    }
}
