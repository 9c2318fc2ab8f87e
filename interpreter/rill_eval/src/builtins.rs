//! Built-in functions.
//!
//! Installed into the global scope as `Value::Native` bindings. Arithmetic
//! is checked; overflow and division by zero surface as evaluation errors,
//! never as panics.

use rill_ir::StringInterner;

use crate::errors::{arity_mismatch, division_by_zero, integer_overflow, type_mismatch};
use crate::{Environment, EvalError, Mutability, Value};

fn expect_int(value: &Value) -> Result<i64, EvalError> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(type_mismatch("int", other.type_name())),
    }
}

fn expect_two(name: &'static str, args: &[Value]) -> Result<(), EvalError> {
    if args.len() == 2 {
        Ok(())
    } else {
        Err(arity_mismatch(name, 2, args.len()))
    }
}

fn add(args: &[Value]) -> Result<Value, EvalError> {
    expect_two("add", args)?;
    let (a, b) = (expect_int(&args[0])?, expect_int(&args[1])?);
    a.checked_add(b)
        .map(Value::Int)
        .ok_or_else(|| integer_overflow("add"))
}

fn sub(args: &[Value]) -> Result<Value, EvalError> {
    expect_two("sub", args)?;
    let (a, b) = (expect_int(&args[0])?, expect_int(&args[1])?);
    a.checked_sub(b)
        .map(Value::Int)
        .ok_or_else(|| integer_overflow("sub"))
}

fn mul(args: &[Value]) -> Result<Value, EvalError> {
    expect_two("mul", args)?;
    let (a, b) = (expect_int(&args[0])?, expect_int(&args[1])?);
    a.checked_mul(b)
        .map(Value::Int)
        .ok_or_else(|| integer_overflow("mul"))
}

fn div(args: &[Value]) -> Result<Value, EvalError> {
    expect_two("div", args)?;
    let (a, b) = (expect_int(&args[0])?, expect_int(&args[1])?);
    if b == 0 {
        return Err(division_by_zero());
    }
    a.checked_div(b)
        .map(Value::Int)
        .ok_or_else(|| integer_overflow("div"))
}

fn gt(args: &[Value]) -> Result<Value, EvalError> {
    expect_two("gt", args)?;
    Ok(Value::Bool(expect_int(&args[0])? > expect_int(&args[1])?))
}

fn lt(args: &[Value]) -> Result<Value, EvalError> {
    expect_two("lt", args)?;
    Ok(Value::Bool(expect_int(&args[0])? < expect_int(&args[1])?))
}

fn eq(args: &[Value]) -> Result<Value, EvalError> {
    expect_two("eq", args)?;
    Ok(Value::Bool(args[0] == args[1]))
}

fn not(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(arity_mismatch("not", 1, args.len()));
    }
    match &args[0] {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        other => Err(type_mismatch("bool", other.type_name())),
    }
}

fn len(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(arity_mismatch("len", 1, args.len()));
    }
    let n = match &args[0] {
        Value::Str(s) => s.len(),
        Value::List(items) => items.len(),
        other => return Err(type_mismatch("str or list", other.type_name())),
    };
    i64::try_from(n)
        .map(Value::Int)
        .map_err(|_| integer_overflow("len"))
}

/// Install all built-in functions into the environment's global scope.
pub fn install_builtins(env: &mut Environment, interner: &StringInterner) {
    const BUILTINS: &[(&str, crate::NativeFn)] = &[
        ("add", add),
        ("sub", sub),
        ("mul", mul),
        ("div", div),
        ("gt", gt),
        ("lt", lt),
        ("eq", eq),
        ("not", not),
        ("len", len),
    ];
    for (name, f) in BUILTINS {
        env.define_global(
            interner.intern(name),
            Value::Native(*f, name),
            Mutability::Immutable,
        );
    }
}
