//! The global builtin function table: comparison and arithmetic operators.
//! Built once, passed by reference — no process-wide registry or global
//! mutable singleton.

use crate::connective::*;
use crate::error::AdlError;
use crate::term::Value;

/// Apply a builtin if `name` names one; `None` means "not a builtin",
/// letting the caller fall through to a fluent lookup or domain funcdef.
pub fn apply_builtin(name: &str, args: &[Value]) -> Option<Result<Value, AdlError>> {
    if is_comparison(name) {
        return Some(apply_comparison(name, args));
    }
    if is_arithmetic(name) {
        return Some(apply_arithmetic(name, args));
    }
    None
}

fn expect_arity(name: &str, args: &[Value], n: usize) -> Result<(), AdlError> {
    if args.len() != n {
        Err(AdlError::Arity {
            symbol: name.to_string(),
            expected: n,
            got: args.len(),
        })
    } else {
        Ok(())
    }
}

fn apply_comparison(name: &str, args: &[Value]) -> Result<Value, AdlError> {
    expect_arity(name, args, 2)?;
    if name == EQ || name == NE {
        let eq = args[0] == args[1];
        return Ok(Value::Bool(if name == EQ { eq } else { !eq }));
    }
    let a = args[0].as_f64().ok_or_else(|| AdlError::TypeMismatch {
        expected: "numeric",
        term: format!("{:?}", args[0]),
    })?;
    let b = args[1].as_f64().ok_or_else(|| AdlError::TypeMismatch {
        expected: "numeric",
        term: format!("{:?}", args[1]),
    })?;
    let result = match name {
        LT => a < b,
        LE => a <= b,
        GT => a > b,
        GE => a >= b,
        _ => unreachable!("apply_comparison called with non-comparison name"),
    };
    Ok(Value::Bool(result))
}

fn apply_arithmetic(name: &str, args: &[Value]) -> Result<Value, AdlError> {
    expect_arity(name, args, 2)?;
    let both_int = matches!((&args[0], &args[1]), (Value::Int(_), Value::Int(_)));
    let a = args[0].as_f64().ok_or_else(|| AdlError::TypeMismatch {
        expected: "numeric",
        term: format!("{:?}", args[0]),
    })?;
    let b = args[1].as_f64().ok_or_else(|| AdlError::TypeMismatch {
        expected: "numeric",
        term: format!("{:?}", args[1]),
    })?;
    if name == DIV && b == 0.0 {
        return Err(AdlError::TypeMismatch {
            expected: "nonzero divisor",
            term: "0".to_string(),
        });
    }
    let r = match name {
        PLUS => a + b,
        MINUS => a - b,
        TIMES => a * b,
        DIV => a / b,
        _ => unreachable!("apply_arithmetic called with non-arithmetic name"),
    };
    if both_int && name != DIV {
        Ok(Value::Int(r as i64))
    } else {
        Ok(Value::Float(r))
    }
}
