//! Argument checking for builtin procedures
//!
//! Builtins convert `Value` arguments at the host boundary; a failure here
//! is a bind error and surfaces as an evaluation error naming the procedure.

use std::rc::Rc;

use schist_core::value::{SchemeString, SchemeVector};
use schist_core::{Number, Pair, Port, Result, SchemeError, Symbol, Value, list_to_vec};

pub fn exactly(procedure: &'static str, n: usize, args: &[Value]) -> Result<()> {
    if args.len() == n {
        Ok(())
    } else {
        Err(SchemeError::Arity {
            procedure: procedure.to_string(),
            expected: n.to_string(),
            got: args.len(),
        })
    }
}

pub fn at_least(procedure: &'static str, n: usize, args: &[Value]) -> Result<()> {
    if args.len() >= n {
        Ok(())
    } else {
        Err(SchemeError::Arity {
            procedure: procedure.to_string(),
            expected: format!("at least {n}"),
            got: args.len(),
        })
    }
}

pub fn between(procedure: &'static str, lo: usize, hi: usize, args: &[Value]) -> Result<()> {
    if (lo..=hi).contains(&args.len()) {
        Ok(())
    } else {
        Err(SchemeError::Arity {
            procedure: procedure.to_string(),
            expected: format!("{lo} to {hi}"),
            got: args.len(),
        })
    }
}

fn wrong_type(procedure: &'static str, expected: &'static str, got: &Value) -> SchemeError {
    SchemeError::WrongType {
        procedure,
        expected,
        got: got.type_name().to_string(),
    }
}

pub fn number(procedure: &'static str, value: &Value) -> Result<Rc<Number>> {
    match value {
        Value::Number(n) => Ok(n.clone()),
        other => Err(wrong_type(procedure, "number", other)),
    }
}

pub fn character(procedure: &'static str, value: &Value) -> Result<char> {
    match value {
        Value::Character(ch) => Ok(*ch),
        other => Err(wrong_type(procedure, "character", other)),
    }
}

pub fn string(procedure: &'static str, value: &Value) -> Result<Rc<SchemeString>> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(wrong_type(procedure, "string", other)),
    }
}

pub fn symbol(procedure: &'static str, value: &Value) -> Result<Symbol> {
    match value {
        Value::Symbol(sym) => Ok(sym.clone()),
        other => Err(wrong_type(procedure, "symbol", other)),
    }
}

pub fn pair(procedure: &'static str, value: &Value) -> Result<Rc<Pair>> {
    match value {
        Value::Pair(p) => Ok(p.clone()),
        other => Err(wrong_type(procedure, "pair", other)),
    }
}

pub fn vector(procedure: &'static str, value: &Value) -> Result<Rc<SchemeVector>> {
    match value {
        Value::Vector(v) => Ok(v.clone()),
        other => Err(wrong_type(procedure, "vector", other)),
    }
}

pub fn port(procedure: &'static str, value: &Value) -> Result<Rc<Port>> {
    match value {
        Value::Port(p) => Ok(p.clone()),
        other => Err(wrong_type(procedure, "port", other)),
    }
}

/// A proper list, collected. Rejects improper and cyclic chains.
pub fn list(procedure: &'static str, value: &Value) -> Result<Vec<Value>> {
    list_to_vec(value).ok_or_else(|| wrong_type(procedure, "proper list", value))
}

/// A nonnegative index that fits the host.
pub fn index(procedure: &'static str, value: &Value) -> Result<usize> {
    let n = number(procedure, value)?;
    n.to_i64()
        .filter(|i| *i >= 0)
        .map(|i| i as usize)
        .ok_or_else(|| SchemeError::IndexOutOfRange {
            procedure,
            index: n.to_string(),
        })
}
