//! Control and higher-order builtins
//!
//! `apply`, `map`, `for-each`, `force` and `eval` call back into the
//! evaluator through [`machine::apply_procedure`]/[`machine::eval`] on a
//! fresh frame stack; a continuation captured during such a nested run
//! snapshots that nested computation.

use std::rc::Rc;

use schist_core::{Env, Result, SchemeError, Symbol, Value, display_str};

use crate::args;
use crate::builtins::bind;
use crate::machine;

pub fn install(env: &Rc<Env>) {
    bind(env, "procedure?", procedure_p);
    bind(env, "apply", apply);
    bind(env, "map", map);
    bind(env, "for-each", for_each);
    bind(env, "force", force);
    bind(env, "error", error);
    bind(env, "eval", eval);
    bind(env, "gensym", gensym);
    bind(env, "void", void);
    bind(env, "void?", void_p);
}

fn procedure_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("procedure?", 1, arguments)?;
    Ok(Value::Boolean(matches!(arguments[0], Value::Procedure(_))))
}

/// `(apply proc a b ... rest)`: the final argument is a list of trailing
/// arguments.
fn apply(env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::at_least("apply", 2, arguments)?;
    let procedure = &arguments[0];
    let mut call_args = arguments[1..arguments.len() - 1].to_vec();
    call_args.extend(args::list("apply", &arguments[arguments.len() - 1])?);
    machine::apply_procedure(procedure, call_args, env)
}

fn spread(name: &'static str, arguments: &[Value]) -> Result<Vec<Vec<Value>>> {
    let lists = arguments[1..]
        .iter()
        .map(|l| args::list(name, l))
        .collect::<Result<Vec<_>>>()?;
    if lists.windows(2).any(|w| w[0].len() != w[1].len()) {
        return Err(SchemeError::eval(format!(
            "{name}: lists must have the same length"
        )));
    }
    Ok(lists)
}

/// Ordered left-to-right application over the lists, pointwise.
fn map(env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::at_least("map", 2, arguments)?;
    let lists = spread("map", arguments)?;
    let mut out = Vec::with_capacity(lists[0].len());
    for i in 0..lists[0].len() {
        let row: Vec<Value> = lists.iter().map(|l| l[i].clone()).collect();
        out.push(machine::apply_procedure(&arguments[0], row, env)?);
    }
    Ok(schist_core::list_from_vec(out))
}

fn for_each(env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::at_least("for-each", 2, arguments)?;
    let lists = spread("for-each", arguments)?;
    for i in 0..lists[0].len() {
        let row: Vec<Value> = lists.iter().map(|l| l[i].clone()).collect();
        machine::apply_procedure(&arguments[0], row, env)?;
    }
    Ok(Value::Void)
}

/// Evaluate a promise's body in its captured environment, once; later
/// forces reuse the cached value. Non-promises pass through.
fn force(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("force", 1, arguments)?;
    match &arguments[0] {
        Value::Promise(promise) => {
            if let Some(value) = promise.memo.borrow().clone() {
                return Ok(value);
            }
            let value = machine::eval(&promise.body, &promise.env)?;
            *promise.memo.borrow_mut() = Some(value.clone());
            Ok(value)
        }
        other => Ok(other.clone()),
    }
}

fn error(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::at_least("error", 1, arguments)?;
    let message = arguments
        .iter()
        .map(display_str)
        .collect::<Vec<_>>()
        .join(" ");
    Err(SchemeError::User(message))
}

/// Evaluate an already-parsed datum in the calling environment.
fn eval(env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("eval", 1, arguments)?;
    machine::eval(&arguments[0], env)
}

fn gensym(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("gensym", 0, arguments)?;
    Ok(Value::Symbol(Symbol::uninterned("g")))
}

fn void(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("void", 0, arguments)?;
    Ok(Value::Void)
}

fn void_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("void?", 1, arguments)?;
    Ok(Value::Boolean(matches!(arguments[0], Value::Void)))
}
