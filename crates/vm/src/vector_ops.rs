//! Vector builtins

use std::rc::Rc;

use schist_core::value::SchemeVector;
use schist_core::{Env, Result, SchemeError, Value, list_from_vec};

use crate::args;
use crate::builtins::bind;

pub fn install(env: &Rc<Env>) {
    bind(env, "vector?", vector_p);
    bind(env, "make-vector", make_vector);
    bind(env, "vector", vector);
    bind(env, "vector-length", vector_length);
    bind(env, "vector-ref", vector_ref);
    bind(env, "vector-set!", vector_set);
    bind(env, "vector->list", vector_to_list);
    bind(env, "list->vector", list_to_vector);
    bind(env, "vector-fill!", vector_fill);
}

fn vector_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("vector?", 1, arguments)?;
    Ok(Value::Boolean(matches!(arguments[0], Value::Vector(_))))
}

fn make_vector(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::between("make-vector", 1, 2, arguments)?;
    let len = args::index("make-vector", &arguments[0])?;
    let fill = arguments.get(1).cloned().unwrap_or(Value::Void);
    Ok(Value::Vector(SchemeVector::new(vec![fill; len])))
}

fn vector(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    Ok(Value::Vector(SchemeVector::new(arguments.to_vec())))
}

fn vector_length(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("vector-length", 1, arguments)?;
    let v = args::vector("vector-length", &arguments[0])?;
    Ok(Value::from_i64(v.len() as i64))
}

fn vector_ref(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("vector-ref", 2, arguments)?;
    let v = args::vector("vector-ref", &arguments[0])?;
    let k = args::index("vector-ref", &arguments[1])?;
    v.get(k).ok_or(SchemeError::IndexOutOfRange {
        procedure: "vector-ref",
        index: k.to_string(),
    })
}

fn vector_set(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("vector-set!", 3, arguments)?;
    let v = args::vector("vector-set!", &arguments[0])?;
    let k = args::index("vector-set!", &arguments[1])?;
    v.set(k, arguments[2].clone())?;
    Ok(Value::Void)
}

fn vector_to_list(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("vector->list", 1, arguments)?;
    let v = args::vector("vector->list", &arguments[0])?;
    Ok(list_from_vec(v.items()))
}

fn list_to_vector(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("list->vector", 1, arguments)?;
    let items = args::list("list->vector", &arguments[0])?;
    Ok(Value::Vector(SchemeVector::new(items)))
}

fn vector_fill(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("vector-fill!", 2, arguments)?;
    let v = args::vector("vector-fill!", &arguments[0])?;
    v.fill(arguments[1].clone())?;
    Ok(Value::Void)
}
