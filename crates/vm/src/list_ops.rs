//! Pair and list builtins

use std::rc::Rc;

use schist_core::{Env, Pair, Result, SchemeError, Value, is_proper_list, list_from_vec};

use crate::args;
use crate::builtins::bind;

pub fn install(env: &Rc<Env>) {
    bind(env, "null?", null_p);
    bind(env, "pair?", pair_p);
    bind(env, "list?", list_p);
    bind(env, "cons", cons);
    bind(env, "car", car);
    bind(env, "cdr", cdr);
    bind(env, "set-car!", set_car);
    bind(env, "set-cdr!", set_cdr);
    bind(env, "length", length);
    bind(env, "list", list);
    bind(env, "append", append);
    bind(env, "reverse", reverse);
    bind(env, "list-tail", list_tail);
    bind(env, "list-ref", list_ref);
}

fn null_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("null?", 1, arguments)?;
    Ok(Value::Boolean(matches!(arguments[0], Value::Null)))
}

fn pair_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("pair?", 1, arguments)?;
    Ok(Value::Boolean(matches!(arguments[0], Value::Pair(_))))
}

fn list_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("list?", 1, arguments)?;
    Ok(Value::Boolean(is_proper_list(&arguments[0])))
}

fn cons(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("cons", 2, arguments)?;
    Ok(Value::Pair(Pair::cons(
        arguments[0].clone(),
        arguments[1].clone(),
    )))
}

fn car(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("car", 1, arguments)?;
    Ok(args::pair("car", &arguments[0])?.car())
}

fn cdr(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("cdr", 1, arguments)?;
    Ok(args::pair("cdr", &arguments[0])?.cdr())
}

fn set_car(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("set-car!", 2, arguments)?;
    args::pair("set-car!", &arguments[0])?.set_car(arguments[1].clone())?;
    Ok(Value::Void)
}

fn set_cdr(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("set-cdr!", 2, arguments)?;
    args::pair("set-cdr!", &arguments[0])?.set_cdr(arguments[1].clone())?;
    Ok(Value::Void)
}

fn length(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("length", 1, arguments)?;
    let items = args::list("length", &arguments[0])?;
    Ok(Value::from_i64(items.len() as i64))
}

fn list(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    Ok(list_from_vec(arguments.to_vec()))
}

/// All arguments but the last must be proper lists; the last becomes the
/// tail unchanged, so the result is improper when it is.
fn append(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    let Some((last, front)) = arguments.split_last() else {
        return Ok(Value::Null);
    };
    let mut items = Vec::new();
    for value in front {
        items.extend(args::list("append", value)?);
    }
    let mut out = last.clone();
    for item in items.into_iter().rev() {
        out = Value::Pair(Pair::cons(item, out));
    }
    Ok(out)
}

fn reverse(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("reverse", 1, arguments)?;
    let mut items = args::list("reverse", &arguments[0])?;
    items.reverse();
    Ok(list_from_vec(items))
}

fn tail_from(name: &'static str, list: &Value, k: usize) -> Result<Value> {
    let mut cursor = list.clone();
    for _ in 0..k {
        cursor = match cursor {
            Value::Pair(p) => p.cdr(),
            _ => {
                return Err(SchemeError::IndexOutOfRange {
                    procedure: name,
                    index: k.to_string(),
                });
            }
        };
    }
    Ok(cursor)
}

fn list_tail(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("list-tail", 2, arguments)?;
    let k = args::index("list-tail", &arguments[1])?;
    tail_from("list-tail", &arguments[0], k)
}

fn list_ref(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("list-ref", 2, arguments)?;
    let k = args::index("list-ref", &arguments[1])?;
    match tail_from("list-ref", &arguments[0], k)? {
        Value::Pair(p) => Ok(p.car()),
        _ => Err(SchemeError::IndexOutOfRange {
            procedure: "list-ref",
            index: k.to_string(),
        }),
    }
}
