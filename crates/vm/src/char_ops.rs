//! Character builtins

use std::cmp::Ordering;
use std::rc::Rc;

use schist_core::{Env, Result, SchemeError, Value};

use crate::args;
use crate::builtins::bind;

pub fn install(env: &Rc<Env>) {
    bind(env, "char?", char_p);
    bind(env, "char=?", char_eq);
    bind(env, "char<?", char_lt);
    bind(env, "char<=?", char_le);
    bind(env, "char>?", char_gt);
    bind(env, "char>=?", char_ge);
    bind(env, "char-ci=?", char_ci_eq);
    bind(env, "char-ci<?", char_ci_lt);
    bind(env, "char-ci<=?", char_ci_le);
    bind(env, "char-ci>?", char_ci_gt);
    bind(env, "char-ci>=?", char_ci_ge);
    bind(env, "char-alphabetic?", char_alphabetic);
    bind(env, "char-numeric?", char_numeric);
    bind(env, "char-whitespace?", char_whitespace);
    bind(env, "char-upper-case?", char_upper);
    bind(env, "char-lower-case?", char_lower);
    bind(env, "char->integer", char_to_integer);
    bind(env, "integer->char", integer_to_char);
    bind(env, "char-upcase", char_upcase);
    bind(env, "char-downcase", char_downcase);
}

fn char_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("char?", 1, arguments)?;
    Ok(Value::Boolean(matches!(arguments[0], Value::Character(_))))
}

/// Unicode case mapping; multi-character expansions leave the input as is.
fn upcase(ch: char) -> char {
    let mut it = ch.to_uppercase();
    match (it.next(), it.next()) {
        (Some(up), None) => up,
        _ => ch,
    }
}

fn downcase(ch: char) -> char {
    let mut it = ch.to_lowercase();
    match (it.next(), it.next()) {
        (Some(low), None) => low,
        _ => ch,
    }
}

fn compare_chain(
    name: &'static str,
    arguments: &[Value],
    ci: bool,
    accept: fn(Ordering) -> bool,
) -> Result<Value> {
    args::at_least(name, 2, arguments)?;
    let mut chars = Vec::with_capacity(arguments.len());
    for value in arguments {
        let ch = args::character(name, value)?;
        chars.push(if ci { downcase(ch) } else { ch });
    }
    let holds = chars.windows(2).all(|w| accept(w[0].cmp(&w[1])));
    Ok(Value::Boolean(holds))
}

fn char_eq(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("char=?", a, false, |o| o == Ordering::Equal)
}

fn char_lt(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("char<?", a, false, |o| o == Ordering::Less)
}

fn char_le(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("char<=?", a, false, |o| o != Ordering::Greater)
}

fn char_gt(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("char>?", a, false, |o| o == Ordering::Greater)
}

fn char_ge(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("char>=?", a, false, |o| o != Ordering::Less)
}

fn char_ci_eq(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("char-ci=?", a, true, |o| o == Ordering::Equal)
}

fn char_ci_lt(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("char-ci<?", a, true, |o| o == Ordering::Less)
}

fn char_ci_le(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("char-ci<=?", a, true, |o| o != Ordering::Greater)
}

fn char_ci_gt(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("char-ci>?", a, true, |o| o == Ordering::Greater)
}

fn char_ci_ge(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("char-ci>=?", a, true, |o| o != Ordering::Less)
}

fn classify(
    name: &'static str,
    arguments: &[Value],
    test: fn(char) -> bool,
) -> Result<Value> {
    args::exactly(name, 1, arguments)?;
    Ok(Value::Boolean(test(args::character(name, &arguments[0])?)))
}

fn char_alphabetic(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    classify("char-alphabetic?", a, char::is_alphabetic)
}

fn char_numeric(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    classify("char-numeric?", a, char::is_numeric)
}

fn char_whitespace(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    classify("char-whitespace?", a, char::is_whitespace)
}

fn char_upper(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    classify("char-upper-case?", a, char::is_uppercase)
}

fn char_lower(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    classify("char-lower-case?", a, char::is_lowercase)
}

fn char_to_integer(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("char->integer", 1, arguments)?;
    let ch = args::character("char->integer", &arguments[0])?;
    Ok(Value::from_i64(ch as i64))
}

fn integer_to_char(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("integer->char", 1, arguments)?;
    let n = args::index("integer->char", &arguments[0])?;
    u32::try_from(n)
        .ok()
        .and_then(char::from_u32)
        .map(Value::Character)
        .ok_or_else(|| SchemeError::eval(format!("integer->char: {n} is not a scalar value")))
}

fn char_upcase(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("char-upcase", 1, arguments)?;
    Ok(Value::Character(upcase(args::character(
        "char-upcase",
        &arguments[0],
    )?)))
}

fn char_downcase(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("char-downcase", 1, arguments)?;
    Ok(Value::Character(downcase(args::character(
        "char-downcase",
        &arguments[0],
    )?)))
}
