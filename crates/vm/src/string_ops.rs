//! String and symbol builtins
//!
//! Strings are mutable character sequences; comparisons are codepoint-wise.
//! The case-insensitive variants fold with full Unicode lowercasing, same as
//! symbol interning does.

use std::cmp::Ordering;
use std::rc::Rc;

use schist_core::value::SchemeString;
use schist_core::{Env, Result, SchemeError, Symbol, Value, list_from_vec};

use crate::args;
use crate::builtins::bind;

pub fn install(env: &Rc<Env>) {
    bind(env, "symbol?", symbol_p);
    bind(env, "string->symbol", string_to_symbol);
    bind(env, "symbol->string", symbol_to_string);
    bind(env, "string?", string_p);
    bind(env, "make-string", make_string);
    bind(env, "string", string);
    bind(env, "string-length", string_length);
    bind(env, "string-ref", string_ref);
    bind(env, "string-set!", string_set);
    bind(env, "string=?", string_eq);
    bind(env, "string<?", string_lt);
    bind(env, "string<=?", string_le);
    bind(env, "string>?", string_gt);
    bind(env, "string>=?", string_ge);
    bind(env, "string-ci=?", string_ci_eq);
    bind(env, "string-ci<?", string_ci_lt);
    bind(env, "string-ci<=?", string_ci_le);
    bind(env, "string-ci>?", string_ci_gt);
    bind(env, "string-ci>=?", string_ci_ge);
    bind(env, "substring", substring);
    bind(env, "string-append", string_append);
    bind(env, "string->list", string_to_list);
    bind(env, "list->string", list_to_string);
    bind(env, "string-copy", string_copy);
    bind(env, "string-fill!", string_fill);
}

fn symbol_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("symbol?", 1, arguments)?;
    Ok(Value::Boolean(matches!(arguments[0], Value::Symbol(_))))
}

/// Interns through the same case-folding path the reader uses, so
/// `(string->symbol "FOO")` is `eq?` to `'foo`.
fn string_to_symbol(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("string->symbol", 1, arguments)?;
    let s = args::string("string->symbol", &arguments[0])?;
    Ok(Value::Symbol(Symbol::of(&s.to_text())))
}

fn symbol_to_string(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("symbol->string", 1, arguments)?;
    let sym = args::symbol("symbol->string", &arguments[0])?;
    Ok(Value::String(SchemeString::literal(sym.name())))
}

fn string_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("string?", 1, arguments)?;
    Ok(Value::Boolean(matches!(arguments[0], Value::String(_))))
}

fn make_string(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::between("make-string", 1, 2, arguments)?;
    let len = args::index("make-string", &arguments[0])?;
    let fill = match arguments.get(1) {
        Some(ch) => args::character("make-string", ch)?,
        None => ' ',
    };
    Ok(Value::String(SchemeString::new(vec![fill; len])))
}

fn string(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    let chars = arguments
        .iter()
        .map(|v| args::character("string", v))
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::String(SchemeString::new(chars)))
}

fn string_length(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("string-length", 1, arguments)?;
    let s = args::string("string-length", &arguments[0])?;
    Ok(Value::from_i64(s.len() as i64))
}

fn string_ref(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("string-ref", 2, arguments)?;
    let s = args::string("string-ref", &arguments[0])?;
    let k = args::index("string-ref", &arguments[1])?;
    s.get(k)
        .map(Value::Character)
        .ok_or(SchemeError::IndexOutOfRange {
            procedure: "string-ref",
            index: k.to_string(),
        })
}

fn string_set(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("string-set!", 3, arguments)?;
    let s = args::string("string-set!", &arguments[0])?;
    let k = args::index("string-set!", &arguments[1])?;
    let ch = args::character("string-set!", &arguments[2])?;
    s.set(k, ch)?;
    Ok(Value::Void)
}

fn fold(chars: Vec<char>) -> Vec<char> {
    chars.into_iter().flat_map(|c| c.to_lowercase()).collect()
}

fn compare_chain(
    name: &'static str,
    arguments: &[Value],
    ci: bool,
    accept: fn(Ordering) -> bool,
) -> Result<Value> {
    args::at_least(name, 2, arguments)?;
    let mut texts = Vec::with_capacity(arguments.len());
    for value in arguments {
        let chars = args::string(name, value)?.chars();
        texts.push(if ci { fold(chars) } else { chars });
    }
    let holds = texts.windows(2).all(|w| accept(w[0].cmp(&w[1])));
    Ok(Value::Boolean(holds))
}

fn string_eq(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("string=?", a, false, |o| o == Ordering::Equal)
}

fn string_lt(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("string<?", a, false, |o| o == Ordering::Less)
}

fn string_le(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("string<=?", a, false, |o| o != Ordering::Greater)
}

fn string_gt(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("string>?", a, false, |o| o == Ordering::Greater)
}

fn string_ge(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("string>=?", a, false, |o| o != Ordering::Less)
}

fn string_ci_eq(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("string-ci=?", a, true, |o| o == Ordering::Equal)
}

fn string_ci_lt(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("string-ci<?", a, true, |o| o == Ordering::Less)
}

fn string_ci_le(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("string-ci<=?", a, true, |o| o != Ordering::Greater)
}

fn string_ci_gt(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("string-ci>?", a, true, |o| o == Ordering::Greater)
}

fn string_ci_ge(_env: &Rc<Env>, a: &[Value]) -> Result<Value> {
    compare_chain("string-ci>=?", a, true, |o| o != Ordering::Less)
}

fn substring(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("substring", 3, arguments)?;
    let s = args::string("substring", &arguments[0])?;
    let start = args::index("substring", &arguments[1])?;
    let end = args::index("substring", &arguments[2])?;
    let chars = s.chars();
    if start > end || end > chars.len() {
        return Err(SchemeError::IndexOutOfRange {
            procedure: "substring",
            index: format!("{start}..{end}"),
        });
    }
    Ok(Value::String(SchemeString::new(chars[start..end].to_vec())))
}

fn string_append(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    let mut out = Vec::new();
    for value in arguments {
        out.extend(args::string("string-append", value)?.chars());
    }
    Ok(Value::String(SchemeString::new(out)))
}

fn string_to_list(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("string->list", 1, arguments)?;
    let s = args::string("string->list", &arguments[0])?;
    Ok(list_from_vec(
        s.chars().into_iter().map(Value::Character).collect(),
    ))
}

fn list_to_string(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("list->string", 1, arguments)?;
    let items = args::list("list->string", &arguments[0])?;
    let chars = items
        .iter()
        .map(|v| args::character("list->string", v))
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::String(SchemeString::new(chars)))
}

fn string_copy(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("string-copy", 1, arguments)?;
    let s = args::string("string-copy", &arguments[0])?;
    Ok(Value::String(SchemeString::new(s.chars())))
}

fn string_fill(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("string-fill!", 2, arguments)?;
    let s = args::string("string-fill!", &arguments[0])?;
    let ch = args::character("string-fill!", &arguments[1])?;
    s.fill(ch)?;
    Ok(Value::Void)
}
