//! Numeric builtins
//!
//! Thin wrappers over [`schist_core::Number`]: every operation promotes its
//! operands and dispatches there. The variadic operators fold left to right.

use std::cmp::Ordering;
use std::rc::Rc;

use schist_core::{Env, Number, Result, SchemeError, Value};

use crate::args;
use crate::builtins::bind;

pub fn install(env: &Rc<Env>) {
    bind(env, "number?", number_p);
    bind(env, "complex?", number_p);
    bind(env, "real?", number_p);
    bind(env, "rational?", rational_p);
    bind(env, "integer?", integer_p);
    bind(env, "exact?", exact_p);
    bind(env, "inexact?", inexact_p);
    bind(env, "zero?", zero_p);
    bind(env, "positive?", positive_p);
    bind(env, "negative?", negative_p);
    bind(env, "even?", even_p);
    bind(env, "odd?", odd_p);
    bind(env, "+", add);
    bind(env, "-", sub);
    bind(env, "*", mul);
    bind(env, "/", div);
    bind(env, "=", num_eq);
    bind(env, "<", num_lt);
    bind(env, "<=", num_le);
    bind(env, ">", num_gt);
    bind(env, ">=", num_ge);
    bind(env, "min", min);
    bind(env, "max", max);
    bind(env, "abs", abs);
    bind(env, "sqrt", sqrt);
    bind(env, "expt", expt);
    bind(env, "quotient", quotient);
    bind(env, "remainder", remainder);
    bind(env, "modulo", modulo);
    bind(env, "gcd", gcd);
    bind(env, "lcm", lcm);
    bind(env, "numerator", numerator);
    bind(env, "denominator", denominator);
    bind(env, "floor", floor);
    bind(env, "ceiling", ceiling);
    bind(env, "truncate", truncate);
    bind(env, "round", round);
    bind(env, "exact->inexact", exact_to_inexact);
    bind(env, "inexact->exact", inexact_to_exact);
    bind(env, "string->number", string_to_number);
    bind(env, "number->string", number_to_string);
}

fn numbers(name: &'static str, values: &[Value]) -> Result<Vec<Rc<Number>>> {
    values.iter().map(|v| args::number(name, v)).collect()
}

fn number_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("number?", 1, arguments)?;
    Ok(Value::Boolean(matches!(arguments[0], Value::Number(_))))
}

/// Every number in this tower denotes a rational (reals are decimals).
fn rational_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("rational?", 1, arguments)?;
    Ok(Value::Boolean(matches!(arguments[0], Value::Number(_))))
}

fn integer_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("integer?", 1, arguments)?;
    Ok(Value::Boolean(match &arguments[0] {
        Value::Number(n) => n.is_integer(),
        _ => false,
    }))
}

fn exact_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("exact?", 1, arguments)?;
    Ok(Value::Boolean(args::number("exact?", &arguments[0])?.is_exact()))
}

fn inexact_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("inexact?", 1, arguments)?;
    Ok(Value::Boolean(!args::number("inexact?", &arguments[0])?.is_exact()))
}

fn zero_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("zero?", 1, arguments)?;
    Ok(Value::Boolean(args::number("zero?", &arguments[0])?.is_zero()))
}

fn positive_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("positive?", 1, arguments)?;
    Ok(Value::Boolean(args::number("positive?", &arguments[0])?.is_positive()))
}

fn negative_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("negative?", 1, arguments)?;
    Ok(Value::Boolean(args::number("negative?", &arguments[0])?.is_negative()))
}

fn even_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("even?", 1, arguments)?;
    Ok(Value::Boolean(args::number("even?", &arguments[0])?.is_even()?))
}

fn odd_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("odd?", 1, arguments)?;
    Ok(Value::Boolean(args::number("odd?", &arguments[0])?.is_odd()?))
}

fn add(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    let operands = numbers("+", arguments)?;
    let mut acc = Number::from_i64(0);
    for n in &operands {
        acc = acc.add(n);
    }
    Ok(Value::number(acc))
}

fn sub(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::at_least("-", 1, arguments)?;
    let operands = numbers("-", arguments)?;
    if operands.len() == 1 {
        return Ok(Value::number(operands[0].negate()));
    }
    let mut acc = (*operands[0]).clone();
    for n in &operands[1..] {
        acc = acc.sub(n);
    }
    Ok(Value::number(acc))
}

fn mul(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    let operands = numbers("*", arguments)?;
    let mut acc = Number::from_i64(1);
    for n in &operands {
        acc = acc.mul(n);
    }
    Ok(Value::number(acc))
}

fn div(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::at_least("/", 1, arguments)?;
    let operands = numbers("/", arguments)?;
    if operands.len() == 1 {
        return Ok(Value::number(operands[0].reciprocal()?));
    }
    let mut acc = (*operands[0]).clone();
    for n in &operands[1..] {
        acc = acc.div(n)?;
    }
    Ok(Value::number(acc))
}

fn chain(
    name: &'static str,
    arguments: &[Value],
    accept: fn(Ordering) -> bool,
) -> Result<Value> {
    args::at_least(name, 2, arguments)?;
    let operands = numbers(name, arguments)?;
    let holds = operands
        .windows(2)
        .all(|w| accept(w[0].compare(&w[1])));
    Ok(Value::Boolean(holds))
}

fn num_eq(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    chain("=", arguments, |o| o == Ordering::Equal)
}

fn num_lt(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    chain("<", arguments, |o| o == Ordering::Less)
}

fn num_le(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    chain("<=", arguments, |o| o != Ordering::Greater)
}

fn num_gt(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    chain(">", arguments, |o| o == Ordering::Greater)
}

fn num_ge(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    chain(">=", arguments, |o| o != Ordering::Less)
}

/// The winning operand is returned unchanged, exactness and all.
fn extremum(name: &'static str, arguments: &[Value], keep: fn(Ordering) -> bool) -> Result<Value> {
    args::at_least(name, 1, arguments)?;
    let operands = numbers(name, arguments)?;
    let mut winner = 0;
    for (i, n) in operands.iter().enumerate().skip(1) {
        if keep(n.compare(&operands[winner])) {
            winner = i;
        }
    }
    Ok(arguments[winner].clone())
}

fn min(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    extremum("min", arguments, |o| o == Ordering::Less)
}

fn max(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    extremum("max", arguments, |o| o == Ordering::Greater)
}

fn abs(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("abs", 1, arguments)?;
    Ok(Value::number(args::number("abs", &arguments[0])?.abs()))
}

fn sqrt(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("sqrt", 1, arguments)?;
    Ok(Value::number(args::number("sqrt", &arguments[0])?.sqrt()?))
}

fn quotient(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("quotient", 2, arguments)?;
    let a = args::number("quotient", &arguments[0])?;
    let b = args::number("quotient", &arguments[1])?;
    Ok(Value::number(a.quotient(&b)?))
}

fn remainder(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("remainder", 2, arguments)?;
    let a = args::number("remainder", &arguments[0])?;
    let b = args::number("remainder", &arguments[1])?;
    Ok(Value::number(a.remainder(&b)?))
}

fn modulo(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("modulo", 2, arguments)?;
    let a = args::number("modulo", &arguments[0])?;
    let b = args::number("modulo", &arguments[1])?;
    Ok(Value::number(a.modulo(&b)?))
}

fn expt(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("expt", 2, arguments)?;
    let base = args::number("expt", &arguments[0])?;
    let exponent = args::number("expt", &arguments[1])?;
    Ok(Value::number(base.expt(&exponent)?))
}

/// `gcd`/`lcm` fold pairwise; with no arguments they are 0 and 1.
fn gcd(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    let operands = numbers("gcd", arguments)?;
    let mut acc = Number::from_i64(0);
    for n in &operands {
        acc = acc.gcd(n)?;
    }
    Ok(Value::number(acc))
}

fn lcm(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    let operands = numbers("lcm", arguments)?;
    let mut acc = Number::from_i64(1);
    for n in &operands {
        acc = acc.lcm(n)?;
    }
    Ok(Value::number(acc))
}

fn numerator(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("numerator", 1, arguments)?;
    Ok(Value::number(args::number("numerator", &arguments[0])?.numerator()?))
}

fn denominator(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("denominator", 1, arguments)?;
    Ok(Value::number(
        args::number("denominator", &arguments[0])?.denominator()?,
    ))
}

fn floor(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("floor", 1, arguments)?;
    Ok(Value::number(args::number("floor", &arguments[0])?.floor()))
}

fn ceiling(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("ceiling", 1, arguments)?;
    Ok(Value::number(args::number("ceiling", &arguments[0])?.ceiling()))
}

fn truncate(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("truncate", 1, arguments)?;
    Ok(Value::number(args::number("truncate", &arguments[0])?.truncate()))
}

fn round(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("round", 1, arguments)?;
    Ok(Value::number(args::number("round", &arguments[0])?.round()))
}

fn exact_to_inexact(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("exact->inexact", 1, arguments)?;
    Ok(Value::number(
        args::number("exact->inexact", &arguments[0])?.to_inexact(),
    ))
}

fn inexact_to_exact(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("inexact->exact", 1, arguments)?;
    Ok(Value::number(
        args::number("inexact->exact", &arguments[0])?.to_exact(),
    ))
}

/// Only radix 10 is supported; any other radix argument is an error.
fn check_radix(name: &'static str, radix: Option<&Value>) -> Result<()> {
    let Some(radix) = radix else { return Ok(()) };
    let n = args::number(name, radix)?;
    if n.to_i64() == Some(10) {
        Ok(())
    } else {
        Err(SchemeError::eval(format!("{name}: only radix 10 is supported")))
    }
}

fn string_to_number(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::between("string->number", 1, 2, arguments)?;
    check_radix("string->number", arguments.get(1))?;
    let text = args::string("string->number", &arguments[0])?.to_text();
    Ok(match Number::parse(&text) {
        Some(n) => Value::number(n),
        None => Value::Boolean(false),
    })
}

fn number_to_string(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::between("number->string", 1, 2, arguments)?;
    check_radix("number->string", arguments.get(1))?;
    let n = args::number("number->string", &arguments[0])?;
    Ok(Value::string(&n.to_string()))
}
