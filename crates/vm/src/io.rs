//! Port and output builtins
//!
//! The current ports are thread-local, initialized to the host's stdin and
//! stdout; embedders (and tests) can swap in text or buffer ports.

use std::cell::RefCell;
use std::rc::Rc;

use schist_core::{Env, Port, Result, Value, display_str, write_str};

use crate::args;
use crate::builtins::bind;

thread_local! {
    static CURRENT_INPUT: RefCell<Rc<Port>> = RefCell::new(Port::stdin());
    static CURRENT_OUTPUT: RefCell<Rc<Port>> = RefCell::new(Port::stdout());
}

pub fn current_input() -> Rc<Port> {
    CURRENT_INPUT.with(|p| p.borrow().clone())
}

pub fn current_output() -> Rc<Port> {
    CURRENT_OUTPUT.with(|p| p.borrow().clone())
}

/// Redirect the current input port, returning the previous one.
pub fn set_current_input(port: Rc<Port>) -> Rc<Port> {
    CURRENT_INPUT.with(|p| p.replace(port))
}

/// Redirect the current output port, returning the previous one.
pub fn set_current_output(port: Rc<Port>) -> Rc<Port> {
    CURRENT_OUTPUT.with(|p| p.replace(port))
}

pub fn install(env: &Rc<Env>) {
    bind(env, "port?", port_p);
    bind(env, "input-port?", input_port_p);
    bind(env, "output-port?", output_port_p);
    bind(env, "current-input-port", current_input_port);
    bind(env, "current-output-port", current_output_port);
    bind(env, "newline", newline);
    bind(env, "write-char", write_char);
    bind(env, "write", write);
    bind(env, "display", display);
    bind(env, "eof", eof);
    bind(env, "eof-object?", eof_object_p);
}

fn port_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("port?", 1, arguments)?;
    Ok(Value::Boolean(matches!(arguments[0], Value::Port(_))))
}

fn input_port_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("input-port?", 1, arguments)?;
    Ok(Value::Boolean(match &arguments[0] {
        Value::Port(p) => p.is_input(),
        _ => false,
    }))
}

fn output_port_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("output-port?", 1, arguments)?;
    Ok(Value::Boolean(match &arguments[0] {
        Value::Port(p) => p.is_output(),
        _ => false,
    }))
}

fn current_input_port(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("current-input-port", 0, arguments)?;
    Ok(Value::Port(current_input()))
}

fn current_output_port(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("current-output-port", 0, arguments)?;
    Ok(Value::Port(current_output()))
}

/// Resolve the optional trailing port argument of an output procedure.
fn output_target(name: &'static str, port: Option<&Value>) -> Result<Rc<Port>> {
    match port {
        Some(value) => args::port(name, value),
        None => Ok(current_output()),
    }
}

fn newline(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::between("newline", 0, 1, arguments)?;
    output_target("newline", arguments.first())?.write_text("\n")?;
    Ok(Value::Void)
}

fn write_char(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::between("write-char", 1, 2, arguments)?;
    let ch = args::character("write-char", &arguments[0])?;
    output_target("write-char", arguments.get(1))?.write_text(&ch.to_string())?;
    Ok(Value::Void)
}

fn write(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::between("write", 1, 2, arguments)?;
    output_target("write", arguments.get(1))?.write_text(&write_str(&arguments[0]))?;
    Ok(Value::Void)
}

fn display(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::between("display", 1, 2, arguments)?;
    output_target("display", arguments.get(1))?.write_text(&display_str(&arguments[0]))?;
    Ok(Value::Void)
}

fn eof(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("eof", 0, arguments)?;
    Ok(Value::Eof)
}

fn eof_object_p(_env: &Rc<Env>, arguments: &[Value]) -> Result<Value> {
    args::exactly("eof-object?", 1, arguments)?;
    Ok(Value::Boolean(matches!(arguments[0], Value::Eof)))
}
