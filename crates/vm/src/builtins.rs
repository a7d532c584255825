//! Builtin registry
//!
//! Installs every native procedure into a fresh global environment. The
//! implementations live in the op modules; each contributes its own names.

use std::rc::Rc;

use schist_core::value::Builtin;
use schist_core::{Env, NativeFn, Procedure, Symbol, Value};

/// Bind one native procedure.
pub(crate) fn bind(env: &Rc<Env>, name: &'static str, run: NativeFn) {
    env.define(
        Symbol::of(name),
        Value::Procedure(Procedure::Builtin(Rc::new(Builtin { name, run }))),
    );
}

/// Install the full R5RS builtin set.
pub fn install(env: &Rc<Env>) {
    crate::equivalence::install(env);
    crate::arithmetic::install(env);
    crate::list_ops::install(env);
    crate::vector_ops::install(env);
    crate::string_ops::install(env);
    crate::char_ops::install(env);
    crate::control::install(env);
    crate::io::install(env);
}
