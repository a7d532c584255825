//! Lexical environments
//!
//! A scope is a map from symbols to values plus a parent link; the chain is
//! acyclic by construction (children point at parents, never back). Closures
//! and continuations hold owning references, so a scope lives at least as
//! long as anything that captured it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{Result, SchemeError};
use crate::symbol::Symbol;
use crate::value::Value;

#[derive(Debug)]
pub struct Env {
    scope: RefCell<HashMap<Symbol, Value>>,
    parent: Option<Rc<Env>>,
}

impl Env {
    /// A root scope with no parent.
    pub fn root() -> Rc<Env> {
        Rc::new(Env {
            scope: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// A fresh scope chained under `parent`.
    pub fn child(parent: &Rc<Env>) -> Rc<Env> {
        Rc::new(Env {
            scope: RefCell::new(HashMap::new()),
            parent: Some(parent.clone()),
        })
    }

    /// Insert or overwrite a binding in this innermost scope. Returns the
    /// value it displaced, if any.
    pub fn define(&self, name: Symbol, value: Value) -> Option<Value> {
        self.scope.borrow_mut().insert(name, value)
    }

    /// Is `name` bound in this scope itself (parents not consulted)?
    pub fn is_bound_locally(&self, name: &Symbol) -> bool {
        self.scope.borrow().contains_key(name)
    }

    /// Mutate the innermost existing binding of `name`, walking parents.
    /// Fails if `name` was never bound.
    pub fn replace(&self, name: &Symbol, value: Value) -> Result<()> {
        let mut scope = self.scope.borrow_mut();
        if let Some(slot) = scope.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        drop(scope);
        match &self.parent {
            Some(parent) => parent.replace(name, value),
            None => Err(SchemeError::Unbound(name.to_string())),
        }
    }

    /// Resolve `name`, walking parents outward.
    pub fn lookup(&self, name: &Symbol) -> Result<Value> {
        if let Some(value) = self.scope.borrow().get(name) {
            return Ok(value.clone());
        }
        match &self.parent {
            Some(parent) => parent.lookup(name),
            None => Err(SchemeError::Unbound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_lookup() {
        let env = Env::root();
        env.define(Symbol::of("x"), Value::from_i64(1));
        assert!(env.lookup(&Symbol::of("x")).unwrap().is_eqv(&Value::from_i64(1)));
    }

    #[test]
    fn test_lookup_walks_parents() {
        let root = Env::root();
        root.define(Symbol::of("x"), Value::from_i64(1));
        let inner = Env::child(&root);
        assert!(inner.lookup(&Symbol::of("x")).is_ok());
        assert!(matches!(
            inner.lookup(&Symbol::of("y")),
            Err(SchemeError::Unbound(_))
        ));
    }

    #[test]
    fn test_define_shadows_and_returns_previous() {
        let root = Env::root();
        root.define(Symbol::of("x"), Value::from_i64(1));
        let inner = Env::child(&root);
        assert!(inner.define(Symbol::of("x"), Value::from_i64(2)).is_none());
        let prev = root.define(Symbol::of("x"), Value::from_i64(3));
        assert!(prev.unwrap().is_eqv(&Value::from_i64(1)));
        // The shadow in the child is untouched.
        assert!(inner.lookup(&Symbol::of("x")).unwrap().is_eqv(&Value::from_i64(2)));
    }

    #[test]
    fn test_replace_mutates_innermost_binding() {
        let root = Env::root();
        root.define(Symbol::of("x"), Value::from_i64(1));
        let inner = Env::child(&root);
        inner.replace(&Symbol::of("x"), Value::from_i64(5)).unwrap();
        assert!(root.lookup(&Symbol::of("x")).unwrap().is_eqv(&Value::from_i64(5)));
        assert!(matches!(
            inner.replace(&Symbol::of("zzz"), Value::Null),
            Err(SchemeError::Unbound(_))
        ));
    }
}
