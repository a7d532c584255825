//! Interpreter facade
//!
//! Owns a global environment with the full builtin set plus the embedded
//! bootstrap library. `load_str` is the host surface: tokenize, parse and
//! evaluate a whole source text, handing back the last expression's value.

use std::rc::Rc;

use schist_core::{Env, Result, Value};
use schist_reader::parse_all;

use crate::builtins;
use crate::machine;

/// The bootstrap library: `caar`...`cddddr`, the member and assoc families.
/// Embedded so the interpreter is self-contained.
const BOOTSTRAP: &str = include_str!("bootstrap.scm");

pub struct Interpreter {
    global: Rc<Env>,
}

impl Interpreter {
    pub fn new() -> Interpreter {
        let global = Env::root();
        builtins::install(&global);
        let interpreter = Interpreter { global };
        // A failure here is a packaging bug, not a user error.
        let forms = parse_all(BOOTSTRAP).expect("bootstrap library parses");
        for form in &forms {
            machine::eval(form, &interpreter.global).expect("bootstrap library evaluates");
        }
        interpreter
    }

    pub fn global(&self) -> &Rc<Env> {
        &self.global
    }

    /// Run a whole source text, returning the last expression's value
    /// (`None` when the source holds no expressions).
    pub fn load_str(&self, source: &str) -> Result<Option<Value>> {
        let forms = parse_all(source)?;
        let mut last = None;
        for form in &forms {
            last = Some(machine::eval(form, &self.global)?);
        }
        Ok(last)
    }

    /// Evaluate an already-parsed datum in the global environment.
    pub fn eval_datum(&self, datum: &Value) -> Result<Value> {
        machine::eval(datum, &self.global)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schist_core::write_str;

    fn run(source: &str) -> String {
        let interp = Interpreter::new();
        match interp.load_str(source) {
            Ok(Some(value)) => write_str(&value),
            Ok(None) => String::new(),
            Err(e) => panic!("evaluation failed: {e}"),
        }
    }

    #[test]
    fn test_load_str_returns_last_value() {
        assert_eq!(run("1 2 3"), "3");
        assert_eq!(run(""), "");
    }

    #[test]
    fn test_bootstrap_compositions() {
        assert_eq!(run("(cadr '(1 2 3))"), "2");
        assert_eq!(run("(caddr '(1 2 3))"), "3");
        assert_eq!(run("(cddddr '(1 2 3 4 5))"), "(5)");
        assert_eq!(run("(caar '((1 2) 3))"), "1");
    }

    #[test]
    fn test_bootstrap_member_family() {
        assert_eq!(run("(memq 'c '(a b c d))"), "(c d)");
        assert_eq!(run("(memq 'z '(a b c))"), "#f");
        assert_eq!(run("(memv 2 '(1 2 3))"), "(2 3)");
        assert_eq!(run("(member \"b\" '(\"a\" \"b\"))"), "(\"b\")");
    }

    #[test]
    fn test_bootstrap_assoc_family() {
        assert_eq!(run("(assq 'b '((a 1) (b 2)))"), "(b 2)");
        assert_eq!(run("(assq 'z '((a 1)))"), "#f");
        assert_eq!(run("(assv 2 '((1 one) (2 two)))"), "(2 two)");
        assert_eq!(run("(assoc \"k\" '((\"k\" v)))"), "(\"k\" v)");
    }

    #[test]
    fn test_errors_abort_load() {
        let interp = Interpreter::new();
        assert!(interp.load_str("(car '())").is_err());
        assert!(interp.load_str("unbound-name").is_err());
        // The environment survives a failed load.
        interp.load_str("(define x 7)").unwrap();
        assert!(interp.load_str("(nonsense)").is_err());
        assert_eq!(write_str(&interp.load_str("x").unwrap().unwrap()), "7");
    }
}
