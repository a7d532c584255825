//! Runtime values
//!
//! A single tagged sum with shared, interiorly-mutable cells for the three
//! mutable kinds (pairs, strings, vectors). Handles are `Rc`, so cloning a
//! `Value` is cheap and two clones of the same handle alias the same cell.
//!
//! Mutability is a per-cell bit: cells built by the reader (literals in
//! source text) are immutable, cells built at runtime (`cons`, `make-vector`,
//! `string-copy`, ...) are mutable. Atoms are always immutable.

use std::cell::RefCell;
use std::rc::Rc;

use crate::env::Env;
use crate::error::{Result, SchemeError};
use crate::frame::Frame;
use crate::number::Number;
use crate::port::Port;
use crate::symbol::Symbol;

#[derive(Debug, Clone)]
pub enum Value {
    Boolean(bool),
    Character(char),
    Number(Rc<Number>),
    String(Rc<SchemeString>),
    Symbol(Symbol),
    /// The empty list.
    Null,
    Pair(Rc<Pair>),
    Vector(Rc<SchemeVector>),
    Procedure(Procedure),
    Port(Rc<Port>),
    Promise(Rc<Promise>),
    Eof,
    Void,
}

/// A cons cell. Both fields are assignable through `set-car!`/`set-cdr!`
/// unless the cell came from source text.
#[derive(Debug)]
pub struct Pair {
    pub car: RefCell<Value>,
    pub cdr: RefCell<Value>,
    immutable: bool,
}

impl Pair {
    /// A runtime (mutable) cons cell.
    pub fn cons(car: Value, cdr: Value) -> Rc<Pair> {
        Rc::new(Pair {
            car: RefCell::new(car),
            cdr: RefCell::new(cdr),
            immutable: false,
        })
    }

    /// A literal (immutable) cons cell, as built by the reader.
    pub fn literal(car: Value, cdr: Value) -> Rc<Pair> {
        Rc::new(Pair {
            car: RefCell::new(car),
            cdr: RefCell::new(cdr),
            immutable: true,
        })
    }

    pub fn car(&self) -> Value {
        self.car.borrow().clone()
    }

    pub fn cdr(&self) -> Value {
        self.cdr.borrow().clone()
    }

    pub fn set_car(&self, value: Value) -> Result<()> {
        if self.immutable {
            return Err(SchemeError::Immutable);
        }
        *self.car.borrow_mut() = value;
        Ok(())
    }

    pub fn set_cdr(&self, value: Value) -> Result<()> {
        if self.immutable {
            return Err(SchemeError::Immutable);
        }
        *self.cdr.borrow_mut() = value;
        Ok(())
    }
}

/// A mutable sequence of characters.
#[derive(Debug)]
pub struct SchemeString {
    chars: RefCell<Vec<char>>,
    immutable: bool,
}

impl SchemeString {
    pub fn new(chars: Vec<char>) -> Rc<SchemeString> {
        Rc::new(SchemeString {
            chars: RefCell::new(chars),
            immutable: false,
        })
    }

    /// An immutable string, as produced by string literals and
    /// `symbol->string`.
    pub fn literal(text: &str) -> Rc<SchemeString> {
        Rc::new(SchemeString {
            chars: RefCell::new(text.chars().collect()),
            immutable: true,
        })
    }

    pub fn from_str(text: &str) -> Rc<SchemeString> {
        SchemeString::new(text.chars().collect())
    }

    pub fn len(&self) -> usize {
        self.chars.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<char> {
        self.chars.borrow().get(index).copied()
    }

    pub fn set(&self, index: usize, ch: char) -> Result<()> {
        if self.immutable {
            return Err(SchemeError::Immutable);
        }
        let mut chars = self.chars.borrow_mut();
        match chars.get_mut(index) {
            Some(slot) => {
                *slot = ch;
                Ok(())
            }
            None => Err(SchemeError::IndexOutOfRange {
                procedure: "string-set!",
                index: index.to_string(),
            }),
        }
    }

    pub fn fill(&self, ch: char) -> Result<()> {
        if self.immutable {
            return Err(SchemeError::Immutable);
        }
        self.chars.borrow_mut().fill(ch);
        Ok(())
    }

    pub fn chars(&self) -> Vec<char> {
        self.chars.borrow().clone()
    }

    pub fn to_text(&self) -> String {
        self.chars.borrow().iter().collect()
    }
}

/// A fixed-length mutable array of values.
#[derive(Debug)]
pub struct SchemeVector {
    items: RefCell<Vec<Value>>,
    immutable: bool,
}

impl SchemeVector {
    pub fn new(items: Vec<Value>) -> Rc<SchemeVector> {
        Rc::new(SchemeVector {
            items: RefCell::new(items),
            immutable: false,
        })
    }

    pub fn literal(items: Vec<Value>) -> Rc<SchemeVector> {
        Rc::new(SchemeVector {
            items: RefCell::new(items),
            immutable: true,
        })
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.borrow().get(index).cloned()
    }

    pub fn set(&self, index: usize, value: Value) -> Result<()> {
        if self.immutable {
            return Err(SchemeError::Immutable);
        }
        let mut items = self.items.borrow_mut();
        match items.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(SchemeError::IndexOutOfRange {
                procedure: "vector-set!",
                index: index.to_string(),
            }),
        }
    }

    pub fn fill(&self, value: Value) -> Result<()> {
        if self.immutable {
            return Err(SchemeError::Immutable);
        }
        let mut items = self.items.borrow_mut();
        let len = items.len();
        items.clear();
        items.resize(len, value);
        Ok(())
    }

    pub fn items(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }
}

/// Native procedure: `(environment, arguments) -> value`.
pub type NativeFn = fn(&Rc<Env>, &[Value]) -> Result<Value>;

#[derive(Debug)]
pub struct Builtin {
    pub name: &'static str,
    pub run: NativeFn,
}

/// A lambda bundled with its defining environment.
#[derive(Debug)]
pub struct Closure {
    pub env: Rc<Env>,
    pub params: Vec<Symbol>,
    /// Whole-list formals: the single parameter receives all arguments as a
    /// proper list.
    pub variadic: bool,
    /// Non-empty body, evaluated as a sequence.
    pub body: Vec<Value>,
}

/// An immutable snapshot of the evaluator's frame stack.
#[derive(Debug)]
pub struct Continuation {
    pub frames: Vec<Frame>,
}

#[derive(Debug, Clone)]
pub enum Procedure {
    Builtin(Rc<Builtin>),
    Closure(Rc<Closure>),
    Continuation(Rc<Continuation>),
}

/// Captured environment plus unevaluated body, for `delay`/`force`.
/// The first `force` caches its result here.
#[derive(Debug)]
pub struct Promise {
    pub env: Rc<Env>,
    pub body: Value,
    pub memo: RefCell<Option<Value>>,
}

impl Value {
    pub fn number(n: Number) -> Value {
        Value::Number(Rc::new(n))
    }

    pub fn from_i64(n: i64) -> Value {
        Value::number(Number::from_i64(n))
    }

    pub fn string(text: &str) -> Value {
        Value::String(SchemeString::from_str(text))
    }

    pub fn symbol(name: &str) -> Value {
        Value::Symbol(Symbol::of(name))
    }

    /// Only the false boolean is false.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false))
    }

    /// Name of this value's kind, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Character(_) => "character",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Null => "empty list",
            Value::Pair(_) => "pair",
            Value::Vector(_) => "vector",
            Value::Procedure(_) => "procedure",
            Value::Port(_) => "port",
            Value::Promise(_) => "promise",
            Value::Eof => "eof object",
            Value::Void => "void",
        }
    }

    /// Pointer identity (with value identity for the copied atoms).
    pub fn is_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Character(a), Value::Character(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Eof, Value::Eof) => true,
            (Value::Void, Value::Void) => true,
            (Value::Number(a), Value::Number(b)) => Rc::ptr_eq(a, b),
            (Value::String(a), Value::String(b)) => Rc::ptr_eq(a, b),
            (Value::Pair(a), Value::Pair(b)) => Rc::ptr_eq(a, b),
            (Value::Vector(a), Value::Vector(b)) => Rc::ptr_eq(a, b),
            (Value::Port(a), Value::Port(b)) => Rc::ptr_eq(a, b),
            (Value::Promise(a), Value::Promise(b)) => Rc::ptr_eq(a, b),
            (Value::Procedure(a), Value::Procedure(b)) => match (a, b) {
                (Procedure::Builtin(a), Procedure::Builtin(b)) => Rc::ptr_eq(a, b),
                (Procedure::Closure(a), Procedure::Closure(b)) => Rc::ptr_eq(a, b),
                (Procedure::Continuation(a), Procedure::Continuation(b)) => Rc::ptr_eq(a, b),
                _ => false,
            },
            _ => false,
        }
    }

    /// `eq?` extended with numeric equality (same exactness required) and
    /// character equality.
    pub fn is_eqv(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => {
                a.is_exact() == b.is_exact() && **a == **b
            }
            _ => self.is_eq(other),
        }
    }

    /// Structural equality. Follows pairs and vectors recursively and
    /// compares strings codepoint-wise; not required to terminate on cyclic
    /// structures.
    pub fn is_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => {
                Rc::ptr_eq(a, b) || *a.chars.borrow() == *b.chars.borrow()
            }
            (Value::Vector(a), Value::Vector(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (xs, ys) = (a.items.borrow(), b.items.borrow());
                xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| x.is_equal(y))
            }
            (Value::Pair(_), Value::Pair(_)) => {
                // Walk the cdr chain iteratively so long lists do not
                // exhaust the host stack.
                let mut a = self.clone();
                let mut b = other.clone();
                loop {
                    match (a, b) {
                        (Value::Pair(x), Value::Pair(y)) => {
                            if !Rc::ptr_eq(&x, &y) {
                                if !x.car().is_equal(&y.car()) {
                                    return false;
                                }
                                a = x.cdr();
                                b = y.cdr();
                            } else {
                                return true;
                            }
                        }
                        (a, b) => return a.is_equal(&b),
                    }
                }
            }
            _ => self.is_eqv(other),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Boolean(b)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Value {
        Value::number(n)
    }
}

/// Build a proper list of runtime (mutable) pairs.
pub fn list_from_vec(items: Vec<Value>) -> Value {
    let mut tail = Value::Null;
    for item in items.into_iter().rev() {
        tail = Value::Pair(Pair::cons(item, tail));
    }
    tail
}

/// Build a (possibly improper) list of literal pairs, as the reader does.
pub fn literal_list(items: Vec<Value>, tail: Value) -> Value {
    let mut out = tail;
    for item in items.into_iter().rev() {
        out = Value::Pair(Pair::literal(item, out));
    }
    out
}

/// Collect a proper list into a vector. `None` if the chain is improper or
/// cyclic.
pub fn list_to_vec(value: &Value) -> Option<Vec<Value>> {
    improper_to_vec(value).and_then(|(items, tail)| match tail {
        Value::Null => Some(items),
        _ => None,
    })
}

/// Split a pair chain into its elements and final tail (`Null` for a proper
/// list). Cyclic chains return `None` (tortoise and hare).
pub fn improper_to_vec(value: &Value) -> Option<(Vec<Value>, Value)> {
    let mut out = Vec::new();
    let mut slow = value.clone();
    let mut fast = value.clone();
    loop {
        for _ in 0..2 {
            match fast {
                Value::Pair(p) => {
                    out.push(p.car());
                    fast = p.cdr();
                }
                tail => return Some((out, tail)),
            }
        }
        match slow {
            Value::Pair(p) => slow = p.cdr(),
            _ => return Some((out, slow)),
        }
        if let (Value::Pair(a), Value::Pair(b)) = (&slow, &fast)
            && Rc::ptr_eq(a, b)
        {
            return None;
        }
    }
}

/// Proper-list test, safe on cycles.
pub fn is_proper_list(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Pair(_) => list_to_vec(value).is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Boolean(false).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(Value::Null.is_truthy());
        assert!(Value::from_i64(0).is_truthy());
        assert!(Value::string("").is_truthy());
    }

    #[test]
    fn test_eq_is_identity_for_pairs() {
        let p = Value::Pair(Pair::cons(Value::from_i64(1), Value::Null));
        assert!(p.is_eq(&p.clone()));
        let q = Value::Pair(Pair::cons(Value::from_i64(1), Value::Null));
        assert!(!p.is_eq(&q));
        assert!(p.is_equal(&q));
    }

    #[test]
    fn test_eqv_numbers_require_same_exactness() {
        let exact = Value::from_i64(2);
        let inexact = Value::number(Number::Real("2.0".parse().unwrap()));
        assert!(!exact.is_eqv(&inexact));
        assert!(exact.is_eqv(&Value::from_i64(2)));
    }

    #[test]
    fn test_equal_on_nested_structure() {
        let a = list_from_vec(vec![
            Value::from_i64(1),
            list_from_vec(vec![Value::string("x")]),
        ]);
        let b = list_from_vec(vec![
            Value::from_i64(1),
            list_from_vec(vec![Value::string("x")]),
        ]);
        assert!(a.is_equal(&b));
        assert!(!a.is_eqv(&b));
    }

    #[test]
    fn test_literal_pairs_reject_mutation() {
        let p = Pair::literal(Value::from_i64(1), Value::Null);
        assert_eq!(p.set_car(Value::from_i64(2)), Err(SchemeError::Immutable));
        let q = Pair::cons(Value::from_i64(1), Value::Null);
        assert!(q.set_car(Value::from_i64(2)).is_ok());
        assert!(q.car().is_eqv(&Value::from_i64(2)));
    }

    #[test]
    fn test_list_to_vec_detects_cycles() {
        let p = Pair::cons(Value::from_i64(1), Value::Null);
        p.set_cdr(Value::Pair(p.clone())).unwrap();
        assert!(list_to_vec(&Value::Pair(p)).is_none());
    }

    #[test]
    fn test_improper_list_split() {
        let v = literal_list(
            vec![Value::from_i64(1), Value::from_i64(2)],
            Value::from_i64(3),
        );
        let (items, tail) = improper_to_vec(&v).unwrap();
        assert_eq!(items.len(), 2);
        assert!(tail.is_eqv(&Value::from_i64(3)));
        assert!(!is_proper_list(&v));
    }
}
