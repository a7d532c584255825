//! Symbols
//!
//! Interned symbols live in a process-wide table keyed by the case-folded
//! name; `Symbol::of` returns the canonical instance for a name, so two
//! occurrences of `foo` (or `FOO`) in source are `eq?`. Uninterned symbols
//! (from `gensym`) carry a unique tag and are equal only to themselves.
//!
//! The table is `thread_local!` because the evaluator is single-threaded;
//! see the scheduling notes on [`crate::frame`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

thread_local! {
    static INTERNED: RefCell<HashMap<String, Symbol>> = RefCell::new(HashMap::new());
    static NEXT_TAG: Cell<u64> = const { Cell::new(0) };
}

#[derive(Debug)]
struct SymbolData {
    name: String,
    /// `None` for interned symbols, a unique tag for uninterned ones.
    tag: Option<u64>,
}

/// An identifier. Cheap to clone (shared backing data).
#[derive(Debug, Clone)]
pub struct Symbol(Rc<SymbolData>);

impl Symbol {
    /// Return the interned symbol for `name`, folding it to lower case and
    /// inserting it into the table on first use.
    pub fn of(name: &str) -> Symbol {
        let folded = name.to_lowercase();
        INTERNED.with(|table| {
            let mut table = table.borrow_mut();
            if let Some(sym) = table.get(&folded) {
                return sym.clone();
            }
            let sym = Symbol(Rc::new(SymbolData {
                name: folded.clone(),
                tag: None,
            }));
            table.insert(folded, sym.clone());
            sym
        })
    }

    /// Create a fresh uninterned symbol. Never `eq?` to any other symbol,
    /// including another uninterned symbol with the same name.
    pub fn uninterned(name: &str) -> Symbol {
        let tag = NEXT_TAG.with(|next| {
            let tag = next.get();
            next.set(tag + 1);
            tag
        });
        Symbol(Rc::new(SymbolData {
            name: name.to_string(),
            tag: Some(tag),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn is_interned(&self) -> bool {
        self.0.tag.is_none()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        match (self.0.tag, other.0.tag) {
            (None, None) => self.0.name == other.0.name,
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
        self.0.tag.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_interned() {
            write!(f, "{}", self.0.name)
        } else {
            write!(f, "#<uninterned-symbol {}>", self.0.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interned_symbols_are_equal() {
        assert_eq!(Symbol::of("foo"), Symbol::of("foo"));
    }

    #[test]
    fn test_interning_case_folds() {
        assert_eq!(Symbol::of("FOO"), Symbol::of("foo"));
        assert_eq!(Symbol::of("Foo").name(), "foo");
    }

    #[test]
    fn test_uninterned_symbols_are_unique() {
        let a = Symbol::uninterned("g");
        let b = Symbol::uninterned("g");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_ne!(a, Symbol::of("g"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Symbol::of("Lambda").to_string(), "lambda");
        assert_eq!(
            Symbol::uninterned("tmp").to_string(),
            "#<uninterned-symbol tmp>"
        );
    }
}
