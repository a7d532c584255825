//! Printed representations
//!
//! Two renderings share one walker: `write` (read-back style, the default
//! `Display`) and `display` (human style, the `{:#}` alternate flag):
//! strings lose their quotes and characters print raw under `display`.
//!
//! `set-car!`/`set-cdr!` can tie knots, so the walker carries a depth budget
//! and prints an ellipsis when it runs out; following a cdr costs a step, so
//! circular lists terminate too.
//!
//! Known limitation carried from the reader: string contents are printed
//! verbatim, without re-escaping.

use std::fmt;

use crate::value::{Procedure, Value};

/// Nesting/step budget before the printer gives up with `...`.
const MAX_DEPTH: usize = 256;

/// `write`-style rendering.
pub fn write_str(value: &Value) -> String {
    format!("{value}")
}

/// `display`-style rendering.
pub fn display_str(value: &Value) -> String {
    format!("{value:#}")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self, f, f.alternate(), 0)
    }
}

fn render(value: &Value, f: &mut fmt::Formatter<'_>, display: bool, depth: usize) -> fmt::Result {
    if depth > MAX_DEPTH {
        return write!(f, "...");
    }
    match value {
        Value::Boolean(true) => write!(f, "#t"),
        Value::Boolean(false) => write!(f, "#f"),
        Value::Character(ch) => {
            if display {
                write!(f, "{ch}")
            } else {
                render_char(*ch, f)
            }
        }
        Value::Number(n) => write!(f, "{n}"),
        Value::String(s) => {
            if display {
                write!(f, "{}", s.to_text())
            } else {
                write!(f, "\"{}\"", s.to_text())
            }
        }
        Value::Symbol(sym) => write!(f, "{sym}"),
        Value::Null => write!(f, "()"),
        Value::Pair(pair) => {
            write!(f, "(")?;
            render(&pair.car(), f, display, depth + 1)?;
            let mut cursor = pair.cdr();
            let mut steps = depth;
            loop {
                steps += 1;
                if steps > MAX_DEPTH {
                    write!(f, " ...")?;
                    break;
                }
                match cursor {
                    Value::Null => break,
                    Value::Pair(next) => {
                        write!(f, " ")?;
                        render(&next.car(), f, display, steps + 1)?;
                        cursor = next.cdr();
                    }
                    tail => {
                        write!(f, " . ")?;
                        render(&tail, f, display, steps + 1)?;
                        break;
                    }
                }
            }
            write!(f, ")")
        }
        Value::Vector(vec) => {
            write!(f, "#(")?;
            for (i, item) in vec.items().iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                render(item, f, display, depth + 1)?;
            }
            write!(f, ")")
        }
        Value::Procedure(Procedure::Builtin(b)) => write!(f, "#[bound procedure: {}]", b.name),
        Value::Procedure(Procedure::Closure(c)) => {
            if c.variadic {
                write!(f, "#[closure {}]", c.params[0])
            } else {
                write!(f, "#[closure (")?;
                for (i, p) in c.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ")]")
            }
        }
        Value::Procedure(Procedure::Continuation(_)) => write!(f, "#[continuation]"),
        Value::Port(port) => {
            if port.is_input() {
                write!(f, "#[input-port]")
            } else {
                write!(f, "#[output-port]")
            }
        }
        Value::Promise(_) => write!(f, "#[promise]"),
        Value::Eof => write!(f, "#<EOF>"),
        Value::Void => write!(f, "#<void>"),
    }
}

fn render_char(ch: char, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match ch {
        ' ' => write!(f, "#\\space"),
        '\n' => write!(f, "#\\newline"),
        c if c.is_alphanumeric() => write!(f, "#\\{c}"),
        c => write!(f, "#\\U+{:X}", c as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::Number;
    use crate::symbol::Symbol;
    use crate::value::{Pair, SchemeVector, list_from_vec};

    #[test]
    fn test_atoms() {
        assert_eq!(write_str(&Value::Boolean(true)), "#t");
        assert_eq!(write_str(&Value::Boolean(false)), "#f");
        assert_eq!(write_str(&Value::Null), "()");
        assert_eq!(write_str(&Value::Eof), "#<EOF>");
        assert_eq!(write_str(&Value::Void), "#<void>");
        assert_eq!(write_str(&Value::symbol("Foo")), "foo");
    }

    #[test]
    fn test_characters() {
        assert_eq!(write_str(&Value::Character(' ')), "#\\space");
        assert_eq!(write_str(&Value::Character('\n')), "#\\newline");
        assert_eq!(write_str(&Value::Character('a')), "#\\a");
        assert_eq!(write_str(&Value::Character('7')), "#\\7");
        assert_eq!(write_str(&Value::Character('\t')), "#\\U+9");
        assert_eq!(display_str(&Value::Character('a')), "a");
    }

    #[test]
    fn test_strings_write_vs_display() {
        let s = Value::string("hi");
        assert_eq!(write_str(&s), "\"hi\"");
        assert_eq!(display_str(&s), "hi");
    }

    #[test]
    fn test_lists() {
        let l = list_from_vec(vec![
            Value::from_i64(1),
            Value::from_i64(2),
            Value::from_i64(3),
        ]);
        assert_eq!(write_str(&l), "(1 2 3)");
        let dotted = Value::Pair(Pair::cons(Value::from_i64(1), Value::from_i64(2)));
        assert_eq!(write_str(&dotted), "(1 . 2)");
    }

    #[test]
    fn test_vector() {
        let v = Value::Vector(SchemeVector::new(vec![
            Value::from_i64(0),
            Value::string("x"),
        ]));
        assert_eq!(write_str(&v), "#(0 \"x\")");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(write_str(&Value::from_i64(-3)), "-3");
        let r = Value::number(Number::rational(7.into(), 2.into()).unwrap());
        assert_eq!(write_str(&r), "7/2");
    }

    #[test]
    fn test_uninterned_symbol() {
        let s = Value::Symbol(Symbol::uninterned("g1"));
        assert_eq!(write_str(&s), "#<uninterned-symbol g1>");
    }

    #[test]
    fn test_cyclic_list_is_cut_off() {
        let p = Pair::cons(Value::from_i64(1), Value::Null);
        p.set_cdr(Value::Pair(p.clone())).unwrap();
        let text = write_str(&Value::Pair(p));
        assert!(text.ends_with("...)"));
    }
}
