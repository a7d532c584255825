//! Quasiquote expansion
//!
//! `expand(template, depth)` rewrites a quasiquote template into an ordinary
//! expression that builds the described value: unquoted parts are left to be
//! evaluated, everything else collapses to `quote`. Nested quasiquotes raise
//! the depth; `unquote`/`unquote-splicing` lower it and only fire at depth 0.
//!
//! A `(cons 'a 'd)` whose quoted halves are exactly the template's own car
//! and cdr is collapsed back to a single `(quote template)`, so fully
//! constant templates cost one quote instead of a cons tree.

use schist_core::{Result, SchemeError, Symbol, Value, list_from_vec, list_to_vec};

/// The expression `(quote datum)`.
fn quoted(datum: Value) -> Value {
    list_from_vec(vec![Value::Symbol(Symbol::of("quote")), datum])
}

/// If `expr` is `(quote datum)`, the datum.
fn unquoted(expr: &Value) -> Option<Value> {
    let items = list_to_vec(expr)?;
    match items.as_slice() {
        [Value::Symbol(kw), datum] if kw.is_interned() && kw.name() == "quote" => {
            Some(datum.clone())
        }
        _ => None,
    }
}

/// Is `template` the form `(kw x)` for the given quasiquote keyword?
fn keyword_form(template: &Value, keyword: &str) -> Option<Value> {
    let items = list_to_vec(template)?;
    match items.as_slice() {
        [Value::Symbol(kw), arg] if kw.is_interned() && kw.name() == keyword => Some(arg.clone()),
        _ => None,
    }
}

pub fn expand(template: &Value, depth: usize) -> Result<Value> {
    match template {
        Value::Vector(vec) => {
            // Expand the element list, then rebuild a vector from it.
            let as_list = list_from_vec(vec.items());
            let list_expr = expand(&as_list, depth)?;
            Ok(list_from_vec(vec![
                Value::Symbol(Symbol::of("list->vector")),
                list_expr,
            ]))
        }
        Value::Pair(pair) => {
            if let Some(inner) = keyword_form(template, "quasiquote") {
                let expanded = expand(&inner, depth + 1)?;
                return Ok(rebuild_keyword("quasiquote", expanded));
            }
            if let Some(inner) = keyword_form(template, "unquote") {
                return if depth == 0 {
                    Ok(inner)
                } else {
                    Ok(rebuild_keyword("unquote", expand(&inner, depth - 1)?))
                };
            }
            if keyword_form(template, "unquote-splicing").is_some() && depth == 0 {
                return Err(SchemeError::eval(
                    "unquote-splicing: not inside a list template",
                ));
            }
            if let Some(inner) = keyword_form(template, "unquote-splicing") {
                return Ok(rebuild_keyword("unquote-splicing", expand(&inner, depth - 1)?));
            }

            let head = pair.car();
            let tail = pair.cdr();

            // A head of the shape (unquote-splicing e) merges into the tail.
            if depth == 0
                && let Some(spliced) = keyword_form(&head, "unquote-splicing")
            {
                let tail_expr = expand(&tail, depth)?;
                return Ok(list_from_vec(vec![
                    Value::Symbol(Symbol::of("append")),
                    spliced,
                    tail_expr,
                ]));
            }

            let head_expr = expand(&head, depth)?;
            let tail_expr = expand(&tail, depth)?;

            // Collapse (cons 'head 'tail) back to '(head . tail).
            if let (Some(qh), Some(qt)) = (unquoted(&head_expr), unquoted(&tail_expr))
                && qh.is_eq(&head)
                && qt.is_eq(&tail)
            {
                return Ok(quoted(template.clone()));
            }

            Ok(list_from_vec(vec![
                Value::Symbol(Symbol::of("cons")),
                head_expr,
                tail_expr,
            ]))
        }
        _ => Ok(quoted(template.clone())),
    }
}

/// Rebuild a structurally preserved `(kw x)` at lower depth: the expression
/// `(list 'kw x-expr)`.
fn rebuild_keyword(keyword: &str, inner_expr: Value) -> Value {
    list_from_vec(vec![
        Value::Symbol(Symbol::of("list")),
        quoted(Value::Symbol(Symbol::of(keyword))),
        inner_expr,
    ])
}
