//! schist-reader: source text to `Value` trees
//!
//! Two stages: `token` matches the fixed token set by anchored regexes in
//! precedence order; `parser` runs recursive descent over the tokens. The
//! output is ordinary `schist_core::Value` data (lists, vectors, atoms),
//! marked immutable, ready for the evaluator or for `quote`.

pub mod parser;
pub mod token;

pub use parser::{Parser, parse_all, parse_str};
pub use token::{Token, TokenKind, tokenize};
