//! Evaluation errors
//!
//! One error type for the whole pipeline. Two broad families exist: bind
//! errors raised at the builtin boundary (wrong argument type, wrong arity,
//! lossy conversion) and evaluation errors raised anywhere else (parsing,
//! arithmetic, unbound symbols, user calls to `error`). Both abort the
//! current top-level evaluation; continuations are never involved.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchemeError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemeError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("unbound symbol: {0}")]
    Unbound(String),

    /// Bind error: a builtin received a value of the wrong type.
    #[error("{procedure}: expected {expected}, got {got}")]
    WrongType {
        procedure: &'static str,
        expected: &'static str,
        got: String,
    },

    /// Bind error: a procedure received the wrong number of arguments.
    #[error("{procedure}: expected {expected} arguments, got {got}")]
    Arity {
        procedure: String,
        expected: String,
        got: usize,
    },

    #[error("index {index} out of range for {procedure}")]
    IndexOutOfRange { procedure: &'static str, index: String },

    #[error("value is immutable")]
    Immutable,

    #[error("division by zero")]
    DivisionByZero,

    /// Raised by the `error` builtin.
    #[error("{0}")]
    User(String),

    /// Anything else that aborts evaluation.
    #[error("{0}")]
    Eval(String),
}

impl SchemeError {
    /// Shorthand for ad-hoc evaluation errors.
    pub fn eval(msg: impl Into<String>) -> SchemeError {
        SchemeError::Eval(msg.into())
    }
}
