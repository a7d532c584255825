//! schist-core: the data model of the schist Scheme interpreter
//!
//! Everything passive lives here: tagged runtime values, the three-type
//! numeric tower, interned symbols, lexical environments, evaluator frames
//! (the data a continuation snapshots), ports, printing, and the error type.
//! The evaluator itself and the builtin procedures live in `schist-vm`; the
//! reader lives in `schist-reader`.
//!
//! # Modules
//!
//! - `value`: the `Value` sum and identity/equality
//! - `number`: Integer/Rational/Real with promotion
//! - `symbol`: interning and `gensym` tags
//! - `env`: scope chains with define/replace/lookup
//! - `frame`: explicit-stack frames and the trace toggle
//! - `port`: character-in / bytes-out ports
//! - `print`: `write` and `display` renderings
//! - `error`: `SchemeError`

pub mod env;
pub mod error;
pub mod frame;
pub mod number;
pub mod port;
pub mod print;
pub mod symbol;
pub mod value;

pub use env::Env;
pub use error::{Result, SchemeError};
pub use frame::{Frame, LetKind, Op, toggle_trace, trace_enabled};
pub use number::Number;
pub use port::Port;
pub use print::{display_str, write_str};
pub use symbol::Symbol;
pub use value::{
    Builtin, Closure, Continuation, NativeFn, Pair, Procedure, Promise, SchemeString,
    SchemeVector, Value, improper_to_vec, is_proper_list, list_from_vec, list_to_vec,
    literal_list,
};
