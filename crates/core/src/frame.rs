//! Evaluator stack frames
//!
//! The evaluator runs on an explicit stack of frames rather than the host
//! call stack: R5RS tail calls must not grow memory, and `call/cc` must be
//! able to snapshot the whole computation and re-enter it later. A frame is
//! an environment plus an opcode with its pending operands; a continuation
//! value is nothing more than a clone of the frame vector.
//!
//! Two pushing conventions (the evaluator relies on LIFO order):
//! a *jump* frame is executed next and produces the result register; a
//! *return* frame sits below a jumped-to chain and consumes the result
//! register once that chain finishes.

use std::cell::Cell;
use std::rc::Rc;

use crate::env::Env;
use crate::symbol::Symbol;
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct Frame {
    pub env: Rc<Env>,
    pub op: Op,
}

impl Frame {
    pub fn new(env: Rc<Env>, op: Op) -> Frame {
        Frame { env, op }
    }
}

/// Which of the four `let` family shapes a `LetStep` frame is running.
#[derive(Debug, Clone)]
pub enum LetKind {
    Let,
    /// Named let: the symbol becomes a self-recursive closure.
    Named(Symbol),
    LetSeq,
    LetRec,
}

#[derive(Debug, Clone)]
pub enum Op {
    /// Exit the loop, yielding the result register (Void if empty).
    Return,

    /// Central dispatch over one expression.
    Eval { expr: Value },

    /// Evaluate a sequence for effect, last expression in tail position.
    /// Discards whatever is in the result register on entry.
    Begin { body: Vec<Value> },

    /// Consume the test result and jump to one branch.
    IfTerm { conseq: Value, alt: Option<Value> },

    /// Short-circuit conjunction step over the remaining expressions.
    AndTest { rest: Vec<Value> },

    /// Short-circuit disjunction step.
    OrTest { rest: Vec<Value> },

    /// Consume an evaluated value and `replace` the binding.
    SetTerm { name: Symbol },

    /// Consume an evaluated value and `define` it in the innermost scope.
    DefineTerm { name: Symbol },

    /// `DefineTerm` that refuses to overwrite an existing local binding.
    MustDefineTerm { name: Symbol },

    /// Consume a `cond` clause-head result. `receiver` carries the target
    /// expression of a `(test => receiver)` clause.
    CondTest {
        receiver: Option<Value>,
        body: Vec<Value>,
        rest: Vec<Value>,
    },

    /// Application: operator and operands are evaluated left to right into
    /// `done`; when `pending` drains, `done[0]` is applied to the rest.
    CallStep { pending: Vec<Value>, done: Vec<Value> },

    /// Binding-form accumulator for the whole `let` family.
    LetStep {
        kind: LetKind,
        names: Vec<Symbol>,
        pending: Vec<Value>,
        done: Vec<Value>,
        body: Vec<Value>,
    },

    /// Consume the evaluated receiver of `call/cc`: snapshot the stack as a
    /// continuation and apply the receiver to it.
    CaptureTerm,
}

impl Op {
    /// Opcode name for trace output.
    pub fn name(&self) -> &'static str {
        match self {
            Op::Return => "RETURN",
            Op::Eval { .. } => "EVAL",
            Op::Begin { .. } => "BEGIN",
            Op::IfTerm { .. } => "IF",
            Op::AndTest { .. } => "AND",
            Op::OrTest { .. } => "OR",
            Op::SetTerm { .. } => "SET",
            Op::DefineTerm { .. } => "DEFINE",
            Op::MustDefineTerm { .. } => "MUST-DEFINE",
            Op::CondTest { .. } => "COND",
            Op::CallStep { .. } => "CALL",
            Op::LetStep { .. } => "LET",
            Op::CaptureTerm => "CALL/CC",
        }
    }
}

thread_local! {
    // Flipped by the (trace) form; read by the evaluator loop.
    static TRACE: Cell<bool> = const { Cell::new(false) };
}

pub fn trace_enabled() -> bool {
    TRACE.with(|t| t.get())
}

/// Toggle frame tracing, returning the new state.
pub fn toggle_trace() -> bool {
    TRACE.with(|t| {
        t.set(!t.get());
        t.get()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_clone_shallowly() {
        let env = Env::root();
        env.define(Symbol::of("x"), Value::from_i64(1));
        let frame = Frame::new(
            env.clone(),
            Op::Eval {
                expr: Value::symbol("x"),
            },
        );
        let copy = frame.clone();
        // The clone shares the environment cell.
        env.define(Symbol::of("x"), Value::from_i64(2));
        assert!(
            copy.env
                .lookup(&Symbol::of("x"))
                .unwrap()
                .is_eqv(&Value::from_i64(2))
        );
    }

    #[test]
    fn test_trace_toggle() {
        assert!(!trace_enabled());
        assert!(toggle_trace());
        assert!(trace_enabled());
        assert!(!toggle_trace());
    }
}
