//! The evaluator
//!
//! A loop over an explicit stack of frames. Each iteration pops the top
//! frame, executes its opcode, pushes zero or more frames, and may set the
//! single result register; popping a `Return` frame ends the run. Using an
//! explicit stack rather than host recursion buys the two things R5RS
//! demands of an evaluator: tail calls consume no memory, and `call/cc` can
//! clone the stack into a first-class continuation and splice it back in
//! later, any number of times.
//!
//! Frame-pushing conventions (stack is LIFO):
//! to evaluate `X` and then resume with `Y`, push `Y` (the return frame,
//! which consumes the result register) and then push `X` (the jump frame,
//! which produces it). Tail position means pushing the tail expression as a
//! plain jump with no return frame above the caller's.

use std::rc::Rc;

use tracing::trace;

use schist_core::value::{Closure, Continuation, Procedure};
use schist_core::{
    Env, Frame, LetKind, Op, Result, SchemeError, Symbol, Value, improper_to_vec, list_from_vec,
    list_to_vec, toggle_trace, trace_enabled, write_str,
};

use crate::args;
use crate::quasiquote;

/// Evaluate one expression in `env`.
pub fn eval(expr: &Value, env: &Rc<Env>) -> Result<Value> {
    let stack = vec![
        Frame::new(env.clone(), Op::Return),
        Frame::new(
            env.clone(),
            Op::Eval {
                expr: expr.clone(),
            },
        ),
    ];
    run(stack, None)
}

/// Apply a procedure to already-evaluated arguments on a fresh stack.
/// This is the entry point builtins such as `apply`, `map` and `force` use
/// to call back into Scheme.
pub fn apply_procedure(procedure: &Value, arguments: Vec<Value>, env: &Rc<Env>) -> Result<Value> {
    let mut stack = vec![Frame::new(env.clone(), Op::Return)];
    let mut result = None;
    apply(&mut stack, env, procedure.clone(), arguments, &mut result)?;
    run(stack, result)
}

fn run(mut stack: Vec<Frame>, mut result: Option<Value>) -> Result<Value> {
    loop {
        let frame = stack.pop().expect("evaluator stack underflow");
        if trace_enabled() {
            trace!(op = frame.op.name(), depth = stack.len(), "frame");
        }
        let env = frame.env;
        match frame.op {
            Op::Return => return Ok(result.unwrap_or(Value::Void)),

            Op::Eval { expr } => dispatch(&mut stack, &env, expr, &mut result)?,

            Op::Begin { body } => begin(&mut stack, &env, body, &mut result),

            Op::IfTerm { conseq, alt } => {
                let test = result.take().unwrap_or(Value::Void);
                if test.is_truthy() {
                    jmp_eval(&mut stack, &env, conseq);
                } else if let Some(alt) = alt {
                    jmp_eval(&mut stack, &env, alt);
                } else {
                    result = Some(Value::Void);
                }
            }

            Op::AndTest { rest } => {
                let current = result.clone().unwrap_or(Value::Void);
                if current.is_truthy() {
                    step_junction(&mut stack, &env, rest, true);
                }
                // A false result short-circuits: leave it and fall through.
            }

            Op::OrTest { rest } => {
                let current = result.clone().unwrap_or(Value::Void);
                if !current.is_truthy() {
                    step_junction(&mut stack, &env, rest, false);
                }
            }

            Op::SetTerm { name } => {
                let value = result.take().unwrap_or(Value::Void);
                env.replace(&name, value)?;
                result = Some(Value::Void);
            }

            Op::DefineTerm { name } => {
                let value = result.take().unwrap_or(Value::Void);
                env.define(name, value);
                result = Some(Value::Void);
            }

            Op::MustDefineTerm { name } => {
                if env.is_bound_locally(&name) {
                    return Err(SchemeError::eval(format!(
                        "define: {name} is already bound in this scope"
                    )));
                }
                let value = result.take().unwrap_or(Value::Void);
                env.define(name, value);
                result = Some(Value::Void);
            }

            Op::CondTest {
                receiver,
                body,
                rest,
            } => {
                let test = result.take().unwrap_or(Value::Void);
                if test.is_truthy() {
                    if let Some(receiver) = receiver {
                        // (test => receiver): call the receiver on the test
                        // value, in tail position. Wrapping the value in a
                        // quote lets it ride inside an expression.
                        let call = list_from_vec(vec![
                            receiver,
                            list_from_vec(vec![Value::Symbol(Symbol::of("quote")), test]),
                        ]);
                        jmp_eval(&mut stack, &env, call);
                    } else if body.is_empty() {
                        result = Some(test);
                    } else {
                        stack.push(Frame::new(env.clone(), Op::Begin { body }));
                    }
                } else {
                    cond_step(&mut stack, &env, rest, &mut result)?;
                }
            }

            Op::CallStep { mut pending, mut done } => {
                done.push(result.take().unwrap_or(Value::Void));
                match pending.pop() {
                    Some(next) => {
                        stack.push(Frame::new(env.clone(), Op::CallStep { pending, done }));
                        jmp_eval(&mut stack, &env, next);
                    }
                    None => {
                        let procedure = done.remove(0);
                        apply(&mut stack, &env, procedure, done, &mut result)?;
                    }
                }
            }

            Op::LetStep {
                kind,
                names,
                mut pending,
                mut done,
                body,
            } => {
                let value = result.take().unwrap_or(Value::Void);
                match kind {
                    LetKind::Let | LetKind::Named(_) => done.push(value),
                    // let* and letrec bind as they go; env is the child.
                    LetKind::LetSeq | LetKind::LetRec => {
                        env.define(names[done.len()].clone(), value);
                        done.push(Value::Void);
                    }
                }
                match pending.pop() {
                    Some(next) => {
                        stack.push(Frame::new(
                            env.clone(),
                            Op::LetStep {
                                kind,
                                names,
                                pending,
                                done,
                                body,
                            },
                        ));
                        jmp_eval(&mut stack, &env, next);
                    }
                    None => finish_let(&mut stack, &env, kind, names, done, body, &mut result)?,
                }
            }

            Op::CaptureTerm => {
                let receiver = result.take().unwrap_or(Value::Void);
                // The frames below this one are exactly the rest of the
                // computation; snapshot them.
                let k = Value::Procedure(Procedure::Continuation(Rc::new(Continuation {
                    frames: stack.clone(),
                })));
                apply(&mut stack, &env, receiver, vec![k], &mut result)?;
            }
        }
    }
}

/// Push a jump frame: `expr` evaluates next and fills the result register.
fn jmp_eval(stack: &mut Vec<Frame>, env: &Rc<Env>, expr: Value) {
    stack.push(Frame::new(env.clone(), Op::Eval { expr }));
}

/// One step of `and`/`or`: the last expression runs as a plain jump (tail
/// position), earlier ones keep a test frame above the caller.
fn step_junction(stack: &mut Vec<Frame>, env: &Rc<Env>, mut rest: Vec<Value>, conjunction: bool) {
    if rest.is_empty() {
        return;
    }
    let next = rest.remove(0);
    if !rest.is_empty() {
        let op = if conjunction {
            Op::AndTest { rest }
        } else {
            Op::OrTest { rest }
        };
        stack.push(Frame::new(env.clone(), op));
    }
    jmp_eval(stack, env, next);
}

/// Central dispatch: symbols look themselves up, atoms yield themselves,
/// pair chains are special forms or applications.
fn dispatch(
    stack: &mut Vec<Frame>,
    env: &Rc<Env>,
    expr: Value,
    result: &mut Option<Value>,
) -> Result<()> {
    match expr {
        Value::Symbol(name) => {
            *result = Some(env.lookup(&name)?);
            Ok(())
        }
        Value::Pair(_) => {
            let (items, tail) = improper_to_vec(&expr)
                .ok_or_else(|| SchemeError::eval("cannot evaluate a cyclic form"))?;
            if !matches!(tail, Value::Null) {
                return Err(SchemeError::eval(format!(
                    "improper list in application: {}",
                    write_str(&expr)
                )));
            }
            if let Value::Symbol(head) = &items[0]
                && head.is_interned()
                && special_form(stack, env, head.name(), &items[1..], result)?
            {
                return Ok(());
            }
            // Application: evaluate operator and operands left to right.
            let mut pending = items;
            pending.reverse();
            let first = pending.pop().expect("application is non-empty");
            stack.push(Frame::new(
                env.clone(),
                Op::CallStep {
                    pending,
                    done: Vec::new(),
                },
            ));
            jmp_eval(stack, env, first);
            Ok(())
        }
        // Non-list atoms (including () and vectors) evaluate to themselves.
        atom => {
            *result = Some(atom);
            Ok(())
        }
    }
}

/// Handle a special form. Returns false if `name` is not a keyword and the
/// expression should be treated as an application.
fn special_form(
    stack: &mut Vec<Frame>,
    env: &Rc<Env>,
    name: &str,
    args: &[Value],
    result: &mut Option<Value>,
) -> Result<bool> {
    match name {
        "quote" => {
            args::exactly("quote", 1, args)?;
            *result = Some(args[0].clone());
        }

        "quasiquote" => {
            args::exactly("quasiquote", 1, args)?;
            let expanded = quasiquote::expand(&args[0], 0)?;
            jmp_eval(stack, env, expanded);
        }

        "unquote" | "unquote-splicing" => {
            return Err(SchemeError::eval(format!("{name}: not inside quasiquote")));
        }

        "if" => {
            if args.len() != 2 && args.len() != 3 {
                return Err(SchemeError::eval("if: expected test, consequent and optional alternate"));
            }
            stack.push(Frame::new(
                env.clone(),
                Op::IfTerm {
                    conseq: args[1].clone(),
                    alt: args.get(2).cloned(),
                },
            ));
            jmp_eval(stack, env, args[0].clone());
        }

        "set!" => {
            args::exactly("set!", 2, args)?;
            let name = args::symbol("set!", &args[0])?;
            stack.push(Frame::new(env.clone(), Op::SetTerm { name }));
            jmp_eval(stack, env, args[1].clone());
        }

        "define" => define_form(stack, env, args, result)?,

        "lambda" => {
            if args.len() < 2 {
                return Err(SchemeError::eval("lambda: expected formals and a body"));
            }
            let (params, variadic) = parse_formals(&args[0])?;
            *result = Some(Value::Procedure(Procedure::Closure(Rc::new(Closure {
                env: env.clone(),
                params,
                variadic,
                body: args[1..].to_vec(),
            }))));
        }

        "delay" => {
            args::exactly("delay", 1, args)?;
            *result = Some(Value::Promise(Rc::new(schist_core::Promise {
                env: env.clone(),
                body: args[0].clone(),
                memo: std::cell::RefCell::new(None),
            })));
        }

        "begin" => {
            stack.push(Frame::new(env.clone(), Op::Begin { body: args.to_vec() }));
        }

        "and" => {
            if args.is_empty() {
                *result = Some(Value::Boolean(true));
            } else {
                step_junction(stack, env, args.to_vec(), true);
            }
        }

        "or" => {
            if args.is_empty() {
                *result = Some(Value::Boolean(false));
            } else {
                step_junction(stack, env, args.to_vec(), false);
            }
        }

        "cond" => cond_step(stack, env, args.to_vec(), result)?,

        "let" => let_form(stack, env, args, result)?,
        "let*" => binding_form(stack, env, LetKind::LetSeq, args, result)?,
        "letrec" => binding_form(stack, env, LetKind::LetRec, args, result)?,

        "do" => do_form(stack, env, args)?,

        "call/cc" | "call-with-current-continuation" => {
            args::exactly("call/cc", 1, args)?;
            stack.push(Frame::new(env.clone(), Op::CaptureTerm));
            jmp_eval(stack, env, args[0].clone());
        }

        "trace" => {
            args::exactly("trace", 0, args)?;
            *result = Some(Value::Boolean(toggle_trace()));
        }

        _ => return Ok(false),
    }
    Ok(true)
}

/// Binding names in let/do forms must be symbols.
fn binding_symbol(form: &str, value: &Value) -> Result<Symbol> {
    match value {
        Value::Symbol(sym) => Ok(sym.clone()),
        other => Err(SchemeError::eval(format!(
            "{form}: expected a symbol to bind, got {}",
            write_str(other)
        ))),
    }
}

/// `(begin e1 ... en)`: discard the register, run the sequence, tail-jump the
/// last expression.
fn begin(stack: &mut Vec<Frame>, env: &Rc<Env>, mut body: Vec<Value>, result: &mut Option<Value>) {
    match body.len() {
        0 => *result = Some(Value::Void),
        1 => jmp_eval(stack, env, body.remove(0)),
        _ => {
            let first = body.remove(0);
            stack.push(Frame::new(env.clone(), Op::Begin { body }));
            jmp_eval(stack, env, first);
        }
    }
}

/// Start (or continue) a `cond`: evaluate the next clause head, or finish.
fn cond_step(
    stack: &mut Vec<Frame>,
    env: &Rc<Env>,
    mut clauses: Vec<Value>,
    result: &mut Option<Value>,
) -> Result<()> {
    if clauses.is_empty() {
        *result = Some(Value::Void);
        return Ok(());
    }
    let clause = clauses.remove(0);
    let parts = list_to_vec(&clause)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| SchemeError::eval(format!("cond: malformed clause {}", write_str(&clause))))?;

    if let Value::Symbol(head) = &parts[0]
        && head.is_interned()
        && head.name() == "else"
    {
        if !clauses.is_empty() {
            return Err(SchemeError::eval("cond: else must be the last clause"));
        }
        if parts.len() == 1 {
            return Err(SchemeError::eval("cond: else clause needs a body"));
        }
        stack.push(Frame::new(env.clone(), Op::Begin { body: parts[1..].to_vec() }));
        return Ok(());
    }

    let test = parts[0].clone();
    let (receiver, body) = match parts.as_slice() {
        [_, Value::Symbol(arrow), receiver]
            if arrow.is_interned() && arrow.name() == "=>" =>
        {
            (Some(receiver.clone()), Vec::new())
        }
        _ => (None, parts[1..].to_vec()),
    };
    stack.push(Frame::new(
        env.clone(),
        Op::CondTest {
            receiver,
            body,
            rest: clauses,
        },
    ));
    jmp_eval(stack, env, test);
    Ok(())
}

/// `(define x e)` and `(define (f p...) body...)`.
fn define_form(
    stack: &mut Vec<Frame>,
    env: &Rc<Env>,
    args: &[Value],
    result: &mut Option<Value>,
) -> Result<()> {
    if args.is_empty() {
        return Err(SchemeError::eval("define: expected a name"));
    }
    match &args[0] {
        Value::Symbol(name) => {
            args::exactly("define", 2, args)?;
            stack.push(Frame::new(env.clone(), Op::DefineTerm { name: name.clone() }));
            jmp_eval(stack, env, args[1].clone());
            Ok(())
        }
        Value::Pair(_) => {
            // (define (f p...) body...) is the same as (define f (lambda (p...) body...))
            let (header, tail) = improper_to_vec(&args[0])
                .ok_or_else(|| SchemeError::eval("define: malformed header"))?;
            if !matches!(tail, Value::Null) {
                return Err(SchemeError::eval(
                    "define: dotted parameter lists are not supported",
                ));
            }
            if header.is_empty() || args.len() < 2 {
                return Err(SchemeError::eval("define: expected a name and a body"));
            }
            let name = args::symbol("define", &header[0])?;
            let params = header[1..]
                .iter()
                .map(|p| args::symbol("define", p))
                .collect::<Result<Vec<_>>>()?;
            let closure = Value::Procedure(Procedure::Closure(Rc::new(Closure {
                env: env.clone(),
                params,
                variadic: false,
                body: args[1..].to_vec(),
            })));
            env.define(name, closure);
            *result = Some(Value::Void);
            Ok(())
        }
        other => Err(SchemeError::eval(format!(
            "define: expected a symbol or header, got {}",
            write_str(other)
        ))),
    }
}

/// Lambda formals: a bare symbol collects all arguments, a proper list of
/// symbols is a fixed arity. Dotted formals are rejected.
fn parse_formals(formals: &Value) -> Result<(Vec<Symbol>, bool)> {
    match formals {
        Value::Symbol(sym) => Ok((vec![sym.clone()], true)),
        Value::Null => Ok((Vec::new(), false)),
        Value::Pair(_) => {
            let (items, tail) = improper_to_vec(formals)
                .ok_or_else(|| SchemeError::eval("lambda: malformed formals"))?;
            if !matches!(tail, Value::Null) {
                return Err(SchemeError::eval(
                    "lambda: dotted parameter lists are not supported",
                ));
            }
            let params = items
                .iter()
                .map(|p| args::symbol("lambda", p))
                .collect::<Result<Vec<_>>>()?;
            Ok((params, false))
        }
        other => Err(SchemeError::eval(format!(
            "lambda: bad formals {}",
            write_str(other)
        ))),
    }
}

/// `let`, distinguishing the named variant.
fn let_form(
    stack: &mut Vec<Frame>,
    env: &Rc<Env>,
    args: &[Value],
    result: &mut Option<Value>,
) -> Result<()> {
    match args.first() {
        Some(Value::Symbol(name)) => {
            binding_form(stack, env, LetKind::Named(name.clone()), &args[1..], result)
        }
        _ => binding_form(stack, env, LetKind::Let, args, result),
    }
}

/// Shared machinery for the whole let family. `args` is `(bindings body...)`.
fn binding_form(
    stack: &mut Vec<Frame>,
    env: &Rc<Env>,
    kind: LetKind,
    args: &[Value],
    result: &mut Option<Value>,
) -> Result<()> {
    let form = match kind {
        LetKind::Let | LetKind::Named(_) => "let",
        LetKind::LetSeq => "let*",
        LetKind::LetRec => "letrec",
    };
    if args.len() < 2 {
        return Err(SchemeError::eval(format!("{form}: expected bindings and a body")));
    }
    let bindings = list_to_vec(&args[0])
        .ok_or_else(|| SchemeError::eval(format!("{form}: malformed bindings")))?;
    let body = args[1..].to_vec();

    let mut names = Vec::with_capacity(bindings.len());
    let mut inits = Vec::with_capacity(bindings.len());
    for binding in &bindings {
        let parts = list_to_vec(binding)
            .filter(|p| p.len() == 2)
            .ok_or_else(|| {
                SchemeError::eval(format!("{form}: malformed binding {}", write_str(binding)))
            })?;
        names.push(binding_symbol(form, &parts[0])?);
        inits.push(parts[1].clone());
    }

    // let and named let bind simultaneously; duplicates would be ambiguous.
    if matches!(kind, LetKind::Let | LetKind::Named(_)) {
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(SchemeError::eval(format!("{form}: duplicate binding {name}")));
            }
        }
    }

    // Where do the init expressions evaluate? let/named let: the enclosing
    // scope. let*: a child scope that grows as bindings land. letrec: a
    // child scope with every name pre-declared.
    let eval_env = match kind {
        LetKind::Let | LetKind::Named(_) => env.clone(),
        LetKind::LetSeq => Env::child(env),
        LetKind::LetRec => {
            let child = Env::child(env);
            for name in &names {
                child.define(name.clone(), Value::Void);
            }
            child
        }
    };

    let mut pending = inits;
    pending.reverse();
    match pending.pop() {
        Some(first) => {
            stack.push(Frame::new(
                eval_env.clone(),
                Op::LetStep {
                    kind,
                    names,
                    pending,
                    done: Vec::new(),
                    body,
                },
            ));
            jmp_eval(stack, &eval_env, first);
            Ok(())
        }
        None => finish_let(stack, &eval_env, kind, names, Vec::new(), body, result),
    }
}

/// All inits are evaluated; build the body environment and run the body.
fn finish_let(
    stack: &mut Vec<Frame>,
    eval_env: &Rc<Env>,
    kind: LetKind,
    names: Vec<Symbol>,
    values: Vec<Value>,
    body: Vec<Value>,
    result: &mut Option<Value>,
) -> Result<()> {
    match kind {
        LetKind::Let => {
            let child = Env::child(eval_env);
            for (name, value) in names.into_iter().zip(values) {
                child.define(name, value);
            }
            stack.push(Frame::new(child, Op::Begin { body }));
            Ok(())
        }
        LetKind::Named(name) => {
            // The loop name closes over a scope holding only itself, so the
            // body can recurse through it.
            let child = Env::child(eval_env);
            let closure = Value::Procedure(Procedure::Closure(Rc::new(Closure {
                env: child.clone(),
                params: names,
                variadic: false,
                body,
            })));
            child.define(name, closure.clone());
            apply(stack, &child, closure, values, result)
        }
        // let* and letrec already bound everything in eval_env.
        LetKind::LetSeq | LetKind::LetRec => {
            stack.push(Frame::new(eval_env.clone(), Op::Begin { body }));
            Ok(())
        }
    }
}

/// `(do ((v init step)...) (test result...) cmd...)`, expanded at evaluation time
/// into a self-recursive loop closure bound to a fresh uninterned symbol
/// (user code cannot capture or shadow it).
fn do_form(stack: &mut Vec<Frame>, env: &Rc<Env>, args: &[Value]) -> Result<()> {
    if args.len() < 2 {
        return Err(SchemeError::eval("do: expected bindings and a test clause"));
    }
    let bindings = list_to_vec(&args[0])
        .ok_or_else(|| SchemeError::eval("do: malformed bindings"))?;
    let mut vars = Vec::with_capacity(bindings.len());
    let mut inits = Vec::with_capacity(bindings.len());
    let mut steps = Vec::with_capacity(bindings.len());
    for binding in &bindings {
        let parts = list_to_vec(binding)
            .filter(|p| p.len() == 2 || p.len() == 3)
            .ok_or_else(|| {
                SchemeError::eval(format!("do: malformed binding {}", write_str(binding)))
            })?;
        let var = binding_symbol("do", &parts[0])?;
        inits.push(parts[1].clone());
        // Without a step expression the variable rebinds to itself.
        steps.push(parts.get(2).cloned().unwrap_or(Value::Symbol(var.clone())));
        vars.push(var);
    }

    let exit = list_to_vec(&args[1])
        .filter(|p| !p.is_empty())
        .ok_or_else(|| SchemeError::eval("do: malformed test clause"))?;
    let test = exit[0].clone();
    let results = exit[1..].to_vec();
    let commands = args[2..].to_vec();

    let loop_name = Symbol::uninterned("do-loop");
    let begin_sym = Value::Symbol(Symbol::of("begin"));

    // (loop step...)
    let mut recur = vec![Value::Symbol(loop_name.clone())];
    recur.extend(steps);
    // (begin cmd... (loop step...))
    let mut else_body = vec![begin_sym.clone()];
    else_body.extend(commands);
    else_body.push(list_from_vec(recur));
    // (begin result...)
    let mut then_body = vec![begin_sym];
    then_body.extend(results);
    // (if test (begin result...) (begin cmd... (loop step...)))
    let loop_body = list_from_vec(vec![
        Value::Symbol(Symbol::of("if")),
        test,
        list_from_vec(then_body),
        list_from_vec(else_body),
    ]);

    let child = Env::child(env);
    let closure = Value::Procedure(Procedure::Closure(Rc::new(Closure {
        env: child.clone(),
        params: vars,
        variadic: false,
        body: vec![loop_body],
    })));

    // (loop init...), evaluated once the loop name is defined. The init
    // expressions see only the uninterned loop binding above `env`, so their
    // meaning is that of the enclosing scope.
    let mut call = vec![Value::Symbol(loop_name.clone())];
    call.extend(inits);
    stack.push(Frame::new(child.clone(), Op::Eval { expr: list_from_vec(call) }));
    stack.push(Frame::new(child.clone(), Op::MustDefineTerm { name: loop_name }));
    stack.push(Frame::new(child, Op::Eval { expr: closure }));
    Ok(())
}

/// Apply a procedure to evaluated arguments. Closures jump into their body
/// (tail position); continuations replace the whole stack.
pub(crate) fn apply(
    stack: &mut Vec<Frame>,
    env: &Rc<Env>,
    procedure: Value,
    arguments: Vec<Value>,
    result: &mut Option<Value>,
) -> Result<()> {
    match &procedure {
        Value::Procedure(Procedure::Builtin(builtin)) => {
            *result = Some((builtin.run)(env, &arguments)?);
            Ok(())
        }
        Value::Procedure(Procedure::Closure(closure)) => {
            let scope = Env::child(&closure.env);
            if closure.variadic {
                scope.define(closure.params[0].clone(), list_from_vec(arguments));
            } else {
                if arguments.len() != closure.params.len() {
                    return Err(SchemeError::Arity {
                        procedure: write_str(&procedure),
                        expected: closure.params.len().to_string(),
                        got: arguments.len(),
                    });
                }
                for (param, argument) in closure.params.iter().zip(arguments) {
                    scope.define(param.clone(), argument);
                }
            }
            stack.push(Frame::new(scope, Op::Begin { body: closure.body.clone() }));
            Ok(())
        }
        Value::Procedure(Procedure::Continuation(continuation)) => {
            // Re-enter the captured computation with the argument as the
            // value of the original call/cc expression.
            stack.clear();
            stack.extend(continuation.frames.iter().cloned());
            *result = Some(arguments.into_iter().next().unwrap_or(Value::Void));
            Ok(())
        }
        other => Err(SchemeError::eval(format!(
            "attempt to apply non-procedure {}",
            write_str(other)
        ))),
    }
}
