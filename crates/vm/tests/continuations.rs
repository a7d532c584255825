//! `call/cc` behavior: escapes, re-entry, and continuations as plain values.

use schist_core::write_str;
use schist_vm::Interpreter;

fn run(source: &str) -> String {
    let interp = Interpreter::new();
    match interp.load_str(source) {
        Ok(Some(value)) => write_str(&value),
        Ok(None) => String::new(),
        Err(e) => panic!("evaluation of {source:?} failed: {e}"),
    }
}

#[test]
fn test_escape_from_nested_arithmetic() {
    assert_eq!(run("(+ 1 (call/cc (lambda (k) (+ 2 (k 3)))))"), "4");
    assert_eq!(run("(* 10 (call/cc (lambda (k) 5)))"), "50");
    assert_eq!(
        run("(call/cc (lambda (k) (+ 1 2 (k 10) 20)))"),
        "10"
    );
}

#[test]
fn test_continuation_prints_opaquely() {
    assert_eq!(run("(call/cc (lambda (k) k))"), "#[continuation]");
}

#[test]
fn test_continuation_is_a_procedure() {
    assert_eq!(run("(call/cc procedure?)"), "#t");
    assert_eq!(run("(procedure? (call/cc (lambda (k) k)))"), "#t");
}

#[test]
fn test_reentry_within_one_expression() {
    // First pass binds k to the continuation; invoking it re-enters the
    // binding with k = #f and takes the other branch.
    assert_eq!(
        run("(define count 0) \
             (let ((k (call/cc (lambda (c) c)))) \
               (set! count (+ count 1)) \
               (if (procedure? k) (k #f) count))"),
        "2"
    );
}

#[test]
fn test_invoking_with_no_arguments_yields_void() {
    assert_eq!(
        run("(define done #f) \
             (if done 'again (call/cc (lambda (k) (set! done #t) (k))))"),
        "#<void>"
    );
}

#[test]
fn test_saved_continuation_survives_the_expression() {
    let interp = Interpreter::new();
    let first = interp
        .load_str(
            "(define resume #f) \
             (cons 'head (call/cc (lambda (k) (set! resume k) '(tail))))",
        )
        .unwrap()
        .unwrap();
    assert_eq!(write_str(&first), "(head tail)");
    // Re-entering rebuilds the cons with a different tail each time.
    let again = interp.load_str("(resume '(other))").unwrap().unwrap();
    assert_eq!(write_str(&again), "(head other)");
    let third = interp.load_str("(resume '())").unwrap().unwrap();
    assert_eq!(write_str(&third), "(head)");
}

#[test]
fn test_both_call_cc_spellings_agree() {
    assert_eq!(
        run("(call-with-current-continuation (lambda (k) (k 'ok)))"),
        "ok"
    );
    assert_eq!(run("(call/cc (lambda (k) (k 'ok)))"), "ok");
}

#[test]
fn test_capture_under_let_and_cond() {
    assert_eq!(
        run("(let ((x (call/cc (lambda (k) (k 7))))) (+ x 1))"),
        "8"
    );
    assert_eq!(
        run("(cond ((call/cc (lambda (k) (k #f))) 'then) (else 'other))"),
        "other"
    );
}

#[test]
fn test_continuation_discards_pending_work() {
    // The (error ...) after the escape is never reached.
    assert_eq!(
        run("(call/cc (lambda (k) (begin (k 'early) (error \"unreachable\"))))"),
        "early"
    );
}
