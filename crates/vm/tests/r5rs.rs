//! End-to-end evaluation tests through `Interpreter::load_str`.

use schist_core::{Port, SchemeError, write_str};
use schist_vm::Interpreter;

/// Evaluate `source` on a fresh interpreter and render the last value.
fn run(source: &str) -> String {
    let interp = Interpreter::new();
    match interp.load_str(source) {
        Ok(Some(value)) => write_str(&value),
        Ok(None) => String::new(),
        Err(e) => panic!("evaluation of {source:?} failed: {e}"),
    }
}

fn run_err(source: &str) -> SchemeError {
    let interp = Interpreter::new();
    interp
        .load_str(source)
        .expect_err(&format!("expected {source:?} to fail"))
}

#[test]
fn test_self_evaluating_atoms() {
    assert_eq!(run("42"), "42");
    assert_eq!(run("#t"), "#t");
    assert_eq!(run("\"hi\""), "\"hi\"");
    assert_eq!(run(r"#\a"), r"#\a");
    assert_eq!(run("()"), "()");
    assert_eq!(run("#(1 2)"), "#(1 2)");
}

#[test]
fn test_quote() {
    assert_eq!(run("'x"), "x");
    assert_eq!(run("'(1 2 3)"), "(1 2 3)");
    assert_eq!(run("''x"), "(quote x)");
}

#[test]
fn test_if_and_truthiness() {
    assert_eq!(run("(if #t 1 2)"), "1");
    assert_eq!(run("(if #f 1 2)"), "2");
    // Only the false boolean is false.
    assert_eq!(run("(if 0 1 2)"), "1");
    assert_eq!(run("(if '() 1 2)"), "1");
    assert_eq!(run("(if \"\" 1 2)"), "1");
    assert_eq!(run("(if #f 1)"), "#<void>");
}

#[test]
fn test_define_set_and_lookup() {
    assert_eq!(run("(define x 1) (set! x 2) x"), "2");
    assert!(matches!(run_err("(set! nope 1)"), SchemeError::Unbound(_)));
    assert!(matches!(run_err("nope"), SchemeError::Unbound(_)));
}

#[test]
fn test_lambda_and_application() {
    assert_eq!(run("((lambda (x y) (+ x y)) 3 4)"), "7");
    assert_eq!(run("(define (twice f x) (f (f x))) (twice (lambda (n) (* n n)) 3)"), "81");
    // Whole-list variadic formals.
    assert_eq!(run("((lambda args args) 1 2 3)"), "(1 2 3)");
    // Dotted formals are rejected.
    assert!(run_err("((lambda (a . b) a) 1 2)").to_string().contains("dotted"));
    assert!(matches!(
        run_err("((lambda (x) x) 1 2)"),
        SchemeError::Arity { .. }
    ));
    assert!(run_err("(1 2)").to_string().contains("non-procedure"));
}

#[test]
fn test_closures_capture_their_scope() {
    assert_eq!(
        run("(define c (let ((n 0)) (lambda () (set! n (+ n 1)) n))) (c) (c) (c)"),
        "3"
    );
}

#[test]
fn test_begin_sequencing() {
    assert_eq!(run("(begin 1 2 3)"), "3");
    assert_eq!(run("(begin)"), "#<void>");
    assert_eq!(run("(define x 0) (begin (set! x 5) x)"), "5");
}

#[test]
fn test_and_or() {
    assert_eq!(run("(and)"), "#t");
    assert_eq!(run("(and 1 2 3)"), "3");
    assert_eq!(run("(and 1 #f 3)"), "#f");
    assert_eq!(run("(or)"), "#f");
    assert_eq!(run("(or #f 2)"), "2");
    assert_eq!(run("(or #f #f)"), "#f");
    // Short circuit: the unbound symbol is never evaluated.
    assert_eq!(run("(and #f nope)"), "#f");
    assert_eq!(run("(or 1 nope)"), "1");
}

#[test]
fn test_cond() {
    assert_eq!(run("(cond (#f 1) (#t 2) (else 3))"), "2");
    assert_eq!(run("(cond (#f 1) (else 3))"), "3");
    assert_eq!(run("(cond (#f 1))"), "#<void>");
    // A body-less clause yields the test value.
    assert_eq!(run("(cond (#f) (7))"), "7");
    // (test => receiver) applies the receiver to the test value.
    assert_eq!(run("(cond ((memq 'b '(a b c)) => car) (else 'no))"), "b");
    assert!(run_err("(cond (else 1) (#t 2))").to_string().contains("else"));
}

#[test]
fn test_let_family() {
    assert_eq!(run("(let ((x 2) (y 3)) (* x y))"), "6");
    // let evaluates inits in the outer scope.
    assert_eq!(run("(define x 10) (let ((x 1) (y x)) y)"), "10");
    // let* sees earlier bindings.
    assert_eq!(run("(let* ((x 1) (y (+ x 1))) y)"), "2");
    // letrec supports mutual recursion.
    assert_eq!(
        run("(letrec ((even? (lambda (n) (if (= n 0) #t (odd? (- n 1))))) \
                      (odd? (lambda (n) (if (= n 0) #f (even? (- n 1)))))) \
              (even? 10))"),
        "#t"
    );
    assert!(run_err("(let ((x 1) (x 2)) x)").to_string().contains("duplicate"));
}

#[test]
fn test_named_let_loop() {
    assert_eq!(
        run("(let loop ((i 0) (sum 0)) (if (= i 10) sum (loop (+ i 1) (+ sum i))))"),
        "45"
    );
}

#[test]
fn test_do_loop() {
    assert_eq!(
        run("(do ((i 0 (+ i 1)) (acc 1 (* acc 2))) ((= i 5) acc))"),
        "32"
    );
    // Commands run each iteration; a stepless variable keeps its binding.
    assert_eq!(
        run("(define x 0) (do ((i 0 (+ i 1)) (lim 3)) ((= i lim) x) (set! x (+ x i)))"),
        "3"
    );
    assert_eq!(run("(do ((i 0 (+ i 1))) ((= i 2)))"), "#<void>");
}

#[test]
fn test_factorial_bignum() {
    assert_eq!(
        run("(define (fact n) (if (<= n 1) 1 (* n (fact (- n 1))))) (fact 20)"),
        "2432902008176640000"
    );
    // Past the 64-bit range.
    assert_eq!(
        run("(define (fact n) (if (<= n 1) 1 (* n (fact (- n 1))))) (fact 25)"),
        "15511210043330985984000000"
    );
}

#[test]
fn test_tail_recursion_runs_in_bounded_memory() {
    assert_eq!(
        run("(define (f n) (if (= n 0) 'done (f (- n 1)))) (f 200000)"),
        "done"
    );
}

#[test]
fn test_numeric_tower() {
    // Integer division closes over the rationals instead of going inexact.
    assert_eq!(run("(/ 1 3)"), "1/3");
    assert_eq!(run("(/ 10 4)"), "5/2");
    assert_eq!(run("(/ -1 2)"), "-1/2");
    assert_eq!(run("(+ (/ 1 3) (/ 2 3))"), "1");
    assert_eq!(run("(exact? (/ 1 3))"), "#t");
    assert_eq!(run("(exact? 1.5)"), "#f");
    assert_eq!(run("(* (/ 1 2) 2.0)"), "1.0");
    assert_eq!(run("(modulo 7 -2)"), "-1");
    assert_eq!(run("(remainder 7 -2)"), "1");
    assert_eq!(run("(quotient 7 -2)"), "-3");
    assert_eq!(run("(max 1 (/ 5 2) 2)"), "5/2");
    assert_eq!(run("(min 1 (/ 5 2) 2)"), "1");
    assert_eq!(run("(abs -7)"), "7");
    assert_eq!(run("(sqrt 4)"), "2.0");
    assert_eq!(run("(exact? (sqrt 4))"), "#f");
    assert_eq!(run("(integer? (/ 4 2))"), "#t");
    assert_eq!(run("(integer? 3.0)"), "#t");
    assert_eq!(run("(rational? 2)"), "#t");
    assert_eq!(run("(number? 'x)"), "#f");
    assert_eq!(run("(even? 4)"), "#t");
    assert_eq!(run("(odd? 3)"), "#t");
    assert_eq!(run("(zero? 0)"), "#t");
    assert_eq!(run("(positive? (- 0 3))"), "#f");
    assert_eq!(run("(negative? -3)"), "#t");
    assert!(matches!(run_err("(/ 1 0)"), SchemeError::DivisionByZero));
}

#[test]
fn test_identity_laws() {
    assert_eq!(run("(define x '(a)) (eq? x x)"), "#t");
    assert_eq!(run("(eq? 'foo (string->symbol \"FOO\"))"), "#t");
    assert_eq!(run("(eq? (gensym) (gensym))"), "#f");
    assert_eq!(run("(eqv? 2 2)"), "#t");
    assert_eq!(run("(eqv? 2 2.0)"), "#f");
    assert_eq!(run("(= 2 2.0)"), "#t");
    assert_eq!(run("(equal? '(1 (2)) '(1 (2)))"), "#t");
    assert_eq!(run("(eq? '(1) '(1))"), "#f");
}

#[test]
fn test_call_cc_escape() {
    assert_eq!(run("(+ 1 (call/cc (lambda (k) (+ 2 (k 3)))))"), "4");
    assert_eq!(
        run("(call-with-current-continuation (lambda (k) (+ 1 2 (k 10) 20)))"),
        "10"
    );
    // A continuation that is never invoked: call/cc returns normally.
    assert_eq!(run("(+ 1 (call/cc (lambda (k) 41)))"), "42");
}

#[test]
fn test_continuation_reentry_is_repeatable() {
    let interp = Interpreter::new();
    let first = interp
        .load_str("(define saved #f) (+ 1 (call/cc (lambda (k) (set! saved k) 1)))")
        .unwrap()
        .unwrap();
    assert_eq!(write_str(&first), "2");
    // Each re-entry resumes the same (+ 1 _) computation with a new value.
    for (input, expected) in [(5, "6"), (10, "11"), (41, "42")] {
        let value = interp
            .load_str(&format!("(saved {input})"))
            .unwrap()
            .unwrap();
        assert_eq!(write_str(&value), expected);
    }
}

#[test]
fn test_quasiquote() {
    assert_eq!(run("`x"), "x");
    assert_eq!(run("`(1 2 3)"), "(1 2 3)");
    assert_eq!(run("`(1 ,(+ 1 1) ,@(list 3 4) 5)"), "(1 2 3 4 5)");
    assert_eq!(run("`(1 ,@'(2 3) 4)"), "(1 2 3 4)");
    assert_eq!(run("(define x 9) `(a ,x)"), "(a 9)");
    assert_eq!(run("`#(1 ,(+ 1 1))"), "#(1 2)");
    // Nested quasiquote only fires the outer level.
    assert_eq!(run("`(a `(b ,(c)))"), "(a (quasiquote (b (unquote (c)))))");
    assert!(run_err(",x").to_string().contains("quasiquote"));
}

#[test]
fn test_delay_and_force() {
    assert_eq!(run("(force (delay (+ 1 2)))"), "3");
    // The body runs once; the value is memoized.
    assert_eq!(
        run("(define n 0) (define p (delay (begin (set! n (+ n 1)) n))) (force p) (force p)"),
        "1"
    );
    assert_eq!(run("(force 5)"), "5");
}

#[test]
fn test_map_and_for_each() {
    assert_eq!(run("(map (lambda (x) (* x x)) '(1 2 3))"), "(1 4 9)");
    assert_eq!(run("(map + '(1 2) '(10 20))"), "(11 22)");
    assert_eq!(
        run("(let ((v (make-vector 3 0))) \
               (for-each (lambda (i) (vector-set! v i (* i i))) '(0 1 2)) v)"),
        "#(0 1 4)"
    );
    assert!(run_err("(map car '(1) '(1 2))").to_string().contains("length"));
}

#[test]
fn test_apply() {
    assert_eq!(run("(apply + '(1 2 3))"), "6");
    assert_eq!(run("(apply + 1 2 '(3 4))"), "10");
    assert_eq!(run("(apply cons '(1 2))"), "(1 . 2)");
}

#[test]
fn test_eval_builtin() {
    assert_eq!(run("(eval '(+ 1 2))"), "3");
    assert_eq!(run("(define e '(car '(9 8))) (eval e)"), "9");
}

#[test]
fn test_error_builtin() {
    let err = run_err("(error \"boom\" 1 2)");
    assert!(matches!(err, SchemeError::User(_)));
    assert_eq!(err.to_string(), "boom 1 2");
}

#[test]
fn test_literals_are_immutable_at_runtime() {
    assert!(matches!(
        run_err("(set-car! '(1 2) 9)"),
        SchemeError::Immutable
    ));
    // Runtime-built structure stays mutable.
    assert_eq!(run("(define p (cons 1 2)) (set-car! p 9) p"), "(9 . 2)");
    assert_eq!(
        run("(define l (list 1 2)) (set-cdr! l '()) l"),
        "(1)"
    );
}

#[test]
fn test_string_builtins() {
    assert_eq!(run("(string-length \"hello\")"), "5");
    assert_eq!(run("(string-ref \"abc\" 1)"), r"#\b");
    assert_eq!(run("(substring \"hello\" 1 3)"), "\"el\"");
    assert_eq!(run("(string-append \"foo\" \"bar\")"), "\"foobar\"");
    assert_eq!(run("(string->list \"ab\")"), r"(#\a #\b)");
    assert_eq!(run(r"(list->string (list #\h #\i))"), "\"hi\"");
    assert_eq!(run("(string=? \"a\" \"a\")"), "#t");
    assert_eq!(run("(string-ci=? \"AbC\" \"abc\")"), "#t");
    assert_eq!(run("(string<? \"abc\" \"abd\")"), "#t");
    assert_eq!(
        run("(define s (string-copy \"abc\")) (string-set! s 0 #\\z) s"),
        "\"zbc\""
    );
    // String literals are immutable; copies are not.
    assert!(matches!(
        run_err(r#"(string-set! "abc" 0 #\z)"#),
        SchemeError::Immutable
    ));
    assert_eq!(run("(symbol->string 'Foo)"), "\"foo\"");
    assert_eq!(run("(string->number \"42\")"), "42");
    assert_eq!(run("(string->number \"2.5\")"), "2.5");
    assert_eq!(run("(string->number \"nope\")"), "#f");
    assert!(run_err("(string->number \"ff\" 16)").to_string().contains("radix"));
    assert_eq!(run("(number->string 7)"), "\"7\"");
}

#[test]
fn test_char_builtins() {
    assert_eq!(run(r"(char->integer #\a)"), "97");
    assert_eq!(run("(integer->char 97)"), r"#\a");
    assert_eq!(run(r"(char-upcase #\a)"), r"#\A");
    assert_eq!(run(r"(char-downcase #\A)"), r"#\a");
    assert_eq!(run(r"(char<? #\a #\b)"), "#t");
    assert_eq!(run(r"(char-ci=? #\a #\A)"), "#t");
    assert_eq!(run(r"(char-alphabetic? #\a)"), "#t");
    assert_eq!(run(r"(char-numeric? #\7)"), "#t");
    assert_eq!(run(r"(char-whitespace? #\space)"), "#t");
}

#[test]
fn test_vector_builtins() {
    assert_eq!(run("(vector 1 2 3)"), "#(1 2 3)");
    assert_eq!(run("(make-vector 2 'x)"), "#(x x)");
    assert_eq!(run("(vector-length #(1 2 3))"), "3");
    assert_eq!(run("(vector-ref #(a b) 1)"), "b");
    assert_eq!(run("(vector->list #(1 2))"), "(1 2)");
    assert_eq!(run("(list->vector '(1 2))"), "#(1 2)");
    assert_eq!(
        run("(define v (make-vector 3 0)) (vector-fill! v 7) v"),
        "#(7 7 7)"
    );
    assert!(matches!(
        run_err("(vector-ref #(1) 5)"),
        SchemeError::IndexOutOfRange { .. }
    ));
}

#[test]
fn test_list_builtins() {
    assert_eq!(run("(cons 1 '(2))"), "(1 2)");
    assert_eq!(run("(length '(1 2 3))"), "3");
    assert_eq!(run("(append '(1) '(2 3) '(4))"), "(1 2 3 4)");
    assert_eq!(run("(append '(1) 2)"), "(1 . 2)");
    assert_eq!(run("(append)"), "()");
    assert_eq!(run("(reverse '(1 2 3))"), "(3 2 1)");
    assert_eq!(run("(list-tail '(a b c d) 2)"), "(c d)");
    assert_eq!(run("(list-ref '(a b c) 1)"), "b");
    assert_eq!(run("(list? '(1 2))"), "#t");
    assert_eq!(run("(list? '(1 . 2))"), "#f");
    assert_eq!(run("(null? '())"), "#t");
    assert_eq!(run("(pair? '(1))"), "#t");
}

#[test]
fn test_ports_and_output() {
    let interp = Interpreter::new();
    let out = Port::buffer();
    interp
        .global()
        .define(schist_core::Symbol::of("out"), schist_core::Value::Port(out.clone()));
    interp
        .load_str("(display \"x=\" out) (write \"s\" out) (write-char #\\! out) (newline out)")
        .unwrap();
    assert_eq!(out.buffered().unwrap(), b"x=\"s\"!\n");
    assert_eq!(run("(port? (current-output-port))"), "#t");
    assert_eq!(run("(input-port? (current-input-port))"), "#t");
    assert_eq!(run("(output-port? (current-output-port))"), "#t");
    assert_eq!(run("(eof-object? (eof))"), "#t");
    assert_eq!(run("(eof-object? 'x)"), "#f");
}

#[test]
fn test_internal_defines_scope_to_the_body() {
    assert_eq!(
        run("(define (f) (define a 1) (define b 2) (+ a b)) (f)"),
        "3"
    );
    // The inner define does not leak out.
    assert!(matches!(run_err("(define (f) (define hidden 1) hidden) (f) hidden"),
        SchemeError::Unbound(_)));
}

#[test]
fn test_trace_form_toggles_and_reports() {
    // Both toggles happen in this thread, leaving tracing off again.
    assert_eq!(run("(trace)"), "#t");
    assert_eq!(run("(trace)"), "#f");
}

#[test]
fn test_deep_recursion_with_accumulator() {
    // Not tail recursive in the argument, but the explicit stack grows on
    // the heap, far past where a host stack would give out.
    assert_eq!(
        run("(define (count n) (if (= n 0) 0 (+ 1 (count (- n 1))))) (count 50000)"),
        "50000"
    );
}
