//! Integration tests for failures, errors, deferred blocks and early return.

use pretty_assertions::assert_eq;
use rye_eval::{EvalError, Evaluator, Value};

fn evaluator() -> Evaluator {
    let mut ev = Evaluator::new();
    ev.register(rye_std::stdlib());
    ev
}

fn eval_in(ev: &mut Evaluator, source: &str) -> Result<Value, EvalError> {
    let block = rye_loader::load_strict(source, ev.words_mut())
        .unwrap_or_else(|e| panic!("{source}: {e}"));
    ev.eval(&block)
}

fn eval_print(source: &str) -> String {
    let mut ev = evaluator();
    match eval_in(&mut ev, source) {
        Ok(value) => value.print(ev.words()),
        Err(e) => panic!("{source}: {e}"),
    }
}

fn eval_error(source: &str) -> String {
    match eval_in(&mut evaluator(), source) {
        Ok(_) => panic!("{source}: expected an error"),
        Err(e) => e.message(),
    }
}

// ============================================================================
// Promotion
// ============================================================================

#[test]
fn test_unhandled_failure_halts_the_block() {
    assert_eq!(eval_print("var 'n 0 , try { fail \"x\" n:: 1 } , n"), "0");
    let err = eval_in(&mut evaluator(), "fail \"boom\" 99").unwrap_err();
    assert!(matches!(err, EvalError::Raised { .. }));
    assert_eq!(err.message(), "boom");
}

#[test]
fn test_failure_status_reaches_the_host() {
    let err = eval_in(&mut evaluator(), "fail { 404 \"Not Found\" }").unwrap_err();
    let EvalError::Raised { status, message, .. } = err else {
        panic!("expected a raised error");
    };
    assert_eq!(status, 404);
    assert_eq!(message, "Not Found");
}

#[test]
fn test_failure_is_promoted_before_the_next_call() {
    assert_eq!(eval_error("fail \"first\" |add 1"), "first");
}

#[test]
fn test_failure_accepted_by_combinators() {
    assert_eq!(eval_print("fail \"x\" |fix { \"fixed\" }"), "fixed");
    assert_eq!(eval_print("fail \"x\" |failed?"), "true");
    assert_eq!(eval_print("fail \"x\" |disarm |type?"), "error");
}

#[test]
fn test_builtin_errors_are_failures() {
    assert_eq!(eval_print("try { 1 / 0 } |message?"), "can't divide by zero (_/)");
    assert_eq!(eval_print("1 / 0 |fix { 0 }"), "0");
}

// ============================================================================
// Error handler
// ============================================================================

#[test]
fn test_error_handler_suppresses_failures() {
    assert_eq!(eval_print("error-handler: { \"handled\" } , fail \"boom\""), "handled");
    assert_eq!(eval_print("error-handler: { .message? } , fail \"boom\""), "boom");
}

#[test]
fn test_error_handler_continues_the_block() {
    assert_eq!(
        eval_print("var 'seen 0 , error-handler: { seen:: seen + 1 } , fail \"a\" , fail \"b\" , seen"),
        "2"
    );
}

#[test]
fn test_error_handler_does_not_catch_errors() {
    assert_eq!(eval_error("error-handler: { 0 } , missing"), "word not found: missing");
}

// ============================================================================
// Deferred blocks
// ============================================================================

#[test]
fn test_deferred_blocks_run_last_in_first_out() {
    let src = "trail: ref { } \
               f: does { defer { append! 1 trail } defer { append! 2 trail } 10 } \
               f , deref trail";
    assert_eq!(eval_print(src), "{ 2 1 }");
}

#[test]
fn test_deferred_blocks_run_when_an_error_propagates() {
    let src = "trail: ref { } \
               f: does { defer { append! 1 trail } defer { append! 2 trail } 1 / 0 } \
               try { f } , deref trail";
    assert_eq!(eval_print(src), "{ 2 1 }");
    let src = "trail: ref { } \
               f: does { defer { append! 1 trail } missing } \
               try { f } |message?";
    assert_eq!(eval_print(src), "word not found: missing");
}

#[test]
fn test_deferred_blocks_keep_the_function_result() {
    assert_eq!(eval_print("f: does { defer { 99 } 10 } , f"), "10");
}

#[test]
fn test_error_in_deferred_block_surfaces() {
    assert_eq!(eval_error("f: does { defer { missing } 10 } , f"), "word not found: missing");
}

#[test]
fn test_top_level_defer_runs_after_evaluation() {
    let mut ev = evaluator();
    eval_in(&mut ev, "trail: ref { } , defer { append! \"done\" trail } 1").unwrap();
    assert_eq!(
        eval_in(&mut ev, "deref trail |length?").unwrap(),
        Value::Integer(1)
    );
}

// ============================================================================
// Return
// ============================================================================

#[test]
fn test_return_stops_the_function_body() {
    assert_eq!(eval_print("f: does { return 1 2 } , f"), "1");
    assert_eq!(eval_print("f: fn { x } { ^if x > 5 { \"big\" } \"small\" } , f 9"), "big");
    assert_eq!(eval_print("f: fn { x } { ^if x > 5 { \"big\" } \"small\" } , f 2"), "small");
}

#[test]
fn test_return_from_nested_blocks() {
    let src = "f: does { for { 1 2 3 4 } { ::i , if i = 3 { return i * 10 } } 0 } , f";
    assert_eq!(eval_print(src), "30");
}

#[test]
fn test_caret_fail_returns_a_failure() {
    let src = "f: does { ^fail \"early\" \"late\" } , try { f } |message?";
    assert_eq!(eval_print(src), "early");
    let src = "f: does { ^fail \"early\" } , f |fix { \"caught\" }";
    assert_eq!(eval_print(src), "caught");
}

// ============================================================================
// Error chains
// ============================================================================

#[test]
fn test_check_builds_a_chain() {
    let src = "try { fail 404 |check \"lookup failed\" }";
    assert_eq!(eval_print(&format!("{src} |message?")), "lookup failed");
    assert_eq!(eval_print(&format!("{src} |cause? |status?")), "404");
    assert_eq!(
        eval_error("fail \"inner\" |check \"outer\""),
        "outer: inner"
    );
}
