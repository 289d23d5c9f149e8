//! Integration tests for the standard builtins and pattern matching.

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

#[test]
fn test_stdlib_names_resolve() {
    let ev = evaluator();
    for name in ["add", "sort!", "vals\\with", "failure\\wrap", "fn\\inside", "do\\in", "probe"] {
        assert!(ev.get(name).is_some(), "{name} is not registered");
    }
}

// ============================================================================
// Sorting and refs
// ============================================================================

#[test]
fn test_sort_does_not_change_its_argument() {
    assert_eq!(eval_print("b: { 3 1 2 } , sort b"), "{ 1 2 3 }");
    assert_eq!(eval_print("b: { 3 1 2 } , sort b , b"), "{ 3 1 2 }");
    assert_eq!(eval_print("r: ref { 3 1 2 } , sort r , deref r"), "{ 3 1 2 }");
}

#[test]
fn test_sort_bang_changes_the_ref() {
    assert_eq!(eval_print("r: ref { 3 1 2 } , sort! r , deref r"), "{ 1 2 3 }");
    assert_eq!(
        eval_print("r: ref { \"b\" \"c\" \"a\" } , alias: r , sort! r , deref alias"),
        "{ \"a\" \"b\" \"c\" }"
    );
    assert!(eval_error("sort! { 3 1 2 }").contains("requires argument 1 to be: ref"));
}

#[test]
fn test_ref_cursor() {
    assert_eq!(eval_print("r: ref { 1 2 3 } , pop r , pop r"), "2");
    assert_eq!(eval_print("r: ref { 1 2 3 } , next r , peek r"), "2");
    assert_eq!(eval_print("b: { 1 2 3 } , next b |peek"), "2");
    assert_eq!(eval_print("b: { 1 2 3 } , next b , peek b"), "1");
}

// ============================================================================
// Pattern matching
// ============================================================================

#[test]
fn test_match_block_binds_words() {
    assert_eq!(eval_print("match-block { 1 2 } { a b } , a + b"), "3");
    assert_eq!(eval_print("match-block { 1 { 2 3 } } { a { b c } } , c"), "3");
    assert_eq!(eval_print("match-block { 1 2 3 } { h :: t } , t"), "{ 2 3 }");
}

#[test]
fn test_match_block_checks_types_and_values() {
    assert_eq!(eval_print("match-block { 1 \"x\" } { <integer> s } , s"), "x");
    assert_eq!(eval_print("match-block { 5 5 } { a ?a } , a"), "5");
    assert_eq!(eval_print("match-block { 10 } { [ > 5 ] } |length?"), "1");
}

#[test]
fn test_failed_match_binds_nothing() {
    let mut ev = evaluator();
    let msg = eval_in(&mut ev, "try { match-block { 1 \"x\" } { a <integer> } } |message?").unwrap();
    assert_eq!(msg, Value::string("Expected type integer, got string"));
    assert_eq!(eval_in(&mut ev, "a").unwrap_err().message(), "word not found: a");
}

#[test]
fn test_match_block_length_mismatch() {
    assert_eq!(
        eval_error("match-block { 1 2 3 } { a b }"),
        "the value has more elements than the pattern"
    );
    assert_eq!(
        eval_error("match-block { 1 } { a b }"),
        "the value has fewer elements than the pattern"
    );
}

#[test]
fn test_match_picks_the_first_matching_case() {
    let src = "classify: fn { x } { match x { 0 { \"zero\" } [ > 100 ] { \"big\" } _ { \"other\" } } }";
    let mut ev = evaluator();
    eval_in(&mut ev, src).unwrap();
    assert_eq!(eval_in(&mut ev, "classify 0").unwrap(), Value::string("zero"));
    assert_eq!(eval_in(&mut ev, "classify 500").unwrap(), Value::string("big"));
    assert_eq!(eval_in(&mut ev, "classify 7").unwrap(), Value::string("other"));
}

#[test]
fn test_match_binds_for_the_action() {
    assert_eq!(eval_print("match { 3 4 } { { a b } { a * b } }"), "12");
}

#[test]
fn test_match_configuration_errors() {
    assert_eq!(eval_error("match 1 { 1 }"), "match needs pattern and action pairs");
    assert_eq!(eval_error("match 1 { 1 2 }"), "match actions must be blocks");
    assert_eq!(eval_error("match 1 { 2 { 0 } }"), "no pattern matched the value");
}

// ============================================================================
// Collections, strings and math
// ============================================================================

#[test]
fn test_pipeline_over_collections() {
    assert_eq!(
        eval_print("range 1 6 |filter { > 3 } |map { * 10 } |sum"),
        "150"
    );
    assert_eq!(eval_print("{ \"a\" \"b\" \"c\" } |join\\with \"-\" |to-upper"), "A-B-C");
}

#[test]
fn test_numeric_promotion() {
    assert_eq!(eval_print("sum { 1 2 3 }"), "6");
    assert_eq!(eval_print("sum { 1 2.5 }"), "3.5");
    assert_eq!(eval_print("avg { 1 2 3 }"), "2.0");
    assert_eq!(eval_print("max { 3 7 2 }"), "7");
    assert_eq!(eval_print("min { 3 1.5 }"), "1.5");
}

#[test]
fn test_vals_with_injects_into_each_expression() {
    assert_eq!(eval_print("vals\\with 10 { + 1 , * 2 }"), "{ 11 20 }");
}

#[test]
fn test_functions_as_values() {
    assert_eq!(eval_print("apply ?add { 1 2 }"), "3");
    assert_eq!(eval_print("apply fn { x } { x * 2 } { 21 }"), "42");
}
