//! Integration tests for evaluator configuration.

use std::io::Write;

use pretty_assertions::assert_eq;
use rye_eval::{ConfigError, Dialect, EvalConfig, EvalError, Evaluator, Value};

fn eval_with(config: EvalConfig, source: &str) -> Result<Value, EvalError> {
    let mut ev = Evaluator::with_config(config);
    ev.register(rye_std::stdlib());
    let block = rye_loader::load_strict(source, ev.words_mut())
        .unwrap_or_else(|e| panic!("{source}: {e}"));
    ev.eval(&block)
}

#[test]
fn test_defaults() {
    let config = EvalConfig::default();
    assert_eq!(config.max_depth, 10_000);
    assert_eq!(config.eyr_stack_size, 1000);
    assert_eq!(config.dialect, Dialect::Rye);
    assert_eq!(EvalConfig::from_json("{}").unwrap(), config);
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "eyr-stack-size": 16, "dialect": "rye0" }}"#).unwrap();
    let config = EvalConfig::load(file.path()).unwrap();
    assert_eq!(config.eyr_stack_size, 16);
    assert_eq!(config.dialect, Dialect::Rye0);
    assert_eq!(config.max_depth, 10_000);
}

#[test]
fn test_load_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(matches!(EvalConfig::load(&missing), Err(ConfigError::Io(_))));

    let err = EvalConfig::from_json(r#"{ "dialect": "lisp" }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
    assert!(err.to_string().starts_with("invalid configuration: "));
}

#[test]
fn test_depth_limit_stops_runaway_recursion() {
    let err = eval_with(EvalConfig::new().max_depth(50), "f: does { f } f").unwrap_err();
    assert_eq!(err.message(), "maximum evaluation depth exceeded");
}

#[test]
fn test_depth_limit_allows_shallow_programs() {
    let src = "f: fn { n } { either n = 0 { 0 } { f n - 1 } } , f 5";
    assert_eq!(eval_with(EvalConfig::new().max_depth(50), src).unwrap(), Value::Integer(0));
}
