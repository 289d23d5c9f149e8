//! Integration tests for the rye-loader crate.

use pretty_assertions::assert_eq;
use rye_common::Span;
use rye_diagnostic::ErrorCode;
use rye_eval::{new_word_index, BlockMode, Value};
use rye_loader::{load, load_strict, LoadError};

#[test]
fn test_program_structure() {
    let mut words = new_word_index();
    let (block, diagnostics) = load("f: fn { x } [ x + 1 ] , ( f 2 )", &mut words);
    assert!(diagnostics.is_empty());

    let items = block.items();
    assert_eq!(items.len(), 6);
    assert_eq!(items[0], Value::Setword(words.lookup("f").unwrap()));
    assert_eq!(items[1], Value::Word(words.lookup("fn").unwrap()));
    assert_eq!(items[2].as_block().map(|b| b.mode), Some(BlockMode::Data));
    assert_eq!(items[3].as_block().map(|b| b.mode), Some(BlockMode::Compose));
    assert_eq!(items[4], Value::Comma);
    assert_eq!(items[5].as_block().map(|b| b.len()), Some(2));
}

#[test]
fn test_operators_load_as_opwords() {
    let mut words = new_word_index();
    let (block, _) = load("1 + 2", &mut words);
    let plus = words.lookup("_+").unwrap();
    assert_eq!(
        block.items(),
        &[Value::Integer(1), Value::Opword(plus), Value::Integer(2)]
    );
}

#[test]
fn test_unclosed_block() {
    let mut words = new_word_index();
    let (_, diagnostics) = load("x: { 1 2", &mut words);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, Some(ErrorCode::UnclosedDelimiter));
}

#[test]
fn test_mismatched_closer() {
    let mut words = new_word_index();
    let (_, diagnostics) = load("{ 1 ) }", &mut words);
    assert_eq!(diagnostics.len(), 1);
    let diag = &diagnostics[0];
    assert_eq!(diag.code, Some(ErrorCode::UnexpectedDelimiter));
    assert_eq!(diag.message, "expected `}`, found `)`");
    assert_eq!(diag.labels[0].span, Span::new(0, 1));
    assert_eq!(diag.notes, vec!["a `{` block is closed by `}`".to_string()]);
}

#[test]
fn test_load_strict_reports_the_first_error() {
    let mut words = new_word_index();
    let err = load_strict("1x2 \"open", &mut words).unwrap_err();
    let LoadError::Syntax { more, .. } = &err;
    assert_eq!(*more, 1);
    assert!(err.to_string().starts_with("syntax error: "));
    assert!(load_strict("1 2 3", &mut words).is_ok());
}
