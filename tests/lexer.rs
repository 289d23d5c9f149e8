//! Integration tests for the rye-lexer crate.

use pretty_assertions::assert_eq;
use rye_common::Span;
use rye_diagnostic::ErrorCode;
use rye_lexer::{tokenize, TokenKind};

fn lex(source: &str) -> Vec<TokenKind> {
    let (tokens, diagnostics) = tokenize(source);
    assert!(diagnostics.is_empty(), "{source}: {diagnostics:?}");
    tokens.into_iter().map(|t| t.kind).collect()
}

fn word(s: &str) -> TokenKind {
    TokenKind::Word(s.to_string())
}

// ============================================================================
// Programs
// ============================================================================

#[test]
fn test_function_definition() {
    assert_eq!(
        lex("double: fn { x } { x * 2 }"),
        vec![
            TokenKind::Setword("double".into()),
            word("fn"),
            TokenKind::LBrace,
            word("x"),
            TokenKind::RBrace,
            TokenKind::LBrace,
            word("x"),
            TokenKind::Opword("_*".into()),
            TokenKind::Integer(2),
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_pipeline() {
    assert_eq!(
        lex("range 1 6 |filter { > 3 } |sum :total"),
        vec![
            word("range"),
            TokenKind::Integer(1),
            TokenKind::Integer(6),
            TokenKind::Pipeword("filter".into()),
            TokenKind::LBrace,
            TokenKind::Opword("_>".into()),
            TokenKind::Integer(3),
            TokenKind::RBrace,
            TokenKind::Pipeword("sum".into()),
            TokenKind::LSetword("total".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_match_pattern() {
    assert_eq!(
        lex("match-block v { <integer> h :: t }"),
        vec![
            word("match-block"),
            word("v"),
            TokenKind::LBrace,
            TokenKind::Xword("integer".into()),
            word("h"),
            word("::"),
            word("t"),
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_variables_and_generics() {
    assert_eq!(
        lex("var 'n 0 n:: n + 1 ~describe 5 .describe"),
        vec![
            word("var"),
            TokenKind::Tagword("n".into()),
            TokenKind::Integer(0),
            TokenKind::Modword("n".into()),
            word("n"),
            TokenKind::Opword("_+".into()),
            TokenKind::Integer(1),
            TokenKind::Genword("describe".into()),
            TokenKind::Integer(5),
            TokenKind::Opword("describe".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        lex("; header\n1 ; trailing\n2"),
        vec![TokenKind::Integer(1), TokenKind::Integer(2), TokenKind::Eof]
    );
}

// ============================================================================
// Spans
// ============================================================================

#[test]
fn test_spans_cover_the_source_text() {
    let source = "x: \"hi\" { 1 }";
    let (tokens, _) = tokenize(source);
    let spans: Vec<Span> = tokens.iter().map(|t| t.span).collect();
    assert_eq!(
        spans,
        vec![
            Span::new(0, 2),
            Span::new(3, 7),
            Span::new(8, 9),
            Span::new(10, 11),
            Span::new(12, 13),
            Span::new(13, 13),
        ]
    );
    assert_eq!(&source[tokens[1].span.range()], "\"hi\"");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_lexing_continues_after_an_error() {
    let (tokens, diagnostics) = tokenize("1x2 ok");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, Some(ErrorCode::InvalidNumber));
    assert_eq!(diagnostics[0].span, Span::new(0, 3));
    let kinds: Vec<TokenKind> = tokens.into_iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Error, word("ok"), TokenKind::Eof]);
}

#[test]
fn test_unterminated_string() {
    let (_, diagnostics) = tokenize("print \"open");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, Some(ErrorCode::UnterminatedString));
    assert!(diagnostics[0].is_error());
}

#[test]
fn test_unknown_escape_is_a_warning() {
    let (tokens, diagnostics) = tokenize("\"a\\qb\"");
    assert_eq!(tokens[0].kind, TokenKind::String("a\\qb".into()));
    assert_eq!(diagnostics.len(), 1);
    assert!(!diagnostics[0].is_error());
    assert_eq!(diagnostics[0].span, Span::new(2, 4));
    assert_eq!(diagnostics[0].notes, vec!["the backslash is kept as written".to_string()]);
}
