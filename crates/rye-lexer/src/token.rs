//! Token definitions for Rye.

use rye_common::Span;

/// A token with its kind and span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// How a context path such as `ctx/word` is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMode {
    /// `a/b`
    Plain,
    /// `.a/b`
    Op,
    /// `|a/b`
    Pipe,
    /// `?a/b`
    Get,
}

/// The kind of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Delimiters
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,

    // Literals
    Integer(i64),
    Decimal(f64),
    String(String),
    Uri { scheme: String, path: String },
    /// `_`
    Void,

    // Words
    Word(String),
    /// `x:`
    Setword(String),
    /// `:x`
    LSetword(String),
    /// `x::`
    Modword(String),
    /// `::x`
    LModword(String),
    /// `?x`
    Getword(String),
    /// `.x`, and bare operators such as `+` (as `_+`)
    Opword(String),
    /// `|x`, and pipe operators such as `>>` (as `_>>`)
    Pipeword(String),
    /// `'x`
    Tagword(String),
    /// `<integer>`
    Xword(String),
    /// `~x`
    Genword(String),
    Path { mode: PathMode, parts: Vec<String> },

    /// A token the lexer could not classify; a diagnostic was reported.
    Error,
    Eof,
}

impl TokenKind {
    pub fn is_eof(&self) -> bool {
        matches!(self, TokenKind::Eof)
    }
}
