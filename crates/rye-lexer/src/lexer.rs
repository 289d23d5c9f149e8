//! The Rye lexer.
//! Rye 词法分析器。

use crate::token::{PathMode, Token, TokenKind};
use rye_common::Span;
use rye_diagnostic::{Diagnostic, ErrorCode, Stage};

/// Operators that read as op-words on `_` prefixed names (`+` is `_+`).
/// 读作 `_` 前缀 op-word 的运算符（`+` 即 `_+`）。
const OP_SYMBOLS: &[&str] = &["+", "-", "*", "/", "//", "<", ">", "=", "<=", ">=", "!="];

/// Operators that read as pipe-words.
/// 读作 pipe-word 的运算符。
const PIPE_SYMBOLS: &[&str] = &[">>", "->", "~>", "<-", "<~"];

/// A classification problem for a single run of characters.
struct LexError {
    code: ErrorCode,
    message: String,
}

impl LexError {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// The Rye lexer.
/// Rye 词法分析器。
///
/// Converts source code into a sequence of tokens.
/// 将源代码转换为 token 序列。
pub struct Lexer<'src> {
    source: &'src str,
    /// Character iterator with position info
    /// 带位置信息的字符迭代器
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
    /// Collected diagnostics
    /// 收集的诊断信息
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source code.
    /// 为给定的源代码创建新的词法分析器。
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the entire source and return tokens and diagnostics.
    /// 对整个源代码进行词法分析，返回 token 列表和诊断信息。
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let is_eof = token.kind.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        (tokens, self.diagnostics)
    }

    fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let Some(&(start, ch)) = self.chars.peek() else {
            return Token::new(TokenKind::Eof, Span::at(self.source.len(), 0));
        };

        let single = match ch {
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            ',' => Some(TokenKind::Comma),
            _ => None,
        };
        if let Some(kind) = single {
            self.chars.next();
            return Token::new(kind, Span::at(start, 1));
        }

        match ch {
            '"' => self.string(start),
            '`' => self.raw_string(start),
            _ => self.run(start),
        }
    }

    /// Skip whitespace and `;` line comments.
    /// 跳过空白和 `;` 行注释。
    fn skip_trivia(&mut self) {
        while let Some(&(_, ch)) = self.chars.peek() {
            if ch.is_whitespace() {
                self.chars.next();
            } else if ch == ';' {
                while let Some(&(_, c)) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.chars.next();
                }
            } else {
                break;
            }
        }
    }

    fn position(&mut self) -> usize {
        self.chars.peek().map_or(self.source.len(), |&(i, _)| i)
    }

    /// Scan a `"..."` string with escapes.
    /// 扫描带转义的 `"..."` 字符串。
    fn string(&mut self, start: usize) -> Token {
        self.chars.next();
        let mut value = String::new();

        while let Some((_, ch)) = self.chars.next() {
            match ch {
                '"' => {
                    let end = self.position();
                    return Token::new(TokenKind::String(value), Span::new(start, end));
                }
                '\\' => match self.chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, '"')) => value.push('"'),
                    Some((_, '\\')) => value.push('\\'),
                    Some((i, other)) => {
                        value.push('\\');
                        value.push(other);
                        let span = Span::new(i - 1, i + other.len_utf8());
                        self.diagnostics.push(
                            Diagnostic::warning(
                                Stage::Lexer,
                                span,
                                format!("unknown escape `\\{other}`"),
                            )
                            .note("the backslash is kept as written"),
                        );
                    }
                    None => break,
                },
                _ => value.push(ch),
            }
        }

        let span = Span::new(start, self.source.len());
        self.report(
            span,
            LexError::new(ErrorCode::UnterminatedString, "unterminated string literal"),
        );
        Token::new(TokenKind::String(value), span)
    }

    /// Scan a `` `...` `` raw string.
    /// 扫描 `` `...` `` 原始字符串。
    fn raw_string(&mut self, start: usize) -> Token {
        self.chars.next();
        let body_start = start + 1;

        while let Some((i, ch)) = self.chars.next() {
            if ch == '`' {
                let value = self.source[body_start..i].to_string();
                return Token::new(TokenKind::String(value), Span::new(start, i + 1));
            }
        }

        let span = Span::new(start, self.source.len());
        self.report(
            span,
            LexError::new(ErrorCode::UnterminatedString, "unterminated raw string"),
        );
        Token::new(
            TokenKind::String(self.source[body_start..].to_string()),
            span,
        )
    }

    /// Scan a run of non-delimiter characters and classify it.
    /// 扫描一段非分隔字符并进行分类。
    fn run(&mut self, start: usize) -> Token {
        while let Some(&(_, ch)) = self.chars.peek() {
            if is_delimiter(ch) {
                break;
            }
            self.chars.next();
        }
        let end = self.position();
        let span = Span::new(start, end);

        match classify(&self.source[start..end]) {
            Ok(kind) => Token::new(kind, span),
            Err(err) => {
                self.report(span, err);
                Token::new(TokenKind::Error, span)
            }
        }
    }

    fn report(&mut self, span: Span, err: LexError) {
        self.diagnostics.push(
            Diagnostic::error(Stage::Lexer, err.code, span, err.message).describe_span(),
        );
    }
}

fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '{' | '}' | '[' | ']' | '(' | ')' | ',' | '"' | '`' | ';')
}

/// Classify one run of characters.
/// 对一段字符进行分类。
fn classify(text: &str) -> Result<TokenKind, LexError> {
    if OP_SYMBOLS.contains(&text) {
        return Ok(TokenKind::Opword(format!("_{text}")));
    }
    if PIPE_SYMBOLS.contains(&text) {
        return Ok(TokenKind::Pipeword(format!("_{text}")));
    }
    match text {
        "_" => return Ok(TokenKind::Void),
        // The rest marker of match patterns.
        "::" => return Ok(TokenKind::Word(text.to_string())),
        _ => {}
    }

    if looks_numeric(text) {
        return number(text);
    }

    if let Some(rest) = text.strip_prefix("::") {
        return word(rest).map(TokenKind::LModword);
    }
    if let Some(rest) = text.strip_prefix(':') {
        return word(rest).map(TokenKind::LSetword);
    }
    if let Some(body) = text.strip_suffix("::") {
        return word(body).map(TokenKind::Modword);
    }
    if let Some(body) = text.strip_suffix(':') {
        return word(body).map(TokenKind::Setword);
    }
    if let Some(rest) = text.strip_prefix('?') {
        return word_or_path(rest, PathMode::Get, TokenKind::Getword);
    }
    if let Some(rest) = text.strip_prefix('\'') {
        return word(rest).map(TokenKind::Tagword);
    }
    if let Some(rest) = text.strip_prefix('.') {
        return word_or_path(rest, PathMode::Op, TokenKind::Opword);
    }
    if let Some(rest) = text.strip_prefix('|') {
        if OP_SYMBOLS.contains(&rest) {
            return Ok(TokenKind::Pipeword(format!("_{rest}")));
        }
        return word_or_path(rest, PathMode::Pipe, TokenKind::Pipeword);
    }
    if let Some(rest) = text.strip_prefix('~') {
        return word(rest).map(TokenKind::Genword);
    }
    if text.len() > 2 && text.starts_with('<') && text.ends_with('>') {
        return word(&text[1..text.len() - 1]).map(TokenKind::Xword);
    }
    if let Some(rest) = text.strip_prefix('%') {
        return Ok(TokenKind::Uri {
            scheme: "file".to_string(),
            path: rest.to_string(),
        });
    }
    if let Some((scheme, path)) = text.split_once("://") {
        let scheme = word(scheme)?;
        return Ok(TokenKind::Uri {
            scheme,
            path: path.to_string(),
        });
    }

    word_or_path(text, PathMode::Plain, TokenKind::Word)
}

fn word_or_path(
    text: &str,
    mode: PathMode,
    make_word: fn(String) -> TokenKind,
) -> Result<TokenKind, LexError> {
    if text.contains('/') && text.len() > 1 {
        let parts = text.split('/').map(word).collect::<Result<Vec<_>, _>>()?;
        return Ok(TokenKind::Path { mode, parts });
    }
    word(text).map(make_word)
}

fn word(name: &str) -> Result<String, LexError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(LexError::new(ErrorCode::InvalidWord, "empty word"));
    };
    if !(first.is_alphabetic() || first == '^' || first == '_') {
        return Err(LexError::new(
            ErrorCode::UnexpectedCharacter,
            format!("unexpected character `{first}` at the start of `{name}`"),
        ));
    }
    if let Some(bad) = chars.find(|&c| !is_word_char(c)) {
        return Err(LexError::new(
            ErrorCode::InvalidWord,
            format!("character `{bad}` is not allowed in word `{name}`"),
        ));
    }
    Ok(name.to_string())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '?' | '!' | '=' | '.' | '\\' | '+' | '*' | '<' | '>' | '^' | '&')
}

fn looks_numeric(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    digits.starts_with(|c: char| c.is_ascii_digit())
}

fn number(text: &str) -> Result<TokenKind, LexError> {
    if let Ok(n) = text.parse::<i64>() {
        return Ok(TokenKind::Integer(n));
    }
    let digits = text.strip_prefix('-').unwrap_or(text);
    let is_decimal = digits.split('.').count() == 2
        && digits
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
    if is_decimal {
        if let Ok(n) = text.parse::<f64>() {
            return Ok(TokenKind::Decimal(n));
        }
    }
    Err(LexError::new(
        ErrorCode::InvalidNumber,
        format!("invalid number literal `{text}`"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, diagnostics) = Lexer::new(source).tokenize();
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    fn word(s: &str) -> TokenKind {
        TokenKind::Word(s.to_string())
    }

    #[test]
    fn test_word_variants() {
        assert_eq!(
            kinds("x: :y z:: ::w ?v 'u <integer> ~t"),
            vec![
                TokenKind::Setword("x".into()),
                TokenKind::LSetword("y".into()),
                TokenKind::Modword("z".into()),
                TokenKind::LModword("w".into()),
                TokenKind::Getword("v".into()),
                TokenKind::Tagword("u".into()),
                TokenKind::Xword("integer".into()),
                TokenKind::Genword("t".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators_and_pipes() {
        assert_eq!(
            kinds("1 + 2 .add 3 |mul 4 |+ 5 >> print"),
            vec![
                TokenKind::Integer(1),
                TokenKind::Opword("_+".into()),
                TokenKind::Integer(2),
                TokenKind::Opword("add".into()),
                TokenKind::Integer(3),
                TokenKind::Pipeword("mul".into()),
                TokenKind::Integer(4),
                TokenKind::Pipeword("_+".into()),
                TokenKind::Integer(5),
                TokenKind::Pipeword("_>>".into()),
                word("print"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_blocks_and_commas() {
        assert_eq!(
            kinds("ref{6 12 1} [ a , b ] ( c )"),
            vec![
                word("ref"),
                TokenKind::LBrace,
                TokenKind::Integer(6),
                TokenKind::Integer(12),
                TokenKind::Integer(1),
                TokenKind::RBrace,
                TokenKind::LBracket,
                word("a"),
                TokenKind::Comma,
                word("b"),
                TokenKind::RBracket,
                TokenKind::LParen,
                word("c"),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("42 -7 3.25 -0.5"),
            vec![
                TokenKind::Integer(42),
                TokenKind::Integer(-7),
                TokenKind::Decimal(3.25),
                TokenKind::Decimal(-0.5),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_strings_and_comments() {
        assert_eq!(
            kinds("\"a \\\"b\\\"\\n\" ; ignored\n`raw \\n`"),
            vec![
                TokenKind::String("a \"b\"\n".into()),
                TokenKind::String("raw \\n".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_paths_uris_and_special_words() {
        assert_eq!(
            kinds("ctx/name .ctx/f |a/b https://ryelang.org %data.txt _ :: sort! fn\\cc"),
            vec![
                TokenKind::Path {
                    mode: PathMode::Plain,
                    parts: vec!["ctx".into(), "name".into()]
                },
                TokenKind::Path {
                    mode: PathMode::Op,
                    parts: vec!["ctx".into(), "f".into()]
                },
                TokenKind::Path {
                    mode: PathMode::Pipe,
                    parts: vec!["a".into(), "b".into()]
                },
                TokenKind::Uri {
                    scheme: "https".into(),
                    path: "ryelang.org".into()
                },
                TokenKind::Uri {
                    scheme: "file".into(),
                    path: "data.txt".into()
                },
                TokenKind::Void,
                word("::"),
                word("sort!"),
                word("fn\\cc"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_errors_are_reported() {
        let (tokens, diagnostics) = Lexer::new("1x2 \"open").tokenize();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].code, Some(ErrorCode::InvalidNumber));
        assert_eq!(diagnostics[1].code, Some(ErrorCode::UnterminatedString));
        assert_eq!(tokens[0].kind, TokenKind::Error);
    }
}
