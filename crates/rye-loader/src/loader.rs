//! The Rye loader.
//! Rye 加载器实现。

use std::rc::Rc;

use rye_common::{Span, WordIndex};
use rye_diagnostic::{Diagnostic, ErrorCode, Stage};
use rye_eval::{Block, BlockMode, CPath, PathMode, Uri, Value};
use rye_lexer::{PathMode as TokenPathMode, Token, TokenKind};

/// A block being built, with the token that opened it.
/// 正在构建的块及其起始 token。
struct Frame {
    mode: BlockMode,
    open: Span,
    items: Vec<Value>,
}

/// Builds blocks from tokens.
/// 从 token 构建块。
pub struct Loader<'w> {
    tokens: Vec<Token>,
    pos: usize,
    words: &'w mut WordIndex,
    diagnostics: Vec<Diagnostic>,
}

impl<'w> Loader<'w> {
    pub fn new(tokens: Vec<Token>, words: &'w mut WordIndex) -> Self {
        Self {
            tokens,
            pos: 0,
            words,
            diagnostics: Vec::new(),
        }
    }

    pub fn diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Load every token into one top-level data block.
    /// 把所有 token 加载为一个顶层数据块。
    pub fn load_block(&mut self) -> Block {
        let mut stack: Vec<Frame> = Vec::new();
        let mut top = Vec::new();

        while let Some(token) = self.next_token() {
            let span = token.span;
            let value = match token.kind {
                TokenKind::Eof => break,
                TokenKind::Error => continue,
                TokenKind::LBrace | TokenKind::LBracket | TokenKind::LParen => {
                    let mode = opening_mode(&token.kind).unwrap_or_default();
                    stack.push(Frame {
                        mode,
                        open: span,
                        items: Vec::new(),
                    });
                    continue;
                }
                TokenKind::RBrace | TokenKind::RBracket | TokenKind::RParen => {
                    let mode = closing_mode(&token.kind).unwrap_or_default();
                    match stack.last() {
                        Some(frame) if frame.mode == mode => {}
                        Some(frame) => {
                            let expected = closer(frame.mode);
                            self.diagnostics.push(
                                Diagnostic::error(
                                    Stage::Loader,
                                    ErrorCode::UnexpectedDelimiter,
                                    span,
                                    format!("expected `{expected}`, found `{}`", closer(mode)),
                                )
                                .opened_at(frame.open, opener(frame.mode))
                                .note(format!(
                                    "a `{}` block is closed by `{expected}`",
                                    opener(frame.mode)
                                )),
                            );
                            continue;
                        }
                        None => {
                            self.error(
                                ErrorCode::UnexpectedDelimiter,
                                span,
                                format!("unexpected `{}`", closer(mode)),
                            );
                            continue;
                        }
                    }
                    let Some(frame) = stack.pop() else {
                        continue;
                    };
                    Value::Block(Block::with_mode(frame.items, frame.mode))
                }
                kind => self.token_value(kind),
            };
            match stack.last_mut() {
                Some(frame) => frame.items.push(value),
                None => top.push(value),
            }
        }

        // Close whatever is still open so the caller gets a usable block.
        while let Some(frame) = stack.pop() {
            self.diagnostics.push(
                Diagnostic::error(
                    Stage::Loader,
                    ErrorCode::UnclosedDelimiter,
                    frame.open,
                    format!("unclosed `{}`", opener(frame.mode)),
                )
                .opened_at(frame.open, opener(frame.mode)),
            );
            let block = Value::Block(Block::with_mode(frame.items, frame.mode));
            match stack.last_mut() {
                Some(parent) => parent.items.push(block),
                None => top.push(block),
            }
        }

        Block::new(top)
    }

    fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    /// Convert a non-delimiter token into a value.
    /// 把非分隔符 token 转换为值。
    fn token_value(&mut self, kind: TokenKind) -> Value {
        match kind {
            TokenKind::Integer(n) => Value::Integer(n),
            TokenKind::Decimal(n) => Value::Decimal(n),
            TokenKind::String(s) => Value::string(s),
            TokenKind::Void => Value::Void,
            TokenKind::Comma => Value::Comma,
            TokenKind::Uri { scheme, path } => Value::Uri(Rc::new(Uri {
                scheme: self.words.intern(&scheme),
                path,
            })),
            TokenKind::Word(w) => Value::Word(self.words.intern(&w)),
            TokenKind::Setword(w) => Value::Setword(self.words.intern(&w)),
            TokenKind::LSetword(w) => Value::LSetword(self.words.intern(&w)),
            TokenKind::Modword(w) => Value::Modword(self.words.intern(&w)),
            TokenKind::LModword(w) => Value::LModword(self.words.intern(&w)),
            TokenKind::Getword(w) => Value::Getword(self.words.intern(&w)),
            TokenKind::Opword(w) => Value::Opword(self.words.intern(&w)),
            TokenKind::Pipeword(w) => Value::Pipeword(self.words.intern(&w)),
            TokenKind::Tagword(w) => Value::Tagword(self.words.intern(&w)),
            TokenKind::Xword(w) => Value::Xword(self.words.intern(&w)),
            TokenKind::Genword(w) => Value::Genword(self.words.intern(&w)),
            TokenKind::Path { mode, parts } => {
                let words = parts.iter().map(|p| self.words.intern(p)).collect();
                let mode = match mode {
                    TokenPathMode::Plain => PathMode::Plain,
                    TokenPathMode::Op => PathMode::Op,
                    TokenPathMode::Pipe => PathMode::Pipe,
                    TokenPathMode::Get => PathMode::Get,
                };
                Value::CPath(Rc::new(CPath { mode, words }))
            }
            // Delimiters, errors and end of input are handled by the caller.
            _ => Value::Void,
        }
    }

    fn error(&mut self, code: ErrorCode, span: Span, message: String) {
        self.diagnostics
            .push(Diagnostic::error(Stage::Loader, code, span, message));
    }
}

fn opening_mode(kind: &TokenKind) -> Option<BlockMode> {
    match kind {
        TokenKind::LBrace => Some(BlockMode::Data),
        TokenKind::LBracket => Some(BlockMode::Compose),
        TokenKind::LParen => Some(BlockMode::Do),
        _ => None,
    }
}

fn closing_mode(kind: &TokenKind) -> Option<BlockMode> {
    match kind {
        TokenKind::RBrace => Some(BlockMode::Data),
        TokenKind::RBracket => Some(BlockMode::Compose),
        TokenKind::RParen => Some(BlockMode::Do),
        _ => None,
    }
}

fn opener(mode: BlockMode) -> char {
    match mode {
        BlockMode::Data => '{',
        BlockMode::Compose => '[',
        BlockMode::Do => '(',
    }
}

fn closer(mode: BlockMode) -> char {
    match mode {
        BlockMode::Data => '}',
        BlockMode::Compose => ']',
        BlockMode::Do => ')',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_blocks_keep_their_mode() {
        let mut words = rye_eval::new_word_index();
        let (block, diagnostics) = load("{ 1 [ 2 ] ( 3 ) }", &mut words);
        assert!(diagnostics.is_empty());
        let Value::Block(outer) = &block.items()[0] else {
            panic!("expected a block");
        };
        assert_eq!(outer.mode, BlockMode::Data);
        let modes: Vec<Option<BlockMode>> = outer
            .items()
            .iter()
            .map(|v| v.as_block().map(|b| b.mode))
            .collect();
        assert_eq!(modes, vec![None, Some(BlockMode::Compose), Some(BlockMode::Do)]);
    }

    #[test]
    fn test_words_are_interned_once() {
        let mut words = rye_eval::new_word_index();
        let (block, _) = load("x: 1 x", &mut words);
        let x = words.lookup("x").unwrap();
        assert_eq!(block.items(), &[Value::Setword(x), Value::Integer(1), Value::Word(x)]);
    }

    #[test]
    fn test_unclosed_block_is_reported() {
        let mut words = rye_eval::new_word_index();
        let (block, diagnostics) = load("{ 1 2", &mut words);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, Some(ErrorCode::UnclosedDelimiter));
        assert_eq!(block.len(), 1);
    }

    #[test]
    fn test_stray_closer_is_reported() {
        let mut words = rye_eval::new_word_index();
        let (block, diagnostics) = load("1 ] 2", &mut words);
        assert_eq!(diagnostics[0].code, Some(ErrorCode::UnexpectedDelimiter));
        assert_eq!(block.items(), &[Value::Integer(1), Value::Integer(2)]);
    }

    #[test]
    fn test_paths_and_uris() {
        let mut words = rye_eval::new_word_index();
        let (block, diagnostics) = load("ctx/name https://example.com", &mut words);
        assert!(diagnostics.is_empty());
        assert!(matches!(&block.items()[0], Value::CPath(p) if p.words.len() == 2));
        assert!(matches!(&block.items()[1], Value::Uri(u) if u.path == "example.com"));
    }
}
