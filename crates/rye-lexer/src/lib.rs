//! Lexical analysis for Rye.
//! Rye 词法分析模块。
//!
//! Rye source is a flat run of whitespace separated tokens plus brackets,
//! commas and string literals. The lexer classifies each token into its
//! word variant or literal kind; building blocks is left to `rye-loader`.
//! Rye 源码由空白分隔的 token、括号、逗号和字符串组成。词法分析器负责
//! 把每个 token 归类为对应的词变体或字面量；构建块由 `rye-loader` 完成。

mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{PathMode, Token, TokenKind};

/// Tokenize `source`, returning the tokens (ending in `Eof`) and any
/// diagnostics.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<rye_diagnostic::Diagnostic>) {
    Lexer::new(source).tokenize()
}
