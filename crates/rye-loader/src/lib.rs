//! Loader for Rye.
//! Rye 加载器。
//!
//! The loader turns the lexer's tokens into nested blocks of values,
//! interning every word into the evaluator's word index on the way.
//! 加载器把词法分析器产生的 token 转换为嵌套的值块，同时把所有词
//! 登记到求值器的词索引中。

mod loader;

pub use loader::Loader;

use rye_common::WordIndex;
use rye_diagnostic::Diagnostic;
use rye_eval::Block;
use thiserror::Error;

/// Load `source` into a top-level data block.
/// 把源码加载为顶层数据块。
pub fn load(source: &str, words: &mut WordIndex) -> (Block, Vec<Diagnostic>) {
    let (tokens, mut diagnostics) = rye_lexer::tokenize(source);
    let mut loader = Loader::new(tokens, words);
    let block = loader.load_block();
    diagnostics.extend(loader.diagnostics());
    (block, diagnostics)
}

/// Reader failure, summarised for hosts that do not render diagnostics.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("syntax error: {message}")]
    Syntax {
        message: String,
        /// Further error diagnostics after the first.
        more: usize,
    },
}

/// Load `source`, failing if any error diagnostic was reported.
pub fn load_strict(source: &str, words: &mut WordIndex) -> Result<Block, LoadError> {
    let (block, diagnostics) = load(source, words);
    let mut errors = diagnostics.into_iter().filter(Diagnostic::is_error);
    match errors.next() {
        Some(first) => Err(LoadError::Syntax {
            message: first.message,
            more: errors.count(),
        }),
        None => Ok(block),
    }
}
