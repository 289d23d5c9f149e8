//! Common data structures for Rye.
//!
//! - `Span`: byte ranges into loaded source, used by reader diagnostics
//! - `WordIndex`: the global table mapping word names to `Symbol`s

mod span;
mod words;

pub use span::{LineCol, Span};
pub use words::{Symbol, WordIndex};
