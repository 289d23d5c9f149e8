//! Evaluator for Rye.
//!
//! A [`ProgramState`] walks a series of values left to right. Words are
//! resolved through chained [`Context`]s and, when that fails, through the
//! [`GenericTable`]. The same state drives the prefix-only Rye0 dialect and
//! the postfix Eyr stack machine.

pub mod args;
mod builtin;
mod call;
mod config;
mod context;
mod dialect;
mod error;
mod eval;
mod evaluator;
mod eyr;
mod generic;
mod pattern;
mod print;
mod series;
mod stack;
mod state;
mod value;

pub use config::{ConfigError, EvalConfig};
pub use context::{Context, ModResult};
pub use dialect::Dialect;
pub use error::{arg_error, builtin_error, ErrorLocation, EvalError, RyeError};
pub use evaluator::Evaluator;
pub use eyr::EyrStack;
pub use generic::GenericTable;
pub use pattern::MatchOutcome;
pub use series::Series;
pub use state::{KnownWords, ProgramState};
pub use value::{
    Block, BlockMode, BlockRef, Builtin, BuiltinFn, BuiltinResult, CPath, Function, PathMode,
    Uri, Value, ValueType, MAX_ARITY,
};

use rye_common::WordIndex;

/// A word index whose first symbols are the type names, in
/// [`ValueType::ALL`] order.
pub fn new_word_index() -> WordIndex {
    let names: Vec<&str> = ValueType::ALL.iter().map(|ty| ty.name()).collect();
    WordIndex::with_reserved(&names)
}
