//! Host-facing evaluator.

use rye_common::WordIndex;
use tracing::debug;

use crate::builtin;
use crate::config::EvalConfig;
use crate::error::EvalError;
use crate::state::ProgramState;
use crate::value::{Block, Builtin, Value};

/// A program state with the core builtins registered, kept alive across
/// evaluations so definitions persist (as in a REPL).
pub struct Evaluator {
    state: ProgramState,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        let mut state = ProgramState::new(config);
        for bi in builtin::builtins() {
            state.register_builtin(bi);
        }
        Self { state }
    }

    /// Register additional builtins in the root context.
    pub fn register(&mut self, builtins: impl IntoIterator<Item = Builtin>) {
        for bi in builtins {
            self.state.register_builtin(bi);
        }
    }

    pub fn words(&self) -> &WordIndex {
        &self.state.words
    }

    /// The word index, for loading source before evaluating it.
    pub fn words_mut(&mut self) -> &mut WordIndex {
        &mut self.state.words
    }

    pub fn state(&self) -> &ProgramState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ProgramState {
        &mut self.state
    }

    /// Evaluate a top-level block in the configured dialect and convert the
    /// final flags into a result.
    pub fn eval(&mut self, block: &Block) -> Result<Value, EvalError> {
        let ps = &mut self.state;
        ps.reset_flags();
        ps.res = Value::Void;
        ps.stack.clear();
        ps.ser = block.series.rewound();
        debug!(dialect = %ps.dialect, len = block.len(), "evaluating block");

        ps.eval_block_inj_multi_dialect(None, false);
        ps.run_deferred(0);
        ps.return_flag = false;

        if ps.error_flag {
            let report = ps.display_failure_or_error("eval").unwrap_or_default();
            let (status, message) = error_parts(&ps.res);
            return Err(EvalError::Raised {
                status,
                message,
                report,
            });
        }
        if ps.failure_flag {
            let (status, message) = error_parts(&ps.res);
            return Err(EvalError::Failure { status, message });
        }
        Ok(ps.res.clone())
    }

    /// The value bound to `name` in the evaluation context.
    pub fn get(&self, name: &str) -> Option<Value> {
        let word = self.state.words.lookup(name)?;
        self.state.ctx.get(word)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn error_parts(value: &Value) -> (i64, String) {
    match value {
        Value::Error(err) => (err.status, err.to_string()),
        other => (0, format!("{other:?}")),
    }
}
