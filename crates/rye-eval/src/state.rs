//! The program state threaded through every evaluation step.

use std::fmt::Write as _;

use rye_common::{Symbol, WordIndex};
use rye_diagnostic::ErrorCode;
use tracing::{debug, trace};

use crate::config::EvalConfig;
use crate::context::Context;
use crate::dialect::Dialect;
use crate::error::RyeError;
use crate::eyr::EyrStack;
use crate::generic::GenericTable;
use crate::series::Series;
use crate::stack::ensure_sufficient_stack;
use crate::value::{Block, Builtin, Value};

/// Words the evaluator itself looks up.
#[derive(Debug, Clone, Copy)]
pub struct KnownWords {
    pub error_handler: Symbol,
    pub rest_marker: Symbol,
}

/// The single mutable unit of work of an evaluation.
///
/// Sub-evaluations swap `ser` and `ctx` (and `args` for function calls)
/// and restore them on the way out.
pub struct ProgramState {
    /// The series being evaluated.
    pub ser: Series,
    /// Result of the last expression.
    pub res: Value,
    /// Current context.
    pub ctx: Context,
    /// Root context holding the registered builtins.
    pub root: Context,
    /// Pure root context, parent of pure function calls.
    pub pctx: Context,
    pub words: WordIndex,
    pub generics: GenericTable,
    /// Parameter words of the innermost function call.
    pub args: Vec<Symbol>,

    pub error_flag: bool,
    pub failure_flag: bool,
    pub return_flag: bool,
    /// Reserved. Nothing raises it and evaluation does not consult it.
    pub skip_flag: bool,
    /// Set while an `error-handler` block runs.
    pub in_err_handler: bool,

    pub dialect: Dialect,
    pub stack: EyrStack,
    pub config: EvalConfig,

    pub(crate) deferred: Vec<Block>,
    pub(crate) depth: usize,
    pub(crate) known: KnownWords,
}

impl ProgramState {
    pub fn new(config: EvalConfig) -> Self {
        let mut words = crate::new_word_index();
        let known = KnownWords {
            error_handler: words.intern("error-handler"),
            rest_marker: words.intern("::"),
        };
        let root = Context::new(None);
        let ctx = root.child();
        Self {
            ser: Series::default(),
            res: Value::Void,
            ctx,
            root,
            pctx: Context::new(None),
            words,
            generics: GenericTable::new(),
            args: Vec::new(),
            error_flag: false,
            failure_flag: false,
            return_flag: false,
            skip_flag: false,
            in_err_handler: false,
            dialect: config.dialect,
            stack: EyrStack::new(config.eyr_stack_size),
            config,
            deferred: Vec::new(),
            depth: 0,
            known,
        }
    }

    /// Bind a builtin in the root context, and in the pure root context too
    /// if it is pure.
    pub fn register_builtin(&mut self, builtin: Builtin) {
        let word = self.words.intern(builtin.name);
        let pure = builtin.pure;
        let value = builtin.into_value();
        if pure {
            self.pctx.bind(word, value.clone());
        }
        self.root.bind(word, value);
    }

    pub fn register_value(&mut self, name: &str, value: Value) {
        let word = self.words.intern(name);
        self.root.bind(word, value);
    }

    pub fn intern(&mut self, name: &str) -> Symbol {
        self.words.intern(name)
    }

    pub fn word_name(&self, word: Symbol) -> &str {
        self.words.name(word)
    }

    /// Raise the error flag with a new error value.
    pub fn set_error(&mut self, code: ErrorCode, message: impl Into<String>) {
        self.res = Value::error(RyeError::from_code(code, message));
        self.error_flag = true;
    }

    /// Raise the failure flag with a new error value.
    pub fn set_failure(&mut self, code: ErrorCode, message: impl Into<String>) {
        self.res = Value::error(RyeError::from_code(code, message));
        self.failure_flag = true;
    }

    pub fn reset_flags(&mut self) {
        self.error_flag = false;
        self.failure_flag = false;
        self.return_flag = false;
        self.skip_flag = false;
        self.in_err_handler = false;
    }

    /// Record the current block and context on the error in the result slot,
    /// unless it already carries a location.
    pub fn update_error_location(&mut self) {
        if let Value::Error(err) = &self.res {
            if err.attach_location(self.ser.clone(), self.ctx.clone()) {
                trace!(pos = self.ser.pos(), "error location recorded");
            }
        }
    }

    /// Render a pending error or failure for the user. `tag` names the call
    /// site that noticed it.
    pub fn display_failure_or_error(&self, tag: &str) -> Option<String> {
        if !self.error_flag && !self.failure_flag {
            return None;
        }
        let heading = if self.error_flag { "Error" } else { "Failure" };
        let mut out = String::new();
        match &self.res {
            Value::Error(err) => {
                let _ = writeln!(out, "{heading}: {}", err.message);
                for cause in err.chain().skip(1) {
                    let _ = writeln!(out, "  caused by: {}", cause.message);
                }
                if let Some(loc) = err.location() {
                    let _ = writeln!(out, "At location:");
                    let _ = writeln!(out, "  {}", loc.block.surroundings(&self.words));
                }
            }
            other => {
                let _ = writeln!(out, "{heading}: {}", other.print(&self.words));
            }
        }
        let _ = write!(out, "({tag})");
        Some(out)
    }

    /// Register a block to run when the current function call ends.
    pub fn defer(&mut self, block: Block) {
        self.deferred.push(block);
    }

    /// Run `f` one nesting level deeper. Returns `None`, with the error flag
    /// raised, when the configured depth is exhausted.
    pub(crate) fn with_depth<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> Option<R> {
        if self.depth >= self.config.max_depth {
            debug!(depth = self.depth, "evaluation depth limit reached");
            self.set_error(ErrorCode::DepthExceeded, "maximum evaluation depth exceeded");
            return None;
        }
        self.depth += 1;
        let out = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        Some(out)
    }

    /// Run, newest first, the deferred blocks registered since `mark`.
    ///
    /// Flags and the result are saved around them. An error raised by a
    /// deferred block replaces the result only if no error or failure was
    /// already propagating.
    pub(crate) fn run_deferred(&mut self, mark: usize) {
        if self.deferred.len() <= mark {
            return;
        }
        let res = std::mem::take(&mut self.res);
        let (error, failure, ret) = (self.error_flag, self.failure_flag, self.return_flag);
        let mut raised = None;
        while self.deferred.len() > mark {
            let Some(block) = self.deferred.pop() else {
                break;
            };
            debug!(remaining = self.deferred.len() - mark, "running deferred block");
            self.error_flag = false;
            self.failure_flag = false;
            self.return_flag = false;
            self.run_block(&block, None);
            if (self.error_flag || self.failure_flag) && raised.is_none() {
                raised = Some(std::mem::take(&mut self.res));
            }
        }
        self.res = res;
        self.error_flag = error;
        self.failure_flag = failure;
        self.return_flag = ret;
        if let Some(err) = raised {
            if !error && !failure {
                self.res = err;
                self.error_flag = true;
            }
        }
    }
}

impl Default for ProgramState {
    fn default() -> Self {
        Self::new(EvalConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::BuiltinResult;

    fn one(_ps: &mut ProgramState, _args: &[Value]) -> BuiltinResult {
        Ok(Value::Integer(1))
    }

    #[test]
    fn test_reset_flags() {
        let mut ps = ProgramState::default();
        ps.set_error(ErrorCode::WordNotFound, "word not found: x");
        ps.failure_flag = true;
        ps.return_flag = true;
        ps.skip_flag = true;
        ps.in_err_handler = true;
        ps.reset_flags();
        assert!(!ps.error_flag && !ps.failure_flag && !ps.return_flag);
        assert!(!ps.skip_flag && !ps.in_err_handler);
    }

    #[test]
    fn test_register_builtin_binds_in_root() {
        let mut ps = ProgramState::default();
        ps.register_builtin(Builtin::new("one", 0, one));
        ps.register_builtin(Builtin::new("pure-one", 0, one).pure());
        let word = ps.words.lookup("one").unwrap();
        let pure = ps.words.lookup("pure-one").unwrap();
        assert!(ps.ctx.get(word).is_some());
        assert!(ps.pctx.get(word).is_none());
        assert!(ps.pctx.get(pure).is_some());
    }

    #[test]
    fn test_depth_guard_raises_error() {
        let mut ps = ProgramState::new(EvalConfig::new().max_depth(2));
        let reached = ps.with_depth(|ps| ps.with_depth(|ps| ps.with_depth(|_| ())));
        assert_eq!(reached, Some(Some(None)));
        assert!(ps.error_flag);
        assert_eq!(ps.depth, 0);
    }

    #[test]
    fn test_display_failure_or_error() {
        let mut ps = ProgramState::default();
        assert!(ps.display_failure_or_error("test").is_none());
        ps.set_error(ErrorCode::WordNotFound, "word not found: x");
        let shown = ps.display_failure_or_error("test").unwrap();
        assert!(shown.starts_with("Error: word not found: x"));
        assert!(shown.ends_with("(test)"));
    }
}
