//! The primary evaluator.
//!
//! Expressions are evaluated prefix-first: a value is popped from the
//! current series and either stands for itself, is resolved through the
//! context chain, or is called. After each value the evaluator looks one
//! element ahead for op-words, pipe-words and left set-words, which take
//! the value computed so far as their first argument.

use std::rc::Rc;

use rye_common::{Symbol, WordIndex};
use rye_diagnostic::ErrorCode;
use tracing::{debug, trace};

use crate::context::{Context, ModResult};
use crate::dialect::Dialect;
use crate::state::ProgramState;
use crate::value::{Block, BlockMode, CPath, PathMode, Value};

/// What a word-like value names.
pub(crate) enum WordTarget {
    Word(Symbol),
    Path(Rc<CPath>),
}

impl WordTarget {
    /// The word used for generic dispatch.
    pub(crate) fn last(&self) -> Option<Symbol> {
        match self {
            WordTarget::Word(w) => Some(*w),
            WordTarget::Path(p) => p.words.last().copied(),
        }
    }

    pub(crate) fn describe(&self, words: &WordIndex) -> String {
        match self {
            WordTarget::Word(w) => words.name(*w).to_string(),
            WordTarget::Path(p) => {
                let parts: Vec<&str> = p.words.iter().map(|w| words.name(*w)).collect();
                parts.join("/")
            }
        }
    }
}

impl ProgramState {
    /// Evaluate the current series to its end, or until a flag stops it.
    pub fn eval_block(&mut self) {
        self.eval_block_inj(None, false);
    }

    /// Like [`ProgramState::eval_block`], with `inj` standing in for the
    /// first expression when `injnow` is set, and again after every comma.
    pub fn eval_block_inj(&mut self, inj: Option<&Value>, mut injnow: bool) {
        while !self.ser.at_end() {
            injnow = self.eval_expression_inj(inj, injnow);
            if self.check_flags_after_expression() || self.return_flag {
                return;
            }
            injnow = self.maybe_accept_comma(inj, injnow);
        }
    }

    /// Evaluate `block` from its start in the current context and dialect,
    /// one nesting level deeper. The current series is restored afterwards.
    pub fn run_block(&mut self, block: &Block, inj: Option<&Value>) {
        let saved = std::mem::replace(&mut self.ser, block.series.rewound());
        self.res = Value::Void;
        self.with_depth(|ps| ps.eval_block_inj_multi_dialect(inj, inj.is_some()));
        self.ser = saved;
    }

    /// Like [`ProgramState::run_block`], inside `ctx`.
    pub fn run_block_in(&mut self, block: &Block, ctx: Context, inj: Option<&Value>) {
        let saved = std::mem::replace(&mut self.ctx, ctx);
        self.run_block(block, inj);
        self.ctx = saved;
    }

    fn eval_expression_inj(&mut self, inj: Option<&Value>, injnow: bool) -> bool {
        match inj {
            Some(value) if injnow => {
                self.res = value.clone();
                self.maybe_eval_opword_on_right(false);
                false
            }
            _ => {
                self.eval_expression();
                injnow
            }
        }
    }

    /// Step over a comma. A comma re-arms injection.
    pub(crate) fn maybe_accept_comma(&mut self, inj: Option<&Value>, injnow: bool) -> bool {
        if matches!(self.ser.peek(), Some(Value::Comma)) {
            self.ser.next();
            return injnow || inj.is_some();
        }
        injnow
    }

    /// Evaluate one expression including every op-word and pipe-word chained
    /// to its right.
    pub fn eval_expression(&mut self) {
        self.eval_expression_concrete();
        self.maybe_eval_opword_on_right(false);
    }

    /// Evaluate one expression, chaining op-words only. Used to collect
    /// prefix call arguments, so pipe-words apply to the whole call.
    pub fn eval_expression_limited(&mut self) {
        self.eval_expression_concrete();
        self.maybe_eval_opword_on_right(true);
    }

    /// Evaluate exactly one value, without looking to its right.
    pub fn eval_expression_concrete(&mut self) {
        let Some(value) = self.ser.pop() else {
            self.set_error(ErrorCode::MissingValue, "expected a value, but the block ended");
            return;
        };
        match value {
            Value::Block(block) => self.eval_block_value(block),
            Value::Tagword(w) => self.res = Value::Word(w),
            Value::Word(w) => self.eval_word(WordTarget::Word(w), None),
            Value::CPath(path) => match path.mode {
                PathMode::Plain => self.eval_word(WordTarget::Path(path), None),
                PathMode::Get => self.eval_get_target(WordTarget::Path(path)),
                PathMode::Op | PathMode::Pipe => self.missing_left_value(&Value::CPath(path)),
            },
            Value::Builtin(_) | Value::Function(_) => self.eval_object(value, None, None),
            Value::Setword(w) => self.eval_setword(w),
            Value::Modword(w) => self.eval_modword(w),
            Value::Getword(w) => self.eval_get_target(WordTarget::Word(w)),
            Value::Genword(w) => self.eval_genword(w),
            Value::Opword(_) | Value::Pipeword(_) | Value::LSetword(_) | Value::LModword(_) => {
                self.missing_left_value(&value)
            }
            Value::Comma => self.set_error(
                ErrorCode::ExpressionGuard,
                "expression guard (comma) inside an expression",
            ),
            literal => self.res = literal,
        }
    }

    fn missing_left_value(&mut self, value: &Value) {
        let shown = value.mold(&self.words);
        self.set_error(
            ErrorCode::MissingLeftValue,
            format!("{shown} needs a value on its left"),
        );
    }

    fn eval_block_value(&mut self, block: Block) {
        match block.mode {
            BlockMode::Data => self.res = Value::Block(block),
            BlockMode::Do => {
                let saved = std::mem::replace(&mut self.ser, block.series.rewound());
                self.res = Value::Void;
                self.with_depth(|ps| ps.eval_block());
                self.ser = saved;
            }
            BlockMode::Compose => {
                let saved = std::mem::replace(&mut self.ser, block.series.rewound());
                let items = self.with_depth(|ps| {
                    let mut items = Vec::new();
                    while !ps.ser.at_end() {
                        ps.eval_expression();
                        if ps.check_flags_after_expression() || ps.return_flag {
                            break;
                        }
                        items.push(std::mem::take(&mut ps.res));
                        ps.maybe_accept_comma(None, false);
                    }
                    items
                });
                self.ser = saved;
                if let Some(items) = items {
                    if !self.error_flag && !self.return_flag {
                        self.res = Value::block(items);
                    }
                }
            }
        }
    }

    /// Apply op-words, pipe-words, left set-words and infix paths to the
    /// result, left to right. With `limited` only op-words and op paths are
    /// taken.
    pub(crate) fn maybe_eval_opword_on_right(&mut self, limited: bool) {
        if self.dialect == Dialect::Rye0 {
            return;
        }
        loop {
            if self.error_flag || self.return_flag {
                return;
            }
            let Some(next) = self.ser.peek().cloned() else {
                return;
            };
            match next {
                Value::Opword(w) => {
                    self.ser.next();
                    let left = std::mem::take(&mut self.res);
                    self.eval_word(WordTarget::Word(w), Some(left));
                }
                Value::Pipeword(w) if !limited => {
                    self.ser.next();
                    let left = std::mem::take(&mut self.res);
                    self.eval_word(WordTarget::Word(w), Some(left));
                }
                Value::CPath(path)
                    if path.mode == PathMode::Op || (path.mode == PathMode::Pipe && !limited) =>
                {
                    self.ser.next();
                    let left = std::mem::take(&mut self.res);
                    self.eval_word(WordTarget::Path(path), Some(left));
                }
                Value::LSetword(w) if !limited => {
                    if self.failure_flag {
                        return;
                    }
                    self.ser.next();
                    self.set_word(w, self.res.clone());
                }
                Value::LModword(w) if !limited => {
                    if self.failure_flag {
                        return;
                    }
                    self.ser.next();
                    self.modify_word(w, self.res.clone());
                }
                _ => return,
            }
        }
    }

    /// Look a word or path up. Paths also return the context the last word
    /// was found through.
    pub(crate) fn find_word_value(&self, target: &WordTarget) -> Option<(Value, Option<Context>)> {
        match target {
            WordTarget::Word(w) => self.ctx.get(*w).map(|value| (value, None)),
            WordTarget::Path(path) => {
                let (first, rest) = path.words.split_first()?;
                let mut value = self.ctx.get(*first)?;
                let mut session = None;
                for word in rest {
                    let Value::Context(ctx) = value else {
                        return None;
                    };
                    value = ctx.get(*word)?;
                    session = Some(ctx);
                }
                Some((value, session))
            }
        }
    }

    /// Resolve a word through the context chain, falling back to generic
    /// dispatch, and evaluate what it names. `left` is the value computed so
    /// far when the word was reached through an op-word or pipe-word.
    pub(crate) fn eval_word(&mut self, target: WordTarget, left: Option<Value>) {
        if let Some((value, session)) = self.find_word_value(&target) {
            self.eval_object(value, left, session);
            return;
        }
        let pos = self.ser.pos();
        if let Some(word) = target.last() {
            if !self.ctx.is_isolated() && self.generics.has_word(word) {
                let first = match left {
                    Some(value) => value,
                    None => {
                        self.eval_expression_concrete();
                        if self.error_flag || self.return_flag {
                            return;
                        }
                        std::mem::take(&mut self.res)
                    }
                };
                if let Some(method) = self.generics.resolve(first.kind(), word) {
                    trace!(word = self.words.name(word), "generic dispatch hit");
                    self.eval_object(method, Some(first), None);
                    return;
                }
                trace!(word = self.words.name(word), "generic dispatch miss");
            }
        }
        self.ser.set_pos(pos);
        let name = target.describe(&self.words);
        self.set_error(ErrorCode::WordNotFound, format!("word not found: {name}"));
    }

    /// Call a resolved callable, or take a plain value as the result.
    pub(crate) fn eval_object(&mut self, object: Value, left: Option<Value>, session: Option<Context>) {
        match object {
            Value::Builtin(bi) => {
                if self.check_for_failure(bi.accept_failure) {
                    return;
                }
                self.call_builtin(&bi, left);
            }
            Value::Function(func) => {
                if self.check_for_failure(false) {
                    return;
                }
                self.call_function(&func, left, session);
            }
            other => self.res = other,
        }
    }

    /// Fetch without calling.
    fn eval_get_target(&mut self, target: WordTarget) {
        match self.find_word_value(&target) {
            Some((value, _)) => self.res = value,
            None => {
                let name = target.describe(&self.words);
                self.set_error(ErrorCode::WordNotFound, format!("word not found: {name}"));
            }
        }
    }

    fn eval_setword(&mut self, word: Symbol) {
        self.eval_expression();
        if self.error_flag || self.failure_flag || self.return_flag {
            return;
        }
        self.set_word(word, self.res.clone());
    }

    fn eval_modword(&mut self, word: Symbol) {
        self.eval_expression();
        if self.error_flag || self.failure_flag || self.return_flag {
            return;
        }
        self.modify_word(word, self.res.clone());
    }

    /// Bind a word in the current context, refusing to rebind it.
    pub(crate) fn set_word(&mut self, word: Symbol, value: Value) {
        if !self.ctx.set_new(word, value) {
            let name = self.words.name(word).to_string();
            self.set_error(
                ErrorCode::WordAlreadySet,
                format!("Can't set already set word {name}, try using modword"),
            );
        }
    }

    /// Change the nearest binding of a variable, or create one in the
    /// current context.
    pub(crate) fn modify_word(&mut self, word: Symbol, value: Value) {
        let target = match self.ctx.get_with_owner(word) {
            Some((_, owner)) => owner,
            None => self.ctx.clone(),
        };
        let got = value.value_type();
        match target.modify(word, value) {
            ModResult::Modified | ModResult::Created => {}
            ModResult::Constant => {
                let name = self.words.name(word).to_string();
                self.set_error(
                    ErrorCode::ConstantModified,
                    format!("Cannot modify constant {name}, use var to declare it"),
                );
            }
            ModResult::TypeMismatch(expected) => {
                let name = self.words.name(word).to_string();
                self.set_error(
                    ErrorCode::ModTypeMismatch,
                    format!(
                        "Cannot modify {name}: it holds a {}, got a {}",
                        expected.name(),
                        got.name()
                    ),
                );
            }
        }
    }

    /// `~word value`: dispatch on the kind of the next value, skipping
    /// ordinary lookup.
    fn eval_genword(&mut self, word: Symbol) {
        self.eval_expression_concrete();
        if self.error_flag || self.return_flag {
            return;
        }
        let first = std::mem::take(&mut self.res);
        match self.generics.resolve(first.kind(), word) {
            Some(method) => self.eval_object(method, Some(first), None),
            None => {
                let name = self.words.name(word).to_string();
                let kind = self.words.name(first.kind()).to_string();
                self.set_error(
                    ErrorCode::WordNotFound,
                    format!("generic word not found: {name} for kind {kind}"),
                );
            }
        }
    }

    /// Promote a pending failure to an error before a callable that does
    /// not accept failures runs.
    pub(crate) fn check_for_failure(&mut self, accept_failure: bool) -> bool {
        if self.failure_flag && !accept_failure {
            self.update_error_location();
            self.error_flag = true;
            return true;
        }
        false
    }

    /// Decide whether the enclosing block must stop after an expression.
    /// A pending failure is handed to an `error-handler` block when one is
    /// in scope, and promoted to an error otherwise.
    pub(crate) fn check_flags_after_expression(&mut self) -> bool {
        if self.error_flag {
            self.update_error_location();
            return true;
        }
        if self.failure_flag && !self.return_flag {
            if !self.in_err_handler && self.run_error_handler() {
                return self.error_flag;
            }
            self.update_error_location();
            self.error_flag = true;
            return true;
        }
        false
    }

    fn run_error_handler(&mut self) -> bool {
        let Some(Value::Block(handler)) = self.ctx.get(self.known.error_handler) else {
            return false;
        };
        debug!("running error handler");
        let failed = std::mem::take(&mut self.res);
        self.failure_flag = false;
        self.in_err_handler = true;
        self.run_block(&handler, Some(&failed));
        self.in_err_handler = false;
        true
    }
}
