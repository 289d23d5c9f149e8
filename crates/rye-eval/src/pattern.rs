//! Structural pattern matching.
//!
//! A pattern is matched element by element against a value. Bindings are
//! collected while matching and only written to the current context once
//! the whole pattern has matched.

use rye_common::Symbol;
use rye_diagnostic::ErrorCode;

use crate::error::RyeError;
use crate::state::ProgramState;
use crate::value::{Block, BlockMode, Value};

/// Result of matching a value against a pattern.
#[derive(Debug)]
pub enum MatchOutcome {
    Matched,
    /// The value does not match; carries the reason.
    Failed(RyeError),
    /// Matching raised the error flag, with the error in the result slot.
    Aborted,
}

type Bindings = Vec<(Symbol, Value)>;

fn mismatch(message: impl Into<String>) -> MatchOutcome {
    MatchOutcome::Failed(RyeError::from_code(ErrorCode::MatchFailed, message))
}

impl ProgramState {
    /// Match `value` against `pattern`. A data block pattern requires a
    /// block value and matches it element by element; any other pattern is
    /// matched against the value as a single element.
    pub fn match_pattern(&mut self, value: &Value, pattern: &Value) -> MatchOutcome {
        let mut bindings = Bindings::new();
        let outcome = match pattern {
            Value::Block(block) if block.mode == BlockMode::Data => {
                self.match_block(value, block, &mut bindings)
            }
            other => self.match_element(value, other, &mut bindings),
        };
        if let MatchOutcome::Matched = outcome {
            for (word, bound) in bindings {
                self.ctx.bind(word, bound);
            }
        }
        outcome
    }

    fn match_block(&mut self, value: &Value, pattern: &Block, bindings: &mut Bindings) -> MatchOutcome {
        match value {
            Value::Block(block) => self.match_items(block.items(), pattern.items(), bindings),
            Value::Ref(r) => {
                let series = r.snapshot();
                self.match_items(series.items(), pattern.items(), bindings)
            }
            other => mismatch(format!(
                "expected a block, got {}",
                other.value_type().name()
            )),
        }
    }

    fn match_items(&mut self, values: &[Value], patterns: &[Value], bindings: &mut Bindings) -> MatchOutcome {
        let mut index = 0;
        for (p, pattern) in patterns.iter().enumerate() {
            if matches!(pattern, Value::Word(w) if *w == self.known.rest_marker) {
                let Some(Value::Word(target)) = patterns.get(p + 1) else {
                    self.set_error(ErrorCode::MatchConfig, "`::` must be followed by a word");
                    return MatchOutcome::Aborted;
                };
                let rest = values.get(index..).unwrap_or_default().to_vec();
                bindings.push((*target, Value::block(rest)));
                return MatchOutcome::Matched;
            }
            let Some(value) = values.get(index) else {
                return mismatch("the value has fewer elements than the pattern");
            };
            match self.match_element(value, pattern, bindings) {
                MatchOutcome::Matched => index += 1,
                other => return other,
            }
        }
        if index < values.len() {
            return mismatch("the value has more elements than the pattern");
        }
        MatchOutcome::Matched
    }

    fn match_element(&mut self, value: &Value, pattern: &Value, bindings: &mut Bindings) -> MatchOutcome {
        match pattern {
            Value::Void => MatchOutcome::Matched,
            Value::Word(w) | Value::Tagword(w) => {
                bindings.push((*w, value.clone()));
                MatchOutcome::Matched
            }
            Value::Xword(ty) => {
                if value.value_type().symbol() == *ty || value.kind() == *ty {
                    MatchOutcome::Matched
                } else {
                    mismatch(format!(
                        "Expected type {}, got {}",
                        self.words.name(*ty),
                        value.value_type().name()
                    ))
                }
            }
            Value::Getword(w) => {
                let current = bindings
                    .iter()
                    .rev()
                    .find(|(bound, _)| bound == w)
                    .map(|(_, v)| v.clone())
                    .or_else(|| self.ctx.get(*w));
                match current {
                    Some(current) if current == *value => MatchOutcome::Matched,
                    _ => mismatch(format!(
                        "value does not equal the current value of {}",
                        self.words.name(*w)
                    )),
                }
            }
            Value::Block(block) if block.mode == BlockMode::Compose => self.match_guard(value, block),
            Value::Block(block) => self.match_block(value, block, bindings),
            literal => {
                if literal == value {
                    MatchOutcome::Matched
                } else {
                    mismatch(format!(
                        "expected {}, got {}",
                        literal.mold(&self.words),
                        value.mold(&self.words)
                    ))
                }
            }
        }
    }

    /// Evaluate a `[ ]` pattern with the value injected. A failure or a
    /// `false` result rejects the value.
    fn match_guard(&mut self, value: &Value, guard: &Block) -> MatchOutcome {
        self.run_block(guard, Some(value));
        if self.error_flag {
            return MatchOutcome::Aborted;
        }
        if self.failure_flag {
            self.failure_flag = false;
            return match std::mem::take(&mut self.res) {
                Value::Error(err) => MatchOutcome::Failed(RyeError::clone(&err)),
                _ => mismatch("guard failed"),
            };
        }
        match self.res {
            Value::Boolean(false) => mismatch("guard returned false"),
            _ => MatchOutcome::Matched,
        }
    }
}
