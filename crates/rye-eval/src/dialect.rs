//! Dialect selection.
//!
//! A block can be evaluated by the full evaluator, by the prefix-only Rye0
//! subset, or by the postfix Eyr stack machine. Switching always restores
//! the previous dialect, series and stack.

use std::fmt;

use serde::Deserialize;
use tracing::debug;

use crate::state::ProgramState;
use crate::value::{Block, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Prefix evaluation with op-word and pipe-word chaining.
    #[default]
    Rye,
    /// Prefix evaluation only.
    Rye0,
    /// Postfix evaluation on an explicit stack.
    Eyr,
}

impl Dialect {
    pub fn from_name(name: &str) -> Option<Dialect> {
        match name {
            "rye" => Some(Dialect::Rye),
            "rye0" => Some(Dialect::Rye0),
            "eyr" => Some(Dialect::Eyr),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Rye => "rye",
            Dialect::Rye0 => "rye0",
            Dialect::Eyr => "eyr",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ProgramState {
    /// Evaluate the current series in the active dialect. In Eyr the
    /// injected value is pushed before the block runs and the result is the
    /// top of the stack.
    pub fn eval_block_inj_multi_dialect(&mut self, inj: Option<&Value>, injnow: bool) {
        match self.dialect {
            Dialect::Eyr => {
                if let Some(value) = inj.filter(|_| injnow) {
                    if let Err(err) = self.stack.push(value.clone()) {
                        self.res = Value::error(err);
                        self.error_flag = true;
                        return;
                    }
                }
                self.eyr_eval_block(false);
            }
            Dialect::Rye | Dialect::Rye0 => self.eval_block_inj(inj, injnow),
        }
    }

    /// Evaluate `block` from its start under `dialect`, restoring the
    /// previous dialect, series and stack afterwards.
    pub fn eval_block_in_dialect(&mut self, block: &Block, dialect: Dialect, full: bool) {
        debug!(from = %self.dialect, to = %dialect, "switching dialect");
        let saved_dialect = std::mem::replace(&mut self.dialect, dialect);
        let saved_ser = std::mem::replace(&mut self.ser, block.series.rewound());
        let fresh = crate::eyr::EyrStack::new(self.config.eyr_stack_size);
        let saved_stack = std::mem::replace(&mut self.stack, fresh);
        self.with_depth(|ps| match dialect {
            Dialect::Eyr => ps.eyr_eval_block(full),
            Dialect::Rye | Dialect::Rye0 => ps.eval_block(),
        });
        self.stack = saved_stack;
        self.ser = saved_ser;
        self.dialect = saved_dialect;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_round_trips() {
        for dialect in [Dialect::Rye, Dialect::Rye0, Dialect::Eyr] {
            assert_eq!(Dialect::from_name(dialect.name()), Some(dialect));
        }
        assert_eq!(Dialect::from_name("lisp"), None);
    }

    #[test]
    fn test_switch_restores_dialect() {
        let mut ps = ProgramState::default();
        let block = Block::new(vec![Value::Integer(1), Value::Integer(2)]);
        ps.eval_block_in_dialect(&block, Dialect::Eyr, false);
        assert_eq!(ps.dialect, Dialect::Rye);
        assert_eq!(ps.res, Value::Integer(2));
    }
}
