//! The Eyr stack evaluator.
//!
//! Values are pushed onto an explicit stack; words pop their arguments
//! from it and push their result. Word lookup, generic dispatch and the
//! builtin currying rule are the primary evaluator's own.

use rye_common::Symbol;
use rye_diagnostic::ErrorCode;
use tracing::trace;

use crate::dialect::Dialect;
use crate::error::RyeError;
use crate::eval::WordTarget;
use crate::series::Series;
use crate::state::ProgramState;
use crate::value::{PathMode, Value};

/// A bounded value stack. Commas are kept as expression markers.
#[derive(Debug, Clone, Default)]
pub struct EyrStack {
    items: Vec<Value>,
    limit: usize,
}

impl EyrStack {
    pub fn new(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            limit,
        }
    }

    pub fn push(&mut self, value: Value) -> Result<(), RyeError> {
        if self.items.len() >= self.limit {
            return Err(RyeError::from_code(ErrorCode::StackOverflow, "stack overflow"));
        }
        self.items.push(value);
        Ok(())
    }

    /// Pop a value. An empty stack or an expression marker on top is an
    /// underflow.
    pub fn pop(&mut self) -> Result<Value, RyeError> {
        match self.items.last() {
            None | Some(Value::Comma) => {
                Err(RyeError::from_code(ErrorCode::StackUnderflow, "stack underflow"))
            }
            Some(_) => Ok(self.items.pop().unwrap_or_default()),
        }
    }

    /// Top value, skipping markers, or void.
    pub fn peek(&self) -> Value {
        self.items
            .iter()
            .rev()
            .find(|v| !matches!(v, Value::Comma))
            .cloned()
            .unwrap_or_default()
    }

    /// The first value of the current expression: the one just above the
    /// most recent marker, or the bottom of the stack.
    pub fn expression_start(&self) -> Option<&Value> {
        let start = self
            .items
            .iter()
            .rposition(|v| matches!(v, Value::Comma))
            .map_or(0, |i| i + 1);
        self.items.get(start)
    }

    /// All values bottom to top, without markers.
    pub fn values(&self) -> Vec<Value> {
        self.items
            .iter()
            .filter(|v| !matches!(v, Value::Comma))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl ProgramState {
    /// Evaluate the current series on the stack. The result is the top of
    /// the stack, or with `full` the whole stack as a block.
    pub fn eyr_eval_block(&mut self, full: bool) {
        while let Some(value) = self.ser.pop() {
            self.eyr_eval_value(value);
            if self.return_flag || self.check_flags_after_expression() {
                return;
            }
        }
        self.res = if full {
            Value::block(self.stack.values())
        } else {
            self.stack.peek()
        };
    }

    fn eyr_eval_value(&mut self, value: Value) {
        match value {
            Value::Word(w) | Value::Opword(w) | Value::Pipeword(w) => {
                self.eyr_call_word(WordTarget::Word(w))
            }
            Value::CPath(path) => match path.mode {
                PathMode::Get => match self.find_word_value(&WordTarget::Path(path)) {
                    Some((found, _)) => self.eyr_push(found),
                    None => self.set_error(ErrorCode::WordNotFound, "word not found in path"),
                },
                _ => self.eyr_call_word(WordTarget::Path(path)),
            },
            Value::Tagword(w) => self.eyr_push(Value::Word(w)),
            Value::Getword(w) => match self.ctx.get(w) {
                Some(found) => self.eyr_push(found),
                None => {
                    let name = self.words.name(w).to_string();
                    self.set_error(ErrorCode::WordNotFound, format!("word not found: {name}"));
                }
            },
            Value::Setword(w) | Value::LSetword(w) => {
                if let Some(top) = self.eyr_pop() {
                    self.set_word(w, top);
                }
            }
            Value::Modword(w) | Value::LModword(w) => {
                if let Some(top) = self.eyr_pop() {
                    self.modify_word(w, top);
                }
            }
            Value::Genword(w) => {
                let kind = self.stack.expression_start().map(Value::kind);
                match kind.and_then(|k| self.generics.resolve(k, w)) {
                    Some(method) => self.eyr_call(method),
                    None => {
                        let name = self.words.name(w).to_string();
                        self.set_error(ErrorCode::WordNotFound, format!("generic word not found: {name}"));
                    }
                }
            }
            Value::Builtin(_) | Value::Function(_) => self.eyr_call(value),
            Value::Comma => {
                if let Err(err) = self.stack.push(Value::Comma) {
                    self.raise(err);
                }
            }
            other => self.eyr_push(other),
        }
    }

    fn eyr_call_word(&mut self, target: WordTarget) {
        let found = self.find_word_value(&target).map(|(value, _)| value);
        let callable = match found {
            Some(value) => Some(value),
            None if !self.ctx.is_isolated() => {
                let kind = self.stack.expression_start().map(Value::kind);
                match (kind, target.last()) {
                    (Some(kind), Some(word)) => self.generics.resolve(kind, word),
                    _ => None,
                }
            }
            None => None,
        };
        match callable {
            Some(value) => self.eyr_call(value),
            None => {
                let name = target.describe(&self.words);
                self.set_error(ErrorCode::WordNotFound, format!("word not found: {name}"));
            }
        }
    }

    /// Pop the operands of a callable, call it and push its result. Plain
    /// values are pushed as they are.
    fn eyr_call(&mut self, value: Value) {
        match value {
            Value::Builtin(bi) => {
                let Some(open) = self.eyr_pop_n(bi.open_slots()) else {
                    return;
                };
                trace!(builtin = bi.name, "eyr call");
                let args = Self::builtin_args(&bi, open);
                self.apply_builtin(&bi, &args);
            }
            Value::Function(func) => {
                let Some(args) = self.eyr_pop_n(func.arity()) else {
                    return;
                };
                let saved = std::mem::replace(&mut self.dialect, Dialect::Rye);
                self.call_function_with_args(&func, &args);
                self.dialect = saved;
            }
            other => {
                self.eyr_push(other);
                return;
            }
        }
        if !self.error_flag && !self.failure_flag {
            let res = self.res.clone();
            self.eyr_push(res);
        }
    }

    fn eyr_push(&mut self, value: Value) {
        if let Err(err) = self.stack.push(value) {
            self.raise(err);
        }
    }

    fn eyr_pop(&mut self) -> Option<Value> {
        match self.stack.pop() {
            Ok(value) => Some(value),
            Err(err) => {
                self.raise(err);
                None
            }
        }
    }

    /// Pop `n` values, returned in push order.
    fn eyr_pop_n(&mut self, n: usize) -> Option<Vec<Value>> {
        let mut values = Vec::with_capacity(n);
        for _ in 0..n {
            values.push(self.eyr_pop()?);
        }
        values.reverse();
        Some(values)
    }

    fn raise(&mut self, err: RyeError) {
        self.res = Value::error(err);
        self.error_flag = true;
    }

    /// Compile a prefix block into the equivalent postfix order.
    pub fn to_eyr(&self, block: &Series) -> Result<Vec<Value>, RyeError> {
        let mut ser = block.rewound();
        let mut out = Vec::new();
        while !ser.at_end() {
            if matches!(ser.peek(), Some(Value::Comma)) {
                ser.next();
                out.push(Value::Comma);
                continue;
            }
            self.compile_expression(&mut ser, &mut out, false)?;
        }
        Ok(out)
    }

    fn compile_expression(&self, ser: &mut Series, out: &mut Vec<Value>, limited: bool) -> Result<(), RyeError> {
        self.compile_concrete(ser, out)?;
        loop {
            let word = match ser.peek() {
                Some(Value::Opword(w)) => *w,
                Some(Value::Pipeword(w)) if !limited => *w,
                _ => return Ok(()),
            };
            ser.next();
            for _ in 1..self.word_arity(word) {
                self.compile_concrete(ser, out)?;
            }
            out.push(Value::Word(word));
        }
    }

    fn compile_concrete(&self, ser: &mut Series, out: &mut Vec<Value>) -> Result<(), RyeError> {
        let Some(value) = ser.pop() else {
            return Err(RyeError::from_code(
                ErrorCode::MissingValue,
                "expected a value, but the block ended",
            ));
        };
        match value {
            Value::Word(w) => {
                for _ in 0..self.word_arity(w) {
                    self.compile_expression(ser, out, true)?;
                }
                out.push(Value::Word(w));
            }
            Value::Setword(w) => {
                self.compile_expression(ser, out, false)?;
                out.push(Value::Setword(w));
            }
            Value::Modword(w) => {
                self.compile_expression(ser, out, false)?;
                out.push(Value::Modword(w));
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn word_arity(&self, word: Symbol) -> usize {
        match self.ctx.get(word) {
            Some(Value::Builtin(bi)) => bi.open_slots(),
            Some(Value::Function(func)) => func.arity(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Builtin, BuiltinResult};
    use pretty_assertions::assert_eq;

    fn add(_ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
        match (&args[0], &args[1]) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a + b)),
            _ => Err(RyeError::new(1, "integers expected")),
        }
    }

    fn state() -> ProgramState {
        let mut ps = ProgramState::default();
        ps.register_builtin(Builtin::new("add", 2, add));
        ps.dialect = Dialect::Eyr;
        ps
    }

    #[test]
    fn test_stack_marker_blocks_pop() {
        let mut stack = EyrStack::new(4);
        stack.push(1.into()).unwrap();
        stack.push(Value::Comma).unwrap();
        assert!(stack.pop().is_err());
        assert_eq!(stack.peek(), Value::Integer(1));
        assert_eq!(stack.expression_start(), None);
        stack.push(2.into()).unwrap();
        assert_eq!(stack.expression_start(), Some(&Value::Integer(2)));
        assert_eq!(stack.values(), vec![Value::Integer(1), Value::Integer(2)]);
    }

    #[test]
    fn test_stack_overflow() {
        let mut stack = EyrStack::new(1);
        stack.push(1.into()).unwrap();
        let err = stack.push(2.into()).unwrap_err();
        assert_eq!(err.status, ErrorCode::StackOverflow.status());
    }

    #[test]
    fn test_postfix_add() {
        let mut ps = state();
        let add = ps.intern("add");
        ps.ser = Series::new(vec![1.into(), 2.into(), Value::Word(add)]);
        ps.eyr_eval_block(false);
        assert_eq!(ps.res, Value::Integer(3));
    }

    #[test]
    fn test_underflow_is_an_error() {
        let mut ps = state();
        let add = ps.intern("add");
        ps.ser = Series::new(vec![1.into(), Value::Word(add)]);
        ps.eyr_eval_block(false);
        assert!(ps.error_flag);
    }

    #[test]
    fn test_full_mode_returns_stack() {
        let mut ps = state();
        ps.ser = Series::new(vec![1.into(), Value::Comma, 2.into()]);
        ps.eyr_eval_block(true);
        assert_eq!(ps.res, Value::block(vec![1.into(), 2.into()]));
    }

    #[test]
    fn test_to_eyr_orders_operands_first() {
        let mut ps = state();
        let add = ps.intern("add");
        let prefix = Series::new(vec![Value::Word(add), 1.into(), Value::Word(add), 2.into(), 3.into()]);
        let postfix = ps.to_eyr(&prefix).unwrap();
        assert_eq!(
            postfix,
            vec![1.into(), 2.into(), 3.into(), Value::Word(add), Value::Word(add)]
        );
    }
}
