//! Standard builtins for Rye.
//! Rye 标准内置函数库。
//!
//! This crate provides the leaf builtins registered in the root context
//! next to the evaluator's core builtins.
//! 本 crate 提供与求值器核心内置函数一起注册到根上下文的叶子内置函数。

mod collections;
mod conditionals;
mod contexts;
mod failure;
mod functions;
mod io;
mod iteration;
mod math;
mod strings;
mod types;

use std::rc::Rc;

use rye_common::WordIndex;
use rye_eval::{arg_error, Builtin, BuiltinResult, ProgramState, RyeError, Value, ValueType};
use tracing::debug;

/// Return every standard builtin.
/// 返回所有标准内置函数。
pub fn stdlib() -> Vec<Builtin> {
    let mut builtins = Vec::new();
    builtins.extend(math::builtins());
    builtins.extend(collections::builtins());
    builtins.extend(strings::builtins());
    builtins.extend(conditionals::builtins());
    builtins.extend(iteration::builtins());
    builtins.extend(failure::builtins());
    builtins.extend(functions::builtins());
    builtins.extend(contexts::builtins());
    builtins.extend(types::builtins());
    builtins.extend(io::builtins());
    debug!(count = builtins.len(), "collected standard builtins");
    builtins
}

/// Turn the result of a nested evaluation into a builtin result. A raised
/// error keeps the error flag so the caller does not downgrade it.
/// 把嵌套求值的结果转换为内置函数结果。
pub(crate) fn take_result(ps: &mut ProgramState) -> BuiltinResult {
    let res = std::mem::take(&mut ps.res);
    if ps.error_flag || ps.failure_flag {
        return Err(into_error(res, &ps.words));
    }
    Ok(res)
}

pub(crate) fn into_error(value: Value, words: &WordIndex) -> RyeError {
    match value {
        Value::Error(err) => Rc::unwrap_or_clone(err),
        other => RyeError::new(0, other.print(words)),
    }
}

/// Whether a loop over nested evaluations must stop.
pub(crate) fn halted(ps: &ProgramState) -> bool {
    ps.error_flag || ps.failure_flag || ps.return_flag
}

/// The elements of a block or ref argument.
/// 块或引用参数的元素。
pub(crate) fn items_arg(builtin: &str, pos: usize, value: &Value) -> Result<Vec<Value>, RyeError> {
    match value {
        Value::Block(block) => Ok(block.items().to_vec()),
        Value::Ref(r) => Ok(r.with_series(|s| s.items().to_vec())),
        other => Err(arg_error(builtin, pos, &[ValueType::Block, ValueType::Ref], other)),
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use rye_eval::{EvalError, Evaluator};

    pub fn evaluator() -> Evaluator {
        let mut ev = Evaluator::new();
        ev.register(crate::stdlib());
        ev
    }

    /// Evaluate `source` and print the result, or the error message.
    pub fn run(source: &str) -> String {
        let mut ev = evaluator();
        run_in(&mut ev, source)
    }

    pub fn run_in(ev: &mut Evaluator, source: &str) -> String {
        let block = match rye_loader::load_strict(source, ev.words_mut()) {
            Ok(block) => block,
            Err(err) => panic!("{source}: {err}"),
        };
        match ev.eval(&block) {
            Ok(value) => value.print(ev.words()),
            Err(EvalError::Failure { message, .. }) => format!("failure: {message}"),
            Err(err) => format!("error: {}", err.message()),
        }
    }
}
