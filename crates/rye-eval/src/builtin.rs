//! Builtins that re-enter the evaluator: block evaluation, dialect switches,
//! pattern matching, early return, deferred blocks and generic methods.

use std::rc::Rc;

use rye_diagnostic::ErrorCode;
use tracing::debug;

use crate::args::{block_arg, callable_arg, int_arg, word_arg};
use crate::dialect::Dialect;
use crate::error::RyeError;
use crate::eyr::EyrStack;
use crate::pattern::MatchOutcome;
use crate::state::ProgramState;
use crate::value::{Builtin, BuiltinResult, Value};

/// The builtins every evaluator registers.
pub fn builtins() -> Vec<Builtin> {
    vec![
        Builtin::new("true", 0, |_, _| Ok(Value::Boolean(true))).pure(),
        Builtin::new("false", 0, |_, _| Ok(Value::Boolean(false))).pure(),
        Builtin::new("do", 1, do_block).doc("Evaluates a block in the current context."),
        Builtin::new("do\\dialect", 2, do_dialect)
            .doc("Evaluates a block in the dialect named by a tag-word."),
        Builtin::new("rye0", 1, |ps, args| in_dialect(ps, "rye0", &args[0], Dialect::Rye0, false))
            .doc("Evaluates a block prefix-only."),
        Builtin::new("eyr", 1, |ps, args| in_dialect(ps, "eyr", &args[0], Dialect::Eyr, false))
            .doc("Evaluates a block on a stack, returning the top value."),
        Builtin::new("eyr\\full", 1, |ps, args| {
            in_dialect(ps, "eyr\\full", &args[0], Dialect::Eyr, true)
        })
        .doc("Evaluates a block on a stack, returning the whole stack."),
        Builtin::new("eyr\\loop", 2, eyr_loop).doc("Evaluates a block on one stack n times."),
        Builtin::new("to-eyr", 1, to_eyr).doc("Rewrites a prefix block in postfix order."),
        Builtin::new("match-block", 2, match_block)
            .doc("Matches a value against a pattern, binding its words."),
        Builtin::new("match", 2, match_cases)
            .doc("Evaluates the action of the first pattern the value matches."),
        Builtin::new("return", 1, return_value).doc("Returns a value from the current function."),
        Builtin::new("defer", 1, defer).doc("Runs a block when the current function returns."),
        Builtin::new("generic", 3, generic)
            .doc("Registers a callable for a word on values of a kind."),
    ]
}

/// The error in the result slot, for builtins that must propagate an error
/// raised by a nested evaluation.
fn take_error(ps: &mut ProgramState) -> RyeError {
    match std::mem::take(&mut ps.res) {
        Value::Error(err) => Rc::unwrap_or_clone(err),
        other => RyeError::new(0, other.print(&ps.words)),
    }
}

fn do_block(ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    let block = block_arg("do", 1, &args[0])?;
    ps.run_block(block, None);
    Ok(std::mem::take(&mut ps.res))
}

fn in_dialect(ps: &mut ProgramState, name: &str, arg: &Value, dialect: Dialect, full: bool) -> BuiltinResult {
    let block = block_arg(name, 1, arg)?;
    ps.eval_block_in_dialect(block, dialect, full);
    Ok(std::mem::take(&mut ps.res))
}

fn do_dialect(ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    let tag = word_arg("do\\dialect", 2, &args[1])?;
    let name = ps.word_name(tag).to_string();
    let Some(dialect) = Dialect::from_name(&name) else {
        return Err(RyeError::from_code(
            ErrorCode::UnknownDialect,
            format!("unknown dialect: {name}"),
        ));
    };
    in_dialect(ps, "do\\dialect", &args[0], dialect, false)
}

fn eyr_loop(ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    let times = int_arg("eyr\\loop", 1, &args[0])?;
    let block = block_arg("eyr\\loop", 2, &args[1])?;
    let saved_dialect = std::mem::replace(&mut ps.dialect, Dialect::Eyr);
    let fresh = EyrStack::new(ps.config.eyr_stack_size);
    let saved_stack = std::mem::replace(&mut ps.stack, fresh);
    let saved_ser = ps.ser.clone();
    for _ in 0..times.max(0) {
        ps.ser = block.series.rewound();
        ps.with_depth(|ps| ps.eyr_eval_block(false));
        if ps.error_flag || ps.failure_flag || ps.return_flag {
            break;
        }
    }
    ps.ser = saved_ser;
    ps.stack = saved_stack;
    ps.dialect = saved_dialect;
    Ok(std::mem::take(&mut ps.res))
}

fn to_eyr(ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    let block = block_arg("to-eyr", 1, &args[0])?;
    Ok(Value::block(ps.to_eyr(&block.series)?))
}

fn match_block(ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    let pattern = &args[1];
    block_arg("match-block", 2, pattern)?;
    match ps.match_pattern(&args[0], pattern) {
        MatchOutcome::Matched => Ok(args[0].clone()),
        MatchOutcome::Failed(err) => Err(err),
        MatchOutcome::Aborted => Err(take_error(ps)),
    }
}

fn match_cases(ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    let value = &args[0];
    let cases = block_arg("match", 2, &args[1])?.items();
    if cases.len() % 2 != 0 {
        ps.error_flag = true;
        return Err(RyeError::from_code(
            ErrorCode::MatchConfig,
            "match needs pattern and action pairs",
        ));
    }
    if cases.chunks(2).any(|pair| !matches!(pair[1], Value::Block(_))) {
        ps.error_flag = true;
        return Err(RyeError::from_code(
            ErrorCode::MatchConfig,
            "match actions must be blocks",
        ));
    }
    for pair in cases.chunks(2) {
        match ps.match_pattern(value, &pair[0]) {
            MatchOutcome::Matched => {
                if let Value::Block(action) = &pair[1] {
                    ps.run_block(action, Some(value));
                }
                return Ok(std::mem::take(&mut ps.res));
            }
            MatchOutcome::Failed(_) => continue,
            MatchOutcome::Aborted => return Err(take_error(ps)),
        }
    }
    Err(RyeError::from_code(
        ErrorCode::MatchFailed,
        "no pattern matched the value",
    ))
}

fn return_value(ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    ps.return_flag = true;
    Ok(args[0].clone())
}

fn defer(ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    let block = block_arg("defer", 1, &args[0])?;
    ps.defer(block.clone());
    Ok(Value::Void)
}

fn generic(ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    let kind = word_arg("generic", 1, &args[0])?;
    let word = word_arg("generic", 2, &args[1])?;
    let callable = callable_arg("generic", 3, &args[2])?;
    debug!(
        kind = ps.word_name(kind),
        word = ps.word_name(word),
        "registering generic method"
    );
    ps.generics.register(kind, word, callable.clone());
    Ok(callable.clone())
}
