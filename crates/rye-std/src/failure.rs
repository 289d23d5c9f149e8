//! Failure builtins.
//! 失败处理内置函数。
//!
//! `fail` raises a failure that the next step promotes to an error unless
//! something accepts it. The combinators (`check`, `fix`, `disarm`,
//! `failed?`) accept failures and clear the failure flag.
//! `fail` 产生一个失败；若无人接收，下一步会把它提升为错误。

use std::rc::Rc;

use rye_eval::args::block_arg;
use rye_eval::{arg_error, Builtin, BuiltinResult, ProgramState, RyeError, Value, ValueType};

use crate::take_result;

/// Returns all failure builtins.
/// 返回所有失败处理内置函数。
pub fn builtins() -> Vec<Builtin> {
    vec![
        // === Raising / 产生 ===
        Builtin::new("fail", 1, |_, args| Err(make_error("fail", &args[0], None)?))
            .doc("Raises a failure from a message, a status or a block of both."),
        Builtin::new("^fail", 1, |ps, args| {
            let err = make_error("^fail", &args[0], None)?;
            ps.return_flag = true;
            Err(err)
        })
        .doc("Raises a failure and returns from the current function."),
        Builtin::new("failure", 1, |_, args| {
            Ok(Value::error(make_error("failure", &args[0], None)?))
        })
        .doc("Creates an error value without raising it."),
        Builtin::new("failure\\wrap", 2, |_, args| {
            let cause = error_arg("failure\\wrap", 2, &args[1])?;
            Ok(Value::error(make_error(
                "failure\\wrap",
                &args[0],
                Some(cause.clone()),
            )?))
        })
        .doc("Creates an error value caused by another one."),
        // === Accepting / 接收 ===
        Builtin::new("disarm", 1, |ps, args| {
            ps.failure_flag = false;
            Ok(args[0].clone())
        })
        .accept_failure()
        .doc("Clears the failure flag, keeping the error as a plain value."),
        Builtin::new("failed?", 1, |ps, args| {
            ps.failure_flag = false;
            Ok(Value::Boolean(matches!(args[0], Value::Error(_))))
        })
        .accept_failure()
        .doc("Tests whether a value is an error, clearing the failure flag."),
        Builtin::new("check", 2, |ps, args| check(ps, args, "check", false))
            .accept_failure()
            .doc("Wraps a failure in a new error, or returns the value unchanged."),
        Builtin::new("^check", 2, |ps, args| check(ps, args, "^check", true))
            .accept_failure()
            .doc("Like `check`, returning from the current function on failure."),
        Builtin::new("fix", 2, |ps, args| fix(ps, args, "fix", false))
            .accept_failure()
            .doc("Runs a block with the error injected on failure, or returns the value unchanged."),
        Builtin::new("^fix", 2, |ps, args| fix(ps, args, "^fix", true))
            .accept_failure()
            .doc("Like `fix`, returning the block's result from the current function."),
        Builtin::new("try", 1, |ps, args| {
            let block = block_arg("try", 1, &args[0])?;
            ps.run_block(block, None);
            ps.error_flag = false;
            ps.failure_flag = false;
            ps.return_flag = false;
            Ok(std::mem::take(&mut ps.res))
        })
        .doc("Runs a block, turning an error into its result."),
        // === Inspecting / 检查 ===
        Builtin::new("status?", 1, |_, args| {
            Ok(Value::Integer(error_arg("status?", 1, &args[0])?.status))
        }),
        Builtin::new("message?", 1, |_, args| {
            Ok(Value::string(error_arg("message?", 1, &args[0])?.message.as_str()))
        }),
        Builtin::new("cause?", 1, |_, args| {
            let err = error_arg("cause?", 1, &args[0])?;
            let root = err.chain().last().cloned().unwrap_or_else(|| RyeError::clone(err));
            Ok(Value::error(root))
        })
        .doc("The innermost error of a chain."),
    ]
}

fn error_arg<'a>(
    builtin: &str,
    pos: usize,
    value: &'a Value,
) -> Result<&'a Rc<RyeError>, RyeError> {
    match value {
        Value::Error(err) => Ok(err),
        other => Err(arg_error(builtin, pos, &[ValueType::Error], other)),
    }
}

/// Build an error from a message, a status, or a block holding either or
/// both.
fn make_error(
    builtin: &str,
    info: &Value,
    parent: Option<Rc<RyeError>>,
) -> Result<RyeError, RyeError> {
    let mut status = 0;
    let mut message = String::new();
    match info {
        Value::String(s) => message = s.to_string(),
        Value::Integer(n) => status = *n,
        Value::Block(block) => {
            for item in block.items() {
                match item {
                    Value::String(s) => message = s.to_string(),
                    Value::Integer(n) => status = *n,
                    other => {
                        return Err(arg_error(
                            builtin,
                            1,
                            &[ValueType::String, ValueType::Integer],
                            other,
                        ));
                    }
                }
            }
        }
        Value::Error(err) => return Ok(RyeError::clone(err)),
        other => {
            return Err(arg_error(
                builtin,
                1,
                &[ValueType::String, ValueType::Integer, ValueType::Block],
                other,
            ));
        }
    }
    let err = RyeError::new(status, message);
    Ok(match parent {
        Some(parent) => err.with_parent(parent),
        None => err,
    })
}

fn failing(ps: &ProgramState, value: &Value) -> bool {
    ps.failure_flag || matches!(value, Value::Error(_))
}

fn check(ps: &mut ProgramState, args: &[Value], name: &str, returns: bool) -> BuiltinResult {
    if !failing(ps, &args[0]) {
        return Ok(args[0].clone());
    }
    ps.failure_flag = false;
    let cause = match &args[0] {
        Value::Error(err) => Some(err.clone()),
        _ => None,
    };
    let err = make_error(name, &args[1], cause)?;
    if returns {
        ps.return_flag = true;
    }
    Err(err)
}

fn fix(ps: &mut ProgramState, args: &[Value], name: &str, returns: bool) -> BuiltinResult {
    if !failing(ps, &args[0]) {
        return Ok(args[0].clone());
    }
    ps.failure_flag = false;
    let block = block_arg(name, 2, &args[1])?;
    ps.run_block(block, Some(&args[0]));
    let res = take_result(ps)?;
    if returns {
        ps.return_flag = true;
    }
    Ok(res)
}
