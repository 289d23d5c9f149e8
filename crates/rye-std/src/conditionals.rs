//! Conditional builtins.
//! 条件内置函数。
//!
//! Blocks run in the current context with the tested value injected, so
//! `if x > 3 { .print }` prints the condition.
//! 代码块在当前上下文中运行，并注入被测试的值。

use rye_eval::args::{block_arg, bool_arg};
use rye_eval::{builtin_error, Builtin, BuiltinResult, ProgramState, Value};

use crate::take_result;

/// Returns all conditional builtins.
/// 返回所有条件内置函数。
pub fn builtins() -> Vec<Builtin> {
    vec![
        Builtin::new("if", 2, |ps, args| {
            let cond = bool_arg("if", 1, &args[0])?;
            let block = block_arg("if", 2, &args[1])?;
            if !cond {
                return Ok(Value::Boolean(false));
            }
            ps.run_block(block, Some(&args[0]));
            take_result(ps)
        })
        .doc("Runs a block if the condition is true, otherwise returns false."),
        Builtin::new("^if", 2, |ps, args| {
            let cond = bool_arg("^if", 1, &args[0])?;
            let block = block_arg("^if", 2, &args[1])?;
            if !cond {
                return Ok(Value::Boolean(false));
            }
            ps.run_block(block, Some(&args[0]));
            let res = take_result(ps)?;
            ps.return_flag = true;
            Ok(res)
        })
        .doc("Like `if`, and returns from the current function when the block runs."),
        Builtin::new("either", 3, either)
            .doc("Runs the second block if the condition is true, the third otherwise."),
        Builtin::new("when", 3, when)
            .doc("Runs an action on a value if a condition block accepts it, otherwise returns the value."),
        Builtin::new("with", 2, |ps, args| {
            let block = block_arg("with", 2, &args[1])?;
            ps.run_block(block, Some(&args[0]));
            take_result(ps)
        })
        .doc("Runs a block with a value injected."),
    ]
}

fn either(ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    let cond = bool_arg("either", 1, &args[0])?;
    let chosen = if cond { &args[1] } else { &args[2] };
    match (&args[1], &args[2]) {
        (Value::Block(_), Value::Block(_)) => {
            if let Value::Block(block) = chosen {
                ps.run_block(block, Some(&args[0]));
            }
            take_result(ps)
        }
        (Value::Block(_), _) | (_, Value::Block(_)) => Err(builtin_error(
            "either",
            "both branches must be blocks, or neither",
        )),
        _ => Ok(chosen.clone()),
    }
}

fn when(ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    let value = &args[0];
    let cond = block_arg("when", 2, &args[1])?;
    let action = block_arg("when", 3, &args[2])?;
    ps.run_block(cond, Some(value));
    let accepted = take_result(ps)?;
    if !accepted.is_truthy() {
        return Ok(value.clone());
    }
    ps.run_block(action, Some(value));
    take_result(ps)
}

#[cfg(test)]
mod tests {
    use crate::test_util::run;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_if() {
        assert_eq!(run("if true { 222 }"), "222");
        assert_eq!(run("if false { 333 }"), "false");
        assert_eq!(run("if 5 > 3 { \"yes\" }"), "yes");
        assert_eq!(run("if 5 > 3 { .not }"), "false");
        assert!(run("if 1 { 222 }").contains("requires argument 1 to be: boolean"));
    }

    #[test]
    fn test_caret_if_returns_from_function() {
        assert_eq!(run("x: does { ^if true { 222 } 555 } x"), "222");
        assert_eq!(run("x: does { ^if false { 333 } 444 } x"), "444");
    }

    #[test]
    fn test_either() {
        assert_eq!(run("either true { 222 } { 333 }"), "222");
        assert_eq!(run("either 1 > 2 { 222 } { 333 }"), "333");
        assert_eq!(run("either false 1 2"), "2");
        assert!(run("either 1 { 222 } { 333 }").contains("boolean"));
    }

    #[test]
    fn test_when() {
        assert_eq!(run("10 .when { > 5 } { + 3 }"), "13");
        assert_eq!(run("10 .when { < 5 } { + 3 }"), "10");
    }

    #[test]
    fn test_with_injects() {
        assert_eq!(run("with 5 { * 2 }"), "10");
    }
}
