//! Looping builtins.
//! 循环内置函数。
//!
//! Each pass runs the body in the current context with the element (or the
//! counter) injected. An error, a failure or a return stops the loop.
//! 每次迭代在当前上下文中运行循环体并注入元素；错误、失败或返回会终止循环。

use rye_eval::args::{block_arg, int_arg, word_arg};
use rye_eval::{
    arg_error, builtin_error, Builtin, BuiltinResult, ProgramState, RyeError, Value, ValueType,
};

use crate::{halted, take_result};

/// Returns all iteration builtins.
/// 返回所有迭代内置函数。
pub fn builtins() -> Vec<Builtin> {
    vec![
        Builtin::new("loop", 2, |ps, args| {
            let times = int_arg("loop", 1, &args[0])?;
            let body = block_arg("loop", 2, &args[1])?;
            ps.res = Value::Void;
            for i in 1..=times {
                ps.run_block(body, Some(&Value::Integer(i)));
                if halted(ps) {
                    break;
                }
            }
            take_result(ps)
        })
        .doc("Runs a block n times, injecting the 1-based counter."),
        Builtin::new("for", 2, |ps, args| {
            let items = elements("for", &args[0])?;
            let body = block_arg("for", 2, &args[1])?;
            ps.res = Value::Void;
            for item in &items {
                ps.run_block(body, Some(item));
                if halted(ps) {
                    break;
                }
            }
            take_result(ps)
        })
        .doc("Runs a block for each element, injecting it."),
        Builtin::new("map", 2, |ps, args| {
            let items = elements("map", &args[0])?;
            let body = block_arg("map", 2, &args[1])?;
            let mut out = Vec::with_capacity(items.len());
            for item in &items {
                ps.run_block(body, Some(item));
                if halted(ps) {
                    return take_result(ps);
                }
                out.push(std::mem::take(&mut ps.res));
            }
            Ok(Value::block(out))
        })
        .doc("Collects the result of a block for each element."),
        Builtin::new("filter", 2, |ps, args| {
            let items = elements("filter", &args[0])?;
            let body = block_arg("filter", 2, &args[1])?;
            let mut out = Vec::new();
            for item in items {
                ps.run_block(body, Some(&item));
                if halted(ps) {
                    return take_result(ps);
                }
                if std::mem::take(&mut ps.res).is_truthy() {
                    out.push(item);
                }
            }
            Ok(Value::block(out))
        })
        .doc("Keeps the elements for which a block returns a truthy value."),
        Builtin::new("reduce", 3, reduce)
            .doc("Folds a block: the accumulator word starts as the first element."),
    ]
}

/// The elements of a block or ref, or the characters of a string.
fn elements(name: &str, value: &Value) -> Result<Vec<Value>, RyeError> {
    match value {
        Value::Block(b) => Ok(b.items().to_vec()),
        Value::Ref(r) => Ok(r.with_series(|s| s.items().to_vec())),
        Value::String(s) => Ok(s.chars().map(|c| Value::string(c.to_string())).collect()),
        other => Err(arg_error(
            name,
            1,
            &[ValueType::Block, ValueType::Ref, ValueType::String],
            other,
        )),
    }
}

fn reduce(ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    let items = elements("reduce", &args[0])?;
    let acc_word = word_arg("reduce", 2, &args[1])?;
    let body = block_arg("reduce", 3, &args[2])?;
    let Some((first, rest)) = items.split_first() else {
        return Err(builtin_error("reduce", "block is empty"));
    };
    let mut acc = first.clone();
    for item in rest {
        ps.ctx.bind(acc_word, acc);
        ps.run_block(body, Some(item));
        if halted(ps) {
            return take_result(ps);
        }
        acc = std::mem::take(&mut ps.res);
    }
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use crate::test_util::run;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_loop_injects_counter() {
        assert_eq!(run("loop 3 { + 10 }"), "13");
        assert_eq!(run("var 'n 0 , loop 4 { n:: n + 1 } , n"), "4");
    }

    #[test]
    fn test_for_each() {
        assert_eq!(run("var 's 0 , for { 1 2 3 } { ::x , s:: s + x } , s"), "6");
        assert_eq!(run("var 'out \"\" , for \"abc\" { ::c , out:: concat c out } , out"), "cba");
    }

    #[test]
    fn test_map_and_filter() {
        assert_eq!(run("map { 1 2 3 } { * 2 }"), "{ 2 4 6 }");
        assert_eq!(run("filter { 1 5 2 7 } { > 3 }"), "{ 5 7 }");
    }

    #[test]
    fn test_reduce() {
        assert_eq!(run("reduce { 1 2 3 } 'acc { + acc }"), "6");
        assert!(run("reduce { } 'acc { + acc }").contains("block is empty"));
    }

    #[test]
    fn test_error_stops_loop() {
        assert!(run("map { 1 0 2 } { ::d 10 / d }").contains("can't divide by zero"));
        assert!(run("for { 1 \"a\" } { + 1 }").contains("requires argument 1"));
    }

    #[test]
    fn test_return_leaves_function() {
        assert_eq!(run("f: does { for { 1 2 3 } { ::x , ^if x > 1 { x } } 99 } f"), "2");
    }
}
