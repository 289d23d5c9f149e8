//! Block, ref and series builtins.
//! 块、引用与序列内置函数。
//!
//! Operations without a `!` return new values. `sort!` and `append!`
//! change a ref in place, and every holder of the ref sees the change.
//! 不带 `!` 的操作返回新值；`sort!` 与 `append!` 原地修改引用。

use std::cmp::Ordering;

use rye_diagnostic::ErrorCode;
use rye_eval::args::{block_arg, int_arg, ref_arg};
use rye_eval::{
    arg_error, builtin_error, Block, BlockRef, Builtin, BuiltinResult, ModResult, ProgramState,
    RyeError, Value, ValueType,
};

use crate::items_arg;

/// Returns all collection builtins.
/// 返回所有集合内置函数。
pub fn builtins() -> Vec<Builtin> {
    vec![
        // === Access / 访问 ===
        Builtin::new("length?", 1, length).pure().doc("The number of elements."),
        Builtin::new("first", 1, |_, args| nth("first", &args[0], 1)).pure(),
        Builtin::new("last", 1, |_, args| {
            let len = count("last", &args[0])?;
            nth("last", &args[0], len as i64)
        })
        .pure(),
        Builtin::new("nth", 2, |_, args| {
            let index = int_arg("nth", 2, &args[1])?;
            nth("nth", &args[0], index)
        })
        .pure()
        .doc("The element at a 1-based index."),
        Builtin::new("rest", 1, rest).pure().doc("Everything but the first element."),
        // === Construction / 构造 ===
        Builtin::new("append", 2, append)
            .pure()
            .doc("A new block or string with the value added at the end."),
        Builtin::new("append!", 2, append_in_place)
            .doc("Adds a value to a ref, or to the block or string a tag-word names."),
        Builtin::new("range", 2, range)
            .pure()
            .doc("The integers from the first to the second, both included."),
        Builtin::new("reverse", 1, reverse).pure(),
        // === Ordering / 排序 ===
        Builtin::new("sort", 1, |_, args| {
            let mut items = items_arg("sort", 1, &args[0])?;
            items.sort_by(order);
            Ok(Value::block(items))
        })
        .pure()
        .doc("A sorted copy of a block or ref."),
        Builtin::new("sort!", 1, |_, args| {
            let r = ref_arg("sort!", 1, &args[0])?;
            r.with_series_mut(|s| s.items_mut().sort_by(order));
            Ok(args[0].clone())
        })
        .doc("Sorts a ref in place."),
        // === Refs / 引用 ===
        Builtin::new("ref", 1, |_, args| {
            let block = block_arg("ref", 1, &args[0])?;
            Ok(Value::Ref(BlockRef::new(block.series.rewound())))
        })
        .doc("A mutable, shared copy of a block."),
        Builtin::new("deref", 1, |_, args| {
            let r = ref_arg("deref", 1, &args[0])?;
            Ok(Value::Block(Block::from_series(r.snapshot().rewound())))
        })
        .doc("An immutable block with the current contents of a ref."),
        // === Cursor / 游标 ===
        Builtin::new("peek", 1, peek).doc("The element under the cursor."),
        Builtin::new("pop", 1, pop).doc("The element under the cursor; a ref's cursor advances."),
        Builtin::new("next", 1, next)
            .doc("Advances the cursor: a block is returned advanced, a ref is advanced in place."),
        Builtin::new("pos", 1, |_, args| match &args[0] {
            Value::Block(b) => Ok(Value::Integer(b.series.pos() as i64)),
            Value::Ref(r) => Ok(Value::Integer(r.with_series(|s| s.pos()) as i64)),
            other => Err(series_error("pos", other)),
        }),
        Builtin::new("vals\\with", 2, vals_with)
            .doc("Evaluates each expression of a block with a value injected, collecting the results."),
    ]
}

fn series_error(builtin: &str, got: &Value) -> RyeError {
    arg_error(builtin, 1, &[ValueType::Block, ValueType::Ref], got)
}

fn count(name: &str, value: &Value) -> Result<usize, RyeError> {
    match value {
        Value::Block(b) => Ok(b.len()),
        Value::Ref(r) => Ok(r.with_series(|s| s.len())),
        Value::String(s) => Ok(s.chars().count()),
        other => Err(arg_error(
            name,
            1,
            &[ValueType::Block, ValueType::Ref, ValueType::String],
            other,
        )),
    }
}

fn length(_ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    match &args[0] {
        Value::Context(ctx) => Ok(Value::Integer(ctx.len() as i64)),
        other => count("length?", other).map(|n| Value::Integer(n as i64)),
    }
}

fn nth(name: &str, value: &Value, index: i64) -> BuiltinResult {
    let out_of_range = || {
        builtin_error(name, format!("index {index} is out of range"))
    };
    if index < 1 {
        return Err(out_of_range());
    }
    let i = (index - 1) as usize;
    match value {
        Value::String(s) => s
            .chars()
            .nth(i)
            .map(|c| Value::string(c.to_string()))
            .ok_or_else(out_of_range),
        other => items_arg(name, 1, other)?
            .get(i)
            .cloned()
            .ok_or_else(out_of_range),
    }
}

fn rest(_ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    match &args[0] {
        Value::String(s) => Ok(Value::string(s.chars().skip(1).collect::<String>())),
        other => {
            let items = items_arg("rest", 1, other)?;
            Ok(Value::block(items.into_iter().skip(1).collect()))
        }
    }
}

fn append(ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    match (&args[0], &args[1]) {
        (Value::Block(b), value) => {
            let mut items = b.items().to_vec();
            items.push(value.clone());
            Ok(Value::block(items))
        }
        (Value::String(s), value) => Ok(Value::string(format!("{s}{}", value.print(&ps.words)))),
        (other, _) => Err(arg_error(
            "append",
            1,
            &[ValueType::Block, ValueType::String],
            other,
        )),
    }
}

fn append_in_place(ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    let value = &args[0];
    match &args[1] {
        Value::Ref(r) => {
            r.with_series_mut(|s| s.items_mut().push(value.clone()));
            Ok(args[1].clone())
        }
        Value::Tagword(word) | Value::Word(word) => {
            let Some((current, owner)) = ps.ctx.get_with_owner(*word) else {
                return Err(RyeError::from_code(
                    ErrorCode::WordNotFound,
                    format!("word not found: {}", ps.word_name(*word)),
                ));
            };
            let updated = match &current {
                Value::String(s) => Value::string(format!("{s}{}", value.print(&ps.words))),
                Value::Block(b) => {
                    let mut items = b.items().to_vec();
                    items.push(value.clone());
                    Value::block(items)
                }
                Value::Ref(r) => {
                    r.with_series_mut(|s| s.items_mut().push(value.clone()));
                    return Ok(current.clone());
                }
                other => {
                    return Err(builtin_error(
                        "append!",
                        format!("can't append to a {}", other.value_type().name()),
                    ));
                }
            };
            match owner.modify(*word, updated.clone()) {
                ModResult::Modified | ModResult::Created => Ok(updated),
                _ => Err(RyeError::from_code(
                    ErrorCode::ConstantModified,
                    format!(
                        "Cannot modify constant {}, use var to declare it",
                        ps.word_name(*word)
                    ),
                )),
            }
        }
        other => Err(arg_error(
            "append!",
            2,
            &[ValueType::Ref, ValueType::Tagword],
            other,
        )),
    }
}

/// Largest number of elements `range` will build.
pub const MAX_RANGE_LEN: i128 = 10_000_000;

fn range(_ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    let from = int_arg("range", 1, &args[0])?;
    let to = int_arg("range", 2, &args[1])?;
    let len = (i128::from(to) - i128::from(from)).abs() + 1;
    if len > MAX_RANGE_LEN {
        return Err(builtin_error(
            "range",
            format!("a range of {len} elements exceeds the limit of {MAX_RANGE_LEN}"),
        ));
    }
    let items: Vec<Value> = if from <= to {
        (from..=to).map(Value::Integer).collect()
    } else {
        (to..=from).rev().map(Value::Integer).collect()
    };
    Ok(Value::block(items))
}

fn reverse(_ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    match &args[0] {
        Value::String(s) => Ok(Value::string(s.chars().rev().collect::<String>())),
        other => {
            let mut items = items_arg("reverse", 1, other)?;
            items.reverse();
            Ok(Value::block(items))
        }
    }
}

/// Total order for sorting: numbers numerically, strings and booleans by
/// value, anything else by type.
fn order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Boolean(x), Value::Boolean(y)) => x.cmp(y),
        (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        _ => match (a.as_decimal(), b.as_decimal()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => rank(a).cmp(&rank(b)),
        },
    }
}

fn rank(value: &Value) -> usize {
    match value {
        Value::Integer(_) | Value::Decimal(_) => 0,
        other => other.value_type() as usize,
    }
}

fn peek(_ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    let current = match &args[0] {
        Value::Block(b) => b.series.peek().cloned(),
        Value::Ref(r) => r.with_series(|s| s.peek().cloned()),
        other => return Err(series_error("peek", other)),
    };
    current.ok_or_else(|| builtin_error("peek", "past end"))
}

fn pop(_ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    let current = match &args[0] {
        Value::Block(b) => b.series.peek().cloned(),
        Value::Ref(r) => r.with_series_mut(|s| s.pop()),
        other => return Err(series_error("pop", other)),
    };
    current.ok_or_else(|| builtin_error("pop", "past end"))
}

fn next(_ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    match &args[0] {
        Value::Block(b) => {
            let mut advanced = b.clone();
            advanced.series.next();
            Ok(Value::Block(advanced))
        }
        Value::Ref(r) => {
            r.with_series_mut(|s| s.next());
            Ok(args[0].clone())
        }
        other => Err(series_error("next", other)),
    }
}

/// Evaluate each comma-separated expression of the block with the value
/// injected, keeping every result.
fn vals_with(ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    let inj = &args[0];
    let block = block_arg("vals\\with", 2, &args[1])?;
    let mut results = Vec::new();
    for expression in block.items().split(|v| matches!(v, Value::Comma)) {
        if expression.is_empty() {
            continue;
        }
        ps.run_block(&Block::new(expression.to_vec()), Some(inj));
        if ps.error_flag || ps.failure_flag {
            return crate::take_result(ps);
        }
        results.push(std::mem::take(&mut ps.res));
    }
    Ok(Value::block(results))
}

#[cfg(test)]
mod tests {
    use crate::test_util::run;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_access() {
        assert_eq!(run("length? { 1 2 3 }"), "3");
        assert_eq!(run("length? \"abc\""), "3");
        assert_eq!(run("first { 7 8 }"), "7");
        assert_eq!(run("last { 7 8 }"), "8");
        assert_eq!(run("nth { 10 20 30 } 2"), "20");
        assert_eq!(run("nth \"abcde\" 3"), "c");
        assert_eq!(run("rest { 1 2 3 4 }"), "{ 2 3 4 }");
        assert_eq!(run("rest { 1 }"), "{ }");
    }

    #[test]
    fn test_out_of_range_fails() {
        assert!(run("first { }").contains("out of range"));
        assert!(run("nth { 1 } 0").contains("out of range"));
    }

    #[test]
    fn test_huge_range_fails() {
        assert_eq!(run("range 0 100000000000 |failed?"), "true");
        assert_eq!(run("range 100000000000 0 |failed?"), "true");
        assert!(run("range 0 100000000000 |disarm |message?").contains("exceeds the limit"));
    }

    #[test]
    fn test_append_and_range() {
        assert_eq!(run("append { 1 2 } 3"), "{ 1 2 3 }");
        assert_eq!(run("append \"ab\" \"c\""), "abc");
        assert_eq!(run("range 1 5"), "{ 1 2 3 4 5 }");
        assert_eq!(run("range -2 2"), "{ -2 -1 0 1 2 }");
        assert_eq!(run("range 3 1"), "{ 3 2 1 }");
        assert_eq!(run("reverse { 1 2 3 }"), "{ 3 2 1 }");
    }

    #[test]
    fn test_sort_leaves_block_alone() {
        assert_eq!(run("x: { 6 12 1 } , sort x"), "{ 1 6 12 }");
        assert_eq!(run("x: { 6 12 1 } , sort x , x"), "{ 6 12 1 }");
    }

    #[test]
    fn test_sort_in_place_needs_a_ref() {
        assert_eq!(run("x: ref { 6 12 1 } , sort! x , deref x"), "{ 1 6 12 }");
        assert!(run("x: { 6 12 1 } , sort! x").contains("requires argument 1 to be: ref"));
    }

    #[test]
    fn test_sort_mixed_numbers() {
        assert_eq!(run("sort { 2 1.5 1 }"), "{ 1 1.5 2 }");
    }

    #[test]
    fn test_append_in_place() {
        assert_eq!(run("x: ref { 1 2 3 } , append! 4 x , deref x"), "{ 1 2 3 4 }");
        assert_eq!(run("var 's \"hello\" , append! \" world\" 's , s"), "hello world");
        assert!(run("s: \"hello\" , append! \"!\" 's").contains("Cannot modify constant s"));
    }

    #[test]
    fn test_cursor() {
        assert_eq!(run("x: { 1 2 3 } , peek x"), "1");
        assert_eq!(run("x: { 1 2 3 } , pos next x"), "1");
        assert_eq!(run("x: ref { 1 2 3 } , next x , pos x"), "1");
        assert_eq!(run("x: ref { 1 2 3 } , pop x , pop x"), "2");
    }

    #[test]
    fn test_vals_with() {
        assert_eq!(run("x: 1 y: 2 vals\\with 10 { + x , * y }"), "{ 11 20 }");
        assert_eq!(run("vals\\with 100 { + 10 , * 8.9 }"), "{ 110 890.0 }");
    }
}
