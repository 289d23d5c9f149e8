//! Arithmetic, comparison and logic builtins.
//! 算术、比较与逻辑内置函数。
//!
//! Two integers give an integer, checked for overflow. Any decimal
//! operand promotes the operation to decimals.
//! 两个整数得到整数并检查溢出；任何小数操作数都会把运算提升为小数。

use std::cmp::Ordering;

use rye_diagnostic::ErrorCode;
use rye_eval::args::number_arg;
use rye_eval::{arg_error, builtin_error, Builtin, BuiltinResult, RyeError, Value, ValueType};

use crate::items_arg;

/// Returns all math builtins.
/// 返回所有数学内置函数。
pub fn builtins() -> Vec<Builtin> {
    vec![
        // === Arithmetic / 算术 ===
        Builtin::new("add", 2, |_, args| add("add", &args[0], &args[1]))
            .pure()
            .doc("Adds two numbers, or joins two strings or two blocks."),
        Builtin::new("subtract", 2, |_, args| {
            arith("subtract", &args[0], &args[1], i64::checked_sub, |a, b| a - b)
        })
        .pure()
        .doc("Subtracts the second number from the first."),
        Builtin::new("multiply", 2, |_, args| {
            arith("multiply", &args[0], &args[1], i64::checked_mul, |a, b| a * b)
        })
        .pure()
        .doc("Multiplies two numbers."),
        Builtin::new("divide", 2, |_, args| divide("divide", &args[0], &args[1]))
            .pure()
            .doc("Divides two numbers, always giving a decimal."),
        Builtin::new("_+", 2, |_, args| add("_+", &args[0], &args[1])).pure(),
        Builtin::new("_-", 2, |_, args| {
            arith("_-", &args[0], &args[1], i64::checked_sub, |a, b| a - b)
        })
        .pure(),
        Builtin::new("_*", 2, |_, args| {
            arith("_*", &args[0], &args[1], i64::checked_mul, |a, b| a * b)
        })
        .pure(),
        Builtin::new("_/", 2, |_, args| divide("_/", &args[0], &args[1])).pure(),
        Builtin::new("_//", 2, |_, args| int_divide("_//", &args[0], &args[1]))
            .pure()
            .doc("Divides two numbers, truncating to an integer."),
        Builtin::new("inc", 1, |_, args| match &args[0] {
            Value::Integer(n) => n.checked_add(1).map(Value::Integer).ok_or_else(|| overflow("inc")),
            other => Err(arg_error("inc", 1, &[ValueType::Integer], other)),
        })
        .pure()
        .doc("Adds one to an integer."),
        Builtin::new("negate", 1, |_, args| match &args[0] {
            Value::Integer(n) => n.checked_neg().map(Value::Integer).ok_or_else(|| overflow("negate")),
            Value::Decimal(n) => Ok(Value::Decimal(-n)),
            other => Err(number_error("negate", 1, other)),
        })
        .pure(),
        Builtin::new("abs", 1, |_, args| match &args[0] {
            Value::Integer(n) => n.checked_abs().map(Value::Integer).ok_or_else(|| overflow("abs")),
            Value::Decimal(n) => Ok(Value::Decimal(n.abs())),
            other => Err(number_error("abs", 1, other)),
        })
        .pure(),
        // === Comparison / 比较 ===
        Builtin::new("equal", 2, |_, args| Ok(Value::Boolean(args[0] == args[1])))
            .pure()
            .doc("Tests two values for equality."),
        Builtin::new("_=", 2, |_, args| Ok(Value::Boolean(args[0] == args[1]))).pure(),
        Builtin::new("_!=", 2, |_, args| Ok(Value::Boolean(args[0] != args[1]))).pure(),
        Builtin::new("greater", 2, |_, args| {
            compare("greater", &args[0], &args[1]).map(|o| Value::Boolean(o == Ordering::Greater))
        })
        .pure(),
        Builtin::new("lesser", 2, |_, args| {
            compare("lesser", &args[0], &args[1]).map(|o| Value::Boolean(o == Ordering::Less))
        })
        .pure(),
        Builtin::new("_>", 2, |_, args| {
            compare("_>", &args[0], &args[1]).map(|o| Value::Boolean(o == Ordering::Greater))
        })
        .pure(),
        Builtin::new("_<", 2, |_, args| {
            compare("_<", &args[0], &args[1]).map(|o| Value::Boolean(o == Ordering::Less))
        })
        .pure(),
        Builtin::new("_>=", 2, |_, args| {
            compare("_>=", &args[0], &args[1]).map(|o| Value::Boolean(o != Ordering::Less))
        })
        .pure(),
        Builtin::new("_<=", 2, |_, args| {
            compare("_<=", &args[0], &args[1]).map(|o| Value::Boolean(o != Ordering::Greater))
        })
        .pure(),
        // === Logic / 逻辑 ===
        Builtin::new("not", 1, |_, args| Ok(Value::Boolean(!args[0].is_truthy())))
            .pure()
            .doc("Negates the truthiness of a value."),
        Builtin::new("and", 2, |_, args| {
            Ok(Value::Boolean(args[0].is_truthy() && args[1].is_truthy()))
        })
        .pure(),
        Builtin::new("or", 2, |_, args| {
            Ok(Value::Boolean(args[0].is_truthy() || args[1].is_truthy()))
        })
        .pure(),
        // === Aggregates / 聚合 ===
        Builtin::new("min", 1, |_, args| {
            extreme("min", &args[0], Ordering::Less)
        })
        .pure()
        .doc("The smallest number in a block."),
        Builtin::new("max", 1, |_, args| {
            extreme("max", &args[0], Ordering::Greater)
        })
        .pure()
        .doc("The largest number in a block."),
        Builtin::new("sum", 1, |_, args| sum(&args[0]))
            .pure()
            .doc("Adds up the numbers in a block."),
        Builtin::new("avg", 1, |_, args| avg(&args[0]))
            .pure()
            .doc("The mean of the numbers in a block, as a decimal."),
    ]
}

fn overflow(builtin: &str) -> RyeError {
    RyeError::from_code(ErrorCode::IntegerOverflow, format!("integer overflow ({builtin})"))
}

fn number_error(builtin: &str, pos: usize, got: &Value) -> RyeError {
    arg_error(builtin, pos, &[ValueType::Integer, ValueType::Decimal], got)
}

fn arith(
    name: &str,
    a: &Value,
    b: &Value,
    int: fn(i64, i64) -> Option<i64>,
    dec: fn(f64, f64) -> f64,
) -> BuiltinResult {
    if let (Value::Integer(x), Value::Integer(y)) = (a, b) {
        return int(*x, *y).map(Value::Integer).ok_or_else(|| overflow(name));
    }
    let x = number_arg(name, 1, a)?;
    let y = number_arg(name, 2, b)?;
    Ok(Value::Decimal(dec(x, y)))
}

fn add(name: &str, a: &Value, b: &Value) -> BuiltinResult {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Ok(Value::string(format!("{x}{y}"))),
        (Value::Block(x), Value::Block(y)) => {
            let mut items = x.items().to_vec();
            items.extend_from_slice(y.items());
            Ok(Value::block(items))
        }
        _ => arith(name, a, b, i64::checked_add, |x, y| x + y),
    }
}

fn divide(name: &str, a: &Value, b: &Value) -> BuiltinResult {
    let x = number_arg(name, 1, a)?;
    let y = number_arg(name, 2, b)?;
    if y == 0.0 {
        return Err(RyeError::from_code(
            ErrorCode::DivisionByZero,
            format!("can't divide by zero ({name})"),
        ));
    }
    Ok(Value::Decimal(x / y))
}

fn int_divide(name: &str, a: &Value, b: &Value) -> BuiltinResult {
    let zero = || {
        RyeError::from_code(
            ErrorCode::DivisionByZero,
            format!("can't divide by zero ({name})"),
        )
    };
    if let (Value::Integer(x), Value::Integer(y)) = (a, b) {
        if *y == 0 {
            return Err(zero());
        }
        return x.checked_div(*y).map(Value::Integer).ok_or_else(|| overflow(name));
    }
    let x = number_arg(name, 1, a)?;
    let y = number_arg(name, 2, b)?;
    if y == 0.0 {
        return Err(zero());
    }
    Ok(Value::Integer((x / y).trunc() as i64))
}

fn compare(name: &str, a: &Value, b: &Value) -> Result<Ordering, RyeError> {
    a.compare(b).ok_or_else(|| {
        builtin_error(
            name,
            format!(
                "can't compare {} with {}",
                a.value_type().name(),
                b.value_type().name()
            ),
        )
    })
}

/// The numbers of a block: integers if every element is one, decimals
/// otherwise.
enum Numbers {
    Integers(Vec<i64>),
    Decimals(Vec<f64>),
}

fn numbers(name: &str, value: &Value) -> Result<Numbers, RyeError> {
    let items = items_arg(name, 1, value)?;
    if items.is_empty() {
        return Err(builtin_error(name, "block is empty"));
    }
    let ints: Option<Vec<i64>> = items.iter().map(Value::as_integer).collect();
    if let Some(ints) = ints {
        return Ok(Numbers::Integers(ints));
    }
    items
        .iter()
        .map(|v| {
            v.as_decimal().ok_or_else(|| {
                builtin_error(
                    name,
                    format!("block contains a non-numeric {}", v.value_type().name()),
                )
            })
        })
        .collect::<Result<Vec<f64>, RyeError>>()
        .map(Numbers::Decimals)
}

fn extreme(name: &str, value: &Value, keep: Ordering) -> BuiltinResult {
    match numbers(name, value)? {
        Numbers::Integers(ints) => {
            let mut best = ints[0];
            for n in &ints[1..] {
                if n.cmp(&best) == keep {
                    best = *n;
                }
            }
            Ok(Value::Integer(best))
        }
        Numbers::Decimals(decs) => {
            let mut best = decs[0];
            for n in &decs[1..] {
                if n.total_cmp(&best) == keep {
                    best = *n;
                }
            }
            Ok(Value::Decimal(best))
        }
    }
}

fn sum(value: &Value) -> BuiltinResult {
    match numbers("sum", value)? {
        Numbers::Integers(ints) => ints
            .iter()
            .try_fold(0i64, |acc, n| acc.checked_add(*n))
            .map(Value::Integer)
            .ok_or_else(|| overflow("sum")),
        Numbers::Decimals(decs) => Ok(Value::Decimal(decs.iter().sum())),
    }
}

fn avg(value: &Value) -> BuiltinResult {
    let (total, count) = match numbers("avg", value)? {
        Numbers::Integers(ints) => (ints.iter().map(|n| *n as f64).sum::<f64>(), ints.len()),
        Numbers::Decimals(decs) => (decs.iter().sum::<f64>(), decs.len()),
    };
    Ok(Value::Decimal(total / count as f64))
}

#[cfg(test)]
mod tests {
    use crate::test_util::run;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(run("1 + 2 * 3"), "9");
        assert_eq!(run("add 1 2"), "3");
        assert_eq!(run("10 |subtract 3 |add 5"), "12");
        assert_eq!(run("7 // 2"), "3");
    }

    #[test]
    fn test_decimal_promotion() {
        assert_eq!(run("1 + 0.5"), "1.5");
        assert_eq!(run("6 / 3"), "2.0");
        assert_eq!(run("multiply 100 8.9"), "890.0");
    }

    #[test]
    fn test_division_by_zero_fails() {
        assert!(run("1 / 0").contains("can't divide by zero"));
        assert!(run("1 // 0").contains("can't divide by zero"));
    }

    #[test]
    fn test_overflow_is_reported() {
        assert!(run("9223372036854775807 + 1").contains("integer overflow"));
        assert!(run("inc 9223372036854775807").contains("integer overflow"));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(run("3 > 2"), "true");
        assert_eq!(run("2 >= 2.5"), "false");
        assert_eq!(run("\"a\" < \"b\""), "true");
        assert_eq!(run("1 = 1"), "true");
        assert_eq!(run("1 != 2"), "true");
        assert!(run("1 > \"a\"").contains("can't compare"));
    }

    #[test]
    fn test_logic() {
        assert_eq!(run("not false"), "true");
        assert_eq!(run("and true 1"), "true");
        assert_eq!(run("or false 0"), "false");
    }

    #[test]
    fn test_aggregates_keep_integers() {
        assert_eq!(run("min { 3 1 2 }"), "1");
        assert_eq!(run("max { 3 1 2 }"), "3");
        assert_eq!(run("sum { 1 2 3 }"), "6");
    }

    #[test]
    fn test_aggregates_promote_mixed_blocks() {
        assert_eq!(run("max { 1 2.5 2 }"), "2.5");
        assert_eq!(run("min { 1 2.5 }"), "1.0");
        assert_eq!(run("sum { 1 0.5 }"), "1.5");
        assert_eq!(run("avg { 1 2 }"), "1.5");
    }

    #[test]
    fn test_aggregates_reject_empty_and_non_numeric() {
        assert!(run("sum { }").contains("block is empty"));
        assert!(run("avg { 1 \"x\" }").contains("non-numeric string"));
    }
}
