//! Type inspection and conversion builtins.
//! 类型检查与转换内置函数。

use rye_eval::{arg_error, builtin_error, Builtin, BuiltinResult, ProgramState, Value, ValueType};

/// Returns all type builtins.
/// 返回所有类型内置函数。
pub fn builtins() -> Vec<Builtin> {
    vec![
        Builtin::new("type?", 1, |_, args| Ok(Value::Word(args[0].value_type().symbol())))
            .pure()
            .doc("The type word of a value."),
        Builtin::new("to-integer", 1, to_integer)
            .pure()
            .doc("Converts a string or decimal to an integer, truncating decimals."),
        Builtin::new("to-decimal", 1, to_decimal).pure(),
        Builtin::new("to-string", 1, |ps, args| {
            Ok(Value::string(args[0].print(&ps.words)))
        })
        .pure()
        .doc("The printed form of a value."),
        Builtin::new("is-integer", 1, |_, args| is(&args[0], ValueType::Integer)).pure(),
        Builtin::new("is-decimal", 1, |_, args| is(&args[0], ValueType::Decimal)).pure(),
        Builtin::new("is-string", 1, |_, args| is(&args[0], ValueType::String)).pure(),
        Builtin::new("is-block", 1, |_, args| is(&args[0], ValueType::Block)).pure(),
    ]
}

fn is(value: &Value, ty: ValueType) -> BuiltinResult {
    Ok(Value::Boolean(value.value_type() == ty))
}

fn to_integer(_ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    match &args[0] {
        Value::Integer(n) => Ok(Value::Integer(*n)),
        Value::Decimal(d) if d.is_finite() => Ok(Value::Integer(d.trunc() as i64)),
        Value::Decimal(d) => Err(builtin_error("to-integer", format!("can't convert {d} to an integer"))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| builtin_error("to-integer", format!("can't parse \"{s}\" as an integer"))),
        other => Err(arg_error(
            "to-integer",
            1,
            &[ValueType::String, ValueType::Decimal, ValueType::Integer],
            other,
        )),
    }
}

fn to_decimal(_ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    match &args[0] {
        Value::Decimal(d) => Ok(Value::Decimal(*d)),
        Value::Integer(n) => Ok(Value::Decimal(*n as f64)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Decimal)
            .map_err(|_| builtin_error("to-decimal", format!("can't parse \"{s}\" as a decimal"))),
        other => Err(arg_error(
            "to-decimal",
            1,
            &[ValueType::String, ValueType::Integer, ValueType::Decimal],
            other,
        )),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_util::run;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_type_words() {
        assert_eq!(run("type? 1"), "integer");
        assert_eq!(run("type? 1.5"), "decimal");
        assert_eq!(run("type? \"a\""), "string");
        assert_eq!(run("type? { }"), "block");
        assert_eq!(run("type? ?add"), "builtin");
    }

    #[test]
    fn test_to_integer() {
        assert_eq!(run("to-integer \"123\""), "123");
        assert_eq!(run("to-integer 12.9"), "12");
        assert_eq!(run("to-integer -3.7"), "-3");
        assert!(run("to-integer \"abc\"").contains("can't parse \"abc\" as an integer"));
        assert!(run("to-integer { }").contains("requires argument 1"));
    }

    #[test]
    fn test_to_decimal_and_string() {
        assert_eq!(run("to-decimal 3"), "3.0");
        assert_eq!(run("to-decimal \"2.5\""), "2.5");
        assert_eq!(run("to-string 42"), "42");
        assert_eq!(run("to-string { 1 2 } |type?"), "string");
    }

    #[test]
    fn test_predicates() {
        assert_eq!(run("is-integer 1"), "true");
        assert_eq!(run("is-integer 1.0"), "false");
        assert_eq!(run("is-decimal 1.0"), "true");
        assert_eq!(run("is-string \"x\""), "true");
        assert_eq!(run("is-block { }"), "true");
        assert_eq!(run("is-block \"x\""), "false");
    }
}
