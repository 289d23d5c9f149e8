//! String builtins.
//! 字符串内置函数。

use rye_eval::args::str_arg;
use rye_eval::{arg_error, Builtin, BuiltinResult, ProgramState, Value, ValueType};

use crate::items_arg;

/// Returns all string builtins.
/// 返回所有字符串内置函数。
pub fn builtins() -> Vec<Builtin> {
    vec![
        Builtin::new("join", 1, |ps, args| {
            let items = items_arg("join", 1, &args[0])?;
            Ok(Value::string(joined(ps, &items, "")))
        })
        .pure()
        .doc("Joins the printed form of every element."),
        Builtin::new("join\\with", 2, |ps, args| {
            let items = items_arg("join\\with", 1, &args[0])?;
            let sep = str_arg("join\\with", 2, &args[1])?;
            Ok(Value::string(joined(ps, &items, sep)))
        })
        .pure()
        .doc("Joins the printed form of every element with a separator."),
        Builtin::new("concat", 2, concat)
            .pure()
            .doc("Concatenates two strings, or two blocks, or a block and a value."),
        Builtin::new("split", 2, |_, args| {
            let s = str_arg("split", 1, &args[0])?;
            let sep = str_arg("split", 2, &args[1])?;
            let parts: Vec<Value> = if sep.is_empty() {
                s.chars().map(|c| Value::string(c.to_string())).collect()
            } else {
                s.split(sep).map(Value::string).collect()
            };
            Ok(Value::block(parts))
        })
        .pure(),
        Builtin::new("to-upper", 1, |_, args| {
            Ok(Value::string(str_arg("to-upper", 1, &args[0])?.to_uppercase()))
        })
        .pure(),
        Builtin::new("to-lower", 1, |_, args| {
            Ok(Value::string(str_arg("to-lower", 1, &args[0])?.to_lowercase()))
        })
        .pure(),
        Builtin::new("trim", 1, |_, args| {
            Ok(Value::string(str_arg("trim", 1, &args[0])?.trim()))
        })
        .pure(),
        Builtin::new("contains", 2, contains)
            .pure()
            .doc("Tests whether a string contains a substring or a block contains a value."),
    ]
}

fn joined(ps: &ProgramState, items: &[Value], sep: &str) -> String {
    items
        .iter()
        .map(|v| v.print(&ps.words))
        .collect::<Vec<_>>()
        .join(sep)
}

fn concat(ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    match (&args[0], &args[1]) {
        (Value::Block(a), Value::Block(b)) => {
            let mut items = a.items().to_vec();
            items.extend_from_slice(b.items());
            Ok(Value::block(items))
        }
        (Value::Block(a), value) => {
            let mut items = a.items().to_vec();
            items.push(value.clone());
            Ok(Value::block(items))
        }
        (Value::String(a), b) => Ok(Value::string(format!("{a}{}", b.print(&ps.words)))),
        (a, Value::String(b)) => Ok(Value::string(format!("{}{b}", a.print(&ps.words)))),
        (other, _) => Err(arg_error(
            "concat",
            1,
            &[ValueType::String, ValueType::Block],
            other,
        )),
    }
}

fn contains(_ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    match (&args[0], &args[1]) {
        (Value::String(s), Value::String(sub)) => Ok(Value::Boolean(s.contains(&**sub))),
        (Value::String(_), other) => Err(arg_error("contains", 2, &[ValueType::String], other)),
        (collection, value) => {
            let items = items_arg("contains", 1, collection)?;
            Ok(Value::Boolean(items.contains(value)))
        }
    }
}
