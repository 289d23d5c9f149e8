//! Console output builtins.
//! 控制台输出内置函数。
//!
//! These builtins are not pure, so pure functions cannot print.
//! 这些内置函数不是纯函数，纯函数无法打印。

use std::io::Write;

use rye_eval::{Builtin, Value};

/// Returns all io builtins.
/// 返回所有输入输出内置函数。
pub fn builtins() -> Vec<Builtin> {
    vec![
        Builtin::new("print", 1, |ps, args| {
            println!("{}", args[0].print(&ps.words));
            Ok(args[0].clone())
        })
        .doc("Prints a value followed by a newline and returns it."),
        Builtin::new("prns", 1, |ps, args| {
            print!("{} ", args[0].print(&ps.words));
            let _ = std::io::stdout().flush();
            Ok(args[0].clone())
        })
        .doc("Prints a value followed by a space and returns it."),
        Builtin::new("probe", 1, |ps, args| {
            println!("{}", args[0].inspect(&ps.words));
            Ok(args[0].clone())
        })
        .doc("Prints the inspected form of a value and returns it."),
        Builtin::new("inspect", 1, |ps, args| Ok(Value::string(args[0].inspect(&ps.words))))
            .doc("The inspected form of a value, with its type."),
    ]
}

#[cfg(test)]
mod tests {
    use crate::test_util::run;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_print_returns_value() {
        assert_eq!(run("print 123"), "123");
        assert_eq!(run("prns \"a\" |type?"), "string");
        assert_eq!(run("probe { 1 2 }"), "{ 1 2 }");
    }

    #[test]
    fn test_inspect_adds_type() {
        assert_eq!(run("inspect 5"), "[Integer: 5]");
        assert_eq!(run("inspect \"x\""), "[String: \"x\"]");
        assert_eq!(run("inspect { }"), "[Block: { }]");
    }
}
