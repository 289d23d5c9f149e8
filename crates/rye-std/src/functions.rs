//! Function constructors.
//! 函数构造内置函数。
//!
//! A plain `fn` runs in a child of the caller's context. The other
//! constructors fix the parent context when the function is created.
//! 普通 `fn` 在调用者上下文的子上下文中运行；其他构造函数在创建时固定父上下文。

use std::rc::Rc;

use rye_common::Symbol;
use rye_eval::args::{block_arg, callable_arg, context_arg, word_arg};
use rye_eval::{
    arg_error, Block, Builtin, BuiltinResult, Function, ProgramState, RyeError, Value,
    ValueType,
};

use crate::{items_arg, take_result};

/// Returns all function builtins.
/// 返回所有函数内置函数。
pub fn builtins() -> Vec<Builtin> {
    vec![
        Builtin::new("fn", 2, |_, args| {
            let func = function("fn", &args[0], &args[1])?;
            Ok(Value::Function(Rc::new(func)))
        })
        .doc("Creates a function from a block of parameter words and a body."),
        Builtin::new("fn1", 1, |ps, args| {
            let body = block_arg("fn1", 1, &args[0])?;
            let anonymous = ps.intern("_");
            Ok(Value::Function(Rc::new(Function::new(
                vec![anonymous],
                body.clone(),
            ))))
        })
        .doc("Creates a function of one anonymous argument, injected into the body."),
        Builtin::new("pfn", 2, |_, args| {
            let mut func = function("pfn", &args[0], &args[1])?;
            func.pure = true;
            Ok(Value::Function(Rc::new(func)))
        })
        .doc("Creates a pure function, which only sees pure builtins."),
        Builtin::new("does", 1, |_, args| {
            let body = block_arg("does", 1, &args[0])?;
            Ok(Value::Function(Rc::new(Function::new(Vec::new(), body.clone()))))
        })
        .doc("Creates a function without arguments."),
        Builtin::new("closure", 2, |ps, args| {
            let mut func = function("closure", &args[0], &args[1])?;
            func.ctx = Some(ps.ctx.clone());
            Ok(Value::Function(Rc::new(func)))
        })
        .doc("Creates a function that runs in a child of the context it was created in."),
        Builtin::new("fn\\cc", 2, |ps, args| {
            let mut func = function("fn\\cc", &args[0], &args[1])?;
            func.ctx = Some(ps.ctx.clone());
            Ok(Value::Function(Rc::new(func)))
        })
        .doc("Creates a function whose parent is the current context."),
        Builtin::new("fn\\in", 3, |_, args| {
            let ctx = context_arg("fn\\in", 2, &args[1])?;
            let mut func = function("fn\\in", &args[0], &args[2])?;
            func.ctx = Some(ctx.clone());
            Ok(Value::Function(Rc::new(func)))
        })
        .doc("Creates a function whose parent is the given context."),
        Builtin::new("fn\\inside", 3, |_, args| {
            let ctx = context_arg("fn\\inside", 2, &args[1])?;
            let mut func = function("fn\\inside", &args[0], &args[2])?;
            func.ctx = Some(ctx.clone());
            func.in_ctx = true;
            Ok(Value::Function(Rc::new(func)))
        })
        .doc("Creates a function that runs directly inside the given context."),
        Builtin::new("var", 2, |ps, args| {
            let word = word_arg("var", 1, &args[0])?;
            ps.ctx.set_variable(word, args[1].clone());
            Ok(args[1].clone())
        })
        .doc("Binds a word as a variable, which mod-words may change."),
        Builtin::new("apply", 2, apply).doc("Calls a builtin or function with a block of arguments."),
    ]
}

/// A function from a parameter block and a body block. A string in the
/// parameter block becomes the doc string.
fn function(name: &str, spec: &Value, body: &Value) -> Result<Function, RyeError> {
    let spec = block_arg(name, 1, spec)?;
    let body = block_arg(name, 2, body)?;
    let mut params: Vec<Symbol> = Vec::new();
    let mut doc = String::new();
    for item in spec.items() {
        match item {
            Value::Word(w) => params.push(*w),
            Value::String(s) => doc = s.to_string(),
            other => return Err(arg_error(name, 1, &[ValueType::Word], other)),
        }
    }
    let mut func = Function::new(params, Block::from_series(body.series.rewound()));
    func.doc = doc;
    Ok(func)
}

fn apply(ps: &mut ProgramState, args: &[Value]) -> BuiltinResult {
    let callable = callable_arg("apply", 1, &args[0])?;
    let values = items_arg("apply", 2, &args[1])?;
    ps.call_value_with_args(callable, &values);
    take_result(ps)
}

#[cfg(test)]
mod tests {
    use crate::test_util::run;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fn_binds_parameters() {
        assert_eq!(run("x: fn { } { 234 } , x"), "234");
        assert_eq!(run("x: fn { a b } { a - b } , x 10 3"), "7");
        assert_eq!(run("x: fn { x } { + 123 } , x 123"), "246");
        assert_eq!(run("fn { } { } |type?"), "function");
    }

    #[test]
    fn test_fn1_and_does() {
        assert_eq!(run("x: fn1 { + 1 } , x 123"), "124");
        assert_eq!(run("x: does { 1 + 2 } x"), "3");
    }

    #[test]
    fn test_pfn_sees_only_pure_builtins() {
        assert_eq!(run("x: pfn { a } { a + 1 } , x 1"), "2");
        assert!(run("x: pfn { a } { print a } , x 1").contains("word not found: print"));
    }

    #[test]
    fn test_closures_share_state() {
        assert_eq!(
            run("mk: does { var 'c 0 , closure { } { c:: c + 1 } } cnt: mk , cnt + cnt + cnt"),
            "6"
        );
    }

    #[test]
    fn test_fn_cc_sees_defining_context() {
        assert_eq!(run("y: 5 , f: fn\\cc { x } { x + y } , f 3"), "8");
    }

    #[test]
    fn test_fn_in_and_inside() {
        assert_eq!(run("c: context { y: 5 } , f: fn\\in { x } c { x + y } , f 3"), "8");
        assert_eq!(
            run("c: context { var 'n 1 } , f: fn\\inside { x } c { n:: n + x } , f 4 , c/n"),
            "5"
        );
    }

    #[test]
    fn test_var_allows_modification() {
        assert_eq!(run("var 'x 10 x:: 20 x"), "20");
        assert!(run("x: 10 x:: 20").contains("Cannot modify constant x"));
    }

    #[test]
    fn test_apply() {
        assert_eq!(run("apply ?_+ { 12 23 }"), "35");
        assert_eq!(run("apply fn { x y } { x + y } { 5 10 }"), "15");
    }
}
