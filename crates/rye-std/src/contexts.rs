//! Context builtins.
//! 上下文内置函数。
//!
//! `context` evaluates a block in a fresh child of the current context and
//! returns that context. Its words are reached with paths such as `c/x`.
//! `context` 在当前上下文的新子上下文中求值代码块，并返回该上下文。

use rye_eval::args::{block_arg, context_arg, word_arg};
use rye_eval::{
    builtin_error, Block, Builtin, BuiltinResult, Context, ProgramState, RyeError, Value,
};

use crate::take_result;

/// Returns all context builtins.
/// 返回所有上下文内置函数。
pub fn builtins() -> Vec<Builtin> {
    vec![
        Builtin::new("context", 1, |ps, args| {
            let block = block_arg("context", 1, &args[0])?;
            let ctx = build(ps, block)?;
            Ok(Value::Context(ctx))
        })
        .doc("Evaluates a block in a new context and returns the context."),
        Builtin::new("context\\kind", 2, |ps, args| {
            let kind = word_arg("context\\kind", 1, &args[0])?;
            let block = block_arg("context\\kind", 2, &args[1])?;
            let ctx = build(ps, block)?;
            ctx.set_kind(Some(kind));
            Ok(Value::Context(ctx))
        })
        .doc("Like `context`, tagging the context with a kind for generic dispatch."),
        Builtin::new("isolate", 1, |ps, args| {
            let block = block_arg("isolate", 1, &args[0])?;
            let ctx = build(ps, block)?;
            ctx.set_isolated(true);
            Ok(Value::Context(ctx))
        })
        .doc("Like `context`, without generic dispatch while the context is current."),
        Builtin::new("current", 0, |ps, _| Ok(Value::Context(ps.ctx.clone())))
            .doc("The current context."),
        Builtin::new("parent?", 1, |_, args| {
            let ctx = context_arg("parent?", 1, &args[0])?;
            ctx.parent()
                .map(|parent| Value::Context(parent.clone()))
                .ok_or_else(|| builtin_error("parent?", "context has no parent"))
        }),
        Builtin::new("do\\in", 2, |ps, args| {
            let ctx = context_arg("do\\in", 1, &args[0])?;
            let block = block_arg("do\\in", 2, &args[1])?;
            ps.run_block_in(block, ctx.clone(), None);
            take_result(ps)
        })
        .doc("Evaluates a block inside a context."),
        Builtin::new("kind?", 1, |_, args| Ok(Value::Word(args[0].kind())))
            .pure()
            .doc("The dispatch kind of a value."),
    ]
}

fn build(ps: &mut ProgramState, block: &Block) -> Result<Context, RyeError> {
    let ctx = ps.ctx.child();
    ps.run_block_in(block, ctx.clone(), None);
    take_result(ps)?;
    Ok(ctx)
}
