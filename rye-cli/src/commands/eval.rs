//! The `rye eval` command.
//! `rye eval` 命令。

use super::{Options, execute, print_result};

/// Evaluate an expression given on the command line and print its value.
/// 求值命令行给出的表达式并打印其值。
pub fn run(expr: &str, options: &Options) -> Result<(), String> {
    let mut evaluator = options.evaluator()?;
    let value = execute(&mut evaluator, expr, "<eval>", options.verbose)?;
    if !options.quiet {
        print_result(&evaluator, &value);
    }
    Ok(())
}
