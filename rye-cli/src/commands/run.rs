//! The `rye run` command.
//! `rye run` 命令。

use std::fs;

use super::{Options, execute, print_result};

/// Evaluate a source file and print its final value.
/// 求值源文件并打印最终值。
pub fn run(file: &str, options: &Options) -> Result<(), String> {
    let source =
        fs::read_to_string(file).map_err(|e| format!("cannot read file '{}': {}", file, e))?;

    let mut evaluator = options.evaluator()?;
    let value = execute(&mut evaluator, &source, file, options.verbose)?;
    if !options.quiet {
        print_result(&evaluator, &value);
    }
    Ok(())
}
