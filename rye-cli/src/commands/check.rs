//! The `rye check` command.
//! `rye check` 命令。

use std::fs;

use rye_diagnostic::emit;

use super::Options;
use crate::output;

/// Load a file without evaluating it and report reader diagnostics.
/// 只加载文件而不求值，并报告读取器诊断。
pub fn run(file: &str, options: &Options) -> Result<(), String> {
    let source =
        fs::read_to_string(file).map_err(|e| format!("cannot read file '{}': {}", file, e))?;

    let mut words = rye_eval::new_word_index();
    let (block, diagnostics) = rye_loader::load(&source, &mut words);

    for diag in &diagnostics {
        emit(&source, file, diag);
    }

    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    if errors > 0 {
        output::error(&format!("{errors} syntax error(s) found"));
        return Err("syntax error".to_string());
    }

    if options.verbose {
        output::info(&format!("Loaded {} values, {} distinct words", block.len(), words.len()));
    }

    if !options.quiet {
        output::success("OK - No errors found");
    }
    Ok(())
}
