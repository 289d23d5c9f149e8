//! Terminal output for the CLI.
//! CLI 的终端输出。
//!
//! Values and confirmations go to stdout, reports to stderr.
//! 值与确认信息写到标准输出，报告写到标准错误。

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const RESET: &str = "\x1b[0m";

/// Wrap `text` in an ANSI color.
/// 用 ANSI 颜色包裹文本。
fn paint(color: &str, text: &str) -> String {
    format!("{color}{text}{RESET}")
}

/// A finished check, such as `rye check` finding nothing.
/// 成功完成的提示，例如 `rye check` 未发现问题。
pub fn success(msg: &str) {
    println!("{}", paint(GREEN, msg));
}

/// A runtime error report. Multi-line reports keep their layout.
/// 运行时错误报告，多行报告保持原有排版。
pub fn error(msg: &str) {
    eprintln!("{} {msg}", paint(RED, "error:"));
}

/// Extra detail shown with `--verbose`.
/// `--verbose` 时显示的额外信息。
pub fn info(msg: &str) {
    println!("{} {msg}", paint(BLUE, "info:"));
}
