//! Diagnostic and error reporting for Rye.
//! Rye 的诊断和错误报告。
//!
//! Reader diagnostics are rendered with ariadne; the same error codes give
//! runtime error values their numeric status.
//! 读取器诊断通过 ariadne 渲染；同一套错误码也为运行时错误值提供数字状态。

mod codes;
mod diagnostic;

pub use codes::ErrorCode;
pub use diagnostic::{Diagnostic, Label, Severity, Stage};

use ariadne::{ColorGenerator, Label as AriadneLabel, Report, ReportKind, Source};

/// Render a diagnostic to stderr.
/// 将诊断信息渲染到标准错误输出。
pub fn emit(source: &str, filename: &str, diagnostic: &Diagnostic) {
    let kind = match diagnostic.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
    };

    let mut colors = ColorGenerator::new();
    let mut report = Report::build(kind, filename, diagnostic.span.start as usize)
        .with_message(&diagnostic.message);

    if let Some(code) = &diagnostic.code {
        report = report.with_code(code.as_str());
    }

    if diagnostic.labels.is_empty() {
        report = report.with_label(
            AriadneLabel::new((filename, diagnostic.span.range()))
                .with_message(&diagnostic.message)
                .with_color(colors.next()),
        );
    }

    for label in &diagnostic.labels {
        let color = colors.next();
        let ariadne_label = AriadneLabel::new((filename, label.span.range()))
            .with_message(&label.message)
            .with_color(color);
        report = report.with_label(ariadne_label);
    }

    for note in &diagnostic.notes {
        report = report.with_note(note);
    }

    if let Some(help) = &diagnostic.help {
        report = report.with_help(help);
    }

    if let Err(e) = report
        .finish()
        .eprint((filename, Source::from(source)))
    {
        eprintln!("{filename}: {} ({e})", diagnostic.message);
    }
}
