//! Reader diagnostics.

use rye_common::Span;

use crate::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// The reader stage that found the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexer,
    Loader,
}

/// A secondary span, such as the bracket that opened a block.
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

/// A problem found while reading source text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub stage: Stage,
    /// Errors always carry a code; warnings never do.
    pub code: Option<ErrorCode>,
    pub message: String,
    pub span: Span,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

impl Diagnostic {
    /// An error with `code`. The code's suggestion, if any, is the help text.
    pub fn error(stage: Stage, code: ErrorCode, span: Span, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            stage,
            code: Some(code),
            message: message.into(),
            span,
            labels: Vec::new(),
            notes: Vec::new(),
            help: code.suggestion().map(str::to_owned),
        }
    }

    /// A warning. The reader keeps going as if nothing happened.
    pub fn warning(stage: Stage, span: Span, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            stage,
            code: None,
            message: message.into(),
            span,
            labels: Vec::new(),
            notes: Vec::new(),
            help: None,
        }
    }

    /// Label the primary span with the description of the error code.
    pub fn describe_span(mut self) -> Self {
        if let Some(code) = self.code {
            self.labels.push(Label {
                span: self.span,
                message: code.description().to_owned(),
            });
        }
        self
    }

    /// Point at the bracket that opened the block being reported.
    pub fn opened_at(mut self, open: Span, bracket: char) -> Self {
        self.labels.push(Label {
            span: open,
            message: format!("`{bracket}` opened here"),
        });
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
