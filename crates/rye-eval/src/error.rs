//! Error values and host-facing evaluation errors.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use rye_diagnostic::ErrorCode;
use thiserror::Error;

use crate::context::Context;
use crate::series::Series;
use crate::value::{Value, ValueType};

/// Where an error first crossed a block boundary.
#[derive(Clone)]
pub struct ErrorLocation {
    pub block: Series,
    pub context: Context,
}

/// The payload of an error value.
#[derive(Clone)]
pub struct RyeError {
    pub status: i64,
    pub message: String,
    pub parent: Option<Rc<RyeError>>,
    /// Named details attached by the raising code.
    pub details: Vec<(String, Value)>,
    location: OnceCell<ErrorLocation>,
}

impl RyeError {
    pub fn new(status: i64, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            parent: None,
            details: Vec::new(),
            location: OnceCell::new(),
        }
    }

    pub fn from_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code.status(), message)
    }

    pub fn with_parent(mut self, parent: Rc<RyeError>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_detail(mut self, name: impl Into<String>, value: Value) -> Self {
        self.details.push((name.into(), value));
        self
    }

    pub fn location(&self) -> Option<&ErrorLocation> {
        self.location.get()
    }

    /// Record the location unless one is already recorded. Returns whether
    /// this call stored it.
    pub fn attach_location(&self, block: Series, context: Context) -> bool {
        self.location.set(ErrorLocation { block, context }).is_ok()
    }

    /// Iterate this error and its parents, innermost cause last.
    pub fn chain(&self) -> impl Iterator<Item = &RyeError> {
        std::iter::successors(Some(self), |e| e.parent.as_deref())
    }
}

impl fmt::Debug for RyeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RyeError")
            .field("status", &self.status)
            .field("message", &self.message)
            .field("parent", &self.parent)
            .field("located", &self.location.get().is_some())
            .finish()
    }
}

impl fmt::Display for RyeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(parent) = &self.parent {
            write!(f, ": {parent}")?;
        }
        Ok(())
    }
}

/// An argument of the wrong type.
pub fn arg_error(builtin: &str, position: usize, expected: &[ValueType], got: &Value) -> RyeError {
    let names: Vec<&str> = expected.iter().map(|t| t.name()).collect();
    RyeError::from_code(
        ErrorCode::ArgumentType,
        format!(
            "builtin `{builtin}` requires argument {position} to be: {}, got {}",
            names.join(", "),
            got.value_type().name()
        ),
    )
}

/// A builtin-specific failure.
pub fn builtin_error(builtin: &str, message: impl fmt::Display) -> RyeError {
    RyeError::from_code(ErrorCode::UserFailure, format!("{message} ({builtin})"))
}

/// Errors reported to code embedding the evaluator.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The error flag was raised.
    #[error("{message}")]
    Raised {
        status: i64,
        message: String,
        /// The rendered report, including the code location if known.
        report: String,
    },

    /// Evaluation ended with a failure that nothing promoted or handled.
    #[error("unhandled failure: {message}")]
    Failure { status: i64, message: String },

    /// The source could not be loaded.
    #[error("{0} syntax error(s)")]
    Syntax(usize),
}

impl EvalError {
    pub fn message(&self) -> String {
        match self {
            EvalError::Raised { message, .. } | EvalError::Failure { message, .. } => {
                message.clone()
            }
            EvalError::Syntax(n) => format!("{n} syntax error(s)"),
        }
    }
}
