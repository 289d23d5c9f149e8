//! Error codes for Rye diagnostics and runtime errors.

/// Error codes shared by the reader and the evaluator.
///
/// Reader codes end up in [`crate::Diagnostic`]s; evaluator codes become the
/// numeric status carried by runtime error values (see [`ErrorCode::status`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lexer errors (E0001 - E0099)
    UnexpectedCharacter,
    UnterminatedString,
    InvalidNumber,
    InvalidWord,

    // Loader errors (E0100 - E0199)
    UnexpectedDelimiter,
    UnclosedDelimiter,

    // Evaluation errors (E0300 - E0399)
    WordNotFound,
    WordAlreadySet,
    ConstantModified,
    ModTypeMismatch,
    ArgumentType,
    ArgumentMissing,
    MissingValue,
    MissingLeftValue,
    ExpressionGuard,
    NotCallable,
    DepthExceeded,
    StackUnderflow,
    StackOverflow,
    MatchFailed,
    MatchConfig,
    DivisionByZero,
    IntegerOverflow,
    UnknownDialect,
    UserFailure,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::UnexpectedCharacter => "E0001",
            ErrorCode::UnterminatedString => "E0002",
            ErrorCode::InvalidNumber => "E0003",
            ErrorCode::InvalidWord => "E0004",

            // Loader
            ErrorCode::UnexpectedDelimiter => "E0100",
            ErrorCode::UnclosedDelimiter => "E0101",

            // Eval
            ErrorCode::WordNotFound => "E0300",
            ErrorCode::WordAlreadySet => "E0301",
            ErrorCode::ConstantModified => "E0302",
            ErrorCode::ModTypeMismatch => "E0303",
            ErrorCode::ArgumentType => "E0304",
            ErrorCode::ArgumentMissing => "E0305",
            ErrorCode::MissingValue => "E0306",
            ErrorCode::MissingLeftValue => "E0307",
            ErrorCode::ExpressionGuard => "E0308",
            ErrorCode::NotCallable => "E0309",
            ErrorCode::DepthExceeded => "E0310",
            ErrorCode::StackUnderflow => "E0311",
            ErrorCode::StackOverflow => "E0312",
            ErrorCode::MatchFailed => "E0313",
            ErrorCode::MatchConfig => "E0314",
            ErrorCode::DivisionByZero => "E0315",
            ErrorCode::IntegerOverflow => "E0316",
            ErrorCode::UnknownDialect => "E0317",
            ErrorCode::UserFailure => "E0318",
        }
    }

    /// The numeric status runtime error values carry for this code.
    pub fn status(&self) -> i64 {
        self.as_str()[1..].parse().unwrap_or(0)
    }

    /// Get a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::UnexpectedCharacter => "unexpected character in input",
            ErrorCode::UnterminatedString => "string literal is not terminated",
            ErrorCode::InvalidNumber => "invalid number literal",
            ErrorCode::InvalidWord => "invalid word",

            // Loader
            ErrorCode::UnexpectedDelimiter => "unexpected closing delimiter",
            ErrorCode::UnclosedDelimiter => "unclosed delimiter",

            // Eval
            ErrorCode::WordNotFound => "word not found",
            ErrorCode::WordAlreadySet => "word is already set in this context",
            ErrorCode::ConstantModified => "cannot modify a constant",
            ErrorCode::ModTypeMismatch => "modification changes the type of a variable",
            ErrorCode::ArgumentType => "argument has the wrong type",
            ErrorCode::ArgumentMissing => "argument could not be evaluated",
            ErrorCode::MissingValue => "expected a value but the block ended",
            ErrorCode::MissingLeftValue => "op-word or set-word without a left value",
            ErrorCode::ExpressionGuard => "expression guard inside an expression",
            ErrorCode::NotCallable => "value is not callable",
            ErrorCode::DepthExceeded => "maximum evaluation depth exceeded",
            ErrorCode::StackUnderflow => "stack underflow",
            ErrorCode::StackOverflow => "stack overflow",
            ErrorCode::MatchFailed => "value does not match the pattern",
            ErrorCode::MatchConfig => "malformed match clauses",
            ErrorCode::DivisionByZero => "division by zero",
            ErrorCode::IntegerOverflow => "integer overflow",
            ErrorCode::UnknownDialect => "unknown dialect",
            ErrorCode::UserFailure => "failure raised by the program",
        }
    }

    /// Get a suggested fix for the error, if available.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ErrorCode::UnterminatedString => Some("add a closing quote `\"` to terminate the string"),
            ErrorCode::UnclosedDelimiter => Some("add the matching closing delimiter"),
            ErrorCode::WordAlreadySet => Some("use a mod-word (`x::`) to change an existing binding"),
            ErrorCode::ConstantModified => Some("declare the word with `var` before modifying it"),
            ErrorCode::WordNotFound => Some("check the spelling or define the word before use"),
            ErrorCode::DepthExceeded => Some("check for unbounded recursion"),
            _ => None,
        }
    }
}
