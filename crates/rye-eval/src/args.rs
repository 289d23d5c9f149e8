//! Argument accessors for builtins.
//!
//! Each returns an argument-type error naming the builtin and the 1-based
//! argument position when the value has the wrong type.

use rye_common::Symbol;

use crate::context::Context;
use crate::error::{arg_error, RyeError};
use crate::value::{Block, BlockRef, Value, ValueType};

pub fn block_arg<'a>(builtin: &str, pos: usize, value: &'a Value) -> Result<&'a Block, RyeError> {
    match value {
        Value::Block(block) => Ok(block),
        other => Err(arg_error(builtin, pos, &[ValueType::Block], other)),
    }
}

pub fn ref_arg<'a>(builtin: &str, pos: usize, value: &'a Value) -> Result<&'a BlockRef, RyeError> {
    match value {
        Value::Ref(r) => Ok(r),
        other => Err(arg_error(builtin, pos, &[ValueType::Ref], other)),
    }
}

pub fn int_arg(builtin: &str, pos: usize, value: &Value) -> Result<i64, RyeError> {
    match value {
        Value::Integer(n) => Ok(*n),
        other => Err(arg_error(builtin, pos, &[ValueType::Integer], other)),
    }
}

/// An integer or a decimal, as a decimal.
pub fn number_arg(builtin: &str, pos: usize, value: &Value) -> Result<f64, RyeError> {
    value
        .as_decimal()
        .ok_or_else(|| arg_error(builtin, pos, &[ValueType::Integer, ValueType::Decimal], value))
}

pub fn str_arg<'a>(builtin: &str, pos: usize, value: &'a Value) -> Result<&'a str, RyeError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(arg_error(builtin, pos, &[ValueType::String], other)),
    }
}

pub fn bool_arg(builtin: &str, pos: usize, value: &Value) -> Result<bool, RyeError> {
    match value {
        Value::Boolean(b) => Ok(*b),
        other => Err(arg_error(builtin, pos, &[ValueType::Boolean], other)),
    }
}

/// Any word form, usually a tag-word such as `'name`.
pub fn word_arg(builtin: &str, pos: usize, value: &Value) -> Result<Symbol, RyeError> {
    value
        .as_word()
        .ok_or_else(|| arg_error(builtin, pos, &[ValueType::Word, ValueType::Tagword], value))
}

pub fn context_arg<'a>(builtin: &str, pos: usize, value: &'a Value) -> Result<&'a Context, RyeError> {
    match value {
        Value::Context(ctx) => Ok(ctx),
        other => Err(arg_error(builtin, pos, &[ValueType::Context], other)),
    }
}

/// A builtin or a function.
pub fn callable_arg<'a>(builtin: &str, pos: usize, value: &'a Value) -> Result<&'a Value, RyeError> {
    match value {
        Value::Builtin(_) | Value::Function(_) => Ok(value),
        other => Err(arg_error(
            builtin,
            pos,
            &[ValueType::Builtin, ValueType::Function],
            other,
        )),
    }
}
