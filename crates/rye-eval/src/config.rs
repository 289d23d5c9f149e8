//! Evaluator configuration.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::dialect::Dialect;

/// Evaluator configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EvalConfig {
    /// Maximum nesting of blocks and function calls.
    pub max_depth: usize,
    /// Capacity of the Eyr value stack.
    pub eyr_stack_size: usize,
    /// Dialect used for top-level evaluation.
    pub dialect: Dialect,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_depth: 10_000,
            eyr_stack_size: 1000,
            dialect: Dialect::Rye,
        }
    }
}

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl EvalConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum evaluation depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the Eyr stack capacity.
    pub fn eyr_stack_size(mut self, size: usize) -> Self {
        self.eyr_stack_size = size;
        self
    }

    /// Set the top-level dialect.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Parse a JSON configuration. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EvalConfig::from_json(r#"{ "max-depth": 64, "dialect": "eyr" }"#).unwrap();
        assert_eq!(config.max_depth, 64);
        assert_eq!(config.dialect, Dialect::Eyr);
        assert_eq!(config.eyr_stack_size, 1000);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(matches!(
            EvalConfig::from_json(r#"{ "depth": 1 }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_builder() {
        let config = EvalConfig::new().max_depth(5).eyr_stack_size(8).dialect(Dialect::Rye0);
        assert_eq!(
            config,
            EvalConfig {
                max_depth: 5,
                eyr_stack_size: 8,
                dialect: Dialect::Rye0
            }
        );
    }
}
