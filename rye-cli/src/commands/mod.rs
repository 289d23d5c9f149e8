//! CLI command implementations.
//! CLI 命令实现。

pub mod check;
pub mod eval;
pub mod repl;
pub mod run;

use std::path::PathBuf;

use rye_diagnostic::emit;
use rye_eval::{Dialect, EvalConfig, EvalError, Evaluator, Value};
use tracing::debug;

use crate::output;

/// Global options shared by every command.
/// 所有命令共享的全局选项。
pub struct Options {
    pub verbose: bool,
    pub quiet: bool,
    pub config: Option<PathBuf>,
    pub dialect: Option<String>,
}

impl Options {
    /// The evaluator configuration: the config file if given, then the
    /// `--dialect` override.
    /// 求值器配置：先读配置文件，再应用 `--dialect`。
    pub fn eval_config(&self) -> Result<EvalConfig, String> {
        let mut config = match &self.config {
            Some(path) => EvalConfig::load(path).map_err(|e| format!("{}: {e}", path.display()))?,
            None => EvalConfig::default(),
        };
        if let Some(name) = &self.dialect {
            let dialect =
                Dialect::from_name(name).ok_or_else(|| format!("unknown dialect '{name}'"))?;
            config = config.dialect(dialect);
        }
        Ok(config)
    }

    /// An evaluator with the standard builtins registered.
    /// 注册了标准内置函数的求值器。
    pub fn evaluator(&self) -> Result<Evaluator, String> {
        let config = self.eval_config()?;
        if self.verbose {
            output::info(&format!(
                "dialect {}, max depth {}, eyr stack {}",
                config.dialect, config.max_depth, config.eyr_stack_size
            ));
        }
        let mut evaluator = Evaluator::with_config(config);
        evaluator.register(rye_std::stdlib());
        Ok(evaluator)
    }
}

/// Load and evaluate `source`, rendering diagnostics and runtime errors.
/// 加载并求值源码，渲染诊断信息与运行时错误。
pub fn execute(
    evaluator: &mut Evaluator,
    source: &str,
    filename: &str,
    verbose: bool,
) -> Result<Value, String> {
    let (block, diagnostics) = rye_loader::load(source, evaluator.words_mut());

    for diag in &diagnostics {
        emit(source, filename, diag);
    }

    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    if errors > 0 {
        return Err(EvalError::Syntax(errors).to_string());
    }

    debug!(file = filename, values = block.len(), "loaded source");
    if verbose {
        output::info(&format!("Loaded {} values", block.len()));
    }

    evaluator.eval(&block).map_err(|e| {
        match &e {
            EvalError::Raised { report, .. } if !report.is_empty() => eprintln!("{report}"),
            other => output::error(&other.to_string()),
        }
        "evaluation error".to_string()
    })
}

/// Print a result unless it is void.
/// 打印非空结果。
pub fn print_result(evaluator: &Evaluator, value: &Value) {
    if !value.is_void() {
        println!("{}", value.print(evaluator.words()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn options() -> Options {
        Options {
            verbose: false,
            quiet: true,
            config: None,
            dialect: None,
        }
    }

    #[test]
    fn test_execute_keeps_definitions() {
        let mut ev = options().evaluator().unwrap();
        execute(&mut ev, "x: 40", "<test>", false).unwrap();
        let value = execute(&mut ev, "x + 2", "<test>", false).unwrap();
        assert_eq!(value, Value::Integer(42));
    }

    #[test]
    fn test_execute_reports_errors() {
        let mut ev = options().evaluator().unwrap();
        assert_eq!(execute(&mut ev, "{ 1 2", "<test>", false).unwrap_err(), "1 syntax error(s)");
        assert_eq!(execute(&mut ev, "missing", "<test>", false).unwrap_err(), "evaluation error");
    }

    #[test]
    fn test_dialect_override() {
        let mut opts = options();
        opts.dialect = Some("eyr".to_string());
        let mut ev = opts.evaluator().unwrap();
        assert_eq!(execute(&mut ev, "1 2 add", "<test>", false).unwrap(), Value::Integer(3));

        opts.dialect = Some("lisp".to_string());
        assert_eq!(opts.eval_config().unwrap_err(), "unknown dialect 'lisp'");
    }

    #[test]
    fn test_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max-depth": 50, "dialect": "rye0" }}"#).unwrap();
        let mut opts = options();
        opts.config = Some(file.path().to_path_buf());
        let config = opts.eval_config().unwrap();
        assert_eq!(config.max_depth, 50);
        assert_eq!(config.dialect, Dialect::Rye0);

        opts.dialect = Some("eyr".to_string());
        assert_eq!(opts.eval_config().unwrap().dialect, Dialect::Eyr);
    }
}
