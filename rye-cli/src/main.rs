//! Rye CLI - The Rye language command line interface.
//! Rye CLI - Rye 语言的命令行界面。

mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::Options;

/// Main CLI structure.
/// 主 CLI 结构体。
#[derive(Parser)]
#[command(name = "rye")]
#[command(author, version, about = "Rye - A homoiconic language of blocks, words and contexts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output. / 启用详细输出。
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress output. / 抑制输出。
    #[arg(short, long, global = true)]
    quiet: bool,

    /// JSON evaluator configuration file. / JSON 求值器配置文件。
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Top-level dialect (rye, rye0, eyr). / 顶层方言（rye、rye0、eyr）。
    #[arg(long, global = true)]
    dialect: Option<String>,
}

/// Available CLI commands.
/// 可用的 CLI 命令。
#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression. / 求值表达式。
    Eval {
        /// The expression to evaluate. / 要求值的表达式。
        expr: String,
    },

    /// Run a Rye file. / 运行 Rye 文件。
    Run {
        /// The file to run. / 要运行的文件。
        file: String,
    },

    /// Check a file for syntax errors. / 检查文件的语法错误。
    Check {
        /// The file to check. / 要检查的文件。
        file: String,
    },

    /// Start an interactive REPL. / 启动交互式 REPL。
    Repl,
}

/// Install the log subscriber. `RYE_LOG` takes the usual filter syntax;
/// without it only warnings are shown, or debug events with `--verbose`.
/// 安装日志订阅器。
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("RYE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Main entry point.
/// 主入口点。
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = Options {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config: cli.config,
        dialect: cli.dialect,
    };

    let result = match cli.command {
        Commands::Eval { expr } => commands::eval::run(&expr, &options),
        Commands::Run { file } => commands::run::run(&file, &options),
        Commands::Check { file } => commands::check::run(&file, &options),
        Commands::Repl => commands::repl::run(&options),
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("error: {}", e);
        }
        std::process::exit(1);
    }
}
