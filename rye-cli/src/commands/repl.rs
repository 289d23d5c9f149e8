//! The `rye repl` command.
//! `rye repl` 命令。
//!
//! One evaluator lives for the whole session, so words set on one line are
//! visible on the next.
//! 整个会话共用一个求值器，前一行设置的词在后续行中可见。

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use rye_eval::Evaluator;

use super::{Options, execute, print_result};

pub fn run(options: &Options) -> Result<(), String> {
    println!("Rye REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type :help for help, :quit to exit");
    println!();

    let mut rl = DefaultEditor::new().map_err(|e| e.to_string())?;
    let mut evaluator = options.evaluator()?;

    loop {
        let readline = rl.readline("rye> ");
        match readline {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if line.starts_with(':') {
                    match line {
                        ":quit" | ":q" => break,
                        ":help" | ":h" => {
                            println!("Commands:");
                            println!("  :help, :h    Show this help");
                            println!("  :quit, :q    Exit the REPL");
                            println!("  :words       Show words set in this session");
                        }
                        ":words" => print_words(&evaluator),
                        _ => println!("Unknown command: {}", line),
                    }
                    continue;
                }

                // Errors were already reported; the session goes on.
                if let Ok(value) = execute(&mut evaluator, line, "<repl>", options.verbose) {
                    print_result(&evaluator, &value);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn print_words(evaluator: &Evaluator) {
    let state = evaluator.state();
    let mut words = state.ctx.words();
    if words.is_empty() {
        println!("(no words set)");
        return;
    }
    words.sort_unstable_by_key(|w| state.word_name(*w));
    for word in words {
        if let Some(value) = state.ctx.get_local(word) {
            println!("  {}: {}", state.word_name(word), value.inspect(&state.words));
        }
    }
}
