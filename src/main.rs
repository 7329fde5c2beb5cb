// ABOUTME: CLI entry point — batch script runner and the interactive REPL

mod builtins;
mod config;
mod env;
mod error;
mod eval;
mod heap;
mod interp;
mod printer;
mod reader;
mod symbols;
mod value;

use clap::Parser;
use error::LispError;
use interp::Interpreter;
use reader::{BufferSource, CharSource};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use value::Value;

const HISTORY_FILE: &str = ".minilisp_history";

#[derive(Parser, Debug)]
#[command(name = "minilisp")]
#[command(version = config::VERSION)]
#[command(about = "A minimal LISP interpreter with a root-tracked garbage collector")]
struct Cli {
    /// Script file to run; starts an interactive REPL if omitted
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Heap byte budget before a collection is triggered
    #[arg(long = "heap-bytes", value_name = "BYTES")]
    heap_bytes: Option<usize>,

    /// Report bytes reclaimed after every collection
    #[arg(long = "heap-trace")]
    heap_trace: bool,
}

fn main() {
    let cli = Cli::parse();
    let byte_budget = cli.heap_bytes.unwrap_or_else(config::default_heap_bytes);
    let mut interp = Interpreter::with_heap(heap::Heap::with_capacity(byte_budget));

    let result = match &cli.script {
        Some(path) => run_script(&mut interp, path, cli.heap_trace),
        None => run_repl(&mut interp, cli.heap_trace),
    };

    if let Err(e) = result {
        if let Some(lisp_err) = e.downcast_ref::<LispError>() {
            if lisp_err.is_internal() {
                eprintln!("internal error: {lisp_err}");
            } else {
                eprintln!("error: {lisp_err}");
            }
        } else {
            eprintln!("error: {e}");
        }
        std::process::exit(1);
    }
}

fn run_script(interp: &mut Interpreter, path: &PathBuf, heap_trace: bool) -> Result<(), Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let mut source = BufferSource::new(&contents);
    drive(interp, &mut source, heap_trace, false)?;
    Ok(())
}

fn run_repl(interp: &mut Interpreter, heap_trace: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut rl = DefaultEditor::new()?;
    let _ = rl.load_history(HISTORY_FILE);

    println!("{}", config::WELCOME_MESSAGE);
    println!("{}", config::WELCOME_SUBTITLE);

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { "lisp> " } else { "....> " };
        match rl.readline(prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                buffer.push_str(&line);
                buffer.push('\n');
                if paren_balance(&buffer) > 0 {
                    continue;
                }
                let mut source = BufferSource::new(&buffer);
                drive(interp, &mut source, heap_trace, true)?;
                buffer.clear();
            }
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(Box::new(e)),
        }
    }

    let _ = rl.save_history(HISTORY_FILE);
    Ok(())
}

/// Read every complete top-level expression from `source`, evaluate each in
/// the root environment, and (per §6's REPL contract) print its result
/// followed by a newline when `print_results` is set. A stray `)` or `.`
/// at top level is fatal, matching the rest of this driver's single point
/// of error-to-diagnostic conversion.
fn drive(interp: &mut Interpreter, source: &mut dyn CharSource, heap_trace: bool, print_results: bool) -> Result<(), LispError> {
    loop {
        let collections_before = interp.heap.collections_run();
        match reader::read_expression(&interp.heap, &interp.symbols, source)? {
            None => return Ok(()),
            Some(Value::CloseParen) => return Err(LispError::StrayCloseParen),
            Some(Value::Dot) => return Err(LispError::StrayDot),
            Some(form) => {
                let env = interp.root_env;
                let result = eval::eval(interp, env, form)?;
                if heap_trace && interp.heap.collections_run() > collections_before {
                    eprintln!(
                        "[gc] collection #{} reclaimed {} bytes",
                        interp.heap.collections_run(),
                        interp.heap.last_reclaimed()
                    );
                }
                if print_results {
                    println!("{}", printer::format_value(&interp.heap, result));
                }
            }
        }
    }
}

/// Count of unclosed parentheses, ignoring `;` comments — used by the REPL
/// to decide whether to prompt for a continuation line rather than parse a
/// truncated expression.
fn paren_balance(text: &str) -> i32 {
    let mut depth = 0;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            ';' => {
                for c2 in chars.by_ref() {
                    if c2 == '\n' {
                        break;
                    }
                }
            }
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
    }
    depth
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paren_balance_waits_for_closing_paren() {
        assert_eq!(paren_balance("(add 1"), 1);
        assert_eq!(paren_balance("(add 1 2)"), 0);
    }

    #[test]
    fn paren_balance_ignores_comments() {
        assert_eq!(paren_balance("; (looks unclosed\n(add 1 2)"), 0);
    }
}
