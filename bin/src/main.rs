use std::{
    io::{stdin, stdout, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use cursor::Line;
use errors::{Diagnostic, Reporter};
use interpreter::InterpretError;

/// What to print for a successfully processed unit of work.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
enum Emit {
    /// The token sequence, one token per line
    Tokens,
    /// The syntax tree in prefix notation
    Ast,
    /// The value of the expression
    #[default]
    Value,
}

#[derive(clap::Parser)]
#[command(about = "Evaluates rlang expressions from a file or an interactive prompt")]
struct Args {
    file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t)]
    emit: Emit,
}

/// Prints diagnostics to stderr and remembers whether there were any.
#[derive(Debug, Default)]
struct ConsoleReporter {
    had_error: bool,
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, line: Line, at: &str, message: &str) {
        eprintln!("{}", Diagnostic::new(line, at, message));
        self.had_error = true;
    }
}

fn run(source: &str, emit: Emit, reporter: &mut ConsoleReporter) -> Result<(), InterpretError> {
    match emit {
        Emit::Tokens => {
            // Only a unit that also parses gets its tokens printed
            let tokens = interpreter::scan_source(source, reporter)?;
            interpreter::parse_tokens(tokens.clone(), reporter)?;
            for token in tokens {
                println!("{}", token.summary());
            }
        }
        Emit::Ast => println!("{}", interpreter::parse_source(source, reporter)?),
        Emit::Value => println!("{}", interpreter::run_source(source, reporter)?),
    }
    Ok(())
}

fn run_file(path: PathBuf, emit: Emit) -> anyhow::Result<ExitCode> {
    let source = std::fs::read_to_string(path)?;
    let mut reporter = ConsoleReporter::default();
    Ok(match run(&source, emit, &mut reporter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(InterpretError::CompileError(_)) => ExitCode::from(65),
        Err(InterpretError::RuntimeError(_)) => ExitCode::from(70),
    })
}

fn run_prompt(emit: Emit) -> anyhow::Result<ExitCode> {
    let mut reporter = ConsoleReporter::default();
    loop {
        print!("> ");
        stdout().flush()?;
        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 || line.trim() == "exit" {
            return Ok(ExitCode::SUCCESS);
        }

        // Every line is a unit of its own, errors have already been reported
        reporter.had_error = false;
        let result = run(&line, emit, &mut reporter);
        debug_assert_eq!(result.is_err(), reporter.had_error);
        if let Err(e) = result {
            log::debug!("Line failed: {:?}", e);
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    match args.file {
        Some(file) => run_file(file, args.emit),
        None => run_prompt(args.emit),
    }
}
