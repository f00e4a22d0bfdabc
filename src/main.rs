use std::fs;
use std::path::PathBuf;

use calc_interpreter::system::{self, Response};
use calc_interpreter::{Config, Interpreter, Lexer, PowerMode, normalize};
use clap::Parser;
use clap::Subcommand;
use miette::IntoDiagnostic;
use miette::WrapErr;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
struct Args {
    /// How `^` is computed.
    #[arg(long, value_enum, global = true, default_value_t = PowerMode::Modular)]
    power: PowerMode,

    /// Print a full diagnostic for every failed line on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Read lines interactively (the default).
    Repl,
    /// Evaluate every line of a file.
    Run { filename: PathBuf },
    /// Print the tokens of a normalized expression.
    Tokenize { expression: String },
    /// Print the postfix form of an expression.
    Parse { expression: String },
}

fn main() -> miette::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = Config { power: args.power };

    match args.command.unwrap_or(Commands::Repl) {
        Commands::Repl => repl(Interpreter::new(config), args.verbose)?,
        Commands::Run { filename } => {
            let file_contents = fs::read_to_string(&filename)
                .into_diagnostic()
                .wrap_err_with(|| format!("reading `{}` failed", filename.display()))?;

            let mut interpreter = Interpreter::new(config);
            for line in file_contents.lines() {
                if !handle(&mut interpreter, line, args.verbose) {
                    break;
                }
            }
        }
        Commands::Tokenize { expression } => {
            for token in Lexer::new(&normalize(&expression)) {
                println!("{token}");
            }
        }
        Commands::Parse { expression } => {
            let normalized = normalize(&expression);
            match calc_interpreter::Parser::new(&normalized).to_postfix() {
                Ok(postfix) => println!("{postfix}"),
                Err(e) => {
                    eprintln!("{:?}", miette::Report::new(e));
                    std::process::exit(65);
                }
            }
        }
    }
    Ok(())
}

fn repl(mut interpreter: Interpreter, verbose: bool) -> miette::Result<()> {
    let mut editor = DefaultEditor::new()
        .into_diagnostic()
        .wrap_err("failed to create line editor")?;

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());
                if !handle(&mut interpreter, &line, verbose) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).into_diagnostic().wrap_err("reading input failed"),
        }
    }
    Ok(())
}

/// Prints the response to one line. Returns `false` once the user asked to exit.
fn handle(interpreter: &mut Interpreter, line: &str, verbose: bool) -> bool {
    match system::respond(interpreter, line) {
        Response::Silent => {}
        Response::Print(output) => println!("{output}"),
        Response::Failed(e) => {
            println!("{e}");
            if verbose {
                eprintln!("{:?}", miette::Report::new(e));
            }
        }
        Response::Exit(message) => {
            println!("{message}");
            return false;
        }
    }
    true
}
