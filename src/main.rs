//! ceval command line interface

use ceval::interpreter::constants::{DEFAULT_ENTRY_POINT, DEFAULT_MAX_CALL_DEPTH};
use ceval::parser::lexer::Lexer;
use ceval::{InterpreterConfig, Parser as SourceParser, WriterSink};
use clap::{ArgAction, Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "ceval", version, about = "Tree-walking interpreter for a small C subset")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a C source file
    Run {
        /// Source file to run
        file: PathBuf,
        /// Function to start from
        #[arg(long, default_value = DEFAULT_ENTRY_POINT)]
        entry: String,
        /// Nested calls allowed before a stack overflow is reported
        #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
        max_call_depth: usize,
    },
    /// Parse and dump AST (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Run {
            file,
            entry,
            max_call_depth,
        } => run_file(
            &file,
            InterpreterConfig {
                entry_point: entry,
                max_call_depth,
            },
        ),
        Command::Parse { file } => parse_file(&file).map(|()| 0),
        Command::Tokens { file } => tokenize_file(&file).map(|()| 0),
    };

    match result {
        Ok(status) => std::process::exit(status as i32),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn run_file(path: &Path, config: InterpreterConfig) -> Result<i64, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    info!(file = %path.display(), entry = %config.entry_point, "running");

    let status = ceval::run_source(&source, WriterSink::new(io::stdout()), config)?;
    info!(status, "finished");
    Ok(status)
}

fn parse_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;

    let program = SourceParser::new(&source)?.parse_program()?;
    info!(
        functions = program.functions.len(),
        globals = program.globals.len(),
        "parsed"
    );
    println!("{program:#?}");
    Ok(())
}

fn tokenize_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;

    let tokens = Lexer::new(&source).tokenize()?;
    for token in &tokens {
        println!("{} @ {}", token, token.location());
    }

    Ok(())
}
