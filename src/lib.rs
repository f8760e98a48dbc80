//! # Introduction
//!
//! ceval parses and executes a small, statically-typed subset of C by walking
//! its syntax tree directly. Programs are evaluated function by function;
//! `printf` output goes to a pluggable [`output::Sink`].
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Interpreter → Sink
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds an AST.
//! 2. [`interpreter`]: initializes globals, then walks the AST, executing
//!    statements and evaluating expressions with C's promotion rules.
//! 3. [`memory`]: tagged [`memory::value::Value`]s bound in the
//!    [`memory::env::Environment`] (global scope plus one frame per call).
//! 4. [`output`]: the `printf` formatter and the sinks that receive its
//!    output.
//!
//! ## Supported C subset
//!
//! Types: `int`, `float`, `char`, `void`, one-dimensional arrays.
//! Control flow: `if/else`, `while`, `for`, `do-while`, `break`, `continue`,
//! `return`.
//! Built-ins: `printf`.

pub mod interpreter;
pub mod memory;
pub mod output;
pub mod parser;

pub use interpreter::{Interpreter, InterpreterConfig, RuntimeError};
pub use memory::value::Value;
pub use output::{CaptureSink, Sink, WriterSink};
pub use parser::{Parser, SyntaxError};

use thiserror::Error;

/// Any failure between source text and a finished run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] SyntaxError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Parse `source` and run its entry point, writing output to `sink`
///
/// Returns the entry point's result as an exit status.
pub fn run_source<S: Sink>(source: &str, sink: S, config: InterpreterConfig) -> Result<i64, Error> {
    let program = Parser::new(source)?.parse_program()?;
    let mut interpreter = Interpreter::with_config(program, sink, config)?;
    Ok(interpreter.run()?)
}
