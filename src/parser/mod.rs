//! C source code parser
//!
//! This module transforms C source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: The [`Parser`] and its helpers; grammar rules live in
//!   `declarations`, `statements` and `expressions`
//! - [`ast`]: AST node definitions
//!
//! # Supported C Subset
//!
//! - Types: `int`, `float`, `char`, `void`, one-dimensional arrays
//! - Statements: declarations, control flow (`if`, `while`, `do-while`, `for`),
//!   `return`, `break`, `continue`, blocks
//! - Expressions: arithmetic, comparison, logical, ternary, casts, assignment,
//!   increments, indexing, function calls
//! - No preprocessor (directive lines such as `#include` are skipped)
//! - No pointers, structs, unions, enums or typedefs
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one method per precedence level.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use parse::{Parser, SyntaxError};
