//! C interpreter execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: Main interpreter, configuration and function calls
//! - [`errors`]: Runtime error types
//! - [`type_system`]: Promotion and coercion rules
//! - `statements`, `loops`, `jumps`: Statement execution
//! - `expressions`, [`ops`]: Expression evaluation
//! - `builtins`: `printf`
//!
//! # Execution Model
//!
//! The interpreter walks the AST directly. Globals are initialized when the
//! interpreter is built; each call pushes a frame, binds its arguments and
//! runs the body until a `return` or the end of the function.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod ops;
pub mod type_system;

mod builtins;
mod expressions;
mod jumps;
mod loops;
mod statements;

pub use engine::{Interpreter, InterpreterConfig};
pub use errors::{RuntimeError, Site};
