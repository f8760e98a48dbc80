//! Memory model for the C interpreter
//!
//! This module provides the core memory abstractions:
//! - [`value`]: Runtime value representation (Int, Float, Char, Array, Void)
//! - [`env`]: Global scope, call frames and block scopes
//!
//! There is no addressable memory: variables are named slots, and arrays are
//! reference-counted handles so that passing one to a function shares it.

pub mod env;
pub mod value;

pub use env::{CallFrame, Environment, Scope, Slot};
pub use value::{ArrayRef, Value};
