//! Operator semantics, implemented as `impl Interpreter` blocks plus the
//! pure [`binary::apply_binary`] used by both binary and compound operators

pub mod access;
pub mod assign;
pub mod binary;
pub mod unary;
