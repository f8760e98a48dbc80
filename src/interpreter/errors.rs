//! Runtime error types for the C interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to syntax errors).
//!
//! All runtime errors are fatal: they halt the evaluation and carry a [`Site`]
//! naming the active function and source position for diagnosis.

use crate::parser::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// Function name used for sites outside of any call (global initializers)
pub const GLOBAL_SITE: &str = "<global>";

/// Where an error happened: the active function and the offending construct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub function: String,
    pub location: SourceLocation,
}

impl Site {
    pub fn new(function: impl Into<String>, location: SourceLocation) -> Self {
        Site {
            function: function.into(),
            location,
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in '{}'", self.location, self.function)
    }
}

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Reference to a name with no active binding
    #[error("Undefined variable '{name}' at {site}")]
    UndefinedIdentifier { name: String, site: Site },

    /// Call to a name missing from the function table
    #[error("Undefined function '{name}' at {site}")]
    UndefinedFunction { name: String, site: Site },

    /// Name already bound in the same scope, or a repeated function definition
    #[error("Duplicate declaration of '{name}' at {site}")]
    DuplicateDeclaration { name: String, site: Site },

    /// Function argument count mismatch
    #[error("Function '{function}' expects {expected} argument(s), got {found} at {site}")]
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
        site: Site,
    },

    /// Operand or conversion not allowed for the types involved
    #[error("Type error at {site}: expected {expected}, got {found}")]
    TypeMismatch {
        expected: String,
        found: String,
        site: Site,
    },

    /// Array index outside `0..length`
    #[error("Index {index} out of bounds for array of length {length} at {site}")]
    IndexOutOfBounds {
        index: i64,
        length: usize,
        site: Site,
    },

    /// Integer division or modulo by zero
    #[error("Division by zero at {site}")]
    DivisionByZero { site: Site },

    /// Non-void function finished without returning a value
    #[error("Function '{function}' reached the end without returning a value at {site}")]
    MissingReturn { function: String, site: Site },

    /// Array declaration longer than the interpreter will allocate
    #[error("Array of length {length} exceeds the limit of {limit} elements at {site}")]
    ArrayTooLarge {
        length: usize,
        limit: usize,
        site: Site,
    },

    /// Call depth limit exceeded
    #[error("Stack overflow: call depth exceeded {limit} at {site}")]
    StackOverflow { limit: usize, site: Site },

    /// Integer overflow in arithmetic operation
    #[error("Integer overflow in operation '{operation}' at {site}")]
    IntegerOverflow { operation: String, site: Site },

    /// `break` or `continue` outside of any loop
    #[error("'{statement}' outside of a loop at {site}")]
    InvalidJump {
        statement: &'static str,
        site: Site,
    },

    /// Invalid printf format string or arguments
    #[error("Invalid printf format at {site}: {message}")]
    InvalidFormat { message: String, site: Site },

    /// The output sink failed to write
    #[error("Output failed at {site}: {message}")]
    OutputFailed { message: String, site: Site },
}

impl RuntimeError {
    pub fn site(&self) -> &Site {
        match self {
            RuntimeError::UndefinedIdentifier { site, .. }
            | RuntimeError::UndefinedFunction { site, .. }
            | RuntimeError::DuplicateDeclaration { site, .. }
            | RuntimeError::ArityMismatch { site, .. }
            | RuntimeError::TypeMismatch { site, .. }
            | RuntimeError::IndexOutOfBounds { site, .. }
            | RuntimeError::DivisionByZero { site }
            | RuntimeError::MissingReturn { site, .. }
            | RuntimeError::ArrayTooLarge { site, .. }
            | RuntimeError::StackOverflow { site, .. }
            | RuntimeError::IntegerOverflow { site, .. }
            | RuntimeError::InvalidJump { site, .. }
            | RuntimeError::InvalidFormat { site, .. }
            | RuntimeError::OutputFailed { site, .. } => site,
        }
    }

    pub fn location(&self) -> SourceLocation {
        self.site().location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_function_and_position() {
        let err = RuntimeError::UndefinedIdentifier {
            name: "y".to_string(),
            site: Site::new("main", SourceLocation::new(4, 12)),
        };
        assert_eq!(
            err.to_string(),
            "Undefined variable 'y' at line 4, column 12 in 'main'"
        );
        assert_eq!(err.location(), SourceLocation::new(4, 12));
    }

    #[test]
    fn test_arity_message() {
        let err = RuntimeError::ArityMismatch {
            function: "add".to_string(),
            expected: 2,
            found: 1,
            site: Site::new("main", SourceLocation::new(1, 1)),
        };
        assert!(err.to_string().contains("expects 2 argument(s), got 1"));
    }
}
