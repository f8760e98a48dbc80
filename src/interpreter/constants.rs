// Constants for the C interpreter

/// Function run by [`Interpreter::run`](super::engine::Interpreter::run) unless configured otherwise
pub const DEFAULT_ENTRY_POINT: &str = "main";

/// Maximum number of nested calls before `StackOverflow` is reported
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

/// Largest array length a declaration may request
pub const MAX_ARRAY_LEN: usize = 1 << 24;

/// Remaining native stack below which a call switches to a fresh segment
pub const STACK_RED_ZONE: usize = 128 * 1024;

/// Size of each freshly allocated native stack segment
pub const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Name of the built-in formatted output function
pub const PRINTF: &str = "printf";
