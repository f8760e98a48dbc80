//! Built-in function implementations
//!
//! This module provides the implementation of C built-in functions that are
//! directly handled by the interpreter rather than being defined in user code.
//!
//! # Supported Built-ins
//!
//! - `printf(format, ...)`: Formatted output to the interpreter's [`Sink`]
//!
//! # Implementation Notes
//!
//! - The format must be a string literal; it is the only place strings are accepted
//! - Arguments are evaluated left to right before formatting
//! - Built-ins are resolved before user functions, so a user `printf` is never called

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::output::{Sink, SinkError};
use crate::parser::ast::{Expr, SourceLocation};

impl<S: Sink> Interpreter<S> {
    pub(crate) fn builtin_printf(
        &mut self,
        args: &[Expr],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let Some((format, rest)) = args.split_first() else {
            return Err(RuntimeError::InvalidFormat {
                message: "printf requires at least one argument".to_string(),
                site: self.env.site(location),
            });
        };

        let Expr::StringLiteral(format, _) = format else {
            return Err(RuntimeError::InvalidFormat {
                message: "printf format must be a string literal".to_string(),
                site: self.env.site(format.location()),
            });
        };

        let mut values = Vec::with_capacity(rest.len());
        for arg in rest {
            values.push(self.evaluate_expr(arg)?);
        }

        self.sink
            .write(format, &values)
            .map_err(|err| match err {
                SinkError::Format(message) => RuntimeError::InvalidFormat {
                    message,
                    site: self.env.site(location),
                },
                SinkError::Io(err) => RuntimeError::OutputFailed {
                    message: err.to_string(),
                    site: self.env.site(location),
                },
            })?;

        Ok(Value::Int(0))
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::errors::RuntimeError;
    use crate::interpreter::Interpreter;
    use crate::output::WriterSink;
    use crate::parser::Parser;

    fn run(source: &str) -> (Result<i64, RuntimeError>, String) {
        let program = Parser::new(source).unwrap().parse_program().unwrap();
        let mut interp = Interpreter::new(program).unwrap();
        let result = interp.run();
        (result, interp.sink().output().to_string())
    }

    #[test]
    fn test_printf_writes_to_sink() {
        let (result, output) = run("int main() { printf(\"%d + %c\\n\", 4, 'x'); return 0; }");
        assert_eq!(result, Ok(0));
        assert_eq!(output, "4 + x\n");
    }

    #[test]
    fn test_printf_shadows_user_function() {
        let (_, output) = run("int printf(int x) { return x; } int main() { printf(\"ok\"); return 0; }");
        assert_eq!(output, "ok");
    }

    #[test]
    fn test_printf_format_must_be_literal() {
        let (result, _) = run("int main() { int x = 1; printf(x); return 0; }");
        assert!(matches!(result, Err(RuntimeError::InvalidFormat { .. })));
    }

    #[test]
    fn test_printf_argument_mismatch() {
        let (result, output) = run("int main() { printf(\"a\"); printf(\"%d\", 1.5); return 0; }");
        assert!(matches!(result, Err(RuntimeError::InvalidFormat { ref site, .. }) if site.function == "main"));
        assert_eq!(output, "a");
    }

    #[test]
    fn test_printf_emits_raw_bytes() {
        let source = "int main() { printf(\"%c\\xC8\\n\", 200); return 0; }";
        let program = Parser::new(source).unwrap().parse_program().unwrap();
        let mut interp = Interpreter::with_sink(program, WriterSink::new(Vec::new())).unwrap();
        assert_eq!(interp.run(), Ok(0));
        assert_eq!(interp.into_sink().into_inner(), vec![200, 200, b'\n']);
    }
}
