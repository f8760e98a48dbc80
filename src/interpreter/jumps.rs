use crate::interpreter::engine::{Flow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::type_system::{coerce, Mismatch};
use crate::memory::value::Value;
use crate::output::Sink;
use crate::parser::ast::{Expr, SourceLocation, Type};

impl<S: Sink> Interpreter<S> {
    /// `return;` or `return expr;`, checked against the declared return type
    pub(crate) fn execute_return(
        &mut self,
        expr: Option<&Expr>,
        location: SourceLocation,
    ) -> Result<Flow, RuntimeError> {
        let return_type = self.current_return_type();

        match (expr, &return_type) {
            (None, Type::Void) => Ok(Flow::Return(Value::Void)),

            (None, _) => {
                Err(Mismatch::new(return_type.to_string(), "void").at(self.env.site(location)))
            }

            (Some(_), Type::Void) => {
                Err(Mismatch::new("void", "a return value").at(self.env.site(location)))
            }

            (Some(expr), _) => {
                let value = self.evaluate_expr(expr)?;
                coerce(value, &return_type)
                    .map(Flow::Return)
                    .map_err(|m| m.at(self.env.site(expr.location())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::errors::RuntimeError;
    use crate::interpreter::Interpreter;
    use crate::memory::value::Value;
    use crate::parser::Parser;

    fn eval(source: &str) -> Result<Value, RuntimeError> {
        let program = Parser::new(source).unwrap().parse_program().unwrap();
        Interpreter::new(program)?.evaluate("f", Vec::new())
    }

    #[test]
    fn test_return_value_is_coerced() {
        assert_eq!(eval("int f() { return 7.8; }"), Ok(Value::Int(7)));
        assert_eq!(eval("float f() { return 2; }"), Ok(Value::Float(2.0)));
    }

    #[test]
    fn test_void_function_returns_void() {
        assert_eq!(eval("void f() { return; }"), Ok(Value::Void));
        assert_eq!(eval("void f() { }"), Ok(Value::Void));
    }

    #[test]
    fn test_value_returned_from_void_function() {
        assert!(matches!(
            eval("void f() { return 1; }"),
            Err(RuntimeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_bare_return_in_int_function() {
        assert!(matches!(
            eval("int f() { return; }"),
            Err(RuntimeError::TypeMismatch { .. })
        ));
    }
}
