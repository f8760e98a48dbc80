//! Unary operator evaluation

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::type_system::{truthy, Mismatch};
use crate::memory::value::Value;
use crate::output::Sink;
use crate::parser::ast::*;

use super::binary::apply_binary;

impl<S: Sink> Interpreter<S> {
    pub(crate) fn evaluate_unary(
        &mut self,
        op: UnOp,
        operand: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        use UnOp::*;

        match op {
            Neg => self.evaluate_neg_op(operand, location),
            Not => {
                let value = self.evaluate_expr(operand)?;
                let b = truthy(&value).map_err(|m| m.at(self.env.site(location)))?;
                Ok(Value::Int(i64::from(!b)))
            }
            PreInc | PreDec | PostInc | PostDec => self.evaluate_inc_dec_op(op, operand, location),
        }
    }

    fn evaluate_neg_op(&mut self, operand: &Expr, location: SourceLocation) -> Result<Value, RuntimeError> {
        let value = self.evaluate_expr(operand)?;
        match value {
            Value::Int(n) => n
                .checked_neg()
                .ok_or_else(|| RuntimeError::IntegerOverflow {
                    operation: format!("-{}", n),
                    site: self.env.site(location),
                })
                .map(Value::Int),
            // char promotes to int before negation
            Value::Char(c) => Ok(Value::Int(-i64::from(c))),
            Value::Float(x) => Ok(Value::Float(-x)),
            other => Err(Mismatch::new("arithmetic operand", other.type_of().to_string())
                .at(self.env.site(location))),
        }
    }

    /// `++x`, `--x`, `x++`, `x--` on a variable or array element
    ///
    /// The updated value is stored with the target's declared type; prefix
    /// forms yield it, postfix forms yield the value before the update.
    fn evaluate_inc_dec_op(
        &mut self,
        op: UnOp,
        operand: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let place = self.resolve_place(operand)?;
        let old = self.read_place(&place, location)?;

        let delta = match op {
            UnOp::PreInc | UnOp::PostInc => BinOp::Add,
            _ => BinOp::Sub,
        };
        let updated = apply_binary(delta, &old, &Value::Int(1)).map_err(|e| e.at(self.env.site(location)))?;
        let stored = self.write_place(&place, updated, location)?;

        Ok(match op {
            UnOp::PostInc | UnOp::PostDec => old,
            _ => stored,
        })
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
    fn test_prefix_and_postfix() {
        assert_eq!(eval("int f() { int i = 5; int j = i++; return j * 10 + i; }"), Ok(Value::Int(56)));
        assert_eq!(eval("int f() { int i = 5; int j = ++i; return j * 10 + i; }"), Ok(Value::Int(66)));
        assert_eq!(eval("int f() { int i = 5; i--; --i; return i; }"), Ok(Value::Int(3)));
    }

    #[test]
    fn test_increment_keeps_declared_type() {
        assert_eq!(eval("char f() { char c = 127; c++; return c; }"), Ok(Value::Char(-128)));
        assert_eq!(eval("float f() { float x = 0.5; x++; return x; }"), Ok(Value::Float(1.5)));
    }

    #[test]
    fn test_increment_array_element() {
        assert_eq!(eval("int f() { int a[] = {1, 2}; a[1]++; return a[1]; }"), Ok(Value::Int(3)));
    }

    #[test]
    fn test_negation_and_not() {
        assert_eq!(eval("float f() { return -2.5; }"), Ok(Value::Float(-2.5)));
        assert_eq!(eval("int f() { return !0 + !7; }"), Ok(Value::Int(1)));
        assert_eq!(eval("int f() { char c = 'A'; return -c; }"), Ok(Value::Int(-65)));
    }

    #[test]
    fn test_increment_of_rvalue() {
        assert!(matches!(eval("int f() { return 3++; }"), Err(RuntimeError::TypeMismatch { .. })));
    }
}
