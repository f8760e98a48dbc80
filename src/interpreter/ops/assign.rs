//! Assignment targets
//!
//! An assignable expression resolves to a [`Place`]: either a named variable
//! or one element of an array. Reads and writes go through the place so
//! `=`, compound assignment and `++`/`--` share the same conversions: every
//! stored value is coerced to the place's declared type.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::type_system::{coerce, Mismatch};
use crate::memory::value::{ArrayRef, Value};
use crate::output::Sink;
use crate::parser::ast::{BinOp, Expr, SourceLocation, Type};

use super::binary::apply_binary;

/// A resolved assignment target
#[derive(Debug, Clone)]
pub(crate) enum Place<'a> {
    Variable { name: &'a str, declared_type: Type },
    Element { array: ArrayRef, index: usize },
}

impl Place<'_> {
    fn declared_type(&self) -> &Type {
        match self {
            Place::Variable { declared_type, .. } => declared_type,
            Place::Element { array, .. } => array.element_type(),
        }
    }
}

impl<S: Sink> Interpreter<S> {
    /// Resolve an lvalue expression
    pub(crate) fn resolve_place<'a>(&mut self, target: &'a Expr) -> Result<Place<'a>, RuntimeError> {
        match target {
            Expr::Variable(name, location) => {
                let declared_type = self.env.lookup(name, *location)?.declared_type.clone();
                if declared_type.is_array() {
                    // Whole arrays are not assignable
                    return Err(Mismatch::new("assignable scalar", declared_type.to_string())
                        .at(self.env.site(*location)));
                }
                Ok(Place::Variable {
                    name,
                    declared_type,
                })
            }

            Expr::Index {
                array,
                index,
                location,
            } => {
                let (array, index) = self.resolve_element(array, index, *location)?;
                Ok(Place::Element { array, index })
            }

            other => Err(Mismatch::new("assignable location", "expression")
                .at(self.env.site(other.location()))),
        }
    }

    pub(crate) fn read_place(&self, place: &Place<'_>, location: SourceLocation) -> Result<Value, RuntimeError> {
        match place {
            Place::Variable { name, .. } => Ok(self.env.lookup(name, location)?.value.clone()),
            Place::Element { array, index } => {
                array.get(*index).ok_or_else(|| self.out_of_bounds(*index as i64, array, location))
            }
        }
    }

    /// Coerce `value` to the place's type and store it; yields the stored value
    pub(crate) fn write_place(
        &mut self,
        place: &Place<'_>,
        value: Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let value = coerce(value, place.declared_type()).map_err(|m| m.at(self.env.site(location)))?;

        match place {
            Place::Variable { name, .. } => self.env.assign(name, value.clone(), location)?,
            Place::Element { array, index } => {
                if !array.set(*index, value.clone()) {
                    return Err(self.out_of_bounds(*index as i64, array, location));
                }
            }
        }

        Ok(value)
    }

    /// `target = value` or `target op= value`
    pub(crate) fn evaluate_assign(
        &mut self,
        target: &Expr,
        op: Option<BinOp>,
        value: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let rhs = self.evaluate_expr(value)?;
        let place = self.resolve_place(target)?;

        let new_value = match op {
            None => rhs,
            Some(op) => {
                let current = self.read_place(&place, location)?;
                apply_binary(op, &current, &rhs).map_err(|e| e.at(self.env.site(location)))?
            }
        };

        self.write_place(&place, new_value, location)
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
    fn test_assignment_yields_stored_value() {
        assert_eq!(eval("int f() { int a; int b; a = b = 4; return a + b; }"), Ok(Value::Int(8)));
    }

    #[test]
    fn test_assignment_coerces_to_declared_type() {
        assert_eq!(eval("float f() { int n; n = 2.75; return n; }"), Ok(Value::Float(2.0)));
    }

    #[test]
    fn test_compound_assignment() {
        let source = "int f() { int x = 10; x += 5; x -= 3; x *= 2; x /= 4; x %= 4; return x; }";
        assert_eq!(eval(source), Ok(Value::Int(2)));
    }

    #[test]
    fn test_compound_assignment_on_int_with_float() {
        // x = (int)(7 * 1.5)
        assert_eq!(eval("int f() { int x = 7; x *= 1.5; return x; }"), Ok(Value::Int(10)));
    }

    #[test]
    fn test_element_assignment() {
        let source = "int f() { int a[3]; a[1] = 9; a[2] += a[1]; return a[2]; }";
        assert_eq!(eval(source), Ok(Value::Int(9)));
    }

    #[test]
    fn test_whole_array_assignment_rejected() {
        let source = "int f() { int a[2]; int b[2]; a = b; return 0; }";
        assert!(matches!(eval(source), Err(RuntimeError::TypeMismatch { .. })));
    }

    #[test]
    fn test_assignment_to_undeclared() {
        assert!(matches!(
            eval("int f() { y = 1; return 0; }"),
            Err(RuntimeError::UndefinedIdentifier { .. })
        ));
    }
}
