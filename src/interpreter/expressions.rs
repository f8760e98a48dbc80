//! Expression evaluation
//!
//! [`Interpreter::evaluate_expr`] dispatches on the expression kind. Operator
//! semantics live in `ops`: binary arithmetic and comparison in `ops::binary`,
//! negation, `!` and increments in `ops::unary`, assignment targets in
//! `ops::assign` and array indexing in `ops::access`.
//!
//! A conditional expression evaluates only the chosen branch, then converts
//! it to the common type of both branches when that type can be read off the
//! tree without evaluating anything (`1 ? 5 : 2.5` is a float).
//!
//! Function calls are evaluated here: arity is checked against the callee
//! before any argument is evaluated, then arguments are evaluated left to
//! right in the caller's scope.

use crate::interpreter::constants::{PRINTF, STACK_GROW_SIZE, STACK_RED_ZONE};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::type_system::{coerce, result_type, Mismatch};
use crate::memory::value::Value;
use crate::output::Sink;
use crate::parser::ast::*;

impl<S: Sink> Interpreter<S> {
    pub(crate) fn evaluate_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.evaluate_expr_inner(expr))
    }

    fn evaluate_expr_inner(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::IntLiteral(n, _) => Ok(Value::Int(*n)),
            Expr::FloatLiteral(x, _) => Ok(Value::Float(*x)),
            Expr::CharLiteral(c, _) => Ok(Value::Char(*c)),

            Expr::StringLiteral(_, location) => {
                Err(Mismatch::new("int, float or char", "string literal").at(self.env.site(*location)))
            }

            Expr::Variable(name, location) => Ok(self.env.lookup(name, *location)?.value.clone()),

            Expr::Binary {
                op,
                left,
                right,
                location,
            } => self.evaluate_binary(*op, left, right, *location),

            Expr::Unary {
                op,
                operand,
                location,
            } => self.evaluate_unary(*op, operand, *location),

            Expr::Assign {
                target,
                op,
                value,
                location,
            } => self.evaluate_assign(target, *op, value, *location),

            Expr::Ternary {
                condition,
                true_expr,
                false_expr,
                location,
            } => {
                let chosen = if self.evaluate_condition(condition)? {
                    true_expr
                } else {
                    false_expr
                };
                let value = self.evaluate_expr(chosen)?;

                match self.common_type(true_expr, false_expr) {
                    Some(ty) => coerce(value, &ty).map_err(|m| m.at(self.env.site(*location))),
                    None => Ok(value),
                }
            }

            Expr::Call {
                name,
                args,
                location,
            } => self.call_function(name, args, *location),

            Expr::Index {
                array,
                index,
                location,
            } => self.evaluate_index(array, index, *location),

            Expr::Cast {
                target_type,
                expr,
                location,
            } => {
                let value = self.evaluate_expr(expr)?;
                match target_type {
                    // (void)expr discards the value
                    Type::Void => Ok(Value::Void),
                    ty if ty.is_scalar() && !value.is_void() => {
                        coerce(value, ty).map_err(|m| m.at(self.env.site(*location)))
                    }
                    ty => Err(Mismatch::new(ty.to_string(), value.type_of().to_string())
                        .at(self.env.site(*location))),
                }
            }
        }
    }

    /// Type of `expr` read off the tree, or `None` when it depends on evaluation
    fn static_type(&self, expr: &Expr) -> Option<Type> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || match expr {
            Expr::IntLiteral(..) => Some(Type::Int),
            Expr::FloatLiteral(..) => Some(Type::Float),
            Expr::CharLiteral(..) => Some(Type::Char),
            Expr::StringLiteral(..) => None,
            Expr::Variable(name, location) => self
                .env
                .lookup(name, *location)
                .ok()
                .map(|slot| slot.declared_type.clone()),
            Expr::Binary { op, left, right, .. } => {
                result_type(*op, &self.static_type(left)?, &self.static_type(right)?).ok()
            }
            Expr::Unary { op: UnOp::Not, .. } => Some(Type::Int),
            Expr::Unary {
                op: UnOp::Neg,
                operand,
                ..
            } => match self.static_type(operand)? {
                Type::Char => Some(Type::Int),
                ty => Some(ty),
            },
            Expr::Unary { operand, .. } => self.static_type(operand),
            Expr::Assign { target, .. } => self.static_type(target),
            Expr::Ternary {
                true_expr,
                false_expr,
                ..
            } => self.common_type(true_expr, false_expr),
            Expr::Call { name, .. } if name == PRINTF => Some(Type::Int),
            Expr::Call { name, location, .. } => self
                .lookup_function(name, *location)
                .ok()
                .map(|function| function.return_type.clone()),
            Expr::Index { array, .. } => self.static_type(array)?.element_type().cloned(),
            Expr::Cast { target_type, .. } => Some(target_type.clone()),
        })
    }

    /// Arithmetic type both branches of a conditional convert to
    fn common_type(&self, left: &Expr, right: &Expr) -> Option<Type> {
        result_type(BinOp::Add, &self.static_type(left)?, &self.static_type(right)?).ok()
    }

    /// Call a builtin or user-defined function
    pub(crate) fn call_function(
        &mut self,
        name: &str,
        args: &[Expr],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if name == PRINTF {
            return self.builtin_printf(args, location);
        }

        let function = self.lookup_function(name, location)?;
        if args.len() != function.params.len() {
            return Err(RuntimeError::ArityMismatch {
                function: name.to_string(),
                expected: function.params.len(),
                found: args.len(),
                site: self.env.site(location),
            });
        }

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate_expr(arg)?);
        }

        self.invoke(&function, values, location)
    }
}
