//! Statement execution implementation
//!
//! This module handles the execution of C statements, including:
//!
//! - Variable declarations and initializations
//! - `if`/`else` branching
//! - Blocks and compound statements
//! - Expression statements
//!
//! Loops live in `loops` and `return` in `jumps`.
//!
//! # Control Flow
//!
//! Every statement reports how it finished as a [`Flow`]. `break`, `continue`
//! and `return` travel outward through enclosing blocks until a loop or the
//! function call consumes them.

use crate::interpreter::constants::MAX_ARRAY_LEN;
use crate::interpreter::engine::{Flow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::type_system::{coerce, truthy, Mismatch};
use crate::memory::value::{ArrayRef, Value};
use crate::output::Sink;
use crate::parser::ast::*;
use tracing::trace;

impl<S: Sink> Interpreter<S> {
    /// Run statements in order, stopping at the first non-normal flow
    pub(crate) fn execute_statements(&mut self, statements: &[Stmt]) -> Result<Flow, RuntimeError> {
        for stmt in statements {
            match self.execute_statement(stmt)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    /// Run statements inside a fresh block scope
    pub(crate) fn execute_block(&mut self, statements: &[Stmt]) -> Result<Flow, RuntimeError> {
        self.env.enter_block();
        let result = self.execute_statements(statements);
        self.env.exit_block();
        result
    }

    pub(crate) fn execute_statement(&mut self, stmt: &Stmt) -> Result<Flow, RuntimeError> {
        trace!(
            function = self.env.current_function(),
            line = stmt.location().line,
            "execute statement"
        );

        match stmt {
            Stmt::VarDecl(decl) => {
                self.execute_declaration(decl)?;
                Ok(Flow::Normal)
            }

            Stmt::Expression { expr, .. } => {
                // A void result is fine here and nowhere else
                self.evaluate_expr(expr)?;
                Ok(Flow::Normal)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.evaluate_condition(condition)? {
                    self.execute_block(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute_block(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While {
                condition, body, ..
            } => self.execute_while(condition, body),

            Stmt::DoWhile {
                body, condition, ..
            } => self.execute_do_while(body, condition),

            Stmt::For {
                init,
                condition,
                step,
                body,
                ..
            } => self.execute_for(init.as_deref(), condition.as_ref(), step.as_ref(), body),

            Stmt::Return { expr, location } => self.execute_return(expr.as_ref(), *location),

            Stmt::Break { .. } => Ok(Flow::Break),

            Stmt::Continue { .. } => Ok(Flow::Continue),

            Stmt::Block { statements, .. } => self.execute_block(statements),

            Stmt::Empty { .. } => Ok(Flow::Normal),
        }
    }

    /// Evaluate a condition expression to a boolean
    pub(crate) fn evaluate_condition(&mut self, condition: &Expr) -> Result<bool, RuntimeError> {
        let value = self.evaluate_expr(condition)?;
        truthy(&value).map_err(|m| m.at(self.env.site(condition.location())))
    }

    /// Evaluate the initializer (or a zero value) and bind the variable
    pub(crate) fn execute_declaration(&mut self, decl: &VarDecl) -> Result<(), RuntimeError> {
        let location = decl.location;

        let (declared_type, value) = match (&decl.var_type, &decl.init) {
            (Type::Array(element, len), init) => {
                let array = self.build_array(element, *len, init.as_ref(), location)?;
                (
                    Type::array_of((**element).clone(), Some(array.len())),
                    Value::Array(array),
                )
            }

            (Type::Void, _) => {
                return Err(Mismatch::new("object type", "void").at(self.env.site(location)));
            }

            (ty, None) => {
                let zero = Value::zero_of(ty)
                    .ok_or_else(|| Mismatch::new("sized type", ty.to_string()).at(self.env.site(location)))?;
                (ty.clone(), zero)
            }

            (ty, Some(Initializer::Expr(expr))) => {
                let value = self.evaluate_expr(expr)?;
                let value = coerce(value, ty).map_err(|m| m.at(self.env.site(expr.location())))?;
                (ty.clone(), value)
            }

            (ty, Some(Initializer::List(_, list_location))) => {
                return Err(
                    Mismatch::new(ty.to_string(), "initializer list").at(self.env.site(*list_location))
                );
            }
        };

        self.env.declare(&decl.name, declared_type, value, location)
    }

    /// Build a fresh array for a declaration
    ///
    /// With an explicit size, missing initializers are zero; without one,
    /// the initializer count is the length.
    fn build_array(
        &mut self,
        element: &Type,
        len: Option<usize>,
        init: Option<&Initializer>,
        location: SourceLocation,
    ) -> Result<ArrayRef, RuntimeError> {
        let Some(zero) = Value::zero_of(element).filter(|_| element.is_scalar()) else {
            return Err(Mismatch::new("scalar element type", element.to_string())
                .at(self.env.site(location)));
        };

        let initializers: &[Expr] = match init {
            None => &[],
            Some(Initializer::List(exprs, _)) => exprs,
            Some(Initializer::Expr(expr)) => {
                return Err(Mismatch::new("initializer list", "expression")
                    .at(self.env.site(expr.location())));
            }
        };

        let len = match (len, init) {
            (Some(len), _) => len,
            (None, Some(_)) => initializers.len(),
            (None, None) => {
                return Err(Mismatch::new(
                    "array size or initializer",
                    Type::array_of(element.clone(), None).to_string(),
                )
                .at(self.env.site(location)));
            }
        };

        if len > MAX_ARRAY_LEN {
            return Err(RuntimeError::ArrayTooLarge {
                length: len,
                limit: MAX_ARRAY_LEN,
                site: self.env.site(location),
            });
        }

        if initializers.len() > len {
            return Err(Mismatch::new(
                format!("at most {} initializers", len),
                initializers.len().to_string(),
            )
            .at(self.env.site(location)));
        }

        let mut elements = Vec::with_capacity(len);
        for expr in initializers {
            let value = self.evaluate_expr(expr)?;
            let value = coerce(value, element).map_err(|m| m.at(self.env.site(expr.location())))?;
            elements.push(value);
        }
        elements.resize(len, zero);

        Ok(ArrayRef::new(element.clone(), elements))
    }
}
