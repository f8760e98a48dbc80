//! Array element access
//!
//! Indices must be integral (`int` or `char`) and are checked against the
//! array's length on every access, reads and writes alike.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::type_system::{as_integral, Mismatch};
use crate::memory::value::{ArrayRef, Value};
use crate::output::Sink;
use crate::parser::ast::{Expr, SourceLocation};

impl<S: Sink> Interpreter<S> {
    /// `array[index]` as an rvalue
    pub(crate) fn evaluate_index(
        &mut self,
        array: &Expr,
        index: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let (array, index) = self.resolve_element(array, index, location)?;
        array
            .get(index)
            .ok_or_else(|| self.out_of_bounds(index as i64, &array, location))
    }

    /// Evaluate the array and index operands and bounds-check them
    pub(crate) fn resolve_element(
        &mut self,
        array: &Expr,
        index: &Expr,
        location: SourceLocation,
    ) -> Result<(ArrayRef, usize), RuntimeError> {
        let array = match self.evaluate_expr(array)? {
            Value::Array(handle) => handle,
            other => {
                return Err(Mismatch::new("array", other.type_of().to_string())
                    .at(self.env.site(array.location())));
            }
        };

        let index_value = self.evaluate_expr(index)?;
        let Some(raw_index) = as_integral(&index_value) else {
            return Err(Mismatch::new("integral index", index_value.type_of().to_string())
                .at(self.env.site(index.location())));
        };

        match usize::try_from(raw_index) {
            Ok(i) if i < array.len() => Ok((array, i)),
            _ => Err(self.out_of_bounds(raw_index, &array, location)),
        }
    }

    pub(crate) fn out_of_bounds(&self, index: i64, array: &ArrayRef, location: SourceLocation) -> RuntimeError {
        RuntimeError::IndexOutOfBounds {
            index,
            length: array.len(),
            site: self.env.site(location),
        }
    }
}
