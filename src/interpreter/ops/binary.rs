use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::{RuntimeError, Site};
use crate::interpreter::type_system::{as_float, as_integral, result_type, truthy, Mismatch};
use crate::memory::value::Value;
use crate::output::Sink;
use crate::parser::ast::{BinOp, Expr, SourceLocation, Type};
use std::cmp::Ordering;

/// Failure of an operator on already evaluated operands
#[derive(Debug, Clone, PartialEq)]
pub enum OpError {
    Mismatch(Mismatch),
    DivisionByZero,
    Overflow(String),
}

impl OpError {
    pub fn at(self, site: Site) -> RuntimeError {
        match self {
            OpError::Mismatch(mismatch) => mismatch.at(site),
            OpError::DivisionByZero => RuntimeError::DivisionByZero { site },
            OpError::Overflow(operation) => RuntimeError::IntegerOverflow { operation, site },
        }
    }
}

impl From<Mismatch> for OpError {
    fn from(mismatch: Mismatch) -> Self {
        OpError::Mismatch(mismatch)
    }
}

/// Apply `op` to two evaluated operands
///
/// Integer arithmetic is checked; float arithmetic follows IEEE-754 single
/// precision, so a float division by zero yields an infinity or NaN.
pub fn apply_binary(op: BinOp, left: &Value, right: &Value) -> Result<Value, OpError> {
    let ty = result_type(op, &left.type_of(), &right.type_of())?;

    if op.is_logical() {
        let (l, r) = (truthy(left)?, truthy(right)?);
        let result = if op == BinOp::And { l && r } else { l || r };
        return Ok(Value::Int(i64::from(result)));
    }

    if op.is_comparison() {
        return Ok(Value::Int(i64::from(compare(op, left, right))));
    }

    match ty {
        Type::Float => {
            let (Some(a), Some(b)) = (as_float(left), as_float(right)) else {
                return Err(operand_mismatch(op, left, right));
            };
            let result = match op {
                BinOp::Add => a + b,
                BinOp::Sub => a - b,
                BinOp::Mul => a * b,
                BinOp::Div => a / b,
                _ => return Err(operand_mismatch(op, left, right)),
            };
            Ok(Value::Float(result))
        }
        _ => {
            let (Some(a), Some(b)) = (as_integral(left), as_integral(right)) else {
                return Err(operand_mismatch(op, left, right));
            };
            checked_int(op, a, b).map(Value::Int)
        }
    }
}

#[inline]
fn checked_int(op: BinOp, a: i64, b: i64) -> Result<i64, OpError> {
    if matches!(op, BinOp::Div | BinOp::Mod) && b == 0 {
        return Err(OpError::DivisionByZero);
    }

    let result = match op {
        BinOp::Add => a.checked_add(b),
        BinOp::Sub => a.checked_sub(b),
        BinOp::Mul => a.checked_mul(b),
        BinOp::Div => a.checked_div(b),
        BinOp::Mod => a.checked_rem(b),
        _ => None,
    };

    result.ok_or_else(|| OpError::Overflow(format!("{} {} {}", a, op.symbol(), b)))
}

/// Comparison in the promoted domain; any comparison with NaN is unordered
fn compare(op: BinOp, left: &Value, right: &Value) -> bool {
    let ordering = match (as_integral(left), as_integral(right)) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => as_float(left).zip(as_float(right)).and_then(|(a, b)| a.partial_cmp(&b)),
    };

    match op {
        BinOp::Eq => ordering == Some(Ordering::Equal),
        BinOp::Ne => ordering != Some(Ordering::Equal),
        BinOp::Lt => ordering == Some(Ordering::Less),
        BinOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        BinOp::Gt => ordering == Some(Ordering::Greater),
        BinOp::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        _ => false,
    }
}

fn operand_mismatch(op: BinOp, left: &Value, right: &Value) -> OpError {
    OpError::Mismatch(Mismatch::new(
        "arithmetic operands",
        format!("{} {} {}", left.type_of(), op.symbol(), right.type_of()),
    ))
}

impl<S: Sink> Interpreter<S> {
    /// Evaluate `left op right`; `&&` and `||` short-circuit
    pub(crate) fn evaluate_binary(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match op {
            BinOp::And => {
                let result =
                    self.evaluate_condition(left)? && self.evaluate_condition(right)?;
                Ok(Value::Int(i64::from(result)))
            }
            BinOp::Or => {
                let result =
                    self.evaluate_condition(left)? || self.evaluate_condition(right)?;
                Ok(Value::Int(i64::from(result)))
            }
            _ => {
                let left = self.evaluate_expr(left)?;
                let right = self.evaluate_expr(right)?;
                apply_binary(op, &left, &right).map_err(|e| e.at(self.env.site(location)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_integer_division_truncates_toward_zero() {
        assert_eq!(apply_binary(BinOp::Div, &Value::Int(7), &Value::Int(2)), Ok(Value::Int(3)));
        assert_eq!(apply_binary(BinOp::Div, &Value::Int(-7), &Value::Int(2)), Ok(Value::Int(-3)));
        assert_eq!(apply_binary(BinOp::Mod, &Value::Int(-7), &Value::Int(2)), Ok(Value::Int(-1)));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            apply_binary(BinOp::Div, &Value::Int(1), &Value::Int(0)),
            Err(OpError::DivisionByZero)
        );
        assert_eq!(
            apply_binary(BinOp::Mod, &Value::Char(1), &Value::Char(0)),
            Err(OpError::DivisionByZero)
        );
    }

    #[test]
    fn test_float_division_by_zero_is_infinite() {
        let result = apply_binary(BinOp::Div, &Value::Float(1.0), &Value::Int(0)).unwrap();
        assert_eq!(result, Value::Float(f32::INFINITY));
    }

    #[test]
    fn test_overflow_detected() {
        let result = apply_binary(BinOp::Add, &Value::Int(i64::MAX), &Value::Int(1));
        assert!(matches!(result, Err(OpError::Overflow(_))));
        let result = apply_binary(BinOp::Div, &Value::Int(i64::MIN), &Value::Int(-1));
        assert!(matches!(result, Err(OpError::Overflow(_))));
    }

    #[test]
    fn test_char_arithmetic_promotes_to_int() {
        let result = apply_binary(BinOp::Add, &Value::Char(100), &Value::Char(100));
        assert_eq!(result, Ok(Value::Int(200)));
    }

    #[test]
    fn test_mixed_comparison() {
        assert_eq!(apply_binary(BinOp::Lt, &Value::Int(2), &Value::Float(2.5)), Ok(Value::Int(1)));
        assert_eq!(apply_binary(BinOp::Eq, &Value::Char(43), &Value::Int(43)), Ok(Value::Int(1)));
        let nan = Value::Float(f32::NAN);
        assert_eq!(apply_binary(BinOp::Eq, &nan, &nan), Ok(Value::Int(0)));
        assert_eq!(apply_binary(BinOp::Ne, &nan, &nan), Ok(Value::Int(1)));
    }

    #[test]
    fn test_float_modulo_rejected() {
        let result = apply_binary(BinOp::Mod, &Value::Float(5.0), &Value::Int(2));
        assert!(matches!(result, Err(OpError::Mismatch(_))));
    }

    proptest! {
        #[test]
        fn mixed_arithmetic_matches_promoted(a in -1_000_000i64..1_000_000, b in -1.0e4f32..1.0e4) {
            for op in [BinOp::Add, BinOp::Sub, BinOp::Mul] {
                let mixed = apply_binary(op, &Value::Int(a), &Value::Float(b)).unwrap();
                let promoted = apply_binary(op, &Value::Float(a as f32), &Value::Float(b)).unwrap();
                prop_assert_eq!(mixed, promoted);
            }
        }

        #[test]
        fn integer_results_stay_integers(a in any::<i32>(), b in any::<i32>()) {
            let result = apply_binary(BinOp::Add, &Value::Int(a.into()), &Value::Int(b.into())).unwrap();
            prop_assert_eq!(result, Value::Int(i64::from(a) + i64::from(b)));
        }
    }
}
