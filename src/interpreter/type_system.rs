//! Type promotion and value coercion
//!
//! This module holds the pure typing rules the evaluator consults:
//!
//! - [`result_type`]: The type a binary operator produces for given operand types
//! - [`coerce`]: Converting a value for storage into a slot of a declared type
//! - [`truthy`]: Interpreting a value as a condition
//!
//! # Promotion Rules
//!
//! Scalars form the lattice `char < int < float`:
//!
//! - Comparison and logical operators always yield `int` (0 or 1)
//! - Arithmetic yields `float` if either operand is `float`, otherwise `int`
//!   (a `char` operand is promoted to `int` first)
//! - `%` needs two integral operands
//! - `void` and array operands never take part in arithmetic

use crate::interpreter::errors::{RuntimeError, Site};
use crate::memory::value::Value;
use crate::parser::ast::{BinOp, Type};

/// A typing rule violation, before it is placed at a site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub expected: String,
    pub found: String,
}

impl Mismatch {
    pub fn new(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Mismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn at(self, site: Site) -> RuntimeError {
        RuntimeError::TypeMismatch {
            expected: self.expected,
            found: self.found,
            site,
        }
    }
}

/// Result type of `left op right`
pub fn result_type(op: BinOp, left: &Type, right: &Type) -> Result<Type, Mismatch> {
    if !left.is_scalar() || !right.is_scalar() {
        return Err(Mismatch::new(
            "arithmetic operands",
            format!("{} {} {}", left, op.symbol(), right),
        ));
    }

    if op.is_comparison() || op.is_logical() {
        return Ok(Type::Int);
    }

    let has_float = *left == Type::Float || *right == Type::Float;
    if op == BinOp::Mod && has_float {
        return Err(Mismatch::new(
            "integral operands",
            format!("{} % {}", left, right),
        ));
    }

    Ok(if has_float { Type::Float } else { Type::Int })
}

/// Convert `value` for storage in a slot of type `target`
///
/// - `int`/`char` → `float`: nearest representable value
/// - `float` → `int`: truncation toward zero
/// - `int` → `char`: low byte, wrapping
/// - `char` → `int`: sign extension
/// - array → array: same handle, element types must match
pub fn coerce(value: Value, target: &Type) -> Result<Value, Mismatch> {
    let converted = match (target, value) {
        (Type::Int, value @ Value::Int(_)) => value,
        (Type::Int, Value::Char(c)) => Value::Int(i64::from(c)),
        (Type::Int, Value::Float(x)) => Value::Int(x as i64),

        (Type::Float, value @ Value::Float(_)) => value,
        (Type::Float, Value::Int(n)) => Value::Float(n as f32),
        (Type::Float, Value::Char(c)) => Value::Float(f32::from(c)),

        (Type::Char, value @ Value::Char(_)) => value,
        (Type::Char, Value::Int(n)) => Value::Char(n as i8),
        (Type::Char, Value::Float(x)) => Value::Char((x as i64) as i8),

        (Type::Array(element, _), Value::Array(array)) if **element == *array.element_type() => {
            Value::Array(array)
        }

        (Type::Void, Value::Void) => Value::Void,

        (_, other) => return Err(Mismatch::new(target.to_string(), other.type_of().to_string())),
    };

    Ok(converted)
}

/// Condition value: nonzero scalars are true
pub fn truthy(value: &Value) -> Result<bool, Mismatch> {
    match value {
        Value::Int(n) => Ok(*n != 0),
        Value::Char(c) => Ok(*c != 0),
        Value::Float(x) => Ok(*x != 0.0),
        Value::Array(_) | Value::Void => Err(Mismatch::new(
            "scalar condition",
            value.type_of().to_string(),
        )),
    }
}

/// Integer view of an integral value (`char` is sign-extended)
pub fn as_integral(value: &Value) -> Option<i64> {
    match value {
        Value::Int(n) => Some(*n),
        Value::Char(c) => Some(i64::from(*c)),
        _ => None,
    }
}

/// Float view of any scalar
pub fn as_float(value: &Value) -> Option<f32> {
    match value {
        Value::Float(x) => Some(*x),
        Value::Int(n) => Some(*n as f32),
        Value::Char(c) => Some(f32::from(*c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::value::ArrayRef;
    use proptest::prelude::*;

    #[test]
    fn test_arithmetic_promotion() {
        assert_eq!(result_type(BinOp::Add, &Type::Int, &Type::Int), Ok(Type::Int));
        assert_eq!(result_type(BinOp::Add, &Type::Char, &Type::Char), Ok(Type::Int));
        assert_eq!(result_type(BinOp::Mul, &Type::Int, &Type::Float), Ok(Type::Float));
        assert_eq!(result_type(BinOp::Div, &Type::Char, &Type::Float), Ok(Type::Float));
    }

    #[test]
    fn test_comparisons_yield_int() {
        assert_eq!(result_type(BinOp::Lt, &Type::Float, &Type::Float), Ok(Type::Int));
        assert_eq!(result_type(BinOp::And, &Type::Float, &Type::Char), Ok(Type::Int));
    }

    #[test]
    fn test_modulo_requires_integral_operands() {
        assert!(result_type(BinOp::Mod, &Type::Int, &Type::Float).is_err());
        assert_eq!(result_type(BinOp::Mod, &Type::Char, &Type::Int), Ok(Type::Int));
    }

    #[test]
    fn test_arrays_and_void_rejected() {
        let array = Type::array_of(Type::Int, Some(3));
        assert!(result_type(BinOp::Add, &array, &Type::Int).is_err());
        assert!(result_type(BinOp::Eq, &Type::Void, &Type::Int).is_err());
    }

    #[test]
    fn test_float_to_int_truncates_toward_zero() {
        assert_eq!(coerce(Value::Float(3.9), &Type::Int), Ok(Value::Int(3)));
        assert_eq!(coerce(Value::Float(-3.9), &Type::Int), Ok(Value::Int(-3)));
    }

    #[test]
    fn test_int_to_char_keeps_low_byte() {
        assert_eq!(coerce(Value::Int(300), &Type::Char), Ok(Value::Char(44)));
        assert_eq!(coerce(Value::Int(-1), &Type::Char), Ok(Value::Char(-1)));
    }

    #[test]
    fn test_array_coercion_requires_matching_elements() {
        let ints = Value::Array(ArrayRef::new(Type::Int, vec![Value::Int(1)]));
        assert!(coerce(ints.clone(), &Type::array_of(Type::Int, None)).is_ok());
        assert!(coerce(ints.clone(), &Type::array_of(Type::Float, None)).is_err());
        assert!(coerce(ints, &Type::Int).is_err());
        assert!(coerce(Value::Int(1), &Type::array_of(Type::Int, None)).is_err());
    }

    #[test]
    fn test_void_only_coerces_to_void() {
        assert_eq!(coerce(Value::Void, &Type::Void), Ok(Value::Void));
        assert!(coerce(Value::Void, &Type::Int).is_err());
    }

    #[test]
    fn test_truthiness() {
        assert_eq!(truthy(&Value::Int(0)), Ok(false));
        assert_eq!(truthy(&Value::Char(1)), Ok(true));
        assert_eq!(truthy(&Value::Float(0.5)), Ok(true));
        assert!(truthy(&Value::Void).is_err());
    }

    proptest! {
        #[test]
        fn char_round_trips_through_int(c in any::<i8>()) {
            let widened = coerce(Value::Char(c), &Type::Int).unwrap();
            prop_assert_eq!(&widened, &Value::Int(i64::from(c)));
            prop_assert_eq!(coerce(widened, &Type::Char).unwrap(), Value::Char(c));
        }

        #[test]
        fn int_to_float_matches_cast(n in -16_777_216i64..16_777_216) {
            prop_assert_eq!(coerce(Value::Int(n), &Type::Float).unwrap(), Value::Float(n as f32));
        }

        #[test]
        fn float_to_int_never_exceeds_magnitude(x in -1.0e6f32..1.0e6) {
            let n = coerce(Value::Float(x), &Type::Int).unwrap().as_int().unwrap();
            prop_assert!((n as f32).abs() <= x.abs());
        }
    }
}
