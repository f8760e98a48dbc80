//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents all possible runtime values
//! in the C interpreter. Values are tagged with their type.
//!
//! # Value Types
//!
//! - [`Value::Int`]: 64-bit signed integer
//! - [`Value::Float`]: IEEE-754 single precision float
//! - [`Value::Char`]: 8-bit signed character
//! - [`Value::Array`]: Shared handle to a fixed-length array
//! - [`Value::Void`]: Result of a `void` function
//!
//! # Aliasing
//!
//! Scalars are copied on assignment. Arrays are not: cloning a
//! [`Value::Array`] clones the [`ArrayRef`] handle, so a callee receiving an
//! array argument reads and writes the caller's storage.

use crate::parser::ast::Type;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Runtime values in the interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f32),
    Char(i8),
    Array(ArrayRef),
    Void,
}

impl Value {
    /// The runtime type of this value; arrays report their current length
    pub fn type_of(&self) -> Type {
        match self {
            Value::Int(_) => Type::Int,
            Value::Float(_) => Type::Float,
            Value::Char(_) => Type::Char,
            Value::Array(array) => Type::array_of(array.element_type().clone(), Some(array.len())),
            Value::Void => Type::Void,
        }
    }

    /// Zero value of a scalar type, used for declarations without an initializer.
    ///
    /// Arrays have no single zero value; their storage is built per declaration.
    pub fn zero_of(ty: &Type) -> Option<Value> {
        match ty {
            Type::Int => Some(Value::Int(0)),
            Type::Float => Some(Value::Float(0.0)),
            Type::Char => Some(Value::Char(0)),
            Type::Void => Some(Value::Void),
            Type::Array(..) => None,
        }
    }

    /// Get the integer value, returns None if not an Int
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Char(c) => write!(f, "'{}'", (*c as u8).escape_ascii()),
            Value::Array(array) => {
                write!(f, "{{")?;
                for (i, element) in array.elements().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "}}")
            }
            Value::Void => write!(f, "void"),
        }
    }
}

/// Shared, fixed-length array storage
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayRef {
    element_type: Type,
    elements: Rc<RefCell<Vec<Value>>>,
}

impl ArrayRef {
    pub fn new(element_type: Type, elements: Vec<Value>) -> Self {
        ArrayRef {
            element_type,
            elements: Rc::new(RefCell::new(elements)),
        }
    }

    pub fn element_type(&self) -> &Type {
        &self.element_type
    }

    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`, or `None` when out of bounds
    pub fn get(&self, index: usize) -> Option<Value> {
        self.elements.borrow().get(index).cloned()
    }

    /// Store at `index`; returns false when out of bounds
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.elements.borrow_mut().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Snapshot of the current elements
    pub fn elements(&self) -> Vec<Value> {
        self.elements.borrow().clone()
    }

    /// True when both handles refer to the same storage
    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Rc::ptr_eq(&self.elements, &other.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values() {
        assert_eq!(Value::zero_of(&Type::Int), Some(Value::Int(0)));
        assert_eq!(Value::zero_of(&Type::Float), Some(Value::Float(0.0)));
        assert_eq!(Value::zero_of(&Type::Char), Some(Value::Char(0)));
        assert_eq!(Value::zero_of(&Type::array_of(Type::Int, None)), None);
        assert_eq!(Value::zero_of(&Type::array_of(Type::Float, Some(3))), None);
    }

    #[test]
    fn test_cloned_array_aliases_storage() {
        let original = ArrayRef::new(Type::Int, vec![Value::Int(1), Value::Int(2)]);
        let alias = Value::Array(original.clone());

        assert!(original.set(1, Value::Int(9)));
        assert_eq!(alias.as_array().unwrap().get(1), Some(Value::Int(9)));
        assert!(alias.as_array().unwrap().ptr_eq(&original));
    }

    #[test]
    fn test_out_of_bounds_access() {
        let array = ArrayRef::new(Type::Char, vec![Value::Char(65)]);
        assert_eq!(array.get(1), None);
        assert!(!array.set(5, Value::Char(0)));
    }

    #[test]
    fn test_display() {
        let array = ArrayRef::new(Type::Int, vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(Value::Array(array).to_string(), "{1, 2}");
        assert_eq!(Value::Char(b'A' as i8).to_string(), "'A'");
    }
}
