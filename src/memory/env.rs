//! Variable environment and call stack
//!
//! This module provides name resolution for the evaluator:
//! - [`Environment`]: The global scope plus the stack of call frames
//! - [`CallFrame`]: A single function's activation record
//! - [`Scope`]: One block's bindings
//! - [`Slot`]: A binding's current value and declared type
//!
//! # Resolution
//!
//! A name resolves against the current frame's block scopes, innermost first,
//! then against the global scope. A callee never sees its caller's locals.
//! Declarations only conflict with names in the innermost scope, so a nested
//! block may shadow an outer binding.

use super::value::Value;
use crate::interpreter::errors::{RuntimeError, Site, GLOBAL_SITE};
use crate::parser::ast::{SourceLocation, Type};
use rustc_hash::FxHashMap;

/// A variable binding
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub value: Value,
    pub declared_type: Type,
}

/// Name → slot map for one block
#[derive(Debug, Clone, Default)]
pub struct Scope {
    slots: FxHashMap<String, Slot>,
}

impl Scope {
    pub fn get(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }
}

/// Stack frame for a function call
#[derive(Debug, Clone)]
pub struct CallFrame {
    pub function: String,
    pub return_value: Option<Value>,
    scopes: Vec<Scope>,
}

impl CallFrame {
    fn new(function: String) -> Self {
        CallFrame {
            function,
            return_value: None,
            scopes: vec![Scope::default()],
        }
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut Slot> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.slots.get_mut(name))
    }
}

/// Global bindings plus the call stack
#[derive(Debug, Clone)]
pub struct Environment {
    globals: Scope,
    frames: Vec<CallFrame>,
    max_depth: usize,
}

impl Environment {
    pub fn new(max_depth: usize) -> Self {
        Environment {
            globals: Scope::default(),
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Name of the executing function, or the global marker outside any call
    pub fn current_function(&self) -> &str {
        self.frames
            .last()
            .map_or(GLOBAL_SITE, |frame| frame.function.as_str())
    }

    /// Error site at `location` within the executing function
    pub fn site(&self, location: SourceLocation) -> Site {
        Site::new(self.current_function(), location)
    }

    /// Get the depth of the call stack
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn globals(&self) -> &Scope {
        &self.globals
    }

    /// Bind `name` in the innermost scope (the global scope outside any call)
    pub fn declare(
        &mut self,
        name: &str,
        declared_type: Type,
        value: Value,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let site = self.site(location);
        let scope = match self.frames.last_mut() {
            Some(frame) => match frame.scopes.last_mut() {
                Some(scope) => scope,
                None => &mut self.globals,
            },
            None => &mut self.globals,
        };

        if scope.contains(name) {
            return Err(RuntimeError::DuplicateDeclaration {
                name: name.to_string(),
                site,
            });
        }

        scope.slots.insert(
            name.to_string(),
            Slot {
                value,
                declared_type,
            },
        );
        Ok(())
    }

    /// Resolve `name`, innermost scope first
    pub fn lookup(&self, name: &str, location: SourceLocation) -> Result<&Slot, RuntimeError> {
        let local = self
            .frames
            .last()
            .and_then(|frame| frame.scopes.iter().rev().find_map(|scope| scope.get(name)));

        local
            .or_else(|| self.globals.get(name))
            .ok_or_else(|| self.undefined(name, location))
    }

    /// Overwrite the value bound to `name`
    pub fn assign(
        &mut self,
        name: &str,
        value: Value,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        if let Some(slot) = self.slot_mut(name) {
            slot.value = value;
            return Ok(());
        }
        Err(self.undefined(name, location))
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Slot> {
        if let Some(slot) = self.frames.last_mut().and_then(|frame| frame.find_mut(name)) {
            return Some(slot);
        }
        self.globals.slots.get_mut(name)
    }

    fn undefined(&self, name: &str, location: SourceLocation) -> RuntimeError {
        RuntimeError::UndefinedIdentifier {
            name: name.to_string(),
            site: self.site(location),
        }
    }

    /// Push a frame for `function`, called from `call_site`
    pub fn enter_call(&mut self, function: &str, call_site: SourceLocation) -> Result<(), RuntimeError> {
        if self.frames.len() >= self.max_depth {
            return Err(RuntimeError::StackOverflow {
                limit: self.max_depth,
                site: self.site(call_site),
            });
        }
        self.frames
            .push(CallFrame::new(function.to_string()));
        Ok(())
    }

    /// Pop the top frame, discarding its bindings; yields its return slot
    pub fn exit_call(&mut self) -> Option<Value> {
        self.frames.pop().and_then(|frame| frame.return_value)
    }

    /// Record the value the current call returns
    pub fn set_return_value(&mut self, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.return_value = Some(value);
        }
    }

    /// Enter a new block scope
    pub fn enter_block(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.scopes.push(Scope::default());
        }
    }

    /// Exit the current block scope, dropping its bindings
    pub fn exit_block(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            if frame.scopes.len() > 1 {
                frame.scopes.pop();
            }
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(crate::interpreter::constants::DEFAULT_MAX_CALL_DEPTH)
    }
}
