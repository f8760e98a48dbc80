// Execution engine for the C interpreter

use crate::interpreter::constants::{
    DEFAULT_ENTRY_POINT, DEFAULT_MAX_CALL_DEPTH, STACK_GROW_SIZE, STACK_RED_ZONE,
};
use crate::interpreter::errors::{RuntimeError, Site, GLOBAL_SITE};
use crate::interpreter::type_system::coerce;
use crate::memory::{env::Environment, value::Value};
use crate::output::{CaptureSink, Sink};
use crate::parser::ast::*;
use rustc_hash::FxHashMap;
use std::rc::Rc;
use tracing::debug;

/// Interpreter settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Function executed by [`Interpreter::run`]
    pub entry_point: String,
    /// Nested calls allowed before `StackOverflow`
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// How a statement finished
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

/// The main interpreter that executes a C program
pub struct Interpreter<S: Sink = CaptureSink> {
    /// Function definitions (name -> FunctionDecl)
    functions: FxHashMap<String, Rc<FunctionDecl>>,

    /// Globals and the call stack
    pub(crate) env: Environment,

    /// Destination of printf output
    pub(crate) sink: S,

    config: InterpreterConfig,
}

impl Interpreter<CaptureSink> {
    /// Create a new interpreter that captures output in memory
    pub fn new(program: Program) -> Result<Self, RuntimeError> {
        Self::with_sink(program, CaptureSink::new())
    }
}

impl<S: Sink> Interpreter<S> {
    pub fn with_sink(program: Program, sink: S) -> Result<Self, RuntimeError> {
        Self::with_config(program, sink, InterpreterConfig::default())
    }

    /// Index the functions and initialize globals in declaration order
    pub fn with_config(
        program: Program,
        sink: S,
        config: InterpreterConfig,
    ) -> Result<Self, RuntimeError> {
        let mut functions = FxHashMap::default();

        for function in program.functions {
            if functions.contains_key(&function.name) {
                return Err(RuntimeError::DuplicateDeclaration {
                    name: function.name.clone(),
                    site: Site::new(GLOBAL_SITE, function.location),
                });
            }
            functions.insert(function.name.clone(), Rc::new(function));
        }

        let mut interpreter = Interpreter {
            functions,
            env: Environment::new(config.max_call_depth),
            sink,
            config,
        };

        for global in &program.globals {
            debug!(name = %global.name, ty = %global.var_type, "initializing global");
            interpreter.execute_declaration(global)?;
        }

        Ok(interpreter)
    }

    /// Run the configured entry point and return its result as an exit status
    pub fn run(&mut self) -> Result<i64, RuntimeError> {
        let entry = self.config.entry_point.clone();
        match self.evaluate(&entry, Vec::new())? {
            Value::Int(status) => Ok(status),
            Value::Char(status) => Ok(i64::from(status)),
            Value::Void => Ok(0),
            other => Err(RuntimeError::TypeMismatch {
                expected: "int".to_string(),
                found: other.type_of().to_string(),
                site: self.entry_site(&entry),
            }),
        }
    }

    /// Call `name` with already evaluated arguments
    pub fn evaluate(&mut self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let function = self.lookup_function(name, SourceLocation::default())?;
        if args.len() != function.params.len() {
            return Err(RuntimeError::ArityMismatch {
                function: name.to_string(),
                expected: function.params.len(),
                found: args.len(),
                site: self.entry_site(name),
            });
        }
        self.invoke(&function, args, function.location)
    }

    fn entry_site(&self, name: &str) -> Site {
        let location = self
            .functions
            .get(name)
            .map_or_else(SourceLocation::default, |f| f.location);
        Site::new(GLOBAL_SITE, location)
    }

    pub(crate) fn lookup_function(
        &self,
        name: &str,
        location: SourceLocation,
    ) -> Result<Rc<FunctionDecl>, RuntimeError> {
        self.functions
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedFunction {
                name: name.to_string(),
                site: self.env.site(location),
            })
    }

    /// Push a frame, bind the parameters, run the body and pop the frame
    pub(crate) fn invoke(
        &mut self,
        function: &FunctionDecl,
        args: Vec<Value>,
        call_site: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.invoke_inner(function, args, call_site)
        })
    }

    fn invoke_inner(
        &mut self,
        function: &FunctionDecl,
        args: Vec<Value>,
        call_site: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        // Arguments are converted in the caller's context
        let mut bound = Vec::with_capacity(args.len());
        for (param, arg) in function.params.iter().zip(args) {
            let value = coerce(arg, &param.param_type)
                .map_err(|m| m.at(self.env.site(call_site)))?;
            bound.push(value);
        }

        self.env.enter_call(&function.name, call_site)?;
        debug!(function = %function.name, depth = self.env.depth(), "enter call");

        let result = self.run_body(function, bound);
        let returned = self.env.exit_call();

        debug!(function = %function.name, depth = self.env.depth(), "exit call");
        result?;

        match returned {
            Some(value) => Ok(value),
            None if function.return_type == Type::Void => Ok(Value::Void),
            None => Err(RuntimeError::MissingReturn {
                function: function.name.clone(),
                site: Site::new(&function.name, function.location),
            }),
        }
    }

    fn run_body(&mut self, function: &FunctionDecl, args: Vec<Value>) -> Result<(), RuntimeError> {
        for (param, value) in function.params.iter().zip(args) {
            self.env
                .declare(&param.name, param.param_type.clone(), value, function.location)?;
        }

        match self.execute_statements(&function.body)? {
            Flow::Normal => Ok(()),
            Flow::Return(value) => {
                self.env.set_return_value(value);
                Ok(())
            }
            Flow::Break => Err(self.invalid_jump("break", function)),
            Flow::Continue => Err(self.invalid_jump("continue", function)),
        }
    }

    fn invalid_jump(&self, statement: &'static str, function: &FunctionDecl) -> RuntimeError {
        RuntimeError::InvalidJump {
            statement,
            site: self.env.site(function.location),
        }
    }

    /// Declared return type of the executing function
    pub(crate) fn current_return_type(&self) -> Type {
        self.functions
            .get(self.env.current_function())
            .map_or(Type::Void, |f| f.return_type.clone())
    }

    // ===== Accessors =====

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}
