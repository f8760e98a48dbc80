//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: Parsing function and global variable declarations, types
//! - `statements`: Parsing statements (if, while, for, etc.)
//! - `expressions`: Parsing expressions, one method per precedence level
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::interpreter::constants::{STACK_GROW_SIZE, STACK_RED_ZONE};
use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use thiserror::Error;

/// Deepest nesting of statements and subexpressions the parser accepts
pub const MAX_NESTING_DEPTH: usize = 256;

/// Malformed input, reported at the offending token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Syntax error at {location}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub location: SourceLocation,
}

impl From<LexError> for SyntaxError {
    fn from(err: LexError) -> Self {
        SyntaxError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for the C subset
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, SyntaxError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            depth: 0,
        })
    }

    /// Parse the entire program (top-level declarations)
    pub fn parse_program(&mut self) -> Result<Program, SyntaxError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            match self.parse_top_level_declaration()? {
                TopLevel::Function(function) => program.functions.push(function),
                TopLevel::Global(decl) => program.globals.push(decl),
            }
        }

        Ok(program)
    }

    // ===== Helper methods =====

    /// Run one level of recursive parsing, bounded by [`MAX_NESTING_DEPTH`]
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error_here(format!(
                "Nesting deeper than {} levels",
                MAX_NESTING_DEPTH
            )));
        }

        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || parse(self));
        self.depth -= 1;
        result
    }

    pub(crate) fn is_type_keyword(&self) -> bool {
        self.peek().kind.is_type_keyword()
    }

    /// Consume the current token if it is a `kind`
    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Whether the current token is a `kind`; literal payloads are ignored
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn check_ahead(&self, n: usize, kind: &TokenKind) -> bool {
        self.peek_ahead(n)
            .is_some_and(|token| std::mem::discriminant(&token.kind) == std::mem::discriminant(kind))
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub(crate) fn peek(&self) -> &Token {
        // The lexer always ends the stream with Eof and `advance` never moves past it
        &self.tokens[self.position]
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location
    }

    pub(crate) fn error_here(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            message: message.into(),
            location: self.current_location(),
        }
    }

    /// Consume a `kind` token or fail with "Expected '<kind>' <context>"
    pub(crate) fn expect(&mut self, kind: &TokenKind, context: &str) -> Result<(), SyntaxError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_here(format!(
                "Expected {} {}, found {}",
                kind,
                context,
                self.peek()
            )))
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, SyntaxError> {
        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error_here(format!("Expected identifier, found {}", self.peek())))
        }
    }
}

/// One parsed top-level item
pub(crate) enum TopLevel {
    Function(FunctionDecl),
    Global(VarDecl),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        Parser::new(source).unwrap().parse_program().unwrap()
    }

    #[test]
    fn test_parse_simple_function() {
        let program = parse("int main() { return 0; }");

        assert_eq!(program.functions.len(), 1);
        let main = &program.functions[0];
        assert_eq!(main.name, "main");
        assert!(main.params.is_empty());
        assert_eq!(main.return_type, Type::Int);
        assert_eq!(main.body.len(), 1);
    }

    #[test]
    fn test_parse_params_and_types() {
        let program = parse("float calculate(int x, float y, char op) { return x + y; }");
        let function = &program.functions[0];

        assert_eq!(function.return_type, Type::Float);
        let types: Vec<&Type> = function.params.iter().map(|p| &p.param_type).collect();
        assert_eq!(types, vec![&Type::Int, &Type::Float, &Type::Char]);
    }

    #[test]
    fn test_parse_array_param() {
        let program = parse("int sumArray(int arr[], int size) { return 0; }");
        let param = &program.functions[0].params[0];

        assert_eq!(param.name, "arr");
        assert_eq!(param.param_type, Type::array_of(Type::Int, None));
    }

    #[test]
    fn test_parse_void_param_list() {
        let program = parse("void printMessage(void) { }");
        assert!(program.functions[0].params.is_empty());
        assert_eq!(program.functions[0].return_type, Type::Void);
    }

    #[test]
    fn test_parse_global() {
        let program = parse("int counter = 3;\nint main() { return counter; }");

        assert_eq!(program.globals.len(), 1);
        assert_eq!(program.globals[0].name, "counter");
        assert_eq!(program.functions.len(), 1);
    }

    #[test]
    fn test_error_carries_position() {
        let err = Parser::new("int main() {\n  return 0\n}")
            .unwrap()
            .parse_program()
            .unwrap_err();

        assert_eq!(err.location, SourceLocation::new(3, 1));
        assert!(err.message.contains("';'"));
    }

    #[test]
    fn test_lex_error_becomes_syntax_error() {
        let err = Parser::new("int main() { return 0 @ 1; }").err().unwrap();
        assert_eq!(err.location, SourceLocation::new(1, 23));
    }

    #[test]
    fn test_deep_nesting_rejected() {
        let parens = format!("int main() {{ return {}1{}; }}", "(".repeat(100_000), ")".repeat(100_000));
        let err = Parser::new(&parens).unwrap().parse_program().unwrap_err();
        assert!(err.message.contains("Nesting"), "{}", err.message);

        let negations = format!("int main() {{ return {}1; }}", "!".repeat(100_000));
        let err = Parser::new(&negations).unwrap().parse_program().unwrap_err();
        assert!(err.message.contains("Nesting"), "{}", err.message);

        let blocks = format!("int main() {{ {}{} return 0; }}", "{".repeat(100_000), "}".repeat(100_000));
        let err = Parser::new(&blocks).unwrap().parse_program().unwrap_err();
        assert!(err.message.contains("Nesting"), "{}", err.message);
    }

    #[test]
    fn test_moderate_nesting_accepted() {
        let source = format!("int main() {{ return {}1{}; }}", "(".repeat(50), ")".repeat(50));
        let program = parse(&source);
        assert_eq!(program.functions.len(), 1);
    }
}
