//! Declaration parsing implementation
//!
//! This module handles parsing of declarations in C programs:
//!
//! - Function definitions: `type name(params) { ... }`
//! - Variable declarations, both global and local: `int x = 1;`, `int arr[] = {1, 2};`
//! - Type parsing: base types and a single array dimension
//!
//! # Grammar
//!
//! ```text
//! top_level    ::= type identifier ( "(" params ")" block | var_rest )
//! var_rest     ::= array_suffix? ( "=" initializer )? ";"
//! array_suffix ::= "[" int_literal? "]"
//! initializer  ::= expression | "{" ( expression ( "," expression )* ","? )? "}"
//! type         ::= "int" | "float" | "char" | "void"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Parser, SyntaxError, TopLevel};

impl Parser {
    /// Parse a top-level declaration (function definition or global variable)
    pub(crate) fn parse_top_level_declaration(&mut self) -> Result<TopLevel, SyntaxError> {
        let base_type = self.parse_type()?;
        let name = self.expect_identifier()?;
        let loc = self.previous_location();

        if self.check(&TokenKind::LParen) {
            return self
                .parse_function_definition(base_type, name, loc)
                .map(TopLevel::Function);
        }

        self.parse_variable_rest(base_type, name, loc)
            .map(TopLevel::Global)
    }

    /// Parse the rest of a function definition after `type name`
    fn parse_function_definition(
        &mut self,
        return_type: Type,
        name: String,
        loc: SourceLocation,
    ) -> Result<FunctionDecl, SyntaxError> {
        self.expect(&TokenKind::LParen, "after function name")?;
        let params = self.parse_parameter_list()?;
        self.expect(&TokenKind::RParen, "after parameters")?;

        self.expect(&TokenKind::LBrace, "before function body")?;
        let body = self.parse_block_statements()?;
        self.expect(&TokenKind::RBrace, "after function body")?;

        Ok(FunctionDecl {
            name,
            params,
            return_type,
            body,
            location: loc,
        })
    }

    /// Parse parameter list: (type name, type name[], ...)
    pub(crate) fn parse_parameter_list(&mut self) -> Result<Vec<Param>, SyntaxError> {
        let mut params = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(params);
        }

        // (void) means no parameters in C
        if self.check(&TokenKind::Void) && self.check_ahead(1, &TokenKind::RParen) {
            self.advance();
            return Ok(params);
        }

        loop {
            let base_type = self.parse_type()?;
            let name = self.expect_identifier()?;
            let param_type = self.parse_array_suffix(base_type)?;
            params.push(Param { name, param_type });

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(params)
    }

    /// Parse a base type keyword
    pub(crate) fn parse_type(&mut self) -> Result<Type, SyntaxError> {
        let parsed = match self.peek().kind {
            TokenKind::Int => Type::Int,
            TokenKind::Float => Type::Float,
            TokenKind::Char => Type::Char,
            TokenKind::Void => Type::Void,
            _ => return Err(self.error_here(format!("Expected type, found {}", self.peek()))),
        };
        self.advance();
        Ok(parsed)
    }

    /// Parse an optional `[N]` or `[]` after a declarator name
    pub(crate) fn parse_array_suffix(&mut self, base_type: Type) -> Result<Type, SyntaxError> {
        if !self.match_token(&TokenKind::LBracket) {
            return Ok(base_type);
        }

        let len = match self.peek().kind {
            TokenKind::RBracket => None,
            TokenKind::IntLiteral(n) => {
                let n = usize::try_from(n)
                    .map_err(|_| self.error_here("Array size must not be negative"))?;
                self.advance();
                Some(n)
            }
            _ => return Err(self.error_here("Array size must be a constant integer")),
        };

        self.expect(&TokenKind::RBracket, "after array size")?;

        if self.check(&TokenKind::LBracket) {
            return Err(self.error_here("Multi-dimensional arrays are not supported"));
        }

        Ok(Type::array_of(base_type, len))
    }

    /// Parse variable declaration: type name[[size]] [= init];
    pub(crate) fn parse_variable_declaration(&mut self) -> Result<VarDecl, SyntaxError> {
        let base_type = self.parse_type()?;
        let name = self.expect_identifier()?;
        let loc = self.previous_location();
        self.parse_variable_rest(base_type, name, loc)
    }

    /// Parse the rest of a variable declaration after `type name`
    fn parse_variable_rest(
        &mut self,
        base_type: Type,
        name: String,
        loc: SourceLocation,
    ) -> Result<VarDecl, SyntaxError> {
        let var_type = self.parse_array_suffix(base_type)?;

        let init = if self.match_token(&TokenKind::Eq) {
            Some(self.parse_initializer()?)
        } else {
            None
        };

        self.expect(&TokenKind::Semicolon, "after variable declaration")?;

        Ok(VarDecl {
            name,
            var_type,
            init,
            location: loc,
        })
    }

    /// Parse an initializer: an expression or a brace list
    fn parse_initializer(&mut self) -> Result<Initializer, SyntaxError> {
        if !self.match_token(&TokenKind::LBrace) {
            return Ok(Initializer::Expr(self.parse_expression()?));
        }

        let loc = self.previous_location();
        let mut elements = Vec::new();

        while !self.check(&TokenKind::RBrace) {
            elements.push(self.parse_expression()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBrace, "after initializer list")?;
        Ok(Initializer::List(elements, loc))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    fn first_statement(body: &str) -> Stmt {
        let source = format!("int main() {{ {} }}", body);
        let mut program = Parser::new(&source).unwrap().parse_program().unwrap();
        program.functions.remove(0).body.remove(0)
    }

    #[test]
    fn test_array_with_initializer_list() {
        match first_statement("int numbers[] = {1, 2, 3, 4, 5};") {
            Stmt::VarDecl(VarDecl {
                name,
                var_type,
                init: Some(Initializer::List(elements, _)),
                ..
            }) => {
                assert_eq!(name, "numbers");
                assert_eq!(var_type, Type::array_of(Type::Int, None));
                assert_eq!(elements.len(), 5);
            }
            other => panic!("Expected array declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_sized_array_without_initializer() {
        match first_statement("float samples[8];") {
            Stmt::VarDecl(decl) => {
                assert_eq!(decl.var_type, Type::array_of(Type::Float, Some(8)));
                assert!(decl.init.is_none());
            }
            other => panic!("Expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_comma_in_initializer() {
        match first_statement("int a[] = {1, 2,};") {
            Stmt::VarDecl(VarDecl {
                init: Some(Initializer::List(elements, _)),
                ..
            }) => assert_eq!(elements.len(), 2),
            other => panic!("Expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_multi_dimensional_rejected() {
        let err = Parser::new("int main() { int grid[2][2]; }")
            .unwrap()
            .parse_program()
            .unwrap_err();
        assert!(err.message.contains("Multi-dimensional"));
    }

    #[test]
    fn test_non_constant_array_size_rejected() {
        let err = Parser::new("int main() { int n = 3; int a[n]; }")
            .unwrap()
            .parse_program()
            .unwrap_err();
        assert!(err.message.contains("constant"));
    }
}
