//! Statement parsing implementation
//!
//! This module handles parsing of all C statement types:
//!
//! - Variable declarations: `int x = 42;`
//! - Control flow: `if`/`else if`/`else`, `while`, `for`, `do-while`
//! - Jump statements: `return`, `break`, `continue`
//! - Compound statements: `{ ... }`
//! - Expression statements: function calls, assignments, increments
//!
//! # Grammar
//!
//! ```text
//! statement ::= var_decl | if_stmt | while_stmt | for_stmt
//!             | do_while_stmt | return_stmt | break_stmt
//!             | continue_stmt | block | expr_stmt | ";"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Parser, SyntaxError};

impl Parser {
    /// Parse block statements (inside braces, excluding the braces themselves)
    pub(crate) fn parse_block_statements(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        let mut statements = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.nested(Self::parse_statement_inner)
    }

    fn parse_statement_inner(&mut self) -> Result<Stmt, SyntaxError> {
        let loc = self.current_location();

        if self.match_token(&TokenKind::Return) {
            return self.parse_return_statement();
        }

        if self.match_token(&TokenKind::If) {
            return self.parse_if_statement();
        }

        if self.match_token(&TokenKind::While) {
            return self.parse_while_statement();
        }

        if self.match_token(&TokenKind::Do) {
            return self.parse_do_while_statement();
        }

        if self.match_token(&TokenKind::For) {
            return self.parse_for_statement();
        }

        if self.match_token(&TokenKind::Break) {
            self.expect(&TokenKind::Semicolon, "after 'break'")?;
            return Ok(Stmt::Break { location: loc });
        }

        if self.match_token(&TokenKind::Continue) {
            self.expect(&TokenKind::Semicolon, "after 'continue'")?;
            return Ok(Stmt::Continue { location: loc });
        }

        if self.match_token(&TokenKind::LBrace) {
            let statements = self.parse_block_statements()?;
            self.expect(&TokenKind::RBrace, "after block")?;
            return Ok(Stmt::Block {
                statements,
                location: loc,
            });
        }

        if self.match_token(&TokenKind::Semicolon) {
            return Ok(Stmt::Empty { location: loc });
        }

        if self.is_type_keyword() {
            return self.parse_variable_declaration().map(Stmt::VarDecl);
        }

        let expr = self.parse_expression()?;
        self.expect(&TokenKind::Semicolon, "after expression")?;
        Ok(Stmt::Expression {
            expr,
            location: loc,
        })
    }

    /// Parse return statement
    fn parse_return_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let loc = self.previous_location();

        let expr = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect(&TokenKind::Semicolon, "after return")?;

        Ok(Stmt::Return {
            expr,
            location: loc,
        })
    }

    /// Parse if statement; `else if` chains nest in the else branch
    fn parse_if_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let loc = self.previous_location();

        self.expect(&TokenKind::LParen, "after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::RParen, "after if condition")?;

        let then_branch = self.parse_statement_or_block()?;

        let else_branch = if self.match_token(&TokenKind::Else) {
            Some(self.parse_statement_or_block()?)
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            location: loc,
        })
    }

    /// Parse while statement
    fn parse_while_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let loc = self.previous_location();

        self.expect(&TokenKind::LParen, "after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::RParen, "after while condition")?;

        let body = self.parse_statement_or_block()?;

        Ok(Stmt::While {
            condition,
            body,
            location: loc,
        })
    }

    /// Parse do-while statement
    fn parse_do_while_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let loc = self.previous_location();

        let body = self.parse_statement_or_block()?;

        self.expect(&TokenKind::While, "after do body")?;
        self.expect(&TokenKind::LParen, "after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::RParen, "after do-while condition")?;
        self.expect(&TokenKind::Semicolon, "after do-while")?;

        Ok(Stmt::DoWhile {
            body,
            condition,
            location: loc,
        })
    }

    /// Parse for statement
    fn parse_for_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let loc = self.previous_location();

        self.expect(&TokenKind::LParen, "after 'for'")?;

        let init = if self.match_token(&TokenKind::Semicolon) {
            None
        } else if self.is_type_keyword() {
            // The declaration consumes its own semicolon
            Some(Box::new(Stmt::VarDecl(self.parse_variable_declaration()?)))
        } else {
            let init_loc = self.current_location();
            let expr = self.parse_expression()?;
            self.expect(&TokenKind::Semicolon, "after for init")?;
            Some(Box::new(Stmt::Expression {
                expr,
                location: init_loc,
            }))
        };

        let condition = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon, "after for condition")?;

        let step = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::RParen, "after for clauses")?;

        let body = self.parse_statement_or_block()?;

        Ok(Stmt::For {
            init,
            condition,
            step,
            body,
            location: loc,
        })
    }

    /// Parse statement or block (for if/while/for bodies)
    pub(crate) fn parse_statement_or_block(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        if self.match_token(&TokenKind::LBrace) {
            let statements = self.parse_block_statements()?;
            self.expect(&TokenKind::RBrace, "after block")?;
            Ok(statements)
        } else {
            Ok(vec![self.parse_statement()?])
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    fn parse_body(body: &str) -> Vec<Stmt> {
        let source = format!("int main() {{ {} }}", body);
        let mut program = Parser::new(&source).unwrap().parse_program().unwrap();
        program.functions.remove(0).body
    }

    #[test]
    fn test_else_if_chain_nests() {
        let body = parse_body(
            "if (op == '+') { r = 1; } else if (op == '-') { r = 2; } else { r = 3; }",
        );

        let Stmt::If { else_branch, .. } = &body[0] else {
            panic!("Expected if statement");
        };
        let else_branch = else_branch.as_ref().expect("else branch");
        assert_eq!(else_branch.len(), 1);
        match &else_branch[0] {
            Stmt::If { else_branch, .. } => assert!(else_branch.is_some()),
            other => panic!("Expected nested if, got {:?}", other),
        }
    }

    #[test]
    fn test_for_with_declaration() {
        let body = parse_body("for (int i = 0; i < size; i++) { total += arr[i]; }");

        match &body[0] {
            Stmt::For {
                init: Some(init),
                condition: Some(_),
                step: Some(Expr::Unary { op: UnOp::PostInc, .. }),
                body,
                ..
            } => {
                assert!(matches!(**init, Stmt::VarDecl(_)));
                assert_eq!(body.len(), 1);
            }
            other => panic!("Expected for loop, got {:?}", other),
        }
    }

    #[test]
    fn test_for_with_empty_clauses() {
        let body = parse_body("for (;;) { break; }");
        assert!(matches!(
            &body[0],
            Stmt::For {
                init: None,
                condition: None,
                step: None,
                ..
            }
        ));
    }

    #[test]
    fn test_do_while() {
        let body = parse_body("int i = 0; do { i++; } while (i < 3);");
        assert!(matches!(body[1], Stmt::DoWhile { .. }));
    }

    #[test]
    fn test_bare_return() {
        let body = parse_body("return;");
        assert!(matches!(body[0], Stmt::Return { expr: None, .. }));
    }
}
