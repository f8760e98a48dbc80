//! Expression parsing implementation
//!
//! This module handles parsing of C expressions with one method per
//! precedence level, lowest first.
//!
//! # Supported Expressions
//!
//! - Literals: integers, floats, characters, strings
//! - Identifiers and variables
//! - Binary operators: arithmetic, comparison, logical
//! - Unary operators: `-`, `+`, `!`, `++`, `--`
//! - Postfix: `[]`, `()`, `++`, `--`
//! - Ternary: `? :`
//! - Assignment: `=`, `+=`, `-=`, `*=`, `/=`, `%=`
//! - Type casts: `(type)expr`
//!
//! All binary levels are left-associative; assignment and the ternary
//! operator are right-associative.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{Parser, SyntaxError};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        self.nested(Self::parse_assignment)
    }

    /// Parse assignment or ternary (right-associative)
    fn parse_assignment(&mut self) -> Result<Expr, SyntaxError> {
        let expr = self.parse_ternary()?;

        let loc = self.current_location();
        let op = if self.match_token(&TokenKind::Eq) {
            None
        } else if self.match_token(&TokenKind::PlusEq) {
            Some(BinOp::Add)
        } else if self.match_token(&TokenKind::MinusEq) {
            Some(BinOp::Sub)
        } else if self.match_token(&TokenKind::StarEq) {
            Some(BinOp::Mul)
        } else if self.match_token(&TokenKind::SlashEq) {
            Some(BinOp::Div)
        } else if self.match_token(&TokenKind::PercentEq) {
            Some(BinOp::Mod)
        } else {
            return Ok(expr);
        };

        if !matches!(expr, Expr::Variable(..) | Expr::Index { .. }) {
            return Err(SyntaxError {
                message: "Invalid assignment target".to_string(),
                location: loc,
            });
        }

        let value = Box::new(self.nested(Self::parse_assignment)?);
        Ok(Expr::Assign {
            target: Box::new(expr),
            op,
            value,
            location: loc,
        })
    }

    /// Parse ternary: condition ? true_expr : false_expr
    fn parse_ternary(&mut self) -> Result<Expr, SyntaxError> {
        let expr = self.parse_logical_or()?;

        if self.match_token(&TokenKind::Question) {
            let loc = self.previous_location();
            let true_expr = Box::new(self.parse_expression()?);
            self.expect(&TokenKind::Colon, "in ternary expression")?;
            let false_expr = Box::new(self.nested(Self::parse_ternary)?);

            return Ok(Expr::Ternary {
                condition: Box::new(expr),
                true_expr,
                false_expr,
                location: loc,
            });
        }

        Ok(expr)
    }

    /// Parse logical OR (||)
    fn parse_logical_or(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_logical_and()?;

        while self.match_token(&TokenKind::OrOr) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_logical_and()?);
            left = Expr::Binary {
                op: BinOp::Or,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_equality()?;

        while self.match_token(&TokenKind::AndAnd) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_equality()?);
            left = Expr::Binary {
                op: BinOp::And,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse equality (== !=)
    fn parse_equality(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_relational()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&TokenKind::EqEq) {
                BinOp::Eq
            } else if self.match_token(&TokenKind::NotEq) {
                BinOp::Ne
            } else {
                break;
            };

            let right = Box::new(self.parse_relational()?);
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse relational (< <= > >=)
    fn parse_relational(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_additive()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&TokenKind::Lt) {
                BinOp::Lt
            } else if self.match_token(&TokenKind::Le) {
                BinOp::Le
            } else if self.match_token(&TokenKind::Gt) {
                BinOp::Gt
            } else if self.match_token(&TokenKind::Ge) {
                BinOp::Ge
            } else {
                break;
            };

            let right = Box::new(self.parse_additive()?);
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&TokenKind::Plus) {
                BinOp::Add
            } else if self.match_token(&TokenKind::Minus) {
                BinOp::Sub
            } else {
                break;
            };

            let right = Box::new(self.parse_multiplicative()?);
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse multiplicative (* / %)
    fn parse_multiplicative(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_cast()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&TokenKind::Star) {
                BinOp::Mul
            } else if self.match_token(&TokenKind::Slash) {
                BinOp::Div
            } else if self.match_token(&TokenKind::Percent) {
                BinOp::Mod
            } else {
                break;
            };

            let right = Box::new(self.parse_cast()?);
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse cast: (type)expr
    fn parse_cast(&mut self) -> Result<Expr, SyntaxError> {
        let is_cast = self.check(&TokenKind::LParen)
            && self
                .peek_ahead(1)
                .is_some_and(|token| token.kind.is_type_keyword());

        if !is_cast {
            return self.parse_unary();
        }

        let loc = self.current_location();
        self.advance(); // consume '('
        let target_type = self.parse_type()?;
        self.expect(&TokenKind::RParen, "after cast type")?;
        let expr = Box::new(self.nested(Self::parse_cast)?);

        Ok(Expr::Cast {
            target_type,
            expr,
            location: loc,
        })
    }

    /// Parse unary (! - + ++ --)
    fn parse_unary(&mut self) -> Result<Expr, SyntaxError> {
        let loc = self.current_location();

        let op = if self.match_token(&TokenKind::Bang) {
            UnOp::Not
        } else if self.match_token(&TokenKind::Minus) {
            UnOp::Neg
        } else if self.match_token(&TokenKind::PlusPlus) {
            UnOp::PreInc
        } else if self.match_token(&TokenKind::MinusMinus) {
            UnOp::PreDec
        } else if self.match_token(&TokenKind::Plus) {
            // Unary plus: just return the operand
            return self.nested(Self::parse_cast);
        } else {
            return self.parse_postfix();
        };

        let operand = Box::new(self.nested(Self::parse_cast)?);
        Ok(Expr::Unary {
            op,
            operand,
            location: loc,
        })
    }

    /// Parse postfix (++ -- [] ())
    fn parse_postfix(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.parse_primary()?;

        loop {
            let loc = self.current_location();

            if self.match_token(&TokenKind::PlusPlus) {
                expr = Expr::Unary {
                    op: UnOp::PostInc,
                    operand: Box::new(expr),
                    location: loc,
                };
            } else if self.match_token(&TokenKind::MinusMinus) {
                expr = Expr::Unary {
                    op: UnOp::PostDec,
                    operand: Box::new(expr),
                    location: loc,
                };
            } else if self.match_token(&TokenKind::LBracket) {
                let index = Box::new(self.parse_expression()?);
                self.expect(&TokenKind::RBracket, "after array index")?;
                expr = Expr::Index {
                    array: Box::new(expr),
                    index,
                    location: loc,
                };
            } else if self.check(&TokenKind::LParen) {
                // Only a bare identifier can be called
                let (name, name_loc) = match expr {
                    Expr::Variable(name, name_loc) => (name, name_loc),
                    _ => return Err(self.error_here("Function call must be on identifier")),
                };
                self.advance();
                let args = self.parse_argument_list()?;
                self.expect(&TokenKind::RParen, "after function arguments")?;

                expr = Expr::Call {
                    name,
                    args,
                    location: name_loc,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse argument list: (expr, expr, ...)
    fn parse_argument_list(&mut self) -> Result<Vec<Expr>, SyntaxError> {
        let mut args = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(args)
    }

    /// Parse primary (literals, variables, parenthesized expressions)
    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        let Token { kind, location } = self.peek();
        let location = *location;
        let expr = match kind {
            TokenKind::IntLiteral(n) => Expr::IntLiteral(*n, location),
            TokenKind::FloatLiteral(x) => Expr::FloatLiteral(*x, location),
            TokenKind::CharLiteral(c) => Expr::CharLiteral(*c, location),
            TokenKind::StringLiteral(s) => Expr::StringLiteral(s.clone(), location),
            TokenKind::Ident(name) => Expr::Variable(name.clone(), location),
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(&TokenKind::RParen, "after expression")?;
                return Ok(expr);
            }
            other => return Err(self.error_here(format!("Unexpected token: {}", other))),
        };

        self.advance();
        Ok(expr)
    }
}
