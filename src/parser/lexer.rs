//! Lexer (tokenizer) for C source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! `#include` and other preprocessor directives are silently skipped rather than
//! parsed, matching the interpreter's no-preprocessor policy.
//!
//! Escape sequences in string and character literals are decoded here, so a
//! [`TokenKind::StringLiteral`] holds the exact bytes the program will print.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// What a token is, independent of where it appears
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    IntLiteral(i64),
    FloatLiteral(f32),
    CharLiteral(i8),
    StringLiteral(Vec<u8>),

    Ident(String),

    // Keywords
    Int,
    Float,
    Char,
    Void,
    If,
    Else,
    While,
    Do,
    For,
    Break,
    Continue,
    Return,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Bang,
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    PlusPlus,
    MinusMinus,
    Question,
    Colon,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,

    Eof,
}

/// Operator and punctuation spellings, two-character forms first so the
/// scan always takes the longest match
const SYMBOLS: &[(&str, TokenKind)] = &[
    ("++", TokenKind::PlusPlus),
    ("--", TokenKind::MinusMinus),
    ("+=", TokenKind::PlusEq),
    ("-=", TokenKind::MinusEq),
    ("*=", TokenKind::StarEq),
    ("/=", TokenKind::SlashEq),
    ("%=", TokenKind::PercentEq),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::NotEq),
    ("<=", TokenKind::Le),
    (">=", TokenKind::Ge),
    ("&&", TokenKind::AndAnd),
    ("||", TokenKind::OrOr),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
    ("!", TokenKind::Bang),
    ("=", TokenKind::Eq),
    ("?", TokenKind::Question),
    (":", TokenKind::Colon),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
];

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("int", TokenKind::Int),
    ("float", TokenKind::Float),
    ("char", TokenKind::Char),
    ("void", TokenKind::Void),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("while", TokenKind::While),
    ("do", TokenKind::Do),
    ("for", TokenKind::For),
    ("break", TokenKind::Break),
    ("continue", TokenKind::Continue),
    ("return", TokenKind::Return),
];

impl TokenKind {
    /// Source spelling of keywords, operators and punctuation
    pub fn spelling(&self) -> Option<&'static str> {
        SYMBOLS
            .iter()
            .chain(KEYWORDS)
            .find(|(_, kind)| kind == self)
            .map(|(text, _)| *text)
    }

    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::Float | TokenKind::Char | TokenKind::Void
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::IntLiteral(n) => write!(f, "int literal {}", n),
            TokenKind::FloatLiteral(x) => write!(f, "float literal {}", x),
            TokenKind::CharLiteral(c) => {
                write!(f, "char literal '{}'", (*c as u8).escape_ascii())
            }
            TokenKind::StringLiteral(s) => write!(f, "string literal \"{}\"", s.escape_ascii()),
            TokenKind::Ident(name) => write!(f, "identifier '{}'", name),
            TokenKind::Eof => write!(f, "end of file"),
            other => match other.spelling() {
                Some(text) => write!(f, "'{}'", text),
                None => write!(f, "{:?}", other),
            },
        }
    }
}

/// A token and the position of its first character
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, location: SourceLocation) -> Self {
        Token { kind, location }
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at {location}: {message}")]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl LexError {
    fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        LexError {
            message: message.into(),
            location,
        }
    }
}

/// Lexer for C source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input; the last token is always [`TokenKind::Eof`]
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_trivia()?;

            let location = self.current_location();
            let Some(ch) = self.peek() else {
                tokens.push(Token::new(TokenKind::Eof, location));
                return Ok(tokens);
            };

            if ch == '#' {
                // Preprocessor directives run to the end of the line
                self.skip_line();
                continue;
            }

            let kind = self.scan(ch, location)?;
            tokens.push(Token::new(kind, location));
        }
    }

    fn scan(&mut self, ch: char, location: SourceLocation) -> Result<TokenKind, LexError> {
        match ch {
            '"' => {
                self.advance();
                self.string_literal(location)
            }
            '\'' => {
                self.advance();
                self.char_literal(location)
            }
            c if c.is_ascii_digit() => self.number_literal(location),
            '.' if self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.number_literal(location)
            }
            c if c.is_ascii_alphabetic() || c == '_' => Ok(self.word()),
            _ => self.symbol(location),
        }
    }

    /// Longest operator or punctuation spelled at the current position
    fn symbol(&mut self, location: SourceLocation) -> Result<TokenKind, LexError> {
        for (text, kind) in SYMBOLS {
            let matched = text
                .chars()
                .enumerate()
                .all(|(i, expected)| self.peek_ahead(i) == Some(expected));

            if matched {
                for _ in 0..text.len() {
                    self.advance();
                }
                return Ok(kind.clone());
            }
        }

        let found = self.peek().unwrap_or('\0');
        Err(LexError::new(format!("Unexpected character: '{}'", found), location))
    }

    fn word(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(ch) = self.peek().filter(|c| c.is_ascii_alphanumeric() || *c == '_') {
            text.push(ch);
            self.advance();
        }

        KEYWORDS
            .iter()
            .find(|(keyword, _)| *keyword == text)
            .map_or(TokenKind::Ident(text), |(_, kind)| kind.clone())
    }

    /// Integers, and floats with a fraction, an exponent or an `f` suffix
    fn number_literal(&mut self, location: SourceLocation) -> Result<TokenKind, LexError> {
        let mut text = String::new();
        self.take_digits(&mut text);

        let mut is_float = false;
        if self.peek() == Some('.') {
            is_float = true;
            text.push('.');
            self.advance();
            self.take_digits(&mut text);
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let digits_at = if matches!(self.peek_ahead(1), Some('+' | '-')) { 2 } else { 1 };
            if self.peek_ahead(digits_at).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                for _ in 0..digits_at {
                    text.extend(self.advance());
                }
                self.take_digits(&mut text);
            }
        }

        if matches!(self.peek(), Some('f' | 'F')) {
            is_float = true;
            self.advance();
        }

        if is_float {
            text.parse::<f32>()
                .map(TokenKind::FloatLiteral)
                .map_err(|_| LexError::new(format!("Invalid float literal: {}", text), location))
        } else {
            text.parse::<i64>()
                .map(TokenKind::IntLiteral)
                .map_err(|_| LexError::new(format!("Invalid integer literal: {}", text), location))
        }
    }

    fn take_digits(&mut self, into: &mut String) {
        while let Some(ch) = self.peek().filter(char::is_ascii_digit) {
            into.push(ch);
            self.advance();
        }
    }

    /// Body of a string literal, after the opening quote
    fn string_literal(&mut self, location: SourceLocation) -> Result<TokenKind, LexError> {
        let mut bytes = Vec::new();

        loop {
            match self.advance() {
                Some('"') => return Ok(TokenKind::StringLiteral(bytes)),
                Some('\\') => bytes.push(self.escape("string literal")?),
                Some('\n') | None => {
                    return Err(LexError::new("Unterminated string literal", location));
                }
                Some(ch) => {
                    let mut utf8 = [0; 4];
                    bytes.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
                }
            }
        }
    }

    /// Body of a character literal, after the opening quote
    fn char_literal(&mut self, location: SourceLocation) -> Result<TokenKind, LexError> {
        let byte = match self.advance() {
            Some('\\') => self.escape("character literal")?,
            Some(ch) if ch.is_ascii() && ch != '\'' && ch != '\n' => ch as u8,
            Some(ch) if !ch.is_ascii() => {
                return Err(LexError::new(
                    format!("Character literal '{}' is not a single byte", ch),
                    location,
                ));
            }
            _ => return Err(LexError::new("Empty character literal", location)),
        };

        if self.advance() != Some('\'') {
            return Err(LexError::new(
                "Expected closing quote in character literal",
                self.current_location(),
            ));
        }

        Ok(TokenKind::CharLiteral(byte as i8))
    }

    /// Decode the escape sequence following a backslash
    fn escape(&mut self, context: &str) -> Result<u8, LexError> {
        let location = self.current_location();
        let escaped = self
            .advance()
            .ok_or_else(|| LexError::new(format!("Unexpected end of file in {}", context), location))?;

        match escaped {
            'n' => Ok(b'\n'),
            't' => Ok(b'\t'),
            'r' => Ok(b'\r'),
            '0' => Ok(0),
            '\\' | '\'' | '"' => Ok(escaped as u8),
            'x' => {
                let mut hex = String::new();
                while hex.len() < 2 {
                    match self.peek().filter(char::is_ascii_hexdigit) {
                        Some(digit) => {
                            hex.push(digit);
                            self.advance();
                        }
                        None => break,
                    }
                }
                u8::from_str_radix(&hex, 16).map_err(|_| {
                    LexError::new(format!("Invalid hex escape sequence: \\x{}", hex), location)
                })
            }
            other => Err(LexError::new(
                format!("Unknown escape sequence: \\{}", other),
                location,
            )),
        }
    }

    /// Skip whitespace and comments
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match (self.peek(), self.peek_ahead(1)) {
                (Some(c), _) if c.is_ascii_whitespace() => {
                    self.advance();
                }
                (Some('/'), Some('/')) => self.skip_line(),
                (Some('/'), Some('*')) => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_line(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start = self.current_location();
        self.advance();
        self.advance();

        while self.peek().is_some() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError::new("Unterminated block comment", start))
    }

    fn peek(&self) -> Option<char> {
        self.peek_ahead(0)
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}
