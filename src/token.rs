use std::fmt;
use strum_macros::{Display, EnumIter};

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    // Single-character tokens.
    LeftParen, RightParen, LeftBrace, RightBrace,
    Comma, Dot, Minus, Plus, Semicolon, Slash, Star,

    // One or two character tokens.
    Bang, BangEqual,
    Equal, EqualEqual,
    Greater, GreaterEqual,
    Less, LessEqual,

    // Literals.
    Identifier, String, Number,

    // Keywords.
    And, Class, Else, False, Fun, For, If, Nil, Or,
    Print, Return, Super, This, True, Var, While,

    Error, Eof,
}

/// The value a token was scanned as, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Nil,
    Boolean(bool),
    Number(f64),
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Nil => write!(f, "nil"),
            Literal::Boolean(x) => write!(f, "{}", x),
            Literal::Number(x) => write!(f, "{}", x),
            Literal::String(x) => write!(f, "{}", x),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub tokentype: TokenType,
    pub lexeme: String,
    pub literal: Literal,
    pub line: usize,
}

impl Token {
    pub fn new(tokentype: TokenType, lexeme: &str, literal: Literal, line: usize) -> Token {
        Token {
            tokentype,
            lexeme: lexeme.to_string(),
            literal,
            line,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.tokentype, self.lexeme, self.literal)
    }
}

#[cfg(test)]
mod token_tests {
    use super::{Literal, Token, TokenType};

    #[test]
    fn debug_form() {
        let token = Token::new(TokenType::Number, "123.5", Literal::Number(123.5), 2);
        assert_eq!(token.to_string(), "NUMBER 123.5 123.5");
        let token = Token::new(TokenType::BangEqual, "!=", Literal::Nil, 1);
        assert_eq!(token.to_string(), "BANG_EQUAL != nil");
        let token = Token::new(TokenType::Eof, "", Literal::Nil, 3);
        assert_eq!(token.to_string(), "EOF  nil");
    }

    #[test]
    fn string_literal_drops_quotes() {
        let token = Token::new(
            TokenType::String,
            "\"hi\"",
            Literal::String("hi".to_string()),
            1,
        );
        assert_eq!(token.to_string(), "STRING \"hi\" hi");
    }
}
