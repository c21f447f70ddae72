use crate::ast::{Expression, Statement};
use crate::diagnostic::{Diagnostic, DiagnosticKind, Reporter};
use crate::token::{Literal, Token, TokenType};
use std::error::Error;
use std::fmt;
use std::fmt::Formatter;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub token: Token,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_diagnostic())
    }
}

impl Error for ParseError {
    fn description(&self) -> &str {
        &self.message
    }
}

impl ParseError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::at_token(DiagnosticKind::Syntax, &self.token, &self.message)
    }
}

/// Parses a whole program, reporting every syntax error found along the way.
pub fn parse(tokens: &[Token], reporter: &mut dyn Reporter) -> Vec<Statement> {
    let mut parser = Parser::new(tokens);
    let statements = parser.parse();
    for error in parser.errors() {
        reporter.report(error.to_diagnostic());
    }
    statements
}

// Stands in for `Eof` when a slice ends without one.
static END_OF_INPUT: Token = Token {
    tokentype: TokenType::Eof,
    lexeme: String::new(),
    literal: Literal::Nil,
    line: 1,
};

pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    errors: Vec<ParseError>,
}

type ParseResult<T> = Result<T, ParseError>;

impl<'a> Parser<'a> {
    /// Running off the end of `tokens` counts as reaching `Eof`.
    pub fn new(tokens: &'a [Token]) -> Parser<'a> {
        Parser {
            tokens,
            current: 0,
            errors: Vec::new(),
        }
    }
    /// Statements that failed to parse are left out; their errors are
    /// available from `errors`.
    pub fn parse(&mut self) -> Vec<Statement> {
        let mut statements: Vec<Statement> = Vec::new();
        while !self.is_at_end() {
            let start = self.current;
            match self.declaration() {
                Ok(statement) => statements.push(statement),
                Err(error) => {
                    self.errors.push(error);
                    self.synchronize(start);
                }
            }
        }
        statements
    }
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }
    fn declaration(&mut self) -> ParseResult<Statement> {
        match self.peek().tokentype {
            TokenType::Var => {
                self.advance();
                self.var_declaration()
            }
            _ => self.statement(),
        }
    }
    fn var_declaration(&mut self) -> ParseResult<Statement> {
        let name = self
            .consume(TokenType::Identifier, "Expect variable name.")?
            .clone();
        let initializer = match self.peek().tokentype {
            TokenType::Equal => {
                self.advance();
                Some(self.expression()?)
            }
            _ => None,
        };
        self.consume(
            TokenType::Semicolon,
            "Expect ';' after variable declaration.",
        )?;
        Ok(Statement::Var { name, initializer })
    }
    fn statement(&mut self) -> ParseResult<Statement> {
        match self.peek().tokentype {
            TokenType::Print => {
                let keyword = self.advance().clone();
                self.print_statement(keyword)
            }
            _ => self.expression_statement(),
        }
    }
    fn print_statement(&mut self, keyword: Token) -> ParseResult<Statement> {
        let expression = self.expression()?;
        self.consume(TokenType::Semicolon, "Expect ';' after value.")?;
        Ok(Statement::Print {
            keyword,
            expression,
        })
    }
    fn expression_statement(&mut self) -> ParseResult<Statement> {
        let expr = self.expression()?;
        self.consume(TokenType::Semicolon, "Expect ';' after expression.")?;
        Ok(Statement::Expression(expr))
    }
    pub fn expression(&mut self) -> ParseResult<Expression> {
        self.equality()
    }
    fn equality(&mut self) -> ParseResult<Expression> {
        self.binary(
            Parser::comparison,
            &[TokenType::BangEqual, TokenType::EqualEqual],
        )
    }
    fn comparison(&mut self) -> ParseResult<Expression> {
        self.binary(
            Parser::term,
            &[
                TokenType::Greater,
                TokenType::GreaterEqual,
                TokenType::Less,
                TokenType::LessEqual,
            ],
        )
    }
    fn term(&mut self) -> ParseResult<Expression> {
        self.binary(Parser::factor, &[TokenType::Minus, TokenType::Plus])
    }
    fn factor(&mut self) -> ParseResult<Expression> {
        self.binary(Parser::unary, &[TokenType::Slash, TokenType::Star])
    }
    /// One left-associative precedence level: `operand (operator operand)*`.
    fn binary(
        &mut self,
        operand: fn(&mut Parser<'a>) -> ParseResult<Expression>,
        operators: &[TokenType],
    ) -> ParseResult<Expression> {
        let mut expr = operand(self)?;
        while operators.contains(&self.peek().tokentype) {
            let operator = self.advance().clone();
            let right = operand(self)?;
            expr = Expression::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }
    fn unary(&mut self) -> ParseResult<Expression> {
        match self.peek().tokentype {
            TokenType::Bang | TokenType::Minus => {
                let operator = self.advance().clone();
                let right = self.unary()?;
                Ok(Expression::Unary {
                    operator,
                    right: Box::new(right),
                })
            }
            _ => self.primary(),
        }
    }
    fn primary(&mut self) -> ParseResult<Expression> {
        match self.peek().tokentype {
            TokenType::False
            | TokenType::True
            | TokenType::Nil
            | TokenType::Number
            | TokenType::String => {
                let literal = self.advance().literal.clone();
                Ok(Expression::Literal(literal))
            }
            TokenType::Identifier => {
                let name = self.advance().clone();
                Ok(Expression::Variable(name))
            }
            TokenType::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(TokenType::RightParen, "Expect ')' after expression.")?;
                Ok(Expression::Grouping(Box::new(expr)))
            }
            _ => Err(self.error("Expect expression.")),
        }
    }
    /// Skips to the next statement boundary. The failing statement began at
    /// `start`; at least one token is always skipped if nothing past it was
    /// consumed.
    fn synchronize(&mut self, start: usize) {
        if self.current == start || !self.at_statement_start() {
            self.advance();
        }
        while !self.is_at_end() {
            if let TokenType::Semicolon = self.previous().tokentype {
                return;
            }
            if self.at_statement_start() {
                return;
            }
            self.advance();
        }
    }
    fn at_statement_start(&self) -> bool {
        match self.peek().tokentype {
            TokenType::Class
            | TokenType::Fun
            | TokenType::Var
            | TokenType::For
            | TokenType::If
            | TokenType::While
            | TokenType::Print
            | TokenType::Return => true,
            _ => false,
        }
    }
    fn consume(&mut self, tokentype: TokenType, message: &str) -> ParseResult<&'a Token> {
        if self.peek().tokentype == tokentype {
            Ok(self.advance())
        } else {
            Err(self.error(message))
        }
    }
    fn advance(&mut self) -> &'a Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }
    fn is_at_end(&self) -> bool {
        match self.peek().tokentype {
            TokenType::Eof => true,
            _ => false,
        }
    }
    fn peek(&self) -> &'a Token {
        self.tokens.get(self.current).unwrap_or(&END_OF_INPUT)
    }
    fn previous(&self) -> &'a Token {
        self.tokens
            .get(self.current.saturating_sub(1))
            .unwrap_or(&END_OF_INPUT)
    }
    fn error(&self, msg: &str) -> ParseError {
        let mut token = self.peek().clone();
        if self.current >= self.tokens.len() {
            if let Some(last) = self.tokens.last() {
                token.line = last.line;
            }
        }
        ParseError {
            message: msg.to_string(),
            token,
        }
    }
}
