use crate::token::{Literal, Token};

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Binary {
        left: Box<Expression>,
        operator: Token,
        right: Box<Expression>,
    },
    Grouping(Box<Expression>),
    Literal(Literal),
    Unary {
        operator: Token,
        right: Box<Expression>,
    },
    Variable(Token),
}

/// One operation over every node type, e.g. printing or evaluation.
pub trait Visitor<T, Output> {
    fn visit(&mut self, n: &T) -> Output;
}

impl Expression {
    pub fn accept<T>(&self, v: &mut dyn Visitor<Expression, T>) -> T {
        v.visit(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Print {
        keyword: Token,
        expression: Expression,
    },
    Expression(Expression),
    Var {
        name: Token,
        initializer: Option<Expression>,
    },
}

impl Statement {
    pub fn accept<T>(&self, v: &mut dyn Visitor<Statement, T>) -> T {
        v.visit(self)
    }
}

/// Renders trees in a fully parenthesized prefix form, e.g. `(+ 1 (* 2 3))`.
pub struct AstPrinter {}

impl AstPrinter {
    pub fn print(&mut self, expression: &Expression) -> String {
        expression.accept(self)
    }
    pub fn print_statement(&mut self, statement: &Statement) -> String {
        statement.accept(self)
    }
    fn parenthesize(&mut self, name: &str, args: Vec<&Expression>) -> String {
        let mut x = String::from("(");
        x.push_str(name);
        for arg in args {
            let rendered: String = arg.accept(self);
            x.push_str(" ");
            x.push_str(rendered.as_str());
        }
        x.push_str(")");
        x
    }
}

impl Visitor<Expression, String> for AstPrinter {
    fn visit(&mut self, n: &Expression) -> String {
        match n {
            Expression::Binary {
                left,
                operator,
                right,
            } => self.parenthesize(&operator.lexeme, vec![&**left, &**right]),
            Expression::Grouping(x) => self.parenthesize("group", vec![&**x]),
            Expression::Literal(x) => x.to_string(),
            Expression::Unary { operator, right } => {
                self.parenthesize(&operator.lexeme, vec![&**right])
            }
            Expression::Variable(x) => x.lexeme.clone(),
        }
    }
}

impl Visitor<Statement, String> for AstPrinter {
    fn visit(&mut self, n: &Statement) -> String {
        match n {
            Statement::Print { expression, .. } => self.parenthesize("print", vec![expression]),
            Statement::Expression(x) => self.parenthesize(";", vec![x]),
            Statement::Var {
                name,
                initializer: Some(x),
            } => self.parenthesize(&format!("var {}", name.lexeme), vec![x]),
            Statement::Var {
                name,
                initializer: None,
            } => format!("(var {})", name.lexeme),
        }
    }
}
