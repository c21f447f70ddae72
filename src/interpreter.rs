use crate::ast::{Expression, Statement, Visitor};
use crate::diagnostic::{Diagnostic, DiagnosticKind, Reporter};
use crate::token::{Token, TokenType};
use crate::value::Value;
use std::error::Error;
use std::fmt;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// An operand had the wrong type for its operator.
    TypeMismatch,
    /// Variables have no storage yet.
    Unsupported,
    /// The output sink rejected a write.
    Output,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    fn new(kind: RuntimeErrorKind, token: &Token, message: &str) -> RuntimeError {
        RuntimeError {
            kind,
            token: token.clone(),
            message: message.to_string(),
        }
    }
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::at_token(DiagnosticKind::Runtime, &self.token, &self.message)
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_diagnostic())
    }
}

impl Error for RuntimeError {
    fn description(&self) -> &str {
        &self.message
    }
}

type EvalResult<T> = Result<T, RuntimeError>;

/// Evaluates statements, writing whatever they print to `out`.
pub struct Interpreter<W: Write> {
    out: W,
}

impl<W: Write> Visitor<Expression, EvalResult<Value>> for Interpreter<W> {
    fn visit(&mut self, expr: &Expression) -> EvalResult<Value> {
        match expr {
            Expression::Literal(x) => Ok(Value::from(x)),
            Expression::Grouping(x) => self.evaluate(x),
            Expression::Unary { operator, right } => {
                let rv = self.evaluate(right)?;
                match operator.tokentype {
                    TokenType::Minus => match rv {
                        Value::Number(r) => Ok(Value::Number(-r)),
                        _ => Err(type_mismatch(operator, "Operand must be a number.")),
                    },
                    TokenType::Bang => Ok(Value::Boolean(!rv.is_truthy())),
                    _ => Err(unknown_operator(operator)),
                }
            }
            Expression::Binary {
                left,
                operator,
                right,
            } => {
                let lv = self.evaluate(left)?;
                let rv = self.evaluate(right)?;
                match operator.tokentype {
                    TokenType::EqualEqual => Ok(Value::Boolean(lv.equals(&rv))),
                    TokenType::BangEqual => Ok(Value::Boolean(!lv.equals(&rv))),
                    TokenType::Plus => match (lv, rv) {
                        (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
                        (Value::String(l), Value::String(r)) => {
                            let mut joined = l;
                            joined.push_str(r.as_str());
                            Ok(Value::String(joined))
                        }
                        _ => Err(type_mismatch(
                            operator,
                            "Operands must be two numbers or two strings.",
                        )),
                    },
                    _ => {
                        let (l, r) = number_operands(operator, &lv, &rv)?;
                        match operator.tokentype {
                            TokenType::Minus => Ok(Value::Number(l - r)),
                            TokenType::Slash => Ok(Value::Number(l / r)),
                            TokenType::Star => Ok(Value::Number(l * r)),
                            TokenType::Greater => Ok(Value::Boolean(l > r)),
                            TokenType::GreaterEqual => Ok(Value::Boolean(l >= r)),
                            TokenType::Less => Ok(Value::Boolean(l < r)),
                            TokenType::LessEqual => Ok(Value::Boolean(l <= r)),
                            _ => Err(unknown_operator(operator)),
                        }
                    }
                }
            }
            // TODO: Read from an environment once variables have storage.
            Expression::Variable(token) => Err(RuntimeError::new(
                RuntimeErrorKind::Unsupported,
                token,
                "Variables are not supported yet.",
            )),
        }
    }
}

impl<W: Write> Visitor<Statement, EvalResult<()>> for Interpreter<W> {
    fn visit(&mut self, stmt: &Statement) -> EvalResult<()> {
        match stmt {
            Statement::Print {
                keyword,
                expression,
            } => {
                let val = self.evaluate(expression)?;
                writeln!(self.out, "{}", val).map_err(|e| {
                    RuntimeError::new(RuntimeErrorKind::Output, keyword, &e.to_string())
                })
            }
            Statement::Expression(e) => {
                self.evaluate(e)?;
                Ok(())
            }
            Statement::Var { name, .. } => Err(RuntimeError::new(
                RuntimeErrorKind::Unsupported,
                name,
                "Variable declarations are not supported yet.",
            )),
        }
    }
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Interpreter<W> {
        Interpreter { out }
    }
    pub fn evaluate(&mut self, expr: &Expression) -> EvalResult<Value> {
        expr.accept(self)
    }
    pub fn execute(&mut self, stmt: &Statement) -> EvalResult<()> {
        stmt.accept(self)
    }
    /// Runs `statements` in order. The first runtime error is reported and
    /// stops the rest of the batch; output already written stays written.
    /// Returns whether every statement ran.
    pub fn interpret(&mut self, statements: &[Statement], reporter: &mut dyn Reporter) -> bool {
        for stmt in statements {
            if let Err(error) = self.execute(stmt) {
                reporter.report(error.to_diagnostic());
                return false;
            }
        }
        true
    }
    pub fn into_inner(self) -> W {
        self.out
    }
}

fn number_operands(operator: &Token, lv: &Value, rv: &Value) -> EvalResult<(f64, f64)> {
    match (lv, rv) {
        (Value::Number(l), Value::Number(r)) => Ok((*l, *r)),
        _ => Err(type_mismatch(operator, "Operands must be numbers.")),
    }
}

fn type_mismatch(operator: &Token, message: &str) -> RuntimeError {
    RuntimeError::new(RuntimeErrorKind::TypeMismatch, operator, message)
}

// The parser never builds these; reachable only from hand-made trees.
fn unknown_operator(operator: &Token) -> RuntimeError {
    RuntimeError::new(
        RuntimeErrorKind::Unsupported,
        operator,
        &format!("Unknown operator '{}'.", operator.lexeme),
    )
}
