//! Error reporting shared by every stage of the pipeline.
//!
//! Each stage hands its problems to a [`Reporter`] instead of printing them or
//! flipping a global flag. [`Diagnostics`] is the ordinary collector: create
//! one per run and ask it afterwards what went wrong.

use crate::token::{Token, TokenType};
use std::fmt;
use std::slice;

/// The pipeline stage a diagnostic came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexical,
    Syntax,
    Runtime,
}

/// Where on the line the problem was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Unspecified,
    End,
    Lexeme(String),
}

impl Location {
    pub fn at(token: &Token) -> Location {
        match token.tokentype {
            TokenType::Eof => Location::End,
            _ => Location::Lexeme(token.lexeme.clone()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Unspecified => Ok(()),
            Location::End => write!(f, " at end"),
            Location::Lexeme(lexeme) => write!(f, " at '{}'", lexeme),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub line: usize,
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    pub fn lexical(line: usize, message: &str) -> Diagnostic {
        Diagnostic {
            kind: DiagnosticKind::Lexical,
            line,
            location: Location::Unspecified,
            message: message.to_string(),
        }
    }
    pub fn at_token(kind: DiagnosticKind, token: &Token, message: &str) -> Diagnostic {
        Diagnostic {
            kind,
            line: token.line,
            location: Location::at(token),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[line {}] Error{}: {}",
            self.line, self.location, self.message
        )
    }
}

/// Receives diagnostics as the pipeline produces them.
pub trait Reporter {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects the diagnostics of a single run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics {
            entries: Vec::new(),
        }
    }
    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }
    pub fn has_kind(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn iter(&self) -> slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }
}

impl Reporter for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = slice::Iter<'a, Diagnostic>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod diagnostic_tests {
    use super::*;
    use crate::token::Literal;

    #[test]
    fn message_format() {
        let d = Diagnostic::lexical(3, "Unexpected character.");
        assert_eq!(d.to_string(), "[line 3] Error: Unexpected character.");

        let plus = Token::new(TokenType::Plus, "+", Literal::Nil, 7);
        let d = Diagnostic::at_token(DiagnosticKind::Runtime, &plus, "Operands must be numbers.");
        assert_eq!(
            d.to_string(),
            "[line 7] Error at '+': Operands must be numbers."
        );

        let eof = Token::new(TokenType::Eof, "", Literal::Nil, 2);
        let d = Diagnostic::at_token(DiagnosticKind::Syntax, &eof, "Expect expression.");
        assert_eq!(d.to_string(), "[line 2] Error at end: Expect expression.");
    }

    #[test]
    fn collector_tracks_kinds() {
        let mut diagnostics = Diagnostics::new();
        assert!(!diagnostics.has_errors());
        diagnostics.report(Diagnostic::lexical(1, "Unterminated string."));
        assert!(diagnostics.has_errors());
        assert!(diagnostics.has_kind(DiagnosticKind::Lexical));
        assert!(!diagnostics.has_kind(DiagnosticKind::Runtime));
        assert_eq!(diagnostics.len(), 1);
    }
}
