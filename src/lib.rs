pub mod ast;
pub mod diagnostic;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod value;

use crate::diagnostic::{Diagnostics, Reporter};
use crate::interpreter::Interpreter;
use std::io::Write;

/// How far a source string got through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    CompileError,
    RuntimeError,
}

/// Scans, parses and runs `source`, printing to `out`.
///
/// Nothing runs if scanning or parsing reported a problem.
pub fn run(source: &str, out: &mut dyn Write, reporter: &mut dyn Reporter) -> Outcome {
    let mut diagnostics = Diagnostics::new();
    let tokens = scanner::scan_tokens(source, &mut diagnostics);
    let statements = parser::parse(&tokens, &mut diagnostics);
    for diagnostic in &diagnostics {
        reporter.report(diagnostic.clone());
    }
    if diagnostics.has_errors() {
        return Outcome::CompileError;
    }
    if Interpreter::new(out).interpret(&statements, reporter) {
        Outcome::Ok
    } else {
        Outcome::RuntimeError
    }
}
