use clap::{crate_version, App, Arg};
use lox::ast::AstPrinter;
use lox::diagnostic::{Diagnostic, Diagnostics, Reporter};
use lox::{parser, scanner, Outcome};
use std::fs;
use std::io::{self, BufRead, Write};

struct StderrReporter;

impl Reporter for StderrReporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        eprintln!("{}", diagnostic);
    }
}

#[derive(Clone, Copy)]
struct DebugOptions {
    tokens: bool,
    ast: bool,
}

fn main() {
    let matches = App::new("lox")
        .version(crate_version!())
        .about("Runs a lox script, or starts a prompt when none is given")
        .arg(
            Arg::with_name("script")
                .help("Path of the script to run")
                .index(1),
        )
        .arg(
            Arg::with_name("tokens")
                .long("tokens")
                .help("Prints the scanned tokens before running"),
        )
        .arg(
            Arg::with_name("ast")
                .long("ast")
                .help("Prints the parsed statements before running"),
        )
        .get_matches();
    let options = DebugOptions {
        tokens: matches.is_present("tokens"),
        ast: matches.is_present("ast"),
    };
    match matches.value_of("script") {
        Some(file) => run_file(file, options),
        None => run_prompt(options),
    }
}

fn run_file(file: &str, options: DebugOptions) {
    let contents = match fs::read_to_string(file) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Could not read '{}': {}", file, e);
            std::process::exit(74);
        }
    };
    match run(&contents, options) {
        Outcome::CompileError => std::process::exit(65),
        Outcome::RuntimeError => std::process::exit(70),
        Outcome::Ok => (),
    }
}

fn run_prompt(options: DebugOptions) {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            return;
        }
        match lines.next() {
            Some(Ok(line)) => {
                run(&line, options);
            }
            Some(Err(e)) => {
                eprintln!("Failed to read line: {}", e);
                return;
            }
            None => return,
        }
    }
}

fn run(source: &str, options: DebugOptions) -> Outcome {
    if options.tokens || options.ast {
        dump(source, options);
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    lox::run(source, &mut out, &mut StderrReporter)
}

// Diagnostics are left to the real run.
fn dump(source: &str, options: DebugOptions) {
    let mut diagnostics = Diagnostics::new();
    let tokens = scanner::scan_tokens(source, &mut diagnostics);
    if options.tokens {
        for token in &tokens {
            println!("{}", token);
        }
    }
    if options.ast {
        let mut printer = AstPrinter {};
        for statement in parser::parse(&tokens, &mut diagnostics) {
            println!("{}", printer.print_statement(&statement));
        }
    }
}
