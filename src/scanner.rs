use crate::diagnostic::{Diagnostic, Reporter};
use crate::token::{Literal, Token, TokenType};
use phf::phf_map;
use std::iter::Peekable;
use std::str::CharIndices;

/// What the scanner is in the middle of. Every state except `Default` has
/// consumed at least one character of the token starting at `Scanner::start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Default,
    InComment,
    InString,
    InIntegerPart,
    InFractionPart,
    InIdentifier,
}

// Note: current becomes self.iter.peek()?.0
struct Scanner<'a> {
    source: &'a str,
    iter: Peekable<CharIndices<'a>>,
    state: State,
    start: usize,
    line: usize,
    tokens: Vec<Token>,
}

/// Scans `source` into tokens, always ending with a single `Eof` token.
///
/// Lexical errors never stop the scan. They go to `reporter` and the
/// offending text produces no token. An unterminated string is reported on
/// the line where the input ends, not the line where the string opened.
pub fn scan_tokens(source: &str, reporter: &mut dyn Reporter) -> Vec<Token> {
    let mut scanner = Scanner {
        source,
        iter: source.char_indices().peekable(),
        state: State::Default,
        start: 0,
        line: 1,
        tokens: Vec::new(),
    };
    while let Some((idx, c)) = scanner.iter.next() {
        scanner.state = match scanner.state {
            State::Default => {
                scanner.start = idx;
                scanner.default(c)
            }
            State::InComment => scanner.comment(c),
            State::InString => scanner.string(c),
            State::InIntegerPart => scanner.integer_part(c),
            State::InFractionPart => scanner.fraction_part(c),
            State::InIdentifier => scanner.identifier(c),
        };
    }
    scanner.finish();

    let mut tokens = Vec::with_capacity(scanner.tokens.len());
    for token in scanner.tokens {
        match token.tokentype {
            TokenType::Error => {
                reporter.report(Diagnostic::lexical(token.line, &token.literal.to_string()))
            }
            _ => tokens.push(token),
        }
    }
    tokens
}

impl<'a> Scanner<'a> {
    fn default(&mut self, c: char) -> State {
        match c {
            '(' => self.emit(TokenType::LeftParen),
            ')' => self.emit(TokenType::RightParen),
            '{' => self.emit(TokenType::LeftBrace),
            '}' => self.emit(TokenType::RightBrace),
            ',' => self.emit(TokenType::Comma),
            '.' => self.emit(TokenType::Dot),
            '-' => self.emit(TokenType::Minus),
            '+' => self.emit(TokenType::Plus),
            ';' => self.emit(TokenType::Semicolon),
            '*' => self.emit(TokenType::Star),
            '!' => {
                if self.next_if('=') {
                    self.emit(TokenType::BangEqual)
                } else {
                    self.emit(TokenType::Bang)
                }
            }
            '=' => {
                if self.next_if('=') {
                    self.emit(TokenType::EqualEqual)
                } else {
                    self.emit(TokenType::Equal)
                }
            }
            '<' => {
                if self.next_if('=') {
                    self.emit(TokenType::LessEqual)
                } else {
                    self.emit(TokenType::Less)
                }
            }
            '>' => {
                if self.next_if('=') {
                    self.emit(TokenType::GreaterEqual)
                } else {
                    self.emit(TokenType::Greater)
                }
            }
            '/' => {
                if self.next_if('/') {
                    State::InComment
                } else {
                    self.emit(TokenType::Slash)
                }
            }
            ' ' | '\r' | '\t' => State::Default,
            '\n' => {
                self.line += 1;
                State::Default
            }
            '"' => State::InString,
            c if is_digit(c) => self.after_integer_digit(),
            c if is_alpha(c) => self.after_identifier_char(),
            _ => self.error("Unexpected character."),
        }
    }
    fn comment(&mut self, c: char) -> State {
        match c {
            '\n' => {
                self.line += 1;
                State::Default
            }
            _ => State::InComment,
        }
    }
    fn string(&mut self, c: char) -> State {
        match c {
            '"' => {
                let source = self.source;
                let value = &source[self.start + 1..self.current() - 1];
                self.emit_literal(TokenType::String, Literal::String(value.to_string()))
            }
            '\n' => {
                self.line += 1;
                State::InString
            }
            _ => State::InString,
        }
    }
    fn integer_part(&mut self, c: char) -> State {
        match c {
            // Only entered when a digit is known to follow.
            '.' => State::InFractionPart,
            _ => self.after_integer_digit(),
        }
    }
    fn fraction_part(&mut self, _digit: char) -> State {
        match self.peek() {
            Some(c) if is_digit(c) => State::InFractionPart,
            _ => self.emit_number(),
        }
    }
    fn identifier(&mut self, _c: char) -> State {
        self.after_identifier_char()
    }
    fn after_integer_digit(&mut self) -> State {
        match self.peek() {
            Some(c) if is_digit(c) => State::InIntegerPart,
            Some('.') if self.peek_next().map_or(false, is_digit) => State::InIntegerPart,
            _ => self.emit_number(),
        }
    }
    fn after_identifier_char(&mut self) -> State {
        match self.peek() {
            Some(c) if is_alphanumeric(c) => State::InIdentifier,
            _ => self.emit_identifier(),
        }
    }
    fn finish(&mut self) {
        if let State::InString = self.state {
            self.error("Unterminated string.");
        }
        self.tokens
            .push(Token::new(TokenType::Eof, "", Literal::Nil, self.line));
    }
    fn current(&mut self) -> usize {
        match self.iter.peek() {
            None => self.source.len(),
            Some((idx, _)) => *idx,
        }
    }
    fn peek(&mut self) -> Option<char> {
        self.iter.peek().map(|&(_, c)| c)
    }
    fn peek_next(&self) -> Option<char> {
        let mut x = self.iter.clone();
        x.next();
        x.peek().map(|&(_, c)| c)
    }
    fn next_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.iter.next();
            return true;
        }
        false
    }
    fn emit(&mut self, token_type: TokenType) -> State {
        self.emit_literal(token_type, Literal::Nil)
    }
    fn emit_literal(&mut self, token_type: TokenType, literal: Literal) -> State {
        let source = self.source;
        let current = self.current();
        self.tokens.push(Token::new(
            token_type,
            &source[self.start..current],
            literal,
            self.line,
        ));
        State::Default
    }
    fn emit_number(&mut self) -> State {
        let source = self.source;
        let current = self.current();
        // Only `digits` or `digits.digits` get here, and both always parse;
        // values too large for an f64 become infinity.
        match source[self.start..current].parse() {
            Ok(x) => self.emit_literal(TokenType::Number, Literal::Number(x)),
            Err(_) => unreachable!("number lexeme is always digits[.digits]"),
        }
    }
    fn emit_identifier(&mut self) -> State {
        let source = self.source;
        let current = self.current();
        match KEYWORDS.get(&source[self.start..current]) {
            None => self.emit(TokenType::Identifier),
            Some(TokenType::True) => self.emit_literal(TokenType::True, Literal::Boolean(true)),
            Some(TokenType::False) => self.emit_literal(TokenType::False, Literal::Boolean(false)),
            Some(x) => self.emit(*x),
        }
    }
    fn error(&mut self, message: &str) -> State {
        self.emit_literal(TokenType::Error, Literal::String(message.to_string()))
    }
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alphanumeric(c: char) -> bool {
    is_alpha(c) || is_digit(c)
}

static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "and" => TokenType::And,
    "class" => TokenType::Class,
    "else" => TokenType::Else,
    "false" => TokenType::False,
    "for" => TokenType::For,
    "fun" => TokenType::Fun,
    "if" => TokenType::If,
    "nil" => TokenType::Nil,
    "or" => TokenType::Or,
    "print" => TokenType::Print,
    "return" => TokenType::Return,
    "super" => TokenType::Super,
    "this" => TokenType::This,
    "true" => TokenType::True,
    "var" => TokenType::Var,
    "while" => TokenType::While,
};

#[cfg(test)]
mod scanner_tests {
    use super::{scan_tokens, KEYWORDS};
    use crate::diagnostic::{DiagnosticKind, Diagnostics};
    use crate::token::{Literal, Token, TokenType};
    use strum::IntoEnumIterator;

    fn scan(source: &str) -> (Vec<Token>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens(source, &mut diagnostics);
        (tokens, diagnostics)
    }

    fn types(tokens: &[Token]) -> Vec<TokenType> {
        tokens.iter().map(|t| t.tokentype).collect()
    }

    #[test]
    fn basic_scanner_test() {
        let (tokens, diagnostics) = scan("x = 2");
        assert!(!diagnostics.has_errors());
        assert_eq!(
            types(&tokens),
            vec![
                TokenType::Identifier,
                TokenType::Equal,
                TokenType::Number,
                TokenType::Eof
            ]
        );
        assert_eq!(tokens[0].lexeme, "x");
        assert_eq!(tokens[2].literal, Literal::Number(2.0));
    }

    #[test]
    fn number_parsing() {
        let (tokens, diagnostics) = scan("1+2");
        assert!(!diagnostics.has_errors());
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].literal, Literal::Number(1.0));
        assert_eq!(tokens[1].tokentype, TokenType::Plus);
        assert_eq!(tokens[2].literal, Literal::Number(2.0));
    }

    #[test]
    fn fractions_need_digits_after_the_dot() {
        let (tokens, _) = scan("123.5 7. 1.2.3");
        assert_eq!(
            types(&tokens),
            vec![
                TokenType::Number,
                TokenType::Number,
                TokenType::Dot,
                TokenType::Number,
                TokenType::Dot,
                TokenType::Number,
                TokenType::Eof
            ]
        );
        assert_eq!(tokens[0].lexeme, "123.5");
        assert_eq!(tokens[0].literal, Literal::Number(123.5));
        assert_eq!(tokens[1].lexeme, "7");
        assert_eq!(tokens[3].literal, Literal::Number(1.2));
        assert_eq!(tokens[5].literal, Literal::Number(3.0));
    }

    #[test]
    fn negative_numbers_are_two_tokens() {
        let (tokens, _) = scan("-4");
        assert_eq!(
            types(&tokens),
            vec![TokenType::Minus, TokenType::Number, TokenType::Eof]
        );
        assert_eq!(tokens[1].literal, Literal::Number(4.0));
    }

    #[test]
    fn maximal_munch_across_lines() {
        let (tokens, diagnostics) = scan("!=\n123.5\n!=");
        assert!(!diagnostics.has_errors());
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].tokentype, TokenType::BangEqual);
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].tokentype, TokenType::Number);
        assert_eq!(tokens[1].literal, Literal::Number(123.5));
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[2].tokentype, TokenType::BangEqual);
        assert_eq!(tokens[2].line, 3);
        assert_eq!(tokens[3].tokentype, TokenType::Eof);
    }

    #[test]
    fn longest_match_left_to_right() {
        let (tokens, _) = scan("=== <== >=> !!=");
        assert_eq!(
            types(&tokens),
            vec![
                TokenType::EqualEqual,
                TokenType::Equal,
                TokenType::LessEqual,
                TokenType::Equal,
                TokenType::GreaterEqual,
                TokenType::Greater,
                TokenType::Bang,
                TokenType::BangEqual,
                TokenType::Eof
            ]
        );
    }

    #[test]
    fn comments_produce_no_tokens() {
        let (tokens, diagnostics) = scan("1 // ignored \"text\" + 2\n/ 3 // trailing");
        assert!(!diagnostics.has_errors());
        assert_eq!(
            types(&tokens),
            vec![
                TokenType::Number,
                TokenType::Slash,
                TokenType::Number,
                TokenType::Eof
            ]
        );
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[3].line, 2);
    }

    #[test]
    fn string_literal_excludes_quotes() {
        let (tokens, diagnostics) = scan("var name = \"John\"; 123");
        assert!(!diagnostics.has_errors());
        assert_eq!(tokens.len(), 7);
        assert_eq!(tokens[0].tokentype, TokenType::Var);
        assert_eq!(tokens[1].tokentype, TokenType::Identifier);
        assert_eq!(tokens[3].lexeme, "\"John\"");
        assert_eq!(tokens[3].literal, Literal::String("John".to_string()));
        assert_eq!(tokens[5].literal, Literal::Number(123.0));
    }

    #[test]
    fn strings_span_lines() {
        let (tokens, _) = scan("\"a\nb // not a comment\" x");
        assert_eq!(tokens[0].tokentype, TokenType::String);
        assert_eq!(
            tokens[0].literal,
            Literal::String("a\nb // not a comment".to_string())
        );
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn unterminated_string() {
        let (tokens, diagnostics) = scan("\"Unterminated string");
        assert_eq!(types(&tokens), vec![TokenType::Eof]);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.has_kind(DiagnosticKind::Lexical));
        let d = diagnostics.iter().next().unwrap();
        assert_eq!(d.to_string(), "[line 1] Error: Unterminated string.");
    }

    #[test]
    fn unterminated_string_keeps_earlier_tokens() {
        let (tokens, diagnostics) = scan("print 1;\n\"abc\ndef");
        assert_eq!(
            types(&tokens),
            vec![
                TokenType::Print,
                TokenType::Number,
                TokenType::Semicolon,
                TokenType::Eof
            ]
        );
        assert_eq!(diagnostics.iter().next().unwrap().line, 3);
    }

    #[test]
    fn unexpected_character_keeps_scanning() {
        let (tokens, diagnostics) = scan("1 @ 2 # 3");
        assert_eq!(
            types(&tokens),
            vec![
                TokenType::Number,
                TokenType::Number,
                TokenType::Number,
                TokenType::Eof
            ]
        );
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics
            .iter()
            .all(|d| d.message == "Unexpected character."));
    }

    #[test]
    fn identifiers_and_keywords() {
        let (tokens, _) = scan("_foo9 andy and nil true false");
        assert_eq!(
            types(&tokens),
            vec![
                TokenType::Identifier,
                TokenType::Identifier,
                TokenType::And,
                TokenType::Nil,
                TokenType::True,
                TokenType::False,
                TokenType::Eof
            ]
        );
        assert_eq!(tokens[0].lexeme, "_foo9");
        assert_eq!(tokens[4].literal, Literal::Boolean(true));
        assert_eq!(tokens[5].literal, Literal::Boolean(false));
    }

    #[test]
    fn keyword_table_matches_token_types() {
        let mut found = 0;
        for tokentype in TokenType::iter() {
            let word = tokentype.to_string().to_lowercase();
            if let Some(keyword) = KEYWORDS.get(word.as_str()) {
                assert_eq!(*keyword, tokentype);
                let (tokens, _) = scan(&word);
                assert_eq!(tokens[0].tokentype, tokentype);
                assert_eq!(tokens[0].lexeme, word);
                found += 1;
            }
        }
        assert_eq!(found, KEYWORDS.len());
        assert_eq!(found, 16);
    }

    #[test]
    fn any_digit_run_is_a_number() {
        let long = "9".repeat(400);
        let (tokens, diagnostics) = scan(&format!("{} 0.000001 007", long));
        assert!(!diagnostics.has_errors());
        assert_eq!(tokens[0].lexeme, long);
        match tokens[0].literal {
            Literal::Number(x) => assert!(x.is_infinite()),
            ref other => panic!("unexpected {:?}", other),
        }
        assert_eq!(tokens[1].literal, Literal::Number(0.000001));
        assert_eq!(tokens[2].literal, Literal::Number(7.0));
    }

    #[test]
    fn digits_then_letters() {
        let (tokens, _) = scan("12abc");
        assert_eq!(
            types(&tokens),
            vec![TokenType::Number, TokenType::Identifier, TokenType::Eof]
        );
    }

    #[test]
    fn scanning_is_repeatable() {
        let source = "var a = (1 + 2.5) * \"x\";\n// done\nprint a != nil;";
        let (first, _) = scan(source);
        let (second, _) = scan(source);
        assert_eq!(first, second);
    }

    #[test]
    fn lines_never_decrease() {
        let (tokens, _) = scan("1\n\n2 \"a\nb\" 3\n// c\n4");
        for pair in tokens.windows(2) {
            assert!(pair[0].line <= pair[1].line);
        }
        assert_eq!(tokens.last().unwrap().line, 6);
    }
}
