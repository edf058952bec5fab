use cursor::{Cursor, Line};
use errors::Diagnostic;
use log::trace;

pub mod token;
pub use token::{Token, TokenData, TokenType};
use TokenData::*;

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum ScanErrorType {
    #[error("Unexpected character '{0}'.")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("[line {line}] Error: {error}")]
pub struct ScanError {
    pub error: ScanErrorType,
    pub line: Line,
}

impl From<ScanError> for Diagnostic {
    fn from(e: ScanError) -> Self {
        Diagnostic::new(e.line, "", e.error)
    }
}

/// Lazily scans a source string.
///
/// Lexical errors are yielded in place and scanning carries on after them. The stream always ends
/// with exactly one [`TokenData::Eof`] token, after which it returns `None`.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    start: Cursor<'a>,
    current: Cursor<'a>,
    finished: bool,
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { start: source.into(), current: source.into(), finished: false }
    }

    fn make_token(&self, data: TokenData<'a>) -> Token<'a> {
        let token = Token::new(data, self.start.slice_until(&self.current), self.current.line());
        trace!("Scanned {:?} on line {}", token.data, token.line);
        token
    }

    fn error(&self, error: ScanErrorType) -> ScanError {
        ScanError { error, line: self.current.line() }
    }

    fn one_or_two(&mut self, second: char, two: TokenData<'a>, one: TokenData<'a>) -> TokenData<'a> {
        if self.current.advance_if_eq(second) {
            two
        } else {
            one
        }
    }

    fn string(&mut self) -> Result<TokenData<'a>, ScanError> {
        self.current.advance_while(|c| c != '"');
        if !self.current.advance_if_eq('"') {
            return Err(self.error(ScanErrorType::UnterminatedString));
        }

        let lexeme = self.start.slice_until(&self.current);
        Ok(Str(&lexeme[1..lexeme.len() - 1]))
    }

    fn number(&mut self) -> TokenData<'a> {
        self.current.advance_while(|c| c.is_ascii_digit());

        // A trailing '.' without digits is not part of the number
        if self.current.peek() == Some('.')
            && self.current.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.current.next();
            self.current.advance_while(|c| c.is_ascii_digit());
        }

        // Digits with an optional fraction always parse as f64
        Number(self.start.slice_until(&self.current).parse().unwrap_or(f64::NAN))
    }

    fn identifier(&mut self) -> TokenData<'a> {
        self.current.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        TokenData::keyword(self.start.slice_until(&self.current)).unwrap_or(Identifier)
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Result<Token<'a>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            self.start = self.current.clone();

            let Some(c) = self.current.next() else {
                self.finished = true;
                return Some(Ok(self.make_token(Eof)));
            };

            let data = match c {
                '(' => LeftParen,
                ')' => RightParen,
                '{' => LeftBrace,
                '}' => RightBrace,
                ',' => Comma,
                '.' => Dot,
                '-' => Minus,
                '+' => Plus,
                ';' => Semicolon,
                '*' => Star,

                '!' => self.one_or_two('=', BangEqual, Bang),
                '=' => self.one_or_two('=', EqualEqual, Equal),
                '<' => self.one_or_two('=', LessEqual, Less),
                '>' => self.one_or_two('=', GreaterEqual, Greater),

                '/' => {
                    if self.current.advance_if_eq('/') {
                        // Comment, the newline itself is left for the next round
                        self.current.advance_while(|c| c != '\n');
                        continue;
                    }
                    Slash
                }

                ' ' | '\r' | '\t' | '\n' => continue,

                '"' => match self.string() {
                    Ok(data) => data,
                    Err(e) => return Some(Err(e)),
                },

                d if d.is_ascii_digit() => self.number(),

                c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),

                c => return Some(Err(self.error(ScanErrorType::UnexpectedCharacter(c)))),
            };

            return Some(Ok(self.make_token(data)));
        }
    }
}

/// All tokens and all lexical errors of one source string.
#[derive(Debug, Clone, PartialEq)]
pub struct Scanned<'a> {
    pub tokens: Vec<Token<'a>>,
    pub errors: Vec<ScanError>,
}

impl<'a> Scanned<'a> {
    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub fn scan(source: &str) -> Scanned<'_> {
    let mut scanned = Scanned { tokens: Vec::new(), errors: Vec::new() };
    for result in TokenStream::new(source) {
        match result {
            Ok(token) => scanned.tokens.push(token),
            Err(e) => scanned.errors.push(e),
        }
    }
    scanned
}
