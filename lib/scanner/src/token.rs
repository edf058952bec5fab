use std::fmt::Display;

use cursor::Line;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub data: TokenData<'a>,
    pub lexeme: &'a str,
    pub line: Line,
}

impl<'a> Token<'a> {
    pub fn new(data: TokenData<'a>, lexeme: &'a str, line: Line) -> Token<'a> {
        Self { data, lexeme, line }
    }

    pub fn ty(&self) -> TokenType {
        self.data.into()
    }

    pub fn lexeme(&self) -> &'a str {
        self.lexeme
    }

    pub fn line(&self) -> Line {
        self.line
    }

    /// Kind, lexeme and decoded literal, as printed when dumping the token sequence.
    pub fn summary(&self) -> String {
        let literal = match self.data {
            TokenData::Str(s) => s.to_string(),
            TokenData::Number(n) => format!("{n:?}"),
            _ => "null".to_string(),
        };
        format!("{} {} {}", self.ty(), self.lexeme, literal)
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, strum_macros::EnumDiscriminants)]
#[strum_discriminants(name(TokenType), derive(Hash, strum_macros::Display))]
pub enum TokenData<'a> {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    Str(&'a str),
    Number(f64),

    // Keywords.
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

impl TokenData<'_> {
    pub fn keyword(text: &str) -> Option<TokenData<'static>> {
        use TokenData::*;
        Some(match text {
            "and" => And,
            "class" => Class,
            "else" => Else,
            "false" => False,
            "for" => For,
            "fun" => Fun,
            "if" => If,
            "nil" => Nil,
            "or" => Or,
            "print" => Print,
            "return" => Return,
            "super" => Super,
            "this" => This,
            "true" => True,
            "var" => Var,
            "while" => While,
            _ => return None,
        })
    }
}
