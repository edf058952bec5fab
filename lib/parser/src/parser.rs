mod expr;

pub use expr::{Expr, LiteralValue};

use cursor::Line;
use errors::Diagnostic;
use log::trace;
use scanner::{Token, TokenData, TokenType};

use TokenType::*;

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("[line {line}] Error at {at}: {error}")]
pub struct ParseError {
    pub error: ParseErrorType,
    pub line: Line,
    /// `end` or the quoted lexeme of the offending token
    pub at: String,
}

impl From<ParseError> for Diagnostic {
    fn from(e: ParseError) -> Self {
        Diagnostic::new(e.line, format!(" at {}", e.at), e.error)
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum ParseErrorType {
    #[error("Expect ')' after expression.")]
    ExpectedRightParen,
    #[error("Expect expression.")]
    ExpectedExpression,
    #[error("Expect end of expression.")]
    ExpectedEndOfExpression,
}

impl ParseErrorType {
    fn at(self, token: &Token) -> ParseError {
        ParseError {
            error: self,
            line: token.line(),
            at: match token.ty() {
                Eof => "end".to_string(),
                _ => format!("'{}'", token.lexeme()),
            },
        }
    }
}

/// Recursive descent parser for a single expression.
///
/// ```text
/// expression → equality
/// equality   → comparison ( ( "!=" | "==" ) comparison )*
/// comparison → term ( ( ">" | ">=" | "<" | "<=" ) term )*
/// term       → factor ( ( "-" | "+" ) factor )*
/// factor     → unary ( ( "/" | "*" ) unary )*
/// unary      → ( "!" | "-" ) unary | primary
/// primary    → NUMBER | STRING | "true" | "false" | "nil" | "(" expression ")"
/// ```
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    current: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut tokens: Vec<Token<'a>>) -> Self {
        if tokens.last().map(Token::ty) != Some(Eof) {
            let line = tokens.last().map_or(Line(1), Token::line);
            tokens.push(Token::new(TokenData::Eof, "", line));
        }
        Self { tokens, current: 0 }
    }

    /// Parses the whole token sequence into one expression.
    ///
    /// The first error aborts parsing, no tree is returned in that case.
    pub fn parse(mut self) -> Result<Expr<'a>> {
        let expr = self.expression()?;
        self.consume_or_error(Eof, ParseErrorType::ExpectedEndOfExpression)?;
        trace!("Parsed {}", expr);
        Ok(expr)
    }

    fn expression(&mut self) -> Result<Expr<'a>> {
        self.equality()
    }

    fn equality(&mut self) -> Result<Expr<'a>> {
        let mut expr = self.comparison()?;

        while let BangEqual | EqualEqual = self.peek().ty() {
            let operator = self.advance();
            let right = self.comparison()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr<'a>> {
        let mut expr = self.term()?;

        while let Greater | GreaterEqual | Less | LessEqual = self.peek().ty() {
            let operator = self.advance();
            let right = self.term()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr<'a>> {
        let mut expr = self.factor()?;

        while let Minus | Plus = self.peek().ty() {
            let operator = self.advance();
            let right = self.factor()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr<'a>> {
        let mut expr = self.unary()?;

        while let Slash | Star = self.peek().ty() {
            let operator = self.advance();
            let right = self.unary()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr<'a>> {
        if let Bang | Minus = self.peek().ty() {
            let operator = self.advance();
            let right = self.unary()?;
            return Ok(Expr::unary(operator, right));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr<'a>> {
        let token = self.advance();
        trace!("Primary: {:?}", token.data);
        match token.data {
            TokenData::False => Ok(Expr::Literal(LiteralValue::Boolean(false))),
            TokenData::True => Ok(Expr::Literal(LiteralValue::Boolean(true))),
            TokenData::Nil => Ok(Expr::Literal(LiteralValue::Nil)),
            TokenData::Number(n) => Ok(Expr::Literal(LiteralValue::Number(n))),
            TokenData::Str(s) => Ok(Expr::Literal(LiteralValue::Str(s))),
            TokenData::LeftParen => {
                let expr = self.expression()?;

                self.consume_or_error(RightParen, ParseErrorType::ExpectedRightParen)?;

                Ok(Expr::grouping(expr))
            }
            _ => Err(ParseErrorType::ExpectedExpression.at(&token)),
        }
    }
}

// Helpers
impl<'a> Parser<'a> {
    fn peek(&self) -> Token<'a> {
        self.tokens[self.current]
    }

    /// Never moves past the Eof token.
    fn advance(&mut self) -> Token<'a> {
        let token = self.peek();
        if token.ty() != Eof {
            self.current += 1;
        }
        token
    }

    fn consume(&mut self, ty: TokenType) -> std::result::Result<Token<'a>, Token<'a>> {
        match self.peek() {
            t if t.ty() == ty => Ok(self.advance()),
            t => Err(t),
        }
    }

    fn consume_or_error(&mut self, ty: TokenType, error: ParseErrorType) -> Result<Token<'a>> {
        self.consume(ty).map_err(|token| error.at(&token))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use scanner::scan;

    use super::*;

    fn parse(source: &str) -> Result<Expr<'_>> {
        let scanned = scan(source);
        assert!(!scanned.had_error(), "{:?}", scanned.errors);
        Parser::new(scanned.tokens).parse()
    }

    fn parse_to_string(source: &str) -> String {
        parse(source).unwrap().to_string()
    }

    #[test]
    fn precedence() {
        let expr = parse("1 + 2 * 3").unwrap();
        let Expr::Binary { left, operator, right } = &expr else {
            panic!("Expected binary expression, got {expr:?}");
        };
        assert_eq!(**left, Expr::Literal(LiteralValue::Number(1.0)));
        assert_eq!(operator.ty(), Plus);
        assert_eq!(right.to_string(), "(* 2 3)");

        assert_eq!(parse_to_string("1 * 2 + 3"), "(+ (* 1 2) 3)");
        assert_eq!(parse_to_string("1 < 2 == 3 >= 4"), "(== (< 1 2) (>= 3 4))");
        assert_eq!(parse_to_string("-1 * !true"), "(* (- 1) (! true))");
    }

    #[test]
    fn left_associative() {
        assert_eq!(parse_to_string("8 - 4 - 2"), "(- (- 8 4) 2)");
        assert_eq!(parse_to_string("8 / 4 / 2"), "(/ (/ 8 4) 2)");
        assert_eq!(parse_to_string("1 != 2 == 3"), "(== (!= 1 2) 3)");
    }

    #[test]
    fn unary_stacks() {
        assert_eq!(parse_to_string("!!nil"), "(! (! nil))");
        assert_eq!(parse_to_string("- -1"), "(- (- 1))");
    }

    #[test]
    fn primaries() {
        assert_eq!(parse("nil").unwrap(), Expr::Literal(LiteralValue::Nil));
        assert_eq!(parse("false").unwrap(), Expr::Literal(LiteralValue::Boolean(false)));
        assert_eq!(parse("\"hi\"").unwrap(), Expr::Literal(LiteralValue::Str("hi")));
        assert_eq!(parse_to_string("(1 + 2) * 3"), "(* (group (+ 1 2)) 3)");
        assert_eq!(parse_to_string("((nil))"), "(group (group nil))");
    }

    #[test]
    fn same_tokens_same_tree() {
        let tokens = scan("(1 + 2) * -3 >= \"a\" == !false").tokens;
        let first = Parser::new(tokens.clone()).parse().unwrap();
        let second = Parser::new(tokens).parse().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_right_paren() {
        let error = parse("(1 + 2").unwrap_err();
        assert_eq!(error, ParseError {
            error: ParseErrorType::ExpectedRightParen,
            line: Line(1),
            at: "end".to_string()
        });
        assert_eq!(error.to_string(), "[line 1] Error at end: Expect ')' after expression.");

        let error = parse("(1 2)").unwrap_err();
        assert_eq!(error.at, "'2'");
    }

    #[test]
    fn expected_expression() {
        let error = parse("1 +").unwrap_err();
        assert_eq!(error.to_string(), "[line 1] Error at end: Expect expression.");

        let error = parse("\n)").unwrap_err();
        assert_eq!(error.to_string(), "[line 2] Error at ')': Expect expression.");

        let error = parse("").unwrap_err();
        assert_eq!(error.error, ParseErrorType::ExpectedExpression);

        // Identifiers are scanned but not part of the expression grammar
        let error = parse("foo").unwrap_err();
        assert_eq!(error.at, "'foo'");
    }

    #[test]
    fn trailing_tokens() {
        let error = parse("1 2").unwrap_err();
        assert_eq!(error.to_string(), "[line 1] Error at '2': Expect end of expression.");

        let error = parse("(1))").unwrap_err();
        assert_eq!(error.error, ParseErrorType::ExpectedEndOfExpression);
    }

    #[test]
    fn eof_is_appended_if_missing() {
        let expr = Parser::new(vec![Token::new(TokenData::Number(4.0), "4", Line(1))]).parse();
        assert_eq!(expr, Ok(Expr::Literal(LiteralValue::Number(4.0))));

        let error = Parser::new(Vec::new()).parse().unwrap_err();
        assert_eq!(error.at, "end");
    }

    #[test]
    fn diagnostic() {
        let diagnostic: Diagnostic = parse("(").unwrap_err().into();
        assert_eq!(diagnostic, Diagnostic::new(Line(1), " at end", "Expect expression."));
    }
}
