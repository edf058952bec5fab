use std::fmt::{self, Display, Formatter};

use scanner::Token;

/// Expression tree produced by the [`Parser`](crate::Parser). Each node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    Binary { left: Box<Expr<'a>>, operator: Token<'a>, right: Box<Expr<'a>> },
    Grouping(Box<Expr<'a>>),
    Unary { operator: Token<'a>, right: Box<Expr<'a>> },
    Literal(LiteralValue<'a>),
}

impl<'a> Expr<'a> {
    pub fn binary(left: Expr<'a>, operator: Token<'a>, right: Expr<'a>) -> Self {
        Expr::Binary { left: Box::new(left), operator, right: Box::new(right) }
    }

    pub fn unary(operator: Token<'a>, right: Expr<'a>) -> Self {
        Expr::Unary { operator, right: Box::new(right) }
    }

    pub fn grouping(inner: Expr<'a>) -> Self {
        Expr::Grouping(Box::new(inner))
    }
}

impl Display for Expr<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary { left, operator, right } => {
                write!(f, "({} {} {})", operator, left, right)
            }
            Expr::Grouping(expression) => {
                write!(f, "(group {})", expression)
            }
            Expr::Unary { operator, right } => {
                write!(f, "({} {})", operator, right)
            }
            Expr::Literal(value) => {
                write!(f, "{}", value)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue<'a> {
    Number(f64),
    Str(&'a str),
    Boolean(bool),
    Nil,
}

impl<'a> Display for LiteralValue<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Number(n) => write!(f, "{}", n),
            LiteralValue::Str(s) => write!(f, "\"{}\"", s),
            LiteralValue::Boolean(b) => write!(f, "{}", b),
            LiteralValue::Nil => write!(f, "nil"),
        }
    }
}
