use std::fmt::{self, Display, Formatter};

use parser::LiteralValue;

/// Result of evaluating an expression.
///
/// Equality is structural: `Nil` is only equal to `Nil`, values of different variants are never
/// equal and numbers follow IEEE-754.
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
    #[from(ignore)]
    Nil,
}

impl Value {
    /// `nil` and `false` are falsey, everything else (including `0` and `""`) is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            _ => true,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Nil => write!(f, "nil"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<&LiteralValue<'_>> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match *literal {
            LiteralValue::Number(n) => n.into(),
            LiteralValue::Str(s) => s.into(),
            LiteralValue::Boolean(b) => b.into(),
            LiteralValue::Nil => Value::Nil,
        }
    }
}
