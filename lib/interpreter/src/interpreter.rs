use cursor::Line;
use errors::{Diagnostic, Diagnostics, Reporter};
use log::{debug, trace};
use parser::{Expr, Parser};
use scanner::{Scanned, Token, TokenType};

mod value;
pub use value::Value;

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum RuntimeErrorType {
    #[error("Operand must be a number.")]
    OperandMustBeNumber,
    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers,
    #[error("Operands must be two numbers or include a string.")]
    InvalidAdditionOperands,
    /// Only reachable through hand-built trees, the parser never produces these.
    #[error("Invalid unary operator.")]
    InvalidUnaryOperator,
    #[error("Invalid binary operator.")]
    InvalidBinaryOperator,
}

impl RuntimeErrorType {
    fn at(self, operator: &Token) -> RuntimeError {
        RuntimeError { error: self, line: operator.line(), operator: operator.lexeme().to_string() }
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("{error}")]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub line: Line,
    pub operator: String,
}

impl From<RuntimeError> for Diagnostic {
    fn from(e: RuntimeError) -> Self {
        Diagnostic::new(e.line, format!(" at '{}'", e.operator), e.error)
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum InterpretError {
    /// Lexical or syntax errors, evaluation was not attempted.
    #[error("{0}")]
    CompileError(Diagnostics),
    #[error("{0}")]
    RuntimeError(RuntimeError),
}

/// Reduces an expression tree to a single value, the first runtime error aborts the whole evaluation.
pub fn evaluate(expr: &Expr) -> Result<Value, RuntimeError> {
    trace!("Evaluating {}", expr);
    match expr {
        Expr::Literal(value) => Ok(value.into()),

        Expr::Grouping(expr) => evaluate(expr),

        Expr::Unary { operator, right } => {
            let right = evaluate(right)?;
            match (operator.ty(), right) {
                (TokenType::Minus, Value::Number(n)) => Ok((-n).into()),
                (TokenType::Minus, _) => Err(RuntimeErrorType::OperandMustBeNumber.at(operator)),
                (TokenType::Bang, v) => Ok((!v.is_truthy()).into()),
                _ => Err(RuntimeErrorType::InvalidUnaryOperator.at(operator)),
            }
        }

        Expr::Binary { left, operator, right } => {
            // Left operand is always evaluated first
            let left = evaluate(left)?;
            let right = evaluate(right)?;
            binary(operator, left, right)
        }
    }
}

fn binary(operator: &Token, left: Value, right: Value) -> Result<Value, RuntimeError> {
    use TokenType::*;
    match (operator.ty(), left, right) {
        (Minus, Value::Number(l), Value::Number(r)) => Ok((l - r).into()),
        (Slash, Value::Number(l), Value::Number(r)) => Ok((l / r).into()),
        (Star, Value::Number(l), Value::Number(r)) => Ok((l * r).into()),
        (Plus, Value::Number(l), Value::Number(r)) => Ok((l + r).into()),

        // Anything gets concatenated to a string by its display form
        (Plus, l @ Value::Str(_), r) | (Plus, l, r @ Value::Str(_)) => {
            Ok(format!("{l}{r}").into())
        }
        (Plus, _, _) => Err(RuntimeErrorType::InvalidAdditionOperands.at(operator)),

        (Greater, Value::Number(l), Value::Number(r)) => Ok((l > r).into()),
        (GreaterEqual, Value::Number(l), Value::Number(r)) => Ok((l >= r).into()),
        (Less, Value::Number(l), Value::Number(r)) => Ok((l < r).into()),
        (LessEqual, Value::Number(l), Value::Number(r)) => Ok((l <= r).into()),

        (Minus | Slash | Star | Greater | GreaterEqual | Less | LessEqual, _, _) => {
            Err(RuntimeErrorType::OperandsMustBeNumbers.at(operator))
        }

        (EqualEqual, l, r) => Ok((l == r).into()),
        (BangEqual, l, r) => Ok((l != r).into()),

        _ => Err(RuntimeErrorType::InvalidBinaryOperator.at(operator)),
    }
}

/// Scans `source`, reporting every lexical error if there are any.
pub fn scan_source<'a, R: Reporter + ?Sized>(
    source: &'a str,
    reporter: &mut R,
) -> Result<Vec<Token<'a>>, InterpretError> {
    let Scanned { tokens, errors } = scanner::scan(source);
    debug!("Scanned {} tokens, {} errors", tokens.len(), errors.len());

    if errors.is_empty() {
        return Ok(tokens);
    }

    let diagnostics: Diagnostics = errors.into_iter().map(Diagnostic::from).collect();
    diagnostics.report_to(reporter);
    Err(InterpretError::CompileError(diagnostics))
}

/// Scans and parses `source`. Parsing is skipped if scanning failed.
pub fn parse_source<'a, R: Reporter + ?Sized>(
    source: &'a str,
    reporter: &mut R,
) -> Result<Expr<'a>, InterpretError> {
    let tokens = scan_source(source, reporter)?;
    parse_tokens(tokens, reporter)
}

/// Parses an already scanned token sequence, reporting the syntax error if there is one.
pub fn parse_tokens<'a, R: Reporter + ?Sized>(
    tokens: Vec<Token<'a>>,
    reporter: &mut R,
) -> Result<Expr<'a>, InterpretError> {
    Parser::new(tokens).parse().map_err(|e| {
        debug!("Parsing failed: {}", e);
        let diagnostic = Diagnostic::from(e);
        diagnostic.report_to(reporter);
        InterpretError::CompileError(diagnostic.into())
    })
}

/// Runs one unit of work through scanning, parsing and evaluation.
pub fn run_source<R: Reporter + ?Sized>(
    source: &str,
    reporter: &mut R,
) -> Result<Value, InterpretError> {
    let expr = parse_source(source, reporter)?;
    debug!("Parsed {}", expr);

    evaluate(&expr).map_err(|e| {
        debug!("Runtime error: {:?}", e);
        Diagnostic::from(e.clone()).report_to(reporter);
        InterpretError::RuntimeError(e)
    })
}
