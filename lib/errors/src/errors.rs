use std::{
    fmt::Display,
    ops::{Deref, DerefMut},
};

use cursor::Line;
use itertools::Itertools;

/// Receives every lexical, syntax and runtime fault of a unit of work.
pub trait Reporter {
    /// `at` is either empty or starts with a space, e.g. `" at end"`.
    fn report(&mut self, line: Line, at: &str, message: &str);
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("[line {line}] Error{at}: {message}")]
pub struct Diagnostic {
    pub line: Line,
    pub at: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: Line, at: impl ToString, message: impl ToString) -> Self {
        Self { line, at: at.to_string(), message: message.to_string() }
    }

    pub fn report_to<R: Reporter + ?Sized>(&self, reporter: &mut R) {
        reporter.report(self.line, &self.at, &self.message);
    }
}

#[derive(thiserror::Error, Clone, Debug, Default, PartialEq)]
pub struct Diagnostics(pub Vec<Diagnostic>);

impl Diagnostics {
    pub fn report_to<R: Reporter + ?Sized>(&self, reporter: &mut R) {
        for diagnostic in &self.0 {
            diagnostic.report_to(reporter);
        }
    }
}

impl Reporter for Diagnostics {
    fn report(&mut self, line: Line, at: &str, message: &str) {
        self.0.push(Diagnostic::new(line, at, message));
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(d: Diagnostic) -> Self {
        Self(vec![d])
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<T: IntoIterator<Item = Diagnostic>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Deref for Diagnostics {
    type Target = Vec<Diagnostic>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Diagnostics {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}
