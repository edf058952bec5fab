use std::{fmt::Formatter, str::Chars};

/// 1-based line number in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, derive_more::Display)]
pub struct Line(pub usize);

/// Walks over the characters of a source string while keeping track of the line.
///
/// Two cursors over the same source mark the bounds of a lexeme, see [`Cursor::slice_until`].
#[derive(Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    chars: Chars<'a>,
    line: Line,
}

impl<'a> std::fmt::Debug for Cursor<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // The source is usually too long to be useful here
        f.debug_struct("Cursor")
            .field("line", &self.line)
            .field("offset", &self.offset())
            .finish()
    }
}

impl<'a> PartialEq for Cursor<'a> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.source, other.source) && self.offset() == other.offset()
    }
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, chars: source.chars(), line: Line(1) }
    }

    pub fn line(&self) -> Line {
        self.line
    }

    /// Byte offset of the next character.
    pub fn offset(&self) -> usize {
        self.source.len() - self.chars.as_str().len()
    }

    pub fn is_at_end(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    pub fn peek_next(&self) -> Option<char> {
        self.chars.clone().nth(1)
    }

    /// Consumes the next character only if it equals `expected`.
    pub fn advance_if_eq(&mut self, expected: char) -> bool {
        self.advance_if(|c| c == expected)
    }

    pub fn advance_if(&mut self, pred: impl Fn(char) -> bool) -> bool {
        match self.peek() {
            Some(c) if pred(c) => {
                self.next();
                true
            }
            _ => false,
        }
    }

    /// Consumes characters as long as `pred` holds. Stops in front of the first one that doesn't.
    pub fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.advance_if(&pred) {}
    }

    pub fn slice_until(&self, end: &Cursor<'a>) -> &'a str {
        // Same source, not merely equal text
        assert!(std::ptr::eq(self.source, end.source));
        &self.source[self.offset()..end.offset()]
    }
}

impl<'a> From<&'a str> for Cursor<'a> {
    fn from(source: &'a str) -> Self {
        Self::new(source)
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line.0 += 1;
        }
        c
    }
}
