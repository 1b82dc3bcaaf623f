//! Source-located token spans.

use serde::Serialize;

/// A contiguous span of source text with its exact location.
///
/// Offsets are 0-based **character** indices into the source handed to the
/// dialect oracle; lines and columns are 1-based. The invariant
/// `end_offset - start_offset == raw.chars().count()` holds for every
/// token, including tokens whose raw was patched by the restorer (the
/// splice always substitutes text of identical character length).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The exact source text of the span.
    pub raw: String,
    /// 0-based character offset of the first character.
    pub start_offset: usize,
    /// 0-based character offset one past the last character.
    pub end_offset: usize,
    /// 1-based line of the first character.
    pub start_line: usize,
    /// 1-based line one past the last character.
    pub end_line: usize,
    /// 1-based column of the first character.
    pub start_col: usize,
    /// 1-based column one past the last character.
    pub end_col: usize,
}

impl Token {
    /// Build a token from its raw text and start location, deriving the
    /// end location by walking the raw text.
    #[must_use]
    pub fn with_location(raw: &str, start_offset: usize, start_line: usize, start_col: usize) -> Self {
        let (end_line, end_col) = advance(start_line, start_col, raw);
        Token {
            raw: raw.to_string(),
            start_offset,
            end_offset: start_offset + raw.chars().count(),
            start_line,
            end_line,
            start_col,
            end_col,
        }
    }

    /// An empty token anchored at the given location.
    #[must_use]
    pub fn empty(offset: usize, line: usize, col: usize) -> Self {
        Self::with_location("", offset, line, col)
    }

    /// The location one past the end of this token, as `(offset, line, col)`.
    ///
    /// Feeding this into [`Token::with_location`] for the next raw slice
    /// keeps a cursor walking through contiguous source.
    #[must_use]
    pub fn end_location(&self) -> (usize, usize, usize) {
        (self.end_offset, self.end_line, self.end_col)
    }

    /// Number of characters in the span.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    /// True if the span is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start_offset == self.end_offset
    }
}

/// Walk `raw` from a start line/col and return the line/col one past its
/// last character. A line feed moves to column 1 of the next line; every
/// other character (including `\r` and `\t`) advances one column.
#[must_use]
pub fn advance(start_line: usize, start_col: usize, raw: &str) -> (usize, usize) {
    let mut line = start_line;
    let mut col = start_col;
    for c in raw.chars() {
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}
