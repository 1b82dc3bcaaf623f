//! The coordinate system every other component relies on.
//!
//! All offsets in this workspace are 0-based character indices into the
//! source handed to the oracle; lines and columns are 1-based. Line and
//! column are always derivable from an offset by a monotonic scan, so the
//! same offset yields the same location no matter which component asks.

use quokka_ast::Token;

/// 1-based line of the character at `offset`.
#[must_use]
pub fn get_line(source: &str, offset: usize) -> usize {
    source.chars().take(offset).filter(|&c| c == '\n').count() + 1
}

/// 1-based column of the character at `offset`.
#[must_use]
pub fn get_col(source: &str, offset: usize) -> usize {
    let mut col = 1;
    for c in source.chars().take(offset) {
        if c == '\n' {
            col = 1;
        } else {
            col += 1;
        }
    }
    col
}

/// The substring between two character offsets.
#[must_use]
pub fn char_slice(source: &str, start: usize, end: usize) -> String {
    source.chars().skip(start).take(end.saturating_sub(start)).collect()
}

/// Cut a located [`Token`] out of the source between two character
/// offsets.
#[must_use]
pub fn slice_fragment(source: &str, start: usize, end: usize) -> Token {
    let raw = char_slice(source, start, end);
    Token::with_location(&raw, start, get_line(source, start), get_col(source, start))
}
