//! Parse error taxonomy.
//!
//! Every variant is fatal for the parse that raised it. Errors propagate
//! to the caller of the parse entry point; nothing is retried or
//! recovered internally.

use thiserror::Error;

/// A fatal parsing failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParserError {
    /// A masked foreign-code block could not be re-attached to any node,
    /// meaning it landed somewhere the host grammar cannot represent.
    #[error("parsing failed, unsupported syntax detected: {raw:?} at {line}:{col}")]
    UnsupportedSyntax {
        /// 1-based line of the offending region in the original source.
        line: usize,
        /// 1-based column of the offending region.
        col: usize,
        /// The original raw text of the region.
        raw: String,
    },

    /// An oracle node arrived without the position information every
    /// adapter requires.
    #[error("oracle node {node_name:?} is missing position information")]
    MissingPosition {
        /// Name or kind of the offending oracle node.
        node_name: String,
    },

    /// An attribute value opened a quote that the input never closes.
    #[error("unclosed attribute value: {raw:?}")]
    UnclosedAttrValue {
        /// The raw attribute text being tokenized.
        raw: String,
    },

    /// Sibling nodes sit at inconsistent nesting depths where the
    /// dialect's grammar requires a single depth.
    #[error("broken node hierarchy: {detail}")]
    HierarchyBroken {
        /// Human-readable description of the violation.
        detail: String,
    },

    /// A syntax error reported by a dialect oracle, located in the
    /// original source.
    #[error("{message} at {line}:{col}")]
    Syntax {
        /// The oracle's message.
        message: String,
        /// 1-based line of the failure.
        line: usize,
        /// 1-based column of the failure.
        col: usize,
    },
}
