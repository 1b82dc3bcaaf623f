//! Plain-markup dialect for the quokka parsing core.
//!
//! # Scope
//!
//! This crate implements:
//! - **Markup Scanner** - the bundled oracle producing a positioned
//!   origin tree (tags, text, comments, doctypes), with options for the
//!   brace constructs the other dialects layer on top
//! - **Markup Dialect** - normalization of scanner output into canonical
//!   nodes: attribute parsing, namespace propagation, element
//!   classification, scriptlet masking via ignore tags

/// The markup dialect.
pub mod dialect;
/// The bundled markup scanner.
pub mod oracle;

pub use dialect::{HtmlDialect, nodeize_markup, parse};
pub use oracle::{ElementSpans, MarkupKind, MarkupNode, ScanError, ScanOptions, ScanResult, scan};
