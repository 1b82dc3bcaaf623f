//! The bundled markup oracle.
//!
//! A character scanner producing a positioned origin tree. Every dialect
//! in the workspace configures this scanner as its oracle; the options
//! switch on the pieces each dialect grammar needs (brace expressions,
//! control blocks, nameless fragments, element lifting out of expression
//! bodies).

/// Origin node types and scan options.
pub mod node;
/// The scanner implementation.
pub mod scanner;

pub use node::{ElementSpans, MarkupKind, MarkupNode, ScanError, ScanOptions, ScanResult};
pub use scanner::scan;
