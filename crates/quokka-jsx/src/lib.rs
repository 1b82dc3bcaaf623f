//! JSX-like dialect for the quokka parsing core.
//!
//! # Scope
//!
//! - Brace-quoted dynamic attribute values and spread attributes
//! - IDL attribute resolution (`className` ⇒ `class`)
//! - Component classification by capitalized or dotted names
//! - Nameless fragments (`<>...</>`)
//! - Expression children as transparent block nodes, with elements
//!   inside expression bodies regrouped under their expression's block

/// The JSX-like dialect.
pub mod dialect;
/// IDL attribute resolution.
pub mod idl;

pub use dialect::{JsxDialect, parse};
pub use idl::search_idl_attribute;
