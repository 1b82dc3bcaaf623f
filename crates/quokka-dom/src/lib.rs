//! Read-only DOM-view adapter for the quokka parsing core.
//!
//! A DOM-API-shaped projection over the assembled node list: child,
//! parent, and sibling resolution with lazy one-shot caching, transparent
//! control-structure blocks, and tolerance for fragments and omitted
//! tags. The tree is built once by the parser and read thereafter;
//! every DOM mutation operation fails with an explicit error.

/// The document facade and its traversal accessors.
pub mod document;
/// DOM-view errors.
pub mod error;

pub use document::{Document, ParentRef};
pub use error::DomError;
