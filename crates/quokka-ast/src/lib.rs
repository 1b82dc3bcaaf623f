//! Canonical syntax-tree data model for the quokka parsing core.
//!
//! Every dialect adapter normalizes its oracle's output into the node
//! records defined here. The tree is built once per parse and read
//! thereafter; the only sanctioned mutations are the masked-block splices
//! performed by the restorer.
//!
//! # Design
//!
//! Nodes live in a per-parse arena and refer to each other through
//! [`NodeId`] indices. Parent, sibling, and pear links are plain indices,
//! never owning references, so the tree has no reference cycles and
//! serializes cleanly.

/// Node arena and identifiers.
pub mod arena;
/// Attribute records and their sub-tokens.
pub mod attr;
/// Node records, kinds, namespaces, and element classification.
pub mod node;
/// Source-located token spans.
pub mod token;

pub use arena::{NodeArena, NodeId};
pub use attr::{Attr, HtmlAttr, SpreadAttr};
pub use node::{ElementData, ElementType, Namespace, Node, NodeKind};
pub use token::Token;
