//! Parsing and normalization core shared by every dialect crate.
//!
//! # Scope
//!
//! This crate implements:
//! - **Attribute Tokenizer** - a quote-set parameterized state machine
//!   turning one raw attribute slice into its structural parts
//! - **Ignore-Block Masker / Restorer** - same-length masking of embedded
//!   foreign-language regions, and their re-splicing into the parsed tree
//! - **Location Slicer** - the character-offset / line / column
//!   coordinate system every component shares
//! - **Namespace resolution** - XHTML default with SVG/MathML switching
//! - **Dialect trait + parse engine** - the capability set each dialect
//!   implements, and the pipeline that masks, normalizes, assembles, and
//!   restores one document per call
//! - **Debug snapshot view** - the deterministic per-node line format
//!   golden tests compare against

/// Attribute tokenizer state machine.
pub mod attr_tokenizer;
/// Deterministic textual snapshots of node lists.
pub mod debug;
/// Parse error taxonomy.
pub mod error;
/// Ignore-block masking and restoration.
pub mod ignore_block;
/// Offset / line / column computation and source slicing.
pub mod location;
/// Element namespace resolution.
pub mod namespace;
/// Dialect capability set and the parse engine.
pub mod parser;
/// Start-tag parsing into located sub-tokens.
pub mod tag;

pub use attr_tokenizer::{
    AttrParts, AttrState, DEFAULT_END_OF_UNQUOTED_VALUE, DEFAULT_QUOTE_SET, DEFAULT_SPACES,
    QuoteSet, attr_tokenizer,
};
pub use debug::{node_list_debug_view, visible};
pub use error::ParserError;
pub use ignore_block::{IgnoreBlock, IgnoreTag, MASK_CHAR, MaskedCode, ignore_block, restore_node};
pub use location::{char_slice, get_col, get_line, slice_fragment};
pub use namespace::get_namespace;
pub use parser::{
    Dialect, EndTagPolicy, Oracle, ParseContext, ParseResult, ParserConfig, default_visit_attr,
    detect_element_type, parse,
};
pub use tag::{RawAttr, RawHtmlAttr, TagParserOptions, TagTokens, tag_parser};
