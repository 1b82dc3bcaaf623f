//! Dialect capability set and the parse engine.
//!
//! Each dialect supplies a small capability set: `tokenize` (its oracle),
//! `nodeize` (oracle node to canonical nodes), and attribute and
//! element-type hooks. The engine drives the shared pipeline around it:
//!
//! mask → oracle parse → normalize → flatten → regroup → sibling links →
//! pairing validation → restore masked blocks.
//!
//! There is no inheritance between dialects: shared behavior lives in the
//! trait's default methods and in [`ParseContext`]'s node constructors.

use std::collections::HashMap;

use quokka_ast::{
    Attr, ElementData, ElementType, HtmlAttr, Namespace, Node, NodeArena, NodeId, NodeKind,
    SpreadAttr, Token,
};
use regex::Regex;
use uuid::Uuid;

use crate::attr_tokenizer::{DEFAULT_END_OF_UNQUOTED_VALUE, DEFAULT_QUOTE_SET, QuoteSet};
use crate::error::ParserError;
use crate::ignore_block::{IgnoreTag, MASK_CHAR, ignore_block, restore_node};
use crate::location::{get_col, get_line, slice_fragment};
use crate::namespace::get_namespace;
use crate::tag::{RawAttr, TagParserOptions, tag_parser};

/// How a dialect treats a missing end tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndTagPolicy {
    /// Every non-self-closing element must have an end tag.
    Required,
    /// End tags may be omitted; elements auto-close.
    Omittable,
}

/// Static configuration of one dialect.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Value quote pairs for attribute tokenizing.
    pub quote_set: Vec<QuoteSet>,
    /// Nested quote-in-value delimiters.
    pub quote_in_value_chars: Vec<QuoteSet>,
    /// Characters terminating an unquoted attribute value.
    pub end_of_unquoted_value_chars: Vec<char>,
    /// End-tag policy.
    pub end_tag_policy: EndTagPolicy,
    /// Whether tag names are matched case-sensitively.
    pub tag_name_case_sensitive: bool,
    /// Whether `{...expr}` spread attributes are recognized.
    pub recognize_spread: bool,
    /// Foreign-code tags to mask before the oracle runs.
    pub ignore_tags: Vec<IgnoreTag>,
    /// Block types skipped by the DOM view when resolving ancestry.
    pub transparent_blocks: Vec<String>,
    /// Naming pattern that signals an authored component.
    pub component_pattern: Option<Regex>,
    /// Explicitly configured component names.
    pub authored_element_names: Vec<String>,
    /// Whether a static `as="tag"` attribute overrides the tag name used
    /// for element classification.
    pub as_attr_override: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            quote_set: DEFAULT_QUOTE_SET.to_vec(),
            quote_in_value_chars: Vec::new(),
            end_of_unquoted_value_chars: DEFAULT_END_OF_UNQUOTED_VALUE.to_vec(),
            end_tag_policy: EndTagPolicy::Omittable,
            tag_name_case_sensitive: false,
            recognize_spread: false,
            ignore_tags: Vec::new(),
            transparent_blocks: Vec::new(),
            component_pattern: None,
            authored_element_names: Vec::new(),
            as_attr_override: false,
        }
    }
}

/// What a dialect oracle returns.
#[derive(Debug, Clone)]
pub struct Oracle<N> {
    /// The root nodes of the dialect AST.
    pub roots: Vec<N>,
    /// Whether the source is a fragment rather than a full document.
    pub is_fragment: bool,
}

/// The assembled output of one parse call.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Arena owning every node.
    pub arena: NodeArena,
    /// The flat node list in document order (pre-order of the tree).
    pub list: Vec<NodeId>,
    /// Whether the source was parsed as a fragment.
    pub is_fragment: bool,
    /// The original, unmasked source.
    pub source: String,
}

/// One dialect's capability set.
pub trait Dialect {
    /// The oracle's node type.
    type Origin;

    /// The dialect's static configuration.
    fn config(&self) -> &ParserConfig;

    /// Run the oracle over the masked source.
    ///
    /// # Errors
    /// Oracle syntax errors, wrapped through [`Dialect::parse_error`].
    fn tokenize(&self, masked: &str) -> Result<Oracle<Self::Origin>, ParserError>;

    /// Map one oracle node to zero or more canonical nodes, recursing
    /// through its children.
    ///
    /// # Errors
    /// [`ParserError::MissingPosition`] when the oracle node carries no
    /// span; any error from attribute tokenizing.
    fn nodeize(
        &self,
        ctx: &mut ParseContext,
        origin: &Self::Origin,
        parent: Option<NodeId>,
        depth: u32,
    ) -> Result<Vec<NodeId>, ParserError>;

    /// Enrich one raw attribute into its canonical record.
    fn visit_attr(&self, raw: RawAttr) -> Attr {
        default_visit_attr(raw)
    }

    /// Classify an element by its (effective) name and namespace.
    fn detect_element_type(&self, node_name: &str, namespace: Namespace) -> ElementType {
        detect_element_type(self.config(), node_name, namespace)
    }

    /// Wrap an oracle failure into a located parse error.
    fn parse_error(&self, message: &str, offset: usize, masked: &str) -> ParserError {
        ParserError::Syntax {
            message: message.to_string(),
            line: get_line(masked, offset),
            col: get_col(masked, offset),
        }
    }

    /// Post-flatten hook; dialects whose grammars allow nodes with no
    /// syntactic parent regroup them here.
    ///
    /// # Errors
    /// Dialect-specific structural failures.
    fn after_flatten(&self, _ctx: &mut ParseContext) -> Result<(), ParserError> {
        Ok(())
    }
}

/// Classify an element name against a dialect configuration.
#[must_use]
pub fn detect_element_type(config: &ParserConfig, node_name: &str, namespace: Namespace) -> ElementType {
    // Synthetic names (nameless fragments) carry no authoring signal.
    if node_name.starts_with('#') {
        return ElementType::Standard;
    }
    if config.authored_element_names.iter().any(|n| n == node_name) {
        return ElementType::Component;
    }
    if config.component_pattern.as_ref().is_some_and(|p| p.is_match(node_name)) {
        return ElementType::Component;
    }
    if namespace != Namespace::Html {
        return ElementType::Foreign;
    }
    if node_name.contains('-') {
        return ElementType::Custom;
    }
    ElementType::Standard
}

/// The default attribute enrichment: brace-quoted values are dynamic,
/// nothing is a directive.
#[must_use]
pub fn default_visit_attr(raw: RawAttr) -> Attr {
    match raw {
        RawAttr::Html(parts) => {
            let is_dynamic = parts.start_quote.raw == "{" && parts.end_quote.raw == "}";
            Attr::Html(Box::new(HtmlAttr {
                uuid: Uuid::new_v4(),
                spaces_before_name: parts.spaces_before_name,
                name: parts.name,
                spaces_before_equal: parts.spaces_before_equal,
                equal: parts.equal,
                spaces_after_equal: parts.spaces_after_equal,
                start_quote: parts.start_quote,
                value: parts.value,
                end_quote: parts.end_quote,
                is_dynamic_value: is_dynamic,
                is_directive: false,
                potential_name: None,
                candidate: None,
            }))
        }
        RawAttr::Spread { spaces_before, token } => Attr::Spread(SpreadAttr {
            uuid: Uuid::new_v4(),
            spaces_before,
            token,
        }),
    }
}

/// Per-parse working state: the arena (which doubles as the identity
/// registry for this parse), the masked source, and the node
/// constructors every `nodeize` implementation builds on.
#[derive(Debug)]
pub struct ParseContext {
    /// Arena owning every node of this parse.
    pub arena: NodeArena,
    /// Root node ids in document order.
    pub roots: Vec<NodeId>,
    /// The flattened node list; populated by the engine after nodeizing.
    pub list: Vec<NodeId>,
    /// For expression psblocks: the expression ordinal each block owns.
    pub expression_owner: HashMap<NodeId, usize>,
    /// For nodes lifted out of expression bodies: the ordinal of the
    /// expression that contains them.
    pub expression_of: HashMap<NodeId, usize>,
    masked: String,
}

impl ParseContext {
    /// Fresh context over the masked source.
    #[must_use]
    pub fn new(masked: &str) -> Self {
        ParseContext {
            arena: NodeArena::new(),
            roots: Vec::new(),
            list: Vec::new(),
            expression_owner: HashMap::new(),
            expression_of: HashMap::new(),
            masked: masked.to_string(),
        }
    }

    /// The masked source this parse runs over.
    #[must_use]
    pub fn masked(&self) -> &str {
        &self.masked
    }

    /// Cut a located token out of the masked source.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> Token {
        slice_fragment(&self.masked, start, end)
    }

    /// Append a child to a parent's owned child list.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.arena.get_mut(parent).children.push(child);
        self.arena.get_mut(child).parent = Some(parent);
    }

    /// Create a text node.
    pub fn visit_text(&mut self, token: Token, parent: Option<NodeId>, depth: u32) -> NodeId {
        self.arena.alloc(Node::new(token, "#text", depth, parent, NodeKind::Text))
    }

    /// Create a comment node.
    pub fn visit_comment(&mut self, token: Token, parent: Option<NodeId>, depth: u32) -> NodeId {
        self.arena.alloc(Node::new(token, "#comment", depth, parent, NodeKind::Comment))
    }

    /// Create an invalid node for a syntactically present but
    /// unrepresentable region.
    pub fn visit_invalid(&mut self, token: Token, parent: Option<NodeId>, depth: u32) -> NodeId {
        self.arena.alloc(Node::new(token, "#invalid", depth, parent, NodeKind::Invalid))
    }

    /// Create a doctype node, extracting name and identifiers from the raw.
    pub fn visit_doctype(&mut self, token: Token, parent: Option<NodeId>, depth: u32) -> NodeId {
        let (name, public_id, system_id) = parse_doctype(&token.raw);
        self.arena.alloc(Node::new(
            token,
            "#doctype",
            depth,
            parent,
            NodeKind::Doctype { name, public_id, system_id },
        ))
    }

    /// Create a preprocessor-specific block node.
    pub fn visit_ps_block(
        &mut self,
        token: Token,
        block_type: &str,
        is_transparent: bool,
        parent: Option<NodeId>,
        depth: u32,
    ) -> NodeId {
        let node_name = format!("#ps:{block_type}");
        self.arena.alloc(Node::new(
            token,
            &node_name,
            depth,
            parent,
            NodeKind::PsBlock {
                block_type: block_type.to_string(),
                is_transparent,
            },
        ))
    }

    /// Create a start-tag node (and its end tag, when present), parsing
    /// attributes out of the raw start tag and resolving namespace and
    /// element type.
    ///
    /// Returns `(start, end)`; the caller appends both to the parent's
    /// child list and nests element content under `start`.
    ///
    /// # Errors
    /// Attribute tokenizing errors.
    pub fn visit_element<D: Dialect + ?Sized>(
        &mut self,
        dialect: &D,
        start_tag: Token,
        node_name: &str,
        parent: Option<NodeId>,
        depth: u32,
        end_tag: Option<Token>,
    ) -> Result<(NodeId, Option<NodeId>), ParserError> {
        let config = dialect.config();
        let tokens = tag_parser(
            &start_tag.raw,
            start_tag.start_offset,
            start_tag.start_line,
            start_tag.start_col,
            TagParserOptions {
                quote_set: &config.quote_set,
                quote_in_value_chars: &config.quote_in_value_chars,
                end_of_unquoted_value_chars: &config.end_of_unquoted_value_chars,
                recognize_spread: config.recognize_spread,
            },
        )?;

        let mut attributes = Vec::new();
        let mut has_spread_attr = false;
        for raw_attr in tokens.attrs {
            let attr = dialect.visit_attr(raw_attr);
            if matches!(attr, Attr::Spread(_)) {
                has_spread_attr = true;
            }
            attributes.push(attr);
        }

        let mut classified_name = node_name.to_string();
        if config.as_attr_override
            && let Some(name) = as_attr_value(&attributes)
        {
            classified_name = name;
        }

        let (parent_name, parent_namespace) = self.nearest_element_ancestor(parent);
        let namespace = get_namespace(node_name, parent_name.as_deref(), parent_namespace);
        let element_type = dialect.detect_element_type(&classified_name, namespace);

        let data = ElementData {
            namespace,
            element_type,
            attributes,
            has_spread_attr,
            self_closing_solidus: tokens.self_closing_solidus,
            pear: None,
            is_omitted: false,
        };
        let start_id = self
            .arena
            .alloc(Node::new(start_tag, node_name, depth, parent, NodeKind::StartTag(data)));

        let end_id = end_tag.map(|token| {
            self.arena.alloc(Node::new(
                token,
                node_name,
                depth,
                parent,
                NodeKind::EndTag {
                    pear: Some(start_id),
                    namespace,
                },
            ))
        });
        if let Some(end_id) = end_id
            && let Some(data) = self.arena.get_mut(start_id).element_mut()
        {
            data.pear = Some(end_id);
        }

        Ok((start_id, end_id))
    }

    /// The nearest element ancestor's name and namespace, defaulting to
    /// the HTML namespace at the root.
    #[must_use]
    pub fn nearest_element_ancestor(&self, mut parent: Option<NodeId>) -> (Option<String>, Namespace) {
        while let Some(id) = parent {
            let node = self.arena.get(id);
            if let NodeKind::StartTag(data) = &node.kind {
                return (Some(node.node_name.clone()), data.namespace);
            }
            parent = node.parent;
        }
        (None, Namespace::Html)
    }
}

/// The static value of an `as` attribute, if one is present.
fn as_attr_value(attributes: &[Attr]) -> Option<String> {
    attributes.iter().find_map(|attr| match attr {
        Attr::Html(attr)
            if attr.name.raw == "as" && !attr.is_dynamic_value && !attr.value.raw.is_empty() =>
        {
            Some(attr.value.raw.clone())
        }
        _ => None,
    })
}

/// Extract `(name, public_id, system_id)` from a raw doctype.
fn parse_doctype(raw: &str) -> (String, String, String) {
    let inner = raw
        .trim_start_matches('<')
        .trim_start_matches('!')
        .trim_end_matches('>');
    let rest = inner
        .get(..7)
        .filter(|head| head.eq_ignore_ascii_case("doctype"))
        .map_or(inner, |_| &inner[7..]);

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or("").to_string();

    let mut public_id = String::new();
    let mut system_id = String::new();
    let upper = rest.to_ascii_uppercase();
    let quoted: Vec<String> = quoted_strings(rest);
    if upper.contains("PUBLIC") {
        public_id = quoted.first().cloned().unwrap_or_default();
        system_id = quoted.get(1).cloned().unwrap_or_default();
    } else if upper.contains("SYSTEM") {
        system_id = quoted.first().cloned().unwrap_or_default();
    }

    (name, public_id, system_id)
}

/// All quoted strings of a doctype body, in order.
fn quoted_strings(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Option<(char, String)> = None;
    for c in text.chars() {
        match &mut current {
            Some((quote, acc)) => {
                if c == *quote {
                    out.push(std::mem::take(acc));
                    current = None;
                } else {
                    acc.push(c);
                }
            }
            None => {
                if c == '"' || c == '\'' {
                    current = Some((c, String::new()));
                }
            }
        }
    }
    out
}

/// Parse one document with the given dialect.
///
/// This is the single entry point: masking, the oracle, normalization,
/// assembly, and restoration run as one uninterrupted pass. All errors
/// propagate to the caller; nothing is retried.
///
/// # Errors
/// Any [`ParserError`] raised along the pipeline.
pub fn parse<D: Dialect>(dialect: &D, source: &str) -> Result<ParseResult, ParserError> {
    let mut ignore = ignore_block(source, &dialect.config().ignore_tags, MASK_CHAR);
    let oracle = dialect.tokenize(&ignore.replaced)?;

    let mut ctx = ParseContext::new(&ignore.replaced);
    for origin in &oracle.roots {
        let ids = dialect.nodeize(&mut ctx, origin, None, 0)?;
        ctx.roots.extend(ids);
    }

    ctx.list = flatten(&ctx.arena, &ctx.roots);
    dialect.after_flatten(&mut ctx)?;
    recompute_depths(&mut ctx.arena, &ctx.roots);
    link_siblings(&mut ctx.arena, &ctx.list);
    validate_pairing(&ctx.arena, &ctx.list)?;

    restore_node(
        &mut ctx.arena,
        &ctx.list,
        &mut ignore,
        &dialect.config().transparent_blocks,
    )?;

    Ok(ParseResult {
        arena: ctx.arena,
        list: ctx.list,
        is_fragment: oracle.is_fragment,
        source: source.to_string(),
    })
}

/// Flatten the tree into document order: a pre-order walk, then a stable
/// sort by start offset so end tags land after their element's content.
fn flatten(arena: &NodeArena, roots: &[NodeId]) -> Vec<NodeId> {
    fn walk(arena: &NodeArena, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        for &child in &arena.get(id).children {
            walk(arena, child, out);
        }
    }

    let mut list = Vec::with_capacity(arena.len());
    for &root in roots {
        walk(arena, root, &mut list);
    }
    list.sort_by_key(|&id| arena.get(id).token.start_offset);
    list
}

/// Re-derive every depth from the parent links (roots at depth 0).
fn recompute_depths(arena: &mut NodeArena, roots: &[NodeId]) {
    fn walk(arena: &mut NodeArena, id: NodeId, depth: u32) {
        arena.get_mut(id).depth = depth;
        let children = arena.get(id).children.clone();
        for child in children {
            walk(arena, child, depth + 1);
        }
    }

    for &root in roots {
        walk(arena, root, 0);
    }
}

/// Wire prev/next links between consecutive flat-list entries that share
/// a parent.
fn link_siblings(arena: &mut NodeArena, list: &[NodeId]) {
    let mut last_by_parent: HashMap<Option<NodeId>, NodeId> = HashMap::new();
    for &id in list {
        let parent = arena.get(id).parent;
        if let Some(&prev) = last_by_parent.get(&parent) {
            arena.get_mut(id).prev = Some(prev);
            arena.get_mut(prev).next = Some(id);
        }
        let _ = last_by_parent.insert(parent, id);
    }
}

/// Every pear link must be symmetric, and pears must share a parent.
fn validate_pairing(arena: &NodeArena, list: &[NodeId]) -> Result<(), ParserError> {
    for &id in list {
        let node = arena.get(id);
        if let Some(pear_id) = node.pear() {
            let pear = arena.get(pear_id);
            if pear.pear() != Some(id) {
                return Err(ParserError::HierarchyBroken {
                    detail: format!(
                        "tag pairing of {:?} is not symmetric",
                        node.node_name
                    ),
                });
            }
            if pear.parent != node.parent {
                return Err(ParserError::HierarchyBroken {
                    detail: format!(
                        "start and end tags of {:?} have different parents",
                        node.node_name
                    ),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doctype_with_public_and_system_ids() {
        let (name, public_id, system_id) = parse_doctype(
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">",
        );
        assert_eq!(name, "html");
        assert_eq!(public_id, "-//W3C//DTD XHTML 1.0//EN");
        assert_eq!(system_id, "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd");
    }

    #[test]
    fn bare_doctype() {
        let (name, public_id, system_id) = parse_doctype("<!DOCTYPE html>");
        assert_eq!(name, "html");
        assert_eq!(public_id, "");
        assert_eq!(system_id, "");
    }

    #[test]
    fn default_config_is_omittable_markup() {
        let config = ParserConfig::default();
        assert_eq!(config.end_tag_policy, EndTagPolicy::Omittable);
        assert!(!config.recognize_spread);
        assert!(config.ignore_tags.is_empty());
    }
}
