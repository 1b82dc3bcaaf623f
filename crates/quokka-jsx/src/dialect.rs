//! The JSX-like dialect.
//!
//! JSX sources are always fragments, tag names are case-sensitive
//! (capitalized names are components), attribute values may be
//! brace-quoted expressions, and spread attributes are allowed.
//! Expression children (`{...}`) become block nodes; elements written
//! inside expression bodies have no syntactic parent, so a post-pass
//! regroups them under their expression's block.

use std::collections::HashMap;

use quokka_ast::{Attr, NodeId};
use quokka_html::{MarkupNode, ScanOptions, nodeize_markup, scan};
use quokka_parser::{
    Dialect, EndTagPolicy, Oracle, ParseContext, ParseResult, ParserConfig, ParserError, QuoteSet,
    RawAttr, default_visit_attr,
};
use regex::Regex;

use crate::idl::search_idl_attribute;

/// Quote pairs for JSX attribute values: conventional quotes plus
/// brace-quoted expressions.
const JSX_QUOTE_SET: &[QuoteSet] = &[
    QuoteSet { start: "\"", end: "\"" },
    QuoteSet { start: "'", end: "'" },
    QuoteSet { start: "{", end: "}" },
];

/// Nested delimiters allowed inside a brace-quoted value.
const JSX_QUOTE_IN_VALUE: &[QuoteSet] = &[
    QuoteSet { start: "\"", end: "\"" },
    QuoteSet { start: "'", end: "'" },
    QuoteSet { start: "`", end: "`" },
    QuoteSet { start: "${", end: "}" },
];

/// The JSX-like dialect.
#[derive(Debug)]
pub struct JsxDialect {
    config: ParserConfig,
}

impl JsxDialect {
    /// The dialect with its stock configuration.
    ///
    /// # Panics
    /// Panics if the built-in component pattern fails to compile, which
    /// indicates a programming error.
    #[must_use]
    pub fn new() -> Self {
        JsxDialect {
            config: ParserConfig {
                quote_set: JSX_QUOTE_SET.to_vec(),
                quote_in_value_chars: JSX_QUOTE_IN_VALUE.to_vec(),
                end_tag_policy: EndTagPolicy::Required,
                tag_name_case_sensitive: true,
                recognize_spread: true,
                transparent_blocks: vec!["expression".to_string()],
                // User-defined components must be capitalized (or
                // member expressions).
                component_pattern: Some(
                    Regex::new(r"^[A-Z]|\.").expect("component pattern must compile"),
                ),
                ..ParserConfig::default()
            },
        }
    }
}

impl Default for JsxDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for JsxDialect {
    type Origin = MarkupNode;

    fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn tokenize(&self, masked: &str) -> Result<Oracle<MarkupNode>, ParserError> {
        let result = scan(
            masked,
            ScanOptions {
                brace_expressions: true,
                nameless_fragment: true,
                expression_elements: true,
                require_end_tags: self.config.end_tag_policy == EndTagPolicy::Required,
                case_sensitive: self.config.tag_name_case_sensitive,
                control_blocks: false,
            },
        )
        .map_err(|err| self.parse_error(&err.message, err.offset, masked))?;

        let mut roots = result.roots;
        roots.extend(result.lifted);
        Ok(Oracle {
            roots,
            is_fragment: true,
        })
    }

    fn nodeize(
        &self,
        ctx: &mut ParseContext,
        origin: &MarkupNode,
        parent: Option<NodeId>,
        depth: u32,
    ) -> Result<Vec<NodeId>, ParserError> {
        let ids = nodeize_markup(self, ctx, origin, parent, depth)?;
        if let Some(ordinal) = origin.parent_expression {
            for &id in &ids {
                let _ = ctx.expression_of.insert(id, ordinal);
            }
        }
        Ok(ids)
    }

    fn visit_attr(&self, raw: RawAttr) -> Attr {
        let mut attr = match default_visit_attr(raw) {
            Attr::Html(attr) => attr,
            spread => return spread,
        };

        let (idl_prop_name, content_attr_name) = search_idl_attribute(&attr.name.raw);
        if content_attr_name != attr.name.raw {
            attr.potential_name = Some(content_attr_name);
        }
        if idl_prop_name != attr.name.raw {
            attr.candidate = Some(idl_prop_name);
        }

        Attr::Html(attr)
    }

    fn after_flatten(&self, ctx: &mut ParseContext) -> Result<(), ParserError> {
        if ctx.expression_of.is_empty() {
            return Ok(());
        }

        let owners: HashMap<usize, NodeId> = ctx
            .expression_owner
            .iter()
            .map(|(&id, &ordinal)| (ordinal, id))
            .collect();

        // Reattach orphans in document order so child lists stay sorted.
        let mut orphans: Vec<(NodeId, usize)> = ctx
            .expression_of
            .iter()
            .map(|(&id, &ordinal)| (id, ordinal))
            .collect();
        orphans.sort_by_key(|&(id, _)| ctx.arena.get(id).token.start_offset);

        for (id, ordinal) in orphans {
            if ctx.arena.get(id).parent.is_some() {
                continue;
            }
            let Some(&block) = owners.get(&ordinal) else {
                continue;
            };
            ctx.append_child(block, id);
        }

        let arena = &ctx.arena;
        ctx.roots.retain(|&root| arena.get(root).parent.is_none());

        Ok(())
    }
}

/// Parse a JSX fragment with the stock dialect configuration.
///
/// # Errors
/// Any [`ParserError`] raised along the pipeline.
pub fn parse(source: &str) -> Result<ParseResult, ParserError> {
    quokka_parser::parse(&JsxDialect::new(), source)
}
