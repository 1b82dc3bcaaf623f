//! The component-template dialect.
//!
//! Templates interleave markup with control blocks (`{#if}` / `{:else}` /
//! `{/if}`, `{#each}`, `{#await}`) and interpolation (`{expr}`). Every
//! control keyword becomes one block node (an if/else/end sequence
//! yields one block per keyword, not one enclosing block) with the
//! governed content nested beneath the branch keyword. Directive
//! attributes (`on:click`, `bind:value`) are marked so rules treat them
//! as non-literal.

use quokka_ast::{Attr, NodeId};
use quokka_html::{MarkupKind, MarkupNode, ScanOptions, nodeize_markup, scan};
use quokka_parser::{
    Dialect, EndTagPolicy, Oracle, ParseContext, ParseResult, ParserConfig, ParserError, QuoteSet,
    RawAttr, default_visit_attr,
};
use regex::Regex;

/// Quote pairs for template attribute values.
const TEMPLATE_QUOTE_SET: &[QuoteSet] = &[
    QuoteSet { start: "\"", end: "\"" },
    QuoteSet { start: "'", end: "'" },
    QuoteSet { start: "{", end: "}" },
];

/// Nested delimiters allowed inside a brace-quoted value.
const TEMPLATE_QUOTE_IN_VALUE: &[QuoteSet] = &[
    QuoteSet { start: "\"", end: "\"" },
    QuoteSet { start: "'", end: "'" },
    QuoteSet { start: "`", end: "`" },
    QuoteSet { start: "${", end: "}" },
];

/// Attribute name prefixes that form directives.
const DIRECTIVE_PREFIXES: &[&str] = &[
    "on",
    "bind",
    "class",
    "style",
    "use",
    "transition",
    "in",
    "out",
    "animate",
    "let",
];

/// Control-block types skipped by the DOM view when resolving ancestry:
/// an element inside `{#if}` reports the element around the block as its
/// parent.
const TRANSPARENT_BLOCKS: &[&str] = &[
    "if", "else-if", "else", "/if", "each", "/each", "key", "/key", "await", "then", "catch",
    "/await",
];

/// The component-template dialect.
#[derive(Debug)]
pub struct TemplateDialect {
    config: ParserConfig,
}

impl TemplateDialect {
    /// The dialect with its stock configuration.
    ///
    /// # Panics
    /// Panics if the built-in component pattern fails to compile, which
    /// indicates a programming error.
    #[must_use]
    pub fn new() -> Self {
        TemplateDialect {
            config: ParserConfig {
                quote_set: TEMPLATE_QUOTE_SET.to_vec(),
                quote_in_value_chars: TEMPLATE_QUOTE_IN_VALUE.to_vec(),
                end_tag_policy: EndTagPolicy::Required,
                tag_name_case_sensitive: true,
                recognize_spread: true,
                transparent_blocks: TRANSPARENT_BLOCKS.iter().map(ToString::to_string).collect(),
                component_pattern: Some(
                    Regex::new(r"^[A-Z]|\.").expect("component pattern must compile"),
                ),
                ..ParserConfig::default()
            },
        }
    }
}

impl Default for TemplateDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for TemplateDialect {
    type Origin = MarkupNode;

    fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn tokenize(&self, masked: &str) -> Result<Oracle<MarkupNode>, ParserError> {
        let result = scan(
            masked,
            ScanOptions {
                brace_expressions: true,
                control_blocks: true,
                require_end_tags: self.config.end_tag_policy == EndTagPolicy::Required,
                case_sensitive: self.config.tag_name_case_sensitive,
                nameless_fragment: false,
                expression_elements: false,
            },
        )
        .map_err(|err| self.parse_error(&err.message, err.offset, masked))?;

        Ok(Oracle {
            roots: result.roots,
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
        // Interpolation is this dialect's name for a bare expression.
        if let MarkupKind::Expression { .. } = &origin.kind {
            let (start, end) = origin.span.ok_or_else(|| ParserError::MissingPosition {
                node_name: origin.kind.label().to_string(),
            })?;
            return Ok(vec![ctx.visit_ps_block(
                ctx.slice(start, end),
                "interpolation",
                false,
                parent,
                depth,
            )]);
        }

        nodeize_markup(self, ctx, origin, parent, depth)
    }

    fn visit_attr(&self, raw: RawAttr) -> Attr {
        let mut attr = match default_visit_attr(raw) {
            Attr::Html(attr) => attr,
            spread => return spread,
        };

        if let Some((prefix, rest)) = attr.name.raw.split_once(':')
            && !rest.is_empty()
            && DIRECTIVE_PREFIXES.contains(&prefix)
        {
            attr.is_directive = true;
            attr.potential_name = match prefix {
                // `bind:value` governs the attribute it binds;
                // `class:active` and `style:color` contribute to the
                // attribute their prefix names.
                "bind" => Some(rest.to_string()),
                "class" => Some("class".to_string()),
                "style" => Some("style".to_string()),
                _ => None,
            };
        }

        Attr::Html(attr)
    }
}

/// Parse a component template with the stock dialect configuration.
///
/// # Errors
/// Any [`ParserError`] raised along the pipeline.
pub fn parse(source: &str) -> Result<ParseResult, ParserError> {
    quokka_parser::parse(&TemplateDialect::new(), source)
}
