//! The plain-markup dialect.

use quokka_ast::NodeId;
use quokka_parser::{
    Dialect, EndTagPolicy, IgnoreTag, Oracle, ParseContext, ParseResult, ParserConfig, ParserError,
};

use crate::oracle::{MarkupKind, MarkupNode, ScanOptions, scan};

/// The plain-markup dialect: omittable end tags, default quotes, no
/// brace constructs. Foreign scriptlet tags can be masked by configuring
/// ignore tags.
#[derive(Debug)]
pub struct HtmlDialect {
    config: ParserConfig,
}

impl HtmlDialect {
    /// The dialect with its stock configuration.
    #[must_use]
    pub fn new() -> Self {
        HtmlDialect {
            config: ParserConfig {
                as_attr_override: true,
                ..ParserConfig::default()
            },
        }
    }

    /// The dialect with scriptlet masking, e.g. `<% ... %>` tags.
    #[must_use]
    pub fn with_ignore_tags(ignore_tags: Vec<IgnoreTag>) -> Self {
        let mut dialect = Self::new();
        dialect.config.ignore_tags = ignore_tags;
        dialect
    }

    /// The dialect with explicitly configured component names.
    #[must_use]
    pub fn with_authored_element_names(names: Vec<String>) -> Self {
        let mut dialect = Self::new();
        dialect.config.authored_element_names = names;
        dialect
    }
}

impl Default for HtmlDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for HtmlDialect {
    type Origin = MarkupNode;

    fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn tokenize(&self, masked: &str) -> Result<Oracle<MarkupNode>, ParserError> {
        let options = ScanOptions {
            require_end_tags: self.config.end_tag_policy == EndTagPolicy::Required,
            case_sensitive: self.config.tag_name_case_sensitive,
            ..ScanOptions::default()
        };
        let result = scan(masked, options)
            .map_err(|err| self.parse_error(&err.message, err.offset, masked))?;
        Ok(Oracle {
            roots: result.roots,
            is_fragment: is_fragment(masked),
        })
    }

    fn nodeize(
        &self,
        ctx: &mut ParseContext,
        origin: &MarkupNode,
        parent: Option<NodeId>,
        depth: u32,
    ) -> Result<Vec<NodeId>, ParserError> {
        nodeize_markup(self, ctx, origin, parent, depth)
    }
}

/// Normalize one markup origin into canonical nodes. Shared with the
/// dialects that extend the markup grammar.
///
/// # Errors
/// [`ParserError::MissingPosition`] for span-less origins; attribute
/// tokenizing errors.
pub fn nodeize_markup<D: Dialect<Origin = MarkupNode>>(
    dialect: &D,
    ctx: &mut ParseContext,
    origin: &MarkupNode,
    parent: Option<NodeId>,
    depth: u32,
) -> Result<Vec<NodeId>, ParserError> {
    let (start, end) = origin.span.ok_or_else(|| ParserError::MissingPosition {
        node_name: origin.kind.label().to_string(),
    })?;

    match &origin.kind {
        MarkupKind::Text => Ok(vec![ctx.visit_text(ctx.slice(start, end), parent, depth)]),
        MarkupKind::Comment => Ok(vec![ctx.visit_comment(ctx.slice(start, end), parent, depth)]),
        MarkupKind::Doctype => Ok(vec![ctx.visit_doctype(ctx.slice(start, end), parent, depth)]),
        MarkupKind::Invalid => Ok(vec![ctx.visit_invalid(ctx.slice(start, end), parent, depth)]),
        MarkupKind::Element(spans) => {
            let start_tag = ctx.slice(start, spans.start_tag_end);
            let end_tag = spans.end_tag.map(|(from, to)| ctx.slice(from, to));
            let node_name = if spans.name.is_empty() {
                "#jsx-fragment"
            } else {
                spans.name.as_str()
            };

            let (start_id, end_id) =
                ctx.visit_element(dialect, start_tag, node_name, parent, depth, end_tag)?;

            for child in &origin.children {
                let ids = dialect.nodeize(ctx, child, Some(start_id), depth + 1)?;
                for id in ids {
                    ctx.append_child(start_id, id);
                }
            }

            match end_id {
                Some(end_id) => Ok(vec![start_id, end_id]),
                None => Ok(vec![start_id]),
            }
        }
        MarkupKind::Expression { ordinal } => {
            let transparent = dialect
                .config()
                .transparent_blocks
                .iter()
                .any(|b| b == "expression");
            let id = ctx.visit_ps_block(ctx.slice(start, end), "expression", transparent, parent, depth);
            let _ = ctx.expression_owner.insert(id, *ordinal);
            Ok(vec![id])
        }
        MarkupKind::ControlBranch { keyword } => {
            let block_type = keyword.replace(' ', "-");
            let transparent = is_transparent(dialect.config(), &block_type);
            let id = ctx.visit_ps_block(ctx.slice(start, end), &block_type, transparent, parent, depth);

            for child in &origin.children {
                let ids = dialect.nodeize(ctx, child, Some(id), depth + 1)?;
                for child_id in ids {
                    ctx.append_child(id, child_id);
                }
            }
            Ok(vec![id])
        }
        MarkupKind::ControlEnd { keyword } => {
            let block_type = format!("/{keyword}");
            let transparent = is_transparent(dialect.config(), &block_type);
            Ok(vec![ctx.visit_ps_block(
                ctx.slice(start, end),
                &block_type,
                transparent,
                parent,
                depth,
            )])
        }
    }
}

fn is_transparent(config: &ParserConfig, block_type: &str) -> bool {
    config.transparent_blocks.iter().any(|b| b == block_type)
}

/// A document (not a fragment) announces itself with a doctype or an
/// `<html>` root.
fn is_fragment(source: &str) -> bool {
    let head = source.trim_start().to_ascii_lowercase();
    !(head.starts_with("<!doctype") || head.starts_with("<html"))
}

/// Parse plain markup with the stock dialect configuration.
///
/// # Errors
/// Any [`ParserError`] raised along the pipeline.
pub fn parse(source: &str) -> Result<ParseResult, ParserError> {
    quokka_parser::parse(&HtmlDialect::new(), source)
}
