//! Origin node types produced by the markup scanner.

/// Options switching on the grammar pieces a dialect needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Top-level `{...}` spans become expression origins.
    pub brace_expressions: bool,
    /// `{#kw}` / `{:kw}` / `{/kw}` control-block structure.
    pub control_blocks: bool,
    /// `<>` / `</>` nameless fragments.
    pub nameless_fragment: bool,
    /// Elements inside expression bodies are lifted out as extra roots,
    /// tagged with the enclosing expression's ordinal.
    pub expression_elements: bool,
    /// Missing end tags are an error instead of auto-closing.
    pub require_end_tags: bool,
    /// Tag names match case-sensitively.
    pub case_sensitive: bool,
}

/// A scanner failure, located by character offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    /// What went wrong.
    pub message: String,
    /// Character offset of the failure.
    pub offset: usize,
}

/// The element-specific spans of an element origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpans {
    /// The tag name as written; empty for a nameless fragment.
    pub name: String,
    /// Offset one past the `>` of the start tag.
    pub start_tag_end: usize,
    /// Span of the end tag, when one was written.
    pub end_tag: Option<(usize, usize)>,
    /// True for `<br/>`-style self-closing syntax.
    pub self_closing: bool,
}

/// What kind of origin a scanner node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupKind {
    /// An element; children are its content.
    Element(ElementSpans),
    /// A run of character data.
    Text,
    /// A comment, including bogus comments (`<!...>`), which is how
    /// masked foreign regions surface as discrete nodes.
    Comment,
    /// A doctype declaration.
    Doctype,
    /// A brace expression; the ordinal identifies it for element lifting.
    Expression {
        /// Document-order expression counter.
        ordinal: usize,
    },
    /// One branch keyword of a control construct (`{#if}`, `{:else}`);
    /// children are the branch content.
    ControlBranch {
        /// The keyword as written (`if`, `else if`, `then`, ...).
        keyword: String,
    },
    /// The closing keyword of a control construct (`{/if}`).
    ControlEnd {
        /// The keyword as written (`if`, `each`, ...).
        keyword: String,
    },
    /// A stray end tag with no open element.
    Invalid,
}

impl MarkupKind {
    /// A short name for error messages.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            MarkupKind::Element(spans) => &spans.name,
            MarkupKind::Text => "#text",
            MarkupKind::Comment => "#comment",
            MarkupKind::Doctype => "#doctype",
            MarkupKind::Expression { .. } => "#expression",
            MarkupKind::ControlBranch { keyword } | MarkupKind::ControlEnd { keyword } => keyword,
            MarkupKind::Invalid => "#invalid",
        }
    }
}

/// One origin node with its span and children.
///
/// The span is optional by interface contract: normalizers must reject a
/// node without one. The bundled scanner always populates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupNode {
    /// What this origin is.
    pub kind: MarkupKind,
    /// Character span in the scanned source.
    pub span: Option<(usize, usize)>,
    /// Content origins, in document order.
    pub children: Vec<MarkupNode>,
    /// For lifted nodes: the ordinal of the expression that contains
    /// this node.
    pub parent_expression: Option<usize>,
}

impl MarkupNode {
    /// A childless origin of the given kind and span.
    #[must_use]
    pub fn leaf(kind: MarkupKind, span: (usize, usize)) -> Self {
        MarkupNode {
            kind,
            span: Some(span),
            children: Vec::new(),
            parent_expression: None,
        }
    }
}

/// Everything one scan produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// The origin tree roots in document order.
    pub roots: Vec<MarkupNode>,
    /// Elements lifted out of expression bodies, tagged with their
    /// enclosing expression's ordinal.
    pub lifted: Vec<MarkupNode>,
}
