//! Node records, kinds, namespaces, and element classification.

use serde::Serialize;
use strum_macros::Display;
use uuid::Uuid;

use crate::arena::NodeId;
use crate::attr::Attr;
use crate::token::Token;

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// One entry in the flattened node list. A node is a [`Token`] plus its
/// identity and tree links; the variant-specific payload lives in
/// [`NodeKind`].
///
/// `parent`, `prev`, `next`, and the pear links are weak back-references:
/// ownership of a node belongs solely to the arena, and the `children`
/// list of its parent records the tree shape.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    /// Process-unique identity, stable across passes over the same parse.
    pub uuid: Uuid,
    /// The source span this node covers.
    pub token: Token,
    /// `#text`, `#comment`, `#doctype`, `#ps:*`, or the tag name.
    pub node_name: String,
    /// Nesting level from the root set (root nodes have depth 0).
    pub depth: u32,
    /// Syntactic parent, or `None` for a root node.
    pub parent: Option<NodeId>,
    /// Previous sibling under the same parent, in document order.
    pub prev: Option<NodeId>,
    /// Next sibling under the same parent, in document order.
    pub next: Option<NodeId>,
    /// Owned, ordered child list. Matches the contiguous run of
    /// flat-list entries whose parent is this node.
    pub children: Vec<NodeId>,
    /// Variant-specific payload.
    pub kind: NodeKind,
}

impl Node {
    /// Create a node, minting a fresh identity.
    #[must_use]
    pub fn new(token: Token, node_name: &str, depth: u32, parent: Option<NodeId>, kind: NodeKind) -> Self {
        Node {
            uuid: Uuid::new_v4(),
            token,
            node_name: node_name.to_string(),
            depth,
            parent,
            prev: None,
            next: None,
            children: Vec::new(),
            kind,
        }
    }

    /// True for start-tag (element) nodes.
    #[must_use]
    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::StartTag(_))
    }

    /// True for preprocessor-specific block nodes.
    #[must_use]
    pub fn is_ps_block(&self) -> bool {
        matches!(self.kind, NodeKind::PsBlock { .. })
    }

    /// Element payload, if this node is a start tag.
    #[must_use]
    pub fn element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::StartTag(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable element payload, if this node is a start tag.
    pub fn element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.kind {
            NodeKind::StartTag(data) => Some(data),
            _ => None,
        }
    }

    /// The matching counterpart of a start/end tag pair, if any.
    #[must_use]
    pub fn pear(&self) -> Option<NodeId> {
        match &self.kind {
            NodeKind::StartTag(data) => data.pear,
            NodeKind::EndTag { pear, .. } => *pear,
            _ => None,
        }
    }
}

/// The tagged variant a node can be.
#[derive(Debug, Clone, Serialize)]
pub enum NodeKind {
    /// A document type declaration.
    Doctype {
        /// The root element name (`html` in `<!DOCTYPE html>`).
        name: String,
        /// The public identifier, empty if absent.
        public_id: String,
        /// The system identifier, empty if absent.
        system_id: String,
    },
    /// A run of character data.
    Text,
    /// A comment, including its delimiters in the raw.
    Comment,
    /// An element start tag. Owns the element payload.
    StartTag(ElementData),
    /// An element end tag.
    EndTag {
        /// The matching start tag, or `None` for a stray end tag.
        pear: Option<NodeId>,
        /// Namespace of the element this tag closes.
        namespace: Namespace,
    },
    /// A preprocessor-specific block: a non-markup construct (expression,
    /// control-flow keyword, masked foreign code) at its original
    /// document position.
    PsBlock {
        /// Dialect-specific block kind (`interpolation`, `if`, `ejs-tag`, ...).
        block_type: String,
        /// Whether the DOM view skips this block when resolving ancestry.
        is_transparent: bool,
    },
    /// A syntactically present but unrepresentable region (e.g. a stray
    /// end tag with no open element).
    Invalid,
}

/// Element-specific payload of a start-tag node.
#[derive(Debug, Clone, Serialize)]
pub struct ElementData {
    /// Resolved element namespace.
    pub namespace: Namespace,
    /// Classification by naming convention.
    pub element_type: ElementType,
    /// Ordered attribute list, as written.
    pub attributes: Vec<Attr>,
    /// True if any attribute is a spread attribute.
    pub has_spread_attr: bool,
    /// The `/` before `>` of a self-closing tag, if present.
    pub self_closing_solidus: Option<Token>,
    /// The matching end tag, or `None` if self-closing or omitted.
    pub pear: Option<NodeId>,
    /// True for elements with no syntactic tag text of their own.
    pub is_omitted: bool,
}

/// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
///
/// The namespace an element resolves to. The default content namespace is
/// XHTML; `svg` and `math` roots switch their descendants until an HTML
/// integration point reverts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Namespace {
    /// `http://www.w3.org/1999/xhtml`
    Html,
    /// `http://www.w3.org/2000/svg`
    Svg,
    /// `http://www.w3.org/1998/Math/MathML`
    MathMl,
}

impl Namespace {
    /// The canonical namespace URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Namespace::Html => "http://www.w3.org/1999/xhtml",
            Namespace::Svg => "http://www.w3.org/2000/svg",
            Namespace::MathMl => "http://www.w3.org/1998/Math/MathML",
        }
    }
}

/// Element classification by naming convention.
///
/// `Component` wins over the others when the dialect's component pattern
/// matches; `Foreign` covers elements outside the HTML namespace; `Custom`
/// follows the custom-element convention of a hyphenated name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
pub enum ElementType {
    /// A standard HTML element.
    Standard,
    /// A custom element (hyphenated name).
    Custom,
    /// An element in a non-HTML namespace.
    Foreign,
    /// An authored component (dialect naming pattern or configured name).
    Component,
}
