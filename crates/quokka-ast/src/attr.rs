//! Attribute records and their sub-tokens.

use serde::Serialize;
use uuid::Uuid;

use crate::token::Token;

/// An attribute on a start tag.
#[derive(Debug, Clone, Serialize)]
pub enum Attr {
    /// A conventional `name` / `name=value` attribute.
    Html(Box<HtmlAttr>),
    /// A spread attribute (`{...props}`), opaque to the parser.
    Spread(SpreadAttr),
}

impl Attr {
    /// The full source span of the attribute, leading space included.
    #[must_use]
    pub fn token_range(&self) -> (usize, usize) {
        match self {
            Attr::Html(attr) => (attr.spaces_before_name.start_offset, attr.end_quote.end_offset),
            Attr::Spread(attr) => (attr.spaces_before.start_offset, attr.token.end_offset),
        }
    }
}

/// A conventional attribute, split into every syntactic sub-span.
///
/// The sub-tokens tile the attribute's source exactly:
/// `spaces_before_name · name · spaces_before_equal · equal ·
/// spaces_after_equal · start_quote · value · end_quote`. Absent parts are
/// empty tokens anchored at the position they would occupy.
#[derive(Debug, Clone, Serialize)]
pub struct HtmlAttr {
    /// Process-unique identity.
    pub uuid: Uuid,
    /// Whitespace before the name.
    pub spaces_before_name: Token,
    /// The attribute name as written.
    pub name: Token,
    /// Whitespace between name and `=`.
    pub spaces_before_equal: Token,
    /// The `=` sign, empty for bare attributes.
    pub equal: Token,
    /// Whitespace between `=` and the value.
    pub spaces_after_equal: Token,
    /// Opening quote character(s), empty for unquoted values.
    pub start_quote: Token,
    /// The attribute value as written (quotes excluded).
    pub value: Token,
    /// Closing quote character(s), empty for unquoted values.
    pub end_quote: Token,
    /// True when the value is dialect-expression-bound (brace-quoted or a
    /// restored masked block) rather than a literal.
    pub is_dynamic_value: bool,
    /// True when the name matches the dialect's directive grammar
    /// (`prefix:name`).
    pub is_directive: bool,
    /// Best-effort resolved attribute identity for shorthand or
    /// IDL-mapped names (`className` ⇒ `class`).
    pub potential_name: Option<String>,
    /// The IDL property name when it differs from the written name.
    pub candidate: Option<String>,
}

impl HtmlAttr {
    /// The attribute's source text, reassembled from its sub-tokens.
    #[must_use]
    pub fn raw(&self) -> String {
        let mut raw = String::new();
        raw.push_str(&self.name.raw);
        raw.push_str(&self.spaces_before_equal.raw);
        raw.push_str(&self.equal.raw);
        raw.push_str(&self.spaces_after_equal.raw);
        raw.push_str(&self.start_quote.raw);
        raw.push_str(&self.value.raw);
        raw.push_str(&self.end_quote.raw);
        raw
    }

    /// The name rules should match against: the resolved potential name
    /// when one exists, the written name otherwise.
    #[must_use]
    pub fn effective_name(&self) -> &str {
        self.potential_name.as_deref().unwrap_or(&self.name.raw)
    }
}

/// A spread attribute. The token covers `{...expr}` in full.
#[derive(Debug, Clone, Serialize)]
pub struct SpreadAttr {
    /// Process-unique identity.
    pub uuid: Uuid,
    /// Whitespace before the spread.
    pub spaces_before: Token,
    /// The `{...expr}` span.
    pub token: Token,
}
