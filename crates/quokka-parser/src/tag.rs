//! Start-tag parser.
//!
//! Splits one raw start tag (`<div class="a" {...rest}>`) into located
//! sub-tokens by looping the attribute tokenizer over the tag body and
//! walking a line/column cursor through every consumed span. The output
//! sub-tokens tile the raw exactly.

use quokka_ast::Token;

use crate::attr_tokenizer::{AttrState, QuoteSet, attr_tokenizer};
use crate::error::ParserError;

/// One attribute as located sub-tokens, before dialect enrichment.
#[derive(Debug, Clone)]
pub enum RawAttr {
    /// A conventional attribute.
    Html(RawHtmlAttr),
    /// A spread attribute (`{...expr}`).
    Spread {
        /// Whitespace before the spread.
        spaces_before: Token,
        /// The `{...expr}` span.
        token: Token,
    },
}

/// Located sub-tokens of one conventional attribute.
#[derive(Debug, Clone)]
pub struct RawHtmlAttr {
    /// Whitespace before the name.
    pub spaces_before_name: Token,
    /// The attribute name.
    pub name: Token,
    /// Whitespace between name and `=`.
    pub spaces_before_equal: Token,
    /// The `=` sign, empty for bare attributes.
    pub equal: Token,
    /// Whitespace after `=`.
    pub spaces_after_equal: Token,
    /// Opening quote, empty for unquoted values.
    pub start_quote: Token,
    /// The value text.
    pub value: Token,
    /// Closing quote, empty for unquoted values.
    pub end_quote: Token,
}

/// A start tag split into located sub-tokens.
#[derive(Debug, Clone)]
pub struct TagTokens {
    /// The `<`.
    pub tag_open: Token,
    /// The tag name; empty for a nameless fragment.
    pub tag_name: Token,
    /// The attributes in source order.
    pub attrs: Vec<RawAttr>,
    /// Whitespace after the last attribute.
    pub after_attr_spaces: Token,
    /// The `/` of a self-closing tag, if present.
    pub self_closing_solidus: Option<Token>,
    /// The `>`; empty when the tag was cut off by end of input.
    pub tag_close: Token,
}

/// Tokenizer configuration for one dialect's tags.
#[derive(Debug, Clone, Copy)]
pub struct TagParserOptions<'a> {
    /// Value quote pairs.
    pub quote_set: &'a [QuoteSet],
    /// Nested quote-in-value delimiters.
    pub quote_in_value_chars: &'a [QuoteSet],
    /// Characters terminating an unquoted value.
    pub end_of_unquoted_value_chars: &'a [char],
    /// Whether `{...expr}` spread attributes are recognized.
    pub recognize_spread: bool,
}

/// A location cursor that mints contiguous tokens.
struct Cursor {
    offset: usize,
    line: usize,
    col: usize,
}

impl Cursor {
    fn take(&mut self, raw: &str) -> Token {
        let token = Token::with_location(raw, self.offset, self.line, self.col);
        (self.offset, self.line, self.col) = token.end_location();
        token
    }
}

/// Parse one raw start tag into located sub-tokens.
///
/// # Errors
///
/// Propagates [`ParserError::UnclosedAttrValue`] from the attribute
/// tokenizer.
pub fn tag_parser(
    raw: &str,
    start_offset: usize,
    start_line: usize,
    start_col: usize,
    options: TagParserOptions<'_>,
) -> Result<TagTokens, ParserError> {
    let mut cursor = Cursor {
        offset: start_offset,
        line: start_line,
        col: start_col,
    };

    let chars: Vec<char> = raw.chars().collect();
    let has_close = chars.last() == Some(&'>');

    let tag_open = cursor.take("<");

    let name_len = chars[1..]
        .iter()
        .take_while(|&&c| !c.is_whitespace() && c != '/' && c != '>')
        .count();
    let name: String = chars[1..1 + name_len].iter().collect();
    let tag_name = cursor.take(&name);

    let body_end = chars.len() - usize::from(has_close);
    let mut body: String = chars[1 + name_len..body_end].iter().collect();

    let mut attrs = Vec::new();
    let mut trailing = String::new();

    while !body.is_empty() {
        if options.recognize_spread
            && let Some((spaces, spread_len)) = find_spread(&body)
        {
            let spaces_before = cursor.take(&spaces);
            let spread: String = body.chars().skip(spaces.chars().count()).take(spread_len).collect();
            let token = cursor.take(&spread);
            attrs.push(RawAttr::Spread { spaces_before, token });
            body = body.chars().skip(spaces.chars().count() + spread_len).collect();
            continue;
        }

        let parts = attr_tokenizer(
            &body,
            options.quote_set,
            AttrState::BeforeName,
            options.quote_in_value_chars,
            options.end_of_unquoted_value_chars,
        )?;

        if parts.attr_name.is_empty() {
            // Nothing but whitespace and tag-closing punctuation remains.
            trailing = format!("{}{}", parts.spaces_before_name, parts.leftover);
            break;
        }

        let consumed = body.chars().count() - parts.leftover.chars().count();
        let attr = RawHtmlAttr {
            spaces_before_name: cursor.take(&parts.spaces_before_name),
            name: cursor.take(&parts.attr_name),
            spaces_before_equal: cursor.take(&parts.spaces_before_equal),
            equal: cursor.take(&parts.equal),
            spaces_after_equal: cursor.take(&parts.spaces_after_equal),
            start_quote: cursor.take(&parts.quote_start),
            value: cursor.take(&parts.attr_value),
            end_quote: cursor.take(&parts.quote_end),
        };
        attrs.push(RawAttr::Html(attr));

        if consumed == 0 {
            trailing = parts.leftover;
            break;
        }
        body = parts.leftover;
    }

    let (after, solidus) = match trailing.strip_suffix('/') {
        Some(rest) => (rest.to_string(), true),
        None => (trailing, false),
    };
    let after_attr_spaces = cursor.take(&after);
    let self_closing_solidus = solidus.then(|| cursor.take("/"));
    let tag_close = if has_close { cursor.take(">") } else { cursor.take("") };

    Ok(TagTokens {
        tag_open,
        tag_name,
        attrs,
        after_attr_spaces,
        self_closing_solidus,
        tag_close,
    })
}

/// If the body starts (after whitespace) with a balanced `{...expr}`
/// spread, return the leading whitespace and the spread's length.
fn find_spread(body: &str) -> Option<(String, usize)> {
    let spaces: String = body.chars().take_while(|c| c.is_whitespace()).collect();
    let rest: String = body.chars().skip(spaces.chars().count()).collect();
    if !rest.starts_with("{...") {
        return None;
    }

    let mut depth = 0usize;
    let mut in_quote: Option<char> = None;
    for (i, c) in rest.chars().enumerate() {
        match in_quote {
            Some(q) => {
                if c == q {
                    in_quote = None;
                }
            }
            None => match c {
                '"' | '\'' | '`' => in_quote = Some(c),
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some((spaces, i + 1));
                    }
                }
                _ => {}
            },
        }
    }
    None
}
