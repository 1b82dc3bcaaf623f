//! Attribute tokenizer state machine.
//!
//! [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
//! [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
//! [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
//!
//! Turns one raw attribute source slice into its structural parts. Unlike
//! the WHATWG machine this one is quote-set parameterized: a dialect can
//! declare `{`/`}` as value quotes and `${`/`}` or backticks as nested
//! quote-in-value delimiters, so balanced dynamic expressions survive
//! inside an attribute value without prematurely closing it.
//!
//! Pushback ("the consumed characters were not an equals sign after all")
//! is modeled by re-queueing characters into the input, never by
//! exceptions or panics.

use std::collections::VecDeque;

use strum_macros::Display;

use crate::error::ParserError;

/// Whitespace characters recognized between attribute parts.
///
/// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
pub const DEFAULT_SPACES: &[char] = &[' ', '\t', '\n', '\r', '\x0C'];

/// Characters that terminate an unquoted attribute value.
pub const DEFAULT_END_OF_UNQUOTED_VALUE: &[char] = &[' ', '\t', '\n', '\r', '\x0C', '/', '>'];

/// A pair of opening and closing delimiters for a quoted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteSet {
    /// Opening delimiter.
    pub start: &'static str,
    /// Closing delimiter.
    pub end: &'static str,
}

/// The default quote pairs: double and single quotes.
pub const DEFAULT_QUOTE_SET: &[QuoteSet] = &[
    QuoteSet { start: "\"", end: "\"" },
    QuoteSet { start: "'", end: "'" },
];

/// The tokenizer state machine states, in transition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AttrState {
    /// Accumulating leading whitespace before the name.
    BeforeName,
    /// Consuming the attribute name.
    Name,
    /// Saw whitespace after the name; an `=` may still follow.
    Equal,
    /// Saw `=`; looking for the value or its opening quote.
    BeforeValue,
    /// Consuming the value, quoted or unquoted.
    Value,
    /// Terminal.
    AfterValue,
}

/// The structural parts of one attribute, in source order.
///
/// The parts concatenate back to the consumed prefix of the input;
/// `leftover` is the unconsumed remainder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrParts {
    /// Whitespace before the name.
    pub spaces_before_name: String,
    /// The attribute name.
    pub attr_name: String,
    /// Whitespace between name and `=`.
    pub spaces_before_equal: String,
    /// The `=` sign, empty for bare attributes.
    pub equal: String,
    /// Whitespace after `=`.
    pub spaces_after_equal: String,
    /// Opening quote, empty for unquoted values.
    pub quote_start: String,
    /// The value text.
    pub attr_value: String,
    /// Closing quote, empty for unquoted values.
    pub quote_end: String,
    /// Unconsumed input.
    pub leftover: String,
}

/// Tokenize one attribute from the front of `raw`.
///
/// `start_state` is usually [`AttrState::BeforeName`]; dialects that
/// synthesize attributes beginning directly in value position (shorthand
/// and spread forms) pass [`AttrState::BeforeValue`], which routes the
/// skipped whitespace into the leading-space slot.
///
/// # Errors
///
/// [`ParserError::UnclosedAttrValue`] when the value opens a configured
/// quote but the input ends before the matching close.
pub fn attr_tokenizer(
    raw: &str,
    quote_set: &[QuoteSet],
    start_state: AttrState,
    quote_in_value_chars: &[QuoteSet],
    end_of_unquoted_value_chars: &[char],
) -> Result<AttrParts, ParserError> {
    let mut state = start_state;
    let mut parts = AttrParts::default();
    let mut quote_type: Option<QuoteSet> = None;

    let before_value_started = start_state == AttrState::BeforeValue;

    let mut quote_mode_stack: Vec<QuoteSet> = Vec::new();
    let mut chars: VecDeque<char> = raw.chars().collect();

    while let Some(ch) = {
        if state == AttrState::AfterValue {
            None
        } else {
            chars.pop_front()
        }
    } {
        match state {
            AttrState::BeforeName => {
                if ch == '>' || ch == '/' {
                    chars.push_front(ch);
                    state = AttrState::AfterValue;
                    continue;
                }
                if DEFAULT_SPACES.contains(&ch) {
                    parts.spaces_before_name.push(ch);
                    continue;
                }
                parts.attr_name.push(ch);
                state = AttrState::Name;
            }
            AttrState::Name => {
                if ch == '>' || ch == '/' {
                    chars.push_front(ch);
                    state = AttrState::AfterValue;
                    continue;
                }
                if DEFAULT_SPACES.contains(&ch) {
                    parts.spaces_before_equal.push(ch);
                    state = AttrState::Equal;
                    continue;
                }
                if ch == '=' {
                    parts.equal.push(ch);
                    state = AttrState::BeforeValue;
                    continue;
                }
                parts.attr_name.push(ch);
            }
            AttrState::Equal => {
                if DEFAULT_SPACES.contains(&ch) {
                    parts.spaces_before_equal.push(ch);
                    continue;
                }
                if ch == '=' {
                    parts.equal.push(ch);
                    state = AttrState::BeforeValue;
                    continue;
                }

                // No equals sign after all: the whitespace run and this
                // character belong to whatever comes next.
                chars.push_front(ch);
                for c in parts.spaces_before_equal.chars().rev() {
                    chars.push_front(c);
                }
                parts.spaces_before_equal.clear();

                state = AttrState::AfterValue;
            }
            AttrState::BeforeValue => {
                if end_of_unquoted_value_chars.contains(&ch) && DEFAULT_SPACES.contains(&ch) {
                    if before_value_started {
                        parts.spaces_before_name.push(ch);
                    } else {
                        parts.spaces_after_equal.push(ch);
                    }
                    continue;
                }

                let mut single = [0u8; 4];
                let char_str: &str = ch.encode_utf8(&mut single);
                if let Some(quote) = quote_set.iter().find(|q| q.start == char_str) {
                    quote_type = Some(*quote);
                    parts.quote_start.push_str(quote.start);
                    state = AttrState::Value;
                    continue;
                }

                let rest: String = std::iter::once(ch).chain(chars.iter().copied()).collect();
                if let Some(in_quote) = quote_in_value_chars.iter().find(|q| rest.starts_with(q.start)) {
                    quote_mode_stack.push(*in_quote);
                    parts.attr_value.push_str(in_quote.start);
                    drain_front(&mut chars, in_quote.start.chars().count() - 1);
                    state = AttrState::Value;
                    continue;
                }

                chars.push_front(ch);
                state = AttrState::Value;
            }
            AttrState::Value => {
                if quote_type.is_none() && end_of_unquoted_value_chars.contains(&ch) {
                    chars.push_front(ch);
                    state = AttrState::AfterValue;
                    continue;
                }

                let mut single = [0u8; 4];
                let char_str: &str = ch.encode_utf8(&mut single);
                if quote_mode_stack.is_empty() && quote_type.is_some_and(|q| q.end == char_str) {
                    parts.quote_end.push_str(char_str);
                    state = AttrState::AfterValue;
                    continue;
                }

                let rest: String = std::iter::once(ch).chain(chars.iter().copied()).collect();

                if let Some(in_quote_end) = quote_mode_stack.last().copied()
                    && rest.starts_with(in_quote_end.end)
                {
                    let _ = quote_mode_stack.pop();
                    parts.attr_value.push_str(in_quote_end.end);
                    drain_front(&mut chars, in_quote_end.end.chars().count() - 1);
                    continue;
                }

                if let Some(in_quote_start) = quote_in_value_chars.iter().find(|q| rest.starts_with(q.start)) {
                    quote_mode_stack.push(*in_quote_start);
                    parts.attr_value.push_str(in_quote_start.start);
                    drain_front(&mut chars, in_quote_start.start.chars().count() - 1);
                    continue;
                }

                parts.attr_value.push(ch);
            }
            AttrState::AfterValue => unreachable!("the loop guard drains AfterValue"),
        }
    }

    if state == AttrState::Value && quote_type.is_some() {
        return Err(ParserError::UnclosedAttrValue { raw: raw.to_string() });
    }

    parts.leftover = chars.iter().collect();

    Ok(parts)
}

/// Drop `n` characters from the front of the queue.
fn drain_front(chars: &mut VecDeque<char>, n: usize) {
    for _ in 0..n {
        let _ = chars.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(raw: &str) -> AttrParts {
        attr_tokenizer(
            raw,
            DEFAULT_QUOTE_SET,
            AttrState::BeforeName,
            &[],
            DEFAULT_END_OF_UNQUOTED_VALUE,
        )
        .unwrap()
    }

    #[test]
    fn bare_boolean_attribute() {
        let parts = tokenize("required");
        assert_eq!(parts.attr_name, "required");
        assert_eq!(parts.equal, "");
        assert_eq!(parts.attr_value, "");
        assert_eq!(parts.leftover, "");
    }

    #[test]
    fn double_quoted_value() {
        let parts = tokenize(" class=\"box wide\" id=\"x\"");
        assert_eq!(parts.spaces_before_name, " ");
        assert_eq!(parts.attr_name, "class");
        assert_eq!(parts.equal, "=");
        assert_eq!(parts.quote_start, "\"");
        assert_eq!(parts.attr_value, "box wide");
        assert_eq!(parts.quote_end, "\"");
        assert_eq!(parts.leftover, " id=\"x\"");
    }

    #[test]
    fn spaces_around_equal() {
        let parts = tokenize("width = 40");
        assert_eq!(parts.attr_name, "width");
        assert_eq!(parts.spaces_before_equal, " ");
        assert_eq!(parts.equal, "=");
        assert_eq!(parts.spaces_after_equal, " ");
        assert_eq!(parts.attr_value, "40");
    }

    #[test]
    fn bare_attribute_followed_by_another_name() {
        // The whitespace run after `defer` is not followed by `=`, so it
        // is pushed back and reappears at the head of the leftover.
        let parts = tokenize("defer src");
        assert_eq!(parts.attr_name, "defer");
        assert_eq!(parts.spaces_before_equal, "");
        assert_eq!(parts.equal, "");
        assert_eq!(parts.leftover, " src");
    }

    #[test]
    fn unquoted_value_ends_at_space() {
        let parts = tokenize("id=main class=\"x\"");
        assert_eq!(parts.attr_name, "id");
        assert_eq!(parts.quote_start, "");
        assert_eq!(parts.attr_value, "main");
        assert_eq!(parts.leftover, " class=\"x\"");
    }

    #[test]
    fn terminates_on_tag_close() {
        let parts = tokenize(">");
        assert_eq!(parts.attr_name, "");
        assert_eq!(parts.leftover, ">");
    }

    #[test]
    fn unclosed_quote_is_an_error() {
        let err = attr_tokenizer(
            "label=\"oops",
            DEFAULT_QUOTE_SET,
            AttrState::BeforeName,
            &[],
            DEFAULT_END_OF_UNQUOTED_VALUE,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ParserError::UnclosedAttrValue {
                raw: "label=\"oops".to_string()
            }
        );
    }

    #[test]
    fn brace_quoted_value_with_nested_template_string() {
        let quotes = [
            QuoteSet { start: "\"", end: "\"" },
            QuoteSet { start: "'", end: "'" },
            QuoteSet { start: "{", end: "}" },
        ];
        let in_value = [
            QuoteSet { start: "\"", end: "\"" },
            QuoteSet { start: "'", end: "'" },
            QuoteSet { start: "`", end: "`" },
            QuoteSet { start: "${", end: "}" },
        ];
        let parts = attr_tokenizer(
            "style={`width: ${size}px`}",
            &quotes,
            AttrState::BeforeName,
            &in_value,
            DEFAULT_END_OF_UNQUOTED_VALUE,
        )
        .unwrap();
        assert_eq!(parts.attr_name, "style");
        assert_eq!(parts.quote_start, "{");
        assert_eq!(parts.attr_value, "`width: ${size}px`");
        assert_eq!(parts.quote_end, "}");
    }

    #[test]
    fn closing_brace_inside_nested_quote_does_not_close_value() {
        let quotes = [QuoteSet { start: "{", end: "}" }];
        let in_value = [QuoteSet { start: "\"", end: "\"" }];
        let parts = attr_tokenizer(
            "data={\"}\"}",
            &quotes,
            AttrState::BeforeName,
            &in_value,
            DEFAULT_END_OF_UNQUOTED_VALUE,
        )
        .unwrap();
        assert_eq!(parts.attr_value, "\"}\"");
        assert_eq!(parts.quote_end, "}");
    }

    #[test]
    fn before_value_start_state_routes_spaces_to_leading() {
        let parts = attr_tokenizer(
            "  {expr}",
            &[QuoteSet { start: "{", end: "}" }],
            AttrState::BeforeValue,
            &[],
            DEFAULT_END_OF_UNQUOTED_VALUE,
        )
        .unwrap();
        assert_eq!(parts.spaces_before_name, "  ");
        assert_eq!(parts.attr_name, "");
        assert_eq!(parts.attr_value, "expr");
    }
}
