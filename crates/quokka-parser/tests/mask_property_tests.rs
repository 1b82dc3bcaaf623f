//! Property-style checks over the masker and the coordinate system,
//! driven across a grid of crafted inputs.

use pretty_assertions::assert_eq;
use rstest::rstest;

use quokka_parser::{IgnoreTag, MASK_CHAR, get_col, get_line, ignore_block, slice_fragment};

fn ejs_tags() -> Vec<IgnoreTag> {
    vec![
        IgnoreTag::new("ejs-output-value", "<%=", "%>"),
        IgnoreTag::new("ejs-comment", "<%#", "%>"),
        IgnoreTag::new("ejs-tag", "<%[^%=#]", "%>"),
    ]
}

#[rstest]
#[case("<div><%= test %></div>")]
#[case("<% a %> <%= b %> <%# c %>")]
#[case("no scriptlets at all")]
#[case("<p><% if (x) {\n} %></p>\n<span><%# note %></span>")]
#[case("broken <% never closed")]
#[case("multi\nline\n<% x\n\ny %>\ntail")]
#[case("")]
#[case("русский <%= текст %> текст")]
fn masked_text_preserves_length_and_line_breaks(#[case] source: &str) {
    let result = ignore_block(source, &ejs_tags(), MASK_CHAR);

    assert_eq!(result.replaced.chars().count(), source.chars().count());

    let breaks = |text: &str| -> Vec<usize> {
        text.chars()
            .enumerate()
            .filter(|&(_, c)| c == '\n')
            .map(|(i, _)| i)
            .collect()
    };
    assert_eq!(breaks(&result.replaced), breaks(source));

    // Every recorded region reassembles to the original text at its index.
    for code in &result.stack {
        let end = code.index + code.raw().chars().count();
        let original: String = source
            .chars()
            .skip(code.index)
            .take(end - code.index)
            .collect();
        assert_eq!(code.raw(), original);
        assert!(!code.resolved);
    }
}

#[rstest]
#[case("one line")]
#[case("a\nb\nc")]
#[case("ends with break\n")]
#[case("unicode: déjà vu\n目印\nend")]
fn line_col_round_trips_for_every_offset(#[case] source: &str) {
    let len = source.chars().count();
    for offset in 0..=len {
        let token = slice_fragment(source, offset, len);
        assert_eq!(token.start_line, get_line(source, offset));
        assert_eq!(token.start_col, get_col(source, offset));
        assert_eq!(token.end_offset - token.start_offset, token.raw.chars().count());
    }
}

#[rstest]
#[case("<div><%= a %></div>", 1)]
#[case("<%= a %><%# b %><% c %>", 3)]
#[case("plain", 0)]
fn stack_entries_interleave_in_source_order(#[case] source: &str, #[case] expected: usize) {
    let result = ignore_block(source, &ejs_tags(), MASK_CHAR);
    assert_eq!(result.stack.len(), expected);
    for window in result.stack.windows(2) {
        assert!(window[0].index < window[1].index);
    }
}
