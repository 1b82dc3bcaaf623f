//! Integration tests for the JSX-like dialect: fragments, expression
//! blocks, spread attributes, IDL resolution, and orphan regrouping.

use pretty_assertions::assert_eq;

use quokka_ast::{Attr, ElementType, NodeKind};
use quokka_parser::{AttrState, ParseResult, ParserError, QuoteSet, attr_tokenizer};

fn parse(source: &str) -> ParseResult {
    quokka_jsx::parse(source).unwrap()
}

#[test]
fn jsx_sources_are_always_fragments() {
    assert!(parse("<div></div>").is_fragment);
}

#[test]
fn nameless_fragment_wraps_its_content() {
    let result = parse("<><p>x</p></>");
    let fragment = result.arena.get(result.list[0]);
    assert_eq!(fragment.node_name, "#jsx-fragment");
    assert!(fragment.is_element());

    let p = result.arena.get(result.list[1]);
    assert_eq!(p.node_name, "p");
    assert_eq!(p.parent, Some(result.list[0]));
}

#[test]
fn expression_children_become_block_nodes() {
    let result = parse("<div>{greeting}</div>");
    let block = result.arena.get(result.list[1]);
    assert_eq!(block.node_name, "#ps:expression");
    assert_eq!(block.token.raw, "{greeting}");
    let NodeKind::PsBlock { is_transparent, .. } = block.kind else {
        panic!("expected psblock");
    };
    assert!(is_transparent);
}

#[test]
fn capitalized_names_are_components() {
    let result = parse("<App><section /></App>");
    let app = result.arena.get(result.list[0]);
    assert_eq!(app.element().unwrap().element_type, ElementType::Component);

    let section = result.arena.get(result.list[1]);
    assert_eq!(section.element().unwrap().element_type, ElementType::Standard);
}

#[test]
fn dotted_names_are_components() {
    let result = parse("<Menu.Item />");
    let item = result.arena.get(result.list[0]);
    assert_eq!(item.node_name, "Menu.Item");
    assert_eq!(item.element().unwrap().element_type, ElementType::Component);
}

#[test]
fn brace_quoted_values_are_dynamic() {
    let result = parse("<img alt={text} src=\"a.png\" />");
    let data = result.arena.get(result.list[0]).element().unwrap();

    let Attr::Html(alt) = &data.attributes[0] else {
        panic!("expected html attr");
    };
    assert!(alt.is_dynamic_value);
    assert_eq!(alt.start_quote.raw, "{");
    assert_eq!(alt.value.raw, "text");

    let Attr::Html(src) = &data.attributes[1] else {
        panic!("expected html attr");
    };
    assert!(!src.is_dynamic_value);
}

#[test]
fn template_literals_nest_inside_brace_values() {
    let result = parse("<div style={`width: ${size}px`}>x</div>");
    let data = result.arena.get(result.list[0]).element().unwrap();
    let Attr::Html(style) = &data.attributes[0] else {
        panic!("expected html attr");
    };
    assert_eq!(style.value.raw, "`width: ${size}px`");
    assert!(style.is_dynamic_value);
}

#[test]
fn spread_attributes_are_recorded() {
    let result = parse("<Widget {...props} id=\"w\" />");
    let data = result.arena.get(result.list[0]).element().unwrap();
    assert!(data.has_spread_attr);
    assert_eq!(data.attributes.len(), 2);
    let Attr::Spread(spread) = &data.attributes[0] else {
        panic!("expected spread attr");
    };
    assert_eq!(spread.token.raw, "{...props}");
}

#[test]
fn idl_spellings_resolve_to_content_attributes() {
    let result = parse("<label className=\"big\" htmlFor=\"name\" id=\"l\" />");
    let data = result.arena.get(result.list[0]).element().unwrap();

    let Attr::Html(class_name) = &data.attributes[0] else {
        panic!("expected html attr");
    };
    assert_eq!(class_name.potential_name.as_deref(), Some("class"));
    assert_eq!(class_name.candidate, None);
    assert_eq!(class_name.effective_name(), "class");

    let Attr::Html(html_for) = &data.attributes[1] else {
        panic!("expected html attr");
    };
    assert_eq!(html_for.potential_name.as_deref(), Some("for"));

    let Attr::Html(id) = &data.attributes[2] else {
        panic!("expected html attr");
    };
    assert_eq!(id.potential_name, None);
    assert_eq!(id.candidate, None);
}

#[test]
fn elements_inside_expressions_are_regrouped_under_the_block() {
    let result = parse("<ul>{items.map(i => <li>{i}</li>)}</ul>");

    let block_id = *result
        .list
        .iter()
        .find(|&&id| result.arena.get(id).node_name == "#ps:expression")
        .unwrap();
    let li_id = *result
        .list
        .iter()
        .find(|&&id| {
            let node = result.arena.get(id);
            node.node_name == "li" && node.is_element()
        })
        .unwrap();

    let li = result.arena.get(li_id);
    assert_eq!(li.parent, Some(block_id));
    assert_eq!(li.depth, result.arena.get(block_id).depth + 1);
    assert!(result.arena.get(block_id).children.contains(&li_id));

    // The end tag moved with its start tag: pears share a parent.
    let pear = li.pear().unwrap();
    assert_eq!(result.arena.get(pear).parent, Some(block_id));
}

#[test]
fn missing_end_tag_is_fatal() {
    let err = quokka_jsx::parse("<div><span></div>").unwrap_err();
    assert!(matches!(err, ParserError::Syntax { .. }));
    if let ParserError::Syntax { message, line, col } = err {
        assert!(message.contains("<span>"));
        assert_eq!((line, col), (1, 6));
    }
}

#[test]
fn unclosed_brace_value_raises_the_unclosed_value_error() {
    let quote_set = [
        QuoteSet { start: "\"", end: "\"" },
        QuoteSet { start: "'", end: "'" },
        QuoteSet { start: "{", end: "}" },
    ];
    let err = attr_tokenizer(
        "href={url",
        &quote_set,
        AttrState::BeforeName,
        &[],
        &[' ', '\t', '\n', '/', '>'],
    )
    .unwrap_err();
    assert_eq!(
        err,
        ParserError::UnclosedAttrValue {
            raw: "href={url".to_string()
        }
    );
}

#[test]
fn sibling_expressions_get_distinct_identities() {
    let result = parse("<p>{a}{a}</p>");
    let blocks: Vec<_> = result
        .list
        .iter()
        .map(|&id| result.arena.get(id))
        .filter(|node| node.is_ps_block())
        .collect();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].token.raw, blocks[1].token.raw);
    assert_ne!(blocks[0].uuid, blocks[1].uuid);
}
