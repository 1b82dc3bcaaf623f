//! Integration tests for the markup dialect: node positions, tree
//! invariants, attributes, namespaces, and ignore-block restoration.

use pretty_assertions::assert_eq;

use quokka_ast::{Attr, ElementType, Namespace, NodeKind};
use quokka_parser::{
    IgnoreTag, ParseResult, ParserError, get_col, get_line, node_list_debug_view,
};

/// Parse and panic on error; tests that expect failure call the dialect
/// directly.
fn parse(source: &str) -> ParseResult {
    quokka_html::parse(source).unwrap()
}

#[test]
fn three_flat_nodes_with_exact_locations() {
    let result = parse("<div>text</div>");
    assert_eq!(result.list.len(), 3);

    let start = result.arena.get(result.list[0]);
    assert_eq!(start.node_name, "div");
    assert_eq!(
        (start.token.start_line, start.token.start_col, start.token.end_line, start.token.end_col),
        (1, 1, 1, 6)
    );
    assert_eq!((start.token.start_offset, start.token.end_offset), (0, 5));

    let text = result.arena.get(result.list[1]);
    assert_eq!(text.node_name, "#text");
    assert_eq!(text.token.raw, "text");
    assert_eq!(
        (text.token.start_line, text.token.start_col, text.token.end_line, text.token.end_col),
        (1, 6, 1, 10)
    );

    let end = result.arena.get(result.list[2]);
    assert!(matches!(end.kind, NodeKind::EndTag { .. }));
    assert_eq!(
        (end.token.start_line, end.token.start_col, end.token.end_line, end.token.end_col),
        (1, 10, 1, 16)
    );
    assert_eq!((end.token.start_offset, end.token.end_offset), (9, 15));
}

#[test]
fn debug_view_is_reproducible() {
    let result = parse("<div>text</div>");
    assert_eq!(
        node_list_debug_view(&result.arena, &result.list),
        "[1:1]>[1:6](0,5)div: <div>\n\
         [1:6]>[1:10](5,9)#text: text\n\
         [1:10]>[1:16](9,15)div: </div>\n"
    );
}

#[test]
fn debug_view_substitutes_line_breaks() {
    let result = parse("<pre>a\n\tb</pre>");
    let view = node_list_debug_view(&result.arena, &result.list);
    assert_eq!(
        view,
        "[1:1]>[1:6](0,5)pre: <pre>\n\
         [1:6]>[2:3](5,9)#text: a⏎⇥b\n\
         [2:3]>[2:9](9,15)pre: </pre>\n"
    );
}

#[test]
fn every_node_location_is_consistent_with_the_slicer() {
    let source = "<main>\n  <p title=\"x\">hi</p>\n  <!-- note -->\n</main>";
    let result = parse(source);
    for &id in &result.list {
        let token = &result.arena.get(id).token;
        assert_eq!(token.start_line, get_line(source, token.start_offset));
        assert_eq!(token.start_col, get_col(source, token.start_offset));
        assert_eq!(token.end_offset - token.start_offset, token.raw.chars().count());
    }
}

#[test]
fn flat_list_is_the_preorder_traversal() {
    let source = "<div><p>a</p><span>b<i>c</i></span></div>";
    let result = parse(source);

    // Rebuild the expected order from parent/child structure: a node's
    // children appear as a contiguous subsequence after it.
    for &id in &result.list {
        let node = result.arena.get(id);
        let child_positions: Vec<usize> = node
            .children
            .iter()
            .map(|child| result.list.iter().position(|entry| entry == child).unwrap())
            .collect();
        let own_position = result.list.iter().position(|entry| *entry == id).unwrap();
        for window in child_positions.windows(2) {
            assert!(window[0] < window[1], "children out of document order");
        }
        for &child_position in &child_positions {
            assert!(own_position < child_position, "child precedes its parent");
        }
    }
}

#[test]
fn depth_equals_parent_depth_plus_one() {
    let result = parse("<div><span><i>x</i></span></div>");
    for &id in &result.list {
        let node = result.arena.get(id);
        match node.parent {
            Some(parent) => assert_eq!(node.depth, result.arena.get(parent).depth + 1),
            None => assert_eq!(node.depth, 0),
        }
    }
}

#[test]
fn pear_links_are_symmetric() {
    let result = parse("<div><p>a</p></div>");
    for &id in &result.list {
        let node = result.arena.get(id);
        if let Some(pear) = node.pear() {
            assert_eq!(result.arena.get(pear).pear(), Some(id));
            assert_eq!(result.arena.get(pear).parent, node.parent);
        }
    }
}

#[test]
fn attributes_carry_exact_sub_token_locations() {
    let result = parse("<input type=\"text\" required>");
    let input = result.arena.get(result.list[0]);
    let data = input.element().unwrap();
    assert_eq!(data.attributes.len(), 2);

    let Attr::Html(type_attr) = &data.attributes[0] else {
        panic!("expected html attr");
    };
    assert_eq!(type_attr.name.raw, "type");
    assert_eq!(type_attr.name.start_offset, 7);
    assert_eq!(type_attr.value.raw, "text");
    assert_eq!(type_attr.value.start_offset, 13);
    assert!(!type_attr.is_dynamic_value);

    let Attr::Html(required) = &data.attributes[1] else {
        panic!("expected html attr");
    };
    assert_eq!(required.name.raw, "required");
    assert_eq!(required.equal.raw, "");
    assert_eq!(required.value.raw, "");
}

#[test]
fn omitted_end_tags_leave_pear_null() {
    let result = parse("<ul><li>a<li>b</ul>");
    let names: Vec<&str> = result
        .list
        .iter()
        .map(|&id| result.arena.get(id).node_name.as_str())
        .collect();
    assert_eq!(names, ["ul", "li", "#text", "li", "#text", "ul"]);

    let first_li = result.arena.get(result.list[1]);
    assert!(first_li.is_element());
    assert_eq!(first_li.pear(), None);
}

#[test]
fn svg_subtree_switches_namespace_and_foreign_object_reverts() {
    let result = parse("<svg><circle r=\"4\"/><foreignObject><div>x</div></foreignObject></svg>");
    let by_name = |name: &str| {
        result
            .list
            .iter()
            .map(|&id| result.arena.get(id))
            .find(|node| node.node_name == name && node.is_element())
            .unwrap()
    };

    assert_eq!(by_name("svg").element().unwrap().namespace, Namespace::Svg);
    assert_eq!(by_name("circle").element().unwrap().namespace, Namespace::Svg);
    assert_eq!(by_name("circle").element().unwrap().element_type, ElementType::Foreign);
    assert_eq!(by_name("div").element().unwrap().namespace, Namespace::Html);
    assert_eq!(by_name("div").element().unwrap().element_type, ElementType::Standard);
}

#[test]
fn hyphenated_names_are_custom_elements() {
    let result = parse("<x-panel open></x-panel>");
    let panel = result.arena.get(result.list[0]);
    assert_eq!(panel.element().unwrap().element_type, ElementType::Custom);
}

#[test]
fn as_attribute_overrides_classification() {
    let dialect = quokka_html::HtmlDialect::with_authored_element_names(vec!["Card".to_string()]);
    let result = quokka_parser::parse(&dialect, "<x-card as=\"Card\"></x-card>").unwrap();
    let card = result.arena.get(result.list[0]);
    assert_eq!(card.element().unwrap().element_type, ElementType::Component);
}

#[test]
fn doctype_makes_a_document_not_a_fragment() {
    let result = parse("<!DOCTYPE html><html><body></body></html>");
    assert!(!result.is_fragment);
    let doctype = result.arena.get(result.list[0]);
    let NodeKind::Doctype { name, .. } = &doctype.kind else {
        panic!("expected doctype");
    };
    assert_eq!(name, "html");

    assert!(parse("<div></div>").is_fragment);
}

#[test]
fn masked_scriptlet_is_restored_as_a_block_node() {
    let dialect = quokka_html::HtmlDialect::with_ignore_tags(vec![IgnoreTag::new(
        "ejs-tag", "<%", "%>",
    )]);
    let result = quokka_parser::parse(&dialect, "<div><%= test %></div>").unwrap();

    assert_eq!(result.list.len(), 3);
    let block = result.arena.get(result.list[1]);
    assert_eq!(block.node_name, "#ps:ejs-tag");
    assert!(block.is_ps_block());
    assert_eq!(block.token.raw, "<%= test %>");
    assert_eq!(block.token.start_offset, 5);
    assert_eq!(block.depth, 1);
    assert_eq!(block.parent, Some(result.list[0]));
}

#[test]
fn masked_scriptlet_inside_attribute_value_patches_the_attr() {
    let dialect = quokka_html::HtmlDialect::with_ignore_tags(vec![IgnoreTag::new(
        "ejs-tag", "<%", "%>",
    )]);
    let source = "<img alt=\"<%= alt %>\">";
    let result = quokka_parser::parse(&dialect, source).unwrap();

    let img = result.arena.get(result.list[0]);
    assert_eq!(img.token.raw, source);
    let data = img.element().unwrap();
    let Attr::Html(alt) = &data.attributes[0] else {
        panic!("expected html attr");
    };
    assert_eq!(alt.value.raw, "<%= alt %>");
    assert!(alt.is_dynamic_value);
}

#[test]
fn scriptlet_landing_mid_tag_fails_as_unsupported_syntax() {
    let dialect = quokka_html::HtmlDialect::with_ignore_tags(vec![IgnoreTag::new(
        "ejs-tag", "<%", "%>",
    )]);
    let err = quokka_parser::parse(&dialect, "<di<% x %>v>text</div>").unwrap_err();
    assert!(matches!(err, ParserError::UnsupportedSyntax { .. }));
    if let ParserError::UnsupportedSyntax { raw, line, col } = err {
        assert_eq!(raw, "<% x %>");
        assert_eq!((line, col), (1, 4));
    }
}

#[test]
fn multiline_scriptlet_keeps_downstream_locations_intact() {
    let dialect = quokka_html::HtmlDialect::with_ignore_tags(vec![IgnoreTag::new(
        "ejs-tag", "<%", "%>",
    )]);
    let source = "<div><% if (a) {\n  b();\n} %></div>\n<p>after</p>";
    let result = quokka_parser::parse(&dialect, source).unwrap();

    let p = result
        .list
        .iter()
        .map(|&id| result.arena.get(id))
        .find(|node| node.node_name == "p" && node.is_element())
        .unwrap();
    assert_eq!(p.token.start_line, 4);
    assert_eq!(p.token.start_col, 1);
    assert_eq!(p.token.start_line, get_line(source, p.token.start_offset));
}

#[test]
fn stray_end_tag_becomes_an_invalid_node() {
    let result = parse("a</b>c");
    assert_eq!(result.list.len(), 3);
    let invalid = result.arena.get(result.list[1]);
    assert!(matches!(invalid.kind, NodeKind::Invalid));
    assert_eq!(invalid.node_name, "#invalid");
}

#[test]
fn origin_without_position_is_a_structural_error() {
    use quokka_parser::{Dialect, ParseContext};

    let dialect = quokka_html::HtmlDialect::new();
    let origin = quokka_html::MarkupNode {
        kind: quokka_html::MarkupKind::Text,
        span: None,
        children: Vec::new(),
        parent_expression: None,
    };
    let mut ctx = ParseContext::new("text");
    let err = dialect.nodeize(&mut ctx, &origin, None, 0).unwrap_err();
    assert!(matches!(err, ParserError::MissingPosition { .. }));
}

#[test]
fn node_list_serializes_to_json() {
    let result = parse("<p>x</p>");
    let json = serde_json::to_string(&result.arena).unwrap();
    assert!(json.contains("\"node_name\":\"p\""));
    assert!(json.contains("\"start_offset\":0"));
}
