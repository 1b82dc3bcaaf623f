//! The data model serializes to JSON for tooling dumps.

use quokka_ast::{Node, NodeArena, NodeKind, Token};

#[test]
fn nodes_serialize_with_their_locations() {
    let mut arena = NodeArena::new();
    let id = arena.alloc(Node::new(
        Token::with_location("hello", 0, 1, 1),
        "#text",
        0,
        None,
        NodeKind::Text,
    ));

    let json = serde_json::to_value(arena.get(id)).unwrap();
    assert_eq!(json["node_name"], "#text");
    assert_eq!(json["token"]["raw"], "hello");
    assert_eq!(json["token"]["end_offset"], 5);
    assert_eq!(json["depth"], 0);
}

#[test]
fn node_ids_serialize_as_plain_indices() {
    let mut arena = NodeArena::new();
    let parent = arena.alloc(Node::new(
        Token::with_location("<div>", 0, 1, 1),
        "div",
        0,
        None,
        NodeKind::Text,
    ));
    let child = arena.alloc(Node::new(
        Token::with_location("x", 5, 1, 6),
        "#text",
        1,
        Some(parent),
        NodeKind::Text,
    ));

    let json = serde_json::to_value(arena.get(child)).unwrap();
    assert_eq!(json["parent"], 0);
}
