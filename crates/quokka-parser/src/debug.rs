//! Deterministic textual snapshot of a node list.
//!
//! One line per node, exactly reproducible for golden-file testing:
//!
//! ```text
//! [startLine:startCol]>[endLine:endCol](startOffset,endOffset)nodeName: raw
//! ```
//!
//! Non-printable characters in the raw are substituted with visible
//! glyphs so snapshots stay single-line and diffable.

use quokka_ast::{NodeArena, NodeId};

use crate::ignore_block::MASK_CHAR;

/// Render one node per line in flat-list order.
#[must_use]
pub fn node_list_debug_view(arena: &NodeArena, list: &[NodeId]) -> String {
    let mut out = String::new();
    for &id in list {
        let node = arena.get(id);
        let token = &node.token;
        out.push_str(&format!(
            "[{}:{}]>[{}:{}]({},{}){}: {}\n",
            token.start_line,
            token.start_col,
            token.end_line,
            token.end_col,
            token.start_offset,
            token.end_offset,
            node.node_name,
            visible(&token.raw),
        ));
    }
    out
}

/// Substitute non-printable characters with visible glyphs.
#[must_use]
pub fn visible(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '\n' => '⏎',
            '\t' => '⇥',
            '\r' => '␍',
            MASK_CHAR => '▨',
            other => other,
        })
        .collect()
}
