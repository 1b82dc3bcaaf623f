//! Ignore-block masking and restoration.
//!
//! A region of source in a foreign embedded language (a scriptlet, an
//! output tag) cannot be handed to a markup oracle directly. The masker
//! replaces each such region with a same-length placeholder that the
//! oracle parses as an ordinary `<!...>` node: a `<!` / `>` sentinel pair
//! framing mask characters. Every line break inside the region survives
//! the mask, so the location accounting of everything downstream is
//! unaffected. After the oracle has produced nodes, the restorer splices
//! the original text back in and fails loudly if any masked region never
//! found a node to land on.

use quokka_ast::{NodeArena, NodeId, NodeKind, Token};
use regex::Regex;
use uuid::Uuid;

use quokka_common::warning::warn_once;

use crate::error::ParserError;
use crate::location::{get_col, get_line};

/// The character standing in for masked content (a private-use codepoint
/// that never occurs in real documents).
pub const MASK_CHAR: char = '\u{E000}';

/// One foreign-code tag definition.
///
/// Definition order across a tag list is a correctness contract: later
/// definitions operate on already-masked text, so more specific patterns
/// (`<%=`) must be listed before the generic ones (`<%`) they overlap.
#[derive(Debug, Clone)]
pub struct IgnoreTag {
    /// Tag kind recorded on every region this definition masks.
    pub kind: String,
    /// Pattern locating the start of a region.
    pub start: Regex,
    /// Pattern locating the end of a region.
    pub end: Regex,
}

impl IgnoreTag {
    /// Build a tag definition from literal pattern strings.
    ///
    /// Start-pattern matches are expected to be at least two characters
    /// wide so the `<!` sentinel never swallows region content.
    ///
    /// # Panics
    /// Panics if a pattern does not compile; tag definitions are static
    /// dialect configuration, so this indicates a programming error.
    #[must_use]
    pub fn new(kind: &str, start: &str, end: &str) -> Self {
        IgnoreTag {
            kind: kind.to_string(),
            start: Regex::new(start).expect("ignore-tag start pattern must compile"),
            end: Regex::new(end).expect("ignore-tag end pattern must compile"),
        }
    }
}

/// One masked region, recorded at its original character index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedCode {
    /// Kind of the tag definition that masked this region.
    pub kind: String,
    /// Character index of the region start in the original source.
    pub index: usize,
    /// The matched start tag text.
    pub start_tag: String,
    /// The foreign code between the tags.
    pub tagged_code: String,
    /// The matched end tag text, or `None` when the input ended first.
    pub end_tag: Option<String>,
    /// Whether restoration found a home for this region.
    pub resolved: bool,
}

impl MaskedCode {
    /// The original text of the whole region.
    #[must_use]
    pub fn raw(&self) -> String {
        let mut raw = String::new();
        raw.push_str(&self.start_tag);
        raw.push_str(&self.tagged_code);
        if let Some(end) = &self.end_tag {
            raw.push_str(end);
        }
        raw
    }

    /// Character length of the region.
    #[must_use]
    pub fn len(&self) -> usize {
        self.start_tag.chars().count()
            + self.tagged_code.chars().count()
            + self.end_tag.as_ref().map_or(0, |e| e.chars().count())
    }

    /// True when the region is empty (never produced by the masker).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The masker's output: the masked text plus the restore stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreBlock {
    /// The original source.
    pub source: String,
    /// The masked source; same character length and identical line-break
    /// positions as `source`.
    pub replaced: String,
    /// Masked regions ordered by index.
    pub stack: Vec<MaskedCode>,
    /// The mask character used.
    pub mask_char: char,
}

/// Mask every region matched by the tag definitions.
///
/// Each definition is applied in turn to the progressively masked text,
/// so a region masked by an earlier definition cannot be re-matched by a
/// later one. The recorded stack interleaves all tag kinds in source
/// order.
#[must_use]
pub fn ignore_block(source: &str, tags: &[IgnoreTag], mask_char: char) -> IgnoreBlock {
    let mut replaced = source.to_string();
    let mut stack: Vec<MaskedCode> = Vec::new();

    for tag in tags {
        mask_text(tag, &mut replaced, &mut stack, mask_char);
    }
    stack.sort_by_key(|code| code.index);

    IgnoreBlock {
        source: source.to_string(),
        replaced,
        stack,
        mask_char,
    }
}

/// Mask every occurrence of one tag definition in `replaced`.
fn mask_text(tag: &IgnoreTag, replaced: &mut String, stack: &mut Vec<MaskedCode>, mask_char: char) {
    let mut last_index: Option<usize> = None;

    while let Some(found) = tag.start.find(replaced) {
        let index = replaced[..found.start()].chars().count();

        // A masked region can never re-match, so indices must strictly
        // advance; a pattern that matches its own mask would spin here.
        if last_index.is_some_and(|last| index <= last) {
            warn_once(
                "ignore-block",
                &format!("ignore tag {:?} re-matched its own mask, giving up", tag.kind),
            );
            break;
        }
        last_index = Some(index);

        let start_tag = found.as_str().to_string();
        let below = &replaced[found.end()..];

        let (tagged_code, end_tag) = match tag.end.find(below) {
            Some(end_found) => (
                below[..end_found.start()].to_string(),
                Some(end_found.as_str().to_string()),
            ),
            None => (below.to_string(), None),
        };

        let mask = build_mask(&start_tag, &tagged_code, end_tag.as_deref(), mask_char);

        let above_bytes = found.start();
        let region_bytes = start_tag.len()
            + tagged_code.len()
            + end_tag.as_deref().map_or(0, str::len);
        let mut next = String::with_capacity(replaced.len());
        next.push_str(&replaced[..above_bytes]);
        next.push_str(&mask);
        next.push_str(&replaced[above_bytes + region_bytes..]);
        *replaced = next;

        stack.push(MaskedCode {
            kind: tag.kind.clone(),
            index,
            start_tag,
            tagged_code,
            end_tag,
            resolved: false,
        });
    }
}

/// Build the same-length placeholder for one region: mask characters for
/// everything except line breaks, framed by a `<!` / `>` sentinel pair.
fn build_mask(start_tag: &str, tagged_code: &str, end_tag: Option<&str>, mask_char: char) -> String {
    let mut mask: Vec<char> = Vec::new();
    mask.extend(std::iter::repeat_n(mask_char, start_tag.chars().count()));
    mask.extend(tagged_code.chars().map(|c| if c == '\n' { '\n' } else { mask_char }));
    mask.extend(std::iter::repeat_n(mask_char, end_tag.map_or(0, |e| e.chars().count())));

    if mask.len() < 3 {
        // Too narrow to frame; leave unframed rather than grow the text.
        return mask.into_iter().collect();
    }

    let mut framed = String::with_capacity(mask.len());
    framed.push('<');
    framed.push('!');
    for &c in &mask[2..mask.len() - 1] {
        framed.push(c);
    }
    framed.push('>');
    framed
}

/// Splice every masked region back into the parsed node list.
///
/// A region whose start offset matches a node becomes a `psblock` node in
/// place (same arena slot, same depth and parent, fresh identity). A
/// region that landed inside an attribute value is spliced into the value
/// token instead, and the attribute is marked dynamic. Both splices
/// substitute text of identical character length, so no location shifts.
///
/// # Errors
///
/// [`ParserError::UnsupportedSyntax`] if any region is left unresolved:
/// the foreign block landed somewhere the host grammar could not
/// represent as a discrete node.
pub fn restore_node(
    arena: &mut NodeArena,
    list: &[NodeId],
    ignore: &mut IgnoreBlock,
    transparent_blocks: &[String],
) -> Result<(), ParserError> {
    if ignore.stack.is_empty() {
        return Ok(());
    }

    for code in &mut ignore.stack {
        let Some(&id) = list
            .iter()
            .find(|&&id| arena.get(id).token.start_offset == code.index)
        else {
            continue;
        };

        let raw = code.raw();
        let node = arena.get_mut(id);
        let token = Token::with_location(
            &raw,
            node.token.start_offset,
            node.token.start_line,
            node.token.start_col,
        );

        node.uuid = Uuid::new_v4();
        node.token = token;
        node.node_name = format!("#ps:{}", code.kind);
        node.kind = NodeKind::PsBlock {
            block_type: code.kind.clone(),
            is_transparent: transparent_blocks.contains(&code.kind),
        };
        code.resolved = true;
    }

    restore_attr_values(arena, list, ignore);

    for code in &ignore.stack {
        if !code.resolved {
            return Err(ParserError::UnsupportedSyntax {
                line: get_line(&ignore.source, code.index),
                col: get_col(&ignore.source, code.index),
                raw: code.raw(),
            });
        }
    }

    Ok(())
}

/// Splice masked regions that landed inside attribute values.
fn restore_attr_values(arena: &mut NodeArena, list: &[NodeId], ignore: &mut IgnoreBlock) {
    for &id in list {
        let node = arena.get_mut(id);
        let node_start = node.token.start_offset;
        let mut patched: Vec<(usize, String)> = Vec::new();

        if let NodeKind::StartTag(data) = &mut node.kind {
            for attr in &mut data.attributes {
                let quokka_ast::Attr::Html(attr) = attr else {
                    continue;
                };
                if attr.value.raw.is_empty() || !attr.value.raw.contains(ignore.mask_char) {
                    continue;
                }
                for code in &mut ignore.stack {
                    let len = code.len();
                    if attr.value.start_offset <= code.index
                        && code.index + len <= attr.value.end_offset
                    {
                        let offset = code.index - attr.value.start_offset;
                        attr.value.raw = splice_chars(&attr.value.raw, offset, len, &code.raw());
                        attr.is_dynamic_value = true;
                        code.resolved = true;
                        patched.push((code.index, code.raw()));
                    }
                }
            }
        }

        // Patch the node raw so it agrees with the restored values.
        for (index, raw) in patched {
            let offset = index - node_start;
            let len = raw.chars().count();
            node.token.raw = splice_chars(&node.token.raw, offset, len, &raw);
        }
    }
}

/// Replace `len` characters of `text` starting at character `offset`.
fn splice_chars(text: &str, offset: usize, len: usize, replacement: &str) -> String {
    let mut out: String = text.chars().take(offset).collect();
    out.push_str(replacement);
    out.extend(text.chars().skip(offset + len));
    out
}
