//! The markup scanner.
//!
//! A single forward pass over the character array with a stack of open
//! containers (elements and control-block branches). Tag bodies are
//! scanned quote-aware (and brace-aware when the dialect asks for it),
//! so a `>` inside an attribute value never closes a tag early.

use quokka_common::warning::warn_once;

use super::node::{ElementSpans, MarkupKind, MarkupNode, ScanError, ScanOptions, ScanResult};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements only have a start tag; end tags must not be specified."
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements auto-closed by a following sibling of the same name when the
/// dialect's end-tag policy is omittable.
///
/// [§ 13.1.2.4 Optional tags](https://html.spec.whatwg.org/multipage/syntax.html#optional-tags)
const OMITTABLE_SIBLINGS: &[&str] = &["li", "p", "dt", "dd", "option", "tr", "td", "th"];

/// An open container on the scanner stack.
struct Frame {
    slot: FrameSlot,
    children: Vec<MarkupNode>,
}

enum FrameSlot {
    Root,
    Element {
        name: String,
        tag_start: usize,
        start_tag_end: usize,
    },
    Branch {
        family: String,
        keyword: String,
        span: (usize, usize),
    },
}

impl Frame {
    fn root() -> Self {
        Frame {
            slot: FrameSlot::Root,
            children: Vec::new(),
        }
    }
}

/// Mutable state of one region scan.
struct RegionState {
    frames: Vec<Frame>,
    pending: Vec<(usize, (usize, usize))>,
    text_start: Option<usize>,
}

impl RegionState {
    fn new() -> Self {
        RegionState {
            frames: vec![Frame::root()],
            pending: Vec::new(),
            text_start: None,
        }
    }

    fn push_node(&mut self, node: MarkupNode) {
        if let Some(top) = self.frames.last_mut() {
            top.children.push(node);
        }
    }

    fn flush_text(&mut self, upto: usize) {
        if let Some(start) = self.text_start.take()
            && start < upto
        {
            self.push_node(MarkupNode::leaf(MarkupKind::Text, (start, upto)));
        }
    }

    /// Pop the top element frame into a completed element node.
    fn close_element(&mut self, end: usize, end_tag: Option<(usize, usize)>) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let FrameSlot::Element {
            name,
            tag_start,
            start_tag_end,
        } = frame.slot
        else {
            return;
        };
        self.push_node(MarkupNode {
            kind: MarkupKind::Element(ElementSpans {
                name,
                start_tag_end,
                end_tag,
                self_closing: false,
            }),
            span: Some((tag_start, end)),
            children: frame.children,
            parent_expression: None,
        });
    }

    /// Pop the top branch frame into a completed branch node.
    fn close_branch(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let FrameSlot::Branch { keyword, span, .. } = frame.slot else {
            return;
        };
        self.push_node(MarkupNode {
            kind: MarkupKind::ControlBranch { keyword },
            span: Some(span),
            children: frame.children,
            parent_expression: None,
        });
    }
}

/// Scan a whole source and, when the options ask for it, lift elements
/// out of expression bodies.
///
/// # Errors
///
/// [`ScanError`] for unterminated or mis-nested constructs the options
/// make fatal.
pub fn scan(source: &str, options: ScanOptions) -> Result<ScanResult, ScanError> {
    let chars: Vec<char> = source.chars().collect();
    let machine = Machine {
        chars: &chars,
        options,
    };

    let mut counter = 0usize;
    let (roots, mut pending) = machine.scan_region(0, chars.len(), &mut counter, false)?;

    let mut lifted = Vec::new();
    if options.expression_elements {
        while let Some((ordinal, (body_start, body_end))) = pending.pop() {
            let mut k = body_start;
            while k < body_end {
                if chars[k] == '<'
                    && k + 1 < body_end
                    && (chars[k + 1].is_ascii_alphabetic()
                        || (options.nameless_fragment && chars[k + 1] == '>'))
                    && let Ok((nodes, inner)) = machine.scan_region(k, body_end, &mut counter, true)
                    && let Some(mut node) = nodes.into_iter().next()
                    && matches!(node.kind, MarkupKind::Element(_))
                {
                    node.parent_expression = Some(ordinal);
                    let node_end = node.span.map_or(body_end, |span| span.1);
                    lifted.push(node);
                    pending.extend(inner);
                    k = node_end;
                    continue;
                }
                k += 1;
            }
        }
    }

    Ok(ScanResult { roots, lifted })
}

struct Machine<'a> {
    chars: &'a [char],
    options: ScanOptions,
}

impl Machine<'_> {
    /// Scan `[start, end)`. In `single` mode the scan stops after the
    /// first completed root node, which must be an element.
    #[allow(clippy::type_complexity)]
    fn scan_region(
        &self,
        start: usize,
        end: usize,
        counter: &mut usize,
        single: bool,
    ) -> Result<(Vec<MarkupNode>, Vec<(usize, (usize, usize))>), ScanError> {
        let mut st = RegionState::new();
        let mut i = start;

        while i < end {
            let c = self.chars[i];

            if c == '<' && i + 1 < end {
                let next = self.chars[i + 1];
                if next == '!' {
                    st.flush_text(i);
                    i = self.scan_exclaim(i, end, &mut st);
                    if single && completed(&st) {
                        break;
                    }
                    continue;
                }
                if next == '/' {
                    st.flush_text(i);
                    i = self.scan_end_tag(i, end, &mut st)?;
                    if single && completed(&st) {
                        break;
                    }
                    continue;
                }
                if next.is_ascii_alphabetic() || (self.options.nameless_fragment && next == '>') {
                    st.flush_text(i);
                    i = self.scan_start_tag(i, end, &mut st)?;
                    if single && completed(&st) {
                        break;
                    }
                    continue;
                }
            }

            if (self.options.brace_expressions || self.options.control_blocks) && c == '{' {
                if let Some(advanced) = self.try_brace(i, end, &mut st, counter)? {
                    i = advanced;
                    if single && completed(&st) {
                        break;
                    }
                    continue;
                }
            }

            if st.text_start.is_none() {
                st.text_start = Some(i);
            }
            i += 1;
        }

        st.flush_text(end);

        // Unwind whatever is still open at end of input.
        while st.frames.len() > 1 {
            let open_element = match st.frames.last().map(|f| &f.slot) {
                Some(FrameSlot::Branch { family, span, .. }) => {
                    return Err(ScanError {
                        message: format!("unclosed {{#{family}}} block"),
                        offset: span.0,
                    });
                }
                Some(FrameSlot::Element { name, tag_start, .. }) => {
                    if self.options.require_end_tags {
                        return Err(ScanError {
                            message: format!("missing end tag for <{name}>"),
                            offset: *tag_start,
                        });
                    }
                    true
                }
                _ => false,
            };
            if !open_element {
                break;
            }
            st.close_element(end, None);
        }

        let Some(root) = st.frames.pop() else {
            return Ok((Vec::new(), st.pending));
        };

        if single && !root.children.iter().any(|n| matches!(n.kind, MarkupKind::Element(_))) {
            return Err(ScanError {
                message: "expected an element".to_string(),
                offset: start,
            });
        }

        Ok((root.children, st.pending))
    }

    /// `<!--`, `<!DOCTYPE`, or a bogus comment, which is also how a
    /// masked foreign region surfaces as a discrete node.
    fn scan_exclaim(&self, i: usize, end: usize, st: &mut RegionState) -> usize {
        if self.lookahead(i, "<!--") {
            let close = self.find_seq(i + 4, end, "-->");
            let node_end = close.map_or(end, |at| at + 3);
            st.push_node(MarkupNode::leaf(MarkupKind::Comment, (i, node_end)));
            return node_end;
        }

        if self.lookahead_no_case(i + 2, "doctype") {
            let gt = self.find_char(i + 2, end, '>');
            let node_end = gt.map_or(end, |at| at + 1);
            st.push_node(MarkupNode::leaf(MarkupKind::Doctype, (i, node_end)));
            return node_end;
        }

        let gt = self.find_char(i + 2, end, '>');
        let node_end = gt.map_or(end, |at| at + 1);
        st.push_node(MarkupNode::leaf(MarkupKind::Comment, (i, node_end)));
        node_end
    }

    /// An end tag: close the matching element, auto-closing anything the
    /// omittable policy allows on the way.
    fn scan_end_tag(&self, i: usize, end: usize, st: &mut RegionState) -> Result<usize, ScanError> {
        let Some(gt) = self.find_char(i + 2, end, '>') else {
            warn_once("markup", "unterminated end tag at end of input");
            st.push_node(MarkupNode::leaf(MarkupKind::Invalid, (i, end)));
            return Ok(end);
        };
        let name: String = self.chars[i + 2..gt].iter().collect();
        let name = name.trim().to_string();

        let mut matched_depth: Option<usize> = None;
        let mut crosses_branch = false;
        for (idx, frame) in st.frames.iter().enumerate().rev() {
            match &frame.slot {
                FrameSlot::Root => break,
                FrameSlot::Branch { .. } => crosses_branch = true,
                FrameSlot::Element { name: open, .. } => {
                    if names_match(open, &name, self.options.case_sensitive) {
                        matched_depth = Some(idx);
                        break;
                    }
                }
            }
        }

        let Some(matched_depth) = matched_depth else {
            warn_once("markup", &format!("stray end tag </{name}> has no open element"));
            st.push_node(MarkupNode::leaf(MarkupKind::Invalid, (i, gt + 1)));
            return Ok(gt + 1);
        };

        if crosses_branch {
            return Err(ScanError {
                message: format!("</{name}> closes an element across an open block"),
                offset: i,
            });
        }

        while st.frames.len() - 1 > matched_depth {
            if self.options.require_end_tags {
                let (unclosed, at) = match st.frames.last().map(|f| &f.slot) {
                    Some(FrameSlot::Element { name, tag_start, .. }) => (name.clone(), *tag_start),
                    _ => (String::new(), i),
                };
                return Err(ScanError {
                    message: format!("missing end tag for <{unclosed}>"),
                    offset: at,
                });
            }
            st.close_element(i, None);
        }

        st.close_element(gt + 1, Some((i, gt + 1)));
        Ok(gt + 1)
    }

    /// A start tag; may complete immediately (void or self-closing) or
    /// open a frame.
    fn scan_start_tag(&self, i: usize, end: usize, st: &mut RegionState) -> Result<usize, ScanError> {
        let mut j = i + 1;
        while j < end && is_name_char(self.chars[j]) {
            j += 1;
        }
        let name: String = self.chars[i + 1..j].iter().collect();

        let mut k = j;
        let mut in_quote: Option<char> = None;
        let mut brace_depth = 0usize;
        let mut gt: Option<usize> = None;
        while k < end {
            let c = self.chars[k];
            match in_quote {
                Some(q) => {
                    if c == q {
                        in_quote = None;
                    }
                }
                None => match c {
                    '"' | '\'' => in_quote = Some(c),
                    '{' if self.options.brace_expressions => brace_depth += 1,
                    '}' if self.options.brace_expressions && brace_depth > 0 => brace_depth -= 1,
                    '>' if brace_depth == 0 => {
                        gt = Some(k);
                        break;
                    }
                    _ => {}
                },
            }
            k += 1;
        }

        let Some(gt) = gt else {
            if self.options.require_end_tags {
                return Err(ScanError {
                    message: format!("unterminated start tag <{name}>"),
                    offset: i,
                });
            }
            warn_once("markup", &format!("unterminated start tag <{name}> at end of input"));
            st.push_node(MarkupNode::leaf(MarkupKind::Text, (i, end)));
            return Ok(end);
        };

        let self_closing = gt > i + 1 && self.chars[gt - 1] == '/';
        let name_lc = name.to_ascii_lowercase();

        if !self.options.require_end_tags
            && OMITTABLE_SIBLINGS.contains(&name_lc.as_str())
            && let Some(FrameSlot::Element { name: open, .. }) = st.frames.last().map(|f| &f.slot)
            && open.eq_ignore_ascii_case(&name)
        {
            st.close_element(i, None);
        }

        if self_closing || VOID_ELEMENTS.contains(&name_lc.as_str()) {
            st.push_node(MarkupNode {
                kind: MarkupKind::Element(ElementSpans {
                    name,
                    start_tag_end: gt + 1,
                    end_tag: None,
                    self_closing,
                }),
                span: Some((i, gt + 1)),
                children: Vec::new(),
                parent_expression: None,
            });
            return Ok(gt + 1);
        }

        st.frames.push(Frame {
            slot: FrameSlot::Element {
                name,
                tag_start: i,
                start_tag_end: gt + 1,
            },
            children: Vec::new(),
        });
        Ok(gt + 1)
    }

    /// A `{...}` construct, or `None` when the brace is plain text.
    fn try_brace(
        &self,
        i: usize,
        end: usize,
        st: &mut RegionState,
        counter: &mut usize,
    ) -> Result<Option<usize>, ScanError> {
        let next = if i + 1 < end { Some(self.chars[i + 1]) } else { None };

        if self.options.control_blocks && matches!(next, Some('#' | ':' | '/')) {
            let Some(close) = self.scan_balanced(i, end) else {
                return Err(ScanError {
                    message: "unterminated block tag".to_string(),
                    offset: i,
                });
            };
            let inner: String = self.chars[i + 2..close].iter().collect();
            let keyword = block_keyword(&inner);
            st.flush_text(i);

            match self.chars[i + 1] {
                '#' => {
                    st.frames.push(Frame {
                        slot: FrameSlot::Branch {
                            family: keyword.clone(),
                            keyword,
                            span: (i, close + 1),
                        },
                        children: Vec::new(),
                    });
                }
                ':' => {
                    let Some(FrameSlot::Branch { family, .. }) = st.frames.last().map(|f| &f.slot)
                    else {
                        return Err(ScanError {
                            message: format!("{{:{keyword}}} outside an open block"),
                            offset: i,
                        });
                    };
                    let family = family.clone();
                    st.close_branch();
                    st.frames.push(Frame {
                        slot: FrameSlot::Branch {
                            family,
                            keyword,
                            span: (i, close + 1),
                        },
                        children: Vec::new(),
                    });
                }
                _ => {
                    let Some(FrameSlot::Branch { family, .. }) = st.frames.last().map(|f| &f.slot)
                    else {
                        return Err(ScanError {
                            message: format!("{{/{keyword}}} has no open block"),
                            offset: i,
                        });
                    };
                    if family != &keyword {
                        return Err(ScanError {
                            message: format!("{{/{keyword}}} does not close the open {{#{family}}} block"),
                            offset: i,
                        });
                    }
                    st.close_branch();
                    st.push_node(MarkupNode::leaf(
                        MarkupKind::ControlEnd { keyword },
                        (i, close + 1),
                    ));
                }
            }
            return Ok(Some(close + 1));
        }

        if self.options.brace_expressions {
            let Some(close) = self.scan_balanced(i, end) else {
                // Unbalanced brace: plain text.
                return Ok(None);
            };
            st.flush_text(i);
            let ordinal = *counter;
            *counter += 1;
            if self.options.expression_elements {
                st.pending.push((ordinal, (i + 1, close)));
            }
            st.push_node(MarkupNode::leaf(MarkupKind::Expression { ordinal }, (i, close + 1)));
            return Ok(Some(close + 1));
        }

        Ok(None)
    }

    /// Index of the `}` balancing the `{` at `i`, quote- and
    /// nesting-aware.
    fn scan_balanced(&self, i: usize, end: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut in_quote: Option<char> = None;
        let mut k = i;
        while k < end {
            let c = self.chars[k];
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
                            return Some(k);
                        }
                    }
                    _ => {}
                },
            }
            k += 1;
        }
        None
    }

    fn lookahead(&self, at: usize, expect: &str) -> bool {
        expect
            .chars()
            .enumerate()
            .all(|(n, c)| self.chars.get(at + n) == Some(&c))
    }

    fn lookahead_no_case(&self, at: usize, expect: &str) -> bool {
        expect
            .chars()
            .enumerate()
            .all(|(n, c)| self.chars.get(at + n).is_some_and(|i| i.eq_ignore_ascii_case(&c)))
    }

    fn find_char(&self, from: usize, end: usize, needle: char) -> Option<usize> {
        (from..end).find(|&k| self.chars[k] == needle)
    }

    fn find_seq(&self, from: usize, end: usize, needle: &str) -> Option<usize> {
        (from..end).find(|&k| {
            needle
                .chars()
                .enumerate()
                .all(|(n, c)| k + n < end && self.chars[k + n] == c)
        })
    }
}

/// True once a region scan has produced at least one completed root.
fn completed(st: &RegionState) -> bool {
    st.frames.len() == 1 && st.frames.first().is_some_and(|f| !f.children.is_empty())
}

fn names_match(open: &str, close: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        open == close
    } else {
        open.eq_ignore_ascii_case(close)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')
}

/// The keyword of a block tag body (`if x` ⇒ `if`, `else if x` ⇒
/// `else if`).
fn block_keyword(inner: &str) -> String {
    let mut words = inner.split_whitespace();
    let first = words.next().unwrap_or("").to_string();
    if first == "else" && words.next() == Some("if") {
        return "else if".to_string();
    }
    first
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markup(source: &str) -> Vec<MarkupNode> {
        scan(source, ScanOptions::default()).unwrap().roots
    }

    #[test]
    fn element_with_text() {
        let roots = markup("<div>text</div>");
        assert_eq!(roots.len(), 1);
        let MarkupKind::Element(spans) = &roots[0].kind else {
            panic!("expected element");
        };
        assert_eq!(spans.name, "div");
        assert_eq!(spans.start_tag_end, 5);
        assert_eq!(spans.end_tag, Some((9, 15)));
        assert_eq!(roots[0].span, Some((0, 15)));
        assert_eq!(roots[0].children.len(), 1);
        assert_eq!(roots[0].children[0].span, Some((5, 9)));
    }

    #[test]
    fn void_element_never_opens_a_frame() {
        let roots = markup("<img src=\"a.png\"><p>x</p>");
        assert_eq!(roots.len(), 2);
        assert!(matches!(&roots[0].kind, MarkupKind::Element(s) if s.name == "img"));
        assert!(roots[0].children.is_empty());
    }

    #[test]
    fn quoted_gt_does_not_close_the_tag() {
        let roots = markup("<a title=\"a > b\">x</a>");
        let MarkupKind::Element(spans) = &roots[0].kind else {
            panic!("expected element");
        };
        assert_eq!(spans.start_tag_end, 17);
    }

    #[test]
    fn bogus_comment_becomes_a_discrete_node() {
        let roots = markup("<div><!abc></div>");
        assert_eq!(roots[0].children.len(), 1);
        assert!(matches!(roots[0].children[0].kind, MarkupKind::Comment));
        assert_eq!(roots[0].children[0].span, Some((5, 11)));
    }

    #[test]
    fn omitted_li_end_tags_auto_close() {
        let roots = markup("<ul><li>a<li>b</ul>");
        assert_eq!(roots.len(), 1);
        let lis: Vec<&MarkupNode> = roots[0].children.iter().collect();
        assert_eq!(lis.len(), 2);
        assert_eq!(lis[0].span, Some((4, 9)));
        assert_eq!(lis[1].span, Some((9, 19 - 5)));
    }

    #[test]
    fn stray_end_tag_is_invalid_not_fatal() {
        let roots = markup("a</b>c");
        assert_eq!(roots.len(), 3);
        assert!(matches!(roots[1].kind, MarkupKind::Invalid));
    }

    #[test]
    fn missing_end_tag_is_fatal_when_required() {
        let err = scan(
            "<div><span></div>",
            ScanOptions {
                require_end_tags: true,
                ..ScanOptions::default()
            },
        )
        .unwrap_err();
        assert!(err.message.contains("<span>"));
    }

    #[test]
    fn control_blocks_nest_content_under_branches() {
        let options = ScanOptions {
            brace_expressions: true,
            control_blocks: true,
            require_end_tags: true,
            ..ScanOptions::default()
        };
        let result = scan("{#if ok}<b>y</b>{:else}n{/if}", options).unwrap();
        let roots = result.roots;
        assert_eq!(roots.len(), 3);
        assert!(matches!(&roots[0].kind, MarkupKind::ControlBranch { keyword } if keyword == "if"));
        assert_eq!(roots[0].span, Some((0, 8)));
        assert_eq!(roots[0].children.len(), 1);
        assert!(matches!(&roots[1].kind, MarkupKind::ControlBranch { keyword } if keyword == "else"));
        assert!(matches!(&roots[2].kind, MarkupKind::ControlEnd { keyword } if keyword == "if"));
    }

    #[test]
    fn mismatched_block_close_is_fatal() {
        let options = ScanOptions {
            control_blocks: true,
            brace_expressions: true,
            ..ScanOptions::default()
        };
        let err = scan("{#if x}a{/each}", options).unwrap_err();
        assert!(err.message.contains("{/each}"));
    }

    #[test]
    fn expressions_get_document_order_ordinals() {
        let options = ScanOptions {
            brace_expressions: true,
            ..ScanOptions::default()
        };
        let roots = scan("{a}<p>{b}</p>", options).unwrap().roots;
        assert!(matches!(roots[0].kind, MarkupKind::Expression { ordinal: 0 }));
        assert!(matches!(
            roots[1].children[0].kind,
            MarkupKind::Expression { ordinal: 1 }
        ));
    }

    #[test]
    fn elements_are_lifted_out_of_expression_bodies() {
        let options = ScanOptions {
            brace_expressions: true,
            expression_elements: true,
            require_end_tags: true,
            nameless_fragment: true,
            case_sensitive: true,
        };
        let result = scan("<ul>{items.map(i => <li>{i}</li>)}</ul>", options).unwrap();
        assert_eq!(result.lifted.len(), 1);
        let li = &result.lifted[0];
        assert!(matches!(&li.kind, MarkupKind::Element(s) if s.name == "li"));
        assert_eq!(li.parent_expression, Some(0));
        // The {i} inside the lifted element is an expression of its own.
        assert_eq!(li.children.len(), 1);
    }

    #[test]
    fn nameless_fragment() {
        let options = ScanOptions {
            nameless_fragment: true,
            require_end_tags: true,
            case_sensitive: true,
            ..ScanOptions::default()
        };
        let roots = scan("<><p>x</p></>", options).unwrap().roots;
        assert_eq!(roots.len(), 1);
        assert!(matches!(&roots[0].kind, MarkupKind::Element(s) if s.name.is_empty()));
        assert_eq!(roots[0].children.len(), 1);
    }
}
