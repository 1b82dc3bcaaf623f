//! The document facade and its traversal accessors.

use std::cell::RefCell;
use std::collections::HashMap;

use quokka_ast::{Node, NodeId, NodeKind};
use quokka_parser::ParseResult;

use crate::error::DomError;

/// The DOM-shaped parent of a node.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    /// The document itself is the parent.
    Document,
    /// Another node is the parent.
    Node(NodeId),
}

/// A read-only, DOM-API-shaped projection over an assembled node list.
///
/// Traversal accessors compute lazily and cache; nothing here mutates
/// the underlying tree. Every DOM mutation operation signals
/// [`DomError::Unsupported`].
#[derive(Debug)]
pub struct Document {
    result: ParseResult,
    child_cache: RefCell<HashMap<Option<NodeId>, Vec<NodeId>>>,
    prev_token_cache: RefCell<HashMap<NodeId, Option<NodeId>>>,
}

impl Document {
    /// Wrap one parse result.
    #[must_use]
    pub fn new(result: ParseResult) -> Self {
        Document {
            result,
            child_cache: RefCell::new(HashMap::new()),
            prev_token_cache: RefCell::new(HashMap::new()),
        }
    }

    /// The flat node list in document order.
    #[must_use]
    pub fn node_list(&self) -> &[NodeId] {
        &self.result.list
    }

    /// The node behind an id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        self.result.arena.get(id)
    }

    /// Whether the document was parsed as a fragment.
    #[must_use]
    pub fn is_fragment(&self) -> bool {
        self.result.is_fragment
    }

    /// The original source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.result.source
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#ref-for-dom-node-childnodes%E2%91%A0)
    ///
    /// The document's child nodes: every top-level entry of the flat
    /// list that is a child kind (end tags and invalid markers never
    /// appear as children). Cached on first access.
    #[must_use]
    pub fn document_child_nodes(&self) -> Vec<NodeId> {
        if let Some(cached) = self.child_cache.borrow().get(&None) {
            return cached.clone();
        }
        let children: Vec<NodeId> = self
            .result
            .list
            .iter()
            .copied()
            .filter(|&id| {
                let node = self.node(id);
                node.parent.is_none() && is_child_kind(node)
            })
            .collect();
        let _ = self.child_cache.borrow_mut().insert(None, children.clone());
        children
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#ref-for-dom-node-childnodes%E2%91%A0)
    ///
    /// A node's child nodes: its recorded child list minus end-tag and
    /// invalid markers. Only elements, fragments, and blocks have
    /// children. Cached on first access.
    #[must_use]
    pub fn child_nodes(&self, id: NodeId) -> Vec<NodeId> {
        if let Some(cached) = self.child_cache.borrow().get(&Some(id)) {
            return cached.clone();
        }
        let node = self.node(id);
        let children: Vec<NodeId> = match node.kind {
            NodeKind::StartTag(_) | NodeKind::PsBlock { .. } => node
                .children
                .iter()
                .copied()
                .filter(|&child| is_child_kind(self.node(child)))
                .collect(),
            _ => Vec::new(),
        };
        let _ = self.child_cache.borrow_mut().insert(Some(id), children.clone());
        children
    }

    /// Drop the cached child list for a node (or the document when
    /// `None`).
    pub fn reset_children(&self, target: Option<NodeId>) {
        let _ = self.child_cache.borrow_mut().remove(&target);
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#ref-for-dom-node-parentnode%E2%91%A0)
    ///
    /// The DOM-shaped parent, distinct from the raw syntactic parent:
    /// transparent blocks are walked past, a non-transparent block hides
    /// its children from DOM ancestry, and the document of a fragment
    /// parse is not a parent at all.
    #[must_use]
    pub fn parent_node(&self, id: NodeId) -> Option<ParentRef> {
        let syntactic = self.node(id).parent;
        let Some(parent) = syntactic else {
            return if self.result.is_fragment {
                None
            } else {
                Some(ParentRef::Document)
            };
        };
        match &self.node(parent).kind {
            NodeKind::PsBlock { is_transparent, .. } => {
                if *is_transparent {
                    self.parent_node(parent)
                } else {
                    None
                }
            }
            _ => Some(ParentRef::Node(parent)),
        }
    }

    /// The next sibling within the syntactic parent's child list (or the
    /// document's flat list at top level), matched by identity.
    #[must_use]
    pub fn next_node(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.syntactic_siblings(id);
        let uuid = self.node(id).uuid;
        let index = siblings.iter().position(|&s| self.node(s).uuid == uuid)?;
        siblings.get(index + 1).copied()
    }

    /// The previous sibling within the syntactic parent's child list (or
    /// the document's flat list at top level), matched by identity.
    #[must_use]
    pub fn prev_node(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.syntactic_siblings(id);
        let uuid = self.node(id).uuid;
        let index = siblings.iter().position(|&s| self.node(s).uuid == uuid)?;
        index.checked_sub(1).and_then(|i| siblings.get(i)).copied()
    }

    /// The immediately preceding token by flat order, skipping elements
    /// marked omitted. Distinct from [`Document::prev_node`], which
    /// respects only syntactic siblings. Cached on first access.
    #[must_use]
    pub fn prev_token(&self, id: NodeId) -> Option<NodeId> {
        if let Some(cached) = self.prev_token_cache.borrow().get(&id) {
            return *cached;
        }

        let uuid = self.node(id).uuid;
        let mut index: Option<usize> = None;
        for (i, &entry) in self.result.list.iter().enumerate() {
            let node = self.node(entry);
            if node.element().is_some_and(|data| data.is_omitted) {
                continue;
            }
            if node.uuid == uuid {
                index = Some(i);
                break;
            }
        }

        let prev = index
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.result.list.get(i))
            .copied();
        let _ = self.prev_token_cache.borrow_mut().insert(id, prev);
        prev
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#ref-for-dom-node-firstchild%E2%91%A0)
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.child_nodes(id).first().copied()
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#ref-for-dom-node-lastchild%E2%91%A0)
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.child_nodes(id).last().copied()
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#ref-for-dom-node-nodename%E2%91%A0)
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> &str {
        &self.node(id).node_name
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// The raw text for character data; `None` for everything else.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        let node = self.node(id);
        match node.kind {
            NodeKind::Text | NodeKind::Comment => Some(&node.token.raw),
            _ => None,
        }
    }

    fn syntactic_siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.node(id).parent {
            Some(parent) => self.child_nodes(parent),
            None => self.result.list.clone(),
        }
    }
}

/// End tags and invalid markers never appear as DOM children.
fn is_child_kind(node: &Node) -> bool {
    !matches!(node.kind, NodeKind::EndTag { .. } | NodeKind::Invalid)
}

// DOM operations the read-only view refuses. Each signals programmer
// misuse rather than a data problem.
impl Document {
    /// **Always fails.** [§ 4.4](https://dom.spec.whatwg.org/#dom-node-appendchild)
    ///
    /// # Errors
    /// Always [`DomError::Unsupported`].
    pub fn append_child(&self, _parent: NodeId, _node: NodeId) -> Result<NodeId, DomError> {
        Err(DomError::Unsupported("appendChild"))
    }

    /// **Always fails.** [§ 4.4](https://dom.spec.whatwg.org/#dom-node-removechild)
    ///
    /// # Errors
    /// Always [`DomError::Unsupported`].
    pub fn remove_child(&self, _parent: NodeId, _child: NodeId) -> Result<NodeId, DomError> {
        Err(DomError::Unsupported("removeChild"))
    }

    /// **Always fails.** [§ 4.4](https://dom.spec.whatwg.org/#dom-node-insertbefore)
    ///
    /// # Errors
    /// Always [`DomError::Unsupported`].
    pub fn insert_before(
        &self,
        _parent: NodeId,
        _node: NodeId,
        _reference: Option<NodeId>,
    ) -> Result<NodeId, DomError> {
        Err(DomError::Unsupported("insertBefore"))
    }

    /// **Always fails.** [§ 4.4](https://dom.spec.whatwg.org/#dom-node-replacechild)
    ///
    /// # Errors
    /// Always [`DomError::Unsupported`].
    pub fn replace_child(
        &self,
        _parent: NodeId,
        _node: NodeId,
        _child: NodeId,
    ) -> Result<NodeId, DomError> {
        Err(DomError::Unsupported("replaceChild"))
    }

    /// **Always fails.** [§ 4.4](https://dom.spec.whatwg.org/#ref-for-dom-node-clonenode%E2%91%A0)
    ///
    /// # Errors
    /// Always [`DomError::Unsupported`].
    pub fn clone_node(&self, _id: NodeId, _deep: bool) -> Result<NodeId, DomError> {
        Err(DomError::Unsupported("cloneNode"))
    }

    /// **Always fails.** [§ 4.4](https://dom.spec.whatwg.org/#ref-for-dom-node-normalize%E2%91%A0)
    ///
    /// # Errors
    /// Always [`DomError::Unsupported`].
    pub fn normalize(&self) -> Result<(), DomError> {
        Err(DomError::Unsupported("normalize"))
    }

    /// **Always fails.** [DOM `EventTarget`](https://dom.spec.whatwg.org/#interface-eventtarget)
    ///
    /// # Errors
    /// Always [`DomError::Unsupported`].
    pub fn add_event_listener(&self, _id: NodeId, _event_type: &str) -> Result<(), DomError> {
        Err(DomError::Unsupported("addEventListener"))
    }

    /// **Always fails.** [DOM `EventTarget`](https://dom.spec.whatwg.org/#interface-eventtarget)
    ///
    /// # Errors
    /// Always [`DomError::Unsupported`].
    pub fn remove_event_listener(&self, _id: NodeId, _event_type: &str) -> Result<(), DomError> {
        Err(DomError::Unsupported("removeEventListener"))
    }

    /// **Always fails.** [§ 4.4](https://dom.spec.whatwg.org/#ref-for-dom-node-comparedocumentposition%E2%91%A0)
    ///
    /// # Errors
    /// Always [`DomError::Unsupported`].
    pub fn compare_document_position(&self, _a: NodeId, _b: NodeId) -> Result<u16, DomError> {
        Err(DomError::Unsupported("compareDocumentPosition"))
    }

    /// **Always fails.** [§ 4.4](https://dom.spec.whatwg.org/#ref-for-dom-node-isequalnode%E2%91%A0)
    ///
    /// # Errors
    /// Always [`DomError::Unsupported`].
    pub fn is_equal_node(&self, _a: NodeId, _b: NodeId) -> Result<bool, DomError> {
        Err(DomError::Unsupported("isEqualNode"))
    }

    /// **Always fails.** [§ 4.4](https://dom.spec.whatwg.org/#dom-node-issamenode)
    ///
    /// # Errors
    /// Always [`DomError::Unsupported`].
    pub fn is_same_node(&self, _a: NodeId, _b: NodeId) -> Result<bool, DomError> {
        Err(DomError::Unsupported("isSameNode"))
    }

    /// **Always fails.** [§ 4.4](https://dom.spec.whatwg.org/#dom-node-lookupnamespaceuri)
    ///
    /// # Errors
    /// Always [`DomError::Unsupported`].
    pub fn lookup_namespace_uri(
        &self,
        _id: NodeId,
        _prefix: Option<&str>,
    ) -> Result<Option<String>, DomError> {
        Err(DomError::Unsupported("lookupNamespaceURI"))
    }

    /// **Always fails.** [§ 4.4](https://dom.spec.whatwg.org/#dom-node-lookupprefix)
    ///
    /// # Errors
    /// Always [`DomError::Unsupported`].
    pub fn lookup_prefix(&self, _id: NodeId, _namespace: Option<&str>) -> Result<Option<String>, DomError> {
        Err(DomError::Unsupported("lookupPrefix"))
    }

    /// **Always fails.** [§ 4.4](https://dom.spec.whatwg.org/#ref-for-dom-node-baseuri%E2%91%A0)
    ///
    /// # Errors
    /// Always [`DomError::Unsupported`].
    pub fn base_uri(&self, _id: NodeId) -> Result<String, DomError> {
        Err(DomError::Unsupported("baseURI"))
    }

    /// **Always fails.** [§ 4.4](https://dom.spec.whatwg.org/#ref-for-dom-node-isconnected%E2%91%A0)
    ///
    /// # Errors
    /// Always [`DomError::Unsupported`].
    pub fn is_connected(&self, _id: NodeId) -> Result<bool, DomError> {
        Err(DomError::Unsupported("isConnected"))
    }

    /// **Always fails.** [§ 4.4](https://dom.spec.whatwg.org/#ref-for-dom-node-haschildnodes%E2%91%A0)
    ///
    /// # Errors
    /// Always [`DomError::Unsupported`].
    pub fn has_child_nodes(&self, _id: NodeId) -> Result<bool, DomError> {
        Err(DomError::Unsupported("hasChildNodes"))
    }
}
