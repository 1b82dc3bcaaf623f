//! Node arena and identifiers.
//!
//! All nodes of one parse live in a single arena, and every tree link is a
//! [`NodeId`] index into it. This gives O(1) access and traversal in any
//! direction without reference cycles, and the arena doubles as the
//! per-parse identity registry: it is constructed fresh for each parse
//! call and discarded with the result.

use serde::Serialize;

use crate::node::Node;

/// A type-safe index into a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(pub usize);

/// Arena owning every node of one parse.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// An empty arena.
    #[must_use]
    pub fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    /// Store a node and return its id.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// The node behind an id.
    ///
    /// # Panics
    /// Panics if the id was not minted by this arena; that indicates ids
    /// leaking between parse calls.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Mutable access to the node behind an id.
    ///
    /// # Panics
    /// Panics if the id was not minted by this arena.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Number of nodes allocated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no node has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all ids in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }
}
