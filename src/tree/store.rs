//! NodeStore: Authoritative map of every node a replica has seen
//!
//! Tombstones are never dropped. The children index is derived from the
//! parent links and kept sorted by identifier, so it never depends on the
//! order in which nodes arrived.

use super::id::Identifier;
use super::node::Node;
use std::collections::{BTreeSet, HashMap};

/// Result of [`NodeStore::put`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The node was new and is now stored
    Inserted,
    /// A node with the same identifier was already present
    Duplicate,
    /// The parent is unknown; the node was not stored
    MissingParent,
}

/// Per-replica node storage with a derived children index
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    nodes: HashMap<Identifier, Node>,

    /// parent -> children, ascending by identifier
    children: HashMap<Identifier, BTreeSet<Identifier>>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// ROOT is always present
    pub fn has(&self, id: &Identifier) -> bool {
        id.is_root() || self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &Identifier) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Store a new node under an existing parent
    ///
    /// Re-inserting a known identifier is a no-op. A timestamp-0 parent is
    /// stored as ROOT.
    pub fn put(&mut self, mut node: Node) -> PutOutcome {
        node.parent_id = node.parent_id.normalized();
        if self.nodes.contains_key(&node.id) {
            return PutOutcome::Duplicate;
        }
        if !self.has(&node.parent_id) {
            return PutOutcome::MissingParent;
        }

        self.children
            .entry(node.parent_id)
            .or_default()
            .insert(node.id);
        self.nodes.insert(node.id, node);
        PutOutcome::Inserted
    }

    /// Tombstone a node; returns true only if the flag changed
    ///
    /// Unknown identifiers are ignored. Tombstoning does not move the node,
    /// so the children index is left as is.
    pub fn mark_removed(&mut self, id: &Identifier) -> bool {
        self.nodes
            .get_mut(id)
            .map(Node::mark_removed)
            .unwrap_or(false)
    }

    /// Children of `parent`, ascending by identifier
    pub fn children(&self, parent: &Identifier) -> impl DoubleEndedIterator<Item = &Identifier> {
        self.children.get(parent).into_iter().flatten()
    }

    /// Number of stored nodes, tombstones included (ROOT excluded)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

}
