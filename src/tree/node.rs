//! Node: A single character fact in the causal tree
//!
//! Nodes only know their parent. Child lists are a derived index kept by the
//! [`NodeStore`](super::store::NodeStore), never part of the fact itself.

use super::id::Identifier;
use serde::{Deserialize, Serialize};

/// A single node in the causal tree
///
/// Immutable once created except for `removed`, which only ever goes from
/// false to true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: Identifier,

    /// Node this one was inserted after (ROOT for start of document)
    pub parent_id: Identifier,

    /// Whether this node has been removed (tombstone)
    pub removed: bool,

    /// The character carried by this node
    pub value: char,
}

impl Node {
    /// Create a new, visible node
    pub fn new(id: Identifier, parent_id: Identifier, value: char) -> Self {
        Self {
            id,
            parent_id,
            removed: false,
            value,
        }
    }

    /// Mark this node as removed; returns true if the flag changed
    pub fn mark_removed(&mut self) -> bool {
        !std::mem::replace(&mut self.removed, true)
    }

    pub fn is_visible(&self) -> bool {
        !self.removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let id = Identifier::new(1, 1);
        let node = Node::new(id, Identifier::ROOT, 'a');

        assert_eq!(node.id, id);
        assert_eq!(node.parent_id, Identifier::ROOT);
        assert_eq!(node.value, 'a');
        assert!(node.is_visible());
    }

    #[test]
    fn test_mark_removed_is_monotonic() {
        let mut node = Node::new(Identifier::new(1, 1), Identifier::ROOT, 'a');

        assert!(node.mark_removed());
        assert!(!node.mark_removed());
        assert!(node.removed);
    }

    #[test]
    fn test_node_json_shape() {
        let node = Node::new(Identifier::new(2, 1), Identifier::new(1, 1), 'b');
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": {"Timestamp": 2, "EntityID": 1},
                "parent_id": {"Timestamp": 1, "EntityID": 1},
                "removed": false,
                "value": "b"
            })
        );
    }
}
