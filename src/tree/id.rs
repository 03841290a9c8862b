//! Identifier: Unique, totally ordered name for a tree node
//!
//! Each node in the causal tree is named by:
//! - Timestamp: Lamport clock value of the replica that created it
//! - EntityID: Identifies the replica that created it
//!
//! Only the originating replica ever increments its own timestamp, so the pair
//! is unique across all replicas.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Unique identifier for a node in the causal tree
///
/// Ordered by timestamp first, entity id second. Sibling nodes are visited in
/// *descending* identifier order, see [`Identifier::sibling_cmp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    /// Lamport timestamp at creation time
    #[serde(rename = "Timestamp")]
    pub timestamp: u64,

    /// Replica (client) that created the node
    #[serde(rename = "EntityID")]
    pub entity_id: u64,
}

impl Identifier {
    /// The well-known parent of every top-level node ("start of document")
    pub const ROOT: Identifier = Identifier {
        timestamp: 0,
        entity_id: 0,
    };

    /// Create a new identifier
    pub fn new(timestamp: u64, entity_id: u64) -> Self {
        Self {
            timestamp,
            entity_id,
        }
    }

    /// Timestamp 0 is never issued by a clock, so it always denotes ROOT
    pub fn is_root(&self) -> bool {
        self.timestamp == 0
    }

    /// Collapse any timestamp-0 identifier onto the shared ROOT sentinel
    pub fn normalized(self) -> Self {
        if self.is_root() {
            Self::ROOT
        } else {
            self
        }
    }

    /// Sibling order: larger identifiers come first
    pub fn sibling_cmp(&self, other: &Self) -> Ordering {
        other.cmp(self)
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.timestamp.cmp(&other.timestamp) {
            Ordering::Equal => self.entity_id.cmp(&other.entity_id),
            other => other,
        }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.timestamp, self.entity_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_ordering() {
        let id1 = Identifier::new(10, 1);
        let id2 = Identifier::new(20, 1);
        let id3 = Identifier::new(15, 2);

        // Same replica: ordered by timestamp
        assert!(id1 < id2);

        // Different replicas: timestamp takes precedence
        assert!(id1 < id3);
        assert!(id3 < id2);
    }

    #[test]
    fn test_tie_broken_by_entity() {
        let id1 = Identifier::new(10, 1);
        let id2 = Identifier::new(10, 2);

        assert!(id1 < id2);
        assert_eq!(id1.sibling_cmp(&id2), Ordering::Greater);
    }

    #[test]
    fn test_sibling_order_is_descending() {
        let mut ids = vec![
            Identifier::new(1, 1),
            Identifier::new(3, 1),
            Identifier::new(2, 9),
        ];
        ids.sort_by(Identifier::sibling_cmp);
        assert_eq!(
            ids,
            vec![
                Identifier::new(3, 1),
                Identifier::new(2, 9),
                Identifier::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_root_normalization() {
        assert!(Identifier::ROOT.is_root());
        assert_eq!(Identifier::new(0, 5).normalized(), Identifier::ROOT);
        assert_eq!(Identifier::new(3, 5).normalized(), Identifier::new(3, 5));
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_string(&Identifier::new(42, 7)).unwrap();
        assert_eq!(json, r#"{"Timestamp":42,"EntityID":7}"#);

        let back: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Identifier::new(42, 7));
    }
}
