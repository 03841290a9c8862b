//! Operations exchanged between replicas
//!
//! Operations are immutable facts. Delivering the same one twice is harmless.

use super::id::Identifier;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// What an operation does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpKind {
    /// Attach a new node under `parent_id`
    Insert {
        id: Identifier,
        parent_id: Identifier,
        value: char,
    },

    /// Tombstone the node named `id`
    Remove { id: Identifier },
}

/// An operation tagged with the replica that generated it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Replica that generated the operation
    pub origin: u64,

    #[serde(flatten)]
    pub kind: OpKind,
}

impl Operation {
    pub fn insert(origin: u64, id: Identifier, parent_id: Identifier, value: char) -> Self {
        Self {
            origin,
            kind: OpKind::Insert {
                id,
                parent_id: parent_id.normalized(),
                value,
            },
        }
    }

    pub fn remove(origin: u64, id: Identifier) -> Self {
        Self {
            origin,
            kind: OpKind::Remove { id },
        }
    }

    /// Same operation with any timestamp-0 parent folded into ROOT
    pub fn normalized(self) -> Self {
        match self.kind {
            OpKind::Insert {
                id,
                parent_id,
                value,
            } => Self::insert(self.origin, id, parent_id, value),
            OpKind::Remove { .. } => self,
        }
    }

    /// The node this operation creates or targets
    pub fn id(&self) -> Identifier {
        match self.kind {
            OpKind::Insert { id, .. } | OpKind::Remove { id } => id,
        }
    }

    /// The node that must already be present before this operation applies
    ///
    /// `None` means the operation is always ready (an Insert under ROOT).
    pub fn dependency(&self) -> Option<Identifier> {
        match self.kind {
            OpKind::Insert { parent_id, .. } if parent_id.is_root() => None,
            OpKind::Insert { parent_id, .. } => Some(parent_id),
            OpKind::Remove { id } => Some(id),
        }
    }

    /// Reject operations that can never be applied
    pub fn validate(&self) -> Result<()> {
        match self.kind {
            OpKind::Insert { id, parent_id, .. } => {
                if id.is_root() {
                    return Err(EngineError::malformed("insert cannot create ROOT"));
                }
                if id == parent_id {
                    return Err(EngineError::malformed(format!(
                        "node {} cannot be its own parent",
                        id
                    )));
                }
            }
            OpKind::Remove { id } => {
                if id.is_root() {
                    return Err(EngineError::malformed("ROOT cannot be removed"));
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            OpKind::Insert {
                id,
                parent_id,
                value,
            } => write!(f, "insert {:?} {} under {}", value, id, parent_id),
            OpKind::Remove { id } => write!(f, "remove {}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency() {
        let a = Identifier::new(1, 1);
        let b = Identifier::new(2, 1);

        assert_eq!(Operation::insert(1, a, Identifier::ROOT, 'a').dependency(), None);
        assert_eq!(Operation::insert(1, b, a, 'b').dependency(), Some(a));
        assert_eq!(Operation::remove(2, a).dependency(), Some(a));
    }

    #[test]
    fn test_parent_normalized_to_root() {
        let op = Operation::insert(3, Identifier::new(1, 3), Identifier::new(0, 3), 'x');
        assert_eq!(op.dependency(), None);
        assert!(matches!(
            op.kind,
            OpKind::Insert { parent_id, .. } if parent_id == Identifier::ROOT
        ));
    }

    #[test]
    fn test_deserialized_parent_normalized() {
        let op: Operation = serde_json::from_str(
            r#"{"origin":5,"kind":"insert","id":{"Timestamp":1,"EntityID":5},"parent_id":{"Timestamp":0,"EntityID":5},"value":"a"}"#,
        )
        .unwrap();
        assert_eq!(op.dependency(), None);
        assert_eq!(
            op.normalized(),
            Operation::insert(5, Identifier::new(1, 5), Identifier::ROOT, 'a')
        );
    }

    #[test]
    fn test_validate_rejects_impossible_ops() {
        let a = Identifier::new(1, 1);

        assert!(Operation::insert(1, a, Identifier::ROOT, 'a').validate().is_ok());
        assert!(Operation::insert(1, Identifier::ROOT, a, 'a').validate().is_err());
        assert!(Operation::insert(1, a, a, 'a').validate().is_err());
        assert!(Operation::remove(1, Identifier::ROOT).validate().is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let op = Operation::remove(2, Identifier::new(5, 1));
        let json = serde_json::to_value(op).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "origin": 2,
                "kind": "remove",
                "id": {"Timestamp": 5, "EntityID": 1}
            })
        );
    }
}
