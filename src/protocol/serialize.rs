// Serialization layer - Convert engine types to/from JSON
//!
//! Identifiers travel as `{"Timestamp": n, "EntityID": n}`. Inbound payloads
//! are decoded into loose message structs first so that a missing field is
//! reported as a malformed operation instead of a bare JSON error.

use crate::error::{EngineError, Result};
use crate::tree::{Identifier, Node, Operation};
use serde::{Deserialize, Serialize};

/// Encode nodes (already in document order) as a JSON array
pub fn encode_nodes(nodes: &[&Node]) -> Result<String> {
    Ok(serde_json::to_string(nodes)?)
}

#[derive(Debug, Deserialize)]
struct IdentifierMessage {
    #[serde(rename = "Timestamp")]
    timestamp: Option<u64>,
    #[serde(rename = "EntityID")]
    entity_id: Option<u64>,
}

impl TryFrom<IdentifierMessage> for Identifier {
    type Error = EngineError;

    fn try_from(msg: IdentifierMessage) -> Result<Self> {
        let timestamp = msg
            .timestamp
            .ok_or_else(|| EngineError::malformed("identifier missing Timestamp"))?;
        let entity_id = msg
            .entity_id
            .ok_or_else(|| EngineError::malformed("identifier missing EntityID"))?;
        Ok(Identifier::new(timestamp, entity_id).normalized())
    }
}

/// Decode a single identifier
pub fn decode_identifier(json: &str) -> Result<Identifier> {
    let msg: IdentifierMessage = serde_json::from_str(json)?;
    msg.try_into()
}

/// Decode an optional parent; empty input, `null` and timestamp 0 mean ROOT
pub fn decode_parent(json: &str) -> Result<Option<Identifier>> {
    let trimmed = json.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let msg: Option<IdentifierMessage> = serde_json::from_str(trimmed)?;
    match msg {
        None => Ok(None),
        Some(msg) => {
            let id = Identifier::try_from(msg)?;
            Ok((!id.is_root()).then_some(id))
        }
    }
}

/// Loose wire form of an [`Operation`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationMessage {
    pub kind: Option<String>,
    pub origin: Option<u64>,
    pub id: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl From<&Operation> for OperationMessage {
    fn from(op: &Operation) -> Self {
        use crate::tree::OpKind;

        match op.kind {
            OpKind::Insert {
                id,
                parent_id,
                value,
            } => Self {
                kind: Some("insert".to_string()),
                origin: Some(op.origin),
                id: Some(id),
                parent_id: Some(parent_id),
                value: Some(value.to_string()),
            },
            OpKind::Remove { id } => Self {
                kind: Some("remove".to_string()),
                origin: Some(op.origin),
                id: Some(id),
                parent_id: None,
                value: None,
            },
        }
    }
}

impl TryFrom<OperationMessage> for Operation {
    type Error = EngineError;

    fn try_from(msg: OperationMessage) -> Result<Self> {
        let origin = msg
            .origin
            .ok_or_else(|| EngineError::malformed("operation missing origin"))?;
        let id = msg
            .id
            .ok_or_else(|| EngineError::malformed("operation missing id"))?;

        let op = match msg.kind.as_deref() {
            Some("insert") => {
                let parent_id = msg
                    .parent_id
                    .ok_or_else(|| EngineError::malformed("insert missing parent_id"))?;
                let value = msg
                    .value
                    .as_deref()
                    .ok_or_else(|| EngineError::malformed("insert missing value"))
                    .and_then(single_char)?;
                Operation::insert(origin, id, parent_id, value)
            }
            Some("remove") => Operation::remove(origin, id),
            Some(other) => {
                return Err(EngineError::malformed(format!(
                    "unknown operation kind: {}",
                    other
                )))
            }
            None => return Err(EngineError::malformed("operation missing kind")),
        };

        op.validate()?;
        Ok(op)
    }
}

/// A node value must be exactly one character
pub fn single_char(value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(EngineError::malformed(format!(
            "value must be a single character, got {:?}",
            value
        ))),
    }
}

/// Encode an operation for a transport outside this process
pub fn encode_operation(op: &Operation) -> Result<String> {
    Ok(serde_json::to_string(&OperationMessage::from(op))?)
}

/// Decode an operation received from another engine; rejects incomplete
/// or impossible operations
pub fn decode_operation(json: &str) -> Result<Operation> {
    let msg: OperationMessage = serde_json::from_str(json)?;
    msg.try_into()
}
