//! Error types for the causal tree engine
//!
//! Every failure is scoped to a single operation. A rejected call leaves the
//! replica exactly as it was before the call.

use thiserror::Error;

/// Errors surfaced at the engine boundary
#[derive(Debug, Error)]
pub enum EngineError {
    /// An operation referenced a client id that was never registered
    #[error("unknown replica: {0}")]
    UnknownReplica(u64),

    /// `add_client` was called for an id that already exists
    #[error("replica {0} is already registered")]
    ReplicaExists(u64),

    /// An operation is missing required fields or carries invalid ones
    #[error("malformed operation: {0}")]
    MalformedOperation(String),

    /// A caret position does not map onto the visible text
    #[error("position {position} out of bounds (length: {length})")]
    PositionOutOfBounds { position: usize, length: usize },

    /// The Lamport clock cannot issue another identifier
    #[error("clock exhausted at timestamp {0}")]
    ClockExhausted(u64),

    /// JSON encoding or decoding failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        EngineError::MalformedOperation(reason.into())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, EngineError>;
