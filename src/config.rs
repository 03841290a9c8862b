//! Engine configuration

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// How broadcast operations reach replicas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// Every replica receives the operation during the broadcast call
    #[default]
    Immediate,

    /// Operations wait in a per-replica inbox until explicitly delivered
    Deferred,
}

/// Runtime options for a [`Directory`](crate::Directory)
///
/// Missing JSON fields fall back to their defaults.
///
/// ```rust
/// use causal_tree_core::{Delivery, EngineConfig};
///
/// let config = EngineConfig::from_json(r#"{"delivery":"deferred"}"#).unwrap();
/// assert_eq!(config.delivery, Delivery::Deferred);
/// assert!(config.lamport_sync);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub delivery: Delivery,

    /// Advance the local clock past every remote timestamp observed
    pub lamport_sync: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            delivery: Delivery::Immediate,
            lamport_sync: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn deferred() -> Self {
        Self {
            delivery: Delivery::Deferred,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.delivery, Delivery::Immediate);
        assert!(config.lamport_sync);
        assert_eq!(EngineConfig::from_json("{}").unwrap(), config);
    }

    #[test]
    fn test_from_json() {
        let config =
            EngineConfig::from_json(r#"{"delivery":"deferred","lamport_sync":false}"#).unwrap();
        assert_eq!(config.delivery, Delivery::Deferred);
        assert!(!config.lamport_sync);
    }

    #[test]
    fn test_invalid_json() {
        assert!(EngineConfig::from_json(r#"{"delivery":"sometimes"}"#).is_err());
    }
}
