//! Causal Tree Core - Conflict-free replicated text for collaborative editing
//!
//! This is the Rust engine behind the causal tree playground, compiled to
//! both native and WASM. It implements:
//! - Lamport-stamped, totally ordered node identifiers
//! - A tombstoning node store with a derived children index
//! - A causal buffer for operations that arrive before their dependency
//! - Deterministic linearization (pre-order, newest sibling first)
//! - A replica directory that broadcasts every edit to every replica
//!
//! # Examples
//!
//! ```rust
//! use causal_tree_core::Directory;
//!
//! let mut dir = Directory::new();
//! dir.add_client(1).unwrap();
//! dir.add_client(2).unwrap();
//!
//! let a = dir.on_add(None, 'a', 1).unwrap();
//! dir.on_add(Some(a), 'x', 1).unwrap();
//! dir.on_add(Some(a), 'y', 2).unwrap();
//!
//! // Concurrent inserts after 'a' land in the same order everywhere
//! assert_eq!(dir.text(1).unwrap(), dir.text(2).unwrap());
//! ```

pub mod config;
pub mod directory;
pub mod error;
pub mod protocol;
pub mod replica;
pub mod tree;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use config::{Delivery, EngineConfig};
pub use directory::Directory;
pub use error::{EngineError, Result};
pub use replica::{Receipt, Replica};
pub use tree::{Identifier, Node, Operation};
