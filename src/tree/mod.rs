//! Causal tree: the replicated sequence at the heart of the engine
//!
//! Every character is a [`Node`] attached under the node it was typed after.
//! Replicas exchange [`Operation`]s; the [`CausalBuffer`] holds any that
//! arrive before their dependency, and [`linearize`] turns the tree into a
//! single document order that every replica agrees on.
//!
//! # Components
//!
//! - **Identifier / LamportClock:** unique, totally ordered node names
//! - **NodeStore:** all nodes ever seen, tombstones included
//! - **CausalBuffer:** operations waiting on an unseen parent or target
//! - **Linearizer:** pre-order walk, siblings by descending identifier
//!
//! # References
//!
//! - "Causal Trees" by Victor Grishchenko
//! - "A comprehensive study of CRDTs" by Marc Shapiro et al. (RGA)

mod buffer;
mod clock;
mod id;
mod linearize;
mod node;
mod op;
mod store;

pub use buffer::CausalBuffer;
pub use clock::LamportClock;
pub use id::Identifier;
pub use linearize::{linearize, text, visible};
pub use node::Node;
pub use op::{OpKind, Operation};
pub use store::{NodeStore, PutOutcome};
