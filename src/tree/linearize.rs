//! Linearization: Deterministic document order from the causal tree
//!
//! Depth-first pre-order walk from ROOT, visiting siblings in descending
//! identifier order. Tombstones are walked through so text anchored under a
//! removed character keeps its place.
//!
//! ```text
//! ROOT
//!  └─ a(1@1)
//!      ├─ y(2@2)      visited first: 2@2 > 2@1
//!      └─ x(2@1)
//!
//! order: a y x
//! ```

use super::id::Identifier;
use super::node::Node;
use super::store::NodeStore;

/// Every node in document order, tombstones included
///
/// Iterative so that long typing chains (each character the child of the
/// previous one) do not grow the call stack.
pub fn linearize(store: &NodeStore) -> Vec<&Node> {
    let mut out = Vec::with_capacity(store.len());
    let mut stack: Vec<&Identifier> = store.children(&Identifier::ROOT).collect();

    // Ascending push means the largest sibling is popped first.
    while let Some(id) = stack.pop() {
        if let Some(node) = store.get(id) {
            out.push(node);
            stack.extend(store.children(id));
        }
    }

    out
}

/// Only the nodes that occupy a text position
pub fn visible(store: &NodeStore) -> Vec<&Node> {
    linearize(store)
        .into_iter()
        .filter(|node| node.is_visible())
        .collect()
}

/// Concatenation of all visible values
pub fn text(store: &NodeStore) -> String {
    linearize(store)
        .into_iter()
        .filter(|node| node.is_visible())
        .map(|node| node.value)
        .collect()
}
