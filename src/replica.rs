//! Replica: One independent copy of the document
//!
//! A replica owns its clock, its node store and its causal buffer. Local
//! edits only *generate* operations; they are applied through [`Replica::receive`]
//! like every remote operation, so both paths share one code path.

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::protocol::serialize;
use crate::tree::{
    self, CausalBuffer, Identifier, LamportClock, Node, NodeStore, OpKind, Operation, PutOutcome,
};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// What [`Replica::receive`] did with an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receipt {
    /// Applied, together with `released` buffered operations it unblocked
    Applied { released: usize },

    /// Already reflected in the store; nothing changed
    Duplicate,

    /// Parked until its parent or target arrives
    Buffered,
}

/// A single replica of the causal tree
#[derive(Debug, Clone)]
pub struct Replica {
    id: u64,
    clock: LamportClock,
    store: NodeStore,
    buffer: CausalBuffer,
    lamport_sync: bool,
}

impl Replica {
    /// Create an empty replica (only ROOT exists) with clock 0
    pub fn new(id: u64) -> Self {
        Self::with_config(id, &EngineConfig::default())
    }

    pub fn with_config(id: u64, config: &EngineConfig) -> Self {
        Self {
            id,
            clock: LamportClock::new(),
            store: NodeStore::new(),
            buffer: CausalBuffer::new(),
            lamport_sync: config.lamport_sync,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current Lamport clock value
    pub fn clock(&self) -> u64 {
        self.clock.value()
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// Number of operations waiting on a missing dependency
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Issue a fresh identifier, strictly greater than any issued before
    pub fn next_id(&mut self) -> Result<Identifier> {
        self.clock.next_id(self.id)
    }

    /// Generate (but do not apply) an Insert after `parent` (None = ROOT)
    pub fn local_insert(&mut self, parent: Option<Identifier>, value: char) -> Result<Operation> {
        let id = self.next_id()?;
        Ok(Operation::insert(
            self.id,
            id,
            parent.unwrap_or(Identifier::ROOT),
            value,
        ))
    }

    /// Generate a chain of Inserts, each parented on the previous character
    pub fn local_insert_sequence(
        &mut self,
        parent: Option<Identifier>,
        values: &str,
    ) -> Result<Vec<Operation>> {
        let mut parent = parent.unwrap_or(Identifier::ROOT);
        values
            .chars()
            .map(|value| {
                let id = self.next_id()?;
                let op = Operation::insert(self.id, id, parent, value);
                parent = id;
                Ok(op)
            })
            .collect()
    }

    /// Generate (but do not apply) a Remove of `id`
    pub fn local_remove(&self, id: Identifier) -> Operation {
        Operation::remove(self.id, id)
    }

    /// Apply an operation, or buffer it until its dependency is present
    ///
    /// Applying an Insert releases every buffered operation that was waiting
    /// for the new node, transitively.
    pub fn receive(&mut self, op: Operation) -> Result<Receipt> {
        let op = op.normalized();
        op.validate()?;

        if let Some(dependency) = op.dependency() {
            if !self.store.has(&dependency) {
                if self.buffer.hold(dependency, op) {
                    debug!(replica = self.id, %op, missing = %dependency, "buffered operation");
                } else {
                    trace!(replica = self.id, %op, "operation already buffered");
                }
                return Ok(Receipt::Buffered);
            }
        }

        let mut ready = VecDeque::new();
        if !self.apply(op, &mut ready) {
            trace!(replica = self.id, %op, "duplicate operation");
            return Ok(Receipt::Duplicate);
        }

        let mut released = 0;
        while let Some(id) = ready.pop_front() {
            for waiting in self.buffer.release(&id) {
                trace!(replica = self.id, op = %waiting, "released buffered operation");
                self.apply(waiting, &mut ready);
                released += 1;
            }
        }

        debug!(replica = self.id, %op, released, "applied operation");
        Ok(Receipt::Applied { released })
    }

    /// Returns true if the store changed. Newly stored ids go onto `ready`.
    fn apply(&mut self, op: Operation, ready: &mut VecDeque<Identifier>) -> bool {
        match op.kind {
            OpKind::Insert {
                id,
                parent_id,
                value,
            } => match self.store.put(Node::new(id, parent_id, value)) {
                PutOutcome::Inserted => {
                    if self.lamport_sync {
                        self.clock.update(id.timestamp);
                    }
                    ready.push_back(id);
                    true
                }
                PutOutcome::Duplicate => false,
                PutOutcome::MissingParent => {
                    self.buffer.hold(parent_id, op);
                    false
                }
            },
            OpKind::Remove { id } => self.store.mark_removed(&id),
        }
    }

    /// All nodes in document order, tombstones included
    pub fn nodes(&self) -> Vec<&Node> {
        tree::linearize(&self.store)
    }

    /// Nodes that occupy a text position
    pub fn visible_nodes(&self) -> Vec<&Node> {
        tree::visible(&self.store)
    }

    /// The visible text
    pub fn text(&self) -> String {
        tree::text(&self.store)
    }

    /// JSON node list in document order (the `get-nodes` payload)
    pub fn to_json(&self) -> Result<String> {
        serialize::encode_nodes(&self.nodes())
    }

    /// Parent for a new character typed at `caret` (0 = start of document)
    pub fn parent_for_caret(&self, caret: usize) -> Result<Identifier> {
        if caret == 0 {
            return Ok(Identifier::ROOT);
        }
        self.id_at(caret - 1)
    }

    /// Identifier of the visible character at `position`
    pub fn id_at(&self, position: usize) -> Result<Identifier> {
        let visible = self.visible_nodes();
        visible
            .get(position)
            .map(|node| node.id)
            .ok_or(EngineError::PositionOutOfBounds {
                position,
                length: visible.len(),
            })
    }

    /// Pull in everything `other` has seen, tombstones and buffered
    /// operations included
    ///
    /// Returns how many operations changed this replica.
    pub fn merge(&mut self, other: &Replica) -> Result<usize> {
        let mut changed = 0;

        // Document order lists parents before children.
        for node in other.nodes() {
            let insert = Operation::insert(node.id.entity_id, node.id, node.parent_id, node.value);
            if matches!(self.receive(insert)?, Receipt::Applied { .. }) {
                changed += 1;
            }
            if node.removed
                && matches!(
                    self.receive(Operation::remove(other.id, node.id))?,
                    Receipt::Applied { .. }
                )
            {
                changed += 1;
            }
        }

        for op in other.buffer.iter() {
            if matches!(self.receive(*op)?, Receipt::Applied { .. }) {
                changed += 1;
            }
        }

        debug!(replica = self.id, from = other.id, changed, "merged replica state");
        Ok(changed)
    }
}
