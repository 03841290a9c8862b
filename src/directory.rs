//! Directory: Replica registry and broadcast network
//!
//! The directory owns every replica and stands in for a lossless network.
//! Each locally generated operation is broadcast to *all* replicas, the
//! originator included. With [`Delivery::Deferred`] operations sit in
//! per-replica inboxes until delivered, in any order the caller chooses.

use crate::config::{Delivery, EngineConfig};
use crate::error::{EngineError, Result};
use crate::replica::{Receipt, Replica};
use crate::tree::{Identifier, Node, Operation};
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, info, warn};

/// All replicas in a session plus the simulated network between them
#[derive(Debug, Clone, Default)]
pub struct Directory {
    config: EngineConfig,
    replicas: BTreeMap<u64, Replica>,
    inboxes: BTreeMap<u64, VecDeque<Operation>>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Register a new replica with clock 0 and an empty store
    pub fn add_client(&mut self, client_id: u64) -> Result<()> {
        if self.replicas.contains_key(&client_id) {
            warn!(client = client_id, "replica already registered");
            return Err(EngineError::ReplicaExists(client_id));
        }
        self.replicas
            .insert(client_id, Replica::with_config(client_id, &self.config));
        self.inboxes.insert(client_id, VecDeque::new());
        info!(client = client_id, "registered replica");
        Ok(())
    }

    /// Registered client ids, ascending
    pub fn clients(&self) -> impl Iterator<Item = u64> + '_ {
        self.replicas.keys().copied()
    }

    pub fn replica(&self, client_id: u64) -> Result<&Replica> {
        self.replicas
            .get(&client_id)
            .ok_or(EngineError::UnknownReplica(client_id))
    }

    fn replica_mut(&mut self, client_id: u64) -> Result<&mut Replica> {
        self.replicas.get_mut(&client_id).ok_or_else(|| {
            warn!(client = client_id, "operation for unknown replica");
            EngineError::UnknownReplica(client_id)
        })
    }

    /// Insert `value` after `parent` (None = start of document) as `client_id`
    ///
    /// Returns the identifier of the new node.
    pub fn on_add(
        &mut self,
        parent: Option<Identifier>,
        value: char,
        client_id: u64,
    ) -> Result<Identifier> {
        let op = self.replica_mut(client_id)?.local_insert(parent, value)?;
        self.broadcast(op)?;
        Ok(op.id())
    }

    /// Insert a whole string as a chain after `parent`
    ///
    /// Returns the identifier of the last character inserted.
    pub fn on_add_str(
        &mut self,
        parent: Option<Identifier>,
        values: &str,
        client_id: u64,
    ) -> Result<Identifier> {
        if values.is_empty() {
            return Err(EngineError::malformed("insert value is empty"));
        }
        let ops = self
            .replica_mut(client_id)?
            .local_insert_sequence(parent, values)?;

        let mut last = Identifier::ROOT;
        for op in ops {
            self.broadcast(op)?;
            last = op.id();
        }
        Ok(last)
    }

    /// Tombstone `node_id` as `client_id`
    pub fn on_remove(&mut self, node_id: Identifier, client_id: u64) -> Result<()> {
        let op = self.replica_mut(client_id)?.local_remove(node_id);
        self.broadcast(op)
    }

    /// Insert `value` at visible position `caret` of `client_id`'s text
    pub fn insert_at(&mut self, client_id: u64, caret: usize, value: char) -> Result<Identifier> {
        let parent = self.replica(client_id)?.parent_for_caret(caret)?;
        self.on_add(Some(parent), value, client_id)
    }

    /// Remove the visible character at `position` of `client_id`'s text
    pub fn delete_at(&mut self, client_id: u64, position: usize) -> Result<Identifier> {
        let target = self.replica(client_id)?.id_at(position)?;
        self.on_remove(target, client_id)?;
        Ok(target)
    }

    /// Fan an operation out to every replica, originator included
    pub fn broadcast(&mut self, op: Operation) -> Result<()> {
        op.validate()?;
        if !self.replicas.contains_key(&op.origin) {
            return Err(EngineError::UnknownReplica(op.origin));
        }

        match self.config.delivery {
            Delivery::Immediate => {
                for replica in self.replicas.values_mut() {
                    replica.receive(op)?;
                }
            }
            Delivery::Deferred => {
                for inbox in self.inboxes.values_mut() {
                    inbox.push_back(op);
                }
            }
        }
        debug!(%op, delivery = ?self.config.delivery, "broadcast operation");
        Ok(())
    }

    /// Apply an operation that arrived from outside this directory to one replica
    ///
    /// Nothing is re-broadcast; the sending side is expected to fan out.
    pub fn receive(&mut self, client_id: u64, op: Operation) -> Result<Receipt> {
        self.replica_mut(client_id)?.receive(op)
    }

    /// Operations queued for `client_id`, oldest first
    pub fn inbox(&self, client_id: u64) -> Result<&VecDeque<Operation>> {
        self.inboxes
            .get(&client_id)
            .ok_or(EngineError::UnknownReplica(client_id))
    }

    /// Deliver the queued operation at `index` of `client_id`'s inbox
    ///
    /// Returns false if there is no such operation.
    pub fn deliver_at(&mut self, client_id: u64, index: usize) -> Result<bool> {
        let op = self
            .inboxes
            .get_mut(&client_id)
            .ok_or(EngineError::UnknownReplica(client_id))?
            .remove(index);
        match op {
            Some(op) => {
                self.replica_mut(client_id)?.receive(op)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drain `client_id`'s inbox in arrival order; returns how many were delivered
    pub fn deliver(&mut self, client_id: u64) -> Result<usize> {
        let mut delivered = 0;
        while self.deliver_at(client_id, 0)? {
            delivered += 1;
        }
        Ok(delivered)
    }

    /// Drain every inbox
    pub fn deliver_all(&mut self) -> Result<usize> {
        let clients: Vec<u64> = self.clients().collect();
        let mut delivered = 0;
        for client_id in clients {
            delivered += self.deliver(client_id)?;
        }
        Ok(delivered)
    }

    /// Merge every replica's state into every other replica
    ///
    /// Repairs replicas regardless of what is still sitting in inboxes.
    pub fn sync_all(&mut self) -> Result<usize> {
        let clients: Vec<u64> = self.clients().collect();
        let mut changed = 0;
        for &source in &clients {
            let snapshot = self.replica(source)?.clone();
            for &target in &clients {
                if source != target {
                    changed += self.replica_mut(target)?.merge(&snapshot)?;
                }
            }
        }
        debug!(changed, "synchronized all replicas");
        Ok(changed)
    }

    /// `client_id`'s nodes in document order, tombstones included
    pub fn nodes(&self, client_id: u64) -> Result<Vec<Node>> {
        Ok(self
            .replica(client_id)?
            .nodes()
            .into_iter()
            .cloned()
            .collect())
    }

    /// JSON node list for `client_id` (the `get-nodes` payload)
    pub fn get_nodes(&self, client_id: u64) -> Result<String> {
        self.replica(client_id)?.to_json()
    }

    pub fn text(&self, client_id: u64) -> Result<String> {
        Ok(self.replica(client_id)?.text())
    }
}
