//! CausalBuffer: Holds operations whose dependency has not arrived yet
//!
//! Operations are indexed by the single identifier they wait for. When that
//! node lands in the store, every operation waiting on it is released in the
//! order it was received.

use super::id::Identifier;
use super::op::Operation;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct CausalBuffer {
    /// missing dependency -> operations waiting for it, in receipt order
    waiting: HashMap<Identifier, Vec<Operation>>,
    len: usize,
}

impl CausalBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `op` until `dependency` is stored
    ///
    /// Returns false if the same operation is already parked.
    pub fn hold(&mut self, dependency: Identifier, op: Operation) -> bool {
        let queue = self.waiting.entry(dependency).or_default();
        if queue.contains(&op) {
            return false;
        }
        queue.push(op);
        self.len += 1;
        true
    }

    /// Take every operation that was waiting for `id`
    pub fn release(&mut self, id: &Identifier) -> Vec<Operation> {
        let released = self.waiting.remove(id).unwrap_or_default();
        self.len -= released.len();
        released
    }

    /// Every parked operation, grouped by dependency
    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.waiting.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_and_release_in_receipt_order() {
        let a = Identifier::new(1, 1);
        let mut buffer = CausalBuffer::new();

        let first = Operation::insert(2, Identifier::new(2, 2), a, 'x');
        let second = Operation::remove(3, a);
        assert!(buffer.hold(a, first));
        assert!(buffer.hold(a, second));
        assert_eq!(buffer.len(), 2);

        assert_eq!(buffer.release(&a), vec![first, second]);
        assert!(buffer.is_empty());
        assert!(buffer.release(&a).is_empty());
    }

    #[test]
    fn test_duplicate_hold_ignored() {
        let a = Identifier::new(1, 1);
        let mut buffer = CausalBuffer::new();
        let op = Operation::remove(1, a);

        assert!(buffer.hold(a, op));
        assert!(!buffer.hold(a, op));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_release_unknown_is_empty() {
        let mut buffer = CausalBuffer::new();
        assert!(buffer.release(&Identifier::new(4, 4)).is_empty());
        assert_eq!(buffer.iter().count(), 0);
    }
}
