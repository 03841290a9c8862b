//! Lamport clock issuing per-replica identifiers

use super::id::Identifier;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Lamport timestamp for causality tracking
///
/// Each replica owns one clock and ticks it for every node it creates.
/// Observing a remote identifier may move the clock forward, never back.
///
/// # Example
///
/// ```rust
/// use causal_tree_core::tree::LamportClock;
///
/// let mut clock = LamportClock::new();
/// assert_eq!(clock.value(), 0);
///
/// assert_eq!(clock.tick().unwrap(), 1);
///
/// clock.update(5);
/// assert_eq!(clock.tick().unwrap(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LamportClock {
    value: u64,
}

impl LamportClock {
    /// Create a new Lamport clock starting at 0
    pub fn new() -> Self {
        Self { value: 0 }
    }

    /// Get the current clock value
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Increment clock and return new value (for local operations)
    ///
    /// Fails without moving the clock once `u64::MAX` has been reached.
    pub fn tick(&mut self) -> Result<u64> {
        self.value = self
            .value
            .checked_add(1)
            .ok_or(EngineError::ClockExhausted(self.value))?;
        Ok(self.value)
    }

    /// Sets clock to max(local, remote)
    pub fn update(&mut self, remote: u64) {
        self.value = self.value.max(remote);
    }

    /// Tick and pair the new value with `entity_id`
    pub fn next_id(&mut self, entity_id: u64) -> Result<Identifier> {
        Ok(Identifier::new(self.tick()?, entity_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_strictly_increasing() {
        let mut clock = LamportClock::new();
        let a = clock.next_id(3).unwrap();
        let b = clock.next_id(3).unwrap();

        assert_eq!(a, Identifier::new(1, 3));
        assert!(b > a);
    }

    #[test]
    fn test_update_never_decreases() {
        let mut clock = LamportClock::new();
        clock.update(10);
        clock.update(4);
        assert_eq!(clock.value(), 10);
        assert_eq!(clock.next_id(1).unwrap(), Identifier::new(11, 1));
    }

    #[test]
    fn test_tick_at_max_fails_and_holds() {
        let mut clock = LamportClock::new();
        clock.update(u64::MAX);

        assert!(matches!(
            clock.tick(),
            Err(EngineError::ClockExhausted(u64::MAX))
        ));
        assert!(clock.next_id(1).is_err());
        assert_eq!(clock.value(), u64::MAX);
    }
}
