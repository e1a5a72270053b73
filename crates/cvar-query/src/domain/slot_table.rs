//! # Peer Slot Table
//!
//! Fixed-capacity array of [`PeerCvarState`], one entry per slot.
//!
//! The table is allocated once and never grows. Every lookup goes through
//! [`PeerSlot::index`], so an out-of-range slot yields `None` instead of
//! touching memory outside the table.

use super::peer_state::PeerCvarState;
use super::value_objects::PeerSlot;

/// Per-slot state for every possible peer.
#[derive(Debug)]
pub struct PeerSlotTable {
    slots: Box<[PeerCvarState]>,
}

impl PeerSlotTable {
    /// Allocate `capacity` empty slots.
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity).map(|_| PeerCvarState::default()).collect();
        Self { slots }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// State for `slot`, if in range.
    pub fn get(&self, slot: PeerSlot) -> Option<&PeerCvarState> {
        slot.index(self.capacity()).map(|i| &self.slots[i])
    }

    /// Mutable state for `slot`, if in range.
    pub fn get_mut(&mut self, slot: PeerSlot) -> Option<&mut PeerCvarState> {
        let capacity = self.capacity();
        slot.index(capacity).map(move |i| &mut self.slots[i])
    }

    /// Total number of pending queries across all slots.
    pub fn total_pending(&self) -> usize {
        self.slots.iter().map(PeerCvarState::pending_count).sum()
    }
}

impl Default for PeerSlotTable {
    fn default() -> Self {
        Self::new(super::value_objects::DEFAULT_MAX_SLOTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Cookie;

    #[test]
    fn test_default_capacity() {
        let table = PeerSlotTable::default();
        assert_eq!(table.capacity(), 64);
        assert!(table.get(PeerSlot::new(63)).is_some());
        assert!(table.get(PeerSlot::new(64)).is_none());
    }

    #[test]
    fn test_negative_slot_rejected() {
        let mut table = PeerSlotTable::new(4);
        assert!(table.get(PeerSlot::new(-3)).is_none());
        assert!(table.get_mut(PeerSlot::new(-3)).is_none());
    }

    #[test]
    fn test_slots_are_independent() {
        let mut table = PeerSlotTable::new(4);
        table
            .get_mut(PeerSlot::new(1))
            .unwrap()
            .insert_pending(Cookie::new(7), Box::new(|_| {}));

        assert_eq!(table.get(PeerSlot::new(1)).unwrap().pending_count(), 1);
        assert_eq!(table.get(PeerSlot::new(2)).unwrap().pending_count(), 0);
        assert_eq!(table.total_pending(), 1);
    }
}
