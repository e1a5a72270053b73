//! # Domain Invariants
//!
//! Checks over the slot table that must hold between events.

use super::slot_table::PeerSlotTable;
use super::value_objects::{Cookie, PeerSlot};

/// Invariant: a cookie is pending in at most one slot.
pub fn invariant_cookie_in_one_slot(table: &PeerSlotTable, cookie: Cookie) -> bool {
    let holders = (0..table.capacity())
        .filter_map(|i| i32::try_from(i).ok())
        .filter_map(|i| table.get(PeerSlot::new(i)))
        .filter(|state| state.is_pending(cookie))
        .count();
    holders <= 1
}

/// Invariant: sentinel cookies are never pending as user queries.
pub fn invariant_no_pending_sentinels(table: &PeerSlotTable) -> bool {
    (0..table.capacity())
        .filter_map(|i| i32::try_from(i).ok())
        .filter_map(|i| table.get(PeerSlot::new(i)))
        .all(|state| {
            !state.is_pending(Cookie::LANGUAGE) && !state.is_pending(Cookie::OPERATING_SYSTEM)
        })
}

/// Invariant: a slot that has just been disconnected holds nothing.
pub fn invariant_disconnected_slot_empty(table: &PeerSlotTable, slot: PeerSlot) -> bool {
    table.get(slot).map_or(true, |state| state.is_empty())
}
