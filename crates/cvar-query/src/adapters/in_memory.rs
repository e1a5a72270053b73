//! In-memory transport adapter.
//!
//! Implements [`PeerTransport`] by recording every outgoing query instead
//! of putting it on a wire. Used by tests and by hosts that replay traffic.

use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use tracing::debug;

use crate::domain::{Cookie, PeerSlot};
use crate::messages::GetCvarValue;
use crate::ports::PeerTransport;

/// Transport whose connections are toggled by hand and whose sends are kept.
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    /// Slots with a live connection.
    connected: RwLock<HashSet<PeerSlot>>,
    /// Every query sent, in order.
    sent: Mutex<Vec<(PeerSlot, GetCvarValue)>>,
}

impl InMemoryTransport {
    /// Create a transport with no connected slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport with the given slots already connected.
    pub fn with_connected(slots: impl IntoIterator<Item = PeerSlot>) -> Self {
        let transport = Self::new();
        transport.connected.write().extend(slots);
        transport
    }

    /// Mark `slot` as connected.
    pub fn connect(&self, slot: PeerSlot) {
        self.connected.write().insert(slot);
    }

    /// Mark `slot` as disconnected.
    pub fn disconnect(&self, slot: PeerSlot) {
        self.connected.write().remove(&slot);
    }

    /// All queries sent so far.
    pub fn sent(&self) -> Vec<(PeerSlot, GetCvarValue)> {
        self.sent.lock().clone()
    }

    /// Queries sent to `slot`, in order.
    pub fn sent_to(&self, slot: PeerSlot) -> Vec<GetCvarValue> {
        self.sent
            .lock()
            .iter()
            .filter(|(s, _)| *s == slot)
            .map(|(_, q)| q.clone())
            .collect()
    }

    /// Cookie of the most recent query sent to `slot`.
    pub fn last_cookie(&self, slot: PeerSlot) -> Option<Cookie> {
        self.sent
            .lock()
            .iter()
            .rev()
            .find(|(s, _)| *s == slot)
            .map(|(_, q)| q.cookie())
    }
}

impl PeerTransport for InMemoryTransport {
    fn has_active_connection(&self, slot: PeerSlot) -> bool {
        self.connected.read().contains(&slot)
    }

    fn send_query(&self, slot: PeerSlot, query: &GetCvarValue) {
        debug!(
            "[cvar] In-memory send to {}: {} ({})",
            slot,
            query.cvar_name,
            query.cookie()
        );
        self.sent.lock().push((slot, query.clone()));
    }
}
