//! # Driven Ports (Outbound SPI)
//!
//! What the engine needs from the host: connection lookup and a way to put
//! a query on the wire.

use crate::domain::PeerSlot;
use crate::messages::GetCvarValue;

/// Host transport for cvar queries.
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct NetChannelTransport { engine: EngineHandle }
///
/// impl PeerTransport for NetChannelTransport {
///     fn has_active_connection(&self, slot: PeerSlot) -> bool {
///         self.engine.net_channel(slot.get()).is_some()
///     }
///
///     fn send_query(&self, slot: PeerSlot, query: &GetCvarValue) {
///         if let Some(channel) = self.engine.net_channel(slot.get()) {
///             channel.send(query);
///         }
///     }
/// }
/// ```
pub trait PeerTransport: Send + Sync {
    /// Whether `slot` currently has a live connection to send on.
    fn has_active_connection(&self, slot: PeerSlot) -> bool;

    /// Hand `query` to the transport. Fire-and-forget: no delivery
    /// guarantee, no reply on this call.
    fn send_query(&self, slot: PeerSlot, query: &GetCvarValue);
}

impl<T: PeerTransport + ?Sized> PeerTransport for std::sync::Arc<T> {
    fn has_active_connection(&self, slot: PeerSlot) -> bool {
        (**self).has_active_connection(slot)
    }

    fn send_query(&self, slot: PeerSlot, query: &GetCvarValue) {
        (**self).send_query(slot, query)
    }
}
