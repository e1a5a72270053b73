//! # Driving Ports (Inbound API)
//!
//! Two surfaces: the query API other in-process components call, and the
//! event handler the host calls when peers come and go or replies arrive.

use crate::domain::{Cookie, CvarCallback, CvarValueStatus, PeerSlot};
use crate::messages::{HostEvent, RespondCvarValue};

/// Name under which the host publishes [`ClientCvarApi`].
pub const INTERFACE_VERSION: &str = "ClientCvarValue001";

/// Query surface for other server components.
///
/// # Example
///
/// ```rust,ignore
/// use cvar_query::{ClientCvarApi, PeerSlot};
///
/// fn check_cheats<A: ClientCvarApi>(api: &A, slot: PeerSlot) {
///     let sent = api.query_cvar_value(slot, "sv_cheats", Box::new(|reply| {
///         println!("{} = {} ({})", reply.name, reply.value, reply.status);
///     }));
///     if !sent {
///         println!("peer not reachable");
///     }
/// }
/// ```
pub trait ClientCvarApi: Send + Sync {
    /// Ask the peer on `slot` for the value of `cvar_name`.
    ///
    /// Returns `true` if the query was sent. On `false` nothing was stored
    /// and `callback` is dropped without being called.
    ///
    /// The callback runs at most once, when the matching reply arrives. If
    /// the peer disconnects first it is dropped without being called.
    fn query_cvar_value(&self, slot: PeerSlot, cvar_name: &str, callback: CvarCallback) -> bool;

    /// The peer's display language, or `None` if not yet received or the
    /// slot is invalid.
    fn get_client_language(&self, slot: PeerSlot) -> Option<String>;

    /// The peer's operating system, or `None` if not yet received or the
    /// slot is invalid.
    fn get_client_os(&self, slot: PeerSlot) -> Option<String>;
}

/// Host notifications. All calls happen on the host's event thread.
pub trait HostEventHandler: Send + Sync {
    /// A peer connected. `is_synthetic` marks bots, which are not probed.
    fn on_peer_connected(&self, slot: PeerSlot, is_synthetic: bool);

    /// The peer left; all of its state is discarded.
    fn on_peer_disconnected(&self, slot: PeerSlot);

    /// A cvar reply arrived on `slot`.
    fn on_response_received(
        &self,
        slot: PeerSlot,
        cookie: Cookie,
        status: CvarValueStatus,
        name: String,
        value: String,
    );

    /// Deliver a reply still in wire form.
    ///
    /// Probe replies update the cached metadata whatever their status code.
    /// A user reply with an unknown status code retires its query without
    /// invoking the callback.
    fn on_raw_response(&self, slot: PeerSlot, message: RespondCvarValue);

    /// Route one [`HostEvent`] to the matching handler.
    fn handle_event(&self, event: HostEvent) {
        match event {
            HostEvent::Connected { slot, synthetic } => self.on_peer_connected(slot, synthetic),
            HostEvent::Disconnected { slot } => self.on_peer_disconnected(slot),
            HostEvent::Response { slot, message } => self.on_raw_response(slot, message),
        }
    }
}
