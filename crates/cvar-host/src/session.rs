//! # Host Session
//!
//! The [`HostEventHandler`] the pump drives. Keeps the transport's view of
//! live connections in step with the engine, and queries the configured
//! watch list on every real peer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use cvar_query::{
    ClientCvarApi, ClientCvarService, Cookie, CvarReply, CvarValueStatus, HostEventHandler,
    PeerSlot, RespondCvarValue,
};

use crate::adapters::JsonLineTransport;

/// Engine type the host runs.
pub type HostService = ClientCvarService<JsonLineTransport>;

type WatchedValues = Arc<Mutex<HashMap<(PeerSlot, String), CvarReply>>>;

/// Glue between host events, the transport and the engine.
pub struct HostSession {
    service: Arc<HostService>,
    transport: Arc<JsonLineTransport>,
    watch_cvars: Vec<String>,
    watched: WatchedValues,
    watch_replies: Arc<AtomicU64>,
}

impl HostSession {
    /// Create a session over an existing service.
    pub fn new(
        service: Arc<HostService>,
        transport: Arc<JsonLineTransport>,
        watch_cvars: Vec<String>,
    ) -> Self {
        Self {
            service,
            transport,
            watch_cvars,
            watched: Arc::new(Mutex::new(HashMap::new())),
            watch_replies: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The engine.
    pub fn service(&self) -> &Arc<HostService> {
        &self.service
    }

    /// Last reply for a watched cvar on `slot`.
    pub fn watched_value(&self, slot: PeerSlot, cvar_name: &str) -> Option<CvarReply> {
        self.watched
            .lock()
            .get(&(slot, cvar_name.to_string()))
            .cloned()
    }

    /// Replies received for watched cvars.
    pub fn watch_replies(&self) -> u64 {
        self.watch_replies.load(Ordering::Relaxed)
    }

    fn query_watch_list(&self, slot: PeerSlot) {
        for name in &self.watch_cvars {
            let watched = Arc::clone(&self.watched);
            let counter = Arc::clone(&self.watch_replies);
            let requested = name.clone();
            let sent = self.service.query_cvar_value(
                slot,
                name,
                Box::new(move |reply: CvarReply| {
                    counter.fetch_add(1, Ordering::Relaxed);
                    info!(
                        slot = %reply.slot,
                        cvar = %requested,
                        echoed = %reply.name,
                        status = ?reply.status,
                        value = %reply.value,
                        "[cvar] Watched cvar reply"
                    );
                    watched.lock().insert((reply.slot, requested), reply);
                }),
            );
            if !sent {
                debug!(%slot, cvar = %name, "[cvar] Watch query not sent");
            }
        }
    }
}

impl HostEventHandler for HostSession {
    fn on_peer_connected(&self, slot: PeerSlot, is_synthetic: bool) {
        let _span = cvar_telemetry::slot_span!("peer_connected", slot = slot.get()).entered();

        // Bots have no network channel.
        let in_range = slot.index(self.service.capacity()).is_some();
        if !is_synthetic && in_range {
            self.transport.connect(slot);
        }

        self.service.on_peer_connected(slot, is_synthetic);

        if !is_synthetic && in_range {
            self.query_watch_list(slot);
        }
    }

    fn on_peer_disconnected(&self, slot: PeerSlot) {
        let _span = cvar_telemetry::slot_span!("peer_disconnected", slot = slot.get()).entered();

        self.service.on_peer_disconnected(slot);
        self.transport.disconnect(slot);
        self.watched.lock().retain(|(watched_slot, _), _| *watched_slot != slot);
    }

    fn on_response_received(
        &self,
        slot: PeerSlot,
        cookie: Cookie,
        status: CvarValueStatus,
        name: String,
        value: String,
    ) {
        self.service
            .on_response_received(slot, cookie, status, name, value);
    }

    fn on_raw_response(&self, slot: PeerSlot, message: RespondCvarValue) {
        self.service.on_raw_response(slot, message);
    }
}
