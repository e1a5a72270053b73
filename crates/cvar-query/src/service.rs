//! # Client Cvar Service
//!
//! Wires the slot table and cookie allocator to the host transport.
//!
//! ## Architecture
//!
//! This service implements both inbound ports:
//! - [`ClientCvarApi`]: queries and cached metadata for other components
//! - [`HostEventHandler`]: connect, disconnect and reply notifications
//!
//! It depends on one outbound port, [`PeerTransport`].
//!
//! ## Reentrancy
//!
//! The table lock is never held while a callback runs or while the
//! transport is called. A callback may therefore query again, on any slot,
//! through an `Arc` of this service.

use parking_lot::Mutex;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

use crate::config::{ConfigError, CvarQueryConfig};
use crate::domain::{
    Cookie, CookieAllocator, CvarCallback, CvarQueryError, CvarReply, CvarValueStatus,
    MessageError, PeerCvarState, PeerSlot, PeerSlotTable,
};
use crate::messages::{GetCvarValue, RespondCvarValue};
use crate::ports::{ClientCvarApi, HostEventHandler, PeerTransport};

/// Counters for monitoring the correlation engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CvarQueryStats {
    /// User queries handed to the transport.
    pub queries_sent: u64,
    /// Metadata probes handed to the transport.
    pub probes_sent: u64,
    /// Queries refused before sending.
    pub dispatch_rejected: u64,
    /// Replies that found their pending callback.
    pub responses_matched: u64,
    /// Replies whose cookie was not pending.
    pub unknown_cookies: u64,
    /// Replies with a status code outside the known set.
    pub malformed_replies: u64,
    /// Callbacks that panicked.
    pub callback_failures: u64,
}

/// Cvar query correlation service.
///
/// One instance serves every peer slot of the process.
pub struct ClientCvarService<T: PeerTransport + ?Sized> {
    /// Service configuration.
    config: CvarQueryConfig,
    /// Per-slot pending queries and cached metadata.
    slots: Mutex<PeerSlotTable>,
    /// Source of user query cookies.
    cookies: Arc<CookieAllocator>,
    /// Host transport.
    transport: Arc<T>,
    /// Engine counters.
    stats: Mutex<CvarQueryStats>,
}

impl<T: PeerTransport + ?Sized> ClientCvarService<T> {
    /// Create a service using the process-wide cookie allocator.
    pub fn new(config: CvarQueryConfig, transport: Arc<T>) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            "[cvar] Query service ready: {} slots, probes {}/{}",
            config.max_slots, config.language_cvar, config.os_cvar
        );
        Ok(Self {
            slots: Mutex::new(PeerSlotTable::new(config.max_slots)),
            config,
            cookies: CookieAllocator::global(),
            transport,
            stats: Mutex::new(CvarQueryStats::default()),
        })
    }

    /// Use `cookies` instead of the process-wide allocator.
    pub fn with_allocator(mut self, cookies: Arc<CookieAllocator>) -> Self {
        self.cookies = cookies;
        self
    }

    /// Service configuration.
    pub fn config(&self) -> &CvarQueryConfig {
        &self.config
    }

    /// Number of slots in the table.
    pub fn capacity(&self) -> usize {
        self.config.max_slots
    }

    /// Snapshot of the engine counters.
    pub fn stats(&self) -> CvarQueryStats {
        self.stats.lock().clone()
    }

    /// Outstanding queries on `slot` (0 for an invalid slot).
    pub fn pending_query_count(&self, slot: PeerSlot) -> usize {
        self.slots
            .lock()
            .get(slot)
            .map_or(0, PeerCvarState::pending_count)
    }

    /// Whether `cookie` is still awaiting a reply on `slot`.
    pub fn is_pending(&self, slot: PeerSlot, cookie: Cookie) -> bool {
        self.slots
            .lock()
            .get(slot)
            .is_some_and(|state| state.is_pending(cookie))
    }

    /// Run `f` against the slot table under its lock.
    ///
    /// `f` must not call back into this service.
    pub fn inspect<R>(&self, f: impl FnOnce(&PeerSlotTable) -> R) -> R {
        f(&self.slots.lock())
    }

    /// Send a query and report the cookie or the reason it was refused.
    ///
    /// On error nothing is stored, nothing is sent and `callback` is dropped.
    pub fn try_query_cvar_value(
        &self,
        slot: PeerSlot,
        cvar_name: &str,
        callback: CvarCallback,
    ) -> Result<Cookie, CvarQueryError> {
        if let Err(e) = self.check_dispatch(slot, cvar_name) {
            self.stats.lock().dispatch_rejected += 1;
            debug!(%slot, cvar = cvar_name, "[cvar] Query rejected: {}", e);
            return Err(e);
        }

        let cookie = self.cookies.next();
        if let Some(state) = self.slots.lock().get_mut(slot) {
            state.insert_pending(cookie, callback);
        }

        self.transport
            .send_query(slot, &GetCvarValue::new(cookie, cvar_name));
        self.stats.lock().queries_sent += 1;

        debug!(%slot, %cookie, cvar = cvar_name, "[cvar] Query sent");
        Ok(cookie)
    }

    fn check_dispatch(&self, slot: PeerSlot, cvar_name: &str) -> Result<(), CvarQueryError> {
        if cvar_name.is_empty() {
            return Err(CvarQueryError::EmptyCvarName);
        }
        if slot.index(self.capacity()).is_none() {
            return Err(CvarQueryError::SlotOutOfRange(slot));
        }
        if !self.transport.has_active_connection(slot) {
            return Err(CvarQueryError::NoActiveConnection(slot));
        }
        Ok(())
    }

    /// Send a metadata probe under a sentinel cookie. No callback is kept;
    /// the reply is routed to the cached fields.
    fn send_probe(&self, slot: PeerSlot, cvar_name: &str, cookie: Cookie) -> bool {
        if let Err(e) = self.check_dispatch(slot, cvar_name) {
            debug!(%slot, %cookie, "[cvar] Probe skipped: {}", e);
            return false;
        }

        self.transport
            .send_query(slot, &GetCvarValue::new(cookie, cvar_name));
        self.stats.lock().probes_sent += 1;
        true
    }

    /// Route a sentinel reply into the cached metadata.
    fn store_probe_reply(&self, slot: PeerSlot, cookie: Cookie, value: String) {
        let mut slots = self.slots.lock();
        let Some(state) = slots.get_mut(slot) else {
            return;
        };
        if cookie == Cookie::LANGUAGE {
            state.set_language(value);
        } else if cookie == Cookie::OPERATING_SYSTEM {
            state.set_operating_system(value);
        }
    }

    /// A user reply with an undecodable status: the query is over, but the
    /// callback never sees it.
    fn retire_malformed(&self, slot: PeerSlot, cookie: Cookie, error: &MessageError) {
        self.stats.lock().malformed_replies += 1;

        let dropped = self
            .slots
            .lock()
            .get_mut(slot)
            .and_then(|state| state.take_pending(cookie));

        if dropped.is_some() {
            warn!(%slot, %cookie, "[cvar] Retiring query after malformed reply: {}", error);
        } else {
            warn!(%slot, %cookie, "[cvar] Dropping malformed reply: {}", error);
        }
        drop(dropped);
    }

    fn invoke_callback(&self, callback: CvarCallback, reply: CvarReply) {
        let slot = reply.slot;
        let name = reply.name.clone();

        if let Err(payload) = catch_unwind(AssertUnwindSafe(move || callback(reply))) {
            self.stats.lock().callback_failures += 1;
            error!(
                %slot,
                cvar = %name,
                "[cvar] Query callback panicked: {}",
                panic_message(payload.as_ref())
            );
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

impl<T: PeerTransport + ?Sized> ClientCvarApi for ClientCvarService<T> {
    fn query_cvar_value(&self, slot: PeerSlot, cvar_name: &str, callback: CvarCallback) -> bool {
        self.try_query_cvar_value(slot, cvar_name, callback).is_ok()
    }

    fn get_client_language(&self, slot: PeerSlot) -> Option<String> {
        self.slots
            .lock()
            .get(slot)
            .and_then(PeerCvarState::language)
            .map(str::to_owned)
    }

    fn get_client_os(&self, slot: PeerSlot) -> Option<String> {
        self.slots
            .lock()
            .get(slot)
            .and_then(PeerCvarState::operating_system)
            .map(str::to_owned)
    }
}

impl<T: PeerTransport + ?Sized> HostEventHandler for ClientCvarService<T> {
    fn on_peer_connected(&self, slot: PeerSlot, is_synthetic: bool) {
        if is_synthetic {
            trace!(%slot, "[cvar] Synthetic peer connected, not probing");
            return;
        }

        self.send_probe(slot, &self.config.language_cvar, Cookie::LANGUAGE);
        self.send_probe(slot, &self.config.os_cvar, Cookie::OPERATING_SYSTEM);
    }

    fn on_peer_disconnected(&self, slot: PeerSlot) {
        let dropped = self.slots.lock().get_mut(slot).map(PeerCvarState::reset);

        // Callbacks are destroyed outside the lock: their captures may own
        // handles back into this service.
        if let Some(dropped) = dropped {
            if !dropped.is_empty() {
                debug!(%slot, count = dropped.len(), "[cvar] Discarding pending queries");
            }
            drop(dropped);
        }
    }

    fn on_response_received(
        &self,
        slot: PeerSlot,
        cookie: Cookie,
        status: CvarValueStatus,
        name: String,
        value: String,
    ) {
        if slot.index(self.capacity()).is_none() {
            debug!(%slot, %cookie, "[cvar] Reply for slot outside table ignored");
            return;
        }

        if cookie.is_sentinel() {
            self.store_probe_reply(slot, cookie, value);
            return;
        }

        let callback = self
            .slots
            .lock()
            .get_mut(slot)
            .and_then(|state| state.take_pending(cookie));

        match callback {
            Some(callback) => {
                self.stats.lock().responses_matched += 1;
                trace!(%slot, %cookie, %status, "[cvar] Reply matched");
                self.invoke_callback(
                    callback,
                    CvarReply {
                        slot,
                        status,
                        name,
                        value,
                    },
                );
            }
            None => {
                self.stats.lock().unknown_cookies += 1;
                trace!(%slot, %cookie, "[cvar] Reply with unknown cookie discarded");
            }
        }
    }

    fn on_raw_response(&self, slot: PeerSlot, message: RespondCvarValue) {
        let cookie = message.cookie();

        // Probe replies fill the cache whatever their status.
        if cookie.is_sentinel() {
            if slot.index(self.capacity()).is_some() {
                self.store_probe_reply(slot, cookie, message.value);
            }
            return;
        }

        match message.status() {
            Ok(status) => {
                self.on_response_received(slot, cookie, status, message.name, message.value)
            }
            Err(e) => self.retire_malformed(slot, cookie, &e),
        }
    }
}
