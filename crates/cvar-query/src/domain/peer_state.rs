//! # Per-Peer Cvar State
//!
//! Pending callbacks and cached metadata for one slot.

use std::collections::HashMap;
use std::fmt;

use super::value_objects::{Cookie, CvarCallback};

/// Everything the engine tracks for one peer slot.
///
/// Created empty for every slot at startup, filled by dispatch and
/// response handling, emptied again on disconnect.
#[derive(Default)]
pub struct PeerCvarState {
    /// Outstanding user queries keyed by cookie.
    pending: HashMap<Cookie, CvarCallback>,
    /// Value of the language probe for the current connection.
    language: Option<String>,
    /// Value of the operating-system probe for the current connection.
    operating_system: Option<String>,
}

impl PeerCvarState {
    /// Register a callback for `cookie`.
    pub fn insert_pending(&mut self, cookie: Cookie, callback: CvarCallback) {
        self.pending.insert(cookie, callback);
    }

    /// Remove and return the callback for `cookie`, if still pending.
    pub fn take_pending(&mut self, cookie: Cookie) -> Option<CvarCallback> {
        self.pending.remove(&cookie)
    }

    /// Whether `cookie` is still awaiting a reply.
    pub fn is_pending(&self, cookie: Cookie) -> bool {
        self.pending.contains_key(&cookie)
    }

    /// Number of outstanding queries.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Cached language, `None` if not received or received empty.
    pub fn language(&self) -> Option<&str> {
        non_empty(&self.language)
    }

    /// Cached operating system, `None` if not received or received empty.
    pub fn operating_system(&self) -> Option<&str> {
        non_empty(&self.operating_system)
    }

    /// Store the language probe reply.
    pub fn set_language(&mut self, value: String) {
        self.language = Some(value);
    }

    /// Store the operating-system probe reply.
    pub fn set_operating_system(&mut self, value: String) {
        self.operating_system = Some(value);
    }

    /// Clear everything. Returns the dropped callbacks so the caller decides
    /// where they are destroyed; none of them is invoked.
    pub fn reset(&mut self) -> HashMap<Cookie, CvarCallback> {
        self.language = None;
        self.operating_system = None;
        std::mem::take(&mut self.pending)
    }

    /// True when nothing is pending or cached.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.language.is_none() && self.operating_system.is_none()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl fmt::Debug for PeerCvarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cookies: Vec<_> = self.pending.keys().copied().collect();
        cookies.sort();
        f.debug_struct("PeerCvarState")
            .field("pending", &cookies)
            .field("language", &self.language)
            .field("operating_system", &self.operating_system)
            .finish()
    }
}
