//! # Message Shapes
//!
//! The outgoing query, the inbound reply, and the host events that drive
//! the engine. Encoding is the transport's concern; these types only fix
//! the field names and codes.

use serde::{Deserialize, Serialize};

use crate::domain::{Cookie, CvarValueStatus, MessageError, PeerSlot};

/// Server → client: "tell me the value of `cvar_name`".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetCvarValue {
    /// Correlation cookie echoed back in the reply.
    pub cookie: i32,
    /// Name of the cvar to read.
    pub cvar_name: String,
}

impl GetCvarValue {
    /// Build a query for `cvar_name` under `cookie`.
    pub fn new(cookie: Cookie, cvar_name: impl Into<String>) -> Self {
        Self {
            cookie: cookie.get(),
            cvar_name: cvar_name.into(),
        }
    }

    /// Typed cookie.
    pub fn cookie(&self) -> Cookie {
        Cookie::new(self.cookie)
    }
}

/// Client → server: the answer to a [`GetCvarValue`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondCvarValue {
    /// Cookie from the matching query.
    pub cookie: i32,
    /// Raw status code (0..=3).
    pub status_code: i32,
    /// Cvar name as the client saw it.
    pub name: String,
    /// Cvar value, empty on failure.
    #[serde(default)]
    pub value: String,
}

impl RespondCvarValue {
    /// Typed cookie.
    pub fn cookie(&self) -> Cookie {
        Cookie::new(self.cookie)
    }

    /// Decode the status code.
    pub fn status(&self) -> Result<CvarValueStatus, MessageError> {
        CvarValueStatus::try_from(self.status_code)
    }
}

/// Events the host delivers to the engine, in delivery order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// A peer finished connecting on `slot`.
    Connected {
        /// Slot of the new peer.
        slot: PeerSlot,
        /// Locally simulated (bot) peer.
        #[serde(default)]
        synthetic: bool,
    },
    /// The peer on `slot` went away.
    Disconnected {
        /// Slot of the departed peer.
        slot: PeerSlot,
    },
    /// A cvar reply arrived on `slot`.
    Response {
        /// Slot the reply arrived on.
        slot: PeerSlot,
        /// The reply as decoded by the transport.
        message: RespondCvarValue,
    },
}

impl HostEvent {
    /// Slot the event concerns.
    pub fn slot(&self) -> PeerSlot {
        match self {
            Self::Connected { slot, .. } | Self::Disconnected { slot } | Self::Response { slot, .. } => {
                *slot
            }
        }
    }
}
