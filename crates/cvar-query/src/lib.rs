//! # Cvar Query
//!
//! Server-side queries for client configuration variables ("cvars").
//!
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Purpose
//!
//! Ask a connected peer for the value of a named cvar and get the answer
//! back asynchronously, matched to the request by a correlation cookie:
//! - One process-wide cookie counter; two reserved sentinel cookies
//! - Fixed-capacity slot table of pending callbacks per peer
//! - Automatic language / operating-system probes on connect, cached for
//!   synchronous lookup
//! - Total cleanup on disconnect; dropped callbacks are never invoked
//!
//! ## Module Structure
//!
//! ```text
//! cvar-query/
//! ├── domain/          # PeerSlot, Cookie, CookieAllocator, PeerSlotTable
//! ├── ports/           # ClientCvarApi, HostEventHandler, PeerTransport
//! ├── service.rs       # ClientCvarService: dispatch, demux, lifecycle
//! ├── messages.rs      # GetCvarValue, RespondCvarValue, HostEvent
//! ├── config.rs        # CvarQueryConfig
//! └── adapters/        # In-memory transport, awaitable queries, event pump
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cvar_query::{
//!     ClientCvarApi, ClientCvarService, Cookie, CvarQueryConfig, CvarValueStatus,
//!     HostEventHandler, InMemoryTransport, PeerSlot,
//! };
//!
//! let slot = PeerSlot::new(3);
//! let transport = Arc::new(InMemoryTransport::with_connected([slot]));
//! let service = ClientCvarService::new(CvarQueryConfig::default(), transport.clone()).unwrap();
//!
//! // Connecting a real peer sends the two metadata probes.
//! service.on_peer_connected(slot, false);
//! assert_eq!(transport.sent_to(slot).len(), 2);
//!
//! service.on_response_received(
//!     slot,
//!     Cookie::LANGUAGE,
//!     CvarValueStatus::ValueIntact,
//!     "cl_language".to_string(),
//!     "english".to_string(),
//! );
//! assert_eq!(service.get_client_language(slot).as_deref(), Some("english"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod messages;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{
    query_cvar_value_async, query_deferred, HostEventPump, HostEventSender, InMemoryTransport,
    PendingReply, DEFAULT_EVENT_BUFFER,
};
pub use config::{ConfigError, CvarQueryConfig, LANGUAGE_CVAR, OS_CVAR};
pub use domain::{
    invariant_cookie_in_one_slot, invariant_disconnected_slot_empty,
    invariant_no_pending_sentinels, Cookie, CookieAllocator, CvarCallback, CvarQueryError,
    CvarReply, CvarValueStatus, MessageError, PeerCvarState, PeerSlot, PeerSlotTable,
    DEFAULT_MAX_SLOTS,
};
pub use messages::{GetCvarValue, HostEvent, RespondCvarValue};
pub use ports::{ClientCvarApi, HostEventHandler, PeerTransport, INTERFACE_VERSION};
pub use service::{ClientCvarService, CvarQueryStats};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
