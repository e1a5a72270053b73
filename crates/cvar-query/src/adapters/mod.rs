//! # Adapters Layer (Hexagonal Architecture)
//!
//! Concrete transport, async bridging and event sequencing around the
//! service.

mod awaitable;
mod event_pump;
mod in_memory;

pub use awaitable::{query_cvar_value_async, query_deferred, PendingReply};
pub use event_pump::{HostEventPump, HostEventSender, DEFAULT_EVENT_BUFFER};
pub use in_memory::InMemoryTransport;
