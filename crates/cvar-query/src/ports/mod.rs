//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** the query API and the host event handler
//! - **Driven Ports (Outbound):** the transport the host provides

pub mod inbound;
pub mod outbound;

pub use inbound::{ClientCvarApi, HostEventHandler, INTERFACE_VERSION};
pub use outbound::PeerTransport;
