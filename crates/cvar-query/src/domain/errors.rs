//! # Domain Errors
//!
//! Error types for cvar query dispatch and message decoding.

use thiserror::Error;

use super::value_objects::PeerSlot;

/// Reasons a query could not be dispatched or did not complete.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CvarQueryError {
    /// The cvar name was empty.
    #[error("Cvar name must not be empty")]
    EmptyCvarName,

    /// The slot id is outside the slot table.
    #[error("Slot out of range: {0}")]
    SlotOutOfRange(PeerSlot),

    /// The peer on this slot has no transport connection.
    #[error("No active connection on {0}")]
    NoActiveConnection(PeerSlot),

    /// The peer disconnected before replying.
    #[error("Query cancelled by peer disconnect")]
    Cancelled,
}

/// Errors decoding an inbound message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// Status code outside the four known values.
    #[error("Unknown cvar status code: {0}")]
    UnknownStatusCode(i32),
}
