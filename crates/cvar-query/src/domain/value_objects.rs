//! # Domain Value Objects
//!
//! Slot ids, correlation cookies and the status codes a client reports back.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::MessageError;

/// Default number of peer slots in the table.
pub const DEFAULT_MAX_SLOTS: usize = 64;

/// Identity of a connected peer within the fixed-capacity slot table.
///
/// The host hands slot ids over as plain integers, so a `PeerSlot` may hold
/// a negative or oversized value. It only becomes an index through
/// [`PeerSlot::index`], which checks it against the table capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerSlot(i32);

impl PeerSlot {
    /// Wrap a raw slot id.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw slot id as the host sees it.
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Table index for this slot, or `None` if outside `[0, capacity)`.
    pub fn index(self, capacity: usize) -> Option<usize> {
        usize::try_from(self.0).ok().filter(|&i| i < capacity)
    }
}

impl From<i32> for PeerSlot {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PeerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot#{}", self.0)
    }
}

/// Correlation token binding an outgoing query to its response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cookie(i32);

impl Cookie {
    /// Reserved for the automatic display-language probe.
    pub const LANGUAGE: Cookie = Cookie(i32::MAX);

    /// Reserved for the automatic operating-system probe.
    pub const OPERATING_SYSTEM: Cookie = Cookie(i32::MAX - 1);

    /// Wrap a raw cookie value.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw cookie value as carried on the wire.
    pub const fn get(self) -> i32 {
        self.0
    }

    /// True for the two metadata probe cookies.
    pub fn is_sentinel(self) -> bool {
        self == Self::LANGUAGE || self == Self::OPERATING_SYSTEM
    }
}

impl From<i32> for Cookie {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::LANGUAGE => write!(f, "cookie#language"),
            Self::OPERATING_SYSTEM => write!(f, "cookie#os"),
            Self(raw) => write!(f, "cookie#{}", raw),
        }
    }
}

/// Outcome a client reports for a cvar query.
///
/// Forwarded verbatim to the caller; the correlation engine never acts on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum CvarValueStatus {
    /// The value was retrieved.
    ValueIntact,
    /// No cvar with that name exists on the client.
    CvarNotFound,
    /// The name exists but refers to a command, not a variable.
    NotACvar,
    /// The cvar is flagged as not queryable by the server.
    CvarProtected,
}

impl CvarValueStatus {
    /// True when the reply carries a usable value.
    pub fn is_intact(self) -> bool {
        self == Self::ValueIntact
    }
}

impl TryFrom<i32> for CvarValueStatus {
    type Error = MessageError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::ValueIntact),
            1 => Ok(Self::CvarNotFound),
            2 => Ok(Self::NotACvar),
            3 => Ok(Self::CvarProtected),
            other => Err(MessageError::UnknownStatusCode(other)),
        }
    }
}

impl From<CvarValueStatus> for i32 {
    fn from(status: CvarValueStatus) -> Self {
        match status {
            CvarValueStatus::ValueIntact => 0,
            CvarValueStatus::CvarNotFound => 1,
            CvarValueStatus::NotACvar => 2,
            CvarValueStatus::CvarProtected => 3,
        }
    }
}

impl fmt::Display for CvarValueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueIntact => write!(f, "value intact"),
            Self::CvarNotFound => write!(f, "cvar not found"),
            Self::NotACvar => write!(f, "not a cvar"),
            Self::CvarProtected => write!(f, "cvar protected"),
        }
    }
}

/// A client's answer to one query, as handed to the completion callback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvarReply {
    /// Slot the reply arrived on.
    pub slot: PeerSlot,
    /// Status reported by the client.
    pub status: CvarValueStatus,
    /// Cvar name echoed by the client.
    pub name: String,
    /// Cvar value; empty unless `status` is `ValueIntact`.
    pub value: String,
}

/// Single-shot completion for a pending query.
///
/// Invoked at most once. Dropped without invocation on disconnect.
pub type CvarCallback = Box<dyn FnOnce(CvarReply) + Send + 'static>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_index_in_range() {
        assert_eq!(PeerSlot::new(0).index(64), Some(0));
        assert_eq!(PeerSlot::new(63).index(64), Some(63));
    }

    #[test]
    fn test_slot_index_out_of_range() {
        assert_eq!(PeerSlot::new(64).index(64), None);
        assert_eq!(PeerSlot::new(-1).index(64), None);
        assert_eq!(PeerSlot::new(i32::MIN).index(64), None);
    }

    #[test]
    fn test_sentinels_are_largest_values() {
        assert_eq!(Cookie::LANGUAGE.get(), i32::MAX);
        assert_eq!(Cookie::OPERATING_SYSTEM.get(), i32::MAX - 1);
        assert!(Cookie::LANGUAGE.is_sentinel());
        assert!(Cookie::OPERATING_SYSTEM.is_sentinel());
        assert!(!Cookie::new(1).is_sentinel());
    }

    #[test]
    fn test_status_code_mapping() {
        for code in 0..4 {
            let status = CvarValueStatus::try_from(code).unwrap();
            assert_eq!(i32::from(status), code);
        }
        assert_eq!(
            CvarValueStatus::try_from(7),
            Err(MessageError::UnknownStatusCode(7))
        );
    }

    #[test]
    fn test_status_serde_uses_wire_codes() {
        let json = serde_json::to_string(&CvarValueStatus::CvarProtected).unwrap();
        assert_eq!(json, "3");
        assert!(serde_json::from_str::<CvarValueStatus>("9").is_err());
    }

    #[test]
    fn test_cookie_display() {
        assert_eq!(Cookie::new(12).to_string(), "cookie#12");
        assert_eq!(Cookie::LANGUAGE.to_string(), "cookie#language");
    }
}
