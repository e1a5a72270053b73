//! # Domain Module
//!
//! Core types for cvar query correlation: slots, cookies, per-peer state
//! and the fixed slot table. No I/O.

pub mod cookie;
pub mod errors;
pub mod invariants;
pub mod peer_state;
pub mod slot_table;
pub mod value_objects;

pub use cookie::*;
pub use errors::*;
pub use invariants::*;
pub use peer_state::*;
pub use slot_table::*;
pub use value_objects::*;
