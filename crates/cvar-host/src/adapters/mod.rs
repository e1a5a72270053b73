//! # Stdio Adapters
//!
//! - `json_lines` - outbound queries as JSON lines
//! - `event_reader` - inbound host events from JSON lines

pub mod event_reader;
pub mod json_lines;

pub use event_reader::{parse_event_line, read_events, ReadSummary};
pub use json_lines::{write_lines, JsonLineTransport, OutboundQuery};
