//! # Cvar Host Library
//!
//! A runnable host for the cvar query engine. The binary in `main.rs` wires
//! it to stdin and stdout; this library exposes the pieces for testing and
//! for embedding.
//!
//! ## Protocol
//!
//! Input, one JSON object per line:
//!
//! ```text
//! {"event":"connected","slot":3}
//! {"event":"connected","slot":4,"synthetic":true}
//! {"event":"response","slot":3,"message":{"cookie":2147483647,"status_code":0,"name":"cl_language","value":"english"}}
//! {"event":"disconnected","slot":3}
//! ```
//!
//! Output, one query per line:
//!
//! ```text
//! {"slot":3,"cookie":2147483647,"cvar_name":"cl_language"}
//! ```
//!
//! ## Module Structure
//!
//! - `config` - HostConfig from the environment
//! - `adapters` - JSON-line transport and event reader
//! - `session` - HostEventHandler keeping transport and engine in step
//! - `runtime` - reader, pump and writer tasks

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod session;

pub use adapters::{JsonLineTransport, OutboundQuery, ReadSummary};
pub use config::{parse_watch_list, HostConfig};
pub use errors::HostError;
pub use runtime::{HostReport, HostRuntime};
pub use session::{HostService, HostSession};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
