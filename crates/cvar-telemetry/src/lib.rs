//! # Cvar Telemetry
//!
//! Structured logging for the cvar query workspace.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cvar_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(&TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!     // Application code here
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CVAR_SERVICE_NAME` | `cvar-query` | Service name in log lines |
//! | `CVAR_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `CVAR_JSON_LOGS` | `false` | JSON output |
//! | `CVAR_LOG_ANSI` | `true` | Coloured text output |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// The log filter directive could not be parsed.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber was already installed.
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),
}

/// Initialize logging for a process.
///
/// Call once, early in `main`.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_logging(config)
}

/// Create a span carrying the slot a piece of work concerns.
///
/// # Example
///
/// ```rust,ignore
/// let _span = cvar_telemetry::slot_span!("probe", slot = 3);
/// ```
#[macro_export]
macro_rules! slot_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
