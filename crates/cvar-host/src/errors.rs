//! Host error types.

use cvar_query::ConfigError;
use thiserror::Error;

/// Errors surfaced by [`crate::HostRuntime`].
#[derive(Debug, Error)]
pub enum HostError {
    /// Configuration rejected by the engine.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reading events or writing queries failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A spawned host task panicked or was cancelled.
    #[error("host task failed: {0}")]
    Task(String),

    /// [`crate::HostRuntime::run`] was called a second time.
    #[error("host runtime already ran")]
    AlreadyRunning,
}
