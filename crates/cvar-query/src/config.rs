//! Cvar query configuration.

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

use crate::domain::DEFAULT_MAX_SLOTS;

/// Cvar probed on connect for the client's display language.
pub const LANGUAGE_CVAR: &str = "cl_language";

/// Cvar probed on connect for the client's operating system.
pub const OS_CVAR: &str = "engine_ostype";

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Slot table must hold at least one peer.
    #[error("max_slots must be at least 1")]
    ZeroSlots,

    /// A probe cvar name was empty.
    #[error("probe cvar name for {0} must not be empty")]
    EmptyProbeName(&'static str),

    /// An environment variable could not be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Configuration for [`crate::ClientCvarService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvarQueryConfig {
    /// Number of peer slots (fixed for the life of the service).
    pub max_slots: usize,
    /// Cvar queried for the display language on connect.
    pub language_cvar: String,
    /// Cvar queried for the operating system on connect.
    pub os_cvar: String,
}

impl Default for CvarQueryConfig {
    fn default() -> Self {
        Self {
            max_slots: DEFAULT_MAX_SLOTS,
            language_cvar: LANGUAGE_CVAR.to_string(),
            os_cvar: OS_CVAR.to_string(),
        }
    }
}

impl CvarQueryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CVAR_MAX_SLOTS`: slot table capacity (default: 64)
    /// - `CVAR_LANGUAGE_NAME`: language probe cvar (default: cl_language)
    /// - `CVAR_OS_NAME`: operating-system probe cvar (default: engine_ostype)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(value) = env::var("CVAR_MAX_SLOTS") {
            config.max_slots = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "CVAR_MAX_SLOTS",
                value,
            })?;
        }
        if let Ok(value) = env::var("CVAR_LANGUAGE_NAME") {
            config.language_cvar = value;
        }
        if let Ok(value) = env::var("CVAR_OS_NAME") {
            config.os_cvar = value;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_slots == 0 {
            return Err(ConfigError::ZeroSlots);
        }
        if self.language_cvar.is_empty() {
            return Err(ConfigError::EmptyProbeName("language"));
        }
        if self.os_cvar.is_empty() {
            return Err(ConfigError::EmptyProbeName("operating system"));
        }
        Ok(())
    }

    /// Testing config with a small table.
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            max_slots: 8,
            ..Self::default()
        }
    }
}
