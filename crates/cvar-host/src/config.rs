//! # Host Configuration
//!
//! Engine settings plus the knobs that only matter to the stdio host.

use std::env;

use cvar_query::{ConfigError, CvarQueryConfig, DEFAULT_EVENT_BUFFER};

/// Complete host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Engine configuration.
    pub query: CvarQueryConfig,
    /// Capacity of the host event channel.
    pub event_buffer: usize,
    /// Cvars queried on every real peer after the metadata probes.
    pub watch_cvars: Vec<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            query: CvarQueryConfig::default(),
            event_buffer: DEFAULT_EVENT_BUFFER,
            watch_cvars: Vec::new(),
        }
    }
}

impl HostConfig {
    /// Load configuration from the environment.
    ///
    /// # Environment Variables
    ///
    /// - everything [`CvarQueryConfig::from_env`] reads
    /// - `CVAR_EVENT_BUFFER`: event channel capacity (default: 1024)
    /// - `CVAR_WATCH`: comma separated cvars queried on connect (default: none)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self {
            query: CvarQueryConfig::from_env()?,
            ..Self::default()
        };

        if let Ok(value) = env::var("CVAR_EVENT_BUFFER") {
            config.event_buffer = match value.trim().parse() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        name: "CVAR_EVENT_BUFFER",
                        value,
                    })
                }
            };
        }
        if let Ok(value) = env::var("CVAR_WATCH") {
            config.watch_cvars = parse_watch_list(&value);
        }

        Ok(config)
    }

    /// Builder-style helper for the watch list.
    pub fn with_watch_cvars<I, S>(mut self, cvars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.watch_cvars = cvars.into_iter().map(Into::into).collect();
        self
    }
}

/// Split a comma separated cvar list, dropping blanks.
pub fn parse_watch_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HostConfig::default();
        assert_eq!(config.event_buffer, 1024);
        assert!(config.watch_cvars.is_empty());
        assert_eq!(config.query, CvarQueryConfig::default());
    }

    #[test]
    fn test_parse_watch_list() {
        assert_eq!(
            parse_watch_list(" sv_cheats, rate,,cl_cmdrate "),
            vec!["sv_cheats", "rate", "cl_cmdrate"]
        );
        assert!(parse_watch_list(" , ").is_empty());
    }

    #[test]
    fn test_with_watch_cvars() {
        let config = HostConfig::default().with_watch_cvars(["fps_max"]);
        assert_eq!(config.watch_cvars, vec!["fps_max".to_string()]);
    }
}
