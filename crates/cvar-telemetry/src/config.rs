//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Whether to use ANSI colours in text output
    pub ansi: bool,

    /// Whether to write logs to stderr instead of stdout
    pub to_stderr: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "cvar-query".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            ansi: true,
            to_stderr: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CVAR_SERVICE_NAME`: Service name (default: cvar-query)
    /// - `CVAR_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `CVAR_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `CVAR_LOG_ANSI`: Colour text output (default: true)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("CVAR_SERVICE_NAME")
                .unwrap_or_else(|_| "cvar-query".to_string()),

            log_level: env::var("CVAR_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("CVAR_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(is_container),

            ansi: env::var("CVAR_LOG_ANSI")
                .map(|v| parse_flag(&v))
                .unwrap_or(!is_container),

            to_stderr: true,
        }
    }

    /// Configuration for a named component of the workspace.
    pub fn for_component(component: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = format!("cvar-{}", component);
        config
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
