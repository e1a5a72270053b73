//! # Cvar Host
//!
//! Reads host events from stdin, writes cvar queries to stdout, logs to
//! stderr.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`CVAR_LOG_LEVEL`, `CVAR_JSON_LOGS`)
//! 2. Load configuration (`CVAR_MAX_SLOTS`, `CVAR_WATCH`, ...)
//! 3. Run until stdin closes or Ctrl+C

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing::info;

use cvar_host::{HostConfig, HostRuntime};
use cvar_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::for_component("host"))
        .context("Failed to initialize logging")?;

    let config = HostConfig::from_env().context("Invalid configuration")?;

    info!("===========================================");
    info!("  Cvar Host v{}", cvar_host::VERSION);
    info!("  Interface: {}", cvar_query::INTERFACE_VERSION);
    info!("===========================================");

    let runtime = HostRuntime::new(config)?;

    let run = runtime.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    tokio::pin!(run);

    let report = tokio::select! {
        report = &mut run => report?,
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
            runtime.shutdown();
            run.await?
        }
    };

    info!(
        events = report.events_applied,
        queries = report.lines_written,
        matched = report.stats.responses_matched,
        watched = report.watch_replies,
        "Shutdown complete"
    );
    Ok(())
}
