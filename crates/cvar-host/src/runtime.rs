//! # Host Runtime
//!
//! Wires the reader, the event pump and the writer together.
//!
//! ```text
//! input ──lines──→ read_events ──mpsc──→ HostEventPump ──→ HostSession
//!                                                              │
//!                                                   ClientCvarService
//!                                                              │
//! output ←──lines── write_lines ←──mpsc── JsonLineTransport ←──┘
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

use cvar_query::{ClientCvarService, CvarQueryStats, HostEventPump};

use crate::adapters::{read_events, write_lines, JsonLineTransport};
use crate::config::HostConfig;
use crate::errors::HostError;
use crate::session::{HostService, HostSession};

/// Totals for one [`HostRuntime::run`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostReport {
    /// Events parsed from the input.
    pub events_read: u64,
    /// Input lines that were not valid events.
    pub malformed_lines: u64,
    /// Events the pump applied.
    pub events_applied: u64,
    /// Query lines written to the output.
    pub lines_written: u64,
    /// Replies received for watched cvars.
    pub watch_replies: u64,
    /// Engine counters at the end of the run.
    pub stats: CvarQueryStats,
}

/// The stdio host.
pub struct HostRuntime {
    config: HostConfig,
    session: Arc<HostSession>,
    transport: Arc<JsonLineTransport>,
    outbound: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl HostRuntime {
    /// Build the engine and its transport from `config`.
    pub fn new(config: HostConfig) -> Result<Self, HostError> {
        let (transport, outbound) = JsonLineTransport::new();
        let transport = Arc::new(transport);
        let service = Arc::new(ClientCvarService::new(
            config.query.clone(),
            Arc::clone(&transport),
        )?);
        let session = Arc::new(HostSession::new(
            service,
            Arc::clone(&transport),
            config.watch_cvars.clone(),
        ));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            max_slots = config.query.max_slots,
            watch = config.watch_cvars.len(),
            "[cvar] Host runtime created"
        );

        Ok(Self {
            config,
            session,
            transport,
            outbound: Mutex::new(Some(outbound)),
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// The engine, for in-process callers.
    pub fn service(&self) -> Arc<HostService> {
        Arc::clone(self.session.service())
    }

    /// The event handler the pump drives.
    pub fn session(&self) -> Arc<HostSession> {
        Arc::clone(&self.session)
    }

    /// Ask a running [`run`](Self::run) to stop. Queued events are dropped;
    /// queries already queued are still written.
    pub fn shutdown(&self) {
        info!("[cvar] Initiating host shutdown");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("[cvar] Failed to send shutdown signal: {}", e);
        }
    }

    /// Process `input` until EOF or [`shutdown`](Self::shutdown), writing
    /// queries to `output`. Runs at most once per runtime.
    pub async fn run<R, W>(&self, input: R, output: W) -> Result<HostReport, HostError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let outbound = self.outbound.lock().take().ok_or(HostError::AlreadyRunning)?;

        let writer = tokio::spawn(write_lines(outbound, output));

        let (pump, events) =
            HostEventPump::new(Arc::clone(&self.session), self.config.event_buffer);
        let pump = tokio::spawn(pump.run_until(self.shutdown_rx.clone()));

        info!("[cvar] Host running");
        let read = read_events(input, events, self.shutdown_rx.clone()).await;

        // Reader dropped its sender: the pump drains what is queued and stops.
        let applied = pump.await.map_err(|e| HostError::Task(e.to_string()));

        self.transport.close();
        let written = writer.await.map_err(|e| HostError::Task(e.to_string()))?;

        let read = read?;
        let report = HostReport {
            events_read: read.events,
            malformed_lines: read.malformed,
            events_applied: applied?,
            lines_written: written?,
            watch_replies: self.session.watch_replies(),
            stats: self.session.service().stats(),
        };

        info!(
            events = report.events_applied,
            queries = report.lines_written,
            malformed = report.malformed_lines,
            "[cvar] Host stopped"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvar_query::ConfigError;

    #[test]
    fn test_rejects_invalid_engine_config() {
        let mut config = HostConfig::default();
        config.query.max_slots = 0;
        assert!(matches!(
            HostRuntime::new(config),
            Err(HostError::Config(ConfigError::ZeroSlots))
        ));
    }

    #[tokio::test]
    async fn test_run_only_once() {
        let runtime = HostRuntime::new(HostConfig::default()).unwrap();
        let report = runtime.run(&b""[..], tokio::io::sink()).await.unwrap();
        assert_eq!(report, HostReport::default());

        assert!(matches!(
            runtime.run(&b""[..], tokio::io::sink()).await,
            Err(HostError::AlreadyRunning)
        ));
    }
}
