//! Host event pump.
//!
//! Serialises host events onto a single task. Producers (network readers,
//! lifecycle hooks) push [`HostEvent`]s into a channel; the pump applies
//! them to a [`HostEventHandler`] one at a time, in arrival order, so the
//! engine sees the same single-threaded event sequence a game host would
//! deliver.

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::messages::HostEvent;
use crate::ports::HostEventHandler;

/// Default capacity of the event channel.
pub const DEFAULT_EVENT_BUFFER: usize = 1024;

/// Cloneable producer side of the pump.
pub type HostEventSender = mpsc::Sender<HostEvent>;

/// Single-task consumer applying host events to a handler.
pub struct HostEventPump<H: HostEventHandler + ?Sized> {
    handler: Arc<H>,
    events: mpsc::Receiver<HostEvent>,
}

impl<H: HostEventHandler + ?Sized> HostEventPump<H> {
    /// Create a pump and the sender that feeds it.
    pub fn new(handler: Arc<H>, buffer: usize) -> (Self, HostEventSender) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (
            Self {
                handler,
                events: rx,
            },
            tx,
        )
    }

    /// Process events until every sender is dropped. Returns the number of
    /// events applied.
    pub async fn run(mut self) -> u64 {
        let mut applied = 0;
        while let Some(event) = self.events.recv().await {
            self.apply(event);
            applied += 1;
        }
        info!("[cvar] Event pump drained after {} events", applied);
        applied
    }

    /// Like [`run`](Self::run) but also stops when `shutdown` flips to `true`.
    /// Events still queued at that point are not applied.
    pub async fn run_until(mut self, mut shutdown: watch::Receiver<bool>) -> u64 {
        let mut applied = 0;
        loop {
            tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => {
                        self.apply(event);
                        applied += 1;
                    }
                    None => break,
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("[cvar] Event pump shutdown signal received");
                        break;
                    }
                }
            }
        }
        applied
    }

    fn apply(&self, event: HostEvent) {
        debug!(slot = %event.slot(), "[cvar] Applying host event");
        self.handler.handle_event(event);
    }
}
