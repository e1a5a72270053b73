//! JSON-line transport.
//!
//! Every outgoing query becomes one line of JSON on the outbound channel;
//! a writer task drains the channel to stdout. Connection state is whatever
//! the host events said last.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use cvar_query::{GetCvarValue, PeerSlot, PeerTransport};

/// A query addressed to a peer, as written to the outbound stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundQuery {
    /// Destination slot.
    pub slot: PeerSlot,
    /// The query itself, flattened into the same object.
    #[serde(flatten)]
    pub query: GetCvarValue,
}

/// [`PeerTransport`] that serialises queries as JSON lines.
pub struct JsonLineTransport {
    connected: RwLock<HashSet<PeerSlot>>,
    outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
    queued: AtomicU64,
}

impl JsonLineTransport {
    /// Create a transport and the receiver its lines arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                connected: RwLock::new(HashSet::new()),
                outbound: Mutex::new(Some(tx)),
                queued: AtomicU64::new(0),
            },
            rx,
        )
    }

    /// Mark `slot` as having a live connection.
    pub fn connect(&self, slot: PeerSlot) {
        self.connected.write().insert(slot);
    }

    /// Forget the connection on `slot`.
    pub fn disconnect(&self, slot: PeerSlot) {
        self.connected.write().remove(&slot);
    }

    /// Lines handed to the outbound channel so far.
    pub fn queued(&self) -> u64 {
        self.queued.load(Ordering::Relaxed)
    }

    /// Close the outbound channel. The writer finishes once it has drained
    /// what was already queued; later sends are dropped.
    pub fn close(&self) {
        self.outbound.lock().take();
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.outbound.lock().is_none()
    }
}

impl PeerTransport for JsonLineTransport {
    fn has_active_connection(&self, slot: PeerSlot) -> bool {
        !self.is_closed() && self.connected.read().contains(&slot)
    }

    fn send_query(&self, slot: PeerSlot, query: &GetCvarValue) {
        let line = match serde_json::to_string(&OutboundQuery {
            slot,
            query: query.clone(),
        }) {
            Ok(line) => line,
            Err(e) => {
                warn!(%slot, "[cvar] Failed to encode query: {}", e);
                return;
            }
        };

        let outbound = self.outbound.lock();
        match outbound.as_ref() {
            Some(tx) if tx.send(line).is_ok() => {
                self.queued.fetch_add(1, Ordering::Relaxed);
            }
            _ => debug!(%slot, cookie = query.cookie, "[cvar] Outbound stream closed, query dropped"),
        }
    }
}

/// Drain `lines` into `output`, one line each, flushing after every write.
/// Returns the number of lines written once the channel closes.
pub async fn write_lines<W>(
    mut lines: mpsc::UnboundedReceiver<String>,
    mut output: W,
) -> std::io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while let Some(line) = lines.recv().await {
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvar_query::Cookie;

    #[test]
    fn test_outbound_query_shape() {
        let line = serde_json::to_string(&OutboundQuery {
            slot: PeerSlot::new(4),
            query: GetCvarValue::new(Cookie::new(12), "rate"),
        })
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(json["slot"], 4);
        assert_eq!(json["cookie"], 12);
        assert_eq!(json["cvar_name"], "rate");
    }

    #[test]
    fn test_connection_tracking() {
        let (transport, _rx) = JsonLineTransport::new();
        let slot = PeerSlot::new(2);
        assert!(!transport.has_active_connection(slot));

        transport.connect(slot);
        assert!(transport.has_active_connection(slot));

        transport.disconnect(slot);
        assert!(!transport.has_active_connection(slot));
    }

    #[test]
    fn test_send_queues_line() {
        let (transport, mut rx) = JsonLineTransport::new();
        let slot = PeerSlot::new(1);
        transport.send_query(slot, &GetCvarValue::new(Cookie::LANGUAGE, "cl_language"));

        let line = rx.try_recv().unwrap();
        let parsed: OutboundQuery = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.slot, slot);
        assert_eq!(parsed.query.cookie(), Cookie::LANGUAGE);
        assert_eq!(transport.queued(), 1);
    }

    #[test]
    fn test_closed_transport_drops_sends() {
        let (transport, mut rx) = JsonLineTransport::new();
        let slot = PeerSlot::new(1);
        transport.connect(slot);
        transport.close();

        assert!(!transport.has_active_connection(slot));
        transport.send_query(slot, &GetCvarValue::new(Cookie::new(3), "rate"));
        assert_eq!(transport.queued(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_write_lines_until_closed() {
        let (transport, rx) = JsonLineTransport::new();
        transport.send_query(PeerSlot::new(0), &GetCvarValue::new(Cookie::new(1), "a"));
        transport.send_query(PeerSlot::new(0), &GetCvarValue::new(Cookie::new(2), "b"));
        transport.close();

        let mut out = Vec::new();
        let written = write_lines(rx, &mut out).await.unwrap();
        assert_eq!(written, 2);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with('\n'));
    }
}
