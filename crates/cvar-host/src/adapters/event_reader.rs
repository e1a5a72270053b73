//! Line reader feeding host events into the pump.
//!
//! One JSON [`HostEvent`] per line. Blank lines and lines starting with `#`
//! are skipped; lines that fail to parse are logged and skipped.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use cvar_query::{HostEvent, HostEventSender};

/// Counters from one pass over the input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadSummary {
    /// Events parsed and handed to the pump.
    pub events: u64,
    /// Lines that were not valid host events.
    pub malformed: u64,
}

/// Parse one input line. `Ok(None)` for lines that carry no event.
pub fn parse_event_line(line: &str) -> Result<Option<HostEvent>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Read events from `input` until EOF, shutdown, or the pump going away.
pub async fn read_events<R>(
    input: R,
    events: HostEventSender,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<ReadSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = ReadSummary::default();
    let mut lines = input.lines();
    let mut line_no: u64 = 0;

    loop {
        let line = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => line,
                None => {
                    debug!("[cvar] Event input reached EOF");
                    break;
                }
            },
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("[cvar] Event reader shutdown signal received");
                    break;
                }
                continue;
            }
        };
        line_no += 1;

        match parse_event_line(&line) {
            Ok(Some(event)) => {
                if events.send(event).await.is_err() {
                    warn!("[cvar] Event pump stopped, discarding remaining input");
                    break;
                }
                summary.events += 1;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(line = line_no, "[cvar] Skipping malformed event: {}", e);
                summary.malformed += 1;
            }
        }
    }

    Ok(summary)
}
