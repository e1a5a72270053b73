//! Awaitable cvar queries.
//!
//! Wraps the callback API in a `tokio::sync::oneshot` so async callers can
//! `.await` the reply. A peer disconnect drops the pending callback, which
//! drops the sender, and the future resolves to
//! [`CvarQueryError::Cancelled`].

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

use crate::domain::{Cookie, CvarQueryError, CvarReply, PeerSlot};
use crate::ports::PeerTransport;
use crate::service::ClientCvarService;

/// A sent query whose reply has not been consumed yet.
#[derive(Debug)]
pub struct PendingReply {
    cookie: Cookie,
    rx: oneshot::Receiver<CvarReply>,
}

impl PendingReply {
    /// Cookie the query went out with.
    pub fn cookie(&self) -> Cookie {
        self.cookie
    }

    /// Non-blocking check: `None` while the reply is outstanding.
    pub fn try_recv(&mut self) -> Option<Result<CvarReply, CvarQueryError>> {
        match self.rx.try_recv() {
            Ok(reply) => Some(Ok(reply)),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(CvarQueryError::Cancelled)),
        }
    }
}

impl Future for PendingReply {
    type Output = Result<CvarReply, CvarQueryError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.map_err(|_| CvarQueryError::Cancelled))
    }
}

/// Send a query now and return a future for its reply.
///
/// Dispatch errors are returned immediately, before anything is awaited.
pub fn query_deferred<T: PeerTransport + ?Sized>(
    service: &ClientCvarService<T>,
    slot: PeerSlot,
    cvar_name: &str,
) -> Result<PendingReply, CvarQueryError> {
    let (tx, rx) = oneshot::channel();
    let cookie = service.try_query_cvar_value(
        slot,
        cvar_name,
        Box::new(move |reply| {
            // Receiver gone means the caller stopped waiting.
            let _ = tx.send(reply);
        }),
    )?;
    Ok(PendingReply { cookie, rx })
}

/// Send a query and wait for the reply.
pub async fn query_cvar_value_async<T: PeerTransport + ?Sized>(
    service: &ClientCvarService<T>,
    slot: PeerSlot,
    cvar_name: &str,
) -> Result<CvarReply, CvarQueryError> {
    query_deferred(service, slot, cvar_name)?.await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryTransport;
    use crate::config::CvarQueryConfig;
    use crate::domain::CvarValueStatus;
    use crate::ports::HostEventHandler;
    use std::sync::Arc;
    use tokio_test::{assert_pending, assert_ready};

    fn service(slot: PeerSlot) -> ClientCvarService<InMemoryTransport> {
        let transport = Arc::new(InMemoryTransport::with_connected([slot]));
        ClientCvarService::new(CvarQueryConfig::default(), transport).unwrap()
    }

    #[tokio::test]
    async fn test_reply_resolves_future() {
        let slot = PeerSlot::new(6);
        let svc = service(slot);
        let pending = query_deferred(&svc, slot, "cl_interp").unwrap();
        let cookie = pending.cookie();

        let mut fut = tokio_test::task::spawn(pending);
        assert_pending!(fut.poll());

        svc.on_response_received(
            slot,
            cookie,
            CvarValueStatus::ValueIntact,
            "cl_interp".to_string(),
            "0.015".to_string(),
        );

        let reply = assert_ready!(fut.poll()).unwrap();
        assert_eq!(reply.value, "0.015");
        assert_eq!(reply.status, CvarValueStatus::ValueIntact);
    }

    #[tokio::test]
    async fn test_disconnect_cancels_future() {
        let slot = PeerSlot::new(1);
        let svc = service(slot);
        let pending = query_deferred(&svc, slot, "cl_interp").unwrap();

        svc.on_peer_disconnected(slot);

        assert_eq!(pending.await, Err(CvarQueryError::Cancelled));
    }

    #[tokio::test]
    async fn test_dispatch_error_is_immediate() {
        let svc = service(PeerSlot::new(1));
        let result = query_cvar_value_async(&svc, PeerSlot::new(2), "cl_interp").await;
        assert_eq!(
            result,
            Err(CvarQueryError::NoActiveConnection(PeerSlot::new(2)))
        );
    }

    #[test]
    fn test_try_recv_states() {
        let slot = PeerSlot::new(0);
        let svc = service(slot);
        let mut pending = query_deferred(&svc, slot, "volume").unwrap();
        assert!(pending.try_recv().is_none());

        svc.on_response_received(
            slot,
            pending.cookie(),
            CvarValueStatus::CvarNotFound,
            "volume".to_string(),
            String::new(),
        );
        let reply = pending.try_recv().unwrap().unwrap();
        assert_eq!(reply.status, CvarValueStatus::CvarNotFound);
    }
}
