//! End-to-end correlation scenarios against the in-memory transport.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use cvar_query::{
    invariant_cookie_in_one_slot, invariant_disconnected_slot_empty,
    invariant_no_pending_sentinels, ClientCvarApi, ClientCvarService, Cookie, CookieAllocator,
    CvarCallback, CvarQueryConfig, CvarReply, CvarValueStatus, HostEventHandler,
    InMemoryTransport, PeerSlot,
};

type Service = ClientCvarService<InMemoryTransport>;

fn setup(connected: &[i32]) -> (Arc<Service>, Arc<InMemoryTransport>) {
    let transport = Arc::new(InMemoryTransport::with_connected(
        connected.iter().copied().map(PeerSlot::new),
    ));
    let service = ClientCvarService::new(CvarQueryConfig::default(), Arc::clone(&transport))
        .expect("default config is valid")
        .with_allocator(Arc::new(CookieAllocator::new()));
    (Arc::new(service), transport)
}

fn recording() -> (Arc<Mutex<Vec<CvarReply>>>, CvarCallback) {
    let replies = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&replies);
    (replies, Box::new(move |reply| sink.lock().push(reply)))
}

fn respond(service: &Service, slot: i32, cookie: Cookie, status: CvarValueStatus, name: &str, value: &str) {
    service.on_response_received(
        PeerSlot::new(slot),
        cookie,
        status,
        name.to_string(),
        value.to_string(),
    );
}

#[test]
fn scenario_a_connect_probes_and_caches_language() {
    let (service, transport) = setup(&[3]);
    let slot = PeerSlot::new(3);

    service.on_peer_connected(slot, false);

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].0, slot);
    assert_eq!(sent[0].1.cookie(), Cookie::LANGUAGE);
    assert_eq!(sent[0].1.cvar_name, "cl_language");
    assert_eq!(sent[1].1.cookie(), Cookie::OPERATING_SYSTEM);
    assert_eq!(sent[1].1.cvar_name, "engine_ostype");

    respond(&service, 3, Cookie::LANGUAGE, CvarValueStatus::ValueIntact, "cl_language", "english");
    assert_eq!(service.get_client_language(slot).as_deref(), Some("english"));
    assert_eq!(service.get_client_os(slot), None);

    respond(&service, 3, Cookie::OPERATING_SYSTEM, CvarValueStatus::ValueIntact, "engine_ostype", "windows");
    assert_eq!(service.get_client_os(slot).as_deref(), Some("windows"));
}

#[test]
fn scenario_b_query_without_connection_fails() {
    let (service, transport) = setup(&[]);
    let (replies, cb) = recording();

    assert!(!service.query_cvar_value(PeerSlot::new(5), "sv_cheats", cb));
    assert!(transport.sent().is_empty());
    assert_eq!(service.pending_query_count(PeerSlot::new(5)), 0);

    respond(&service, 5, Cookie::new(1), CvarValueStatus::ValueIntact, "sv_cheats", "0");
    assert!(replies.lock().is_empty());
}

#[test]
fn scenario_c_protected_reply_delivered_once() {
    let (service, transport) = setup(&[2]);
    let (replies, cb) = recording();

    assert!(service.query_cvar_value(PeerSlot::new(2), "sv_gravity", cb));
    let cookie = transport.last_cookie(PeerSlot::new(2)).expect("query was sent");

    respond(&service, 2, cookie, CvarValueStatus::CvarProtected, "sv_gravity", "");
    respond(&service, 2, cookie, CvarValueStatus::CvarProtected, "sv_gravity", "");

    let replies = replies.lock();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].status, CvarValueStatus::CvarProtected);
    assert_eq!(replies[0].slot, PeerSlot::new(2));
    assert_eq!(replies[0].name, "sv_gravity");
}

#[test]
fn scenario_d_disconnect_discards_pending() {
    let (service, _transport) = setup(&[1]);
    let (replies, cb) = recording();
    let cookie = service
        .try_query_cvar_value(PeerSlot::new(1), "cl_updaterate", cb)
        .unwrap();

    service.on_peer_disconnected(PeerSlot::new(1));
    assert!(service.inspect(|t| invariant_disconnected_slot_empty(t, PeerSlot::new(1))));

    respond(&service, 1, cookie, CvarValueStatus::ValueIntact, "cl_updaterate", "128");
    assert!(replies.lock().is_empty());
    assert_eq!(service.stats().unknown_cookies, 1);
}

#[test]
fn disconnect_clears_cached_metadata() {
    let (service, _transport) = setup(&[7]);
    let slot = PeerSlot::new(7);
    service.on_peer_connected(slot, false);
    respond(&service, 7, Cookie::LANGUAGE, CvarValueStatus::ValueIntact, "cl_language", "french");
    respond(&service, 7, Cookie::OPERATING_SYSTEM, CvarValueStatus::ValueIntact, "engine_ostype", "linux");

    service.on_peer_disconnected(slot);

    assert_eq!(service.get_client_language(slot), None);
    assert_eq!(service.get_client_os(slot), None);
}

#[test]
fn sentinel_reply_never_reaches_user_callback() {
    let (service, _transport) = setup(&[0]);
    let (replies, cb) = recording();
    service
        .try_query_cvar_value(PeerSlot::new(0), "cl_language", cb)
        .unwrap();

    respond(&service, 0, Cookie::LANGUAGE, CvarValueStatus::ValueIntact, "cl_language", "spanish");
    respond(&service, 0, Cookie::OPERATING_SYSTEM, CvarValueStatus::CvarNotFound, "engine_ostype", "");

    assert!(replies.lock().is_empty());
    assert_eq!(service.pending_query_count(PeerSlot::new(0)), 1);
    assert!(service.inspect(invariant_no_pending_sentinels));
}

#[test]
fn cookies_unique_across_slots() {
    let (service, _transport) = setup(&[0, 1, 2]);
    let mut cookies = Vec::new();
    for raw in [0, 1, 2, 0, 1, 2] {
        cookies.push(
            service
                .try_query_cvar_value(PeerSlot::new(raw), "rate", Box::new(|_| {}))
                .unwrap(),
        );
    }

    let mut sorted = cookies.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), cookies.len());
    for cookie in cookies {
        assert!(service.inspect(|t| invariant_cookie_in_one_slot(t, cookie)));
    }
}

#[test]
fn out_of_range_slots_are_safe() {
    let (service, _transport) = setup(&[]);
    for raw in [-1, 64, 1000, i32::MIN, i32::MAX] {
        let slot = PeerSlot::new(raw);
        assert_eq!(service.get_client_language(slot), None);
        assert_eq!(service.get_client_os(slot), None);
        assert_eq!(service.pending_query_count(slot), 0);
        assert!(!service.query_cvar_value(slot, "rate", Box::new(|_| {})));
        service.on_peer_connected(slot, false);
        service.on_peer_disconnected(slot);
        respond(&service, raw, Cookie::LANGUAGE, CvarValueStatus::ValueIntact, "cl_language", "x");
    }
}

#[test]
fn callback_may_query_again_on_same_slot() {
    let (service, transport) = setup(&[4]);
    let slot = PeerSlot::new(4);
    let follow_up = Arc::new(AtomicUsize::new(0));

    let svc = Arc::clone(&service);
    let counter = Arc::clone(&follow_up);
    let first = service
        .try_query_cvar_value(
            slot,
            "cl_interp_ratio",
            Box::new(move |reply| {
                assert_eq!(reply.value, "2");
                let sent = svc.query_cvar_value(
                    reply.slot,
                    "cl_interp",
                    Box::new(move |_| {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }),
                );
                assert!(sent);
            }),
        )
        .unwrap();

    respond(&service, 4, first, CvarValueStatus::ValueIntact, "cl_interp_ratio", "2");

    assert!(!service.is_pending(slot, first));
    assert_eq!(service.pending_query_count(slot), 1);

    let second = transport.last_cookie(slot).unwrap();
    assert_ne!(second, first);
    respond(&service, 4, second, CvarValueStatus::ValueIntact, "cl_interp", "0.03");
    assert_eq!(follow_up.load(Ordering::SeqCst), 1);
    assert_eq!(service.pending_query_count(slot), 0);
}

#[test]
fn reconnect_starts_fresh() {
    let (service, _transport) = setup(&[9]);
    let slot = PeerSlot::new(9);
    service.on_peer_connected(slot, false);
    respond(&service, 9, Cookie::LANGUAGE, CvarValueStatus::ValueIntact, "cl_language", "russian");
    service.on_peer_disconnected(slot);
    service.on_peer_connected(slot, false);

    assert_eq!(service.get_client_language(slot), None);
    respond(&service, 9, Cookie::LANGUAGE, CvarValueStatus::ValueIntact, "cl_language", "polish");
    assert_eq!(service.get_client_language(slot).as_deref(), Some("polish"));
}
