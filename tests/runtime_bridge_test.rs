//! The TUI-facing bridge: commands in, events out, over a real worker thread

use std::thread;
use std::time::{Duration, Instant};

use httpmock::{Method::POST, MockServer};
use serde_json::json;

use taraq::config::Config;
use taraq::core::AppContext;
use taraq::infrastructure::runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
use taraq::store::{HistoryStore, MemoryStore};

const ZERO: &str = "0x0000000000000000000000000000000000000000";

/// Drain events until `pick` accepts one, or give up after a few seconds
fn wait_for<T>(bridge: &RuntimeBridge, mut pick: impl FnMut(RuntimeEvent) -> Option<T>) -> T {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        for event in bridge.poll_events() {
            if let Some(found) = pick(event) {
                return found;
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("expected event never arrived");
}

#[test]
fn test_bridge_round_trip() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/").body_contains("eth_blockNumber");
        then.status(200)
            .json_body(json!({"jsonrpc": "2.0", "id": 1, "result": "0x2a"}));
    });
    let balance = server.mock(|when, then| {
        when.method(POST).path("/").body_contains("eth_getBalance");
        then.status(200)
            .json_body(json!({"jsonrpc": "2.0", "id": 1, "result": "0xde0b6b3a7640000"}));
    });

    let config = Config {
        rpc: server.url("/"),
        ..Config::default()
    };
    let ctx = AppContext::from_config(&config, HistoryStore::open(Box::new(MemoryStore::new())))
        .unwrap();
    let bridge = RuntimeBridge::new(ctx).unwrap();

    // startup refresh happens without being asked
    let status = wait_for(&bridge, |event| match event {
        RuntimeEvent::StatusChanged(status) => Some(status),
        _ => None,
    });
    assert!(status.connected);
    assert_eq!(status.block_height, 42);

    bridge
        .send(RuntimeCommand::QueryBalance {
            address: ZERO.to_string(),
        })
        .unwrap();
    let result = wait_for(&bridge, |event| match event {
        RuntimeEvent::QueryCompleted(result) => Some(result),
        RuntimeEvent::QueryFailed { message, .. } => panic!("query failed: {message}"),
        _ => None,
    });
    assert_eq!(result.balance_decimal, 1.0);
    balance.assert();

    let entries = wait_for(&bridge, |event| match event {
        RuntimeEvent::HistoryChanged(entries) if !entries.is_empty() => Some(entries),
        _ => None,
    });
    assert_eq!(entries[0].address, ZERO);

    bridge.send(RuntimeCommand::ClearHistory).unwrap();
    let cleared = wait_for(&bridge, |event| match event {
        RuntimeEvent::HistoryChanged(entries) => Some(entries),
        _ => None,
    });
    assert!(cleared.is_empty());
}

#[test]
fn test_unreachable_endpoint_reports_offline() {
    // bind then drop to get a port nobody listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let config = Config {
        rpc: format!("http://127.0.0.1:{port}"),
        request_timeout_secs: 2,
        ..Config::default()
    };
    let ctx = AppContext::from_config(&config, HistoryStore::open(Box::new(MemoryStore::new())))
        .unwrap();
    let bridge = RuntimeBridge::new(ctx).unwrap();

    let status = wait_for(&bridge, |event| match event {
        RuntimeEvent::StatusChanged(status) => Some(status),
        _ => None,
    });
    assert!(!status.connected);

    bridge
        .send(RuntimeCommand::QueryBalance {
            address: ZERO.to_string(),
        })
        .unwrap();
    let message = wait_for(&bridge, |event| match event {
        RuntimeEvent::QueryFailed { message, .. } => Some(message),
        _ => None,
    });
    assert!(message.starts_with("network error"), "{message}");
}
