//! Endpoint health monitoring and failover against mock JSON-RPC nodes.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rootstock_kit::config::{EndpointConfig, RpcConfig};
use rootstock_kit::{Network, RpcManager};
use serde_json::json;

mod common;

fn url(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}

fn rpc_config(testnet: &[SocketAddr], threshold: u32, timeout_ms: u64) -> RpcConfig {
    RpcConfig {
        mainnet: vec![EndpointConfig::new(url(testnet[0]))],
        testnet: testnet.iter().map(|a| EndpointConfig::new(url(*a))).collect(),
        health_check_interval_ms: 60_000,
        request_timeout_ms: timeout_ms,
        max_consecutive_failures: threshold,
    }
}

fn manager(config: RpcConfig) -> RpcManager {
    RpcManager::with_http_client(config, common::http_client()).unwrap()
}

/// Backend that answers 500 while `down` is set.
async fn toggled_backend(down: Arc<AtomicBool>) -> SocketAddr {
    common::start_programmable_backend(move |_| {
        let down = down.clone();
        async move {
            if down.load(Ordering::SeqCst) {
                (500, "dead".into())
            } else {
                (200, json!({"jsonrpc": "2.0", "id": 1, "result": "0x2a"}).to_string())
            }
        }
    })
    .await
}

#[tokio::test]
async fn test_threshold_marks_unhealthy() {
    let good = common::start_rpc_node(100).await;
    let bad = toggled_backend(Arc::new(AtomicBool::new(true))).await;
    let manager = manager(rpc_config(&[bad, good], 3, 2_000));

    for _ in 0..2 {
        manager.probe(Network::Testnet).await;
    }
    let bad_health = manager
        .health_snapshot(Network::Testnet)
        .into_iter()
        .find(|h| h.url == url(bad))
        .unwrap();
    assert!(bad_health.is_healthy, "2 of 3 failures must stay healthy");
    assert_eq!(bad_health.consecutive_failures, 2);
    assert_eq!(bad_health.latency_ms, None);
    assert!(bad_health.last_checked_at > 0);

    manager.probe(Network::Testnet).await;
    let bad_health = manager
        .health_snapshot(Network::Testnet)
        .into_iter()
        .find(|h| h.url == url(bad))
        .unwrap();
    assert!(!bad_health.is_healthy);
    assert_eq!(bad_health.consecutive_failures, 3);

    assert_eq!(manager.best_url(Network::Testnet), url(good));
}

#[tokio::test]
async fn test_single_success_restores_health() {
    let down = Arc::new(AtomicBool::new(true));
    let flaky = toggled_backend(down.clone()).await;
    let manager = manager(rpc_config(&[flaky], 2, 2_000));

    manager.probe(Network::Testnet).await;
    manager.probe(Network::Testnet).await;
    let health = manager.health_snapshot(Network::Testnet);
    assert!(!health[0].is_healthy);

    // Still the fallback while unhealthy
    assert_eq!(manager.best_url(Network::Testnet), url(flaky));

    down.store(false, Ordering::SeqCst);
    manager.probe(Network::Testnet).await;
    let health = manager.health_snapshot(Network::Testnet);
    assert!(health[0].is_healthy);
    assert_eq!(health[0].consecutive_failures, 0);
    assert!(health[0].latency_ms.is_some());
}

#[tokio::test]
async fn test_error_shaped_body_is_failure() {
    let rpc_error = common::start_programmable_backend(|_| async {
        (
            200,
            json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32005, "message": "limit exceeded"}})
                .to_string(),
        )
    })
    .await;
    let malformed = common::start_programmable_backend(|_| async { (200, "<html>".to_string()) }).await;
    let manager = manager(rpc_config(&[rpc_error, malformed], 1, 2_000));

    manager.probe(Network::Testnet).await;
    assert!(manager
        .health_snapshot(Network::Testnet)
        .iter()
        .all(|h| !h.is_healthy && h.consecutive_failures == 1));
}

#[tokio::test]
async fn test_timeout_is_failure() {
    let slow = common::start_programmable_backend(|_| async {
        tokio::time::sleep(Duration::from_millis(800)).await;
        (200, json!({"jsonrpc": "2.0", "id": 1, "result": "0x1"}).to_string())
    })
    .await;
    let manager = manager(rpc_config(&[slow], 1, 100));

    let started = std::time::Instant::now();
    manager.probe(Network::Testnet).await;
    assert!(started.elapsed() < Duration::from_millis(700));

    let health = manager.health_snapshot(Network::Testnet);
    assert!(!health[0].is_healthy);
}

#[tokio::test]
async fn test_lowest_latency_selected() {
    let slow = common::start_programmable_backend(|_| async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        (200, json!({"jsonrpc": "2.0", "id": 1, "result": "0x1"}).to_string())
    })
    .await;
    let fast = common::start_rpc_node(1).await;
    let manager = manager(rpc_config(&[slow, fast], 3, 2_000));

    // Before any probe: first configured
    assert_eq!(manager.best_url(Network::Testnet), url(slow));

    manager.probe(Network::Testnet).await;
    assert!(manager.health_snapshot(Network::Testnet).iter().all(|h| h.is_healthy));
    assert_eq!(manager.best_url(Network::Testnet), url(fast));
}

#[tokio::test]
async fn test_client_is_point_in_time() {
    let primary_down = Arc::new(AtomicBool::new(false));
    let primary = toggled_backend(primary_down.clone()).await;
    let secondary = common::start_programmable_backend(|_| async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        (200, json!({"jsonrpc": "2.0", "id": 1, "result": "0x7"}).to_string())
    })
    .await;
    let manager = manager(rpc_config(&[primary, secondary], 1, 2_000));

    manager.probe(Network::Testnet).await;
    let before = manager.create_client(Network::Testnet).unwrap();
    assert_eq!(before.url(), url(primary));

    primary_down.store(true, Ordering::SeqCst);
    manager.probe(Network::Testnet).await;

    assert_eq!(manager.best_url(Network::Testnet), url(secondary));
    assert_eq!(before.url(), url(primary));
    let after = manager.create_client(Network::Testnet).unwrap();
    assert_eq!(after.url(), url(secondary));
}

#[tokio::test]
async fn test_monitor_checks_immediately_and_stops_on_shutdown() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let node = common::start_programmable_backend(move |_| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (200, json!({"jsonrpc": "2.0", "id": 1, "result": "0x1"}).to_string())
        }
    })
    .await;

    let mut config = rpc_config(&[node], 3, 1_000);
    config.health_check_interval_ms = 100;
    let manager = manager(config);
    manager.start();

    tokio::time::sleep(Duration::from_millis(200)).await;
    for network in Network::ALL {
        assert!(manager
            .health_snapshot(network)
            .iter()
            .all(|h| h.last_checked_at > 0 && h.latency_ms.is_some()));
    }

    tokio::time::sleep(Duration::from_millis(300)).await;
    // Two networks, immediate round plus at least two periodic rounds each
    assert!(calls.load(Ordering::SeqCst) >= 4);

    manager.shutdown().await;
    assert!(!manager.is_running());
    let after_shutdown = calls.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(calls.load(Ordering::SeqCst), after_shutdown);
}
