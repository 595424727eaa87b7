//! Rootstock RPC health daemon.
//!
//! Loads the configuration, keeps every configured endpoint probed and logs
//! the best endpoint per network until asked to stop.
//!
//! ```text
//!   ┌────────────────────────── RpcManager ──────────────────────────┐
//!   │  mainnet pool ◀── HealthMonitor (interval) ──▶ eth_blockNumber │
//!   │  testnet pool ◀── HealthMonitor (interval) ──▶ eth_blockNumber │
//!   └────────────────────────────────────────────────────────────────┘
//!              │ best_url / health_snapshot
//!              ▼
//!        status log line per interval
//! ```

use std::path::PathBuf;
use std::time::Duration;

use rootstock_kit::config::loader::CONFIG_PATH_ENV_VAR;
use rootstock_kit::config::{load_config, SdkConfig};
use rootstock_kit::lifecycle::signals::wait_for_shutdown;
use rootstock_kit::observability::{logging, metrics};
use rootstock_kit::{Network, RpcManager};

fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(CONFIG_PATH_ENV_VAR).map(PathBuf::from))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match config_path() {
        Some(path) => load_config(&path)?,
        None => SdkConfig::default(),
    };

    logging::init_tracing(&config.observability.log_level);
    tracing::info!("rootstock-kit v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        interval_ms = config.rpc.health_check_interval_ms,
        timeout_ms = config.rpc.request_timeout_ms,
        max_consecutive_failures = config.rpc.max_consecutive_failures,
        target_network = %config.wallet.target_network,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let interval = Duration::from_millis(config.rpc.health_check_interval_ms);
    let manager = RpcManager::spawn(config.rpc)?;

    let report = async {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            for network in Network::ALL {
                let snapshot = manager.health_snapshot(network);
                let healthy = snapshot.iter().filter(|h| h.is_healthy).count();
                tracing::info!(
                    network = %network,
                    best_url = %manager.best_url(network),
                    healthy,
                    total = snapshot.len(),
                    "Endpoint status"
                );
            }
        }
    };

    tokio::select! {
        _ = report => {}
        _ = wait_for_shutdown() => {}
    }

    manager.shutdown().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
