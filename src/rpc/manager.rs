//! RPC endpoint health and failover manager.
//!
//! # Responsibilities
//! - Own one endpoint pool per network
//! - Spawn and stop one periodic prober per network
//! - Expose best-URL selection, health snapshots and bound clients

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::blockchain::Network;
use crate::config::validation::validate_rpc;
use crate::config::RpcConfig;
use crate::health::monitor::{check_pool, HealthMonitor};
use crate::health::{EndpointHealth, Prober};
use crate::lifecycle::Shutdown;
use crate::load_balancer::EndpointPool;
use crate::rpc::client::NetworkClient;
use crate::rpc::error::{RpcError, RpcResult};

/// Health-aware endpoint manager for mainnet and testnet.
///
/// Probers only run after [`RpcManager::start`]. Dropping the manager
/// signals them to stop.
pub struct RpcManager {
    mainnet: Arc<EndpointPool>,
    testnet: Arc<EndpointPool>,
    prober: Prober,
    interval: Duration,
    unhealthy_threshold: u32,
    shutdown: Shutdown,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl RpcManager {
    /// Build the manager with a default HTTP client.
    ///
    /// Probing does not begin until [`RpcManager::start`]; use
    /// [`RpcManager::spawn`] to configure and start probing in one step.
    pub fn new(config: RpcConfig) -> RpcResult<Self> {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Build the manager probing through `client`.
    pub fn with_http_client(config: RpcConfig, client: reqwest::Client) -> RpcResult<Self> {
        for network in Network::ALL {
            if config.endpoints(network).is_empty() {
                return Err(RpcError::NoEndpoints(network));
            }
        }

        let errors = validate_rpc(&config);
        if !errors.is_empty() {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(RpcError::InvalidConfig(joined));
        }

        let mainnet = Arc::new(EndpointPool::new(Network::Mainnet, config.mainnet.clone())?);
        let testnet = Arc::new(EndpointPool::new(Network::Testnet, config.testnet.clone())?);
        let prober = Prober::new(client, Duration::from_millis(config.request_timeout_ms));

        tracing::info!(
            mainnet_endpoints = mainnet.endpoints().len(),
            testnet_endpoints = testnet.endpoints().len(),
            interval_ms = config.health_check_interval_ms,
            timeout_ms = config.request_timeout_ms,
            max_consecutive_failures = config.max_consecutive_failures,
            "RPC manager configured"
        );

        Ok(Self {
            mainnet,
            testnet,
            prober,
            interval: Duration::from_millis(config.health_check_interval_ms),
            unhealthy_threshold: config.max_consecutive_failures,
            shutdown: Shutdown::new(),
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Build the manager and start its probers. The first probe round of
    /// each network runs immediately.
    pub fn spawn(config: RpcConfig) -> RpcResult<Self> {
        let manager = Self::new(config)?;
        manager.start();
        Ok(manager)
    }

    fn pool(&self, network: Network) -> &Arc<EndpointPool> {
        match network {
            Network::Mainnet => &self.mainnet,
            Network::Testnet => &self.testnet,
        }
    }

    /// Spawn one prober per network; each checks immediately, then every
    /// interval. Calling it again while probers run is a no-op.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        if tasks.iter().any(|t| !t.is_finished()) {
            tracing::debug!("Health monitors already running");
            return;
        }
        tasks.clear();

        for network in Network::ALL {
            let monitor = HealthMonitor::new(
                self.pool(network).clone(),
                self.prober.clone(),
                self.interval,
                self.unhealthy_threshold,
            );
            let shutdown = self.shutdown.subscribe();
            tasks.push(tokio::spawn(monitor.run(shutdown)));
        }
    }

    /// Whether any prober task is still running.
    pub fn is_running(&self) -> bool {
        self.tasks
            .lock()
            .map(|tasks| tasks.iter().any(|t| !t.is_finished()))
            .unwrap_or(false)
    }

    /// Run one probe round for `network` now and wait for it to finish.
    pub async fn probe(&self, network: Network) {
        check_pool(self.pool(network), &self.prober, self.unhealthy_threshold).await;
    }

    /// Best endpoint URL for `network`.
    ///
    /// Lowest-latency healthy endpoint, or the first configured one when
    /// none is healthy.
    pub fn best_url(&self, network: Network) -> String {
        self.pool(network).best_url()
    }

    /// Current health records of `network`. Order is unspecified.
    pub fn health_snapshot(&self, network: Network) -> Vec<EndpointHealth> {
        self.pool(network).snapshot()
    }

    /// Client bound to the current best URL. Later failovers do not affect it.
    pub fn create_client(&self, network: Network) -> RpcResult<NetworkClient> {
        let url = self.best_url(network);
        NetworkClient::connect_with(network, &url, self.prober.client().clone(), self.prober.timeout())
    }

    /// Stop all probers and wait for them to exit.
    pub async fn shutdown(&self) {
        let notified = self.shutdown.trigger();
        tracing::debug!(notified, "Stopping health monitors");

        let handles: Vec<JoinHandle<()>> = {
            let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
            tasks.drain(..).collect()
        };

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Health monitor task ended abnormally");
            }
        }

        tracing::info!("RPC manager shut down");
    }
}

impl Drop for RpcManager {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

impl std::fmt::Debug for RpcManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcManager")
            .field("mainnet", &self.mainnet.endpoints())
            .field("testnet", &self.testnet.endpoints())
            .field("interval", &self.interval)
            .field("unhealthy_threshold", &self.unhealthy_threshold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointConfig;

    fn config() -> RpcConfig {
        RpcConfig {
            mainnet: vec![EndpointConfig::new("http://127.0.0.1:9")],
            testnet: vec![
                EndpointConfig::new("http://127.0.0.1:9"),
                EndpointConfig::new("http://localhost:9"),
            ],
            health_check_interval_ms: 60_000,
            request_timeout_ms: 500,
            max_consecutive_failures: 2,
        }
    }

    #[test]
    fn test_empty_network_rejected() {
        let mut cfg = config();
        cfg.mainnet.clear();
        let err = RpcManager::new(cfg).unwrap_err();
        assert!(matches!(err, RpcError::NoEndpoints(Network::Mainnet)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut cfg = config();
        cfg.request_timeout_ms = 0;
        assert!(matches!(RpcManager::new(cfg), Err(RpcError::InvalidConfig(_))));
    }

    #[test]
    fn test_networks_are_independent() {
        let manager = RpcManager::new(config()).unwrap();
        assert_eq!(manager.health_snapshot(Network::Mainnet).len(), 1);
        assert_eq!(manager.health_snapshot(Network::Testnet).len(), 2);
        assert_eq!(manager.best_url(Network::Testnet), "http://127.0.0.1:9");
    }

    #[tokio::test]
    async fn test_dead_endpoints_fall_back_to_first() {
        let manager = RpcManager::new(config()).unwrap();
        manager.probe(Network::Testnet).await;
        assert!(manager
            .health_snapshot(Network::Testnet)
            .iter()
            .all(|h| h.is_healthy && h.consecutive_failures == 1));

        manager.probe(Network::Testnet).await;
        assert!(manager
            .health_snapshot(Network::Testnet)
            .iter()
            .all(|h| !h.is_healthy));
        assert_eq!(manager.best_url(Network::Testnet), "http://127.0.0.1:9");

        // Mainnet untouched by testnet probes
        let mainnet = manager.health_snapshot(Network::Mainnet);
        assert_eq!(mainnet[0].last_checked_at, 0);
    }

    #[tokio::test]
    async fn test_create_client_binds_best_url() {
        let manager = RpcManager::new(config()).unwrap();
        let client = manager.create_client(Network::Testnet).unwrap();
        assert_eq!(client.url(), manager.best_url(Network::Testnet));
        assert_eq!(client.network(), Network::Testnet);
    }

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let manager = RpcManager::new(config()).unwrap();
        manager.start();
        assert!(manager.is_running());
        manager.shutdown().await;
        assert!(!manager.is_running());
    }
}
