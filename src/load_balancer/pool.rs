//! Per-network endpoint pool.
//!
//! # Responsibilities
//! - Hold the configured endpoints of one network in configuration order
//! - Own the live health record of every endpoint
//! - Apply the selection strategy with the first-configured fallback

use dashmap::DashMap;
use std::time::Duration;

use crate::blockchain::Network;
use crate::config::EndpointConfig;
use crate::health::state::EndpointHealth;
use crate::load_balancer::{EndpointSelector, LowestLatency};
use crate::rpc::error::{RpcError, RpcResult};

/// Endpoints and health state of one network.
#[derive(Debug)]
pub struct EndpointPool {
    network: Network,
    /// Configured endpoints; never empty.
    endpoints: Vec<EndpointConfig>,
    /// Health records keyed by URL.
    health: DashMap<String, EndpointHealth>,
    selector: Box<dyn EndpointSelector>,
}

impl EndpointPool {
    /// Create a pool with the default lowest-latency selector.
    pub fn new(network: Network, endpoints: Vec<EndpointConfig>) -> RpcResult<Self> {
        Self::with_selector(network, endpoints, Box::new(LowestLatency::new()))
    }

    pub fn with_selector(
        network: Network,
        endpoints: Vec<EndpointConfig>,
        selector: Box<dyn EndpointSelector>,
    ) -> RpcResult<Self> {
        if endpoints.is_empty() {
            return Err(RpcError::NoEndpoints(network));
        }

        let health = DashMap::new();
        for endpoint in &endpoints {
            health
                .entry(endpoint.url.clone())
                .or_insert_with(|| EndpointHealth::new(endpoint.url.clone()));
        }

        Ok(Self {
            network,
            endpoints,
            health,
            selector,
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn endpoints(&self) -> &[EndpointConfig] {
        &self.endpoints
    }

    /// URL of the best endpoint right now.
    ///
    /// Falls back to the first configured endpoint when none is healthy.
    pub fn best_url(&self) -> String {
        let candidates: Vec<EndpointHealth> = self
            .endpoints
            .iter()
            .filter_map(|ep| self.health.get(&ep.url).map(|h| h.value().clone()))
            .filter(|h| h.is_healthy)
            .collect();

        match self.selector.select(&candidates) {
            Some(i) if i < candidates.len() => candidates[i].url.clone(),
            _ => {
                tracing::debug!(
                    network = %self.network,
                    endpoint_count = self.endpoints.len(),
                    "No healthy endpoints, falling back to first configured"
                );
                self.endpoints[0].url.clone()
            }
        }
    }

    /// Current health records. Order is unspecified.
    pub fn snapshot(&self) -> Vec<EndpointHealth> {
        self.health.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Health record of one endpoint.
    pub fn health(&self, url: &str) -> Option<EndpointHealth> {
        self.health.get(url).map(|h| h.value().clone())
    }

    /// Record a successful probe of `url`.
    pub fn record_success(&self, url: &str, latency: Duration) {
        if let Some(mut health) = self.health.get_mut(url) {
            let recovered = !health.is_healthy;
            health.mark_success(latency);
            if recovered {
                tracing::info!(network = %self.network, url = %url, "Endpoint recovered");
            }
        }
    }

    /// Record a failed probe of `url`. Returns the updated health flag.
    pub fn record_failure(&self, url: &str, unhealthy_threshold: u32) -> bool {
        match self.health.get_mut(url) {
            Some(mut health) => {
                if health.mark_failure(unhealthy_threshold) {
                    tracing::warn!(
                        network = %self.network,
                        url = %url,
                        failures = health.consecutive_failures,
                        "Endpoint marked unhealthy"
                    );
                }
                health.is_healthy
            }
            None => false,
        }
    }
}
