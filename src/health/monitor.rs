//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe every endpoint of one network
//! - Update the pool's health records from the results

use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::health::probe::Prober;
use crate::load_balancer::EndpointPool;
use crate::observability::metrics;

/// Probe all endpoints of `pool` concurrently and record the outcomes.
///
/// Failures never escape; they only change health state.
pub async fn check_pool(pool: &EndpointPool, prober: &Prober, unhealthy_threshold: u32) {
    let network = pool.network();
    let probes = pool.endpoints().iter().map(|endpoint| async move {
        (endpoint.url.as_str(), prober.probe(&endpoint.url).await)
    });

    for (url, outcome) in join_all(probes).await {
        match outcome {
            Ok(success) => {
                tracing::debug!(
                    network = %network,
                    url = %url,
                    latency_ms = success.latency.as_millis() as u64,
                    block_number = ?success.block_number,
                    "Health check succeeded"
                );
                pool.record_success(url, success.latency);
                metrics::record_probe_success(network, url, success.latency);
            }
            Err(e) => {
                tracing::warn!(network = %network, url = %url, error = %e, "Health check failed");
                let healthy = pool.record_failure(url, unhealthy_threshold);
                metrics::record_probe_failure(network, url, healthy);
            }
        }
    }
}

/// Periodic prober for one network.
pub struct HealthMonitor {
    pool: Arc<EndpointPool>,
    prober: Prober,
    interval: Duration,
    unhealthy_threshold: u32,
}

impl HealthMonitor {
    pub fn new(
        pool: Arc<EndpointPool>,
        prober: Prober,
        interval: Duration,
        unhealthy_threshold: u32,
    ) -> Self {
        Self {
            pool,
            prober,
            interval,
            unhealthy_threshold,
        }
    }

    /// Run until shutdown. The first round starts immediately.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            network = %self.pool.network(),
            interval_ms = self.interval.as_millis() as u64,
            endpoints = self.pool.endpoints().len(),
            "Health monitor starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    check_pool(&self.pool, &self.prober, self.unhealthy_threshold).await;
                }
                _ = shutdown.recv() => {
                    tracing::info!(network = %self.pool.network(), "Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
