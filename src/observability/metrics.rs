//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rpc_endpoint_healthy` (gauge): 1=healthy, 0=unhealthy, by network/url
//! - `rpc_endpoint_latency_ms` (gauge): last measured probe latency
//! - `rpc_probe_failures_total` (counter): failed probes, by network/url
//! - `wallet_requests_total` (counter): wallet requests by method/outcome

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

use crate::blockchain::Network;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe_success(network: Network, url: &str, latency: Duration) {
    let labels = [("network", network.as_str().to_string()), ("url", url.to_string())];
    gauge!("rpc_endpoint_healthy", &labels).set(1.0);
    gauge!("rpc_endpoint_latency_ms", &labels).set(latency.as_secs_f64() * 1000.0);
}

pub fn record_probe_failure(network: Network, url: &str, still_healthy: bool) {
    let labels = [("network", network.as_str().to_string()), ("url", url.to_string())];
    counter!("rpc_probe_failures_total", &labels).increment(1);
    gauge!("rpc_endpoint_healthy", &labels).set(if still_healthy { 1.0 } else { 0.0 });
}

pub fn record_wallet_request(method: &'static str, success: bool) {
    let outcome = if success { "success" } else { "error" };
    counter!("wallet_requests_total", "method" => method, "outcome" => outcome).increment(1);
}
