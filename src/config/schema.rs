//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the SDK.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::blockchain::Network;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SdkConfig {
    /// RPC endpoints and health check settings.
    pub rpc: RpcConfig,

    /// Wallet request serializer settings.
    pub wallet: WalletConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// One configured JSON-RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EndpointConfig {
    /// Endpoint URL, returned verbatim by best-URL selection.
    pub url: String,

    /// Optional selection weight. Stored but not used for scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

impl EndpointConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            weight: None,
        }
    }
}

/// RPC health monitor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Mainnet endpoints, in preference order for ties.
    pub mainnet: Vec<EndpointConfig>,

    /// Testnet endpoints, in preference order for ties.
    pub testnet: Vec<EndpointConfig>,

    /// Interval between probe rounds in milliseconds.
    pub health_check_interval_ms: u64,

    /// Per-probe timeout in milliseconds.
    pub request_timeout_ms: u64,

    /// Consecutive failures before an endpoint is marked unhealthy.
    pub max_consecutive_failures: u32,
}

impl RpcConfig {
    /// Endpoints configured for `network`.
    pub fn endpoints(&self, network: Network) -> &[EndpointConfig] {
        match network {
            Network::Mainnet => &self.mainnet,
            Network::Testnet => &self.testnet,
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            mainnet: vec![EndpointConfig::new(Network::Mainnet.default_rpc_url())],
            testnet: vec![EndpointConfig::new(Network::Testnet.default_rpc_url())],
            health_check_interval_ms: 30_000,
            request_timeout_ms: 10_000,
            max_consecutive_failures: 3,
        }
    }
}

/// Wallet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Chain the wallet must be on before any signing request.
    pub target_network: Network,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            target_network: Network::Testnet,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SdkConfig::default();
        assert_eq!(config.rpc.health_check_interval_ms, 30_000);
        assert_eq!(config.rpc.request_timeout_ms, 10_000);
        assert_eq!(config.rpc.max_consecutive_failures, 3);
        assert_eq!(
            config.rpc.endpoints(Network::Mainnet)[0].url,
            "https://public-node.rsk.co"
        );
        assert_eq!(config.wallet.target_network, Network::Testnet);
    }

    #[test]
    fn test_parse_partial_toml() {
        let raw = r#"
            [rpc]
            max_consecutive_failures = 5

            [[rpc.testnet]]
            url = "http://127.0.0.1:4444"
            weight = 2

            [[rpc.testnet]]
            url = "http://127.0.0.1:4445"

            [wallet]
            target_network = "mainnet"
        "#;

        let config: SdkConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.rpc.max_consecutive_failures, 5);
        assert_eq!(config.rpc.request_timeout_ms, 10_000);
        assert_eq!(config.rpc.testnet.len(), 2);
        assert_eq!(config.rpc.testnet[0].weight, Some(2));
        assert_eq!(config.rpc.testnet[1].weight, None);
        // Unlisted network keeps its default endpoint
        assert_eq!(config.rpc.mainnet.len(), 1);
        assert_eq!(config.wallet.target_network, Network::Mainnet);
    }
}
