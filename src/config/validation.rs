//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Every network has at least one well-formed, unique endpoint URL
//! - Intervals, timeouts and thresholds are non-zero
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SdkConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::blockchain::Network;
use crate::config::schema::{RpcConfig, SdkConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a full configuration.
pub fn validate_config(config: &SdkConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = validate_rpc(&config.rpc);

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", obs.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the RPC section only. Used by `RpcManager` construction as well.
pub fn validate_rpc(rpc: &RpcConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for network in Network::ALL {
        let field = format!("rpc.{}", network);
        let endpoints = rpc.endpoints(network);

        if endpoints.is_empty() {
            errors.push(ValidationError::new(&field, "at least one endpoint is required"));
            continue;
        }

        let mut seen = HashSet::new();
        for (i, endpoint) in endpoints.iter().enumerate() {
            let entry = format!("{}[{}].url", field, i);
            match Url::parse(&endpoint.url) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => errors.push(ValidationError::new(
                    &entry,
                    format!("unsupported scheme '{}'", url.scheme()),
                )),
                Err(e) => errors.push(ValidationError::new(
                    &entry,
                    format!("invalid URL '{}': {}", endpoint.url, e),
                )),
            }
            if !seen.insert(endpoint.url.as_str()) {
                errors.push(ValidationError::new(
                    &entry,
                    format!("duplicate endpoint '{}'", endpoint.url),
                ));
            }
        }
    }

    if rpc.health_check_interval_ms == 0 {
        errors.push(ValidationError::new("rpc.health_check_interval_ms", "must be > 0"));
    }
    if rpc.request_timeout_ms == 0 {
        errors.push(ValidationError::new("rpc.request_timeout_ms", "must be > 0"));
    }
    if rpc.max_consecutive_failures == 0 {
        errors.push(ValidationError::new("rpc.max_consecutive_failures", "must be >= 1"));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::EndpointConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SdkConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = SdkConfig::default();
        config.rpc.mainnet.clear();
        config.rpc.testnet = vec![
            EndpointConfig::new("ws://127.0.0.1:4444"),
            EndpointConfig::new("not a url"),
            EndpointConfig::new("not a url"),
        ];
        config.rpc.max_consecutive_failures = 0;
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "localhost".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();

        assert!(fields.contains(&"rpc.mainnet"));
        assert!(fields.contains(&"rpc.testnet[0].url"));
        assert!(fields.contains(&"rpc.testnet[1].url"));
        assert!(errors.iter().any(|e| e.message.contains("duplicate")));
        assert!(fields.contains(&"rpc.max_consecutive_failures"));
        assert!(fields.contains(&"observability.metrics_address"));
    }
}
