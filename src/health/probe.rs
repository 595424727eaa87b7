//! Single-endpoint liveness probe.
//!
//! Sends `eth_blockNumber` as a JSON-RPC POST and times the round trip.
//! Non-2xx status, an unparsable body, a `null` body or a JSON-RPC `error`
//! member all count as failures.

use std::time::{Duration, Instant};

use alloy::primitives::U64;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::time;

/// Why a probe failed.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe timed out after {0} ms")]
    Timeout(u64),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
}

/// Result of a successful probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSuccess {
    pub latency: Duration,
    /// Chain height reported by the endpoint, if it returned a parsable one.
    pub block_number: Option<u64>,
}

/// Issues health probes with a shared HTTP client.
#[derive(Debug, Clone)]
pub struct Prober {
    client: reqwest::Client,
    timeout: Duration,
}

impl Prober {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// HTTP client shared with clients created by the manager.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Probe `url` once. Dropping the request future on timeout aborts it.
    pub async fn probe(&self, url: &str) -> Result<ProbeSuccess, ProbeError> {
        let start = Instant::now();
        match time::timeout(self.timeout, self.request_block_number(url)).await {
            Ok(Ok(block_number)) => Ok(ProbeSuccess {
                latency: start.elapsed(),
                block_number,
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ProbeError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    async fn request_block_number(&self, url: &str) -> Result<Option<u64>, ProbeError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_blockNumber",
            "params": [],
        });

        let response = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let payload: Value = serde_json::from_slice(&bytes)
            .map_err(|e| ProbeError::Malformed(e.to_string()))?;

        parse_block_number(&payload)
    }
}

fn parse_block_number(payload: &Value) -> Result<Option<u64>, ProbeError> {
    if payload.is_null() {
        return Err(ProbeError::Malformed("empty body".to_string()));
    }

    if let Some(error) = payload.get("error").filter(|e| !e.is_null()) {
        return Err(ProbeError::Rpc {
            code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    Ok(payload
        .get("result")
        .cloned()
        .and_then(|r| serde_json::from_value::<U64>(r).ok())
        .map(|n| n.to::<u64>()))
}
