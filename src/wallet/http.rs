//! EIP-1193 adapter over a plain JSON-RPC endpoint.
//!
//! Forwards every request as a JSON-RPC POST, e.g. to a node with unlocked
//! accounts or a local signing daemon. Transport failures surface as
//! code 4900 (disconnected); JSON-RPC error objects pass through unchanged.
//! A non-2xx status or a body without `result` is an internal error (-32603).

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::wallet::provider::{
    Eip1193Provider, ProviderRpcError, RequestArguments, DISCONNECTED, INTERNAL_ERROR,
};

/// Wallet provider backed by an HTTP JSON-RPC endpoint.
#[derive(Debug)]
pub struct JsonRpcWalletProvider {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcWalletProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Eip1193Provider for JsonRpcWalletProvider {
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderRpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": args.method,
            "params": args.params.unwrap_or_else(|| json!([])),
        });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderRpcError::new(DISCONNECTED, e.to_string()))?;

        let status = response.status();
        let payload: Value = match response.json().await {
            Ok(payload) => payload,
            Err(e) if status.is_success() => {
                return Err(ProviderRpcError::new(INTERNAL_ERROR, format!("invalid response: {}", e)))
            }
            Err(_) => return Err(ProviderRpcError::new(INTERNAL_ERROR, format!("HTTP {}", status))),
        };

        if let Some(error) = payload.get("error").filter(|e| !e.is_null()) {
            return Err(serde_json::from_value(error.clone()).unwrap_or_else(|_| {
                ProviderRpcError::new(INTERNAL_ERROR, format!("malformed error object: {}", error))
            }));
        }

        if !status.is_success() {
            return Err(ProviderRpcError::new(INTERNAL_ERROR, format!("HTTP {}", status)));
        }

        // `null` is a valid result; a missing member is not
        payload.get("result").cloned().ok_or_else(|| {
            ProviderRpcError::new(INTERNAL_ERROR, "invalid response: no result member")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_is_disconnected() {
        let provider = JsonRpcWalletProvider::new("http://127.0.0.1:9");
        let err = provider
            .request(RequestArguments::new("eth_chainId", json!([])))
            .await
            .unwrap_err();
        assert_eq!(err.code, DISCONNECTED);
    }
}
