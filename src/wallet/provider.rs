//! EIP-1193 provider contract.
//!
//! The wallet is reached only through `request({method, params})` plus an
//! optional event stream; no other wallet shape is assumed.

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

/// User rejected the request.
pub const USER_REJECTED: i64 = 4001;
/// Provider is disconnected from all chains.
pub const DISCONNECTED: i64 = 4900;
/// Chain has not been added to the wallet.
pub const UNRECOGNIZED_CHAIN: i64 = 4902;
/// Internal JSON-RPC error.
pub const INTERNAL_ERROR: i64 = -32603;

/// Arguments of a single EIP-1193 request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestArguments {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RequestArguments {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params: Some(params),
        }
    }
}

/// Error object returned by a wallet.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message} (code {code})")]
pub struct ProviderRpcError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ProviderRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// Events a wallet may emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    Connect { chain_id: u64 },
    Disconnect,
    ChainChanged(u64),
    AccountsChanged(Vec<Address>),
}

/// An EIP-1193 style wallet provider.
#[async_trait]
pub trait Eip1193Provider: Send + Sync {
    /// Send one request to the wallet.
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderRpcError>;

    /// Subscribe to wallet events, if the wallet emits any.
    fn subscribe(&self) -> Option<broadcast::Receiver<WalletEvent>> {
        None
    }
}
