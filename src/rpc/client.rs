//! Point-in-time RPC client bound to one endpoint.
//!
//! # Responsibilities
//! - Wrap an alloy HTTP provider for the URL chosen at creation time
//! - Bound every call by the configured request timeout
//! - Verify the endpoint serves the expected Rootstock chain
//! - Read native and ERC-20/ERC-721 token state
//!
//! A client never follows later failovers; callers recreate it through
//! `RpcManager::create_client` to pick up a new best endpoint.

use alloy::network::TransactionBuilder;
use alloy::primitives::utils::{format_units, parse_units, ParseUnits};
use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::client::RpcClient;
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use alloy::transports::http::Http;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::contracts::{IERC20, IERC721};
use crate::blockchain::Network;
use crate::rpc::error::{RpcError, RpcResult};

/// JSON-RPC client for one network, pinned to a single URL.
#[derive(Clone)]
pub struct NetworkClient {
    network: Network,
    url: String,
    provider: Arc<dyn Provider + Send + Sync>,
    timeout_duration: Duration,
}

impl NetworkClient {
    /// Create a client for `url`. No request is sent.
    pub fn connect(network: Network, url: &str, timeout_duration: Duration) -> RpcResult<Self> {
        Self::connect_with(network, url, reqwest::Client::new(), timeout_duration)
    }

    /// Create a client for `url` sending requests through `http`.
    pub fn connect_with(
        network: Network,
        url: &str,
        http: reqwest::Client,
        timeout_duration: Duration,
    ) -> RpcResult<Self> {
        let parsed: url::Url = url.parse().map_err(|e: url::ParseError| RpcError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let rpc = RpcClient::new(Http::with_client(http, parsed), false);
        let provider = Arc::new(ProviderBuilder::new().connect_client(rpc))
            as Arc<dyn Provider + Send + Sync>;

        tracing::debug!(network = %network, url = %url, "RPC client created");

        Ok(Self {
            network,
            url: url.to_string(),
            provider,
            timeout_duration,
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// URL this client was bound to at creation.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the underlying provider.
    pub fn provider(&self) -> &(dyn Provider + Send + Sync) {
        self.provider.as_ref()
    }

    async fn bounded<T, E, F>(&self, fut: F) -> RpcResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(url = %self.url, error = %e, "RPC error");
                Err(RpcError::Request(e.to_string()))
            }
            Err(_) => {
                tracing::warn!(url = %self.url, "RPC timeout");
                Err(RpcError::Timeout(self.timeout_duration.as_millis() as u64))
            }
        }
    }

    /// Get the chain ID reported by the endpoint.
    pub async fn get_chain_id(&self) -> RpcResult<u64> {
        self.bounded(self.provider.get_chain_id()).await
    }

    /// Verify the endpoint serves this client's network.
    pub async fn verify_chain_id(&self) -> RpcResult<()> {
        let actual = self.get_chain_id().await?;
        let expected = self.network.chain_id().0;
        if actual != expected {
            return Err(RpcError::ChainMismatch { expected, actual });
        }
        Ok(())
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> RpcResult<u64> {
        self.bounded(self.provider.get_block_number()).await
    }

    /// Get the native (RBTC) balance of an address, in wei.
    pub async fn get_balance(&self, address: Address) -> RpcResult<U256> {
        self.bounded(self.provider.get_balance(address)).await
    }

    async fn read<C: SolCall>(&self, contract: Address, call: C) -> RpcResult<C::Return> {
        let tx = TransactionRequest::default()
            .with_to(contract)
            .with_input(call.abi_encode());
        let raw = self.bounded(self.provider.call(tx)).await?;
        C::abi_decode_returns(&raw)
            .map_err(|e| RpcError::Request(format!("cannot decode {} result: {}", C::SIGNATURE, e)))
    }

    pub async fn token_decimals(&self, token: Address) -> RpcResult<u8> {
        self.read(token, IERC20::decimalsCall {}).await
    }

    /// ERC-20 balance of `owner` in base units.
    pub async fn token_balance(&self, token: Address, owner: Address) -> RpcResult<U256> {
        self.read(token, IERC20::balanceOfCall { owner }).await
    }

    /// ERC-20 allowance granted by `owner` to `spender`, in base units.
    pub async fn token_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> RpcResult<U256> {
        self.read(token, IERC20::allowanceCall { owner, spender }).await
    }

    /// ERC-20 balance of `owner` as a decimal string, e.g. `"1.500000"`.
    pub async fn formatted_token_balance(&self, token: Address, owner: Address) -> RpcResult<String> {
        let decimals = self.token_decimals(token).await?;
        let balance = self.token_balance(token, owner).await?;
        format_units(balance, decimals).map_err(|e| RpcError::InvalidAmount(e.to_string()))
    }

    /// Convert a decimal amount such as `"2.5"` into base units using the
    /// token's own decimals.
    pub async fn parse_token_amount(&self, token: Address, amount: &str) -> RpcResult<U256> {
        let decimals = self.token_decimals(token).await?;
        match parse_units(amount, decimals) {
            Ok(ParseUnits::U256(value)) => Ok(value),
            Ok(ParseUnits::I256(_)) => Err(RpcError::InvalidAmount(format!(
                "'{}' is negative",
                amount
            ))),
            Err(e) => Err(RpcError::InvalidAmount(format!("'{}': {}", amount, e))),
        }
    }

    /// Owner of an ERC-721 token.
    pub async fn nft_owner(&self, contract: Address, token_id: U256) -> RpcResult<Address> {
        self.read(contract, IERC721::ownerOfCall { tokenId: token_id }).await
    }
}

impl std::fmt::Debug for NetworkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkClient")
            .field("network", &self.network)
            .field("url", &self.url)
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}
