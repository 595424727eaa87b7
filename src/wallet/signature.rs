//! Wallet request serializer.
//!
//! # Responsibilities
//! - Connect the wallet and make sure the target chain is active
//! - Keep a chain-scoped signer binding, re-established lazily
//! - Push every wallet prompt through one FIFO queue
//!
//! # Design Decisions
//! - Public operations never return errors; failures become a `false` or a
//!   `SignatureResult` with a classified message
//! - Read-only calls (`eth_chainId`, `eth_estimateGas`) bypass the queue
//! - Concurrent lazy connects are collapsed into one

use alloy::primitives::{hex, Address, Bytes, TxHash, U64};
use alloy::rpc::types::TransactionRequest;
use arc_swap::ArcSwapOption;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

use crate::blockchain::Network;
use crate::config::WalletConfig;
use crate::observability::metrics;
use crate::wallet::errors::{classify, WalletError, WalletResult};
use crate::wallet::provider::{Eip1193Provider, RequestArguments, WalletEvent, UNRECOGNIZED_CHAIN};
use crate::wallet::queue::SignatureQueue;

/// A connected, chain-verified account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerBinding {
    pub address: Address,
    pub chain_id: u64,
}

/// Outcome of a signing or sending request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<TxHash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SignatureResult {
    pub fn signed(signature: Bytes) -> Self {
        Self {
            success: true,
            signature: Some(signature),
            ..Default::default()
        }
    }

    pub fn sent(tx_hash: TxHash) -> Self {
        Self {
            success: true,
            tx_hash: Some(tx_hash),
            ..Default::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    fn from_result<T>(result: WalletResult<T>, ok: impl FnOnce(T) -> Self) -> Self {
        match result {
            Ok(value) => ok(value),
            Err(e) => {
                tracing::warn!(error = %e, "Wallet request failed");
                Self::failed(classify(&e))
            }
        }
    }
}

/// EIP-712 payload for `eth_signTypedData_v4`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataPayload {
    pub domain: Value,
    pub types: Value,
    pub primary_type: String,
    pub message: Value,
}

/// Serializes wallet interactions for one wallet session.
pub struct SignatureManager {
    provider: Arc<dyn Eip1193Provider>,
    target: Network,
    signer: ArcSwapOption<SignerBinding>,
    queue: SignatureQueue,
    connect_lock: Mutex<()>,
}

impl SignatureManager {
    pub fn new(provider: Arc<dyn Eip1193Provider>, config: WalletConfig) -> Self {
        Self {
            provider,
            target: config.target_network,
            signer: ArcSwapOption::empty(),
            queue: SignatureQueue::new(),
            connect_lock: Mutex::new(()),
        }
    }

    /// Network the wallet is kept on.
    pub fn target_network(&self) -> Network {
        self.target
    }

    pub fn has_signer(&self) -> bool {
        self.signer.load().is_some()
    }

    /// Current signer binding, if any.
    pub fn signer(&self) -> Option<SignerBinding> {
        self.signer.load_full().map(|b| *b)
    }

    /// Drop the signer binding; the next signing call reconnects.
    pub fn invalidate_signer(&self) {
        if self.signer.swap(None).is_some() {
            tracing::debug!("Signer binding cleared");
        }
    }

    /// Number of prompts waiting or in flight.
    pub fn pending_requests(&self) -> usize {
        self.queue.pending()
    }

    async fn call(&self, method: &'static str, params: Value) -> WalletResult<Value> {
        let result = self
            .provider
            .request(RequestArguments::new(method, params))
            .await
            .map_err(WalletError::from);
        metrics::record_wallet_request(method, result.is_ok());
        result
    }

    /// Send a prompting request through the FIFO queue.
    async fn prompt(&self, method: &'static str, params: Value) -> WalletResult<Value> {
        self.queue.run(method, || self.call(method, params)).await
    }

    /// Like [`Self::prompt`], but only dispatched if `expected` is still the
    /// bound signer once the request reaches the front of the queue. A switch
    /// or wallet event processed while waiting fails the request.
    async fn prompt_as(
        &self,
        expected: SignerBinding,
        method: &'static str,
        params: Value,
    ) -> WalletResult<Value> {
        self.queue
            .run(method, move || async move {
                match self.signer() {
                    Some(current) if current == expected => self.call(method, params).await,
                    current => {
                        tracing::warn!(
                            method,
                            expected = ?expected,
                            current = ?current,
                            "Signer changed while queued, dropping request"
                        );
                        Err(WalletError::NotConnected)
                    }
                }
            })
            .await
    }

    /// Request accounts, ensure the target chain and bind a signer.
    ///
    /// Returns `false` on any failure; the cause is logged.
    pub async fn connect(&self) -> bool {
        let _connecting = self.connect_lock.lock().await;
        self.connect_locked().await.is_some()
    }

    async fn connect_locked(&self) -> Option<SignerBinding> {
        match self.establish_binding().await {
            Ok(binding) => {
                self.signer.store(Some(Arc::new(binding)));
                tracing::info!(
                    address = %binding.address,
                    chain_id = binding.chain_id,
                    "Wallet connected"
                );
                Some(binding)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect wallet");
                None
            }
        }
    }

    async fn establish_binding(&self) -> WalletResult<SignerBinding> {
        let accounts: Vec<Address> = decode(self.prompt("eth_requestAccounts", json!([])).await?)?;
        let address = accounts.first().copied().ok_or(WalletError::NoAccounts)?;

        let expected = self.target.chain_id().0;
        let mut chain_id = self.query_chain_id().await?;
        if chain_id != expected {
            tracing::info!(
                current = chain_id,
                target = expected,
                "Wallet on wrong chain, switching"
            );
            if !self.switch_network(self.target).await {
                return Err(WalletError::SwitchFailed(self.target));
            }
            chain_id = self.query_chain_id().await?;
            if chain_id != expected {
                return Err(WalletError::WrongChain {
                    expected,
                    actual: chain_id,
                });
            }
        }

        Ok(SignerBinding { address, chain_id })
    }

    /// Current binding, connecting first when there is none.
    async fn ensure_signer(&self) -> Option<SignerBinding> {
        if let Some(binding) = self.signer() {
            return Some(binding);
        }
        let _connecting = self.connect_lock.lock().await;
        // Another caller may have connected while we waited
        if let Some(binding) = self.signer() {
            return Some(binding);
        }
        self.connect_locked().await
    }

    async fn query_chain_id(&self) -> WalletResult<u64> {
        let id: U64 = decode(self.call("eth_chainId", json!([])).await?)?;
        Ok(id.to::<u64>())
    }

    /// Chain the wallet is on right now.
    pub async fn get_chain_id(&self) -> Option<u64> {
        match self.query_chain_id().await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!(error = %e, "Failed to get chain ID");
                None
            }
        }
    }

    /// Address of the bound account, connecting first if needed.
    pub async fn get_account(&self) -> Option<Address> {
        self.ensure_signer().await.map(|b| b.address)
    }

    /// Send a transaction through the wallet.
    ///
    /// A missing gas limit is estimated; if that fails the transaction is
    /// sent without one and the wallet picks its default.
    pub async fn request_transaction_signature(&self, mut tx: TransactionRequest) -> SignatureResult {
        let Some(binding) = self.ensure_signer().await else {
            return SignatureResult::failed(WalletError::NotConnected.to_string());
        };

        if tx.from.is_none() {
            tx.from = Some(binding.address);
        }

        if tx.gas.is_none() {
            match self.estimate_gas(&tx).await {
                Ok(gas) => tx.gas = Some(gas),
                Err(e) => tracing::warn!(error = %e, "Failed to estimate gas"),
            }
        }

        let result = self.prompt_as(binding, "eth_sendTransaction", json!([tx])).await;
        SignatureResult::from_result(result.and_then(decode::<TxHash>), SignatureResult::sent)
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> WalletResult<u64> {
        let gas: U64 = decode(self.call("eth_estimateGas", json!([tx])).await?)?;
        Ok(gas.to::<u64>())
    }

    /// Sign the string form of `message` (`personal_sign`).
    pub async fn request_message_signature(&self, message: &str) -> SignatureResult {
        let Some(binding) = self.ensure_signer().await else {
            return SignatureResult::failed(WalletError::NotConnected.to_string());
        };
        let result = self
            .prompt_as(binding, "personal_sign", json!([message, binding.address]))
            .await;
        SignatureResult::from_result(result.and_then(decode::<Bytes>), SignatureResult::signed)
    }

    /// Sign the raw UTF-8 bytes of `message`, hex encoded (`personal_sign`).
    pub async fn request_personal_signature(&self, message: &str) -> SignatureResult {
        let Some(binding) = self.ensure_signer().await else {
            return SignatureResult::failed(WalletError::NotConnected.to_string());
        };
        let encoded = hex::encode_prefixed(message.as_bytes());
        let result = self
            .prompt_as(binding, "personal_sign", json!([encoded, binding.address]))
            .await;
        SignatureResult::from_result(result.and_then(decode::<Bytes>), SignatureResult::signed)
    }

    /// Sign EIP-712 typed data (`eth_signTypedData_v4`).
    pub async fn request_typed_data_signature(&self, payload: &TypedDataPayload) -> SignatureResult {
        let Some(binding) = self.ensure_signer().await else {
            return SignatureResult::failed(WalletError::NotConnected.to_string());
        };
        let encoded = match serde_json::to_string(payload) {
            Ok(encoded) => encoded,
            Err(e) => return SignatureResult::failed(e.to_string()),
        };
        let result = self
            .prompt_as(binding, "eth_signTypedData_v4", json!([binding.address, encoded]))
            .await;
        SignatureResult::from_result(result.and_then(decode::<Bytes>), SignatureResult::signed)
    }

    pub async fn switch_to_rootstock_mainnet(&self) -> bool {
        self.switch_network(Network::Mainnet).await
    }

    pub async fn switch_to_rootstock_testnet(&self) -> bool {
        self.switch_network(Network::Testnet).await
    }

    /// Ask the wallet to switch to `network`, adding the chain first when
    /// the wallet does not know it. Clears the signer on success.
    pub async fn switch_network(&self, network: Network) -> bool {
        let switch_params = json!([{ "chainId": network.chain_id().to_hex() }]);

        match self.prompt("wallet_switchEthereumChain", switch_params.clone()).await {
            Ok(_) => {
                self.invalidate_signer();
                tracing::info!(network = %network, "Switched wallet network");
                return true;
            }
            Err(e) if e.code() == Some(UNRECOGNIZED_CHAIN) => {
                tracing::info!(network = %network, "Chain unknown to wallet, adding it");
            }
            Err(e) => {
                tracing::error!(network = %network, error = %e, "Failed to switch network");
                return false;
            }
        }

        if let Err(e) = self
            .prompt("wallet_addEthereumChain", json!([network.chain_params()]))
            .await
        {
            tracing::error!(network = %network, error = %e, "Failed to add chain");
            return false;
        }

        match self.prompt("wallet_switchEthereumChain", switch_params).await {
            Ok(_) => {
                self.invalidate_signer();
                tracing::info!(network = %network, "Switched wallet network after adding chain");
                true
            }
            Err(e) => {
                tracing::error!(network = %network, error = %e, "Failed to switch after adding chain");
                false
            }
        }
    }

    /// Clear the signer whenever the wallet reports a disconnect, a chain
    /// change or an account change. Returns `None` if the wallet emits no
    /// events.
    pub fn watch_events(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let mut events = self.provider.subscribe()?;
        let manager = Arc::downgrade(self);

        Some(tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Missed wallet events, clearing signer");
                        match manager.upgrade() {
                            Some(m) => m.invalidate_signer(),
                            None => break,
                        }
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };

                let Some(manager) = manager.upgrade() else {
                    break;
                };
                match event {
                    WalletEvent::Connect { chain_id } => {
                        tracing::debug!(chain_id, "Wallet connected event");
                    }
                    WalletEvent::Disconnect
                    | WalletEvent::ChainChanged(_)
                    | WalletEvent::AccountsChanged(_) => {
                        tracing::info!(event = ?event, "Wallet state changed");
                        manager.invalidate_signer();
                    }
                }
            }
            tracing::debug!("Wallet event watcher stopped");
        }))
    }
}

impl std::fmt::Debug for SignatureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureManager")
            .field("target", &self.target)
            .field("signer", &self.signer())
            .field("pending", &self.queue.pending())
            .finish()
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> WalletResult<T> {
    serde_json::from_value(value).map_err(|e| WalletError::InvalidResponse(e.to_string()))
}
