//! Token transfers through the wallet.
//!
//! Each helper builds contract calldata and hands it to
//! [`SignatureManager::request_transaction_signature`], so transfers share
//! the FIFO queue, the lazy connect and the gas-estimate fallback of any
//! other transaction. Amounts are in base units; use
//! `NetworkClient::parse_token_amount` to convert decimal input.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;

use crate::blockchain::contracts;
use crate::wallet::signature::{SignatureManager, SignatureResult};

impl SignatureManager {
    /// Send `amount` base units of an ERC-20 token to `to`.
    pub async fn transfer_erc20(&self, token: Address, to: Address, amount: U256) -> SignatureResult {
        tracing::info!(token = %token, to = %to, amount = %amount, "Requesting ERC-20 transfer");
        self.contract_call(token, contracts::erc20_transfer(to, amount))
            .await
    }

    /// Allow `spender` to move up to `amount` base units of an ERC-20 token.
    pub async fn approve_erc20(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> SignatureResult {
        tracing::info!(token = %token, spender = %spender, amount = %amount, "Requesting ERC-20 approval");
        self.contract_call(token, contracts::erc20_approve(spender, amount))
            .await
    }

    /// Transfer an ERC-721 token (`safeTransferFrom`).
    pub async fn transfer_erc721(
        &self,
        contract: Address,
        from: Address,
        to: Address,
        token_id: U256,
    ) -> SignatureResult {
        tracing::info!(contract = %contract, to = %to, token_id = %token_id, "Requesting NFT transfer");
        self.contract_call(contract, contracts::erc721_safe_transfer(from, to, token_id))
            .await
    }

    async fn contract_call(&self, contract: Address, input: Bytes) -> SignatureResult {
        let tx = TransactionRequest::default()
            .with_to(contract)
            .with_input(input);
        self.request_transaction_signature(tx).await
    }
}
