//! Wallet error definitions and user-facing classification.

use thiserror::Error;

use crate::blockchain::Network;
use crate::wallet::provider::{ProviderRpcError, INTERNAL_ERROR, UNRECOGNIZED_CHAIN, USER_REJECTED};

/// Errors that can occur while talking to a wallet.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The wallet answered with an error object.
    #[error(transparent)]
    Provider(#[from] ProviderRpcError),

    /// No signer binding could be established.
    #[error("Wallet not connected")]
    NotConnected,

    /// `eth_requestAccounts` returned no address.
    #[error("No accounts available")]
    NoAccounts,

    /// Switching chains failed.
    #[error("Failed to switch wallet to {0}")]
    SwitchFailed(Network),

    /// Wallet is still on another chain after switching.
    #[error("Wallet on chain {actual}, expected {expected}")]
    WrongChain { expected: u64, actual: u64 },

    /// The wallet returned something we could not decode.
    #[error("Invalid wallet response: {0}")]
    InvalidResponse(String),
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

impl WalletError {
    /// Wallet error code, when the wallet supplied one.
    pub fn code(&self) -> Option<i64> {
        match self {
            WalletError::Provider(e) => Some(e.code),
            _ => None,
        }
    }
}

/// Human-readable message for a wallet error.
///
/// Known codes map to fixed categories; anything else passes its message
/// through. Never affects control flow.
pub fn classify(error: &WalletError) -> String {
    match error.code() {
        Some(USER_REJECTED) => "User rejected the request".to_string(),
        Some(INTERNAL_ERROR) => "Internal JSON-RPC error".to_string(),
        Some(UNRECOGNIZED_CHAIN) => "Unrecognized request method".to_string(),
        _ => {
            let message = match error {
                WalletError::Provider(e) => e.message.clone(),
                other => other.to_string(),
            };
            if message.trim().is_empty() {
                "Unknown error occurred".to_string()
            } else {
                message
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_err(code: i64, message: &str) -> WalletError {
        WalletError::Provider(ProviderRpcError::new(code, message))
    }

    #[test]
    fn test_known_codes() {
        assert_eq!(classify(&provider_err(4001, "denied")), "User rejected the request");
        assert_eq!(classify(&provider_err(-32603, "boom")), "Internal JSON-RPC error");
        assert_eq!(classify(&provider_err(4902, "no chain")), "Unrecognized request method");
    }

    #[test]
    fn test_passthrough_and_unknown() {
        assert_eq!(classify(&provider_err(-32000, "insufficient funds")), "insufficient funds");
        assert_eq!(classify(&provider_err(-32000, "")), "Unknown error occurred");
        assert_eq!(classify(&WalletError::NotConnected), "Wallet not connected");
    }
}
