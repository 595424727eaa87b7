//! RPC subsystem error definitions.

use thiserror::Error;

use crate::blockchain::Network;

/// Errors that can occur while building or using RPC clients.
#[derive(Debug, Error)]
pub enum RpcError {
    /// A network was configured without endpoints.
    #[error("no RPC endpoints configured for {0}")]
    NoEndpoints(Network),

    /// Configuration was rejected.
    #[error("invalid RPC configuration: {0}")]
    InvalidConfig(String),

    /// Endpoint URL could not be parsed.
    #[error("invalid RPC URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Request(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} ms")]
    Timeout(u64),

    /// A token amount could not be converted.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Endpoint serves a different chain than expected.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;
