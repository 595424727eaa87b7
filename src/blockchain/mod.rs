//! Rootstock chain definitions shared by the RPC and wallet subsystems.
//!
//! # Contents
//! - `Network`: the two supported networks (mainnet = 30, testnet = 31)
//! - `ChainParams`: metadata for `wallet_addEthereumChain`
//! - `contracts`: ERC-20 / ERC-721 bindings for token calls

pub mod contracts;
pub mod types;

pub use types::{ChainId, ChainParams, NativeCurrency, Network};
