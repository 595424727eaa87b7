//! Network identifiers and chain metadata for the two Rootstock chains.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Hex quantity form used by wallet requests (e.g. `0x1f`).
    pub fn to_hex(self) -> String {
        format!("{:#x}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// One of the two supported Rootstock networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::Mainnet, Network::Testnet];

    pub fn chain_id(self) -> ChainId {
        match self {
            Network::Mainnet => ChainId(30),
            Network::Testnet => ChainId(31),
        }
    }

    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.chain_id().0 == chain_id)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }

    /// Public node used when no endpoints are configured.
    pub fn default_rpc_url(self) -> &'static str {
        match self {
            Network::Mainnet => "https://public-node.rsk.co",
            Network::Testnet => "https://public-node.testnet.rsk.co",
        }
    }

    /// Metadata sent with `wallet_addEthereumChain`.
    pub fn chain_params(self) -> ChainParams {
        let (chain_name, currency_name, symbol, explorer) = match self {
            Network::Mainnet => (
                "Rootstock Mainnet",
                "Rootstock Bitcoin",
                "RBTC",
                "https://explorer.rootstock.io",
            ),
            Network::Testnet => (
                "Rootstock Testnet",
                "Test Rootstock Bitcoin",
                "tRBTC",
                "https://explorer.testnet.rootstock.io",
            ),
        };

        ChainParams {
            chain_id: self.chain_id().to_hex(),
            chain_name: chain_name.to_string(),
            native_currency: NativeCurrency {
                name: currency_name.to_string(),
                symbol: symbol.to_string(),
                decimals: 18,
            },
            rpc_urls: vec![self.default_rpc_url().to_string()],
            block_explorer_urls: vec![explorer.to_string()],
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown network '{0}' (expected mainnet or testnet)")]
pub struct UnknownNetwork(pub String);

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(UnknownNetwork(other.to_string())),
        }
    }
}

/// EIP-3085 chain definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}
