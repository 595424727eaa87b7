//! Rootstock RPC failover and wallet request serialization.
//!
//! Two independent components:
//! - [`RpcManager`]: probes JSON-RPC endpoints per network and picks the
//!   best one
//! - [`SignatureManager`]: serializes wallet prompts over an EIP-1193
//!   provider and keeps the wallet on the target chain

pub mod blockchain;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod rpc;
pub mod wallet;

pub use blockchain::Network;
pub use config::SdkConfig;
pub use lifecycle::Shutdown;
pub use rpc::RpcManager;
pub use wallet::SignatureManager;
