//! RPC endpoint management.
//!
//! # Data Flow
//! ```text
//! RpcConfig (per-network endpoint lists)
//!     → manager.rs (one EndpointPool + one HealthMonitor per network)
//!     → best_url / health_snapshot readers
//!     → client.rs (alloy provider pinned to the best URL at creation)
//! ```

pub mod client;
pub mod error;
pub mod manager;

pub use client::NetworkClient;
pub use error::{RpcError, RpcResult};
pub use manager::RpcManager;
