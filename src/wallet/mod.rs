//! Wallet request serializer subsystem.
//!
//! # Data Flow
//! ```text
//! request_*_signature(...)
//!     → signature.rs (lazy connect + chain check, signer binding)
//!     → queue.rs (FIFO: one wallet prompt at a time)
//!     → provider.rs (EIP-1193 `request`)
//!         → http.rs (JSON-RPC over HTTP) or any other implementation
//!     → errors.rs (classify failures into user-facing messages)
//!
//! tokens.rs: ERC-20 / ERC-721 transfers built on request_transaction_signature
//! ```
//!
//! # Design Decisions
//! - The signer binding is chain-scoped: switching networks clears it
//! - Wallet errors never cross the public API; results carry a message

pub mod errors;
pub mod http;
pub mod provider;
pub mod queue;
pub mod signature;
pub mod tokens;

pub use errors::{classify, WalletError, WalletResult};
pub use http::JsonRpcWalletProvider;
pub use provider::{Eip1193Provider, ProviderRpcError, RequestArguments, WalletEvent};
pub use queue::SignatureQueue;
pub use signature::{SignatureManager, SignatureResult, SignerBinding, TypedDataPayload};
