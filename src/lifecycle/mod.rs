//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → every subscribed prober leaves its loop
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → daemon calls RpcManager::shutdown
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
