//! Endpoint selection subsystem.
//!
//! # Data Flow
//! ```text
//! best_url(network) requested
//!     → pool.rs (configured endpoints + live health map)
//!     → filter to healthy endpoints, in configuration order
//!     → lowest_latency.rs (pick the fastest, first wins ties)
//!     → no healthy endpoint: first configured endpoint
//! ```
//!
//! # Design Decisions
//! - Selection is stateless; the pool owns health records
//! - Unhealthy endpoints stay in the pool and rejoin after one success
//! - Selection never fails once a pool exists (pools are non-empty)

pub mod lowest_latency;
pub mod pool;

use crate::health::state::EndpointHealth;

/// Chooses one endpoint among healthy candidates.
pub trait EndpointSelector: Send + Sync + std::fmt::Debug {
    /// Returns the index into `candidates` of the chosen endpoint.
    ///
    /// `candidates` is in configuration order and only contains healthy
    /// endpoints.
    fn select(&self, candidates: &[EndpointHealth]) -> Option<usize>;
}

pub use lowest_latency::LowestLatency;
pub use pool::EndpointPool;
