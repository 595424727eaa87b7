//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (monitor.rs):
//!     Periodic timer, one task per network
//!     → probe.rs: eth_blockNumber POST per endpoint, all at once
//!     → Update state.rs records in the network's pool
//!
//! State machine (state.rs):
//!     Healthy ←→ Unhealthy
//!     Down after N consecutive failures, up after one success
//! ```
//!
//! # Design Decisions
//! - Probe failures are absorbed; they only change health state
//! - Sticky-healthy below the failure threshold prevents flapping
//! - Health state is per-endpoint, per-network

pub mod monitor;
pub mod probe;
pub mod state;

pub use monitor::HealthMonitor;
pub use probe::{ProbeError, Prober};
pub use state::EndpointHealth;
