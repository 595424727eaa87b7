//! Endpoint health record and its state transitions.
//!
//! # State Transitions
//! ```text
//! any     → Healthy:   one successful probe (failures reset to 0)
//! Healthy → Unhealthy: consecutive_failures >= threshold
//! ```
//!
//! # Design Decisions
//! - Below the threshold a failing endpoint stays healthy (sticky-healthy)
//!   but its latency becomes unknown for that cycle
//! - Unknown latency sorts after every measured latency

use serde::Serialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Health record for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointHealth {
    pub url: String,
    pub is_healthy: bool,
    /// Last measured latency. `None` when unknown or the last probe failed.
    pub latency_ms: Option<u64>,
    /// Unix time of the last probe in milliseconds, 0 if never probed.
    pub last_checked_at: u64,
    pub consecutive_failures: u32,
}

impl EndpointHealth {
    /// Initial record: healthy, latency unknown, never checked.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_healthy: true,
            latency_ms: None,
            last_checked_at: 0,
            consecutive_failures: 0,
        }
    }

    /// Latency used for ordering; unknown is treated as infinite.
    pub fn latency_key(&self) -> u64 {
        self.latency_ms.unwrap_or(u64::MAX)
    }

    /// Record a successful probe.
    pub fn mark_success(&mut self, latency: Duration) {
        self.is_healthy = true;
        self.latency_ms = Some(latency.as_millis().min(u128::from(u64::MAX - 1)) as u64);
        self.consecutive_failures = 0;
        self.last_checked_at = now_millis();
    }

    /// Record a failed probe.
    ///
    /// Returns `true` when this failure transitioned the endpoint to unhealthy.
    pub fn mark_failure(&mut self, unhealthy_threshold: u32) -> bool {
        let was_healthy = self.is_healthy;
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.is_healthy = self.consecutive_failures < unhealthy_threshold;
        self.latency_ms = None;
        self.last_checked_at = now_millis();
        was_healthy && !self.is_healthy
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
