//! Lowest-latency selection strategy.

use crate::health::state::EndpointHealth;
use crate::load_balancer::EndpointSelector;

/// Selects the candidate with the smallest recorded latency.
/// Unknown latency counts as infinite; ties go to the earliest candidate.
#[derive(Debug, Default)]
pub struct LowestLatency;

impl LowestLatency {
    pub fn new() -> Self {
        Self
    }
}

impl EndpointSelector for LowestLatency {
    fn select(&self, candidates: &[EndpointHealth]) -> Option<usize> {
        // min_by_key keeps the first of equal minima
        candidates
            .iter()
            .enumerate()
            .min_by_key(|(_, h)| h.latency_key())
            .map(|(i, _)| i)
    }
}
