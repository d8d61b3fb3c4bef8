//! Search configuration for ride matching.

use std::time::Duration;

/// Configuration parameters for ride search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// How far (km) a ride's endpoint may be from the query's and still
    /// count as nearby.
    pub nearby_radius_km: f64,

    /// Maximum number of candidates whose distances are looked up at once.
    pub max_concurrent_lookups: usize,

    /// How long one candidate's distance lookups may take before the
    /// candidate is dropped (milliseconds).
    pub lookup_timeout_ms: u64,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(nearby_radius_km: f64, max_concurrent_lookups: usize, lookup_timeout_ms: u64) -> Self {
        Self {
            nearby_radius_km,
            max_concurrent_lookups,
            lookup_timeout_ms,
        }
    }

    /// Returns the lookup timeout as a Duration.
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            nearby_radius_km: 80.0,
            max_concurrent_lookups: 8,
            lookup_timeout_ms: 5_000,
        }
    }
}
