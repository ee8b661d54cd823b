//! Cache Statistics Module
//!
//! Tracks how requests were served: from a completed entry, by joining an
//! in-flight fetch, or by starting a new one.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache request counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Requests served from a completed entry
    pub hits: u64,
    /// Requests that attached to a fetch already in flight
    pub joins: u64,
    /// Fetch operations started
    pub fetches: u64,
    /// Generations evicted because their fetch failed
    pub failures: u64,
    /// Requests with an empty key that never reached the cache
    pub short_circuits: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Coalesced Rate ==
    /// Fraction of keyed requests that did not start their own fetch.
    ///
    /// Returns (hits + joins) / (hits + joins + fetches), or 0.0 if no keyed
    /// requests have been made.
    pub fn coalesced_rate(&self) -> f64 {
        let coalesced = self.hits + self.joins;
        let total = coalesced + self.fetches;
        if total == 0 {
            0.0
        } else {
            coalesced as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_join(&mut self) {
        self.joins += 1;
    }

    pub fn record_fetch(&mut self) {
        self.fetches += 1;
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    pub fn record_short_circuit(&mut self) {
        self.short_circuits += 1;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.joins, 0);
        assert_eq!(stats.fetches, 0);
        assert_eq!(stats.failures, 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_coalesced_rate_no_requests() {
        let stats = CacheStats::new();
        assert_eq!(stats.coalesced_rate(), 0.0);
    }

    #[test]
    fn test_coalesced_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_fetch();
        stats.record_join();
        stats.record_join();
        stats.record_hit();
        assert_eq!(stats.coalesced_rate(), 0.75);
    }

    #[test]
    fn test_short_circuits_do_not_affect_rate() {
        let mut stats = CacheStats::new();
        stats.record_short_circuit();
        stats.record_fetch();
        assert_eq!(stats.coalesced_rate(), 0.0);
        assert_eq!(stats.short_circuits, 1);
    }

    #[test]
    fn test_record_failure() {
        let mut stats = CacheStats::new();
        stats.record_failure();
        stats.record_failure();
        assert_eq!(stats.failures, 2);
    }
}
