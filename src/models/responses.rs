//! Response DTOs for the thumbnail proxy API
//!
//! Defines the structure of outgoing JSON response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Requests served from a completed entry
    pub hits: u64,
    /// Requests that joined an in-flight fetch
    pub joins: u64,
    /// Fetches started
    pub fetches: u64,
    /// Failed generations evicted
    pub failures: u64,
    /// Requests without a locator
    pub short_circuits: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Share of keyed requests that did not start a fetch
    pub coalesced_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            coalesced_rate: stats.coalesced_rate(),
            hits: stats.hits,
            joins: stats.joins,
            fetches: stats.fetches,
            failures: stats.failures,
            short_circuits: stats.short_circuits,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
    /// Whether repeating the request may succeed
    pub retryable: bool,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, retryable: bool) -> Self {
        Self {
            error: error.into(),
            retryable,
        }
    }
}
