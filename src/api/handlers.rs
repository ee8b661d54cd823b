//! API Handlers
//!
//! HTTP request handlers for each thumbnail proxy endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::cache::{FetchCoalescingCache, FetchSource, ResolvedSource};
use crate::config::Config;
use crate::error::Result;
use crate::fetch::HttpFetcher;
use crate::models::{FetchQuery, HealthResponse, StatsResponse};

/// Application state shared across all handlers.
///
/// Holds the single process-wide cache; clones share it.
#[derive(Clone)]
pub struct AppState {
    /// Shared coalescing cache
    pub cache: Arc<FetchCoalescingCache>,
    /// How long one request waits on a fetch before giving up
    pub wait_timeout: Duration,
}

impl AppState {
    /// Creates a new AppState around the given cache.
    pub fn new(cache: FetchCoalescingCache) -> Self {
        Self {
            cache: Arc::new(cache),
            wait_timeout: Config::default().wait_timeout(),
        }
    }

    /// Overrides the per-request wait.
    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds an HTTP-backed cache with the configured timeouts.
    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        let fetcher = HttpFetcher::from_config(config)?;
        let state = Self::new(FetchCoalescingCache::with_fetcher(fetcher))
            .with_wait_timeout(config.wait_timeout());
        Ok(state)
    }
}

/// Handler for GET /fetch?url=...
///
/// Serves the content at `url` through the cache. A missing or empty `url`
/// yields `204 No Content`; any fetched payload, even an empty one, is `200`.
pub async fn fetch_handler(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> Result<Response> {
    let bytes = match query.into_source().resolve()? {
        ResolvedSource::Empty => {
            state.cache.load(FetchSource::Absent).await?;
            return Ok(StatusCode::NO_CONTENT.into_response());
        }
        ResolvedSource::Inline(bytes) => bytes,
        ResolvedSource::Fetch(key) => {
            state
                .cache
                .get_with_timeout(&key, state.wait_timeout)
                .await?
        }
    };

    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], bytes).into_response())
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for GET /health
///
/// Returns health status of the proxy.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
