//! Error types for the fetch cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Fetch Error Enum ==
/// Unified error type for fetches routed through the cache.
///
/// Outcomes of a shared fetch are handed to every observer, so the error has
/// to be `Clone` and carries rendered messages rather than source errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The key could not be resolved to a fetchable locator
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// The underlying fetch failed (network error, non-success status)
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// This observer stopped waiting; the shared fetch is unaffected
    #[error("Cancelled: {0}")]
    Cancelled(String),
}

impl FetchError {
    /// Returns true if a later request for the same key may succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::InvalidKey(_))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for FetchError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            FetchError::InvalidKey(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            FetchError::TransportFailure(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            FetchError::Cancelled(msg) => (StatusCode::GATEWAY_TIMEOUT, msg.clone()),
        };

        let body = Json(ErrorResponse::new(message, self.is_retryable()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for fetches.
pub type Result<T> = std::result::Result<T, FetchError>;
