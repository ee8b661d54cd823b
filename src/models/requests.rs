//! Request DTOs for the thumbnail proxy API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

use crate::cache::FetchSource;

/// Query string for the fetch operation (GET /fetch?url=...)
///
/// # Fields
/// - `url`: Locator of the content to fetch; absent or empty means nothing to fetch
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchQuery {
    /// The content locator
    #[serde(default)]
    pub url: Option<String>,
}

impl FetchQuery {
    /// Converts the query into a source the cache can resolve.
    pub fn into_source(self) -> FetchSource {
        FetchSource::from(self.url)
    }
}
