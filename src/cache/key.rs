//! Key Derivation Module
//!
//! Turns what a consumer has in hand (nothing, an opaque key, a URL string, or
//! bytes already in memory) into something the cache can act on.

use bytes::Bytes;
use url::Url;

use crate::error::{FetchError, Result};

// == Fetch Source ==
/// A consumer-supplied locator for content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchSource {
    /// No locator at all
    Absent,
    /// Opaque identifier handed to the fetcher unchanged
    Key(String),
    /// URL string, validated before any fetch is attempted
    Url(String),
    /// Content already in memory; never fetched
    Bytes(Bytes),
}

/// Outcome of resolving a [`FetchSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSource {
    /// Nothing to fetch
    Empty,
    /// Fetch through the cache under this key
    Fetch(String),
    /// Use these bytes as-is
    Inline(Bytes),
}

impl FetchSource {
    /// Resolves the source into a cache key or an inline payload.
    ///
    /// Malformed URLs are rejected here so they never reach the cache.
    pub fn resolve(self) -> Result<ResolvedSource> {
        match self {
            FetchSource::Absent => Ok(ResolvedSource::Empty),
            FetchSource::Key(key) if key.is_empty() => Ok(ResolvedSource::Empty),
            FetchSource::Key(key) => Ok(ResolvedSource::Fetch(key)),
            FetchSource::Url(raw) if raw.trim().is_empty() => Ok(ResolvedSource::Empty),
            FetchSource::Url(raw) => {
                let url = Url::parse(raw.trim())
                    .map_err(|e| FetchError::InvalidKey(format!("{raw}: {e}")))?;
                Ok(ResolvedSource::Fetch(url.into()))
            }
            FetchSource::Bytes(bytes) => Ok(ResolvedSource::Inline(bytes)),
        }
    }
}

impl From<Option<String>> for FetchSource {
    fn from(url: Option<String>) -> Self {
        url.map_or(FetchSource::Absent, FetchSource::Url)
    }
}

impl From<Url> for FetchSource {
    fn from(url: Url) -> Self {
        FetchSource::Key(url.into())
    }
}
