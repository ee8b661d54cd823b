//! Thumb Cache - A request-coalescing fetch cache
//!
//! Deduplicates concurrent fetches per key, keeps successes for the life of
//! the cache and evicts failures so they are retried. Ships with a small HTTP
//! thumbnail proxy built on top of it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;

pub use api::AppState;
pub use cache::{EntryState, FetchCoalescingCache, FetchSource};
pub use config::Config;
pub use error::FetchError;
pub use fetch::{Fetcher, HttpFetcher};
