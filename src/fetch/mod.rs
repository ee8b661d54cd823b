//! Fetch Module
//!
//! The fetch function the cache coalesces over. The cache never performs I/O
//! itself; it is handed a [`Fetcher`] at construction time.

mod http;

use std::future::Future;

use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt};

use crate::error::Result;

pub use http::HttpFetcher;

// == Fetcher ==
/// Performs the underlying fetch for a key.
///
/// The returned future must be `'static` because the cache drives it on a
/// spawned task that outlives any single caller.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, key: &str) -> BoxFuture<'static, Result<Bytes>>;
}

impl<F, Fut> Fetcher for F
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Bytes>> + Send + 'static,
{
    fn fetch(&self, key: &str) -> BoxFuture<'static, Result<Bytes>> {
        self(key.to_string()).boxed()
    }
}
