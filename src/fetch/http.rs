//! HTTP Fetcher
//!
//! Fetches keys as URLs with a GET request and validates the response status.

use std::time::Duration;

use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::Fetcher;
use crate::config::Config;
use crate::error::{FetchError, Result};

// == HTTP Fetcher ==
/// [`Fetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher with the given request timeout and user agent.
    pub fn new(timeout: Duration, user_agent: &str) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Builds a fetcher from the proxy configuration.
    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        Self::new(config.fetch_timeout(), &config.user_agent)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, key: &str) -> BoxFuture<'static, Result<Bytes>> {
        let client = self.client.clone();
        let url = Url::parse(key).map_err(|e| FetchError::InvalidKey(format!("{key}: {e}")));

        async move {
            let url = url?;
            debug!(%url, "GET");

            let response = client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| FetchError::TransportFailure(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::TransportFailure(format!(
                    "{url} responded with {status}"
                )));
            }

            response
                .bytes()
                .await
                .map_err(|e| FetchError::TransportFailure(e.to_string()))
        }
        .boxed()
    }
}
