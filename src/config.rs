//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::time::Duration;

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Timeout in seconds for a single upstream fetch
    pub fetch_timeout: u64,
    /// How long in seconds a proxy request waits on a shared fetch
    pub wait_timeout: u64,
    /// User agent sent with upstream requests
    pub user_agent: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `FETCH_TIMEOUT` - Upstream fetch timeout in seconds (default: 30)
    /// - `WAIT_TIMEOUT` - Per-request wait in seconds (default: 10)
    /// - `USER_AGENT` - Upstream user agent (default: `thumb_cache/<version>`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            fetch_timeout: parse_var("FETCH_TIMEOUT").unwrap_or(defaults.fetch_timeout),
            wait_timeout: parse_var("WAIT_TIMEOUT").unwrap_or(defaults.wait_timeout),
            user_agent: env::var("USER_AGENT")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.user_agent),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            fetch_timeout: 30,
            wait_timeout: 10,
            user_agent: concat!("thumb_cache/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
