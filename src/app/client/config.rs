//! HTTP client configuration and building logic
//!
//! This module handles the configuration and construction of the HTTP client
//! shared by the index and content fetchers, plus the per-attempt timeouts.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::constants::{http, limits};
use crate::errors::{ConfigError, ConfigResult};

/// Configuration for the shared HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// TCP keep-alive settings
    pub tcp_keepalive: Option<Duration>,
    /// TCP nodelay (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
    /// Connection pool idle timeout
    pub pool_idle_timeout: Option<Duration>,
    /// Maximum number of idle connections per host
    pub pool_max_per_host: usize,
    /// Upper bound for any single request
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
    /// Honour HTTP(S)_PROXY from the environment
    pub use_system_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            tcp_keepalive: Some(Duration::from_secs(30)),
            tcp_nodelay: true,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
            use_system_proxy: true,
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> ConfigResult<Client> {
        let mut client_builder = Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(http::USER_AGENT)
            .tcp_nodelay(self.tcp_nodelay)
            .pool_max_idle_per_host(self.pool_max_per_host);

        if let Some(keepalive) = self.tcp_keepalive {
            client_builder = client_builder.tcp_keepalive(keepalive);
        }

        if let Some(idle_timeout) = self.pool_idle_timeout {
            client_builder = client_builder.pool_idle_timeout(idle_timeout);
        }

        if !self.use_system_proxy {
            client_builder = client_builder.no_proxy();
        }

        client_builder.build().map_err(ConfigError::ClientBuild)
    }
}

/// Per-attempt timeouts for mirror fetches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Timeout for every index mirror attempt
    pub index_timeout: Duration,
    /// Timeout for the primary content mirror
    pub content_primary_timeout: Duration,
    /// Timeout for the secondary (and any further) content mirror
    pub content_fallback_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            index_timeout: limits::INDEX_TIMEOUT,
            content_primary_timeout: limits::CONTENT_PRIMARY_TIMEOUT,
            content_fallback_timeout: limits::CONTENT_FALLBACK_TIMEOUT,
        }
    }
}

impl FetchConfig {
    /// Timeout for the content attempt at `position` (0 = primary)
    pub fn content_timeout(&self, position: usize) -> Duration {
        if position == 0 {
            self.content_primary_timeout
        } else {
            self.content_fallback_timeout
        }
    }

    /// The largest per-attempt timeout
    pub fn longest_timeout(&self) -> Duration {
        self.index_timeout
            .max(self.content_primary_timeout)
            .max(self.content_fallback_timeout)
    }

    /// Reject zero timeouts
    pub fn validate(&self) -> ConfigResult<()> {
        let timeouts = [
            ("fetch.index_timeout", self.index_timeout),
            ("fetch.content_primary_timeout", self.content_primary_timeout),
            ("fetch.content_fallback_timeout", self.content_fallback_timeout),
        ];

        for (field, timeout) in timeouts {
            if timeout.is_zero() {
                return Err(ConfigError::invalid(
                    field,
                    format!("{:?}", timeout),
                    "Timeout must be greater than zero",
                ));
            }
        }
        Ok(())
    }
}
