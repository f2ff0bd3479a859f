//! Core HTTP operations with rate limiting and ordered mirror fallback
//!
//! Every attempt is bounded by its own timeout. A failed attempt (timeout,
//! non-2xx status, transport error) is logged and the next candidate is tried.
//! There is no retry beyond the candidate list and no backoff.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{clock::DefaultClock, state::InMemoryState, Jitter, Quota, RateLimiter};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::constants::limits;
use crate::errors::{ConfigError, ConfigResult, MirrorError, MirrorResult};

/// A successfully fetched body and the mirror URL that served it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBody {
    pub url: Url,
    pub body: String,
}

/// HTTP operations handler shared by the fetchers
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    rate_limiter: RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>,
}

impl HttpHandler {
    /// Creates a new HttpHandler with the given client and rate limiting
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `rate_limit_rps` is zero
    pub fn new(client: Client, rate_limit_rps: u32) -> ConfigResult<Self> {
        let rate_limiter = Self::build_rate_limiter(rate_limit_rps)?;
        Ok(Self {
            client,
            rate_limiter,
        })
    }

    fn build_rate_limiter(
        rate_limit_rps: u32,
    ) -> ConfigResult<RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>> {
        let rps = NonZeroU32::new(rate_limit_rps).ok_or_else(|| {
            ConfigError::invalid(
                "client.rate_limit_rps",
                rate_limit_rps,
                "Rate limit must be non-zero",
            )
        })?;
        Ok(RateLimiter::direct(Quota::per_second(rps)))
    }

    /// Fetch `url` as text within `timeout`
    ///
    /// # Errors
    ///
    /// Returns `MirrorError` on timeout, non-2xx status or transport failure
    pub async fn get_text(&self, url: &Url, timeout: Duration) -> MirrorResult<String> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(limits::RATE_LIMIT_JITTER))
            .await;

        let attempt = async {
            let response = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(|source| MirrorError::Transport {
                    url: url.to_string(),
                    source,
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(MirrorError::HttpStatus {
                    url: url.to_string(),
                    status: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or_default().to_string(),
                });
            }

            response
                .text()
                .await
                .map_err(|source| MirrorError::Transport {
                    url: url.to_string(),
                    source,
                })
        };

        match tokio::time::timeout(timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(MirrorError::Timeout {
                url: url.to_string(),
                timeout,
            }),
        }
    }

    /// Try each `(url, timeout)` in order and return the first body served
    ///
    /// # Errors
    ///
    /// Returns every attempt's failure, in order, if no candidate succeeded
    pub async fn fetch_first_available(
        &self,
        attempts: &[(Url, Duration)],
    ) -> Result<FetchedBody, Vec<MirrorError>> {
        let mut failures = Vec::with_capacity(attempts.len());

        for (position, (url, timeout)) in attempts.iter().enumerate() {
            match self.get_text(url, *timeout).await {
                Ok(body) => {
                    debug!(
                        "Fetched {} ({} bytes, attempt {}/{})",
                        url,
                        body.len(),
                        position + 1,
                        attempts.len()
                    );
                    return Ok(FetchedBody {
                        url: url.clone(),
                        body,
                    });
                }
                Err(e) => {
                    warn!(
                        "Mirror attempt {}/{} failed: {}",
                        position + 1,
                        attempts.len(),
                        e
                    );
                    failures.push(e);
                }
            }
        }

        Err(failures)
    }

    /// Get a reference to the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Summarize the last failure of a fallback sequence
pub(crate) fn last_failure_reason(failures: &[MirrorError]) -> String {
    failures
        .last()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no mirror candidates".to_string())
}
