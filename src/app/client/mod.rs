//! HTTP client for the catalog mirrors
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and per-attempt timeouts
//! - `http`: core HTTP operations with rate limiting and ordered fallback
//! - `index`: index document retrieval and decoding
//! - `content`: Markdown content retrieval

use tracing::info;

use crate::app::mirror::MirrorResolver;
use crate::app::models::{CatalogItem, DataSource, RepoKind};
use crate::errors::{ConfigResult, ContentResult, IndexResult};

pub mod config;
pub mod content;
pub mod http;
pub mod index;

pub use config::{ClientConfig, FetchConfig};
pub use content::ContentFetcher;
pub use http::{FetchedBody, HttpHandler};
pub use index::{decode_index, IndexFetcher};

/// HTTP client for the catalog mirrors
///
/// Holds the shared HTTP handler, the mirror table and the fetch timeouts.
/// Share it between components behind an `Arc`.
#[derive(Debug)]
pub struct MirrorClient {
    http_handler: HttpHandler,
    resolver: MirrorResolver,
    fetch_config: FetchConfig,
}

impl MirrorClient {
    /// Creates a client with default configuration and the built-in mirrors
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the HTTP client cannot be built
    pub fn new() -> ConfigResult<Self> {
        Self::with_config(ClientConfig::default(), FetchConfig::default())
    }

    /// Creates a client with custom configuration and the built-in mirrors
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a timeout is zero, the rate limit is zero, or
    /// the HTTP client cannot be built
    pub fn with_config(client_config: ClientConfig, fetch_config: FetchConfig) -> ConfigResult<Self> {
        fetch_config.validate()?;
        let client = client_config.build_http_client()?;
        let http_handler = HttpHandler::new(client, client_config.rate_limit_rps)?;

        info!(
            "Created mirror client (index timeout {:?}, content timeouts {:?}/{:?})",
            fetch_config.index_timeout,
            fetch_config.content_primary_timeout,
            fetch_config.content_fallback_timeout
        );

        Ok(Self {
            http_handler,
            resolver: MirrorResolver::default(),
            fetch_config,
        })
    }

    /// Replace the mirror table
    pub fn with_resolver(mut self, resolver: MirrorResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Index fetcher bound to this client
    pub fn index_fetcher(&self) -> IndexFetcher<'_> {
        IndexFetcher::new(
            &self.http_handler,
            &self.resolver,
            self.fetch_config.index_timeout,
        )
    }

    /// Content fetcher bound to this client
    pub fn content_fetcher(&self) -> ContentFetcher<'_> {
        ContentFetcher::new(&self.http_handler, &self.resolver, &self.fetch_config)
    }

    /// Fetch and decode the index of `repo` through `source`
    ///
    /// # Errors
    ///
    /// See [`IndexFetcher::fetch_index`]
    pub async fn fetch_index(&self, source: DataSource, repo: RepoKind) -> IndexResult<Vec<CatalogItem>> {
        self.index_fetcher().fetch_index(source, repo).await
    }

    /// Fetch the Markdown body of `item`
    ///
    /// # Errors
    ///
    /// See [`ContentFetcher::fetch_content`]
    pub async fn fetch_content(&self, item: &CatalogItem) -> ContentResult<String> {
        self.content_fetcher().fetch_content(item).await
    }

    /// Mirror table in use
    pub fn resolver(&self) -> &MirrorResolver {
        &self.resolver
    }

    /// Per-attempt timeouts in use
    pub fn fetch_config(&self) -> &FetchConfig {
        &self.fetch_config
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::errors::ConfigError;

    #[test]
    fn test_default_client_creation() {
        let client = MirrorClient::new().unwrap();
        assert_eq!(client.fetch_config(), &FetchConfig::default());
        assert_eq!(client.resolver().mirrors(DataSource::Cdn).len(), 2);
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let zero_rate = ClientConfig {
            rate_limit_rps: 0,
            ..Default::default()
        };
        let err = MirrorClient::with_config(zero_rate, FetchConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let zero_timeout = FetchConfig {
            content_fallback_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(MirrorClient::with_config(ClientConfig::default(), zero_timeout).is_err());
    }
}
