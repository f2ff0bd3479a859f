//! Consumer-facing book index operations
//!
//! [`BookIndex`] is what rendering and routing code talks to. It owns the
//! catalog cache and shares the mirror client with it; construct one and
//! inject it where needed instead of relying on global state.

use std::sync::Arc;

use tracing::debug;

use crate::app::cache::{CacheStats, CatalogCache};
use crate::app::catalog::CatalogAggregator;
use crate::app::client::MirrorClient;
use crate::app::models::{CatalogItem, DataSource};
use crate::config::AppConfig;
use crate::errors::{CatalogResult, ConfigResult, ContentResult, Result};

/// Catalog retrieval, lookup, search and content access
#[derive(Debug)]
pub struct BookIndex {
    client: Arc<MirrorClient>,
    cache: CatalogCache,
}

impl BookIndex {
    /// Build a book index from application configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `config` is invalid or the HTTP client cannot
    /// be built from it
    pub fn new(config: &AppConfig) -> ConfigResult<Self> {
        config.validate()?;
        let (client_config, fetch_config) = config.to_runtime_config();
        let client = MirrorClient::with_config(client_config, fetch_config)?;
        Ok(Self::with_client(client))
    }

    /// Build a book index around an existing mirror client
    pub fn with_client(client: MirrorClient) -> Self {
        let client = Arc::new(client);
        let cache = CatalogCache::new(CatalogAggregator::new(Arc::clone(&client)));
        Self { client, cache }
    }

    /// Every catalog item of `source`, merged and deduplicated
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` if neither catalog could be fetched
    pub async fn fetch_all_books(&self, source: DataSource) -> CatalogResult<Arc<[CatalogItem]>> {
        self.cache.get(source).await
    }

    /// The catalog item with this id, if any
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` if neither catalog could be fetched
    pub async fn find_book_by_id(&self, id: &str, source: DataSource) -> CatalogResult<Option<CatalogItem>> {
        self.cache.find_by_id(source, id).await
    }

    /// Markdown body of the item with this id; `None` if the id is unknown
    ///
    /// # Errors
    ///
    /// Returns `AppError::Catalog` if the catalog is unavailable or
    /// `AppError::Content` if both content mirrors failed
    pub async fn fetch_content_by_id(&self, id: &str, source: DataSource) -> Result<Option<String>> {
        self.client
            .content_fetcher()
            .fetch_content_by_id(&self.cache, source, id)
            .await
    }

    /// Markdown body of an item already in hand
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Unavailable` if both content mirrors failed
    pub async fn fetch_book_content(&self, item: &CatalogItem) -> ContentResult<String> {
        self.client.fetch_content(item).await
    }

    /// Items whose name or id contains `query`, ignoring case
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` if neither catalog could be fetched
    pub async fn search_books(&self, query: &str, source: DataSource) -> CatalogResult<Vec<CatalogItem>> {
        let results = self.cache.search(source, query).await?;
        debug!("Search {:?} in {} matched {} items", query, source, results.len());
        Ok(results)
    }

    /// Forget every cached catalog
    pub async fn clear_cache(&self) {
        self.cache.invalidate().await;
    }

    /// Cache contents and hit/miss counters
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// The underlying catalog cache
    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    /// The shared mirror client
    pub fn client(&self) -> &Arc<MirrorClient> {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_index_from_default_config() {
        let index = BookIndex::new(&AppConfig::default()).unwrap();
        assert_eq!(Arc::strong_count(index.client()), 2);
    }

    #[test]
    fn test_book_index_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.client.rate_limit_rps = 0;
        assert!(BookIndex::new(&config).is_err());

        let mut config = AppConfig::default();
        config.client.request_timeout = std::time::Duration::from_secs(3);
        assert!(BookIndex::new(&config).is_err());
    }
}
