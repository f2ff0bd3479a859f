//! Memoized catalog storage keyed by data source
//!
//! Entries are populated lazily on first request and only removed by
//! [`CatalogCache::invalidate`]; they never expire on a timer. The map lock is
//! never held across network I/O, so two cold callers may both build the
//! catalog. The results are equivalent and the last write wins. A build that
//! straddles an invalidation is returned to its caller but not stored.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::app::catalog::{CatalogAggregator, SearchIndex};
use crate::app::models::{CatalogItem, DataSource};
use crate::errors::CatalogResult;

use super::stats::{CacheCounters, CacheStats};

/// One cached merged catalog
#[derive(Debug)]
pub struct CachedCatalog {
    /// Search index over the immutable item list
    pub index: SearchIndex,
    /// When the catalog was built
    pub fetched_at: DateTime<Utc>,
}

impl CachedCatalog {
    fn new(items: Vec<CatalogItem>) -> Self {
        Self {
            index: SearchIndex::new(items.into()),
            fetched_at: Utc::now(),
        }
    }

    /// The cached items, in merged order
    pub fn items(&self) -> &Arc<[CatalogItem]> {
        self.index.items()
    }
}

/// In-memory catalog cache
#[derive(Debug)]
pub struct CatalogCache {
    aggregator: CatalogAggregator,
    entries: RwLock<HashMap<DataSource, Arc<CachedCatalog>>>,
    /// Bumped by every invalidation, under the write lock
    generation: AtomicU64,
    counters: CacheCounters,
}

impl CatalogCache {
    /// Create an empty cache that builds catalogs with `aggregator`
    pub fn new(aggregator: CatalogAggregator) -> Self {
        Self {
            aggregator,
            entries: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
            counters: CacheCounters::default(),
        }
    }

    /// Cached entry for `source`, building it on a miss
    async fn entry(&self, source: DataSource) -> CatalogResult<Arc<CachedCatalog>> {
        if let Some(entry) = self.entries.read().await.get(&source) {
            self.counters.record_hit();
            return Ok(Arc::clone(entry));
        }

        self.counters.record_miss();
        let generation = self.generation.load(Ordering::Acquire);
        debug!("Catalog cache miss for {}", source);

        let items = match self.aggregator.build_catalog(source).await {
            Ok(items) => {
                self.counters.record_build(true);
                items
            }
            Err(e) => {
                self.counters.record_build(false);
                return Err(e);
            }
        };

        let entry = Arc::new(CachedCatalog::new(items));
        let mut entries = self.entries.write().await;
        if self.generation.load(Ordering::Acquire) == generation {
            entries.insert(source, Arc::clone(&entry));
            debug!("Cached {} items for {}", entry.index.len(), source);
        } else {
            debug!("Cache invalidated during {} build, not storing it", source);
        }
        Ok(entry)
    }

    /// The merged catalog of `source`
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` if the catalog is not cached and
    /// cannot be built
    pub async fn get(&self, source: DataSource) -> CatalogResult<Arc<[CatalogItem]>> {
        Ok(Arc::clone(self.entry(source).await?.items()))
    }

    /// Drop every cached catalog
    pub async fn invalidate(&self) {
        let mut entries = self.entries.write().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        let dropped = entries.len();
        entries.clear();
        info!("Catalog cache cleared ({} sources dropped)", dropped);
    }

    /// Item with exactly this id, or `None`
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` if the catalog cannot be built
    pub async fn find_by_id(&self, source: DataSource, id: &str) -> CatalogResult<Option<CatalogItem>> {
        Ok(self.entry(source).await?.index.find_by_id(id).cloned())
    }

    /// Items whose name or id contains `query`, ignoring case
    ///
    /// An empty or whitespace-only query returns the whole catalog in order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` if the catalog cannot be built
    pub async fn search(&self, source: DataSource, query: &str) -> CatalogResult<Vec<CatalogItem>> {
        Ok(self.entry(source).await?.index.search(query))
    }

    /// Whether `source` currently has a cached catalog
    pub async fn is_cached(&self, source: DataSource) -> bool {
        self.entries.read().await.contains_key(&source)
    }

    /// When the cached catalog of `source` was built
    pub async fn fetched_at(&self, source: DataSource) -> Option<DateTime<Utc>> {
        self.entries
            .read()
            .await
            .get(&source)
            .map(|entry| entry.fetched_at)
    }

    /// Snapshot of cache contents and counters
    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.read().await;
        let cached_items = entries.values().map(|entry| entry.index.len()).sum();
        self.counters.snapshot(entries.len(), cached_items)
    }

    /// The aggregator used to build catalogs
    pub fn aggregator(&self) -> &CatalogAggregator {
        &self.aggregator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::client::MirrorClient;

    fn empty_cache() -> CatalogCache {
        let client = Arc::new(MirrorClient::new().unwrap());
        CatalogCache::new(CatalogAggregator::new(client))
    }

    #[tokio::test]
    async fn test_new_cache_is_empty() {
        let cache = empty_cache();
        assert!(!cache.is_cached(DataSource::Cdn).await);
        assert!(cache.fetched_at(DataSource::GitHub).await.is_none());
        assert_eq!(cache.stats().await, CacheStats::default());
    }

    #[tokio::test]
    async fn test_invalidate_empty_cache() {
        let cache = empty_cache();
        cache.invalidate().await;
        assert_eq!(cache.stats().await.cached_sources, 0);
    }
}
