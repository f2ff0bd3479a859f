//! Core application logic for the guji book index
//!
//! This module contains the catalog components: mirror resolution, the HTTP
//! client with ordered fallback, the catalog aggregator and search index, the
//! in-memory cache and the consumer-facing [`BookIndex`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use guji_index::app::{BookIndex, DataSource};
//! use guji_index::config::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let index = BookIndex::new(&AppConfig::default())?;
//!
//! for item in index.search_books("史記", DataSource::Cdn).await? {
//!     println!("{} [{}] {}", item.id, item.type_label(), item.name);
//! }
//!
//! if let Some(markdown) = index.fetch_content_by_id("shiji", DataSource::Cdn).await? {
//!     println!("{} bytes of content", markdown.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod catalog;
pub mod client;
pub mod mirror;
pub mod models;
pub mod service;

// Re-export main public API
pub use cache::{CacheStats, CachedCatalog, CatalogCache};
pub use catalog::{merge_catalogs, CatalogAggregator, MergedCatalog, SearchIndex};
pub use client::{
    decode_index, ClientConfig, ContentFetcher, FetchConfig, HttpHandler, IndexFetcher, MirrorClient,
};
pub use mirror::{Mirror, MirrorResolver, PathLayout};
pub use models::{status_label, CatalogItem, DataSource, RepoKind, ResourceType};
pub use service::BookIndex;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // Ensure public API is accessible
        let config = ClientConfig::default();
        assert!(config.tcp_nodelay);
        assert_eq!(DataSource::default(), DataSource::Cdn);
        assert_eq!(MirrorResolver::default().mirrors(DataSource::GitHub).len(), 2);
    }
}
