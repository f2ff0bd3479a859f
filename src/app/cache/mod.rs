//! In-memory catalog cache
//!
//! Holds the merged catalog of each data source until explicitly invalidated.
//! There is no on-disk persistence and no time-based expiry.
//!
//! # Module Organization
//!
//! - [`manager`] - the cache itself and its lazy-populate logic
//! - [`stats`] - hit/miss counters and snapshots
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use guji_index::app::cache::CatalogCache;
//! use guji_index::app::catalog::CatalogAggregator;
//! use guji_index::app::client::MirrorClient;
//! use guji_index::app::models::DataSource;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(MirrorClient::new()?);
//! let cache = CatalogCache::new(CatalogAggregator::new(client));
//!
//! // First call fetches draft + official indices, later calls are served from memory
//! let items = cache.get(DataSource::Cdn).await?;
//! println!("{} catalog items", items.len());
//!
//! for item in cache.search(DataSource::Cdn, "論語").await? {
//!     println!("{} ({})", item.name, item.type_label());
//! }
//!
//! cache.invalidate().await;
//! # Ok(())
//! # }
//! ```

pub mod manager;
pub mod stats;

pub use manager::{CachedCatalog, CatalogCache};
pub use stats::CacheStats;
