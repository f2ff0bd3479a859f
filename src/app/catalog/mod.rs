//! Catalog assembly and search
//!
//! - [`aggregator`] - fetches the draft and official indices and merges them
//! - [`search`] - substring search over a merged catalog

pub mod aggregator;
pub mod search;

pub use aggregator::{merge_catalogs, CatalogAggregator, MergedCatalog};
pub use search::SearchIndex;
