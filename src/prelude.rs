//! Prelude module for the guji index library
//!
//! This module re-exports the most commonly used items from the library,
//! providing a convenient way to import everything needed for typical usage
//! with a single `use guji_index::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use guji_index::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load(None).await?;
//!     init_logging(&config.logging)?;
//!
//!     let index = BookIndex::new(&config)?;
//!     let books = index.fetch_all_books(DataSource::default()).await?;
//!     println!("{} catalog items", books.len());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Essential app components that are used in most integrations
pub use crate::app::{
    BookIndex, CacheStats, CatalogItem, ClientConfig, DataSource, FetchConfig, MirrorClient,
    MirrorResolver, RepoKind, ResourceType,
};

// Configuration and logging setup
pub use crate::config::AppConfig;
pub use crate::logging::init_logging;
