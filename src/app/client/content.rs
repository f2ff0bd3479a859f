//! Markdown content retrieval
//!
//! Content bodies are larger than index documents, so the primary mirror gets
//! a longer timeout than index fetches and the secondary a longer one still.

use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::app::cache::CatalogCache;
use crate::app::client::config::FetchConfig;
use crate::app::client::http::{last_failure_reason, HttpHandler};
use crate::app::mirror::MirrorResolver;
use crate::app::models::{CatalogItem, DataSource};
use crate::errors::{ContentError, ContentResult, Result};

/// Fetches the raw Markdown body of catalog items
pub struct ContentFetcher<'a> {
    http_handler: &'a HttpHandler,
    resolver: &'a MirrorResolver,
    fetch_config: &'a FetchConfig,
}

impl<'a> ContentFetcher<'a> {
    /// Creates a new ContentFetcher
    pub fn new(
        http_handler: &'a HttpHandler,
        resolver: &'a MirrorResolver,
        fetch_config: &'a FetchConfig,
    ) -> Self {
        Self {
            http_handler,
            resolver,
            fetch_config,
        }
    }

    /// Fetch the Markdown body of `item`
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Unavailable` carrying the last mirror's failure
    /// if every mirror failed
    pub async fn fetch_content(&self, item: &CatalogItem) -> ContentResult<String> {
        let attempts: Vec<(Url, Duration)> = self
            .resolver
            .candidates(item.source, item.repo(), &item.raw_path)
            .into_iter()
            .enumerate()
            .map(|(position, url)| (url, self.fetch_config.content_timeout(position)))
            .collect();

        debug!("Fetching content of {} from {}", item.id, item.repo());

        match self.http_handler.fetch_first_available(&attempts).await {
            Ok(fetched) => Ok(fetched.body),
            Err(failures) => {
                warn!(
                    "Content for {} unavailable after {} attempts",
                    item.id,
                    failures.len()
                );
                Err(ContentError::Unavailable {
                    path: item.raw_path.clone(),
                    reason: last_failure_reason(&failures),
                })
            }
        }
    }

    /// Resolve `id` in the cached catalog of `source`, then fetch its body
    ///
    /// Returns `Ok(None)` if no catalog item has this id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Catalog` if the catalog cannot be built, or
    /// `AppError::Content` if the body cannot be fetched
    pub async fn fetch_content_by_id(
        &self,
        cache: &CatalogCache,
        source: DataSource,
        id: &str,
    ) -> Result<Option<String>> {
        let Some(item) = cache.find_by_id(source, id).await? else {
            debug!("No catalog item with id {} in {}", id, source);
            return Ok(None);
        };

        let content = self.fetch_content(&item).await?;
        Ok(Some(content))
    }
}
