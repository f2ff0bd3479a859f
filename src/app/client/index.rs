//! Index document retrieval and decoding
//!
//! One `index.json` per repository. Candidates are tried in mirror order,
//! each with the same timeout; the first body served is decoded into typed
//! catalog items.

use std::time::Duration;

use serde::de::IgnoredAny;
use serde_json::error::Category;
use tracing::debug;
use url::Url;

use crate::app::client::http::{last_failure_reason, HttpHandler};
use crate::app::mirror::MirrorResolver;
use crate::app::models::{CatalogItem, DataSource, RawCatalogDocument, RepoKind};
use crate::errors::{IndexError, IndexResult};

/// Fetches and decodes catalog index documents
pub struct IndexFetcher<'a> {
    http_handler: &'a HttpHandler,
    resolver: &'a MirrorResolver,
    timeout: Duration,
}

impl<'a> IndexFetcher<'a> {
    /// Creates a new IndexFetcher using `timeout` for every mirror attempt
    pub fn new(http_handler: &'a HttpHandler, resolver: &'a MirrorResolver, timeout: Duration) -> Self {
        Self {
            http_handler,
            resolver,
            timeout,
        }
    }

    /// Fetch the index of `repo` through the mirrors of `source`
    ///
    /// # Errors
    ///
    /// Returns `IndexError::AllMirrorsFailed` if no mirror served the document,
    /// or `IndexError::MalformedResponse` if the served body does not decode
    pub async fn fetch_index(&self, source: DataSource, repo: RepoKind) -> IndexResult<Vec<CatalogItem>> {
        let attempts: Vec<(Url, Duration)> = self
            .resolver
            .index_candidates(source, repo)
            .into_iter()
            .map(|url| (url, self.timeout))
            .collect();

        debug!(
            "Fetching {} index via {} ({} candidates)",
            repo,
            source,
            attempts.len()
        );

        let fetched = self
            .http_handler
            .fetch_first_available(&attempts)
            .await
            .map_err(|failures| IndexError::AllMirrorsFailed {
                repo,
                attempts: failures.len(),
                reason: last_failure_reason(&failures),
            })?;

        let items = decode_index(&fetched.body, &fetched.url, repo, source)?;
        debug!("Decoded {} {} items from {}", items.len(), repo, fetched.url);
        Ok(items)
    }
}

/// Decode an index document body into catalog items
///
/// # Errors
///
/// Returns `IndexError::MalformedResponse` if the body is not a JSON object
/// or any record lacks a required field
pub fn decode_index(
    body: &str,
    url: &Url,
    repo: RepoKind,
    source: DataSource,
) -> IndexResult<Vec<CatalogItem>> {
    let malformed = |reason: String| IndexError::MalformedResponse {
        url: url.to_string(),
        reason,
    };

    // decoded straight from text so keyed record sets keep document order
    if !body.trim_start().starts_with('{') {
        return Err(match serde_json::from_str::<IgnoredAny>(body) {
            Err(e) => malformed(format!("invalid JSON: {}", e)),
            Ok(_) => malformed("expected a JSON object at the top level".to_string()),
        });
    }

    let document: RawCatalogDocument = serde_json::from_str(body).map_err(|e| match e.classify() {
        Category::Data => malformed(format!("unexpected document shape: {}", e)),
        Category::Io | Category::Syntax | Category::Eof => malformed(format!("invalid JSON: {}", e)),
    })?;

    document.into_items(repo, source).map_err(malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::ResourceType;

    fn index_url() -> Url {
        Url::parse("https://cdn.jsdelivr.net/gh/open-guji/book-index@main/index.json").unwrap()
    }

    #[test]
    fn test_decode_tags_provenance() {
        let body = r#"{
            "books": {"b1": {"id": "b1", "title": "Draft Title", "path": "b1.md"}},
            "collections": {"c1": {"id": "c1", "title": "丛书", "path": "c1.md"}},
            "works": {"w1": {"id": "w1", "title": "論語", "path": "w1.md"}}
        }"#;

        let items = decode_index(body, &index_url(), RepoKind::Draft, DataSource::Cdn).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].resource_type, ResourceType::Book);
        assert_eq!(items[1].resource_type, ResourceType::Collection);
        assert_eq!(items[2].resource_type, ResourceType::Work);
        assert!(items.iter().all(|item| item.is_draft));
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        let err = decode_index("<html>502</html>", &index_url(), RepoKind::Official, DataSource::Cdn)
            .unwrap_err();
        match err {
            IndexError::MalformedResponse { url, reason } => {
                assert_eq!(url, index_url().to_string());
                assert!(reason.starts_with("invalid JSON"));
            }
            other => panic!("Expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_non_object_document() {
        let err = decode_index("[]", &index_url(), RepoKind::Official, DataSource::Cdn).unwrap_err();
        assert!(matches!(err, IndexError::MalformedResponse { .. }));
        assert!(err.to_string().contains("expected a JSON object"));
    }

    #[test]
    fn test_decode_rejects_incomplete_record() {
        let body = r#"{"works": [{"id": "w1", "path": "w1.md"}]}"#;
        let err = decode_index(body, &index_url(), RepoKind::Official, DataSource::Cdn).unwrap_err();
        assert!(matches!(err, IndexError::MalformedResponse { .. }));
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_decode_accepts_title_and_name_together() {
        let body = r#"{"books":[{"id":"b1","title":"T","name":"N","path":"b1.md"}]}"#;
        let items = decode_index(body, &index_url(), RepoKind::Official, DataSource::Cdn).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "T");
    }

    #[test]
    fn test_decode_keeps_keyed_record_order() {
        let body = r#"{"works": {"z": {"id": "w2", "title": "B", "path": "w2.md"},
                                 "a": {"id": "w1", "title": "A", "path": "w1.md"}}}"#;
        let items = decode_index(body, &index_url(), RepoKind::Official, DataSource::Cdn).unwrap();
        let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["w2", "w1"]);
    }

    #[test]
    fn test_decode_empty_document() {
        let items = decode_index("{}", &index_url(), RepoKind::Official, DataSource::Cdn).unwrap();
        assert!(items.is_empty());
    }
}
