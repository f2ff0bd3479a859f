//! Draft/official catalog reconciliation
//!
//! The draft catalog is fetched to completion before the official one. A draft
//! failure is tolerated; an official failure is tolerated only if the draft
//! contributed at least one item.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::app::client::MirrorClient;
use crate::app::models::{CatalogItem, DataSource, RepoKind};
use crate::errors::{CatalogError, CatalogResult};

/// Result of merging the draft and official item lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedCatalog {
    /// Deduplicated items
    pub items: Vec<CatalogItem>,
    /// Number of insertions that replaced an existing id
    pub replaced: usize,
}

/// Merge draft and official items into one list with unique ids
///
/// Draft items are inserted first, then official items, each in order. An
/// insertion whose id is already present replaces the stored item entirely
/// but keeps its position; new ids are appended.
pub fn merge_catalogs(draft: Vec<CatalogItem>, official: Vec<CatalogItem>) -> MergedCatalog {
    let capacity = draft.len() + official.len();
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(capacity);
    let mut items: Vec<CatalogItem> = Vec::with_capacity(capacity);
    let mut replaced = 0;

    for item in draft.into_iter().chain(official) {
        match positions.get(&item.id) {
            Some(&position) => {
                items[position] = item;
                replaced += 1;
            }
            None => {
                positions.insert(item.id.clone(), items.len());
                items.push(item);
            }
        }
    }

    MergedCatalog { items, replaced }
}

/// Builds the merged catalog of a data source
#[derive(Debug, Clone)]
pub struct CatalogAggregator {
    client: Arc<MirrorClient>,
}

impl CatalogAggregator {
    /// Creates a new aggregator over the shared mirror client
    pub fn new(client: Arc<MirrorClient>) -> Self {
        Self { client }
    }

    /// Fetch the draft then the official catalog of `source` and merge them
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` if the official index failed and the
    /// draft index contributed no items
    pub async fn build_catalog(&self, source: DataSource) -> CatalogResult<Vec<CatalogItem>> {
        let (draft_items, draft_note) = match self.client.fetch_index(source, RepoKind::Draft).await {
            Ok(items) => {
                let note = if items.is_empty() {
                    "no items".to_string()
                } else {
                    format!("{} items", items.len())
                };
                (items, note)
            }
            Err(e) => {
                warn!("Failed to fetch draft index via {}: {}", source, e);
                (Vec::new(), e.to_string())
            }
        };

        let official_items = match self.client.fetch_index(source, RepoKind::Official).await {
            Ok(items) => items,
            Err(e) => {
                error!("Failed to fetch official index via {}: {}", source, e);
                if draft_items.is_empty() {
                    return Err(CatalogError::Unavailable {
                        draft: draft_note,
                        official: e.to_string(),
                    });
                }
                Vec::new()
            }
        };

        let draft_count = draft_items.len();
        let official_count = official_items.len();
        let merged = merge_catalogs(draft_items, official_items);

        info!(
            "Built {} catalog: {} draft + {} official -> {} items ({} replaced by later entries)",
            source,
            draft_count,
            official_count,
            merged.items.len(),
            merged.replaced
        );

        Ok(merged.items)
    }

    /// The mirror client used for index fetches
    pub fn client(&self) -> &Arc<MirrorClient> {
        &self.client
    }
}
