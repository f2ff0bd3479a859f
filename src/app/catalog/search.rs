//! In-memory substring search over a merged catalog

use std::sync::Arc;

use crate::app::models::CatalogItem;

/// Lower-cased match keys of one item
#[derive(Debug, Clone)]
struct SearchKey {
    name: String,
    id: String,
}

/// Case-insensitive name/id search over a shared item list
#[derive(Debug, Clone)]
pub struct SearchIndex {
    items: Arc<[CatalogItem]>,
    keys: Vec<SearchKey>,
}

impl SearchIndex {
    /// Build the index; keys are lower-cased once, up front
    pub fn new(items: Arc<[CatalogItem]>) -> Self {
        let keys = items
            .iter()
            .map(|item| SearchKey {
                name: item.name.to_lowercase(),
                id: item.id.to_lowercase(),
            })
            .collect();

        Self { items, keys }
    }

    /// The indexed items, in catalog order
    pub fn items(&self) -> &Arc<[CatalogItem]> {
        &self.items
    }

    /// Items whose name or id contains `query`, ignoring case
    ///
    /// An empty or whitespace-only query returns every item. Order is kept.
    pub fn search(&self, query: &str) -> Vec<CatalogItem> {
        if query.trim().is_empty() {
            return self.items.to_vec();
        }

        let needle = query.to_lowercase();
        self.items
            .iter()
            .zip(&self.keys)
            .filter(|(_, key)| key.name.contains(&needle) || key.id.contains(&needle))
            .map(|(item, _)| item.clone())
            .collect()
    }

    /// Exact id lookup
    pub fn find_by_id(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Number of indexed items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the catalog holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
