//! Data models for the guji index client
//!
//! This module defines the catalog item shared with consumers, the selectors
//! used to address repositories and mirror families, and the wire shapes of
//! the JSON index documents.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::constants::{labels, origin};

/// Classification of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// A single work (作品)
    Work,
    /// A collection of works (丛编)
    Collection,
    /// A physical book or edition (书)
    Book,
}

impl ResourceType {
    /// Wire name of the resource type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Collection => "collection",
            Self::Book => "book",
        }
    }

    /// Display label shown to readers
    pub fn label(&self) -> &'static str {
        match self {
            Self::Work => labels::WORK,
            Self::Collection => labels::COLLECTION,
            Self::Book => labels::BOOK,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display label for an item's review status
pub fn status_label(is_draft: bool) -> &'static str {
    if is_draft {
        labels::DRAFT
    } else {
        labels::OFFICIAL
    }
}

/// Which of the two catalog repositories a resource lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoKind {
    /// Unreviewed staging catalog
    Draft,
    /// Reviewed, published catalog
    Official,
}

impl RepoKind {
    /// Repository for an item's provenance flag
    pub fn from_is_draft(is_draft: bool) -> Self {
        if is_draft {
            Self::Draft
        } else {
            Self::Official
        }
    }

    /// Whether items from this repository are drafts
    pub fn is_draft(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Repository name under the catalog organisation
    pub fn repo_name(&self) -> &'static str {
        match self {
            Self::Draft => origin::DRAFT_REPO,
            Self::Official => origin::OFFICIAL_REPO,
        }
    }
}

impl fmt::Display for RepoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => f.write_str("draft"),
            Self::Official => f.write_str("official"),
        }
    }
}

/// Data-source selector: the mirror family a catalog is retrieved through
///
/// Each source has its own cache entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// jsDelivr edge network first, jsDelivr CDN second
    #[default]
    Cdn,
    /// GitHub raw content first, jsDelivr CDN second
    #[serde(rename = "github")]
    GitHub,
}

impl DataSource {
    /// All known sources
    pub const ALL: [DataSource; 2] = [DataSource::Cdn, DataSource::GitHub];

    /// Logical source name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cdn => "cdn",
            Self::GitHub => "github",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cdn" | "jsdelivr" => Ok(Self::Cdn),
            "github" => Ok(Self::GitHub),
            other => Err(format!("unknown data source '{}'", other)),
        }
    }
}

/// A single indexed resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Identifier, unique within one provenance
    pub id: String,
    /// Display title
    pub name: String,
    /// Which source array the record came from
    pub resource_type: ResourceType,
    /// True if parsed from the draft catalog
    pub is_draft: bool,
    /// Markdown body path relative to the repository root
    pub raw_path: String,
    /// Mirror family the item was retrieved through
    pub source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,
}

impl CatalogItem {
    /// Repository this item's body is served from
    pub fn repo(&self) -> RepoKind {
        RepoKind::from_is_draft(self.is_draft)
    }

    /// Display label of the resource type
    pub fn type_label(&self) -> &'static str {
        self.resource_type.label()
    }

    /// Display label of the review status
    pub fn status_label(&self) -> &'static str {
        status_label(self.is_draft)
    }
}

/// Book record as published in the index
#[derive(Debug, Clone, Deserialize)]
pub struct RawBook {
    #[serde(deserialize_with = "non_blank")]
    pub id: String,
    pub title: Option<String>,
    pub name: Option<String>,
    pub path: String,
    pub author: Option<String>,
    pub collection: Option<String>,
    pub year: Option<String>,
    pub holder: Option<String>,
}

/// Collection record as published in the index
#[derive(Debug, Clone, Deserialize)]
pub struct RawCollection {
    #[serde(deserialize_with = "non_blank")]
    pub id: String,
    pub title: Option<String>,
    pub name: Option<String>,
    pub path: String,
    pub author: Option<String>,
    pub year: Option<String>,
}

/// Work record as published in the index
#[derive(Debug, Clone, Deserialize)]
pub struct RawWork {
    #[serde(deserialize_with = "non_blank")]
    pub id: String,
    pub title: Option<String>,
    pub name: Option<String>,
    pub path: String,
    pub author: Option<String>,
    pub year: Option<String>,
}

/// The wire shape of an `index.json` document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCatalogDocument {
    #[serde(default)]
    pub books: RecordSet<RawBook>,
    #[serde(default)]
    pub collections: RecordSet<RawCollection>,
    #[serde(default)]
    pub works: RecordSet<RawWork>,
}

impl RawCatalogDocument {
    /// Convert every record into a catalog item
    ///
    /// Books come first, then collections, then works, each in document order.
    ///
    /// # Errors
    ///
    /// Returns the reason if a record has neither `title` nor `name`
    pub fn into_items(self, repo: RepoKind, source: DataSource) -> Result<Vec<CatalogItem>, String> {
        let is_draft = repo.is_draft();
        let mut items = Vec::with_capacity(self.len());

        for book in self.books.0 {
            items.push(CatalogItem {
                name: display_title(&book.id, book.title, book.name)?,
                id: book.id,
                resource_type: ResourceType::Book,
                is_draft,
                raw_path: book.path,
                source,
                author: book.author,
                collection: book.collection,
                year: book.year,
                holder: book.holder,
            });
        }

        for collection in self.collections.0 {
            items.push(CatalogItem {
                name: display_title(&collection.id, collection.title, collection.name)?,
                id: collection.id,
                resource_type: ResourceType::Collection,
                is_draft,
                raw_path: collection.path,
                source,
                author: collection.author,
                collection: None,
                year: collection.year,
                holder: None,
            });
        }

        for work in self.works.0 {
            items.push(CatalogItem {
                name: display_title(&work.id, work.title, work.name)?,
                id: work.id,
                resource_type: ResourceType::Work,
                is_draft,
                raw_path: work.path,
                source,
                author: work.author,
                collection: None,
                year: work.year,
                holder: None,
            });
        }

        Ok(items)
    }

    /// Total number of records across all arrays
    pub fn len(&self) -> usize {
        self.books.0.len() + self.collections.0.len() + self.works.0.len()
    }

    /// True if the document holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Records of one resource type, in document order
///
/// Accepts either a JSON array of records or a JSON object mapping arbitrary
/// keys to records; `null` is an empty set.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet<T>(pub Vec<T>);

impl<T> Default for RecordSet<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for RecordSet<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RecordSetVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for RecordSetVisitor<T> {
            type Value = RecordSet<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array or an object of catalog records")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(RecordSet::default())
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(RecordSet::default())
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut records = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(record) = seq.next_element()? {
                    records.push(record);
                }
                Ok(RecordSet(records))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut records = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((_key, record)) = map.next_entry::<String, T>()? {
                    records.push(record);
                }
                Ok(RecordSet(records))
            }
        }

        deserializer.deserialize_any(RecordSetVisitor(PhantomData))
    }
}

/// `title` wins over `name`; a record needs one of them
fn display_title(id: &str, title: Option<String>, name: Option<String>) -> Result<String, String> {
    title
        .or(name)
        .ok_or_else(|| format!("record {} has neither a title nor a name", id))
}

fn non_blank<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    if value.trim().is_empty() {
        return Err(de::Error::custom("id must not be blank"));
    }
    Ok(value)
}
