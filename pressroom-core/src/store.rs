//! Content store seam and entry models.
//!
//! The store itself (loading, schema validation) is an external collaborator;
//! this module defines the shapes the aggregators consume and the async trait
//! they call through, plus an in-memory implementation used by tests and
//! embedders.

use async_trait::async_trait;
use chrono::NaiveDate;
use pressroom_types::ContentId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
}

/// A product the docs site covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub area: Option<String>,
}

/// One authored changelog entry.
///
/// `products` holds product ids, unique and in insertion order. The folder
/// product is injected once by the changelog aggregator; the entry is never
/// mutated after that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub id: ContentId,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,

    #[serde(default)]
    pub products: Vec<String>,

    /// Renderable body, passed to the external renderer untouched.
    #[serde(default)]
    pub body: String,
}

/// One release-notes collection entry (one product's notes page).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseNote {
    pub id: String,
    pub product_name: String,
    pub link: String,

    #[serde(default)]
    pub product_link: Option<String>,

    #[serde(default)]
    pub product_area: Option<String>,

    #[serde(default)]
    pub product_area_link: Option<String>,

    #[serde(default)]
    pub entries: Vec<ReleaseNoteItem>,
}

/// One dated item inside a release-notes entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseNoteItem {
    /// Calendar day, `YYYY-MM-DD`.
    pub publish_date: String,
    pub title: String,
    pub description: String,

    #[serde(default)]
    pub link: Option<String>,

    #[serde(default)]
    pub scheduled: Option<bool>,

    #[serde(default)]
    pub individual_page: bool,
}

/// Keyed collection abstraction over the external content store.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// All changelog entries, in store order.
    async fn changelog_entries(&self) -> Result<Vec<ChangelogEntry>, StoreError>;

    /// Look up a product by id.
    async fn product(&self, id: &str) -> Result<Option<Product>, StoreError>;

    /// All release-notes entries, in store order.
    async fn release_notes(&self) -> Result<Vec<ReleaseNote>, StoreError>;
}

/// In-memory [`ContentStore`] for tests and embedders.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    changelog: Vec<ChangelogEntry>,
    products: HashMap<String, Product>,
    release_notes: Vec<ReleaseNote>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_changelog(mut self, entries: Vec<ChangelogEntry>) -> Self {
        self.changelog = entries;
        self
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products.into_iter().map(|p| (p.id.clone(), p)).collect();
        self
    }

    pub fn with_release_notes(mut self, notes: Vec<ReleaseNote>) -> Self {
        self.release_notes = notes;
        self
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn changelog_entries(&self) -> Result<Vec<ChangelogEntry>, StoreError> {
        Ok(self.changelog.clone())
    }

    async fn product(&self, id: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.products.get(id).cloned())
    }

    async fn release_notes(&self) -> Result<Vec<ReleaseNote>, StoreError> {
        Ok(self.release_notes.clone())
    }
}
