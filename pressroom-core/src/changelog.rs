//! Changelog aggregation and feed item construction.
//!
//! Entries are authored under a product folder (`workers/2025-02-05-title`).
//! Aggregation validates the folder against the product collection, injects
//! the folder product into the entry's product list, and rewrites the entry
//! id to its display form (folder dropped). Feed construction renders each
//! entry and pipes the fragment through the sanitizer and link rewriter.

use crate::html::Fragment;
use crate::links::rewrite_links;
use crate::paths::{resolve, PathPolicy};
use crate::sanitize::{sanitize, SanitizePolicy};
use crate::store::{ChangelogEntry, ContentStore, StoreError};
use async_trait::async_trait;
use chrono::NaiveDate;
use pressroom_types::ContentId;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("{entry} is not located inside a valid product folder (received {folder})")]
    UnknownProductFolder { entry: String, folder: String },

    #[error("unknown product referenced by changelog entry: {id}")]
    UnknownProduct { id: String },

    #[error("renderer error: {0}")]
    Render(String),
}

/// External renderer turning an entry body into a parsed markup fragment.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, entry: &ChangelogEntry) -> Result<Fragment, ChangelogError>;
}

/// A feed-ready record derived from one changelog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyndicationItem {
    pub title: String,
    /// Sanitized HTML fragment.
    pub description: String,
    pub pub_date: NaiveDate,
    pub categories: Vec<String>,
    pub link: String,
    /// First associated product, for downstream feed filtering.
    pub primary_product: String,
}

/// Load, validate, and sort changelog entries.
///
/// Each entry's folder (first path segment) must name a real product, or the
/// whole aggregation fails with no partial output. The folder product is
/// appended to the entry's product list if absent. The returned entries carry
/// their display id (folder dropped) and are sorted descending by date with a
/// stable sort.
pub async fn get_changelogs(
    store: &dyn ContentStore,
    filter: Option<&(dyn Fn(&ChangelogEntry) -> bool + Sync)>,
) -> Result<Vec<ChangelogEntry>, ChangelogError> {
    let mut entries = store.changelog_entries().await?;

    if let Some(filter) = filter {
        entries.retain(|e| filter(e));
    }

    let mut out = Vec::with_capacity(entries.len());

    for mut entry in entries {
        let (folder, display_id) = match entry.id.as_str().split_once('/') {
            Some((folder, rest)) => (folder.to_string(), rest.to_string()),
            None => (entry.id.as_str().to_string(), String::new()),
        };

        if store.product(&folder).await?.is_none() {
            return Err(ChangelogError::UnknownProductFolder {
                entry: entry.id.to_string(),
                folder,
            });
        }

        if !entry.products.iter().any(|p| *p == folder) {
            entry.products.push(folder);
        }

        entry.id = ContentId::new(display_id);
        out.push(entry);
    }

    tracing::debug!("aggregated {} changelog entries", out.len());

    // Stable: equal dates keep their pre-sort relative order.
    out.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(out)
}

/// Build feed items from aggregated changelog entries.
///
/// Each body is rendered by the external renderer, sanitized, link-rewritten
/// against `origin`, and serialized to a trimmed string. The item link is the
/// canonical path of the entry's display id under the changelog root.
pub async fn rss_items(
    entries: &[ChangelogEntry],
    store: &dyn ContentStore,
    renderer: &dyn Renderer,
    sanitize_policy: &SanitizePolicy,
    path_policy: &PathPolicy,
    origin: &str,
) -> Result<Vec<SyndicationItem>, ChangelogError> {
    let mut items = Vec::with_capacity(entries.len());

    for entry in entries {
        let mut product_names = Vec::with_capacity(entry.products.len());
        for id in &entry.products {
            let product = store
                .product(id)
                .await?
                .ok_or_else(|| ChangelogError::UnknownProduct { id: id.clone() })?;
            product_names.push(product.name);
        }

        let fragment = renderer.render(entry).await?;
        let fragment = sanitize(&fragment, sanitize_policy);
        let fragment = rewrite_links(&fragment, origin);
        let description = fragment.serialize().trim().to_string();

        let link_id = ContentId::new(format!(
            "{}/{}",
            path_policy.legacy_changelog_segment,
            entry.id.as_str()
        ));
        let link = format!("/{}", resolve(&link_id, path_policy));

        let primary_product = product_names.first().cloned().unwrap_or_default();

        items.push(SyndicationItem {
            title: format!("{} - {}", product_names.join(", "), entry.title),
            description,
            pub_date: entry.date,
            categories: product_names,
            link,
            primary_product,
        });
    }

    Ok(items)
}
