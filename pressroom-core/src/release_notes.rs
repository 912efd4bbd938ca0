//! Release-note aggregation.
//!
//! Merges locally authored release-notes entries with an externally fetched
//! release list (the SDK's published releases), flattens everything into
//! uniform per-day records, and groups them by calendar day for display.

use crate::store::{ContentStore, ReleaseNote, ReleaseNoteItem, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReleaseNotesError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("received {status} response from the release feed")]
    Upstream { status: u16 },

    #[error("malformed release record: {0}")]
    MalformedRecord(String),

    #[error("release feed transport error: {0}")]
    Transport(String),
}

/// One record from the external release feed.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseRecord {
    pub published_at: DateTime<Utc>,
    pub name: String,
    pub body: String,
}

/// External release feed. Implementations must drain every page before
/// returning; callers never see partial pages.
#[async_trait]
pub trait ReleaseFeed: Send + Sync {
    async fn releases(&self) -> Result<Vec<ReleaseRecord>, ReleaseNotesError>;
}

/// Metadata for the pseudo-entry synthesized from the external feed.
#[derive(Debug, Clone)]
pub struct ExternalFeedConfig {
    /// Only records whose name starts with this prefix are retained.
    pub name_prefix: String,

    /// Per-release link template; `{version}` is replaced by the portion of
    /// the record name after the prefix.
    pub tag_link_template: String,

    pub note_id: String,
    pub product_name: String,
    pub link: String,
    pub product_link: Option<String>,
    pub product_area: Option<String>,
    pub product_area_link: Option<String>,
}

impl Default for ExternalFeedConfig {
    fn default() -> Self {
        Self {
            name_prefix: "wrangler@".to_string(),
            tag_link_template:
                "https://github.com/cloudflare/workers-sdk/releases/tag/wrangler%40{version}"
                    .to_string(),
            note_id: "wrangler".to_string(),
            product_name: "wrangler".to_string(),
            link: "/workers/platform/changelog/wrangler/".to_string(),
            product_link: Some("/workers/wrangler/".to_string()),
            product_area: Some("Developer platform".to_string()),
            product_area_link: Some("/workers/platform/changelog/platform/".to_string()),
        }
    }
}

/// Aggregation mode and switches.
///
/// `external_only` and `filter` are mutually exclusive modes; with neither
/// set, every entry in the store is loaded. `deprecations_only` selects the
/// deprecations bucket instead of everything else.
#[derive(Default)]
pub struct ReleaseNotesOptions<'a> {
    pub filter: Option<&'a (dyn Fn(&ReleaseNote) -> bool + Sync)>,
    pub external_only: bool,
    pub deprecations_only: bool,
}

/// Identifier of the deprecations bucket in the release-notes collection.
const DEPRECATIONS_ID: &str = "api-deprecations";

/// One flattened release-note record, uniform across local and external
/// sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatReleaseNote {
    pub product: String,
    pub link: String,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    pub description: String,
    pub title: String,
    pub scheduled: Option<bool>,
    pub product_link: Option<String>,
    pub product_area: Option<String>,
    pub product_area_link: Option<String>,
    /// Per-entry page link, when the entry has its own page.
    pub individual_page_link: Option<String>,
}

/// The aggregated view: distinct products/areas plus day-grouped entries.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseNotesView {
    pub products: Vec<String>,
    pub product_areas: Vec<String>,
    /// (date, entries) pairs, descending by date key.
    pub grouped: Vec<(String, Vec<FlatReleaseNote>)>,
}

/// Aggregate release notes per the selected mode.
pub async fn get_release_notes(
    store: &dyn ContentStore,
    feed: &dyn ReleaseFeed,
    feed_config: &ExternalFeedConfig,
    opts: &ReleaseNotesOptions<'_>,
) -> Result<ReleaseNotesView, ReleaseNotesError> {
    let mut notes = if opts.external_only {
        vec![external_note(feed, feed_config).await?]
    } else if let Some(filter) = opts.filter {
        store
            .release_notes()
            .await?
            .into_iter()
            .filter(|n| filter(n))
            .collect()
    } else {
        store.release_notes().await?
    };

    if opts.deprecations_only {
        notes.retain(|n| n.id == DEPRECATIONS_ID);
    } else {
        notes.retain(|n| n.id != DEPRECATIONS_ID);
    }

    let products = dedup(notes.iter().map(|n| n.product_name.clone()));
    let product_areas = dedup(notes.iter().filter_map(|n| n.product_area.clone()));

    let flat: Vec<FlatReleaseNote> = notes
        .iter()
        .flat_map(|note| note.entries.iter().map(|entry| flatten(note, entry)))
        .collect();

    let mut by_date: BTreeMap<String, Vec<FlatReleaseNote>> = BTreeMap::new();
    for entry in flat {
        by_date.entry(entry.date.clone()).or_default().push(entry);
    }

    // Descending by date key; for YYYY-MM-DD keys string order is
    // chronological order.
    let grouped = by_date.into_iter().rev().collect();

    Ok(ReleaseNotesView {
        products,
        product_areas,
        grouped,
    })
}

fn flatten(note: &ReleaseNote, entry: &ReleaseNoteItem) -> FlatReleaseNote {
    FlatReleaseNote {
        product: note.product_name.clone(),
        link: note.link.clone(),
        date: entry.publish_date.clone(),
        description: entry.description.clone(),
        title: entry.title.clone(),
        scheduled: entry.scheduled,
        product_link: note.product_link.clone(),
        product_area: note.product_area.clone(),
        product_area_link: note.product_area_link.clone(),
        individual_page_link: if entry.individual_page {
            entry.link.clone()
        } else {
            None
        },
    }
}

/// Synthesize one release-notes entry from the external feed.
async fn external_note(
    feed: &dyn ReleaseFeed,
    config: &ExternalFeedConfig,
) -> Result<ReleaseNote, ReleaseNotesError> {
    let releases = feed.releases().await?;

    tracing::debug!("fetched {} external release records", releases.len());

    let entries = releases
        .iter()
        .filter(|r| r.name.starts_with(&config.name_prefix))
        .map(|release| {
            let version = &release.name[config.name_prefix.len()..];
            ReleaseNoteItem {
                publish_date: release.published_at.format("%Y-%m-%d").to_string(),
                title: version.to_string(),
                description: release.body.clone(),
                link: Some(config.tag_link_template.replace("{version}", version)),
                scheduled: None,
                individual_page: false,
            }
        })
        .collect();

    Ok(ReleaseNote {
        id: config.note_id.clone(),
        product_name: config.product_name.clone(),
        link: config.link.clone(),
        product_link: config.product_link.clone(),
        product_area: config.product_area.clone(),
        product_area_link: config.product_area_link.clone(),
        entries,
    })
}

/// Deduplicate preserving first-seen order.
fn dedup(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}
