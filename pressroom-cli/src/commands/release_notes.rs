//! Release notes dump command.

use crate::github::GithubClient;
use anyhow::{Context, Result};
use pressroom_core::release_notes::{get_release_notes, ReleaseNotesOptions};
use pressroom_core::store::{MemoryStore, ReleaseNote};
use pressroom_core::Config;
use std::path::Path;

/// Aggregate release notes and print the grouped view as JSON.
///
/// Local entries are loaded from a YAML file when given; `external_only`
/// synthesizes the single SDK pseudo-entry from the GitHub release feed
/// instead.
pub async fn release_notes(
    config: &Config,
    data: Option<&Path>,
    deprecations_only: bool,
    external_only: bool,
) -> Result<()> {
    let notes: Vec<ReleaseNote> = match data {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_yaml::from_str(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => Vec::new(),
    };

    let store = MemoryStore::new().with_release_notes(notes);
    let feed = GithubClient::new("", "", config.external_feed.url.clone())
        .context("failed to build GitHub client")?;

    let opts = ReleaseNotesOptions {
        filter: None,
        external_only,
        deprecations_only,
    };

    let view = get_release_notes(&store, &feed, &config.external_feed_config(), &opts).await?;

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
