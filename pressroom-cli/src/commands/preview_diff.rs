//! CI preview diff command.

use crate::github::GithubClient;
use anyhow::{Context, Result};
use pressroom_core::diff::{run_report, ReportOutcome};
use pressroom_core::Config;

/// Run the preview diff reporter against one pull request.
///
/// Any fatal condition (missing preview comment, tracker failure) propagates
/// as a non-zero exit; an empty diff is a successful no-op.
pub async fn preview_diff(config: &Config, repo: &str, pr: u64, token: &str) -> Result<()> {
    let client = GithubClient::new(repo, token, config.external_feed.url.clone())
        .context("failed to build GitHub client")?;

    let outcome = run_report(&client, pr, &config.reporter_config()).await?;

    match outcome {
        ReportOutcome::NoChanges => {
            tracing::info!("no tracked content changes on {repo}#{pr}; nothing posted")
        }
        ReportOutcome::Created => tracing::info!("created diff-table comment on {repo}#{pr}"),
        ReportOutcome::Updated => tracing::info!("updated diff-table comment on {repo}#{pr}"),
    }

    Ok(())
}
