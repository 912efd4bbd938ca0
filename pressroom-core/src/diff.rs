//! CI preview diff reporter.
//!
//! For a pull request, pairs each changed content file's production URL with
//! its preview-deployment URL and maintains exactly one summary comment on
//! the PR: found by authorship plus a body marker, updated in place when
//! present, created otherwise.
//!
//! Known limitations, carried deliberately: comment listing reads a single
//! page, and concurrent runs against the same PR race on the upsert (no
//! locking).

use crate::paths::{resolve, PathPolicy};
use async_trait::async_trait;
use pressroom_types::ContentId;
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("received {status} response from the issue tracker: {message}")]
    Upstream { status: u16, message: String },

    #[error("could not find a preview URL comment from user {bot_id} on PR {pr}")]
    MissingPreviewUrl { bot_id: u64, pr: u64 },

    #[error("could not extract a preview URL from comment: {body}")]
    UnmatchedPreviewUrl { body: String },

    #[error("invalid preview URL pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("issue tracker transport error: {0}")]
    Transport(String),
}

/// One changed file in a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub filename: String,
    /// Number of changed lines.
    pub changes: u64,
}

/// One comment on a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: u64,
    pub author_id: u64,
    pub body: String,
}

/// Issue-tracker operations the reporter needs.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// All changed files for the PR. Implementations drain pagination fully.
    async fn list_changed_files(&self, pr: u64) -> Result<Vec<ChangedFile>, DiffError>;

    /// Comments on the PR. Single page only; PRs with more comments than one
    /// page may miss the marker comment.
    async fn list_comments(&self, pr: u64) -> Result<Vec<Comment>, DiffError>;

    async fn create_comment(&self, pr: u64, body: &str) -> Result<(), DiffError>;

    async fn update_comment(&self, comment_id: u64, body: &str) -> Result<(), DiffError>;
}

/// Reporter configuration. `Default` carries the production values apart from
/// `bot_id`, which identifies the CI bot account and has no meaningful
/// default of its own here (the GitHub Actions bot id).
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Numeric identity of the bot account whose comments are considered.
    pub bot_id: u64,

    /// Substring identifying a previously posted diff-table comment.
    pub marker: String,

    /// Pattern extracting the preview URL from the deploy comment.
    pub preview_url_pattern: String,

    /// Content roots whose files are tracked, relative to the repository.
    pub tracked_roots: Vec<String>,

    /// Tracked source extension.
    pub extension: String,

    /// Production site origin.
    pub production_origin: String,

    /// Maximum number of table rows.
    pub max_rows: usize,

    pub path_policy: PathPolicy,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            bot_id: 41898282,
            marker: "Files with changes".to_string(),
            preview_url_pattern: r"\*\*Preview URL:\*\*\s+(https://[^\s`]+)".to_string(),
            tracked_roots: vec![
                "src/content/docs/".to_string(),
                "src/content/changelogs-next/".to_string(),
            ],
            extension: ".mdx".to_string(),
            production_origin: "https://developers.cloudflare.com".to_string(),
            max_rows: 15,
            path_policy: PathPolicy::default(),
        }
    }
}

/// Terminal outcome of one reporter run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// No tracked files changed; nothing was posted.
    NoChanges,
    /// A new diff-table comment was created.
    Created,
    /// The existing diff-table comment was updated in place.
    Updated,
}

/// Run the reporter against one pull request.
///
/// Fatal conditions (missing preview-URL comment, unmatched pattern, any
/// tracker failure) abort with nothing posted. Running twice with identical
/// inputs never yields two diff-table comments.
pub async fn run_report(
    tracker: &dyn IssueTracker,
    pr: u64,
    config: &ReporterConfig,
) -> Result<ReportOutcome, DiffError> {
    let files = tracker.list_changed_files(pr).await?;
    let comments = tracker.list_comments(pr).await?;

    let existing = comments
        .iter()
        .find(|c| c.author_id == config.bot_id && c.body.contains(&config.marker));

    let pattern = Regex::new(&config.preview_url_pattern)?;

    let url_comment = comments
        .iter()
        .find(|c| c.author_id == config.bot_id && pattern.is_match(&c.body))
        .ok_or(DiffError::MissingPreviewUrl {
            bot_id: config.bot_id,
            pr,
        })?;

    let preview_origin = pattern
        .captures(&url_comment.body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| DiffError::UnmatchedPreviewUrl {
            body: url_comment.body.clone(),
        })?;

    tracing::debug!(%preview_origin, "extracted preview origin");

    let mut tracked: Vec<&ChangedFile> = files
        .iter()
        .filter(|f| {
            f.filename.ends_with(&config.extension)
                && config
                    .tracked_roots
                    .iter()
                    .any(|root| f.filename.starts_with(root.as_str()))
        })
        .collect();

    tracked.sort_by(|a, b| b.changes.cmp(&a.changes));
    tracked.truncate(config.max_rows);

    if tracked.is_empty() {
        tracing::info!("no tracked content files changed on PR {pr}");
        return Ok(ReportOutcome::NoChanges);
    }

    let pairs: Vec<(String, String)> = tracked
        .iter()
        .map(|f| {
            let path = resolve(&ContentId::new(f.filename.clone()), &config.path_policy);
            let original = format!(
                "{}/{}",
                config.production_origin.trim_end_matches('/'),
                path
            );
            let preview = format!("{}/{}", preview_origin.trim_end_matches('/'), path);
            (original, preview)
        })
        .collect();

    let body = render_table(&pairs, config.max_rows);

    match existing {
        Some(comment) => {
            tracker.update_comment(comment.id, &body).await?;
            Ok(ReportOutcome::Updated)
        }
        None => {
            tracker.create_comment(pr, &body).await?;
            Ok(ReportOutcome::Created)
        }
    }
}

/// Render the two-column markdown table, each cell a link repeating its URL
/// as both text and target.
fn render_table(pairs: &[(String, String)], max_rows: usize) -> String {
    let mut body = format!(
        "**Files with changes (up to {max_rows})**\n\n| Original Link | Updated Link |\n| --- | --- |"
    );
    for (original, preview) in pairs {
        body.push_str(&format!(
            "\n| [{original}]({original}) | [{preview}]({preview}) |"
        ));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Fake tracker recording comment writes.
    #[derive(Default)]
    struct FakeTracker {
        files: Vec<ChangedFile>,
        comments: Mutex<Vec<Comment>>,
        next_id: Mutex<u64>,
    }

    impl FakeTracker {
        fn new(files: Vec<ChangedFile>, comments: Vec<Comment>) -> Self {
            Self {
                files,
                comments: Mutex::new(comments),
                next_id: Mutex::new(1000),
            }
        }

        fn comments(&self) -> Vec<Comment> {
            self.comments.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl IssueTracker for FakeTracker {
        async fn list_changed_files(&self, _pr: u64) -> Result<Vec<ChangedFile>, DiffError> {
            Ok(self.files.clone())
        }

        async fn list_comments(&self, _pr: u64) -> Result<Vec<Comment>, DiffError> {
            Ok(self.comments())
        }

        async fn create_comment(&self, _pr: u64, body: &str) -> Result<(), DiffError> {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            self.comments.lock().unwrap().push(Comment {
                id: *next_id,
                author_id: ReporterConfig::default().bot_id,
                body: body.to_string(),
            });
            Ok(())
        }

        async fn update_comment(&self, comment_id: u64, body: &str) -> Result<(), DiffError> {
            let mut comments = self.comments.lock().unwrap();
            let comment = comments.iter_mut().find(|c| c.id == comment_id).unwrap();
            comment.body = body.to_string();
            Ok(())
        }
    }

    fn config() -> ReporterConfig {
        ReporterConfig {
            production_origin: "https://developers.example.com".to_string(),
            ..Default::default()
        }
    }

    fn preview_comment() -> Comment {
        Comment {
            id: 1,
            author_id: config().bot_id,
            body: "**Preview URL:** https://abc123-docs.example.workers.dev".to_string(),
        }
    }

    fn file(name: &str, changes: u64) -> ChangedFile {
        ChangedFile {
            filename: name.to_string(),
            changes,
        }
    }

    #[tokio::test]
    async fn test_missing_preview_comment_is_fatal_and_posts_nothing() {
        let tracker = FakeTracker::new(
            vec![file("src/content/docs/workers/index.mdx", 3)],
            vec![],
        );

        let err = run_report(&tracker, 42, &config()).await.unwrap_err();
        assert!(matches!(err, DiffError::MissingPreviewUrl { pr: 42, .. }));
        assert!(tracker.comments().is_empty());
    }

    #[tokio::test]
    async fn test_preview_comment_from_other_user_is_ignored() {
        let tracker = FakeTracker::new(
            vec![file("src/content/docs/workers/index.mdx", 3)],
            vec![Comment {
                author_id: 1,
                ..preview_comment()
            }],
        );

        let err = run_report(&tracker, 42, &config()).await.unwrap_err();
        assert!(matches!(err, DiffError::MissingPreviewUrl { .. }));
    }

    #[tokio::test]
    async fn test_no_tracked_changes_is_success_without_write() {
        let tracker = FakeTracker::new(
            vec![
                file("src/components/Widget.tsx", 50),
                file("src/content/docs/workers/demo.png", 1),
            ],
            vec![preview_comment()],
        );

        let outcome = run_report(&tracker, 42, &config()).await.unwrap();
        assert_eq!(outcome, ReportOutcome::NoChanges);
        assert_eq!(tracker.comments().len(), 1);
    }

    #[tokio::test]
    async fn test_table_rows_sorted_and_truncated() {
        let mut files: Vec<ChangedFile> = (0..20)
            .map(|i| file(&format!("src/content/docs/workers/page-{i:02}.mdx"), i))
            .collect();
        files.reverse();

        let tracker = FakeTracker::new(files, vec![preview_comment()]);
        let outcome = run_report(&tracker, 42, &config()).await.unwrap();
        assert_eq!(outcome, ReportOutcome::Created);

        let comments = tracker.comments();
        let table = &comments.last().unwrap().body;
        let rows: Vec<&str> = table
            .lines()
            .filter(|l| l.starts_with("| ["))
            .collect();
        assert_eq!(rows.len(), 15);

        // Descending by changed-line count: page-19 first.
        assert!(rows[0].contains("workers/page-19/"));
        assert!(rows[0].contains("https://developers.example.com/workers/page-19/"));
        assert!(rows[0].contains("https://abc123-docs.example.workers.dev/workers/page-19/"));
        assert!(rows[14].contains("workers/page-05/"));
    }

    #[tokio::test]
    async fn test_second_run_updates_instead_of_duplicating() {
        let tracker = FakeTracker::new(
            vec![file("src/content/changelogs-next/2025-02-05-title.mdx", 4)],
            vec![preview_comment()],
        );

        let first = run_report(&tracker, 42, &config()).await.unwrap();
        assert_eq!(first, ReportOutcome::Created);

        let second = run_report(&tracker, 42, &config()).await.unwrap();
        assert_eq!(second, ReportOutcome::Updated);

        let diff_tables: Vec<_> = tracker
            .comments()
            .into_iter()
            .filter(|c| c.body.contains("Files with changes"))
            .collect();
        assert_eq!(diff_tables.len(), 1);
        assert!(diff_tables[0]
            .body
            .contains("https://developers.example.com/changelog/2025-02-05-title/"));
    }

    #[test]
    fn test_preview_url_pattern_extracts_url() {
        let pattern = Regex::new(&ReporterConfig::default().preview_url_pattern).unwrap();
        let body = "**Preview URL:** https://ac148943-docs.example.workers.dev";
        let url = pattern.captures(body).unwrap().get(1).unwrap().as_str();
        assert_eq!(url, "https://ac148943-docs.example.workers.dev");
    }
}
