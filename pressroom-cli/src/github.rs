//! GitHub REST client backing the issue-tracker and release-feed seams.

use async_trait::async_trait;
use pressroom_core::diff::{ChangedFile, Comment, DiffError, IssueTracker};
use pressroom_core::release_notes::{ReleaseFeed, ReleaseNotesError, ReleaseRecord};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Fixed GitHub REST page size.
const PAGE_SIZE: usize = 100;

/// Timeout for API requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub REST client scoped to one repository.
pub struct GithubClient {
    client: reqwest::Client,
    api_base: String,
    repo: String,
    token: String,
    /// Full URL of the external release feed.
    release_feed_url: String,
}

#[derive(Deserialize)]
struct FilePayload {
    filename: String,
    changes: u64,
}

#[derive(Deserialize)]
struct CommentPayload {
    id: u64,
    user: Option<UserPayload>,
    body: Option<String>,
}

#[derive(Deserialize)]
struct UserPayload {
    id: u64,
}

/// Transport or upstream-status failure, mapped into the component error
/// enums at the trait boundary.
#[derive(Debug)]
enum RequestError {
    Status { status: u16, message: String },
    Transport(reqwest::Error),
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        RequestError::Transport(e)
    }
}

impl From<RequestError> for DiffError {
    fn from(e: RequestError) -> Self {
        match e {
            RequestError::Status { status, message } => DiffError::Upstream { status, message },
            RequestError::Transport(e) => DiffError::Transport(e.to_string()),
        }
    }
}

impl From<RequestError> for ReleaseNotesError {
    fn from(e: RequestError) -> Self {
        match e {
            RequestError::Status { status, .. } => ReleaseNotesError::Upstream { status },
            RequestError::Transport(e) if e.is_decode() => {
                ReleaseNotesError::MalformedRecord(e.to_string())
            }
            RequestError::Transport(e) => ReleaseNotesError::Transport(e.to_string()),
        }
    }
}

impl GithubClient {
    pub fn new(
        repo: impl Into<String>,
        token: impl Into<String>,
        release_feed_url: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_base: "https://api.github.com".to_string(),
            repo: repo.into(),
            token: token.into(),
            release_feed_url: release_feed_url.into(),
        })
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder
            .header("User-Agent", "pressroom")
            .header("Accept", "application/vnd.github+json");
        if self.token.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.token)
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, RequestError> {
        let response = self.request(self.client.get(url)).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    /// GET all pages of a list endpoint, draining until a short page.
    async fn get_paginated<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Vec<T>, RequestError> {
        let mut out = Vec::new();
        let mut page = 1;

        loop {
            let separator = if url.contains('?') { '&' } else { '?' };
            let page_url = format!("{url}{separator}per_page={PAGE_SIZE}&page={page}");
            debug!(%page_url, "fetching page");

            let items: Vec<T> = self.get_json(&page_url).await?;

            let len = items.len();
            out.extend(items);

            if len < PAGE_SIZE {
                return Ok(out);
            }
            page += 1;
        }
    }

    async fn write_comment(
        &self,
        builder: reqwest::RequestBuilder,
        body: &str,
    ) -> Result<(), RequestError> {
        let response = self
            .request(builder)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RequestError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(RequestError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl IssueTracker for GithubClient {
    async fn list_changed_files(&self, pr: u64) -> Result<Vec<ChangedFile>, DiffError> {
        let url = format!("{}/repos/{}/pulls/{}/files", self.api_base, self.repo, pr);
        let files: Vec<FilePayload> = self.get_paginated(&url).await.map_err(DiffError::from)?;

        Ok(files
            .into_iter()
            .map(|f| ChangedFile {
                filename: f.filename,
                changes: f.changes,
            })
            .collect())
    }

    async fn list_comments(&self, pr: u64) -> Result<Vec<Comment>, DiffError> {
        let url = format!(
            "{}/repos/{}/issues/{}/comments?per_page={}",
            self.api_base, self.repo, pr, PAGE_SIZE
        );
        let comments: Vec<CommentPayload> =
            self.get_json(&url).await.map_err(DiffError::from)?;

        Ok(comments
            .into_iter()
            .map(|c| Comment {
                id: c.id,
                author_id: c.user.map(|u| u.id).unwrap_or_default(),
                body: c.body.unwrap_or_default(),
            })
            .collect())
    }

    async fn create_comment(&self, pr: u64, body: &str) -> Result<(), DiffError> {
        let url = format!(
            "{}/repos/{}/issues/{}/comments",
            self.api_base, self.repo, pr
        );
        self.write_comment(self.client.post(&url), body)
            .await
            .map_err(DiffError::from)
    }

    async fn update_comment(&self, comment_id: u64, body: &str) -> Result<(), DiffError> {
        let url = format!(
            "{}/repos/{}/issues/comments/{}",
            self.api_base, self.repo, comment_id
        );
        self.write_comment(self.client.patch(&url), body)
            .await
            .map_err(DiffError::from)
    }
}

#[async_trait]
impl ReleaseFeed for GithubClient {
    async fn releases(&self) -> Result<Vec<ReleaseRecord>, ReleaseNotesError> {
        self.get_paginated(&self.release_feed_url)
            .await
            .map_err(ReleaseNotesError::from)
    }
}
