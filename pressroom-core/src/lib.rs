//! # pressroom-core
//!
//! Core library for the pressroom publishing tools.
//!
//! This crate provides the precision-critical transforms shared by every
//! consumer of the docs site: canonical path resolution, feed-safe markup
//! sanitization, link rewriting, the changelog and release-note aggregators,
//! and the CI preview diff reporter.

pub mod changelog;
pub mod config;
pub mod diff;
pub mod html;
pub mod links;
pub mod paths;
pub mod release_notes;
pub mod sanitize;
pub mod store;

pub use changelog::{get_changelogs, rss_items, ChangelogError, Renderer, SyndicationItem};
pub use config::Config;
pub use diff::{run_report, Comment, DiffError, IssueTracker, ReportOutcome, ReporterConfig};
pub use html::{Fragment, Node};
pub use links::rewrite_links;
pub use paths::{resolve, PathPolicy};
pub use release_notes::{
    get_release_notes, ReleaseFeed, ReleaseNotesError, ReleaseNotesOptions, ReleaseNotesView,
};
pub use sanitize::{sanitize, SanitizePolicy};
pub use store::{ChangelogEntry, ContentStore, MemoryStore, Product, ReleaseNote, StoreError};
