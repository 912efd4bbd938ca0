//! Configuration parsing and management.
//!
//! Every fixed value the components consume (origins, content roots, the bot
//! identity, markers) lives here and is handed to each component as an
//! explicit policy value; nothing reads ambient globals.

use crate::diff::ReporterConfig;
use crate::paths::PathPolicy;
use crate::release_notes::ExternalFeedConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Main configuration struct matching pressroom.yml schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,

    #[serde(default)]
    pub reporter: ReporterSection,

    #[serde(default)]
    pub external_feed: ExternalFeedSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Production origin, e.g. `https://developers.cloudflare.com`.
    #[serde(default = "default_origin")]
    pub origin: String,

    #[serde(default = "default_content_root")]
    pub content_root: String,

    #[serde(default = "default_extension")]
    pub extension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterSection {
    #[serde(default = "default_bot_id")]
    pub bot_id: u64,

    #[serde(default = "default_marker")]
    pub marker: String,

    #[serde(default = "default_preview_url_pattern")]
    pub preview_url_pattern: String,

    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalFeedSection {
    #[serde(default = "default_feed_url")]
    pub url: String,

    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,
}

fn default_origin() -> String {
    "https://developers.cloudflare.com".to_string()
}

fn default_content_root() -> String {
    "src/content".to_string()
}

fn default_extension() -> String {
    ".mdx".to_string()
}

fn default_bot_id() -> u64 {
    ReporterConfig::default().bot_id
}

fn default_marker() -> String {
    ReporterConfig::default().marker
}

fn default_preview_url_pattern() -> String {
    ReporterConfig::default().preview_url_pattern
}

fn default_max_rows() -> usize {
    ReporterConfig::default().max_rows
}

fn default_feed_url() -> String {
    "https://api.github.com/repos/cloudflare/workers-sdk/releases".to_string()
}

fn default_name_prefix() -> String {
    ExternalFeedConfig::default().name_prefix
}

impl Default for ReporterSection {
    fn default() -> Self {
        Self {
            bot_id: default_bot_id(),
            marker: default_marker(),
            preview_url_pattern: default_preview_url_pattern(),
            max_rows: default_max_rows(),
        }
    }
}

impl Default for ExternalFeedSection {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            name_prefix: default_name_prefix(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig {
                origin: default_origin(),
                content_root: default_content_root(),
                extension: default_extension(),
            },
            reporter: ReporterSection::default(),
            external_feed: ExternalFeedSection::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Path policy derived from the site section.
    pub fn path_policy(&self) -> PathPolicy {
        PathPolicy {
            base_prefix: self.site.content_root.clone(),
            extension: self.site.extension.clone(),
            ..PathPolicy::default()
        }
    }

    /// Reporter configuration derived from the site and reporter sections.
    pub fn reporter_config(&self) -> ReporterConfig {
        let root = self.site.content_root.trim_end_matches('/');
        ReporterConfig {
            bot_id: self.reporter.bot_id,
            marker: self.reporter.marker.clone(),
            preview_url_pattern: self.reporter.preview_url_pattern.clone(),
            tracked_roots: vec![
                format!("{root}/docs/"),
                format!("{root}/changelogs-next/"),
            ],
            extension: self.site.extension.clone(),
            production_origin: self.site.origin.clone(),
            max_rows: self.reporter.max_rows,
            path_policy: self.path_policy(),
        }
    }

    /// External feed configuration derived from the feed section.
    pub fn external_feed_config(&self) -> ExternalFeedConfig {
        ExternalFeedConfig {
            name_prefix: self.external_feed.name_prefix.clone(),
            ..ExternalFeedConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: Config = serde_yaml::from_str(
            r#"
site:
  origin: "https://developers.example.com"
"#,
        )
        .unwrap();

        assert_eq!(config.site.content_root, "src/content");
        assert_eq!(config.reporter.max_rows, 15);
        assert_eq!(config.external_feed.name_prefix, "wrangler@");

        let reporter = config.reporter_config();
        assert_eq!(reporter.production_origin, "https://developers.example.com");
        assert_eq!(
            reporter.tracked_roots,
            vec!["src/content/docs/", "src/content/changelogs-next/"]
        );
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "site:\n  origin: \"https://docs.example.com\"\nreporter:\n  bot_id: 7"
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.site.origin, "https://docs.example.com");
        assert_eq!(config.reporter.bot_id, 7);
        assert_eq!(config.reporter.marker, "Files with changes");
    }
}
