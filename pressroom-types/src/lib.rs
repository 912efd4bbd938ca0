//! Shared types for pressroom
//!
//! This crate provides the identifier types used across the pressroom
//! ecosystem: content identifiers produced by the external content store and
//! the canonical URL paths they resolve to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one authored content unit, as produced by the content store.
///
/// Opaque and slash-delimited (e.g. `"docs/workers/get-started/cli.mdx"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentId(pub String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentId {
    fn from(id: &str) -> Self {
        ContentId(id.to_string())
    }
}

/// The one authoritative public URL path a content identifier maps to.
///
/// An ordered sequence of URL-safe segments. The serialized form joins the
/// segments with `/` and always carries exactly one trailing `/`; the empty
/// path serializes as `/` alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CanonicalPath {
    segments: Vec<String>,
}

impl CanonicalPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            f.write_str(segment)?;
            f.write_str("/")?;
        }
        if self.segments.is_empty() {
            f.write_str("/")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_id_roundtrip() {
        let id = ContentId::new("docs/workers/index.mdx");
        assert_eq!(id.as_str(), "docs/workers/index.mdx");
        assert_eq!(id.to_string(), "docs/workers/index.mdx");
    }

    #[test]
    fn test_canonical_path_display() {
        let path = CanonicalPath::new(vec!["workers".into(), "get-started".into()]);
        assert_eq!(path.to_string(), "workers/get-started/");
    }

    #[test]
    fn test_root_path_is_single_separator() {
        let path = CanonicalPath::default();
        assert!(path.is_root());
        assert_eq!(path.to_string(), "/");
    }
}
