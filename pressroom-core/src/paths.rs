//! Canonical URL path resolution.
//!
//! Maps a content identifier from the store (e.g.
//! `"src/content/docs/workers/index.mdx"`) to the one public URL path it is
//! served under (`"workers/"`). Every consumer of a content link — the feed
//! builders, the link rewriter, the CI diff reporter — goes through
//! [`resolve`] so the mapping can never diverge between call sites.

use pressroom_types::{CanonicalPath, ContentId};

/// Policy values for path resolution.
///
/// All tokens are explicit configuration rather than ambient constants so the
/// resolver stays independently testable. `Default` carries the production
/// values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPolicy {
    /// Prefix stripped from the identifier before splitting (e.g.
    /// `"src/content"`).
    pub base_prefix: String,

    /// Source extension marker stripped from the identifier (e.g. `".mdx"`).
    pub extension: String,

    /// Container segment that contributes zero output segments.
    pub container_segment: String,

    /// Legacy changelog folder rewritten to [`PathPolicy::changelog_segment`].
    pub legacy_changelog_segment: String,

    /// Canonical changelog segment.
    pub changelog_segment: String,

    /// Slug results rewritten verbatim, bypassing slug collapsing. Applies to
    /// a segment at any position.
    pub verbatim_overrides: Vec<(String, String)>,

    /// Trailing segment dropped from the joined path.
    pub index_segment: String,
}

impl Default for PathPolicy {
    fn default() -> Self {
        Self {
            base_prefix: "src/content".to_string(),
            extension: ".mdx".to_string(),
            container_segment: "docs".to_string(),
            legacy_changelog_segment: "changelogs-next".to_string(),
            changelog_segment: "changelog".to_string(),
            // A numeric-looking product name that must survive slugging intact.
            verbatim_overrides: vec![("1111".to_string(), "1.1.1.1".to_string())],
            index_segment: "index".to_string(),
        }
    }
}

/// Resolve a content identifier to its canonical URL path.
///
/// Pure and total: any well-formed identifier maps to a path, and identical
/// inputs always produce identical outputs.
///
/// # Examples
///
/// ```
/// use pressroom_core::paths::{resolve, PathPolicy};
/// use pressroom_types::ContentId;
///
/// let policy = PathPolicy::default();
/// let path = resolve(&ContentId::new("src/content/docs/workers/index.mdx"), &policy);
/// assert_eq!(path.to_string(), "workers/");
/// ```
pub fn resolve(id: &ContentId, policy: &PathPolicy) -> CanonicalPath {
    let stripped = id
        .as_str()
        .strip_prefix(policy.base_prefix.as_str())
        .unwrap_or(id.as_str());
    let stripped = stripped
        .strip_suffix(policy.extension.as_str())
        .unwrap_or(stripped);

    let mut segments: Vec<String> = Vec::new();

    for segment in stripped.split('/').filter(|s| !s.is_empty()) {
        if segment == policy.container_segment {
            continue;
        }

        let segment = if segment == policy.legacy_changelog_segment {
            policy.changelog_segment.as_str()
        } else {
            segment
        };

        let slug = slugify(segment);

        let replaced = policy
            .verbatim_overrides
            .iter()
            .find(|(from, _)| *from == slug)
            .map(|(_, to)| to.clone())
            .unwrap_or(slug);

        segments.push(replaced);
    }

    // `/index` at the tail collapses into its folder.
    if segments.last().map(String::as_str) == Some(policy.index_segment.as_str()) {
        segments.pop();
    }

    CanonicalPath::new(segments)
}

/// Convert a path segment to a URL-safe slug.
///
/// Rules:
/// - Lowercase
/// - Collapse any run of characters outside `[a-z0-9-]` to a single hyphen
/// - Trim leading/trailing hyphens
fn slugify(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut pending_hyphen = false;

    for c in segment.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() || c == '-' {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    out.trim_matches('-').to_string()
}
