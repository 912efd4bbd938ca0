//! Allow-list markup sanitizer for feed-safe fragments.
//!
//! Rendered page HTML carries site chrome (heading anchors, external link
//! icons, custom components) that must not leak into syndicated feeds. This
//! pass reduces a parsed fragment to a fixed allow-listed vocabulary.
//!
//! The transform is a pure rebuild: every input child maps to zero, one, or
//! many output children, so sibling order is preserved by construction and no
//! in-place splice/index bookkeeping exists. Re-running on its own output is
//! a no-op.

use crate::html::{Fragment, Node};

/// Fixed vocabulary and class rules for sanitization.
///
/// `Default` carries the production policy; tests may construct narrower ones.
#[derive(Debug, Clone)]
pub struct SanitizePolicy {
    /// Structural tag allow-list. Elements with any other tag are removed
    /// with their whole subtree.
    pub allowed_tags: Vec<String>,

    /// Per-tag attribute allow-list as (tag, attributes) pairs. Tags absent
    /// from the table lose all attributes.
    pub allowed_attrs: Vec<(String, Vec<String>)>,

    /// Class tokens whose carrier is removed with its whole subtree.
    pub disallowed_classes: Vec<String>,

    /// Class tokens whose carrier is replaced by its children.
    pub unwrap_classes: Vec<String>,

    /// Custom element replaced by the literal value of its marker attribute.
    pub anchor_marker_tag: String,

    /// Attribute of the anchor marker carrying the replacement text.
    pub anchor_marker_attr: String,
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        Self {
            allowed_tags: [
                // Content sectioning
                "address", "article", "aside", "footer", "header", "h1", "h2", "h3", "h4", "h5",
                "h6", "hgroup", "main", "nav", "section",
                // Text content
                "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure", "hr", "li", "menu",
                "ol", "p", "pre", "ul",
                // Inline text semantics
                "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "dfn", "em", "i",
                "kbd", "mark", "q", "rb", "rp", "rt", "rtc", "ruby", "s", "samp", "small", "span",
                "strong", "sub", "sup", "time", "u", "var", "wbr",
                // Table content
                "caption", "col", "colgroup", "table", "tbody", "td", "tfoot", "th", "thead",
                "tr",
                // Custom elements
                "rule-id",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            allowed_attrs: vec![
                (
                    "a".to_string(),
                    vec!["href".to_string(), "id".to_string(), "target".to_string()],
                ),
                ("rule-id".to_string(), vec!["id".to_string()]),
            ],
            disallowed_classes: vec!["external-link".to_string(), "anchor-link".to_string()],
            unwrap_classes: vec!["heading-wrapper".to_string()],
            anchor_marker_tag: "rule-id".to_string(),
            anchor_marker_attr: "id".to_string(),
        }
    }
}

impl SanitizePolicy {
    fn tag_allowed(&self, tag: &str) -> bool {
        self.allowed_tags.iter().any(|t| t == tag)
    }

    fn attr_allowed(&self, tag: &str, attr: &str) -> bool {
        self.allowed_attrs
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, attrs)| attrs.iter().any(|a| a == attr))
            .unwrap_or(false)
    }
}

/// Reduce a fragment to the policy's allow-listed vocabulary.
///
/// Pure and deterministic; malformed input (unknown tags, missing attributes)
/// degrades via removal or attribute stripping, never an error. Idempotent on
/// already-sanitized input.
pub fn sanitize(fragment: &Fragment, policy: &SanitizePolicy) -> Fragment {
    Fragment::new(sanitize_children(&fragment.children, policy))
}

fn sanitize_children(children: &[Node], policy: &SanitizePolicy) -> Vec<Node> {
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        out.extend(sanitize_node(child, policy));
    }
    out
}

/// Map one node to its sanitized replacement(s): empty for removed subtrees,
/// many for unwrapped wrappers.
fn sanitize_node(node: &Node, policy: &SanitizePolicy) -> Vec<Node> {
    let (tag, attrs, children) = match node {
        // Text passes through untouched.
        Node::Text(_) => return vec![node.clone()],
        Node::Element {
            tag,
            attrs,
            children,
        } => (tag, attrs, children),
    };

    if !policy.tag_allowed(tag) {
        return Vec::new();
    }

    let classes = node.class_tokens();

    if policy.disallowed_classes.iter().any(|c| classes.contains(&c.as_str())) {
        return Vec::new();
    }

    if policy.unwrap_classes.iter().any(|c| classes.contains(&c.as_str())) {
        return sanitize_children(children, policy);
    }

    // Anchor markers collapse to the literal text of their id attribute;
    // their children are discarded.
    if *tag == policy.anchor_marker_tag {
        let value = attrs
            .get(policy.anchor_marker_attr.as_str())
            .cloned()
            .unwrap_or_default();
        return vec![Node::Text(value)];
    }

    let kept_attrs = attrs
        .iter()
        .filter(|(name, _)| policy.attr_allowed(tag, name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    vec![Node::Element {
        tag: tag.clone(),
        attrs: kept_attrs,
        children: sanitize_children(children, policy),
    }]
}
