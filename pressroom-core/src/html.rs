//! Owned markup tree for feed fragments.
//!
//! The tree is produced by an external HTML parser (parsing is out of scope
//! here) and consumed by the sanitizer and link rewriter. Each node is owned
//! exactly once by its parent's child list; there is no sharing and no
//! back-references.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Tags serialized without a closing tag.
const VOID_TAGS: &[&str] = &["br", "col", "hr", "wbr"];

/// One node in a parsed markup fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Element {
        tag: String,
        /// Attributes in source order.
        attrs: IndexMap<String, String>,
        children: Vec<Node>,
    },
    Text(String),
}

impl Node {
    /// Element with no attributes.
    pub fn element(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Element {
            tag: tag.into(),
            attrs: IndexMap::new(),
            children,
        }
    }

    /// Element with attributes given as (name, value) pairs.
    pub fn element_with_attrs(
        tag: impl Into<String>,
        attrs: &[(&str, &str)],
        children: Vec<Node>,
    ) -> Self {
        Node::Element {
            tag: tag.into(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            children,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    /// Whitespace-separated tokens of the `class` attribute, if any.
    pub fn class_tokens(&self) -> Vec<&str> {
        match self {
            Node::Element { attrs, .. } => attrs
                .get("class")
                .map(|v| v.split_ascii_whitespace().collect())
                .unwrap_or_default(),
            Node::Text(_) => Vec::new(),
        }
    }
}

/// A parsed markup fragment: an ordered list of root-level nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fragment {
    pub children: Vec<Node>,
}

impl Fragment {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Serialize the fragment to an HTML string.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            serialize_node(node, &mut out);
        }
        out
    }
}

fn serialize_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(value) => out.push_str(&escape_text(value)),
        Node::Element {
            tag,
            attrs,
            children,
        } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            out.push('>');

            if VOID_TAGS.contains(&tag.as_str()) {
                return;
            }

            for child in children {
                serialize_node(child, out);
            }

            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_nested_elements() {
        let fragment = Fragment::new(vec![Node::element(
            "p",
            vec![
                Node::text("See "),
                Node::element_with_attrs("a", &[("href", "/workers/")], vec![Node::text("docs")]),
            ],
        )]);

        assert_eq!(
            fragment.serialize(),
            "<p>See <a href=\"/workers/\">docs</a></p>"
        );
    }

    #[test]
    fn test_serialize_escapes_text_and_attributes() {
        let fragment = Fragment::new(vec![Node::element_with_attrs(
            "a",
            &[("href", "/search?q=\"a&b\"")],
            vec![Node::text("a < b & c")],
        )]);

        assert_eq!(
            fragment.serialize(),
            "<a href=\"/search?q=&quot;a&amp;b&quot;\">a &lt; b &amp; c</a>"
        );
    }

    #[test]
    fn test_serialize_void_element() {
        let fragment = Fragment::new(vec![Node::element("br", vec![])]);
        assert_eq!(fragment.serialize(), "<br>");
    }

    #[test]
    fn test_class_tokens() {
        let node = Node::element_with_attrs("div", &[("class", "heading-wrapper level-2")], vec![]);
        assert_eq!(node.class_tokens(), vec!["heading-wrapper", "level-2"]);
    }
}
