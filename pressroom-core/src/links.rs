//! Root-relative link rewriting.
//!
//! Feed readers resolve relative URLs against the feed location, not the
//! site, so root-relative hrefs in syndicated fragments must become absolute
//! before serialization.

use crate::html::{Fragment, Node};

/// Rewrite every root-relative `href` on an `a` element to an absolute URL
/// under `origin`.
///
/// Hrefs that are already absolute, fragment-only, or carry another scheme
/// are left unchanged, as is everything else in the tree.
pub fn rewrite_links(fragment: &Fragment, origin: &str) -> Fragment {
    Fragment::new(
        fragment
            .children
            .iter()
            .map(|node| rewrite_node(node, origin))
            .collect(),
    )
}

fn rewrite_node(node: &Node, origin: &str) -> Node {
    match node {
        Node::Text(_) => node.clone(),
        Node::Element {
            tag,
            attrs,
            children,
        } => {
            let mut attrs = attrs.clone();

            if tag == "a" {
                if let Some(href) = attrs.get("href") {
                    if href.starts_with('/') {
                        let absolute = format!("{}{}", origin.trim_end_matches('/'), href);
                        attrs.insert("href".to_string(), absolute);
                    }
                }
            }

            Node::Element {
                tag: tag.clone(),
                attrs,
                children: children.iter().map(|c| rewrite_node(c, origin)).collect(),
            }
        }
    }
}
