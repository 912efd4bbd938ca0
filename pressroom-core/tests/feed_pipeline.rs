//! Integration tests for the feed pipeline
//!
//! These tests verify that the aggregator, sanitizer, link rewriter, and
//! path resolver agree end to end.

use async_trait::async_trait;
use pressroom_core::html::{Fragment, Node};
use pressroom_core::paths::PathPolicy;
use pressroom_core::sanitize::SanitizePolicy;
use pressroom_core::store::{ChangelogEntry, MemoryStore, Product};
use pressroom_core::{get_changelogs, rss_items, ChangelogError, Renderer};
use pressroom_types::ContentId;

/// Renderer producing the kind of markup the site renderer emits: heading
/// wrappers, anchor links, and root-relative cross references.
struct SiteLikeRenderer;

#[async_trait]
impl Renderer for SiteLikeRenderer {
    async fn render(&self, entry: &ChangelogEntry) -> Result<Fragment, ChangelogError> {
        Ok(Fragment::new(vec![
            Node::element_with_attrs(
                "div",
                &[("class", "heading-wrapper")],
                vec![
                    Node::element("h2", vec![Node::text(entry.title.clone())]),
                    Node::element_with_attrs(
                        "a",
                        &[("class", "anchor-link"), ("href", "#title")],
                        vec![Node::text("#")],
                    ),
                ],
            ),
            Node::element(
                "p",
                vec![
                    Node::text("Details in "),
                    Node::element_with_attrs(
                        "a",
                        &[("href", "/workers/get-started/cli/")],
                        vec![Node::text("the guide")],
                    ),
                    Node::text("."),
                ],
            ),
        ]))
    }
}

fn store() -> MemoryStore {
    MemoryStore::new()
        .with_products(vec![Product {
            id: "workers".into(),
            name: "Workers".into(),
            area: Some("Developer platform".into()),
        }])
        .with_changelog(vec![ChangelogEntry {
            id: ContentId::new("workers/2025-02-05-new-bindings"),
            title: "New bindings".into(),
            description: String::new(),
            date: "2025-02-05".parse().unwrap(),
            products: vec![],
            body: String::new(),
        }])
}

#[tokio::test]
async fn test_changelog_to_feed_item() {
    let store = store();
    let entries = get_changelogs(&store, None).await.unwrap();

    let items = rss_items(
        &entries,
        &store,
        &SiteLikeRenderer,
        &SanitizePolicy::default(),
        &PathPolicy::default(),
        "https://developers.example.com",
    )
    .await
    .unwrap();

    assert_eq!(items.len(), 1);
    let item = &items[0];

    assert_eq!(item.title, "Workers - New bindings");
    assert_eq!(item.link, "/changelog/2025-02-05-new-bindings/");
    assert_eq!(item.primary_product, "Workers");

    // The wrapper is unwrapped, the anchor link removed, and the
    // cross-reference made absolute.
    assert_eq!(
        item.description,
        "<h2>New bindings</h2>\
         <p>Details in <a href=\"https://developers.example.com/workers/get-started/cli/\">the guide</a>.</p>"
    );
}

#[tokio::test]
async fn test_feed_link_matches_path_resolver_everywhere() {
    let store = store();
    let entries = get_changelogs(&store, None).await.unwrap();
    let items = rss_items(
        &entries,
        &store,
        &SiteLikeRenderer,
        &SanitizePolicy::default(),
        &PathPolicy::default(),
        "https://developers.example.com",
    )
    .await
    .unwrap();

    // The diff reporter resolves the same source file through the same
    // function; the two must agree bit for bit.
    let reporter_path = pressroom_core::paths::resolve(
        &ContentId::new("src/content/changelogs-next/2025-02-05-new-bindings.mdx"),
        &PathPolicy::default(),
    );
    assert_eq!(items[0].link, format!("/{reporter_path}"));
}
