// crates/serve/src/memory.rs

//! In-process content repository.
//!
//! Holds every language variant of every item and answers queries the way
//! the Delivery API does, including its language fallback: when an item has
//! no variant in the requested language the default-language variant is
//! returned, still labelled `system.language = "default"`.

use crate::repository::{ContentRepository, ItemQuery, RepositoryError, TypeQuery};
use async_trait::async_trait;
use domain::content::{ContentItem, ItemListing, ItemResponse, LinkedItems};
use serde::Deserialize;
use std::{
    cmp::Reverse,
    collections::{HashMap, VecDeque},
    path::Path,
};
use tracing::debug;

/// CMS codename of the primary language.
pub const DEFAULT_LANGUAGE: &str = "default";

#[derive(Debug, Default, Deserialize)]
struct Fixture {
    items: Vec<ContentItem>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    /// Codenames in first-insertion order; listings follow it.
    order: Vec<String>,
    /// codename → language → variant
    variants: HashMap<String, HashMap<String, ContentItem>>,
}

impl InMemoryRepository {
    pub fn new(items: impl IntoIterator<Item = ContentItem>) -> Self {
        let mut repo = Self::default();
        for item in items {
            repo.insert(item);
        }
        repo
    }

    /// Parse a fixture of the form `{ "items": [ ...every variant... ] }`.
    pub fn from_json(json: &str) -> Result<Self, RepositoryError> {
        let fixture: Fixture =
            serde_json::from_str(json).map_err(|e| RepositoryError::Decode(e.to_string()))?;
        Ok(Self::new(fixture.items))
    }

    pub fn from_path(path: &Path) -> Result<Self, RepositoryError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            RepositoryError::Config(format!("failed reading {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    /// Add or replace one language variant.
    pub fn insert(&mut self, item: ContentItem) {
        let codename = item.codename().to_string();
        if !self.variants.contains_key(&codename) {
            self.order.push(codename.clone());
        }
        self.variants
            .entry(codename)
            .or_default()
            .insert(item.language().to_string(), item);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The variant the CMS would serve for `language`.
    fn variant(&self, codename: &str, language: &str) -> Option<&ContentItem> {
        let variants = self.variants.get(codename)?;
        variants
            .get(language)
            .or_else(|| variants.get(DEFAULT_LANGUAGE))
    }

    /// Linked items reachable from `roots` within `depth` hops.
    fn arena<'a>(
        &self,
        roots: impl IntoIterator<Item = &'a ContentItem>,
        language: &str,
        depth: u8,
    ) -> LinkedItems {
        let mut linked = LinkedItems::new();
        let mut queue: VecDeque<(String, u8)> = roots
            .into_iter()
            .flat_map(|item| item.references().map(|c| (c.to_string(), depth)))
            .collect();

        while let Some((codename, budget)) = queue.pop_front() {
            if budget == 0 || linked.contains(&codename) {
                continue;
            }
            let Some(item) = self.variant(&codename, language) else {
                continue;
            };
            queue.extend(item.references().map(|c| (c.to_string(), budget - 1)));
            linked.insert(item.clone());
        }

        linked
    }
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    #[tracing::instrument(skip_all, fields(content_type = %content_type))]
    async fn fetch_by_type(
        &self,
        content_type: &str,
        query: &TypeQuery,
    ) -> Result<ItemListing, RepositoryError> {
        let mut items: Vec<&ContentItem> = self
            .order
            .iter()
            .filter_map(|codename| self.variant(codename, &query.language))
            .filter(|item| item.content_type() == content_type)
            .filter(|item| {
                query
                    .slug_equals
                    .as_deref()
                    .map_or(true, |slug| item.slug() == slug)
            })
            .collect();

        if let Some(element) = &query.order_by_descending {
            items.sort_by_key(|item| Reverse(item.date_time(element)));
        }
        if let Some(limit) = query.limit {
            items.truncate(limit as usize);
        }

        let modular_content =
            self.arena(items.iter().copied(), &query.language, query.expand_depth);
        debug!(
            count = items.len(),
            linked = modular_content.len(),
            "in-memory listing"
        );

        Ok(ItemListing {
            items: items.into_iter().cloned().collect(),
            modular_content,
        })
    }

    #[tracing::instrument(skip_all, fields(codename = %codename))]
    async fn fetch_by_codename(
        &self,
        codename: &str,
        query: &ItemQuery,
    ) -> Result<Option<ItemResponse>, RepositoryError> {
        Ok(self.variant(codename, &query.language).map(|item| ItemResponse {
            modular_content: self.arena([item], &query.language, query.expand_depth),
            item: item.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(
        codename: &str,
        language: &str,
        content_type: &str,
        elements: serde_json::Value,
    ) -> ContentItem {
        serde_json::from_value(json!({
            "system": { "id": format!("{codename}-{language}"), "codename": codename, "language": language, "type": content_type },
            "elements": elements
        }))
        .expect("item decodes")
    }

    fn slug(value: &str) -> serde_json::Value {
        json!({ "type": "url_slug", "value": value })
    }

    fn links(codenames: &[&str]) -> serde_json::Value {
        json!({ "type": "modular_content", "value": codenames })
    }

    fn date(value: &str) -> serde_json::Value {
        json!({ "type": "date_time", "value": value })
    }

    fn home_elements() -> serde_json::Value {
        json!({ "slug": slug(""), "body": links(&["a"]) })
    }

    fn repo() -> InMemoryRepository {
        InMemoryRepository::new([
            item("page_home", "default", "page", home_elements()),
            item("page_home", "ro", "page", home_elements()),
            item("page_pricing", "default", "page", json!({ "slug": slug("pricing") })),
            item("a", "default", "feature_grid", json!({ "cards": links(&["b"]) })),
            item("b", "default", "feature_card", json!({ "links": links(&["c"]) })),
            item("c", "default", "navigation_item", json!({ "children": links(&["c"]) })),
            item(
                "post_old",
                "default",
                "blog_post",
                json!({ "publish_date": date("2023-01-01T00:00:00Z") }),
            ),
            item(
                "post_new",
                "default",
                "blog_post",
                json!({ "publish_date": date("2024-06-01T00:00:00Z") }),
            ),
            item("post_undated", "default", "blog_post", json!({})),
        ])
    }

    #[tokio::test]
    async fn missing_variant_falls_back_to_default_language() {
        let listing = repo()
            .fetch_by_type("page", &TypeQuery::new("ro", 0))
            .await
            .expect("listing");

        let seen: Vec<(&str, &str)> = listing
            .items
            .iter()
            .map(|i| (i.codename(), i.language()))
            .collect();
        assert_eq!(seen, vec![("page_home", "ro"), ("page_pricing", "default")]);
    }

    #[tokio::test]
    async fn empty_slug_filter_differs_from_no_filter() {
        let repo = repo();
        let home = repo
            .fetch_by_type("page", &TypeQuery::new("default", 0).slug(""))
            .await
            .expect("listing");
        let all = repo
            .fetch_by_type("page", &TypeQuery::new("default", 0))
            .await
            .expect("listing");

        assert_eq!(home.items.len(), 1);
        assert_eq!(home.items[0].codename(), "page_home");
        assert_eq!(all.items.len(), 2);
    }

    #[tokio::test]
    async fn arena_stops_at_depth() {
        let repo = repo();
        let shallow = repo
            .fetch_by_type("page", &TypeQuery::new("default", 1).slug(""))
            .await
            .expect("listing");
        assert!(shallow.modular_content.contains("a"));
        assert!(!shallow.modular_content.contains("b"));

        let deep = repo
            .fetch_by_type("page", &TypeQuery::new("default", 3).slug(""))
            .await
            .expect("listing");
        assert!(deep.modular_content.contains("c"));
        assert_eq!(deep.modular_content.len(), 3);

        let none = repo
            .fetch_by_type("page", &TypeQuery::new("default", 0).slug(""))
            .await
            .expect("listing");
        assert!(none.modular_content.is_empty());
    }

    #[tokio::test]
    async fn ordering_and_limit() {
        let listing = repo()
            .fetch_by_type(
                "blog_post",
                &TypeQuery::new("default", 0).order_desc("publish_date").limit(2),
            )
            .await
            .expect("listing");
        let order: Vec<&str> = listing.items.iter().map(|i| i.codename()).collect();
        assert_eq!(order, vec!["post_new", "post_old"]);
    }

    #[tokio::test]
    async fn fetch_by_codename_uses_fallback_and_reports_absence() {
        let repo = repo();
        let found = repo
            .fetch_by_codename("page_pricing", &ItemQuery::new("ro", 0))
            .await
            .expect("query")
            .expect("fallback variant");
        assert_eq!(found.item.language(), "default");

        let missing = repo
            .fetch_by_codename("ghost", &ItemQuery::new("ro", 0))
            .await
            .expect("query");
        assert!(missing.is_none());
    }

    #[test]
    fn fixture_json_parses() {
        let repo = InMemoryRepository::from_json(
            r#"{ "items": [ { "system": { "id": "1", "codename": "x", "language": "default", "type": "page" }, "elements": {} } ] }"#,
        )
        .expect("fixture");
        assert_eq!(repo.len(), 1);
        assert!(matches!(
            InMemoryRepository::from_json("[]"),
            Err(RepositoryError::Decode(_))
        ));
    }
}
