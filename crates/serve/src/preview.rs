// crates/serve/src/preview.rs

//! Where an editor's "preview" click should land.

use crate::repository::{ItemQuery, ReadMode, PREVIEW_DEPTH};
use crate::resolver::Resolver;
use domain::content::content_types as ct;
use tracing::warn;

const ROOT: &str = "/";

impl Resolver {
    /// Site path (before the locale prefix) of the item `codename`.
    ///
    /// The item is read from the draft handle at depth 0 in the locale's
    /// language; an unsupported locale reads the default. Any failure lands
    /// on `/` so a preview click always ends somewhere.
    #[tracing::instrument(skip(self))]
    pub async fn resolve_preview_path(
        &self,
        codename: &str,
        content_type: &str,
        locale: &str,
    ) -> String {
        let language = self.locales().resolve(locale).cms_language();
        let query = ItemQuery::new(language, PREVIEW_DEPTH);

        match self
            .repository(ReadMode::Draft)
            .fetch_by_codename(codename, &query)
            .await
        {
            Ok(Some(found)) => preview_path(content_type, found.item.slug()),
            Ok(None) => {
                warn!("preview item not found; falling back to root");
                ROOT.to_string()
            }
            Err(err) => {
                warn!(error = %err, "preview lookup failed; falling back to root");
                ROOT.to_string()
            }
        }
    }
}

/// Path for an item of `content_type` with `slug`. Empty slugs map to the
/// type's index path.
pub fn preview_path(content_type: &str, slug: &str) -> String {
    match (content_type, slug) {
        (ct::BLOG_POST, "") => "/blog".to_string(),
        (ct::BLOG_POST, slug) => format!("/blog/{slug}"),
        (ct::PAGE, "") => ROOT.to_string(),
        (ct::PAGE, slug) => format!("/{slug}"),
        _ => ROOT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryRepository;
    use crate::repository::{ContentClients, MockContentRepository, RepositoryError};
    use domain::{locale::Locales, setting::DuplicateSlugPolicy};
    use std::sync::Arc;

    const FIXTURE: &str = include_str!("../../../demos/site/content.json");

    fn fixture_resolver() -> Resolver {
        let repo = InMemoryRepository::from_json(FIXTURE).expect("fixture parses");
        Resolver::new(
            ContentClients::shared(Arc::new(repo)),
            Arc::new(Locales::default()),
            DuplicateSlugPolicy::First,
        )
    }

    #[tokio::test]
    async fn home_page_previews_at_root() {
        let path = fixture_resolver()
            .resolve_preview_path("page_home", "page", "en")
            .await;
        assert_eq!(path, "/");
    }

    #[tokio::test]
    async fn blog_post_previews_under_blog() {
        let path = fixture_resolver()
            .resolve_preview_path("blog_future_web", "blog_post", "en")
            .await;
        assert_eq!(path, "/blog/future-of-web-development");
    }

    #[tokio::test]
    async fn localized_slug_is_used_for_locale() {
        let resolver = fixture_resolver();
        assert_eq!(
            resolver
                .resolve_preview_path("page_services", "page", "ro")
                .await,
            "/servicii"
        );
        // Unsupported locale reads the default language.
        assert_eq!(
            resolver
                .resolve_preview_path("page_services", "page", "xx")
                .await,
            "/services"
        );
    }

    #[tokio::test]
    async fn rejected_fetch_falls_back_to_root() {
        let mut repo = MockContentRepository::new();
        repo.expect_fetch_by_codename()
            .times(1)
            .returning(|_, _| Err(RepositoryError::Transport("timed out".into())));

        let resolver = Resolver::new(
            ContentClients::new(
                Arc::new(InMemoryRepository::from_json(FIXTURE).expect("fixture parses")),
                Arc::new(repo),
            ),
            Arc::new(Locales::default()),
            DuplicateSlugPolicy::First,
        );
        let path = resolver
            .resolve_preview_path("blog_future_web", "blog_post", "en")
            .await;
        assert_eq!(path, "/");
    }

    #[tokio::test]
    async fn missing_item_falls_back_to_root() {
        let path = fixture_resolver()
            .resolve_preview_path("deleted_item", "page", "en")
            .await;
        assert_eq!(path, "/");
    }

    #[test]
    fn index_paths_and_unknown_types() {
        assert_eq!(preview_path("blog_post", ""), "/blog");
        assert_eq!(preview_path("page", "about"), "/about");
        assert_eq!(preview_path("hero", "anything"), "/");
    }
}
