// crates/serve/src/resolver.rs

//! Request → content resolution.
//!
//! The resolver owns no storage. It holds the injected repository handles
//! and the locale table, and turns `(slug, locale, mode)` into typed
//! entities. Every listing is filtered down to the variants that really
//! exist in the requested language: the CMS answers a query for a missing
//! variant with default-language content, which must never surface under
//! another locale's URL.

use crate::repository::{
    ContentClients, ContentRepository, ReadMode, RepositoryError, TypeQuery, PAGE_DEPTH,
};
use domain::{
    content::{content_types as ct, ContentItem},
    error::DecodeError,
    locale::Locales,
    model::{Expander, Page},
    setting::DuplicateSlugPolicy,
};
use std::{collections::HashSet, sync::Arc};
use thiserror::Error;
use tracing::{debug, warn};

// -----------------------------------------------------------------------------
// Error Type
// -----------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("slug `{slug}` in language `{language}` is claimed by {codenames:?}")]
    AmbiguousSlug {
        slug: String,
        language: String,
        codenames: Vec<String>,
    },
}

// -----------------------------------------------------------------------------
// Resolver
// -----------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Resolver {
    clients: ContentClients,
    locales: Arc<Locales>,
    duplicate_slugs: DuplicateSlugPolicy,
}

impl Resolver {
    pub fn new(
        clients: ContentClients,
        locales: Arc<Locales>,
        duplicate_slugs: DuplicateSlugPolicy,
    ) -> Self {
        Self {
            clients,
            locales,
            duplicate_slugs,
        }
    }

    pub fn locales(&self) -> &Locales {
        &self.locales
    }

    pub(crate) fn repository(&self, mode: ReadMode) -> &dyn ContentRepository {
        self.clients.for_mode(mode)
    }

    /// The one page at `slug` in `locale`, or `None`.
    ///
    /// An unsupported locale is `None`, the same as a missing page. The
    /// empty slug is the home page, never "any page".
    #[tracing::instrument(skip(self))]
    pub async fn resolve_page(
        &self,
        slug: &str,
        mode: ReadMode,
        locale: &str,
    ) -> Result<Option<Page>, ResolveError> {
        let resolution = self.locales.resolve(locale);
        if !resolution.is_valid {
            debug!("unsupported locale");
            return Ok(None);
        }
        let language = resolution.cms_language();

        let listing = self
            .repository(mode)
            .fetch_by_type(ct::PAGE, &TypeQuery::new(language, PAGE_DEPTH).slug(slug))
            .await?;

        let matches: Vec<&ContentItem> = real_variants(&listing.items, language)
            .filter(|item| item.slug() == slug)
            .collect();

        let item = match matches.as_slice() {
            [] => return Ok(None),
            [only] => *only,
            [first, ..] => {
                let codenames: Vec<String> =
                    matches.iter().map(|i| i.codename().to_string()).collect();
                match self.duplicate_slugs {
                    DuplicateSlugPolicy::First => {
                        warn!(
                            slug,
                            language,
                            ?codenames,
                            "several pages share one slug; serving the first"
                        );
                        *first
                    }
                    DuplicateSlugPolicy::Reject => {
                        return Err(ResolveError::AmbiguousSlug {
                            slug: slug.to_string(),
                            language: language.to_string(),
                            codenames,
                        })
                    }
                }
            }
        };

        let page = Page::decode(item, Expander::new(&listing.modular_content, PAGE_DEPTH))?;
        Ok(Some(page))
    }

    /// Every published page variant of each requested locale.
    ///
    /// Each distinct locale is queried once, in the order given. Unsupported
    /// codes are skipped.
    #[tracing::instrument(skip_all)]
    pub async fn resolve_all_pages(
        &self,
        locales: &[&str],
    ) -> Result<Vec<(String, Page)>, ResolveError> {
        let mut pages = Vec::new();

        for code in dedup(locales) {
            let Some(entry) = self.locales.get(code) else {
                warn!(locale = code, "skipping unsupported locale");
                continue;
            };

            let listing = self
                .repository(ReadMode::Published)
                .fetch_by_type(ct::PAGE, &TypeQuery::new(&entry.cms_language, PAGE_DEPTH))
                .await?;

            for item in real_variants(&listing.items, &entry.cms_language) {
                let page = Page::decode(item, Expander::new(&listing.modular_content, PAGE_DEPTH))?;
                pages.push((entry.code.clone(), page));
            }
        }

        Ok(pages)
    }

    /// Paths to precompute: every page and blog post, per locale.
    #[tracing::instrument(skip_all)]
    pub async fn static_routes(&self, locales: &[&str]) -> Result<Vec<String>, ResolveError> {
        let mut seen = HashSet::new();
        let mut routes = Vec::new();
        let mut push = |route: String| {
            if seen.insert(route.clone()) {
                routes.push(route);
            }
        };

        for (locale, page) in self.resolve_all_pages(locales).await? {
            push(page_path(&locale, &page.slug));
        }

        for code in dedup(locales) {
            if self.locales.get(code).is_none() {
                continue;
            }
            push(format!("/{code}/blog"));
            for post in self.blog_posts(ReadMode::Published, code).await? {
                if !post.slug.is_empty() {
                    push(format!("/{code}/blog/{}", post.slug));
                }
            }
        }

        Ok(routes)
    }
}

// -----------------------------------------------------------------------------
// Utility
// -----------------------------------------------------------------------------

/// Items that are real variants in `language`, not fallbacks.
pub(crate) fn real_variants<'a>(
    items: &'a [ContentItem],
    language: &'a str,
) -> impl Iterator<Item = &'a ContentItem> {
    items.iter().filter(move |item| item.language() == language)
}

fn dedup<'a>(codes: &[&'a str]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    codes.iter().copied().filter(|c| seen.insert(*c)).collect()
}

/// `/{locale}` for the home page, `/{locale}/{slug}` otherwise.
pub fn page_path(locale: &str, slug: &str) -> String {
    if slug.is_empty() {
        format!("/{locale}")
    } else {
        format!("/{locale}/{slug}")
    }
}
