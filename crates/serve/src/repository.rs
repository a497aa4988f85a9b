// crates/serve/src/repository.rs

//! Read port onto the headless CMS.
//!
//! Everything the resolver needs from the CMS goes through
//! [`ContentRepository`]. The Delivery API client and the in-memory fixture
//! store both implement it.

use async_trait::async_trait;
use domain::content::{ItemListing, ItemResponse};
use std::{fmt, sync::Arc};
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Expansion depths
// ─────────────────────────────────────────────────────────────────────────────

/// page → block → card → links inside a card.
pub const PAGE_DEPTH: u8 = 3;
/// site config → footer → column → navigation item.
pub const SITE_CONFIG_DEPTH: u8 = 3;
/// Listing cards need the post itself plus its direct references.
pub const BLOG_LIST_DEPTH: u8 = 1;
/// post → inline component → its cards.
pub const BLOG_POST_DEPTH: u8 = 2;
/// Preview only reads the slug.
pub const PREVIEW_DEPTH: u8 = 0;

// ─────────────────────────────────────────────────────────────────────────────
// Queries
// ─────────────────────────────────────────────────────────────────────────────

/// Which content a read sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadMode {
    Published,
    /// Latest versions, including unpublished changes.
    Draft,
}

/// Listing query for one content type.
///
/// `slug_equals: Some("")` filters on the empty slug (the home page);
/// `None` applies no slug filter at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeQuery {
    pub language: String,
    pub slug_equals: Option<String>,
    /// Element codename to sort on, newest first.
    pub order_by_descending: Option<String>,
    pub limit: Option<u32>,
    pub expand_depth: u8,
}

impl TypeQuery {
    pub fn new(language: &str, expand_depth: u8) -> Self {
        Self {
            language: language.to_string(),
            expand_depth,
            ..Default::default()
        }
    }

    pub fn slug(mut self, slug: &str) -> Self {
        self.slug_equals = Some(slug.to_string());
        self
    }

    pub fn order_desc(mut self, element: &str) -> Self {
        self.order_by_descending = Some(element.to_string());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    pub language: String,
    pub expand_depth: u8,
}

impl ItemQuery {
    pub fn new(language: &str, expand_depth: u8) -> Self {
        Self {
            language: language.to_string(),
            expand_depth,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("repository answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed repository response: {0}")]
    Decode(String),

    #[error("repository configuration error: {0}")]
    Config(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Port
// ─────────────────────────────────────────────────────────────────────────────

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Items of `content_type` matching `query`, in repository order, plus
    /// the linked-item arena expanded to `query.expand_depth`.
    async fn fetch_by_type(
        &self,
        content_type: &str,
        query: &TypeQuery,
    ) -> Result<ItemListing, RepositoryError>;

    /// One item by codename, or `None` if the repository has no such item.
    async fn fetch_by_codename(
        &self,
        codename: &str,
        query: &ItemQuery,
    ) -> Result<Option<ItemResponse>, RepositoryError>;
}

/// Published and draft repository handles, built once at start-up.
#[derive(Clone)]
pub struct ContentClients {
    published: Arc<dyn ContentRepository>,
    draft: Arc<dyn ContentRepository>,
}

impl ContentClients {
    pub fn new(published: Arc<dyn ContentRepository>, draft: Arc<dyn ContentRepository>) -> Self {
        Self { published, draft }
    }

    /// One repository for both modes (fixtures, offline development).
    pub fn shared(repository: Arc<dyn ContentRepository>) -> Self {
        Self {
            published: repository.clone(),
            draft: repository,
        }
    }

    pub fn for_mode(&self, mode: ReadMode) -> &dyn ContentRepository {
        match mode {
            ReadMode::Published => self.published.as_ref(),
            ReadMode::Draft => self.draft.as_ref(),
        }
    }
}

impl fmt::Debug for ContentClients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentClients").finish_non_exhaustive()
    }
}
