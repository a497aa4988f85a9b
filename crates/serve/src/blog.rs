// crates/serve/src/blog.rs

use crate::repository::{ReadMode, TypeQuery, BLOG_LIST_DEPTH, BLOG_POST_DEPTH};
use crate::resolver::{real_variants, ResolveError, Resolver};
use domain::{
    content::content_types as ct,
    model::{BlogPost, Expander},
};
use tracing::warn;

const PUBLISH_DATE: &str = "publish_date";

impl Resolver {
    /// Posts of `locale`, newest first. Unsupported locales have no posts.
    #[tracing::instrument(skip(self))]
    pub async fn blog_posts(
        &self,
        mode: ReadMode,
        locale: &str,
    ) -> Result<Vec<BlogPost>, ResolveError> {
        let resolution = self.locales().resolve(locale);
        if !resolution.is_valid {
            return Ok(Vec::new());
        }
        let language = resolution.cms_language();

        let query = TypeQuery::new(language, BLOG_LIST_DEPTH).order_desc(PUBLISH_DATE);
        let listing = self
            .repository(mode)
            .fetch_by_type(ct::BLOG_POST, &query)
            .await?;

        real_variants(&listing.items, language)
            .map(|item| {
                BlogPost::decode(item, Expander::new(&listing.modular_content, BLOG_LIST_DEPTH))
                    .map_err(ResolveError::from)
            })
            .collect()
    }

    /// One post by slug. The empty slug is the blog index, never a post.
    #[tracing::instrument(skip(self))]
    pub async fn blog_post(
        &self,
        slug: &str,
        mode: ReadMode,
        locale: &str,
    ) -> Result<Option<BlogPost>, ResolveError> {
        let resolution = self.locales().resolve(locale);
        if !resolution.is_valid || slug.is_empty() {
            return Ok(None);
        }
        let language = resolution.cms_language();

        let query = TypeQuery::new(language, BLOG_POST_DEPTH).slug(slug);
        let listing = self
            .repository(mode)
            .fetch_by_type(ct::BLOG_POST, &query)
            .await?;

        let mut matches = real_variants(&listing.items, language).filter(|i| i.slug() == slug);
        let Some(item) = matches.next() else {
            return Ok(None);
        };
        if let Some(other) = matches.next() {
            warn!(
                slug,
                first = item.codename(),
                other = other.codename(),
                "several posts share one slug; serving the first"
            );
        }

        let expander = Expander::new(&listing.modular_content, BLOG_POST_DEPTH);
        let post = BlogPost::decode(item, expander)?;
        Ok(Some(post))
    }
}
