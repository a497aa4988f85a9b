// crates/serve/src/site.rs

use crate::repository::{ReadMode, TypeQuery, SITE_CONFIG_DEPTH};
use crate::resolver::{ResolveError, Resolver};
use domain::{
    content::content_types as ct,
    model::{Expander, SiteConfig},
};
use tracing::debug;

impl Resolver {
    /// The site configuration singleton for `locale`.
    ///
    /// Unlike pages, a fallback variant is accepted here: untranslated site
    /// chrome beats no chrome. An unsupported locale reads the default.
    #[tracing::instrument(skip(self))]
    pub async fn site_config(
        &self,
        mode: ReadMode,
        locale: &str,
    ) -> Result<Option<SiteConfig>, ResolveError> {
        let language = self.locales().resolve(locale).cms_language();

        let query = TypeQuery::new(language, SITE_CONFIG_DEPTH).limit(1);
        let listing = self
            .repository(mode)
            .fetch_by_type(ct::SITE_CONFIG, &query)
            .await?;

        let Some(item) = listing.items.first() else {
            debug!("no site configuration item");
            return Ok(None);
        };
        if item.language() != language {
            debug!(served = item.language(), "site configuration falls back");
        }

        let expander = Expander::new(&listing.modular_content, SITE_CONFIG_DEPTH);
        let config = SiteConfig::decode(item, expander)?;
        Ok(Some(config))
    }
}
