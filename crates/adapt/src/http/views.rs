// crates/adapt/src/http/views.rs

//! View models handed to the rendering layer as JSON.
//!
//! Every view starts with the same frame: the locale, draft state, editor
//! annotations (draft only) and the site chrome built from the site
//! configuration. Missing configuration falls back to fixed defaults so a
//! page still renders while the CMS is being set up.

use crate::dispatch::{dispatch_body, RenderDescriptor};

use chrono::{DateTime, Utc};
use domain::{
    locale::{localize_href, LocaleEntry, Locales},
    model::{BlogPost, Footer, Link, NavNode, Navigation, Page, SiteConfig},
    setting::BuildEnv,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

pub const FALLBACK_SITE_NAME: &str = "Acme Inc.";
pub const FALLBACK_BLOG_HEADING: &str = "Blog";

const FALLBACK_IMAGE_WIDTH: u32 = 900;
const FALLBACK_IMAGE_HEIGHT: u32 = 500;

const DISABLE_DRAFT_PATH: &str = "/api/disable-draft";

/// Query-component escaping: everything but unreserved characters.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// What a view needs to know about the request.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub locales: &'a Locales,
    pub locale: &'a LocaleEntry,
    pub draft: bool,
    /// Path below the locale prefix, `""` or starting with `/`.
    pub rest: &'a str,
    pub environment_id: &'a str,
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame and site chrome
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Frame {
    pub locale: String,
    pub date_locale: String,
    pub draft: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<PreviewAnnotations>,
    pub site: SiteChrome,
}

impl Frame {
    pub fn new(ctx: &ViewContext<'_>, config: Option<&SiteConfig>) -> Self {
        Self {
            locale: ctx.locale.code.clone(),
            date_locale: ctx.locale.date_locale.clone(),
            draft: ctx.draft,
            preview: ctx.draft.then(|| PreviewAnnotations {
                environment_id: ctx.environment_id.to_string(),
                language_codename: ctx.locale.cms_language.clone(),
                disable_href: disable_href(&ctx.locale.code, ctx.rest),
            }),
            site: SiteChrome::new(ctx, config),
        }
    }
}

/// Attributes the CMS editor reads to map the page back to its project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewAnnotations {
    pub environment_id: String,
    pub language_codename: String,
    /// Leaves draft mode and comes back to the current page.
    pub disable_href: String,
}

fn disable_href(locale: &str, rest: &str) -> String {
    let current = format!("/{locale}{rest}");
    format!(
        "{DISABLE_DRAFT_PATH}?returnTo={}",
        utf8_percent_encode(&current, QUERY_VALUE)
    )
}

#[derive(Debug, Serialize)]
pub struct SiteChrome {
    pub site_name: String,
    pub logo_url: Option<String>,
    pub navigation: Vec<NavLink>,
    pub footer: Option<FooterView>,
    pub locales: Vec<LocaleOption>,
}

impl SiteChrome {
    fn new(ctx: &ViewContext<'_>, config: Option<&SiteConfig>) -> Self {
        let code = ctx.locale.code.as_str();

        let site_name = config
            .map(|c| c.site_name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_SITE_NAME);

        Self {
            site_name: site_name.to_string(),
            logo_url: config.and_then(SiteConfig::logo_url).map(str::to_string),
            navigation: config
                .map(|c| nav_links(&c.header_navigation, code))
                .unwrap_or_default(),
            footer: config
                .and_then(|c| c.footer.as_ref())
                .and_then(Link::resolved)
                .map(|f| FooterView::new(f, code)),
            locales: ctx
                .locales
                .iter()
                .map(|entry| LocaleOption {
                    code: entry.code.clone(),
                    display_name: entry.display_name.clone(),
                    href: format!("/{}{}", entry.code, ctx.rest),
                    active: entry.code == ctx.locale.code,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavLink>,
}

fn nav_links(nav: &Navigation, locale: &str) -> Vec<NavLink> {
    nav.roots().map(|node| nav_link(nav, node, locale)).collect()
}

fn nav_link(nav: &Navigation, node: &NavNode, locale: &str) -> NavLink {
    NavLink {
        label: node.label.clone(),
        href: localize_href(&node.url, locale),
        children: nav
            .children(node)
            .map(|child| nav_link(nav, child, locale))
            .collect(),
    }
}

#[derive(Debug, Serialize)]
pub struct FooterView {
    pub columns: Vec<FooterColumnView>,
    pub copyright_text: String,
    pub social_links: Vec<NavLink>,
}

#[derive(Debug, Serialize)]
pub struct FooterColumnView {
    pub title: String,
    pub links: Vec<NavLink>,
}

impl FooterView {
    fn new(footer: &Footer, locale: &str) -> Self {
        Self {
            columns: footer
                .columns
                .iter()
                .filter_map(Link::resolved)
                .map(|column| FooterColumnView {
                    title: column.title.clone(),
                    links: nav_links(&column.links, locale),
                })
                .collect(),
            copyright_text: footer.copyright_text.clone(),
            social_links: nav_links(&footer.social_links, locale),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LocaleOption {
    pub code: String,
    pub display_name: String,
    pub href: String,
    pub active: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Page
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PageView<'a> {
    #[serde(flatten)]
    pub frame: Frame,
    pub item_id: &'a str,
    pub title: &'a str,
    pub meta_description: &'a str,
    pub slug: &'a str,
    pub blocks: Vec<RenderDescriptor<'a>>,
}

impl<'a> PageView<'a> {
    pub fn new(frame: Frame, page: &'a Page, env: BuildEnv) -> Self {
        Self {
            frame,
            item_id: &page.system.id,
            title: &page.title,
            meta_description: &page.meta_description,
            slug: &page.slug,
            blocks: dispatch_body(&page.body, env),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Blog
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BlogIndexView<'a> {
    #[serde(flatten)]
    pub frame: Frame,
    pub heading: String,
    pub subtitle: String,
    pub empty_message: String,
    pub posts: Vec<BlogCard<'a>>,
}

#[derive(Debug, Serialize)]
pub struct BlogCard<'a> {
    pub item_id: &'a str,
    pub title: &'a str,
    pub slug: &'a str,
    pub href: String,
    pub summary: &'a str,
    pub image_url: Option<&'a str>,
    pub publish_date: Option<DateTime<Utc>>,
}

impl<'a> BlogIndexView<'a> {
    pub fn new(frame: Frame, config: Option<&SiteConfig>, posts: &'a [BlogPost]) -> Self {
        let locale = frame.locale.clone();
        Self {
            heading: non_empty(config.map(|c| c.blog_heading.as_str()))
                .unwrap_or_else(|| FALLBACK_BLOG_HEADING.to_string()),
            subtitle: non_empty(config.map(|c| c.blog_subtitle.as_str())).unwrap_or_default(),
            empty_message: non_empty(config.map(|c| c.blog_empty_message.as_str()))
                .unwrap_or_default(),
            posts: posts
                .iter()
                .map(|post| BlogCard {
                    item_id: &post.system.id,
                    title: &post.title,
                    slug: &post.slug,
                    href: format!("/{locale}/blog/{}", post.slug),
                    summary: &post.summary,
                    image_url: post.image.first().map(|a| a.url.as_str()),
                    publish_date: post.publish_date,
                })
                .collect(),
            frame,
        }
    }
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.filter(|t| !t.is_empty()).map(str::to_string)
}

#[derive(Debug, Serialize)]
pub struct BlogPostView<'a> {
    #[serde(flatten)]
    pub frame: Frame,
    pub item_id: &'a str,
    pub title: &'a str,
    pub summary: &'a str,
    pub slug: &'a str,
    pub publish_date: Option<DateTime<Utc>>,
    pub back_href: String,
    pub image: Option<ImageView<'a>>,
    pub body: RichTextView<'a>,
}

#[derive(Debug, Serialize)]
pub struct ImageView<'a> {
    pub url: &'a str,
    pub alt: &'a str,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize)]
pub struct RichTextView<'a> {
    pub html: &'a str,
    pub components: Vec<RenderDescriptor<'a>>,
}

impl<'a> BlogPostView<'a> {
    pub fn new(frame: Frame, post: &'a BlogPost, env: BuildEnv) -> Self {
        let image = post.image.first().map(|asset| ImageView {
            url: &asset.url,
            alt: asset
                .description
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or(post.title.as_str()),
            width: asset.width.unwrap_or(FALLBACK_IMAGE_WIDTH),
            height: asset.height.unwrap_or(FALLBACK_IMAGE_HEIGHT),
        });

        Self {
            back_href: format!("/{}/blog", frame.locale),
            frame,
            item_id: &post.system.id,
            title: &post.title,
            summary: &post.summary,
            slug: &post.slug,
            publish_date: post.publish_date,
            image,
            body: RichTextView {
                html: &post.body.html,
                components: dispatch_body(&post.body.components, env),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(locales: &'a Locales, code: &str, draft: bool, rest: &'a str) -> ViewContext<'a> {
        ViewContext {
            locales,
            locale: locales.get(code).expect("supported locale"),
            draft,
            rest,
            environment_id: "env-123",
        }
    }

    #[test]
    fn missing_site_config_uses_fallbacks() {
        let locales = Locales::default();
        let frame = Frame::new(&ctx(&locales, "en", false, "/services"), None);

        assert_eq!(frame.site.site_name, FALLBACK_SITE_NAME);
        assert!(frame.site.logo_url.is_none());
        assert!(frame.site.navigation.is_empty());
        assert!(frame.site.footer.is_none());
        assert!(frame.preview.is_none());

        let index = BlogIndexView::new(frame, None, &[]);
        assert_eq!(index.heading, "Blog");
        assert_eq!(index.subtitle, "");
        assert_eq!(index.empty_message, "");
    }

    #[test]
    fn locale_switcher_keeps_the_current_path() {
        let locales = Locales::default();
        let frame = Frame::new(&ctx(&locales, "ro", false, "/blog"), None);

        let options: Vec<(&str, &str, bool)> = frame
            .site
            .locales
            .iter()
            .map(|o| (o.code.as_str(), o.href.as_str(), o.active))
            .collect();
        assert_eq!(options, vec![("en", "/en/blog", false), ("ro", "/ro/blog", true)]);
    }

    #[test]
    fn draft_frame_carries_editor_annotations() {
        let locales = Locales::default();
        let frame = Frame::new(&ctx(&locales, "en", true, ""), None);

        assert_eq!(
            frame.preview,
            Some(PreviewAnnotations {
                environment_id: "env-123".into(),
                language_codename: "default".into(),
                disable_href: "/api/disable-draft?returnTo=%2Fen".into(),
            })
        );
        let json = serde_json::to_value(&frame).expect("json");
        assert_eq!(json["preview"]["language_codename"], "default");
        assert_eq!(json["date_locale"], "en-US");
    }

    #[test]
    fn disable_link_returns_to_the_current_page() {
        let locales = Locales::default();
        let frame = Frame::new(&ctx(&locales, "ro", true, "/blog/cafe café"), None);
        let preview = frame.preview.expect("draft annotations");

        assert_eq!(
            preview.disable_href,
            "/api/disable-draft?returnTo=%2Fro%2Fblog%2Fcafe%20caf%C3%A9"
        );
    }
}
