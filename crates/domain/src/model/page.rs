// crates/domain/src/model/page.rs

use crate::content::{content_types as ct, Asset, ContentItem, SystemAttributes};
use crate::error::DecodeError;
use crate::model::block::{Block, RichText};
use crate::model::expand::{Expander, Link};
use crate::model::navigation::Navigation;
use chrono::{DateTime, Utc};
use serde::Serialize;

fn expect_type(item: &ContentItem, expected: &'static str) -> Result<(), DecodeError> {
    if item.content_type() == expected {
        Ok(())
    } else {
        Err(DecodeError::UnexpectedType {
            codename: item.codename().to_string(),
            expected,
            found: item.content_type().to_string(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Page
// ─────────────────────────────────────────────────────────────────────────────

/// A routable page. `body` keeps the authored block order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub system: SystemAttributes,
    pub title: String,
    /// URL path below the locale prefix. Empty means the site root.
    pub slug: String,
    pub meta_description: String,
    pub body: Vec<Link<Block>>,
}

impl Page {
    pub fn decode(item: &ContentItem, expander: Expander<'_>) -> Result<Self, DecodeError> {
        expect_type(item, ct::PAGE)?;
        Ok(Self {
            system: item.system.clone(),
            title: item.text("title").to_string(),
            slug: item.slug().to_string(),
            meta_description: item.text("meta_description").to_string(),
            body: expander.any_links(item.linked("body"), Block::decode),
        })
    }

    /// Resolved blocks only, in body order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.body.iter().filter_map(Link::resolved)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Blog post
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPost {
    pub system: SystemAttributes,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub body: RichText,
    pub image: Vec<Asset>,
    pub publish_date: Option<DateTime<Utc>>,
}

impl BlogPost {
    pub fn decode(item: &ContentItem, expander: Expander<'_>) -> Result<Self, DecodeError> {
        expect_type(item, ct::BLOG_POST)?;
        Ok(Self {
            system: item.system.clone(),
            title: item.text("title").to_string(),
            slug: item.slug().to_string(),
            summary: item.text("summary").to_string(),
            body: RichText::decode(item, "body", expander),
            image: item.assets("image").to_vec(),
            publish_date: item.date_time("publish_date"),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Site configuration (singleton)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteConfig {
    pub system: SystemAttributes,
    pub site_name: String,
    pub logo: Vec<Asset>,
    pub header_navigation: Navigation,
    pub footer: Option<Link<Footer>>,
    pub blog_heading: String,
    pub blog_subtitle: String,
    pub blog_empty_message: String,
}

impl SiteConfig {
    pub fn decode(item: &ContentItem, expander: Expander<'_>) -> Result<Self, DecodeError> {
        expect_type(item, ct::SITE_CONFIG)?;
        let footer = expander
            .links(item.linked("footer"), ct::FOOTER, Footer::decode)
            .into_iter()
            .next();

        Ok(Self {
            system: item.system.clone(),
            site_name: item.text("site_name").to_string(),
            logo: item.assets("logo").to_vec(),
            header_navigation: Navigation::build(item.linked("header_navigation"), expander),
            footer,
            blog_heading: item.text("blog_heading").to_string(),
            blog_subtitle: item.text("blog_subtitle").to_string(),
            blog_empty_message: item.text("blog_empty_message").to_string(),
        })
    }

    pub fn logo_url(&self) -> Option<&str> {
        self.logo.first().map(|a| a.url.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footer {
    pub system: SystemAttributes,
    pub columns: Vec<Link<FooterColumn>>,
    pub copyright_text: String,
    pub social_links: Navigation,
}

impl Footer {
    fn decode(item: &ContentItem, expander: Expander<'_>) -> Self {
        Self {
            system: item.system.clone(),
            columns: expander.links(
                item.linked("columns"),
                ct::FOOTER_COLUMN,
                FooterColumn::decode,
            ),
            copyright_text: item.text("copyright_text").to_string(),
            social_links: Navigation::build(item.linked("social_links"), expander),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FooterColumn {
    pub system: SystemAttributes,
    pub title: String,
    pub links: Navigation,
}

impl FooterColumn {
    fn decode(item: &ContentItem, expander: Expander<'_>) -> Self {
        Self {
            system: item.system.clone(),
            title: item.text("title").to_string(),
            links: Navigation::build(item.linked("links"), expander),
        }
    }
}
