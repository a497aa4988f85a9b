// crates/domain/src/setting.rs

use crate::locale::LocaleEntry;
use serde::Deserialize;
use std::{net::SocketAddr, path::PathBuf};

pub const PUBLISHED_DELIVERY_URL: &str = "https://deliver.kontent.ai";
pub const PREVIEW_DELIVERY_URL: &str = "https://preview-deliver.kontent.ai";
pub const DEFAULT_DRAFT_COOKIE: &str = "brochure_draft";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub delivery: DeliverySettings,
    #[serde(default)]
    pub draft: DraftSettings,
    #[serde(default)]
    pub locales: LocaleSettings,
    #[serde(default)]
    pub site: SiteSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Address the HTTP listener binds to
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliverySettings {
    /// CMS environment (project) id. Empty when serving from a fixture.
    #[serde(default)]
    pub environment_id: String,

    #[serde(default = "default_published_url")]
    pub published_url: String,

    #[serde(default = "default_preview_url")]
    pub preview_url: String,

    /// Required for draft reads against the preview endpoint
    #[serde(default)]
    pub preview_api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            environment_id: String::new(),
            published_url: default_published_url(),
            preview_url: default_preview_url(),
            preview_api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_published_url() -> String {
    PUBLISHED_DELIVERY_URL.to_string()
}

fn default_preview_url() -> String {
    PREVIEW_DELIVERY_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct DraftSettings {
    /// Shared secret the CMS sends to `/api/draft`. Draft mode cannot be
    /// entered while unset.
    #[serde(default)]
    pub secret: Option<String>,

    /// Value the draft cookie must carry. Generated at start when unset.
    #[serde(default)]
    pub bypass_token: Option<String>,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

impl Default for DraftSettings {
    fn default() -> Self {
        Self {
            secret: None,
            bypass_token: None,
            cookie_name: default_cookie_name(),
        }
    }
}

fn default_cookie_name() -> String {
    DEFAULT_DRAFT_COOKIE.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocaleSettings {
    #[serde(default = "default_locale_code")]
    pub default: String,
    #[serde(default = "default_locale_entries")]
    pub entries: Vec<LocaleEntry>,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            default: default_locale_code(),
            entries: default_locale_entries(),
        }
    }
}

fn default_locale_code() -> String {
    "en".to_string()
}

fn default_locale_entries() -> Vec<LocaleEntry> {
    vec![
        LocaleEntry::new("en", "default", "en-US", "EN"),
        LocaleEntry::new("ro", "ro", "ro-RO", "RO"),
    ]
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildEnv {
    Development,
    #[default]
    Production,
}

impl BuildEnv {
    pub fn is_development(self) -> bool {
        matches!(self, BuildEnv::Development)
    }
}

/// What to do when more than one page variant claims the same slug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateSlugPolicy {
    /// Take the first result and log the conflict.
    #[default]
    First,
    /// Fail the lookup.
    Reject,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteSettings {
    #[serde(default)]
    pub environment: BuildEnv,

    #[serde(default)]
    pub duplicate_slugs: DuplicateSlugPolicy,

    /// JSON fixture served by the in-memory repository instead of the
    /// Delivery API, relative to the site directory.
    #[serde(default)]
    pub fixture: Option<PathBuf>,
}
