// crates/domain/src/locale.rs

//! URL locale segments and the CMS languages behind them.
//!
//! The set of locales is closed and comes from configuration. Exactly one
//! entry is the default; its CMS language identifier is the CMS's primary
//! language (`"default"`), which is not a natural-language code.

use crate::error::LocaleError;
use crate::setting::LocaleSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleEntry {
    /// URL segment, e.g. `en`.
    pub code: String,
    /// Language codename sent to the content repository.
    pub cms_language: String,
    /// BCP 47 tag used when formatting dates, e.g. `en-US`.
    pub date_locale: String,
    /// Short label for a language switcher.
    pub display_name: String,
}

impl LocaleEntry {
    pub fn new(code: &str, cms_language: &str, date_locale: &str, display_name: &str) -> Self {
        Self {
            code: code.to_string(),
            cms_language: cms_language.to_string(),
            date_locale: date_locale.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locales {
    entries: Vec<LocaleEntry>,
    default: usize,
}

impl Default for Locales {
    fn default() -> Self {
        Self {
            entries: vec![
                LocaleEntry::new("en", "default", "en-US", "EN"),
                LocaleEntry::new("ro", "ro", "ro-RO", "RO"),
            ],
            default: 0,
        }
    }
}

/// Outcome of looking up a URL segment.
///
/// An unsupported segment still carries the default entry so callers can
/// choose between rejecting the request and carrying on with the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleResolution<'a> {
    pub is_valid: bool,
    pub entry: &'a LocaleEntry,
}

impl<'a> LocaleResolution<'a> {
    pub fn canonical_locale(&self) -> &'a str {
        &self.entry.code
    }

    pub fn cms_language(&self) -> &'a str {
        &self.entry.cms_language
    }
}

/// Where a request path stands with respect to the locale prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathLocale<'a> {
    /// `rest` is the remainder after the prefix, `""` or starting with `/`.
    Localized {
        locale: &'a LocaleEntry,
        rest: String,
    },
    MissingPrefix {
        redirect_to: String,
    },
    InvalidLocale {
        segment: String,
    },
}

impl Locales {
    pub fn new(entries: Vec<LocaleEntry>, default_code: &str) -> Result<Self, LocaleError> {
        if entries.is_empty() {
            return Err(LocaleError::Empty);
        }

        for (i, entry) in entries.iter().enumerate() {
            if !is_locale_code(&entry.code) {
                return Err(LocaleError::InvalidCode(entry.code.clone()));
            }
            if entries[..i].iter().any(|e| e.code == entry.code) {
                return Err(LocaleError::Duplicate(entry.code.clone()));
            }
        }

        let default = entries
            .iter()
            .position(|e| e.code == default_code)
            .ok_or_else(|| LocaleError::UnknownDefault(default_code.to_string()))?;

        Ok(Self { entries, default })
    }

    pub fn resolve(&self, segment: &str) -> LocaleResolution<'_> {
        match self.get(segment) {
            Some(entry) => LocaleResolution {
                is_valid: true,
                entry,
            },
            None => LocaleResolution {
                is_valid: false,
                entry: self.default_locale(),
            },
        }
    }

    pub fn get(&self, code: &str) -> Option<&LocaleEntry> {
        self.entries.iter().find(|e| e.code == code)
    }

    pub fn default_locale(&self) -> &LocaleEntry {
        &self.entries[self.default]
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocaleEntry> {
        self.entries.iter()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.code.as_str())
    }

    pub fn by_cms_language(&self, language: &str) -> Option<&LocaleEntry> {
        self.entries.iter().find(|e| e.cms_language == language)
    }

    /// `/{code}` for a supported code, the default root otherwise.
    pub fn root_path(&self, code: &str) -> String {
        format!("/{}", self.resolve(code).canonical_locale())
    }

    /// Classify a request path (query string optional).
    ///
    /// A first segment shaped like a locale tag but not supported is
    /// rejected. Anything else without a supported prefix gets redirected
    /// under the default locale with the rest of the path and the query
    /// kept as they were.
    pub fn classify_path(&self, path_and_query: &str) -> PathLocale<'_> {
        let (path, query) = match path_and_query.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path_and_query, None),
        };

        let trimmed = path.trim_start_matches('/');
        let (segment, rest) = match trimmed.find('/') {
            Some(i) => (&trimmed[..i], &trimmed[i..]),
            None => (trimmed, ""),
        };

        if let Some(locale) = self.get(segment) {
            return PathLocale::Localized {
                locale,
                rest: rest.trim_end_matches('/').to_string(),
            };
        }

        if looks_like_locale(segment) {
            return PathLocale::InvalidLocale {
                segment: segment.to_string(),
            };
        }

        let mut redirect_to = format!("/{}", self.default_locale().code);
        if !trimmed.is_empty() {
            redirect_to.push('/');
            redirect_to.push_str(trimmed);
        }
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            redirect_to.push('?');
            redirect_to.push_str(q);
        }
        PathLocale::MissingPrefix { redirect_to }
    }
}

impl TryFrom<&LocaleSettings> for Locales {
    type Error = LocaleError;

    fn try_from(settings: &LocaleSettings) -> Result<Self, Self::Error> {
        Locales::new(settings.entries.clone(), &settings.default)
    }
}

/// Prefix a site-relative href with `/{locale}`.
///
/// Empty hrefs, `http…` URLs, in-page anchors and `mailto:` links come back
/// unchanged. The prefix is added unconditionally otherwise, so an href that
/// is already localized must not be passed through again.
pub fn localize_href(href: &str, locale: &str) -> String {
    if href.is_empty()
        || href.starts_with("http")
        || href.starts_with('#')
        || href.starts_with("mailto:")
    {
        return href.to_string();
    }

    if href.starts_with('/') {
        format!("/{locale}{href}")
    } else {
        format!("/{locale}/{href}")
    }
}

/// `en`, `pt-br`, `zh-hant`: lowercase letters, optional lowercase subtags.
fn is_locale_code(code: &str) -> bool {
    let mut parts = code.split('-');
    let primary_ok = parts
        .next()
        .is_some_and(|p| (2..=3).contains(&p.len()) && p.bytes().all(|b| b.is_ascii_lowercase()));
    primary_ok
        && parts.all(|p| {
            (2..=8).contains(&p.len())
                && p.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}

/// `xx` or `xx-YY`, in any letter case.
fn looks_like_locale(segment: &str) -> bool {
    let alpha2 = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_alphabetic());
    match segment.split_once('-') {
        None => alpha2(segment),
        Some((lang, region)) => alpha2(lang) && alpha2(region),
    }
}
