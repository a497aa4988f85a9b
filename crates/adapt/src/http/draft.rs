// crates/adapt/src/http/draft.rs

//! Draft-mode session.
//!
//! `/api/draft` checks the shared secret, sets the draft cookie and sends the
//! editor to the previewed item. A request is in draft mode when it carries
//! that cookie with the process bypass token as its value.

use crate::http::{app::AppState, error::HttpError};

use axum::{
    extract::{FromRequestParts, Query, State},
    http::request::Parts,
    response::Redirect,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use domain::{
    content::content_types as ct,
    locale::{localize_href, Locales, PathLocale},
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Deserialize;
use serve::ReadMode;
use sha2::{Digest, Sha256};
use std::convert::Infallible;
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

// ─────────────────────────────────────────────────────────────────────────────
// Extractor
// ─────────────────────────────────────────────────────────────────────────────

/// Whether the request carries a valid draft cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftMode(pub bool);

impl DraftMode {
    pub fn read_mode(self) -> ReadMode {
        if self.0 {
            ReadMode::Draft
        } else {
            ReadMode::Published
        }
    }
}

impl FromRequestParts<AppState> for DraftMode {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let active = jar
            .get(&state.draft.cookie_name)
            .is_some_and(|c| secrets_match(c.value(), &state.draft.bypass_token));
        Ok(DraftMode(active))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct EnableParams {
    pub secret: Option<String>,
    pub locale: Option<String>,
    pub codename: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    /// Legacy direct path, e.g. `/services`.
    pub slug: Option<String>,
}

#[tracing::instrument(skip_all)]
pub async fn enable(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<EnableParams>,
) -> Result<(CookieJar, Redirect), HttpError> {
    let accepted = match (state.draft.secret.as_deref(), params.secret.as_deref()) {
        (Some(expected), Some(given)) => secrets_match(given, expected),
        _ => false,
    };
    if !accepted {
        warn!("draft mode request with a wrong or missing secret");
        return Err(HttpError::InvalidSecret);
    }

    let locales = state.locales();
    let locale = locales
        .resolve(params.locale.as_deref().unwrap_or_default())
        .canonical_locale();

    let target = match (non_empty(params.slug), non_empty(params.codename)) {
        (Some(slug), _) if is_site_relative(&slug) => localized_target(locales, &slug, locale),
        (Some(slug), _) => {
            warn!(%slug, "ignoring off-site preview slug");
            locales.root_path(locale)
        }
        (None, Some(codename)) => {
            let content_type = params.content_type.as_deref().unwrap_or(ct::PAGE);
            let path = state
                .resolver
                .resolve_preview_path(&codename, content_type, locale)
                .await;
            localized_target(locales, &path, locale)
        }
        (None, None) => locales.root_path(locale),
    };

    info!(%target, "draft mode enabled");
    let token = state.draft.bypass_token.clone();
    let cookie = Cookie::build((state.draft.cookie_name.clone(), token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .build();

    Ok((jar.add(cookie), Redirect::temporary(&location(&target))))
}

#[derive(Debug, Default, Deserialize)]
pub struct DisableParams {
    #[serde(rename = "returnTo")]
    pub return_to: Option<String>,
    pub locale: Option<String>,
}

#[tracing::instrument(skip_all)]
pub async fn disable(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<DisableParams>,
) -> (CookieJar, Redirect) {
    let locales = state.locales();
    let locale = locales
        .resolve(params.locale.as_deref().unwrap_or_default())
        .canonical_locale();

    let target = match non_empty(params.return_to) {
        Some(to) if is_site_relative(&to) => to,
        Some(to) => {
            warn!(return_to = %to, "ignoring off-site return address");
            locales.root_path(locale)
        }
        None => locales.root_path(locale),
    };

    debug!(%target, "draft mode disabled");
    let removal = Cookie::build((state.draft.cookie_name.clone(), ""))
        .path("/")
        .same_site(SameSite::Lax);

    (jar.remove(removal), Redirect::temporary(&location(&target)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Utility
// ─────────────────────────────────────────────────────────────────────────────

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Bytes escaped in a `Location` value; non-ASCII is always escaped.
const LOCATION: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>');

/// `/path` on this site; rejects `//host`, backslash tricks and control
/// characters.
fn is_site_relative(href: &str) -> bool {
    href.starts_with('/')
        && !href.starts_with("//")
        && !href.contains('\\')
        && !href.chars().any(|c| c.is_control())
}

/// Header-safe form of a redirect target.
fn location(target: &str) -> String {
    utf8_percent_encode(target, LOCATION).to_string()
}

/// Constant-time equality over SHA-256 digests of both values.
fn secrets_match(given: &str, expected: &str) -> bool {
    let given = Sha256::digest(given.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    given.ct_eq(&expected).into()
}

/// Put a site path under `locale` unless it already carries a locale.
fn localized_target(locales: &Locales, path: &str, locale: &str) -> String {
    if let PathLocale::Localized { .. } = locales.classify_path(path) {
        return path.to_string();
    }
    if path == "/" {
        return locales.root_path(locale);
    }
    localize_href(path, locale)
}
