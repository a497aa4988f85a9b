// crates/adapt/src/http/cookie.rs

//! Tower layer that makes `Set-Cookie` headers usable inside a cross-site
//! iframe.
//!
//! The CMS editor embeds the site in an iframe on another origin, where
//! browsers drop `SameSite=Lax` cookies. Every `Set-Cookie` on the wrapped
//! routes gets `SameSite=Lax` (any letter case) rewritten to
//! `SameSite=None; Secure`. Mount it on the draft endpoints only.

use axum::{body::Body, http::Request, response::Response};
use futures::future::BoxFuture;
use http::{header::SET_COOKIE, HeaderMap, HeaderValue};
use regex::Regex;
use std::{
    borrow::Cow,
    sync::LazyLock,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::{debug, warn};

static SAME_SITE_LAX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)SameSite=Lax").expect("literal pattern compiles"));

const CROSS_SITE: &str = "SameSite=None; Secure";

// ─────────────────────────────────────────────────────────────────────────────
// CrossSiteCookieLayer
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct CrossSiteCookieLayer;

impl<S> Layer<S> for CrossSiteCookieLayer {
    type Service = CrossSiteCookies<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CrossSiteCookies { inner }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CrossSiteCookies
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CrossSiteCookies<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for CrossSiteCookies<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Error: Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    #[tracing::instrument(skip_all)]
    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let mut response = inner.call(req).await?;
            rewrite_set_cookies(response.headers_mut());
            Ok(response)
        })
    }
}

/// Rewrite every `Set-Cookie` value in place, keeping header order.
pub fn rewrite_set_cookies(headers: &mut HeaderMap) {
    let originals: Vec<HeaderValue> = headers.get_all(SET_COOKIE).iter().cloned().collect();
    if originals.is_empty() {
        return;
    }

    headers.remove(SET_COOKIE);
    for value in originals {
        headers.append(SET_COOKIE, cross_site(value));
    }
}

fn cross_site(value: HeaderValue) -> HeaderValue {
    let Ok(text) = value.to_str() else {
        warn!("non-ascii Set-Cookie left as is");
        return value;
    };

    match SAME_SITE_LAX.replace(text, CROSS_SITE) {
        Cow::Borrowed(_) => value,
        Cow::Owned(rewritten) => {
            debug!("Set-Cookie rewritten for cross-site use");
            HeaderValue::from_str(&rewritten).unwrap_or(value)
        }
    }
}
