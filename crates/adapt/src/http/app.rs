// crates/adapt/src/http/app.rs

use crate::http::{cookie::CrossSiteCookieLayer, draft, pages};

use axum::{routing::get, Router};
use domain::{locale::Locales, setting::BuildEnv};
use serve::Resolver;
use std::sync::Arc;
use tower_http::{normalize_path::NormalizePath, trace::TraceLayer};

/// Draft-mode session settings, fixed at start-up.
#[derive(Debug, Clone)]
pub struct DraftConfig {
    /// Shared secret the CMS sends to `/api/draft`. `None` disables draft mode.
    pub secret: Option<String>,
    /// Value a draft cookie must carry to count.
    pub bypass_token: String,
    pub cookie_name: String,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub draft: Arc<DraftConfig>,
    pub env: BuildEnv,
    /// CMS environment id, exposed to the editor in draft views.
    pub environment_id: Arc<str>,
}

impl AppState {
    pub fn locales(&self) -> &Locales {
        self.resolver.locales()
    }
}

#[tracing::instrument(skip_all)]
pub fn build_app(state: AppState) -> Router {
    let draft_routes = Router::new()
        .route("/api/draft", get(draft::enable))
        .route("/api/disable-draft", get(draft::disable))
        .layer(CrossSiteCookieLayer);

    Router::new()
        .route("/", get(pages::home))
        .route("/{locale}", get(pages::site_entry))
        .route("/{locale}/{*rest}", get(pages::site_entry))
        .merge(draft_routes)
        .fallback(pages::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// The router behind trailing-slash normalization, ready to serve.
pub fn build_service(state: AppState) -> NormalizePath<Router> {
    NormalizePath::trim_trailing_slash(build_app(state))
}
