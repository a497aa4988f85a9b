// crates/adapt/src/http/pages.rs

use crate::http::{
    app::AppState,
    draft::DraftMode,
    error::HttpError,
    views::{BlogIndexView, BlogPostView, Frame, PageView, ViewContext},
};

use axum::{
    extract::State,
    http::Uri,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use domain::{
    locale::{LocaleEntry, PathLocale},
    model::SiteConfig,
};
use percent_encoding::percent_decode_str;
use serve::ResolveError;
use tracing::{debug, warn};

const BLOG: &str = "blog";

#[tracing::instrument(skip_all)]
pub async fn home(State(state): State<AppState>) -> Redirect {
    let root = format!("/{}", state.locales().default_locale().code);
    Redirect::temporary(&root)
}

#[tracing::instrument(skip_all, fields(path = %uri.path()))]
pub async fn not_found(uri: Uri) -> HttpError {
    debug!("no route");
    HttpError::NotFound
}

/// Every path under a locale-shaped first segment lands here.
#[tracing::instrument(skip_all, fields(path = %uri.path()))]
pub async fn site_entry(
    State(state): State<AppState>,
    draft: DraftMode,
    uri: Uri,
) -> Result<Response, HttpError> {
    let path_and_query = uri.path_and_query().map_or(uri.path(), |pq| pq.as_str());

    let (locale, rest) = match state.locales().classify_path(path_and_query) {
        PathLocale::Localized { locale, rest } => (locale, rest),
        PathLocale::MissingPrefix { redirect_to } => {
            debug!(%redirect_to, "adding locale prefix");
            return Ok(Redirect::temporary(&redirect_to).into_response());
        }
        PathLocale::InvalidLocale { segment } => {
            debug!(%segment, "unsupported locale");
            return Err(HttpError::NotFound);
        }
    };

    let rest = percent_decode_str(&rest)
        .decode_utf8()
        .map_err(|_| HttpError::NotFound)?
        .into_owned();

    let ctx = ViewContext {
        locales: state.locales(),
        locale,
        draft: draft.0,
        rest: &rest,
        environment_id: &state.environment_id,
    };

    let path = rest.trim_start_matches('/');
    if path == BLOG {
        blog_index(&state, &ctx, draft).await
    } else if let Some(slug) = path.strip_prefix("blog/") {
        blog_post(&state, &ctx, draft, slug).await
    } else {
        page(&state, &ctx, draft, path).await
    }
}

async fn page(
    state: &AppState,
    ctx: &ViewContext<'_>,
    draft: DraftMode,
    slug: &str,
) -> Result<Response, HttpError> {
    let mode = draft.read_mode();
    let code = &ctx.locale.code;

    let (config, page) = futures::join!(
        state.resolver.site_config(mode, code),
        state.resolver.resolve_page(slug, mode, code),
    );
    let page = page?.ok_or(HttpError::NotFound)?;
    let config = chrome_or_fallback(config, ctx.locale);

    let view = PageView::new(Frame::new(ctx, config.as_ref()), &page, state.env);
    Ok(Json(view).into_response())
}

async fn blog_index(
    state: &AppState,
    ctx: &ViewContext<'_>,
    draft: DraftMode,
) -> Result<Response, HttpError> {
    let mode = draft.read_mode();
    let code = &ctx.locale.code;

    let (config, posts) = futures::join!(
        state.resolver.site_config(mode, code),
        state.resolver.blog_posts(mode, code),
    );
    let posts = posts?;
    let config = chrome_or_fallback(config, ctx.locale);

    let view = BlogIndexView::new(Frame::new(ctx, config.as_ref()), config.as_ref(), &posts);
    Ok(Json(view).into_response())
}

async fn blog_post(
    state: &AppState,
    ctx: &ViewContext<'_>,
    draft: DraftMode,
    slug: &str,
) -> Result<Response, HttpError> {
    let mode = draft.read_mode();
    let code = &ctx.locale.code;

    let (config, post) = futures::join!(
        state.resolver.site_config(mode, code),
        state.resolver.blog_post(slug, mode, code),
    );
    let post = post?.ok_or(HttpError::NotFound)?;
    let config = chrome_or_fallback(config, ctx.locale);

    let view = BlogPostView::new(Frame::new(ctx, config.as_ref()), &post, state.env);
    Ok(Json(view).into_response())
}

/// Site chrome never takes a page down; a failed lookup renders defaults.
fn chrome_or_fallback(
    config: Result<Option<SiteConfig>, ResolveError>,
    locale: &LocaleEntry,
) -> Option<SiteConfig> {
    config.unwrap_or_else(|err| {
        warn!(
            locale = %locale.code,
            error = %err,
            "site configuration unavailable; using defaults"
        );
        None
    })
}
