use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt; // oneshot

use adapt::http::{build_service, AppState, DraftConfig};
use domain::{
    locale::Locales,
    setting::{BuildEnv, DuplicateSlugPolicy},
};
use serve::{memory::InMemoryRepository, ContentClients, Resolver};

type AppSvc = tower_http::normalize_path::NormalizePath<Router>;

const FIXTURE: &str = include_str!("../../../demos/site/content.json");
const SECRET: &str = "s3cret";
const TOKEN: &str = "bypass-token";
const COOKIE: &str = "brochure_draft";

// === Build app like main ===
fn build_test_app(env: BuildEnv, secret: Option<&str>) -> AppSvc {
    let repo = InMemoryRepository::from_json(FIXTURE).unwrap();
    let resolver = Resolver::new(
        ContentClients::shared(Arc::new(repo)),
        Arc::new(Locales::default()),
        DuplicateSlugPolicy::First,
    );
    build_service(AppState {
        resolver: Arc::new(resolver),
        draft: Arc::new(DraftConfig {
            secret: secret.map(str::to_string),
            bypass_token: TOKEN.to_string(),
            cookie_name: COOKIE.to_string(),
        }),
        env,
        environment_id: Arc::from("env-123"),
    })
}

fn app() -> AppSvc {
    build_test_app(BuildEnv::Production, Some(SECRET))
}

// === Small IO helpers ===
async fn read(resp: Response) -> (StatusCode, String) {
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

async fn send(app: &AppSvc, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.unwrap()
}

async fn get(app: &AppSvc, path: &str) -> Response {
    send(app, Request::get(path).body(Body::empty()).unwrap()).await
}

async fn get_json(app: &AppSvc, path: &str) -> (StatusCode, Value) {
    let (status, body) = read(get(app, path).await).await;
    (status, serde_json::from_str(&body).unwrap())
}

fn location(resp: &Response) -> &str {
    resp.headers()[header::LOCATION].to_str().unwrap()
}

fn set_cookies(resp: &Response) -> Vec<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

fn renderers(view: &Value) -> Vec<&str> {
    view["blocks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["renderer"].as_str().unwrap())
        .collect()
}

// === Locale routing ===

#[tokio::test]
async fn root_redirects_to_default_locale() {
    let resp = get(&app(), "/").await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/en");
}

#[tokio::test]
async fn unprefixed_path_redirects_with_query() {
    let resp = get(&app(), "/services?utm=mail").await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/en/services?utm=mail");
}

#[tokio::test]
async fn unsupported_locale_is_not_found() {
    let (status, body) = get_json(&app(), "/fr/services").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");
}

// === Pages ===

#[tokio::test]
async fn home_page_renders_blocks_in_body_order() {
    let (status, view) = get_json(&app(), "/en").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["title"], "Home");
    assert_eq!(view["slug"], "");
    assert_eq!(view["locale"], "en");
    assert_eq!(view["draft"], false);
    assert!(view.get("preview").is_none());
    assert_eq!(renderers(&view), vec!["hero", "feature_grid", "faq"]);
    assert_eq!(view["site"]["site_name"], "Acme Inc.");
}

#[tokio::test]
async fn unknown_block_depends_on_build_env() {
    let (_, prod) = get_json(&app(), "/en/services").await;
    assert_eq!(renderers(&prod), vec!["text_with_image", "call_to_action"]);

    let dev = build_test_app(BuildEnv::Development, Some(SECRET));
    let (_, view) = get_json(&dev, "/en/services").await;
    assert_eq!(
        renderers(&view),
        vec!["text_with_image", "call_to_action", "diagnostic"]
    );
    assert_eq!(
        view["blocks"][2]["props"]["message"],
        "Unknown component type: video_embed"
    );
}

#[tokio::test]
async fn localized_page_uses_localized_chrome() {
    let (status, view) = get_json(&app(), "/ro/servicii").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["title"], "Servicii");
    assert_eq!(view["date_locale"], "ro-RO");
    assert_eq!(view["site"]["site_name"], "Acme SRL");

    let hrefs: Vec<&str> = view["site"]["navigation"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["href"].as_str().unwrap())
        .collect();
    assert_eq!(hrefs, vec!["/ro/", "/ro/servicii", "/ro/blog"]);

    let switcher = &view["site"]["locales"];
    assert_eq!(switcher[0]["href"], "/en/servicii");
    assert_eq!(switcher[1]["active"], true);
}

#[tokio::test]
async fn missing_translation_is_not_found() {
    let resp = get(&app(), "/ro/about").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = get(&app(), "/en/about").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn trailing_slash_is_normalized() {
    let (status, view) = get_json(&app(), "/en/services/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["slug"], "services");
}

// === Blog ===

#[tokio::test]
async fn blog_index_lists_newest_first() {
    let (status, view) = get_json(&app(), "/en/blog").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["heading"], "Blog");

    let hrefs: Vec<&str> = view["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["href"].as_str().unwrap())
        .collect();
    assert_eq!(
        hrefs,
        vec!["/en/blog/why-headless", "/en/blog/future-of-web-development"]
    );
}

#[tokio::test]
async fn localized_blog_index_has_only_real_variants() {
    let (_, view) = get_json(&app(), "/ro/blog").await;
    assert_eq!(view["heading"], "Jurnal");
    let posts = view["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["slug"], "viitorul-dezvoltarii-web");
}

#[tokio::test]
async fn blog_post_renders_inline_components() {
    let (status, view) = get_json(&app(), "/en/blog/why-headless").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["title"], "Why headless");
    assert_eq!(view["back_href"], "/en/blog");
    assert_eq!(view["body"]["components"][0]["renderer"], "call_to_action");

    let resp = get(&app(), "/en/blog/no-such-post").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// === Draft mode ===

#[tokio::test]
async fn draft_rejects_wrong_or_unconfigured_secret() {
    let (status, body) = read(get(&app(), "/api/draft?secret=nope").await).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "Invalid secret");

    let closed = build_test_app(BuildEnv::Production, None);
    let resp = get(&closed, "/api/draft?secret=").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn draft_redirects_to_previewed_item_with_cross_site_cookie() {
    let resp = get(
        &app(),
        "/api/draft?secret=s3cret&codename=blog_future_web&type=blog_post&locale=ro",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/ro/blog/viitorul-dezvoltarii-web");

    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("brochure_draft=bypass-token"));
    assert!(cookies[0].contains("SameSite=None; Secure"));
    assert!(!cookies[0].to_ascii_lowercase().contains("samesite=lax"));
}

#[tokio::test]
async fn draft_redirect_targets() {
    let app = app();

    let resp = get(&app, "/api/draft?secret=s3cret&slug=/services").await;
    assert_eq!(location(&resp), "/en/services");

    let resp = get(&app, "/api/draft?secret=s3cret&slug=https://evil.example").await;
    assert_eq!(location(&resp), "/en");

    let resp = get(&app, "/api/draft?secret=s3cret&codename=page_home").await;
    assert_eq!(location(&resp), "/en");

    let resp = get(&app, "/api/draft?secret=s3cret&locale=xx").await;
    assert_eq!(location(&resp), "/en");
}

#[tokio::test]
async fn draft_cookie_must_carry_bypass_token() {
    let app = app();

    let req = Request::get("/en")
        .header(header::COOKIE, format!("{COOKIE}={TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let (_, body) = read(send(&app, req).await).await;
    let view: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(view["draft"], true);
    assert_eq!(view["preview"]["environment_id"], "env-123");
    assert_eq!(view["preview"]["language_codename"], "default");
    assert_eq!(view["preview"]["disable_href"], "/api/disable-draft?returnTo=%2Fen");

    let req = Request::get("/ro/blog")
        .header(header::COOKIE, format!("{COOKIE}={TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let (_, body) = read(send(&app, req).await).await;
    let view: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(view["preview"]["disable_href"], "/api/disable-draft?returnTo=%2Fro%2Fblog");

    let req = Request::get("/en")
        .header(header::COOKIE, format!("{COOKIE}=forged"))
        .body(Body::empty())
        .unwrap();
    let (_, body) = read(send(&app, req).await).await;
    let view: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(view["draft"], false);
}

#[tokio::test]
async fn disable_draft_clears_cookie_and_returns() {
    let app = app();

    let req = Request::get("/api/disable-draft?returnTo=/ro/blog")
        .header(header::COOKIE, format!("{COOKIE}={TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let resp = send(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/ro/blog");

    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("brochure_draft="));
    assert!(cookies[0].contains("Max-Age=0"));
    assert!(cookies[0].contains("SameSite=None; Secure"));

    let resp = get(&app, "/api/disable-draft?returnTo=//evil.example&locale=ro").await;
    assert_eq!(location(&resp), "/ro");
}

// === Malformed redirect targets ===

#[tokio::test]
async fn draft_slug_with_control_characters_falls_back_to_locale_root() {
    let resp = get(&app(), "/api/draft?secret=s3cret&slug=/a%0Ab").await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/en");

    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("brochure_draft=bypass-token"));
}

#[tokio::test]
async fn return_address_with_header_injection_falls_back_to_locale_root() {
    let path = "/api/disable-draft?returnTo=/x%0D%0ASet-Cookie:%20a=b&locale=ro";
    let resp = get(&app(), path).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/ro");
    assert!(set_cookies(&resp).is_empty());
}

#[tokio::test]
async fn non_ascii_redirect_targets_are_percent_encoded() {
    let resp = get(&app(), "/api/draft?secret=s3cret&slug=/caf%C3%A9").await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/en/caf%C3%A9");

    let resp = get(&app(), "/api/disable-draft?returnTo=/ro/caf%C3%A9").await;
    assert_eq!(location(&resp), "/ro/caf%C3%A9");
}
