// crates/edge/src/site.rs

//! Site directory → settings → wired application state.

use crate::EdgeError;

use adapt::http::{AppState, DraftConfig};
use domain::{locale::Locales, setting::Settings};
use serve::{
    delivery::DeliveryClient, memory::InMemoryRepository, ContentClients, ContentRepository,
    Resolver,
};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{info, warn};
use uuid::Uuid;

pub const SETTINGS_FILE: &str = "settings.toml";

/// Load `<dir>/settings.toml`.
#[tracing::instrument(skip_all)]
pub fn load_settings(dir: &Path) -> Result<Settings, EdgeError> {
    if !dir.is_dir() {
        return Err(EdgeError::Config(format!(
            "Site directory does not exist: {}",
            dir.display()
        )));
    }

    let path = dir.join(SETTINGS_FILE);
    if !path.exists() {
        return Err(EdgeError::Config(format!(
            "{SETTINGS_FILE} not found at {}",
            path.display()
        )));
    }

    let text = std::fs::read_to_string(&path)
        .map_err(|err| EdgeError::Config(format!("Failed reading {}: {}", path.display(), err)))?;

    toml::from_str(&text).map_err(|err| {
        EdgeError::Config(format!("Invalid {SETTINGS_FILE} at {}: {}", path.display(), err))
    })
}

/// Values taken from the command line or the environment. Set values win
/// over the settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<SocketAddr>,
    pub environment_id: Option<String>,
    pub preview_api_key: Option<String>,
    pub preview_secret: Option<String>,
}

impl Overrides {
    pub fn apply(self, settings: &mut Settings) {
        if let Some(bind) = self.bind {
            settings.server.bind = bind;
        }
        if let Some(id) = self.environment_id {
            settings.delivery.environment_id = id;
        }
        if let Some(key) = self.preview_api_key {
            settings.delivery.preview_api_key = Some(key);
        }
        if let Some(secret) = self.preview_secret {
            settings.draft.secret = Some(secret);
        }
    }
}

/// The published and draft repositories.
///
/// A fixture file serves both modes from memory. Otherwise the Delivery
/// API is used; without a preview key draft reads fall back to the
/// published client.
#[tracing::instrument(skip_all)]
pub fn content_clients(dir: &Path, settings: &Settings) -> Result<ContentClients, EdgeError> {
    if let Some(fixture) = &settings.site.fixture {
        let path: PathBuf = dir.join(fixture);
        let repo = InMemoryRepository::from_path(&path)?;
        info!(path = %path.display(), variants = repo.len(), "serving content from fixture");
        return Ok(ContentClients::shared(Arc::new(repo)));
    }

    let published: Arc<dyn ContentRepository> =
        Arc::new(DeliveryClient::published(&settings.delivery)?);

    let draft: Arc<dyn ContentRepository> = match DeliveryClient::preview(&settings.delivery) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            warn!(error = %err, "preview client unavailable; draft reads use published content");
            published.clone()
        }
    };

    Ok(ContentClients::new(published, draft))
}

#[tracing::instrument(skip_all)]
pub fn resolver(dir: &Path, settings: &Settings) -> Result<Resolver, EdgeError> {
    let locales = Locales::try_from(&settings.locales)?;
    let clients = content_clients(dir, settings)?;
    Ok(Resolver::new(
        clients,
        Arc::new(locales),
        settings.site.duplicate_slugs,
    ))
}

/// Application state for the HTTP layer.
pub fn app_state(settings: &Settings, resolver: Arc<Resolver>) -> AppState {
    if settings.draft.secret.is_none() {
        warn!("no draft secret configured; draft mode is disabled");
    }

    let bypass_token = settings
        .draft
        .bypass_token
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    AppState {
        resolver,
        draft: Arc::new(DraftConfig {
            secret: settings.draft.secret.clone().filter(|s| !s.is_empty()),
            bypass_token,
            cookie_name: settings.draft.cookie_name.clone(),
        }),
        env: settings.site.environment,
        environment_id: Arc::from(settings.delivery.environment_id.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::setting::{BuildEnv, DuplicateSlugPolicy};
    use std::fs;
    use tempfile::TempDir;

    const FIXTURE: &str = include_str!("../../../demos/site/content.json");

    fn site(settings: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), settings).unwrap();
        dir
    }

    #[test]
    fn missing_settings_file_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let err = load_settings(dir.path()).unwrap_err();
        assert!(matches!(err, EdgeError::Config(msg) if msg.contains("settings.toml not found")));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = site("[server\nbind = 1");
        assert!(matches!(load_settings(dir.path()), Err(EdgeError::Config(_))));
    }

    #[test]
    fn reads_sections_and_keeps_defaults() {
        let dir = site(
            r#"
[server]
bind = "0.0.0.0:8080"

[draft]
secret = "abc"

[site]
environment = "development"
duplicate_slugs = "reject"
"#,
        );
        let settings = load_settings(dir.path()).unwrap();
        assert_eq!(settings.server.bind.port(), 8080);
        assert_eq!(settings.draft.secret.as_deref(), Some("abc"));
        assert_eq!(settings.draft.cookie_name, "brochure_draft");
        assert_eq!(settings.site.environment, BuildEnv::Development);
        assert_eq!(settings.site.duplicate_slugs, DuplicateSlugPolicy::Reject);
        assert_eq!(settings.locales.entries.len(), 2);
    }

    #[test]
    fn overrides_win_over_file() {
        let mut settings = Settings::default();
        settings.draft.secret = Some("from-file".into());

        Overrides {
            bind: Some("127.0.0.1:9999".parse().unwrap()),
            environment_id: Some("env-1".into()),
            preview_api_key: Some("key".into()),
            preview_secret: Some("from-env".into()),
        }
        .apply(&mut settings);

        assert_eq!(settings.server.bind.port(), 9999);
        assert_eq!(settings.delivery.environment_id, "env-1");
        assert_eq!(settings.delivery.preview_api_key.as_deref(), Some("key"));
        assert_eq!(settings.draft.secret.as_deref(), Some("from-env"));

        let mut untouched = Settings::default();
        Overrides::default().apply(&mut untouched);
        assert!(untouched.draft.secret.is_none());
    }

    #[test]
    fn delivery_clients_need_an_environment_id() {
        let err = content_clients(Path::new("."), &Settings::default()).unwrap_err();
        assert!(matches!(err, EdgeError::Repository(_)));

        let mut settings = Settings::default();
        settings.delivery.environment_id = "env-1".into();
        assert!(content_clients(Path::new("."), &settings).is_ok());
    }

    #[tokio::test]
    async fn fixture_site_resolves_pages() {
        let dir = site("[site]\nfixture = \"content.json\"\n");
        fs::write(dir.path().join("content.json"), FIXTURE).unwrap();

        let settings = load_settings(dir.path()).unwrap();
        let resolver = resolver(dir.path(), &settings).unwrap();
        let routes = resolver.static_routes(&["en", "ro"]).await.unwrap();

        assert!(routes.contains(&"/en".to_string()));
        assert!(routes.contains(&"/ro/servicii".to_string()));
        assert!(routes.contains(&"/en/blog/why-headless".to_string()));
        assert!(!routes.contains(&"/ro/about".to_string()));
    }

    #[test]
    fn bypass_token_is_generated_when_unset() {
        let dir = site("[site]\nfixture = \"content.json\"\n");
        fs::write(dir.path().join("content.json"), FIXTURE).unwrap();
        let settings = load_settings(dir.path()).unwrap();
        let resolver = Arc::new(resolver(dir.path(), &settings).unwrap());

        let first = app_state(&settings, resolver.clone());
        let second = app_state(&settings, resolver.clone());
        assert_ne!(first.draft.bypass_token, second.draft.bypass_token);
        assert!(first.draft.secret.is_none());

        let mut fixed = settings.clone();
        fixed.draft.bypass_token = Some("fixed".into());
        assert_eq!(app_state(&fixed, resolver).draft.bypass_token, "fixed");
    }
}
