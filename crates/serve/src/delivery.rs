// crates/serve/src/delivery.rs

//! Delivery API client over HTTP.
//!
//! The published client reads `https://deliver.kontent.ai`. The preview
//! client reads `https://preview-deliver.kontent.ai` with a bearer key and
//! asks the API to wait for freshly saved content, so an editor's click on
//! "preview" sees the change they just made.

use crate::repository::{ContentRepository, ItemQuery, RepositoryError, TypeQuery};
use async_trait::async_trait;
use domain::content::{ItemListing, ItemResponse};
use domain::setting::DeliverySettings;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub const WAIT_FOR_NEW_CONTENT: &str = "x-kc-wait-for-loading-new-content";

#[derive(Debug, Clone)]
pub struct DeliveryClient {
    http: reqwest::Client,
    base_url: String,
}

impl DeliveryClient {
    pub fn published(settings: &DeliverySettings) -> Result<Self, RepositoryError> {
        Self::build(settings, &settings.published_url, HeaderMap::new())
    }

    pub fn preview(settings: &DeliverySettings) -> Result<Self, RepositoryError> {
        let key = settings
            .preview_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| RepositoryError::Config("preview API key is not set".into()))?;

        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| RepositoryError::Config(format!("invalid preview API key: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            HeaderName::from_static(WAIT_FOR_NEW_CONTENT),
            HeaderValue::from_static("true"),
        );

        Self::build(settings, &settings.preview_url, headers)
    }

    fn build(
        settings: &DeliverySettings,
        base_url: &str,
        headers: HeaderMap,
    ) -> Result<Self, RepositoryError> {
        if settings.environment_id.is_empty() {
            return Err(RepositoryError::Config("environment id is not set".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| RepositoryError::Config(format!("failed to create client: {e}")))?;

        Ok(Self {
            http,
            base_url: format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                settings.environment_id
            ),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<Option<T>, RepositoryError> {
        debug!(url, ?params, "delivery request");

        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| RepositoryError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RepositoryError::Transport(e.to_string()))?;
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| RepositoryError::Decode(e.to_string()))
    }
}

fn listing_params(content_type: &str, query: &TypeQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("system.type", content_type.to_string()),
        ("language", query.language.clone()),
        ("depth", query.expand_depth.to_string()),
    ];
    if let Some(slug) = &query.slug_equals {
        params.push(("elements.slug", slug.clone()));
    }
    if let Some(element) = &query.order_by_descending {
        params.push(("order", format!("elements.{element}[desc]")));
    }
    if let Some(limit) = query.limit {
        params.push(("limit", limit.to_string()));
    }
    params
}

#[async_trait]
impl ContentRepository for DeliveryClient {
    #[tracing::instrument(skip_all, fields(content_type = %content_type))]
    async fn fetch_by_type(
        &self,
        content_type: &str,
        query: &TypeQuery,
    ) -> Result<ItemListing, RepositoryError> {
        let url = format!("{}/items", self.base_url);
        let params = listing_params(content_type, query);

        // A listing endpoint never answers 404 for "no match"; treat one as
        // an empty listing all the same.
        Ok(self.get(&url, &params).await?.unwrap_or_default())
    }

    #[tracing::instrument(skip_all, fields(codename = %codename))]
    async fn fetch_by_codename(
        &self,
        codename: &str,
        query: &ItemQuery,
    ) -> Result<Option<ItemResponse>, RepositoryError> {
        let url = format!("{}/items/{}", self.base_url, codename);
        let params = [
            ("language", query.language.clone()),
            ("depth", query.expand_depth.to_string()),
        ];
        self.get(&url, &params).await
    }
}
