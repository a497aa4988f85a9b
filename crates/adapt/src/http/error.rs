// crates/adapt/src/http/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use serve::ResolveError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("not found")]
    NotFound,

    #[error("invalid secret")]
    InvalidSecret,

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self {
            HttpError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response()
            }
            HttpError::InvalidSecret => {
                (StatusCode::UNAUTHORIZED, "Invalid secret").into_response()
            }
            HttpError::Resolve(err) => {
                // Details stay in the log.
                error!(error = %err, "content resolution failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
