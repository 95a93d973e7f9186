//! Error types for tmb-web

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tmb_common::Artifact;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Required artifacts have not arrived yet (503)
    #[error("Still loading: {0:?}")]
    Loading(Vec<Artifact>),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<tmb_common::Error> for ApiError {
    fn from(err: tmb_common::Error) -> Self {
        match err {
            tmb_common::Error::NotLoaded(artifact) => ApiError::Loading(vec![artifact]),
            tmb_common::Error::NotFound(what) => ApiError::NotFound(what),
            tmb_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Loading(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "LOADING",
                "Model data is still loading".to_string(),
            ),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = match self {
            ApiError::Loading(missing) => json!({
                "loading": true,
                "missing": missing,
                "error": { "code": error_code, "message": message },
            }),
            _ => json!({
                "error": { "code": error_code, "message": message },
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
