//! API and startup error types.
//!
//! Every error response carries a JSON body `{"detail": "..."}`. Storage
//! failures are logged here and reach the client only as a generic 500.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use todo_core::StoreError;

use crate::config::ConfigError;

/// Detail message for lookups that hit no row.
pub const NOT_FOUND_DETAIL: &str = "Todo not found";

const INTERNAL_DETAIL: &str = "Internal Server Error";

/// Error returned by request handlers and extractors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body, path or query did not match the expected schema (422).
    #[error("validation failed: {0}")]
    Validation(String),

    /// No todo with this id (404).
    #[error("todo {id} not found")]
    NotFound { id: i64 },

    /// Storage backend failure (500, logged).
    #[error(transparent)]
    Internal(StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            Self::Validation(msg) => {
                tracing::debug!(%msg, "rejected request");
                (StatusCode::UNPROCESSABLE_ENTITY, msg.clone())
            }
            Self::NotFound { id } => {
                tracing::debug!(id, "todo not found");
                (StatusCode::NOT_FOUND, NOT_FOUND_DETAIL.to_string())
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_DETAIL.to_string())
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { id } => Self::NotFound { id },
            other => Self::Internal(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// Failure while starting the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to install log subscriber: {0}")]
    Logging(#[source] Box<dyn std::error::Error + Send + Sync>),
}
