//! Custom error types for the API service

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Message returned to clients when the text generation provider fails
pub const PROVIDER_FAILURE_MESSAGE: &str =
    "Error generating explanation. Please try again later.";

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or out-of-range input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate email or username
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad credentials, or a missing, invalid or expired token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Missing resource, or one owned by another user
    #[error("Not found: {0}")]
    NotFound(String),

    /// The text generation provider failed
    #[error("Provider error: {0}")]
    Provider(String),

    /// A required setting was absent at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Database(DatabaseError::Query(e))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Provider(msg) => {
                error!("Text generation provider failed: {}", msg);
                (StatusCode::BAD_GATEWAY, PROVIDER_FAILURE_MESSAGE.to_string())
            }
            ApiError::Config(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "detail": detail,
            "success": false,
        }));

        if status == StatusCode::UNAUTHORIZED {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response();
        }

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
