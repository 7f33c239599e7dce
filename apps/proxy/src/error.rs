//! Application error types for the TMDB proxy.
//!
//! Provides a unified error type that implements `IntoResponse` for Axum.
//! Every error body has the shape `{"error": "<message>"}`.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::UpstreamError;
use crate::visibility::DenyReason;

/// Message returned for any request outside the endpoint table.
pub const ENDPOINT_NOT_ALLOWED: &str = "Request blocked: endpoint not allowed.";

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Upstream fetch failed (transport or non-2xx)
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Payload refused by a visibility gate
    #[error("{0}")]
    AccessDenied(DenyReason),

    /// Path or method not in the endpoint table
    #[error("{}", ENDPOINT_NOT_ALLOWED)]
    EndpointNotAllowed,

    /// Invalid request data
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Configuration loading/parsing errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::Upstream(e) => {
                tracing::error!(status = ?e.status, "Upstream request failed: {}", e.message);
                (StatusCode::INTERNAL_SERVER_ERROR, e.message.clone())
            }
            AppError::AccessDenied(reason) => {
                tracing::warn!(reason = ?reason, "Request denied by visibility filter");
                (StatusCode::FORBIDDEN, reason.message().to_string())
            }
            AppError::EndpointNotAllowed => {
                tracing::debug!("Blocked request to unknown endpoint");
                (StatusCode::FORBIDDEN, ENDPOINT_NOT_ALLOWED.to_string())
            }
            AppError::BadRequest(msg) => {
                // Bad request messages are safe to expose (client-caused errors)
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Config(e) => {
                // Log full error details but don't expose to client
                tracing::error!("Config error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "configuration_error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                // Log full error but don't expose internal details
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
