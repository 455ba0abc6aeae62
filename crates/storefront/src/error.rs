//! Unified error handling with Sentry integration.
//!
//! Cart endpoints answer every failure with an `ApiStatus` JSON body so the
//! client can read `status`, `statusText` and `error` uniformly.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ninja_cats_core::api::ApiStatus;
use thiserror::Error;

use crate::cart::RepositoryError;

/// Message returned for any non-POST request to a cart endpoint.
pub const POST_REQUIRED: &str = "This endpoint requires a POST request.";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart store operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Cart endpoints only accept POST.
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Repository(RepositoryError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Repository(RepositoryError::Database(_)) => "Internal server error".to_string(),
            Self::Repository(RepositoryError::Conflict(detail)) => detail.clone(),
            Self::BadRequest(detail) => detail.clone(),
            Self::MethodNotAllowed => POST_REQUIRED.to_string(),
        };

        let body = ApiStatus::error(status.as_u16(), canonical_reason(status), message);
        (status, Json(body)).into_response()
    }
}

/// Reason phrase for a status code, e.g. "Method Not Allowed".
#[must_use]
pub fn canonical_reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown")
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
