use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repository::StoreError;

/// ApiError
///
/// The error taxonomy surfaced at the HTTP boundary. Every variant maps to a
/// fixed status code and a JSON `{success: false, message}` body, so clients
/// see the same envelope on failure as on success.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request to a protected route without a `token` cookie.
    #[error("Unauthorized - No token found")]
    AuthMissing,

    /// The token cookie was present but the signature did not match, the
    /// payload was malformed, or the token has expired.
    #[error("Forbidden - Invalid token")]
    AuthInvalid,

    /// Authenticated, but the identity does not clear an authorization check
    /// (admin allowlist, email ownership).
    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// A required field or part was missing or empty.
    #[error("{0}")]
    Validation(String),

    /// Underlying store failure, surfaced with the raw message. No retries.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// A blob store failure during upload or delete.
    #[error("{0}")]
    Storage(String),

    /// A required piece of configuration (e.g. the signing secret) is absent.
    #[error("{0}")]
    Config(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::AuthMissing => StatusCode::UNAUTHORIZED,
            ApiError::AuthInvalid | ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::Storage(_) | ApiError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", self);
        }
        let body = Json(ErrorBody {
            success: false,
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}
