//! HTTP error mapping.
//!
//! Every authentication failure reaches the caller with the same status, code
//! and message. Internal causes are logged and replaced by a generic message.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zkauth_types::ZkAuthError;

pub const AUTHENTICATION_FAILED_MESSAGE: &str = "Authentication failed";

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("authentication failed")]
    Unauthorized,

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "AUTHENTICATION_FAILED"),
            Self::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::BadRequest(msg) | Self::Conflict(msg) | Self::NotFound(msg) => msg.clone(),
            Self::Unauthorized => AUTHENTICATION_FAILED_MESSAGE.to_string(),
            Self::RateLimited => "Rate limit exceeded".to_string(),
            Self::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

impl From<ZkAuthError> for ApiError {
    fn from(err: ZkAuthError) -> Self {
        match err {
            ZkAuthError::Validation(msg) | ZkAuthError::ProofGeneration(msg) => {
                Self::BadRequest(msg)
            }
            ZkAuthError::Conflict(msg) => Self::Conflict(msg),
            ZkAuthError::NotFound(msg) => Self::NotFound(msg),
            ZkAuthError::AuthenticationFailed(_) => Self::Unauthorized,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if let Self::Internal(cause) = &self {
            tracing::error!(error = %cause, "Internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.public_message(),
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Unwraps a JSON body, turning any rejection into a 400.
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    result.map(|Json(v)| v).map_err(ApiError::from)
}
