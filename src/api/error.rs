//! API error envelope
//!
//! Every error leaves the API as `{"error": {"code", "message"}}`. Internal
//! failure detail goes to the logs, never to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::{PageServiceError, PostServiceError};

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn content_rejected(message: impl Into<String>) -> Self {
        Self::new("CONTENT_REJECTED", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "FORBIDDEN" => StatusCode::FORBIDDEN,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "CONTENT_REJECTED" => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<PageServiceError> for ApiError {
    fn from(err: PageServiceError) -> Self {
        match err {
            PageServiceError::MissingFields => Self::validation_error("Missing required fields"),
            PageServiceError::AgeVerificationRequired => {
                Self::forbidden("Age verification required for 18+ content")
            }
            PageServiceError::ContentRejected(reason) => Self::content_rejected(reason),
            PageServiceError::NotFound => Self::not_found("Page not found"),
            PageServiceError::Internal(err) => {
                tracing::error!(error = format!("{err:#}").as_str(), "Page operation failed");
                Self::internal_error("Internal server error")
            }
        }
    }
}

impl From<PostServiceError> for ApiError {
    fn from(err: PostServiceError) -> Self {
        match err {
            PostServiceError::MissingFields => Self::validation_error("Missing required fields"),
            PostServiceError::Internal(err) => {
                tracing::error!(error = format!("{err:#}").as_str(), "Post operation failed");
                Self::internal_error("Internal server error")
            }
        }
    }
}
