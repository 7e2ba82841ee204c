//! API error type and status-code mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::error;

use crate::dto::ErrorResponse;

/// Errors surfaced to HTTP callers
#[derive(Error, Debug)]
pub enum ApiError {
    /// Caller usage error (missing id, malformed body)
    #[error("{0}")]
    BadRequest(String),

    /// Unknown or already reaped task
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<taskd_foundation::Error> for ApiError {
    fn from(err: taskd_foundation::Error) -> Self {
        match err {
            taskd_foundation::Error::NotFound(_) => {
                ApiError::NotFound("task with the specified ID does not exist".to_string())
            }
            taskd_foundation::Error::InvalidInput(message) => ApiError::BadRequest(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
