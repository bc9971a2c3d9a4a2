use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::journal::JournalError;

/// Unified application error type for the HTTP façade.
///
/// Provider failures never surface here: the router converts them into a
/// Failure outcome. What remains is client mistakes and genuinely
/// unexpected conditions.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error body matching the generate failure shape.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the client sees. Internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            Self::BadRequest(message) => message.clone(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(error = %detail, "Internal error");
        }
        let body = ErrorBody {
            success: false,
            error: self.public_message(),
        };
        (self.status_code(), axum::Json(body)).into_response()
    }
}

impl From<JournalError> for AppError {
    fn from(err: JournalError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::BadRequest("no".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_bad_request_message_is_shown() {
        let err = AppError::BadRequest("Prompt must not be empty".into());
        assert_eq!(err.public_message(), "Prompt must not be empty");
    }

    #[test]
    fn test_internal_message_is_opaque() {
        let err = AppError::Internal("db password leaked".into());
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_response_status() {
        let response = AppError::BadRequest("no".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
