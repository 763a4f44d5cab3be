use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::application::errors::UseCaseError;
use crate::application::ports::RepositoryError;

/// API error response, rendered as `{"error": {"message", "status"}}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<UseCaseError> for ApiError {
    fn from(err: UseCaseError) -> Self {
        match err {
            UseCaseError::NotFound(msg) => ApiError::not_found(msg),
            UseCaseError::Duplicate(msg) | UseCaseError::BadInput(msg) => {
                ApiError::bad_request(msg)
            }
            UseCaseError::Unauthorized(msg) => ApiError::new(StatusCode::UNAUTHORIZED, msg),
            UseCaseError::Repository(e) => {
                error!(error = %e, "repository failure");
                ApiError::internal_error(sanitize_repository_error(&e))
            }
            UseCaseError::Internal(msg) => {
                error!(error = %msg, "internal failure");
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

fn sanitize_repository_error(err: &RepositoryError) -> String {
    match err {
        RepositoryError::Database(e) => sanitize_db_error(e),
        _ => "Internal server error".to_string(),
    }
}

/// Database error text safe to return to clients
pub fn sanitize_db_error(error: &sqlx::Error) -> String {
    match error {
        sqlx::Error::Configuration(_) => "Database configuration error".to_string(),
        sqlx::Error::Database(_) => "Database operation error".to_string(),
        sqlx::Error::Io(_) => "Database connection error".to_string(),
        sqlx::Error::Tls(_) => "Database TLS error".to_string(),
        sqlx::Error::Protocol(_) => "Database protocol error".to_string(),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            "Database decode error".to_string()
        }
        sqlx::Error::PoolTimedOut => "Database timeout".to_string(),
        sqlx::Error::PoolClosed => "Database connection closed".to_string(),
        _ => "Database error".to_string(),
    }
}
