//! # Web Error Responses
//!
//! [`ApiError`] maps every failure a handler can produce onto an HTTP status and a
//! `{"error": {"code": ..., "message": ...}}` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::error::QbankError;

/// Web API specific errors with HTTP status code mappings
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Resource not found: {message}")]
    NotFound { message: String },

    #[error("Access denied")]
    Forbidden,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Payload too large: {message}")]
    PayloadTooLarge { message: String },

    #[error("Service temporarily unavailable")]
    ServiceUnavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Database operation failed: {operation}")]
    DatabaseError { operation: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationError { reason: String },

    #[error("Authorization failed: {reason}")]
    AuthorizationError { reason: String },

    #[error("Internal server error")]
    Internal,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::PayloadTooLarge {
            message: message.into(),
        }
    }

    /// Create a DatabaseError with operation context
    pub fn database_error(operation: impl Into<String>) -> Self {
        Self::DatabaseError {
            operation: operation.into(),
        }
    }

    pub fn auth_error(reason: impl Into<String>) -> Self {
        Self::AuthenticationError {
            reason: reason.into(),
        }
    }

    pub fn authorization_error(reason: impl Into<String>) -> Self {
        Self::AuthorizationError {
            reason: reason.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Forbidden | ApiError::AuthorizationError { .. } => StatusCode::FORBIDDEN,
            ApiError::Unauthorized | ApiError::AuthenticationError { .. } => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::DatabaseError { .. } | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Forbidden => "FORBIDDEN",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::Conflict { .. } => "CONFLICT",
            ApiError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            ApiError::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ApiError::Timeout => "TIMEOUT",
            ApiError::DatabaseError { .. } => "DATABASE_ERROR",
            ApiError::AuthenticationError { .. } => "AUTHENTICATION_ERROR",
            ApiError::AuthorizationError { .. } => "AUTHORIZATION_ERROR",
            ApiError::Internal => "INTERNAL_ERROR",
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::NotFound { message }
            | ApiError::BadRequest { message }
            | ApiError::Conflict { message }
            | ApiError::PayloadTooLarge { message } => message.clone(),
            ApiError::AuthenticationError { reason } | ApiError::AuthorizationError { reason } => {
                reason.clone()
            }
            // Database details stay in the logs
            ApiError::DatabaseError { .. } => "Database operation failed".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "Request failed");
        }

        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.public_message(),
            }
        });

        (status, Json(body)).into_response()
    }
}

impl From<QbankError> for ApiError {
    fn from(err: QbankError) -> Self {
        match err {
            QbankError::NotFound(message) => ApiError::not_found(message),
            QbankError::ValidationError(message) => ApiError::bad_request(message),
            QbankError::Conflict(message) => ApiError::conflict(message),
            QbankError::AuthError(reason) => ApiError::auth_error(reason),
            QbankError::DatabaseError(operation) => ApiError::database_error(operation),
            QbankError::ConfigurationError(_)
            | QbankError::DocumentError(_)
            | QbankError::IoError(_) => {
                error!(error = %err, "Internal failure");
                ApiError::Internal
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        QbankError::from(err).into()
    }
}
