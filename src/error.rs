//! Error types for the question bank service.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QbankError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Authentication error: {0}")]
    AuthError(String),
    #[error("Document error: {0}")]
    DocumentError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl QbankError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}

impl From<sqlx::Error> for QbankError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => QbankError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                QbankError::Conflict(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                QbankError::ValidationError(format!(
                    "Referenced record does not exist: {}",
                    db_err.message()
                ))
            }
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
                QbankError::ValidationError(db_err.message().to_string())
            }
            _ => QbankError::DatabaseError(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for QbankError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        QbankError::DatabaseError(format!("Migration failed: {err}"))
    }
}

impl From<std::io::Error> for QbankError {
    fn from(err: std::io::Error) -> Self {
        QbankError::IoError(err.to_string())
    }
}

impl From<zip::result::ZipError> for QbankError {
    fn from(err: zip::result::ZipError) -> Self {
        QbankError::DocumentError(format!("Failed to write document container: {err}"))
    }
}

impl From<quick_xml::Error> for QbankError {
    fn from(err: quick_xml::Error) -> Self {
        QbankError::DocumentError(format!("Failed to write document markup: {err}"))
    }
}

pub type Result<T> =std::result::Result<T, QbankError>;
