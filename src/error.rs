use crate::domain::validation::ValidationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Email already exists")]
    Conflict,
    #[error("Not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// The JSON envelope every failed request is answered with.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedInput(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn body(&self) -> ErrorBody {
        let (error, details) = match self {
            Self::MalformedInput(msg) => ("malformed request body".to_string(), msg.clone()),
            Self::Validation(kind) => (kind.to_string(), kind.details().to_string()),
            Self::Conflict => ("incorrect email input".to_string(), "email already exists - conflict detected".to_string()),
            Self::NotFound => ("incorrect endpoint".to_string(), "no user with such ID".to_string()),
            Self::Database(e) => ("internal failure".to_string(), e.to_string()),
            Self::Internal(msg) => ("internal failure".to_string(), msg.clone()),
        };
        ErrorBody { error, details, timestamp: OffsetDateTime::now_utc() }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Database(e) => tracing::error!(error = %e, "Database error"),
            Self::Internal(msg) => tracing::error!(message = %msg, "Internal server error"),
            Self::MalformedInput(msg) => tracing::debug!(message = %msg, "Malformed request body"),
            Self::Validation(kind) => tracing::debug!(reason = kind.reason(), "Validation failed"),
            Self::Conflict => tracing::debug!("Email conflict"),
            Self::NotFound => tracing::debug!("Resource not found"),
        }

        (self.status(), Json(self.body())).into_response()
    }
}
