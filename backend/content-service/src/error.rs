/// Error types for Content Service
///
/// Every mutation aborts with one of these. `Delivery` is produced by the
/// notification path only and never reaches the caller of a content mutation.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for content-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Post, comment or root comment absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Blocked by the target, or not the owner
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Object storage write failed or timed out
    #[error("Upload error: {0}")]
    Upload(String),

    /// Relational store operation failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Entity changed since it was loaded
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Notification persist/push failed
    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Upload(_) => "UPLOAD_FAILED",
            AppError::Persistence(_) => "DATABASE_ERROR",
            AppError::Conflict(_) => "VERSION_CONFLICT",
            AppError::Delivery(_) => "DELIVERY_FAILED",
            AppError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Upload(_) => StatusCode::BAD_GATEWAY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Persistence(_) | AppError::Delivery(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
            "status": status.as_u16(),
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Persistence(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
