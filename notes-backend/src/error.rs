//! HTTP-facing error type shared by services and controllers.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::db::DbError;
use crate::services::password::PasswordError;

/// Prefix carried by every wrapped persistence failure
pub const SERVICE_ERROR_PREFIX: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("You do not have permission to perform this action.")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("{prefix} {0}", prefix = SERVICE_ERROR_PREFIX)]
    Service(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("{prefix} {0}", prefix = SERVICE_ERROR_PREFIX)]
    Password(#[from] PasswordError),
}

impl ApiError {
    pub fn note_not_found() -> Self {
        ApiError::NotFound("Note not found".to_string())
    }

    /// A missing record reported with the same wrapping as a service failure
    pub fn wrapped_not_found(cause: impl std::fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {}", SERVICE_ERROR_PREFIX, cause))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(_) | ApiError::Database(_) | ApiError::Password(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Database(e) => log::error!("[DB] {}", e),
            ApiError::Password(e) => log::error!("[AUTH] {}", e),
            _ => {}
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}
