use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use message_queue::QueueError;
use thiserror::Error;
use uuid::Uuid;

use crate::ingest::IngestError;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Queue unavailable: {0}")]
    QueueUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<QueueError> for UserError {
    fn from(err: QueueError) -> Self {
        UserError::QueueUnavailable(err.to_string())
    }
}

impl From<IngestError> for UserError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Queue(e) => e.into(),
            e @ IngestError::Encode { .. } => UserError::Internal(e.to_string()),
        }
    }
}

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            UserError::DuplicateEmail(email) => {
                AppError::Conflict(format!("User with email '{}' already exists", email))
            }
            UserError::InvalidCredentials => {
                AppError::Unauthorized("Invalid email or password".to_string())
            }
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::QueueUnavailable(msg) => AppError::ServiceUnavailable(msg),
            UserError::PasswordHash(msg) | UserError::Token(msg) | UserError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
