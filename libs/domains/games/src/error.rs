use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Game not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type GameResult<T> = Result<T, GameError>;

/// Convert GameError to AppError for standardized error responses
impl From<GameError> for AppError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::NotFound(id) => AppError::NotFound(format!("Game {} not found", id)),
            GameError::Validation(msg) => AppError::BadRequest(msg),
            GameError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
