use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_games::GameError;
use domain_users::UserError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("User game link not found: {0}")]
    NotFound(Uuid),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Game not found: {0}")]
    GameNotFound(Uuid),

    #[error("User {user_id} already owns game {game_id}")]
    DuplicateLink { user_id: Uuid, game_id: Uuid },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type LibraryResult<T> = Result<T, LibraryError>;

impl From<UserError> for LibraryError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => LibraryError::UserNotFound(id),
            other => LibraryError::Internal(other.to_string()),
        }
    }
}

impl From<GameError> for LibraryError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::NotFound(id) => LibraryError::GameNotFound(id),
            other => LibraryError::Internal(other.to_string()),
        }
    }
}

/// Convert LibraryError to AppError for standardized error responses
impl From<LibraryError> for AppError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::NotFound(id) => {
                AppError::NotFound(format!("User game link {} not found", id))
            }
            LibraryError::UserNotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            LibraryError::GameNotFound(id) => AppError::NotFound(format!("Game {} not found", id)),
            e @ LibraryError::DuplicateLink { .. } => AppError::Conflict(e.to_string()),
            LibraryError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for LibraryError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
