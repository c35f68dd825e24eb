use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

/// Single `{id}` path segment parsed as a UUID.
///
/// A malformed id becomes `400 INVALID_UUID` instead of axum's plain-text
/// rejection.
///
/// ```ignore
/// async fn get_game(UuidPath(id): UuidPath) -> Result<Json<Game>, AppError> { ... }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        Uuid::parse_str(&raw)
            .map(UuidPath)
            .map_err(|_| AppError::InvalidUuid(format!("Invalid UUID: {raw}")))
    }
}
