use axum::{
    Json,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use super::{ErrorCode, ErrorResponse};

/// Router fallback for unmatched paths.
pub async fn not_found(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "No route matched");
    let code = ErrorCode::RouteNotFound;
    let body = Json(ErrorResponse {
        code: code.code(),
        error: code.as_str().to_string(),
        message: format!("{} ({})", code.default_message(), uri.path()),
        details: None,
    });

    (StatusCode::NOT_FOUND, body).into_response()
}
