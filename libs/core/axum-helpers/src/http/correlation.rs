use axum::{
    extract::Request,
    http::{HeaderValue, header::HeaderName},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Tags each request with a correlation id.
///
/// An incoming `x-correlation-id` is reused when it is a valid header value,
/// otherwise a fresh UUID is generated. The id is visible to handlers as a
/// request header, recorded on a `request` span and echoed on the response.
pub async fn correlation_id(mut request: Request, next: Next) -> Response {
    let header = HeaderName::from_static(CORRELATION_ID_HEADER);

    let id = request
        .headers()
        .get(&header)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    // Generated ids are always ASCII so this only fails for exotic inbound values
    let value = HeaderValue::from_str(&id)
        .unwrap_or_else(|_| HeaderValue::from_static("invalid-correlation-id"));
    request.headers_mut().insert(header.clone(), value.clone());

    let span = tracing::info_span!(
        "request",
        correlation_id = %id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    let mut response = next.run(request).instrument(span).await;
    response.headers_mut().insert(header, value);
    response
}
