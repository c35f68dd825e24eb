//! Readiness and metrics handlers backed by the live connections.

use crate::state::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

/// Readiness: PostgreSQL when configured, and the Redis queue backend.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let mut checks: Vec<(&str, HealthCheckFuture<'_>)> = Vec::new();

    if let Some(db) = &state.db {
        checks.push((
            "database",
            Box::pin(async move {
                database::postgres::check_health(db)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ));
    }

    checks.push((
        "redis",
        Box::pin(async {
            database::redis::check_health(&state.redis)
                .await
                .map_err(|e| e.to_string())
        }),
    ));

    run_health_checks(checks).await.into_response()
}

/// Prometheus text exposition.
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        message_queue::render_metrics(),
    )
}
