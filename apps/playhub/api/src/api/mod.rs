use axum::Router;
use axum::routing::get;

pub mod health;

/// API routes without the `/api` prefix; `create_router` adds it.
pub fn routes(state: &crate::state::AppState) -> Router {
    let auth = state.jwt_auth.clone();

    let users = domain_users::handlers::router(state.users.clone(), state.producer(), auth.clone())
        .merge(domain_library::handlers::owned_games_router(
            state.library.clone(),
            auth.clone(),
        ));

    Router::new()
        .nest("/users", users)
        .nest(
            "/games",
            domain_games::handlers::router(state.games.clone(), auth.clone()),
        )
        .nest(
            "/user-games",
            domain_library::handlers::user_games_router(state.library.clone(), auth),
        )
}

/// `/ready` and `/metrics`, merged at the root next to `/health`.
pub fn ops_router(state: crate::state::AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .route("/metrics", get(health::metrics_handler))
        .with_state(state)
}
