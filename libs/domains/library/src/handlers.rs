use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::{
    ADMIN_ROLE, JwtAuth, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, ConflictResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware, require_role,
};
use domain_games::Game;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::LibraryResult;
use crate::models::{CreateUserGame, UpdateUserGame, UserGame, UserGameDetail, UserGameFilter};
use crate::repository::UserGameRepository;
use crate::service::LibraryService;

pub const TAG: &str = "user-games";

/// OpenAPI documentation for the ownership endpoints
#[derive(OpenApi)]
#[openapi(
    paths(add_link, list_links, get_link, update_link, delete_link),
    components(
        schemas(UserGame, UserGameDetail, CreateUserGame, UpdateUserGame, UserGameFilter),
        responses(
            NotFoundResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Which user owns which game")
    )
)]
pub struct ApiDoc;

/// OpenAPI documentation for `/{id}/games`, nested under the users prefix
#[derive(OpenApi)]
#[openapi(paths(owned_games), components(schemas(Game)))]
pub struct OwnedGamesApiDoc;

type SharedService<R> = State<Arc<LibraryService<R>>>;

/// Router for `/user-games`.
///
/// `GET /{id}` is public, every other route needs an Admin token.
pub fn user_games_router<R: UserGameRepository + ?Sized + 'static>(
    service: LibraryService<R>,
    auth: JwtAuth,
) -> Router {
    let admin = Router::new()
        .route("/", get(list_links::<R>).post(add_link::<R>))
        .route("/{id}", put(update_link::<R>).delete(delete_link::<R>))
        .route_layer(from_fn_with_state(ADMIN_ROLE, require_role))
        .route_layer(from_fn_with_state(auth, jwt_auth_middleware));

    Router::new()
        .route("/{id}", get(get_link::<R>))
        .merge(admin)
        .with_state(Arc::new(service))
}

/// Router for `/{id}/games`, meant to be merged under `/users`.
pub fn owned_games_router<R: UserGameRepository + ?Sized + 'static>(
    service: LibraryService<R>,
    auth: JwtAuth,
) -> Router {
    Router::new()
        .route("/{id}/games", get(owned_games::<R>))
        .route_layer(from_fn_with_state(auth, jwt_auth_middleware))
        .with_state(Arc::new(service))
}

/// Link a game to a user
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateUserGame,
    responses(
        (status = 201, description = "Link created", body = UserGame),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn add_link<R: UserGameRepository + ?Sized>(
    State(service): SharedService<R>,
    ValidatedJson(input): ValidatedJson<CreateUserGame>,
) -> LibraryResult<impl IntoResponse> {
    let link = service.add_link(input).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// List links with optional filters
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(UserGameFilter),
    responses(
        (status = 200, description = "List of links", body = Vec<UserGame>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn list_links<R: UserGameRepository + ?Sized>(
    State(service): SharedService<R>,
    Query(filter): Query<UserGameFilter>,
) -> LibraryResult<Json<Vec<UserGame>>> {
    let links = service.list_links(filter).await?;
    Ok(Json(links))
}

/// Get a link with its user and game
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Link ID")
    ),
    responses(
        (status = 200, description = "Link found", body = UserGameDetail),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_link<R: UserGameRepository + ?Sized>(
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
) -> LibraryResult<Json<UserGameDetail>> {
    let detail = service.get_link(id).await?;
    Ok(Json(detail))
}

/// Re-point a link to another user or game
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Link ID")
    ),
    request_body = UpdateUserGame,
    responses(
        (status = 200, description = "Link updated", body = UserGame),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn update_link<R: UserGameRepository + ?Sized>(
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUserGame>,
) -> LibraryResult<Json<UserGame>> {
    let link = service.update_link(id, input).await?;
    Ok(Json(link))
}

/// Delete a link
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Link ID")
    ),
    responses(
        (status = 204, description = "Link deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn delete_link<R: UserGameRepository + ?Sized>(
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
) -> LibraryResult<impl IntoResponse> {
    service.delete_link(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Games owned by a user
#[utoipa::path(
    get,
    path = "/{id}/games",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Owned games", body = Vec<Game>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn owned_games<R: UserGameRepository + ?Sized>(
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
) -> LibraryResult<Json<Vec<Game>>> {
    let games = service.games_for_user(id).await?;
    Ok(Json(games))
}
