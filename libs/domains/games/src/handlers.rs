use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    ADMIN_ROLE, JwtAuth, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware, require_role,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::GameResult;
use crate::models::{CreateGame, Game, GameFilter, UpdateGame};
use crate::repository::GameRepository;
use crate::service::GameService;

pub const TAG: &str = "games";

/// OpenAPI documentation for Games API
#[derive(OpenApi)]
#[openapi(
    paths(list_games, create_game, get_game, update_game, delete_game),
    components(
        schemas(Game, CreateGame, UpdateGame, GameFilter),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Game catalog")
    )
)]
pub struct ApiDoc;

/// Create the games router.
///
/// Reads need any valid token, writes need an Admin token.
pub fn router<R: GameRepository + ?Sized + 'static>(
    service: GameService<R>,
    auth: JwtAuth,
) -> Router {
    let shared_service = Arc::new(service);

    let admin = Router::new()
        .route("/", post(create_game::<R>))
        .route("/{id}", put(update_game::<R>).delete(delete_game::<R>))
        .route_layer(from_fn_with_state(ADMIN_ROLE, require_role));

    Router::new()
        .route("/", get(list_games::<R>))
        .route("/{id}", get(get_game::<R>))
        .merge(admin)
        .route_layer(from_fn_with_state(auth, jwt_auth_middleware))
        .with_state(shared_service)
}

type SharedService<R> = State<Arc<GameService<R>>>;

/// List games with optional filters
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(GameFilter),
    responses(
        (status = 200, description = "List of games", body = Vec<Game>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn list_games<R: GameRepository + ?Sized>(
    State(service): SharedService<R>,
    Query(filter): Query<GameFilter>,
) -> GameResult<Json<Vec<Game>>> {
    let games = service.list_games(filter).await?;
    Ok(Json(games))
}

/// Add a game to the catalog
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateGame,
    responses(
        (status = 201, description = "Game created", body = Game),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn create_game<R: GameRepository + ?Sized>(
    State(service): SharedService<R>,
    ValidatedJson(input): ValidatedJson<CreateGame>,
) -> GameResult<impl IntoResponse> {
    let game = service.create_game(input).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

/// Get a game by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Game ID")
    ),
    responses(
        (status = 200, description = "Game found", body = Game),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn get_game<R: GameRepository + ?Sized>(
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
) -> GameResult<Json<Game>> {
    let game = service.get_game(id).await?;
    Ok(Json(game))
}

/// Update a game
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Game ID")
    ),
    request_body = UpdateGame,
    responses(
        (status = 200, description = "Game updated", body = Game),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn update_game<R: GameRepository + ?Sized>(
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateGame>,
) -> GameResult<Json<Game>> {
    let game = service.update_game(id, input).await?;
    Ok(Json(game))
}

/// Remove a game from the catalog
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Game ID")
    ),
    responses(
        (status = 204, description = "Game deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn delete_game<R: GameRepository + ?Sized>(
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
) -> GameResult<impl IntoResponse> {
    service.delete_game(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
