use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    ADMIN_ROLE, AppError, JwtAuth, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse,
        ServiceUnavailableResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware, require_role,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::candidate::CandidateUser;
use crate::error::{UserError, UserResult};
use crate::ingest::{BatchSummary, BulkRegistrationProducer};
use crate::models::{
    CreateUser, LoginRequest, LoginResponse, Role, UpdateUser, UserFilter, UserResponse,
};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const TAG: &str = "users";

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(
        create_user,
        login,
        bulk_register,
        list_users,
        get_user,
        update_user,
        delete_user,
    ),
    components(
        schemas(
            UserResponse,
            CreateUser,
            UpdateUser,
            UserFilter,
            Role,
            LoginRequest,
            LoginResponse,
            CandidateUser,
            BatchSummary
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            ConflictResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "User accounts, login and bulk registration")
    )
)]
pub struct ApiDoc;

pub struct UsersState<R: UserRepository + ?Sized> {
    pub service: UserService<R>,
    pub producer: BulkRegistrationProducer,
    pub auth: JwtAuth,
}

/// Create the users router.
///
/// `POST /` and `POST /login` are public, everything else requires an
/// Admin token.
pub fn router<R: UserRepository + ?Sized + 'static>(
    service: UserService<R>,
    producer: BulkRegistrationProducer,
    auth: JwtAuth,
) -> Router {
    let state = Arc::new(UsersState {
        service,
        producer,
        auth: auth.clone(),
    });

    let admin = Router::new()
        .route("/", get(list_users::<R>))
        .route("/bulk", post(bulk_register::<R>))
        .route(
            "/{id}",
            get(get_user::<R>).put(update_user::<R>).delete(delete_user::<R>),
        )
        .route_layer(from_fn_with_state(ADMIN_ROLE, require_role))
        .route_layer(from_fn_with_state(auth, jwt_auth_middleware));

    Router::new()
        .route("/", post(create_user::<R>))
        .route("/login", post(login::<R>))
        .merge(admin)
        .with_state(state)
}

type SharedState<R> = State<Arc<UsersState<R>>>;

/// Register a new user
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository + ?Sized>(
    State(state): SharedState<R>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = state.service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Exchange credentials for an access token
#[utoipa::path(
    post,
    path = "/login",
    tag = TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository + ?Sized>(
    State(state): SharedState<R>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<LoginResponse>> {
    let response = state.service.login(input, &state.auth).await?;
    Ok(Json(response))
}

/// Queue a batch of users for asynchronous registration
///
/// Invalid entries are skipped and counted. Valid entries are published
/// in order and created by the background consumer. A body that is not a
/// JSON array of objects is rejected with the standard error body.
#[utoipa::path(
    post,
    path = "/bulk",
    tag = TAG,
    request_body = Vec<CandidateUser>,
    responses(
        (status = 202, description = "Batch queued", body = BatchSummary),
        (status = 400, description = "Body is not valid JSON"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 422, description = "Body is not an array of candidate objects"),
        (status = 503, response = ServiceUnavailableResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn bulk_register<R: UserRepository + ?Sized>(
    State(state): SharedState<R>,
    body: Result<Json<Vec<CandidateUser>>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    // Per-record rules run in the producer; only the array shape is checked here
    let Json(candidates) = body?;
    let summary = state
        .producer
        .ingest_batch(&candidates)
        .await
        .map_err(UserError::from)?;
    Ok((StatusCode::ACCEPTED, Json(summary)))
}

/// List users with optional filters
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(UserFilter),
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn list_users<R: UserRepository + ?Sized>(
    State(state): SharedState<R>,
    Query(filter): Query<UserFilter>,
) -> UserResult<Json<Vec<UserResponse>>> {
    let users = state.service.list_users(filter).await?;
    Ok(Json(users))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn get_user<R: UserRepository + ?Sized>(
    State(state): SharedState<R>,
    UuidPath(id): UuidPath,
) -> UserResult<Json<UserResponse>> {
    let user = state.service.get_user(id).await?;
    Ok(Json(user))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn update_user<R: UserRepository + ?Sized>(
    State(state): SharedState<R>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> UserResult<Json<UserResponse>> {
    let user = state.service.update_user(id, input).await?;
    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn delete_user<R: UserRepository + ?Sized>(
    State(state): SharedState<R>,
    UuidPath(id): UuidPath,
) -> UserResult<impl IntoResponse> {
    state.service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
