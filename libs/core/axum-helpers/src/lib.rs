//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! - [`auth`]: HS256 tokens, authentication and role middleware
//! - [`server`]: router assembly, health checks, graceful shutdown
//! - [`http`]: correlation ids, CORS, security headers
//! - [`errors`]: `AppError` and the JSON error body
//! - [`extractors`]: `UuidPath`, `ValidatedJson`

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{ADMIN_ROLE, IssuedToken, JwtAuth, JwtClaims, JwtConfig, jwt_auth_middleware, require_role};
pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{UuidPath, ValidatedJson};
pub use http::{CORRELATION_ID_HEADER, correlation_id, create_cors_layer, security_headers};
pub use server::{
    HealthCheckFuture, ShutdownCoordinator, create_production_app, create_router, health_router,
    run_health_checks, shutdown_signal,
};
