//! Stateless HS256 bearer tokens and the middleware that enforces them.
//!
//! ```ignore
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let admin_only = Router::new()
//!     .route("/", post(create_game))
//!     .route_layer(from_fn_with_state(ADMIN_ROLE, require_role))
//!     .route_layer(from_fn_with_state(auth.clone(), jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{IssuedToken, JwtAuth, JwtClaims};
pub use middleware::{ADMIN_ROLE, jwt_auth_middleware, require_role};
