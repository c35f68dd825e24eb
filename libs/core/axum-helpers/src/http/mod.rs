//! Cross-cutting HTTP middleware applied by [`crate::server::create_router`].

pub mod correlation;
pub mod cors;
pub mod security;

pub use correlation::{CORRELATION_ID_HEADER, correlation_id};
pub use cors::create_cors_layer;
pub use security::security_headers;
