//! Connection helpers for PostgreSQL (SeaORM) and Redis.
//!
//! ```ignore
//! let db = database::postgres::connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! database::postgres::run_migrations::<migration::Migrator>(&db, "playhub_api").await?;
//!
//! let redis = database::redis::client(&RedisConfig::from_env()?)?;
//! database::redis::check_health(&redis).await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "redis")]
pub mod redis;

pub use common::{DatabaseError, DatabaseResult};
