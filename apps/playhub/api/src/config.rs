use axum_helpers::JwtConfig;
use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::postgres::PostgresConfig;
use database::redis::RedisConfig;
use message_queue::QueueConfig;

pub use core_config::Environment;

/// Application configuration, composed from the shared config components.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    /// `None` when `DATABASE_URL` is unset; repositories are then in-memory.
    pub database: Option<PostgresConfig>,
    pub redis: RedisConfig,
    pub queue: QueueConfig,
    pub jwt: JwtConfig,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = match std::env::var("DATABASE_URL") {
            Ok(_) => Some(PostgresConfig::from_env()?),
            Err(_) => None,
        };
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=8080
        let redis = RedisConfig::from_env()?;
        let queue = QueueConfig::from_env()?;
        let jwt = JwtConfig::from_env()?; // Required - will fail if not set

        Ok(Self {
            app: app_info!(),
            database,
            redis,
            queue,
            jwt,
            server,
            environment,
        })
    }
}
