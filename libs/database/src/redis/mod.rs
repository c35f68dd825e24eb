mod config;
mod connector;

pub use config::RedisConfig;
pub use connector::{check_health, client};
