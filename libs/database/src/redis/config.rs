#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_or_default};

pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub url: String,
}

impl RedisConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REDIS_URL)
    }
}

/// `REDIS_URL`, defaulting to a local instance.
#[cfg(feature = "config")]
impl FromEnv for RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(env_or_default("REDIS_URL", DEFAULT_REDIS_URL)))
    }
}
