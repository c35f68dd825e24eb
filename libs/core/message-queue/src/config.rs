use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or};
use std::time::Duration;
use uuid::Uuid;

pub const DEFAULT_QUEUE_NAME: &str = "users-created";

/// Queue naming and consumer pacing.
///
/// | Variable | Default |
/// |----------|---------|
/// | `QUEUE_NAME` | `users-created` |
/// | `QUEUE_CONSUMER_GROUP` | `user-registration` |
/// | `QUEUE_CONSUMER_ID` | `consumer-<uuid>` |
/// | `QUEUE_RECONNECT_BACKOFF_SECS` | `5` |
/// | `QUEUE_POLL_INTERVAL_MS` | `500` |
/// | `QUEUE_MAX_LENGTH` | `100000` |
/// | `QUEUE_READ_BATCH` | `10` |
/// | `QUEUE_CLAIM_TIMEOUT_MS` | `60000` |
#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub queue_name: String,
    pub consumer_group: String,
    pub consumer_id: String,
    pub reconnect_backoff: Duration,
    pub poll_interval: Duration,
    /// Approximate cap applied on publish (`MAXLEN ~`).
    pub max_length: usize,
    pub read_batch: usize,
    /// Idle time after which another consumer's unacked entries are claimed.
    pub claim_timeout: Duration,
}

impl QueueConfig {
    pub fn new(queue_name: impl Into<String>) -> Self {
        Self {
            queue_name: queue_name.into(),
            consumer_group: "user-registration".to_string(),
            consumer_id: format!("consumer-{}", Uuid::new_v4()),
            reconnect_backoff: Duration::from_secs(5),
            poll_interval: Duration::from_millis(500),
            max_length: 100_000,
            read_batch: 10,
            claim_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_consumer_id(mut self, consumer_id: impl Into<String>) -> Self {
        self.consumer_id = consumer_id.into();
        self
    }

    pub fn with_claim_timeout(mut self, claim_timeout: Duration) -> Self {
        self.claim_timeout = claim_timeout;
        self
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_NAME)
    }
}

impl FromEnv for QueueConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::new(env_or_default("QUEUE_NAME", DEFAULT_QUEUE_NAME));

        let read_batch: usize = env_parse_or("QUEUE_READ_BATCH", defaults.read_batch)?;
        if read_batch == 0 {
            return Err(ConfigError::Invalid {
                key: "QUEUE_READ_BATCH".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            consumer_group: env_or_default("QUEUE_CONSUMER_GROUP", &defaults.consumer_group),
            consumer_id: env_or_default("QUEUE_CONSUMER_ID", &defaults.consumer_id),
            reconnect_backoff: Duration::from_secs(env_parse_or(
                "QUEUE_RECONNECT_BACKOFF_SECS",
                5u64,
            )?),
            poll_interval: Duration::from_millis(env_parse_or("QUEUE_POLL_INTERVAL_MS", 500u64)?),
            max_length: env_parse_or("QUEUE_MAX_LENGTH", defaults.max_length)?,
            read_batch,
            claim_timeout: Duration::from_millis(env_parse_or("QUEUE_CLAIM_TIMEOUT_MS", 60_000u64)?),
            ..defaults
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 8] = [
        "QUEUE_NAME",
        "QUEUE_CONSUMER_GROUP",
        "QUEUE_CONSUMER_ID",
        "QUEUE_RECONNECT_BACKOFF_SECS",
        "QUEUE_POLL_INTERVAL_MS",
        "QUEUE_MAX_LENGTH",
        "QUEUE_READ_BATCH",
        "QUEUE_CLAIM_TIMEOUT_MS",
    ];

    #[test]
    fn test_queue_config_defaults() {
        temp_env::with_vars_unset(VARS, || {
            let config = QueueConfig::from_env().unwrap();
            assert_eq!(config.queue_name, "users-created");
            assert_eq!(config.consumer_group, "user-registration");
            assert!(config.consumer_id.starts_with("consumer-"));
            assert_eq!(config.reconnect_backoff, Duration::from_secs(5));
            assert_eq!(config.poll_interval, Duration::from_millis(500));
            assert_eq!(config.max_length, 100_000);
            assert_eq!(config.claim_timeout, Duration::from_secs(60));
        });
    }

    #[test]
    fn test_queue_config_overrides() {
        temp_env::with_vars(
            [
                ("QUEUE_NAME", Some("signups")),
                ("QUEUE_CONSUMER_ID", Some("worker-1")),
                ("QUEUE_RECONNECT_BACKOFF_SECS", Some("2")),
                ("QUEUE_POLL_INTERVAL_MS", Some("50")),
                ("QUEUE_CLAIM_TIMEOUT_MS", Some("1500")),
            ],
            || {
                let config = QueueConfig::from_env().unwrap();
                assert_eq!(config.queue_name, "signups");
                assert_eq!(config.consumer_id, "worker-1");
                assert_eq!(config.reconnect_backoff, Duration::from_secs(2));
                assert_eq!(config.poll_interval, Duration::from_millis(50));
                assert_eq!(config.claim_timeout, Duration::from_millis(1500));
            },
        );
    }

    #[test]
    fn test_queue_config_rejects_bad_backoff() {
        temp_env::with_var("QUEUE_RECONNECT_BACKOFF_SECS", Some("five"), || {
            let err = QueueConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("QUEUE_RECONNECT_BACKOFF_SECS"));
        });
    }

    #[test]
    fn test_queue_config_rejects_zero_batch() {
        temp_env::with_var("QUEUE_READ_BATCH", Some("0"), || {
            assert!(QueueConfig::from_env().is_err());
        });
    }
}
