use redis::Client;
use std::time::Duration;

use super::RedisConfig;
use crate::common::DatabaseError;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

/// Parses the URL without opening a connection, so startup does not
/// depend on Redis being reachable.
pub fn client(config: &RedisConfig) -> redis::RedisResult<Client> {
    Client::open(config.url.as_str())
}

/// Opens a short-lived connection and sends `PING`.
pub async fn check_health(client: &Client) -> Result<(), DatabaseError> {
    let ping = async {
        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await
    };

    match tokio::time::timeout(HEALTH_TIMEOUT, ping).await {
        Ok(Ok(reply)) if reply == "PONG" => Ok(()),
        Ok(Ok(reply)) => Err(DatabaseError::HealthCheckFailed(format!(
            "Redis PING returned {reply}"
        ))),
        Ok(Err(e)) => Err(DatabaseError::Redis(e)),
        Err(_) => Err(DatabaseError::HealthCheckFailed(
            "Redis PING timed out".to_string(),
        )),
    }
}
