//! Redis container for the queue backend tests.
//!
//! Besides the connection, `TestRedis` exposes the stream counters the queue
//! tests assert on: stream length (including the `<queue>:dead` stream) and
//! the consumer group's pending entries.

use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::redis::Redis;

/// Redis 8 container, removed when dropped.
///
/// ```no_run
/// use test_utils::TestRedis;
///
/// # async fn example() {
/// let redis = TestRedis::new().await;
/// // point a RedisQueueClient at redis.connection_string(), then:
/// assert_eq!(redis.stream_len("users-created:dead").await, 0);
/// # }
/// ```
pub struct TestRedis {
    #[allow(dead_code)]
    container: ContainerAsync<Redis>,
    connection: MultiplexedConnection,
    pub connection_string: String,
}

impl TestRedis {
    pub async fn new() -> Self {
        // XPENDING with IDLE needs Redis 6.2+
        let container = Redis::default()
            .with_tag("8-alpine")
            .start()
            .await
            .expect("Failed to start Redis container");

        let host_port = container
            .get_host_port_ipv4(6379)
            .await
            .expect("Failed to get Redis port");
        let connection_string = format!("redis://127.0.0.1:{host_port}");

        let connection = Client::open(connection_string.as_str())
            .expect("Failed to create Redis client")
            .get_multiplexed_async_connection()
            .await
            .expect("Failed to connect to Redis");

        tracing::info!(port = host_port, "Test Redis ready");

        Self {
            container,
            connection,
            connection_string,
        }
    }

    pub fn connection(&self) -> MultiplexedConnection {
        self.connection.clone()
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// `XLEN`; 0 for a stream that does not exist.
    pub async fn stream_len(&self, stream: &str) -> usize {
        let mut conn = self.connection();
        conn.xlen(stream).await.expect("XLEN failed")
    }

    /// Entries read by some consumer of `group` but not yet acked.
    pub async fn pending_count(&self, stream: &str, group: &str) -> usize {
        self.pending_consumers(stream, group)
            .await
            .into_iter()
            .map(|(_, count)| count)
            .sum()
    }

    /// Unacked entries per consumer name, from the `XPENDING` summary.
    pub async fn pending_consumers(&self, stream: &str, group: &str) -> Vec<(String, usize)> {
        let mut conn = self.connection();
        let summary: (usize, Option<String>, Option<String>, Option<Vec<(String, String)>>) =
            redis::cmd("XPENDING")
                .arg(stream)
                .arg(group)
                .query_async(&mut conn)
                .await
                .expect("XPENDING failed");

        summary
            .3
            .unwrap_or_default()
            .into_iter()
            .map(|(consumer, count)| (consumer, count.parse().unwrap_or(0)))
            .collect()
    }
}

impl Drop for TestRedis {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test Redis container");
    }
}
