//! Durable work queues with manual acknowledgement.
//!
//! - [`QueueClient`] / [`QueueSession`]: connect, declare, publish, subscribe,
//!   ack and reject. One session owns one connection and releases it on drop.
//! - [`RedisQueueClient`]: Redis Streams backend (one stream plus one
//!   consumer group per queue).
//! - [`InMemoryBroker`]: same contract in process, with switches for
//!   simulating an unreachable broker.
//! - [`QueueConsumer`]: reconnecting delivery loop that hands each message
//!   to a [`MessageHandler`] and applies its [`Disposition`].
//!
//! ```ignore
//! let client: Arc<dyn QueueClient> = Arc::new(RedisQueueClient::from_url(&url, &config)?);
//! let consumer = QueueConsumer::new(client, handler, ConsumerConfig::from(&config));
//! consumer.run(shutdown_rx).await;
//! ```

mod client;
mod config;
mod consumer;
mod error;
mod memory;
pub mod metrics;
mod redis;

pub use client::{Delivery, DeliveryTag, QueueClient, QueueSession, QueueSpec};
pub use config::{DEFAULT_QUEUE_NAME, QueueConfig};
pub use consumer::{ConsumerConfig, ConsumerState, Disposition, MessageHandler, QueueConsumer};
pub use error::QueueError;
pub use memory::InMemoryBroker;
pub use self::metrics::{QueueMetrics, init_metrics, render_metrics};
pub use self::redis::RedisQueueClient;
