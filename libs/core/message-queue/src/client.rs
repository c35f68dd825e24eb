use async_trait::async_trait;
use std::fmt;

use crate::error::QueueError;

/// Declaration parameters for a named queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSpec {
    pub name: String,
    pub durable: bool,
    pub exclusive: bool,
    pub auto_delete: bool,
}

impl QueueSpec {
    /// Survives broker restarts, shared between connections, never removed
    /// automatically.
    pub fn durable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            durable: true,
            exclusive: false,
            auto_delete: false,
        }
    }
}

/// Broker-assigned handle for one delivery, valid only within the session
/// that received it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeliveryTag(pub String);

impl fmt::Display for DeliveryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Delivery {
    pub tag: DeliveryTag,
    pub queue: String,
    pub body: Vec<u8>,
    /// Set when the message was handed out before without an ack.
    pub redelivered: bool,
    /// 1 on first delivery, incremented on every requeue.
    pub delivery_count: u32,
}

/// Opens sessions against one broker endpoint.
#[async_trait]
pub trait QueueClient: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn QueueSession>, QueueError>;

    /// Human readable endpoint for logs, without credentials.
    fn endpoint(&self) -> String;
}

/// One connection plus channel.
///
/// Dropping a session releases the connection. Deliveries that were not
/// acked or rejected go back to the broker for redelivery.
#[async_trait]
pub trait QueueSession: Send {
    async fn declare_queue(&mut self, spec: &QueueSpec) -> Result<(), QueueError>;

    /// Publishes to the queue named by `routing_key`.
    async fn publish(&mut self, routing_key: &str, body: &[u8]) -> Result<(), QueueError>;

    /// Starts manual-ack consumption of `queue`.
    async fn subscribe(&mut self, queue: &str) -> Result<(), QueueError>;

    /// Next delivery for the subscription, or `None` when nothing is
    /// waiting right now.
    async fn next_delivery(&mut self) -> Result<Option<Delivery>, QueueError>;

    async fn ack(&mut self, tag: &DeliveryTag) -> Result<(), QueueError>;

    /// `requeue = true` hands the message back for another attempt,
    /// `false` discards it.
    async fn reject(&mut self, tag: &DeliveryTag, requeue: bool) -> Result<(), QueueError>;

    async fn close(self: Box<Self>) -> Result<(), QueueError>;
}
