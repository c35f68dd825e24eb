use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::client::{Delivery, DeliveryTag, QueueClient, QueueSession, QueueSpec};
use crate::error::QueueError;

#[derive(Debug, Clone)]
struct Message {
    body: Vec<u8>,
    delivery_count: u32,
    redelivered: bool,
}

#[derive(Debug, Default)]
struct MemoryQueue {
    ready: VecDeque<Message>,
    dead: Vec<Vec<u8>>,
    // Every body ever published, in order
    published: Vec<Vec<u8>>,
}

#[derive(Debug)]
struct BrokerState {
    queues: HashMap<String, MemoryQueue>,
    available: bool,
    publish_budget: Option<usize>,
    connect_attempts: usize,
    open_sessions: usize,
    unacked: usize,
    next_tag: u64,
}

impl Default for BrokerState {
    fn default() -> Self {
        Self {
            queues: HashMap::new(),
            available: true,
            publish_budget: None,
            connect_attempts: 0,
            open_sessions: 0,
            unacked: 0,
            next_tag: 1,
        }
    }
}

/// Process-local broker with the same contract as the Redis backend.
///
/// Clones share state. Used by tests and by local runs without Redis.
/// Requeued and abandoned messages go to the back of the queue.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBroker {
    state: Arc<Mutex<BrokerState>>,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BrokerState> {
        lock(&self.state)
    }

    /// While unavailable, connects and every session operation fail with
    /// [`QueueError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.lock().available = available;
    }

    /// Lets `n` more publishes through, then fails every publish until reset.
    pub fn fail_publish_after(&self, n: usize) {
        self.lock().publish_budget = Some(n);
    }

    pub fn reset_publish_failures(&self) {
        self.lock().publish_budget = None;
    }

    pub fn connect_attempts(&self) -> usize {
        self.lock().connect_attempts
    }

    pub fn open_sessions(&self) -> usize {
        self.lock().open_sessions
    }

    /// Deliveries handed out and not yet settled, across all sessions.
    pub fn unacked_len(&self) -> usize {
        self.lock().unacked
    }

    pub fn is_declared(&self, queue: &str) -> bool {
        self.lock().queues.contains_key(queue)
    }

    /// Bodies published to `queue`, in publish order, whether consumed or not.
    pub fn published(&self, queue: &str) -> Vec<Vec<u8>> {
        self.lock()
            .queues
            .get(queue)
            .map(|q| q.published.clone())
            .unwrap_or_default()
    }

    pub fn ready_len(&self, queue: &str) -> usize {
        self.lock().queues.get(queue).map_or(0, |q| q.ready.len())
    }

    /// Bodies rejected without requeue.
    pub fn dead_letters(&self, queue: &str) -> Vec<Vec<u8>> {
        self.lock()
            .queues
            .get(queue)
            .map(|q| q.dead.clone())
            .unwrap_or_default()
    }

    /// Puts a raw body on `queue`, declaring it if needed. Bypasses publish
    /// failure injection.
    pub fn inject(&self, queue: &str, body: impl Into<Vec<u8>>) {
        let body = body.into();
        let mut state = self.lock();
        let q = state.queues.entry(queue.to_string()).or_default();
        q.published.push(body.clone());
        q.ready.push_back(Message {
            body,
            delivery_count: 1,
            redelivered: false,
        });
    }
}

fn lock(state: &Mutex<BrokerState>) -> MutexGuard<'_, BrokerState> {
    // A panicking test thread must not wedge every other session
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn ensure_available(state: &BrokerState) -> Result<(), QueueError> {
    if state.available {
        Ok(())
    } else {
        Err(QueueError::Unavailable("connection to in-memory broker lost".to_string()))
    }
}

#[async_trait]
impl QueueClient for InMemoryBroker {
    async fn connect(&self) -> Result<Box<dyn QueueSession>, QueueError> {
        let mut state = self.lock();
        state.connect_attempts += 1;
        if !state.available {
            return Err(QueueError::Unavailable("connection refused".to_string()));
        }
        state.open_sessions += 1;
        drop(state);

        Ok(Box::new(InMemorySession {
            state: self.state.clone(),
            subscription: None,
            unacked: HashMap::new(),
        }))
    }

    fn endpoint(&self) -> String {
        "memory://local".to_string()
    }
}

struct Unacked {
    queue: String,
    message: Message,
}

struct InMemorySession {
    state: Arc<Mutex<BrokerState>>,
    subscription: Option<String>,
    unacked: HashMap<DeliveryTag, Unacked>,
}

impl InMemorySession {
    fn settle(&mut self, tag: &DeliveryTag) -> Result<Unacked, QueueError> {
        ensure_available(&lock(&self.state))?;
        let entry = self
            .unacked
            .remove(tag)
            .ok_or_else(|| QueueError::UnknownDelivery(tag.to_string()))?;
        lock(&self.state).unacked -= 1;
        Ok(entry)
    }
}

#[async_trait]
impl QueueSession for InMemorySession {
    async fn declare_queue(&mut self, spec: &QueueSpec) -> Result<(), QueueError> {
        let mut state = lock(&self.state);
        ensure_available(&state)?;
        state.queues.entry(spec.name.clone()).or_default();
        Ok(())
    }

    async fn publish(&mut self, routing_key: &str, body: &[u8]) -> Result<(), QueueError> {
        let mut state = lock(&self.state);
        ensure_available(&state)?;

        match state.publish_budget {
            Some(0) => return Err(QueueError::Unavailable("publish failed".to_string())),
            Some(ref mut left) => *left -= 1,
            None => {}
        }

        let queue = state.queues.get_mut(routing_key).ok_or_else(|| {
            QueueError::Unavailable(format!("queue '{routing_key}' is not declared"))
        })?;
        queue.published.push(body.to_vec());
        queue.ready.push_back(Message {
            body: body.to_vec(),
            delivery_count: 1,
            redelivered: false,
        });
        Ok(())
    }

    async fn subscribe(&mut self, queue: &str) -> Result<(), QueueError> {
        let state = lock(&self.state);
        ensure_available(&state)?;
        if !state.queues.contains_key(queue) {
            return Err(QueueError::Unavailable(format!("queue '{queue}' is not declared")));
        }
        self.subscription = Some(queue.to_string());
        Ok(())
    }

    async fn next_delivery(&mut self) -> Result<Option<Delivery>, QueueError> {
        let queue_name = self.subscription.clone().ok_or(QueueError::NotSubscribed)?;

        let mut state = lock(&self.state);
        ensure_available(&state)?;

        let Some(message) = state
            .queues
            .get_mut(&queue_name)
            .and_then(|q| q.ready.pop_front())
        else {
            return Ok(None);
        };

        let tag = DeliveryTag(state.next_tag.to_string());
        state.next_tag += 1;
        state.unacked += 1;
        drop(state);

        let delivery = Delivery {
            tag: tag.clone(),
            queue: queue_name.clone(),
            body: message.body.clone(),
            redelivered: message.redelivered,
            delivery_count: message.delivery_count,
        };
        self.unacked.insert(
            tag,
            Unacked {
                queue: queue_name,
                message,
            },
        );
        Ok(Some(delivery))
    }

    async fn ack(&mut self, tag: &DeliveryTag) -> Result<(), QueueError> {
        self.settle(tag).map(|_| ())
    }

    async fn reject(&mut self, tag: &DeliveryTag, requeue: bool) -> Result<(), QueueError> {
        let Unacked { queue, message } = self.settle(tag)?;

        let mut state = lock(&self.state);
        let q = state.queues.entry(queue).or_default();
        if requeue {
            q.ready.push_back(Message {
                body: message.body,
                delivery_count: message.delivery_count + 1,
                redelivered: true,
            });
        } else {
            q.dead.push(message.body);
        }
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), QueueError> {
        Ok(())
    }
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        state.open_sessions = state.open_sessions.saturating_sub(1);
        state.unacked = state.unacked.saturating_sub(self.unacked.len());

        for (_, Unacked { queue, message }) in self.unacked.drain() {
            state.queues.entry(queue).or_default().ready.push_back(Message {
                redelivered: true,
                ..message
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUEUE: &str = "users-created";

    async fn session(broker: &InMemoryBroker) -> Box<dyn QueueSession> {
        let mut session = broker.connect().await.unwrap();
        session.declare_queue(&QueueSpec::durable(QUEUE)).await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_publish_then_consume_in_order() {
        let broker = InMemoryBroker::new();
        let mut s = session(&broker).await;
        s.publish(QUEUE, b"first").await.unwrap();
        s.publish(QUEUE, b"second").await.unwrap();
        s.subscribe(QUEUE).await.unwrap();

        let first = s.next_delivery().await.unwrap().unwrap();
        assert_eq!(first.body, b"first");
        assert!(!first.redelivered);
        s.ack(&first.tag).await.unwrap();

        let second = s.next_delivery().await.unwrap().unwrap();
        assert_eq!(second.body, b"second");
        s.ack(&second.tag).await.unwrap();

        assert!(s.next_delivery().await.unwrap().is_none());
        assert_eq!(broker.unacked_len(), 0);
    }

    #[tokio::test]
    async fn test_requeue_increments_delivery_count() {
        let broker = InMemoryBroker::new();
        let mut s = session(&broker).await;
        s.publish(QUEUE, b"retry-me").await.unwrap();
        s.subscribe(QUEUE).await.unwrap();

        let d = s.next_delivery().await.unwrap().unwrap();
        s.reject(&d.tag, true).await.unwrap();

        let again = s.next_delivery().await.unwrap().unwrap();
        assert!(again.redelivered);
        assert_eq!(again.delivery_count, 2);
        assert_ne!(again.tag, d.tag);
    }

    #[tokio::test]
    async fn test_reject_without_requeue_dead_letters() {
        let broker = InMemoryBroker::new();
        let mut s = session(&broker).await;
        s.publish(QUEUE, b"poison").await.unwrap();
        s.subscribe(QUEUE).await.unwrap();

        let d = s.next_delivery().await.unwrap().unwrap();
        s.reject(&d.tag, false).await.unwrap();

        assert!(s.next_delivery().await.unwrap().is_none());
        assert_eq!(broker.dead_letters(QUEUE), vec![b"poison".to_vec()]);
    }

    #[tokio::test]
    async fn test_dropped_session_returns_unacked_messages() {
        let broker = InMemoryBroker::new();
        {
            let mut s = session(&broker).await;
            s.publish(QUEUE, b"in-flight").await.unwrap();
            s.subscribe(QUEUE).await.unwrap();
            let _ = s.next_delivery().await.unwrap().unwrap();
            assert_eq!(broker.unacked_len(), 1);
            assert_eq!(broker.open_sessions(), 1);
        }

        assert_eq!(broker.unacked_len(), 0);
        assert_eq!(broker.open_sessions(), 0);
        assert_eq!(broker.ready_len(QUEUE), 1);

        let mut s = session(&broker).await;
        s.subscribe(QUEUE).await.unwrap();
        let d = s.next_delivery().await.unwrap().unwrap();
        assert!(d.redelivered);
    }

    #[tokio::test]
    async fn test_unavailable_broker_refuses_connections() {
        let broker = InMemoryBroker::new();
        broker.set_available(false);

        let err = broker.connect().await.err().unwrap();
        assert!(err.is_unavailable());
        assert_eq!(broker.connect_attempts(), 1);
    }

    #[tokio::test]
    async fn test_connection_loss_mid_session() {
        let broker = InMemoryBroker::new();
        let mut s = session(&broker).await;
        broker.set_available(false);

        assert!(s.publish(QUEUE, b"x").await.unwrap_err().is_unavailable());
    }

    #[tokio::test]
    async fn test_fail_publish_after_budget() {
        let broker = InMemoryBroker::new();
        broker.fail_publish_after(1);
        let mut s = session(&broker).await;

        s.publish(QUEUE, b"ok").await.unwrap();
        assert!(s.publish(QUEUE, b"boom").await.unwrap_err().is_unavailable());
        assert_eq!(broker.published(QUEUE).len(), 1);
    }

    #[tokio::test]
    async fn test_ack_unknown_tag() {
        let broker = InMemoryBroker::new();
        let mut s = session(&broker).await;
        let err = s.ack(&DeliveryTag("404".into())).await.unwrap_err();
        assert!(matches!(err, QueueError::UnknownDelivery(_)));
    }

    #[tokio::test]
    async fn test_next_delivery_requires_subscription() {
        let broker = InMemoryBroker::new();
        let mut s = session(&broker).await;
        assert!(matches!(
            s.next_delivery().await.unwrap_err(),
            QueueError::NotSubscribed
        ));
    }

    #[tokio::test]
    async fn test_publish_to_undeclared_queue_fails() {
        let broker = InMemoryBroker::new();
        let mut s = broker.connect().await.unwrap();
        assert!(s.publish("nowhere", b"x").await.is_err());
    }
}
