//! Reconnecting consumer loop.
//!
//! One connection at a time. Each delivery is handed to the handler, and the
//! handler's verdict is applied before the next delivery is requested. When
//! the broker goes away the loop drops the session, waits out the backoff and
//! reconnects, forever, until shutdown is signalled.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::client::{Delivery, QueueClient, QueueSession, QueueSpec};
use crate::config::QueueConfig;
use crate::error::QueueError;
use crate::metrics::QueueMetrics;

/// What to do with a delivery once the handler is done with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Processed; remove from the queue.
    Ack,
    /// Never processable; drop without requeue.
    Reject,
    /// Transient failure; put back for another attempt.
    Requeue,
}

#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    async fn handle(&self, delivery: &Delivery) -> Disposition;
}

#[async_trait]
impl<H: MessageHandler + ?Sized> MessageHandler for Arc<H> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn handle(&self, delivery: &Delivery) -> Disposition {
        (**self).handle(delivery).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Disconnected,
    Connecting,
    Consuming,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    pub queue: String,
    /// Fixed wait between a lost connection and the next connect attempt.
    pub reconnect_backoff: Duration,
    /// Wait before polling again when the queue is empty.
    pub poll_interval: Duration,
}

impl From<&QueueConfig> for ConsumerConfig {
    fn from(config: &QueueConfig) -> Self {
        Self {
            queue: config.queue_name.clone(),
            reconnect_backoff: config.reconnect_backoff,
            poll_interval: config.poll_interval,
        }
    }
}

/// How a consume session ended.
enum SessionEnd {
    Shutdown,
    Lost(QueueError),
}

pub struct QueueConsumer<H> {
    client: Arc<dyn QueueClient>,
    handler: H,
    config: ConsumerConfig,
    metrics: QueueMetrics,
    state: watch::Sender<ConsumerState>,
}

impl<H: MessageHandler> QueueConsumer<H> {
    pub fn new(client: Arc<dyn QueueClient>, handler: H, config: ConsumerConfig) -> Self {
        let metrics = QueueMetrics::new(&config.queue);
        let (state, _) = watch::channel(ConsumerState::Disconnected);
        Self {
            client,
            handler,
            config,
            metrics,
            state,
        }
    }

    /// Live view of the connection state.
    pub fn state(&self) -> watch::Receiver<ConsumerState> {
        self.state.subscribe()
    }

    fn set_state(&self, state: ConsumerState) {
        self.state.send_replace(state);
    }

    /// Runs until `shutdown` turns `true` (or its sender is dropped).
    ///
    /// A delivery whose handler has already started is always settled before
    /// the loop checks for shutdown again.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            queue = %self.config.queue,
            handler = %self.handler.name(),
            endpoint = %self.client.endpoint(),
            "Starting queue consumer"
        );

        while !*shutdown.borrow() {
            self.set_state(ConsumerState::Connecting);

            let session = tokio::select! {
                _ = cancelled(&mut shutdown) => break,
                session = self.open_session() => session,
            };

            let error = match session {
                Ok(session) => {
                    info!(queue = %self.config.queue, "Consuming");
                    self.set_state(ConsumerState::Consuming);
                    match self.consume(session, &mut shutdown).await {
                        SessionEnd::Shutdown => break,
                        SessionEnd::Lost(e) => e,
                    }
                }
                Err(e) => e,
            };

            self.set_state(ConsumerState::Disconnected);
            self.metrics.reconnect();
            warn!(
                queue = %self.config.queue,
                error = %error,
                backoff_secs = self.config.reconnect_backoff.as_secs_f64(),
                "Queue connection lost, retrying after backoff"
            );

            tokio::select! {
                _ = cancelled(&mut shutdown) => break,
                _ = tokio::time::sleep(self.config.reconnect_backoff) => {}
            }
        }

        self.set_state(ConsumerState::Stopped);
        info!(queue = %self.config.queue, "Queue consumer stopped");
    }

    async fn open_session(&self) -> Result<Box<dyn QueueSession>, QueueError> {
        let mut session = self.client.connect().await?;
        session
            .declare_queue(&QueueSpec::durable(&self.config.queue))
            .await?;
        session.subscribe(&self.config.queue).await?;
        Ok(session)
    }

    async fn consume(
        &self,
        mut session: Box<dyn QueueSession>,
        shutdown: &mut watch::Receiver<bool>,
    ) -> SessionEnd {
        loop {
            if *shutdown.borrow() {
                return close(session).await;
            }

            let delivery = match session.next_delivery().await {
                Ok(Some(delivery)) => delivery,
                Ok(None) => {
                    tokio::select! {
                        _ = cancelled(shutdown) => return close(session).await,
                        _ = tokio::time::sleep(self.config.poll_interval) => continue,
                    }
                }
                Err(e) => return SessionEnd::Lost(e),
            };

            let disposition = self.handler.handle(&delivery).await;
            debug!(
                queue = %delivery.queue,
                tag = %delivery.tag,
                redelivered = delivery.redelivered,
                ?disposition,
                "Handled delivery"
            );

            if let Err(e) = self.settle(session.as_mut(), &delivery, disposition).await {
                // Unsettled delivery returns to the broker with the dropped session
                error!(tag = %delivery.tag, error = %e, "Failed to settle delivery");
                return SessionEnd::Lost(e);
            }
        }
    }

    async fn settle(
        &self,
        session: &mut dyn QueueSession,
        delivery: &Delivery,
        disposition: Disposition,
    ) -> Result<(), QueueError> {
        match disposition {
            Disposition::Ack => {
                session.ack(&delivery.tag).await?;
                self.metrics.acked();
            }
            Disposition::Reject => {
                session.reject(&delivery.tag, false).await?;
                self.metrics.rejected();
            }
            Disposition::Requeue => {
                session.reject(&delivery.tag, true).await?;
                self.metrics.requeued();
            }
        }
        Ok(())
    }
}

async fn close(session: Box<dyn QueueSession>) -> SessionEnd {
    if let Err(e) = session.close().await {
        debug!(error = %e, "Error closing queue session");
    }
    SessionEnd::Shutdown
}

/// Resolves once shutdown is requested or the sender is gone.
async fn cancelled(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
