//! Redis Streams backend.
//!
//! A queue is one stream plus one consumer group. Publishing is `XADD` with
//! an approximate `MAXLEN`, consuming is `XREADGROUP` with manual `XACK`.
//! Entries a consumer read but never acked stay in the group's pending list.
//! A session with the same consumer id gets them back on reconnect. Entries
//! left idle by any other consumer for longer than the claim timeout are
//! taken over with `XCLAIM`. Both paths flag them as redelivered.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{Client, RedisResult};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::client::{Delivery, DeliveryTag, QueueClient, QueueSession, QueueSpec};
use crate::config::QueueConfig;
use crate::error::QueueError;

const BODY_FIELD: &str = "body";
const DELIVERIES_FIELD: &str = "deliveries";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// One stream entry. Fields are `None` for pending entries whose data was
/// trimmed away.
type StreamEntry = (String, Option<Vec<(String, Vec<u8>)>>);

/// `XREADGROUP` reply: `[(stream, [(id, fields)])]`.
type StreamReply = Vec<(String, Vec<StreamEntry>)>;

/// Extended `XPENDING` row: `(id, consumer, idle ms, times delivered)`.
type PendingRow = (String, String, u64, u64);

/// Stream that receives messages rejected without requeue.
pub fn dead_letter_stream(queue: &str) -> String {
    format!("{queue}:dead")
}

pub struct RedisQueueClient {
    client: Client,
    endpoint: String,
    group: String,
    consumer_id: String,
    max_length: usize,
    read_batch: usize,
    claim_timeout: Duration,
}

impl RedisQueueClient {
    pub fn from_url(url: &str, config: &QueueConfig) -> Result<Self, QueueError> {
        let client = Client::open(url)?;
        Ok(Self {
            client,
            endpoint: redact(url),
            group: config.consumer_group.clone(),
            consumer_id: config.consumer_id.clone(),
            max_length: config.max_length,
            read_batch: config.read_batch.max(1),
            claim_timeout: config.claim_timeout,
        })
    }
}

/// Drops any `user:password@` part of a connection URL.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}{}", &url[..scheme_end + 3], &url[at + 1..])
        }
        _ => url.to_string(),
    }
}

#[async_trait]
impl QueueClient for RedisQueueClient {
    async fn connect(&self) -> Result<Box<dyn QueueSession>, QueueError> {
        let mut conn = tokio::time::timeout(
            CONNECT_TIMEOUT,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| QueueError::Unavailable(format!("connect to {} timed out", self.endpoint)))??;

        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        debug!(endpoint = %self.endpoint, "Opened queue session");

        Ok(Box::new(RedisSession {
            conn,
            group: self.group.clone(),
            consumer_id: self.consumer_id.clone(),
            max_length: self.max_length,
            read_batch: self.read_batch,
            claim_timeout: self.claim_timeout,
            last_claim: None,
            subscription: None,
            pending_cursor: None,
            buffer: VecDeque::new(),
            in_flight: HashMap::new(),
        }))
    }

    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }
}

struct InFlight {
    body: Vec<u8>,
    delivery_count: u32,
}

struct RedisSession {
    conn: MultiplexedConnection,
    group: String,
    consumer_id: String,
    max_length: usize,
    read_batch: usize,
    claim_timeout: Duration,
    /// `None` until the first claim pass of the current subscription.
    last_claim: Option<Instant>,
    subscription: Option<String>,
    /// Last pending id handed out; `None` once the pending list is drained.
    pending_cursor: Option<String>,
    buffer: VecDeque<Delivery>,
    in_flight: HashMap<DeliveryTag, InFlight>,
}

impl RedisSession {
    async fn create_group(&mut self, stream: &str) -> Result<(), QueueError> {
        let result: RedisResult<()> = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(stream)
            .arg(&self.group)
            .arg("0")
            .arg("MKSTREAM")
            .query_async(&mut self.conn)
            .await;

        match result {
            Ok(()) => {
                info!(stream = %stream, group = %self.group, "Created consumer group");
                Ok(())
            }
            Err(e) if e.to_string().contains("BUSYGROUP") => {
                debug!(stream = %stream, group = %self.group, "Consumer group already exists");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn read(&mut self, stream: &str, id: &str) -> Result<StreamReply, QueueError> {
        let reply: Option<StreamReply> = redis::cmd("XREADGROUP")
            .arg("GROUP")
            .arg(&self.group)
            .arg(&self.consumer_id)
            .arg("COUNT")
            .arg(self.read_batch)
            .arg("STREAMS")
            .arg(stream)
            .arg(id)
            .query_async(&mut self.conn)
            .await?;
        Ok(reply.unwrap_or_default())
    }

    fn claim_due(&self) -> bool {
        self.last_claim
            .is_none_or(|at| at.elapsed() >= self.claim_timeout)
    }

    /// Takes over entries other consumers have left idle past the claim timeout.
    async fn claim_abandoned(&mut self, stream: &str) -> Result<Vec<StreamEntry>, QueueError> {
        self.last_claim = Some(Instant::now());
        let min_idle = u64::try_from(self.claim_timeout.as_millis()).unwrap_or(u64::MAX);

        let pending: RedisResult<Vec<PendingRow>> = redis::cmd("XPENDING")
            .arg(stream)
            .arg(&self.group)
            .arg("IDLE")
            .arg(min_idle)
            .arg("-")
            .arg("+")
            .arg(self.read_batch)
            .query_async(&mut self.conn)
            .await;

        let pending = match pending {
            Ok(rows) => rows,
            Err(e) if e.to_string().contains("NOGROUP") => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        // Our own entries come back through the pending cursor
        let ids: Vec<String> = pending
            .into_iter()
            .filter(|(_, consumer, _, _)| *consumer != self.consumer_id)
            .map(|(id, _, _, _)| id)
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        // XCLAIM re-checks the idle time, so a consumer that settled meanwhile keeps its entry
        let mut cmd = redis::cmd("XCLAIM");
        cmd.arg(stream)
            .arg(&self.group)
            .arg(&self.consumer_id)
            .arg(min_idle);
        for id in &ids {
            cmd.arg(id);
        }
        let claimed: Vec<(String, Vec<(String, Vec<u8>)>)> = cmd.query_async(&mut self.conn).await?;

        if !claimed.is_empty() {
            warn!(stream = %stream, count = claimed.len(), "Claimed abandoned messages");
        }
        Ok(claimed
            .into_iter()
            .map(|(id, fields)| (id, Some(fields)))
            .collect())
    }

    /// Refills the buffer: own pending entries first, then abandoned ones,
    /// then new ones.
    async fn fill(&mut self, stream: &str) -> Result<(), QueueError> {
        if let Some(cursor) = self.pending_cursor.clone() {
            let reply = self.read(stream, &cursor).await?;
            let entries: Vec<_> = reply.into_iter().flat_map(|(_, entries)| entries).collect();

            match entries.last() {
                Some((id, _)) => self.pending_cursor = Some(id.clone()),
                None => self.pending_cursor = None,
            }
            if !entries.is_empty() {
                warn!(stream = %stream, count = entries.len(), "Redelivering pending messages");
            }
            return self.buffer_entries(stream, entries, true).await;
        }

        if self.claim_due() {
            let claimed = self.claim_abandoned(stream).await?;
            if !claimed.is_empty() {
                return self.buffer_entries(stream, claimed, true).await;
            }
        }

        let reply = self.read(stream, ">").await?;
        let entries = reply.into_iter().flat_map(|(_, entries)| entries).collect();
        self.buffer_entries(stream, entries, false).await
    }

    async fn buffer_entries(
        &mut self,
        stream: &str,
        entries: Vec<StreamEntry>,
        redelivered: bool,
    ) -> Result<(), QueueError> {
        for (id, fields) in entries {
            let tag = DeliveryTag(id);
            if self.in_flight.contains_key(&tag) {
                continue;
            }

            let fields = fields.unwrap_or_default();
            let body = fields
                .iter()
                .find(|(name, _)| name == BODY_FIELD)
                .map(|(_, value)| value.clone());
            let delivery_count = fields
                .iter()
                .find(|(name, _)| name == DELIVERIES_FIELD)
                .and_then(|(_, value)| std::str::from_utf8(value).ok()?.parse().ok())
                .unwrap_or(1);

            let Some(body) = body else {
                // Trimmed or foreign entry; nothing to hand to a handler
                warn!(stream = %stream, id = %tag, "Dropping stream entry without body");
                let _: i64 = redis::cmd("XACK")
                    .arg(stream)
                    .arg(&self.group)
                    .arg(&tag.0)
                    .query_async(&mut self.conn)
                    .await?;
                continue;
            };

            self.buffer.push_back(Delivery {
                tag,
                queue: stream.to_string(),
                body,
                redelivered,
                delivery_count,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl QueueSession for RedisSession {
    async fn declare_queue(&mut self, spec: &QueueSpec) -> Result<(), QueueError> {
        if !spec.durable || spec.exclusive || spec.auto_delete {
            return Err(QueueError::Unsupported(format!(
                "stream '{}' must be durable, shared and persistent",
                spec.name
            )));
        }
        self.create_group(&spec.name).await
    }

    async fn publish(&mut self, routing_key: &str, body: &[u8]) -> Result<(), QueueError> {
        let id: String = redis::cmd("XADD")
            .arg(routing_key)
            .arg("MAXLEN")
            .arg("~")
            .arg(self.max_length)
            .arg("*")
            .arg(BODY_FIELD)
            .arg(body)
            .arg(DELIVERIES_FIELD)
            .arg(1)
            .query_async(&mut self.conn)
            .await?;

        debug!(stream = %routing_key, id = %id, "Published message");
        Ok(())
    }

    async fn subscribe(&mut self, queue: &str) -> Result<(), QueueError> {
        self.subscription = Some(queue.to_string());
        self.pending_cursor = Some("0".to_string());
        self.last_claim = None;
        self.buffer.clear();
        Ok(())
    }

    async fn next_delivery(&mut self) -> Result<Option<Delivery>, QueueError> {
        let stream = self.subscription.clone().ok_or(QueueError::NotSubscribed)?;

        if self.buffer.is_empty() {
            self.fill(&stream).await?;
            // Pending list just ran dry; try abandoned and new entries straight away
            if self.buffer.is_empty() && self.pending_cursor.is_none() {
                self.fill(&stream).await?;
            }
        }

        let Some(delivery) = self.buffer.pop_front() else {
            return Ok(None);
        };
        self.in_flight.insert(
            delivery.tag.clone(),
            InFlight {
                body: delivery.body.clone(),
                delivery_count: delivery.delivery_count,
            },
        );
        Ok(Some(delivery))
    }

    async fn ack(&mut self, tag: &DeliveryTag) -> Result<(), QueueError> {
        let stream = self.subscription.clone().ok_or(QueueError::NotSubscribed)?;
        if !self.in_flight.contains_key(tag) {
            return Err(QueueError::UnknownDelivery(tag.to_string()));
        }

        let _: i64 = redis::cmd("XACK")
            .arg(&stream)
            .arg(&self.group)
            .arg(&tag.0)
            .query_async(&mut self.conn)
            .await?;

        self.in_flight.remove(tag);
        Ok(())
    }

    async fn reject(&mut self, tag: &DeliveryTag, requeue: bool) -> Result<(), QueueError> {
        let stream = self.subscription.clone().ok_or(QueueError::NotSubscribed)?;
        let entry = self
            .in_flight
            .get(tag)
            .ok_or_else(|| QueueError::UnknownDelivery(tag.to_string()))?;

        let (target, deliveries) = if requeue {
            (stream.clone(), entry.delivery_count + 1)
        } else {
            (dead_letter_stream(&stream), entry.delivery_count)
        };

        // Re-add and ack in one transaction so the message is never lost or doubled
        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("XADD")
            .arg(&target)
            .arg("MAXLEN")
            .arg("~")
            .arg(self.max_length)
            .arg("*")
            .arg(BODY_FIELD)
            .arg(&entry.body)
            .arg(DELIVERIES_FIELD)
            .arg(deliveries)
            .ignore()
            .cmd("XACK")
            .arg(&stream)
            .arg(&self.group)
            .arg(&tag.0)
            .ignore();
        let _: () = pipe.query_async(&mut self.conn).await?;

        self.in_flight.remove(tag);
        debug!(stream = %stream, id = %tag, requeue, "Rejected message");
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), QueueError> {
        if !self.in_flight.is_empty() {
            debug!(
                count = self.in_flight.len(),
                "Closing session with unacked messages; they stay pending"
            );
        }
        Ok(())
    }
}
