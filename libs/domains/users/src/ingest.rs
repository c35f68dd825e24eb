//! Producer side of bulk registration.

use message_queue::{QueueClient, QueueError, QueueMetrics, QueueSession, QueueSpec};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::candidate::{CandidateUser, validate_candidate};
use crate::codec::{self, EncodeError};

/// Why a batch stopped before every valid candidate was published.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("candidate {index} was not published: {source}")]
    Encode {
        index: usize,
        #[source]
        source: EncodeError,
    },
}

impl IngestError {
    /// True when the broker, not the batch, caused the failure.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, IngestError::Queue(e) if e.is_unavailable())
    }
}

/// Per-batch outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BatchSummary {
    /// Valid candidates now durably queued
    pub published: usize,
    /// Candidates that failed validation and were never published
    pub skipped: usize,
}

/// Validates candidates and publishes the valid ones, one message each.
#[derive(Clone)]
pub struct BulkRegistrationProducer {
    client: Arc<dyn QueueClient>,
    queue: String,
    metrics: QueueMetrics,
}

impl BulkRegistrationProducer {
    pub fn new(client: Arc<dyn QueueClient>, queue: impl Into<String>) -> Self {
        let queue = queue.into();
        Self {
            client,
            metrics: QueueMetrics::new(queue.clone()),
            queue,
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Publishes every valid candidate in input order over a single session.
    ///
    /// Invalid candidates are counted and skipped. A broker failure aborts
    /// the call; messages published before the failure stay queued.
    pub async fn ingest_batch(
        &self,
        candidates: &[CandidateUser],
    ) -> Result<BatchSummary, IngestError> {
        let mut session = self.client.connect().await?;
        let result = self.publish_all(session.as_mut(), candidates).await;

        if let Err(e) = session.close().await {
            debug!(queue = %self.queue, error = %e, "Producer session did not close cleanly");
        }

        match &result {
            Ok(summary) => info!(
                queue = %self.queue,
                published = summary.published,
                skipped = summary.skipped,
                "Bulk registration batch queued"
            ),
            Err(e) => warn!(queue = %self.queue, error = %e, "Bulk registration batch failed"),
        }
        result
    }

    async fn publish_all(
        &self,
        session: &mut dyn QueueSession,
        candidates: &[CandidateUser],
    ) -> Result<BatchSummary, IngestError> {
        session.declare_queue(&QueueSpec::durable(&self.queue)).await?;

        let mut summary = BatchSummary::default();
        for (index, candidate) in candidates.iter().enumerate() {
            let validation = validate_candidate(candidate);
            if !validation.is_valid() {
                debug!(
                    index,
                    email = %candidate.email,
                    errors = ?validation.messages(),
                    "Skipping invalid candidate"
                );
                summary.skipped += 1;
                self.metrics.skipped(1);
                continue;
            }

            let body =
                codec::encode(candidate).map_err(|source| IngestError::Encode { index, source })?;
            session.publish(&self.queue, &body).await?;
            summary.published += 1;
            self.metrics.published();
        }

        Ok(summary)
    }
}
