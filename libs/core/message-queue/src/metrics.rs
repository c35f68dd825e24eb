//! Prometheus counters for queue traffic.

use metrics::counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Installs the global Prometheus recorder. Later calls are no-ops.
pub fn init_metrics() -> Result<(), BuildError> {
    PROMETHEUS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus metrics recorder installed");
        Ok::<_, BuildError>(handle)
    })?;
    Ok(())
}

/// Text exposition of every registered metric; empty before [`init_metrics`].
pub fn render_metrics() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}

/// Counters labelled with the queue name.
#[derive(Debug, Clone)]
pub struct QueueMetrics {
    queue: String,
}

impl QueueMetrics {
    pub fn new(queue: impl Into<String>) -> Self {
        Self {
            queue: queue.into(),
        }
    }

    pub fn published(&self) {
        counter!("queue_messages_published_total", "queue" => self.queue.clone()).increment(1);
    }

    pub fn skipped(&self, count: u64) {
        counter!("queue_messages_skipped_total", "queue" => self.queue.clone()).increment(count);
    }

    pub fn acked(&self) {
        counter!("queue_messages_acked_total", "queue" => self.queue.clone()).increment(1);
    }

    pub fn rejected(&self) {
        counter!("queue_messages_rejected_total", "queue" => self.queue.clone()).increment(1);
    }

    pub fn requeued(&self) {
        counter!("queue_messages_requeued_total", "queue" => self.queue.clone()).increment(1);
    }

    pub fn reconnect(&self) {
        counter!("queue_reconnects_total", "queue" => self.queue.clone()).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_without_recorder_are_noops() {
        let metrics = QueueMetrics::new("users-created");
        metrics.published();
        metrics.skipped(3);
        metrics.reconnect();
    }

    #[test]
    fn test_render_after_init() {
        init_metrics().unwrap();
        init_metrics().unwrap();

        QueueMetrics::new("render-test").acked();
        assert!(render_metrics().contains("queue_messages_acked_total"));
    }
}
