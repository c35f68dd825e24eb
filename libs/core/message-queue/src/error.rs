use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    /// Connection refused, channel error or failed publish. Callers treat
    /// every flavour the same way: back off or fail the operation.
    #[error("Queue unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown delivery tag: {0}")]
    UnknownDelivery(String),

    #[error("Session has no active subscription")]
    NotSubscribed,

    #[error("Unsupported queue option: {0}")]
    Unsupported(String),
}

impl QueueError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, QueueError::Unavailable(_))
    }
}

impl From<::redis::RedisError> for QueueError {
    fn from(err: ::redis::RedisError) -> Self {
        QueueError::Unavailable(err.to_string())
    }
}
