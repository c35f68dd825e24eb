//! Consumer side of bulk registration.
//!
//! [`RegistrationHandler`] turns one queued candidate into exactly one
//! [`Disposition`]:
//!
//! | Outcome | Disposition |
//! |---------|-------------|
//! | body does not decode | `Reject` |
//! | candidate fails the rules | `Reject` |
//! | persisted | `Ack` |
//! | store rejected it (e.g. duplicate email) | `Reject` |
//! | store unavailable | `Requeue` |

use async_trait::async_trait;
use message_queue::{Delivery, Disposition, MessageHandler};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::candidate::{CandidateUser, validate_candidate};
use crate::codec;

#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The record can never be stored as-is.
    #[error("rejected by store: {0}")]
    Rejected(String),

    /// Transient; a later attempt may succeed.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Capability to store a validated candidate as a user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserPersister: Send + Sync {
    async fn persist(&self, candidate: &CandidateUser) -> Result<(), PersistenceError>;
}

pub struct RegistrationHandler<P: ?Sized> {
    persister: Arc<P>,
}

impl<P: UserPersister + ?Sized> RegistrationHandler<P> {
    pub fn new(persister: Arc<P>) -> Self {
        Self { persister }
    }
}

#[async_trait]
impl<P: UserPersister + ?Sized> MessageHandler for RegistrationHandler<P> {
    fn name(&self) -> &str {
        "user-registration"
    }

    async fn handle(&self, delivery: &Delivery) -> Disposition {
        let candidate = match codec::decode(&delivery.body) {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!(tag = %delivery.tag, error = %e, "Rejecting undecodable registration message");
                return Disposition::Reject;
            }
        };

        let validation = validate_candidate(&candidate);
        if !validation.is_valid() {
            warn!(
                tag = %delivery.tag,
                email = %candidate.email,
                errors = ?validation.messages(),
                "Rejecting invalid registration candidate"
            );
            return Disposition::Reject;
        }

        match self.persister.persist(&candidate).await {
            Ok(()) => {
                info!(tag = %delivery.tag, email = %candidate.email, "Registered user from queue");
                Disposition::Ack
            }
            Err(PersistenceError::Rejected(reason)) => {
                warn!(tag = %delivery.tag, email = %candidate.email, %reason, "Store rejected registration");
                Disposition::Reject
            }
            Err(PersistenceError::Unavailable(reason)) => {
                warn!(
                    tag = %delivery.tag,
                    delivery_count = delivery.delivery_count,
                    %reason,
                    "Store unavailable, requeueing registration"
                );
                Disposition::Requeue
            }
        }
    }
}
