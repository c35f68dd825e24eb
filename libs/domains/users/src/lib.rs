//! Users Domain
//!
//! User accounts, login, and the asynchronous bulk registration pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   POST /bulk   ┌──────────────────────────┐
//! │  Handlers   │ ─────────────► │ BulkRegistrationProducer │ ──► queue
//! └──────┬──────┘                └──────────────────────────┘      │
//!        │                                                         ▼
//! ┌──────▼──────┐   UserPersister   ┌─────────────────────┐  QueueConsumer
//! │   Service   │ ◄──────────────── │ RegistrationHandler │ ◄────┘
//! └──────┬──────┘                   └─────────────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← in-memory or PostgreSQL (SeaORM)
//! └─────────────┘
//! ```
//!
//! Candidates are validated twice: before publishing and again after
//! delivery. Messages are not trusted once in transit.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_users::{handlers, BulkRegistrationProducer, InMemoryUserRepository, UserService};
//!
//! let service = UserService::new(Arc::new(InMemoryUserRepository::new()));
//! let producer = BulkRegistrationProducer::new(queue_client, "users-created");
//! let router = handlers::router(service, producer, jwt_auth);
//! ```

pub mod candidate;
pub mod codec;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod models;
pub mod password;
pub mod postgres;
pub mod registration;
pub mod repository;
pub mod service;

pub use candidate::{CandidateIssue, CandidateUser, CandidateValidation, validate_candidate};
pub use codec::{DecodeError, EncodeError};
pub use error::{UserError, UserResult};
pub use ingest::{BatchSummary, BulkRegistrationProducer, IngestError};
pub use models::{
    CreateUser, LoginRequest, LoginResponse, Role, UpdateUser, User, UserFilter, UserResponse,
};
pub use postgres::PgUserRepository;
pub use registration::{PersistenceError, RegistrationHandler, UserPersister};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
