//! Games Domain
//!
//! The game catalog: CRUD over [`Game`] with an in-memory and a
//! PostgreSQL (SeaORM) repository.
//!
//! ```rust,ignore
//! use domain_games::{handlers, GameService, InMemoryGameRepository};
//!
//! let service = GameService::new(Arc::new(InMemoryGameRepository::new()));
//! let router = handlers::router(service, jwt_auth);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{GameError, GameResult};
pub use models::{CreateGame, Game, GameFilter, UpdateGame};
pub use postgres::PgGameRepository;
pub use repository::{GameRepository, InMemoryGameRepository};
pub use service::GameService;
