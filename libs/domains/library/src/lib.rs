//! Library Domain
//!
//! Ownership links between users and games. Links are validated against
//! the users and games repositories, so this crate sits on top of
//! `domain_users` and `domain_games`.
//!
//! ```rust,ignore
//! use domain_library::{handlers, InMemoryUserGameRepository, LibraryService};
//!
//! let service = LibraryService::new(Arc::new(InMemoryUserGameRepository::new()), users, games);
//! let user_games = handlers::user_games_router(service.clone(), jwt_auth.clone());
//! let owned = handlers::owned_games_router(service, jwt_auth);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{LibraryError, LibraryResult};
pub use models::{CreateUserGame, UpdateUserGame, UserGame, UserGameDetail, UserGameFilter};
pub use postgres::PgUserGameRepository;
pub use repository::{InMemoryUserGameRepository, UserGameRepository};
pub use service::LibraryService;
