//! Application state management.
//!
//! Services are built over trait objects so the same router works with the
//! PostgreSQL and the in-memory repositories.

use axum_helpers::JwtAuth;
use database::postgres::DatabaseConnection;
use domain_games::{GameRepository, GameService, InMemoryGameRepository, PgGameRepository};
use domain_library::{
    InMemoryUserGameRepository, LibraryService, PgUserGameRepository, UserGameRepository,
};
use domain_users::{
    BulkRegistrationProducer, InMemoryUserRepository, PgUserRepository, UserRepository,
    UserService,
};
use message_queue::QueueClient;
use std::sync::Arc;

/// Shared application state, cloned into each router (Arc clones only).
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL pool, absent when running on in-memory repositories
    pub db: Option<DatabaseConnection>,
    /// Used by the readiness check
    pub redis: redis::Client,
    pub queue: Arc<dyn QueueClient>,
    pub jwt_auth: JwtAuth,
    pub users: UserService<dyn UserRepository>,
    pub games: GameService<dyn GameRepository>,
    pub library: LibraryService<dyn UserGameRepository>,
}

impl AppState {
    pub fn new(
        config: crate::config::Config,
        db: Option<DatabaseConnection>,
        redis: redis::Client,
        queue: Arc<dyn QueueClient>,
    ) -> Self {
        let (user_repo, game_repo, link_repo): (
            Arc<dyn UserRepository>,
            Arc<dyn GameRepository>,
            Arc<dyn UserGameRepository>,
        ) = match &db {
            Some(db) => (
                Arc::new(PgUserRepository::new(db.clone())),
                Arc::new(PgGameRepository::new(db.clone())),
                Arc::new(PgUserGameRepository::new(db.clone())),
            ),
            None => (
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryGameRepository::new()),
                Arc::new(InMemoryUserGameRepository::new()),
            ),
        };

        let jwt_auth = JwtAuth::new(&config.jwt);

        Self {
            users: UserService::new(user_repo.clone()),
            games: GameService::new(game_repo.clone()),
            library: LibraryService::new(link_repo, user_repo, game_repo),
            config,
            db,
            redis,
            queue,
            jwt_auth,
        }
    }

    pub fn producer(&self) -> BulkRegistrationProducer {
        BulkRegistrationProducer::new(self.queue.clone(), &self.config.queue.queue_name)
    }
}
