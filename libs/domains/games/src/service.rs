use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{GameError, GameResult};
use crate::models::{CreateGame, Game, GameFilter, UpdateGame};
use crate::repository::GameRepository;

/// Service layer for the game catalog
pub struct GameService<R: GameRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: GameRepository + ?Sized> Clone for GameService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: GameRepository + ?Sized> GameService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create_game(&self, input: CreateGame) -> GameResult<Game> {
        input
            .validate()
            .map_err(|e| GameError::Validation(e.to_string()))?;

        self.repository.create(Game::new(input)).await
    }

    pub async fn get_game(&self, id: Uuid) -> GameResult<Game> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(GameError::NotFound(id))
    }

    pub async fn list_games(&self, filter: GameFilter) -> GameResult<Vec<Game>> {
        self.repository.list(filter).await
    }

    pub async fn update_game(&self, id: Uuid, input: UpdateGame) -> GameResult<Game> {
        input
            .validate()
            .map_err(|e| GameError::Validation(e.to_string()))?;

        let mut game = self.get_game(id).await?;
        game.apply_update(input);
        self.repository.update(game).await
    }

    pub async fn delete_game(&self, id: Uuid) -> GameResult<()> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(GameError::NotFound(id))
        }
    }
}
