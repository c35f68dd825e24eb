use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{GameError, GameResult};
use crate::models::{Game, GameFilter};

/// Repository trait for Game persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameRepository: Send + Sync {
    async fn create(&self, game: Game) -> GameResult<Game>;

    async fn get_by_id(&self, id: Uuid) -> GameResult<Option<Game>>;

    /// Ordered by name, filtered and paginated
    async fn list(&self, filter: GameFilter) -> GameResult<Vec<Game>>;

    async fn update(&self, game: Game) -> GameResult<Game>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, id: Uuid) -> GameResult<bool>;
}

/// In-memory implementation of GameRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryGameRepository {
    games: Arc<RwLock<HashMap<Uuid, Game>>>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn create(&self, game: Game) -> GameResult<Game> {
        let mut games = self.games.write().await;
        games.insert(game.id, game.clone());

        tracing::info!(game_id = %game.id, name = %game.name, "Created game");
        Ok(game)
    }

    async fn get_by_id(&self, id: Uuid) -> GameResult<Option<Game>> {
        let games = self.games.read().await;
        Ok(games.get(&id).cloned())
    }

    async fn list(&self, filter: GameFilter) -> GameResult<Vec<Game>> {
        let games = self.games.read().await;
        let mut result: Vec<Game> = games
            .values()
            .filter(|g| {
                filter
                    .name
                    .as_ref()
                    .is_none_or(|n| g.name.contains(n.as_str()))
            })
            .filter(|g| {
                filter
                    .genre
                    .as_ref()
                    .is_none_or(|genre| &g.genre == genre)
            })
            .cloned()
            .collect();

        result.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(result
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn update(&self, game: Game) -> GameResult<Game> {
        let mut games = self.games.write().await;

        if !games.contains_key(&game.id) {
            return Err(GameError::NotFound(game.id));
        }
        games.insert(game.id, game.clone());

        tracing::info!(game_id = %game.id, "Updated game");
        Ok(game)
    }

    async fn delete(&self, id: Uuid) -> GameResult<bool> {
        let mut games = self.games.write().await;

        if games.remove(&id).is_some() {
            tracing::info!(game_id = %id, "Deleted game");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
