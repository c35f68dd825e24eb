use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::entity;
use crate::error::{GameError, GameResult};
use crate::models::{Game, GameFilter};
use crate::repository::GameRepository;

/// PostgreSQL implementation of GameRepository using SeaORM
#[derive(Clone)]
pub struct PgGameRepository {
    db: DatabaseConnection,
}

impl PgGameRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_error(e: DbErr) -> GameError {
    GameError::Internal(format!("Database error: {}", e))
}

#[async_trait]
impl GameRepository for PgGameRepository {
    async fn create(&self, game: Game) -> GameResult<Game> {
        let active_model: entity::ActiveModel = game.into();
        let model = active_model.insert(&self.db).await.map_err(db_error)?;

        tracing::info!(game_id = %model.id, "Created game");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> GameResult<Option<Game>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(Into::into))
    }

    async fn list(&self, filter: GameFilter) -> GameResult<Vec<Game>> {
        let mut query = entity::Entity::find();

        if let Some(name) = filter.name {
            query = query.filter(entity::Column::Name.contains(name));
        }

        if let Some(genre) = filter.genre {
            query = query.filter(entity::Column::Genre.eq(genre));
        }

        let models = query
            .order_by_asc(entity::Column::Name)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, game: Game) -> GameResult<Game> {
        let id = game.id;
        let active_model: entity::ActiveModel = game.into();

        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => GameError::NotFound(id),
            e => db_error(e),
        })?;

        tracing::info!(game_id = %id, "Updated game");
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> GameResult<bool> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        if result.rows_affected > 0 {
            tracing::info!(game_id = %id, "Deleted game");
        }
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn model(name: &str) -> entity::Model {
        let now = Utc::now().fixed_offset();
        entity::Model {
            id: Uuid::now_v7(),
            name: name.to_string(),
            genre: "Platformer".to_string(),
            description: String::new(),
            price: 19.99,
            developer: "Maddy Makes Games".to_string(),
            release_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_list_maps_models() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model("Celeste"), model("Towerfall")]])
            .into_connection();
        let repo = PgGameRepository::new(db);

        let games = repo
            .list(GameFilter {
                name: Some("e".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].price, 19.99);
    }

    #[tokio::test]
    async fn test_get_missing_game() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgGameRepository::new(db);

        assert!(repo.get_by_id(Uuid::now_v7()).await.unwrap().is_none());
    }
}
