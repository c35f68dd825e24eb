use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr,
};
use uuid::Uuid;

use crate::entity;
use crate::error::{LibraryError, LibraryResult};
use crate::models::{UserGame, UserGameFilter};
use crate::repository::UserGameRepository;

/// PostgreSQL implementation of UserGameRepository using SeaORM.
///
/// The (user_id, game_id) pair is unique in the schema.
#[derive(Clone)]
pub struct PgUserGameRepository {
    db: DatabaseConnection,
}

impl PgUserGameRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_error(e: DbErr) -> LibraryError {
    LibraryError::Internal(format!("Database error: {}", e))
}

fn write_error(e: DbErr, link: &UserGame) -> LibraryError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => LibraryError::DuplicateLink {
            user_id: link.user_id,
            game_id: link.game_id,
        },
        _ => db_error(e),
    }
}

#[async_trait]
impl UserGameRepository for PgUserGameRepository {
    async fn create(&self, link: UserGame) -> LibraryResult<UserGame> {
        let active_model: entity::ActiveModel = link.clone().into();
        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, &link))?;

        tracing::info!(link_id = %model.id, "Linked game to user");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> LibraryResult<Option<UserGame>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(Into::into))
    }

    async fn find_pair(&self, user_id: Uuid, game_id: Uuid) -> LibraryResult<Option<UserGame>> {
        let model = entity::Entity::find()
            .filter(entity::Column::UserId.eq(user_id))
            .filter(entity::Column::GameId.eq(game_id))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(Into::into))
    }

    async fn list(&self, filter: UserGameFilter) -> LibraryResult<Vec<UserGame>> {
        let mut query = entity::Entity::find();

        if let Some(user_id) = filter.user_id {
            query = query.filter(entity::Column::UserId.eq(user_id));
        }
        if let Some(game_id) = filter.game_id {
            query = query.filter(entity::Column::GameId.eq(game_id));
        }

        let models = query
            .order_by_asc(entity::Column::CreatedAt)
            .order_by_asc(entity::Column::Id)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn game_ids_for_user(&self, user_id: Uuid) -> LibraryResult<Vec<Uuid>> {
        let models = entity::Entity::find()
            .filter(entity::Column::UserId.eq(user_id))
            .order_by_asc(entity::Column::CreatedAt)
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(|m| m.game_id).collect())
    }

    async fn update(&self, link: UserGame) -> LibraryResult<UserGame> {
        let id = link.id;
        let active_model: entity::ActiveModel = link.clone().into();

        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => LibraryError::NotFound(id),
            e => write_error(e, &link),
        })?;

        tracing::info!(link_id = %id, "Updated user game link");
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> LibraryResult<bool> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        if result.rows_affected > 0 {
            tracing::info!(link_id = %id, "Deleted user game link");
        }
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn model(user_id: Uuid, game_id: Uuid) -> entity::Model {
        entity::Model {
            id: Uuid::now_v7(),
            user_id,
            game_id,
            created_at: Utc::now().fixed_offset(),
        }
    }

    #[tokio::test]
    async fn test_game_ids_for_user() {
        let user = Uuid::now_v7();
        let (g1, g2) = (Uuid::now_v7(), Uuid::now_v7());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(user, g1), model(user, g2)]])
            .into_connection();
        let repo = PgUserGameRepository::new(db);

        assert_eq!(repo.game_ids_for_user(user).await.unwrap(), vec![g1, g2]);
    }

    #[tokio::test]
    async fn test_find_pair_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgUserGameRepository::new(db);

        let found = repo.find_pair(Uuid::now_v7(), Uuid::now_v7()).await.unwrap();
        assert!(found.is_none());
    }
}
