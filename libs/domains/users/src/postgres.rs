use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr,
};
use uuid::Uuid;

use crate::entity;
use crate::error::{UserError, UserResult};
use crate::models::{User, UserFilter};
use crate::repository::UserRepository;

/// PostgreSQL implementation of UserRepository using SeaORM.
///
/// Emails are stored lowercased, so equality lookups are case-insensitive.
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_error(e: DbErr) -> UserError {
    UserError::Internal(format!("Database error: {}", e))
}

fn write_error(e: DbErr, email: &str) -> UserError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::DuplicateEmail(email.to_string()),
        _ => db_error(e),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let email = user.email.clone();
        let active_model: entity::ActiveModel = user.into();

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, &email))?;

        tracing::info!(user_id = %model.id, "Created user");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(Into::into))
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(Into::into))
    }

    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        let mut query = entity::Entity::find();

        if let Some(email) = filter.email {
            query = query.filter(entity::Column::Email.contains(email.to_lowercase()));
        }

        if let Some(role) = filter.role {
            query = query.filter(entity::Column::Role.eq(role.to_string()));
        }

        let models = query
            .order_by_desc(entity::Column::CreatedAt)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let id = user.id;
        let email = user.email.clone();
        let active_model: entity::ActiveModel = user.into();

        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => UserError::NotFound(id),
            e => write_error(e, &email),
        })?;

        tracing::info!(user_id = %id, "Updated user");
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(result.rows_affected > 0)
    }

    async fn ping(&self) -> UserResult<()> {
        self.db.ping().await.map_err(db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn model(email: &str) -> entity::Model {
        let now = Utc::now().fixed_offset();
        entity::Model {
            id: Uuid::now_v7(),
            name: "Ana".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            tax_id: None,
            birth_date: None,
            role: "Admin".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_get_by_email_maps_model() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model("ana@example.com")]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let user = repo.get_by_email("ANA@example.com").await.unwrap().unwrap();
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_delete_reports_missing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let repo = PgUserRepository::new(db);

        assert!(!repo.delete(Uuid::now_v7()).await.unwrap());
    }

    #[tokio::test]
    async fn test_query_errors_become_internal() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let repo = PgUserRepository::new(db);

        assert!(matches!(
            repo.get_by_id(Uuid::now_v7()).await,
            Err(UserError::Internal(_))
        ));
    }
}
