use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserFilter};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; a taken email is [`UserError::DuplicateEmail`]
    async fn create(&self, user: User) -> UserResult<User>;

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Case-insensitive lookup
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Newest first, filtered and paginated
    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>>;

    async fn update(&self, user: User) -> UserResult<User>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, id: Uuid) -> UserResult<bool>;

    /// Cheap round trip to the store, used by readiness checks
    async fn ping(&self) -> UserResult<()>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn same_email(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| same_email(&u.email, &user.email)) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| same_email(&u.email, email)).cloned())
    }

    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        let email = filter.email.as_ref().map(|e| e.to_lowercase());

        let mut result: Vec<User> = users
            .values()
            .filter(|u| {
                email
                    .as_ref()
                    .is_none_or(|e| u.email.to_lowercase().contains(e))
            })
            .filter(|u| filter.role.is_none_or(|r| u.role == r))
            .cloned()
            .collect();

        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(result
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id));
        }

        if users
            .values()
            .any(|u| u.id != user.id && same_email(&u.email, &user.email))
        {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Updated user");
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;

        if users.remove(&id).is_some() {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn ping(&self) -> UserResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn user(email: &str, role: Role) -> User {
        User::new(
            "Test".to_string(),
            email.to_string(),
            "hash".to_string(),
            None,
            None,
            role,
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("a@example.com", Role::User)).await.unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "a@example.com");

        let by_email = repo.get_by_email("A@EXAMPLE.COM").await.unwrap();
        assert!(by_email.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_case_insensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("dup@example.com", Role::User)).await.unwrap();

        let result = repo.create(user("DUP@example.com", Role::User)).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let repo = InMemoryUserRepository::new();
        for i in 0..5 {
            repo.create(user(&format!("user{i}@example.com"), Role::User))
                .await
                .unwrap();
        }
        repo.create(user("boss@corp.com", Role::Admin)).await.unwrap();

        let admins = repo
            .list(UserFilter {
                role: Some(Role::Admin),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(admins.len(), 1);

        let by_email = repo
            .list(UserFilter {
                email: Some("EXAMPLE".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_email.len(), 5);

        let page = repo
            .list(UserFilter {
                limit: 2,
                offset: 1,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn test_update_rejects_taken_email() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("one@example.com", Role::User)).await.unwrap();
        let mut two = repo.create(user("two@example.com", Role::User)).await.unwrap();

        two.email = "one@example.com".to_string();
        assert!(matches!(
            repo.update(two).await,
            Err(UserError::DuplicateEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("del@example.com", Role::User)).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
    }
}
