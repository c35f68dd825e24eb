use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{LibraryError, LibraryResult};
use crate::models::{UserGame, UserGameFilter};

/// Repository trait for user-game links
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserGameRepository: Send + Sync {
    /// A pair that is already linked is [`LibraryError::DuplicateLink`]
    async fn create(&self, link: UserGame) -> LibraryResult<UserGame>;

    async fn get_by_id(&self, id: Uuid) -> LibraryResult<Option<UserGame>>;

    async fn find_pair(&self, user_id: Uuid, game_id: Uuid) -> LibraryResult<Option<UserGame>>;

    /// Oldest first, filtered and paginated
    async fn list(&self, filter: UserGameFilter) -> LibraryResult<Vec<UserGame>>;

    /// Every game the user owns, oldest link first
    async fn game_ids_for_user(&self, user_id: Uuid) -> LibraryResult<Vec<Uuid>>;

    async fn update(&self, link: UserGame) -> LibraryResult<UserGame>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, id: Uuid) -> LibraryResult<bool>;
}

/// In-memory implementation of UserGameRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserGameRepository {
    links: Arc<RwLock<HashMap<Uuid, UserGame>>>,
}

impl InMemoryUserGameRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted(mut links: Vec<UserGame>) -> Vec<UserGame> {
    links.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    links
}

#[async_trait]
impl UserGameRepository for InMemoryUserGameRepository {
    async fn create(&self, link: UserGame) -> LibraryResult<UserGame> {
        let mut links = self.links.write().await;

        if links
            .values()
            .any(|l| l.user_id == link.user_id && l.game_id == link.game_id)
        {
            return Err(LibraryError::DuplicateLink {
                user_id: link.user_id,
                game_id: link.game_id,
            });
        }
        links.insert(link.id, link.clone());

        tracing::info!(link_id = %link.id, user_id = %link.user_id, game_id = %link.game_id, "Linked game to user");
        Ok(link)
    }

    async fn get_by_id(&self, id: Uuid) -> LibraryResult<Option<UserGame>> {
        let links = self.links.read().await;
        Ok(links.get(&id).cloned())
    }

    async fn find_pair(&self, user_id: Uuid, game_id: Uuid) -> LibraryResult<Option<UserGame>> {
        let links = self.links.read().await;
        Ok(links
            .values()
            .find(|l| l.user_id == user_id && l.game_id == game_id)
            .cloned())
    }

    async fn list(&self, filter: UserGameFilter) -> LibraryResult<Vec<UserGame>> {
        let links = self.links.read().await;

        let matching = links
            .values()
            .filter(|l| filter.user_id.is_none_or(|u| l.user_id == u))
            .filter(|l| filter.game_id.is_none_or(|g| l.game_id == g))
            .cloned()
            .collect();

        Ok(sorted(matching)
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn game_ids_for_user(&self, user_id: Uuid) -> LibraryResult<Vec<Uuid>> {
        let links = self.links.read().await;
        let owned = links
            .values()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();

        Ok(sorted(owned).into_iter().map(|l| l.game_id).collect())
    }

    async fn update(&self, link: UserGame) -> LibraryResult<UserGame> {
        let mut links = self.links.write().await;

        if !links.contains_key(&link.id) {
            return Err(LibraryError::NotFound(link.id));
        }
        if links
            .values()
            .any(|l| l.id != link.id && l.user_id == link.user_id && l.game_id == link.game_id)
        {
            return Err(LibraryError::DuplicateLink {
                user_id: link.user_id,
                game_id: link.game_id,
            });
        }
        links.insert(link.id, link.clone());

        tracing::info!(link_id = %link.id, "Updated user game link");
        Ok(link)
    }

    async fn delete(&self, id: Uuid) -> LibraryResult<bool> {
        let mut links = self.links.write().await;

        if links.remove(&id).is_some() {
            tracing::info!(link_id = %id, "Deleted user game link");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
