use domain_games::{Game, GameRepository};
use domain_users::UserRepository;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{LibraryError, LibraryResult};
use crate::models::{CreateUserGame, UpdateUserGame, UserGame, UserGameDetail, UserGameFilter};
use crate::repository::UserGameRepository;

/// Service layer for game ownership.
///
/// Both ends of a link must exist when it is created or re-pointed.
pub struct LibraryService<R: UserGameRepository + ?Sized> {
    links: Arc<R>,
    users: Arc<dyn UserRepository>,
    games: Arc<dyn GameRepository>,
}

impl<R: UserGameRepository + ?Sized> Clone for LibraryService<R> {
    fn clone(&self) -> Self {
        Self {
            links: Arc::clone(&self.links),
            users: Arc::clone(&self.users),
            games: Arc::clone(&self.games),
        }
    }
}

impl<R: UserGameRepository + ?Sized> LibraryService<R> {
    pub fn new(
        links: Arc<R>,
        users: Arc<dyn UserRepository>,
        games: Arc<dyn GameRepository>,
    ) -> Self {
        Self {
            links,
            users,
            games,
        }
    }

    async fn ensure_user(&self, user_id: Uuid) -> LibraryResult<()> {
        match self.users.get_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(LibraryError::UserNotFound(user_id)),
        }
    }

    async fn ensure_game(&self, game_id: Uuid) -> LibraryResult<()> {
        match self.games.get_by_id(game_id).await? {
            Some(_) => Ok(()),
            None => Err(LibraryError::GameNotFound(game_id)),
        }
    }

    async fn ensure_unlinked(
        &self,
        user_id: Uuid,
        game_id: Uuid,
        except: Option<Uuid>,
    ) -> LibraryResult<()> {
        match self.links.find_pair(user_id, game_id).await? {
            Some(existing) if Some(existing.id) != except => {
                Err(LibraryError::DuplicateLink { user_id, game_id })
            }
            _ => Ok(()),
        }
    }

    pub async fn add_link(&self, input: CreateUserGame) -> LibraryResult<UserGame> {
        self.ensure_user(input.user_id).await?;
        self.ensure_game(input.game_id).await?;
        self.ensure_unlinked(input.user_id, input.game_id, None).await?;

        self.links
            .create(UserGame::new(input.user_id, input.game_id))
            .await
    }

    pub async fn get_link(&self, id: Uuid) -> LibraryResult<UserGameDetail> {
        let link = self
            .links
            .get_by_id(id)
            .await?
            .ok_or(LibraryError::NotFound(id))?;

        let user = self
            .users
            .get_by_id(link.user_id)
            .await?
            .ok_or(LibraryError::UserNotFound(link.user_id))?;
        let game = self
            .games
            .get_by_id(link.game_id)
            .await?
            .ok_or(LibraryError::GameNotFound(link.game_id))?;

        Ok(UserGameDetail {
            id: link.id,
            user: user.into(),
            game,
            created_at: link.created_at,
        })
    }

    pub async fn list_links(&self, filter: UserGameFilter) -> LibraryResult<Vec<UserGame>> {
        self.links.list(filter).await
    }

    pub async fn update_link(&self, id: Uuid, input: UpdateUserGame) -> LibraryResult<UserGame> {
        let mut link = self
            .links
            .get_by_id(id)
            .await?
            .ok_or(LibraryError::NotFound(id))?;

        if let Some(user_id) = input.user_id {
            self.ensure_user(user_id).await?;
            link.user_id = user_id;
        }
        if let Some(game_id) = input.game_id {
            self.ensure_game(game_id).await?;
            link.game_id = game_id;
        }
        self.ensure_unlinked(link.user_id, link.game_id, Some(id)).await?;

        self.links.update(link).await
    }

    pub async fn delete_link(&self, id: Uuid) -> LibraryResult<()> {
        if self.links.delete(id).await? {
            Ok(())
        } else {
            Err(LibraryError::NotFound(id))
        }
    }

    /// Games owned by `user_id`, oldest purchase first.
    pub async fn games_for_user(&self, user_id: Uuid) -> LibraryResult<Vec<Game>> {
        self.ensure_user(user_id).await?;

        let mut games = Vec::new();
        for game_id in self.links.game_ids_for_user(user_id).await? {
            match self.games.get_by_id(game_id).await? {
                Some(game) => games.push(game),
                None => tracing::warn!(%user_id, %game_id, "Link points at a missing game"),
            }
        }
        Ok(games)
    }
}
