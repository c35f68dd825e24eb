use chrono::{DateTime, Utc};
use domain_games::Game;
use domain_users::UserResponse;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Ownership link between a user and a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserGame {
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl UserGame {
    pub fn new(user_id: Uuid, game_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            game_id,
            created_at: Utc::now(),
        }
    }
}

/// A link with both sides resolved
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserGameDetail {
    pub id: Uuid,
    pub user: UserResponse,
    pub game: Game,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserGame {
    pub user_id: Uuid,
    pub game_id: Uuid,
}

/// Re-point an existing link; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserGame {
    pub user_id: Option<Uuid>,
    pub game_id: Option<Uuid>,
}

/// Query filters for listing links
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct UserGameFilter {
    pub user_id: Option<Uuid>,
    pub game_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

impl Default for UserGameFilter {
    fn default() -> Self {
        Self {
            user_id: None,
            game_id: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

fn default_limit() -> u64 {
    50
}
