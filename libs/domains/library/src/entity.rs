use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::UserGame;

/// Sea-ORM Entity for the user_games table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_games")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for UserGame {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            game_id: model.game_id,
            created_at: model.created_at.into(),
        }
    }
}

impl From<UserGame> for ActiveModel {
    fn from(link: UserGame) -> Self {
        ActiveModel {
            id: Set(link.id),
            user_id: Set(link.user_id),
            game_id: Set(link.game_id),
            created_at: Set(link.created_at.into()),
        }
    }
}
