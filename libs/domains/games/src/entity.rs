use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::Game;

/// Sea-ORM Entity for the games table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub genre: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price: f64,
    pub developer: String,
    pub release_date: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Game {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            genre: model.genre,
            description: model.description,
            price: model.price,
            developer: model.developer,
            release_date: model.release_date,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<Game> for ActiveModel {
    fn from(game: Game) -> Self {
        ActiveModel {
            id: Set(game.id),
            name: Set(game.name),
            genre: Set(game.genre),
            description: Set(game.description),
            price: Set(game.price),
            developer: Set(game.developer),
            release_date: Set(game.release_date),
            created_at: Set(game.created_at.into()),
            updated_at: Set(game.updated_at.into()),
        }
    }
}
