use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260105_000000_create_users::Users;
use crate::m20260105_000001_create_games::Games;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserGames::Table)
                    .if_not_exists()
                    .col(pk_uuid(UserGames::Id))
                    .col(uuid(UserGames::UserId))
                    .col(uuid(UserGames::GameId))
                    .col(timestamp_with_time_zone(UserGames::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_games_user")
                            .from(UserGames::Table, UserGames::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_games_game")
                            .from(UserGames::Table, UserGames::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_games_user_game_unique")
                    .table(UserGames::Table)
                    .col(UserGames::UserId)
                    .col(UserGames::GameId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserGames::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserGames {
    Table,
    Id,
    UserId,
    GameId,
    CreatedAt,
}
