use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(pk_uuid(Games::Id))
                    .col(string(Games::Name))
                    .col(string(Games::Genre))
                    .col(text(Games::Description).default(""))
                    .col(double(Games::Price).default(0.0))
                    .col(string(Games::Developer))
                    .col(date_null(Games::ReleaseDate))
                    .col(timestamp_with_time_zone(Games::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Games::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_games_name")
                    .table(Games::Table)
                    .col(Games::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Games {
    Table,
    Id,
    Name,
    Genre,
    Description,
    Price,
    Developer,
    ReleaseDate,
    CreatedAt,
    UpdatedAt,
}
