use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Memes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Memes::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Memes::Url).string().not_null())
                    .col(ColumnDef::new(Memes::Caption).string().not_null())
                    .col(ColumnDef::new(Memes::Query).string())
                    .col(ColumnDef::new(Memes::Latitude).double())
                    .col(ColumnDef::new(Memes::Longitude).double())
                    .col(
                        ColumnDef::new(Memes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_memes_query")
                    .table(Memes::Table)
                    .col(Memes::Query)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Memes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Memes {
    Table,
    Id,
    Url,
    Caption,
    Query,
    Latitude,
    Longitude,
    CreatedAt,
}
