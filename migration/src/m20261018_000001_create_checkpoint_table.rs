use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager.has_table("checkpoint").await? {
            manager
                .create_table(
                    Table::create()
                        .table(Checkpoint::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Checkpoint::StreamName)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Checkpoint::Height).big_integer().not_null())
                        .col(
                            ColumnDef::new(Checkpoint::LastUpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Checkpoint::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
enum Checkpoint {
    Table,
    StreamName,
    Height,
    LastUpdatedAt,
}
