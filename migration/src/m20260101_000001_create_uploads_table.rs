use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Uploads::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Uploads::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Uploads::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                    .col(ColumnDef::new(Uploads::GuestName).string().null())
                    .col(ColumnDef::new(Uploads::Message).text().null())
                    .col(ColumnDef::new(Uploads::FileUrl).text().not_null())
                    .to_owned(),
            )
            .await?;

        // Gallery always reads newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_uploads_created_at")
                    .table(Uploads::Table)
                    .col(Uploads::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Uploads::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Uploads {
    Table,
    Id,
    CreatedAt,
    GuestName,
    Message,
    FileUrl,
}
