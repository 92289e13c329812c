use sea_orm_migration::prelude::*;

use super::timestamp_now;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WebhookLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WebhookLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(WebhookLogs::Provider).string_len(32).not_null())
                    .col(ColumnDef::new(WebhookLogs::EventType).string().not_null())
                    .col(ColumnDef::new(WebhookLogs::OrderId).string())
                    .col(ColumnDef::new(WebhookLogs::Status).string_len(16).not_null())
                    .col(ColumnDef::new(WebhookLogs::Data).json().not_null())
                    .col(timestamp_now(WebhookLogs::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_webhook_logs_order")
                    .table(WebhookLogs::Table)
                    .col(WebhookLogs::Provider)
                    .col(WebhookLogs::OrderId)
                    .col(WebhookLogs::EventType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WebhookLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WebhookLogs {
    Table,
    Id,
    Provider,
    EventType,
    OrderId,
    Status,
    Data,
    CreatedAt,
}
