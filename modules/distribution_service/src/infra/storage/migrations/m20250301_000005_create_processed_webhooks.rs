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
                    .table(ProcessedWebhooks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProcessedWebhooks::Provider).string_len(32).not_null())
                    .col(ColumnDef::new(ProcessedWebhooks::OrderId).string().not_null())
                    .col(ColumnDef::new(ProcessedWebhooks::EventType).string().not_null())
                    .col(timestamp_now(ProcessedWebhooks::ProcessedAt))
                    .primary_key(
                        Index::create()
                            .col(ProcessedWebhooks::Provider)
                            .col(ProcessedWebhooks::OrderId)
                            .col(ProcessedWebhooks::EventType),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProcessedWebhooks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProcessedWebhooks {
    Table,
    Provider,
    OrderId,
    EventType,
    ProcessedAt,
}
