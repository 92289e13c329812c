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
                    .table(Releases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Releases::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Releases::ArtistId).uuid().not_null())
                    .col(ColumnDef::new(Releases::LabelAdminId).uuid())
                    .col(ColumnDef::new(Releases::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Releases::Status)
                            .string_len(32)
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Releases::ReleaseDate).date())
                    .col(
                        ColumnDef::new(Releases::PendingChangeRequests)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(timestamp_now(Releases::CreatedAt))
                    .col(timestamp_now(Releases::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_releases_artist_id")
                    .table(Releases::Table)
                    .col(Releases::ArtistId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_releases_label_admin_id")
                    .table(Releases::Table)
                    .col(Releases::LabelAdminId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReleaseStatusHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReleaseStatusHistory::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReleaseStatusHistory::ReleaseId).uuid().not_null())
                    .col(
                        ColumnDef::new(ReleaseStatusHistory::FromStatus)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReleaseStatusHistory::ToStatus)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReleaseStatusHistory::ChangedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(ReleaseStatusHistory::Notes)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(timestamp_now(ReleaseStatusHistory::ChangedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_status_history_release")
                            .from(ReleaseStatusHistory::Table, ReleaseStatusHistory::ReleaseId)
                            .to(Releases::Table, Releases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChangeRequests::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ChangeRequests::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ChangeRequests::ReleaseId).uuid().not_null())
                    .col(ColumnDef::new(ChangeRequests::RequestedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(ChangeRequests::RequestType)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChangeRequests::FieldName).string().not_null())
                    .col(ColumnDef::new(ChangeRequests::CurrentValue).text())
                    .col(ColumnDef::new(ChangeRequests::RequestedValue).text())
                    .col(ColumnDef::new(ChangeRequests::Reason).text().not_null())
                    .col(
                        ColumnDef::new(ChangeRequests::UrgencyLevel)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(ChangeRequests::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(ChangeRequests::ReviewedBy).uuid())
                    .col(ColumnDef::new(ChangeRequests::ReviewedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(ChangeRequests::ReviewNotes).text())
                    .col(timestamp_now(ChangeRequests::CreatedAt))
                    .col(timestamp_now(ChangeRequests::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_change_requests_release")
                            .from(ChangeRequests::Table, ChangeRequests::ReleaseId)
                            .to(Releases::Table, Releases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_change_requests_release_status")
                    .table(ChangeRequests::Table)
                    .col(ChangeRequests::ReleaseId)
                    .col(ChangeRequests::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChangeRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ReleaseStatusHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Releases::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Releases {
    Table,
    Id,
    ArtistId,
    LabelAdminId,
    Title,
    Status,
    ReleaseDate,
    PendingChangeRequests,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ReleaseStatusHistory {
    Table,
    Id,
    ReleaseId,
    FromStatus,
    ToStatus,
    ChangedBy,
    Notes,
    ChangedAt,
}

#[derive(DeriveIden)]
enum ChangeRequests {
    Table,
    Id,
    ReleaseId,
    RequestedBy,
    RequestType,
    FieldName,
    CurrentValue,
    RequestedValue,
    Reason,
    UrgencyLevel,
    Status,
    ReviewedBy,
    ReviewedAt,
    ReviewNotes,
    CreatedAt,
    UpdatedAt,
}
