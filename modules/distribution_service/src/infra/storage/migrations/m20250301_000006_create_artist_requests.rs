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
                    .table(ArtistRequests::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ArtistRequests::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ArtistRequests::LabelAdminId).uuid().not_null())
                    .col(ColumnDef::new(ArtistRequests::ArtistId).uuid().not_null())
                    .col(ColumnDef::new(ArtistRequests::Message).text())
                    .col(
                        ColumnDef::new(ArtistRequests::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(ArtistRequests::ReviewedBy).uuid())
                    .col(ColumnDef::new(ArtistRequests::ReviewedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(ArtistRequests::ReviewNotes).text())
                    .col(timestamp_now(ArtistRequests::CreatedAt))
                    .col(timestamp_now(ArtistRequests::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artist_requests_label_admin")
                            .from(ArtistRequests::Table, ArtistRequests::LabelAdminId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artist_requests_artist")
                            .from(ArtistRequests::Table, ArtistRequests::ArtistId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_artist_requests_label_status")
                    .table(ArtistRequests::Table)
                    .col(ArtistRequests::LabelAdminId)
                    .col(ArtistRequests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_profiles_label_admin")
                    .table(UserProfiles::Table)
                    .col(UserProfiles::LabelAdminId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_user_profiles_label_admin")
                    .table(UserProfiles::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(ArtistRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ArtistRequests {
    Table,
    Id,
    LabelAdminId,
    ArtistId,
    Message,
    Status,
    ReviewedBy,
    ReviewedAt,
    ReviewNotes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    Id,
    LabelAdminId,
}
