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
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserProfiles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(UserProfiles::Email).string().not_null())
                    .col(ColumnDef::new(UserProfiles::DisplayName).string())
                    .col(
                        ColumnDef::new(UserProfiles::Role)
                            .string_len(32)
                            .not_null()
                            .default("artist"),
                    )
                    .col(ColumnDef::new(UserProfiles::LabelAdminId).uuid())
                    .col(
                        ColumnDef::new(UserProfiles::WalletBalance)
                            .decimal_len(14, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::NegativeBalanceAllowed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::WalletCreditLimit)
                            .decimal_len(14, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(UserProfiles::FirstName).string())
                    .col(ColumnDef::new(UserProfiles::LastName).string())
                    .col(ColumnDef::new(UserProfiles::DateOfBirth).date())
                    .col(ColumnDef::new(UserProfiles::Nationality).string())
                    .col(ColumnDef::new(UserProfiles::Country).string())
                    .col(ColumnDef::new(UserProfiles::City).string())
                    .col(ColumnDef::new(UserProfiles::Phone).string())
                    .col(ColumnDef::new(UserProfiles::Bio).text())
                    .col(ColumnDef::new(UserProfiles::LockedFields).json().not_null())
                    .col(
                        ColumnDef::new(UserProfiles::ProfileLockStatus)
                            .string_len(16)
                            .not_null()
                            .default("unlocked"),
                    )
                    .col(timestamp_now(UserProfiles::CreatedAt))
                    .col(timestamp_now(UserProfiles::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_profiles_role")
                    .table(UserProfiles::Table)
                    .col(UserProfiles::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RolePermissions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RolePermissions::Role).string_len(32).not_null())
                    .col(ColumnDef::new(RolePermissions::Permission).string().not_null())
                    .col(timestamp_now(RolePermissions::CreatedAt))
                    .primary_key(
                        Index::create()
                            .col(RolePermissions::Role)
                            .col(RolePermissions::Permission),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuditLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AuditLogs::EventType).string().not_null())
                    .col(ColumnDef::new(AuditLogs::UserId).uuid())
                    .col(ColumnDef::new(AuditLogs::UserRole).string_len(32))
                    .col(ColumnDef::new(AuditLogs::Details).json().not_null())
                    .col(timestamp_now(AuditLogs::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_logs_event_type")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::EventType)
                    .col(AuditLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RolePermissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    Id,
    Email,
    DisplayName,
    Role,
    LabelAdminId,
    WalletBalance,
    NegativeBalanceAllowed,
    WalletCreditLimit,
    FirstName,
    LastName,
    DateOfBirth,
    Nationality,
    Country,
    City,
    Phone,
    Bio,
    LockedFields,
    ProfileLockStatus,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RolePermissions {
    Table,
    Role,
    Permission,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AuditLogs {
    Table,
    Id,
    EventType,
    UserId,
    UserRole,
    Details,
    CreatedAt,
}
