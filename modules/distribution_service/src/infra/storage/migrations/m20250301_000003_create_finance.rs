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
                    .table(RevenueSplitConfig::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RevenueSplitConfig::CompanyId)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RevenueSplitConfig::ArtistPercentage)
                            .decimal_len(5, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RevenueSplitConfig::LabelPercentage)
                            .decimal_len(5, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RevenueSplitConfig::CompanyPercentage)
                            .decimal_len(5, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(RevenueSplitConfig::UpdatedBy).uuid())
                    .col(timestamp_now(RevenueSplitConfig::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RevenueSplits::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RevenueSplits::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(RevenueSplits::Party).string_len(16).not_null())
                    .col(ColumnDef::new(RevenueSplits::PartyId).uuid().not_null())
                    .col(
                        ColumnDef::new(RevenueSplits::ArtistPercentage)
                            .decimal_len(5, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RevenueSplits::LabelPercentage)
                            .decimal_len(5, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RevenueSplits::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(RevenueSplits::CreatedBy).uuid().not_null())
                    .col(timestamp_now(RevenueSplits::EffectiveFrom))
                    .col(ColumnDef::new(RevenueSplits::EffectiveUntil).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // one override row per party, reactivated in place
        manager
            .create_index(
                Index::create()
                    .name("uq_revenue_splits_party")
                    .table(RevenueSplits::Table)
                    .col(RevenueSplits::Party)
                    .col(RevenueSplits::PartyId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WalletTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WalletTransactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WalletTransactions::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(WalletTransactions::TransactionType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::Amount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::Currency)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::BalanceBefore)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::BalanceAfter)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(WalletTransactions::Reference).string())
                    .col(ColumnDef::new(WalletTransactions::CreatedBy).uuid())
                    .col(timestamp_now(WalletTransactions::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_wallet_transactions_user")
                    .table(WalletTransactions::Table)
                    .col(WalletTransactions::UserId)
                    .col(WalletTransactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Subscriptions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Subscriptions::UserId).uuid().not_null())
                    .col(ColumnDef::new(Subscriptions::Tier).string_len(64).not_null())
                    .col(ColumnDef::new(Subscriptions::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Subscriptions::BillingCycle)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::Amount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Subscriptions::Currency).string_len(3).not_null())
                    .col(
                        ColumnDef::new(Subscriptions::CurrentPeriodStart)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::CurrentPeriodEnd)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::AutoRenew)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::RenewalFailureCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Subscriptions::RenewalFailureReason).text())
                    .col(
                        ColumnDef::new(Subscriptions::LastRenewalAttempt)
                            .timestamp_with_time_zone(),
                    )
                    .col(timestamp_now(Subscriptions::CreatedAt))
                    .col(timestamp_now(Subscriptions::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_renewal")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::Status)
                    .col(Subscriptions::CurrentPeriodEnd)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_user_id")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Subscriptions::Table.into_iden(),
            WalletTransactions::Table.into_iden(),
            RevenueSplits::Table.into_iden(),
            RevenueSplitConfig::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum RevenueSplitConfig {
    Table,
    CompanyId,
    ArtistPercentage,
    LabelPercentage,
    CompanyPercentage,
    UpdatedBy,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RevenueSplits {
    Table,
    Id,
    Party,
    PartyId,
    ArtistPercentage,
    LabelPercentage,
    IsActive,
    CreatedBy,
    EffectiveFrom,
    EffectiveUntil,
}

#[derive(DeriveIden)]
enum WalletTransactions {
    Table,
    Id,
    UserId,
    TransactionType,
    Amount,
    Currency,
    BalanceBefore,
    BalanceAfter,
    Description,
    Reference,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Subscriptions {
    Table,
    Id,
    UserId,
    Tier,
    Status,
    BillingCycle,
    Amount,
    Currency,
    CurrentPeriodStart,
    CurrentPeriodEnd,
    AutoRenew,
    RenewalFailureCount,
    RenewalFailureReason,
    LastRenewalAttempt,
    CreatedAt,
    UpdatedAt,
}
