//! Wallets, earnings and revenue splits

use super::admin::MAX_PAGE_SIZE;
use super::{internal, recover, Service};
use crate::contract::{
    AuthContext, DistributionError, EarningDistribution, EarningRecord, EffectiveSplit, Role,
    SplitConfig, SplitConfiguration, SplitOverride, SplitParty, TransactionKind, UserProfile,
    WalletAccount, WalletAdjustment, WalletAdjustmentResult, WalletTransaction,
};
use crate::domain::events::{DistributionEvent, SplitsChangedEvent, WalletPostedEvent};
use crate::domain::splits;
use crate::domain::wallet::{self, BalancePolicy, LedgerPosting, WalletLimits};
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

impl Service {
    /// Publish one audit event per ledger row
    pub(super) async fn wallet_posted(&self, transactions: &[WalletTransaction]) {
        for tx in transactions {
            tracing::info!(
                user_id = %tx.user_id,
                transaction_id = %tx.id,
                kind = tx.kind.as_str(),
                amount = %tx.amount,
                balance_after = %tx.balance_after,
                "wallet posting applied"
            );
            self.audit(DistributionEvent::WalletPosted(WalletPostedEvent {
                user_id: tx.user_id,
                transaction_id: tx.id,
                kind: tx.kind.as_str().to_string(),
                amount: tx.amount,
                balance_after: tx.balance_after,
                created_by: tx.created_by,
                timestamp: tx.created_at,
            }))
            .await;
        }
    }

    async fn load_account(&self, user_id: Uuid) -> Result<WalletAccount, DistributionError> {
        self.repos
            .finance
            .account(user_id)
            .await
            .map_err(internal("load wallet"))?
            .ok_or_else(|| DistributionError::not_found("user", user_id))
    }

    async fn require_wallet_access(
        &self,
        caller: &AuthContext,
        user_id: Uuid,
        operation: &str,
    ) -> Result<(), DistributionError> {
        if user_id == caller.user_id {
            self.require_any(caller, &["wallet:read:own", "wallet:read:any"], operation)
                .await
        } else {
            self.require(caller, "wallet:read:any", operation).await
        }
    }

    // ===== Wallet =====

    /// Wallet of `user_id`, defaulting to the caller's own
    pub async fn get_wallet(
        &self,
        caller: &AuthContext,
        user_id: Option<Uuid>,
    ) -> Result<WalletAccount, DistributionError> {
        let user_id = user_id.unwrap_or(caller.user_id);
        self.require_wallet_access(caller, user_id, "get_wallet")
            .await?;
        self.load_account(user_id).await
    }

    pub async fn list_wallet_transactions(
        &self,
        caller: &AuthContext,
        user_id: Option<Uuid>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<WalletTransaction>, DistributionError> {
        let user_id = user_id.unwrap_or(caller.user_id);
        self.require_wallet_access(caller, user_id, "list_wallet_transactions")
            .await?;

        self.repos
            .finance
            .transactions(user_id, limit.min(MAX_PAGE_SIZE), offset)
            .await
            .map_err(internal("list wallet transactions"))
    }

    /// Credit or debit a wallet on behalf of an admin.
    ///
    /// Negative balance settings supplied with the request are validated
    /// against and stored on the account in the same transaction.
    pub async fn admin_adjust_wallet(
        &self,
        caller: &AuthContext,
        adjustment: WalletAdjustment,
    ) -> Result<WalletAdjustmentResult, DistributionError> {
        self.require(caller, "wallet:adjust:any", "admin_adjust_wallet")
            .await?;

        let delta = wallet::signed_amount(adjustment.amount, adjustment.operation)?;
        if let Some(limit) = adjustment.negative_limit {
            if limit < Decimal::ZERO {
                return Err(DistributionError::validation(
                    "Negative balance limit must not be negative",
                ));
            }
        }

        let target = self.load_user(adjustment.target_user_id).await?;

        let policy = BalancePolicy::Override {
            allow_negative: adjustment.allow_negative.unwrap_or(false),
            credit_limit: adjustment.negative_limit,
        };
        let limits_update = if adjustment.allow_negative.is_some()
            || adjustment.negative_limit.is_some()
        {
            Some(WalletLimits {
                negative_balance_allowed: adjustment
                    .allow_negative
                    .unwrap_or(target.negative_balance_allowed),
                credit_limit: adjustment.negative_limit,
            })
        } else {
            None
        };

        let currency = adjustment
            .currency
            .unwrap_or_else(|| self.settings.default_currency.clone());
        let description = adjustment.description.unwrap_or_else(|| {
            format!(
                "Admin {} by {}",
                adjustment.operation.as_str(),
                caller.email.as_deref().unwrap_or("admin")
            )
        });

        let posting = LedgerPosting {
            user_id: target.id,
            delta,
            policy,
            kind: TransactionKind::AdminAdjustment,
            currency,
            description,
            reference: None,
            created_by: Some(caller.user_id),
            limits_update,
        };

        let transactions = self
            .repos
            .finance
            .post_entries(std::slice::from_ref(&posting))
            .await
            .map_err(recover("admin wallet adjustment"))?;
        self.wallet_posted(&transactions).await;

        let transaction = transactions
            .into_iter()
            .next()
            .ok_or(DistributionError::Internal)?;
        let account = self.load_account(target.id).await?;

        Ok(WalletAdjustmentResult {
            transaction,
            account,
        })
    }

    /// Split a gross earning between the artist and their label and credit
    /// both wallets atomically
    pub async fn record_earning(
        &self,
        caller: &AuthContext,
        record: EarningRecord,
    ) -> Result<EarningDistribution, DistributionError> {
        self.require(caller, "earnings:create:any", "record_earning")
            .await?;

        if record.platform.trim().is_empty() {
            return Err(DistributionError::validation("Platform is required"));
        }

        let artist = self.load_user(record.artist_id).await?;
        let split = self.effective_split_for(&artist).await?;
        let allocation =
            splits::allocate(record.gross_amount, &split, artist.label_admin_id.is_some())?;

        let currency = record
            .currency
            .clone()
            .unwrap_or_else(|| self.settings.default_currency.clone());
        let reference = record
            .release_id
            .map(|id| format!("{}:{}", record.platform, id))
            .unwrap_or_else(|| record.platform.clone());
        let description = record
            .notes
            .clone()
            .unwrap_or_else(|| format!("Earnings from {}", record.platform));

        let mut postings = vec![LedgerPosting::credit(
            artist.id,
            allocation.artist_share,
            TransactionKind::Earning,
            &currency,
        )
        .with_description(format!("{description} (artist share)"))
        .with_reference(reference.clone())
        .created_by(caller.user_id)];

        if let Some(label_id) = artist.label_admin_id {
            if allocation.label_share > Decimal::ZERO {
                postings.push(
                    LedgerPosting::credit(
                        label_id,
                        allocation.label_share,
                        TransactionKind::Earning,
                        &currency,
                    )
                    .with_description(format!("{description} (label share)"))
                    .with_reference(reference)
                    .created_by(caller.user_id),
                );
            }
        }

        let transactions = self
            .repos
            .finance
            .post_entries(&postings)
            .await
            .map_err(recover("record earning"))?;
        self.wallet_posted(&transactions).await;

        let mut rows = transactions.into_iter();
        let artist_transaction = rows.next().ok_or(DistributionError::Internal)?;
        let label_transaction = rows.next();

        Ok(EarningDistribution {
            split,
            allocation,
            artist_transaction,
            label_transaction,
        })
    }

    // ===== Revenue splits =====

    async fn split_defaults(&self) -> Result<SplitConfig, DistributionError> {
        let stored = self
            .repos
            .splits
            .get_config(&self.settings.company_id)
            .await
            .map_err(internal("load split configuration"))?;

        Ok(stored.unwrap_or_else(|| SplitConfig {
            company_id: self.settings.company_id.clone(),
            artist_percentage: self.settings.default_artist_percentage,
            label_percentage: self.settings.default_label_percentage,
            company_percentage: Decimal::ZERO,
            updated_by: None,
            updated_at: Utc::now(),
        }))
    }

    /// Split applying to an artist's earnings
    pub async fn effective_split_for(
        &self,
        artist: &UserProfile,
    ) -> Result<EffectiveSplit, DistributionError> {
        let defaults = self.split_defaults().await?;

        let artist_override = self
            .repos
            .splits
            .active_override(SplitParty::Artist, artist.id)
            .await
            .map_err(internal("load artist split override"))?;

        let label_override = match artist.label_admin_id {
            Some(label_id) => self
                .repos
                .splits
                .active_override(SplitParty::Label, label_id)
                .await
                .map_err(internal("load label split override"))?,
            None => None,
        };

        Ok(splits::resolve_effective_split(
            &defaults,
            artist_override.as_ref(),
            label_override.as_ref(),
        ))
    }

    pub async fn get_split_configuration(
        &self,
        caller: &AuthContext,
    ) -> Result<SplitConfiguration, DistributionError> {
        self.require(caller, "split:read:any", "get_split_configuration")
            .await?;

        let defaults = self.split_defaults().await?;
        let overrides = self
            .repos
            .splits
            .list_active_overrides()
            .await
            .map_err(internal("list split overrides"))?;

        let (artist_overrides, label_overrides): (Vec<_>, Vec<_>) = overrides
            .into_iter()
            .partition(|o| o.party == SplitParty::Artist);

        Ok(SplitConfiguration {
            defaults,
            artist_overrides,
            label_overrides,
        })
    }

    pub async fn update_split_configuration(
        &self,
        caller: &AuthContext,
        artist_percentage: Decimal,
        label_percentage: Decimal,
    ) -> Result<SplitConfig, DistributionError> {
        self.require(caller, "split:approve:any", "update_split_configuration")
            .await?;
        splits::validate_split_config(artist_percentage, label_percentage)?;

        let config = SplitConfig {
            company_id: self.settings.company_id.clone(),
            artist_percentage,
            label_percentage,
            company_percentage: Decimal::ZERO,
            updated_by: Some(caller.user_id),
            updated_at: Utc::now(),
        };

        let saved = self
            .repos
            .splits
            .save_config(&config)
            .await
            .map_err(internal("save split configuration"))?;

        tracing::info!(
            artist = %saved.artist_percentage,
            label = %saved.label_percentage,
            updated_by = %caller.user_id,
            "default revenue split updated"
        );
        self.audit(DistributionEvent::SplitsChanged(SplitsChangedEvent {
            scope: "default".to_string(),
            party_id: None,
            artist_percentage: Some(saved.artist_percentage),
            label_percentage: Some(saved.label_percentage),
            changed_by: caller.user_id,
            timestamp: saved.updated_at,
        }))
        .await;

        Ok(saved)
    }

    /// Set the split for one artist or label. `percentage` is that party's
    /// share; the other side gets the complement.
    pub async fn upsert_split_override(
        &self,
        caller: &AuthContext,
        party: SplitParty,
        party_id: Uuid,
        percentage: Decimal,
    ) -> Result<SplitOverride, DistributionError> {
        self.require(caller, "split:approve:any", "upsert_split_override")
            .await?;

        let (artist_percentage, label_percentage) =
            splits::override_percentages(party, percentage)?;

        let user = self.load_user(party_id).await?;
        if party == SplitParty::Label && user.role != Role::LabelAdmin {
            return Err(DistributionError::validation(
                "Label overrides can only be set for label admins",
            ));
        }

        let split_override = SplitOverride {
            id: Uuid::new_v4(),
            party,
            party_id,
            artist_percentage,
            label_percentage,
            is_active: true,
            created_by: caller.user_id,
            effective_from: Utc::now(),
            effective_until: None,
        };

        let saved = self
            .repos
            .splits
            .upsert_override(&split_override)
            .await
            .map_err(internal("save split override"))?;

        tracing::info!(
            party = party.as_str(),
            party_id = %party_id,
            artist = %saved.artist_percentage,
            label = %saved.label_percentage,
            "split override saved"
        );
        self.audit(DistributionEvent::SplitsChanged(SplitsChangedEvent {
            scope: party.as_str().to_string(),
            party_id: Some(party_id),
            artist_percentage: Some(saved.artist_percentage),
            label_percentage: Some(saved.label_percentage),
            changed_by: caller.user_id,
            timestamp: saved.effective_from,
        }))
        .await;

        Ok(saved)
    }

    pub async fn remove_split_override(
        &self,
        caller: &AuthContext,
        party: SplitParty,
        party_id: Uuid,
    ) -> Result<(), DistributionError> {
        self.require(caller, "split:approve:any", "remove_split_override")
            .await?;

        let now = Utc::now();
        let removed = self
            .repos
            .splits
            .deactivate_override(party, party_id, now)
            .await
            .map_err(internal("deactivate split override"))?;
        if !removed {
            return Err(DistributionError::not_found(
                "split_override",
                format!("{}/{}", party.as_str(), party_id),
            ));
        }

        tracing::info!(party = party.as_str(), party_id = %party_id, "split override removed");
        self.audit(DistributionEvent::SplitsChanged(SplitsChangedEvent {
            scope: party.as_str().to_string(),
            party_id: Some(party_id),
            artist_percentage: None,
            label_percentage: None,
            changed_by: caller.user_id,
            timestamp: now,
        }))
        .await;

        Ok(())
    }
}
