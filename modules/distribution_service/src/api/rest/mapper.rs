//! Mapper implementations for converting between DTOs and contract models
//!
//! Response DTOs are built with From impls. Request DTOs parse into contract
//! models with TryFrom because they carry enum identifiers as strings.

use super::dto::*;
use crate::contract::{self, DistributionError};

// ===== Identity conversions =====

impl From<contract::UserProfile> for UserProfileDto {
    fn from(profile: contract::UserProfile) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            display_name: profile.display_name,
            role: profile.role.as_str().to_string(),
            role_name: profile.role.display_name().to_string(),
            label_admin_id: profile.label_admin_id,
            wallet_balance: profile.wallet_balance,
            negative_balance_allowed: profile.negative_balance_allowed,
            wallet_credit_limit: profile.wallet_credit_limit,
            first_name: profile.details.first_name,
            last_name: profile.details.last_name,
            date_of_birth: profile.details.date_of_birth,
            nationality: profile.details.nationality,
            country: profile.details.country,
            city: profile.details.city,
            phone: profile.details.phone,
            bio: profile.details.bio,
            locked_fields: profile.locked_fields,
            profile_lock_status: profile.profile_lock_status.as_str().to_string(),
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

impl From<UpdateProfileRequest> for contract::ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            display_name: req.display_name,
            first_name: req.first_name,
            last_name: req.last_name,
            date_of_birth: req.date_of_birth,
            nationality: req.nationality,
            country: req.country,
            city: req.city,
            phone: req.phone,
            bio: req.bio,
            lock_identity: req.lock_identity,
        }
    }
}

impl From<contract::RolePermissionReport> for RoleVerificationResponse {
    fn from(report: contract::RolePermissionReport) -> Self {
        Self {
            role: report.role.as_str().to_string(),
            in_sync: report.is_in_sync(),
            granted: report.granted,
            missing: report.missing,
            extra: report.extra,
        }
    }
}

// ===== Release conversions =====

impl From<contract::Release> for ReleaseDto {
    fn from(release: contract::Release) -> Self {
        Self {
            id: release.id,
            artist_id: release.artist_id,
            label_admin_id: release.label_admin_id,
            title: release.title,
            status: release.status.as_str().to_string(),
            release_date: release.release_date,
            pending_change_requests: release.pending_change_requests,
            created_at: release.created_at,
            updated_at: release.updated_at,
        }
    }
}

impl From<contract::StatusChange> for StatusChangeDto {
    fn from(change: contract::StatusChange) -> Self {
        Self {
            id: change.id,
            release_id: change.release_id,
            from_status: change.from_status.as_str().to_string(),
            to_status: change.to_status.as_str().to_string(),
            changed_by: change.changed_by,
            notes: change.notes,
            changed_at: change.changed_at,
        }
    }
}

impl From<contract::StatusUpdate> for StatusUpdateResponse {
    fn from(update: contract::StatusUpdate) -> Self {
        Self {
            release: update.release.into(),
            change: update.change.into(),
            message: update.message.to_string(),
        }
    }
}

impl From<CreateReleaseRequest> for contract::NewRelease {
    fn from(req: CreateReleaseRequest) -> Self {
        Self {
            title: req.title,
            release_date: req.release_date,
        }
    }
}

// ===== Change request conversions =====

impl From<contract::ChangeRequest> for ChangeRequestDto {
    fn from(request: contract::ChangeRequest) -> Self {
        Self {
            id: request.id,
            release_id: request.release_id,
            requested_by: request.requested_by,
            request_type: request.request_type,
            field_name: request.field_name,
            current_value: request.current_value,
            requested_value: request.requested_value,
            reason: request.reason,
            urgency_level: request.urgency_level,
            status: request.status.as_str().to_string(),
            reviewed_by: request.reviewed_by,
            reviewed_at: request.reviewed_at,
            review_notes: request.review_notes,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

impl From<CreateChangeRequestRequest> for contract::NewChangeRequest {
    fn from(req: CreateChangeRequestRequest) -> Self {
        Self {
            release_id: req.release_id,
            request_type: req.request_type.unwrap_or_default(),
            field_name: req.field_name,
            current_value: req.current_value,
            requested_value: req.requested_value,
            reason: req.reason,
            urgency_level: req.urgency_level,
        }
    }
}

// ===== Label roster conversions =====

impl From<contract::ArtistRequest> for ArtistRequestDto {
    fn from(request: contract::ArtistRequest) -> Self {
        Self {
            id: request.id,
            label_admin_id: request.label_admin_id,
            artist_id: request.artist_id,
            message: request.message,
            status: request.status.as_str().to_string(),
            reviewed_by: request.reviewed_by,
            reviewed_at: request.reviewed_at,
            review_notes: request.review_notes,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

impl TryFrom<ListArtistRequestsQuery> for contract::ArtistRequestFilter {
    type Error = DistributionError;

    fn try_from(query: ListArtistRequestsQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            status: query
                .status
                .as_deref()
                .map(str::parse::<contract::ArtistRequestStatus>)
                .transpose()?,
            label_admin_id: query.label_admin_id,
            artist_id: query.artist_id,
        })
    }
}

// ===== Revenue split conversions =====

impl From<contract::SplitConfig> for SplitConfigDto {
    fn from(config: contract::SplitConfig) -> Self {
        Self {
            company_id: config.company_id,
            artist_percentage: config.artist_percentage,
            label_percentage: config.label_percentage,
            company_percentage: config.company_percentage,
            updated_by: config.updated_by,
            updated_at: config.updated_at,
        }
    }
}

impl From<contract::SplitOverride> for SplitOverrideDto {
    fn from(split: contract::SplitOverride) -> Self {
        Self {
            id: split.id,
            party: split.party.as_str().to_string(),
            party_id: split.party_id,
            artist_percentage: split.artist_percentage,
            label_percentage: split.label_percentage,
            is_active: split.is_active,
            created_by: split.created_by,
            effective_from: split.effective_from,
            effective_until: split.effective_until,
        }
    }
}

impl From<contract::SplitConfiguration> for SplitConfigurationResponse {
    fn from(configuration: contract::SplitConfiguration) -> Self {
        Self {
            defaults: configuration.defaults.into(),
            artist_overrides: configuration
                .artist_overrides
                .into_iter()
                .map(Into::into)
                .collect(),
            label_overrides: configuration
                .label_overrides
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

// ===== Wallet conversions =====

impl From<contract::WalletAccount> for WalletDto {
    fn from(account: contract::WalletAccount) -> Self {
        Self {
            user_id: account.user_id,
            balance: account.balance,
            negative_balance_allowed: account.negative_balance_allowed,
            credit_limit: account.credit_limit,
        }
    }
}

impl From<contract::WalletTransaction> for WalletTransactionDto {
    fn from(tx: contract::WalletTransaction) -> Self {
        Self {
            id: tx.id,
            user_id: tx.user_id,
            transaction_type: tx.kind.as_str().to_string(),
            amount: tx.amount,
            currency: tx.currency,
            balance_before: tx.balance_before,
            balance_after: tx.balance_after,
            description: tx.description,
            reference: tx.reference,
            created_by: tx.created_by,
            created_at: tx.created_at,
        }
    }
}

impl From<contract::WalletAdjustmentResult> for AdminAdjustResponse {
    fn from(result: contract::WalletAdjustmentResult) -> Self {
        Self {
            transaction: result.transaction.into(),
            wallet: result.account.into(),
        }
    }
}

impl TryFrom<AdminAdjustRequest> for contract::WalletAdjustment {
    type Error = DistributionError;

    fn try_from(req: AdminAdjustRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            target_user_id: req.target_user_id,
            amount: req.amount,
            operation: req.operation.parse()?,
            currency: req.currency,
            description: req.description,
            allow_negative: req.allow_negative,
            negative_limit: req.negative_limit,
        })
    }
}

impl From<EarningRequest> for contract::EarningRecord {
    fn from(req: EarningRequest) -> Self {
        Self {
            artist_id: req.artist_id,
            gross_amount: req.gross_amount,
            currency: req.currency,
            platform: req.platform,
            release_id: req.release_id,
            notes: req.notes,
        }
    }
}

impl From<contract::EarningDistribution> for EarningResponse {
    fn from(distribution: contract::EarningDistribution) -> Self {
        Self {
            artist_percentage: distribution.split.artist_percentage,
            label_percentage: distribution.split.label_percentage,
            split_source: distribution.split.source.as_str().to_string(),
            artist_share: distribution.allocation.artist_share,
            label_share: distribution.allocation.label_share,
            company_share: distribution.allocation.company_share,
            artist_transaction: distribution.artist_transaction.into(),
            label_transaction: distribution.label_transaction.map(Into::into),
        }
    }
}

// ===== Subscription conversions =====

impl From<contract::Subscription> for SubscriptionDto {
    fn from(sub: contract::Subscription) -> Self {
        Self {
            id: sub.id,
            user_id: sub.user_id,
            tier: sub.tier,
            status: sub.status.as_str().to_string(),
            billing_cycle: sub.billing_cycle.as_str().to_string(),
            amount: sub.amount,
            currency: sub.currency,
            current_period_start: sub.current_period_start,
            current_period_end: sub.current_period_end,
            auto_renew: sub.auto_renew,
            renewal_failure_count: sub.renewal_failure_count,
            renewal_failure_reason: sub.renewal_failure_reason,
            last_renewal_attempt: sub.last_renewal_attempt,
            created_at: sub.created_at,
            updated_at: sub.updated_at,
        }
    }
}

impl From<contract::WalletPayment> for WalletPaymentResponse {
    fn from(payment: contract::WalletPayment) -> Self {
        Self {
            subscription: payment.subscription.into(),
            action: payment.action.as_str().to_string(),
            plan_name: payment.plan_name,
            previous_balance: payment.previous_balance,
            new_balance: payment.new_balance,
            amount_deducted: payment.amount_deducted,
        }
    }
}

impl From<contract::RenewalReport> for RenewalReportResponse {
    fn from(report: contract::RenewalReport) -> Self {
        Self {
            processed: report.processed,
            successful: report.successful,
            insufficient_funds: report.insufficient_funds,
            failed: report.failed,
            skipped: report.skipped,
            errors: report
                .errors
                .into_iter()
                .map(|(subscription_id, error)| RenewalError {
                    subscription_id,
                    error,
                })
                .collect(),
        }
    }
}

// ===== Audit & webhook conversions =====

impl From<contract::AuditEntry> for AuditEntryDto {
    fn from(entry: contract::AuditEntry) -> Self {
        Self {
            id: entry.id,
            event_type: entry.event_type,
            user_id: entry.user_id,
            user_role: entry.user_role,
            details: entry.details,
            created_at: entry.created_at,
        }
    }
}

impl From<contract::WebhookReceipt> for WebhookReceiptResponse {
    fn from(receipt: contract::WebhookReceipt) -> Self {
        Self {
            received: true,
            outcome: receipt.outcome.as_str().to_string(),
            event: receipt.event,
            order_id: receipt.order_id,
            message: receipt.message,
        }
    }
}
