//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models. Enum columns are
//! stored as their snake_case identifiers; an unknown value in the database
//! surfaces as a conversion error.

use super::entity::{
    artist_request, audit_log, change_request, release, release_status_history, revenue_split,
    revenue_split_config, subscription, user_profile, wallet_transaction, webhook_log,
};
use crate::contract::{
    ArtistRequest, AuditEntry, ChangeRequest, ProfileDetails, Release, SplitConfig, SplitOverride,
    StatusChange, Subscription, UserProfile, WalletAccount, WalletTransaction, WebhookLog,
};
use sea_orm::ActiveValue::{NotSet, Set};

// ===== User profiles =====

impl TryFrom<user_profile::Model> for UserProfile {
    type Error = anyhow::Error;

    fn try_from(entity: user_profile::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            email: entity.email,
            display_name: entity.display_name,
            role: entity.role.parse()?,
            label_admin_id: entity.label_admin_id,
            wallet_balance: entity.wallet_balance,
            negative_balance_allowed: entity.negative_balance_allowed,
            wallet_credit_limit: entity.wallet_credit_limit,
            details: ProfileDetails {
                first_name: entity.first_name,
                last_name: entity.last_name,
                date_of_birth: entity.date_of_birth,
                nationality: entity.nationality,
                country: entity.country,
                city: entity.city,
                phone: entity.phone,
                bio: entity.bio,
            },
            locked_fields: serde_json::from_value(entity.locked_fields)?,
            profile_lock_status: entity.profile_lock_status.parse()?,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl From<&UserProfile> for user_profile::ActiveModel {
    fn from(model: &UserProfile) -> Self {
        Self {
            id: Set(model.id),
            email: Set(model.email.clone()),
            display_name: Set(model.display_name.clone()),
            role: Set(model.role.as_str().to_string()),
            label_admin_id: Set(model.label_admin_id),
            wallet_balance: Set(model.wallet_balance),
            negative_balance_allowed: Set(model.negative_balance_allowed),
            wallet_credit_limit: Set(model.wallet_credit_limit),
            first_name: Set(model.details.first_name.clone()),
            last_name: Set(model.details.last_name.clone()),
            date_of_birth: Set(model.details.date_of_birth),
            nationality: Set(model.details.nationality.clone()),
            country: Set(model.details.country.clone()),
            city: Set(model.details.city.clone()),
            phone: Set(model.details.phone.clone()),
            bio: Set(model.details.bio.clone()),
            locked_fields: Set(serde_json::json!(model.locked_fields)),
            profile_lock_status: Set(model.profile_lock_status.as_str().to_string()),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

impl From<&user_profile::Model> for WalletAccount {
    fn from(entity: &user_profile::Model) -> Self {
        Self {
            user_id: entity.id,
            balance: entity.wallet_balance,
            negative_balance_allowed: entity.negative_balance_allowed,
            credit_limit: entity.wallet_credit_limit,
        }
    }
}

// ===== Releases =====

impl TryFrom<release::Model> for Release {
    type Error = anyhow::Error;

    fn try_from(entity: release::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            artist_id: entity.artist_id,
            label_admin_id: entity.label_admin_id,
            title: entity.title,
            status: entity.status.parse()?,
            release_date: entity.release_date,
            pending_change_requests: entity.pending_change_requests,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl From<&Release> for release::ActiveModel {
    fn from(model: &Release) -> Self {
        Self {
            id: Set(model.id),
            artist_id: Set(model.artist_id),
            label_admin_id: Set(model.label_admin_id),
            title: Set(model.title.clone()),
            status: Set(model.status.as_str().to_string()),
            release_date: Set(model.release_date),
            pending_change_requests: Set(model.pending_change_requests),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

impl TryFrom<release_status_history::Model> for StatusChange {
    type Error = anyhow::Error;

    fn try_from(entity: release_status_history::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            release_id: entity.release_id,
            from_status: entity.from_status.parse()?,
            to_status: entity.to_status.parse()?,
            changed_by: entity.changed_by,
            notes: entity.notes,
            changed_at: entity.changed_at,
        })
    }
}

impl From<&StatusChange> for release_status_history::ActiveModel {
    fn from(model: &StatusChange) -> Self {
        Self {
            id: Set(model.id),
            release_id: Set(model.release_id),
            from_status: Set(model.from_status.as_str().to_string()),
            to_status: Set(model.to_status.as_str().to_string()),
            changed_by: Set(model.changed_by),
            notes: Set(model.notes.clone()),
            changed_at: Set(model.changed_at),
        }
    }
}

// ===== Change requests =====

impl TryFrom<change_request::Model> for ChangeRequest {
    type Error = anyhow::Error;

    fn try_from(entity: change_request::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            release_id: entity.release_id,
            requested_by: entity.requested_by,
            request_type: entity.request_type,
            field_name: entity.field_name,
            current_value: entity.current_value,
            requested_value: entity.requested_value,
            reason: entity.reason,
            urgency_level: entity.urgency_level,
            status: entity.status.parse()?,
            reviewed_by: entity.reviewed_by,
            reviewed_at: entity.reviewed_at,
            review_notes: entity.review_notes,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl From<&ChangeRequest> for change_request::ActiveModel {
    fn from(model: &ChangeRequest) -> Self {
        Self {
            id: Set(model.id),
            release_id: Set(model.release_id),
            requested_by: Set(model.requested_by),
            request_type: Set(model.request_type.clone()),
            field_name: Set(model.field_name.clone()),
            current_value: Set(model.current_value.clone()),
            requested_value: Set(model.requested_value.clone()),
            reason: Set(model.reason.clone()),
            urgency_level: Set(model.urgency_level),
            status: Set(model.status.as_str().to_string()),
            reviewed_by: Set(model.reviewed_by),
            reviewed_at: Set(model.reviewed_at),
            review_notes: Set(model.review_notes.clone()),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

// ===== Label roster =====

impl TryFrom<artist_request::Model> for ArtistRequest {
    type Error = anyhow::Error;

    fn try_from(entity: artist_request::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            label_admin_id: entity.label_admin_id,
            artist_id: entity.artist_id,
            message: entity.message,
            status: entity.status.parse()?,
            reviewed_by: entity.reviewed_by,
            reviewed_at: entity.reviewed_at,
            review_notes: entity.review_notes,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl From<&ArtistRequest> for artist_request::ActiveModel {
    fn from(model: &ArtistRequest) -> Self {
        Self {
            id: Set(model.id),
            label_admin_id: Set(model.label_admin_id),
            artist_id: Set(model.artist_id),
            message: Set(model.message.clone()),
            status: Set(model.status.as_str().to_string()),
            reviewed_by: Set(model.reviewed_by),
            reviewed_at: Set(model.reviewed_at),
            review_notes: Set(model.review_notes.clone()),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

// ===== Revenue splits =====

impl From<revenue_split_config::Model> for SplitConfig {
    fn from(entity: revenue_split_config::Model) -> Self {
        Self {
            company_id: entity.company_id,
            artist_percentage: entity.artist_percentage,
            label_percentage: entity.label_percentage,
            company_percentage: entity.company_percentage,
            updated_by: entity.updated_by,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&SplitConfig> for revenue_split_config::ActiveModel {
    fn from(model: &SplitConfig) -> Self {
        Self {
            company_id: Set(model.company_id.clone()),
            artist_percentage: Set(model.artist_percentage),
            label_percentage: Set(model.label_percentage),
            company_percentage: Set(model.company_percentage),
            updated_by: Set(model.updated_by),
            updated_at: Set(model.updated_at),
        }
    }
}

impl TryFrom<revenue_split::Model> for SplitOverride {
    type Error = anyhow::Error;

    fn try_from(entity: revenue_split::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            party: entity.party.parse()?,
            party_id: entity.party_id,
            artist_percentage: entity.artist_percentage,
            label_percentage: entity.label_percentage,
            is_active: entity.is_active,
            created_by: entity.created_by,
            effective_from: entity.effective_from,
            effective_until: entity.effective_until,
        })
    }
}

impl From<&SplitOverride> for revenue_split::ActiveModel {
    fn from(model: &SplitOverride) -> Self {
        Self {
            id: Set(model.id),
            party: Set(model.party.as_str().to_string()),
            party_id: Set(model.party_id),
            artist_percentage: Set(model.artist_percentage),
            label_percentage: Set(model.label_percentage),
            is_active: Set(model.is_active),
            created_by: Set(model.created_by),
            effective_from: Set(model.effective_from),
            effective_until: Set(model.effective_until),
        }
    }
}

// ===== Wallet ledger =====

impl TryFrom<wallet_transaction::Model> for WalletTransaction {
    type Error = anyhow::Error;

    fn try_from(entity: wallet_transaction::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            kind: entity.transaction_type.parse()?,
            amount: entity.amount,
            currency: entity.currency,
            balance_before: entity.balance_before,
            balance_after: entity.balance_after,
            description: entity.description,
            reference: entity.reference,
            created_by: entity.created_by,
            created_at: entity.created_at,
        })
    }
}

impl From<&WalletTransaction> for wallet_transaction::ActiveModel {
    fn from(model: &WalletTransaction) -> Self {
        Self {
            id: Set(model.id),
            user_id: Set(model.user_id),
            transaction_type: Set(model.kind.as_str().to_string()),
            amount: Set(model.amount),
            currency: Set(model.currency.clone()),
            balance_before: Set(model.balance_before),
            balance_after: Set(model.balance_after),
            description: Set(model.description.clone()),
            reference: Set(model.reference.clone()),
            created_by: Set(model.created_by),
            created_at: Set(model.created_at),
        }
    }
}

// ===== Subscriptions =====

impl TryFrom<subscription::Model> for Subscription {
    type Error = anyhow::Error;

    fn try_from(entity: subscription::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            tier: entity.tier,
            status: entity.status.parse()?,
            billing_cycle: entity.billing_cycle.parse()?,
            amount: entity.amount,
            currency: entity.currency,
            current_period_start: entity.current_period_start,
            current_period_end: entity.current_period_end,
            auto_renew: entity.auto_renew,
            renewal_failure_count: entity.renewal_failure_count,
            renewal_failure_reason: entity.renewal_failure_reason,
            last_renewal_attempt: entity.last_renewal_attempt,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl From<&Subscription> for subscription::ActiveModel {
    fn from(model: &Subscription) -> Self {
        Self {
            id: Set(model.id),
            user_id: Set(model.user_id),
            tier: Set(model.tier.clone()),
            status: Set(model.status.as_str().to_string()),
            billing_cycle: Set(model.billing_cycle.as_str().to_string()),
            amount: Set(model.amount),
            currency: Set(model.currency.clone()),
            current_period_start: Set(model.current_period_start),
            current_period_end: Set(model.current_period_end),
            auto_renew: Set(model.auto_renew),
            renewal_failure_count: Set(model.renewal_failure_count),
            renewal_failure_reason: Set(model.renewal_failure_reason.clone()),
            last_renewal_attempt: Set(model.last_renewal_attempt),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

// ===== Logs =====

impl From<audit_log::Model> for AuditEntry {
    fn from(entity: audit_log::Model) -> Self {
        Self {
            id: entity.id,
            event_type: entity.event_type,
            user_id: entity.user_id,
            user_role: entity.user_role,
            details: entity.details,
            created_at: entity.created_at,
        }
    }
}

impl From<&AuditEntry> for audit_log::ActiveModel {
    fn from(model: &AuditEntry) -> Self {
        Self {
            id: Set(model.id),
            event_type: Set(model.event_type.clone()),
            user_id: Set(model.user_id),
            user_role: Set(model.user_role.clone()),
            details: Set(model.details.clone()),
            created_at: Set(model.created_at),
        }
    }
}

impl From<&WebhookLog> for webhook_log::ActiveModel {
    fn from(model: &WebhookLog) -> Self {
        Self {
            id: Set(model.id),
            provider: Set(model.provider.clone()),
            event_type: Set(model.event_type.clone()),
            order_id: Set(model.order_id.clone()),
            status: Set(model.status.clone()),
            data: Set(model.data.clone()),
            created_at: Set(model.created_at),
        }
    }
}

/// Active model that only updates the balance columns of a profile
pub(super) fn balance_update(
    entity: &user_profile::Model,
    balance: rust_decimal::Decimal,
    now: chrono::DateTime<chrono::Utc>,
) -> user_profile::ActiveModel {
    user_profile::ActiveModel {
        id: Set(entity.id),
        wallet_balance: Set(balance),
        updated_at: Set(now),
        email: NotSet,
        display_name: NotSet,
        role: NotSet,
        label_admin_id: NotSet,
        negative_balance_allowed: NotSet,
        wallet_credit_limit: NotSet,
        first_name: NotSet,
        last_name: NotSet,
        date_of_birth: NotSet,
        nationality: NotSet,
        country: NotSet,
        city: NotSet,
        phone: NotSet,
        bio: NotSet,
        locked_fields: NotSet,
        profile_lock_status: NotSet,
        created_at: NotSet,
    }
}

/// Active model that only updates the editable profile columns, leaving the
/// role, label and wallet columns alone
pub(super) fn profile_update(model: &UserProfile) -> user_profile::ActiveModel {
    user_profile::ActiveModel {
        id: NotSet,
        email: NotSet,
        role: NotSet,
        label_admin_id: NotSet,
        wallet_balance: NotSet,
        negative_balance_allowed: NotSet,
        wallet_credit_limit: NotSet,
        created_at: NotSet,
        display_name: Set(model.display_name.clone()),
        first_name: Set(model.details.first_name.clone()),
        last_name: Set(model.details.last_name.clone()),
        date_of_birth: Set(model.details.date_of_birth),
        nationality: Set(model.details.nationality.clone()),
        country: Set(model.details.country.clone()),
        city: Set(model.details.city.clone()),
        phone: Set(model.details.phone.clone()),
        bio: Set(model.details.bio.clone()),
        locked_fields: Set(serde_json::json!(model.locked_fields)),
        profile_lock_status: Set(model.profile_lock_status.as_str().to_string()),
        updated_at: Set(model.updated_at),
    }
}
