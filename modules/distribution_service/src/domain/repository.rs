//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs
//!
//! Operations that touch more than one row run in a single database
//! transaction. Rule violations detected inside such a transaction (for
//! example an overdraft) are returned as a `DistributionError` wrapped in
//! the `anyhow::Error` so the service can recover them.

use super::wallet::LedgerPosting;
use super::webhook::DeliveryKey;
use crate::contract::{
    ArtistRequest, ArtistRequestFilter, AuditEntry, ChangeRequest, ChangeRequestFilter, Release,
    ReleaseFilter, Role, SplitConfig, SplitOverride, SplitParty, StatusChange, Subscription,
    SubscriptionStatus, UserProfile, WalletAccount, WalletTransaction, WebhookLog,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Repository for user profiles
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>>;

    /// List profiles, optionally restricted to one role
    async fn list(&self, role: Option<Role>, limit: u64, offset: u64) -> Result<Vec<UserProfile>>;

    /// Create or update a profile
    async fn upsert(&self, profile: &UserProfile) -> Result<UserProfile>;

    /// Change a user's role; `None` when the user does not exist
    async fn update_role(&self, id: Uuid, role: Role) -> Result<Option<UserProfile>>;

    /// Write the editable profile columns (names, details, lock state).
    /// `None` when the user does not exist.
    async fn update_profile(&self, profile: &UserProfile) -> Result<Option<UserProfile>>;

    /// Artists signed to a label admin
    async fn roster(&self, label_admin_id: Uuid) -> Result<Vec<UserProfile>>;
}

/// Repository for the role -> permission table
#[async_trait]
pub trait RolePermissionRepository: Send + Sync {
    async fn list_for_role(&self, role: Role) -> Result<Vec<String>>;

    /// Returns false when the permission was already granted
    async fn grant(&self, role: Role, permission: &str) -> Result<bool>;

    /// Returns false when the permission was not granted
    async fn revoke(&self, role: Role, permission: &str) -> Result<bool>;

    /// Replace every permission of a role in one transaction
    async fn replace_all(&self, role: Role, permissions: &[String]) -> Result<()>;
}

/// Repository for releases and their status history
#[async_trait]
pub trait ReleaseRepository: Send + Sync {
    async fn create(&self, release: &Release) -> Result<Release>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Release>>;

    async fn list(&self, filter: &ReleaseFilter) -> Result<Vec<Release>>;

    /// Move a release from `change.from_status` to `change.to_status` and
    /// append the history row. Returns `None` when the release is no longer
    /// in `from_status`.
    async fn apply_status_change(&self, change: &StatusChange) -> Result<Option<Release>>;

    async fn status_history(&self, release_id: Uuid) -> Result<Vec<StatusChange>>;
}

/// Repository for release change requests
#[async_trait]
pub trait ChangeRequestRepository: Send + Sync {
    /// Insert the request and increment the release's pending counter
    async fn create(&self, request: &ChangeRequest) -> Result<ChangeRequest>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChangeRequest>>;

    async fn list(&self, filter: &ChangeRequestFilter) -> Result<Vec<ChangeRequest>>;

    /// Store the review outcome of a pending request and decrement the
    /// release's pending counter (never below zero). Returns `None` when the
    /// request is no longer pending.
    async fn review(&self, reviewed: &ChangeRequest) -> Result<Option<ChangeRequest>>;
}

/// Repository for label roster requests
#[async_trait]
pub trait ArtistRequestRepository: Send + Sync {
    async fn create(&self, request: &ArtistRequest) -> Result<ArtistRequest>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ArtistRequest>>;

    /// Newest first
    async fn list(&self, filter: &ArtistRequestFilter) -> Result<Vec<ArtistRequest>>;

    /// Store the review outcome of a pending request. An approval also signs
    /// the artist to the request's label admin in the same transaction; it
    /// fails with `Conflict` when the artist was signed elsewhere meanwhile.
    /// Returns `None` when the request is no longer pending.
    async fn review(&self, reviewed: &ArtistRequest) -> Result<Option<ArtistRequest>>;
}

/// Repository for revenue split defaults and overrides
#[async_trait]
pub trait SplitRepository: Send + Sync {
    async fn get_config(&self, company_id: &str) -> Result<Option<SplitConfig>>;

    async fn save_config(&self, config: &SplitConfig) -> Result<SplitConfig>;

    async fn active_override(
        &self,
        party: SplitParty,
        party_id: Uuid,
    ) -> Result<Option<SplitOverride>>;

    async fn list_active_overrides(&self) -> Result<Vec<SplitOverride>>;

    /// Create or replace the override for (party, party_id)
    async fn upsert_override(&self, split_override: &SplitOverride) -> Result<SplitOverride>;

    /// Deactivate the active override; returns false when there was none
    async fn deactivate_override(
        &self,
        party: SplitParty,
        party_id: Uuid,
        effective_until: DateTime<Utc>,
    ) -> Result<bool>;
}

/// Preconditions of a subscription settlement, checked inside its transaction
#[derive(Debug, Clone, Copy, Default)]
pub struct SettleGuard<'a> {
    /// The stored row must still be active and end its period where this one does
    pub expected: Option<&'a Subscription>,
    /// Claimed in the same transaction; a key claimed before fails the guard
    pub delivery: Option<&'a DeliveryKey>,
}

impl<'a> SettleGuard<'a> {
    pub fn expecting(current: &'a Subscription) -> Self {
        Self {
            expected: Some(current),
            delivery: None,
        }
    }

    /// Whether a stored row with this status and period end still matches `expected`
    pub fn matches(&self, status: SubscriptionStatus, period_end: DateTime<Utc>) -> bool {
        self.expected.map_or(true, |expected| {
            status == SubscriptionStatus::Active && period_end == expected.current_period_end
        })
    }
}

/// Repository for wallets, the ledger and subscriptions
#[async_trait]
pub trait FinanceRepository: Send + Sync {
    async fn account(&self, user_id: Uuid) -> Result<Option<WalletAccount>>;

    /// Apply every posting and write its ledger row in one transaction.
    /// Either all postings are applied or none.
    async fn post_entries(&self, postings: &[LedgerPosting]) -> Result<Vec<WalletTransaction>>;

    /// Claim `key` and apply the postings in one transaction. Returns `None`,
    /// posting nothing, when the key was claimed before.
    async fn post_entries_once(
        &self,
        key: &DeliveryKey,
        postings: &[LedgerPosting],
    ) -> Result<Option<Vec<WalletTransaction>>>;

    /// Newest first
    async fn transactions(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<WalletTransaction>>;

    async fn find_active_subscription(&self, user_id: Uuid) -> Result<Option<Subscription>>;

    /// Most recently updated subscription in any status
    async fn latest_subscription(&self, user_id: Uuid) -> Result<Option<Subscription>>;

    /// Insert or update by id
    async fn save_subscription(&self, subscription: &Subscription) -> Result<Subscription>;

    /// Apply an optional wallet posting and save the subscription in one
    /// transaction. Returns `None`, writing nothing, when `guard` does not hold.
    async fn settle_subscription(
        &self,
        posting: Option<&LedgerPosting>,
        subscription: &Subscription,
        guard: SettleGuard<'_>,
    ) -> Result<Option<(Subscription, Option<WalletTransaction>)>>;

    /// Active auto-renewing subscriptions whose period ended at or before `now`
    async fn due_for_renewal(&self, now: DateTime<Utc>) -> Result<Vec<Subscription>>;
}

/// Filter for audit log queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    pub event_type: Option<String>,
    pub user_id: Option<Uuid>,
}

/// Repository for audit and webhook logs
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn record(&self, entry: &AuditEntry) -> Result<()>;

    /// Newest first
    async fn list(&self, filter: &AuditFilter, limit: u64, offset: u64)
        -> Result<Vec<AuditEntry>>;

    async fn record_webhook(&self, log: &WebhookLog) -> Result<()>;

    /// Whether (order, event) was already processed successfully
    async fn webhook_processed(
        &self,
        provider: &str,
        order_id: &str,
        event_type: &str,
    ) -> Result<bool>;
}
