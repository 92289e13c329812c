//! Native client trait for inter-module communication
//!
//! This trait defines the API that other modules use to interact with the
//! distribution service. NO HTTP - direct function calls for performance.

use super::error::DistributionError;
use super::model::{
    ArtistRequest, ArtistRequestStatus, AuthContext, BillingCycle, ChangeRequest,
    ChangeRequestStatus, EarningDistribution, EarningRecord, NewChangeRequest, NewRelease,
    ProfileUpdate, Release, ReleaseStatus, RenewalReport, Role, RolePermissionReport,
    SplitConfig, SplitConfiguration, SplitOverride, SplitParty, StatusUpdate, Subscription,
    UserProfile, WalletAccount, WalletAdjustment, WalletAdjustmentResult, WalletPayment,
    WalletTransaction,
};
use rust_decimal::Decimal;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Distribution service API for inter-module communication
#[async_trait]
pub trait DistributionApi: Send + Sync {
    // ===== Identity =====

    /// Resolve the role and permissions of an authenticated user
    async fn resolve_caller(
        &self,
        user_id: Uuid,
        email: Option<String>,
    ) -> Result<AuthContext, DistributionError>;

    async fn get_profile(&self, caller: &AuthContext) -> Result<UserProfile, DistributionError>;

    /// Edit the caller's own profile
    async fn update_profile(
        &self,
        caller: &AuthContext,
        update: ProfileUpdate,
    ) -> Result<UserProfile, DistributionError>;

    async fn set_profile_lock(
        &self,
        caller: &AuthContext,
        user_id: Uuid,
        locked: bool,
    ) -> Result<UserProfile, DistributionError>;

    async fn has_permission(&self, role: Role, permission: &str)
        -> Result<bool, DistributionError>;

    async fn assign_role(
        &self,
        caller: &AuthContext,
        user_id: Uuid,
        role: Role,
    ) -> Result<UserProfile, DistributionError>;

    async fn reset_role_defaults(
        &self,
        caller: &AuthContext,
        role: Role,
    ) -> Result<Vec<String>, DistributionError>;

    async fn verify_role_permissions(
        &self,
        caller: &AuthContext,
        role: Role,
    ) -> Result<RolePermissionReport, DistributionError>;

    // ===== Label roster =====

    async fn label_roster(
        &self,
        caller: &AuthContext,
        label_admin_id: Option<Uuid>,
    ) -> Result<Vec<UserProfile>, DistributionError>;

    async fn request_artist_affiliation(
        &self,
        caller: &AuthContext,
        artist_id: Uuid,
        message: Option<String>,
    ) -> Result<ArtistRequest, DistributionError>;

    async fn review_artist_request(
        &self,
        caller: &AuthContext,
        request_id: Uuid,
        status: ArtistRequestStatus,
        notes: Option<String>,
    ) -> Result<ArtistRequest, DistributionError>;

    // ===== Releases =====

    async fn create_release(
        &self,
        caller: &AuthContext,
        release: NewRelease,
    ) -> Result<Release, DistributionError>;

    async fn get_release(
        &self,
        caller: &AuthContext,
        release_id: Uuid,
    ) -> Result<Release, DistributionError>;

    async fn list_releases(
        &self,
        caller: &AuthContext,
        status: Option<ReleaseStatus>,
    ) -> Result<Vec<Release>, DistributionError>;

    async fn update_release_status(
        &self,
        caller: &AuthContext,
        release_id: Uuid,
        status: ReleaseStatus,
        notes: Option<String>,
    ) -> Result<StatusUpdate, DistributionError>;

    async fn create_change_request(
        &self,
        caller: &AuthContext,
        request: NewChangeRequest,
    ) -> Result<ChangeRequest, DistributionError>;

    async fn review_change_request(
        &self,
        caller: &AuthContext,
        request_id: Uuid,
        decision: ChangeRequestStatus,
        notes: Option<String>,
    ) -> Result<ChangeRequest, DistributionError>;

    async fn list_change_requests(
        &self,
        caller: &AuthContext,
        release_id: Option<Uuid>,
        status: Option<ChangeRequestStatus>,
    ) -> Result<Vec<ChangeRequest>, DistributionError>;

    // ===== Revenue splits =====

    async fn get_split_configuration(
        &self,
        caller: &AuthContext,
    ) -> Result<SplitConfiguration, DistributionError>;

    async fn update_split_configuration(
        &self,
        caller: &AuthContext,
        artist_percentage: Decimal,
        label_percentage: Decimal,
    ) -> Result<SplitConfig, DistributionError>;

    async fn upsert_split_override(
        &self,
        caller: &AuthContext,
        party: SplitParty,
        party_id: Uuid,
        percentage: Decimal,
    ) -> Result<SplitOverride, DistributionError>;

    async fn remove_split_override(
        &self,
        caller: &AuthContext,
        party: SplitParty,
        party_id: Uuid,
    ) -> Result<(), DistributionError>;

    // ===== Wallet & earnings =====

    async fn get_wallet(
        &self,
        caller: &AuthContext,
        user_id: Option<Uuid>,
    ) -> Result<WalletAccount, DistributionError>;

    async fn list_wallet_transactions(
        &self,
        caller: &AuthContext,
        user_id: Option<Uuid>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<WalletTransaction>, DistributionError>;

    async fn admin_adjust_wallet(
        &self,
        caller: &AuthContext,
        adjustment: WalletAdjustment,
    ) -> Result<WalletAdjustmentResult, DistributionError>;

    async fn record_earning(
        &self,
        caller: &AuthContext,
        record: EarningRecord,
    ) -> Result<EarningDistribution, DistributionError>;

    // ===== Subscriptions =====

    async fn get_subscription(
        &self,
        caller: &AuthContext,
    ) -> Result<Option<Subscription>, DistributionError>;

    async fn pay_subscription_with_wallet(
        &self,
        caller: &AuthContext,
        plan_id: &str,
        cycle: BillingCycle,
    ) -> Result<WalletPayment, DistributionError>;

    async fn cancel_subscription(
        &self,
        caller: &AuthContext,
    ) -> Result<Subscription, DistributionError>;

    async fn process_renewals(&self, now: DateTime<Utc>)
        -> Result<RenewalReport, DistributionError>;
}
