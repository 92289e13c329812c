//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    ArtistRequest, ArtistRequestStatus, AuthContext, BillingCycle, ChangeRequest,
    ChangeRequestStatus, DistributionApi, DistributionError, EarningDistribution, EarningRecord,
    NewChangeRequest, NewRelease, ProfileUpdate, Release, ReleaseStatus, RenewalReport, Role,
    RolePermissionReport, SplitConfig, SplitConfiguration, SplitOverride, SplitParty,
    StatusUpdate, Subscription, UserProfile, WalletAccount, WalletAdjustment,
    WalletAdjustmentResult, WalletPayment, WalletTransaction,
};
use crate::domain::Service;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

/// Native client implementation that directly calls the domain service
///
/// Used by other in-process modules (billing jobs, admin tooling) without
/// going through HTTP.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl DistributionApi for NativeClient {
    async fn resolve_caller(
        &self,
        user_id: Uuid,
        email: Option<String>,
    ) -> Result<AuthContext, DistributionError> {
        self.service.resolve_caller(user_id, email).await
    }

    async fn get_profile(&self, caller: &AuthContext) -> Result<UserProfile, DistributionError> {
        self.service.get_my_profile(caller).await
    }

    async fn update_profile(
        &self,
        caller: &AuthContext,
        update: ProfileUpdate,
    ) -> Result<UserProfile, DistributionError> {
        self.service.update_my_profile(caller, update).await
    }

    async fn set_profile_lock(
        &self,
        caller: &AuthContext,
        user_id: Uuid,
        locked: bool,
    ) -> Result<UserProfile, DistributionError> {
        self.service.set_profile_lock(caller, user_id, locked).await
    }

    async fn has_permission(
        &self,
        role: Role,
        permission: &str,
    ) -> Result<bool, DistributionError> {
        self.service.role_has_permission(role, permission).await
    }

    async fn assign_role(
        &self,
        caller: &AuthContext,
        user_id: Uuid,
        role: Role,
    ) -> Result<UserProfile, DistributionError> {
        self.service.assign_role(caller, user_id, role).await
    }

    async fn reset_role_defaults(
        &self,
        caller: &AuthContext,
        role: Role,
    ) -> Result<Vec<String>, DistributionError> {
        self.service.reset_role_defaults(caller, role).await
    }

    async fn verify_role_permissions(
        &self,
        caller: &AuthContext,
        role: Role,
    ) -> Result<RolePermissionReport, DistributionError> {
        self.service.verify_role_permissions(caller, role).await
    }

    async fn label_roster(
        &self,
        caller: &AuthContext,
        label_admin_id: Option<Uuid>,
    ) -> Result<Vec<UserProfile>, DistributionError> {
        self.service.label_roster(caller, label_admin_id).await
    }

    async fn request_artist_affiliation(
        &self,
        caller: &AuthContext,
        artist_id: Uuid,
        message: Option<String>,
    ) -> Result<ArtistRequest, DistributionError> {
        self.service
            .request_artist_affiliation(caller, artist_id, message)
            .await
    }

    async fn review_artist_request(
        &self,
        caller: &AuthContext,
        request_id: Uuid,
        status: ArtistRequestStatus,
        notes: Option<String>,
    ) -> Result<ArtistRequest, DistributionError> {
        self.service
            .review_artist_request(caller, request_id, status, notes)
            .await
    }

    async fn create_release(
        &self,
        caller: &AuthContext,
        release: NewRelease,
    ) -> Result<Release, DistributionError> {
        self.service.create_release(caller, release).await
    }

    async fn get_release(
        &self,
        caller: &AuthContext,
        release_id: Uuid,
    ) -> Result<Release, DistributionError> {
        self.service.get_release(caller, release_id).await
    }

    async fn list_releases(
        &self,
        caller: &AuthContext,
        status: Option<ReleaseStatus>,
    ) -> Result<Vec<Release>, DistributionError> {
        self.service.list_releases(caller, status).await
    }

    async fn update_release_status(
        &self,
        caller: &AuthContext,
        release_id: Uuid,
        status: ReleaseStatus,
        notes: Option<String>,
    ) -> Result<StatusUpdate, DistributionError> {
        self.service
            .update_release_status(caller, release_id, status, notes)
            .await
    }

    async fn create_change_request(
        &self,
        caller: &AuthContext,
        request: NewChangeRequest,
    ) -> Result<ChangeRequest, DistributionError> {
        self.service.create_change_request(caller, request).await
    }

    async fn review_change_request(
        &self,
        caller: &AuthContext,
        request_id: Uuid,
        decision: ChangeRequestStatus,
        notes: Option<String>,
    ) -> Result<ChangeRequest, DistributionError> {
        self.service
            .review_change_request(caller, request_id, decision, notes)
            .await
    }

    async fn list_change_requests(
        &self,
        caller: &AuthContext,
        release_id: Option<Uuid>,
        status: Option<ChangeRequestStatus>,
    ) -> Result<Vec<ChangeRequest>, DistributionError> {
        self.service
            .list_change_requests(caller, release_id, status)
            .await
    }

    async fn get_split_configuration(
        &self,
        caller: &AuthContext,
    ) -> Result<SplitConfiguration, DistributionError> {
        self.service.get_split_configuration(caller).await
    }

    async fn update_split_configuration(
        &self,
        caller: &AuthContext,
        artist_percentage: Decimal,
        label_percentage: Decimal,
    ) -> Result<SplitConfig, DistributionError> {
        self.service
            .update_split_configuration(caller, artist_percentage, label_percentage)
            .await
    }

    async fn upsert_split_override(
        &self,
        caller: &AuthContext,
        party: SplitParty,
        party_id: Uuid,
        percentage: Decimal,
    ) -> Result<SplitOverride, DistributionError> {
        self.service
            .upsert_split_override(caller, party, party_id, percentage)
            .await
    }

    async fn remove_split_override(
        &self,
        caller: &AuthContext,
        party: SplitParty,
        party_id: Uuid,
    ) -> Result<(), DistributionError> {
        self.service
            .remove_split_override(caller, party, party_id)
            .await
    }

    async fn get_wallet(
        &self,
        caller: &AuthContext,
        user_id: Option<Uuid>,
    ) -> Result<WalletAccount, DistributionError> {
        self.service.get_wallet(caller, user_id).await
    }

    async fn list_wallet_transactions(
        &self,
        caller: &AuthContext,
        user_id: Option<Uuid>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<WalletTransaction>, DistributionError> {
        self.service
            .list_wallet_transactions(caller, user_id, limit, offset)
            .await
    }

    async fn admin_adjust_wallet(
        &self,
        caller: &AuthContext,
        adjustment: WalletAdjustment,
    ) -> Result<WalletAdjustmentResult, DistributionError> {
        self.service.admin_adjust_wallet(caller, adjustment).await
    }

    async fn record_earning(
        &self,
        caller: &AuthContext,
        record: EarningRecord,
    ) -> Result<EarningDistribution, DistributionError> {
        self.service.record_earning(caller, record).await
    }

    async fn get_subscription(
        &self,
        caller: &AuthContext,
    ) -> Result<Option<Subscription>, DistributionError> {
        self.service.get_subscription(caller).await
    }

    async fn pay_subscription_with_wallet(
        &self,
        caller: &AuthContext,
        plan_id: &str,
        cycle: BillingCycle,
    ) -> Result<WalletPayment, DistributionError> {
        self.service
            .pay_subscription_with_wallet(caller, plan_id, cycle)
            .await
    }

    async fn cancel_subscription(
        &self,
        caller: &AuthContext,
    ) -> Result<Subscription, DistributionError> {
        self.service.cancel_subscription(caller).await
    }

    async fn process_renewals(
        &self,
        now: DateTime<Utc>,
    ) -> Result<RenewalReport, DistributionError> {
        self.service.process_renewals(now).await
    }
}
