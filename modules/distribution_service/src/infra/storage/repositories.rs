//! SeaORM repository implementations

use crate::contract::{
    ArtistRequest, ArtistRequestFilter, ArtistRequestStatus, AuditEntry, ChangeRequest,
    ChangeRequestFilter, ChangeRequestStatus, DistributionError, Release, ReleaseFilter, Role,
    SplitConfig, SplitOverride, SplitParty, StatusChange, Subscription, SubscriptionStatus,
    UserProfile, WalletAccount, WalletTransaction, WebhookLog,
};
use crate::domain::repository::{
    ArtistRequestRepository, AuditFilter, AuditRepository, ChangeRequestRepository,
    FinanceRepository, ReleaseRepository, RolePermissionRepository, SettleGuard, SplitRepository,
    UserRepository,
};
use crate::domain::wallet::{self, LedgerPosting};
use crate::domain::webhook::DeliveryKey;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    prelude::Expr, sea_query::OnConflict, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::entity::{
    artist_request, audit_log, change_request, processed_webhook, release,
    release_status_history, revenue_split, revenue_split_config, role_permission, subscription,
    user_profile, wallet_transaction, webhook_log,
};
use super::mapper;

// ===== User Repository =====

pub struct SeaOrmUserRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>> {
        user_profile::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(UserProfile::try_from)
            .transpose()
    }

    async fn list(&self, role: Option<Role>, limit: u64, offset: u64) -> Result<Vec<UserProfile>> {
        let mut query = user_profile::Entity::find();
        if let Some(role) = role {
            query = query.filter(user_profile::Column::Role.eq(role.as_str()));
        }

        query
            .order_by_asc(user_profile::Column::CreatedAt)
            .order_by_asc(user_profile::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(UserProfile::try_from)
            .collect()
    }

    async fn upsert(&self, profile: &UserProfile) -> Result<UserProfile> {
        let exists = user_profile::Entity::find_by_id(profile.id)
            .count(&*self.db)
            .await?
            > 0;

        let active: user_profile::ActiveModel = profile.into();
        let result = if exists {
            user_profile::Entity::update(active).exec(&*self.db).await?
        } else {
            user_profile::Entity::insert(active)
                .exec_with_returning(&*self.db)
                .await?
        };

        result.try_into()
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<Option<UserProfile>> {
        let updated = user_profile::Entity::update_many()
            .col_expr(user_profile::Column::Role, Expr::value(role.as_str()))
            .col_expr(user_profile::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user_profile::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;

        if updated.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn update_profile(&self, profile: &UserProfile) -> Result<Option<UserProfile>> {
        let updated = user_profile::Entity::update_many()
            .set(mapper::profile_update(profile))
            .filter(user_profile::Column::Id.eq(profile.id))
            .exec(&*self.db)
            .await?;

        if updated.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(profile.id).await
    }

    async fn roster(&self, label_admin_id: Uuid) -> Result<Vec<UserProfile>> {
        user_profile::Entity::find()
            .filter(user_profile::Column::LabelAdminId.eq(label_admin_id))
            .filter(user_profile::Column::Role.eq(Role::Artist.as_str()))
            .order_by_asc(user_profile::Column::CreatedAt)
            .order_by_asc(user_profile::Column::Id)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(UserProfile::try_from)
            .collect()
    }
}

// ===== Role Permission Repository =====

pub struct SeaOrmRolePermissionRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmRolePermissionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn permission_row(role: Role, permission: &str) -> role_permission::ActiveModel {
    role_permission::ActiveModel {
        role: Set(role.as_str().to_string()),
        permission: Set(permission.to_string()),
        created_at: Set(Utc::now()),
    }
}

#[async_trait]
impl RolePermissionRepository for SeaOrmRolePermissionRepository {
    async fn list_for_role(&self, role: Role) -> Result<Vec<String>> {
        let rows = role_permission::Entity::find()
            .filter(role_permission::Column::Role.eq(role.as_str()))
            .order_by_asc(role_permission::Column::Permission)
            .all(&*self.db)
            .await?;

        Ok(rows.into_iter().map(|r| r.permission).collect())
    }

    async fn grant(&self, role: Role, permission: &str) -> Result<bool> {
        let key = (role.as_str().to_string(), permission.to_string());
        let exists = role_permission::Entity::find_by_id(key)
            .count(&*self.db)
            .await?
            > 0;
        if exists {
            return Ok(false);
        }

        role_permission::Entity::insert(permission_row(role, permission))
            .exec_without_returning(&*self.db)
            .await?;
        Ok(true)
    }

    async fn revoke(&self, role: Role, permission: &str) -> Result<bool> {
        let result = role_permission::Entity::delete_many()
            .filter(role_permission::Column::Role.eq(role.as_str()))
            .filter(role_permission::Column::Permission.eq(permission))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn replace_all(&self, role: Role, permissions: &[String]) -> Result<()> {
        let txn = self.db.begin().await?;

        role_permission::Entity::delete_many()
            .filter(role_permission::Column::Role.eq(role.as_str()))
            .exec(&txn)
            .await?;

        if !permissions.is_empty() {
            role_permission::Entity::insert_many(
                permissions.iter().map(|p| permission_row(role, p)),
            )
            .exec_without_returning(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }
}

// ===== Release Repository =====

pub struct SeaOrmReleaseRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmReleaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReleaseRepository for SeaOrmReleaseRepository {
    async fn create(&self, release: &Release) -> Result<Release> {
        let active: release::ActiveModel = release.into();
        release::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?
            .try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Release>> {
        release::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(Release::try_from)
            .transpose()
    }

    async fn list(&self, filter: &ReleaseFilter) -> Result<Vec<Release>> {
        let mut query = release::Entity::find();
        if let Some(artist_id) = filter.artist_id {
            query = query.filter(release::Column::ArtistId.eq(artist_id));
        }
        if let Some(label_admin_id) = filter.label_admin_id {
            query = query.filter(release::Column::LabelAdminId.eq(label_admin_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(release::Column::Status.eq(status.as_str()));
        }

        query
            .order_by_desc(release::Column::CreatedAt)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(Release::try_from)
            .collect()
    }

    async fn apply_status_change(&self, change: &StatusChange) -> Result<Option<Release>> {
        let txn = self.db.begin().await?;

        // conditional on the status the caller validated against
        let updated = release::Entity::update_many()
            .col_expr(release::Column::Status, Expr::value(change.to_status.as_str()))
            .col_expr(release::Column::UpdatedAt, Expr::value(change.changed_at))
            .filter(release::Column::Id.eq(change.release_id))
            .filter(release::Column::Status.eq(change.from_status.as_str()))
            .exec(&txn)
            .await?;

        if updated.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        let history: release_status_history::ActiveModel = change.into();
        release_status_history::Entity::insert(history)
            .exec_without_returning(&txn)
            .await?;

        let release = release::Entity::find_by_id(change.release_id)
            .one(&txn)
            .await?
            .map(Release::try_from)
            .transpose()?;

        txn.commit().await?;
        Ok(release)
    }

    async fn status_history(&self, release_id: Uuid) -> Result<Vec<StatusChange>> {
        release_status_history::Entity::find()
            .filter(release_status_history::Column::ReleaseId.eq(release_id))
            .order_by_asc(release_status_history::Column::ChangedAt)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(StatusChange::try_from)
            .collect()
    }
}

// ===== Change Request Repository =====

pub struct SeaOrmChangeRequestRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmChangeRequestRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChangeRequestRepository for SeaOrmChangeRequestRepository {
    async fn create(&self, request: &ChangeRequest) -> Result<ChangeRequest> {
        let txn = self.db.begin().await?;

        let active: change_request::ActiveModel = request.into();
        let created = change_request::Entity::insert(active)
            .exec_with_returning(&txn)
            .await?;

        release::Entity::update_many()
            .col_expr(
                release::Column::PendingChangeRequests,
                Expr::col(release::Column::PendingChangeRequests).add(1),
            )
            .col_expr(release::Column::UpdatedAt, Expr::value(request.created_at))
            .filter(release::Column::Id.eq(request.release_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        created.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChangeRequest>> {
        change_request::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(ChangeRequest::try_from)
            .transpose()
    }

    async fn list(&self, filter: &ChangeRequestFilter) -> Result<Vec<ChangeRequest>> {
        let mut query = change_request::Entity::find();
        if let Some(release_id) = filter.release_id {
            query = query.filter(change_request::Column::ReleaseId.eq(release_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(change_request::Column::Status.eq(status.as_str()));
        }
        if let Some(requested_by) = filter.requested_by {
            query = query.filter(change_request::Column::RequestedBy.eq(requested_by));
        }

        query
            .order_by_desc(change_request::Column::UrgencyLevel)
            .order_by_desc(change_request::Column::CreatedAt)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(ChangeRequest::try_from)
            .collect()
    }

    async fn review(&self, reviewed: &ChangeRequest) -> Result<Option<ChangeRequest>> {
        let txn = self.db.begin().await?;

        let updated = change_request::Entity::update_many()
            .col_expr(change_request::Column::Status, Expr::value(reviewed.status.as_str()))
            .col_expr(change_request::Column::ReviewedBy, Expr::value(reviewed.reviewed_by))
            .col_expr(change_request::Column::ReviewedAt, Expr::value(reviewed.reviewed_at))
            .col_expr(
                change_request::Column::ReviewNotes,
                Expr::value(reviewed.review_notes.clone()),
            )
            .col_expr(change_request::Column::UpdatedAt, Expr::value(reviewed.updated_at))
            .filter(change_request::Column::Id.eq(reviewed.id))
            .filter(change_request::Column::Status.eq(ChangeRequestStatus::Pending.as_str()))
            .exec(&txn)
            .await?;

        if updated.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        release::Entity::update_many()
            .col_expr(
                release::Column::PendingChangeRequests,
                Expr::col(release::Column::PendingChangeRequests).sub(1),
            )
            .filter(release::Column::Id.eq(reviewed.release_id))
            .filter(release::Column::PendingChangeRequests.gt(0))
            .exec(&txn)
            .await?;

        let stored = change_request::Entity::find_by_id(reviewed.id)
            .one(&txn)
            .await?
            .map(ChangeRequest::try_from)
            .transpose()?;

        txn.commit().await?;
        Ok(stored)
    }
}

// ===== Artist Request Repository =====

pub struct SeaOrmArtistRequestRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmArtistRequestRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ArtistRequestRepository for SeaOrmArtistRequestRepository {
    async fn create(&self, request: &ArtistRequest) -> Result<ArtistRequest> {
        let active: artist_request::ActiveModel = request.into();
        artist_request::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?
            .try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ArtistRequest>> {
        artist_request::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(ArtistRequest::try_from)
            .transpose()
    }

    async fn list(&self, filter: &ArtistRequestFilter) -> Result<Vec<ArtistRequest>> {
        let mut query = artist_request::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(artist_request::Column::Status.eq(status.as_str()));
        }
        if let Some(label_admin_id) = filter.label_admin_id {
            query = query.filter(artist_request::Column::LabelAdminId.eq(label_admin_id));
        }
        if let Some(artist_id) = filter.artist_id {
            query = query.filter(artist_request::Column::ArtistId.eq(artist_id));
        }

        query
            .order_by_desc(artist_request::Column::CreatedAt)
            .order_by_desc(artist_request::Column::Id)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(ArtistRequest::try_from)
            .collect()
    }

    async fn review(&self, reviewed: &ArtistRequest) -> Result<Option<ArtistRequest>> {
        let txn = self.db.begin().await?;

        let updated = artist_request::Entity::update_many()
            .col_expr(artist_request::Column::Status, Expr::value(reviewed.status.as_str()))
            .col_expr(artist_request::Column::ReviewedBy, Expr::value(reviewed.reviewed_by))
            .col_expr(artist_request::Column::ReviewedAt, Expr::value(reviewed.reviewed_at))
            .col_expr(
                artist_request::Column::ReviewNotes,
                Expr::value(reviewed.review_notes.clone()),
            )
            .col_expr(artist_request::Column::UpdatedAt, Expr::value(reviewed.updated_at))
            .filter(artist_request::Column::Id.eq(reviewed.id))
            .filter(artist_request::Column::Status.eq(ArtistRequestStatus::Pending.as_str()))
            .exec(&txn)
            .await?;

        if updated.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        if reviewed.status == ArtistRequestStatus::Approved {
            let signed = user_profile::Entity::update_many()
                .col_expr(
                    user_profile::Column::LabelAdminId,
                    Expr::value(Some(reviewed.label_admin_id)),
                )
                .col_expr(user_profile::Column::UpdatedAt, Expr::value(reviewed.updated_at))
                .filter(user_profile::Column::Id.eq(reviewed.artist_id))
                .filter(user_profile::Column::Role.eq(Role::Artist.as_str()))
                .filter(user_profile::Column::LabelAdminId.is_null())
                .exec(&txn)
                .await?;

            if signed.rows_affected == 0 {
                txn.rollback().await?;
                let err = DistributionError::conflict("Artist was signed to a label meanwhile");
                return Err(err.into());
            }
        }

        let stored = artist_request::Entity::find_by_id(reviewed.id)
            .one(&txn)
            .await?
            .map(ArtistRequest::try_from)
            .transpose()?;

        txn.commit().await?;
        Ok(stored)
    }
}

// ===== Split Repository =====

pub struct SeaOrmSplitRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmSplitRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SplitRepository for SeaOrmSplitRepository {
    async fn get_config(&self, company_id: &str) -> Result<Option<SplitConfig>> {
        let result = revenue_split_config::Entity::find_by_id(company_id.to_string())
            .one(&*self.db)
            .await?;

        Ok(result.map(Into::into))
    }

    async fn save_config(&self, config: &SplitConfig) -> Result<SplitConfig> {
        let exists = revenue_split_config::Entity::find_by_id(config.company_id.clone())
            .count(&*self.db)
            .await?
            > 0;

        let active: revenue_split_config::ActiveModel = config.into();
        let result = if exists {
            revenue_split_config::Entity::update(active)
                .exec(&*self.db)
                .await?
        } else {
            revenue_split_config::Entity::insert(active)
                .exec_with_returning(&*self.db)
                .await?
        };

        Ok(result.into())
    }

    async fn active_override(
        &self,
        party: SplitParty,
        party_id: Uuid,
    ) -> Result<Option<SplitOverride>> {
        revenue_split::Entity::find()
            .filter(revenue_split::Column::Party.eq(party.as_str()))
            .filter(revenue_split::Column::PartyId.eq(party_id))
            .filter(revenue_split::Column::IsActive.eq(true))
            .one(&*self.db)
            .await?
            .map(SplitOverride::try_from)
            .transpose()
    }

    async fn list_active_overrides(&self) -> Result<Vec<SplitOverride>> {
        revenue_split::Entity::find()
            .filter(revenue_split::Column::IsActive.eq(true))
            .order_by_asc(revenue_split::Column::Party)
            .order_by_desc(revenue_split::Column::EffectiveFrom)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(SplitOverride::try_from)
            .collect()
    }

    async fn upsert_override(&self, split_override: &SplitOverride) -> Result<SplitOverride> {
        let existing = revenue_split::Entity::find()
            .filter(revenue_split::Column::Party.eq(split_override.party.as_str()))
            .filter(revenue_split::Column::PartyId.eq(split_override.party_id))
            .one(&*self.db)
            .await?;

        let result = match existing {
            Some(row) => {
                let mut active: revenue_split::ActiveModel = split_override.into();
                active.id = Set(row.id);
                revenue_split::Entity::update(active).exec(&*self.db).await?
            }
            None => {
                let active: revenue_split::ActiveModel = split_override.into();
                revenue_split::Entity::insert(active)
                    .exec_with_returning(&*self.db)
                    .await?
            }
        };

        result.try_into()
    }

    async fn deactivate_override(
        &self,
        party: SplitParty,
        party_id: Uuid,
        effective_until: DateTime<Utc>,
    ) -> Result<bool> {
        let result = revenue_split::Entity::update_many()
            .col_expr(revenue_split::Column::IsActive, Expr::value(false))
            .col_expr(
                revenue_split::Column::EffectiveUntil,
                Expr::value(Some(effective_until)),
            )
            .filter(revenue_split::Column::Party.eq(party.as_str()))
            .filter(revenue_split::Column::PartyId.eq(party_id))
            .filter(revenue_split::Column::IsActive.eq(true))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

// ===== Finance Repository =====

pub struct SeaOrmFinanceRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmFinanceRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// Apply one posting on `conn`: lock the profile, check the balance rules,
/// update the cached balance and append the ledger row.
async fn apply_posting<C: ConnectionTrait>(
    conn: &C,
    posting: &LedgerPosting,
) -> Result<WalletTransaction> {
    let profile = user_profile::Entity::find_by_id(posting.user_id)
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| DistributionError::not_found("user", posting.user_id))?;

    let account = WalletAccount::from(&profile);
    let balance_after = wallet::apply_delta(&account, posting.delta, posting.policy)?;
    let now = Utc::now();

    let mut update = mapper::balance_update(&profile, balance_after, now);
    if let Some(limits) = posting.limits_update {
        update.negative_balance_allowed = Set(limits.negative_balance_allowed);
        if let Some(limit) = limits.credit_limit {
            update.wallet_credit_limit = Set(limit);
        }
    }
    user_profile::Entity::update(update).exec(conn).await?;

    let transaction = WalletTransaction {
        id: Uuid::new_v4(),
        user_id: posting.user_id,
        kind: posting.kind,
        amount: posting.delta,
        currency: posting.currency.clone(),
        balance_before: account.balance,
        balance_after,
        description: posting.description.clone(),
        reference: posting.reference.clone(),
        created_by: posting.created_by,
        created_at: now,
    };
    let row: wallet_transaction::ActiveModel = (&transaction).into();
    wallet_transaction::Entity::insert(row)
        .exec_without_returning(conn)
        .await?;

    Ok(transaction)
}

/// Insert the delivery key on `conn`; false when it is already present
async fn claim_delivery<C: ConnectionTrait>(conn: &C, key: &DeliveryKey) -> Result<bool> {
    let row = processed_webhook::ActiveModel {
        provider: Set(key.provider.clone()),
        order_id: Set(key.order_id.clone()),
        event_type: Set(key.event_type.clone()),
        processed_at: Set(Utc::now()),
    };

    let inserted = processed_webhook::Entity::insert(row)
        .on_conflict(
            OnConflict::columns([
                processed_webhook::Column::Provider,
                processed_webhook::Column::OrderId,
                processed_webhook::Column::EventType,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    Ok(inserted > 0)
}

async fn store_subscription<C: ConnectionTrait>(
    conn: &C,
    subscription: &Subscription,
) -> Result<Subscription> {
    let exists = subscription::Entity::find_by_id(subscription.id)
        .count(conn)
        .await?
        > 0;

    let active: subscription::ActiveModel = subscription.into();
    let result = if exists {
        subscription::Entity::update(active).exec(conn).await?
    } else {
        subscription::Entity::insert(active)
            .exec_with_returning(conn)
            .await?
    };

    result.try_into()
}

#[async_trait]
impl FinanceRepository for SeaOrmFinanceRepository {
    async fn account(&self, user_id: Uuid) -> Result<Option<WalletAccount>> {
        let profile = user_profile::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await?;

        Ok(profile.as_ref().map(WalletAccount::from))
    }

    async fn post_entries(&self, postings: &[LedgerPosting]) -> Result<Vec<WalletTransaction>> {
        let txn = self.db.begin().await?;

        let mut transactions = Vec::with_capacity(postings.len());
        for posting in postings {
            // an error drops `txn`, rolling back every earlier posting
            transactions.push(apply_posting(&txn, posting).await?);
        }

        txn.commit().await?;
        Ok(transactions)
    }

    async fn post_entries_once(
        &self,
        key: &DeliveryKey,
        postings: &[LedgerPosting],
    ) -> Result<Option<Vec<WalletTransaction>>> {
        let txn = self.db.begin().await?;

        if !claim_delivery(&txn, key).await? {
            txn.rollback().await?;
            return Ok(None);
        }

        let mut transactions = Vec::with_capacity(postings.len());
        for posting in postings {
            // a rejected posting also releases the claim
            transactions.push(apply_posting(&txn, posting).await?);
        }

        txn.commit().await?;
        Ok(Some(transactions))
    }

    async fn transactions(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<WalletTransaction>> {
        wallet_transaction::Entity::find()
            .filter(wallet_transaction::Column::UserId.eq(user_id))
            .order_by_desc(wallet_transaction::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(WalletTransaction::try_from)
            .collect()
    }

    async fn find_active_subscription(&self, user_id: Uuid) -> Result<Option<Subscription>> {
        subscription::Entity::find()
            .filter(subscription::Column::UserId.eq(user_id))
            .filter(subscription::Column::Status.eq(SubscriptionStatus::Active.as_str()))
            .order_by_desc(subscription::Column::UpdatedAt)
            .one(&*self.db)
            .await?
            .map(Subscription::try_from)
            .transpose()
    }

    async fn latest_subscription(&self, user_id: Uuid) -> Result<Option<Subscription>> {
        subscription::Entity::find()
            .filter(subscription::Column::UserId.eq(user_id))
            .order_by_desc(subscription::Column::UpdatedAt)
            .one(&*self.db)
            .await?
            .map(Subscription::try_from)
            .transpose()
    }

    async fn save_subscription(&self, subscription: &Subscription) -> Result<Subscription> {
        store_subscription(&*self.db, subscription).await
    }

    async fn settle_subscription(
        &self,
        posting: Option<&LedgerPosting>,
        subscription: &Subscription,
        guard: SettleGuard<'_>,
    ) -> Result<Option<(Subscription, Option<WalletTransaction>)>> {
        let txn = self.db.begin().await?;

        if let Some(expected) = guard.expected {
            let stored = subscription::Entity::find_by_id(expected.id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .map(Subscription::try_from)
                .transpose()?;
            let unchanged = stored
                .as_ref()
                .map_or(false, |s| guard.matches(s.status, s.current_period_end));
            if !unchanged {
                txn.rollback().await?;
                return Ok(None);
            }
        }

        if let Some(key) = guard.delivery {
            if !claim_delivery(&txn, key).await? {
                txn.rollback().await?;
                return Ok(None);
            }
        }

        let transaction = match posting {
            Some(posting) => Some(apply_posting(&txn, posting).await?),
            None => None,
        };
        let saved = store_subscription(&txn, subscription).await?;

        txn.commit().await?;
        Ok(Some((saved, transaction)))
    }

    async fn due_for_renewal(&self, now: DateTime<Utc>) -> Result<Vec<Subscription>> {
        subscription::Entity::find()
            .filter(subscription::Column::Status.eq(SubscriptionStatus::Active.as_str()))
            .filter(subscription::Column::AutoRenew.eq(true))
            .filter(subscription::Column::CurrentPeriodEnd.lte(now))
            .order_by_asc(subscription::Column::CurrentPeriodEnd)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(Subscription::try_from)
            .collect()
    }
}

// ===== Audit Repository =====

pub struct SeaOrmAuditRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAuditRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditRepository for SeaOrmAuditRepository {
    async fn record(&self, entry: &AuditEntry) -> Result<()> {
        let active: audit_log::ActiveModel = entry.into();
        audit_log::Entity::insert(active)
            .exec_without_returning(&*self.db)
            .await?;
        Ok(())
    }

    async fn list(&self, filter: &AuditFilter, limit: u64, offset: u64) -> Result<Vec<AuditEntry>> {
        let mut query = audit_log::Entity::find();
        if let Some(event_type) = &filter.event_type {
            query = query.filter(audit_log::Column::EventType.eq(event_type.as_str()));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(audit_log::Column::UserId.eq(user_id));
        }

        let rows = query
            .order_by_desc(audit_log::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&*self.db)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn record_webhook(&self, log: &WebhookLog) -> Result<()> {
        let active: webhook_log::ActiveModel = log.into();
        webhook_log::Entity::insert(active)
            .exec_without_returning(&*self.db)
            .await?;
        Ok(())
    }

    async fn webhook_processed(
        &self,
        provider: &str,
        order_id: &str,
        event_type: &str,
    ) -> Result<bool> {
        let count = webhook_log::Entity::find()
            .filter(webhook_log::Column::Provider.eq(provider))
            .filter(webhook_log::Column::OrderId.eq(order_id))
            .filter(webhook_log::Column::EventType.eq(event_type))
            .filter(webhook_log::Column::Status.eq("processed"))
            .count(&*self.db)
            .await?;

        Ok(count > 0)
    }
}
