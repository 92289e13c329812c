//! Common test utilities: in-memory repositories and a seeded platform

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use distribution_service::contract::*;
use distribution_service::domain::repository::*;
use distribution_service::domain::wallet::{self, LedgerPosting};
use distribution_service::domain::webhook::DeliveryKey;
use distribution_service::domain::{AuditLogPublisher, Repositories, Service, ServiceSettings};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

pub const WEBHOOK_SECRET: &str = "wsk_test_secret";

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

pub fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

pub fn new_profile(role: Role, label_admin_id: Option<Uuid>) -> UserProfile {
    let id = Uuid::new_v4();
    let now = Utc::now();
    UserProfile {
        id,
        email: format!("{}-{}@example.com", role.as_str(), &id.to_string()[..8]),
        display_name: None,
        role,
        label_admin_id,
        wallet_balance: Decimal::ZERO,
        negative_balance_allowed: false,
        wallet_credit_limit: Decimal::ZERO,
        details: ProfileDetails::default(),
        locked_fields: Vec::new(),
        profile_lock_status: ProfileLockStatus::Unlocked,
        created_at: now,
        updated_at: now,
    }
}

type Shared<T> = Arc<RwLock<T>>;

// ===== Users =====

#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub data: Shared<HashMap<Uuid, UserProfile>>,
}

#[async_trait]
impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserProfile>> {
        Ok(self.data.read().get(&id).cloned())
    }

    async fn list(
        &self,
        role: Option<Role>,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<Vec<UserProfile>> {
        let mut users: Vec<UserProfile> = self
            .data
            .read()
            .values()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn upsert(&self, profile: &UserProfile) -> anyhow::Result<UserProfile> {
        self.data.write().insert(profile.id, profile.clone());
        Ok(profile.clone())
    }

    async fn update_role(&self, id: Uuid, role: Role) -> anyhow::Result<Option<UserProfile>> {
        let mut data = self.data.write();
        Ok(data.get_mut(&id).map(|user| {
            user.role = role;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn update_profile(&self, profile: &UserProfile) -> anyhow::Result<Option<UserProfile>> {
        let mut data = self.data.write();
        Ok(data.get_mut(&profile.id).map(|user| {
            user.display_name = profile.display_name.clone();
            user.details = profile.details.clone();
            user.locked_fields = profile.locked_fields.clone();
            user.profile_lock_status = profile.profile_lock_status;
            user.updated_at = profile.updated_at;
            user.clone()
        }))
    }

    async fn roster(&self, label_admin_id: Uuid) -> anyhow::Result<Vec<UserProfile>> {
        let mut artists: Vec<UserProfile> = self
            .data
            .read()
            .values()
            .filter(|u| u.role == Role::Artist && u.label_admin_id == Some(label_admin_id))
            .cloned()
            .collect();
        artists.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(artists)
    }
}

// ===== Artist requests =====

#[derive(Clone, Default)]
pub struct MockArtistRequestRepo {
    pub users: Shared<HashMap<Uuid, UserProfile>>,
    pub requests: Shared<HashMap<Uuid, ArtistRequest>>,
}

#[async_trait]
impl ArtistRequestRepository for MockArtistRequestRepo {
    async fn create(&self, request: &ArtistRequest) -> anyhow::Result<ArtistRequest> {
        self.requests.write().insert(request.id, request.clone());
        Ok(request.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<ArtistRequest>> {
        Ok(self.requests.read().get(&id).cloned())
    }

    async fn list(&self, filter: &ArtistRequestFilter) -> anyhow::Result<Vec<ArtistRequest>> {
        let mut requests: Vec<ArtistRequest> = self
            .requests
            .read()
            .values()
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .filter(|r| filter.label_admin_id.map_or(true, |id| r.label_admin_id == id))
            .filter(|r| filter.artist_id.map_or(true, |id| r.artist_id == id))
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn review(&self, reviewed: &ArtistRequest) -> anyhow::Result<Option<ArtistRequest>> {
        let mut requests = self.requests.write();
        let Some(stored) = requests
            .get_mut(&reviewed.id)
            .filter(|r| r.status == ArtistRequestStatus::Pending)
        else {
            return Ok(None);
        };

        if reviewed.status == ArtistRequestStatus::Approved {
            let mut users = self.users.write();
            let Some(artist) = users
                .get_mut(&reviewed.artist_id)
                .filter(|u| u.role == Role::Artist && u.label_admin_id.is_none())
            else {
                let err = DistributionError::conflict("Artist was signed to a label meanwhile");
                return Err(err.into());
            };
            artist.label_admin_id = Some(reviewed.label_admin_id);
            artist.updated_at = reviewed.updated_at;
        }

        *stored = reviewed.clone();
        Ok(Some(reviewed.clone()))
    }
}

// ===== Role permissions =====

#[derive(Clone, Default)]
pub struct MockPermissionRepo {
    pub data: Shared<HashMap<Role, Vec<String>>>,
}

#[async_trait]
impl RolePermissionRepository for MockPermissionRepo {
    async fn list_for_role(&self, role: Role) -> anyhow::Result<Vec<String>> {
        let mut granted = self.data.read().get(&role).cloned().unwrap_or_default();
        granted.sort();
        Ok(granted)
    }

    async fn grant(&self, role: Role, permission: &str) -> anyhow::Result<bool> {
        let mut data = self.data.write();
        let granted = data.entry(role).or_default();
        if granted.iter().any(|p| p == permission) {
            return Ok(false);
        }
        granted.push(permission.to_string());
        Ok(true)
    }

    async fn revoke(&self, role: Role, permission: &str) -> anyhow::Result<bool> {
        let mut data = self.data.write();
        let Some(granted) = data.get_mut(&role) else {
            return Ok(false);
        };
        let before = granted.len();
        granted.retain(|p| p != permission);
        Ok(granted.len() != before)
    }

    async fn replace_all(&self, role: Role, permissions: &[String]) -> anyhow::Result<()> {
        self.data.write().insert(role, permissions.to_vec());
        Ok(())
    }
}

// ===== Releases & change requests =====

#[derive(Clone, Default)]
pub struct MockReleaseRepo {
    pub releases: Shared<HashMap<Uuid, Release>>,
    pub history: Shared<Vec<StatusChange>>,
}

#[async_trait]
impl ReleaseRepository for MockReleaseRepo {
    async fn create(&self, release: &Release) -> anyhow::Result<Release> {
        self.releases.write().insert(release.id, release.clone());
        Ok(release.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Release>> {
        Ok(self.releases.read().get(&id).cloned())
    }

    async fn list(&self, filter: &ReleaseFilter) -> anyhow::Result<Vec<Release>> {
        let mut releases: Vec<Release> = self
            .releases
            .read()
            .values()
            .filter(|r| filter.artist_id.map_or(true, |id| r.artist_id == id))
            .filter(|r| filter.label_admin_id.map_or(true, |id| r.label_admin_id == Some(id)))
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        releases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(releases)
    }

    async fn apply_status_change(&self, change: &StatusChange) -> anyhow::Result<Option<Release>> {
        let mut releases = self.releases.write();
        let Some(release) = releases
            .get_mut(&change.release_id)
            .filter(|r| r.status == change.from_status)
        else {
            return Ok(None);
        };
        release.status = change.to_status;
        release.updated_at = change.changed_at;
        self.history.write().push(change.clone());
        Ok(Some(release.clone()))
    }

    async fn status_history(&self, release_id: Uuid) -> anyhow::Result<Vec<StatusChange>> {
        Ok(self
            .history
            .read()
            .iter()
            .filter(|c| c.release_id == release_id)
            .cloned()
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct MockChangeRequestRepo {
    pub releases: Shared<HashMap<Uuid, Release>>,
    pub requests: Shared<HashMap<Uuid, ChangeRequest>>,
}

#[async_trait]
impl ChangeRequestRepository for MockChangeRequestRepo {
    async fn create(&self, request: &ChangeRequest) -> anyhow::Result<ChangeRequest> {
        let mut releases = self.releases.write();
        let release = releases
            .get_mut(&request.release_id)
            .ok_or_else(|| anyhow::anyhow!("release {} missing", request.release_id))?;
        release.pending_change_requests += 1;
        self.requests.write().insert(request.id, request.clone());
        Ok(request.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<ChangeRequest>> {
        Ok(self.requests.read().get(&id).cloned())
    }

    async fn list(&self, filter: &ChangeRequestFilter) -> anyhow::Result<Vec<ChangeRequest>> {
        Ok(self
            .requests
            .read()
            .values()
            .filter(|r| filter.release_id.map_or(true, |id| r.release_id == id))
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .filter(|r| filter.requested_by.map_or(true, |id| r.requested_by == id))
            .cloned()
            .collect())
    }

    async fn review(&self, reviewed: &ChangeRequest) -> anyhow::Result<Option<ChangeRequest>> {
        let mut requests = self.requests.write();
        let Some(stored) = requests
            .get_mut(&reviewed.id)
            .filter(|r| r.status == ChangeRequestStatus::Pending)
        else {
            return Ok(None);
        };
        *stored = reviewed.clone();

        if let Some(release) = self.releases.write().get_mut(&reviewed.release_id) {
            release.pending_change_requests = (release.pending_change_requests - 1).max(0);
        }
        Ok(Some(reviewed.clone()))
    }
}

// ===== Splits =====

#[derive(Clone, Default)]
pub struct MockSplitRepo {
    pub configs: Shared<HashMap<String, SplitConfig>>,
    pub overrides: Shared<Vec<SplitOverride>>,
}

#[async_trait]
impl SplitRepository for MockSplitRepo {
    async fn get_config(&self, company_id: &str) -> anyhow::Result<Option<SplitConfig>> {
        Ok(self.configs.read().get(company_id).cloned())
    }

    async fn save_config(&self, config: &SplitConfig) -> anyhow::Result<SplitConfig> {
        self.configs
            .write()
            .insert(config.company_id.clone(), config.clone());
        Ok(config.clone())
    }

    async fn active_override(
        &self,
        party: SplitParty,
        party_id: Uuid,
    ) -> anyhow::Result<Option<SplitOverride>> {
        Ok(self
            .overrides
            .read()
            .iter()
            .find(|o| o.party == party && o.party_id == party_id && o.is_active)
            .cloned())
    }

    async fn list_active_overrides(&self) -> anyhow::Result<Vec<SplitOverride>> {
        Ok(self
            .overrides
            .read()
            .iter()
            .filter(|o| o.is_active)
            .cloned()
            .collect())
    }

    async fn upsert_override(
        &self,
        split_override: &SplitOverride,
    ) -> anyhow::Result<SplitOverride> {
        let mut overrides = self.overrides.write();
        overrides.retain(|o| {
            !(o.party == split_override.party && o.party_id == split_override.party_id)
        });
        overrides.push(split_override.clone());
        Ok(split_override.clone())
    }

    async fn deactivate_override(
        &self,
        party: SplitParty,
        party_id: Uuid,
        effective_until: DateTime<Utc>,
    ) -> anyhow::Result<bool> {
        let mut overrides = self.overrides.write();
        let mut found = false;
        for o in overrides
            .iter_mut()
            .filter(|o| o.party == party && o.party_id == party_id && o.is_active)
        {
            o.is_active = false;
            o.effective_until = Some(effective_until);
            found = true;
        }
        Ok(found)
    }
}

// ===== Wallets, ledger & subscriptions =====

#[derive(Clone, Default)]
pub struct MockFinanceRepo {
    pub users: Shared<HashMap<Uuid, UserProfile>>,
    pub ledger: Shared<Vec<WalletTransaction>>,
    pub subscriptions: Shared<HashMap<Uuid, Subscription>>,
    pub deliveries: Shared<HashSet<DeliveryKey>>,
}

fn account_of(user: &UserProfile) -> WalletAccount {
    WalletAccount {
        user_id: user.id,
        balance: user.wallet_balance,
        negative_balance_allowed: user.negative_balance_allowed,
        credit_limit: user.wallet_credit_limit,
    }
}

impl MockFinanceRepo {
    /// Apply postings to a copy of the users map; the caller commits the copy
    fn apply_all(
        users: &mut HashMap<Uuid, UserProfile>,
        postings: &[LedgerPosting],
    ) -> anyhow::Result<Vec<WalletTransaction>> {
        let mut rows = Vec::with_capacity(postings.len());
        for posting in postings {
            let user = users
                .get_mut(&posting.user_id)
                .ok_or_else(|| DistributionError::not_found("user", posting.user_id))?;
            let account = account_of(user);
            let balance_after = wallet::apply_delta(&account, posting.delta, posting.policy)?;

            user.wallet_balance = balance_after;
            if let Some(limits) = posting.limits_update {
                user.negative_balance_allowed = limits.negative_balance_allowed;
                if let Some(limit) = limits.credit_limit {
                    user.wallet_credit_limit = limit;
                }
            }

            rows.push(WalletTransaction {
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
                created_at: Utc::now(),
            });
        }
        Ok(rows)
    }

    fn commit(
        &self,
        postings: &[LedgerPosting],
        subscription: Option<&Subscription>,
    ) -> anyhow::Result<Vec<WalletTransaction>> {
        let mut users = self.users.write();
        let mut staged = users.clone();
        let rows = Self::apply_all(&mut staged, postings)?;

        *users = staged;
        self.ledger.write().extend(rows.iter().cloned());
        if let Some(sub) = subscription {
            self.subscriptions.write().insert(sub.id, sub.clone());
        }
        Ok(rows)
    }
}

#[async_trait]
impl FinanceRepository for MockFinanceRepo {
    async fn account(&self, user_id: Uuid) -> anyhow::Result<Option<WalletAccount>> {
        Ok(self.users.read().get(&user_id).map(account_of))
    }

    async fn post_entries(
        &self,
        postings: &[LedgerPosting],
    ) -> anyhow::Result<Vec<WalletTransaction>> {
        self.commit(postings, None)
    }

    async fn post_entries_once(
        &self,
        key: &DeliveryKey,
        postings: &[LedgerPosting],
    ) -> anyhow::Result<Option<Vec<WalletTransaction>>> {
        let mut deliveries = self.deliveries.write();
        if deliveries.contains(key) {
            return Ok(None);
        }
        let rows = self.commit(postings, None)?;
        deliveries.insert(key.clone());
        Ok(Some(rows))
    }

    async fn transactions(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<Vec<WalletTransaction>> {
        Ok(self
            .ledger
            .read()
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_active_subscription(
        &self,
        user_id: Uuid,
    ) -> anyhow::Result<Option<Subscription>> {
        Ok(self
            .subscriptions
            .read()
            .values()
            .find(|s| s.user_id == user_id && s.status == SubscriptionStatus::Active)
            .cloned())
    }

    async fn latest_subscription(&self, user_id: Uuid) -> anyhow::Result<Option<Subscription>> {
        Ok(self
            .subscriptions
            .read()
            .values()
            .filter(|s| s.user_id == user_id)
            .max_by_key(|s| s.updated_at)
            .cloned())
    }

    async fn save_subscription(&self, subscription: &Subscription) -> anyhow::Result<Subscription> {
        self.subscriptions
            .write()
            .insert(subscription.id, subscription.clone());
        Ok(subscription.clone())
    }

    async fn settle_subscription(
        &self,
        posting: Option<&LedgerPosting>,
        subscription: &Subscription,
        guard: SettleGuard<'_>,
    ) -> anyhow::Result<Option<(Subscription, Option<WalletTransaction>)>> {
        let mut deliveries = self.deliveries.write();
        if let Some(expected) = guard.expected {
            let unchanged = self
                .subscriptions
                .read()
                .get(&expected.id)
                .map_or(false, |s| guard.matches(s.status, s.current_period_end));
            if !unchanged {
                return Ok(None);
            }
        }
        if guard.delivery.is_some_and(|key| deliveries.contains(key)) {
            return Ok(None);
        }

        let postings: Vec<LedgerPosting> = posting.into_iter().cloned().collect();
        let rows = self.commit(&postings, Some(subscription))?;
        if let Some(key) = guard.delivery {
            deliveries.insert(key.clone());
        }
        Ok(Some((subscription.clone(), rows.into_iter().next())))
    }

    async fn due_for_renewal(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Subscription>> {
        Ok(self
            .subscriptions
            .read()
            .values()
            .filter(|s| {
                s.status == SubscriptionStatus::Active
                    && s.auto_renew
                    && s.current_period_end <= now
            })
            .cloned()
            .collect())
    }
}

// ===== Audit & webhook logs =====

#[derive(Clone, Default)]
pub struct MockAuditRepo {
    pub entries: Shared<Vec<AuditEntry>>,
    pub webhooks: Shared<Vec<WebhookLog>>,
}

impl MockAuditRepo {
    pub fn events_of(&self, event_type: &str) -> Vec<AuditEntry> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    pub fn webhook_statuses(&self) -> Vec<String> {
        self.webhooks.read().iter().map(|w| w.status.clone()).collect()
    }
}

#[async_trait]
impl AuditRepository for MockAuditRepo {
    async fn record(&self, entry: &AuditEntry) -> anyhow::Result<()> {
        self.entries.write().push(entry.clone());
        Ok(())
    }

    async fn list(
        &self,
        filter: &AuditFilter,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<Vec<AuditEntry>> {
        Ok(self
            .entries
            .read()
            .iter()
            .rev()
            .filter(|e| {
                filter
                    .event_type
                    .as_ref()
                    .map_or(true, |t| &e.event_type == t)
            })
            .filter(|e| filter.user_id.map_or(true, |id| e.user_id == Some(id)))
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn record_webhook(&self, log: &WebhookLog) -> anyhow::Result<()> {
        self.webhooks.write().push(log.clone());
        Ok(())
    }

    async fn webhook_processed(
        &self,
        provider: &str,
        order_id: &str,
        event_type: &str,
    ) -> anyhow::Result<bool> {
        Ok(self.webhooks.read().iter().any(|w| {
            w.provider == provider
                && w.order_id.as_deref() == Some(order_id)
                && w.event_type == event_type
                && w.status == "processed"
        }))
    }
}

// ===== Platform fixture =====

/// Service wired to in-memory repositories, with default role permissions seeded
pub struct TestPlatform {
    pub service: Arc<Service>,
    pub users: MockUserRepo,
    pub permissions: MockPermissionRepo,
    pub releases: MockReleaseRepo,
    pub change_requests: MockChangeRequestRepo,
    pub artist_requests: MockArtistRequestRepo,
    pub splits: MockSplitRepo,
    pub finance: MockFinanceRepo,
    pub audit: MockAuditRepo,
    pub master_admin: Uuid,
}

impl TestPlatform {
    pub async fn new() -> Self {
        let master_admin = Uuid::new_v4();
        Self::with_settings(ServiceSettings {
            master_admin_id: Some(master_admin),
            revolut_webhook_secret: Some(WEBHOOK_SECRET.to_string()),
            ..ServiceSettings::default()
        })
        .await
    }

    pub async fn with_settings(settings: ServiceSettings) -> Self {
        let user_data: Shared<HashMap<Uuid, UserProfile>> = Arc::default();
        let release_data: Shared<HashMap<Uuid, Release>> = Arc::default();

        let users = MockUserRepo {
            data: user_data.clone(),
        };
        let permissions = MockPermissionRepo::default();
        let releases = MockReleaseRepo {
            releases: release_data.clone(),
            history: Arc::default(),
        };
        let change_requests = MockChangeRequestRepo {
            releases: release_data,
            requests: Arc::default(),
        };
        let artist_requests = MockArtistRequestRepo {
            users: user_data.clone(),
            requests: Arc::default(),
        };
        let splits = MockSplitRepo::default();
        let finance = MockFinanceRepo {
            users: user_data,
            ledger: Arc::default(),
            subscriptions: Arc::default(),
            deliveries: Arc::default(),
        };
        let audit = MockAuditRepo::default();

        let repos = Repositories {
            users: Arc::new(users.clone()),
            permissions: Arc::new(permissions.clone()),
            releases: Arc::new(releases.clone()),
            change_requests: Arc::new(change_requests.clone()),
            artist_requests: Arc::new(artist_requests.clone()),
            splits: Arc::new(splits.clone()),
            finance: Arc::new(finance.clone()),
            audit: Arc::new(audit.clone()),
        };
        let publisher = Arc::new(AuditLogPublisher::new(repos.audit.clone()));
        let master_admin = settings.master_admin_id.unwrap_or_else(Uuid::new_v4);
        let service = Arc::new(Service::new(repos, publisher, settings));
        service.seed_default_permissions().await.unwrap();

        Self {
            service,
            users,
            permissions,
            releases,
            change_requests,
            artist_requests,
            splits,
            finance,
            audit,
            master_admin,
        }
    }

    pub fn add_profile(&self, profile: UserProfile) -> UserProfile {
        self.users.data.write().insert(profile.id, profile.clone());
        profile
    }

    /// Create a user with `role` and return their auth context
    pub async fn user(&self, role: Role) -> AuthContext {
        let profile = self.add_profile(new_profile(role, None));
        self.caller(profile.id).await
    }

    /// Artist signed to `label_admin_id`
    pub async fn signed_artist(&self, label_admin_id: Uuid) -> AuthContext {
        let profile = self.add_profile(new_profile(Role::Artist, Some(label_admin_id)));
        self.caller(profile.id).await
    }

    /// The configured master admin, as a super admin
    pub async fn master_admin(&self) -> AuthContext {
        let mut profile = new_profile(Role::SuperAdmin, None);
        profile.id = self.master_admin;
        self.add_profile(profile);
        self.caller(self.master_admin).await
    }

    pub async fn caller(&self, user_id: Uuid) -> AuthContext {
        self.service.resolve_caller(user_id, None).await.unwrap()
    }

    pub fn set_balance(&self, user_id: Uuid, balance: Decimal) {
        if let Some(user) = self.users.data.write().get_mut(&user_id) {
            user.wallet_balance = balance;
        }
    }

    pub fn balance(&self, user_id: Uuid) -> Decimal {
        self.users
            .data
            .read()
            .get(&user_id)
            .map(|u| u.wallet_balance)
            .unwrap_or_default()
    }

    pub fn ledger_for(&self, user_id: Uuid) -> Vec<WalletTransaction> {
        self.finance
            .ledger
            .read()
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }
}
