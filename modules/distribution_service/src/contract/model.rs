//! Contract models for the distribution service
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use super::error::DistributionError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ===== Roles & identity =====

/// Platform role assigned to a user profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Artist,
    LabelAdmin,
    DistributionPartner,
    CompanyAdmin,
    SuperAdmin,
    FinancialAdmin,
    ContentModerator,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Artist,
        Role::LabelAdmin,
        Role::DistributionPartner,
        Role::CompanyAdmin,
        Role::SuperAdmin,
        Role::FinancialAdmin,
        Role::ContentModerator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Artist => "artist",
            Role::LabelAdmin => "label_admin",
            Role::DistributionPartner => "distribution_partner",
            Role::CompanyAdmin => "company_admin",
            Role::SuperAdmin => "super_admin",
            Role::FinancialAdmin => "financial_admin",
            Role::ContentModerator => "content_moderator",
        }
    }

    /// Human readable role name
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Artist => "Artist",
            Role::LabelAdmin => "Label Admin",
            Role::DistributionPartner => "Distribution Partner",
            Role::CompanyAdmin => "Company Admin",
            Role::SuperAdmin => "Super Admin",
            Role::FinancialAdmin => "Financial Admin",
            Role::ContentModerator => "Content Moderator",
        }
    }

    /// Privilege level used for role comparisons (higher = more privileges)
    pub fn hierarchy_level(&self) -> u8 {
        match self {
            Role::Artist => 1,
            Role::LabelAdmin
            | Role::DistributionPartner
            | Role::FinancialAdmin
            | Role::ContentModerator => 2,
            Role::CompanyAdmin => 3,
            Role::SuperAdmin => 4,
        }
    }

    pub fn is_higher_than(&self, other: Role) -> bool {
        self.hierarchy_level() > other.hierarchy_level()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| DistributionError::Validation {
                message: format!("unknown role '{}'", s),
            })
    }
}

/// User profile row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
    /// Label admin the user (an artist) is signed to
    pub label_admin_id: Option<Uuid>,
    pub wallet_balance: Decimal,
    pub negative_balance_allowed: bool,
    pub wallet_credit_limit: Decimal,
    pub details: ProfileDetails,
    /// Fields the owner can no longer change
    pub locked_fields: Vec<String>,
    pub profile_lock_status: ProfileLockStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Personal details a user keeps on their profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDetails {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileLockStatus {
    #[default]
    Unlocked,
    /// Identity fields are frozen until an administrator unlocks them
    Locked,
}

impl ProfileLockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileLockStatus::Unlocked => "unlocked",
            ProfileLockStatus::Locked => "locked",
        }
    }
}

impl fmt::Display for ProfileLockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileLockStatus {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unlocked" => Ok(ProfileLockStatus::Unlocked),
            "locked" => Ok(ProfileLockStatus::Locked),
            other => Err(DistributionError::Validation {
                message: format!("unknown profile lock status '{}'", other),
            }),
        }
    }
}

/// Profile edit. `None` leaves a field unchanged and a blank string clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    /// Lock the identity fields after applying this update
    pub lock_identity: bool,
}

/// Authenticated caller with resolved role and permissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: Role,
    /// Permission strings granted to the caller's role
    pub permissions: Vec<String>,
}

impl AuthContext {
    pub fn new(user_id: Uuid, email: Option<String>, role: Role, permissions: Vec<String>) -> Self {
        Self {
            user_id,
            email,
            role,
            permissions,
        }
    }

    /// Whether the caller holds `permission`, honoring wildcards
    pub fn can(&self, permission: &str) -> bool {
        crate::domain::rbac::has_permission(&self.permissions, permission)
    }

    /// Whether the caller holds any of `permissions`
    pub fn can_any(&self, permissions: &[&str]) -> bool {
        crate::domain::rbac::has_any_permission(&self.permissions, permissions)
    }
}

/// Result of comparing stored role permissions with the defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissionReport {
    pub role: Role,
    pub granted: Vec<String>,
    pub missing: Vec<String>,
    pub extra: Vec<String>,
}

impl RolePermissionReport {
    pub fn is_in_sync(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

// ===== Releases =====

/// Release lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseStatus {
    Draft,
    Submitted,
    InReview,
    Approved,
    Rejected,
    Completed,
    Live,
}

impl ReleaseStatus {
    pub const ALL: [ReleaseStatus; 7] = [
        ReleaseStatus::Draft,
        ReleaseStatus::Submitted,
        ReleaseStatus::InReview,
        ReleaseStatus::Approved,
        ReleaseStatus::Rejected,
        ReleaseStatus::Completed,
        ReleaseStatus::Live,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseStatus::Draft => "draft",
            ReleaseStatus::Submitted => "submitted",
            ReleaseStatus::InReview => "in_review",
            ReleaseStatus::Approved => "approved",
            ReleaseStatus::Rejected => "rejected",
            ReleaseStatus::Completed => "completed",
            ReleaseStatus::Live => "live",
        }
    }
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseStatus {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReleaseStatus::ALL
            .iter()
            .copied()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| DistributionError::Validation {
                message: "Invalid status".to_string(),
            })
    }
}

/// Release owned by an artist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub id: Uuid,
    pub artist_id: Uuid,
    pub label_admin_id: Option<Uuid>,
    pub title: String,
    pub status: ReleaseStatus,
    pub release_date: Option<NaiveDate>,
    pub pending_change_requests: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelease {
    pub title: String,
    pub release_date: Option<NaiveDate>,
}

/// Filter applied when listing releases
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseFilter {
    pub artist_id: Option<Uuid>,
    pub label_admin_id: Option<Uuid>,
    pub status: Option<ReleaseStatus>,
}

/// One entry in a release's status history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub id: Uuid,
    pub release_id: Uuid,
    pub from_status: ReleaseStatus,
    pub to_status: ReleaseStatus,
    pub changed_by: Uuid,
    pub notes: String,
    pub changed_at: DateTime<Utc>,
}

/// Outcome of a status update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub release: Release,
    pub change: StatusChange,
    pub message: &'static str,
}

// ===== Change requests =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl ChangeRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeRequestStatus::Pending => "pending",
            ChangeRequestStatus::Approved => "approved",
            ChangeRequestStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ChangeRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeRequestStatus {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ChangeRequestStatus::Pending),
            "approved" => Ok(ChangeRequestStatus::Approved),
            "rejected" => Ok(ChangeRequestStatus::Rejected),
            other => Err(DistributionError::Validation {
                message: format!("unknown change request status '{}'", other),
            }),
        }
    }
}

/// Request to change a field of a release that is no longer editable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRequest {
    pub id: Uuid,
    pub release_id: Uuid,
    pub requested_by: Uuid,
    pub request_type: String,
    pub field_name: String,
    pub current_value: Option<String>,
    pub requested_value: Option<String>,
    pub reason: String,
    pub urgency_level: i32,
    pub status: ChangeRequestStatus,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChangeRequest {
    pub release_id: Uuid,
    pub request_type: String,
    pub field_name: String,
    pub current_value: Option<String>,
    pub requested_value: Option<String>,
    pub reason: String,
    pub urgency_level: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeRequestFilter {
    pub release_id: Option<Uuid>,
    pub status: Option<ChangeRequestStatus>,
    pub requested_by: Option<Uuid>,
}

// ===== Label roster =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtistRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl ArtistRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtistRequestStatus::Pending => "pending",
            ArtistRequestStatus::Approved => "approved",
            ArtistRequestStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ArtistRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtistRequestStatus {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ArtistRequestStatus::Pending),
            "approved" => Ok(ArtistRequestStatus::Approved),
            "rejected" => Ok(ArtistRequestStatus::Rejected),
            other => Err(DistributionError::Validation {
                message: format!("unknown artist request status '{}'", other),
            }),
        }
    }
}

/// A label admin's request to sign an artist to their roster, reviewed by a
/// company admin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistRequest {
    pub id: Uuid,
    pub label_admin_id: Uuid,
    pub artist_id: Uuid,
    pub message: Option<String>,
    pub status: ArtistRequestStatus,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistRequestFilter {
    pub status: Option<ArtistRequestStatus>,
    pub label_admin_id: Option<Uuid>,
    pub artist_id: Option<Uuid>,
}

// ===== Revenue splits =====

/// Which side of the artist/label split an override is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitParty {
    Artist,
    Label,
}

impl SplitParty {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitParty::Artist => "artist",
            SplitParty::Label => "label",
        }
    }
}

impl FromStr for SplitParty {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "artist" => Ok(SplitParty::Artist),
            "label" | "label_admin" => Ok(SplitParty::Label),
            _ => Err(DistributionError::Validation {
                message: "Invalid type. Must be artist or label".to_string(),
            }),
        }
    }
}

/// Company-wide default split configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    pub company_id: String,
    pub artist_percentage: Decimal,
    pub label_percentage: Decimal,
    pub company_percentage: Decimal,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// Per-user split override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOverride {
    pub id: Uuid,
    pub party: SplitParty,
    pub party_id: Uuid,
    pub artist_percentage: Decimal,
    pub label_percentage: Decimal,
    pub is_active: bool,
    pub created_by: Uuid,
    pub effective_from: DateTime<Utc>,
    pub effective_until: Option<DateTime<Utc>>,
}

/// Where an effective split came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitSource {
    Default,
    ArtistOverride,
    LabelOverride,
}

impl SplitSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitSource::Default => "default",
            SplitSource::ArtistOverride => "artist_override",
            SplitSource::LabelOverride => "label_override",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveSplit {
    pub artist_percentage: Decimal,
    pub label_percentage: Decimal,
    pub source: SplitSource,
}

/// Money allocated from one gross earning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitAllocation {
    pub artist_share: Decimal,
    pub label_share: Decimal,
    pub company_share: Decimal,
}

/// Split configuration view: defaults plus active overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfiguration {
    pub defaults: SplitConfig,
    pub artist_overrides: Vec<SplitOverride>,
    pub label_overrides: Vec<SplitOverride>,
}

// ===== Wallet =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAccount {
    pub user_id: Uuid,
    pub balance: Decimal,
    pub negative_balance_allowed: bool,
    pub credit_limit: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    AdminAdjustment,
    SubscriptionPayment,
    SubscriptionRenewal,
    TopUp,
    Earning,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::AdminAdjustment => "admin_adjustment",
            TransactionKind::SubscriptionPayment => "subscription_payment",
            TransactionKind::SubscriptionRenewal => "subscription_renewal",
            TransactionKind::TopUp => "top_up",
            TransactionKind::Earning => "earning",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin_adjustment" => Ok(TransactionKind::AdminAdjustment),
            "subscription_payment" => Ok(TransactionKind::SubscriptionPayment),
            "subscription_renewal" => Ok(TransactionKind::SubscriptionRenewal),
            "top_up" => Ok(TransactionKind::TopUp),
            "earning" => Ok(TransactionKind::Earning),
            other => Err(DistributionError::Validation {
                message: format!("unknown transaction kind '{}'", other),
            }),
        }
    }
}

/// Ledger row; `amount` is signed (negative = debit)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub currency: String,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub description: String,
    pub reference: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustOperation {
    Add,
    Subtract,
}

impl AdjustOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustOperation::Add => "add",
            AdjustOperation::Subtract => "subtract",
        }
    }
}

impl FromStr for AdjustOperation {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(AdjustOperation::Add),
            "subtract" => Ok(AdjustOperation::Subtract),
            _ => Err(DistributionError::Validation {
                message: "Operation must be \"add\" or \"subtract\"".to_string(),
            }),
        }
    }
}

/// Admin wallet adjustment request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAdjustment {
    pub target_user_id: Uuid,
    pub amount: Decimal,
    pub operation: AdjustOperation,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub allow_negative: Option<bool>,
    pub negative_limit: Option<Decimal>,
}

/// Ledger row written by an adjustment and the wallet state after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAdjustmentResult {
    pub transaction: WalletTransaction,
    pub account: WalletAccount,
}

/// Gross earning reported for an artist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarningRecord {
    pub artist_id: Uuid,
    pub gross_amount: Decimal,
    pub currency: Option<String>,
    pub platform: String,
    pub release_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarningDistribution {
    pub split: EffectiveSplit,
    pub allocation: SplitAllocation,
    pub artist_transaction: WalletTransaction,
    pub label_transaction: Option<WalletTransaction>,
}

// ===== Subscriptions =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
        }
    }
}

impl FromStr for BillingCycle {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(BillingCycle::Monthly),
            "yearly" => Ok(BillingCycle::Yearly),
            other => Err(DistributionError::Validation {
                message: format!("unknown billing cycle '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Cancelled,
    Failed,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Failed => "failed",
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            "failed" => Ok(SubscriptionStatus::Failed),
            other => Err(DistributionError::Validation {
                message: format!("unknown subscription status '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tier: String,
    pub status: SubscriptionStatus,
    pub billing_cycle: BillingCycle,
    pub amount: Decimal,
    pub currency: String,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub auto_renew: bool,
    pub renewal_failure_count: i32,
    pub renewal_failure_reason: Option<String>,
    pub last_renewal_attempt: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionAction {
    Created,
    Updated,
}

impl SubscriptionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionAction::Created => "created",
            SubscriptionAction::Updated => "updated",
        }
    }
}

/// Result of paying a subscription from the wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletPayment {
    pub subscription: Subscription,
    pub action: SubscriptionAction,
    pub plan_name: String,
    pub previous_balance: Decimal,
    pub new_balance: Decimal,
    pub amount_deducted: Decimal,
}

/// Counters produced by one renewal run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenewalReport {
    pub processed: usize,
    pub successful: usize,
    pub insufficient_funds: usize,
    pub failed: usize,
    /// Changed by another writer between selection and settlement
    pub skipped: usize,
    pub errors: Vec<(Uuid, String)>,
}

// ===== Audit & webhooks =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub id: Uuid,
    pub event_type: String,
    pub user_id: Option<Uuid>,
    pub user_role: Option<String>,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Processed,
    Ignored,
    Duplicate,
    Failed,
}

impl WebhookOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookOutcome::Processed => "processed",
            WebhookOutcome::Ignored => "ignored",
            WebhookOutcome::Duplicate => "duplicate",
            WebhookOutcome::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookLog {
    pub id: Uuid,
    pub provider: String,
    pub event_type: String,
    pub order_id: Option<String>,
    pub status: String,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// What happened to an accepted webhook delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookReceipt {
    pub outcome: WebhookOutcome,
    pub event: String,
    pub order_id: String,
    pub message: String,
}
