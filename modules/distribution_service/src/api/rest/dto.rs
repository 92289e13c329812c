//! REST DTOs with serde derives for HTTP API
//!
//! Money is serialized as decimal strings. Request fields that the web
//! client sends in camelCase are accepted under both spellings.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

fn default_limit() -> u64 {
    50
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ===== Identity DTOs =====

/// User profile response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfileDto {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[schema(example = "artist")]
    pub role: String,
    /// Human readable role name
    #[schema(example = "Artist")]
    pub role_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_admin_id: Option<Uuid>,
    #[schema(value_type = String, example = "125.50")]
    pub wallet_balance: Decimal,
    pub negative_balance_allowed: bool,
    #[schema(value_type = String)]
    pub wallet_credit_limit: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Fields the owner can no longer edit
    pub locked_fields: Vec<String>,
    #[schema(example = "unlocked")]
    pub profile_lock_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile edit; omitted fields are left unchanged, blank strings clear them
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(default, alias = "dateOfBirth")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// Lock the identity fields once saved
    #[serde(default, alias = "lockIdentity")]
    pub lock_identity: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProfileLockRequest {
    pub locked: bool,
}

/// Profile of the caller together with their effective permissions
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub profile: UserProfileDto,
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsersListResponse {
    pub items: Vec<UserProfileDto>,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ListUsersQuery {
    pub role: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AssignRoleRequest {
    #[schema(example = "label_admin")]
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RolePermissionsResponse {
    pub role: String,
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GrantPermissionRequest {
    #[schema(example = "release:read:label")]
    pub permission: String,
}

/// Stored role permissions compared against the defaults
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoleVerificationResponse {
    pub role: String,
    pub in_sync: bool,
    pub granted: Vec<String>,
    pub missing: Vec<String>,
    pub extra: Vec<String>,
}

// ===== Release DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReleaseDto {
    pub id: Uuid,
    pub artist_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_admin_id: Option<Uuid>,
    pub title: String,
    #[schema(example = "draft")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    pub pending_change_requests: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReleasesListResponse {
    pub items: Vec<ReleaseDto>,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ListReleasesQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateReleaseRequest {
    #[serde(alias = "releaseTitle")]
    pub title: String,
    #[serde(default, alias = "releaseDate")]
    pub release_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    #[serde(alias = "newStatus")]
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusChangeDto {
    pub id: Uuid,
    pub release_id: Uuid,
    pub from_status: String,
    pub to_status: String,
    pub changed_by: Uuid,
    pub notes: String,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdateResponse {
    pub release: ReleaseDto,
    pub change: StatusChangeDto,
    /// Message shown to the artist for the new status
    pub message: String,
}

// ===== Change request DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangeRequestDto {
    pub id: Uuid,
    pub release_id: Uuid,
    pub requested_by: Uuid,
    pub request_type: String,
    pub field_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_value: Option<String>,
    pub reason: String,
    pub urgency_level: i32,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangeRequestsListResponse {
    pub items: Vec<ChangeRequestDto>,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ListChangeRequestsQuery {
    pub release_id: Option<Uuid>,
    pub status: Option<String>,
}

fn default_urgency() -> i32 {
    1
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateChangeRequestRequest {
    #[serde(alias = "releaseId")]
    pub release_id: Uuid,
    #[serde(default, alias = "requestType")]
    pub request_type: Option<String>,
    #[serde(alias = "fieldName")]
    pub field_name: String,
    #[serde(default, alias = "currentValue")]
    pub current_value: Option<String>,
    #[serde(default, alias = "requestedValue")]
    pub requested_value: Option<String>,
    pub reason: String,
    #[serde(default = "default_urgency", alias = "urgencyLevel")]
    pub urgency_level: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReviewChangeRequestRequest {
    /// `approved` or `rejected`
    pub status: String,
    #[serde(default, alias = "reviewNotes")]
    pub notes: Option<String>,
}

// ===== Label roster DTOs =====

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RosterQuery {
    /// Another label admin's roster; defaults to the caller's own
    pub label_admin_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArtistRequestDto {
    pub id: Uuid,
    pub label_admin_id: Uuid,
    pub artist_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[schema(example = "pending")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArtistRequestsListResponse {
    pub items: Vec<ArtistRequestDto>,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ListArtistRequestsQuery {
    pub status: Option<String>,
    pub label_admin_id: Option<Uuid>,
    pub artist_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateArtistRequestRequest {
    #[serde(alias = "artistId")]
    pub artist_id: Uuid,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReviewArtistRequestRequest {
    /// `approved` or `rejected`
    pub status: String,
    #[serde(default, alias = "reviewNotes", alias = "approvalNotes")]
    pub notes: Option<String>,
}

// ===== Revenue split DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SplitConfigDto {
    pub company_id: String,
    #[schema(value_type = String, example = "80.00")]
    pub artist_percentage: Decimal,
    #[schema(value_type = String, example = "20.00")]
    pub label_percentage: Decimal,
    #[schema(value_type = String)]
    pub company_percentage: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SplitOverrideDto {
    pub id: Uuid,
    /// `artist` or `label`
    pub party: String,
    pub party_id: Uuid,
    #[schema(value_type = String)]
    pub artist_percentage: Decimal,
    #[schema(value_type = String)]
    pub label_percentage: Decimal,
    pub is_active: bool,
    pub created_by: Uuid,
    pub effective_from: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SplitConfigurationResponse {
    pub defaults: SplitConfigDto,
    pub artist_overrides: Vec<SplitOverrideDto>,
    pub label_overrides: Vec<SplitOverrideDto>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateSplitsRequest {
    #[serde(alias = "artistPercentage")]
    #[schema(value_type = String)]
    pub artist_percentage: Decimal,
    #[serde(alias = "labelPercentage")]
    #[schema(value_type = String)]
    pub label_percentage: Decimal,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SplitOverrideRequest {
    /// `artist` or `label`
    #[serde(alias = "type")]
    pub party: String,
    #[serde(alias = "partyId", alias = "userId")]
    pub party_id: Uuid,
    /// Share of the party named by `party`
    #[schema(value_type = String)]
    pub percentage: Decimal,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RemoveSplitOverrideQuery {
    pub party: String,
    pub party_id: Uuid,
}

// ===== Wallet DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletDto {
    pub user_id: Uuid,
    #[schema(value_type = String)]
    pub balance: Decimal,
    pub negative_balance_allowed: bool,
    #[schema(value_type = String)]
    pub credit_limit: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletTransactionDto {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "earning")]
    pub transaction_type: String,
    /// Signed amount, negative for debits
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub currency: String,
    #[schema(value_type = String)]
    pub balance_before: Decimal,
    #[schema(value_type = String)]
    pub balance_after: Decimal,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletTransactionsResponse {
    pub items: Vec<WalletTransactionDto>,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WalletQuery {
    /// Another user's wallet; requires `wallet:read:any`
    pub user_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_operation() -> String {
    "add".to_string()
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AdminAdjustRequest {
    #[serde(alias = "targetUserId")]
    pub target_user_id: Uuid,
    #[schema(value_type = String)]
    pub amount: Decimal,
    /// `add` or `subtract`
    #[serde(default = "default_operation")]
    pub operation: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "allowNegative")]
    pub allow_negative: Option<bool>,
    #[serde(default, alias = "negativeLimit")]
    #[schema(value_type = Option<String>)]
    pub negative_limit: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminAdjustResponse {
    pub transaction: WalletTransactionDto,
    pub wallet: WalletDto,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EarningRequest {
    #[serde(alias = "artistId")]
    pub artist_id: Uuid,
    #[serde(alias = "amount", alias = "grossAmount")]
    #[schema(value_type = String)]
    pub gross_amount: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    pub platform: String,
    #[serde(default, alias = "releaseId")]
    pub release_id: Option<Uuid>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EarningResponse {
    #[schema(value_type = String)]
    pub artist_percentage: Decimal,
    #[schema(value_type = String)]
    pub label_percentage: Decimal,
    /// Where the split came from: default, artist_override or label_override
    pub split_source: String,
    #[schema(value_type = String)]
    pub artist_share: Decimal,
    #[schema(value_type = String)]
    pub label_share: Decimal,
    #[schema(value_type = String)]
    pub company_share: Decimal,
    pub artist_transaction: WalletTransactionDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_transaction: Option<WalletTransactionDto>,
}

// ===== Subscription DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionDto {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "artist_pro")]
    pub tier: String,
    pub status: String,
    pub billing_cycle: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub currency: String,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub auto_renew: bool,
    pub renewal_failure_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewal_failure_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_renewal_attempt: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub subscription: Option<SubscriptionDto>,
}

fn default_billing() -> String {
    "monthly".to_string()
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PayWithWalletRequest {
    #[serde(alias = "planId")]
    #[schema(example = "artist-pro")]
    pub plan_id: String,
    #[serde(default = "default_billing", alias = "billing_cycle")]
    #[schema(example = "monthly")]
    pub billing: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletPaymentResponse {
    pub subscription: SubscriptionDto,
    /// `created` or `updated`
    pub action: String,
    pub plan_name: String,
    #[schema(value_type = String)]
    pub previous_balance: Decimal,
    #[schema(value_type = String)]
    pub new_balance: Decimal,
    #[schema(value_type = String)]
    pub amount_deducted: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RenewalError {
    pub subscription_id: Uuid,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RenewalReportResponse {
    pub processed: usize,
    pub successful: usize,
    pub insufficient_funds: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: Vec<RenewalError>,
}

// ===== Audit & webhook DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditEntryDto {
    pub id: Uuid,
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_role: Option<String>,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditLogsResponse {
    pub items: Vec<AuditEntryDto>,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AuditLogsQuery {
    pub event_type: Option<String>,
    pub user_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WebhookReceiptResponse {
    pub received: bool,
    /// `processed`, `ignored`, `duplicate` or `failed`
    pub outcome: String,
    pub event: String,
    pub order_id: String,
    pub message: String,
}
