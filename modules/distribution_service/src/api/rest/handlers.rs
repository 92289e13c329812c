//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    auth::Caller,
    dto::*,
    error::{map_domain_error, Problem},
};
use crate::contract::{
    ArtistRequestFilter, ArtistRequestStatus, BillingCycle, ChangeRequestStatus, ReleaseStatus,
    Role, SplitParty, WalletAdjustment,
};
use crate::domain::{webhook, AuditFilter, Service};
use axum::{
    body::Bytes,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// Header carrying the shared secret of the renewal cron job
pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

/// Settings the REST layer needs besides the service
#[derive(Debug, Clone, Default)]
pub struct RestSettings {
    pub cron_secret: Option<String>,
}

fn parse_role(role: &str) -> Result<Role, Problem> {
    role.parse().map_err(map_domain_error)
}

// ===== Health =====

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ===== Identity Handlers =====

pub async fn get_me(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
) -> Result<Json<MeResponse>, Problem> {
    let profile = service
        .get_my_profile(&caller)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(MeResponse {
        profile: profile.into(),
        permissions: caller.permissions,
    }))
}

pub async fn get_profile(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
) -> Result<Json<UserProfileDto>, Problem> {
    let profile = service
        .get_my_profile(&caller)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(profile.into()))
}

pub async fn update_profile(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfileDto>, Problem> {
    let profile = service
        .update_my_profile(&caller, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(profile.into()))
}

pub async fn update_user_profile(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfileDto>, Problem> {
    let profile = service
        .update_user_profile(&caller, user_id, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(profile.into()))
}

pub async fn set_profile_lock(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Path(user_id): Path<Uuid>,
    Json(req): Json<ProfileLockRequest>,
) -> Result<Json<UserProfileDto>, Problem> {
    let profile = service
        .set_profile_lock(&caller, user_id, req.locked)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(profile.into()))
}

pub async fn list_users(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<UsersListResponse>, Problem> {
    let role = query.role.as_deref().map(parse_role).transpose()?;
    let users = service
        .list_users(&caller, role, query.limit, query.offset)
        .await
        .map_err(map_domain_error)?;

    let items: Vec<UserProfileDto> = users.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(UsersListResponse { items, total }))
}

pub async fn assign_role(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Path(user_id): Path<Uuid>,
    Json(req): Json<AssignRoleRequest>,
) -> Result<Json<UserProfileDto>, Problem> {
    let role = parse_role(&req.role)?;
    let profile = service
        .assign_role(&caller, user_id, role)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(profile.into()))
}

pub async fn get_role_permissions(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Path(role): Path<String>,
) -> Result<Json<RolePermissionsResponse>, Problem> {
    let role = parse_role(&role)?;
    let permissions = service
        .get_role_permissions(&caller, role)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(RolePermissionsResponse {
        role: role.as_str().to_string(),
        permissions,
    }))
}

pub async fn grant_permission(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Path(role): Path<String>,
    Json(req): Json<GrantPermissionRequest>,
) -> Result<(StatusCode, Json<RolePermissionsResponse>), Problem> {
    let role = parse_role(&role)?;
    let permissions = service
        .grant_permission(&caller, role, &req.permission)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(RolePermissionsResponse {
            role: role.as_str().to_string(),
            permissions,
        }),
    ))
}

pub async fn revoke_permission(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Path((role, permission)): Path<(String, String)>,
) -> Result<Json<RolePermissionsResponse>, Problem> {
    let role = parse_role(&role)?;
    let permissions = service
        .revoke_permission(&caller, role, &permission)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(RolePermissionsResponse {
        role: role.as_str().to_string(),
        permissions,
    }))
}

pub async fn reset_role_defaults(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Path(role): Path<String>,
) -> Result<Json<RolePermissionsResponse>, Problem> {
    let role = parse_role(&role)?;
    let permissions = service
        .reset_role_defaults(&caller, role)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(RolePermissionsResponse {
        role: role.as_str().to_string(),
        permissions,
    }))
}

pub async fn verify_role(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Path(role): Path<String>,
) -> Result<Json<RoleVerificationResponse>, Problem> {
    let role = parse_role(&role)?;
    let report = service
        .verify_role_permissions(&caller, role)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(report.into()))
}

// ===== Release Handlers =====

pub async fn create_release(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Json(req): Json<CreateReleaseRequest>,
) -> Result<(StatusCode, Json<ReleaseDto>), Problem> {
    let release = service
        .create_release(&caller, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(release.into())))
}

pub async fn list_releases(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Query(query): Query<ListReleasesQuery>,
) -> Result<Json<ReleasesListResponse>, Problem> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ReleaseStatus>)
        .transpose()
        .map_err(map_domain_error)?;

    let releases = service
        .list_releases(&caller, status)
        .await
        .map_err(map_domain_error)?;

    let items: Vec<ReleaseDto> = releases.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(ReleasesListResponse { items, total }))
}

pub async fn get_release(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Path(release_id): Path<Uuid>,
) -> Result<Json<ReleaseDto>, Problem> {
    let release = service
        .get_release(&caller, release_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(release.into()))
}

pub async fn release_history(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Path(release_id): Path<Uuid>,
) -> Result<Json<Vec<StatusChangeDto>>, Problem> {
    let history = service
        .release_history(&caller, release_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(history.into_iter().map(Into::into).collect()))
}

pub async fn update_release_status(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Path(release_id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<StatusUpdateResponse>, Problem> {
    let status: ReleaseStatus = req.status.parse().map_err(map_domain_error)?;
    let update = service
        .update_release_status(&caller, release_id, status, req.notes)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(update.into()))
}

// ===== Change Request Handlers =====

pub async fn list_change_requests(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Query(query): Query<ListChangeRequestsQuery>,
) -> Result<Json<ChangeRequestsListResponse>, Problem> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ChangeRequestStatus>)
        .transpose()
        .map_err(map_domain_error)?;

    let requests = service
        .list_change_requests(&caller, query.release_id, status)
        .await
        .map_err(map_domain_error)?;

    let items: Vec<ChangeRequestDto> = requests.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(ChangeRequestsListResponse { items, total }))
}

pub async fn create_change_request(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Json(req): Json<CreateChangeRequestRequest>,
) -> Result<(StatusCode, Json<ChangeRequestDto>), Problem> {
    let request = service
        .create_change_request(&caller, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(request.into())))
}

pub async fn review_change_request(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Path(request_id): Path<Uuid>,
    Json(req): Json<ReviewChangeRequestRequest>,
) -> Result<Json<ChangeRequestDto>, Problem> {
    let decision: ChangeRequestStatus = req.status.parse().map_err(map_domain_error)?;
    let request = service
        .review_change_request(&caller, request_id, decision, req.notes)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(request.into()))
}

// ===== Label Roster Handlers =====

pub async fn label_roster(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Query(query): Query<RosterQuery>,
) -> Result<Json<UsersListResponse>, Problem> {
    let artists = service
        .label_roster(&caller, query.label_admin_id)
        .await
        .map_err(map_domain_error)?;

    let items: Vec<UserProfileDto> = artists.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(UsersListResponse { items, total }))
}

pub async fn request_artist(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Json(req): Json<CreateArtistRequestRequest>,
) -> Result<(StatusCode, Json<ArtistRequestDto>), Problem> {
    let request = service
        .request_artist_affiliation(&caller, req.artist_id, req.message)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(request.into())))
}

pub async fn list_artist_requests(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Query(query): Query<ListArtistRequestsQuery>,
) -> Result<Json<ArtistRequestsListResponse>, Problem> {
    let filter = ArtistRequestFilter::try_from(query).map_err(map_domain_error)?;
    let requests = service
        .list_artist_requests(&caller, filter)
        .await
        .map_err(map_domain_error)?;

    let items: Vec<ArtistRequestDto> = requests.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(ArtistRequestsListResponse { items, total }))
}

pub async fn review_artist_request(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Path(request_id): Path<Uuid>,
    Json(req): Json<ReviewArtistRequestRequest>,
) -> Result<Json<ArtistRequestDto>, Problem> {
    let decision: ArtistRequestStatus = req.status.parse().map_err(map_domain_error)?;
    let request = service
        .review_artist_request(&caller, request_id, decision, req.notes)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(request.into()))
}

// ===== Revenue Split Handlers =====

pub async fn get_splits(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
) -> Result<Json<SplitConfigurationResponse>, Problem> {
    let configuration = service
        .get_split_configuration(&caller)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(configuration.into()))
}

pub async fn update_splits(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Json(req): Json<UpdateSplitsRequest>,
) -> Result<Json<SplitConfigDto>, Problem> {
    let config = service
        .update_split_configuration(&caller, req.artist_percentage, req.label_percentage)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(config.into()))
}

pub async fn upsert_split_override(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Json(req): Json<SplitOverrideRequest>,
) -> Result<Json<SplitOverrideDto>, Problem> {
    let party: SplitParty = req.party.parse().map_err(map_domain_error)?;
    let split = service
        .upsert_split_override(&caller, party, req.party_id, req.percentage)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(split.into()))
}

pub async fn remove_split_override(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Query(query): Query<RemoveSplitOverrideQuery>,
) -> Result<StatusCode, Problem> {
    let party: SplitParty = query.party.parse().map_err(map_domain_error)?;
    service
        .remove_split_override(&caller, party, query.party_id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ===== Wallet Handlers =====

pub async fn get_wallet(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Query(query): Query<WalletQuery>,
) -> Result<Json<WalletDto>, Problem> {
    let account = service
        .get_wallet(&caller, query.user_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(account.into()))
}

pub async fn list_wallet_transactions(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Query(query): Query<WalletQuery>,
) -> Result<Json<WalletTransactionsResponse>, Problem> {
    let transactions = service
        .list_wallet_transactions(&caller, query.user_id, query.limit, query.offset)
        .await
        .map_err(map_domain_error)?;

    let items: Vec<WalletTransactionDto> = transactions.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(WalletTransactionsResponse { items, total }))
}

pub async fn admin_adjust_wallet(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Json(req): Json<AdminAdjustRequest>,
) -> Result<Json<AdminAdjustResponse>, Problem> {
    let adjustment: WalletAdjustment = req.try_into().map_err(map_domain_error)?;
    let result = service
        .admin_adjust_wallet(&caller, adjustment)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(result.into()))
}

pub async fn record_earning(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Json(req): Json<EarningRequest>,
) -> Result<(StatusCode, Json<EarningResponse>), Problem> {
    let distribution = service
        .record_earning(&caller, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(distribution.into())))
}

// ===== Subscription Handlers =====

pub async fn get_my_subscription(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
) -> Result<Json<SubscriptionResponse>, Problem> {
    let subscription = service
        .get_subscription(&caller)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(SubscriptionResponse {
        subscription: subscription.map(Into::into),
    }))
}

pub async fn pay_with_wallet(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Json(req): Json<PayWithWalletRequest>,
) -> Result<Json<WalletPaymentResponse>, Problem> {
    let cycle: BillingCycle = req.billing.parse().map_err(map_domain_error)?;
    let payment = service
        .pay_subscription_with_wallet(&caller, &req.plan_id, cycle)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(payment.into()))
}

pub async fn cancel_subscription(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
) -> Result<Json<SubscriptionDto>, Problem> {
    let subscription = service
        .cancel_subscription(&caller)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(subscription.into()))
}

/// Renewal run triggered by the scheduler, authenticated by a shared secret
pub async fn run_renewals(
    Extension(service): Extension<Arc<Service>>,
    Extension(settings): Extension<Arc<RestSettings>>,
    headers: HeaderMap,
) -> Result<Json<RenewalReportResponse>, Problem> {
    let provided = headers
        .get(CRON_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());

    match (settings.cron_secret.as_deref(), provided) {
        (Some(expected), Some(provided)) if webhook::secrets_equal(expected, provided) => {}
        (None, _) => {
            tracing::warn!("renewal run requested but no cron secret is configured");
            return Err(Problem::unauthorized("Cron secret not configured"));
        }
        _ => {
            tracing::warn!("renewal run rejected: bad cron secret");
            return Err(Problem::unauthorized("Invalid cron secret"));
        }
    }

    let report = service
        .process_renewals(chrono::Utc::now())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(report.into()))
}

// ===== Webhook Handlers =====

pub async fn revolut_webhook(
    Extension(service): Extension<Arc<Service>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookReceiptResponse>, Problem> {
    let signature = headers
        .get(webhook::SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    let receipt = service
        .handle_revolut_webhook(&body, signature)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(receipt.into()))
}

// ===== Audit Handlers =====

pub async fn list_audit_logs(
    Extension(service): Extension<Arc<Service>>,
    Caller(caller): Caller,
    Query(query): Query<AuditLogsQuery>,
) -> Result<Json<AuditLogsResponse>, Problem> {
    let filter = AuditFilter {
        event_type: query.event_type,
        user_id: query.user_id,
    };
    let entries = service
        .list_audit_logs(&caller, filter, query.limit, query.offset)
        .await
        .map_err(map_domain_error)?;

    let items: Vec<AuditEntryDto> = entries.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(AuditLogsResponse { items, total }))
}
