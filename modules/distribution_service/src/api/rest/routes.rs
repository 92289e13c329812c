//! Route registration

use super::handlers::{self, RestSettings};
use crate::domain::Service;
use crate::infra::auth::JwtVerifier;
use axum::{
    routing::{delete, get, post, put},
    Extension, Router,
};
use std::sync::Arc;

/// Register all REST routes.
///
/// Handlers read the service, token verifier and REST settings from
/// request extensions.
pub fn register_routes(
    router: Router,
    service: Arc<Service>,
    verifier: Arc<JwtVerifier>,
    settings: RestSettings,
) -> anyhow::Result<Router> {
    let router = router
        .route("/health", get(handlers::health))
        // Identity & RBAC
        .route("/me", get(handlers::get_me))
        .route(
            "/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/users", get(handlers::list_users))
        .route("/users/{id}/role", put(handlers::assign_role))
        .route("/users/{id}/profile", put(handlers::update_user_profile))
        .route("/users/{id}/profile-lock", put(handlers::set_profile_lock))
        .route(
            "/roles/{role}/permissions",
            get(handlers::get_role_permissions).post(handlers::grant_permission),
        )
        .route(
            "/roles/{role}/permissions/{permission}",
            delete(handlers::revoke_permission),
        )
        .route(
            "/roles/{role}/reset-default",
            post(handlers::reset_role_defaults),
        )
        .route("/roles/{role}/verify", get(handlers::verify_role))
        // Label rosters
        .route("/label/roster", get(handlers::label_roster))
        .route("/label/artist-requests", post(handlers::request_artist))
        .route("/artist-requests", get(handlers::list_artist_requests))
        .route(
            "/artist-requests/{id}",
            put(handlers::review_artist_request),
        )
        // Releases
        .route(
            "/releases",
            get(handlers::list_releases).post(handlers::create_release),
        )
        .route("/releases/{id}", get(handlers::get_release))
        .route(
            "/releases/{id}/status",
            put(handlers::update_release_status),
        )
        .route("/releases/{id}/history", get(handlers::release_history))
        // Change requests
        .route(
            "/change-requests",
            get(handlers::list_change_requests).post(handlers::create_change_request),
        )
        .route(
            "/change-requests/{id}",
            put(handlers::review_change_request),
        )
        // Revenue splits
        .route(
            "/splits",
            get(handlers::get_splits).put(handlers::update_splits),
        )
        .route(
            "/splits/overrides",
            post(handlers::upsert_split_override).delete(handlers::remove_split_override),
        )
        // Wallet & earnings
        .route("/wallet", get(handlers::get_wallet))
        .route(
            "/wallet/transactions",
            get(handlers::list_wallet_transactions),
        )
        .route("/wallet/admin-adjust", post(handlers::admin_adjust_wallet))
        .route("/earnings", post(handlers::record_earning))
        // Subscriptions
        .route("/subscriptions/me", get(handlers::get_my_subscription))
        .route(
            "/subscriptions/pay-with-wallet",
            post(handlers::pay_with_wallet),
        )
        .route("/subscriptions/cancel", post(handlers::cancel_subscription))
        .route("/internal/renewals", post(handlers::run_renewals))
        // Webhooks
        .route("/webhooks/revolut", post(handlers::revolut_webhook))
        // Audit
        .route("/audit-logs", get(handlers::list_audit_logs))
        .layer(Extension(service))
        .layer(Extension(verifier))
        .layer(Extension(Arc::new(settings)));

    Ok(router)
}
