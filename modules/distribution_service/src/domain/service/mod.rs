//! Domain service - business logic orchestration

mod access;
mod admin;
mod finance;
mod profiles;
mod releases;
mod roster;
mod subscriptions;
mod webhooks;

use super::events::{DistributionEvent, EventPublisher};
use super::repository::{
    ArtistRequestRepository, AuditRepository, ChangeRequestRepository, FinanceRepository,
    ReleaseRepository, RolePermissionRepository, SplitRepository, UserRepository,
};
use crate::contract::{DistributionError, UserProfile};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

/// Data access handles used by the service
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub permissions: Arc<dyn RolePermissionRepository>,
    pub releases: Arc<dyn ReleaseRepository>,
    pub change_requests: Arc<dyn ChangeRequestRepository>,
    pub artist_requests: Arc<dyn ArtistRequestRepository>,
    pub splits: Arc<dyn SplitRepository>,
    pub finance: Arc<dyn FinanceRepository>,
    pub audit: Arc<dyn AuditRepository>,
}

/// Runtime settings the service needs from configuration
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub company_id: String,
    pub default_currency: String,
    pub default_artist_percentage: Decimal,
    pub default_label_percentage: Decimal,
    /// The only user allowed to reset super_admin permissions
    pub master_admin_id: Option<Uuid>,
    pub revolut_webhook_secret: Option<String>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            company_id: "msc-co".to_string(),
            default_currency: "GBP".to_string(),
            default_artist_percentage: Decimal::from(80),
            default_label_percentage: Decimal::from(20),
            master_admin_id: None,
            revolut_webhook_secret: None,
        }
    }
}

/// Domain service for the distribution platform
pub struct Service {
    repos: Repositories,
    event_publisher: Arc<dyn EventPublisher>,
    settings: ServiceSettings,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        repos: Repositories,
        event_publisher: Arc<dyn EventPublisher>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            repos,
            event_publisher,
            settings,
        }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    async fn load_user(&self, user_id: Uuid) -> Result<UserProfile, DistributionError> {
        self.repos
            .users
            .find_by_id(user_id)
            .await
            .map_err(internal("load user profile"))?
            .ok_or_else(|| DistributionError::not_found("user", user_id))
    }

    /// Publish to the audit trail; failures are logged, never returned
    async fn audit(&self, event: DistributionEvent) {
        let event_type = event.event_type();
        if let Err(e) = self.event_publisher.publish_audit(event).await {
            tracing::warn!(event_type, error = %e, "failed to publish audit event");
        }
    }

    async fn notify(&self, event: DistributionEvent) {
        let event_type = event.event_type();
        if let Err(e) = self.event_publisher.publish_notification(event).await {
            tracing::warn!(event_type, error = %e, "failed to publish notification event");
        }
    }
}

/// Log a storage failure and hide it behind `Internal`
fn internal(context: &'static str) -> impl Fn(anyhow::Error) -> DistributionError {
    move |e| {
        tracing::error!(error = %e, "{context} failed");
        DistributionError::Internal
    }
}

/// Recover a domain rejection raised inside a repository transaction,
/// otherwise treat the failure as internal
fn recover(context: &'static str) -> impl Fn(anyhow::Error) -> DistributionError {
    move |e| match e.downcast::<DistributionError>() {
        Ok(domain) => domain,
        Err(e) => {
            tracing::error!(error = %e, "{context} failed");
            DistributionError::Internal
        }
    }
}
