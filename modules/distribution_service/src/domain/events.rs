//! Domain events for the distribution service
//!
//! Audit events are persisted to `audit_logs`; notification events are
//! handed to whatever delivers messages to users (logged when none is wired).

use super::repository::AuditRepository;
use crate::contract::AuditEntry;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Domain event types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum DistributionEvent {
    ReleaseCreated(ReleaseCreatedEvent),
    ReleaseStatusChanged(ReleaseStatusChangedEvent),
    ChangeRequestSubmitted(ChangeRequestEvent),
    ChangeRequestReviewed(ChangeRequestEvent),
    WalletPosted(WalletPostedEvent),
    SubscriptionChanged(SubscriptionChangedEvent),
    SplitsChanged(SplitsChangedEvent),
    RoleAssigned(RoleAssignedEvent),
    ProfileUpdated(ProfileUpdatedEvent),
    ArtistRequestSubmitted(ArtistRequestEvent),
    ArtistRequestReviewed(ArtistRequestEvent),
    RolePermissionsChanged(RolePermissionsChangedEvent),
    PermissionDenied(PermissionDeniedEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseCreatedEvent {
    pub release_id: Uuid,
    pub artist_id: Uuid,
    pub title: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseStatusChangedEvent {
    pub release_id: Uuid,
    pub artist_id: Uuid,
    pub from_status: String,
    pub to_status: String,
    pub changed_by: Uuid,
    pub notes: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequestEvent {
    pub change_request_id: Uuid,
    pub release_id: Uuid,
    pub field_name: String,
    pub status: String,
    pub user_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletPostedEvent {
    pub user_id: Uuid,
    pub transaction_id: Uuid,
    pub kind: String,
    pub amount: Decimal,
    pub balance_after: Decimal,
    /// Admin or system user that triggered the posting
    pub created_by: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionChangedEvent {
    pub user_id: Uuid,
    pub subscription_id: Uuid,
    pub tier: String,
    pub status: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitsChangedEvent {
    /// "default", "artist" or "label"
    pub scope: String,
    pub party_id: Option<Uuid>,
    pub artist_percentage: Option<Decimal>,
    pub label_percentage: Option<Decimal>,
    pub changed_by: Uuid,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignedEvent {
    pub user_id: Uuid,
    pub previous_role: String,
    pub new_role: String,
    pub changed_by: Uuid,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdatedEvent {
    pub user_id: Uuid,
    pub changed_by: Uuid,
    pub fields: Vec<String>,
    pub profile_lock_status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRequestEvent {
    pub request_id: Uuid,
    pub label_admin_id: Uuid,
    pub artist_id: Uuid,
    pub status: String,
    /// Label admin for submissions, reviewer otherwise
    pub user_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissionsChangedEvent {
    pub role: String,
    /// granted, revoked or reset
    pub action: String,
    pub permissions: Vec<String>,
    pub changed_by: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDeniedEvent {
    pub user_id: Uuid,
    pub role: String,
    pub required: Vec<String>,
    pub operation: String,
    pub timestamp: DateTime<Utc>,
}

impl DistributionEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            DistributionEvent::ReleaseCreated(_) => "release_created",
            DistributionEvent::ReleaseStatusChanged(_) => "release_status_changed",
            DistributionEvent::ChangeRequestSubmitted(_) => "change_request_submitted",
            DistributionEvent::ChangeRequestReviewed(_) => "change_request_reviewed",
            DistributionEvent::WalletPosted(_) => "wallet_posted",
            DistributionEvent::SubscriptionChanged(_) => "subscription_changed",
            DistributionEvent::SplitsChanged(_) => "splits_changed",
            DistributionEvent::RoleAssigned(_) => "role_assigned",
            DistributionEvent::ProfileUpdated(_) => "profile_updated",
            DistributionEvent::ArtistRequestSubmitted(_) => "artist_request_submitted",
            DistributionEvent::ArtistRequestReviewed(_) => "artist_request_reviewed",
            DistributionEvent::RolePermissionsChanged(_) => "role_permissions_changed",
            DistributionEvent::PermissionDenied(_) => "permission_denied",
        }
    }

    /// User that caused the event
    pub fn actor(&self) -> Option<Uuid> {
        match self {
            DistributionEvent::ReleaseCreated(e) => Some(e.artist_id),
            DistributionEvent::ReleaseStatusChanged(e) => Some(e.changed_by),
            DistributionEvent::ChangeRequestSubmitted(e)
            | DistributionEvent::ChangeRequestReviewed(e) => Some(e.user_id),
            DistributionEvent::WalletPosted(e) => e.created_by.or(Some(e.user_id)),
            DistributionEvent::SubscriptionChanged(e) => Some(e.user_id),
            DistributionEvent::SplitsChanged(e) => Some(e.changed_by),
            DistributionEvent::RoleAssigned(e) => Some(e.changed_by),
            DistributionEvent::ProfileUpdated(e) => Some(e.changed_by),
            DistributionEvent::ArtistRequestSubmitted(e)
            | DistributionEvent::ArtistRequestReviewed(e) => Some(e.user_id),
            DistributionEvent::RolePermissionsChanged(e) => e.changed_by,
            DistributionEvent::PermissionDenied(e) => Some(e.user_id),
        }
    }

    fn actor_role(&self) -> Option<String> {
        match self {
            DistributionEvent::PermissionDenied(e) => Some(e.role.clone()),
            _ => None,
        }
    }

    pub fn permission_denied(
        user_id: Uuid,
        role: &str,
        required: &[&str],
        operation: &str,
    ) -> Self {
        DistributionEvent::PermissionDenied(PermissionDeniedEvent {
            user_id,
            role: role.to_string(),
            required: required.iter().map(|p| p.to_string()).collect(),
            operation: operation.to_string(),
            timestamp: Utc::now(),
        })
    }

    /// Audit row for this event
    pub fn to_audit_entry(&self) -> AuditEntry {
        let details = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        AuditEntry {
            id: Uuid::new_v4(),
            event_type: self.event_type().to_string(),
            user_id: self.actor(),
            user_role: self.actor_role(),
            details,
            created_at: Utc::now(),
        }
    }
}

/// Event publisher trait for publishing domain events
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    /// Persist an audit trail entry
    async fn publish_audit(&self, event: DistributionEvent) -> anyhow::Result<()>;

    /// Notify the affected user
    async fn publish_notification(&self, event: DistributionEvent) -> anyhow::Result<()>;
}

/// Writes audit events to the audit log; notifications are only logged
pub struct AuditLogPublisher {
    audit_repo: Arc<dyn AuditRepository>,
}

impl AuditLogPublisher {
    pub fn new(audit_repo: Arc<dyn AuditRepository>) -> Self {
        Self { audit_repo }
    }
}

#[async_trait::async_trait]
impl EventPublisher for AuditLogPublisher {
    async fn publish_audit(&self, event: DistributionEvent) -> anyhow::Result<()> {
        self.audit_repo.record(&event.to_audit_entry()).await
    }

    async fn publish_notification(&self, event: DistributionEvent) -> anyhow::Result<()> {
        tracing::info!(
            event_type = event.event_type(),
            user_id = ?event.actor(),
            "notification queued"
        );
        Ok(())
    }
}
