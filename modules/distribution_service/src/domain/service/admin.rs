//! User administration and audit log access

use super::{internal, Service};
use crate::contract::{AuditEntry, AuthContext, DistributionError, Role, UserProfile};
use crate::domain::events::{DistributionEvent, RoleAssignedEvent};
use crate::domain::repository::AuditFilter;
use chrono::Utc;
use uuid::Uuid;

pub const MAX_PAGE_SIZE: u64 = 200;

impl Service {
    pub async fn get_my_profile(
        &self,
        caller: &AuthContext,
    ) -> Result<UserProfile, DistributionError> {
        self.load_user(caller.user_id).await
    }

    pub async fn list_users(
        &self,
        caller: &AuthContext,
        role: Option<Role>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<UserProfile>, DistributionError> {
        self.require(caller, "user:read:any", "list_users").await?;

        self.repos
            .users
            .list(role, limit.min(MAX_PAGE_SIZE), offset)
            .await
            .map_err(internal("list users"))
    }

    /// Change a user's role. Only a super admin may hand out the super admin role.
    pub async fn assign_role(
        &self,
        caller: &AuthContext,
        user_id: Uuid,
        role: Role,
    ) -> Result<UserProfile, DistributionError> {
        self.require(caller, "user:update:any", "assign_role")
            .await?;

        if role == Role::SuperAdmin && caller.role != Role::SuperAdmin {
            return Err(DistributionError::forbidden(
                "Only a super admin can assign the super_admin role",
            ));
        }

        let current = self.load_user(user_id).await?;
        if current.role == Role::SuperAdmin && caller.role != Role::SuperAdmin {
            return Err(DistributionError::forbidden(
                "Only a super admin can change a super admin's role",
            ));
        }

        let updated = self
            .repos
            .users
            .update_role(user_id, role)
            .await
            .map_err(internal("update user role"))?
            .ok_or_else(|| DistributionError::not_found("user", user_id))?;

        tracing::info!(
            user_id = %user_id,
            from = %current.role,
            to = %role,
            changed_by = %caller.user_id,
            "user role changed"
        );
        self.audit(DistributionEvent::RoleAssigned(RoleAssignedEvent {
            user_id,
            previous_role: current.role.as_str().to_string(),
            new_role: role.as_str().to_string(),
            changed_by: caller.user_id,
            timestamp: Utc::now(),
        }))
        .await;

        Ok(updated)
    }

    pub async fn list_audit_logs(
        &self,
        caller: &AuthContext,
        filter: AuditFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<AuditEntry>, DistributionError> {
        self.require(caller, "system:logs:any", "list_audit_logs")
            .await?;

        self.repos
            .audit
            .list(&filter, limit.min(MAX_PAGE_SIZE), offset)
            .await
            .map_err(internal("list audit logs"))
    }
}
