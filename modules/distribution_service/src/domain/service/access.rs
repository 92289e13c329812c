//! Caller resolution, permission checks and role permission management

use super::{internal, Service};
use crate::contract::{AuthContext, DistributionError, Role, RolePermissionReport};
use crate::domain::events::{DistributionEvent, RolePermissionsChangedEvent};
use crate::domain::rbac;
use chrono::Utc;
use uuid::Uuid;

impl Service {
    /// Build the auth context of an authenticated user from their profile and role.
    ///
    /// A token for a user without a profile is rejected as forbidden.
    pub async fn resolve_caller(
        &self,
        user_id: Uuid,
        email: Option<String>,
    ) -> Result<AuthContext, DistributionError> {
        let profile = self
            .repos
            .users
            .find_by_id(user_id)
            .await
            .map_err(internal("resolve caller profile"))?
            .ok_or_else(|| DistributionError::forbidden("User profile not found"))?;

        let permissions = self
            .repos
            .permissions
            .list_for_role(profile.role)
            .await
            .map_err(internal("load role permissions"))?;

        Ok(AuthContext::new(
            user_id,
            email.or(Some(profile.email)),
            profile.role,
            permissions,
        ))
    }

    /// Fail with `Forbidden` unless the caller holds `permission`
    pub(crate) async fn require(
        &self,
        caller: &AuthContext,
        permission: &str,
        operation: &str,
    ) -> Result<(), DistributionError> {
        self.require_any(caller, &[permission], operation).await
    }

    /// Fail with `Forbidden` unless the caller holds one of `permissions`.
    /// Denials are written to the audit log.
    pub(crate) async fn require_any(
        &self,
        caller: &AuthContext,
        permissions: &[&str],
        operation: &str,
    ) -> Result<(), DistributionError> {
        if caller.can_any(permissions) {
            return Ok(());
        }

        tracing::warn!(
            user_id = %caller.user_id,
            role = %caller.role,
            operation,
            "permission denied"
        );
        self.audit(DistributionEvent::permission_denied(
            caller.user_id,
            caller.role.as_str(),
            permissions,
            operation,
        ))
        .await;

        Err(DistributionError::forbidden(format!(
            "Insufficient permissions for {operation}"
        )))
    }

    /// Super admin permissions may only be changed by the master admin
    fn guard_super_admin(&self, caller: &AuthContext, role: Role) -> Result<(), DistributionError> {
        if role == Role::SuperAdmin && self.settings.master_admin_id != Some(caller.user_id) {
            return Err(DistributionError::forbidden(
                "Cannot modify Ultimate Super Admin permissions",
            ));
        }
        Ok(())
    }

    async fn permissions_changed(
        &self,
        role: Role,
        action: &str,
        permissions: Vec<String>,
        changed_by: Option<Uuid>,
    ) {
        tracing::info!(role = %role, action, count = permissions.len(), "role permissions changed");
        self.audit(DistributionEvent::RolePermissionsChanged(
            RolePermissionsChangedEvent {
                role: role.as_str().to_string(),
                action: action.to_string(),
                permissions,
                changed_by,
                timestamp: Utc::now(),
            },
        ))
        .await;
    }

    // ===== Role permission operations =====

    /// Whether `role` currently holds `permission`
    pub async fn role_has_permission(
        &self,
        role: Role,
        permission: &str,
    ) -> Result<bool, DistributionError> {
        let granted = self
            .repos
            .permissions
            .list_for_role(role)
            .await
            .map_err(internal("list role permissions"))?;
        Ok(rbac::has_permission(&granted, permission))
    }

    pub async fn get_role_permissions(
        &self,
        caller: &AuthContext,
        role: Role,
    ) -> Result<Vec<String>, DistributionError> {
        self.require(caller, "role:read:any", "get_role_permissions")
            .await?;

        self.repos
            .permissions
            .list_for_role(role)
            .await
            .map_err(internal("list role permissions"))
    }

    pub async fn grant_permission(
        &self,
        caller: &AuthContext,
        role: Role,
        permission: &str,
    ) -> Result<Vec<String>, DistributionError> {
        self.require(caller, "role:update:any", "grant_permission")
            .await?;
        self.guard_super_admin(caller, role)?;

        let permission = permission.trim();
        if !rbac::is_valid_permission(permission) {
            return Err(DistributionError::validation(format!(
                "Invalid permission '{permission}', expected resource:action:scope"
            )));
        }

        let granted = self
            .repos
            .permissions
            .grant(role, permission)
            .await
            .map_err(internal("grant permission"))?;
        if !granted {
            return Err(DistributionError::conflict(format!(
                "Role {role} already has permission {permission}"
            )));
        }

        self.permissions_changed(
            role,
            "granted",
            vec![permission.to_string()],
            Some(caller.user_id),
        )
        .await;

        self.repos
            .permissions
            .list_for_role(role)
            .await
            .map_err(internal("list role permissions"))
    }

    pub async fn revoke_permission(
        &self,
        caller: &AuthContext,
        role: Role,
        permission: &str,
    ) -> Result<Vec<String>, DistributionError> {
        self.require(caller, "role:update:any", "revoke_permission")
            .await?;
        self.guard_super_admin(caller, role)?;

        let revoked = self
            .repos
            .permissions
            .revoke(role, permission)
            .await
            .map_err(internal("revoke permission"))?;
        if !revoked {
            return Err(DistributionError::not_found(
                "permission",
                format!("{role}/{permission}"),
            ));
        }

        self.permissions_changed(
            role,
            "revoked",
            vec![permission.to_string()],
            Some(caller.user_id),
        )
        .await;

        self.repos
            .permissions
            .list_for_role(role)
            .await
            .map_err(internal("list role permissions"))
    }

    /// Replace a role's permissions with its defaults
    pub async fn reset_role_defaults(
        &self,
        caller: &AuthContext,
        role: Role,
    ) -> Result<Vec<String>, DistributionError> {
        self.require(caller, "role:update:any", "reset_role_defaults")
            .await?;
        self.guard_super_admin(caller, role)?;

        let defaults: Vec<String> = rbac::default_permissions(role)
            .iter()
            .map(|p| p.to_string())
            .collect();

        self.repos
            .permissions
            .replace_all(role, &defaults)
            .await
            .map_err(internal("reset role permissions"))?;

        self.permissions_changed(role, "reset", defaults.clone(), Some(caller.user_id))
            .await;
        Ok(defaults)
    }

    /// Compare a role's stored permissions against its defaults
    pub async fn verify_role_permissions(
        &self,
        caller: &AuthContext,
        role: Role,
    ) -> Result<RolePermissionReport, DistributionError> {
        self.require(caller, "role:read:any", "verify_role_permissions")
            .await?;

        let stored = self
            .repos
            .permissions
            .list_for_role(role)
            .await
            .map_err(internal("list role permissions"))?;

        Ok(rbac::compare_with_defaults(role, &stored))
    }

    /// Give every role without stored permissions its defaults.
    /// Returns the roles that were seeded.
    pub async fn seed_default_permissions(&self) -> Result<Vec<Role>, DistributionError> {
        let mut seeded = Vec::new();

        for role in Role::ALL {
            let existing = self
                .repos
                .permissions
                .list_for_role(role)
                .await
                .map_err(internal("list role permissions"))?;
            if !existing.is_empty() {
                continue;
            }

            let defaults: Vec<String> = rbac::default_permissions(role)
                .iter()
                .map(|p| p.to_string())
                .collect();
            self.repos
                .permissions
                .replace_all(role, &defaults)
                .await
                .map_err(internal("seed role permissions"))?;

            self.permissions_changed(role, "seeded", defaults, None)
                .await;
            seeded.push(role);
        }

        if !seeded.is_empty() {
            tracing::info!(roles = ?seeded, "seeded default role permissions");
        }
        Ok(seeded)
    }
}
