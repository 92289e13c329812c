//! Role based access control
//!
//! Permissions are `resource:action:scope` strings. Some resources carry an
//! inner segment (`label:roster:read:any`); the last segment is always the
//! scope and the one before it the action.

use crate::contract::{Role, RolePermissionReport};
use std::collections::BTreeSet;

/// Grants every permission
pub const WILDCARD_ALL: &str = "*:*:*";

/// Split a permission into (resource, action, scope).
fn parts(permission: &str) -> Option<(&str, &str, &str)> {
    let mut segments = permission.rsplitn(3, ':');
    let scope = segments.next()?;
    let action = segments.next()?;
    let resource = segments.next()?;
    if resource.is_empty() || action.is_empty() || scope.is_empty() {
        return None;
    }
    Some((resource, action, scope))
}

/// Whether a single granted permission satisfies `required`
pub fn permission_matches(granted: &str, required: &str) -> bool {
    if granted == WILDCARD_ALL || granted == required {
        return true;
    }

    let (Some((g_res, g_act, g_scope)), Some((r_res, r_act, r_scope))) =
        (parts(granted), parts(required))
    else {
        return false;
    };

    if g_res != r_res && g_res != "*" {
        return false;
    }
    (g_act == "*" || g_act == r_act) && (g_scope == "*" || g_scope == r_scope)
}

pub fn has_permission<S: AsRef<str>>(granted: &[S], required: &str) -> bool {
    granted
        .iter()
        .any(|g| permission_matches(g.as_ref(), required))
}

pub fn has_any_permission<S: AsRef<str>>(granted: &[S], required: &[&str]) -> bool {
    required.iter().any(|r| has_permission(granted, r))
}

pub fn has_all_permissions<S: AsRef<str>>(granted: &[S], required: &[&str]) -> bool {
    required.iter().all(|r| has_permission(granted, r))
}

/// Syntactic check used before storing a permission
pub fn is_valid_permission(permission: &str) -> bool {
    permission == WILDCARD_ALL
        || (parts(permission).is_some()
            && permission
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '*' | '-')))
}

/// Default permissions a role is seeded with
pub fn default_permissions(role: Role) -> &'static [&'static str] {
    match role {
        Role::SuperAdmin => &[WILDCARD_ALL],
        Role::CompanyAdmin => &[
            "user:read:any",
            "user:create:any",
            "user:update:any",
            "user:delete:any",
            "release:read:any",
            "release:create:partner",
            "release:update:any",
            "release:delete:any",
            "release:approve:any",
            "release:distribute:any",
            "analytics:read:any",
            "earnings:read:any",
            "earnings:calculate:any",
            "payout:read:any",
            "payout:approve:any",
            "label:read:any",
            "label:roster:read:any",
            "label:roster:manage:any",
            "split:read:any",
            "split:approve:any",
            "wallet:read:any",
            "wallet:read:own",
            "wallet:adjust:any",
            "role:read:any",
            "subscription:read:any",
            "subscription:manage:any",
            "notification:send:any",
        ],
        Role::LabelAdmin => &[
            "user:read:label",
            "user:read:own",
            "user:update:own",
            "release:read:label",
            "release:create:label",
            "release:update:label",
            "release:read:own",
            "release:create:own",
            "release:update:own",
            "analytics:read:label",
            "earnings:read:label",
            "earnings:read:own",
            "payout:read:own",
            "label:read:own",
            "label:roster:read:own",
            "label:roster:manage:own",
            "split:read:label",
            "split:read:own",
            "wallet:read:own",
            "subscription:read:own",
            "subscription:update:own",
            "subscription:cancel:own",
            "notification:read:own",
        ],
        Role::DistributionPartner => &[
            "distribution:read:partner",
            "distribution:manage:partner",
            "release:read:partner",
            "release:create:partner",
            "release:update:partner",
            "release:approve:partner",
            "analytics:read:partner",
            "earnings:read:partner",
            "user:read:partner",
            "user:read:own",
            "user:update:own",
            "wallet:read:own",
            "subscription:read:own",
            "notification:read:own",
        ],
        Role::Artist => &[
            "user:read:own",
            "user:update:own",
            "release:read:own",
            "release:create:own",
            "release:update:own",
            "release:delete:own",
            "analytics:read:own",
            "earnings:read:own",
            "payout:read:own",
            "payout:create:own",
            "split:read:own",
            "distribution:read:own",
            "wallet:read:own",
            "subscription:read:own",
            "subscription:update:own",
            "subscription:cancel:own",
            "notification:read:own",
        ],
        Role::ContentModerator => &[
            "content:read:any",
            "content:moderate:any",
            "release:read:any",
            "release:moderate:any",
            "user:read:any",
            "wallet:read:own",
            "notification:read:own",
        ],
        Role::FinancialAdmin => &[
            "earnings:read:any",
            "earnings:create:any",
            "earnings:update:any",
            "earnings:calculate:any",
            "payout:read:any",
            "payout:approve:any",
            "split:read:any",
            "split:approve:any",
            "analytics:read:any",
            "user:read:any",
            "wallet:read:any",
            "wallet:read:own",
            "wallet:adjust:any",
            "subscription:read:any",
            "notification:read:own",
        ],
    }
}

/// Compare stored permissions of a role against its defaults
pub fn compare_with_defaults(role: Role, granted: &[String]) -> RolePermissionReport {
    let expected: BTreeSet<&str> = default_permissions(role).iter().copied().collect();
    let actual: BTreeSet<&str> = granted.iter().map(String::as_str).collect();

    RolePermissionReport {
        role,
        granted: actual.iter().map(|p| p.to_string()).collect(),
        missing: expected.difference(&actual).map(|p| p.to_string()).collect(),
        extra: actual.difference(&expected).map(|p| p.to_string()).collect(),
    }
}
