//! Profile edits and identity locking

use super::{internal, Service};
use crate::contract::{AuthContext, DistributionError, ProfileUpdate, UserProfile};
use crate::domain::events::{DistributionEvent, ProfileUpdatedEvent};
use crate::domain::profile;
use chrono::Utc;
use uuid::Uuid;

impl Service {
    /// Edit the caller's own profile. Locked identity fields are rejected.
    pub async fn update_my_profile(
        &self,
        caller: &AuthContext,
        update: ProfileUpdate,
    ) -> Result<UserProfile, DistributionError> {
        self.require_any(
            caller,
            &["user:update:own", "user:update:any"],
            "update_my_profile",
        )
        .await?;

        let current = self.load_user(caller.user_id).await?;
        let next = profile::apply_update(&current, update, false, Utc::now())?;
        self.store_profile(caller, &current, next).await
    }

    /// Administrative edit of any profile; ignores the identity lock
    pub async fn update_user_profile(
        &self,
        caller: &AuthContext,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<UserProfile, DistributionError> {
        self.require(caller, "user:update:any", "update_user_profile")
            .await?;

        let current = self.load_user(user_id).await?;
        let next = profile::apply_update(&current, update, true, Utc::now())?;
        self.store_profile(caller, &current, next).await
    }

    /// Lock or unlock a user's identity fields
    pub async fn set_profile_lock(
        &self,
        caller: &AuthContext,
        user_id: Uuid,
        locked: bool,
    ) -> Result<UserProfile, DistributionError> {
        self.require(caller, "user:update:any", "set_profile_lock")
            .await?;

        let current = self.load_user(user_id).await?;
        let next = profile::set_lock(&current, locked, Utc::now());
        self.store_profile(caller, &current, next).await
    }

    async fn store_profile(
        &self,
        caller: &AuthContext,
        before: &UserProfile,
        next: UserProfile,
    ) -> Result<UserProfile, DistributionError> {
        let saved = self
            .repos
            .users
            .update_profile(&next)
            .await
            .map_err(internal("update profile"))?
            .ok_or_else(|| DistributionError::not_found("user", next.id))?;

        let mut fields: Vec<String> = profile::changed_fields(&before.details, &saved.details)
            .into_iter()
            .map(str::to_string)
            .collect();
        if before.display_name != saved.display_name {
            fields.push("display_name".to_string());
        }

        tracing::info!(
            user_id = %saved.id,
            changed_by = %caller.user_id,
            lock_status = %saved.profile_lock_status,
            "profile updated"
        );
        self.audit(DistributionEvent::ProfileUpdated(ProfileUpdatedEvent {
            user_id: saved.id,
            changed_by: caller.user_id,
            fields,
            profile_lock_status: saved.profile_lock_status.as_str().to_string(),
            timestamp: Utc::now(),
        }))
        .await;

        Ok(saved)
    }
}
