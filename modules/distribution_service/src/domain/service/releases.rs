//! Release lifecycle and change requests

use super::{internal, Service};
use crate::contract::{
    AuthContext, ChangeRequest, ChangeRequestFilter, ChangeRequestStatus, DistributionError,
    NewChangeRequest, NewRelease, Release, ReleaseFilter, ReleaseStatus, Role, StatusChange,
    StatusUpdate,
};
use crate::domain::events::{
    ChangeRequestEvent, DistributionEvent, ReleaseCreatedEvent, ReleaseStatusChangedEvent,
};
use crate::domain::release_status;
use chrono::Utc;
use uuid::Uuid;

/// Permissions that let a caller review releases and change requests
const REVIEWER_PERMISSIONS: [&str; 2] = ["release:approve:any", "release:approve:partner"];

const CREATE_PERMISSIONS: [&str; 4] = [
    "release:create:own",
    "release:create:label",
    "release:create:partner",
    "release:create:any",
];

const MAX_TITLE_LEN: usize = 255;

/// How much of the catalogue a caller may see
enum ReleaseScope {
    All,
    Label(Uuid),
    Own(Uuid),
}

fn release_scope(caller: &AuthContext) -> Option<ReleaseScope> {
    if caller.can_any(&["release:read:any", "release:read:partner"]) {
        Some(ReleaseScope::All)
    } else if caller.can("release:read:label") {
        Some(ReleaseScope::Label(caller.user_id))
    } else if caller.can("release:read:own") {
        Some(ReleaseScope::Own(caller.user_id))
    } else {
        None
    }
}

fn is_party_to(release: &Release, user_id: Uuid) -> bool {
    release.artist_id == user_id || release.label_admin_id == Some(user_id)
}

impl Service {
    async fn load_release(&self, release_id: Uuid) -> Result<Release, DistributionError> {
        self.repos
            .releases
            .find_by_id(release_id)
            .await
            .map_err(internal("load release"))?
            .ok_or_else(|| DistributionError::not_found("release", release_id))
    }

    // ===== Releases =====

    /// Create a draft release owned by the caller
    pub async fn create_release(
        &self,
        caller: &AuthContext,
        new_release: NewRelease,
    ) -> Result<Release, DistributionError> {
        self.require_any(caller, &CREATE_PERMISSIONS, "create_release")
            .await?;

        let title = new_release.title.trim();
        if title.is_empty() {
            return Err(DistributionError::validation("Release title is required"));
        }
        if title.len() > MAX_TITLE_LEN {
            return Err(DistributionError::validation(format!(
                "Release title must be at most {MAX_TITLE_LEN} characters"
            )));
        }

        let label_admin_id = if caller.role == Role::LabelAdmin {
            Some(caller.user_id)
        } else {
            self.load_user(caller.user_id).await?.label_admin_id
        };

        let now = Utc::now();
        let release = Release {
            id: Uuid::new_v4(),
            artist_id: caller.user_id,
            label_admin_id,
            title: title.to_string(),
            status: ReleaseStatus::Draft,
            release_date: new_release.release_date,
            pending_change_requests: 0,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .repos
            .releases
            .create(&release)
            .await
            .map_err(internal("create release"))?;

        tracing::info!(release_id = %created.id, artist_id = %created.artist_id, "release created");
        self.audit(DistributionEvent::ReleaseCreated(ReleaseCreatedEvent {
            release_id: created.id,
            artist_id: created.artist_id,
            title: created.title.clone(),
            timestamp: now,
        }))
        .await;

        Ok(created)
    }

    pub async fn get_release(
        &self,
        caller: &AuthContext,
        release_id: Uuid,
    ) -> Result<Release, DistributionError> {
        let release = self.load_release(release_id).await?;

        let visible = match release_scope(caller) {
            Some(ReleaseScope::All) => true,
            Some(ReleaseScope::Label(label)) => is_party_to(&release, label),
            Some(ReleaseScope::Own(user)) => release.artist_id == user,
            None => false,
        };
        if !visible {
            self.require_any(
                caller,
                &["release:read:any", "release:read:partner"],
                "get_release",
            )
            .await?;
        }

        Ok(release)
    }

    /// List releases visible to the caller
    pub async fn list_releases(
        &self,
        caller: &AuthContext,
        status: Option<ReleaseStatus>,
    ) -> Result<Vec<Release>, DistributionError> {
        let Some(scope) = release_scope(caller) else {
            return self
                .require_any(
                    caller,
                    &[
                        "release:read:any",
                        "release:read:partner",
                        "release:read:label",
                        "release:read:own",
                    ],
                    "list_releases",
                )
                .await
                .map(|_| Vec::new());
        };

        // label admins create releases under their own label, so the label
        // filter covers those too
        let mut filter = ReleaseFilter {
            status,
            ..Default::default()
        };
        match scope {
            ReleaseScope::All => {}
            ReleaseScope::Label(label) => filter.label_admin_id = Some(label),
            ReleaseScope::Own(user) => filter.artist_id = Some(user),
        }

        self.repos
            .releases
            .list(&filter)
            .await
            .map_err(internal("list releases"))
    }

    /// Move a release along the status graph.
    ///
    /// Owners may only submit; every other move needs a reviewer permission.
    pub async fn update_release_status(
        &self,
        caller: &AuthContext,
        release_id: Uuid,
        to_status: ReleaseStatus,
        notes: Option<String>,
    ) -> Result<StatusUpdate, DistributionError> {
        let release = self.load_release(release_id).await?;

        let owner_submitting =
            is_party_to(&release, caller.user_id) && to_status == ReleaseStatus::Submitted;
        if !owner_submitting {
            self.require_any(caller, &REVIEWER_PERMISSIONS, "update_release_status")
                .await?;
        }

        release_status::validate_status_transition(release.status, to_status)?;

        let change = StatusChange {
            id: Uuid::new_v4(),
            release_id,
            from_status: release.status,
            to_status,
            changed_by: caller.user_id,
            notes: notes.unwrap_or_default(),
            changed_at: Utc::now(),
        };

        let updated = self
            .repos
            .releases
            .apply_status_change(&change)
            .await
            .map_err(internal("apply status change"))?
            .ok_or_else(|| {
                DistributionError::conflict("Release status was changed by another request")
            })?;

        tracing::info!(
            release_id = %release_id,
            from = %change.from_status,
            to = %change.to_status,
            changed_by = %caller.user_id,
            "release status updated"
        );

        let event = DistributionEvent::ReleaseStatusChanged(ReleaseStatusChangedEvent {
            release_id,
            artist_id: updated.artist_id,
            from_status: change.from_status.as_str().to_string(),
            to_status: change.to_status.as_str().to_string(),
            changed_by: caller.user_id,
            notes: change.notes.clone(),
            timestamp: change.changed_at,
        });
        self.audit(event.clone()).await;
        if release_status::notifies_artist(to_status) {
            self.notify(event).await;
        }

        Ok(StatusUpdate {
            release: updated,
            change,
            message: release_status::status_message(to_status),
        })
    }

    pub async fn release_history(
        &self,
        caller: &AuthContext,
        release_id: Uuid,
    ) -> Result<Vec<StatusChange>, DistributionError> {
        self.get_release(caller, release_id).await?;

        self.repos
            .releases
            .status_history(release_id)
            .await
            .map_err(internal("load status history"))
    }

    // ===== Change requests =====

    pub async fn create_change_request(
        &self,
        caller: &AuthContext,
        input: NewChangeRequest,
    ) -> Result<ChangeRequest, DistributionError> {
        if input.field_name.trim().is_empty() || input.reason.trim().is_empty() {
            return Err(DistributionError::validation("Missing required fields"));
        }
        if !(1..=5).contains(&input.urgency_level) {
            return Err(DistributionError::validation(
                "Urgency level must be between 1 and 5",
            ));
        }

        let release = self.load_release(input.release_id).await?;
        if !is_party_to(&release, caller.user_id) {
            self.require(caller, "release:update:any", "create_change_request")
                .await?;
        }

        if !release_status::accepts_change_requests(release.status) {
            return Err(DistributionError::validation(
                "Change requests can only be made for releases in review, completed, or live",
            ));
        }

        let now = Utc::now();
        let request = ChangeRequest {
            id: Uuid::new_v4(),
            release_id: release.id,
            requested_by: caller.user_id,
            request_type: if input.request_type.trim().is_empty() {
                "metadata".to_string()
            } else {
                input.request_type
            },
            field_name: input.field_name.trim().to_string(),
            current_value: input.current_value,
            requested_value: input.requested_value,
            reason: input.reason,
            urgency_level: input.urgency_level,
            status: ChangeRequestStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .repos
            .change_requests
            .create(&request)
            .await
            .map_err(internal("create change request"))?;

        tracing::info!(
            change_request_id = %created.id,
            release_id = %created.release_id,
            field = %created.field_name,
            "change request created"
        );
        self.audit(DistributionEvent::ChangeRequestSubmitted(ChangeRequestEvent {
            change_request_id: created.id,
            release_id: created.release_id,
            field_name: created.field_name.clone(),
            status: created.status.as_str().to_string(),
            user_id: caller.user_id,
            timestamp: now,
        }))
        .await;

        Ok(created)
    }

    /// Reviewers see every request; everyone else only their own
    pub async fn list_change_requests(
        &self,
        caller: &AuthContext,
        release_id: Option<Uuid>,
        status: Option<ChangeRequestStatus>,
    ) -> Result<Vec<ChangeRequest>, DistributionError> {
        let requested_by = if caller.can_any(&REVIEWER_PERMISSIONS) {
            None
        } else {
            Some(caller.user_id)
        };

        self.repos
            .change_requests
            .list(&ChangeRequestFilter {
                release_id,
                status,
                requested_by,
            })
            .await
            .map_err(internal("list change requests"))
    }

    pub async fn review_change_request(
        &self,
        caller: &AuthContext,
        request_id: Uuid,
        decision: ChangeRequestStatus,
        review_notes: Option<String>,
    ) -> Result<ChangeRequest, DistributionError> {
        self.require_any(caller, &REVIEWER_PERMISSIONS, "review_change_request")
            .await?;

        if decision == ChangeRequestStatus::Pending {
            return Err(DistributionError::validation(
                "Status must be approved or rejected",
            ));
        }

        let existing = self
            .repos
            .change_requests
            .find_by_id(request_id)
            .await
            .map_err(internal("load change request"))?
            .ok_or_else(|| DistributionError::not_found("change_request", request_id))?;

        if existing.status != ChangeRequestStatus::Pending {
            return Err(DistributionError::conflict(
                "Change request has already been reviewed",
            ));
        }

        let now = Utc::now();
        let reviewed = ChangeRequest {
            status: decision,
            reviewed_by: Some(caller.user_id),
            reviewed_at: Some(now),
            review_notes,
            updated_at: now,
            ..existing
        };

        let stored = self
            .repos
            .change_requests
            .review(&reviewed)
            .await
            .map_err(internal("review change request"))?
            .ok_or_else(|| {
                DistributionError::conflict("Change request has already been reviewed")
            })?;

        tracing::info!(
            change_request_id = %stored.id,
            status = %stored.status,
            reviewed_by = %caller.user_id,
            "change request reviewed"
        );
        let event = DistributionEvent::ChangeRequestReviewed(ChangeRequestEvent {
            change_request_id: stored.id,
            release_id: stored.release_id,
            field_name: stored.field_name.clone(),
            status: stored.status.as_str().to_string(),
            user_id: caller.user_id,
            timestamp: now,
        });
        self.audit(event.clone()).await;
        self.notify(event).await;

        Ok(stored)
    }
}
