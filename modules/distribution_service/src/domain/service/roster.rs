//! Label rosters and the requests that sign artists to them

use super::{internal, recover, Service};
use crate::contract::{
    ArtistRequest, ArtistRequestFilter, ArtistRequestStatus, AuthContext, DistributionError, Role,
    UserProfile,
};
use crate::domain::events::{ArtistRequestEvent, DistributionEvent};
use chrono::Utc;
use uuid::Uuid;

const MAX_MESSAGE_LEN: usize = 1000;

impl Service {
    /// Artists signed to a label admin. Without `label_admin_id` the caller's
    /// own roster is returned.
    pub async fn label_roster(
        &self,
        caller: &AuthContext,
        label_admin_id: Option<Uuid>,
    ) -> Result<Vec<UserProfile>, DistributionError> {
        let label_admin_id = label_admin_id.unwrap_or(caller.user_id);
        if label_admin_id == caller.user_id {
            self.require_any(
                caller,
                &["label:roster:read:own", "label:roster:read:any"],
                "label_roster",
            )
            .await?;
        } else {
            self.require(caller, "label:roster:read:any", "label_roster")
                .await?;
        }

        self.repos
            .users
            .roster(label_admin_id)
            .await
            .map_err(internal("load label roster"))
    }

    /// Ask a company admin to sign `artist_id` to the caller's label
    pub async fn request_artist_affiliation(
        &self,
        caller: &AuthContext,
        artist_id: Uuid,
        message: Option<String>,
    ) -> Result<ArtistRequest, DistributionError> {
        self.require(
            caller,
            "label:roster:manage:own",
            "request_artist_affiliation",
        )
        .await?;
        if caller.role != Role::LabelAdmin {
            return Err(DistributionError::forbidden(
                "Only label admins can request artists",
            ));
        }

        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        if message
            .as_ref()
            .is_some_and(|m| m.chars().count() > MAX_MESSAGE_LEN)
        {
            return Err(DistributionError::validation(format!(
                "message must be at most {} characters",
                MAX_MESSAGE_LEN
            )));
        }

        let artist = self.load_user(artist_id).await?;
        if artist.role != Role::Artist {
            return Err(DistributionError::validation(
                "Target user is not an artist",
            ));
        }
        match artist.label_admin_id {
            Some(label) if label == caller.user_id => {
                return Err(DistributionError::conflict(
                    "Artist is already on your roster",
                ))
            }
            Some(_) => {
                return Err(DistributionError::conflict(
                    "Artist is already signed to a label",
                ))
            }
            None => {}
        }

        let pending = self
            .repos
            .artist_requests
            .list(&ArtistRequestFilter {
                status: Some(ArtistRequestStatus::Pending),
                label_admin_id: Some(caller.user_id),
                artist_id: Some(artist_id),
            })
            .await
            .map_err(internal("load artist requests"))?;
        if !pending.is_empty() {
            return Err(DistributionError::conflict(
                "A request for this artist is already pending",
            ));
        }

        let now = Utc::now();
        let request = self
            .repos
            .artist_requests
            .create(&ArtistRequest {
                id: Uuid::new_v4(),
                label_admin_id: caller.user_id,
                artist_id,
                message,
                status: ArtistRequestStatus::Pending,
                reviewed_by: None,
                reviewed_at: None,
                review_notes: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .map_err(internal("create artist request"))?;

        tracing::info!(
            request_id = %request.id,
            label_admin_id = %caller.user_id,
            artist_id = %artist_id,
            "artist affiliation requested"
        );
        self.audit(DistributionEvent::ArtistRequestSubmitted(request_event(
            &request,
            caller.user_id,
        )))
        .await;

        Ok(request)
    }

    /// Requests visible to the caller: every request with
    /// `label:roster:manage:any`, otherwise only the caller's own
    pub async fn list_artist_requests(
        &self,
        caller: &AuthContext,
        mut filter: ArtistRequestFilter,
    ) -> Result<Vec<ArtistRequest>, DistributionError> {
        if !caller.can("label:roster:manage:any") {
            self.require(caller, "label:roster:read:own", "list_artist_requests")
                .await?;
            filter.label_admin_id = Some(caller.user_id);
        }

        self.repos
            .artist_requests
            .list(&filter)
            .await
            .map_err(internal("list artist requests"))
    }

    /// Approve or reject a pending request. Approval signs the artist to the
    /// requesting label.
    pub async fn review_artist_request(
        &self,
        caller: &AuthContext,
        request_id: Uuid,
        status: ArtistRequestStatus,
        notes: Option<String>,
    ) -> Result<ArtistRequest, DistributionError> {
        self.require(caller, "label:roster:manage:any", "review_artist_request")
            .await?;

        if status == ArtistRequestStatus::Pending {
            return Err(DistributionError::validation(
                "Review status must be approved or rejected",
            ));
        }

        let request = self
            .repos
            .artist_requests
            .find_by_id(request_id)
            .await
            .map_err(internal("load artist request"))?
            .ok_or_else(|| DistributionError::not_found("artist request", request_id))?;
        if request.status != ArtistRequestStatus::Pending {
            return Err(DistributionError::conflict(format!(
                "Request was already {}",
                request.status
            )));
        }

        let now = Utc::now();
        let reviewed = ArtistRequest {
            status,
            reviewed_by: Some(caller.user_id),
            reviewed_at: Some(now),
            review_notes: notes.filter(|n| !n.trim().is_empty()),
            updated_at: now,
            ..request
        };
        let saved = self
            .repos
            .artist_requests
            .review(&reviewed)
            .await
            .map_err(recover("review artist request"))?
            .ok_or_else(|| DistributionError::conflict("Request was reviewed concurrently"))?;

        tracing::info!(
            request_id = %saved.id,
            status = %saved.status,
            reviewed_by = %caller.user_id,
            "artist request reviewed"
        );
        let event = request_event(&saved, caller.user_id);
        self.audit(DistributionEvent::ArtistRequestReviewed(event.clone()))
            .await;
        self.notify(DistributionEvent::ArtistRequestReviewed(event))
            .await;

        Ok(saved)
    }
}

fn request_event(request: &ArtistRequest, user_id: Uuid) -> ArtistRequestEvent {
    ArtistRequestEvent {
        request_id: request.id,
        label_admin_id: request.label_admin_id,
        artist_id: request.artist_id,
        status: request.status.as_str().to_string(),
        user_id,
        timestamp: Utc::now(),
    }
}
