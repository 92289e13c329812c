//! Integration tests for label rosters and artist affiliation requests

mod common;

use common::{new_profile, print_test_header, TestPlatform};
use distribution_service::contract::*;
use uuid::Uuid;

async fn pending_request(
    platform: &TestPlatform,
    label: &AuthContext,
    artist_id: Uuid,
) -> ArtistRequest {
    platform
        .service
        .request_artist_affiliation(label, artist_id, Some("Loved the EP".to_string()))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_label_requests_unsigned_artist() {
    print_test_header(
        "test_label_requests_unsigned_artist",
        &["A label admin can ask to sign an unsigned artist once"],
    );
    let platform = TestPlatform::new().await;
    let label = platform.user(Role::LabelAdmin).await;
    let artist = platform.user(Role::Artist).await;

    let request = pending_request(&platform, &label, artist.user_id).await;
    assert_eq!(request.status, ArtistRequestStatus::Pending);
    assert_eq!(request.label_admin_id, label.user_id);
    assert_eq!(request.message.as_deref(), Some("Loved the EP"));
    assert_eq!(platform.audit.events_of("artist_request_submitted").len(), 1);

    let err = platform
        .service
        .request_artist_affiliation(&label, artist.user_id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Conflict { .. }));
}

#[tokio::test]
async fn test_request_rejects_unavailable_targets() {
    let platform = TestPlatform::new().await;
    let label = platform.user(Role::LabelAdmin).await;
    let other_label = platform.user(Role::LabelAdmin).await;
    let partner = platform.user(Role::DistributionPartner).await;
    let signed = platform.signed_artist(other_label.user_id).await;
    let own = platform.signed_artist(label.user_id).await;

    let err = platform
        .service
        .request_artist_affiliation(&label, partner.user_id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Validation { .. }));

    for artist_id in [signed.user_id, own.user_id] {
        let err = platform
            .service
            .request_artist_affiliation(&label, artist_id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DistributionError::Conflict { .. }));
    }

    let err = platform
        .service
        .request_artist_affiliation(&label, Uuid::new_v4(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::NotFound { .. }));
}

#[tokio::test]
async fn test_only_label_admins_request_artists() {
    let platform = TestPlatform::new().await;
    let artist = platform.user(Role::Artist).await;
    let admin = platform.user(Role::CompanyAdmin).await;
    let target = platform.user(Role::Artist).await;

    for caller in [&artist, &admin] {
        let err = platform
            .service
            .request_artist_affiliation(caller, target.user_id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DistributionError::Forbidden { .. }));
    }
    assert!(platform.artist_requests.requests.read().is_empty());
}

#[tokio::test]
async fn test_approval_signs_artist() {
    print_test_header(
        "test_approval_signs_artist",
        &[
            "Approving a request puts the artist on the label's roster",
            "A reviewed request cannot be reviewed again",
        ],
    );
    let platform = TestPlatform::new().await;
    let label = platform.user(Role::LabelAdmin).await;
    let admin = platform.user(Role::CompanyAdmin).await;
    let artist = platform.user(Role::Artist).await;
    let request = pending_request(&platform, &label, artist.user_id).await;

    let reviewed = platform
        .service
        .review_artist_request(
            &admin,
            request.id,
            ArtistRequestStatus::Approved,
            Some("Welcome aboard".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(reviewed.status, ArtistRequestStatus::Approved);
    assert_eq!(reviewed.reviewed_by, Some(admin.user_id));
    assert_eq!(reviewed.review_notes.as_deref(), Some("Welcome aboard"));

    let roster = platform.service.label_roster(&label, None).await.unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].id, artist.user_id);
    assert_eq!(roster[0].label_admin_id, Some(label.user_id));
    assert_eq!(platform.audit.events_of("artist_request_reviewed").len(), 1);

    let err = platform
        .service
        .review_artist_request(&admin, request.id, ArtistRequestStatus::Rejected, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Conflict { .. }));
}

#[tokio::test]
async fn test_rejection_leaves_artist_unsigned() {
    let platform = TestPlatform::new().await;
    let label = platform.user(Role::LabelAdmin).await;
    let admin = platform.user(Role::CompanyAdmin).await;
    let artist = platform.user(Role::Artist).await;
    let request = pending_request(&platform, &label, artist.user_id).await;

    let reviewed = platform
        .service
        .review_artist_request(&admin, request.id, ArtistRequestStatus::Rejected, None)
        .await
        .unwrap();

    assert_eq!(reviewed.status, ArtistRequestStatus::Rejected);
    let stored = platform.service.get_my_profile(&artist).await.unwrap();
    assert_eq!(stored.label_admin_id, None);

    // a fresh request is allowed after a rejection
    assert!(platform
        .service
        .request_artist_affiliation(&label, artist.user_id, None)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_approval_conflicts_when_artist_signed_elsewhere() {
    let platform = TestPlatform::new().await;
    let label = platform.user(Role::LabelAdmin).await;
    let rival = platform.user(Role::LabelAdmin).await;
    let admin = platform.user(Role::CompanyAdmin).await;
    let artist = platform.user(Role::Artist).await;
    let ours = pending_request(&platform, &label, artist.user_id).await;
    let theirs = pending_request(&platform, &rival, artist.user_id).await;

    platform
        .service
        .review_artist_request(&admin, theirs.id, ArtistRequestStatus::Approved, None)
        .await
        .unwrap();
    let err = platform
        .service
        .review_artist_request(&admin, ours.id, ArtistRequestStatus::Approved, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Conflict { .. }));

    let stored = platform.artist_requests.requests.read()[&ours.id].clone();
    assert_eq!(stored.status, ArtistRequestStatus::Pending);
    let artist_profile = platform.service.get_my_profile(&artist).await.unwrap();
    assert_eq!(artist_profile.label_admin_id, Some(rival.user_id));
}

#[tokio::test]
async fn test_review_needs_manage_any() {
    let platform = TestPlatform::new().await;
    let label = platform.user(Role::LabelAdmin).await;
    let admin = platform.user(Role::CompanyAdmin).await;
    let artist = platform.user(Role::Artist).await;
    let request = pending_request(&platform, &label, artist.user_id).await;

    let err = platform
        .service
        .review_artist_request(&label, request.id, ArtistRequestStatus::Approved, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Forbidden { .. }));

    let err = platform
        .service
        .review_artist_request(&admin, request.id, ArtistRequestStatus::Pending, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Validation { .. }));

    let err = platform
        .service
        .review_artist_request(&admin, Uuid::new_v4(), ArtistRequestStatus::Approved, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::NotFound { .. }));
}

#[tokio::test]
async fn test_request_listing_is_scoped() {
    print_test_header(
        "test_request_listing_is_scoped",
        &["Label admins see their own requests, company admins see all"],
    );
    let platform = TestPlatform::new().await;
    let label = platform.user(Role::LabelAdmin).await;
    let rival = platform.user(Role::LabelAdmin).await;
    let admin = platform.user(Role::CompanyAdmin).await;
    let artist = platform.user(Role::Artist).await;
    let first = platform.user(Role::Artist).await;
    pending_request(&platform, &label, first.user_id).await;
    pending_request(&platform, &rival, first.user_id).await;

    let own = platform
        .service
        .list_artist_requests(
            &label,
            ArtistRequestFilter {
                label_admin_id: Some(rival.user_id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].label_admin_id, label.user_id);

    let all = platform
        .service
        .list_artist_requests(&admin, ArtistRequestFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let pending = platform
        .service
        .list_artist_requests(
            &admin,
            ArtistRequestFilter {
                status: Some(ArtistRequestStatus::Approved),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(pending.is_empty());

    let err = platform
        .service
        .list_artist_requests(&artist, ArtistRequestFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Forbidden { .. }));
}

#[tokio::test]
async fn test_roster_read_permissions() {
    let platform = TestPlatform::new().await;
    let label = platform.user(Role::LabelAdmin).await;
    let rival = platform.user(Role::LabelAdmin).await;
    let admin = platform.user(Role::CompanyAdmin).await;
    let artist = platform.signed_artist(label.user_id).await;
    platform.add_profile(new_profile(Role::Artist, Some(rival.user_id)));

    let roster = platform
        .service
        .label_roster(&admin, Some(label.user_id))
        .await
        .unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].id, artist.user_id);

    let err = platform
        .service
        .label_roster(&label, Some(rival.user_id))
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Forbidden { .. }));

    let err = platform
        .service
        .label_roster(&artist, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Forbidden { .. }));
}
