//! Integration tests for profile edits and the identity lock

mod common;

use chrono::NaiveDate;
use common::{print_test_header, TestPlatform};
use distribution_service::contract::*;

fn identity(first: &str, last: &str) -> ProfileUpdate {
    ProfileUpdate {
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(1992, 4, 18),
        city: Some("Manchester".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_user_updates_own_profile() {
    print_test_header(
        "test_user_updates_own_profile",
        &["Owners edit their details and the change is audited"],
    );
    let platform = TestPlatform::new().await;
    let artist = platform.user(Role::Artist).await;

    let update = ProfileUpdate {
        display_name: Some("Nova".to_string()),
        bio: Some("Synth pop from the north".to_string()),
        ..identity("Ada", "Byron")
    };
    let profile = platform
        .service
        .update_my_profile(&artist, update)
        .await
        .unwrap();

    assert_eq!(profile.display_name.as_deref(), Some("Nova"));
    assert_eq!(profile.details.first_name.as_deref(), Some("Ada"));
    assert_eq!(profile.details.city.as_deref(), Some("Manchester"));
    assert_eq!(profile.profile_lock_status, ProfileLockStatus::Unlocked);
    assert!(profile.locked_fields.is_empty());

    let stored = platform.service.get_my_profile(&artist).await.unwrap();
    assert_eq!(stored.details, profile.details);

    let events = platform.audit.events_of("profile_updated");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].user_id, Some(artist.user_id));
}

#[tokio::test]
async fn test_profile_edit_keeps_wallet() {
    let platform = TestPlatform::new().await;
    let artist = platform.user(Role::Artist).await;
    platform.set_balance(artist.user_id, common::dec("42.50"));

    platform
        .service
        .update_my_profile(&artist, identity("Ada", "Byron"))
        .await
        .unwrap();

    assert_eq!(platform.balance(artist.user_id), common::dec("42.50"));
}

#[tokio::test]
async fn test_locked_identity_rejects_owner_edits() {
    print_test_header(
        "test_locked_identity_rejects_owner_edits",
        &[
            "Once locked, identity fields are frozen for the owner",
            "The display name and free fields stay editable",
        ],
    );
    let platform = TestPlatform::new().await;
    let artist = platform.user(Role::Artist).await;

    let locked = platform
        .service
        .update_my_profile(
            &artist,
            ProfileUpdate {
                lock_identity: true,
                ..identity("Ada", "Byron")
            },
        )
        .await
        .unwrap();
    assert_eq!(locked.profile_lock_status, ProfileLockStatus::Locked);
    assert!(locked.locked_fields.contains(&"first_name".to_string()));

    let err = platform
        .service
        .update_my_profile(
            &artist,
            ProfileUpdate {
                last_name: Some("Lovelace".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Forbidden { .. }));

    let profile = platform
        .service
        .update_my_profile(
            &artist,
            ProfileUpdate {
                display_name: Some("Countess".to_string()),
                phone: Some("+44 161 000 0000".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(profile.display_name.as_deref(), Some("Countess"));
    assert_eq!(profile.details.last_name.as_deref(), Some("Byron"));
}

#[tokio::test]
async fn test_admin_edits_locked_profile() {
    let platform = TestPlatform::new().await;
    let artist = platform.user(Role::Artist).await;
    let admin = platform.user(Role::CompanyAdmin).await;
    platform
        .service
        .update_my_profile(
            &artist,
            ProfileUpdate {
                lock_identity: true,
                ..identity("Ada", "Byron")
            },
        )
        .await
        .unwrap();

    let profile = platform
        .service
        .update_user_profile(
            &admin,
            artist.user_id,
            ProfileUpdate {
                last_name: Some("Lovelace".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(profile.details.last_name.as_deref(), Some("Lovelace"));
    assert_eq!(profile.profile_lock_status, ProfileLockStatus::Locked);
    let events = platform.audit.events_of("profile_updated");
    assert_eq!(events.last().and_then(|e| e.user_id), Some(admin.user_id));
}

#[tokio::test]
async fn test_profile_lock_needs_admin() {
    print_test_header(
        "test_profile_lock_needs_admin",
        &["Only callers with user:update:any can lock or unlock a profile"],
    );
    let platform = TestPlatform::new().await;
    let artist = platform.user(Role::Artist).await;
    let admin = platform.user(Role::CompanyAdmin).await;

    let err = platform
        .service
        .set_profile_lock(&artist, artist.user_id, false)
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Forbidden { .. }));

    let locked = platform
        .service
        .set_profile_lock(&admin, artist.user_id, true)
        .await
        .unwrap();
    assert_eq!(locked.profile_lock_status, ProfileLockStatus::Locked);

    let err = platform
        .service
        .update_my_profile(&artist, identity("Ada", "Byron"))
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Forbidden { .. }));

    let unlocked = platform
        .service
        .set_profile_lock(&admin, artist.user_id, false)
        .await
        .unwrap();
    assert_eq!(unlocked.profile_lock_status, ProfileLockStatus::Unlocked);
    assert!(unlocked.locked_fields.is_empty());
    assert!(platform
        .service
        .update_my_profile(&artist, identity("Ada", "Byron"))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_profile_edit_permissions() {
    let platform = TestPlatform::new().await;
    let finance = platform.user(Role::FinancialAdmin).await;
    let artist = platform.user(Role::Artist).await;
    let other = platform.user(Role::Artist).await;

    let err = platform
        .service
        .update_my_profile(&finance, identity("Fin", "Ance"))
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Forbidden { .. }));

    let err = platform
        .service
        .update_user_profile(&artist, other.user_id, identity("Not", "Mine"))
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Forbidden { .. }));
    assert!(!platform.audit.events_of("permission_denied").is_empty());
}

#[tokio::test]
async fn test_profile_validation() {
    let platform = TestPlatform::new().await;
    let artist = platform.user(Role::Artist).await;
    let admin = platform.user(Role::CompanyAdmin).await;

    let err = platform
        .service
        .update_my_profile(
            &artist,
            ProfileUpdate {
                lock_identity: true,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Validation { .. }));

    let err = platform
        .service
        .update_user_profile(&admin, uuid::Uuid::new_v4(), identity("No", "One"))
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::NotFound { .. }));
}
