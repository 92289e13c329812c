//! SeaORM repositories against an in-memory SQLite database

mod common;

use chrono::{Duration, Utc};
use common::{dec, new_profile, print_test_header, WEBHOOK_SECRET};
use distribution_service::contract::*;
use distribution_service::domain::repository::SettleGuard;
use distribution_service::domain::subscriptions;
use distribution_service::domain::wallet::LedgerPosting;
use distribution_service::domain::webhook::{self, DeliveryKey};
use distribution_service::domain::{Repositories, Service};
use distribution_service::infra::storage;
use distribution_service::{Config, DistributionServiceModule};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use uuid::Uuid;

struct Store {
    service: Arc<Service>,
    repos: Repositories,
}

async fn connect() -> Arc<DatabaseConnection> {
    // one connection, otherwise every pooled connection sees its own empty database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    Arc::new(Database::connect(options).await.unwrap())
}

async fn store() -> Store {
    let db = connect().await;
    let module = DistributionServiceModule::new(Config {
        jwt_secret: "storage-test-secret".to_string(),
        revolut_webhook_secret: Some(WEBHOOK_SECRET.to_string()),
        ..Config::default()
    });
    module.migrate(&db).await.unwrap();
    module.init(db.clone()).await.unwrap();

    Store {
        service: module.service().unwrap(),
        repos: storage::repositories(db),
    }
}

async fn profile(store: &Store, role: Role, balance: &str) -> AuthContext {
    let mut user = new_profile(role, None);
    user.wallet_balance = dec(balance);
    store.repos.users.upsert(&user).await.unwrap();
    store.service.resolve_caller(user.id, None).await.unwrap()
}

fn due_subscription(user_id: Uuid, amount: &str) -> Subscription {
    let end = Utc::now() - Duration::days(1);
    Subscription {
        id: Uuid::new_v4(),
        user_id,
        tier: "artist_pro".to_string(),
        status: SubscriptionStatus::Active,
        billing_cycle: BillingCycle::Monthly,
        amount: dec(amount),
        currency: "GBP".to_string(),
        current_period_start: end - Duration::days(30),
        current_period_end: end,
        auto_renew: true,
        renewal_failure_count: 0,
        renewal_failure_reason: None,
        last_renewal_attempt: None,
        created_at: end - Duration::days(30),
        updated_at: end - Duration::days(30),
    }
}

#[tokio::test]
async fn test_migrations_and_permission_seeding() {
    print_test_header(
        "test_migrations_and_permission_seeding",
        &["A fresh database is migrated and seeded with role defaults"],
    );
    let store = store().await;

    for role in Role::ALL {
        let stored = store.repos.permissions.list_for_role(role).await.unwrap();
        assert!(!stored.is_empty(), "no permissions seeded for {}", role.as_str());
    }

    let artist = profile(&store, Role::Artist, "0").await;
    assert!(artist.can("release:create:own"));

    let found = store
        .repos
        .users
        .find_by_id(artist.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.role, Role::Artist);

    let promoted = store
        .repos
        .users
        .update_role(artist.user_id, Role::LabelAdmin)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(promoted.role, Role::LabelAdmin);
    assert!(store
        .repos
        .users
        .update_role(Uuid::new_v4(), Role::Artist)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_post_entries_rolls_back_as_a_batch() {
    print_test_header(
        "test_post_entries_rolls_back_as_a_batch",
        &["A rejected posting undoes the postings before it in the same batch"],
    );
    let store = store().await;
    let payee = profile(&store, Role::Artist, "50").await;
    let payer = profile(&store, Role::Artist, "10").await;

    let batch = [
        LedgerPosting::credit(payee.user_id, dec("30"), TransactionKind::AdminAdjustment, "GBP"),
        LedgerPosting::strict_debit(
            payer.user_id,
            dec("25"),
            TransactionKind::AdminAdjustment,
            "GBP",
        ),
    ];
    let err = store.repos.finance.post_entries(&batch).await.unwrap_err();
    assert_eq!(
        err.downcast::<DistributionError>().unwrap(),
        DistributionError::InsufficientBalance {
            required: dec("25"),
            available: dec("10"),
        }
    );

    let account = store
        .repos
        .finance
        .account(payee.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.balance, dec("50"));
    assert!(store
        .repos
        .finance
        .transactions(payee.user_id, 10, 0)
        .await
        .unwrap()
        .is_empty());

    let rows = store.repos.finance.post_entries(&batch[..1]).await.unwrap();
    assert_eq!(rows[0].balance_before, dec("50"));
    assert_eq!(rows[0].balance_after, dec("80"));
    let account = store
        .repos
        .finance
        .account(payee.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.balance, dec("80"));
}

#[tokio::test]
async fn test_status_change_is_conditional() {
    let store = store().await;
    let artist = profile(&store, Role::Artist, "0").await;

    let release = store
        .service
        .create_release(
            &artist,
            NewRelease {
                title: "Stored".to_string(),
                release_date: None,
            },
        )
        .await
        .unwrap();

    let update = store
        .service
        .update_release_status(&artist, release.id, ReleaseStatus::Submitted, None)
        .await
        .unwrap();
    assert_eq!(update.release.status, ReleaseStatus::Submitted);

    // a writer that still believes the release is a draft loses
    let stale = StatusChange {
        id: Uuid::new_v4(),
        release_id: release.id,
        from_status: ReleaseStatus::Draft,
        to_status: ReleaseStatus::Submitted,
        changed_by: artist.user_id,
        notes: String::new(),
        changed_at: Utc::now(),
    };
    assert!(store
        .repos
        .releases
        .apply_status_change(&stale)
        .await
        .unwrap()
        .is_none());

    let history = store
        .repos
        .releases
        .status_history(release.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].from_status, ReleaseStatus::Draft);
    assert_eq!(history[0].to_status, ReleaseStatus::Submitted);
}

#[tokio::test]
async fn test_change_request_counter_is_persisted() {
    let store = store().await;
    let artist = profile(&store, Role::Artist, "0").await;
    let reviewer = profile(&store, Role::CompanyAdmin, "0").await;

    let release = store
        .service
        .create_release(
            &artist,
            NewRelease {
                title: "Counted".to_string(),
                release_date: None,
            },
        )
        .await
        .unwrap();
    store
        .service
        .update_release_status(&artist, release.id, ReleaseStatus::Submitted, None)
        .await
        .unwrap();
    store
        .service
        .update_release_status(&reviewer, release.id, ReleaseStatus::InReview, None)
        .await
        .unwrap();

    let request = store
        .service
        .create_change_request(
            &artist,
            NewChangeRequest {
                release_id: release.id,
                request_type: "artwork".to_string(),
                field_name: "cover".to_string(),
                current_value: None,
                requested_value: Some("new-cover.png".to_string()),
                reason: "Higher resolution".to_string(),
                urgency_level: 4,
            },
        )
        .await
        .unwrap();
    let stored = store
        .repos
        .releases
        .find_by_id(release.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.pending_change_requests, 1);

    store
        .service
        .review_change_request(&reviewer, request.id, ChangeRequestStatus::Rejected, None)
        .await
        .unwrap();
    let stored = store
        .repos
        .releases
        .find_by_id(release.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.pending_change_requests, 0);

    let err = store
        .service
        .review_change_request(&reviewer, request.id, ChangeRequestStatus::Approved, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Conflict { .. }));
}

#[tokio::test]
async fn test_subscription_renewal_round_trip() {
    let store = store().await;
    let artist = profile(&store, Role::Artist, "50").await;

    let due = due_subscription(artist.user_id, "20");
    store.repos.finance.save_subscription(&due).await.unwrap();

    let report = store.service.process_renewals(Utc::now()).await.unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(report.successful, 1);

    let account = store
        .repos
        .finance
        .account(artist.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.balance, dec("30"));

    let current = store
        .repos
        .finance
        .find_active_subscription(artist.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.id, due.id);
    assert!(current.current_period_end > Utc::now());

    let ledger = store
        .repos
        .finance
        .transactions(artist.user_id, 10, 0)
        .await
        .unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].kind, TransactionKind::SubscriptionRenewal);
    assert_eq!(ledger[0].amount, dec("-20"));
}

#[tokio::test]
async fn test_webhook_deduplication_lookup() {
    let store = store().await;

    let log = |status: &str, event: &str| WebhookLog {
        id: Uuid::new_v4(),
        provider: "revolut".to_string(),
        event_type: event.to_string(),
        order_id: Some("ord-42".to_string()),
        status: status.to_string(),
        data: serde_json::json!({}),
        created_at: Utc::now(),
    };

    store
        .repos
        .audit
        .record_webhook(&log("failed", "ORDER_COMPLETED"))
        .await
        .unwrap();
    assert!(!store
        .repos
        .audit
        .webhook_processed("revolut", "ord-42", "ORDER_COMPLETED")
        .await
        .unwrap());

    store
        .repos
        .audit
        .record_webhook(&log("processed", "ORDER_COMPLETED"))
        .await
        .unwrap();
    assert!(store
        .repos
        .audit
        .webhook_processed("revolut", "ord-42", "ORDER_COMPLETED")
        .await
        .unwrap());
    assert!(!store
        .repos
        .audit
        .webhook_processed("revolut", "ord-42", "ORDER_AUTHORISED")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_concurrent_renewal_runs_charge_once() {
    print_test_header(
        "test_concurrent_renewal_runs_charge_once",
        &["Two overlapping renewal runs debit a due subscription a single time"],
    );
    let store = store().await;
    let artist = profile(&store, Role::Artist, "100").await;
    let due = due_subscription(artist.user_id, "20");
    store.repos.finance.save_subscription(&due).await.unwrap();

    let now = Utc::now();
    let (first, second) = tokio::join!(
        store.service.process_renewals(now),
        store.service.process_renewals(now)
    );
    let (first, second) = (first.unwrap(), second.unwrap());

    assert_eq!(first.successful + second.successful, 1);
    assert_eq!(
        first.processed + second.processed,
        1 + first.skipped + second.skipped
    );
    assert_eq!(first.insufficient_funds + second.insufficient_funds, 0);

    let account = store
        .repos
        .finance
        .account(artist.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.balance, dec("80"));
    let ledger = store
        .repos
        .finance
        .transactions(artist.user_id, 10, 0)
        .await
        .unwrap();
    assert_eq!(ledger.len(), 1);
}

#[tokio::test]
async fn test_settle_with_stale_subscription_writes_nothing() {
    print_test_header(
        "test_settle_with_stale_subscription_writes_nothing",
        &["A renewal prepared before a cancellation is not applied after it"],
    );
    let store = store().await;
    let artist = profile(&store, Role::Artist, "100").await;
    let due = due_subscription(artist.user_id, "20");
    store.repos.finance.save_subscription(&due).await.unwrap();

    // the renewal run loaded `due`, then the user cancelled
    let cancelled = store.service.cancel_subscription(&artist).await.unwrap();
    assert_eq!(cancelled.status, SubscriptionStatus::Cancelled);

    let now = Utc::now();
    let posting = LedgerPosting::strict_debit(
        artist.user_id,
        due.amount,
        TransactionKind::SubscriptionRenewal,
        "GBP",
    );
    let renewed = subscriptions::renewed(&due, now);
    let outcome = store
        .repos
        .finance
        .settle_subscription(Some(&posting), &renewed, SettleGuard::expecting(&due))
        .await
        .unwrap();
    assert!(outcome.is_none());

    let latest = store
        .repos
        .finance
        .latest_subscription(artist.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.status, SubscriptionStatus::Cancelled);
    assert!(!latest.auto_renew);
    let account = store
        .repos
        .finance
        .account(artist.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.balance, dec("100"));
    assert!(store
        .repos
        .finance
        .transactions(artist.user_id, 10, 0)
        .await
        .unwrap()
        .is_empty());

    // a renewal that already moved the period on also fails the guard
    let renewed_elsewhere = Subscription {
        current_period_end: due.current_period_end + Duration::days(30),
        ..due.clone()
    };
    assert!(!SettleGuard::expecting(&due).matches(
        SubscriptionStatus::Active,
        renewed_elsewhere.current_period_end
    ));
}

#[tokio::test]
async fn test_renewal_racing_cancellation_stays_consistent() {
    let store = store().await;
    let artist = profile(&store, Role::Artist, "100").await;
    let due = due_subscription(artist.user_id, "20");
    store.repos.finance.save_subscription(&due).await.unwrap();

    let (report, cancelled) = tokio::join!(
        store.service.process_renewals(Utc::now()),
        store.service.cancel_subscription(&artist)
    );
    let report = report.unwrap();

    let latest = store
        .repos
        .finance
        .latest_subscription(artist.user_id)
        .await
        .unwrap()
        .unwrap();
    let balance = store
        .repos
        .finance
        .account(artist.user_id)
        .await
        .unwrap()
        .unwrap()
        .balance;
    let ledger = store
        .repos
        .finance
        .transactions(artist.user_id, 10, 0)
        .await
        .unwrap();

    match cancelled {
        Ok(_) => assert_eq!(latest.status, SubscriptionStatus::Cancelled),
        Err(e) => {
            assert!(matches!(e, DistributionError::Conflict { .. }));
            assert_eq!(latest.status, SubscriptionStatus::Active);
        }
    }
    assert!(report.successful <= 1);
    assert_eq!(ledger.len(), report.successful);
    let expected = if report.successful == 1 { "80" } else { "100" };
    assert_eq!(balance, dec(expected));
}

#[tokio::test]
async fn test_delivery_claim_applies_postings_once() {
    let store = store().await;
    let artist = profile(&store, Role::Artist, "0").await;
    let key = DeliveryKey::revolut("ord-claim", "ORDER_COMPLETED");
    let postings = [LedgerPosting::credit(
        artist.user_id,
        dec("15"),
        TransactionKind::TopUp,
        "GBP",
    )];

    let first = store
        .repos
        .finance
        .post_entries_once(&key, &postings)
        .await
        .unwrap();
    assert_eq!(first.map(|rows| rows.len()), Some(1));
    let second = store
        .repos
        .finance
        .post_entries_once(&key, &postings)
        .await
        .unwrap();
    assert!(second.is_none());

    // another event for the same order is a separate delivery
    let other = DeliveryKey::revolut("ord-claim", "ORDER_AUTHORISED");
    assert!(store
        .repos
        .finance
        .post_entries_once(&other, &postings)
        .await
        .unwrap()
        .is_some());

    let account = store
        .repos
        .finance
        .account(artist.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.balance, dec("30"));
}

#[tokio::test]
async fn test_rejected_posting_releases_its_delivery_claim() {
    let store = store().await;
    let artist = profile(&store, Role::Artist, "5").await;
    let key = DeliveryKey::revolut("ord-retry", "ORDER_COMPLETED");

    let overdraft = [LedgerPosting::strict_debit(
        artist.user_id,
        dec("10"),
        TransactionKind::AdminAdjustment,
        "GBP",
    )];
    assert!(store
        .repos
        .finance
        .post_entries_once(&key, &overdraft)
        .await
        .is_err());

    // the claim was rolled back with the posting, so a retry still applies
    let credit = [LedgerPosting::credit(
        artist.user_id,
        dec("10"),
        TransactionKind::TopUp,
        "GBP",
    )];
    assert!(store
        .repos
        .finance
        .post_entries_once(&key, &credit)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_concurrent_webhook_deliveries_credit_once() {
    print_test_header(
        "test_concurrent_webhook_deliveries_credit_once",
        &["The same top up delivered twice at once credits the wallet a single time"],
    );
    let store = store().await;
    let artist = profile(&store, Role::Artist, "0").await;

    let body = serde_json::to_vec(&serde_json::json!({
        "event": "ORDER_COMPLETED",
        "data": {
            "id": "ord-race",
            "state": "COMPLETED",
            "metadata": {"userId": artist.user_id, "topUpAmount": "25.50"},
        }
    }))
    .unwrap();
    let signature = webhook::sign(WEBHOOK_SECRET.as_bytes(), &body);

    let service = &store.service;
    let (first, second) = tokio::join!(
        service.handle_revolut_webhook(&body, Some(&signature)),
        service.handle_revolut_webhook(&body, Some(&signature))
    );
    let mut outcomes = vec![first.unwrap().outcome, second.unwrap().outcome];
    outcomes.sort_by_key(|outcome| *outcome == WebhookOutcome::Duplicate);
    assert_eq!(
        outcomes,
        vec![WebhookOutcome::Processed, WebhookOutcome::Duplicate]
    );

    let account = store
        .repos
        .finance
        .account(artist.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.balance, dec("25.50"));
    let ledger = store
        .repos
        .finance
        .transactions(artist.user_id, 10, 0)
        .await
        .unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].kind, TransactionKind::TopUp);
}

#[tokio::test]
async fn test_profile_update_leaves_wallet_columns() {
    print_test_header(
        "test_profile_update_leaves_wallet_columns",
        &["Saving profile details never rewrites the stored wallet balance"],
    );
    let store = store().await;
    let artist = profile(&store, Role::Artist, "75").await;

    let update = ProfileUpdate {
        first_name: Some("Ada".to_string()),
        last_name: Some("Byron".to_string()),
        country: Some("GB".to_string()),
        lock_identity: true,
        ..Default::default()
    };
    let saved = store
        .service
        .update_my_profile(&artist, update)
        .await
        .unwrap();
    assert_eq!(saved.profile_lock_status, ProfileLockStatus::Locked);

    let found = store
        .repos
        .users
        .find_by_id(artist.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.wallet_balance, dec("75"));
    assert_eq!(found.details.first_name.as_deref(), Some("Ada"));
    assert_eq!(found.details.country.as_deref(), Some("GB"));
    assert_eq!(found.locked_fields, saved.locked_fields);
    assert_eq!(found.profile_lock_status, ProfileLockStatus::Locked);

    let mut missing = saved.clone();
    missing.id = Uuid::new_v4();
    assert!(store
        .repos
        .users
        .update_profile(&missing)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_competing_approvals_sign_artist_once() {
    print_test_header(
        "test_competing_approvals_sign_artist_once",
        &["Two labels approved at once: one signs the artist, the other conflicts"],
    );
    let store = store().await;
    let admin = profile(&store, Role::CompanyAdmin, "0").await;
    let first_label = profile(&store, Role::LabelAdmin, "0").await;
    let second_label = profile(&store, Role::LabelAdmin, "0").await;
    let artist = profile(&store, Role::Artist, "0").await;

    let first = store
        .service
        .request_artist_affiliation(&first_label, artist.user_id, None)
        .await
        .unwrap();
    let second = store
        .service
        .request_artist_affiliation(&second_label, artist.user_id, None)
        .await
        .unwrap();

    let service = &store.service;
    let (a, b) = tokio::join!(
        service.review_artist_request(&admin, first.id, ArtistRequestStatus::Approved, None),
        service.review_artist_request(&admin, second.id, ArtistRequestStatus::Approved, None)
    );
    let (approved, rejected): (Vec<_>, Vec<_>) = [a, b].into_iter().partition(Result::is_ok);
    assert_eq!(approved.len(), 1);
    assert!(matches!(rejected[0], Err(DistributionError::Conflict { .. })));

    let winner = approved[0].as_ref().unwrap().label_admin_id;
    let roster = store.repos.users.roster(winner).await.unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].id, artist.user_id);

    let pending = store
        .repos
        .artist_requests
        .list(&ArtistRequestFilter {
            status: Some(ArtistRequestStatus::Pending),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_ne!(pending[0].label_admin_id, winner);
}
