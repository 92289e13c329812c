//! Integration tests for revenue splits, earnings and wallet adjustments

mod common;

use common::{dec, new_profile, print_test_header, TestPlatform};
use distribution_service::contract::*;
use rust_decimal::Decimal;
use uuid::Uuid;

fn earning(artist_id: Uuid, gross: &str) -> EarningRecord {
    EarningRecord {
        artist_id,
        gross_amount: dec(gross),
        currency: None,
        platform: "spotify".to_string(),
        release_id: None,
        notes: None,
    }
}

fn adjustment(target: Uuid, amount: &str, operation: AdjustOperation) -> WalletAdjustment {
    WalletAdjustment {
        target_user_id: target,
        amount: dec(amount),
        operation,
        currency: None,
        description: None,
        allow_negative: None,
        negative_limit: None,
    }
}

// ===== Earnings & splits =====

#[tokio::test]
async fn test_earning_uses_default_split_with_label() {
    print_test_header(
        "test_earning_uses_default_split_with_label",
        &["Default 80/20 split credits the artist and their label in one posting"],
    );
    let platform = TestPlatform::new().await;
    let finance = platform.user(Role::FinancialAdmin).await;
    let label = platform.user(Role::LabelAdmin).await;
    let artist = platform.signed_artist(label.user_id).await;

    let distribution = platform
        .service
        .record_earning(&finance, earning(artist.user_id, "100.00"))
        .await
        .unwrap();

    assert_eq!(distribution.split.source, SplitSource::Default);
    assert_eq!(distribution.allocation.artist_share, dec("80.00"));
    assert_eq!(distribution.allocation.label_share, dec("20.00"));
    assert_eq!(distribution.allocation.company_share, Decimal::ZERO);

    assert_eq!(platform.balance(artist.user_id), dec("80"));
    assert_eq!(platform.balance(label.user_id), dec("20"));

    let label_tx = distribution.label_transaction.unwrap();
    assert_eq!(label_tx.kind, TransactionKind::Earning);
    assert_eq!(label_tx.currency, "GBP");
    assert_eq!(distribution.artist_transaction.reference.as_deref(), Some("spotify"));
    assert_eq!(platform.audit.events_of("wallet_posted").len(), 2);
}

#[tokio::test]
async fn test_earning_without_label_leaves_remainder_with_company() {
    let platform = TestPlatform::new().await;
    let finance = platform.user(Role::FinancialAdmin).await;
    let artist = platform.user(Role::Artist).await;

    let distribution = platform
        .service
        .record_earning(&finance, earning(artist.user_id, "50"))
        .await
        .unwrap();

    assert_eq!(distribution.allocation.artist_share, dec("40"));
    assert_eq!(distribution.allocation.company_share, dec("10"));
    assert!(distribution.label_transaction.is_none());
    assert_eq!(platform.ledger_for(artist.user_id).len(), 1);
}

#[tokio::test]
async fn test_earning_rounds_to_cents_without_losing_money() {
    let platform = TestPlatform::new().await;
    let finance = platform.user(Role::FinancialAdmin).await;
    let label = platform.user(Role::LabelAdmin).await;
    let artist = platform.signed_artist(label.user_id).await;

    let distribution = platform
        .service
        .record_earning(&finance, earning(artist.user_id, "10.01"))
        .await
        .unwrap();

    let allocation = distribution.allocation;
    assert_eq!(allocation.artist_share, dec("8.01"));
    assert_eq!(allocation.label_share, dec("2.00"));
    assert_eq!(
        allocation.artist_share + allocation.label_share + allocation.company_share,
        dec("10.01")
    );
}

#[tokio::test]
async fn test_earning_validation_and_permissions() {
    let platform = TestPlatform::new().await;
    let finance = platform.user(Role::FinancialAdmin).await;
    let company_admin = platform.user(Role::CompanyAdmin).await;
    let artist = platform.user(Role::Artist).await;

    let err = platform
        .service
        .record_earning(&company_admin, earning(artist.user_id, "10"))
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Forbidden { .. }));

    let err = platform
        .service
        .record_earning(&finance, earning(artist.user_id, "0"))
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Validation { .. }));

    let err = platform
        .service
        .record_earning(&finance, earning(Uuid::new_v4(), "10"))
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::NotFound { .. }));
    assert!(platform.finance.ledger.read().is_empty());
}

#[tokio::test]
async fn test_override_precedence() {
    print_test_header(
        "test_override_precedence",
        &["Artist override beats label override beats company defaults"],
    );
    let platform = TestPlatform::new().await;
    let finance = platform.user(Role::FinancialAdmin).await;
    let label = platform.user(Role::LabelAdmin).await;
    let artist = platform.signed_artist(label.user_id).await;
    let artist_profile = platform.service.get_my_profile(&artist).await.unwrap();

    platform
        .service
        .upsert_split_override(&finance, SplitParty::Label, label.user_id, dec("30"))
        .await
        .unwrap();
    let split = platform
        .service
        .effective_split_for(&artist_profile)
        .await
        .unwrap();
    assert_eq!(split.source, SplitSource::LabelOverride);
    assert_eq!(split.artist_percentage, dec("70"));
    assert_eq!(split.label_percentage, dec("30"));

    platform
        .service
        .upsert_split_override(&finance, SplitParty::Artist, artist.user_id, dec("90"))
        .await
        .unwrap();
    let split = platform
        .service
        .effective_split_for(&artist_profile)
        .await
        .unwrap();
    assert_eq!(split.source, SplitSource::ArtistOverride);
    assert_eq!(split.artist_percentage, dec("90"));

    platform
        .service
        .remove_split_override(&finance, SplitParty::Artist, artist.user_id)
        .await
        .unwrap();
    platform
        .service
        .remove_split_override(&finance, SplitParty::Label, label.user_id)
        .await
        .unwrap();
    let split = platform
        .service
        .effective_split_for(&artist_profile)
        .await
        .unwrap();
    assert_eq!(split.source, SplitSource::Default);

    let err = platform
        .service
        .remove_split_override(&finance, SplitParty::Label, label.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::NotFound { .. }));
}

#[tokio::test]
async fn test_label_override_requires_label_admin() {
    let platform = TestPlatform::new().await;
    let finance = platform.user(Role::FinancialAdmin).await;
    let artist = platform.user(Role::Artist).await;

    let err = platform
        .service
        .upsert_split_override(&finance, SplitParty::Label, artist.user_id, dec("30"))
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Validation { .. }));

    let err = platform
        .service
        .upsert_split_override(&finance, SplitParty::Artist, artist.user_id, dec("101"))
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Validation { .. }));
}

#[tokio::test]
async fn test_split_configuration_update() {
    let platform = TestPlatform::new().await;
    let finance = platform.user(Role::FinancialAdmin).await;
    let artist = platform.user(Role::Artist).await;

    let config = platform
        .service
        .get_split_configuration(&finance)
        .await
        .unwrap();
    assert_eq!(config.defaults.artist_percentage, dec("80"));
    assert_eq!(config.defaults.label_percentage, dec("20"));
    assert!(config.artist_overrides.is_empty());

    let err = platform
        .service
        .update_split_configuration(&finance, dec("70"), dec("40"))
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Validation { .. }));

    let saved = platform
        .service
        .update_split_configuration(&finance, dec("75"), dec("25"))
        .await
        .unwrap();
    assert_eq!(saved.updated_by, Some(finance.user_id));

    platform
        .service
        .upsert_split_override(&finance, SplitParty::Artist, artist.user_id, dec("85"))
        .await
        .unwrap();

    let config = platform
        .service
        .get_split_configuration(&finance)
        .await
        .unwrap();
    assert_eq!(config.defaults.artist_percentage, dec("75"));
    assert_eq!(config.artist_overrides.len(), 1);
    assert_eq!(config.artist_overrides[0].label_percentage, dec("15"));
    assert!(config.label_overrides.is_empty());

    let err = platform
        .service
        .get_split_configuration(&artist)
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Forbidden { .. }));
    assert_eq!(platform.audit.events_of("splits_changed").len(), 2);
}

// ===== Wallet =====

#[tokio::test]
async fn test_admin_adjust_credit_and_debit() {
    let platform = TestPlatform::new().await;
    let admin = platform.user(Role::FinancialAdmin).await;
    let artist = platform.user(Role::Artist).await;

    let result = platform
        .service
        .admin_adjust_wallet(&admin, adjustment(artist.user_id, "50", AdjustOperation::Add))
        .await
        .unwrap();
    assert_eq!(result.transaction.amount, dec("50"));
    assert_eq!(result.transaction.balance_before, Decimal::ZERO);
    assert_eq!(result.transaction.balance_after, dec("50"));
    assert_eq!(result.transaction.created_by, Some(admin.user_id));
    assert_eq!(result.account.balance, dec("50"));

    let result = platform
        .service
        .admin_adjust_wallet(
            &admin,
            adjustment(artist.user_id, "20", AdjustOperation::Subtract),
        )
        .await
        .unwrap();
    assert_eq!(result.transaction.amount, dec("-20"));
    assert_eq!(result.account.balance, dec("30"));

    let err = platform
        .service
        .admin_adjust_wallet(&admin, adjustment(artist.user_id, "0", AdjustOperation::Add))
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Validation { .. }));
}

#[tokio::test]
async fn test_out_of_range_amounts_are_rejected() {
    print_test_header(
        "test_out_of_range_amounts_are_rejected",
        &["Amounts beyond decimal range fail validation and change nothing"],
    );
    let platform = TestPlatform::new().await;
    let admin = platform.user(Role::SuperAdmin).await;
    let artist = platform.user(Role::Artist).await;
    let huge = "70000000000000000000000000000";
    platform.set_balance(artist.user_id, dec(huge));

    let err = platform
        .service
        .admin_adjust_wallet(&admin, adjustment(artist.user_id, huge, AdjustOperation::Add))
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Validation { .. }));
    assert_eq!(platform.balance(artist.user_id), dec(huge));
    assert!(platform.ledger_for(artist.user_id).is_empty());

    let err = platform
        .service
        .record_earning(&admin, earning(artist.user_id, "1000000000000000000000000000"))
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Validation { .. }));
    assert!(platform.ledger_for(artist.user_id).is_empty());
}

#[tokio::test]
async fn test_admin_adjust_negative_balance_rules() {
    print_test_header(
        "test_admin_adjust_negative_balance_rules",
        &[
            "Overdrafts need an explicit allowance",
            "The supplied credit limit is enforced and stored",
        ],
    );
    let platform = TestPlatform::new().await;
    let admin = platform.user(Role::SuperAdmin).await;
    let artist = platform.user(Role::Artist).await;
    platform.set_balance(artist.user_id, dec("50"));

    let err = platform
        .service
        .admin_adjust_wallet(
            &admin,
            adjustment(artist.user_id, "80", AdjustOperation::Subtract),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        DistributionError::NegativeBalanceNotAllowed {
            current: dec("50"),
            adjustment: dec("-80"),
            resulting: dec("-30"),
        }
    );
    assert_eq!(platform.balance(artist.user_id), dec("50"));

    let err = platform
        .service
        .admin_adjust_wallet(
            &admin,
            WalletAdjustment {
                allow_negative: Some(true),
                negative_limit: Some(dec("20")),
                ..adjustment(artist.user_id, "80", AdjustOperation::Subtract)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::CreditLimitExceeded { .. }));
    assert!(platform.ledger_for(artist.user_id).is_empty());

    let result = platform
        .service
        .admin_adjust_wallet(
            &admin,
            WalletAdjustment {
                allow_negative: Some(true),
                negative_limit: Some(dec("100")),
                ..adjustment(artist.user_id, "80", AdjustOperation::Subtract)
            },
        )
        .await
        .unwrap();
    assert_eq!(result.account.balance, dec("-30"));
    assert!(result.account.negative_balance_allowed);
    assert_eq!(result.account.credit_limit, dec("100"));

    let err = platform
        .service
        .admin_adjust_wallet(
            &admin,
            WalletAdjustment {
                negative_limit: Some(dec("-1")),
                ..adjustment(artist.user_id, "1", AdjustOperation::Subtract)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Validation { .. }));
}

#[tokio::test]
async fn test_wallet_access_rules() {
    let platform = TestPlatform::new().await;
    let artist = platform.user(Role::Artist).await;
    let other = platform.user(Role::Artist).await;
    let finance = platform.user(Role::FinancialAdmin).await;
    platform.set_balance(artist.user_id, dec("12.50"));

    let own = platform.service.get_wallet(&artist, None).await.unwrap();
    assert_eq!(own.balance, dec("12.50"));

    let err = platform
        .service
        .get_wallet(&other, Some(artist.user_id))
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Forbidden { .. }));

    let viewed = platform
        .service
        .get_wallet(&finance, Some(artist.user_id))
        .await
        .unwrap();
    assert_eq!(viewed.user_id, artist.user_id);

    let err = platform
        .service
        .admin_adjust_wallet(&artist, adjustment(artist.user_id, "5", AdjustOperation::Add))
        .await
        .unwrap_err();
    assert!(matches!(err, DistributionError::Forbidden { .. }));
}

#[tokio::test]
async fn test_wallet_transactions_newest_first() {
    let platform = TestPlatform::new().await;
    let admin = platform.user(Role::FinancialAdmin).await;
    let target = platform.add_profile(new_profile(Role::Artist, None));
    let artist = platform.caller(target.id).await;

    for amount in ["1", "2", "3"] {
        platform
            .service
            .admin_adjust_wallet(&admin, adjustment(target.id, amount, AdjustOperation::Add))
            .await
            .unwrap();
    }

    let txs = platform
        .service
        .list_wallet_transactions(&artist, None, 2, 0)
        .await
        .unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].amount, dec("3"));
    assert_eq!(txs[0].balance_after, dec("6"));
    assert_eq!(txs[1].amount, dec("2"));
}
