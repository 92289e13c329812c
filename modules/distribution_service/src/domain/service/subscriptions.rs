//! Subscription payments, cancellation and renewals

use super::{internal, recover, Service};
use crate::contract::{
    AuthContext, BillingCycle, DistributionError, RenewalReport, Subscription, SubscriptionAction,
    SubscriptionStatus, TransactionKind, WalletPayment,
};
use crate::domain::events::{DistributionEvent, SubscriptionChangedEvent};
use crate::domain::repository::SettleGuard;
use crate::domain::subscriptions::{self as plans, Plan};
use crate::domain::wallet::LedgerPosting;
use crate::domain::webhook::DeliveryKey;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

impl Service {
    async fn subscription_changed(&self, sub: &Subscription, action: &str) {
        tracing::info!(
            user_id = %sub.user_id,
            subscription_id = %sub.id,
            tier = %sub.tier,
            status = sub.status.as_str(),
            action,
            "subscription changed"
        );
        let event = DistributionEvent::SubscriptionChanged(SubscriptionChangedEvent {
            user_id: sub.user_id,
            subscription_id: sub.id,
            tier: sub.tier.clone(),
            status: sub.status.as_str().to_string(),
            action: action.to_string(),
            timestamp: sub.updated_at,
        });
        self.audit(event.clone()).await;
        self.notify(event).await;
    }

    async fn active_subscription(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Subscription>, DistributionError> {
        self.repos
            .finance
            .find_active_subscription(user_id)
            .await
            .map_err(internal("load active subscription"))
    }

    /// New active period for `user_id`, reusing the `existing` active row if any
    fn next_subscription(
        &self,
        existing: Option<&Subscription>,
        user_id: Uuid,
        tier: String,
        cycle: BillingCycle,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> (Subscription, SubscriptionAction) {
        let period_end = plans::period_end(now, cycle);
        match existing {
            Some(current) => (
                Subscription {
                    tier,
                    billing_cycle: cycle,
                    amount,
                    currency: self.settings.default_currency.clone(),
                    current_period_end: period_end,
                    auto_renew: true,
                    updated_at: now,
                    ..current.clone()
                },
                SubscriptionAction::Updated,
            ),
            None => (
                Subscription {
                    id: Uuid::new_v4(),
                    user_id,
                    tier,
                    status: SubscriptionStatus::Active,
                    billing_cycle: cycle,
                    amount,
                    currency: self.settings.default_currency.clone(),
                    current_period_start: now,
                    current_period_end: period_end,
                    auto_renew: true,
                    renewal_failure_count: 0,
                    renewal_failure_reason: None,
                    last_renewal_attempt: None,
                    created_at: now,
                    updated_at: now,
                },
                SubscriptionAction::Created,
            ),
        }
    }

    /// Caller's active subscription, or the most recent one in any status
    pub async fn get_subscription(
        &self,
        caller: &AuthContext,
    ) -> Result<Option<Subscription>, DistributionError> {
        self.require_any(
            caller,
            &["subscription:read:own", "subscription:read:any"],
            "get_subscription",
        )
        .await?;

        let active = self.active_subscription(caller.user_id).await?;
        if active.is_some() {
            return Ok(active);
        }

        self.repos
            .finance
            .latest_subscription(caller.user_id)
            .await
            .map_err(internal("load latest subscription"))
    }

    /// Pay for a plan from the wallet. The debit and the subscription write
    /// happen in one transaction; an overdraft rejects both.
    pub async fn pay_subscription_with_wallet(
        &self,
        caller: &AuthContext,
        plan_id: &str,
        cycle: BillingCycle,
    ) -> Result<WalletPayment, DistributionError> {
        self.require_any(
            caller,
            &["subscription:update:own", "subscription:manage:any"],
            "pay_subscription_with_wallet",
        )
        .await?;

        let plan: Plan = plans::find_plan(plan_id)?;
        let cost = plan.price(cycle);
        let plan_name = plan.display_name();
        let now = Utc::now();

        let existing = self.active_subscription(caller.user_id).await?;
        let (subscription, action) = self.next_subscription(
            existing.as_ref(),
            caller.user_id,
            plan.tier(),
            cycle,
            cost,
            now,
        );
        let guard = existing
            .as_ref()
            .map(SettleGuard::expecting)
            .unwrap_or_default();

        let posting = LedgerPosting::strict_debit(
            caller.user_id,
            cost,
            TransactionKind::SubscriptionPayment,
            &self.settings.default_currency,
        )
        .with_description(format!(
            "Subscription payment: {plan_name} ({})",
            cycle.as_str()
        ))
        .with_reference(plan.id)
        .created_by(caller.user_id);

        let (saved, transaction) = self
            .repos
            .finance
            .settle_subscription(Some(&posting), &subscription, guard)
            .await
            .map_err(recover("wallet subscription payment"))?
            .ok_or_else(|| {
                DistributionError::conflict("Subscription changed during payment, try again")
            })?;
        let transaction = transaction.ok_or(DistributionError::Internal)?;

        self.wallet_posted(std::slice::from_ref(&transaction)).await;
        self.subscription_changed(&saved, action.as_str()).await;

        Ok(WalletPayment {
            subscription: saved,
            action,
            plan_name,
            previous_balance: transaction.balance_before,
            new_balance: transaction.balance_after,
            amount_deducted: cost,
        })
    }

    /// Stop auto-renewal and cancel the caller's active subscription
    pub async fn cancel_subscription(
        &self,
        caller: &AuthContext,
    ) -> Result<Subscription, DistributionError> {
        self.require_any(
            caller,
            &["subscription:cancel:own", "subscription:manage:any"],
            "cancel_subscription",
        )
        .await?;

        let active = self
            .active_subscription(caller.user_id)
            .await?
            .ok_or_else(|| DistributionError::not_found("subscription", caller.user_id))?;

        let cancelled = Subscription {
            status: SubscriptionStatus::Cancelled,
            auto_renew: false,
            updated_at: Utc::now(),
            ..active.clone()
        };

        let (saved, _) = self
            .repos
            .finance
            .settle_subscription(None, &cancelled, SettleGuard::expecting(&active))
            .await
            .map_err(internal("cancel subscription"))?
            .ok_or_else(|| {
                DistributionError::conflict("Subscription changed during cancellation, try again")
            })?;

        self.subscription_changed(&saved, "cancelled").await;
        Ok(saved)
    }

    /// Activate or extend a subscription paid for outside the wallet
    /// (card payment confirmed by webhook). With a `delivery` key the
    /// activation happens at most once per key; `None` means it already did.
    pub async fn activate_subscription_from_payment(
        &self,
        user_id: Uuid,
        plan_id: &str,
        cycle: BillingCycle,
        amount: Option<Decimal>,
        delivery: Option<&DeliveryKey>,
    ) -> Result<Option<(Subscription, SubscriptionAction)>, DistributionError> {
        let user = self.load_user(user_id).await?;
        let amount = match (amount, plans::find_plan(plan_id)) {
            (Some(amount), _) => amount,
            (None, Ok(plan)) => plan.price(cycle),
            (None, Err(_)) => Decimal::ZERO,
        };

        let existing = self.active_subscription(user.id).await?;
        let (subscription, action) = self.next_subscription(
            existing.as_ref(),
            user.id,
            plans::tier_for_plan(plan_id),
            cycle,
            amount,
            Utc::now(),
        );

        let guard = SettleGuard {
            expected: None,
            delivery,
        };
        let Some((saved, _)) = self
            .repos
            .finance
            .settle_subscription(None, &subscription, guard)
            .await
            .map_err(recover("activate subscription"))?
        else {
            return Ok(None);
        };

        self.subscription_changed(&saved, action.as_str()).await;
        Ok(Some((saved, action)))
    }

    /// Renew every subscription whose period ended by `now`.
    ///
    /// Each renewal debits the wallet and rolls the period in one
    /// transaction. An unpaid renewal marks the subscription past due.
    pub async fn process_renewals(
        &self,
        now: DateTime<Utc>,
    ) -> Result<RenewalReport, DistributionError> {
        let due = self
            .repos
            .finance
            .due_for_renewal(now)
            .await
            .map_err(internal("load subscriptions due for renewal"))?;

        let mut report = RenewalReport::default();
        for sub in due.into_iter().filter(|s| plans::is_due_for_renewal(s, now)) {
            report.processed += 1;

            let posting = LedgerPosting::strict_debit(
                sub.user_id,
                sub.amount,
                TransactionKind::SubscriptionRenewal,
                &sub.currency,
            )
            .with_description(format!(
                "Subscription renewal: {} ({})",
                sub.tier,
                sub.billing_cycle.as_str()
            ))
            .with_reference(sub.id.to_string());

            let renewed = plans::renewed(&sub, now);
            match self
                .repos
                .finance
                .settle_subscription(Some(&posting), &renewed, SettleGuard::expecting(&sub))
                .await
                .map_err(recover("renew subscription"))
            {
                Ok(None) => {
                    report.skipped += 1;
                    tracing::debug!(
                        subscription_id = %sub.id,
                        "subscription changed since it was found due, skipping"
                    );
                }
                Ok(Some((saved, transaction))) => {
                    report.successful += 1;
                    if let Some(tx) = transaction {
                        self.wallet_posted(std::slice::from_ref(&tx)).await;
                    }
                    self.subscription_changed(&saved, "renewed").await;
                }
                Err(DistributionError::InsufficientBalance { required, available }) => {
                    report.insufficient_funds += 1;
                    tracing::warn!(
                        subscription_id = %sub.id,
                        user_id = %sub.user_id,
                        %required,
                        %available,
                        "renewal failed: insufficient wallet balance"
                    );
                    let failed =
                        plans::renewal_failed(&sub, plans::INSUFFICIENT_FUNDS_REASON, now);
                    match self
                        .repos
                        .finance
                        .settle_subscription(None, &failed, SettleGuard::expecting(&sub))
                        .await
                    {
                        Ok(Some((saved, _))) => {
                            self.subscription_changed(&saved, "past_due").await
                        }
                        Ok(None) => {
                            tracing::debug!(
                                subscription_id = %sub.id,
                                "subscription changed before it could be marked past due"
                            );
                        }
                        Err(e) => {
                            tracing::error!(
                                subscription_id = %sub.id,
                                error = %e,
                                "failed to mark subscription past due"
                            );
                            report.errors.push((sub.id, e.to_string()));
                        }
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(subscription_id = %sub.id, error = %e, "renewal failed");
                    report.errors.push((sub.id, e.to_string()));
                }
            }
        }

        tracing::info!(
            processed = report.processed,
            successful = report.successful,
            insufficient_funds = report.insufficient_funds,
            failed = report.failed,
            skipped = report.skipped,
            "subscription renewals processed"
        );
        Ok(report)
    }
}
