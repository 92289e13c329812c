//! Subscription plans and billing periods

use crate::contract::{BillingCycle, DistributionError, Subscription, SubscriptionStatus};
use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;

/// Priced plan from the catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub id: &'static str,
    pub monthly: Decimal,
    pub yearly: Decimal,
}

impl Plan {
    pub fn price(&self, cycle: BillingCycle) -> Decimal {
        match cycle {
            BillingCycle::Monthly => self.monthly,
            BillingCycle::Yearly => self.yearly,
        }
    }

    /// "artist-pro" -> "Artist Pro"
    pub fn display_name(&self) -> String {
        self.id
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn tier(&self) -> String {
        tier_for_plan(self.id)
    }
}

const fn gbp(units: u32, cents: u32) -> Decimal {
    Decimal::from_parts(units * 100 + cents, 0, 0, false, 2)
}

pub const PLANS: [Plan; 4] = [
    Plan {
        id: "artist-starter",
        monthly: gbp(9, 99),
        yearly: gbp(119, 88),
    },
    Plan {
        id: "artist-pro",
        monthly: gbp(19, 99),
        yearly: gbp(239, 88),
    },
    Plan {
        id: "label-starter",
        monthly: gbp(29, 99),
        yearly: gbp(359, 88),
    },
    Plan {
        id: "label-pro",
        monthly: gbp(49, 99),
        yearly: gbp(599, 88),
    },
];

pub fn find_plan(plan_id: &str) -> Result<Plan, DistributionError> {
    PLANS
        .iter()
        .copied()
        .find(|p| p.id == plan_id)
        .ok_or_else(|| DistributionError::validation("Invalid plan ID"))
}

/// Subscription tier stored for a plan id; unknown ids map to themselves
pub fn tier_for_plan(plan_id: &str) -> String {
    match plan_id {
        "artist-starter" => "artist_starter",
        "artist-pro" => "artist_pro",
        "label-starter" => "label_starter",
        "label-pro" => "label_pro",
        "distribution-partner" => "distribution_partner",
        "company-admin" => "company_admin",
        other => other,
    }
    .to_string()
}

/// End of a billing period starting at `start`: one calendar month or year later
pub fn period_end(start: DateTime<Utc>, cycle: BillingCycle) -> DateTime<Utc> {
    let months = match cycle {
        BillingCycle::Monthly => Months::new(1),
        BillingCycle::Yearly => Months::new(12),
    };
    // only fails past year 262143
    start.checked_add_months(months).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Active, auto-renewing and past the end of its period
pub fn is_due_for_renewal(sub: &Subscription, now: DateTime<Utc>) -> bool {
    sub.status == SubscriptionStatus::Active && sub.auto_renew && sub.current_period_end <= now
}

/// Roll a subscription into its next paid period
pub fn renewed(sub: &Subscription, now: DateTime<Utc>) -> Subscription {
    let start = sub.current_period_end;
    Subscription {
        status: SubscriptionStatus::Active,
        current_period_start: start,
        current_period_end: period_end(start, sub.billing_cycle),
        renewal_failure_count: 0,
        renewal_failure_reason: None,
        last_renewal_attempt: Some(now),
        updated_at: now,
        ..sub.clone()
    }
}

/// Reason stored on a subscription whose renewal could not be paid
pub const INSUFFICIENT_FUNDS_REASON: &str = "Insufficient wallet balance";

/// Mark a renewal attempt as failed
pub fn renewal_failed(sub: &Subscription, reason: &str, now: DateTime<Utc>) -> Subscription {
    Subscription {
        status: SubscriptionStatus::PastDue,
        renewal_failure_count: sub.renewal_failure_count + 1,
        renewal_failure_reason: Some(reason.to_string()),
        last_renewal_attempt: Some(now),
        updated_at: now,
        ..sub.clone()
    }
}
