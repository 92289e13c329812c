//! Wallet balance rules and ledger postings

use crate::contract::{AdjustOperation, DistributionError, TransactionKind, WalletAccount};
use rust_decimal::Decimal;
use uuid::Uuid;

/// How far below zero a posting may take a balance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalancePolicy {
    /// Never below zero
    Strict,
    /// Use the account's own negative-balance settings
    AccountLimits,
    /// Settings supplied with the request take precedence over the account's
    Override {
        allow_negative: bool,
        credit_limit: Option<Decimal>,
    },
}

/// New negative-balance settings persisted together with a posting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletLimits {
    pub negative_balance_allowed: bool,
    pub credit_limit: Option<Decimal>,
}

/// One balance change and its ledger row, applied atomically by the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerPosting {
    pub user_id: Uuid,
    /// Signed amount: positive credits, negative debits
    pub delta: Decimal,
    pub policy: BalancePolicy,
    pub kind: TransactionKind,
    pub currency: String,
    pub description: String,
    pub reference: Option<String>,
    pub created_by: Option<Uuid>,
    pub limits_update: Option<WalletLimits>,
}

impl LedgerPosting {
    pub fn credit(user_id: Uuid, amount: Decimal, kind: TransactionKind, currency: &str) -> Self {
        Self {
            user_id,
            delta: amount,
            policy: BalancePolicy::AccountLimits,
            kind,
            currency: currency.to_string(),
            description: String::new(),
            reference: None,
            created_by: None,
            limits_update: None,
        }
    }

    /// Debit that may never overdraw the wallet
    pub fn strict_debit(
        user_id: Uuid,
        amount: Decimal,
        kind: TransactionKind,
        currency: &str,
    ) -> Self {
        Self {
            delta: -amount,
            policy: BalancePolicy::Strict,
            ..Self::credit(user_id, Decimal::ZERO, kind, currency)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn created_by(mut self, user_id: Uuid) -> Self {
        self.created_by = Some(user_id);
        self
    }
}

/// Signed delta of an admin adjustment
pub fn signed_amount(
    amount: Decimal,
    operation: AdjustOperation,
) -> Result<Decimal, DistributionError> {
    if amount <= Decimal::ZERO {
        return Err(DistributionError::validation(
            "Valid target user ID and positive amount are required",
        ));
    }
    Ok(match operation {
        AdjustOperation::Add => amount,
        AdjustOperation::Subtract => -amount,
    })
}

/// Apply `delta` to the account under `policy`, returning the new balance.
///
/// Credits are always accepted. A debit that leaves the balance negative is
/// checked against the negative-balance permission and, when one is set, the
/// credit limit (maximum absolute negative balance).
pub fn apply_delta(
    account: &WalletAccount,
    delta: Decimal,
    policy: BalancePolicy,
) -> Result<Decimal, DistributionError> {
    let current = account.balance;
    let resulting = current
        .checked_add(delta)
        .ok_or_else(|| DistributionError::validation("Resulting balance is out of range"))?;

    if delta >= Decimal::ZERO || resulting >= Decimal::ZERO {
        return Ok(resulting);
    }

    let (allowed, limit) = match policy {
        BalancePolicy::Strict => {
            return Err(DistributionError::InsufficientBalance {
                required: -delta,
                available: current,
            })
        }
        // a zero credit limit on the account means no limit is configured
        BalancePolicy::AccountLimits => (
            account.negative_balance_allowed,
            (account.credit_limit > Decimal::ZERO).then_some(account.credit_limit),
        ),
        BalancePolicy::Override {
            allow_negative,
            credit_limit,
        } => (
            allow_negative || account.negative_balance_allowed,
            credit_limit,
        ),
    };

    if !allowed {
        return Err(DistributionError::NegativeBalanceNotAllowed {
            current,
            adjustment: delta,
            resulting,
        });
    }

    if let Some(limit) = limit {
        if resulting.abs() > limit {
            return Err(DistributionError::CreditLimitExceeded { resulting, limit });
        }
    }

    Ok(resulting)
}
