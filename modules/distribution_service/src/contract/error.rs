//! Contract error types for the distribution service
//!
//! These errors are transport-agnostic and used for inter-module communication.

use super::model::ReleaseStatus;
use rust_decimal::Decimal;

/// Distribution service domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DistributionError {
    /// Resource not found
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource type (release, user, change_request, ...)
        resource: String,
        /// Resource identifier
        id: String,
    },

    /// Conflict (duplicate, already reviewed, concurrent update, ...)
    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    /// Validation error
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Caller could not be authenticated
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// Caller is authenticated but lacks the permission
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    /// Release status transition not in the allowed graph
    #[error("Invalid status transition: Cannot transition from {from} to {to}")]
    InvalidTransition {
        from: ReleaseStatus,
        to: ReleaseStatus,
    },

    /// Strict debit larger than the available balance
    #[error("Insufficient wallet balance: required {required}, available {available}")]
    InsufficientBalance {
        required: Decimal,
        available: Decimal,
    },

    /// Adjustment would take a wallet below zero and negatives are not allowed
    #[error("Operation would result in negative balance: current {current}, adjustment {adjustment}, resulting {resulting}")]
    NegativeBalanceNotAllowed {
        current: Decimal,
        adjustment: Decimal,
        resulting: Decimal,
    },

    /// Adjustment would exceed the wallet's credit limit
    #[error("Operation would exceed negative balance limit: resulting {resulting}, credit limit {limit}")]
    CreditLimitExceeded { resulting: Decimal, limit: Decimal },

    /// Webhook signature missing or wrong
    #[error("Invalid signature: {reason}")]
    InvalidSignature { reason: String },

    /// Internal error
    #[error("Internal error")]
    Internal,
}

impl DistributionError {
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }
}
