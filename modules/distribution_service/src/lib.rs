//! Distribution Service
//!
//! Backend for a music distribution platform: role based access control,
//! the release review workflow, change requests, revenue splits, the wallet
//! ledger, wallet-funded subscriptions and Revolut payment webhooks.
//!
//! ## Public API
//!
//! Other modules should depend on the contract:
//! - [`DistributionApi`] - trait for in-process calls
//! - [`contract::model`] - domain models
//! - [`DistributionError`] - error type
//!
//! The module itself is [`DistributionServiceModule`].

// === PUBLIC CONTRACT ===
pub mod contract;
pub use contract::{client::DistributionApi, error::DistributionError, model};

// === MODULE DEFINITION ===
pub mod module;
pub use module::DistributionServiceModule;

pub mod config;
pub use config::Config;

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
