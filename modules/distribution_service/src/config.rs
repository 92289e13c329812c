//! Configuration for the distribution service module

use crate::api::rest::RestSettings;
use crate::domain::ServiceSettings;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Distribution service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HS256 secret shared with the identity provider
    #[serde(default)]
    pub jwt_secret: String,

    /// Expected `iss` claim, unchecked when absent
    #[serde(default)]
    pub jwt_issuer: Option<String>,

    /// HMAC secret for Revolut webhook signatures
    #[serde(default)]
    pub revolut_webhook_secret: Option<String>,

    /// Shared secret for the scheduled renewal endpoint
    #[serde(default)]
    pub cron_secret: Option<String>,

    /// The only account allowed to change super_admin permissions
    #[serde(default)]
    pub master_admin_id: Option<Uuid>,

    #[serde(default = "default_company_id")]
    pub company_id: String,

    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Fallback artist share when no split configuration is stored
    #[serde(default = "default_artist_percentage")]
    pub default_artist_percentage: Decimal,

    #[serde(default = "default_label_percentage")]
    pub default_label_percentage: Decimal,

    /// How often the background task runs subscription renewals
    #[serde(default = "default_renewal_interval", with = "humantime_serde")]
    pub renewal_interval: Duration,

    /// Disable the background task and rely on the cron endpoint only
    #[serde(default = "default_true")]
    pub renewals_enabled: bool,

    /// Seed default role permissions at startup
    #[serde(default = "default_true")]
    pub seed_default_permissions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_issuer: None,
            revolut_webhook_secret: None,
            cron_secret: None,
            master_admin_id: None,
            company_id: default_company_id(),
            default_currency: default_currency(),
            default_artist_percentage: default_artist_percentage(),
            default_label_percentage: default_label_percentage(),
            renewal_interval: default_renewal_interval(),
            renewals_enabled: true,
            seed_default_permissions: true,
        }
    }
}

impl Config {
    /// Reject configurations the service cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jwt_secret.trim().is_empty() {
            anyhow::bail!("distribution.jwt_secret must be set");
        }
        if self.renewal_interval.is_zero() {
            anyhow::bail!("distribution.renewal_interval must be greater than zero");
        }
        crate::domain::splits::validate_split_config(
            self.default_artist_percentage,
            self.default_label_percentage,
        )
        .map_err(|e| anyhow::anyhow!("invalid default split: {e}"))?;
        Ok(())
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            company_id: self.company_id.clone(),
            default_currency: self.default_currency.clone(),
            default_artist_percentage: self.default_artist_percentage,
            default_label_percentage: self.default_label_percentage,
            master_admin_id: self.master_admin_id,
            revolut_webhook_secret: self.revolut_webhook_secret.clone(),
        }
    }

    pub fn rest_settings(&self) -> RestSettings {
        RestSettings {
            cron_secret: self.cron_secret.clone(),
        }
    }
}

fn default_company_id() -> String {
    "msc-co".to_string()
}

fn default_currency() -> String {
    "GBP".to_string()
}

fn default_artist_percentage() -> Decimal {
    Decimal::from(80)
}

fn default_label_percentage() -> Decimal {
    Decimal::from(20)
}

fn default_renewal_interval() -> Duration {
    Duration::from_secs(60 * 60)
}

fn default_true() -> bool {
    true
}
