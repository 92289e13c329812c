//! Layered server configuration
//!
//! Sources, highest priority last:
//! 1. Built-in defaults
//! 2. YAML file given with `--config`
//! 3. `DISTRO__*` environment variables, `__` separating nested keys
//!    (`DISTRO__DATABASE__URL` -> `database.url`)

use distribution_service::Config as DistributionConfig;
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_PREFIX: &str = "DISTRO__";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub distribution: DistributionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SeaORM connection URL, `postgres://` or `sqlite://`
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` wins when set
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        Self::figment(path)
            .extract()
            .map_err(|e| anyhow::anyhow!("failed to load configuration: {e}"))
    }

    /// Copy with secrets masked, for `--print-config`
    pub fn redacted(&self) -> Self {
        let mask = |value: &Option<String>| value.as_ref().map(|_| "***".to_string());
        let mut copy = self.clone();
        if !copy.distribution.jwt_secret.is_empty() {
            copy.distribution.jwt_secret = "***".to_string();
        }
        copy.distribution.revolut_webhook_secret = mask(&self.distribution.revolut_webhook_secret);
        copy.distribution.cron_secret = mask(&self.distribution.cron_secret);
        copy
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_database_url() -> String {
    "sqlite://distribution.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load(Path::new("does-not-exist.yaml")).unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.logging.format, LogFormat::Text);
        assert_eq!(config.distribution.company_id, "msc-co");
    }

    #[test]
    fn test_yaml_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  bind_addr: 127.0.0.1:9000\nlogging:\n  format: json\ndistribution:\n  jwt_secret: abc\n  renewal_interval: 30m\n  cron_secret: tick"
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.server.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.distribution.jwt_secret, "abc");
        assert_eq!(
            config.distribution.renewal_interval,
            std::time::Duration::from_secs(30 * 60)
        );

        let redacted = config.redacted();
        assert_eq!(redacted.distribution.jwt_secret, "***");
        assert_eq!(redacted.distribution.cron_secret.as_deref(), Some("***"));
        assert_eq!(redacted.distribution.revolut_webhook_secret, None);
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("distribution.yaml", "database:\n  url: \"sqlite::memory:\"\n")?;
            jail.set_env("DISTRO__DATABASE__URL", "postgres://localhost/distro");
            jail.set_env("DISTRO__DISTRIBUTION__COMPANY_ID", "acme");

            let config = AppConfig::load(Path::new("distribution.yaml"))
                .map_err(|e| figment::Error::from(e.to_string()))?;
            assert_eq!(config.database.url, "postgres://localhost/distro");
            assert_eq!(config.distribution.company_id, "acme");
            Ok(())
        });
    }
}
